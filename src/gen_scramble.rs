use std::error::Error;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::PathBuf;

use clap::Parser;
use log::{debug, info, LevelFilter};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;

use scramble_web::{generate_with_rng, move_count_of, PuzzleVariant};

/// Generate random scrambles and write them as CSV.
#[derive(Parser, Debug)]
#[command(about, version)]
struct Args {
    /// Puzzle to scramble: 3x3x3, megaminx or 7x7x7
    #[arg(short, long, default_value = "3x3x3")]
    puzzle: PuzzleVariant,

    /// Number of scrambles to generate
    #[arg(short, long, default_value_t = 1)]
    count: usize,

    /// Moves per scramble, defaults to the usual length for the puzzle
    #[arg(short, long)]
    length: Option<usize>,

    /// Seed for reproducible output
    #[arg(short, long)]
    seed: Option<u64>,

    /// Append to this file instead of writing to stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Enable debug messages
    #[arg(short, long, default_value_t = false)]
    debug: bool,
}

#[derive(Serialize)]
struct Record {
    puzzle: PuzzleVariant,
    length: usize,
    moves: usize,
    scramble: String,
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let mut logger = env_logger::Builder::from_default_env();
    if args.debug {
        logger.filter_level(LevelFilter::Debug);
    }
    logger.init();

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let length = args.length.unwrap_or_else(|| args.puzzle.scramble_length());
    let policy = args.puzzle.adjacency_policy();

    let (writer, has_headers): (Box<dyn Write>, bool) = match &args.output {
        Some(path) => {
            let is_new = !path.exists();
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            (Box::new(file), is_new)
        }
        None => (Box::new(io::stdout().lock()), true),
    };
    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(has_headers)
        .from_writer(writer);

    let mut total_violations = 0;
    for i in 0..args.count {
        let scramble = generate_with_rng(args.puzzle, length, &mut rng);
        let violations = policy.count_violations(scramble.moves());
        if violations > 0 {
            debug!("scramble {}: {} adjacent pairs too similar", i, violations);
        }
        total_violations += violations;

        let scramble = scramble.to_string();
        csv_writer.serialize(Record {
            puzzle: args.puzzle,
            length,
            moves: move_count_of(scramble.as_str()),
            scramble,
        })?;
    }
    csv_writer.flush()?;

    info!(
        "wrote {} {} scrambles of {} moves ({} adjacency violations)",
        args.count, args.puzzle, length, total_violations
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args() {
        let args = Args::try_parse_from(["gen-scramble", "-p", "megaminx", "-c", "3", "-s", "1"])
            .unwrap();
        assert_eq!(args.puzzle, PuzzleVariant::Megaminx);
        assert_eq!(args.count, 3);
        assert_eq!(args.seed, Some(1));
        assert_eq!(args.length, None);

        let args = Args::try_parse_from(["gen-scramble"]).unwrap();
        assert_eq!(args.puzzle, PuzzleVariant::Cube3x3);
        assert_eq!(args.count, 1);

        assert!(Args::try_parse_from(["gen-scramble", "--puzzle", "skewb"]).is_err());
    }

    #[test]
    fn test_record_csv() {
        let mut csv_writer = csv::WriterBuilder::new().from_writer(vec![]);
        csv_writer
            .serialize(Record {
                puzzle: PuzzleVariant::Cube7x7,
                length: 2,
                moves: 2,
                scramble: "3Rw U'".to_string(),
            })
            .unwrap();
        let out = String::from_utf8(csv_writer.into_inner().unwrap()).unwrap();
        assert_eq!(out, "puzzle,length,moves,scramble\n7x7x7,2,2,3Rw U'\n");
    }
}
