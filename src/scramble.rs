use std::fmt;

use rand::distributions::Uniform;
use rand::Rng;
use serde::Serialize;

use crate::moves::Move;
use crate::puzzle_variant::PuzzleVariant;

/// How many candidates are drawn for one position before giving up on the
/// adjacency rules for it.
pub const MAX_DRAW_ATTEMPTS: usize = 10;

/// An ordered list of moves. Rendered with a single space between tokens.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Scramble(Vec<Move>);

impl Scramble {
    #[inline]
    pub fn moves(&self) -> &[Move] {
        &self.0
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The first `max_chars` characters of the rendered scramble followed by
    /// `...`, for logs. The marker is appended even when nothing was cut.
    pub fn preview(&self, max_chars: usize) -> String {
        let mut short: String = self.to_string().chars().take(max_chars).collect();
        short.push_str("...");
        short
    }
}

impl fmt::Display for Scramble {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, turn) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            f.write_str(turn.as_str())?;
        }
        Ok(())
    }
}

impl From<Vec<Move>> for Scramble {
    fn from(moves: Vec<Move>) -> Self {
        Scramble(moves)
    }
}

pub fn generate(variant: PuzzleVariant, length: usize) -> Scramble {
    generate_with_rng(variant, length, &mut rand::thread_rng())
}

/// Draw `length` moves from the variant's vocabulary, rejecting candidates
/// that are too similar to the previous move.
///
/// Each position gets at most [`MAX_DRAW_ATTEMPTS`] draws. If every one of
/// them is rejected the last candidate is kept anyway, so the result always
/// has exactly `length` moves but may very occasionally contain a pair the
/// adjacency policy would have refused.
pub fn generate_with_rng<R: Rng>(variant: PuzzleVariant, length: usize, rng: &mut R) -> Scramble {
    let vocabulary = variant.vocabulary();
    let policy = variant.adjacency_policy();
    let range = Uniform::new(0, vocabulary.len());

    let mut moves: Vec<Move> = Vec::with_capacity(length);
    let mut prev: Option<Move> = None;

    for _ in 0..length {
        let mut candidate = vocabulary[rng.sample(range)];
        let mut attempts = 1;
        while attempts < MAX_DRAW_ATTEMPTS && !policy.is_allowed(prev, candidate) {
            candidate = vocabulary[rng.sample(range)];
            attempts += 1;
        }
        moves.push(candidate);
        prev = Some(candidate);
    }

    Scramble(moves)
}

/// Number of whitespace separated tokens in an algorithm string.
pub fn move_count_of<'a>(algorithm: impl Into<Option<&'a str>>) -> usize {
    match algorithm.into() {
        Some(algorithm) => algorithm.split_whitespace().count(),
        None => 0,
    }
}
