use std::fmt;

use serde::{Serialize, Serializer};

use crate::puzzle_variant::PuzzleVariant;

/// A single move token such as `R`, `BL'`, `y2` or `3Rw'`.
///
/// Moves are only ever handed out by the vocabulary tables below, so the
/// token is always one the visualization widget understands.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move(&'static str);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modifier {
    /// Quarter turn clockwise (no suffix)
    Single,
    /// `'`
    Inverse,
    /// `2`
    Double,
}

impl Move {
    #[inline]
    pub fn as_str(&self) -> &'static str {
        self.0
    }

    /// The face or axis this move turns, with the trailing modifier stripped.
    /// Layer counts and wide markers are kept, so `3Rw'` has face `3Rw`.
    pub fn face(&self) -> &'static str {
        self.0.trim_end_matches(|c: char| c == '\'' || c == '2')
    }

    /// The face with layer counts and wide markers also stripped: `3Rw` -> `R`.
    pub fn base_face(&self) -> &'static str {
        self.face()
            .trim_start_matches(|c: char| c.is_ascii_digit())
            .trim_end_matches('w')
    }

    pub fn modifier(&self) -> Modifier {
        if self.0.ends_with('\'') {
            Modifier::Inverse
        } else if self.0.ends_with('2') {
            Modifier::Double
        } else {
            Modifier::Single
        }
    }

    /// Whole-puzzle rotations (`x`, `y`, `z`) rather than face turns.
    pub fn is_rotation(&self) -> bool {
        matches!(self.face(), "x" | "y" | "z")
    }

    /// Look a token up in a variant's vocabulary.
    pub fn find(variant: PuzzleVariant, token: &str) -> Option<Move> {
        moves_for(variant)
            .iter()
            .find(|candidate| candidate.0 == token)
            .copied()
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

impl Serialize for Move {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.0)
    }
}

static CUBE_MOVES: [Move; 18] = [
    Move("R"),
    Move("R'"),
    Move("R2"),
    Move("U"),
    Move("U'"),
    Move("U2"),
    Move("F"),
    Move("F'"),
    Move("F2"),
    Move("L"),
    Move("L'"),
    Move("L2"),
    Move("B"),
    Move("B'"),
    Move("B2"),
    Move("D"),
    Move("D'"),
    Move("D2"),
];

static MEGAMINX_MOVES: [Move; 36] = [
    Move("R"),
    Move("R'"),
    Move("R2"),
    Move("U"),
    Move("U'"),
    Move("U2"),
    Move("F"),
    Move("F'"),
    Move("F2"),
    Move("L"),
    Move("L'"),
    Move("L2"),
    Move("BL"),
    Move("BL'"),
    Move("BL2"),
    Move("BR"),
    Move("BR'"),
    Move("BR2"),
    Move("DR"),
    Move("DR'"),
    Move("DR2"),
    Move("D"),
    Move("D'"),
    Move("D2"),
    Move("DL"),
    Move("DL'"),
    Move("DL2"),
    Move("B"),
    Move("B'"),
    Move("B2"),
    // whole puzzle rotations
    Move("y"),
    Move("y'"),
    Move("y2"),
    Move("z"),
    Move("z'"),
    Move("z2"),
];

// Outer layer, two-layer wide and three-layer wide turns for each face
static BIG_CUBE_MOVES: [Move; 54] = [
    Move("R"),
    Move("R'"),
    Move("R2"),
    Move("Rw"),
    Move("Rw'"),
    Move("Rw2"),
    Move("3Rw"),
    Move("3Rw'"),
    Move("3Rw2"),
    Move("U"),
    Move("U'"),
    Move("U2"),
    Move("Uw"),
    Move("Uw'"),
    Move("Uw2"),
    Move("3Uw"),
    Move("3Uw'"),
    Move("3Uw2"),
    Move("F"),
    Move("F'"),
    Move("F2"),
    Move("Fw"),
    Move("Fw'"),
    Move("Fw2"),
    Move("3Fw"),
    Move("3Fw'"),
    Move("3Fw2"),
    Move("L"),
    Move("L'"),
    Move("L2"),
    Move("Lw"),
    Move("Lw'"),
    Move("Lw2"),
    Move("3Lw"),
    Move("3Lw'"),
    Move("3Lw2"),
    Move("B"),
    Move("B'"),
    Move("B2"),
    Move("Bw"),
    Move("Bw'"),
    Move("Bw2"),
    Move("3Bw"),
    Move("3Bw'"),
    Move("3Bw2"),
    Move("D"),
    Move("D'"),
    Move("D2"),
    Move("Dw"),
    Move("Dw'"),
    Move("Dw2"),
    Move("3Dw"),
    Move("3Dw'"),
    Move("3Dw2"),
];

/// Every move token legal in a scramble of `variant`.
pub fn moves_for(variant: PuzzleVariant) -> &'static [Move] {
    match variant {
        PuzzleVariant::Cube3x3 => &CUBE_MOVES,
        PuzzleVariant::Megaminx => &MEGAMINX_MOVES,
        PuzzleVariant::Cube7x7 => &BIG_CUBE_MOVES,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use insta::assert_debug_snapshot;

    use super::*;

    #[test]
    fn test_face() {
        let faces: Vec<_> = ["R", "R'", "R2", "BL2", "y'", "3Rw'", "Uw2"]
            .into_iter()
            .map(|token| Move(token).face())
            .collect();
        assert_eq!(faces, vec!["R", "R", "R", "BL", "y", "3Rw", "Uw"]);
    }

    #[test]
    fn test_base_face() {
        assert_eq!(Move("3Rw'").base_face(), "R");
        assert_eq!(Move("Dw2").base_face(), "D");
        assert_eq!(Move("BL'").base_face(), "BL");
        assert_eq!(Move("z2").base_face(), "z");
    }

    #[test]
    fn test_modifier() {
        assert_eq!(Move("F").modifier(), Modifier::Single);
        assert_eq!(Move("3Fw'").modifier(), Modifier::Inverse);
        assert_eq!(Move("DR2").modifier(), Modifier::Double);
    }

    #[test]
    fn test_vocabulary_sizes() {
        assert_eq!(moves_for(PuzzleVariant::Cube3x3).len(), 18);
        assert_eq!(moves_for(PuzzleVariant::Megaminx).len(), 36);
        assert_eq!(moves_for(PuzzleVariant::Cube7x7).len(), 54);
        for variant in PuzzleVariant::ALL {
            let unique: HashSet<_> = moves_for(variant).iter().collect();
            assert_eq!(unique.len(), moves_for(variant).len());
        }
    }

    #[test]
    fn test_megaminx_faces() {
        let mut faces: Vec<_> = moves_for(PuzzleVariant::Megaminx)
            .iter()
            .map(Move::face)
            .collect();
        faces.dedup();
        assert_debug_snapshot!(faces, @r###"
        [
            "R",
            "U",
            "F",
            "L",
            "BL",
            "BR",
            "DR",
            "D",
            "DL",
            "B",
            "y",
            "z",
        ]
        "###);
        assert!(Move("y2").is_rotation());
        assert!(!Move("BR").is_rotation());
    }

    #[test]
    fn test_find() {
        assert_eq!(
            Move::find(PuzzleVariant::Cube7x7, "3Lw2").map(|m| m.as_str()),
            Some("3Lw2")
        );
        assert_eq!(Move::find(PuzzleVariant::Cube3x3, "BL"), None);
    }
}
