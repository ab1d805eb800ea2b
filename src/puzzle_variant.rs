use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::adjacency::AdjacencyPolicy;
use crate::moves::{self, Move};

/// The puzzles the front end knows how to scramble.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum PuzzleVariant {
    #[serde(rename = "3x3x3")]
    Cube3x3,
    #[serde(rename = "megaminx")]
    Megaminx,
    #[serde(rename = "7x7x7")]
    Cube7x7,
}

impl PuzzleVariant {
    pub const ALL: [PuzzleVariant; 3] = [
        PuzzleVariant::Cube3x3,
        PuzzleVariant::Megaminx,
        PuzzleVariant::Cube7x7,
    ];

    /// The puzzle id understood by the visualization widget.
    pub fn widget_id(self) -> &'static str {
        match self {
            PuzzleVariant::Cube3x3 => "3x3x3",
            PuzzleVariant::Megaminx => "megaminx",
            PuzzleVariant::Cube7x7 => "7x7x7",
        }
    }

    /// Typical competition scramble length for this puzzle.
    pub fn scramble_length(self) -> usize {
        match self {
            PuzzleVariant::Cube3x3 => 20,
            PuzzleVariant::Megaminx => 70,
            PuzzleVariant::Cube7x7 => 80,
        }
    }

    #[inline]
    pub fn vocabulary(self) -> &'static [Move] {
        moves::moves_for(self)
    }

    pub fn adjacency_policy(self) -> AdjacencyPolicy {
        match self {
            PuzzleVariant::Cube3x3 | PuzzleVariant::Cube7x7 => AdjacencyPolicy::AxisPaired,
            PuzzleVariant::Megaminx => AdjacencyPolicy::Megaminx,
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            PuzzleVariant::Cube3x3 => "3x3 Rubik's Cube",
            PuzzleVariant::Megaminx => "12x12 Dodecahedron",
            PuzzleVariant::Cube7x7 => "7x7 Cube",
        }
    }

    /// Shown while the widget for this puzzle is being constructed.
    pub fn loading_text(self) -> String {
        format!("Loading {}...", self.short_name())
    }

    /// Label for a control that switches *to* this puzzle.
    pub fn switch_label(self) -> String {
        format!("Switch to {}", self.short_name())
    }

    fn short_name(self) -> &'static str {
        match self {
            PuzzleVariant::Cube3x3 => "3x3",
            PuzzleVariant::Megaminx => "12x12",
            PuzzleVariant::Cube7x7 => "7x7",
        }
    }
}

impl Default for PuzzleVariant {
    fn default() -> Self {
        PuzzleVariant::Cube3x3
    }
}

impl fmt::Display for PuzzleVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.widget_id())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown puzzle {0:?}")]
pub struct UnknownPuzzle(pub String);

impl FromStr for PuzzleVariant {
    type Err = UnknownPuzzle;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PuzzleVariant::ALL
            .into_iter()
            .find(|variant| variant.widget_id() == s)
            .ok_or_else(|| UnknownPuzzle(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_widget_id_round_trip() {
        for variant in PuzzleVariant::ALL {
            assert_eq!(variant.widget_id().parse::<PuzzleVariant>(), Ok(variant));
            assert_eq!(
                serde_json::to_string(&variant).unwrap(),
                format!("\"{}\"", variant.widget_id())
            );
        }
        assert_eq!(
            "pyraminx".parse::<PuzzleVariant>(),
            Err(UnknownPuzzle("pyraminx".to_string()))
        );
    }

    #[test]
    fn test_scramble_lengths() {
        assert_eq!(PuzzleVariant::Cube3x3.scramble_length(), 20);
        assert_eq!(PuzzleVariant::Megaminx.scramble_length(), 70);
        assert_eq!(PuzzleVariant::Cube7x7.scramble_length(), 80);
    }

    #[test]
    fn test_labels() {
        assert_eq!(PuzzleVariant::Megaminx.switch_label(), "Switch to 12x12");
        assert_eq!(PuzzleVariant::Cube3x3.loading_text(), "Loading 3x3...");
        assert_eq!(
            serde_json::to_string(&PuzzleVariant::Cube7x7).unwrap(),
            "\"7x7x7\""
        );
    }
}
