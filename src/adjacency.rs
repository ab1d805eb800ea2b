use crate::moves::Move;

/// Opposite faces on a cube. Two turns of opposite faces commute, so letting
/// them sit next to each other makes scrambles easier to shorten.
const OPPOSITE_FACES: [(&str, &str); 3] = [("R", "L"), ("U", "D"), ("F", "B")];

/// Rules for which consecutive pairs of moves are too similar to appear in a
/// scramble.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdjacencyPolicy {
    /// Cubes of any size. Faces are compared after stripping layer counts and
    /// wide markers, and opposite faces are also rejected.
    AxisPaired,
    /// Megaminx. Whole-puzzle rotations may not repeat on the same axis.
    Megaminx,
}

impl AdjacencyPolicy {
    pub fn is_allowed(&self, prev: Option<Move>, next: Move) -> bool {
        let prev = match prev {
            Some(prev) => prev,
            None => return true,
        };
        if prev == next || prev.face() == next.face() {
            return false;
        }
        match self {
            AdjacencyPolicy::AxisPaired => {
                let (a, b) = (prev.base_face(), next.base_face());
                a != b && !are_opposite(a, b)
            }
            AdjacencyPolicy::Megaminx => {
                !(next.is_rotation() && prev.as_str().starts_with(next.face()))
            }
        }
    }

    #[inline]
    pub fn too_similar(&self, prev: Move, next: Move) -> bool {
        !self.is_allowed(Some(prev), next)
    }

    /// Number of adjacent pairs in `moves` that break this policy.
    pub fn count_violations(&self, moves: &[Move]) -> usize {
        moves
            .windows(2)
            .filter(|pair| self.too_similar(pair[0], pair[1]))
            .count()
    }
}

fn are_opposite(a: &str, b: &str) -> bool {
    OPPOSITE_FACES
        .iter()
        .any(|&(x, y)| (a == x && b == y) || (a == y && b == x))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::puzzle_variant::PuzzleVariant;

    fn cube(token: &str) -> Move {
        Move::find(PuzzleVariant::Cube3x3, token).unwrap()
    }

    fn big_cube(token: &str) -> Move {
        Move::find(PuzzleVariant::Cube7x7, token).unwrap()
    }

    fn megaminx(token: &str) -> Move {
        Move::find(PuzzleVariant::Megaminx, token).unwrap()
    }

    #[test]
    fn test_first_move_always_allowed() {
        for variant in PuzzleVariant::ALL {
            let policy = variant.adjacency_policy();
            assert!(variant
                .vocabulary()
                .iter()
                .all(|next| policy.is_allowed(None, *next)));
        }
    }

    #[test]
    fn test_cube() {
        let policy = AdjacencyPolicy::AxisPaired;
        assert!(policy.too_similar(cube("R"), cube("R")));
        assert!(policy.too_similar(cube("R"), cube("R2")));
        assert!(policy.too_similar(cube("R'"), cube("L")));
        assert!(policy.too_similar(cube("D2"), cube("U'")));
        assert!(policy.too_similar(cube("F"), cube("B2")));
        assert!(!policy.too_similar(cube("R"), cube("U")));
        assert!(!policy.too_similar(cube("F'"), cube("L2")));
    }

    #[test]
    fn test_big_cube_wide_moves() {
        let policy = AdjacencyPolicy::AxisPaired;
        assert!(policy.too_similar(big_cube("3Rw"), big_cube("R")));
        assert!(policy.too_similar(big_cube("Rw2"), big_cube("3Rw'")));
        assert!(policy.too_similar(big_cube("3Rw"), big_cube("Lw")));
        assert!(policy.too_similar(big_cube("Uw'"), big_cube("3Dw2")));
        assert!(!policy.too_similar(big_cube("3Rw"), big_cube("Uw")));
    }

    #[test]
    fn test_megaminx() {
        let policy = AdjacencyPolicy::Megaminx;
        assert!(policy.too_similar(megaminx("BL"), megaminx("BL'")));
        assert!(policy.too_similar(megaminx("y"), megaminx("y2")));
        assert!(policy.too_similar(megaminx("z'"), megaminx("z")));
        // no opposite face rule on the megaminx
        assert!(!policy.too_similar(megaminx("R"), megaminx("L")));
        assert!(!policy.too_similar(megaminx("B"), megaminx("BL")));
        assert!(!policy.too_similar(megaminx("y"), megaminx("z")));
        assert!(!policy.too_similar(megaminx("y"), megaminx("R")));
    }

    #[test]
    fn test_count_violations() {
        let moves = [cube("R"), cube("L"), cube("U"), cube("U2"), cube("F")];
        assert_eq!(AdjacencyPolicy::AxisPaired.count_violations(&moves), 2);
        assert_eq!(AdjacencyPolicy::AxisPaired.count_violations(&moves[..1]), 0);
    }
}
