//! Newtype wrappers for improved type safety and domain modeling.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A cell coordinate on the grid.
///
/// Coordinates are unsigned because a position always refers to a real cell;
/// candidate destinations that may fall outside the grid are represented as
/// signed pairs produced by [`Position::translated`], so "one step left of
/// column zero" is expressible and can be rejected by passability checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub x: usize,
    pub y: usize,
}

impl Position {
    /// Create a new position.
    pub fn new(x: usize, y: usize) -> Self {
        Position { x, y }
    }

    /// Apply a signed offset, returning raw coordinates that may lie
    /// outside the grid.
    pub fn translated(&self, dx: i64, dy: i64) -> (i64, i64) {
        (self.x as i64 + dx, self.y as i64 + dy)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translated_can_go_negative() {
        let pos = Position::new(0, 2);
        assert_eq!(pos.translated(-1, 0), (-1, 2));
        assert_eq!(pos.translated(1, -3), (1, -1));
    }
}
