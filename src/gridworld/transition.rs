//! The shared transition/cost table
//!
//! Both the real move-application path ([`GridWorld::step`]) and the agent's
//! lookahead simulation score destinations through [`transition`], so the
//! two can never disagree on costs or terminality.
//!
//! [`GridWorld::step`]: crate::gridworld::GridWorld::step

use serde::{Deserialize, Serialize};

use super::grid::Cell;

/// Cost charged for a move into a wall or out of bounds. The player stays
/// put and the episode continues.
pub const BUMP_COST: i32 = 1;

/// Result of entering (or failing to enter) a cell.
///
/// `cost` is a signed penalty the controller minimizes: negative values are
/// bonuses, positive values are costs. Lower cumulative cost is better.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepOutcome {
    pub cost: i32,
    pub terminal: bool,
}

impl StepOutcome {
    pub const fn new(cost: i32, terminal: bool) -> Self {
        StepOutcome { cost, terminal }
    }

    /// Outcome of an illegal move: unit cost, player stays, non-terminal.
    pub const fn bump() -> Self {
        StepOutcome::new(BUMP_COST, false)
    }
}

/// Cost and terminality of moving onto `destination`.
///
/// | Destination | Cost | Terminal |
/// |---|---|---|
/// | Ghost | +100 | yes |
/// | BonusPellet | −10 | no |
/// | MinorPellet | −1 | no |
/// | Empty | +1 | no |
/// | Exit | 0 | yes |
pub fn transition(destination: Cell) -> StepOutcome {
    match destination {
        Cell::Ghost => StepOutcome::new(100, true),
        Cell::BonusPellet => StepOutcome::new(-10, false),
        Cell::MinorPellet => StepOutcome::new(-1, false),
        Cell::Empty => StepOutcome::new(1, false),
        Cell::Exit => StepOutcome::new(0, true),
        // Walls are filtered out by passability before this is consulted,
        // and the single player cell is never a destination.
        Cell::Wall | Cell::Player => StepOutcome::bump(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cost_table() {
        assert_eq!(transition(Cell::Ghost), StepOutcome::new(100, true));
        assert_eq!(transition(Cell::BonusPellet), StepOutcome::new(-10, false));
        assert_eq!(transition(Cell::MinorPellet), StepOutcome::new(-1, false));
        assert_eq!(transition(Cell::Empty), StepOutcome::new(1, false));
        assert_eq!(transition(Cell::Exit), StepOutcome::new(0, true));
    }

    #[test]
    fn test_bump_matches_empty_cost() {
        // An illegal move and a plain empty step charge the same unit cost.
        assert_eq!(StepOutcome::bump().cost, transition(Cell::Empty).cost);
        assert!(!StepOutcome::bump().terminal);
    }
}
