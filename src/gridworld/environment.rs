//! The mutable grid world the agent acts against

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{
    grid::{Cell, Grid},
    transition::{StepOutcome, transition},
};
use crate::{Result, types::Position};

/// One of the four moves the environment accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Left,
    Right,
    Up,
    Down,
}

impl Action {
    pub const ALL: [Action; 4] = [Action::Left, Action::Right, Action::Up, Action::Down];

    /// The (dx, dy) offset this action applies to the player position.
    pub fn delta(self) -> (i64, i64) {
        match self {
            Action::Left => (-1, 0),
            Action::Right => (1, 0),
            Action::Up => (0, -1),
            Action::Down => (0, 1),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Action::Left => "left",
            Action::Right => "right",
            Action::Up => "up",
            Action::Down => "down",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Whether an episode is still running, and how it ended if not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EpisodeStatus {
    Running,
    ReachedExit,
    CaughtByGhost,
}

impl EpisodeStatus {
    pub fn is_terminal(self) -> bool {
        self != EpisodeStatus::Running
    }
}

/// A grid world episode: the grid, the player position, the cumulative
/// penalty, and the episode status.
///
/// The world is owned and mutated by the surrounding control loop; the agent
/// only queries it and simulates hypothetical moves against private copies.
/// [`reset`](GridWorld::reset) restores the initial layout, so state keys
/// captured in one episode remain valid in the next.
#[derive(Debug, Clone)]
pub struct GridWorld {
    initial: Grid,
    grid: Grid,
    start: Position,
    player: Position,
    penalty: i32,
    status: EpisodeStatus,
}

impl GridWorld {
    /// Create a world from a parsed grid.
    pub fn new(grid: Grid) -> Result<Self> {
        let player = grid
            .player_position()
            .ok_or(crate::Error::PlayerCount { count: 0 })?;
        Ok(GridWorld {
            initial: grid.clone(),
            grid,
            start: player,
            player,
            penalty: 0,
            status: EpisodeStatus::Running,
        })
    }

    /// Parse an ASCII level and create a world from it.
    pub fn from_level(text: &str) -> Result<Self> {
        Self::new(Grid::parse(text)?)
    }

    pub fn width(&self) -> usize {
        self.grid.width()
    }

    pub fn height(&self) -> usize {
        self.grid.height()
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn player_pos(&self) -> Position {
        self.player
    }

    /// Cumulative penalty for the current episode.
    pub fn penalty(&self) -> i32 {
        self.penalty
    }

    pub fn status(&self) -> EpisodeStatus {
        self.status
    }

    /// Passability query over raw signed coordinates; fails closed for
    /// out-of-bounds coordinates and walls.
    ///
    /// The lookahead simulation uses this same predicate, so the simulated
    /// and real notion of "legal move" cannot diverge.
    pub fn can_move(&self, x: i64, y: i64) -> bool {
        self.grid.is_passable(x, y)
    }

    /// Apply exactly one move for `action`.
    ///
    /// An impassable destination degrades to a bump: the player stays put
    /// and the fixed unit cost is charged. Otherwise the destination's
    /// [`transition`] outcome is applied: the vacated cell becomes empty, the
    /// destination becomes the player cell (consuming any pellet), and the
    /// episode ends if the destination was terminal.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EpisodeOver`](crate::Error::EpisodeOver) if called
    /// after the episode has ended.
    pub fn step(&mut self, action: Action) -> Result<StepOutcome> {
        if self.status.is_terminal() {
            return Err(crate::Error::EpisodeOver);
        }

        let (dx, dy) = action.delta();
        let (nx, ny) = self.player.translated(dx, dy);
        if !self.can_move(nx, ny) {
            let outcome = StepOutcome::bump();
            self.penalty += outcome.cost;
            return Ok(outcome);
        }

        let dest = Position::new(nx as usize, ny as usize);
        let dest_cell = self.grid.get(dest.x, dest.y);
        let outcome = transition(dest_cell);

        self.grid.set(self.player.x, self.player.y, Cell::Empty);
        self.grid.set(dest.x, dest.y, Cell::Player);
        self.player = dest;
        self.penalty += outcome.cost;

        if outcome.terminal {
            self.status = match dest_cell {
                Cell::Ghost => EpisodeStatus::CaughtByGhost,
                _ => EpisodeStatus::ReachedExit,
            };
        }

        Ok(outcome)
    }

    /// Restore the initial grid, player position, and penalty counter.
    pub fn reset(&mut self) {
        self.grid = self.initial.clone();
        self.player = self.start;
        self.penalty = 0;
        self.status = EpisodeStatus::Running;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pellet_is_consumed_on_entry() {
        let mut world = GridWorld::from_level(".P ").unwrap();
        let outcome = world.step(Action::Left).unwrap();
        assert_eq!(outcome, StepOutcome::new(-1, false));
        assert_eq!(world.player_pos(), Position::new(0, 0));
        assert_eq!(world.grid().get(0, 0), Cell::Player);
        // The vacated cell is empty, not a pellet
        assert_eq!(world.grid().get(1, 0), Cell::Empty);
        assert_eq!(world.penalty(), -1);

        // Leaving the consumed cell leaves it empty; re-entering costs +1
        world.step(Action::Right).unwrap();
        assert_eq!(world.grid().get(0, 0), Cell::Empty);
        let outcome = world.step(Action::Left).unwrap();
        assert_eq!(outcome, StepOutcome::new(1, false));
    }

    #[test]
    fn test_bonus_pellet_cost() {
        let mut world = GridWorld::from_level("P*").unwrap();
        let outcome = world.step(Action::Right).unwrap();
        assert_eq!(outcome, StepOutcome::new(-10, false));
        assert_eq!(world.status(), EpisodeStatus::Running);
    }

    #[test]
    fn test_ghost_is_terminal_with_full_cost() {
        let mut world = GridWorld::from_level("PG").unwrap();
        let outcome = world.step(Action::Right).unwrap();
        assert_eq!(outcome, StepOutcome::new(100, true));
        assert_eq!(world.status(), EpisodeStatus::CaughtByGhost);
        assert_eq!(world.penalty(), 100);
        // The player does move onto the ghost cell
        assert_eq!(world.player_pos(), Position::new(1, 0));
    }

    #[test]
    fn test_exit_is_terminal_and_free() {
        let mut world = GridWorld::from_level("PE").unwrap();
        let outcome = world.step(Action::Right).unwrap();
        assert_eq!(outcome, StepOutcome::new(0, true));
        assert_eq!(world.status(), EpisodeStatus::ReachedExit);
        assert_eq!(world.penalty(), 0);
    }

    #[test]
    fn test_bump_keeps_player_in_place() {
        let mut world = GridWorld::from_level("#P").unwrap();
        // Wall on the left, boundary on the right
        for action in [Action::Left, Action::Right, Action::Up, Action::Down] {
            let outcome = world.step(action).unwrap();
            assert_eq!(outcome, StepOutcome::bump());
            assert_eq!(world.player_pos(), Position::new(1, 0));
        }
        assert_eq!(world.penalty(), 4);
        assert_eq!(world.status(), EpisodeStatus::Running);
    }

    #[test]
    fn test_step_after_terminal_fails() {
        let mut world = GridWorld::from_level("PE").unwrap();
        world.step(Action::Right).unwrap();
        assert!(matches!(
            world.step(Action::Left).unwrap_err(),
            crate::Error::EpisodeOver
        ));
    }

    #[test]
    fn test_reset_restores_initial_layout() {
        let mut world = GridWorld::from_level(".P E").unwrap();
        world.step(Action::Left).unwrap();
        world.step(Action::Right).unwrap();
        assert_ne!(world.penalty(), 0);

        world.reset();
        assert_eq!(world.player_pos(), Position::new(1, 0));
        assert_eq!(world.grid().get(0, 0), Cell::MinorPellet);
        assert_eq!(world.penalty(), 0);
        assert_eq!(world.status(), EpisodeStatus::Running);
    }
}
