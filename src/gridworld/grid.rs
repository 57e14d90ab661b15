//! Grid representation and level parsing

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::Position;

/// A cell in the grid world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    /// Impassable. Moving into it degrades to a bump.
    Wall,
    /// Traversable at a small cost.
    Empty,
    /// Traversable, small bonus, consumed on entry.
    MinorPellet,
    /// Traversable, larger bonus, consumed on entry.
    BonusPellet,
    /// Traversable, terminal, large cost.
    Ghost,
    /// Traversable, terminal, neutral.
    Exit,
    /// The agent's current cell. Exactly one per grid while non-terminal.
    Player,
}

impl Cell {
    pub fn to_char(self) -> char {
        match self {
            Cell::Wall => '#',
            Cell::Empty => ' ',
            Cell::MinorPellet => '.',
            Cell::BonusPellet => '*',
            Cell::Ghost => 'G',
            Cell::Exit => 'E',
            Cell::Player => 'P',
        }
    }

    pub fn from_char(c: char) -> Option<Cell> {
        match c {
            '#' => Some(Cell::Wall),
            ' ' => Some(Cell::Empty),
            '.' => Some(Cell::MinorPellet),
            '*' => Some(Cell::BonusPellet),
            'G' | 'g' => Some(Cell::Ghost),
            'E' | 'e' => Some(Cell::Exit),
            'P' | 'p' => Some(Cell::Player),
            _ => None,
        }
    }

    /// Whether this cell still holds a pellet of either kind.
    pub fn is_pellet(self) -> bool {
        matches!(self, Cell::MinorPellet | Cell::BonusPellet)
    }
}

/// A fixed-size grid of cells, row-major.
///
/// Dimensions are immutable for the lifetime of an episode; the cell content
/// is mutated in place as the player moves (the vacated cell becomes
/// [`Cell::Empty`], a consumed pellet becomes empty on entry).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl Grid {
    /// Parse a grid from an ASCII map, one row per line.
    ///
    /// Recognized characters: `#` wall, space empty, `.` minor pellet,
    /// `*` bonus pellet, `G` ghost, `E` exit, `P` player.
    ///
    /// # Errors
    ///
    /// Fails on an empty map, ragged rows, unknown characters, or a player
    /// count other than exactly one.
    pub fn parse(text: &str) -> Result<Self, crate::Error> {
        let lines: Vec<&str> = text.lines().collect();
        if lines.is_empty() {
            return Err(crate::Error::EmptyLevel);
        }

        let width = lines[0].chars().count();
        if width == 0 {
            return Err(crate::Error::EmptyLevel);
        }

        let height = lines.len();
        let mut cells = Vec::with_capacity(width * height);
        for (y, line) in lines.iter().enumerate() {
            let row: Vec<char> = line.chars().collect();
            if row.len() != width {
                return Err(crate::Error::RaggedLevel {
                    line: y,
                    expected: width,
                    got: row.len(),
                });
            }
            for (x, &c) in row.iter().enumerate() {
                let cell = Cell::from_char(c)
                    .ok_or(crate::Error::InvalidLevelCharacter { character: c, x, y })?;
                cells.push(cell);
            }
        }

        let grid = Grid {
            width,
            height,
            cells,
        };

        let players = grid.cells.iter().filter(|c| **c == Cell::Player).count();
        if players != 1 {
            return Err(crate::Error::PlayerCount { count: players });
        }

        Ok(grid)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Cells in row-major order.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Cell lookup by coordinate. Coordinates must be in bounds.
    pub fn get(&self, x: usize, y: usize) -> Cell {
        debug_assert!(x < self.width && y < self.height);
        self.cells[y * self.width + x]
    }

    pub(crate) fn set(&mut self, x: usize, y: usize, cell: Cell) {
        debug_assert!(x < self.width && y < self.height);
        self.cells[y * self.width + x] = cell;
    }

    /// Passability check over raw signed coordinates.
    ///
    /// Fails closed: out-of-bounds coordinates and walls are impassable,
    /// everything else (including terminal cells) is passable.
    pub fn is_passable(&self, x: i64, y: i64) -> bool {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return false;
        }
        self.get(x as usize, y as usize) != Cell::Wall
    }

    /// Locate the player cell, if present.
    pub fn player_position(&self) -> Option<Position> {
        self.cells
            .iter()
            .position(|c| *c == Cell::Player)
            .map(|i| Position::new(i % self.width, i / self.width))
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..self.height {
            for x in 0..self.width {
                write!(f, "{}", self.get(x, y).to_char())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gridworld::levels::DEFAULT_LEVEL;

    #[test]
    fn test_parse_default_level() {
        let grid = Grid::parse(DEFAULT_LEVEL).unwrap();
        assert_eq!(grid.width(), 12);
        assert_eq!(grid.height(), 6);
        assert_eq!(grid.player_position(), Some(Position::new(4, 3)));
        assert_eq!(grid.get(2, 2), Cell::Ghost);
        assert_eq!(grid.get(9, 2), Cell::BonusPellet);
        assert_eq!(grid.get(11, 5), Cell::Exit);
    }

    #[test]
    fn test_display_roundtrip() {
        let grid = Grid::parse(DEFAULT_LEVEL).unwrap();
        let rendered = grid.to_string();
        let reparsed = Grid::parse(&rendered).unwrap();
        assert_eq!(grid, reparsed);
    }

    #[test]
    fn test_parse_rejects_ragged_rows() {
        let err = Grid::parse("...\n..\n...").unwrap_err();
        assert!(matches!(
            err,
            crate::Error::RaggedLevel {
                line: 1,
                expected: 3,
                got: 2
            }
        ));
    }

    #[test]
    fn test_parse_rejects_unknown_character() {
        let err = Grid::parse("P?E").unwrap_err();
        assert!(matches!(
            err,
            crate::Error::InvalidLevelCharacter {
                character: '?',
                x: 1,
                y: 0
            }
        ));
    }

    #[test]
    fn test_parse_requires_exactly_one_player() {
        assert!(matches!(
            Grid::parse("..E").unwrap_err(),
            crate::Error::PlayerCount { count: 0 }
        ));
        assert!(matches!(
            Grid::parse("P.P").unwrap_err(),
            crate::Error::PlayerCount { count: 2 }
        ));
    }

    #[test]
    fn test_parse_rejects_empty_level() {
        assert!(matches!(
            Grid::parse("").unwrap_err(),
            crate::Error::EmptyLevel
        ));
    }

    #[test]
    fn test_is_passable_fails_closed() {
        let grid = Grid::parse("#P \n # ").unwrap();
        // Out of bounds on every side
        assert!(!grid.is_passable(-1, 0));
        assert!(!grid.is_passable(0, -1));
        assert!(!grid.is_passable(3, 0));
        assert!(!grid.is_passable(0, 2));
        // Walls
        assert!(!grid.is_passable(0, 0));
        assert!(!grid.is_passable(1, 1));
        // Traversable cells, including the player's own
        assert!(grid.is_passable(1, 0));
        assert!(grid.is_passable(2, 0));
        assert!(grid.is_passable(2, 1));
    }
}
