use std::fmt;

use serde::{Deserialize, Serialize};

pub mod expedition;
pub mod loader;
pub mod map;
pub mod path;
pub mod tile;
pub mod update;

/// Represents a 2D coordinate in the labyrinth.
///
/// Coordinates are signed: the origin is wherever the expedition starts, and
/// tiles may lie to the left of or above it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Coords {
    pub x: i32,
    pub y: i32,
}

impl Coords {
    /// The cell every expedition starts from and returns to.
    pub const ORIGIN: Coords = Coords { x: 0, y: 0 };

    pub const fn new(x: i32, y: i32) -> Self {
        Coords { x, y }
    }

    /// Returns the adjacent coordinate one step in `direction`.
    ///
    /// # Panics
    ///
    /// Overflows when stepping past `i32::MIN` or `i32::MAX`; use
    /// [`Coords::checked_go`] when the step may leave that range.
    #[inline]
    pub fn go(self, direction: Direction) -> Coords {
        let (dx, dy) = direction.delta();
        Coords {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Like [`Coords::go`], but returns `None` instead of overflowing.
    #[inline]
    pub fn checked_go(self, direction: Direction) -> Option<Coords> {
        let (dx, dy) = direction.delta();
        Some(Coords {
            x: self.x.checked_add(dx)?,
            y: self.y.checked_add(dy)?,
        })
    }
}

impl fmt::Display for Coords {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// One of the four cardinal directions.
///
/// Used both as a step operator on [`Coords`] and as the key selecting one of
/// a tile's passages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    /// All directions, in the order the path finder tries them.
    pub const ALL: [Direction; 4] = [
        Direction::Left,
        Direction::Right,
        Direction::Up,
        Direction::Down,
    ];

    /// Returns the direction pointing back the way this one came.
    #[inline]
    pub fn opposite(self) -> Direction {
        match self {
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
        }
    }

    /// Returns the `(dx, dy)` offset of one step. `y` grows downwards.
    #[inline]
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
        }
    }

    /// Slot of this direction in a tile's passage array.
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Direction::Left => 0,
            Direction::Right => 1,
            Direction::Up => 2,
            Direction::Down => 3,
        }
    }

    /// Single-letter form used by the map format and plan reports.
    pub fn symbol(self) -> char {
        match self {
            Direction::Left => 'L',
            Direction::Right => 'R',
            Direction::Up => 'U',
            Direction::Down => 'D',
        }
    }

    /// Inverse of [`Direction::symbol`].
    pub fn from_symbol(symbol: char) -> Option<Direction> {
        match symbol {
            'L' => Some(Direction::Left),
            'R' => Some(Direction::Right),
            'U' => Some(Direction::Up),
            'D' => Some(Direction::Down),
            _ => None,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Direction::Left => "Left",
            Direction::Right => "Right",
            Direction::Up => "Up",
            Direction::Down => "Down",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn go_moves_one_cell() {
        let c = Coords::new(3, -2);
        assert_eq!(c.go(Direction::Left), Coords::new(2, -2));
        assert_eq!(c.go(Direction::Right), Coords::new(4, -2));
        assert_eq!(c.go(Direction::Up), Coords::new(3, -3));
        assert_eq!(c.go(Direction::Down), Coords::new(3, -1));
    }

    #[test]
    fn checked_go_stops_at_the_coordinate_range() {
        let corner = Coords::new(i32::MAX, i32::MIN);
        assert_eq!(corner.checked_go(Direction::Right), None);
        assert_eq!(corner.checked_go(Direction::Up), None);
        assert_eq!(
            corner.checked_go(Direction::Left),
            Some(Coords::new(i32::MAX - 1, i32::MIN))
        );
        assert_eq!(
            Coords::new(3, -2).checked_go(Direction::Down),
            Some(Coords::new(3, -1))
        );
    }

    #[test]
    fn opposite_undoes_a_step() {
        for d in Direction::ALL {
            assert_eq!(d.opposite().opposite(), d);
            assert_eq!(Coords::ORIGIN.go(d).go(d.opposite()), Coords::ORIGIN);
        }
    }

    #[test]
    fn symbols_round_trip() {
        for d in Direction::ALL {
            assert_eq!(Direction::from_symbol(d.symbol()), Some(d));
        }
        assert_eq!(Direction::from_symbol('x'), None);
    }
}
