use serde::{Deserialize, Serialize};

use crate::Direction;

/// Openness of one side of a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Passage {
    Open,
    Closed,
}

impl Passage {
    #[inline]
    pub fn is_open(self) -> bool {
        matches!(self, Passage::Open)
    }
}

impl Default for Passage {
    fn default() -> Self {
        Passage::Closed
    }
}

/// Value and weight of a treasure. Both are positive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Treasure {
    pub value: f32,
    pub weight: f32,
}

/// What a tile carries besides its passages.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum Payload {
    #[default]
    Empty,
    Treasure(Treasure),
    /// A treasure that has been picked up. Value and weight stay readable.
    Collected(Treasure),
}

/// A labyrinth cell: four passages plus an optional treasure overlay.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Tile {
    passages: [Passage; 4],
    payload: Payload,
}

impl Tile {
    /// Creates an empty tile whose passages are open exactly in `open`.
    pub fn new(open: &[Direction]) -> Self {
        let mut tile = Tile::default();
        for &direction in open {
            tile.passages[direction.index()] = Passage::Open;
        }
        tile
    }

    /// Creates a tile carrying an uncollected treasure.
    pub fn with_treasure(open: &[Direction], value: f32, weight: f32) -> Self {
        Tile {
            payload: Payload::Treasure(Treasure { value, weight }),
            ..Tile::new(open)
        }
    }

    #[inline]
    pub fn passage(&self, direction: Direction) -> Passage {
        self.passages[direction.index()]
    }

    #[inline]
    pub fn is_open(&self, direction: Direction) -> bool {
        self.passage(direction).is_open()
    }

    /// Returns a copy of this tile with one passage replaced.
    pub fn with_passage(mut self, direction: Direction, passage: Passage) -> Self {
        self.passages[direction.index()] = passage;
        self
    }

    /// Directions whose passage is open, in search order.
    pub fn open_directions(&self) -> impl Iterator<Item = Direction> + '_ {
        Direction::ALL.into_iter().filter(|d| self.is_open(*d))
    }

    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    /// The treasure on this tile, collected or not.
    pub fn treasure(&self) -> Option<Treasure> {
        match self.payload {
            Payload::Treasure(t) | Payload::Collected(t) => Some(t),
            Payload::Empty => None,
        }
    }

    /// The treasure on this tile if it is still waiting to be picked up.
    pub fn uncollected_treasure(&self) -> Option<Treasure> {
        match self.payload {
            Payload::Treasure(t) => Some(t),
            _ => None,
        }
    }

    pub fn is_collected(&self) -> bool {
        matches!(self.payload, Payload::Collected(_))
    }

    /// Returns this tile with its treasure flagged as consumed.
    ///
    /// Passages are untouched; a tile without treasure is returned as is.
    pub fn collected(self) -> Self {
        match self.payload {
            Payload::Treasure(t) => Tile {
                payload: Payload::Collected(t),
                ..self
            },
            _ => self,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_opens_only_listed_passages() {
        let tile = Tile::new(&[Direction::Left, Direction::Down]);
        assert!(tile.is_open(Direction::Left));
        assert!(tile.is_open(Direction::Down));
        assert!(!tile.is_open(Direction::Right));
        assert!(!tile.is_open(Direction::Up));
        assert_eq!(
            tile.open_directions().collect::<Vec<_>>(),
            vec![Direction::Left, Direction::Down]
        );
    }

    #[test]
    fn collecting_keeps_passages_and_treasure() {
        let tile = Tile::with_treasure(&[Direction::Up], 7.0, 2.0);
        let taken = tile.collected();

        assert!(taken.is_collected());
        assert_eq!(taken.uncollected_treasure(), None);
        assert_eq!(
            taken.treasure(),
            Some(Treasure {
                value: 7.0,
                weight: 2.0
            })
        );
        assert!(taken.is_open(Direction::Up));
        assert!(!taken.is_open(Direction::Down));
    }

    #[test]
    fn collecting_a_plain_tile_is_a_no_op() {
        let tile = Tile::new(&[Direction::Right]);
        assert_eq!(tile.collected(), tile);
    }
}
