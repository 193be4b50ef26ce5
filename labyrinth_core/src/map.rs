use std::collections::BTreeMap;
use std::ops::Index;

use crate::{Coords, Direction, tile::Tile};

/// Represents fatal errors raised while searching or collecting in a labyrinth.
///
/// Every variant means the labyrinth is malformed or a precondition was
/// violated. "No path" and "too heavy" are ordinary outcomes and never show up
/// here.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LabyrinthError {
    #[error("No valid start: the labyrinth has no tile at the origin {}", Coords::ORIGIN)]
    NoStart,
    #[error("No tile at {coords} to start a search from")]
    MissingTile { coords: Coords },
    #[error("Labyrinth is broken: passage {direction} at {from} leads to void")]
    BrokenPassage { from: Coords, direction: Direction },
    #[error("Cannot pick up treasure at {coords} twice")]
    AlreadyCollected { coords: Coords },
    #[error("Tile at {coords} is not a treasure")]
    NotATreasure { coords: Coords },
    #[error("Expedition is trapped at {coords}: no way back to the origin")]
    Trapped { coords: Coords },
}

/// The authoritative mapping from coordinates to tiles.
///
/// A labyrinth is built once and afterwards only changes through
/// [`Labyrinth::apply_validated_updates`] (passages) and the collected
/// treasure overlay written by an expedition. Tiles are never added or
/// removed after construction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Labyrinth {
    tiles: BTreeMap<Coords, Tile>,
}

impl Labyrinth {
    /// Creates a labyrinth from `(coords, tile)` pairs. Later duplicates win.
    pub fn from_tiles<I>(tiles: I) -> Self
    where
        I: IntoIterator<Item = (Coords, Tile)>,
    {
        Labyrinth {
            tiles: tiles.into_iter().collect(),
        }
    }

    /// Returns the number of tiles.
    #[inline]
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    #[inline]
    pub fn contains(&self, coords: Coords) -> bool {
        self.tiles.contains_key(&coords)
    }

    /// Gets the tile at the given coordinates.
    ///
    /// Returns `None` if there is no tile there.
    #[inline]
    pub fn get(&self, coords: Coords) -> Option<&Tile> {
        self.tiles.get(&coords)
    }

    /// Returns an iterator that yields `(coords, &Tile)` ordered by coordinate.
    pub fn iter(&self) -> impl Iterator<Item = (Coords, &Tile)> {
        self.tiles.iter().map(|(c, t)| (*c, t))
    }

    /// Returns the smallest and largest x and y in use as a
    /// `(top_left, bottom_right)` pair, or `None` for an empty labyrinth.
    pub fn bounds(&self) -> Option<(Coords, Coords)> {
        let mut coords = self.tiles.keys();
        let first = *coords.next()?;
        let (mut min, mut max) = (first, first);
        for c in coords {
            min.x = min.x.min(c.x);
            min.y = min.y.min(c.y);
            max.x = max.x.max(c.x);
            max.y = max.y.max(c.y);
        }
        Some((min, max))
    }

    /// Replaces a tile that already exists. Callers validate beforehand.
    pub(crate) fn replace(&mut self, coords: Coords, tile: Tile) {
        if let Some(slot) = self.tiles.get_mut(&coords) {
            *slot = tile;
        }
    }

    /// Flags the treasure at `coords` as collected, keeping its passages.
    pub(crate) fn mark_collected(&mut self, coords: Coords) {
        if let Some(tile) = self.tiles.get_mut(&coords) {
            *tile = tile.collected();
        }
    }
}

impl FromIterator<(Coords, Tile)> for Labyrinth {
    fn from_iter<I: IntoIterator<Item = (Coords, Tile)>>(iter: I) -> Self {
        Labyrinth::from_tiles(iter)
    }
}

/// Indexing by coordinates for tiles known to exist.
impl Index<Coords> for Labyrinth {
    type Output = Tile;

    #[inline]
    fn index(&self, coords: Coords) -> &Self::Output {
        match self.tiles.get(&coords) {
            Some(tile) => tile,
            None => panic!("No tile at {} in labyrinth of {} tiles", coords, self.len()),
        }
    }
}
