use std::collections::BTreeMap;

use crate::{Coords, Direction, map::Labyrinth, tile::Tile};

/// A batch of proposed tile replacements.
pub type TileUpdates = BTreeMap<Coords, Tile>;

/// Represents reasons a batch of tile updates is refused.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UpdateError {
    #[error("You cannot add a new tile at {coords} to the labyrinth")]
    NewTile { coords: Coords },
    #[error("Passage {direction} at {coords} is open and may not be closed")]
    ClosedPassage { coords: Coords, direction: Direction },
    #[error(
        "Tiles do not match at {coords} and {neighbor}: passage {direction} must be open from both sides or closed"
    )]
    MismatchedPassage {
        coords: Coords,
        neighbor: Coords,
        direction: Direction,
    },
    #[error("Treasure at {coords} may not be changed by a passage update")]
    PayloadChanged { coords: Coords },
}

impl Labyrinth {
    /// Checks a batch of tile updates without applying it.
    ///
    /// For every updated tile and every direction:
    ///
    /// * the tile must already exist,
    /// * an open passage must stay open,
    /// * an open passage needs a neighbour (taken from the batch if present,
    ///   otherwise from the labyrinth) whose facing passage is open too,
    /// * a closed passage needs the neighbour, if any, to be closed as well,
    /// * the treasure payload must be unchanged.
    pub fn validate_updates(&self, updates: &TileUpdates) -> Result<(), UpdateError> {
        for (&coords, new_tile) in updates {
            let old_tile = self.get(coords).ok_or(UpdateError::NewTile { coords })?;

            if old_tile.payload() != new_tile.payload() {
                return Err(UpdateError::PayloadChanged { coords });
            }

            for direction in Direction::ALL {
                let neighbor = coords.checked_go(direction);
                let other_tile =
                    neighbor.and_then(|n| updates.get(&n).or_else(|| self.get(n)));

                let was_open = old_tile.is_open(direction);
                let is_open = new_tile.is_open(direction);

                if was_open && !is_open {
                    return Err(UpdateError::ClosedPassage { coords, direction });
                }

                let mirrored = match other_tile {
                    Some(other) => other.is_open(direction.opposite()) == is_open,
                    None => !is_open,
                };
                if !mirrored {
                    return Err(UpdateError::MismatchedPassage {
                        coords,
                        // A passage off the coordinate range has no neighbour to name.
                        neighbor: neighbor.unwrap_or(coords),
                        direction,
                    });
                }
            }
        }
        Ok(())
    }

    /// Validates `updates` and, if they pass, writes them into the labyrinth.
    ///
    /// Nothing is written when validation fails.
    pub fn apply_validated_updates(&mut self, updates: TileUpdates) -> Result<(), UpdateError> {
        self.validate_updates(&updates)?;
        let count = updates.len();
        for (coords, tile) in updates {
            self.replace(coords, tile);
        }
        log::debug!("applied {} tile updates", count);
        Ok(())
    }
}
