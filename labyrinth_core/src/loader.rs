//! Text format for labyrinths.
//!
//! One line per grid row, one whitespace separated token per cell:
//!
//! ```text
//! @RD   LR$5/2   L
//! UR    LU       .
//! ```
//!
//! * `.` leaves the cell without a tile.
//! * Otherwise the token lists the open passages (`L`, `R`, `U`, `D`, or `-`
//!   for none), optionally followed by `$value/weight` for a treasure or
//!   `%value/weight` for a treasure that was already collected.
//! * A leading `@` marks the origin. Coordinates are shifted so the marked
//!   tile sits at `(0, 0)`; without a marker the top-left cell is the origin.

use std::fmt::Write as _;

use crate::{
    Coords, Direction,
    map::Labyrinth,
    tile::{Payload, Tile, Treasure},
};

/// Represents errors found while parsing a labyrinth map.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoadError {
    #[error("Map string is empty")]
    Empty,
    #[error("Inconsistent width at row {row}: expected {expected}, found {found}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("No passages given for tile at column {x}, row {y}")]
    MissingPassages { x: usize, y: usize },
    #[error("Unknown passage '{symbol}' at column {x}, row {y}")]
    UnknownPassage { symbol: char, x: usize, y: usize },
    #[error("Passage '{symbol}' listed twice at column {x}, row {y}")]
    DuplicatePassage { symbol: char, x: usize, y: usize },
    #[error("Invalid treasure '{token}' at column {x}, row {y}: expected positive value/weight")]
    InvalidTreasure { token: String, x: usize, y: usize },
    #[error("Second origin marker at column {x}, row {y}")]
    MultipleOrigins { x: usize, y: usize },
}

/// Loads a labyrinth from its text representation.
pub fn load_labyrinth_from_string(map_string: &str) -> Result<Labyrinth, LoadError> {
    let lines: Vec<&str> = map_string.trim().lines().collect();
    if lines.is_empty() {
        return Err(LoadError::Empty);
    }

    let mut width = 0;
    let mut tiles: Vec<(Coords, Tile)> = Vec::new();
    let mut origin: Option<Coords> = None;

    for (y, line) in lines.iter().enumerate() {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if y == 0 {
            width = tokens.len();
        } else if tokens.len() != width {
            return Err(LoadError::RaggedRow {
                row: y,
                expected: width,
                found: tokens.len(),
            });
        }

        for (x, token) in tokens.iter().enumerate() {
            if *token == "." {
                continue;
            }
            let coords = Coords::new(x as i32, y as i32);
            let token = match token.strip_prefix('@') {
                Some(rest) => {
                    if origin.is_some() {
                        return Err(LoadError::MultipleOrigins { x, y });
                    }
                    origin = Some(coords);
                    rest
                }
                None => token,
            };
            tiles.push((coords, parse_tile(token, x, y)?));
        }
    }

    let shift = origin.unwrap_or(Coords::ORIGIN);
    Ok(tiles
        .into_iter()
        .map(|(c, tile)| (Coords::new(c.x - shift.x, c.y - shift.y), tile))
        .collect())
}

fn parse_tile(token: &str, x: usize, y: usize) -> Result<Tile, LoadError> {
    let (passages, treasure) = match token.find(['$', '%']) {
        Some(at) => (&token[..at], Some(&token[at..])),
        None => (token, None),
    };

    let mut open: Vec<Direction> = Vec::with_capacity(4);
    match passages {
        "" => return Err(LoadError::MissingPassages { x, y }),
        "-" => {}
        symbols => {
            for symbol in symbols.chars() {
                let direction =
                    Direction::from_symbol(symbol).ok_or(LoadError::UnknownPassage { symbol, x, y })?;
                if open.contains(&direction) {
                    return Err(LoadError::DuplicatePassage { symbol, x, y });
                }
                open.push(direction);
            }
        }
    }

    let tile = Tile::new(&open);
    let Some(treasure) = treasure else {
        return Ok(tile);
    };

    let invalid = || LoadError::InvalidTreasure {
        token: treasure.to_string(),
        x,
        y,
    };
    let (value, weight) = treasure[1..].split_once('/').ok_or_else(invalid)?;
    let value: f32 = value.parse().map_err(|_| invalid())?;
    let weight: f32 = weight.parse().map_err(|_| invalid())?;
    if !(value.is_finite() && weight.is_finite() && value > 0.0 && weight > 0.0) {
        return Err(invalid());
    }

    let tile = Tile::with_treasure(&open, value, weight);
    Ok(if treasure.starts_with('%') {
        tile.collected()
    } else {
        tile
    })
}

impl Labyrinth {
    /// Writes the labyrinth in the format read by [`load_labyrinth_from_string`].
    ///
    /// The origin is always marked, so a labyrinth that has an origin tile
    /// loads back unchanged.
    pub fn to_map_string(&self) -> String {
        let Some((min, max)) = self.bounds() else {
            return String::new();
        };

        let mut rows = Vec::new();
        for y in min.y..=max.y {
            let tokens: Vec<String> = (min.x..=max.x)
                .map(|x| {
                    let coords = Coords::new(x, y);
                    match self.get(coords) {
                        Some(tile) => format_tile(tile, coords == Coords::ORIGIN),
                        None => ".".to_string(),
                    }
                })
                .collect();
            rows.push(tokens.join(" "));
        }
        rows.join("\n")
    }
}

fn format_tile(tile: &Tile, origin: bool) -> String {
    let mut token = String::new();
    if origin {
        token.push('@');
    }
    let passages: String = tile.open_directions().map(Direction::symbol).collect();
    if passages.is_empty() {
        token.push('-');
    } else {
        token.push_str(&passages);
    }
    match tile.payload() {
        Payload::Empty => {}
        Payload::Treasure(Treasure { value, weight }) => {
            let _ = write!(token, "${}/{}", value, weight);
        }
        Payload::Collected(Treasure { value, weight }) => {
            let _ = write!(token, "%{}/{}", value, weight);
        }
    }
    token
}

#[cfg(test)]
mod tests {
    use super::*;
    use Direction::*;

    #[test]
    fn parses_tiles_and_treasure() {
        let labyrinth = load_labyrinth_from_string("R L$10/1 .").unwrap();
        assert_eq!(labyrinth.len(), 2);
        assert_eq!(labyrinth[Coords::new(0, 0)], Tile::new(&[Right]));
        assert_eq!(
            labyrinth[Coords::new(1, 0)],
            Tile::with_treasure(&[Left], 10.0, 1.0)
        );
        assert!(!labyrinth.contains(Coords::new(2, 0)));
    }

    #[test]
    fn origin_marker_shifts_coordinates() {
        let labyrinth = load_labyrinth_from_string(
            "
            D  .
            UR @L
            ",
        )
        .unwrap();
        assert_eq!(labyrinth[Coords::new(0, 0)], Tile::new(&[Left]));
        assert_eq!(labyrinth[Coords::new(-1, 0)], Tile::new(&[Up, Right]));
        assert_eq!(labyrinth[Coords::new(-1, -1)], Tile::new(&[Down]));
    }

    #[test]
    fn collected_treasure_marker() {
        let labyrinth = load_labyrinth_from_string("-%2.5/0.5").unwrap();
        let tile = labyrinth[Coords::ORIGIN];
        assert!(tile.is_collected());
        assert_eq!(
            tile.treasure(),
            Some(Treasure {
                value: 2.5,
                weight: 0.5
            })
        );
    }

    #[test]
    fn rejects_malformed_maps() {
        assert_eq!(load_labyrinth_from_string("  \n "), Err(LoadError::Empty));
        assert_eq!(
            load_labyrinth_from_string("R L\nR"),
            Err(LoadError::RaggedRow {
                row: 1,
                expected: 2,
                found: 1
            })
        );
        assert_eq!(
            load_labyrinth_from_string("RX"),
            Err(LoadError::UnknownPassage {
                symbol: 'X',
                x: 0,
                y: 0
            })
        );
        assert_eq!(
            load_labyrinth_from_string("- LL"),
            Err(LoadError::DuplicatePassage {
                symbol: 'L',
                x: 1,
                y: 0
            })
        );
        assert_eq!(
            load_labyrinth_from_string("@R @L"),
            Err(LoadError::MultipleOrigins { x: 1, y: 0 })
        );
        assert_eq!(
            load_labyrinth_from_string("$1/1"),
            Err(LoadError::MissingPassages { x: 0, y: 0 })
        );
    }

    #[test]
    fn rejects_bad_treasure() {
        for token in ["R$1", "R$a/1", "R$1/0", "R$-2/1", "R$inf/1"] {
            assert!(
                matches!(
                    load_labyrinth_from_string(token),
                    Err(LoadError::InvalidTreasure { .. })
                ),
                "{token} should be rejected"
            );
        }
    }

    #[test]
    fn map_string_loads_back() {
        let source = "D . .\n@RU LR$3/2 L%1/4\n. . -";
        let labyrinth = load_labyrinth_from_string(source).unwrap();
        let written = labyrinth.to_map_string();
        assert_eq!(written, source);
        assert_eq!(load_labyrinth_from_string(&written).unwrap(), labyrinth);
    }
}
