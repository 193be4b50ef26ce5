use std::fmt::Write as _;

use labyrinth_core::{Coords, Direction, map::Labyrinth, path::trace, tile::Payload};

/// What a single character cell of a drawn labyrinth shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Glyph {
    Void,
    Wall,
    Floor,
    Passage,
    Origin,
    Treasure,
    Collected,
    Trail,
    Explorer,
}

impl Glyph {
    pub fn symbol(self) -> char {
        match self {
            Glyph::Void | Glyph::Floor | Glyph::Passage => ' ',
            Glyph::Wall => '#',
            Glyph::Origin => 'O',
            Glyph::Treasure => '$',
            Glyph::Collected => 'c',
            Glyph::Trail => '.',
            Glyph::Explorer => '@',
        }
    }
}

/// A labyrinth drawn on a character grid.
///
/// Tile `(x, y)` sits at row `2 * (y - top) + 1`, column `2 * (x - left) + 1`;
/// the cells between two tiles show the passage joining them.
#[derive(Debug, Clone)]
pub struct Canvas {
    top_left: Coords,
    rows: Vec<Vec<Glyph>>,
}

impl Canvas {
    /// Draws `labyrinth` with `trail` walked from the origin marked on it.
    pub fn draw(labyrinth: &Labyrinth, trail: &[Direction]) -> Self {
        let Some((min, max)) = labyrinth.bounds() else {
            return Canvas {
                top_left: Coords::ORIGIN,
                rows: Vec::new(),
            };
        };
        let width = 2 * (max.x - min.x + 1) as usize + 1;
        let height = 2 * (max.y - min.y + 1) as usize + 1;
        let mut canvas = Canvas {
            top_left: min,
            rows: vec![vec![Glyph::Void; width]; height],
        };

        for (coords, tile) in labyrinth.iter() {
            let Some((row, col)) = canvas.position(coords) else {
                continue;
            };
            for (dr, dc) in [(-1, -1), (-1, 1), (1, -1), (1, 1)] {
                canvas.wall_if_void(row.wrapping_add_signed(dr), col.wrapping_add_signed(dc));
            }
            for direction in Direction::ALL {
                let (dc, dr) = direction.delta();
                let (r, c) = (
                    row.wrapping_add_signed(dr as isize),
                    col.wrapping_add_signed(dc as isize),
                );
                if tile.is_open(direction) {
                    canvas.put(r, c, Glyph::Passage);
                } else {
                    canvas.wall_if_void(r, c);
                }
            }
            let center = match tile.payload() {
                Payload::Treasure(_) => Glyph::Treasure,
                Payload::Collected(_) => Glyph::Collected,
                Payload::Empty if coords == Coords::ORIGIN => Glyph::Origin,
                Payload::Empty => Glyph::Floor,
            };
            canvas.put(row, col, center);
        }

        let cells = trace(Coords::ORIGIN, trail);
        for pair in cells.windows(2) {
            let (Some(from), Some(to)) = (canvas.position(pair[0]), canvas.position(pair[1])) else {
                continue;
            };
            canvas.mark_trail((from.0 + to.0) / 2, (from.1 + to.1) / 2);
            canvas.mark_trail(to.0, to.1);
        }

        canvas
    }

    /// Row and column of the tile at `coords`, if it lies on the canvas.
    pub fn position(&self, coords: Coords) -> Option<(usize, usize)> {
        let row = 2 * usize::try_from(coords.y - self.top_left.y).ok()? + 1;
        let col = 2 * usize::try_from(coords.x - self.top_left.x).ok()? + 1;
        (row < self.rows.len() && col < self.rows[row].len()).then_some((row, col))
    }

    /// Places the explorer on the tile at `coords`.
    pub fn place_explorer(&mut self, coords: Coords) {
        if let Some((row, col)) = self.position(coords) {
            self.put(row, col, Glyph::Explorer);
        }
    }

    pub fn rows(&self) -> &[Vec<Glyph>] {
        &self.rows
    }

    /// Renders the canvas as text, one line per row.
    pub fn to_text(&self) -> String {
        self.rows
            .iter()
            .map(|row| row.iter().map(|g| g.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn put(&mut self, row: usize, col: usize, glyph: Glyph) {
        if let Some(cell) = self.rows.get_mut(row).and_then(|r| r.get_mut(col)) {
            *cell = glyph;
        }
    }

    fn wall_if_void(&mut self, row: usize, col: usize) {
        if let Some(cell) = self.rows.get_mut(row).and_then(|r| r.get_mut(col)) {
            if *cell == Glyph::Void {
                *cell = Glyph::Wall;
            }
        }
    }

    /// Trail marks only go on empty floor and passages; treasure stays visible.
    fn mark_trail(&mut self, row: usize, col: usize) {
        if let Some(cell) = self.rows.get_mut(row).and_then(|r| r.get_mut(col)) {
            if matches!(cell, Glyph::Floor | Glyph::Passage) {
                *cell = Glyph::Trail;
            }
        }
    }
}

/// Formats the full text plan of an expedition.
pub fn plan_report(labyrinth: &Labyrinth, path: &[Direction]) -> String {
    let mut report = String::new();
    let _ = writeln!(report, "Plan for treasure hunt");
    let _ = writeln!(report, "======================");
    let _ = writeln!(report);
    let _ = writeln!(report, "{}", Canvas::draw(labyrinth, path).to_text());
    let _ = writeln!(report);
    let _ = writeln!(
        report,
        "Legend: O origin, $ treasure, c collected, . route, # wall"
    );
    let _ = writeln!(report);

    let mut total_value = 0.0;
    let mut total_weight = 0.0;
    let _ = writeln!(report, "Collected treasures:");
    for (coords, tile) in labyrinth.iter().filter(|(_, t)| t.is_collected()) {
        if let Some(treasure) = tile.treasure() {
            total_value += treasure.value;
            total_weight += treasure.weight;
            let _ = writeln!(
                report,
                "  {:<10} value {:>6} weight {:>6}",
                coords.to_string(),
                treasure.value,
                treasure.weight
            );
        }
    }
    let _ = writeln!(
        report,
        "  total      value {:>6} weight {:>6}",
        total_value, total_weight
    );
    let _ = writeln!(report);

    let _ = writeln!(report, "Route ({} steps):", path.len());
    let symbols: Vec<char> = path.iter().map(|d| d.symbol()).collect();
    for chunk in symbols.chunks(40) {
        let _ = writeln!(report, "  {}", chunk.iter().collect::<String>());
    }
    report
}
