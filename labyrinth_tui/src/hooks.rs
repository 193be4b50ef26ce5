use std::cmp::Ordering;
use std::collections::VecDeque;
use std::path::Path;

use labyrinth_core::{
    Coords, Direction,
    expedition::ExpeditionHooks,
    map::Labyrinth,
    tile::{Passage, Tile, Treasure},
    update::TileUpdates,
};

use crate::render;

/// Reference expedition policy: greedy orderings, concatenated segments,
/// passages opened from both sides along the route and a text plan on disk.
#[derive(Debug, Default)]
pub struct GreedyHooks;

impl GreedyHooks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Uncollected treasures sorted by `key`, largest first, ties by coordinate.
    fn ordered_by<F>(labyrinth: &Labyrinth, key: F) -> Vec<Coords>
    where
        F: Fn(&Treasure) -> f32,
    {
        let mut treasures: Vec<(Coords, f32)> = labyrinth
            .iter()
            .filter_map(|(coords, tile)| tile.uncollected_treasure().map(|t| (coords, key(&t))))
            .collect();
        treasures.sort_by(|(ca, a), (cb, b)| match b.total_cmp(a) {
            Ordering::Equal => ca.cmp(cb),
            other => other,
        });
        treasures.into_iter().map(|(coords, _)| coords).collect()
    }
}

impl ExpeditionHooks for GreedyHooks {
    fn has_any_treasure(&self, labyrinth: &Labyrinth) -> bool {
        labyrinth
            .iter()
            .any(|(_, tile)| tile.uncollected_treasure().is_some())
    }

    fn treasures_by_value(&self, labyrinth: &Labyrinth) -> Vec<Coords> {
        Self::ordered_by(labyrinth, |t| t.value)
    }

    fn treasures_by_value_per_weight(&self, labyrinth: &Labyrinth) -> Vec<Coords> {
        Self::ordered_by(labyrinth, |t| t.value / t.weight)
    }

    fn clear_passages_along_path(&self, labyrinth: &Labyrinth, path: &[Direction]) -> TileUpdates {
        let mut updates = TileUpdates::new();
        let mut current = Coords::ORIGIN;
        for &direction in path {
            let Some(next) = current.checked_go(direction) else {
                break;
            };
            let (Some(here), Some(there)) = (
                tile_at(labyrinth, &updates, current),
                tile_at(labyrinth, &updates, next),
            ) else {
                // The route left the labyrinth; nothing beyond this point can be cleared.
                break;
            };
            updates.insert(current, here.with_passage(direction, Passage::Open));
            updates.insert(next, there.with_passage(direction.opposite(), Passage::Open));
            current = next;
        }
        mirror_one_way_passages(labyrinth, &mut updates);
        updates
    }

    fn join_paths(&self, paths: &[Vec<Direction>]) -> Vec<Direction> {
        paths.concat()
    }

    fn render_plan(
        &mut self,
        labyrinth: &Labyrinth,
        path: &[Direction],
        destination: &Path,
    ) -> std::io::Result<()> {
        std::fs::write(destination, render::plan_report(labyrinth, path))?;
        log::info!("plan written to {}", destination.display());
        Ok(())
    }
}

/// The proposed tile at `coords` if there is one, the current tile otherwise.
fn tile_at(labyrinth: &Labyrinth, updates: &TileUpdates, coords: Coords) -> Option<Tile> {
    updates.get(&coords).or_else(|| labyrinth.get(coords)).copied()
}

/// Opens the missing side of every one-way passage touching an updated tile.
///
/// A neighbour that has a side opened this way joins the batch and is checked
/// in turn, so every proposed tile ends up agreeing with its surroundings.
/// Only passages are opened, never closed. A passage leading out of the
/// labyrinth is left for the validator to refuse.
fn mirror_one_way_passages(labyrinth: &Labyrinth, updates: &mut TileUpdates) {
    let mut pending: VecDeque<Coords> = updates.keys().copied().collect();
    while let Some(coords) = pending.pop_front() {
        let Some(mut tile) = updates.get(&coords).copied() else {
            continue;
        };
        for direction in Direction::ALL {
            let Some(neighbor) = coords.checked_go(direction) else {
                continue;
            };
            let Some(other) = tile_at(labyrinth, updates, neighbor) else {
                continue;
            };
            let facing = direction.opposite();
            match (tile.is_open(direction), other.is_open(facing)) {
                (true, false) => {
                    log::debug!("opening {} at {} to match {}", facing, neighbor, coords);
                    updates.insert(neighbor, other.with_passage(facing, Passage::Open));
                    pending.push_back(neighbor);
                }
                (false, true) => {
                    log::debug!("opening {} at {} to match {}", direction, coords, neighbor);
                    tile = tile.with_passage(direction, Passage::Open);
                }
                _ => {}
            }
        }
        updates.insert(coords, tile);
    }
}
