use std::collections::HashSet;
use std::path::Path;

use crate::{
    Coords, Direction,
    map::{Labyrinth, LabyrinthError},
    update::{TileUpdates, UpdateError},
};

/// Policy hooks an expedition delegates to.
///
/// The expedition engine only searches, collects and validates. Choosing the
/// order in which treasures are visited, stitching path segments together,
/// deciding which passages to clear and writing the plan are up to the
/// implementor.
pub trait ExpeditionHooks {
    /// Returns whether the labyrinth holds anything worth an expedition.
    fn has_any_treasure(&self, labyrinth: &Labyrinth) -> bool;

    /// Treasure coordinates, most valuable first.
    fn treasures_by_value(&self, labyrinth: &Labyrinth) -> Vec<Coords>;

    /// Treasure coordinates, best value per weight first.
    fn treasures_by_value_per_weight(&self, labyrinth: &Labyrinth) -> Vec<Coords>;

    /// Proposes tile updates opening passages along `path`, walked from the
    /// origin. The proposal is validated before it is applied.
    fn clear_passages_along_path(&self, labyrinth: &Labyrinth, path: &[Direction]) -> TileUpdates;

    /// Merges consecutive path segments into a single route.
    fn join_paths(&self, paths: &[Vec<Direction>]) -> Vec<Direction>;

    /// Writes the plan for `path` to `destination`.
    fn render_plan(
        &mut self,
        labyrinth: &Labyrinth,
        path: &[Direction],
        destination: &Path,
    ) -> std::io::Result<()>;
}

/// Represents everything that can abort an expedition.
#[derive(Debug, thiserror::Error)]
pub enum ExpeditionError {
    #[error(transparent)]
    Labyrinth(#[from] LabyrinthError),
    #[error(transparent)]
    Update(#[from] UpdateError),
    #[error("Failed to write the expedition plan to {path}")]
    Report {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// The outcome of one greedy collection run.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Collection {
    /// Sum of the values of the collected treasures.
    pub value: f32,
    /// Sum of the weights of the collected treasures.
    pub weight: f32,
    /// One segment per collected treasure, followed by the way back home.
    pub paths: Vec<Vec<Direction>>,
    /// Coordinates of the collected treasures, in pickup order.
    pub collected: Vec<Coords>,
}

impl Labyrinth {
    /// Walks to the treasures at `order` one after another, picking up each
    /// one that is reachable and still fits under `capacity`, then returns to
    /// the origin.
    ///
    /// Unreachable and too heavy treasures are skipped and never revisited.
    /// The labyrinth itself is not modified; see [`Collection::collected`].
    ///
    /// # Errors
    ///
    /// * [`LabyrinthError::NoStart`] if the origin has no tile.
    /// * [`LabyrinthError::AlreadyCollected`] if `order` repeats a treasure
    ///   that was picked up.
    /// * [`LabyrinthError::NotATreasure`] if a reachable entry of `order` holds
    ///   no treasure.
    /// * [`LabyrinthError::Trapped`] if there is no way back to the origin.
    /// * any error raised by [`Labyrinth::find_path`].
    pub fn collect(&self, order: &[Coords], capacity: f32) -> Result<Collection, LabyrinthError> {
        if !self.contains(Coords::ORIGIN) {
            return Err(LabyrinthError::NoStart);
        }

        let mut collection = Collection::default();
        let mut current = Coords::ORIGIN;
        let mut already_collected: HashSet<Coords> = HashSet::new();

        for &target in order {
            let Some(path) = self.find_path(current, target)? else {
                log::warn!("treasure at {} is unreachable from {}, skipping", target, current);
                continue;
            };

            if already_collected.contains(&target) {
                return Err(LabyrinthError::AlreadyCollected { coords: target });
            }

            let treasure = self
                .get(target)
                .and_then(|tile| tile.treasure())
                .ok_or(LabyrinthError::NotATreasure { coords: target })?;

            if collection.weight + treasure.weight > capacity {
                log::debug!(
                    "treasure at {} weighs {}, only {} left, skipping",
                    target,
                    treasure.weight,
                    capacity - collection.weight
                );
                continue;
            }

            log::debug!(
                "collecting treasure at {} (value {}, weight {}) in {} steps",
                target,
                treasure.value,
                treasure.weight,
                path.len()
            );
            already_collected.insert(target);
            collection.collected.push(target);
            collection.paths.push(path);
            collection.weight += treasure.weight;
            collection.value += treasure.value;
            current = target;
        }

        let way_home = self
            .find_path(current, Coords::ORIGIN)?
            .ok_or(LabyrinthError::Trapped { coords: current })?;
        collection.paths.push(way_home);

        Ok(collection)
    }

    /// Runs a complete expedition and returns the route taken.
    ///
    /// Both treasure orderings offered by `hooks` are tried; the one carrying
    /// home more value wins, the value ordering on a tie. The winner's
    /// treasures are marked as collected, the passages along the joined
    /// route are cleared through the update validator and the plan is
    /// written to `report`.
    ///
    /// Returns an empty route without touching anything if there is no
    /// treasure at all. On error the labyrinth is left as it was, unless only
    /// writing the report failed.
    pub fn explore<H>(
        &mut self,
        hooks: &mut H,
        capacity: f32,
        report: &Path,
    ) -> Result<Vec<Direction>, ExpeditionError>
    where
        H: ExpeditionHooks + ?Sized,
    {
        if !hooks.has_any_treasure(self) {
            log::info!("no treasure in the labyrinth, staying home");
            return Ok(Vec::new());
        }

        let value_order = hooks.treasures_by_value(self);
        let value_per_weight_order = hooks.treasures_by_value_per_weight(self);

        let by_value = self.collect(&value_order, capacity)?;
        let by_value_per_weight = self.collect(&value_per_weight_order, capacity)?;

        log::info!(
            "value ordering collects {}, value per weight ordering collects {}",
            by_value.value,
            by_value_per_weight.value
        );
        let best = if by_value.value >= by_value_per_weight.value {
            by_value
        } else {
            by_value_per_weight
        };

        // Nothing is written back until the passage updates have been accepted.
        let mut staged = self.clone();
        for &coords in &best.collected {
            staged.mark_collected(coords);
        }

        let path = hooks.join_paths(&best.paths);
        log::info!(
            "route of {} steps collects {} treasures worth {}",
            path.len(),
            best.collected.len(),
            best.value
        );

        let updates = hooks.clear_passages_along_path(&staged, &path);
        staged.apply_validated_updates(updates)?;
        *self = staged;

        hooks
            .render_plan(self, &path, report)
            .map_err(|source| ExpeditionError::Report {
                path: report.display().to_string(),
                source,
            })?;

        Ok(path)
    }
}
