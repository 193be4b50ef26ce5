#![allow(dead_code)]

use std::collections::{BTreeMap, HashSet};

use labyrinth_core::{Coords, Direction, map::Labyrinth, tile::Tile};
use rand::{Rng, rngs::StdRng};

/// Builds a `width` x `height` labyrinth with its top-left tile at the origin.
///
/// Each pair of neighbouring tiles is connected both ways with probability
/// `open`. With `one_way` set, some pairs are connected in one direction only.
/// Every tile carries a treasure with probability `treasure`.
pub fn random_labyrinth(
    rng: &mut StdRng,
    width: i32,
    height: i32,
    open: f64,
    one_way: bool,
    treasure: f64,
) -> Labyrinth {
    let mut passages: BTreeMap<Coords, Vec<Direction>> = BTreeMap::new();
    for y in 0..height {
        for x in 0..width {
            passages.entry(Coords::new(x, y)).or_default();
        }
    }

    for y in 0..height {
        for x in 0..width {
            let here = Coords::new(x, y);
            for direction in [Direction::Right, Direction::Down] {
                let there = here.go(direction);
                if there.x >= width || there.y >= height {
                    continue;
                }
                let roll: f64 = rng.random();
                let (forward, backward) = if roll < open {
                    (true, true)
                } else if one_way && roll < open + 0.1 {
                    (true, false)
                } else if one_way && roll < open + 0.2 {
                    (false, true)
                } else {
                    (false, false)
                };
                if forward {
                    passages.entry(here).or_default().push(direction);
                }
                if backward {
                    passages.entry(there).or_default().push(direction.opposite());
                }
            }
        }
    }

    passages
        .into_iter()
        .map(|(coords, open)| {
            let tile = if rng.random_bool(treasure) {
                let value = rng.random_range(1..=20) as f32;
                let weight = rng.random_range(1..=6) as f32;
                Tile::with_treasure(&open, value, weight)
            } else {
                Tile::new(&open)
            };
            (coords, tile)
        })
        .collect()
}

/// Exhaustively enumerates every walk that never re-enters a cell on its own
/// branch and returns the shortest one, ties broken by direction order.
pub fn brute_force_path(labyrinth: &Labyrinth, start: Coords, end: Coords) -> Option<Vec<Direction>> {
    let mut best = None;
    let mut on_branch = HashSet::from([start]);
    let mut walk = Vec::new();
    explore(labyrinth, start, end, &mut on_branch, &mut walk, &mut best);
    best
}

fn explore(
    labyrinth: &Labyrinth,
    current: Coords,
    end: Coords,
    on_branch: &mut HashSet<Coords>,
    walk: &mut Vec<Direction>,
    best: &mut Option<Vec<Direction>>,
) {
    if let Some(b) = best.as_ref() {
        if walk.len() > b.len() {
            return;
        }
    }
    if current == end {
        let better = match best.as_ref() {
            Some(b) => (walk.len(), walk.as_slice()) < (b.len(), b.as_slice()),
            None => true,
        };
        if better {
            *best = Some(walk.clone());
        }
        return;
    }

    let open: Vec<Direction> = labyrinth[current].open_directions().collect();
    for direction in open {
        let next = current.go(direction);
        if !on_branch.insert(next) {
            continue;
        }
        walk.push(direction);
        explore(labyrinth, next, end, on_branch, walk, best);
        walk.pop();
        on_branch.remove(&next);
    }
}

/// Follows `path` from `start`, failing if it ever uses a closed passage.
pub fn walk_open_passages(labyrinth: &Labyrinth, start: Coords, path: &[Direction]) -> Coords {
    let mut current = start;
    for &direction in path {
        assert!(
            labyrinth[current].is_open(direction),
            "path uses closed passage {direction} at {current}"
        );
        current = current.go(direction);
    }
    current
}
