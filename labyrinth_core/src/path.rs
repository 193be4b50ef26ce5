use std::collections::{HashSet, VecDeque};

use crate::{
    Coords, Direction,
    map::{Labyrinth, LabyrinthError},
};

/// A node of the search tree. Nodes live in an arena and point at their parent
/// by index, so the tree needs no shared ownership.
#[derive(Debug, Clone, Copy)]
struct SearchNode {
    coords: Coords,
    parent: Option<usize>,
    /// Step taken from the parent to reach this node. `None` for the root.
    direction: Option<Direction>,
}

impl Labyrinth {
    /// Breadth-first search for the shortest route from `start` to `end`.
    ///
    /// Only open passages are followed. Directions are tried in the order
    /// Left, Right, Up, Down and the frontier is strictly FIFO, so among all
    /// shortest routes the first one in that order is returned.
    ///
    /// Returns `Ok(Some(vec![]))` when `start == end` and `Ok(None)` when no
    /// route exists.
    ///
    /// # Errors
    ///
    /// * [`LabyrinthError::MissingTile`] if `start` has no tile.
    /// * [`LabyrinthError::BrokenPassage`] if an open passage on the way leads
    ///   to a cell without a tile.
    pub fn find_path(
        &self,
        start: Coords,
        end: Coords,
    ) -> Result<Option<Vec<Direction>>, LabyrinthError> {
        if start == end {
            return Ok(Some(Vec::new()));
        }
        if !self.contains(start) {
            return Err(LabyrinthError::MissingTile { coords: start });
        }

        let mut nodes = vec![SearchNode {
            coords: start,
            parent: None,
            direction: None,
        }];
        // Every cell is entered at most once: the first time it is reached is
        // along a shortest route, and no later branch can improve on that.
        let mut visited: HashSet<Coords> = HashSet::from([start]);
        let mut frontier: VecDeque<usize> = VecDeque::from([0]);

        while let Some(current) = frontier.pop_front() {
            let coords = nodes[current].coords;
            let Some(tile) = self.get(coords) else {
                return Err(LabyrinthError::MissingTile { coords });
            };

            for direction in tile.open_directions() {
                let Some(next) = coords.checked_go(direction).filter(|c| self.contains(*c)) else {
                    return Err(LabyrinthError::BrokenPassage {
                        from: coords,
                        direction,
                    });
                };
                if !visited.insert(next) {
                    continue;
                }

                nodes.push(SearchNode {
                    coords: next,
                    parent: Some(current),
                    direction: Some(direction),
                });
                let id = nodes.len() - 1;

                if next == end {
                    log::trace!(
                        "path {} -> {} found after expanding {} nodes",
                        start,
                        end,
                        nodes.len()
                    );
                    return Ok(Some(reconstruct(&nodes, id)));
                }
                frontier.push_back(id);
            }
        }

        Ok(None)
    }
}

/// Walks parent links from `id` back to the root and returns the steps in
/// travel order.
fn reconstruct(nodes: &[SearchNode], id: usize) -> Vec<Direction> {
    let mut path = Vec::new();
    let mut cursor = Some(id);
    while let Some(i) = cursor {
        let node = &nodes[i];
        if let Some(direction) = node.direction {
            path.push(direction);
        }
        cursor = node.parent;
    }
    path.reverse();
    path
}

/// Returns every cell visited when walking `path` from `start`, including
/// `start` itself.
pub fn trace(start: Coords, path: &[Direction]) -> Vec<Coords> {
    let mut cells = Vec::with_capacity(path.len() + 1);
    let mut current = start;
    cells.push(current);
    for &direction in path {
        current = current.go(direction);
        cells.push(current);
    }
    cells
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tile::Tile;
    use Direction::*;

    /// ```text
    /// (0,0) - (1,0) - (2,0)
    ///   |               |
    /// (0,1) - (1,1) - (2,1)
    /// ```
    fn ring() -> Labyrinth {
        Labyrinth::from_tiles([
            (Coords::new(0, 0), Tile::new(&[Right, Down])),
            (Coords::new(1, 0), Tile::new(&[Left, Right])),
            (Coords::new(2, 0), Tile::new(&[Left, Down])),
            (Coords::new(0, 1), Tile::new(&[Right, Up])),
            (Coords::new(1, 1), Tile::new(&[Left, Right])),
            (Coords::new(2, 1), Tile::new(&[Left, Up])),
        ])
    }

    #[test]
    fn same_cell_is_the_empty_path() {
        assert_eq!(ring().find_path(Coords::ORIGIN, Coords::ORIGIN), Ok(Some(vec![])));
    }

    #[test]
    fn same_cell_needs_no_tile() {
        let empty = Labyrinth::default();
        assert_eq!(
            empty.find_path(Coords::new(4, 4), Coords::new(4, 4)),
            Ok(Some(vec![]))
        );
    }

    #[test]
    fn ties_prefer_left_right_up_down_order() {
        // Both routes to (2,1) take three steps; Right comes before Down.
        assert_eq!(
            ring().find_path(Coords::ORIGIN, Coords::new(2, 1)),
            Ok(Some(vec![Right, Right, Down]))
        );
        assert_eq!(
            ring().find_path(Coords::new(2, 1), Coords::ORIGIN),
            Ok(Some(vec![Left, Left, Up]))
        );
    }

    #[test]
    fn goes_around_the_ring() {
        assert_eq!(
            ring().find_path(Coords::new(1, 0), Coords::new(1, 1)),
            Ok(Some(vec![Left, Down, Right]))
        );
    }

    #[test]
    fn closed_passages_are_not_followed() {
        // One-sided opening: (1,0) cannot be left towards (2,0).
        let labyrinth = Labyrinth::from_tiles([
            (Coords::new(0, 0), Tile::new(&[Right])),
            (Coords::new(1, 0), Tile::new(&[Left])),
            (Coords::new(2, 0), Tile::new(&[Left])),
        ]);
        assert_eq!(labyrinth.find_path(Coords::ORIGIN, Coords::new(2, 0)), Ok(None));
        assert_eq!(
            labyrinth.find_path(Coords::new(2, 0), Coords::ORIGIN),
            Ok(Some(vec![Left, Left]))
        );
    }

    #[test]
    fn disconnected_cells_have_no_path() {
        let labyrinth = Labyrinth::from_tiles([
            (Coords::new(0, 0), Tile::new(&[])),
            (Coords::new(1, 0), Tile::new(&[])),
        ]);
        assert_eq!(labyrinth.find_path(Coords::ORIGIN, Coords::new(1, 0)), Ok(None));
    }

    #[test]
    fn missing_end_is_unreachable_not_fatal() {
        assert_eq!(ring().find_path(Coords::ORIGIN, Coords::new(7, 7)), Ok(None));
    }

    #[test]
    fn missing_start_is_fatal() {
        assert_eq!(
            ring().find_path(Coords::new(7, 7), Coords::ORIGIN),
            Err(LabyrinthError::MissingTile {
                coords: Coords::new(7, 7)
            })
        );
    }

    #[test]
    fn passage_into_void_is_fatal() {
        let labyrinth = Labyrinth::from_tiles([
            (Coords::new(0, 0), Tile::new(&[Up])),
            (Coords::new(1, 0), Tile::new(&[])),
        ]);
        assert_eq!(
            labyrinth.find_path(Coords::ORIGIN, Coords::new(1, 0)),
            Err(LabyrinthError::BrokenPassage {
                from: Coords::ORIGIN,
                direction: Up
            })
        );
    }

    #[test]
    fn passage_off_the_coordinate_range_is_fatal() {
        let edge = Coords::new(i32::MAX, 0);
        let labyrinth = Labyrinth::from_tiles([
            (edge, Tile::new(&[Left, Right])),
            (Coords::new(i32::MAX - 1, 0), Tile::new(&[Right])),
        ]);
        assert_eq!(
            labyrinth.find_path(edge, Coords::ORIGIN),
            Err(LabyrinthError::BrokenPassage {
                from: edge,
                direction: Right
            })
        );
    }

    #[test]
    fn trace_lists_visited_cells() {
        assert_eq!(
            trace(Coords::ORIGIN, &[Right, Down, Left]),
            vec![
                Coords::new(0, 0),
                Coords::new(1, 0),
                Coords::new(1, 1),
                Coords::new(0, 1)
            ]
        );
        assert_eq!(trace(Coords::new(2, 2), &[]), vec![Coords::new(2, 2)]);
    }
}
