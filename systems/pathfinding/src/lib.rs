#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Weighted shortest-path searches over a [`TileMap`].
//!
//! Both searches explore the map's walkable king-move neighbors, pay
//! [`TileMap::weight`] per step and stop as soon as the goal is popped from the
//! frontier. Their bookkeeping is returned as a [`SearchResult`], which the
//! caller turns into a step list with [`reconstruct_path`].

mod frontier;

use std::collections::HashMap;

use imla_core::Point;
use imla_grid::TileMap;

use crate::frontier::Frontier;

/// Failure to turn a search result into a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PathError {
    /// The search never reached the goal.
    #[error("no path reaches {goal:?}")]
    Unreachable {
        /// Goal that was requested.
        goal: Point,
    },
    /// The predecessor chain ended or looped before returning to the start.
    #[error("predecessor trail broke at {at:?}")]
    BrokenTrail {
        /// Last point visited before the trail broke.
        at: Point,
    },
}

/// Predecessor and cost bookkeeping produced by one search.
#[derive(Clone, Debug, Default)]
pub struct SearchResult {
    came_from: HashMap<Point, Option<Point>>,
    cost_so_far: HashMap<Point, f32>,
}

impl SearchResult {
    /// Predecessor of every reached point; the start maps to `None`.
    #[must_use]
    pub fn came_from(&self) -> &HashMap<Point, Option<Point>> {
        &self.came_from
    }

    /// Accumulated cost of the cheapest known route to `point`.
    #[must_use]
    pub fn cost_to(&self, point: Point) -> Option<f32> {
        self.cost_so_far.get(&point).copied()
    }

    /// Whether the search inserted `point` into its bookkeeping.
    #[must_use]
    pub fn reached(&self, point: Point) -> bool {
        self.came_from.contains_key(&point)
    }

    /// Reconstructs the route from `start` to `goal`.
    pub fn path(&self, start: Point, goal: Point) -> Result<Vec<Point>, PathError> {
        reconstruct_path(&self.came_from, start, goal)
    }
}

/// Uniform-cost search from `start` toward `goal`.
#[must_use]
pub fn dijkstra(map: &TileMap, start: Point, goal: Point) -> SearchResult {
    search(map, start, goal, |_| 0.0)
}

/// Best-first search guided by the Manhattan distance to `goal`.
///
/// Diagonal steps cost at least one, so on an open grid the heuristic can
/// overestimate; routes stay plausible but are not guaranteed optimal.
#[must_use]
pub fn a_star(map: &TileMap, start: Point, goal: Point) -> SearchResult {
    search(map, start, goal, |point| point.manhattan_distance(goal) as f32)
}

/// Runs [`a_star`] and reconstructs the resulting route.
pub fn find_path(map: &TileMap, start: Point, goal: Point) -> Result<Vec<Point>, PathError> {
    a_star(map, start, goal).path(start, goal)
}

fn search<H>(map: &TileMap, start: Point, goal: Point, heuristic: H) -> SearchResult
where
    H: Fn(Point) -> f32,
{
    let mut result = SearchResult::default();
    let mut frontier = Frontier::default();

    let _ = result.came_from.insert(start, None);
    let _ = result.cost_so_far.insert(start, 0.0);
    frontier.push(start, 0.0, heuristic(start));

    let mut expanded = 0_usize;
    while let Some((current, queued_cost)) = frontier.pop() {
        if current == goal {
            break;
        }

        let Some(current_cost) = result.cost_to(current) else {
            continue;
        };
        if queued_cost > current_cost {
            continue;
        }

        let Some(neighbors) = map.neighbors(current) else {
            continue;
        };
        expanded += 1;

        for next in neighbors {
            let new_cost = current_cost + map.weight(current, next);
            let improves = result
                .cost_to(next)
                .map_or(true, |known| new_cost < known);
            if improves {
                let _ = result.cost_so_far.insert(next, new_cost);
                let _ = result.came_from.insert(next, Some(current));
                frontier.push(next, new_cost, new_cost + heuristic(next));
            }
        }
    }

    tracing::trace!(
        ?start,
        ?goal,
        expanded,
        reached = result.reached(goal),
        "path search finished"
    );
    result
}

/// Walks predecessors from `goal` back to `start`.
///
/// The returned steps exclude `start` and end with `goal`; `start == goal`
/// yields an empty path. A goal that was never reached reports
/// [`PathError::Unreachable`] instead of following a missing key.
pub fn reconstruct_path(
    came_from: &HashMap<Point, Option<Point>>,
    start: Point,
    goal: Point,
) -> Result<Vec<Point>, PathError> {
    if start == goal {
        return Ok(Vec::new());
    }
    if !came_from.contains_key(&goal) {
        return Err(PathError::Unreachable { goal });
    }

    let mut path = Vec::new();
    let mut current = goal;
    while current != start {
        if path.len() >= came_from.len() {
            return Err(PathError::BrokenTrail { at: current });
        }
        path.push(current);
        current = match came_from.get(&current) {
            Some(Some(previous)) => *previous,
            _ => return Err(PathError::BrokenTrail { at: current }),
        };
    }

    path.reverse();
    Ok(path)
}
