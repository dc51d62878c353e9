//! Pathfinding
//!
//! Turn-aware A* over the hex grid. The pathfinder owns every piece of
//! search state — frontier queue, phase counter, and per-cell bookkeeping —
//! and takes the grid read-only, so unrelated callers never share hidden
//! state through the grid itself.
//!
//! ## Phases
//! The phase counter advances by two per search. A cell whose stored phase
//! is below the current phase is untouched this search; equal means it sits
//! on the frontier; one above means it has been settled. Old searches expire
//! without ever clearing the state array.

pub mod queue;

pub use queue::CellPriorityQueue;

use crate::grid::HexGrid;
use crate::hex::{HexDirection, HexEdgeType};

/// Movement cost across a flat edge.
const MOVE_COST_FLAT: i32 = 5;
/// Movement cost up or down a slope edge.
const MOVE_COST_SLOPE: i32 = 10;
/// Movement cost along a road, regardless of the edge underneath.
const MOVE_COST_ROAD: i32 = 1;

/// Per-cell transient search bookkeeping.
#[derive(Clone, Copy, Default)]
struct SearchState {
    phase: u32,
    distance: i32,
    heuristic: i32,
    path_from: u32,
}

/// Weighted shortest-path search with a per-turn movement budget.
pub struct Pathfinder {
    frontier: CellPriorityQueue,
    phase: u32,
    state: Vec<SearchState>,
    path_from: Option<u32>,
    path_to: Option<u32>,
    path_exists: bool,
}

impl Pathfinder {
    pub fn new() -> Pathfinder {
        Pathfinder {
            frontier: CellPriorityQueue::new(),
            phase: 0,
            state: Vec::new(),
            path_from: None,
            path_to: None,
            path_exists: false,
        }
    }

    /// Search for a route from one cell to another with `speed` movement
    /// points per turn. Returns whether a path exists; the route itself is
    /// read back through [`path`](Self::path).
    pub fn find_path(&mut self, grid: &HexGrid, from: u32, to: u32, speed: i32) -> bool {
        self.clear_path();
        if from as usize >= grid.cell_count() || to as usize >= grid.cell_count() || speed <= 0 {
            return false;
        }
        self.path_from = Some(from);
        self.path_to = Some(to);
        self.path_exists = self.search(grid, from, to, speed);
        self.path_exists
    }

    fn search(&mut self, grid: &HexGrid, from: u32, to: u32, speed: i32) -> bool {
        self.phase += 2;
        self.frontier.reset(grid.cell_count());
        if self.state.len() != grid.cell_count() {
            self.state = vec![SearchState::default(); grid.cell_count()];
        }

        let goal = grid.cell(to).coordinates();

        self.state[from as usize] = SearchState {
            phase: self.phase,
            distance: 0,
            heuristic: 0,
            path_from: from,
        };
        self.frontier.enqueue(from, 0);

        while let Some(current) = self.frontier.dequeue() {
            self.state[current as usize].phase += 1;

            // Popping the goal as the frontier minimum guarantees optimality
            // under the admissible hex-distance heuristic.
            if current == to {
                return true;
            }

            let current_distance = self.state[current as usize].distance;
            let current_turn = current_distance / speed;

            for d in HexDirection::ALL {
                let Some(neighbor) = grid.cell(current).neighbor(d) else {
                    continue;
                };
                if self.state[neighbor as usize].phase > self.phase {
                    continue;
                }
                let neighbor_cell = grid.cell(neighbor);
                if neighbor_cell.is_underwater() || neighbor_cell.unit().is_some() {
                    continue;
                }
                let edge = grid.edge_type_between(current, neighbor);
                if edge == HexEdgeType::Cliff {
                    continue;
                }

                let move_cost;
                if grid.cell(current).has_road_through_edge(d) {
                    move_cost = MOVE_COST_ROAD;
                } else if grid.cell(current).walled() != neighbor_cell.walled() {
                    // A wall on one side only blocks movement; roads pass
                    // through gates, handled above.
                    continue;
                } else {
                    let base = if edge == HexEdgeType::Flat {
                        MOVE_COST_FLAT
                    } else {
                        MOVE_COST_SLOPE
                    };
                    move_cost = base
                        + (neighbor_cell.urban_level()
                            + neighbor_cell.farm_level()
                            + neighbor_cell.plant_level()) as i32;
                }

                let mut distance = current_distance + move_cost;
                let turn = distance / speed;
                // Entering a new turn forfeits the points left in this one.
                if turn > current_turn {
                    distance = turn * speed + move_cost;
                }

                let neighbor_state = &self.state[neighbor as usize];
                if neighbor_state.phase < self.phase {
                    let heuristic = neighbor_cell.coordinates().distance_to(goal);
                    self.state[neighbor as usize] = SearchState {
                        phase: self.phase,
                        distance,
                        heuristic,
                        path_from: current,
                    };
                    self.frontier.enqueue(neighbor, distance + heuristic);
                } else if distance < neighbor_state.distance {
                    let old_priority = neighbor_state.distance + neighbor_state.heuristic;
                    self.state[neighbor as usize].distance = distance;
                    self.state[neighbor as usize].path_from = current;
                    let new_priority = distance + self.state[neighbor as usize].heuristic;
                    self.frontier.change(neighbor, old_priority, new_priority);
                }
            }
        }
        false
    }

    pub fn has_path(&self) -> bool {
        self.path_exists
    }

    /// The found route as cell indices from start to goal, inclusive.
    /// Empty when the last search failed.
    pub fn path(&self) -> Vec<u32> {
        let (Some(from), Some(to)) = (self.path_from, self.path_to) else {
            return Vec::new();
        };
        if !self.path_exists {
            return Vec::new();
        }
        let mut route = vec![to];
        let mut current = to;
        while current != from {
            current = self.state[current as usize].path_from;
            route.push(current);
        }
        route.reverse();
        route
    }

    /// Best known path cost to a cell touched by the last search.
    pub fn distance(&self, cell: u32) -> Option<i32> {
        let state = self.state.get(cell as usize)?;
        if state.phase >= self.phase && self.phase > 0 {
            Some(state.distance)
        } else {
            None
        }
    }

    /// Turn on which the route reaches the given cell.
    pub fn arrival_turn(&self, cell: u32, speed: i32) -> Option<i32> {
        if speed <= 0 {
            return None;
        }
        self.distance(cell).map(|d| d / speed)
    }

    /// Forget the current route. Search bookkeeping expires lazily through
    /// the phase counter; nothing is cleared cell by cell.
    pub fn clear_path(&mut self) {
        self.path_from = None;
        self.path_to = None;
        self.path_exists = false;
    }
}

impl Default for Pathfinder {
    fn default() -> Self {
        Self::new()
    }
}
