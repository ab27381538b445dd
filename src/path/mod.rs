//! Grid A* search over the walkable cells of the current level.

use bevy_ecs::resource::Resource;
use glam::IVec2;
use pathfinding::prelude::astar;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use strum_macros::{AsRefStr, Display};
use tracing::trace;

use crate::map::direction::Direction;
use crate::map::geometry::manhattan;
use crate::map::grid::TileGrid;

pub mod route;

pub use route::{InvalidDirection, Route};

/// Cost of moving one cell.
pub const STEP_COST: u32 = 10;

/// Which search implementation [`PathGrid::find`] runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, AsRefStr)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SearchStrategy {
    /// Flat node arena with a linearly-scanned open list. Ties on `f` go to the node that
    /// entered the open list first.
    #[default]
    Arena,
    /// `pathfinding::astar` over the same walkability and cost model.
    Library,
}

/// Debug marks left on the grid by the last successful search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Mark {
    #[default]
    None,
    Route,
    Start,
    End,
}

#[derive(Debug, Clone, Copy, Default)]
struct Node {
    walkable: bool,
    parent: Option<usize>,
    g: u32,
    h: u32,
    f: u32,
    open: bool,
    closed: bool,
    mark: Mark,
}

/// One search node per cell, rebuilt whenever a level loads.
///
/// Node state is transient: every call to [`PathGrid::find`] sweeps it back to a clean slate
/// before searching, so results never depend on earlier searches.
#[derive(Resource, Debug, Clone)]
pub struct PathGrid {
    size: IVec2,
    nodes: Vec<Node>,
    open: Vec<usize>,
    strategy: SearchStrategy,
}

impl PathGrid {
    /// Builds the walkability grid from a tile grid; every non-wall cell is walkable.
    pub fn from_tiles(tiles: &TileGrid, strategy: SearchStrategy) -> Self {
        let size = tiles.size();
        let nodes = tiles
            .cells()
            .map(|cell| Node {
                walkable: !tiles.is_wall(cell),
                ..Node::default()
            })
            .collect();

        Self {
            size,
            nodes,
            open: Vec::new(),
            strategy,
        }
    }

    pub fn size(&self) -> IVec2 {
        self.size
    }

    pub fn strategy(&self) -> SearchStrategy {
        self.strategy
    }

    fn index(&self, cell: IVec2) -> Option<usize> {
        let in_bounds = cell.x >= 0 && cell.y >= 0 && cell.x < self.size.x && cell.y < self.size.y;
        in_bounds.then(|| (cell.y * self.size.x + cell.x) as usize)
    }

    fn cell(&self, index: usize) -> IVec2 {
        IVec2::new(index as i32 % self.size.x, index as i32 / self.size.x)
    }

    pub fn is_walkable(&self, cell: IVec2) -> bool {
        self.index(cell).is_some_and(|i| self.nodes[i].walkable)
    }

    /// The debug mark on a cell left by the last search.
    pub fn mark(&self, cell: IVec2) -> Mark {
        self.index(cell).map_or(Mark::None, |i| self.nodes[i].mark)
    }

    /// Finds a route from `start` to `end`.
    ///
    /// Returns an empty route when `start == end`, and `None` when `end` cannot be reached
    /// (or either cell lies outside the grid). The search runs to completion and never
    /// retries; picking a fallback target is the caller's business.
    pub fn find(&mut self, start: IVec2, end: IVec2) -> Option<Route> {
        self.reset();

        let (start_index, end_index) = (self.index(start)?, self.index(end)?);
        let cells = match self.strategy {
            SearchStrategy::Arena => self.search_arena(start_index, end_index, end)?,
            SearchStrategy::Library => self.search_library(start, end)?,
        };

        for &cell in &cells {
            if let Some(i) = self.index(cell) {
                self.nodes[i].mark = Mark::Route;
            }
        }
        self.nodes[start_index].mark = Mark::Start;
        self.nodes[end_index].mark = Mark::End;

        let route = Route::from_cells(&cells)?;
        trace!(?start, ?end, route = %route, "Route found");
        Some(route)
    }

    fn reset(&mut self) {
        for node in &mut self.nodes {
            *node = Node {
                walkable: node.walkable,
                ..Node::default()
            };
        }
        self.open.clear();
    }

    fn push_open(&mut self, index: usize) {
        self.nodes[index].open = true;
        self.open.push(index);
    }

    fn remove_open(&mut self, index: usize) {
        if let Some(slot) = self.open.iter().position(|&i| i == index) {
            self.open.remove(slot);
        }
        self.nodes[index].open = false;
    }

    /// Slot in the open list holding the lowest `f`; the earliest entry wins ties.
    fn lowest_f(&self) -> Option<usize> {
        let mut best: Option<(usize, u32)> = None;
        for (slot, &index) in self.open.iter().enumerate() {
            let f = self.nodes[index].f;
            if best.is_none_or(|(_, lowest)| f < lowest) {
                best = Some((slot, f));
            }
        }
        best.map(|(slot, _)| slot)
    }

    fn search_arena(&mut self, start: usize, end: usize, goal: IVec2) -> Option<Vec<IVec2>> {
        self.push_open(start);

        loop {
            let slot = self.lowest_f()?;
            let current = self.open[slot];
            if current == end {
                break;
            }

            self.open.remove(slot);
            self.nodes[current].open = false;
            self.nodes[current].closed = true;

            let cost = self.nodes[current].g + STEP_COST;
            let current_cell = self.cell(current);
            for direction in Direction::DIRECTIONS {
                let Some(neighbor) = self.index(current_cell + direction.as_ivec2()) else {
                    continue;
                };
                if !self.nodes[neighbor].walkable {
                    continue;
                }

                // A cheaper way in: drop the stale entry so it is re-added below.
                if self.nodes[neighbor].open && cost < self.nodes[neighbor].g {
                    self.remove_open(neighbor);
                }

                if !self.nodes[neighbor].open && !self.nodes[neighbor].closed {
                    let h = manhattan(self.cell(neighbor), goal);
                    let node = &mut self.nodes[neighbor];
                    node.g = cost;
                    node.h = h;
                    node.f = cost + h;
                    node.parent = Some(current);
                    self.push_open(neighbor);
                }
            }
        }

        let mut cells = vec![self.cell(end)];
        let mut cursor = end;
        while cursor != start {
            cursor = self.nodes[cursor].parent?;
            cells.push(self.cell(cursor));
        }
        cells.reverse();
        Some(cells)
    }

    fn search_library(&self, start: IVec2, end: IVec2) -> Option<Vec<IVec2>> {
        let (cells, _cost) = astar(
            &start,
            |&cell| {
                Direction::DIRECTIONS
                    .into_iter()
                    .map(|d| cell + d.as_ivec2())
                    .filter(|&n| self.is_walkable(n))
                    .map(|n| (n, STEP_COST))
                    .collect::<SmallVec<[(IVec2, u32); 4]>>()
            },
            |&cell| manhattan(cell, end),
            |&cell| cell == end,
        )?;
        Some(cells)
    }
}
