//! Conquest-cost shortest paths.
//!
//! Prices the cheapest chain of TRAIN actions that walks from my border to
//! any reachable tile, most importantly the enemy HQ. Stepping onto a tile
//! costs the gold of the minimum unit level able to take it: level 3 under
//! tower protection, one above any defending unit (capped at 3), level 1
//! otherwise. Dijkstra over the grid, seeded with every tile adjacent to my
//! active territory; blocked tiles and my own active tiles are never
//! entered.
//!
//! Protection is priced against the towers standing when `compute` runs. A
//! tower the path would have destroyed earlier still raises the cost of
//! later tiles; see DESIGN.md for why this stays.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use crate::board::{in_bounds, unit_cost, GameState, Grid, Owner, Pos, Tile, GRID_SIZE};

const UNREACHED: i32 = i32::MAX;

/// Reusable conquest-cost search with instance-owned cost/parent tables.
#[derive(Debug)]
pub struct ConquestSearch {
    cost: [[i32; GRID_SIZE]; GRID_SIZE],
    parent: [[Option<Pos>; GRID_SIZE]; GRID_SIZE],
    level: [[u8; GRID_SIZE]; GRID_SIZE],
}

impl ConquestSearch {
    pub fn new() -> Self {
        ConquestSearch {
            cost: [[UNREACHED; GRID_SIZE]; GRID_SIZE],
            parent: [[None; GRID_SIZE]; GRID_SIZE],
            level: [[1; GRID_SIZE]; GRID_SIZE],
        }
    }

    /// Fills the cost/parent tables for everything reachable from my
    /// current border.
    pub fn compute(&mut self, state: &GameState) {
        self.reset();
        let mut heap: BinaryHeap<Reverse<(i32, Pos)>> = BinaryHeap::new();

        for pos in Grid::positions() {
            if !self.enterable(&state.grid, pos) {
                continue;
            }
            let on_border = pos
                .neighbors()
                .any(|n| in_bounds(n) && state.grid.get(n) == Tile::MyActive);
            if !on_border {
                continue;
            }
            let level = state.min_level_to_take(pos, Owner::Me);
            let cost = unit_cost(level);
            let (x, y) = (pos.x as usize, pos.y as usize);
            if cost < self.cost[y][x] {
                self.cost[y][x] = cost;
                self.level[y][x] = level;
                heap.push(Reverse((cost, pos)));
            }
        }

        while let Some(Reverse((cost, pos))) = heap.pop() {
            if cost > self.cost[pos.y as usize][pos.x as usize] {
                continue;
            }
            for to in pos.neighbors() {
                if !self.enterable(&state.grid, to) {
                    continue;
                }
                let level = state.min_level_to_take(to, Owner::Me);
                let next = cost + unit_cost(level);
                let (tx, ty) = (to.x as usize, to.y as usize);
                if next < self.cost[ty][tx] {
                    self.cost[ty][tx] = next;
                    self.level[ty][tx] = level;
                    self.parent[ty][tx] = Some(pos);
                    heap.push(Reverse((next, to)));
                }
            }
        }
    }

    fn enterable(&self, grid: &Grid, pos: Pos) -> bool {
        in_bounds(pos) && grid.get(pos) != Tile::Blocked && grid.get(pos) != Tile::MyActive
    }

    /// Total gold to conquer through to `finish`, if reachable.
    pub fn cost_to(&self, finish: Pos) -> Option<i32> {
        if !in_bounds(finish) {
            return None;
        }
        let c = self.cost[finish.y as usize][finish.x as usize];
        (c != UNREACHED).then_some(c)
    }

    /// The conquest chain ending at `finish`: each tile to take, in order,
    /// with the unit level to train there. Empty if unreachable.
    pub fn path_to(&self, finish: Pos) -> Vec<(Pos, u8)> {
        if self.cost_to(finish).is_none() {
            return Vec::new();
        }
        let mut path = Vec::new();
        let mut cur = Some(finish);
        while let Some(pos) = cur {
            path.push((pos, self.level[pos.y as usize][pos.x as usize]));
            cur = self.parent[pos.y as usize][pos.x as usize];
        }
        path.reverse();
        path
    }

    fn reset(&mut self) {
        self.cost = [[UNREACHED; GRID_SIZE]; GRID_SIZE];
        self.parent = [[None; GRID_SIZE]; GRID_SIZE];
        self.level = [[1; GRID_SIZE]; GRID_SIZE];
    }
}

impl Default for ConquestSearch {
    fn default() -> Self {
        Self::new()
    }
}
