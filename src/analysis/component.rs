//! Connected-component valuation.
//!
//! One flood-fill engine serves three jobs: sizing a region matching a tile
//! predicate, pricing the territory that sits beyond a bridge, and rewriting
//! a severed region's tile type. Per-tile worth combines any occupying
//! unit's training cost, any building's value, and a flat score for the tile
//! itself.
//!
//! The visited scratch belongs to the instance and is reset on entry to
//! every public query; only the two passes inside `value_after_bridge`
//! deliberately share one epoch, which is what keeps the second pass from
//! leaking back across the bridge.

use crate::board::{
    in_bounds, unit_cost, BuildingKind, GameState, Grid, Pos, Tile, GRID_SIZE,
};

/// Flat worth of a connected active tile.
pub const ACTIVE_TILE_SCORE: i32 = 3;
/// Flat worth of a cut-off owned tile.
pub const INACTIVE_TILE_SCORE: i32 = 2;
/// Worth of a standing tower.
pub const TOWER_VALUE: i32 = 15;
/// Worth of a standing mine.
pub const MINE_VALUE: i32 = 20;

/// Prices a single tile: occupying unit cost, building value, tile score.
pub fn tile_value(state: &GameState, pos: Pos) -> i32 {
    let mut value = 0;
    if let Some(unit) = state.units.unit_at(pos) {
        value += unit_cost(unit.level);
    }
    if let Some(building) = state.buildings.building_at(pos) {
        value += match building.kind {
            BuildingKind::Tower => TOWER_VALUE,
            BuildingKind::Mine => MINE_VALUE,
            BuildingKind::Hq => 0,
        };
    }
    let tile = state.grid.get(pos);
    if tile.is_active() {
        value += ACTIVE_TILE_SCORE;
    } else if tile.owner().is_some() {
        value += INACTIVE_TILE_SCORE;
    }
    value
}

/// Reusable flood-fill with instance-owned scratch state.
#[derive(Debug)]
pub struct ComponentSearch {
    visited: [[bool; GRID_SIZE]; GRID_SIZE],
}

impl ComponentSearch {
    pub fn new() -> Self {
        ComponentSearch {
            visited: [[false; GRID_SIZE]; GRID_SIZE],
        }
    }

    /// Flood-fills from `start` over tiles satisfying `pred`, summing
    /// `value` over the visited region. Returns 0 when `start` itself
    /// fails the predicate.
    pub fn survey(
        &mut self,
        grid: &Grid,
        start: Pos,
        pred: impl Fn(Pos, Tile) -> bool + Copy,
        mut value: impl FnMut(Pos, Tile) -> i32,
    ) -> i32 {
        self.reset();
        if !in_bounds(start) || !pred(start, grid.get(start)) {
            return 0;
        }
        self.walk(grid, start, None, pred, &mut value)
    }

    /// Number of tiles reachable from `start` under `pred`.
    pub fn component_size(
        &mut self,
        grid: &Grid,
        start: Pos,
        pred: impl Fn(Pos, Tile) -> bool + Copy,
    ) -> i32 {
        self.survey(grid, start, pred, |_, _| 1)
    }

    /// Total worth of the component on the far side of `bridge`, walking
    /// same-type tiles. `start` is the HQ side; everything it can reach
    /// without crossing the bridge is excluded from the valuation.
    pub fn value_after_bridge(
        &mut self,
        state: &GameState,
        start: Pos,
        bridge: Pos,
        tile_type: Tile,
    ) -> i32 {
        self.reset();
        let pred = move |_: Pos, t: Tile| t == tile_type;

        if start != bridge && in_bounds(start) && state.grid.get(start) == tile_type {
            self.walk(&state.grid, start, Some(bridge), pred, &mut |_, _| 0);
        }
        let (bx, by) = (bridge.x as usize, bridge.y as usize);
        if !in_bounds(bridge) || state.grid.get(bridge) != tile_type || self.visited[by][bx] {
            return 0;
        }
        self.walk(&state.grid, bridge, None, pred, &mut |p, _| {
            tile_value(state, p)
        })
    }

    /// Rewrites the component beyond `bridge` from one tile type to
    /// another (marks severed territory inactive). The bridge tile itself
    /// is included.
    pub fn demote_component(
        &mut self,
        grid: &mut Grid,
        start: Pos,
        bridge: Pos,
        from: Tile,
        to: Tile,
    ) {
        self.reset();
        let pred = move |_: Pos, t: Tile| t == from;

        if start != bridge && in_bounds(start) && grid.get(start) == from {
            self.walk(grid, start, Some(bridge), pred, &mut |_, _| 0);
        }
        let (bx, by) = (bridge.x as usize, bridge.y as usize);
        if !in_bounds(bridge) || grid.get(bridge) != from || self.visited[by][bx] {
            return;
        }
        let mut region = Vec::new();
        self.walk(grid, bridge, None, pred, &mut |p, _| {
            region.push(p);
            0
        });
        for pos in region {
            grid.set(pos, to);
        }
    }

    // `excluded` keeps the first pass of the bridge valuation from stepping
    // onto the bridge tile.
    fn walk(
        &mut self,
        grid: &Grid,
        v: Pos,
        excluded: Option<Pos>,
        pred: impl Fn(Pos, Tile) -> bool + Copy,
        value: &mut impl FnMut(Pos, Tile) -> i32,
    ) -> i32 {
        self.visited[v.y as usize][v.x as usize] = true;
        let mut total = value(v, grid.get(v));

        for to in v.neighbors() {
            if !in_bounds(to) || Some(to) == excluded {
                continue;
            }
            if self.visited[to.y as usize][to.x as usize] || !pred(to, grid.get(to)) {
                continue;
            }
            total += self.walk(grid, to, excluded, pred, value);
        }
        total
    }

    fn reset(&mut self) {
        self.visited = [[false; GRID_SIZE]; GRID_SIZE];
    }
}

impl Default for ComponentSearch {
    fn default() -> Self {
        Self::new()
    }
}
