//! Bridge detection over same-ownership tile graphs.
//!
//! A bridge is an edge whose removal disconnects part of an owner's
//! territory from their HQ. The finder runs one Tarjan low-link DFS per
//! query over the subgraph of tiles equal to a single `Tile` value, rooted
//! at the HQ, then sweeps any disconnected same-type fragments so coverage
//! is total. Scratch arrays are owned by the instance and reset at the top
//! of every query; a query never depends on caller discipline.

use crate::board::{in_bounds, Grid, Pos, Tile, GRID_SIZE};

/// A bridge edge. Capturing `cut` severs everything beyond it from the HQ
/// side at `parent`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bridge {
    pub parent: Pos,
    pub cut: Pos,
}

/// Reusable bridge search with instance-owned scratch state.
#[derive(Debug)]
pub struct BridgeFinder {
    visited: [[bool; GRID_SIZE]; GRID_SIZE],
    disc: [[u16; GRID_SIZE]; GRID_SIZE],
    low: [[u16; GRID_SIZE]; GRID_SIZE],
    timer: u16,
}

impl BridgeFinder {
    pub fn new() -> Self {
        BridgeFinder {
            visited: [[false; GRID_SIZE]; GRID_SIZE],
            disc: [[0; GRID_SIZE]; GRID_SIZE],
            low: [[0; GRID_SIZE]; GRID_SIZE],
            timer: 0,
        }
    }

    /// Finds every bridge in the subgraph of tiles equal to `tile_type`.
    ///
    /// The DFS is rooted at `hq` so that for each reported bridge, `cut` is
    /// the tile on the far side from the HQ. Fragments not connected to the
    /// HQ are swept afterwards for completeness.
    pub fn find(&mut self, grid: &Grid, tile_type: Tile, hq: Pos) -> Vec<Bridge> {
        self.reset();
        let mut bridges = Vec::new();

        if in_bounds(hq) && grid.get(hq) == tile_type {
            self.dfs(grid, hq, None, tile_type, &mut bridges);
        }
        for pos in Grid::positions() {
            if grid.get(pos) == tile_type && !self.visited[pos.y as usize][pos.x as usize] {
                self.dfs(grid, pos, None, tile_type, &mut bridges);
            }
        }

        bridges
    }

    // Depth is bounded by the 144-tile map, so plain recursion is fine.
    fn dfs(
        &mut self,
        grid: &Grid,
        v: Pos,
        parent: Option<Pos>,
        tile_type: Tile,
        bridges: &mut Vec<Bridge>,
    ) {
        let (vx, vy) = (v.x as usize, v.y as usize);
        self.visited[vy][vx] = true;
        self.timer += 1;
        self.disc[vy][vx] = self.timer;
        self.low[vy][vx] = self.timer;

        for to in v.neighbors() {
            if !in_bounds(to) || grid.get(to) != tile_type {
                continue;
            }
            // Only the tree edge back to the immediate parent is skipped;
            // other back-edges must update low.
            if Some(to) == parent {
                continue;
            }
            let (tx, ty) = (to.x as usize, to.y as usize);
            if self.visited[ty][tx] {
                self.low[vy][vx] = self.low[vy][vx].min(self.disc[ty][tx]);
            } else {
                self.dfs(grid, to, Some(v), tile_type, bridges);
                self.low[vy][vx] = self.low[vy][vx].min(self.low[ty][tx]);
                if self.low[ty][tx] > self.disc[vy][vx] {
                    bridges.push(Bridge { parent: v, cut: to });
                }
            }
        }
    }

    fn reset(&mut self) {
        self.visited = [[false; GRID_SIZE]; GRID_SIZE];
        self.disc = [[0; GRID_SIZE]; GRID_SIZE];
        self.low = [[0; GRID_SIZE]; GRID_SIZE];
        self.timer = 0;
    }
}

impl Default for BridgeFinder {
    fn default() -> Self {
        Self::new()
    }
}
