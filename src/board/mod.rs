//! Board representation and game-state types.
//!
//! Contains the grid/tile model, players, units, buildings, and the
//! `GameState` aggregate the engine works on.

pub mod building;
pub mod grid;
pub mod player;
pub mod state;
pub mod unit;

pub use building::{Building, BuildingKind, BuildingRoster};
pub use grid::{in_bounds, Grid, Owner, Pos, Tile, GRID_SIZE, NEIGHBOR_OFFSETS};
pub use player::{
    mine_cost, unit_cost, unit_upkeep, Player, MINE_BASE_COST, MINE_COST_STEP, MINE_INCOME,
    TOWER_COST, UNIT_COST, UNIT_UPKEEP,
};
pub use state::GameState;
pub use unit::{Unit, UnitRoster};
