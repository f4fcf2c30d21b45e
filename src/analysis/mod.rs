//! Graph analysis over the tile map.
//!
//! The three searches the decision engine is built on: bridge detection,
//! connected-component valuation, and conquest-cost shortest paths. Each
//! owns its scratch arrays and resets them on entry to every query.

pub mod bridges;
pub mod component;
pub mod conquest;

pub use bridges::{Bridge, BridgeFinder};
pub use component::{
    tile_value, ComponentSearch, ACTIVE_TILE_SCORE, INACTIVE_TILE_SCORE, MINE_VALUE, TOWER_VALUE,
};
pub use conquest::ConquestSearch;
