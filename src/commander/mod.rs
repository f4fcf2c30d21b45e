//! The per-turn decision engine.
//!
//! Runs strictly ordered phases over the shared `GameState`: update (bridge
//! sets), unit movement, training, and construction. Each phase commits its
//! decisions into the state before the next phase runs, so later heuristics
//! price the board as it will be, not as it was read. All of it is
//! best-effort: an infeasible action is skipped, never retried and never an
//! error.

pub mod building;
pub mod movement;
pub mod training;

use rand::rngs::SmallRng;
use rand::SeedableRng;

use crate::analysis::{Bridge, BridgeFinder, ComponentSearch, ConquestSearch};
use crate::board::{in_bounds, GameState, Owner, Pos, Tile};
use crate::protocol::Command;

/// Sentinel score for capturing the enemy HQ (wins the game).
pub const MAX_SCORE: i32 = 1000;
/// Floor score for a legal but worthless destination.
pub const MIN_SCORE: i32 = 1;

/// Gold to keep in reserve before committing a level-3 attacker.
const LEVEL3_RESERVE: i32 = 20;
/// A threatened bridge is defended only when the territory behind it is
/// worth at least this multiple of the defense cost.
const DEFEND_VALUE_RATIO: i32 = 2;
/// Hoard threshold before spending on a mine.
const MINE_GOLD_FLOOR: i32 = 100;
/// Economy cap: mines beyond this count rarely pay back before the game ends.
const MAX_MINES: usize = 2;

/// The decision engine. Owns the graph searches (and their scratch buffers)
/// plus the per-turn bridge sets.
pub struct Commander {
    bridges: BridgeFinder,
    search: ComponentSearch,
    conquest: ConquestSearch,
    rng: SmallRng,
    my_bridges: Vec<Bridge>,
    enemy_bridges: Vec<Bridge>,
}

impl Commander {
    pub fn new() -> Self {
        Self::with_rng(SmallRng::from_entropy())
    }

    /// Deterministic engine for tests and self-play.
    pub fn from_seed(seed: u64) -> Self {
        Self::with_rng(SmallRng::seed_from_u64(seed))
    }

    fn with_rng(rng: SmallRng) -> Self {
        Commander {
            bridges: BridgeFinder::new(),
            search: ComponentSearch::new(),
            conquest: ConquestSearch::new(),
            rng,
            my_bridges: Vec::new(),
            enemy_bridges: Vec::new(),
        }
    }

    /// Plans one full turn, mutating `state` as decisions commit.
    pub fn plan_turn(&mut self, state: &mut GameState) -> Vec<Command> {
        let mut commands = Vec::new();

        self.refresh_bridges(state);
        self.move_phase(state, &mut commands);
        self.train_phase(state, &mut commands);
        self.build_phase(state, &mut commands);

        commands
    }

    /// Recomputes both players' bridge sets from the current grid. Run
    /// after anything that changes connectivity.
    fn refresh_bridges(&mut self, state: &GameState) {
        self.my_bridges = self
            .bridges
            .find(&state.grid, Tile::MyActive, state.my_hq);
        self.enemy_bridges = self
            .bridges
            .find(&state.grid, Tile::EnemyActive, state.enemy_hq);
    }

    fn is_my_bridge(&self, pos: Pos) -> bool {
        self.my_bridges.iter().any(|b| b.cut == pos)
    }

    fn is_enemy_bridge(&self, pos: Pos) -> bool {
        self.enemy_bridges.iter().any(|b| b.cut == pos)
    }

    /// An enemy unit stands next to the tile.
    fn is_threatened(state: &GameState, pos: Pos) -> bool {
        state.units.units_of(Owner::Enemy).any(|u| u.pos.dist(pos) == 1)
    }

    /// Commits a capture of `to` by me: kills are marked (swept by the
    /// caller once its iteration is done), enemy buildings fall, severed
    /// enemy territory is demoted, the tile flips to my active, and any
    /// adjacent own inactive component reconnects. Bridge sets are
    /// refreshed afterwards since connectivity changed.
    fn commit_capture(&mut self, state: &mut GameState, to: Pos) {
        if state
            .units
            .unit_at(to)
            .is_some_and(|u| u.owner == Owner::Enemy)
        {
            state.units.mark_removed(to);
        }
        if state
            .buildings
            .building_at(to)
            .is_some_and(|b| b.owner == Owner::Enemy)
        {
            state.buildings.demolish(to);
        }

        // Demote before flipping the tile so the far side is still
        // reachable from the cut.
        if self.is_enemy_bridge(to) {
            self.search.demote_component(
                &mut state.grid,
                state.enemy_hq,
                to,
                Tile::EnemyActive,
                Tile::EnemyInactive,
            );
        }

        let was_mine = state.grid.get(to).owner() == Some(Owner::Me);
        state.grid.set(to, Tile::MyActive);
        if !was_mine {
            state.me.income += 1;
        }
        self.reactivate_around(state, to);
        self.refresh_bridges(state);
    }

    /// Reconnects own inactive components now adjacent to an active tile.
    fn reactivate_around(&mut self, state: &mut GameState, pos: Pos) {
        for n in pos.neighbors() {
            if !in_bounds(n) || state.grid.get(n) != Tile::MyInactive {
                continue;
            }
            let mut region = Vec::new();
            self.search.survey(
                &state.grid,
                n,
                |_, t| t == Tile::MyInactive,
                |p, _| {
                    region.push(p);
                    0
                },
            );
            state.me.income += region.len() as i32;
            for p in region {
                state.grid.set(p, Tile::MyActive);
            }
        }
    }
}

impl Default for Commander {
    fn default() -> Self {
        Self::new()
    }
}
