//! Unit movement phase.
//!
//! Every owned unit scores its four neighbors plus staying put and takes
//! the best. Units are processed in a shuffled order so the same unit does
//! not soak up the best tile every turn. Captures commit into the shared
//! state immediately; kills are marked during the loop and swept at the
//! end.

use rand::seq::SliceRandom;

use crate::analysis::tile_value;
use crate::board::{in_bounds, GameState, Owner, Pos, Tile, Unit};
use crate::protocol::Command;

use super::{Commander, MAX_SCORE, MIN_SCORE};

impl Commander {
    pub(super) fn move_phase(&mut self, state: &mut GameState, commands: &mut Vec<Command>) {
        let mut ids: Vec<i32> = state
            .units
            .units_of(Owner::Me)
            .filter_map(|u| u.id)
            .collect();
        ids.shuffle(&mut self.rng);

        for id in ids {
            let unit = match state.units.unit_by_id(id) {
                Some(u) => *u,
                None => continue,
            };
            let mut best_pos = unit.pos;
            let mut best_score = self.score_move(state, &unit, unit.pos);

            for to in unit.pos.neighbors() {
                if !self.can_enter(state, &unit, to) {
                    continue;
                }
                let score = self.score_move(state, &unit, to);
                let closer = to.dist(state.enemy_hq) < best_pos.dist(state.enemy_hq);
                if score > best_score || (score == best_score && closer) {
                    best_score = score;
                    best_pos = to;
                }
            }

            if best_pos != unit.pos {
                if best_pos == state.enemy_hq {
                    eprintln!("move: unit {} takes the enemy HQ", id);
                }
                // Commit the capture first so the kill mark lands on the
                // defender, not on the arriving unit.
                self.commit_capture(state, best_pos);
                state.units.relocate(id, best_pos);
                commands.push(Command::Move { id, pos: best_pos });
            }
        }

        state.units.sweep_removed();
    }

    /// Legal destinations: on the map, not blocked, not on my building or
    /// my unit, and strong enough for whatever defends the tile.
    fn can_enter(&self, state: &GameState, unit: &Unit, to: Pos) -> bool {
        if !in_bounds(to) || state.grid.get(to) == Tile::Blocked {
            return false;
        }
        if state
            .buildings
            .building_at(to)
            .is_some_and(|b| b.owner == Owner::Me)
        {
            return false;
        }
        if state
            .units
            .unit_at(to)
            .is_some_and(|u| u.owner == Owner::Me)
        {
            return false;
        }
        unit.level >= state.min_level_to_take(to, Owner::Me)
    }

    /// Scores a destination (or staying put, when `to` equals the unit's
    /// position).
    pub(crate) fn score_move(&mut self, state: &GameState, unit: &Unit, to: Pos) -> i32 {
        if to == state.enemy_hq {
            return MAX_SCORE;
        }
        if to == state.my_hq {
            return -MAX_SCORE;
        }

        // A unit holding a threatened bridge stays: everything else is
        // floored so the hold score below dominates.
        let holding_bridge =
            self.is_my_bridge(unit.pos) && Self::is_threatened(state, unit.pos);
        if holding_bridge && to != unit.pos {
            return MIN_SCORE;
        }

        let mut score = MIN_SCORE;
        let tile = state.grid.get(to);

        // Enemy tiles and units are worth what they cost the opponent.
        if tile.owner() == Some(Owner::Enemy)
            || state
                .units
                .unit_at(to)
                .is_some_and(|u| u.owner == Owner::Enemy)
        {
            score = score.max(tile_value(state, to));
        }

        // Breaking an enemy bridge is worth the whole component behind it.
        if self.is_enemy_bridge(to) {
            score = score.max(self.search.value_after_bridge(
                state,
                state.enemy_hq,
                to,
                Tile::EnemyActive,
            ));
        }

        // Holding (or stepping onto) a threatened bridge of ours is worth
        // the territory it keeps connected.
        if self.is_my_bridge(to) && Self::is_threatened(state, to) {
            score = score.max(self.search.value_after_bridge(
                state,
                state.my_hq,
                to,
                Tile::MyActive,
            ));
        }

        // Reconnecting a dead component is worth its size.
        for n in std::iter::once(to).chain(to.neighbors()) {
            if in_bounds(n) && state.grid.get(n) == Tile::MyInactive {
                let size =
                    self.search
                        .component_size(&state.grid, n, |_, t| t == Tile::MyInactive);
                score = score.max(size);
            }
        }

        score
    }
}
