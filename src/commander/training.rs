//! Training phase.
//!
//! Four sub-stages in strict order, each one committing into the shared
//! state before the next runs: an all-in rush when the enemy HQ is payable
//! this turn, defense of threatened bridges, tower reinforcement of the
//! front line, and value-ranked attacks on enemy bridges and border tiles.
//! Every stage simply skips what it cannot afford.

use crate::analysis::tile_value;
use crate::board::{
    in_bounds, unit_cost, unit_upkeep, BuildingKind, GameState, Grid, Owner, Pos, Tile, Unit,
    TOWER_COST,
};
use crate::protocol::Command;

use super::{Commander, DEFEND_VALUE_RATIO, LEVEL3_RESERVE, MAX_SCORE, MIN_SCORE};

impl Commander {
    pub(super) fn train_phase(&mut self, state: &mut GameState, commands: &mut Vec<Command>) {
        if self.try_rush(state, commands) {
            return;
        }
        self.defend_bridges(state, commands);
        self.reinforce_front(state, commands);
        let reserve = Self::mine_reserve(state);
        self.attack(state, commands, reserve);
    }

    /// Gold the attack stage must not touch: once the hoard crosses the
    /// mine threshold and a spot is free, the build phase gets first call
    /// on it.
    fn mine_reserve(state: &GameState) -> i32 {
        let owned = state.buildings.mines_owned(Owner::Me);
        let spot_free = state
            .mine_spots
            .iter()
            .any(|&p| state.mine_spot_buildable(p));
        if owned < super::MAX_MINES && spot_free && state.me.gold >= super::MINE_GOLD_FLOOR {
            super::MINE_GOLD_FLOOR
        } else {
            0
        }
    }

    /// Trains a unit at `pos`, capturing the tile first if it is not ours.
    /// Callers have already checked affordability and legality.
    fn commit_train(&mut self, state: &mut GameState, level: u8, pos: Pos) {
        if state.grid.get(pos) != Tile::MyActive {
            self.commit_capture(state, pos);
        }
        state.me.spend(unit_cost(level), -unit_upkeep(level));
        state.units.push(Unit::planned(Owner::Me, level, pos));
    }

    /// Stage (a): if conquering a lane straight to the enemy HQ costs no
    /// more than the gold on hand, spend it all now. Income is ignored;
    /// the game ends this turn if the judge agrees.
    fn try_rush(&mut self, state: &mut GameState, commands: &mut Vec<Command>) -> bool {
        self.conquest.compute(state);
        let cost = match self.conquest.cost_to(state.enemy_hq) {
            Some(c) if c > 0 && c <= state.me.gold => c,
            _ => return false,
        };
        let path = self.conquest.path_to(state.enemy_hq);
        eprintln!("rush: enemy HQ payable for {} gold, going all in", cost);
        for (pos, level) in path {
            self.commit_train(state, level, pos);
            commands.push(Command::Train { level, pos });
        }
        state.units.sweep_removed();
        true
    }

    /// Stage (b): hold threatened bridges. A bridge is only worth defending
    /// when the territory behind it is worth a multiple of the defense.
    fn defend_bridges(&mut self, state: &mut GameState, commands: &mut Vec<Command>) {
        let cuts: Vec<Pos> = self.my_bridges.iter().map(|b| b.cut).collect();
        for cut in cuts {
            if !Self::is_threatened(state, cut) {
                continue;
            }
            if state.units.unit_at(cut).is_some() || state.buildings.building_at(cut).is_some() {
                continue;
            }
            let value = self
                .search
                .value_after_bridge(state, state.my_hq, cut, Tile::MyActive);
            let threat = state
                .units
                .units_of(Owner::Enemy)
                .filter(|u| u.pos.dist(cut) == 1)
                .map(|u| u.level)
                .max()
                .unwrap_or(1);
            let counter = (threat + 1).min(3);

            if state.me.can_train(counter, 0) && value >= DEFEND_VALUE_RATIO * unit_cost(counter) {
                self.commit_train(state, counter, cut);
                commands.push(Command::Train {
                    level: counter,
                    pos: cut,
                });
            } else if state.me.can_build_tower()
                && value >= DEFEND_VALUE_RATIO * TOWER_COST
                && state.tower_buildable(cut)
            {
                state.me.spend(TOWER_COST, 0);
                state.place_building(Owner::Me, BuildingKind::Tower, cut);
                commands.push(Command::BuildTower(cut));
            }
        }
    }

    /// Stage (c): one tower per turn where it shields the most uncovered
    /// front-line tiles.
    fn reinforce_front(&mut self, state: &mut GameState, commands: &mut Vec<Command>) {
        if !state.me.can_build_tower() {
            return;
        }
        let weak: Vec<Pos> = Self::weak_front_tiles(state);
        if weak.len() < 2 {
            return;
        }

        let mut best: Option<(Pos, usize)> = None;
        for pos in Grid::positions() {
            if !state.tower_buildable(pos) {
                continue;
            }
            let covered = std::iter::once(pos)
                .chain(pos.neighbors())
                .filter(|p| weak.contains(p))
                .count();
            let better = match best {
                Some((_, n)) => covered > n,
                None => covered > 0,
            };
            if better {
                best = Some((pos, covered));
            }
        }

        if let Some((pos, covered)) = best {
            if covered >= 2 {
                state.me.spend(TOWER_COST, 0);
                state.place_building(Owner::Me, BuildingKind::Tower, pos);
                commands.push(Command::BuildTower(pos));
            }
        }
    }

    /// My active tiles touching enemy active territory with no tower cover.
    fn weak_front_tiles(state: &GameState) -> Vec<Pos> {
        Grid::positions()
            .filter(|&p| state.grid.get(p) == Tile::MyActive)
            .filter(|&p| {
                p.neighbors()
                    .any(|n| in_bounds(n) && state.grid.get(n) == Tile::EnemyActive)
            })
            .filter(|&p| !state.is_protected(p, Owner::Me))
            .collect()
    }

    /// Stage (d): spend the remaining gold (minus any mine reserve) on the
    /// best-valued border tiles, recomputed after every committed train.
    fn attack(&mut self, state: &mut GameState, commands: &mut Vec<Command>, reserve: i32) {
        loop {
            let targets = self.border_targets(state);
            let mut trained = false;
            for &(pos, _net, level) in &targets {
                if !self.can_afford_assault(state, level, reserve) {
                    continue;
                }
                self.commit_train(state, level, pos);
                commands.push(Command::Train { level, pos });
                trained = true;
                break;
            }
            if !trained {
                break;
            }
        }
        state.units.sweep_removed();
    }

    /// Tiles on my border ranked by component value minus unit cost.
    fn border_targets(&mut self, state: &GameState) -> Vec<(Pos, i32, u8)> {
        let mut targets = Vec::new();
        for pos in Grid::positions() {
            let tile = state.grid.get(pos);
            if tile == Tile::Blocked || tile == Tile::MyActive {
                continue;
            }
            let on_border = pos
                .neighbors()
                .any(|n| in_bounds(n) && state.grid.get(n) == Tile::MyActive);
            if !on_border {
                continue;
            }
            // Stranded units and buildings on cut-off tiles block training.
            if state
                .units
                .unit_at(pos)
                .is_some_and(|u| u.owner == Owner::Me)
                || state
                    .buildings
                    .building_at(pos)
                    .is_some_and(|b| b.owner == Owner::Me)
            {
                continue;
            }
            let level = state.min_level_to_take(pos, Owner::Me);
            let score = self.score_target(state, pos);
            targets.push((pos, score - unit_cost(level), level));
        }
        targets.sort_by(|a, b| {
            b.1.cmp(&a.1)
                .then_with(|| a.0.dist(state.enemy_hq).cmp(&b.0.dist(state.enemy_hq)))
        });
        targets
    }

    fn score_target(&mut self, state: &GameState, pos: Pos) -> i32 {
        if pos == state.enemy_hq {
            return MAX_SCORE;
        }
        let mut score = tile_value(state, pos).max(MIN_SCORE);
        if self.is_enemy_bridge(pos) {
            score = score.max(self.search.value_after_bridge(
                state,
                state.enemy_hq,
                pos,
                Tile::EnemyActive,
            ));
        }
        for n in pos.neighbors() {
            if in_bounds(n) && state.grid.get(n) == Tile::MyInactive {
                let size = self
                    .search
                    .component_size(&state.grid, n, |_, t| t == Tile::MyInactive);
                score = score.max(size);
            }
        }
        score
    }

    /// Level 3 is committed only with extra gold left over; cheaper levels
    /// just need the standard affordability check against the free gold.
    fn can_afford_assault(&self, state: &GameState, level: u8, reserve: i32) -> bool {
        if state.me.gold - reserve < unit_cost(level) || !state.me.can_train(level, 1) {
            return false;
        }
        level < 3 || state.me.gold - reserve >= unit_cost(3) + LEVEL3_RESERVE
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::corner_state;
    use super::*;

    #[test]
    fn rush_fires_when_the_hq_lane_is_payable() {
        let mut commander = Commander::from_seed(3);
        // 22 neutral tiles separate the corner HQs; all level 1.
        let mut state = corner_state(220, 0);
        commander.refresh_bridges(&state);

        let mut commands = Vec::new();
        commander.train_phase(&mut state, &mut commands);

        assert_eq!(commands.len(), 22);
        assert!(commands
            .iter()
            .all(|c| matches!(c, Command::Train { level: 1, .. })));
        assert_eq!(
            commands.last(),
            Some(&Command::Train {
                level: 1,
                pos: Pos::new(11, 11)
            })
        );
        assert_eq!(state.me.gold, 0);
        assert_eq!(state.grid.get(Pos::new(11, 11)), Tile::MyActive);
    }

    #[test]
    fn rush_declines_when_short_on_gold() {
        let mut commander = Commander::from_seed(3);
        let mut state = corner_state(50, 0);
        commander.refresh_bridges(&state);
        let mut commands = Vec::new();
        assert!(!commander.try_rush(&mut state, &mut commands));
        assert!(commands.is_empty());
        assert_eq!(state.me.gold, 50);
    }

    /// Corridor (0,0)..(5,0) with a level-3 garrison at (4,0) and an enemy
    /// scout threatening the cut at (2,0).
    fn threatened_bridge_state(gold: i32, income: i32) -> GameState {
        let mut state = corner_state(gold, income);
        for x in 1..=5 {
            state.grid.set(Pos::new(x, 0), Tile::MyActive);
        }
        state.units.push(Unit::new(Owner::Me, 4, 3, Pos::new(4, 0)));
        state.units.push(Unit::new(Owner::Enemy, 9, 1, Pos::new(2, 1)));
        state
    }

    #[test]
    fn threatened_bridge_gets_a_counter_unit() {
        let mut commander = Commander::from_seed(3);
        let mut state = threatened_bridge_state(100, 10);
        commander.refresh_bridges(&state);

        let mut commands = Vec::new();
        commander.defend_bridges(&mut state, &mut commands);

        assert_eq!(
            commands,
            vec![Command::Train {
                level: 2,
                pos: Pos::new(2, 0)
            }]
        );
        assert_eq!(state.me.gold, 80);
        assert!(state.units.unit_at(Pos::new(2, 0)).is_some());
    }

    #[test]
    fn threatened_bridge_falls_back_to_a_tower() {
        let mut commander = Commander::from_seed(3);
        // 15 gold: no level-2 counter, but exactly a tower.
        let mut state = threatened_bridge_state(15, 10);
        commander.refresh_bridges(&state);

        let mut commands = Vec::new();
        commander.defend_bridges(&mut state, &mut commands);

        assert_eq!(commands, vec![Command::BuildTower(Pos::new(2, 0))]);
        assert_eq!(state.me.gold, 0);
        assert!(state.is_protected(Pos::new(2, 0), Owner::Me));
    }

    #[test]
    fn cheap_bridges_are_left_to_fall() {
        let mut commander = Commander::from_seed(3);
        // Corridor of two tiles: the territory behind the cut is worth far
        // less than any defense.
        let mut state = corner_state(100, 10);
        state.grid.set(Pos::new(1, 0), Tile::MyActive);
        state.grid.set(Pos::new(2, 0), Tile::MyActive);
        state.units.push(Unit::new(Owner::Enemy, 9, 1, Pos::new(1, 1)));
        commander.refresh_bridges(&state);

        let mut commands = Vec::new();
        commander.defend_bridges(&mut state, &mut commands);
        assert!(commands.is_empty());
        assert_eq!(state.me.gold, 100);
    }

    #[test]
    fn reinforcement_tower_covers_the_most_weak_tiles() {
        let mut commander = Commander::from_seed(3);
        let mut state = corner_state(50, 0);
        for y in 4..=6 {
            state.grid.set(Pos::new(5, y), Tile::MyActive);
            state.grid.set(Pos::new(6, y), Tile::EnemyActive);
        }
        commander.refresh_bridges(&state);

        let mut commands = Vec::new();
        commander.reinforce_front(&mut state, &mut commands);

        assert_eq!(commands, vec![Command::BuildTower(Pos::new(5, 5))]);
        assert_eq!(state.me.gold, 50 - TOWER_COST);
        // The middle tower shields the whole short front.
        for y in 4..=6 {
            assert!(state.is_protected(Pos::new(5, y), Owner::Me));
        }
    }

    #[test]
    fn attack_prefers_the_valuable_defender_then_expands() {
        let mut commander = Commander::from_seed(3);
        let mut state = corner_state(30, 5);
        state.grid.set(Pos::new(1, 0), Tile::EnemyActive);
        state.units.push(Unit::new(Owner::Enemy, 9, 1, Pos::new(1, 0)));
        commander.refresh_bridges(&state);

        let mut commands = Vec::new();
        commander.attack(&mut state, &mut commands, 0);

        assert_eq!(
            commands[0],
            Command::Train {
                level: 2,
                pos: Pos::new(1, 0)
            }
        );
        // Remaining 10 gold expands onto the closest neutral border tile.
        assert_eq!(
            commands[1],
            Command::Train {
                level: 1,
                pos: Pos::new(2, 0)
            }
        );
        assert_eq!(commands.len(), 2);
        assert_eq!(state.me.gold, 0);
        assert!(state.units.units_of(Owner::Enemy).next().is_none());
        assert_eq!(state.grid.get(Pos::new(1, 0)), Tile::MyActive);
    }

    #[test]
    fn stranded_units_block_border_training() {
        let mut commander = Commander::from_seed(3);
        let mut state = corner_state(30, 5);
        state.grid.set(Pos::new(1, 0), Tile::MyInactive);
        state.units.push(Unit::new(Owner::Me, 4, 1, Pos::new(1, 0)));
        commander.refresh_bridges(&state);

        let mut commands = Vec::new();
        commander.attack(&mut state, &mut commands, 0);
        // The occupied dead tile is never a training target.
        assert!(commands
            .iter()
            .all(|c| !matches!(c, Command::Train { pos, .. } if *pos == Pos::new(1, 0))));
        assert!(!commands.is_empty());
    }

    #[test]
    fn attack_reserves_gold_for_the_mine() {
        let mut commander = Commander::from_seed(3);
        let mut state = corner_state(130, 2);
        state.mine_spots.push(Pos::new(1, 1));
        state.grid.set(Pos::new(1, 1), Tile::MyActive);
        commander.refresh_bridges(&state);

        let mut commands = Vec::new();
        commander.train_phase(&mut state, &mut commands);
        // Expansion spent only the gold above the mine threshold.
        assert_eq!(state.me.gold, 100);

        commander.build_phase(&mut state, &mut commands);
        assert!(commands.contains(&Command::BuildMine(Pos::new(1, 1))));
    }

    #[test]
    fn adjacent_enemy_hq_tops_the_attack_ranking() {
        let mut commander = Commander::from_seed(3);
        let mut state = corner_state(10, 0);
        state.grid.set(Pos::new(11, 10), Tile::MyActive);
        commander.refresh_bridges(&state);

        let mut commands = Vec::new();
        commander.attack(&mut state, &mut commands, 0);
        assert_eq!(
            commands[0],
            Command::Train {
                level: 1,
                pos: Pos::new(11, 11)
            }
        );
    }
}
