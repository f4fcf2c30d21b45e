//! Construction phase.
//!
//! Mines only: towers are placed by the training phase where they answer a
//! concrete threat. At most one mine goes up per turn, and only once gold
//! has piled up well past the purchase price, so the economy never starves
//! the front line.

use crate::board::{mine_cost, BuildingKind, GameState, Owner, MINE_INCOME};
use crate::protocol::Command;

use super::{Commander, MAX_MINES, MINE_GOLD_FLOOR};

impl Commander {
    pub(super) fn build_phase(&mut self, state: &mut GameState, commands: &mut Vec<Command>) {
        if state.me.gold < MINE_GOLD_FLOOR {
            return;
        }
        let owned = state.buildings.mines_owned(Owner::Me);
        if owned >= MAX_MINES || !state.me.can_build_mine(owned) {
            return;
        }

        // The spot closest to the HQ is the hardest for the enemy to reach.
        let spot = state
            .mine_spots
            .iter()
            .copied()
            .filter(|&p| state.mine_spot_buildable(p))
            .min_by_key(|p| p.dist(state.my_hq));

        if let Some(pos) = spot {
            state.me.spend(mine_cost(owned), MINE_INCOME);
            state.place_building(Owner::Me, BuildingKind::Mine, pos);
            commands.push(Command::BuildMine(pos));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::corner_state;
    use super::*;
    use crate::board::{Pos, Tile};

    #[test]
    fn hoarded_gold_buys_one_mine_on_the_safest_spot() {
        let mut commander = Commander::from_seed(5);
        let mut state = corner_state(120, 0);
        for p in [Pos::new(1, 1), Pos::new(6, 6)] {
            state.mine_spots.push(p);
            state.grid.set(p, Tile::MyActive);
        }

        let mut commands = Vec::new();
        commander.build_phase(&mut state, &mut commands);

        assert_eq!(commands, vec![Command::BuildMine(Pos::new(1, 1))]);
        assert_eq!(state.me.gold, 100);
        assert_eq!(state.me.income, MINE_INCOME);
        assert_eq!(state.buildings.mines_owned(Owner::Me), 1);
    }

    #[test]
    fn no_mine_below_the_gold_floor_or_above_the_cap() {
        let mut commander = Commander::from_seed(5);
        let mut state = corner_state(99, 0);
        state.mine_spots.push(Pos::new(1, 1));
        state.grid.set(Pos::new(1, 1), Tile::MyActive);

        let mut commands = Vec::new();
        commander.build_phase(&mut state, &mut commands);
        assert!(commands.is_empty());

        // Two mines standing already: hold even with the gold.
        state.me.gold = 200;
        state.place_building(Owner::Me, BuildingKind::Mine, Pos::new(2, 2));
        state.place_building(Owner::Me, BuildingKind::Mine, Pos::new(3, 3));
        commander.build_phase(&mut state, &mut commands);
        assert!(commands.is_empty());
    }

    #[test]
    fn occupied_spots_are_skipped() {
        let mut commander = Commander::from_seed(5);
        let mut state = corner_state(150, 0);
        state.mine_spots.push(Pos::new(1, 1));
        state.mine_spots.push(Pos::new(2, 2));
        state.grid.set(Pos::new(1, 1), Tile::MyActive);
        state.grid.set(Pos::new(2, 2), Tile::MyActive);
        // First spot already has a building.
        state.place_building(Owner::Me, BuildingKind::Tower, Pos::new(1, 1));

        let mut commands = Vec::new();
        commander.build_phase(&mut state, &mut commands);
        assert_eq!(commands, vec![Command::BuildMine(Pos::new(2, 2))]);
    }
}
