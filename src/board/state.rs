//! The full game state for one turn.
//!
//! An explicit aggregate passed by reference into every computation; nothing
//! in the crate keeps board state in globals. The engine mutates this
//! in place as it commits decisions (planned trains, kills, demoted
//! territory) so later phases of the same turn see the updated picture. The
//! next turn's input replaces the whole thing.

use super::building::{Building, BuildingKind, BuildingRoster};
use super::grid::{in_bounds, Grid, Owner, Pos, Tile};
use super::player::Player;
use super::unit::UnitRoster;

/// Complete snapshot of one turn, plus the engine's in-turn mutations.
#[derive(Debug, Clone)]
pub struct GameState {
    pub grid: Grid,
    pub me: Player,
    pub enemy: Player,
    pub units: UnitRoster,
    pub buildings: BuildingRoster,
    /// Fixed mine-spot positions, read once before the first turn.
    pub mine_spots: Vec<Pos>,
    pub my_hq: Pos,
    pub enemy_hq: Pos,
}

impl GameState {
    pub fn player(&self, owner: Owner) -> &Player {
        match owner {
            Owner::Me => &self.me,
            Owner::Enemy => &self.enemy,
        }
    }

    pub fn player_mut(&mut self, owner: Owner) -> &mut Player {
        match owner {
            Owner::Me => &mut self.me,
            Owner::Enemy => &mut self.enemy,
        }
    }

    pub fn hq(&self, owner: Owner) -> Pos {
        match owner {
            Owner::Me => self.my_hq,
            Owner::Enemy => self.enemy_hq,
        }
    }

    /// Returns true if a tower of `owner` protects `pos`: the tower's own
    /// tile, or a 4-neighbor sharing the tower's tile type.
    pub fn is_protected(&self, pos: Pos, owner: Owner) -> bool {
        if !in_bounds(pos) {
            return false;
        }
        let tile = self.grid.get(pos);
        self.buildings.of_kind(owner, BuildingKind::Tower).any(|t| {
            if t.pos == pos {
                return true;
            }
            t.pos.dist(pos) == 1 && self.grid.get(t.pos) == tile
        })
    }

    /// The minimum unit level `attacker` must field to step onto `pos`:
    /// 3 against tower protection, else one above the defending unit
    /// (capped at 3), else 1.
    pub fn min_level_to_take(&self, pos: Pos, attacker: Owner) -> u8 {
        let defender = attacker.opponent();
        if self.is_protected(pos, defender) {
            return 3;
        }
        match self.units.unit_at(pos) {
            Some(u) if u.owner == defender => (u.level + 1).min(3),
            _ => 1,
        }
    }

    /// Returns true if a mine spot at `pos` is on my active territory and
    /// not already taken by a building or unit.
    pub fn mine_spot_buildable(&self, pos: Pos) -> bool {
        self.mine_spots.contains(&pos)
            && self.grid.get(pos) == Tile::MyActive
            && self.buildings.building_at(pos).is_none()
            && self.units.unit_at(pos).is_none()
    }

    /// Returns true if a tower can go up at `pos`: my active territory,
    /// nothing standing there, and not a reserved mine spot.
    pub fn tower_buildable(&self, pos: Pos) -> bool {
        self.grid.get(pos) == Tile::MyActive
            && self.buildings.building_at(pos).is_none()
            && self.units.unit_at(pos).is_none()
            && !self.mine_spots.contains(&pos)
    }

    /// Commits a planned building.
    pub fn place_building(&mut self, owner: Owner, kind: BuildingKind, pos: Pos) {
        self.buildings.push(Building::new(owner, kind, pos));
    }
}
