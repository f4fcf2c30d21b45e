//! Buildings and the building roster.

use super::grid::{Owner, Pos};

/// The kind of a building, with its wire integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuildingKind {
    Hq,
    Mine,
    Tower,
}

impl BuildingKind {
    /// Parses the wire integer (0 = HQ, 1 = mine, 2 = tower).
    pub fn from_wire(v: i32) -> Option<BuildingKind> {
        match v {
            0 => Some(BuildingKind::Hq),
            1 => Some(BuildingKind::Mine),
            2 => Some(BuildingKind::Tower),
            _ => None,
        }
    }
}

/// A building on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Building {
    pub owner: Owner,
    pub kind: BuildingKind,
    pub pos: Pos,
}

impl Building {
    pub const fn new(owner: Owner, kind: BuildingKind, pos: Pos) -> Self {
        Building { owner, kind, pos }
    }
}

/// All buildings currently standing, plus any planned this turn.
#[derive(Debug, Clone, Default)]
pub struct BuildingRoster {
    buildings: Vec<Building>,
}

impl BuildingRoster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, building: Building) {
        self.buildings.push(building);
    }

    /// The building at a position, if any.
    pub fn building_at(&self, pos: Pos) -> Option<&Building> {
        self.buildings.iter().find(|b| b.pos == pos)
    }

    /// The HQ position of one owner, if present.
    pub fn hq(&self, owner: Owner) -> Option<Pos> {
        self.buildings
            .iter()
            .find(|b| b.owner == owner && b.kind == BuildingKind::Hq)
            .map(|b| b.pos)
    }

    /// Iterates one owner's buildings of a given kind.
    pub fn of_kind(&self, owner: Owner, kind: BuildingKind) -> impl Iterator<Item = &Building> {
        self.buildings
            .iter()
            .filter(move |b| b.owner == owner && b.kind == kind)
    }

    /// How many mines the owner has standing.
    pub fn mines_owned(&self, owner: Owner) -> usize {
        self.of_kind(owner, BuildingKind::Mine).count()
    }

    /// Removes the building at `pos` (captured buildings are destroyed).
    /// HQs are never removed; reaching one ends the game upstream.
    pub fn demolish(&mut self, pos: Pos) {
        self.buildings
            .retain(|b| b.pos != pos || b.kind == BuildingKind::Hq);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Building> {
        self.buildings.iter()
    }
}
