//! Offline self-play simulation.
//!
//! Drives two engines against each other under a minimal rules simulator:
//! commands are applied with the same legality guards the judge enforces,
//! territory activity is re-flooded from each HQ after every action, units
//! stranded on dead territory are destroyed, and income is paid at the
//! start of each seat's turn. This is a harness for offline evaluation,
//! not the judge itself: it implements the subset of rules the engine
//! reasons about.

use serde::Serialize;

use crate::board::{
    in_bounds, mine_cost, unit_cost, Building, BuildingKind, BuildingRoster, GameState, Grid,
    Owner, Player, Pos, Tile, Unit, UnitRoster, GRID_SIZE, MINE_INCOME, TOWER_COST,
};
use crate::commander::Commander;
use crate::protocol::{format_commands, Command};

/// Which corner a player occupies. North holds (0,0), South (11,11).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Seat {
    North,
    South,
}

impl Seat {
    pub const fn label(self) -> char {
        match self {
            Seat::North => 'N',
            Seat::South => 'S',
        }
    }

    /// The owner this seat maps to in the canonical (north-side) state.
    const fn owner(self) -> Owner {
        match self {
            Seat::North => Owner::Me,
            Seat::South => Owner::Enemy,
        }
    }
}

/// The game as run by the harness. The canonical state is North's view;
/// South gets a flipped copy.
#[derive(Debug)]
pub struct Simulator {
    state: GameState,
    next_id: i32,
    winner: Option<Seat>,
}

impl Simulator {
    /// A fresh corner-HQ game with the given mine spots.
    pub fn new(mine_spots: Vec<Pos>) -> Self {
        let mut grid = Grid::empty();
        grid.set(Pos::new(0, 0), Tile::MyActive);
        grid.set(Pos::new(11, 11), Tile::EnemyActive);
        let mut buildings = BuildingRoster::new();
        buildings.push(Building::new(Owner::Me, BuildingKind::Hq, Pos::new(0, 0)));
        buildings.push(Building::new(
            Owner::Enemy,
            BuildingKind::Hq,
            Pos::new(11, 11),
        ));
        Simulator {
            state: GameState {
                grid,
                me: Player::new(20, 1),
                enemy: Player::new(20, 1),
                units: UnitRoster::new(),
                buildings,
                mine_spots,
                my_hq: Pos::new(0, 0),
                enemy_hq: Pos::new(11, 11),
            },
            next_id: 1,
            winner: None,
        }
    }

    pub fn winner(&self) -> Option<Seat> {
        self.winner
    }

    /// Economy snapshot for a seat: (gold, income).
    pub fn economy(&self, seat: Seat) -> (i32, i32) {
        let p = self.state.player(seat.owner());
        (p.gold, p.income)
    }

    /// The board as the seat's engine sees it.
    pub fn view(&self, seat: Seat) -> GameState {
        match seat {
            Seat::North => self.state.clone(),
            Seat::South => flip(&self.state),
        }
    }

    /// Recomputes the seat's income and pays it out.
    pub fn begin_turn(&mut self, seat: Seat) {
        let income = self.income_of(seat.owner());
        let p = self.state.player_mut(seat.owner());
        p.income = income;
        p.gold += income;
    }

    /// Applies a turn's commands for a seat, re-flooding activity after
    /// each one so chained TRAINs extend reach tile by tile. Illegal
    /// commands are dropped.
    pub fn apply(&mut self, seat: Seat, commands: &[Command]) {
        for cmd in commands {
            if self.winner.is_some() {
                return;
            }
            match *cmd {
                Command::Move { id, pos } => self.apply_move(seat, id, pos),
                Command::Train { level, pos } => self.apply_train(seat, level, pos),
                Command::BuildMine(pos) => self.apply_build(seat, BuildingKind::Mine, pos),
                Command::BuildTower(pos) => self.apply_build(seat, BuildingKind::Tower, pos),
                Command::Msg(_) | Command::Wait => {}
            }
            self.refresh_activity();
        }
    }

    fn apply_move(&mut self, seat: Seat, id: i32, to: Pos) {
        let own = seat.owner();
        let unit = match self.state.units.unit_by_id(id) {
            Some(u) if u.owner == own => *u,
            _ => return,
        };
        if !self.enterable(own, unit.level, to) || unit.pos.dist(to) != 1 {
            return;
        }
        self.capture(own, to);
        self.state.units.relocate(id, to);
        self.state.units.sweep_removed();
    }

    fn apply_train(&mut self, seat: Seat, level: u8, pos: Pos) {
        let own = seat.owner();
        if !(1..=3).contains(&level) || self.state.player(own).gold < unit_cost(level) {
            return;
        }
        if !self.enterable(own, level, pos) {
            return;
        }
        let in_reach = self.state.grid.get(pos) == Tile::active(own)
            || pos
                .neighbors()
                .any(|n| in_bounds(n) && self.state.grid.get(n) == Tile::active(own));
        if !in_reach {
            return;
        }
        self.state.player_mut(own).gold -= unit_cost(level);
        self.capture(own, pos);
        let id = self.next_id;
        self.next_id += 1;
        self.state.units.push(Unit::new(own, id, level, pos));
        self.state.units.sweep_removed();
    }

    fn apply_build(&mut self, seat: Seat, kind: BuildingKind, pos: Pos) {
        let own = seat.owner();
        if !in_bounds(pos)
            || self.state.grid.get(pos) != Tile::active(own)
            || self.state.buildings.building_at(pos).is_some()
            || self.state.units.unit_at(pos).is_some()
        {
            return;
        }
        let on_spot = self.state.mine_spots.contains(&pos);
        let cost = match kind {
            BuildingKind::Mine if on_spot => mine_cost(self.state.buildings.mines_owned(own)),
            BuildingKind::Tower if !on_spot => TOWER_COST,
            _ => return,
        };
        if self.state.player(own).gold < cost {
            return;
        }
        self.state.player_mut(own).gold -= cost;
        self.state.buildings.push(Building::new(own, kind, pos));
    }

    /// A tile the owner may move or train onto.
    fn enterable(&self, own: Owner, level: u8, pos: Pos) -> bool {
        if !in_bounds(pos) || self.state.grid.get(pos) == Tile::Blocked {
            return false;
        }
        if self
            .state
            .buildings
            .building_at(pos)
            .is_some_and(|b| b.owner == own)
        {
            return false;
        }
        if self.state.units.unit_at(pos).is_some_and(|u| u.owner == own) {
            return false;
        }
        level >= self.state.min_level_to_take(pos, own)
    }

    fn capture(&mut self, own: Owner, pos: Pos) {
        let foe = own.opponent();
        if self.state.hq(foe) == pos {
            self.winner = Some(if own == Owner::Me {
                Seat::North
            } else {
                Seat::South
            });
            return;
        }
        if self
            .state
            .units
            .unit_at(pos)
            .is_some_and(|u| u.owner == foe)
        {
            self.state.units.mark_removed(pos);
        }
        if self
            .state
            .buildings
            .building_at(pos)
            .is_some_and(|b| b.owner == foe)
        {
            self.state.buildings.demolish(pos);
        }
        self.state.grid.set(pos, Tile::active(own));
    }

    /// Re-floods activity from each HQ; owned tiles that lost their
    /// connection go inactive and units stranded on them die.
    fn refresh_activity(&mut self) {
        for owner in [Owner::Me, Owner::Enemy] {
            let hq = self.state.hq(owner);
            let mut connected = [[false; GRID_SIZE]; GRID_SIZE];
            let mut stack = vec![hq];
            connected[hq.y as usize][hq.x as usize] = true;
            while let Some(v) = stack.pop() {
                for n in v.neighbors() {
                    if !in_bounds(n) || connected[n.y as usize][n.x as usize] {
                        continue;
                    }
                    if self.state.grid.get(n).owner() == Some(owner) {
                        connected[n.y as usize][n.x as usize] = true;
                        stack.push(n);
                    }
                }
            }
            for pos in Grid::positions() {
                if self.state.grid.get(pos).owner() != Some(owner) {
                    continue;
                }
                if connected[pos.y as usize][pos.x as usize] {
                    self.state.grid.set(pos, Tile::active(owner));
                } else {
                    self.state.grid.set(pos, Tile::inactive(owner));
                    if self
                        .state
                        .units
                        .unit_at(pos)
                        .is_some_and(|u| u.owner == owner)
                    {
                        self.state.units.mark_removed(pos);
                    }
                }
            }
        }
        self.state.units.sweep_removed();
    }

    /// Active tiles, plus working mines, minus salaries.
    fn income_of(&self, owner: Owner) -> i32 {
        let territory = self.state.grid.count(Tile::active(owner)) as i32;
        let mines = self
            .state
            .buildings
            .of_kind(owner, BuildingKind::Mine)
            .filter(|b| self.state.grid.get(b.pos) == Tile::active(owner))
            .count() as i32;
        territory + MINE_INCOME * mines - self.state.units.upkeep(owner)
    }
}

/// Mirrors ownership so a South engine sees itself as "me". Positions are
/// left alone; the board is symmetric enough for the heuristics.
fn flip(state: &GameState) -> GameState {
    let mut grid = Grid::empty();
    for pos in Grid::positions() {
        let tile = match state.grid.get(pos) {
            Tile::MyActive => Tile::EnemyActive,
            Tile::MyInactive => Tile::EnemyInactive,
            Tile::EnemyActive => Tile::MyActive,
            Tile::EnemyInactive => Tile::MyInactive,
            other => other,
        };
        grid.set(pos, tile);
    }
    let mut units = UnitRoster::new();
    for owner in [Owner::Me, Owner::Enemy] {
        for u in state.units.units_of(owner) {
            if let Some(id) = u.id {
                units.push(Unit::new(owner.opponent(), id, u.level, u.pos));
            }
        }
    }
    let mut buildings = BuildingRoster::new();
    for b in state.buildings.iter() {
        buildings.push(Building::new(b.owner.opponent(), b.kind, b.pos));
    }
    GameState {
        grid,
        me: state.enemy,
        enemy: state.me,
        units,
        buildings,
        mine_spots: state.mine_spots.clone(),
        my_hq: state.enemy_hq,
        enemy_hq: state.my_hq,
    }
}

/// One seat's turn in a recorded game.
#[derive(Debug, Clone, Serialize)]
pub struct TurnRecord {
    pub turn: u32,
    pub seat: char,
    pub line: String,
    pub gold: i32,
    pub income: i32,
}

/// A complete recorded self-play game.
#[derive(Debug, Clone, Serialize)]
pub struct GameRecord {
    pub seed: u64,
    pub turns: Vec<TurnRecord>,
    pub winner: Option<char>,
}

/// Plays one game between two fresh engines and records every turn.
pub fn play_game(seed: u64, max_turns: u32) -> GameRecord {
    let mut sim = Simulator::new(vec![Pos::new(2, 2), Pos::new(9, 9)]);
    let mut north = Commander::from_seed(seed);
    let mut south = Commander::from_seed(seed.wrapping_add(1));

    let mut record = GameRecord {
        seed,
        turns: Vec::new(),
        winner: None,
    };

    for turn in 0..max_turns {
        for seat in [Seat::North, Seat::South] {
            sim.begin_turn(seat);
            let mut view = sim.view(seat);
            let engine = match seat {
                Seat::North => &mut north,
                Seat::South => &mut south,
            };
            let commands = engine.plan_turn(&mut view);
            sim.apply(seat, &commands);

            let (gold, income) = sim.economy(seat);
            record.turns.push(TurnRecord {
                turn,
                seat: seat.label(),
                line: format_commands(&commands),
                gold,
                income,
            });

            if let Some(w) = sim.winner() {
                record.winner = Some(w.label());
                return record;
            }
        }
    }

    record
}
