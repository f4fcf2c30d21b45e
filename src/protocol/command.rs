//! Action formatting.
//!
//! Commands are concatenated into one output line of semicolon-terminated
//! actions: `MOVE id x y;TRAIN level x y;BUILD MINE x y;`. `WAIT;` is
//! emitted only when the turn produced nothing else.

use crate::board::Pos;

/// One action the bot can emit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Move the unit with the given id toward a tile.
    Move { id: i32, pos: Pos },

    /// Train a unit of the given level on a tile.
    Train { level: u8, pos: Pos },

    /// Build a mine on a mine spot.
    BuildMine(Pos),

    /// Build a tower.
    BuildTower(Pos),

    /// Chat line shown by the judge; never affects the game.
    Msg(String),

    /// Explicit no-op.
    Wait,
}

impl std::fmt::Display for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Command::Move { id, pos } => write!(f, "MOVE {} {} {}", id, pos.x, pos.y),
            Command::Train { level, pos } => write!(f, "TRAIN {} {} {}", level, pos.x, pos.y),
            Command::BuildMine(pos) => write!(f, "BUILD MINE {} {}", pos.x, pos.y),
            Command::BuildTower(pos) => write!(f, "BUILD TOWER {} {}", pos.x, pos.y),
            Command::Msg(text) => write!(f, "MSG {}", text),
            Command::Wait => write!(f, "WAIT"),
        }
    }
}

/// Formats a turn's actions as a single protocol line.
pub fn format_commands(commands: &[Command]) -> String {
    if commands.is_empty() {
        return "WAIT;".to_string();
    }
    let mut line = String::new();
    for cmd in commands {
        line.push_str(&cmd.to_string());
        line.push(';');
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_commands_match_wire_grammar() {
        assert_eq!(
            Command::Move {
                id: 3,
                pos: Pos::new(7, 2)
            }
            .to_string(),
            "MOVE 3 7 2"
        );
        assert_eq!(
            Command::Train {
                level: 2,
                pos: Pos::new(0, 11)
            }
            .to_string(),
            "TRAIN 2 0 11"
        );
        assert_eq!(Command::BuildMine(Pos::new(4, 4)).to_string(), "BUILD MINE 4 4");
        assert_eq!(
            Command::BuildTower(Pos::new(5, 6)).to_string(),
            "BUILD TOWER 5 6"
        );
        assert_eq!(Command::Wait.to_string(), "WAIT");
    }

    #[test]
    fn line_concatenates_with_semicolons() {
        let line = format_commands(&[
            Command::Train {
                level: 1,
                pos: Pos::new(1, 0),
            },
            Command::Move {
                id: 1,
                pos: Pos::new(2, 0),
            },
        ]);
        assert_eq!(line, "TRAIN 1 1 0;MOVE 1 2 0;");
    }

    #[test]
    fn empty_turn_waits() {
        assert_eq!(format_commands(&[]), "WAIT;");
    }
}
