//! Castellan -- a territory-capture bot for a 12x12 tile wargame.
//!
//! This binary reads the judge's turn snapshots from stdin and writes one
//! line of semicolon-terminated actions per turn to stdout. The loop runs
//! until the judge closes the pipe.

use std::io::{self, Write};

use castellan::commander::Commander;
use castellan::protocol::{format_commands, read_mine_spots, read_turn, TokenReader};

fn main() {
    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = io::BufWriter::new(stdout.lock());
    let mut input = TokenReader::new(stdin.lock());

    let mine_spots = match read_mine_spots(&mut input) {
        Ok(spots) => spots,
        Err(e) => {
            eprintln!("setup: {}", e);
            return;
        }
    };

    let mut commander = Commander::new();

    loop {
        let mut state = match read_turn(&mut input, &mine_spots) {
            Ok(Some(s)) => s,
            Ok(None) => break,
            Err(e) => {
                eprintln!("turn input: {}", e);
                break;
            }
        };

        let commands = commander.plan_turn(&mut state);
        writeln!(out, "{}", format_commands(&commands)).unwrap();
        out.flush().unwrap();
    }
}
