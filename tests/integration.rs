//! Integration tests for the castellan binary.
//!
//! Spawns the bot, feeds it scripted judge input over stdin, and checks the
//! action lines it prints. One output line is expected per scripted turn.

use std::io::{BufRead, Write};
use std::process::{Command, Stdio};

/// Feeds the scripted input to the bot and collects its stdout lines.
fn run_bot(input: &str) -> Vec<String> {
    let exe = env!("CARGO_BIN_EXE_castellan");
    let mut child = Command::new(exe)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .expect("failed to start castellan");

    let mut stdin = child.stdin.take().unwrap();
    let stdout = child.stdout.take().unwrap();
    let reader = std::io::BufReader::new(stdout);

    stdin.write_all(input.as_bytes()).unwrap();
    stdin.flush().unwrap();
    drop(stdin);

    let lines: Vec<String> = reader.lines().map(|l| l.unwrap()).collect();
    let status = child.wait().expect("failed to wait on child");
    assert!(status.success());
    lines
}

/// Builds one turn block: economies, map rows, buildings, units.
fn turn_block(
    my_gold: i32,
    my_income: i32,
    rows: &[String],
    buildings: &[(i32, i32, i32, i32)],
    units: &[(i32, i32, i32, i32, i32)],
) -> String {
    assert_eq!(rows.len(), 12);
    let mut s = format!("{}\n{}\n20\n1\n", my_gold, my_income);
    for row in rows {
        s.push_str(row);
        s.push('\n');
    }
    s.push_str(&format!("{}\n", buildings.len()));
    for (owner, kind, x, y) in buildings {
        s.push_str(&format!("{} {} {} {}\n", owner, kind, x, y));
    }
    s.push_str(&format!("{}\n", units.len()));
    for (owner, id, level, x, y) in units {
        s.push_str(&format!("{} {} {} {} {}\n", owner, id, level, x, y));
    }
    s
}

/// Blank map with corner HQ tiles only.
fn corner_rows() -> Vec<String> {
    let mut rows = vec![".".repeat(12); 12];
    rows[0] = format!("O{}", ".".repeat(11));
    rows[11] = format!("{}X", ".".repeat(11));
    rows
}

const CORNER_HQS: &[(i32, i32, i32, i32)] = &[(0, 0, 0, 0), (1, 0, 11, 11)];

#[test]
fn broke_turn_waits() {
    let input = format!("0\n{}", turn_block(0, 0, &corner_rows(), CORNER_HQS, &[]));
    let lines = run_bot(&input);
    assert_eq!(lines, vec!["WAIT;".to_string()]);
}

#[test]
fn opening_gold_expands_with_trains() {
    let input = format!("0\n{}", turn_block(30, 0, &corner_rows(), CORNER_HQS, &[]));
    let lines = run_bot(&input);
    assert_eq!(lines.len(), 1);
    let trains = lines[0].matches("TRAIN 1 ").count();
    assert_eq!(trains, 3, "30 gold buys three level-1 units: {}", lines[0]);
    assert!(!lines[0].contains("WAIT"));
}

#[test]
fn corridor_to_the_enemy_hq_is_rushed() {
    // My active corridor runs along row 0 and down column 11 to one step
    // short of the enemy HQ.
    let mut rows = vec![".".repeat(12); 12];
    rows[0] = "O".repeat(12);
    for row in rows.iter_mut().take(11).skip(1) {
        *row = format!("{}O", ".".repeat(11));
    }
    rows[11] = format!("{}X", ".".repeat(11));

    let input = format!("0\n{}", turn_block(100, 5, &rows, CORNER_HQS, &[]));
    let lines = run_bot(&input);
    assert_eq!(lines.len(), 1);
    assert!(
        lines[0].contains("TRAIN 1 11 11;"),
        "expected a finishing train on the HQ: {}",
        lines[0]
    );
    assert!(!lines[0].contains("WAIT"));
}

#[test]
fn unit_marches_toward_the_enemy() {
    let mut rows = corner_rows();
    rows[0] = format!("OO{}", ".".repeat(10));
    let input = format!(
        "0\n{}",
        turn_block(0, 0, &rows, CORNER_HQS, &[(0, 7, 1, 1, 0)])
    );
    let lines = run_bot(&input);
    assert_eq!(lines.len(), 1);
    assert!(
        lines[0].starts_with("MOVE 7 "),
        "expected unit 7 to advance: {}",
        lines[0]
    );
    // Either of the two forward neighbors is fine; retreating is not.
    assert!(lines[0] == "MOVE 7 2 0;" || lines[0] == "MOVE 7 1 1;");
}

#[test]
fn hoard_builds_a_mine_on_the_free_spot() {
    let mut rows = corner_rows();
    rows[0] = format!("OO{}", ".".repeat(10));
    rows[1] = format!("O{}", ".".repeat(11));
    // One mine spot on my territory at (1,0).
    let setup = "1\n1 0\n";
    let input = format!("{}{}", setup, turn_block(130, 2, &rows, CORNER_HQS, &[]));
    let lines = run_bot(&input);
    assert_eq!(lines.len(), 1);
    assert!(
        lines[0].contains("BUILD MINE 1 0;"),
        "expected a mine at the spot: {}",
        lines[0]
    );
}

#[test]
fn session_runs_many_turns_until_eof() {
    let mut input = String::from("0\n");
    for _ in 0..5 {
        input.push_str(&turn_block(10, 1, &corner_rows(), CORNER_HQS, &[]));
    }
    let lines = run_bot(&input);
    assert_eq!(lines.len(), 5);
    for line in &lines {
        assert!(line.ends_with(';'), "every line is ;-terminated: {}", line);
    }
}
