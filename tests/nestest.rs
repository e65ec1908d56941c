// Nestest - golden-log comparison against the reference CPU trace
//
// The full test needs the nestest ROM and its reference log next to the
// test sources:
//
//   tests/roms/nestest.nes
//   tests/roms/nestest.log
//
// and runs with `cargo test nestest -- --ignored`. The format checks below
// run unconditionally against a constructed ROM.

mod common;

use common::nes_with_program;
use famicore::debug::{run_log_mode, trace_line, LOG_MODE_LINES};
use famicore::emulator::Nes;
use std::fs;

const ROM_PATH: &str = "tests/roms/nestest.nes";
const LOG_PATH: &str = "tests/roms/nestest.log";

#[test]
#[ignore = "needs tests/roms/nestest.nes and nestest.log"]
fn nestest_golden_log_byte_match() {
    let golden = fs::read_to_string(LOG_PATH).expect("reference log present");

    let mut nes = Nes::new();
    nes.load_rom(ROM_PATH).expect("nestest ROM present");
    nes.power_up();

    let mut ours = Vec::new();
    run_log_mode(&mut nes, LOG_MODE_LINES, &mut ours).expect("log mode runs");
    let ours = String::from_utf8(ours).unwrap();

    let mut mismatches = 0;
    for (number, (mine, reference)) in ours.lines().zip(golden.lines()).enumerate() {
        if mine != reference {
            mismatches += 1;
            if mismatches <= 10 {
                println!("line {}:", number + 1);
                println!("  expected: {}", reference);
                println!("  got:      {}", mine);
            }
        }
    }

    assert_eq!(mismatches, 0, "{} trace lines differ", mismatches);
    assert_eq!(ours.lines().count(), LOG_MODE_LINES);
}

#[test]
fn log_mode_emits_exactly_8980_lines() {
    let mut nes = nes_with_program(&[0x4C, 0x00, 0xC0]);
    let mut out = Vec::new();

    run_log_mode(&mut nes, LOG_MODE_LINES, &mut out).unwrap();

    let text = String::from_utf8(out).unwrap();
    assert_eq!(text.lines().count(), LOG_MODE_LINES);
}

#[test]
fn trace_lines_have_the_reference_column_layout() {
    let mut nes = nes_with_program(&[0xA2, 0x05]); // LDX #$05
    nes.cpu.pc = 0xC000;

    let line = trace_line(&nes);

    assert_eq!(&line[0..4], "C000", "PC column");
    assert_eq!(&line[4..6], "  ", "two spaces after PC");
    assert_eq!(&line[6..11], "A2 05", "instruction bytes");
    assert_eq!(&line[16..26], "LDX #$05  ", "disassembly column");
    assert_eq!(&line[48..50], "A:", "registers at column 48");
    assert!(line.contains(" P:24 SP:FD PPU:"));
    assert!(line.split("CYC:").nth(1).is_some(), "cycle column present");
}

#[test]
fn first_log_line_matches_power_up_state() {
    let mut nes = nes_with_program(&[0xEA]);
    let mut out = Vec::new();
    run_log_mode(&mut nes, 1, &mut out).unwrap();

    let text = String::from_utf8(out).unwrap();
    let line = text.lines().next().unwrap();

    assert!(line.starts_with("C000"));
    assert!(line.ends_with("A:00 X:00 Y:00 P:24 SP:FD PPU:  0, 21 CYC:7"));
}
