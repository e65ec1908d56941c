// Debug module - disassembler and nestest-format trace log
//
// Every memory access here goes through the bus peek path, so tracing an
// instruction never clears $2002, shifts a controller, or disturbs the
// $2007 read buffer.
//
// A trace line reproduces the nestest reference layout:
//
// ```text
// C000  4C F5 C5  JMP $C5F5                       A:00 X:00 Y:00 P:24 SP:FD PPU:  0, 21 CYC:7
// ```
//
// Columns: PC, raw instruction bytes, disassembly with the resolved
// operand, registers starting at column 48, then the PPU dot position and
// the cumulative CPU cycle count.

use crate::cpu::addressing::AddressingMode;
use crate::cpu::instructions::{decode, Operation};
use crate::emulator::Nes;
use std::io::{self, Write};

/// Number of nestest log lines emitted by `--log-mode`
pub const LOG_MODE_LINES: usize = 8980;

/// Resolve a JMP (addr) pointer with the page-boundary bug, via peek
fn peek_indirect_target(nes: &Nes, ptr: u16) -> u16 {
    if ptr & 0x00FF == 0x00FF {
        let lo = nes.bus.peek(ptr) as u16;
        let hi = nes.bus.peek(ptr & 0xFF00) as u16;
        (hi << 8) | lo
    } else {
        let lo = nes.bus.peek(ptr) as u16;
        let hi = nes.bus.peek(ptr.wrapping_add(1)) as u16;
        (hi << 8) | lo
    }
}

fn peek_zp_indirect(nes: &Nes, zp: u8) -> u16 {
    let lo = nes.bus.peek(zp as u16) as u16;
    let hi = nes.bus.peek(zp.wrapping_add(1) as u16) as u16;
    (hi << 8) | lo
}

/// Disassemble the instruction at `pc` with resolved operand annotations
pub fn disassemble_at(nes: &Nes, pc: u16) -> String {
    let code = nes.bus.peek(pc);
    let info = decode(code);
    let name = info.operation.mnemonic();

    let lo = nes.bus.peek(pc.wrapping_add(1));
    let hi = nes.bus.peek(pc.wrapping_add(2));
    let word = ((hi as u16) << 8) | lo as u16;

    let cpu = &nes.cpu;

    match info.mode {
        AddressingMode::Indirect => {
            format!(
                "{} (${:04X}) = {:04X}",
                name,
                word,
                peek_indirect_target(nes, word)
            )
        }
        AddressingMode::Absolute => {
            if matches!(info.operation, Operation::JMP | Operation::JSR) {
                format!("{} ${:04X}", name, word)
            } else {
                format!("{} ${:04X} = {:02X}", name, word, nes.bus.peek(word))
            }
        }
        AddressingMode::AbsoluteX => {
            let addr = word.wrapping_add(cpu.x as u16);
            format!(
                "{} ${:04X},X @ {:04X} = {:02X}",
                name,
                word,
                addr,
                nes.bus.peek(addr)
            )
        }
        AddressingMode::AbsoluteY => {
            let addr = word.wrapping_add(cpu.y as u16);
            format!(
                "{} ${:04X},Y @ {:04X} = {:02X}",
                name,
                word,
                addr,
                nes.bus.peek(addr)
            )
        }
        AddressingMode::IndexedIndirect => {
            let ptr = lo.wrapping_add(cpu.x);
            let addr = peek_zp_indirect(nes, ptr);
            format!(
                "{} (${:02X},X) @ {:02X} = {:04X} = {:02X}",
                name,
                lo,
                ptr,
                addr,
                nes.bus.peek(addr)
            )
        }
        AddressingMode::IndirectIndexed => {
            let base = peek_zp_indirect(nes, lo);
            let addr = base.wrapping_add(cpu.y as u16);
            format!(
                "{} (${:02X}),Y = {:04X} @ {:04X} = {:02X}",
                name,
                lo,
                base,
                addr,
                nes.bus.peek(addr)
            )
        }
        AddressingMode::ZeroPage => {
            format!("{} ${:02X} = {:02X}", name, lo, nes.bus.peek(lo as u16))
        }
        AddressingMode::ZeroPageX => {
            let addr = lo.wrapping_add(cpu.x);
            format!(
                "{} ${:02X},X @ {:02X} = {:02X}",
                name,
                lo,
                addr,
                nes.bus.peek(addr as u16)
            )
        }
        AddressingMode::ZeroPageY => {
            let addr = lo.wrapping_add(cpu.y);
            format!(
                "{} ${:02X},Y @ {:02X} = {:02X}",
                name,
                lo,
                addr,
                nes.bus.peek(addr as u16)
            )
        }
        AddressingMode::Relative => {
            let target = pc.wrapping_add(2).wrapping_add(lo as i8 as u16);
            format!("{} ${:04X}", name, target)
        }
        AddressingMode::Immediate => format!("{} #${:02X}", name, lo),
        AddressingMode::Accumulator => format!("{} A", name),
        AddressingMode::Implied => name.to_string(),
    }
}

/// One nestest-format trace line for the instruction at the current PC
pub fn trace_line(nes: &Nes) -> String {
    let pc = nes.cpu.pc;
    let code = nes.bus.peek(pc);
    let info = decode(code);

    let bytes = match info.bytes {
        1 => format!("{:02X}      ", code),
        2 => format!("{:02X} {:02X}   ", code, nes.bus.peek(pc.wrapping_add(1))),
        _ => format!(
            "{:02X} {:02X} {:02X}",
            code,
            nes.bus.peek(pc.wrapping_add(1)),
            nes.bus.peek(pc.wrapping_add(2))
        ),
    };

    let disassembly = disassemble_at(nes, pc);
    let head = format!("{:04X}  {}  {}", pc, bytes, disassembly);

    format!(
        "{:<47} A:{:02X} X:{:02X} Y:{:02X} P:{:02X} SP:{:02X} PPU:{:>3},{:>3} CYC:{}",
        head,
        nes.cpu.a,
        nes.cpu.x,
        nes.cpu.y,
        nes.cpu.status,
        nes.cpu.sp,
        nes.bus.ppu.scanline(),
        nes.bus.ppu.cycle(),
        nes.cpu.total_cycles
    )
}

/// Run the console in nestest automation mode
///
/// Forces PC to $C000 and emits one trace line per instruction until
/// `max_lines` lines have been written.
pub fn run_log_mode<W: Write>(nes: &mut Nes, max_lines: usize, out: &mut W) -> io::Result<()> {
    nes.cpu.pc = 0xC000;

    let mut lines = 0usize;
    let mut last_logged_cycles = None;

    while lines < max_lines {
        let boundary = nes.cpu.at_instruction_boundary() && !nes.bus.dma_active();

        if boundary && last_logged_cycles != Some(nes.cpu.total_cycles) {
            writeln!(out, "{}", trace_line(nes))?;
            last_logged_cycles = Some(nes.cpu.total_cycles);
            lines += 1;

            if lines == max_lines {
                break;
            }
        }

        nes.clock();
    }

    Ok(())
}
