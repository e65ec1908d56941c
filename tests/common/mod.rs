// Common test utilities - in-memory iNES images and console bring-up
//
// Integration tests build their ROM images here instead of shipping
// binaries: a 16-byte header, a PRG bank holding a caller-supplied program
// at the reset target, and an optional CHR bank.

#![allow(dead_code)]

use famicore::cartridge::Cartridge;
use famicore::emulator::Nes;

/// PRG load address used by `build_nrom`
pub const PROGRAM_BASE: u16 = 0xC000;

/// Address the IRQ/BRK vector points at; place handlers at program
/// offset 0x100
pub const IRQ_HANDLER: u16 = 0xC100;

/// Address the NMI vector points at; place handlers at program offset
/// 0x200
pub const NMI_HANDLER: u16 = 0xC200;

/// Build an iNES image: one 16KB PRG bank (mirrored to $C000) and one CHR
/// bank, with the reset vector pointing at `PROGRAM_BASE`
pub fn build_nrom_image(program: &[u8]) -> Vec<u8> {
    assert!(program.len() <= 0x3FFA, "program too large for one bank");

    let mut image = vec![0u8; 16];
    image[0..4].copy_from_slice(b"NES\x1A");
    image[4] = 1; // one 16KB PRG bank
    image[5] = 1; // one 8KB CHR bank
    image[6] = 0x01; // vertical mirroring

    let mut prg = vec![0xEA_u8; 16 * 1024]; // NOP filler
    prg[0..program.len()].copy_from_slice(program);
    prg[0x3FFC] = (PROGRAM_BASE & 0xFF) as u8;
    prg[0x3FFD] = (PROGRAM_BASE >> 8) as u8;
    prg[0x3FFA] = (NMI_HANDLER & 0xFF) as u8;
    prg[0x3FFB] = (NMI_HANDLER >> 8) as u8;
    prg[0x3FFE] = (IRQ_HANDLER & 0xFF) as u8;
    prg[0x3FFF] = (IRQ_HANDLER >> 8) as u8;

    image.extend(prg);
    image.extend(solid_chr());
    image
}

/// 8KB CHR bank where every tile is fully opaque (low plane all ones), so
/// any tile id renders non-blank pixels everywhere
pub fn solid_chr() -> Vec<u8> {
    let mut chr = vec![0u8; 8 * 1024];
    for tile in 0..512 {
        for row in 0..8 {
            chr[tile * 16 + row] = 0xFF;
        }
    }
    chr
}

/// Powered-up console running `program` from `PROGRAM_BASE`
pub fn nes_with_program(program: &[u8]) -> Nes {
    let image = build_nrom_image(program);
    let cartridge = Cartridge::from_ines_bytes(&image).expect("test image must parse");

    let mut nes = Nes::new();
    nes.insert_cartridge(cartridge).expect("NROM must load");
    nes.power_up();
    nes
}

/// Clock the console through whole CPU instructions
pub fn run_instructions(nes: &mut Nes, count: usize) {
    for _ in 0..count {
        // Finish the current instruction
        while !nes.cpu.at_instruction_boundary() {
            nes.clock();
        }
        // Enter the next one
        let start_cycles = nes.cpu.total_cycles;
        while nes.cpu.total_cycles == start_cycles {
            nes.clock();
        }
    }
}
