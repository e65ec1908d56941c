// Save states - versioned snapshot of the full console state
//
// Captures every register and memory the core serializes (CPU, PPU, APU,
// work RAM, VRAM, palette, OAM, DMA engine, cartridge work RAM) into a
// serde structure written as JSON. Loading validates the version and the
// ROM name first and leaves the console untouched on mismatch.

use super::Nes;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;

/// Current save state format version
const SAVE_STATE_VERSION: u32 = 1;

/// Errors from save state operations
#[derive(Debug)]
pub enum SaveStateError {
    Io(io::Error),
    Serialization(serde_json::Error),
    /// The file was written by an incompatible emulator version
    VersionMismatch {
        expected: u32,
        found: u32,
    },
    /// The state belongs to a different ROM
    RomMismatch,
}

impl std::fmt::Display for SaveStateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SaveStateError::Io(e) => write!(f, "I/O error: {}", e),
            SaveStateError::Serialization(e) => write!(f, "serialization error: {}", e),
            SaveStateError::VersionMismatch { expected, found } => {
                write!(f, "version mismatch: expected {}, found {}", expected, found)
            }
            SaveStateError::RomMismatch => write!(f, "save state is for a different ROM"),
        }
    }
}

impl std::error::Error for SaveStateError {}

impl From<io::Error> for SaveStateError {
    fn from(e: io::Error) -> Self {
        SaveStateError::Io(e)
    }
}

impl From<serde_json::Error> for SaveStateError {
    fn from(e: serde_json::Error) -> Self {
        SaveStateError::Serialization(e)
    }
}

/// CPU register snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct CpuState {
    a: u8,
    x: u8,
    y: u8,
    sp: u8,
    pc: u16,
    status: u8,
    cycles: u8,
    total_cycles: u64,
}

/// PPU snapshot: registers, loopy state, memories, dot position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct PpuState {
    ctrl: u8,
    mask: u8,
    stat: u8,
    oam_addr: u8,
    v: u16,
    t: u16,
    fine_x: u8,
    write_toggle: bool,
    read_buffer: u8,
    nametables: Vec<u8>,
    palette_ram: Vec<u8>,
    oam: Vec<u8>,
    cycle: u16,
    scanline: u16,
    frame: u64,
}

/// Complete console snapshot
#[derive(Serialize, Deserialize)]
pub struct SaveState {
    version: u32,
    rom_name: Option<String>,
    cpu: CpuState,
    ppu: PpuState,
    apu: crate::apu::Apu,
    wram: Vec<u8>,
    /// Cartridge work RAM, when the board carries any
    prg_ram: Option<Vec<u8>>,
}

impl SaveState {
    /// Capture the console
    pub fn capture(nes: &Nes) -> Self {
        let cpu = CpuState {
            a: nes.cpu.a,
            x: nes.cpu.x,
            y: nes.cpu.y,
            sp: nes.cpu.sp,
            pc: nes.cpu.pc,
            status: nes.cpu.status,
            cycles: nes.cpu.cycles,
            total_cycles: nes.cpu.total_cycles,
        };

        let ppu = &nes.bus.ppu;
        let ppu_state = PpuState {
            ctrl: ppu.ctrl,
            mask: ppu.mask,
            stat: ppu.stat,
            oam_addr: ppu.oam_addr,
            v: ppu.v,
            t: ppu.t,
            fine_x: ppu.fine_x,
            write_toggle: ppu.write_toggle,
            read_buffer: ppu.read_buffer,
            nametables: ppu.nametables.to_vec(),
            palette_ram: ppu.palette_ram.to_vec(),
            oam: ppu.oam.to_vec(),
            cycle: ppu.cycle,
            scanline: ppu.scanline(),
            frame: ppu.frame_count(),
        };

        let prg_ram = nes
            .bus
            .mapper()
            .and_then(|mapper| mapper.borrow().prg_ram().map(<[u8]>::to_vec));

        SaveState {
            version: SAVE_STATE_VERSION,
            rom_name: nes.rom_name().map(str::to_owned),
            cpu,
            ppu: ppu_state,
            apu: nes.bus.apu.clone(),
            wram: nes.bus.wram().to_vec(),
            prg_ram,
        }
    }

    /// Restore into a console; validates version and ROM identity first
    pub fn restore(&self, nes: &mut Nes) -> Result<(), SaveStateError> {
        if self.version != SAVE_STATE_VERSION {
            return Err(SaveStateError::VersionMismatch {
                expected: SAVE_STATE_VERSION,
                found: self.version,
            });
        }
        if self.rom_name.as_deref() != nes.rom_name() {
            return Err(SaveStateError::RomMismatch);
        }

        nes.cpu.a = self.cpu.a;
        nes.cpu.x = self.cpu.x;
        nes.cpu.y = self.cpu.y;
        nes.cpu.sp = self.cpu.sp;
        nes.cpu.pc = self.cpu.pc;
        nes.cpu.status = self.cpu.status;
        nes.cpu.cycles = self.cpu.cycles;
        nes.cpu.total_cycles = self.cpu.total_cycles;

        let ppu = &mut nes.bus.ppu;
        ppu.ctrl = self.ppu.ctrl;
        ppu.mask = self.ppu.mask;
        ppu.stat = self.ppu.stat;
        ppu.oam_addr = self.ppu.oam_addr;
        ppu.v = self.ppu.v;
        ppu.t = self.ppu.t;
        ppu.fine_x = self.ppu.fine_x;
        ppu.write_toggle = self.ppu.write_toggle;
        ppu.read_buffer = self.ppu.read_buffer;
        ppu.nametables.copy_from_slice(&self.ppu.nametables);
        ppu.palette_ram.copy_from_slice(&self.ppu.palette_ram);
        ppu.oam.copy_from_slice(&self.ppu.oam);
        ppu.cycle = self.ppu.cycle;
        ppu.scanline = self.ppu.scanline;
        ppu.frame = self.ppu.frame;

        nes.bus.apu = self.apu.clone();
        nes.bus.wram_mut().copy_from_slice(&self.wram);

        if let (Some(prg_ram), Some(mapper)) = (&self.prg_ram, nes.bus.mapper()) {
            mapper.borrow_mut().load_prg_ram(prg_ram);
        }

        Ok(())
    }

    /// Serialize to a slot file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), SaveStateError> {
        let json = serde_json::to_string(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Deserialize from a slot file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, SaveStateError> {
        let json = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }
}
