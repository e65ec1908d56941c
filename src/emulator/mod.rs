// Emulator module - the console top ("NES")
//
// Owns the CPU and the bus (which in turn owns PPU, APU, controllers, and
// the mapper handle) and drives the fixed clock interleave:
//
//   every tick:        one PPU dot
//   every third tick:  one CPU cycle (or one DMA cycle while suspended)
//                      and one APU cycle, plus the mapper's CPU hook
//
// Interrupts latched by the PPU (NMI) or by the APU/mapper (IRQ) are
// sampled only when the CPU sits at an instruction boundary, so a whole
// instruction always retires before service begins.

mod config;
mod save_state;
mod screenshot;

pub use config::{AudioSettings, EmulatorConfig, InputConfig, VideoSettings};
pub use save_state::{SaveState, SaveStateError};
pub use screenshot::{save_screenshot, ScreenshotError};

use crate::bus::Bus;
use crate::cartridge::{create_mapper, Cartridge, INesError, MapperError};
use crate::cpu::Cpu;
use crate::display::framebuffer::FrameBuffer;
use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;

/// Errors surfaced while bringing a ROM up
#[derive(Debug)]
pub enum LoadError {
    /// The image failed to parse
    Ines(INesError),
    /// The image uses a mapper this emulator does not support
    Mapper(MapperError),
}

impl std::fmt::Display for LoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoadError::Ines(e) => write!(f, "{}", e),
            LoadError::Mapper(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for LoadError {}

impl From<INesError> for LoadError {
    fn from(e: INesError) -> Self {
        LoadError::Ines(e)
    }
}

impl From<MapperError> for LoadError {
    fn from(e: MapperError) -> Self {
        LoadError::Mapper(e)
    }
}

/// Upper bound on dots per frame before the loop is declared runaway
const FRAME_RUNAWAY_LIMIT: u32 = 200_000;

/// The console
pub struct Nes {
    pub cpu: Cpu,
    pub bus: Bus,

    /// Master (PPU dot) clock, monotonically increasing
    clock: u64,
    /// CPU cycle slots seen; drives DMA read/write parity
    cpu_cycle: u64,

    /// File stem of the loaded ROM, recorded into save states
    rom_name: Option<String>,
}

impl Nes {
    pub fn new() -> Self {
        Nes {
            cpu: Cpu::new(),
            bus: Bus::new(),
            clock: 0,
            cpu_cycle: 0,
            rom_name: None,
        }
    }

    /// Load an iNES file and insert it
    pub fn load_rom<P: AsRef<Path>>(&mut self, path: P) -> Result<(), LoadError> {
        let path = path.as_ref();
        let cartridge = Cartridge::from_ines_file(path)?;

        self.rom_name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned());
        self.insert_cartridge(cartridge)
    }

    /// Insert an already-parsed cartridge
    pub fn insert_cartridge(&mut self, cartridge: Cartridge) -> Result<(), LoadError> {
        let mapper = Rc::new(RefCell::new(create_mapper(cartridge)?));
        self.bus.attach_mapper(mapper);
        Ok(())
    }

    /// Power-up: settle the CPU from the RESET vector and advance the PPU
    /// the three dots per cycle the CPU already consumed
    pub fn power_up(&mut self) {
        self.cpu.power_up(&mut self.bus);

        let dots = self.cpu.total_cycles * 3;
        for _ in 0..dots {
            self.bus.ppu.clock();
        }
        self.clock = dots;
        self.cpu_cycle = self.cpu.total_cycles;
    }

    /// The front-panel reset button; only meaningful between frames
    pub fn reset(&mut self) {
        self.cpu.reset(&mut self.bus);
        self.bus.reset();
    }

    /// Advance the console by one master tick
    pub fn clock(&mut self) {
        self.bus.ppu.clock();

        if self.clock % 3 == 0 {
            if self.bus.dma_active() {
                self.bus.clock_dma(self.cpu_cycle);
            } else {
                if self.cpu.at_instruction_boundary() {
                    self.dispatch_interrupts();
                }
                self.cpu.clock(&mut self.bus);
            }

            self.bus.apu.clock();
            if let Some(mapper) = self.bus.mapper() {
                mapper.borrow_mut().cpu_tick();
            }

            self.cpu_cycle += 1;
        }

        self.clock += 1;
    }

    /// Take pending NMI/IRQ lines at an instruction boundary
    fn dispatch_interrupts(&mut self) {
        if self.bus.ppu.nmi_pending() {
            self.bus.ppu.clear_nmi();
            self.cpu.nmi(&mut self.bus);
            return;
        }

        let mapper_irq = self
            .bus
            .mapper()
            .is_some_and(|mapper| mapper.borrow().irq_pending());

        if self.bus.apu.irq_pending() || mapper_irq {
            // The IRQ line is level-triggered; cpu.irq ignores it while
            // the I flag masks interrupts and the source stays asserted
            // until the handler acknowledges it.
            self.cpu.irq(&mut self.bus);
        }
    }

    /// Run until the PPU reports a finished frame
    pub fn step_frame(&mut self) {
        let mut dots = 0u32;

        loop {
            self.clock();
            dots += 1;

            if self.bus.ppu.is_frame_ready() {
                break;
            }

            debug_assert!(dots < FRAME_RUNAWAY_LIMIT, "frame loop runaway");
            if dots >= FRAME_RUNAWAY_LIMIT {
                break;
            }
        }
    }

    /// Host-side controller update (one byte per pad per frame)
    pub fn input_controller(&mut self, id: usize, state: u8) {
        self.bus.controllers.set_input(id, state);
    }

    /// Finished frame for the host to blit
    pub fn frame(&self) -> &FrameBuffer {
        self.bus.ppu.frame()
    }

    /// Drain the audio queue; call once per frame
    pub fn send_samples(&mut self) -> Vec<i16> {
        self.bus.apu.drain_samples()
    }

    pub fn rom_name(&self) -> Option<&str> {
        self.rom_name.as_deref()
    }

    /// Master (PPU dot) clock value
    pub fn clock_count(&self) -> u64 {
        self.clock
    }
}

impl Default for Nes {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cartridge::mappers::test_support::stamped_cartridge;

    #[test]
    fn test_three_to_one_clock_ratio() {
        let mut nes = Nes::new();

        for _ in 0..9 {
            nes.clock();
        }
        assert_eq!(nes.cpu_cycle, 3, "three dots per CPU cycle");
        assert_eq!(nes.clock, 9);
    }

    #[test]
    fn test_insert_rejects_unsupported_mapper() {
        let mut nes = Nes::new();
        let cart = stamped_cartridge(99, 1, 1);

        assert!(matches!(
            nes.insert_cartridge(cart),
            Err(LoadError::Mapper(MapperError::UnsupportedMapper(99)))
        ));
    }

    #[test]
    fn test_step_frame_terminates() {
        let mut nes = Nes::new();
        nes.insert_cartridge(stamped_cartridge(0, 1, 1)).unwrap();
        nes.power_up();

        nes.step_frame();
        assert!(nes.bus.ppu.is_frame_ready());
    }

    #[test]
    fn test_nmi_dispatch_waits_for_instruction_boundary() {
        let mut nes = Nes::new();
        nes.insert_cartridge(stamped_cartridge(0, 1, 1)).unwrap();
        nes.power_up();

        // Force a pending NMI mid-instruction
        nes.cpu.cycles = 3;
        nes.bus.ppu.write_register(0, 0x80);
        nes.bus.ppu.stat |= 0x80;
        nes.bus.ppu.set_nmi();

        let pc_before = nes.cpu.pc;
        nes.clock(); // dot 1 of 3: no CPU slot yet
        nes.clock();
        nes.clock(); // CPU slot: still counting down, no dispatch
        assert_eq!(nes.cpu.pc, pc_before, "NMI must not fire mid-instruction");
        assert!(nes.bus.ppu.nmi_pending());
    }
}
