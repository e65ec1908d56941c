// famicore - a cycle-accurate NES emulator core
//
// The console (`emulator::Nes`) owns a 6502 CPU and the bus; the bus owns
// the PPU, APU, controllers, and the cartridge mapper. One call to
// `Nes::step_frame` runs the fixed 3:1 PPU:CPU interleave until the PPU
// finishes a 256x240 frame, with 44.1 kHz audio accumulating on the side.

pub mod apu;
#[cfg(feature = "audio")]
pub mod audio;
pub mod bus;
pub mod cartridge;
pub mod cpu;
pub mod debug;
pub mod display;
pub mod emulator;
pub mod input;
pub mod ppu;

// Re-export the main types for convenience
pub use apu::Apu;
pub use bus::Bus;
pub use cartridge::{Cartridge, INesError, INesHeader, Mapper, MapperError, Mirroring};
pub use cpu::Cpu;
pub use display::{FrameBuffer, SCREEN_HEIGHT, SCREEN_WIDTH};
pub use emulator::{EmulatorConfig, LoadError, Nes, SaveState, SaveStateError};
pub use input::{Controller, ControllerIO};
pub use ppu::Ppu;
