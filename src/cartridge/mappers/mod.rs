// Mappers module - cartridge banking circuits
//
// Each supported board is a `Mapper` implementation created by the
// `create_mapper` factory from a loaded cartridge. The trait covers the
// full capability set a board can exercise: CPU-side PRG access, PPU-side
// CHR access, nametable takeover, per-clock hooks, and an IRQ line.
//
// Reads on the CHR side take `&mut self` on purpose: MMC2/MMC4-style boards
// flip bank latches when the PPU fetches specific tile addresses, so a CHR
// read is not a pure operation.

mod mapper0;
mod mapper1;
mod mapper10;
mod mapper16;
mod mapper19;
mod mapper2;
mod mapper3;
mod mapper4;
mod mapper76;

use super::{Cartridge, Mirroring};
use mapper0::Mapper0;
use mapper1::Mapper1;
use mapper10::Mapper10;
use mapper16::Mapper16;
use mapper19::Mapper19;
use mapper2::Mapper2;
use mapper3::Mapper3;
use mapper4::Mapper4;
use mapper76::Mapper76;

/// Value driven onto the bus for reads of unmapped cartridge space
pub(crate) const OPEN_BUS: u8 = 0xFF;

/// Size of the optional PRG-RAM at $6000-$7FFF (8KB)
pub(crate) const PRG_RAM_SIZE: usize = 8 * 1024;

/// Size of CHR-RAM on boards without CHR-ROM (8KB)
pub(crate) const CHR_RAM_SIZE: usize = 8 * 1024;

/// Error type for mapper creation
#[derive(Debug)]
pub enum MapperError {
    /// The requested mapper number is not supported
    UnsupportedMapper(u8),
}

impl std::fmt::Display for MapperError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MapperError::UnsupportedMapper(num) => {
                write!(f, "mapper {} is not supported", num)
            }
        }
    }
}

impl std::error::Error for MapperError {}

/// Interface between the console and a cartridge board
///
/// CPU addresses $4020-$FFFF arrive at `read_prg`/`write_prg`; PPU pattern
/// fetches at $0000-$1FFF arrive at `read_chr`/`write_chr`. Boards that
/// claim the nametable region (`Mirroring::MapperControlled`) additionally
/// serve $2000-$2FFF through `read_nametable`/`write_nametable`.
pub trait Mapper {
    /// Read from CPU address space ($4020-$FFFF)
    fn read_prg(&self, addr: u16) -> u8;

    /// Write to CPU address space; bank registers live here
    fn write_prg(&mut self, addr: u16, data: u8);

    /// Read from PPU pattern space ($0000-$1FFF); may mutate latches
    fn read_chr(&mut self, addr: u16) -> u8;

    /// Write to PPU pattern space (effective only on CHR-RAM boards)
    fn write_chr(&mut self, addr: u16, data: u8);

    /// Current nametable arrangement
    fn mirroring(&self) -> Mirroring;

    /// Read from $2000-$2FFF when this board controls nametables
    fn read_nametable(&self, _addr: u16) -> u8 {
        OPEN_BUS
    }

    /// Write to $2000-$2FFF when this board controls nametables
    fn write_nametable(&mut self, _addr: u16, _data: u8) {}

    /// Hook invoked once per CPU cycle (IRQ counters on mappers 16/19)
    fn cpu_tick(&mut self) {}

    /// Hook invoked by the PPU between dots; `cycle`/`scanline` identify the
    /// dot just processed (A12-edge IRQ counting on mapper 4)
    fn ppu_tick(&mut self, _cycle: u16, _scanline: u16) {}

    /// Whether the board is asserting its IRQ line
    fn irq_pending(&self) -> bool {
        false
    }

    /// Acknowledge the board's IRQ line
    fn clear_irq(&mut self) {}

    /// Battery/work RAM contents, if the board carries any
    fn prg_ram(&self) -> Option<&[u8]> {
        None
    }

    /// Restore battery/work RAM contents
    fn load_prg_ram(&mut self, _data: &[u8]) {}
}

/// Create a mapper instance for the given cartridge
///
/// # Errors
/// Returns `MapperError::UnsupportedMapper` for ids outside the supported
/// set {0, 1, 2, 3, 4, 10, 16, 19, 76}.
pub fn create_mapper(cartridge: Cartridge) -> Result<Box<dyn Mapper>, MapperError> {
    match cartridge.mapper {
        0 => Ok(Box::new(Mapper0::new(cartridge))),
        1 => Ok(Box::new(Mapper1::new(cartridge))),
        2 => Ok(Box::new(Mapper2::new(cartridge))),
        3 => Ok(Box::new(Mapper3::new(cartridge))),
        4 => Ok(Box::new(Mapper4::new(cartridge))),
        10 => Ok(Box::new(Mapper10::new(cartridge))),
        16 => Ok(Box::new(Mapper16::new(cartridge))),
        19 => Ok(Box::new(Mapper19::new(cartridge))),
        76 => Ok(Box::new(Mapper76::new(cartridge))),
        mapper_num => Err(MapperError::UnsupportedMapper(mapper_num)),
    }
}
