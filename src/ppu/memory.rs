// PPU memory - VRAM routing, nametable mirroring, palette RAM
//
// PPU address space:
// - $0000-$1FFF: pattern tables, served by the cartridge (CHR-ROM/RAM)
// - $2000-$2FFF: nametables, internal 2KB folded by the cartridge's
//   mirroring (or taken over entirely by the mapper)
// - $3000-$3EFF: mirror of $2000-$2EFF
// - $3F00-$3FFF: 32-byte palette RAM with its own aliasing rules

use super::Ppu;
use crate::cartridge::Mirroring;

impl Ppu {
    /// Fold a $2000-$2FFF address into the internal 2KB
    fn nametable_index(&self, addr: u16, mirroring: Mirroring) -> usize {
        let index = (addr - 0x2000) as usize & 0x0FFF;

        match mirroring {
            Mirroring::Vertical => index & 0x07FF,
            Mirroring::Horizontal => {
                if index < 0x0800 {
                    index & 0x03FF
                } else {
                    0x0400 | (index & 0x03FF)
                }
            }
            Mirroring::SingleScreenLow => index & 0x03FF,
            Mirroring::SingleScreenHigh => 0x0400 | (index & 0x03FF),
            // Callers route MapperControlled to the mapper before this
            Mirroring::MapperControlled => index & 0x07FF,
        }
    }

    /// Palette RAM slot for a $3F00-$3FFF address
    ///
    /// $3F10/$3F14/$3F18/$3F1C are the same cells as $3F00/$3F04/$3F08/
    /// $3F0C; writes land there so both views agree.
    fn palette_index_for_write(addr: u16) -> usize {
        let mut index = (addr as usize) & 0x1F;
        if index >= 0x10 && index % 4 == 0 {
            index -= 0x10;
        }
        index
    }

    /// Read one byte from PPU address space
    pub(crate) fn read_vram(&mut self, addr: u16) -> u8 {
        let addr = addr & 0x3FFF;

        match addr {
            0x0000..=0x1FFF => match &self.mapper {
                Some(mapper) => mapper.borrow_mut().read_chr(addr),
                None => 0,
            },
            0x2000..=0x2FFF => {
                let mirroring = match &self.mapper {
                    Some(mapper) => mapper.borrow().mirroring(),
                    None => Mirroring::Horizontal,
                };

                if mirroring == Mirroring::MapperControlled {
                    if let Some(mapper) = &self.mapper {
                        return mapper.borrow().read_nametable(addr);
                    }
                }
                self.nametables[self.nametable_index(addr, mirroring)]
            }
            0x3000..=0x3EFF => self.read_vram(addr - 0x1000),
            _ => {
                // Every fourth entry renders as the backdrop color
                let index = (addr as usize) & 0x1F;
                if index % 4 == 0 {
                    self.palette_ram[0]
                } else {
                    self.palette_ram[index]
                }
            }
        }
    }

    /// Write one byte into PPU address space
    pub(crate) fn write_vram(&mut self, addr: u16, data: u8) {
        let addr = addr & 0x3FFF;

        match addr {
            0x0000..=0x1FFF => {
                if let Some(mapper) = &self.mapper {
                    mapper.borrow_mut().write_chr(addr, data);
                }
            }
            0x2000..=0x2FFF => {
                let mirroring = match &self.mapper {
                    Some(mapper) => mapper.borrow().mirroring(),
                    None => Mirroring::Horizontal,
                };

                if mirroring == Mirroring::MapperControlled {
                    if let Some(mapper) = &self.mapper {
                        mapper.borrow_mut().write_nametable(addr, data);
                    }
                    return;
                }
                let index = self.nametable_index(addr, mirroring);
                self.nametables[index] = data;
            }
            0x3000..=0x3EFF => self.write_vram(addr - 0x1000, data),
            _ => {
                self.palette_ram[Self::palette_index_for_write(addr)] = data;
            }
        }
    }

    /// Palette lookup used by the pixel pipeline
    pub(crate) fn fetch_palette_color(&mut self, palette: u8, value: u8) -> u8 {
        self.read_vram(0x3F00 + 4 * palette as u16 + value as u16)
    }
}
