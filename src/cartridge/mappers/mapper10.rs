// Mapper 10 (MMC4) - latch-switched CHR banks
//
// Memory Layout:
// - CPU $6000-$7FFF: 8KB PRG-RAM
// - CPU $8000-$BFFF: 16KB PRG-ROM bank (switchable)
// - CPU $C000-$FFFF: 16KB PRG-ROM bank (fixed to last)
// - PPU $0000-$0FFF / $1000-$1FFF: 4KB CHR banks, each pattern-table half
//   picking between an $FD and an $FE bank via its latch
//
// Register Interface:
// - $A000-$AFFF: PRG bank select
// - $B000-$BFFF: CHR bank for $0000 half while latch 0 = $FD
// - $C000-$CFFF: CHR bank for $0000 half while latch 0 = $FE
// - $D000-$DFFF: CHR bank for $1000 half while latch 1 = $FD
// - $E000-$EFFF: CHR bank for $1000 half while latch 1 = $FE
// - $F000-$FFFF: mirroring (bit 0: 0 = vertical, 1 = horizontal)
//
// Latch behavior: a PPU read of $0FD8-$0FDF sets latch 0 to $FD, of
// $0FE8-$0FEF to $FE; $1FD8-$1FDF and $1FE8-$1FEF do the same for latch 1.
// The flip takes effect for the next fetch, which games exploit to switch
// tiles mid-frame without CPU involvement. This makes CHR reads mutating,
// hence `read_chr(&mut self)`.

use super::{OPEN_BUS, PRG_RAM_SIZE};
use crate::cartridge::{BankMap, Cartridge, Mapper, Mirroring};

pub struct Mapper10 {
    prg_rom: Vec<u8>,
    chr_rom: Vec<u8>,
    prg_ram: Vec<u8>,

    prg: BankMap<2, 0x4000>,
    /// CHR windows used while the relevant latch holds $FD
    chr_fd: BankMap<2, 0x1000>,
    /// CHR windows used while the relevant latch holds $FE
    chr_fe: BankMap<2, 0x1000>,

    latch_0: u8,
    latch_1: u8,
    mirroring: Mirroring,
}

impl Mapper10 {
    pub fn new(cartridge: Cartridge) -> Self {
        let mut prg = BankMap::new(cartridge.prg_rom.len());
        prg.select(1, -1);

        Mapper10 {
            prg,
            chr_fd: BankMap::new(cartridge.chr_rom.len()),
            chr_fe: BankMap::new(cartridge.chr_rom.len()),
            prg_rom: cartridge.prg_rom,
            chr_rom: cartridge.chr_rom,
            prg_ram: vec![0; PRG_RAM_SIZE],
            latch_0: 0xFE,
            latch_1: 0xFE,
            mirroring: cartridge.mirroring,
        }
    }

    fn update_latches(&mut self, addr: u16) {
        match addr {
            0x0FD8..=0x0FDF => self.latch_0 = 0xFD,
            0x0FE8..=0x0FEF => self.latch_0 = 0xFE,
            0x1FD8..=0x1FDF => self.latch_1 = 0xFD,
            0x1FE8..=0x1FEF => self.latch_1 = 0xFE,
            _ => {}
        }
    }
}

impl Mapper for Mapper10 {
    fn read_prg(&self, addr: u16) -> u8 {
        match addr {
            0x6000..=0x7FFF => self.prg_ram[(addr & 0x1FFF) as usize],
            0x8000..=0xFFFF => self.prg_rom[self.prg.map((addr - 0x8000) as usize)],
            _ => OPEN_BUS,
        }
    }

    fn write_prg(&mut self, addr: u16, data: u8) {
        match addr {
            0x6000..=0x7FFF => self.prg_ram[(addr & 0x1FFF) as usize] = data,
            0xA000..=0xAFFF => self.prg.select(0, (data & 0x0F) as i32),
            0xB000..=0xBFFF => self.chr_fd.select(0, (data & 0x1F) as i32),
            0xC000..=0xCFFF => self.chr_fe.select(0, (data & 0x1F) as i32),
            0xD000..=0xDFFF => self.chr_fd.select(1, (data & 0x1F) as i32),
            0xE000..=0xEFFF => self.chr_fe.select(1, (data & 0x1F) as i32),
            0xF000..=0xFFFF => {
                self.mirroring = if data & 0x01 != 0 {
                    Mirroring::Horizontal
                } else {
                    Mirroring::Vertical
                };
            }
            _ => {}
        }
    }

    fn read_chr(&mut self, addr: u16) -> u8 {
        if self.chr_rom.is_empty() {
            return OPEN_BUS;
        }

        let data = match addr {
            0x0000..=0x0FFF => {
                let map = if self.latch_0 == 0xFD {
                    &self.chr_fd
                } else {
                    &self.chr_fe
                };
                self.chr_rom[map.map(addr as usize)]
            }
            0x1000..=0x1FFF => {
                let map = if self.latch_1 == 0xFD {
                    &self.chr_fd
                } else {
                    &self.chr_fe
                };
                self.chr_rom[map.map(addr as usize)]
            }
            _ => OPEN_BUS,
        };

        self.update_latches(addr);
        data
    }

    fn write_chr(&mut self, addr: u16, _data: u8) {
        // CHR-ROM board; the fetch still trips the latches
        self.update_latches(addr);
    }

    fn mirroring(&self) -> Mirroring {
        self.mirroring
    }

    fn prg_ram(&self) -> Option<&[u8]> {
        Some(&self.prg_ram)
    }

    fn load_prg_ram(&mut self, data: &[u8]) {
        let len = data.len().min(self.prg_ram.len());
        self.prg_ram[..len].copy_from_slice(&data[..len]);
    }
}
