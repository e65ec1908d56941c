// Mapper 4 (MMC3) - bank select/data pair, scanline IRQ counter
//
// Memory Layout:
// - CPU $6000-$7FFF: 8KB PRG-RAM (write-protectable)
// - CPU $8000-$FFFF: four 8KB PRG-ROM windows; the last is always the last
//   bank, and one of the first/third is fixed to the second-to-last
//   depending on the PRG mode
// - PPU $0000-$1FFF: two 2KB + four 1KB CHR windows, halves swappable via
//   the A12 inversion bit
//
// Register Interface (address parity selects the register):
// - $8000 even: bank select (R0-R7 index, PRG mode bit 6, CHR mode bit 7)
// - $8001 odd:  bank data for the selected register
// - $A000 even: mirroring (0 = vertical, 1 = horizontal)
// - $A001 odd:  PRG-RAM protect (bit 6 write-protects)
// - $C000 even: IRQ latch (counter reload value)
// - $C001 odd:  IRQ reload (clears counter, reloads on next clock)
// - $E000 even: IRQ disable + acknowledge
// - $E001 odd:  IRQ enable
//
// The IRQ counter is clocked by filtered A12 rising edges. The PPU renders
// with BG patterns at $0000 and sprite patterns at $1000 in the common
// setup, producing one rising edge per scanline around dot 261; the counter
// is therefore clocked from the ppu_tick hook at cycle 261 of scanlines
// 0-239 and 261.

use super::{CHR_RAM_SIZE, OPEN_BUS, PRG_RAM_SIZE};
use crate::cartridge::{BankMap, Cartridge, Mapper, Mirroring};

pub struct Mapper4 {
    prg_rom: Vec<u8>,
    chr: Vec<u8>,
    chr_is_ram: bool,
    prg_ram: Vec<u8>,

    prg: BankMap<4, 0x2000>,
    chr_map: BankMap<8, 0x0400>,

    /// R0-R7 index to update on the next bank-data write
    bank_select: u8,
    /// Last value written for each of R0-R7
    bank_registers: [u8; 8],
    /// Bit 6 of the last bank-select write: swap fixed/switchable PRG
    prg_bank_mode: bool,
    /// Bit 7 of the last bank-select write: A12 inversion for CHR
    chr_a12_inversion: bool,

    mirroring: Mirroring,
    prg_ram_protected: bool,

    irq_latch: u8,
    irq_counter: u8,
    irq_reload: bool,
    irq_enabled: bool,
    irq_pending: bool,
}

impl Mapper4 {
    pub fn new(cartridge: Cartridge) -> Self {
        let chr_is_ram = cartridge.uses_chr_ram();
        let chr = if chr_is_ram {
            vec![0; CHR_RAM_SIZE]
        } else {
            cartridge.chr_rom
        };

        let mut mapper = Mapper4 {
            prg: BankMap::new(cartridge.prg_rom.len()),
            chr_map: BankMap::new(chr.len()),
            prg_rom: cartridge.prg_rom,
            chr,
            chr_is_ram,
            prg_ram: vec![0; PRG_RAM_SIZE],
            bank_select: 0,
            bank_registers: [0, 2, 4, 5, 6, 7, 0, 1],
            prg_bank_mode: false,
            chr_a12_inversion: false,
            mirroring: cartridge.mirroring,
            prg_ram_protected: false,
            irq_latch: 0,
            irq_counter: 0,
            irq_reload: false,
            irq_enabled: false,
            irq_pending: false,
        };
        mapper.apply_banks();
        mapper
    }

    /// Rebuild both window tables from R0-R7 and the two mode bits
    fn apply_banks(&mut self) {
        let r = &self.bank_registers;

        if self.prg_bank_mode {
            self.prg.select(0, -2);
            self.prg.select(2, r[6] as i32);
        } else {
            self.prg.select(0, r[6] as i32);
            self.prg.select(2, -2);
        }
        self.prg.select(1, r[7] as i32);
        self.prg.select(3, -1);

        // Without inversion the 2KB registers pair windows 0-3 and the 1KB
        // registers fill windows 4-7; inversion swaps the halves.
        let (two_kb_base, one_kb_base) = if self.chr_a12_inversion { (4, 0) } else { (0, 4) };

        self.chr_map.select(two_kb_base, (r[0] & 0xFE) as i32);
        self.chr_map.select(two_kb_base + 1, (r[0] | 0x01) as i32);
        self.chr_map.select(two_kb_base + 2, (r[1] & 0xFE) as i32);
        self.chr_map.select(two_kb_base + 3, (r[1] | 0x01) as i32);
        self.chr_map.select(one_kb_base, r[2] as i32);
        self.chr_map.select(one_kb_base + 1, r[3] as i32);
        self.chr_map.select(one_kb_base + 2, r[4] as i32);
        self.chr_map.select(one_kb_base + 3, r[5] as i32);
    }
}

impl Mapper for Mapper4 {
    fn read_prg(&self, addr: u16) -> u8 {
        match addr {
            0x6000..=0x7FFF => self.prg_ram[(addr & 0x1FFF) as usize],
            0x8000..=0xFFFF => self.prg_rom[self.prg.map((addr - 0x8000) as usize)],
            _ => OPEN_BUS,
        }
    }

    fn write_prg(&mut self, addr: u16, data: u8) {
        let even = addr % 2 == 0;

        match addr {
            0x6000..=0x7FFF => {
                if !self.prg_ram_protected {
                    self.prg_ram[(addr & 0x1FFF) as usize] = data;
                }
            }
            0x8000..=0x9FFF => {
                if even {
                    self.bank_select = data & 0x07;
                    self.prg_bank_mode = data & 0x40 != 0;
                    self.chr_a12_inversion = data & 0x80 != 0;
                } else {
                    self.bank_registers[self.bank_select as usize] = data;
                }
                self.apply_banks();
            }
            0xA000..=0xBFFF => {
                if even {
                    self.mirroring = if data & 0x01 != 0 {
                        Mirroring::Horizontal
                    } else {
                        Mirroring::Vertical
                    };
                } else {
                    self.prg_ram_protected = data & 0x40 != 0;
                }
            }
            0xC000..=0xDFFF => {
                if even {
                    self.irq_latch = data;
                } else {
                    self.irq_counter = 0;
                    self.irq_reload = true;
                }
            }
            0xE000..=0xFFFF => {
                if even {
                    self.irq_enabled = false;
                    self.irq_pending = false;
                } else {
                    self.irq_enabled = true;
                }
            }
            _ => {}
        }
    }

    fn read_chr(&mut self, addr: u16) -> u8 {
        match addr {
            0x0000..=0x1FFF => {
                if self.chr_is_ram {
                    self.chr[(addr & 0x1FFF) as usize]
                } else {
                    self.chr[self.chr_map.map(addr as usize)]
                }
            }
            _ => OPEN_BUS,
        }
    }

    fn write_chr(&mut self, addr: u16, data: u8) {
        if self.chr_is_ram && addr <= 0x1FFF {
            self.chr[(addr & 0x1FFF) as usize] = data;
        }
    }

    fn mirroring(&self) -> Mirroring {
        self.mirroring
    }

    fn ppu_tick(&mut self, cycle: u16, scanline: u16) {
        // One filtered A12 rising edge per rendered scanline
        if cycle != 261 {
            return;
        }
        if scanline > 239 && scanline != 261 {
            return;
        }

        if self.irq_counter == 0 || self.irq_reload {
            self.irq_counter = self.irq_latch;
            self.irq_reload = false;
        } else {
            self.irq_counter -= 1;

            if self.irq_counter == 0 && self.irq_enabled {
                self.irq_pending = true;
            }
        }
    }

    fn irq_pending(&self) -> bool {
        self.irq_pending
    }

    fn clear_irq(&mut self) {
        self.irq_pending = false;
    }

    fn prg_ram(&self) -> Option<&[u8]> {
        Some(&self.prg_ram)
    }

    fn load_prg_ram(&mut self, data: &[u8]) {
        let len = data.len().min(self.prg_ram.len());
        self.prg_ram[..len].copy_from_slice(&data[..len]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cartridge::mappers::test_support::stamped_cartridge;

    /// Clock the IRQ counter once the way the PPU would
    fn clock_scanline(mapper: &mut Mapper4, scanline: u16) {
        mapper.ppu_tick(261, scanline);
    }

    #[test]
    fn test_fixed_prg_windows() {
        let mapper = Mapper4::new(stamped_cartridge(4, 8, 4)); // 16 x 8KB banks

        assert_eq!(mapper.read_prg(0xE000), 15, "last window fixed to -1");
        assert_eq!(mapper.read_prg(0xC000), 14, "mode 0 fixes -2 at $C000");
    }

    #[test]
    fn test_prg_mode_swaps_fixed_window() {
        let mut mapper = Mapper4::new(stamped_cartridge(4, 8, 4));

        mapper.write_prg(0x8000, 0x06); // select R6
        mapper.write_prg(0x8001, 0x03); // R6 = bank 3

        assert_eq!(mapper.read_prg(0x8000), 3);
        assert_eq!(mapper.read_prg(0xC000), 14);

        mapper.write_prg(0x8000, 0x46); // PRG mode 1, still R6
        assert_eq!(mapper.read_prg(0x8000), 14, "now fixed at $8000");
        assert_eq!(mapper.read_prg(0xC000), 3, "R6 moved to $C000");
    }

    #[test]
    fn test_chr_a12_inversion_swaps_halves() {
        let mut mapper = Mapper4::new(stamped_cartridge(4, 8, 4));

        mapper.write_prg(0x8000, 0x00); // R0, no inversion
        mapper.write_prg(0x8001, 0x06); // 2KB pair at $0000 -> banks 6,7
        mapper.write_prg(0x8000, 0x02); // R2
        mapper.write_prg(0x8001, 0x09); // 1KB at $1000 -> bank 9

        assert_eq!(mapper.read_chr(0x0000), 6);
        assert_eq!(mapper.read_chr(0x0400), 7);
        assert_eq!(mapper.read_chr(0x1000), 9);

        mapper.write_prg(0x8000, 0x80); // flip inversion
        assert_eq!(mapper.read_chr(0x1000), 6, "2KB pair moved to $1000");
        assert_eq!(mapper.read_chr(0x0000), 9, "1KB bank moved to $0000");
    }

    #[test]
    fn test_2kb_registers_ignore_low_bit() {
        let mut mapper = Mapper4::new(stamped_cartridge(4, 8, 4));

        mapper.write_prg(0x8000, 0x00);
        mapper.write_prg(0x8001, 0x07); // odd value -> pair 6,7

        assert_eq!(mapper.read_chr(0x0000), 6);
        assert_eq!(mapper.read_chr(0x0400), 7);
    }

    #[test]
    fn test_irq_fires_after_latch_scanlines() {
        let mut mapper = Mapper4::new(stamped_cartridge(4, 8, 4));

        mapper.write_prg(0xC000, 3); // latch
        mapper.write_prg(0xC001, 0); // reload
        mapper.write_prg(0xE001, 0); // enable

        clock_scanline(&mut mapper, 0); // reload -> 3
        clock_scanline(&mut mapper, 1); // 2
        clock_scanline(&mut mapper, 2); // 1
        assert!(!mapper.irq_pending());

        clock_scanline(&mut mapper, 3); // 0 -> IRQ
        assert!(mapper.irq_pending(), "decrement to zero should raise IRQ");
    }

    #[test]
    fn test_irq_disable_acknowledges() {
        let mut mapper = Mapper4::new(stamped_cartridge(4, 8, 4));

        mapper.write_prg(0xC000, 1);
        mapper.write_prg(0xC001, 0);
        mapper.write_prg(0xE001, 0);

        clock_scanline(&mut mapper, 0);
        clock_scanline(&mut mapper, 1);
        assert!(mapper.irq_pending());

        mapper.write_prg(0xE000, 0);
        assert!(!mapper.irq_pending(), "disable must acknowledge");
    }

    #[test]
    fn test_irq_not_clocked_outside_rendered_lines() {
        let mut mapper = Mapper4::new(stamped_cartridge(4, 8, 4));

        mapper.write_prg(0xC000, 1);
        mapper.write_prg(0xC001, 0);
        mapper.write_prg(0xE001, 0);

        mapper.ppu_tick(261, 241); // vblank line: no edge
        mapper.ppu_tick(100, 0); // wrong dot: no edge
        clock_scanline(&mut mapper, 261); // pre-render counts
        clock_scanline(&mut mapper, 0);
        assert!(mapper.irq_pending());
    }

    #[test]
    fn test_prg_ram_protect() {
        let mut mapper = Mapper4::new(stamped_cartridge(4, 8, 4));

        mapper.write_prg(0x6000, 0x42);
        mapper.write_prg(0xA001, 0x40); // protect
        mapper.write_prg(0x6000, 0x99);

        assert_eq!(mapper.read_prg(0x6000), 0x42, "write should be blocked");
    }
}
