// Bank map - window-to-bank translation shared by the switching mappers
//
// A mapper exposes a fixed set of address windows (e.g. four 8KB PRG
// windows) backed by a larger physical ROM. Each window points at one bank;
// `map` folds a window-relative address into a physical offset.

/// Window-to-bank translation table
///
/// `WINDOWS` is the number of equally sized windows the mapper exposes and
/// `BANK_SIZE` the size of each in bytes. Banks selected out of range wrap
/// modulo the bank count, and negative selections index from the end of the
/// ROM (-1 = last bank), which is how fixed tail windows are expressed.
#[derive(Debug, Clone)]
pub struct BankMap<const WINDOWS: usize, const BANK_SIZE: usize> {
    windows: [usize; WINDOWS],
    bank_count: usize,
}

impl<const WINDOWS: usize, const BANK_SIZE: usize> BankMap<WINDOWS, BANK_SIZE> {
    /// Create a map over a ROM of `capacity` bytes, windows initialized to
    /// consecutive banks (window 0 -> bank 0, window 1 -> bank 1, ...)
    pub fn new(capacity: usize) -> Self {
        let mut map = BankMap {
            windows: [0; WINDOWS],
            bank_count: 1,
        };
        map.resize(capacity);

        for (i, window) in map.windows.iter_mut().enumerate() {
            *window = i % map.bank_count;
        }

        map
    }

    /// Recompute the bank count for a ROM of `capacity` bytes
    pub fn resize(&mut self, capacity: usize) {
        self.bank_count = if capacity > 0 {
            (capacity / BANK_SIZE).max(1)
        } else {
            1
        };
    }

    /// Point `window` at `bank`
    ///
    /// Positive banks wrap modulo the bank count; negative banks count back
    /// from the end of the ROM.
    pub fn select(&mut self, window: usize, bank: i32) {
        if bank < 0 {
            self.windows[window] =
                (self.bank_count as i32 + bank).rem_euclid(self.bank_count as i32) as usize;
        } else {
            self.windows[window] = bank as usize % self.bank_count;
        }
    }

    /// Translate a window-space address into a physical ROM offset
    ///
    /// The result is always within `[0, bank_count * BANK_SIZE)`.
    pub fn map(&self, addr: usize) -> usize {
        let offset = addr % BANK_SIZE;
        let window = (addr / BANK_SIZE) % WINDOWS;
        self.windows[window] * BANK_SIZE + offset
    }

    /// Bank currently selected for `window`
    pub fn bank(&self, window: usize) -> usize {
        self.windows.get(window).copied().unwrap_or(0)
    }

    /// Number of banks in the backing ROM
    pub fn bank_count(&self) -> usize {
        self.bank_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_mapping_after_new() {
        let map: BankMap<2, 0x4000> = BankMap::new(4 * 0x4000);

        assert_eq!(map.map(0x0000), 0x0000);
        assert_eq!(map.map(0x4000), 0x4000);
        assert_eq!(map.bank(0), 0);
        assert_eq!(map.bank(1), 1);
    }

    #[test]
    fn test_select_positive_wraps_modulo_count() {
        let mut map: BankMap<2, 0x4000> = BankMap::new(4 * 0x4000);

        map.select(0, 6); // 6 % 4 = 2
        assert_eq!(map.bank(0), 2);
        assert_eq!(map.map(0x0123), 2 * 0x4000 + 0x0123);
    }

    #[test]
    fn test_select_negative_counts_from_end() {
        let mut map: BankMap<2, 0x4000> = BankMap::new(8 * 0x4000);

        map.select(1, -1);
        assert_eq!(map.bank(1), 7, "-1 selects the last bank");

        map.select(1, -2);
        assert_eq!(map.bank(1), 6, "-2 selects the second-to-last bank");
    }

    #[test]
    fn test_map_always_in_physical_range() {
        let mut map: BankMap<4, 0x2000> = BankMap::new(2 * 0x2000);
        let size = 2 * 0x2000;

        // Deliberately select out-of-range banks in every window
        map.select(0, 17);
        map.select(1, -1);
        map.select(2, 255);
        map.select(3, -2);

        for addr in (0..4 * 0x2000).step_by(0x37) {
            assert!(map.map(addr) < size, "offset for {:#06X} escapes ROM", addr);
        }
    }

    #[test]
    fn test_single_bank_rom() {
        let mut map: BankMap<2, 0x4000> = BankMap::new(0x4000);

        map.select(0, 3);
        map.select(1, -1);

        // Everything folds onto bank 0
        assert_eq!(map.map(0x4000), 0x0000);
        assert_eq!(map.map(0x7FFF), 0x3FFF);
    }
}
