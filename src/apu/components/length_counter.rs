// Length counter - note duration gate shared by all four tone channels

/// Translation from the 5-bit load value to a frame count
#[rustfmt::skip]
pub const LENGTH_TABLE: [u8; 32] = [
     10, 254,  20,   2,  40,   4,  80,   6,
    160,   8,  60,  10,  14,  12,  26,  14,
     12,  16,  24,  18,  48,  20,  96,  22,
    192,  24,  72,  26,  16,  28,  32,  30,
];

/// Length counter unit
///
/// Decrements once per half frame unless halted; a channel with a zero
/// counter is silent. Disabling the channel through $4015 zeroes it.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct LengthCounter {
    counter: u8,
    /// Halt flag; doubles as the envelope loop flag on the write side
    pub halt: bool,
}

impl LengthCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Half-frame clock
    pub fn clock(&mut self) {
        if !self.halt && self.counter > 0 {
            self.counter -= 1;
        }
    }

    /// Load from the table using the high 5 bits of a $4003-style write
    pub fn load(&mut self, index: u8) {
        self.counter = LENGTH_TABLE[(index & 0x1F) as usize];
    }

    /// Channel disabled via $4015
    pub fn clear(&mut self) {
        self.counter = 0;
    }

    pub fn is_active(&self) -> bool {
        self.counter > 0
    }

    pub fn counter(&self) -> u8 {
        self.counter
    }
}
