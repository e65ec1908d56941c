// Triangle channel - 32-step linear waveform

use crate::apu::components::{LengthCounter, LinearCounter, Timer};

/// The triangle's fixed 15..0..15 step sequence
#[rustfmt::skip]
const TRIANGLE_SEQUENCE: [u8; 32] = [
    15, 14, 13, 12, 11, 10,  9,  8,  7,  6,  5,  4,  3,  2,  1,  0,
     0,  1,  2,  3,  4,  5,  6,  7,  8,  9, 10, 11, 12, 13, 14, 15,
];

/// Triangle channel
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Triangle {
    pub enabled: bool,
    sequence_pos: u8,
    pub timer: Timer,
    pub length: LengthCounter,
    pub linear: LinearCounter,
}

impl Triangle {
    pub fn new() -> Self {
        Triangle {
            enabled: false,
            sequence_pos: 0,
            timer: Timer::new(),
            length: LengthCounter::new(),
            linear: LinearCounter::new(),
        }
    }

    /// $4008: CRRR RRRR - control/halt plus linear reload value
    pub fn write_linear(&mut self, data: u8) {
        let control = data & 0x80 != 0;
        self.length.halt = control;
        self.linear.control = control;
        self.linear.period = data & 0x7F;
    }

    /// $400A: timer low
    pub fn write_timer_low(&mut self, data: u8) {
        self.timer.set_period_low(data);
    }

    /// $400B: length load + timer high; flags a linear reload
    pub fn write_timer_high(&mut self, data: u8) {
        self.timer.set_period_high(data);
        if self.enabled {
            self.length.load(data >> 3);
        }
        self.linear.reload = true;
    }

    /// $4015 enable bit
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.length.clear();
        }
    }

    /// Timer clock (every CPU cycle; the triangle runs at CPU rate)
    ///
    /// The sequence only advances while both gates are open, which freezes
    /// the wave instead of snapping it to zero.
    pub fn clock_timer(&mut self) {
        if self.timer.clock() && self.length.is_active() && self.linear.is_active() {
            self.sequence_pos = (self.sequence_pos + 1) % 32;
        }
    }

    /// Quarter-frame clock
    pub fn clock_linear(&mut self) {
        self.linear.clock();
    }

    /// Half-frame clock
    pub fn clock_length(&mut self) {
        self.length.clock();
    }

    /// Current 4-bit sample
    pub fn sample(&self) -> u8 {
        if !self.enabled
            || !self.length.is_active()
            || !self.linear.is_active()
            // Ultrasonic periods alias badly; gate them out
            || self.timer.period < 2
        {
            return 0;
        }

        TRIANGLE_SEQUENCE[self.sequence_pos as usize]
    }
}

impl Default for Triangle {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn audible_triangle() -> Triangle {
        let mut tri = Triangle::new();
        tri.set_enabled(true);
        tri.write_linear(0x7F);
        tri.write_timer_low(0x80);
        tri.write_timer_high(0x01);
        tri.clock_linear(); // consume the reload flag
        tri
    }

    #[test]
    fn test_sequence_advances_only_with_both_gates() {
        let mut tri = audible_triangle();
        tri.timer.period = 0;

        tri.clock_timer();
        assert_eq!(tri.sequence_pos, 1);

        tri.length.clear();
        tri.clock_timer();
        assert_eq!(tri.sequence_pos, 1, "length gate freezes the sequence");
    }

    #[test]
    fn test_sample_walks_down_then_up() {
        let mut tri = audible_triangle();
        tri.timer.period = 0;

        assert_eq!(tri.sample(), 15);
        for _ in 0..15 {
            tri.clock_timer();
        }
        assert_eq!(tri.sample(), 0);
        for _ in 0..16 {
            tri.clock_timer();
        }
        assert_eq!(tri.sample(), 15);
    }

    #[test]
    fn test_period_below_two_is_gated() {
        let mut tri = audible_triangle();
        tri.timer.period = 1;
        assert_eq!(tri.sample(), 0);
    }

    #[test]
    fn test_linear_counter_gates_output() {
        let mut tri = audible_triangle();
        tri.write_linear(0x00); // reload value 0, control off
        tri.write_timer_high(0x01); // raise the reload flag

        tri.clock_linear(); // reloads to 0
        assert_eq!(tri.sample(), 0);
    }
}
