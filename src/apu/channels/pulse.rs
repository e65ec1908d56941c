// Pulse channel - 8-step duty square wave with envelope and sweep

use crate::apu::components::{Envelope, LengthCounter, Sweep, Timer};

/// Duty rows, one 8-step cycle each
const DUTY_SEQUENCES: [[u8; 8]; 4] = [
    [0, 1, 0, 0, 0, 0, 0, 0], // 12.5%
    [0, 1, 1, 0, 0, 0, 0, 0], // 25%
    [0, 1, 1, 1, 1, 0, 0, 0], // 50%
    [1, 0, 0, 1, 1, 1, 1, 1], // 25% negated
];

/// One of the two pulse channels
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Pulse {
    pub enabled: bool,
    duty: u8,
    sequence_pos: u8,
    pub timer: Timer,
    pub length: LengthCounter,
    pub envelope: Envelope,
    pub sweep: Sweep,
}

impl Pulse {
    /// `ones_complement` marks pulse 1, whose sweep subtracts one extra
    pub fn new(ones_complement: bool) -> Self {
        Pulse {
            enabled: false,
            duty: 0,
            sequence_pos: 0,
            timer: Timer::new(),
            length: LengthCounter::new(),
            envelope: Envelope::new(),
            sweep: Sweep::new(ones_complement),
        }
    }

    /// $4000/$4004: ddLC VVVV
    pub fn write_control(&mut self, data: u8) {
        self.duty = (data >> 6) & 0x03;
        self.length.halt = data & 0x20 != 0;
        self.envelope.write_control(data);
    }

    /// $4001/$4005: sweep setup
    pub fn write_sweep(&mut self, data: u8) {
        self.sweep.write_control(data);
        self.sweep.update_target(self.timer.period);
    }

    /// $4002/$4006: timer low
    pub fn write_timer_low(&mut self, data: u8) {
        self.timer.set_period_low(data);
        self.sweep.update_target(self.timer.period);
    }

    /// $4003/$4007: length load + timer high; restarts sequence and envelope
    pub fn write_timer_high(&mut self, data: u8) {
        self.timer.set_period_high(data);
        if self.enabled {
            self.length.load(data >> 3);
        }
        self.sequence_pos = 0;
        self.envelope.restart();
        self.sweep.update_target(self.timer.period);
    }

    /// $4015 enable bit
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.length.clear();
        }
    }

    /// Timer clock (every second CPU cycle)
    pub fn clock_timer(&mut self) {
        if self.timer.clock() {
            self.sequence_pos = (self.sequence_pos + 1) % 8;
        }
    }

    /// Quarter-frame clock
    pub fn clock_envelope(&mut self) {
        self.envelope.clock();
    }

    /// Half-frame clock: length and sweep
    pub fn clock_length_and_sweep(&mut self) {
        self.length.clock();

        if let Some(period) = self.sweep.clock(self.timer.period) {
            self.timer.period = period;
            self.sweep.update_target(period);
        }
    }

    /// Current 4-bit sample
    pub fn sample(&self) -> u8 {
        let duty_bit = DUTY_SEQUENCES[self.duty as usize][self.sequence_pos as usize];

        if duty_bit == 0
            || !self.enabled
            || !self.length.is_active()
            || self.timer.period < 8
            || self.timer.period > 0x7FF
        {
            return 0;
        }

        self.envelope.output()
    }
}
