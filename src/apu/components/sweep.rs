// Sweep unit - pitch bend for the two pulse channels

/// Sweep unit
///
/// Tracks a target period derived from the channel's current timer period;
/// on half-frame clocks with the divider at zero it commits the target.
/// Pulse 1 subtracts with one's complement (an extra -1), pulse 2 with
/// two's complement. The unit mutes its channel whenever the current
/// period is below 8 or the target overflows 11 bits.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct Sweep {
    pub enabled: bool,
    /// Divider period (register value + 1)
    pub period: u8,
    pub negate: bool,
    pub shift: u8,
    pub reload: bool,
    divider: u8,
    pub target_period: u16,
    /// Pulse 1's extra -1 in negate mode
    ones_complement: bool,
}

impl Sweep {
    pub fn new(ones_complement: bool) -> Self {
        Sweep {
            ones_complement,
            ..Default::default()
        }
    }

    /// $4001/$4005 write: EPPP NSSS
    pub fn write_control(&mut self, data: u8) {
        self.enabled = data & 0x80 != 0;
        self.period = ((data >> 4) & 0x07) + 1;
        self.negate = data & 0x08 != 0;
        self.shift = data & 0x07;
        self.reload = true;
    }

    /// Recompute the target; called on every period change
    pub fn update_target(&mut self, current_period: u16) {
        let change = current_period >> self.shift;

        self.target_period = if self.negate {
            let target = current_period.wrapping_sub(change);
            if self.ones_complement {
                target.wrapping_sub(1)
            } else {
                target
            }
        } else {
            current_period + change
        };
    }

    /// Whether the unit silences the channel right now
    pub fn is_muting(&self, current_period: u16) -> bool {
        current_period < 8 || self.target_period > 0x07FF
    }

    /// Half-frame clock; returns the new period when one is committed
    pub fn clock(&mut self, current_period: u16) -> Option<u16> {
        let mut new_period = None;

        if self.divider == 0 && self.enabled && !self.is_muting(current_period) {
            new_period = Some(self.target_period);
        }

        if self.divider == 0 || self.reload {
            self.divider = self.period;
            self.reload = false;
        } else {
            self.divider -= 1;
        }

        new_period
    }
}
