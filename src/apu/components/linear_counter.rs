// Linear counter - the triangle channel's fine-grained duration gate

/// Linear counter unit
///
/// Reloads from its period while the reload flag stands, otherwise counts
/// down to zero once per quarter frame. The control flag (shared with the
/// triangle's length halt) keeps the reload flag from clearing.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct LinearCounter {
    counter: u8,
    /// Reload value from $4008 bits 0-6
    pub period: u8,
    /// Set by any $400B write
    pub reload: bool,
    /// $4008 bit 7
    pub control: bool,
}

impl LinearCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Quarter-frame clock
    pub fn clock(&mut self) {
        if self.reload {
            self.counter = self.period;
        } else if self.counter > 0 {
            self.counter -= 1;
        }

        if !self.control {
            self.reload = false;
        }
    }

    pub fn is_active(&self) -> bool {
        self.counter > 0
    }

    pub fn counter(&self) -> u8 {
        self.counter
    }
}
