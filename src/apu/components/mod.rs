// APU components - subunits shared by the tone channels
//
// Each channel is assembled from these small state machines, all clocked by
// the frame sequencer (envelope and linear counter on quarter frames,
// length counter and sweep on half frames) or the channel timer.

mod envelope;
mod length_counter;
mod linear_counter;
mod sweep;
mod timer;

pub use envelope::Envelope;
pub use length_counter::{LengthCounter, LENGTH_TABLE};
pub use linear_counter::LinearCounter;
pub use sweep::Sweep;
pub use timer::Timer;
