// APU channels - the four tone generators
//
// Pulse 1/2, triangle, and noise. Each exposes its register writes, timer
// clock, frame-sequencer clocks, and a `sample` method returning the
// current 4-bit level for the mixer.

mod noise;
mod pulse;
mod triangle;

pub use noise::Noise;
pub use pulse::Pulse;
pub use triangle::Triangle;
