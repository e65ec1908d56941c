// Display module - framebuffer, palette, and the window host

pub mod framebuffer;
pub mod palette;
pub mod window;

pub use framebuffer::{FrameBuffer, SCREEN_HEIGHT, SCREEN_WIDTH};
pub use palette::{palette_rgb, NES_PALETTE};
pub use window::run_game;
