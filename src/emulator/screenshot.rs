// Screenshots - PNG dump of the current frame

use crate::display::framebuffer::{FrameBuffer, SCREEN_HEIGHT, SCREEN_WIDTH};
use std::fs::File;
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};

/// Errors from screenshot capture
#[derive(Debug)]
pub enum ScreenshotError {
    Io(io::Error),
    Encoding(png::EncodingError),
}

impl std::fmt::Display for ScreenshotError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScreenshotError::Io(e) => write!(f, "I/O error: {}", e),
            ScreenshotError::Encoding(e) => write!(f, "PNG encoding error: {}", e),
        }
    }
}

impl std::error::Error for ScreenshotError {}

impl From<io::Error> for ScreenshotError {
    fn from(e: io::Error) -> Self {
        ScreenshotError::Io(e)
    }
}

impl From<png::EncodingError> for ScreenshotError {
    fn from(e: png::EncodingError) -> Self {
        ScreenshotError::Encoding(e)
    }
}

/// Write the frame as a timestamped PNG into `directory`
///
/// Returns the path of the file written.
pub fn save_screenshot<P: AsRef<Path>>(
    frame: &FrameBuffer,
    directory: P,
) -> Result<PathBuf, ScreenshotError> {
    let timestamp = chrono::Local::now().format("%Y%m%d-%H%M%S");
    let path = directory
        .as_ref()
        .join(format!("famicore-{}.png", timestamp));

    std::fs::create_dir_all(directory.as_ref())?;
    let file = File::create(&path)?;
    let writer = BufWriter::new(file);

    let mut encoder = png::Encoder::new(writer, SCREEN_WIDTH as u32, SCREEN_HEIGHT as u32);
    encoder.set_color(png::ColorType::Rgb);
    encoder.set_depth(png::BitDepth::Eight);

    let mut png_writer = encoder.write_header()?;
    png_writer.write_image_data(frame.as_bytes())?;

    Ok(path)
}
