//! Text recognition boundary.
//!
//! The worker only depends on the `TextRecognizer` shape; the concrete
//! engine lives outside the crate and is reached through
//! `CommandRecognizer`.

use image::RgbaImage;

pub mod command;

// Re-export main types
pub use command::CommandRecognizer;

/// Converts a captured image into recognized text fragments.
pub trait TextRecognizer: Send {
    fn recognize(&mut self, image: &RgbaImage) -> anyhow::Result<Vec<String>>;
}
