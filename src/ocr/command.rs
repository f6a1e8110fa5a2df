//! OCR through an external command.

use std::io::{Cursor, Write};
use std::process::{Command, Stdio};

use image::{ImageEncoder, RgbaImage};

use super::TextRecognizer;

/// Runs a user-configured OCR command per capture, feeding the image as
/// PNG on stdin and reading one text fragment per stdout line.
///
/// Any engine with a pipe interface works; the default configuration
/// targets `tesseract stdin stdout -l chi_sim`.
pub struct CommandRecognizer {
    program: String,
    args: Vec<String>,
}

impl CommandRecognizer {
    /// Split a command line on whitespace into program and arguments.
    /// No shell is involved, so no quoting or expansion.
    pub fn from_command_line(command: &str) -> anyhow::Result<Self> {
        let mut parts = command.split_whitespace();
        let program = parts
            .next()
            .ok_or_else(|| anyhow::anyhow!("OCR command is empty"))?
            .to_string();
        Ok(Self {
            program,
            args: parts.map(str::to_string).collect(),
        })
    }

    fn encode_png(image: &RgbaImage) -> anyhow::Result<Vec<u8>> {
        let mut buffer = Cursor::new(Vec::new());
        let encoder = image::codecs::png::PngEncoder::new(&mut buffer);
        encoder
            .write_image(
                image.as_raw(),
                image.width(),
                image.height(),
                image::ExtendedColorType::Rgba8,
            )
            .map_err(|e| anyhow::anyhow!("Failed to encode PNG: {}", e))?;
        Ok(buffer.into_inner())
    }
}

impl TextRecognizer for CommandRecognizer {
    fn recognize(&mut self, image: &RgbaImage) -> anyhow::Result<Vec<String>> {
        let png = Self::encode_png(image)?;

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| {
                anyhow::anyhow!("Failed to spawn OCR command '{}': {}", self.program, e)
            })?;

        if let Some(mut stdin) = child.stdin.take() {
            if let Err(e) = stdin.write_all(&png) {
                // a dropped Child is never waited on; reap it before
                // surfacing the error
                let _ = child.kill();
                let _ = child.wait();
                return Err(anyhow::anyhow!(
                    "Failed to write image to OCR command: {}",
                    e
                ));
            }
            // stdin drops here so the child sees EOF
        }

        let output = child
            .wait_with_output()
            .map_err(|e| anyhow::anyhow!("Failed to read OCR output: {}", e))?;
        if !output.status.success() {
            anyhow::bail!("OCR command exited with {}", output.status);
        }

        let text = String::from_utf8_lossy(&output.stdout);
        Ok(text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect())
    }
}
