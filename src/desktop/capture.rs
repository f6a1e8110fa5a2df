//! Cross-platform screen capture using xcap.

use image::RgbaImage;
use serde::{Deserialize, Serialize};
use xcap::{Monitor, Window};

/// Absolute screen rectangle to capture, in virtual-screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureRegion {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl CaptureRegion {
    /// Offset of this region's origin inside a monitor rectangle, when
    /// the origin falls inside it.
    fn offset_in(
        &self,
        monitor_x: i32,
        monitor_y: i32,
        monitor_width: u32,
        monitor_height: u32,
    ) -> Option<(u32, u32)> {
        let dx = self.x - monitor_x;
        let dy = self.y - monitor_y;
        if dx < 0 || dy < 0 || dx >= monitor_width as i32 || dy >= monitor_height as i32 {
            return None;
        }
        Some((dx as u32, dy as u32))
    }
}

/// Produces the image buffers the worker feeds into recognition.
pub trait ScreenGrabber: Send {
    /// Capture the given absolute region, or the tracked target window
    /// when no region is set.
    fn grab(&mut self, region: Option<CaptureRegion>) -> anyhow::Result<RgbaImage>;
}

/// xcap-backed grabber: primary-monitor capture plus crop for explicit
/// regions, direct window capture for the default region.
pub struct XcapGrabber {
    window_title: String,
}

impl XcapGrabber {
    pub fn new(window_title: impl Into<String>) -> Self {
        Self {
            window_title: window_title.into(),
        }
    }

    fn capture_region(region: CaptureRegion) -> anyhow::Result<RgbaImage> {
        let monitors =
            Monitor::all().map_err(|e| anyhow::anyhow!("Failed to get monitors: {}", e))?;

        // the region may sit on any monitor, including ones left of or
        // above the primary where coordinates are negative
        let located = monitors.into_iter().find_map(|m| {
            region
                .offset_in(m.x(), m.y(), m.width(), m.height())
                .map(|offset| (m, offset))
        });
        let (monitor, (x, y)) = located.ok_or_else(|| {
            anyhow::anyhow!(
                "No monitor contains the capture region at ({}, {})",
                region.x,
                region.y
            )
        })?;

        let screen = monitor
            .capture_image()
            .map_err(|e| anyhow::anyhow!("Failed to capture screen: {}", e))?;

        // the captured frame can differ from the advertised monitor size
        // under display scaling; stay inside the frame
        if x >= screen.width() || y >= screen.height() {
            anyhow::bail!(
                "Capture region at ({}, {}) lies outside the captured frame",
                region.x,
                region.y
            );
        }

        // Clamp to the monitor edge so a window dragged half off-screen
        // still yields a usable crop
        let width = region.width.min(screen.width() - x);
        let height = region.height.min(screen.height() - y);

        Ok(image::imageops::crop_imm(&screen, x, y, width, height).to_image())
    }

    fn capture_window(&self) -> anyhow::Result<RgbaImage> {
        let windows =
            Window::all().map_err(|e| anyhow::anyhow!("Failed to get windows: {}", e))?;

        let needle = self.window_title.to_lowercase();
        let window = windows
            .into_iter()
            .filter(|w| !w.is_minimized())
            .find(|w| w.title().to_lowercase().contains(&needle))
            .ok_or_else(|| {
                anyhow::anyhow!("Window with title '{}' not found", self.window_title)
            })?;

        window
            .capture_image()
            .map_err(|e| anyhow::anyhow!("Failed to capture window: {}", e))
    }
}

impl ScreenGrabber for XcapGrabber {
    fn grab(&mut self, region: Option<CaptureRegion>) -> anyhow::Result<RgbaImage> {
        match region {
            Some(region) => Self::capture_region(region),
            None => self.capture_window(),
        }
    }
}
