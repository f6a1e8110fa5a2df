//! Target window lookup.
//!
//! The quiz window is found by title substring; its live bounds feed both
//! the default capture region and the click coordinate math.

use serde::{Deserialize, Serialize};
use xcap::Window;

/// Screen-space bounds of the target window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowBounds {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl WindowBounds {
    pub fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }
}

/// Resolves the live bounds of the window the clicks should land in.
///
/// Windows move between iterations, so bounds are looked up fresh for
/// every dispatch rather than captured once.
pub trait WindowTracker: Send {
    /// Current bounds of the target window, or None when it cannot be
    /// found right now.
    fn bounds(&mut self) -> Option<WindowBounds>;
}

/// Finds the target window by title substring (case-insensitive partial
/// match) via xcap, skipping minimized windows.
pub struct XcapWindowTracker {
    title: String,
}

impl XcapWindowTracker {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
        }
    }
}

impl WindowTracker for XcapWindowTracker {
    fn bounds(&mut self) -> Option<WindowBounds> {
        let windows = match Window::all() {
            Ok(windows) => windows,
            Err(e) => {
                tracing::warn!("Failed to enumerate windows: {}", e);
                return None;
            }
        };

        let needle = self.title.to_lowercase();
        windows
            .into_iter()
            .filter(|w| !w.title().is_empty() && !w.is_minimized())
            .find(|w| w.title().to_lowercase().contains(&needle))
            .map(|w| {
                WindowBounds::new(
                    w.x(),
                    w.y(),
                    w.x() + w.width() as i32,
                    w.y() + w.height() as i32,
                )
            })
    }
}
