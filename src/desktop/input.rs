//! Pointer simulation using enigo.

use enigo::{Button, Coordinate, Direction, Enigo, Mouse, Settings};
use std::thread;
use std::time::Duration;

/// The one thing the dispatcher needs from the OS pointer.
pub trait PointerDevice: Send {
    /// Click the primary button at absolute screen coordinates.
    fn click(&mut self, x: i32, y: i32) -> anyhow::Result<()>;
}

/// enigo-backed pointer for real clicks.
pub struct EnigoPointer {
    enigo: Enigo,
}

impl EnigoPointer {
    pub fn new() -> anyhow::Result<Self> {
        let enigo = Enigo::new(&Settings::default())
            .map_err(|e| anyhow::anyhow!("Failed to create pointer device: {:?}", e))?;
        Ok(Self { enigo })
    }
}

impl PointerDevice for EnigoPointer {
    fn click(&mut self, x: i32, y: i32) -> anyhow::Result<()> {
        self.enigo
            .move_mouse(x, y, Coordinate::Abs)
            .map_err(|e| anyhow::anyhow!("Failed to move mouse: {:?}", e))?;
        thread::sleep(Duration::from_millis(50)); // Small delay for reliability
        self.enigo
            .button(Button::Left, Direction::Click)
            .map_err(|e| anyhow::anyhow!("Failed to click: {:?}", e))
    }
}
