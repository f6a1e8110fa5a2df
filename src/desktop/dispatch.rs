//! Answer-label to click translation.
//!
//! Button positions were measured on a 527x970 quiz window; actual windows
//! scale those positions proportionally.

use std::str::FromStr;

use crate::bank::AnswerLabel;
use crate::error::{AppError, Result};

use super::input::PointerDevice;
use super::window::{WindowBounds, WindowTracker};

/// Width of the reference quiz layout.
pub const REFERENCE_WIDTH: i32 = 527;
/// Height of the reference quiz layout.
pub const REFERENCE_HEIGHT: i32 = 970;

/// Horizontal center of the "A" button in the reference layout.
const LABEL_A_X: i32 = 130;
/// Horizontal center of the "B" button in the reference layout.
const LABEL_B_X: i32 = 365;
/// Vertical center of the answer button row in the reference layout.
const ANSWER_ROW_Y: i32 = 785;

/// Window-relative click point for a label, scaled from the reference
/// layout to the window's actual size. Fractions truncate toward zero.
pub fn answer_point(label: AnswerLabel, bounds: &WindowBounds) -> (i32, i32) {
    let reference_x = match label {
        AnswerLabel::A => LABEL_A_X,
        AnswerLabel::B => LABEL_B_X,
    };
    let x = (bounds.width() as f64 * reference_x as f64 / REFERENCE_WIDTH as f64) as i32;
    let y = (bounds.height() as f64 * ANSWER_ROW_Y as f64 / REFERENCE_HEIGHT as f64) as i32;
    (x, y)
}

/// Turns a matched answer label into a pointer click inside the target
/// window.
pub struct AnswerDispatcher {
    pointer: Box<dyn PointerDevice>,
    tracker: Box<dyn WindowTracker>,
}

impl AnswerDispatcher {
    pub fn new(pointer: Box<dyn PointerDevice>, tracker: Box<dyn WindowTracker>) -> Self {
        Self { pointer, tracker }
    }

    /// Click the answer button for `label` inside the given window bounds.
    ///
    /// Labels other than "A"/"B" are rejected without touching the
    /// pointer.
    pub fn dispatch(&mut self, label: &str, bounds: &WindowBounds) -> Result<()> {
        let label =
            AnswerLabel::from_str(label).map_err(|_| AppError::InvalidLabel(label.to_string()))?;
        let (dx, dy) = answer_point(label, bounds);
        self.pointer
            .click(bounds.left + dx, bounds.top + dy)
            .map_err(|e| AppError::DispatchFailure(e.to_string()))
    }

    /// Resolve the target window's live bounds, then dispatch there.
    pub fn dispatch_to_target(&mut self, label: &str) -> Result<()> {
        let bounds = self
            .tracker
            .bounds()
            .ok_or_else(|| AppError::DispatchFailure("target window not found".to_string()))?;
        self.dispatch(label, &bounds)
    }
}
