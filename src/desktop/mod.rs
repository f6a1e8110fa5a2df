//! Desktop integration: screen capture, window lookup, and pointer input.
//!
//! Everything here is behind narrow traits (`ScreenGrabber`,
//! `WindowTracker`, `PointerDevice`) so the worker loop can be exercised
//! without a display.

pub mod capture;
pub mod dispatch;
pub mod input;
pub mod window;

// Re-export main types
pub use capture::{CaptureRegion, ScreenGrabber, XcapGrabber};
pub use dispatch::{answer_point, AnswerDispatcher, REFERENCE_HEIGHT, REFERENCE_WIDTH};
pub use input::{EnigoPointer, PointerDevice};
pub use window::{WindowBounds, WindowTracker, XcapWindowTracker};
