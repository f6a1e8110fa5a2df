//! Question bank: record model and file loading.
//!
//! The bank is loaded once before the worker starts and treated as
//! read-only for the worker's lifetime.

pub mod loader;
pub mod model;

// Re-export main types
pub use loader::load_bank;
pub use model::{AnswerLabel, QaRecord};
