//! Background answering loop.
//!
//! The worker owns a dedicated thread that repeatedly captures the
//! screen, recognizes the question on it, matches it against the bank
//! and clicks the answer, reporting everything it does over an event
//! channel.

pub mod events;
pub mod miss_log;
pub mod runner;

// Re-export main types
pub use events::{WorkerEvent, WorkerState};
pub use miss_log::MissLog;
pub use runner::{Worker, WorkerConfig, STOP_TIMEOUT};
