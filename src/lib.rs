//! Screen quiz answering bot.
//!
//! Watches a region of the screen, reads the question on it, finds the
//! best match in a local question bank and clicks the matching answer
//! in the target window.

pub mod bank;
pub mod config;
pub mod desktop;
pub mod error;
pub mod matching;
pub mod ocr;
pub mod worker;

// Re-export main types
pub use bank::{AnswerLabel, QaRecord};
pub use config::Config;
pub use error::{AppError, Result};
pub use worker::{Worker, WorkerConfig, WorkerEvent, WorkerState};
