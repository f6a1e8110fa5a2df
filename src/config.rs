use std::env;

use crate::matching::DEFAULT_THRESHOLD;

/// Runtime settings, read from the environment with sensible defaults.
///
/// Only the capture region changes after startup (through the worker
/// handle); everything here is fixed once the worker is constructed.
#[derive(Debug, Clone)]
pub struct Config {
    pub bank_path: String,
    pub window_title: String,
    pub poll_interval_ms: u64,
    pub min_interval_ms: u64,
    pub match_threshold: i32,
    pub miss_log_path: String,
    pub ocr_command: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            bank_path: env::var("AUTOQUIZ_BANK")
                .unwrap_or_else(|_| "data/questions.json".to_string()),
            window_title: env::var("AUTOQUIZ_WINDOW")
                .unwrap_or_else(|_| "咸鱼游戏".to_string()),
            poll_interval_ms: env::var("AUTOQUIZ_POLL_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(500),
            min_interval_ms: env::var("AUTOQUIZ_MIN_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(1000),
            match_threshold: env::var("AUTOQUIZ_THRESHOLD")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_THRESHOLD),
            miss_log_path: env::var("AUTOQUIZ_MISS_LOG")
                .unwrap_or_else(|_| "unmatched.log".to_string()),
            ocr_command: env::var("AUTOQUIZ_OCR_CMD")
                .unwrap_or_else(|_| "tesseract stdin stdout -l chi_sim".to_string()),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bank_path: "data/questions.json".to_string(),
            window_title: "咸鱼游戏".to_string(),
            poll_interval_ms: 500,
            min_interval_ms: 1000,
            match_threshold: DEFAULT_THRESHOLD,
            miss_log_path: "unmatched.log".to_string(),
            ocr_command: "tesseract stdin stdout -l chi_sim".to_string(),
        }
    }
}
