use anyhow::Context;
use std::fs;
use std::path::Path;

use super::model::QaRecord;
use crate::error::{AppError, Result};

/// Load question/answer records from a bank file.
///
/// Two layouts are accepted transparently: a single JSON array of records,
/// or one JSON object per line. Malformed entries are skipped with a
/// warning; only an unreadable file aborts the load.
pub fn load_bank(path: impl AsRef<Path>) -> Result<Vec<QaRecord>> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read bank file {}", path.display()))?;

    let records = if text.trim_start().starts_with('[') {
        parse_array(&text)?
    } else {
        parse_lines(&text)
    };

    tracing::info!(
        "Loaded {} records from bank file {}",
        records.len(),
        path.display()
    );
    Ok(records)
}

/// Whole-file JSON array. Entries that fail to deserialize are dropped
/// individually rather than failing the file.
fn parse_array(text: &str) -> Result<Vec<QaRecord>> {
    let values: Vec<serde_json::Value> =
        serde_json::from_str(text).context("Bank file is not a valid JSON array")?;

    let mut records = Vec::with_capacity(values.len());
    for (index, value) in values.into_iter().enumerate() {
        match serde_json::from_value::<QaRecord>(value) {
            Ok(record) => records.push(record),
            Err(e) => {
                let err = AppError::MalformedRecord(format!("entry {}: {}", index, e));
                tracing::warn!("Skipping {}", err);
            }
        }
    }
    Ok(records)
}

/// One JSON object per line. Blank lines are ignored, broken lines skipped.
fn parse_lines(text: &str) -> Vec<QaRecord> {
    let mut records = Vec::new();
    for (index, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match serde_json::from_str::<QaRecord>(line) {
            Ok(record) => records.push(record),
            Err(e) => {
                let err = AppError::MalformedRecord(format!("line {}: {}", index + 1, e));
                tracing::warn!("Skipping {}", err);
            }
        }
    }
    records
}
