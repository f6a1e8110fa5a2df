use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

/// Best-effort file log of questions the bank had no answer for.
///
/// Lines accumulate across runs so the bank can be extended later. A
/// failed write is worth a warning, never an error.
pub struct MissLog {
    path: PathBuf,
}

impl MissLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Append one cleaned question as a single line.
    pub fn append(&self, question: &str) {
        if let Err(e) = self.try_append(question) {
            tracing::warn!(
                "Failed to record unmatched question in {}: {}",
                self.path.display(),
                e
            );
        }
    }

    fn try_append(&self, question: &str) -> std::io::Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(question.as_bytes())?;
        file.write_all(b"\n")
    }
}
