//! Append-only failure log for AI collaborator errors
//!
//! One JSON record per failure, partitioned by day. Logging must never
//! block or fail the scoring path: write errors downgrade to a warning.

use crate::error::ResumeScorerError;
use chrono::Utc;
use log::warn;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::PathBuf;

/// How much of the offending input is kept in the record.
const INPUT_PREVIEW_LEN: usize = 200;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailureRecord {
    pub timestamp: String,
    pub context: String,
    pub error: FailureError,
    pub input_preview: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailureError {
    pub message: String,
    pub code: String,
}

/// Day-partitioned JSONL sink for AI failures.
#[derive(Debug, Clone)]
pub struct FailureLog {
    dir: PathBuf,
}

impl FailureLog {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Append one failure record. Never returns an error; problems writing
    /// the log are reported via `warn!` and swallowed.
    pub fn record(&self, context: &str, error: &ResumeScorerError, input: &str) {
        let record = FailureRecord {
            timestamp: Utc::now().to_rfc3339(),
            context: context.to_string(),
            error: FailureError {
                message: error.to_string(),
                code: error.code().to_string(),
            },
            input_preview: truncate(input, INPUT_PREVIEW_LEN),
        };

        if let Err(e) = self.append(&record) {
            warn!("failed to write AI failure record: {}", e);
        }
    }

    fn append(&self, record: &FailureRecord) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.dir)?;
        let filename = format!("ai-failures-{}.jsonl", Utc::now().format("%Y-%m-%d"));
        let path = self.dir.join(filename);

        let line = serde_json::to_string(record)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;

        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)?;
        writeln!(file, "{}", line)
    }
}

fn truncate(input: &str, limit: usize) -> String {
    input.chars().take(limit).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_are_appended_as_jsonl() {
        let dir = tempfile::tempdir().unwrap();
        let log = FailureLog::new(dir.path().to_path_buf());
        let error = ResumeScorerError::AiTransport("connection refused".to_string());

        log.record("requirement extraction", &error, "some job text");
        log.record("requirement extraction", &error, "other job text");

        let filename = format!("ai-failures-{}.jsonl", Utc::now().format("%Y-%m-%d"));
        let content = std::fs::read_to_string(dir.path().join(filename)).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);

        let record: FailureRecord = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(record.context, "requirement extraction");
        assert_eq!(record.error.code, "ai_transport");
        assert_eq!(record.input_preview, "some job text");
    }

    #[test]
    fn test_input_preview_is_truncated() {
        let dir = tempfile::tempdir().unwrap();
        let log = FailureLog::new(dir.path().to_path_buf());
        let error = ResumeScorerError::AiTransport("boom".to_string());
        let long_input = "x".repeat(1000);

        log.record("ctx", &error, &long_input);

        let filename = format!("ai-failures-{}.jsonl", Utc::now().format("%Y-%m-%d"));
        let content = std::fs::read_to_string(dir.path().join(filename)).unwrap();
        let record: FailureRecord = serde_json::from_str(content.lines().next().unwrap()).unwrap();
        assert_eq!(record.input_preview.len(), INPUT_PREVIEW_LEN);
    }

    #[test]
    fn test_unwritable_directory_never_fails() {
        // Pointing at a file path instead of a directory makes the write
        // fail; record must still return without error.
        let file = tempfile::NamedTempFile::new().unwrap();
        let log = FailureLog::new(file.path().to_path_buf());
        let error = ResumeScorerError::AiTransport("boom".to_string());
        log.record("ctx", &error, "input");
    }
}
