//! Reliability gate around the AI collaborator call
//!
//! Races each attempt against a timeout, retries with linear backoff, and
//! falls back to a deterministic result when the AI keeps failing or its
//! output fails validation. With a fallback configured this never errors:
//! the caller always gets a usable value plus provenance for it.

use crate::error::{Result, ResumeScorerError};
use crate::extraction::faillog::FailureLog;
use crate::extraction::validator::ValidationReport;
use crate::model::ConfidenceTier;
use log::{debug, warn};
use std::future::Future;
use std::time::Duration;
use tokio::time::{sleep, timeout};

/// Confidence tagged onto a fallback taken after validation rejected the
/// AI output.
const REJECTED_FALLBACK_CONFIDENCE: f64 = 0.5;

/// Confidence tagged onto a fallback taken after every attempt failed.
const EXHAUSTED_FALLBACK_CONFIDENCE: f64 = 0.3;

#[derive(Debug, Clone)]
pub struct ReliableCallConfig {
    pub timeout: Duration,
    pub retries: u32,
}

impl Default for ReliableCallConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            retries: 1,
        }
    }
}

/// How the returned value was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallSource {
    /// The AI call succeeded and passed validation.
    Ai,
    /// Validation rejected the AI output; the fallback value was used.
    FallbackAfterRejection,
    /// All attempts failed; the fallback value was used.
    FallbackAfterExhaustion,
}

#[derive(Debug, Clone)]
pub struct ReliableOutcome<T> {
    pub value: T,
    pub confidence: f64,
    pub tier: ConfidenceTier,
    pub source: CallSource,
}

/// Retry state machine: each attempt either succeeds, schedules the next
/// attempt, or exhausts the budget.
enum Attempt {
    Trying(u32),
    Exhausted,
}

/// Call `op` with timeout/retry/fallback semantics.
///
/// On success, `validate` inspects the value; a should-use-fallback verdict
/// routes to `fallback` tagged ACCEPTABLE. Transport and timeout failures
/// are logged, then retried with linear backoff (attempt × 1s) until
/// `retries` is exhausted, after which `fallback` is used tagged POOR.
/// Only when no fallback is configured does the last error propagate.
pub async fn reliable_call<T, F, Fut, V, FB>(
    op: F,
    validate: V,
    fallback: Option<FB>,
    config: &ReliableCallConfig,
    failure_log: &FailureLog,
    context: &str,
    input_preview: &str,
) -> Result<ReliableOutcome<T>>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T>>,
    V: Fn(&T) -> ValidationReport,
    FB: FnOnce() -> T,
{
    let max_attempts = config.retries + 1;
    let mut state = Attempt::Trying(1);
    let mut last_error: Option<ResumeScorerError> = None;

    loop {
        match state {
            Attempt::Trying(attempt) => {
                let result = match timeout(config.timeout, op()).await {
                    Ok(result) => result,
                    Err(_) => Err(ResumeScorerError::AiTimeout(config.timeout)),
                };

                match result {
                    Ok(value) => {
                        let report = validate(&value);
                        if report.should_use_fallback {
                            debug!(
                                "{}: AI output rejected (confidence {:.2}): {:?}",
                                context, report.confidence, report.issues
                            );
                            return match fallback {
                                Some(fb) => Ok(ReliableOutcome {
                                    value: fb(),
                                    confidence: REJECTED_FALLBACK_CONFIDENCE,
                                    tier: ConfidenceTier::Acceptable,
                                    source: CallSource::FallbackAfterRejection,
                                }),
                                None => Err(ResumeScorerError::Validation(format!(
                                    "{}: AI output rejected and no fallback configured",
                                    context
                                ))),
                            };
                        }
                        return Ok(ReliableOutcome {
                            value,
                            confidence: report.confidence,
                            tier: report.tier,
                            source: CallSource::Ai,
                        });
                    }
                    Err(error) => {
                        warn!("{}: attempt {} failed: {}", context, attempt, error);
                        if error.is_ai_failure() {
                            failure_log.record(context, &error, input_preview);
                        }
                        last_error = Some(error);

                        if attempt < max_attempts {
                            sleep(Duration::from_secs(attempt as u64)).await;
                            state = Attempt::Trying(attempt + 1);
                        } else {
                            state = Attempt::Exhausted;
                        }
                    }
                }
            }
            Attempt::Exhausted => {
                return match fallback {
                    Some(fb) => Ok(ReliableOutcome {
                        value: fb(),
                        confidence: EXHAUSTED_FALLBACK_CONFIDENCE,
                        tier: ConfidenceTier::Poor,
                        source: CallSource::FallbackAfterExhaustion,
                    }),
                    None => Err(last_error.unwrap_or_else(|| {
                        ResumeScorerError::AiTransport("no attempts were made".to_string())
                    })),
                };
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn accept(_: &String) -> ValidationReport {
        ValidationReport {
            is_valid: true,
            confidence: 0.95,
            issues: Vec::new(),
            should_use_fallback: false,
            tier: ConfidenceTier::Excellent,
        }
    }

    fn reject(_: &String) -> ValidationReport {
        ValidationReport {
            is_valid: false,
            confidence: 0.2,
            issues: vec!["bad shape".to_string()],
            should_use_fallback: true,
            tier: ConfidenceTier::Unreliable,
        }
    }

    fn test_log() -> (tempfile::TempDir, FailureLog) {
        let dir = tempfile::tempdir().unwrap();
        let log = FailureLog::new(dir.path().to_path_buf());
        (dir, log)
    }

    fn fast_config() -> ReliableCallConfig {
        ReliableCallConfig {
            timeout: Duration::from_millis(100),
            retries: 1,
        }
    }

    #[tokio::test]
    async fn test_success_passes_through() {
        let (_dir, log) = test_log();
        let outcome = reliable_call(
            || async { Ok("ai result".to_string()) },
            accept,
            Some(|| "fallback".to_string()),
            &fast_config(),
            &log,
            "test",
            "input",
        )
        .await
        .unwrap();

        assert_eq!(outcome.value, "ai result");
        assert_eq!(outcome.source, CallSource::Ai);
        assert_eq!(outcome.tier, ConfidenceTier::Excellent);
    }

    #[tokio::test]
    async fn test_rejected_output_takes_fallback() {
        let (_dir, log) = test_log();
        let outcome = reliable_call(
            || async { Ok("garbage".to_string()) },
            reject,
            Some(|| "fallback".to_string()),
            &fast_config(),
            &log,
            "test",
            "input",
        )
        .await
        .unwrap();

        assert_eq!(outcome.value, "fallback");
        assert_eq!(outcome.source, CallSource::FallbackAfterRejection);
        assert_eq!(outcome.confidence, 0.5);
        assert_eq!(outcome.tier, ConfidenceTier::Acceptable);
    }

    #[tokio::test(start_paused = true)]
    async fn test_transport_failure_retries_then_falls_back() {
        let (_dir, log) = test_log();
        let attempts = AtomicU32::new(0);
        let outcome = reliable_call(
            || {
                attempts.fetch_add(1, Ordering::SeqCst);
                async { Err::<String, _>(ResumeScorerError::AiTransport("down".to_string())) }
            },
            accept,
            Some(|| "fallback".to_string()),
            &fast_config(),
            &log,
            "test",
            "input",
        )
        .await
        .unwrap();

        assert_eq!(attempts.load(Ordering::SeqCst), 2);
        assert_eq!(outcome.value, "fallback");
        assert_eq!(outcome.source, CallSource::FallbackAfterExhaustion);
        assert_eq!(outcome.confidence, 0.3);
        assert_eq!(outcome.tier, ConfidenceTier::Poor);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_aborts_only_that_attempt() {
        let (_dir, log) = test_log();
        let attempts = AtomicU32::new(0);
        let outcome = reliable_call(
            || {
                let n = attempts.fetch_add(1, Ordering::SeqCst);
                async move {
                    if n == 0 {
                        // First attempt hangs past the timeout.
                        sleep(Duration::from_secs(10)).await;
                    }
                    Ok("recovered".to_string())
                }
            },
            accept,
            Some(|| "fallback".to_string()),
            &fast_config(),
            &log,
            "test",
            "input",
        )
        .await
        .unwrap();

        assert_eq!(outcome.value, "recovered");
        assert_eq!(outcome.source, CallSource::Ai);
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_fallback_propagates_error() {
        let (_dir, log) = test_log();
        let result = reliable_call(
            || async { Err::<String, _>(ResumeScorerError::AiTransport("down".to_string())) },
            accept,
            None::<fn() -> String>,
            &fast_config(),
            &log,
            "test",
            "input",
        )
        .await;

        assert!(matches!(result, Err(ResumeScorerError::AiTransport(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_failures_are_logged() {
        let (dir, log) = test_log();
        let _ = reliable_call(
            || async { Err::<String, _>(ResumeScorerError::AiTransport("down".to_string())) },
            accept,
            Some(|| "fallback".to_string()),
            &fast_config(),
            &log,
            "extraction",
            "job text",
        )
        .await
        .unwrap();

        let filename = format!("ai-failures-{}.jsonl", chrono::Utc::now().format("%Y-%m-%d"));
        let content = std::fs::read_to_string(dir.path().join(filename)).unwrap();
        // One record per failed attempt: initial try plus one retry.
        assert_eq!(content.lines().count(), 2);
    }
}
