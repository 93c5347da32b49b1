//! Sequential, first-acceptable-wins backend orchestration

use super::client::{BackendError, GenerationBackend};
use super::prompt::{PromptBuilder, SUGGESTIONS_MARKER};
use crate::analysis::{MessageAnalysis, TimeContext};
use crate::chat::{backend_engine_tag, ToneMode};
use crate::metrics::METRICS;
use crate::snapshot::MetricsSnapshot;
use once_cell::sync::Lazy;
use regex::Regex;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Accepted completions must be strictly longer than this
pub const DEFAULT_MIN_RESPONSE_CHARS: usize = 20;

const MAX_BACKEND_SUGGESTIONS: usize = 4;

/// The suggestions block only starts on a line holding nothing but the marker.
static SUGGESTIONS_BLOCK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?mi)^[ \t]*{}[ \t]*\r?$",
        regex::escape(SUGGESTIONS_MARKER)
    ))
    .expect("suggestions marker pattern")
});

/// Result of one backend attempt
#[derive(Debug, Clone, PartialEq)]
pub enum AttemptOutcome {
    Success(String),
    Failure(String),
}

/// Record of one orchestrator try
#[derive(Debug, Clone)]
pub struct GenerationAttempt {
    pub backend_name: String,
    pub prompt: String,
    pub timeout_ms: u64,
    pub outcome: AttemptOutcome,
    pub elapsed_ms: u64,
}

impl GenerationAttempt {
    pub fn succeeded(&self) -> bool {
        matches!(self.outcome, AttemptOutcome::Success(_))
    }
}

/// Accepted backend answer
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedReply {
    pub text: String,
    pub suggestions: Vec<String>,
    pub engine_used: String,
}

/// Accepted reply (if any) plus every attempt made
#[derive(Debug, Clone)]
pub struct OrchestrationReport {
    pub reply: Option<GeneratedReply>,
    pub attempts: Vec<GenerationAttempt>,
}

/// Tries configured backends in priority order
pub struct BackendOrchestrator {
    backends: Vec<Arc<dyn GenerationBackend>>,
    prompts: PromptBuilder,
    min_response_chars: usize,
}

impl BackendOrchestrator {
    pub fn new(backends: Vec<Arc<dyn GenerationBackend>>, min_response_chars: usize) -> Self {
        Self {
            backends,
            prompts: PromptBuilder::new(),
            min_response_chars,
        }
    }

    /// Orchestrator with no backends; every request falls back to templates
    pub fn empty() -> Self {
        Self::new(Vec::new(), DEFAULT_MIN_RESPONSE_CHARS)
    }

    pub fn backend_names(&self) -> Vec<&str> {
        self.backends.iter().map(|b| b.name()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.backends.is_empty()
    }

    /// First acceptable reply, or `None` when every backend was rejected
    pub async fn generate(
        &self,
        message: &str,
        mode: ToneMode,
        snapshot: &MetricsSnapshot,
        analysis: &MessageAnalysis,
        time: &TimeContext,
    ) -> Option<GeneratedReply> {
        self.run(message, mode, snapshot, analysis, time).await.reply
    }

    /// Like [`generate`](Self::generate) but also returns the attempt log
    pub async fn run(
        &self,
        message: &str,
        mode: ToneMode,
        snapshot: &MetricsSnapshot,
        analysis: &MessageAnalysis,
        time: &TimeContext,
    ) -> OrchestrationReport {
        let mut attempts = Vec::with_capacity(self.backends.len());

        if message.trim().is_empty() {
            debug!("Blank message, skipping generation backends");
            return OrchestrationReport {
                reply: None,
                attempts,
            };
        }

        let prompt = self.prompts.build(message, mode, snapshot, analysis, time);
        let rendered = prompt.render();

        for backend in &self.backends {
            let name = backend.name().to_string();
            let timeout = backend.timeout();
            let start = Instant::now();

            // Dropping the invoke future on timeout cancels the in-flight request.
            let call = backend.invoke(&prompt, mode, timeout);
            let result = match tokio::time::timeout(timeout, call).await {
                Ok(result) => result,
                Err(_) => Err(BackendError::Timeout(format!(
                    "no response within {}ms",
                    timeout.as_millis()
                ))),
            };
            let result = result.and_then(|raw| parse_reply(&raw, self.min_response_chars));

            let elapsed = start.elapsed();
            let outcome_label = match &result {
                Ok(_) => "success",
                Err(e) => e.kind(),
            };
            METRICS.record_backend_attempt(&name, outcome_label, elapsed.as_secs_f64());

            let mut attempt = GenerationAttempt {
                backend_name: name.clone(),
                prompt: rendered.clone(),
                timeout_ms: timeout.as_millis() as u64,
                outcome: AttemptOutcome::Failure(String::new()),
                elapsed_ms: elapsed.as_millis() as u64,
            };

            match result {
                Ok((text, suggestions)) => {
                    info!(
                        "Backend {} answered in {}ms ({} chars)",
                        name,
                        attempt.elapsed_ms,
                        text.chars().count()
                    );
                    attempt.outcome = AttemptOutcome::Success(text.clone());
                    attempts.push(attempt);
                    return OrchestrationReport {
                        reply: Some(GeneratedReply {
                            text,
                            suggestions,
                            engine_used: backend_engine_tag(&name),
                        }),
                        attempts,
                    };
                }
                Err(e) => {
                    warn!(
                        "Backend {} rejected after {}ms: {}",
                        name, attempt.elapsed_ms, e
                    );
                    attempt.outcome = AttemptOutcome::Failure(e.to_string());
                    attempts.push(attempt);
                }
            }
        }

        if !self.backends.is_empty() {
            warn!(
                "All {} generation backends rejected, falling back to templates",
                self.backends.len()
            );
        }

        OrchestrationReport {
            reply: None,
            attempts,
        }
    }
}

/// Split raw model output into answer text and follow-up suggestions
fn parse_reply(raw: &str, min_chars: usize) -> Result<(String, Vec<String>), BackendError> {
    let (body, tail) = match SUGGESTIONS_BLOCK.find(raw) {
        Some(m) => (&raw[..m.start()], &raw[m.end()..]),
        None => (raw, ""),
    };

    let text = body.trim().to_string();
    let length = text.chars().count();
    if length <= min_chars {
        return Err(BackendError::TooShort(length));
    }

    let mut suggestions: Vec<String> = Vec::new();
    for line in tail.lines() {
        let cleaned = clean_suggestion(line);
        if !cleaned.is_empty() && !suggestions.contains(&cleaned) {
            suggestions.push(cleaned);
        }
        if suggestions.len() == MAX_BACKEND_SUGGESTIONS {
            break;
        }
    }

    Ok((text, suggestions))
}

fn clean_suggestion(line: &str) -> String {
    line.trim()
        .trim_start_matches(|c: char| c.is_ascii_digit())
        .trim_start_matches(['-', '*', '.', ')', '•'])
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::prompt::Prompt;
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    struct ScriptedBackend {
        name: String,
        reply: Result<String, BackendError>,
        delay: Duration,
        calls: AtomicUsize,
    }

    impl ScriptedBackend {
        fn new(name: &str, reply: Result<&str, BackendError>) -> Arc<Self> {
            Arc::new(Self {
                name: name.to_string(),
                reply: reply.map(str::to_string),
                delay: Duration::ZERO,
                calls: AtomicUsize::new(0),
            })
        }

        fn slow(name: &str, delay: Duration) -> Arc<Self> {
            Arc::new(Self {
                name: name.to_string(),
                reply: Ok("This answer arrives far too late to matter.".to_string()),
                delay,
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl GenerationBackend for ScriptedBackend {
        fn name(&self) -> &str {
            &self.name
        }

        fn timeout(&self) -> Duration {
            Duration::from_millis(50)
        }

        async fn invoke(
            &self,
            _prompt: &Prompt,
            _mode: ToneMode,
            _timeout: Duration,
        ) -> Result<String, BackendError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            self.reply.clone()
        }
    }

    fn inputs() -> (MetricsSnapshot, MessageAnalysis, TimeContext) {
        let time = TimeContext::at(
            NaiveDate::from_ymd_opt(2024, 3, 6)
                .unwrap()
                .and_hms_opt(10, 0, 0)
                .unwrap(),
        );
        (MetricsSnapshot::from_breakdown(1, 2, 3, 4), MessageAnalysis::empty(), time)
    }

    async fn run(orchestrator: &BackendOrchestrator, message: &str) -> OrchestrationReport {
        let (snapshot, analysis, time) = inputs();
        orchestrator
            .run(message, ToneMode::Serious, &snapshot, &analysis, &time)
            .await
    }

    #[tokio::test]
    async fn test_empty_backend_list_returns_none() {
        let report = run(&BackendOrchestrator::empty(), "How is revenue?").await;
        assert!(report.reply.is_none());
        assert!(report.attempts.is_empty());
    }

    #[tokio::test]
    async fn test_first_acceptable_wins() {
        let first = ScriptedBackend::new("first", Ok("Revenue is trending up nicely this quarter."));
        let second = ScriptedBackend::new("second", Ok("A second answer that is never requested."));
        let backends: Vec<Arc<dyn GenerationBackend>> = vec![first.clone(), second.clone()];
        let orchestrator = BackendOrchestrator::new(backends, DEFAULT_MIN_RESPONSE_CHARS);

        let report = run(&orchestrator, "How is revenue?").await;
        let reply = report.reply.unwrap();
        assert_eq!(reply.engine_used, "external-backend:first");
        assert_eq!(first.calls.load(Ordering::SeqCst), 1);
        assert_eq!(second.calls.load(Ordering::SeqCst), 0);
        assert_eq!(report.attempts.len(), 1);
        assert!(report.attempts[0].succeeded());
    }

    #[tokio::test]
    async fn test_falls_through_rejections() {
        let failing = ScriptedBackend::new(
            "failing",
            Err(BackendError::UpstreamError("Status 500".to_string())),
        );
        let short = ScriptedBackend::new("short", Ok("ok"));
        let slow = ScriptedBackend::slow("slow", Duration::from_millis(500));
        let good = ScriptedBackend::new("good", Ok("Here is a complete and useful answer."));
        let backends: Vec<Arc<dyn GenerationBackend>> = vec![failing, short, slow, good];
        let orchestrator = BackendOrchestrator::new(backends, DEFAULT_MIN_RESPONSE_CHARS);

        let report = run(&orchestrator, "How is revenue?").await;
        assert_eq!(report.reply.unwrap().engine_used, "external-backend:good");
        assert_eq!(report.attempts.len(), 4);
        assert!(matches!(&report.attempts[1].outcome, AttemptOutcome::Failure(r) if r.contains("too short")));
        assert!(matches!(&report.attempts[2].outcome, AttemptOutcome::Failure(r) if r.contains("Timeout")));
        assert!(report.attempts[2].elapsed_ms < 400);
    }

    #[tokio::test]
    async fn test_all_rejected_returns_none() {
        let slow = ScriptedBackend::slow("slow", Duration::from_millis(500));
        let backends: Vec<Arc<dyn GenerationBackend>> = vec![slow];
        let orchestrator = BackendOrchestrator::new(backends, DEFAULT_MIN_RESPONSE_CHARS);
        let report = run(&orchestrator, "hello").await;
        assert!(report.reply.is_none());
        assert_eq!(report.attempts[0].timeout_ms, 50);
    }

    #[tokio::test]
    async fn test_blank_message_skips_backends() {
        let backend = ScriptedBackend::new("local", Ok("An answer to nothing at all, apparently."));
        let backends: Vec<Arc<dyn GenerationBackend>> = vec![backend.clone()];
        let orchestrator = BackendOrchestrator::new(backends, DEFAULT_MIN_RESPONSE_CHARS);
        let report = run(&orchestrator, "   ").await;
        assert!(report.reply.is_none());
        assert_eq!(backend.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_parse_reply_extracts_suggestions() {
        let raw = "Revenue grew 12% this month.\n\nSuggestions:\n1. Show revenue by segment\n- Compare to last quarter\n\n* Show revenue by segment";
        let (text, suggestions) = parse_reply(raw, 10).unwrap();
        assert_eq!(text, "Revenue grew 12% this month.");
        assert_eq!(
            suggestions,
            vec!["Show revenue by segment", "Compare to last quarter"]
        );
    }

    #[test]
    fn test_parse_reply_keeps_inline_marker_text() {
        let raw = "Here are my suggestions: focus on VIP retention, since your 150 VIPs drive most of the $284,700 revenue this quarter.";
        let (text, suggestions) = parse_reply(raw, DEFAULT_MIN_RESPONSE_CHARS).unwrap();
        assert_eq!(text, raw);
        assert!(suggestions.is_empty());

        let with_block = format!("{}\n  suggestions:  \n- Plan a VIP upsell", raw);
        let (text, suggestions) = parse_reply(&with_block, DEFAULT_MIN_RESPONSE_CHARS).unwrap();
        assert_eq!(text, raw);
        assert_eq!(suggestions, vec!["Plan a VIP upsell"]);
    }

    #[test]
    fn test_parse_reply_threshold_is_exclusive() {
        let exact = "a".repeat(20);
        assert_eq!(parse_reply(&exact, 20), Err(BackendError::TooShort(20)));
        assert!(parse_reply(&"a".repeat(21), 20).is_ok());
    }

    #[tokio::test]
    async fn test_inline_suggestions_phrase_is_accepted() {
        let answer = "Here are my suggestions: focus on VIP retention, since your VIPs drive most of the revenue.";
        let backend = ScriptedBackend::new("local", Ok(answer));
        let backends: Vec<Arc<dyn GenerationBackend>> = vec![backend];
        let orchestrator = BackendOrchestrator::new(backends, DEFAULT_MIN_RESPONSE_CHARS);

        let reply = run(&orchestrator, "How can I grow revenue?").await.reply.unwrap();
        assert_eq!(reply.engine_used, "external-backend:local");
        assert_eq!(reply.text, answer);
    }

    #[test]
    fn test_parse_reply_rejects_short_text() {
        assert_eq!(parse_reply("  hi  ", 20), Err(BackendError::TooShort(2)));
        assert_eq!(
            parse_reply("SUGGESTIONS:\n- a", 1),
            Err(BackendError::TooShort(0))
        );
    }
}
