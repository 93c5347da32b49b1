//! Chat pipeline: analyze, try backends, fall back to templates, suggest
//!
//! `respond` has no error path. Backends may fail in any way; the template
//! composer always produces an answer and the suggestion generator always
//! pads to a non-empty list.

use super::models::{ChatResult, ChatStage, ToneMode, TEMPLATE_ENGINE};
use super::random::{EntropyRandom, RandomSource, SeededRandom};
use crate::analysis::{Clock, MessageAnalyzer, TimeContextProvider};
use crate::backend::{build_backends, BackendOrchestrator};
use crate::config::AppConfig;
use crate::composer::replies::clarify_text;
use crate::composer::{match_segment, ComposeContext, TemplateResponseComposer};
use crate::metrics::METRICS;
use crate::snapshot::{
    JsonFileSnapshotSource, MetricsSnapshot, MetricsSnapshotProvider, SafeSnapshotProvider,
    StaticSnapshotProvider,
};
use crate::suggestions::SuggestionGenerator;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Answers one message at a time; safe to share across concurrent requests
pub struct ChatService {
    snapshots: Arc<dyn MetricsSnapshotProvider>,
    analyzer: MessageAnalyzer,
    time: TimeContextProvider,
    orchestrator: BackendOrchestrator,
    composer: TemplateResponseComposer,
    suggester: SuggestionGenerator,
    random: Arc<dyn RandomSource>,
}

impl ChatService {
    pub fn new(snapshots: Arc<dyn MetricsSnapshotProvider>, orchestrator: BackendOrchestrator) -> Self {
        Self {
            snapshots,
            analyzer: MessageAnalyzer::new(),
            time: TimeContextProvider::system(),
            orchestrator,
            composer: TemplateResponseComposer::new(),
            suggester: SuggestionGenerator::new(),
            random: Arc::new(EntropyRandom),
        }
    }

    /// Wire the service from configuration
    pub fn from_config(config: &AppConfig) -> Self {
        let snapshots: Arc<dyn MetricsSnapshotProvider> = match &config.chat.snapshot_path {
            Some(path) => {
                info!("Reading metrics snapshots from {}", path.display());
                Arc::new(SafeSnapshotProvider::new(JsonFileSnapshotSource::new(path.clone())))
            }
            None => {
                warn!("No snapshot_path configured, serving zeroed metrics");
                Arc::new(StaticSnapshotProvider::new(MetricsSnapshot::empty()))
            }
        };

        let orchestrator = BackendOrchestrator::new(
            build_backends(&config.backends),
            config.chat.min_response_chars,
        );

        let service = Self::new(snapshots, orchestrator);
        match config.chat.random_seed {
            Some(seed) => service.with_random(Arc::new(SeededRandom(seed))),
            None => service,
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.time = TimeContextProvider::new(clock);
        self
    }

    pub fn with_random(mut self, random: Arc<dyn RandomSource>) -> Self {
        self.random = random;
        self
    }

    pub fn orchestrator(&self) -> &BackendOrchestrator {
        &self.orchestrator
    }

    /// Answer a message in the requested tone
    pub async fn respond(&self, message: &str, mode: ToneMode) -> ChatResult {
        self.respond_traced(message, mode).await.0
    }

    /// Like [`respond`](Self::respond) but also returns the stages visited
    pub async fn respond_traced(&self, message: &str, mode: ToneMode) -> (ChatResult, Vec<ChatStage>) {
        let request_id = Uuid::new_v4();
        let start = Instant::now();
        let mut stages = vec![ChatStage::Analyzing];

        let analysis = self.analyzer.analyze(message);
        let snapshot = self.snapshots.snapshot().await;
        let time = self.time.now();
        debug!(
            "[{}] Analyzed message ({}), mode {}",
            request_id,
            analysis.summary(),
            mode
        );

        stages.push(ChatStage::BackendAttempt);
        let report = self
            .orchestrator
            .run(message, mode, &snapshot, &analysis, &time)
            .await;
        debug!("[{}] {} backend attempts", request_id, report.attempts.len());

        let (text, recommendations, segment, engine_used) = match report.reply {
            Some(reply) => {
                stages.push(ChatStage::Success);
                let segment = match_segment(message, &snapshot.segments);
                (reply.text, reply.suggestions, segment, reply.engine_used)
            }
            None => {
                stages.push(ChatStage::Fallback);
                let ctx = ComposeContext::new(message, mode, &analysis, &snapshot, &time);
                let mut rng = self.random.rng();
                let composition = self.composer.compose(&ctx, &mut rng);
                debug!("[{}] Composed fallback via {}", request_id, composition.route);
                (
                    composition.text,
                    composition.recommendations,
                    ctx.segment,
                    TEMPLATE_ENGINE.to_string(),
                )
            }
        };

        stages.push(ChatStage::Suggesting);
        let suggestions = self
            .suggester
            .suggest(&analysis, &snapshot, &recommendations, segment);

        let response_text = if text.trim().is_empty() {
            clarify_text(mode).to_string()
        } else {
            text
        };

        stages.push(ChatStage::Done);
        let elapsed = start.elapsed();
        METRICS.record_chat(&engine_used, elapsed.as_secs_f64());
        info!(
            "[{}] Answered with {} in {}ms",
            request_id,
            engine_used,
            elapsed.as_millis()
        );

        (
            ChatResult {
                response_text,
                suggestions,
                engine_used,
            },
            stages,
        )
    }
}
