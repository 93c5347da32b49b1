//! Template response composer
//!
//! Produces a complete answer without any external service. The message is
//! routed to one branch (see [`Route`]); every branch draws its numbers from
//! [`Figures`], so tone and phrase choice only ever change the wording.

pub mod figures;
pub mod phrases;
pub mod replies;
pub mod segments;
pub mod strategy;

pub use figures::{format_count, format_money, format_percent, Figures};
pub use segments::{match_segment, Audience, Demographic};
pub use strategy::{StrategyDocument, StrategyKind};

use crate::analysis::{MessageAnalysis, TimeContext};
use crate::chat::ToneMode;
use crate::metrics::METRICS;
use crate::snapshot::{MetricsSnapshot, Segment};
use rand::Rng;
use replies::Reply;
use std::fmt;
use tracing::debug;

/// Branch of the composer chosen for a message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Clarify,
    Greeting,
    SegmentStrategy,
    Strategy(StrategyKind),
    Question,
    Request,
    Conversational,
}

impl Route {
    /// Pick a branch; earlier checks win.
    pub fn select(ctx: &ComposeContext<'_>) -> Self {
        let analysis = ctx.analysis;
        if analysis.is_blank() {
            return Route::Clarify;
        }
        if analysis.is_greeting {
            return Route::Greeting;
        }
        // A segment named in a plain question gets an insight, not a plan.
        if ctx.segment.is_some() && analysis.is_request {
            return Route::SegmentStrategy;
        }
        if analysis.is_request {
            if let Some(kind) = StrategyKind::detect(ctx.message) {
                return Route::Strategy(kind);
            }
        }
        if analysis.is_question {
            return Route::Question;
        }
        if analysis.is_request {
            return Route::Request;
        }
        Route::Conversational
    }

    /// Metric label
    pub fn name(&self) -> &'static str {
        match self {
            Route::Clarify => "clarify",
            Route::Greeting => "greeting",
            Route::SegmentStrategy => "segment_strategy",
            Route::Strategy(kind) => kind.as_str(),
            Route::Question => "question",
            Route::Request => "request",
            Route::Conversational => "conversational",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Everything a branch may read, resolved once per request
#[derive(Debug, Clone)]
pub struct ComposeContext<'a> {
    pub message: &'a str,
    pub mode: ToneMode,
    pub analysis: &'a MessageAnalysis,
    pub snapshot: &'a MetricsSnapshot,
    pub time: &'a TimeContext,
    pub segment: Option<&'a Segment>,
    pub figures: Figures,
}

impl<'a> ComposeContext<'a> {
    pub fn new(
        message: &'a str,
        mode: ToneMode,
        analysis: &'a MessageAnalysis,
        snapshot: &'a MetricsSnapshot,
        time: &'a TimeContext,
    ) -> Self {
        Self {
            message,
            mode,
            analysis,
            snapshot,
            time,
            segment: match_segment(message, &snapshot.segments),
            figures: Figures::from_snapshot(snapshot),
        }
    }
}

/// Composer output
#[derive(Debug, Clone, PartialEq)]
pub struct Composition {
    pub text: String,
    pub insights: Vec<String>,
    pub recommendations: Vec<String>,
    pub route: Route,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateResponseComposer;

impl TemplateResponseComposer {
    pub fn new() -> Self {
        Self
    }

    /// Compose a reply. Always succeeds with non-empty text.
    pub fn compose<R: Rng + ?Sized>(&self, ctx: &ComposeContext<'_>, rng: &mut R) -> Composition {
        let route = Route::select(ctx);
        debug!("Composer route: {}", route);
        METRICS.record_route(route.name());

        let reply = match route {
            Route::Clarify => replies::clarify(ctx.mode),
            Route::Greeting => replies::greeting(ctx, rng),
            Route::SegmentStrategy => strategy::compose_segment_strategy(ctx, rng).into(),
            Route::Strategy(kind) => strategy::compose_strategy(kind, ctx, rng).into(),
            Route::Question => replies::question(ctx, rng),
            Route::Request => replies::request(ctx, rng),
            Route::Conversational => replies::conversational(ctx, rng),
        };

        let text = if reply.text.trim().is_empty() {
            replies::clarify_text(ctx.mode).to_string()
        } else {
            reply.text
        };

        Composition {
            text,
            insights: reply.insights,
            recommendations: reply.recommendations,
            route,
        }
    }
}

impl From<StrategyDocument> for Reply {
    fn from(doc: StrategyDocument) -> Self {
        Reply {
            text: doc.text,
            insights: doc.insights,
            recommendations: doc.recommendations,
        }
    }
}
