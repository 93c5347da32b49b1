//! Prompt construction for generation backends

use crate::analysis::{MessageAnalysis, TimeContext};
use crate::chat::ToneMode;
use crate::composer::figures::{format_count, format_money, format_percent, Figures};
use crate::snapshot::MetricsSnapshot;

/// Marker the model is asked to put before its follow-up suggestions
pub const SUGGESTIONS_MARKER: &str = "SUGGESTIONS:";

/// System and user halves of a backend prompt
#[derive(Debug, Clone, PartialEq)]
pub struct Prompt {
    pub system: String,
    pub user: String,
}

impl Prompt {
    /// Single-string form for backends without a system role
    pub fn render(&self) -> String {
        format!("{}\n\n{}", self.system, self.user)
    }
}

/// Builds persona, metrics, time and analysis blocks into a prompt
#[derive(Debug, Clone, Copy, Default)]
pub struct PromptBuilder;

impl PromptBuilder {
    pub fn new() -> Self {
        Self
    }

    pub fn build(
        &self,
        message: &str,
        mode: ToneMode,
        snapshot: &MetricsSnapshot,
        analysis: &MessageAnalysis,
        time: &TimeContext,
    ) -> Prompt {
        let system = format!(
            "{}\n\n{}\n\n{}\n\nMessage analysis: {}\n\n{}",
            persona(mode),
            metrics_block(snapshot),
            time_block(time),
            analysis.summary(),
            output_rules()
        );

        Prompt {
            system,
            user: message.trim().to_string(),
        }
    }
}

fn persona(mode: ToneMode) -> &'static str {
    match mode {
        ToneMode::Serious => {
            "You are a senior business analyst embedded in a company dashboard. \
             Answer precisely and professionally, ground every claim in the metrics \
             below, and prefer concrete next steps over generic advice."
        }
        ToneMode::Joking => {
            "You are a witty business sidekick embedded in a company dashboard. \
             Keep the facts exact and grounded in the metrics below, but deliver them \
             with light humor, playful metaphors and an upbeat voice."
        }
    }
}

fn metrics_block(snapshot: &MetricsSnapshot) -> String {
    let figures = Figures::from_snapshot(snapshot);
    let mut block = format!(
        "Current business metrics:\n\
         - Customers: {} (VIP {}, regular {}, new {}, inactive {})\n\
         - Total revenue: {}\n\
         - Revenue per customer: {}\n\
         - Average ROI: {}\n\
         - Engagement rate: {}\n\
         - Active campaigns: {}",
        format_count(snapshot.customer_count),
        format_count(snapshot.vip_count),
        format_count(snapshot.regular_count),
        format_count(snapshot.new_count),
        format_count(snapshot.inactive_count),
        format_money(figures.total_revenue),
        format_money(figures.revenue_per_customer),
        format_percent(figures.average_roi),
        format_percent(figures.engagement_rate),
        format_count(figures.active_campaigns),
    );

    if !snapshot.segments.is_empty() {
        block.push_str("\n- Discovered segments:");
        for segment in &snapshot.segments {
            block.push_str(&format!(
                "\n  * {} ({} customers)",
                segment.name,
                format_count(segment.count)
            ));
        }
    }
    block
}

fn time_block(time: &TimeContext) -> String {
    format!(
        "Time context: {} {}, {} business hours.",
        time.day_name(),
        time.time_of_day.as_str(),
        if time.is_business_hours { "during" } else { "outside" }
    )
}

fn output_rules() -> String {
    format!(
        "Reply in plain text, at most three short paragraphs. \
         Then write a line containing only {} followed by up to four short \
         follow-up questions the user could ask next, one per line.",
        SUGGESTIONS_MARKER
    )
}
