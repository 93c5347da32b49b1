//! Follow-up suggestions shown under every answer

use crate::analysis::{MessageAnalysis, Topic};
use crate::snapshot::{MetricsSnapshot, Segment};
use indexmap::IndexSet;

/// Maximum number of suggestions returned
pub const MAX_SUGGESTIONS: usize = 4;

/// Padding used when nothing more specific applies
pub const DEFAULT_SUGGESTIONS: [&str; MAX_SUGGESTIONS] = [
    "Show me a business overview",
    "Create a marketing campaign",
    "Analyze my customer segments",
    "How can I increase revenue?",
];

const MAX_RECOMMENDATION_CHARS: usize = 60;

fn topic_suggestions(topic: Topic) -> [&'static str; 2] {
    match topic {
        Topic::Business => ["Show me a business overview", "What are my key metrics?"],
        Topic::Customers => ["How many VIP customers do I have?", "Plan a win-back campaign"],
        Topic::Revenue => ["How can I increase revenue?", "What is my revenue per customer?"],
        Topic::Campaigns => ["Create a marketing campaign", "How are my campaigns performing?"],
        Topic::Analytics => ["Show my engagement trends", "Set up a KPI dashboard"],
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SuggestionGenerator;

impl SuggestionGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Up to four unique suggestions, most specific first.
    ///
    /// Order: the top recommendation, segment follow-ups, topic follow-ups,
    /// then the default set as padding.
    pub fn suggest(
        &self,
        analysis: &MessageAnalysis,
        snapshot: &MetricsSnapshot,
        recommendations: &[String],
        matched_segment: Option<&Segment>,
    ) -> Vec<String> {
        let mut ordered: IndexSet<String> = IndexSet::new();

        if let Some(top) = recommendations.iter().find_map(|r| abbreviate(r)) {
            ordered.insert(top);
        }

        if let Some(segment) = matched_segment {
            ordered.insert(format!("Create a campaign for {}", segment.name));
            ordered.insert(format!("Show insights for {}", segment.name));
        } else if analysis.has_topic(Topic::Customers) {
            if let Some(largest) = snapshot.segments.iter().max_by_key(|s| s.count) {
                ordered.insert(format!("Show insights for {}", largest.name));
            }
        }

        for topic in &analysis.topics {
            for suggestion in topic_suggestions(*topic) {
                ordered.insert(suggestion.to_string());
            }
        }

        for suggestion in DEFAULT_SUGGESTIONS {
            ordered.insert(suggestion.to_string());
        }

        ordered.into_iter().take(MAX_SUGGESTIONS).collect()
    }
}

/// First sentence of a recommendation, cut to a clickable length
fn abbreviate(recommendation: &str) -> Option<String> {
    let first = recommendation
        .split(['.', ';', '!'])
        .next()
        .unwrap_or_default()
        .trim();
    if first.is_empty() {
        return None;
    }
    if first.chars().count() <= MAX_RECOMMENDATION_CHARS {
        return Some(first.to_string());
    }

    let mut out = String::new();
    for word in first.split_whitespace() {
        if out.chars().count() + word.chars().count() + 1 > MAX_RECOMMENDATION_CHARS {
            break;
        }
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(word);
    }
    let out = out.trim_end_matches([',', ':']).to_string();
    if out.is_empty() {
        None
    } else {
        Some(format!("{}...", out))
    }
}
