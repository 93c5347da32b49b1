//! Keyword and pattern based message classification

use super::models::{MessageAnalysis, Sentiment, Topic};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeSet;

static GREETING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^\s*(hi|hello|hey|hiya|howdy|greetings|yo|sup|hola|good\s+(morning|afternoon|evening|day)|what'?s\s+up)\b",
    )
    .expect("greeting pattern")
});

static QUESTION_START: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^\s*(what|what's|how|why|when|where|who|which|whose|can|could|would|should|is|are|am|do|does|did|will|shall|may|have|has)\b",
    )
    .expect("question pattern")
});

static REQUEST: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(create|make|build|generate|design|plan|launch|start|set\s+up|setup|draft|write|give\s+me|show\s+me|tell\s+me|help|suggest|recommend|need|want|would\s+like|i'd\s+like|let's|optimi[sz]e|improve|increase|boost|grow|reduce|analy[sz]e|prepare|develop|run)\b|\b(campaign|strategy|plan|promotion)\s+(for|to|targeting|aimed)\b",
    )
    .expect("request pattern")
});

static TOPICS: Lazy<Vec<(Topic, Regex)>> = Lazy::new(|| {
    let table = [
        (
            Topic::Business,
            r"(?i)\b(business|company|performance|overview|dashboard|kpis?|summary|operations?|status)\b",
        ),
        (
            Topic::Customers,
            r"(?i)\b(customers?|clients?|audiences?|users?|segments?|segmentation|vips?|churn|retention|retain|loyal|loyalty|shoppers?|buyers?|members?|demographics?)\b",
        ),
        (
            Topic::Revenue,
            r"(?i)\b(revenue|sales|income|profits?|money|roi|earnings|growth|grow|margins?|pricing|budget)\b",
        ),
        (
            Topic::Campaigns,
            r"(?i)\b(campaigns?|marketing|promotions?|promos?|ads?|advertising|email|newsletters?|outreach|launch)\b",
        ),
        (
            Topic::Analytics,
            r"(?i)\b(analytics|data|reports?|reporting|metrics?|trends?|insights?|stats|statistics|engagement|kpis?|forecasts?|analy[sz]e|analysis)\b",
        ),
    ];
    table
        .into_iter()
        .map(|(topic, pattern)| (topic, Regex::new(pattern).expect("topic pattern")))
        .collect()
});

static POSITIVE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(thank\w*|great|perfect|awesome|excellent|good|happy|love|loved|appreciate\w*|wonderful|fantastic|amazing|helpful|nice|excited)\b",
    )
    .expect("positive pattern")
});

static NEGATIVE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(angry|frustrat\w*|terrible|awful|horrible|worst|hate|hated|disappointed|disappointing|bad|problems?|issues?|broken|failed|failing|worried|worrying|struggling|declining|losing|stuck)\b",
    )
    .expect("negative pattern")
});

/// Classifies raw messages into intent flags, topics and sentiment
#[derive(Debug, Clone, Copy, Default)]
pub struct MessageAnalyzer;

impl MessageAnalyzer {
    pub fn new() -> Self {
        Self
    }

    /// Analyze a message. Never fails; blank input yields an empty analysis.
    pub fn analyze(&self, text: &str) -> MessageAnalysis {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return MessageAnalysis::empty();
        }

        let topics: BTreeSet<Topic> = TOPICS
            .iter()
            .filter(|(_, pattern)| pattern.is_match(trimmed))
            .map(|(topic, _)| *topic)
            .collect();

        MessageAnalysis {
            is_greeting: GREETING.is_match(trimmed),
            is_question: trimmed.contains('?') || QUESTION_START.is_match(trimmed),
            is_request: REQUEST.is_match(trimmed),
            topics,
            sentiment: detect_sentiment(trimmed),
            char_count: trimmed.chars().count(),
            word_count: trimmed.split_whitespace().count(),
        }
    }
}

fn detect_sentiment(text: &str) -> Sentiment {
    let positive = POSITIVE.find_iter(text).count();
    let negative = NEGATIVE.find_iter(text).count();

    if positive > negative {
        Sentiment::Positive
    } else if negative > positive {
        Sentiment::Negative
    } else {
        Sentiment::Neutral
    }
}
