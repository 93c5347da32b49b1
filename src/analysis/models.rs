//! Data models for message and time analysis

use chrono::Weekday;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Business topic mentioned by a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Topic {
    Business,
    Customers,
    Revenue,
    Campaigns,
    Analytics,
}

impl Topic {
    pub const ALL: [Topic; 5] = [
        Topic::Business,
        Topic::Customers,
        Topic::Revenue,
        Topic::Campaigns,
        Topic::Analytics,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Topic::Business => "business",
            Topic::Customers => "customers",
            Topic::Revenue => "revenue",
            Topic::Campaigns => "campaigns",
            Topic::Analytics => "analytics",
        }
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Overall sentiment of a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

impl Sentiment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Positive => "positive",
            Sentiment::Negative => "negative",
            Sentiment::Neutral => "neutral",
        }
    }
}

/// Per-request classification of a raw message
///
/// Intent flags are not mutually exclusive; the dominant intent is resolved
/// by whoever branches on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageAnalysis {
    pub is_greeting: bool,
    pub is_question: bool,
    pub is_request: bool,
    pub topics: BTreeSet<Topic>,
    pub sentiment: Sentiment,
    pub char_count: usize,
    pub word_count: usize,
}

impl MessageAnalysis {
    /// Analysis of an empty or whitespace-only message
    pub fn empty() -> Self {
        Self {
            is_greeting: false,
            is_question: false,
            is_request: false,
            topics: BTreeSet::new(),
            sentiment: Sentiment::Neutral,
            char_count: 0,
            word_count: 0,
        }
    }

    pub fn is_blank(&self) -> bool {
        self.word_count == 0
    }

    pub fn has_topic(&self, topic: Topic) -> bool {
        self.topics.contains(&topic)
    }

    /// First topic in declaration order
    pub fn primary_topic(&self) -> Option<Topic> {
        self.topics.iter().next().copied()
    }

    /// One-line description for prompts and logs
    pub fn summary(&self) -> String {
        let mut intents = Vec::new();
        if self.is_greeting {
            intents.push("greeting");
        }
        if self.is_question {
            intents.push("question");
        }
        if self.is_request {
            intents.push("request");
        }
        if intents.is_empty() {
            intents.push("conversational");
        }

        let topics = if self.topics.is_empty() {
            "none".to_string()
        } else {
            self.topics
                .iter()
                .map(Topic::as_str)
                .collect::<Vec<_>>()
                .join(", ")
        };

        format!(
            "intents: {}; topics: {}; sentiment: {}; words: {}",
            intents.join(", "),
            topics,
            self.sentiment.as_str(),
            self.word_count
        )
    }
}

/// Coarse time-of-day bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TimeOfDay {
    EarlyMorning,
    Morning,
    Afternoon,
    Evening,
    Night,
}

impl TimeOfDay {
    /// Bucket an hour in 0..24
    pub fn from_hour(hour: u32) -> Self {
        match hour {
            0..=5 => TimeOfDay::EarlyMorning,
            6..=11 => TimeOfDay::Morning,
            12..=16 => TimeOfDay::Afternoon,
            17..=19 => TimeOfDay::Evening,
            _ => TimeOfDay::Night,
        }
    }

    pub fn greeting(&self) -> &'static str {
        match self {
            TimeOfDay::EarlyMorning => "Good early morning",
            TimeOfDay::Morning => "Good morning",
            TimeOfDay::Afternoon => "Good afternoon",
            TimeOfDay::Evening => "Good evening",
            TimeOfDay::Night => "Hello, night owl",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TimeOfDay::EarlyMorning => "early morning",
            TimeOfDay::Morning => "morning",
            TimeOfDay::Afternoon => "afternoon",
            TimeOfDay::Evening => "evening",
            TimeOfDay::Night => "night",
        }
    }
}

/// Wall-clock context used to flavor greetings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeContext {
    pub time_of_day: TimeOfDay,
    pub day_of_week: Weekday,
    pub hour: u32,
    pub is_business_hours: bool,
    pub greeting: String,
}

impl TimeContext {
    pub fn is_weekend(&self) -> bool {
        matches!(self.day_of_week, Weekday::Sat | Weekday::Sun)
    }

    pub fn day_name(&self) -> &'static str {
        match self.day_of_week {
            Weekday::Mon => "Monday",
            Weekday::Tue => "Tuesday",
            Weekday::Wed => "Wednesday",
            Weekday::Thu => "Thursday",
            Weekday::Fri => "Friday",
            Weekday::Sat => "Saturday",
            Weekday::Sun => "Sunday",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_of_day_boundaries() {
        assert_eq!(TimeOfDay::from_hour(0), TimeOfDay::EarlyMorning);
        assert_eq!(TimeOfDay::from_hour(5), TimeOfDay::EarlyMorning);
        assert_eq!(TimeOfDay::from_hour(6), TimeOfDay::Morning);
        assert_eq!(TimeOfDay::from_hour(11), TimeOfDay::Morning);
        assert_eq!(TimeOfDay::from_hour(12), TimeOfDay::Afternoon);
        assert_eq!(TimeOfDay::from_hour(16), TimeOfDay::Afternoon);
        assert_eq!(TimeOfDay::from_hour(17), TimeOfDay::Evening);
        assert_eq!(TimeOfDay::from_hour(19), TimeOfDay::Evening);
        assert_eq!(TimeOfDay::from_hour(20), TimeOfDay::Night);
        assert_eq!(TimeOfDay::from_hour(23), TimeOfDay::Night);
    }

    #[test]
    fn test_summary_defaults_to_conversational() {
        let analysis = MessageAnalysis::empty();
        assert_eq!(
            analysis.summary(),
            "intents: conversational; topics: none; sentiment: neutral; words: 0"
        );
    }

    #[test]
    fn test_primary_topic_follows_declaration_order() {
        let mut analysis = MessageAnalysis::empty();
        analysis.topics.insert(Topic::Analytics);
        analysis.topics.insert(Topic::Customers);
        assert_eq!(analysis.primary_topic(), Some(Topic::Customers));
    }
}
