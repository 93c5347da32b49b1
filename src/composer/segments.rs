//! Audience resolution: discovered segments first, demographic keywords second

use crate::snapshot::Segment;
use once_cell::sync::Lazy;
use regex::Regex;

/// Static age-band audiences recognised from keywords
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Demographic {
    Teen,
    YoungAdult,
    MiddleAged,
    Senior,
}

impl Demographic {
    pub fn label(&self) -> &'static str {
        match self {
            Demographic::Teen => "Teens (13-19)",
            Demographic::YoungAdult => "Young adults (20-34)",
            Demographic::MiddleAged => "Middle-aged adults (35-54)",
            Demographic::Senior => "Seniors (55+)",
        }
    }

    /// Estimated share of the customer base, in percent
    pub fn estimated_share(&self) -> f64 {
        match self {
            Demographic::Teen => 8.0,
            Demographic::YoungAdult => 32.0,
            Demographic::MiddleAged => 38.0,
            Demographic::Senior => 22.0,
        }
    }

    pub fn channels(&self) -> &'static str {
        match self {
            Demographic::Teen => "short-form video, social challenges and creator partnerships",
            Demographic::YoungAdult => "social media, mobile-first offers and influencer content",
            Demographic::MiddleAged => "email, search and loyalty programs",
            Demographic::Senior => "email, direct mail and phone support",
        }
    }

    /// Channel mix as (line item, percent of budget); percentages sum to 100
    pub fn budget_mix(&self) -> &'static [(&'static str, u32)] {
        match self {
            Demographic::Teen => &[
                ("Short-form video", 40),
                ("Creator partnerships", 30),
                ("In-app promotions", 20),
                ("Measurement", 10),
            ],
            Demographic::YoungAdult => &[
                ("Social media ads", 40),
                ("Influencer content", 25),
                ("Mobile offers", 20),
                ("Measurement", 15),
            ],
            Demographic::MiddleAged => &[
                ("Email and CRM", 35),
                ("Search ads", 30),
                ("Loyalty rewards", 20),
                ("Measurement", 15),
            ],
            Demographic::Senior => &[
                ("Email newsletters", 35),
                ("Direct mail", 30),
                ("Customer service outreach", 20),
                ("Measurement", 15),
            ],
        }
    }

    /// Detect an age band from message keywords
    pub fn detect(message: &str) -> Option<Self> {
        DEMOGRAPHIC_PATTERNS
            .iter()
            .find(|(_, pattern)| pattern.is_match(message))
            .map(|(demographic, _)| *demographic)
    }
}

static DEMOGRAPHIC_PATTERNS: Lazy<Vec<(Demographic, Regex)>> = Lazy::new(|| {
    let table = [
        (
            Demographic::Teen,
            r"(?i)\b(teens?|teenagers?|gen\s*z|high\s+school(ers)?|adolescents?|youth)\b",
        ),
        (
            Demographic::YoungAdult,
            r"(?i)\b(young\s+(adults?|people|professionals)|millennials?|students?|college|twenty\s*somethings?|20s)\b",
        ),
        (
            Demographic::MiddleAged,
            r"(?i)\b(middle[\s-]aged|gen\s*x|parents?|families|family|professionals|40s|30s)\b",
        ),
        (
            Demographic::Senior,
            r"(?i)\b(seniors?|elderly|retirees?|retired|older\s+(adults?|customers|people)|boomers?|baby\s+boomers?|pensioners?)\b",
        ),
    ];
    table
        .into_iter()
        .map(|(demographic, pattern)| (demographic, Regex::new(pattern).expect("demographic pattern")))
        .collect()
});

/// Who a strategy is aimed at
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Audience<'a> {
    Segment(&'a Segment),
    Demographic(Demographic),
    General,
}

impl<'a> Audience<'a> {
    /// Segment match wins over demographic keywords
    pub fn resolve(message: &str, segment: Option<&'a Segment>) -> Self {
        match segment {
            Some(segment) => Audience::Segment(segment),
            None => Demographic::detect(message)
                .map(Audience::Demographic)
                .unwrap_or(Audience::General),
        }
    }

    pub fn name(&self) -> String {
        match self {
            Audience::Segment(segment) => segment.name.clone(),
            Audience::Demographic(demographic) => demographic.label().to_string(),
            Audience::General => "Your customer base".to_string(),
        }
    }
}

/// First discovered segment the message refers to
///
/// A segment matches on its name (case-insensitive), its id as a whole word,
/// or any of its keyword patterns as whole words.
pub fn match_segment<'a>(message: &str, segments: &'a [Segment]) -> Option<&'a Segment> {
    let lower = message.trim().to_lowercase();
    if lower.is_empty() {
        return None;
    }

    segments.iter().find(|segment| {
        let name = segment.name.trim().to_lowercase();
        let id = segment.id.trim().to_lowercase();

        (!name.is_empty() && contains_word(&lower, &name))
            || (id.chars().count() >= 3 && contains_word(&lower, &id))
            || segment.patterns.iter().any(|pattern| {
                let pattern = pattern.trim().to_lowercase();
                !pattern.is_empty() && contains_word(&lower, &pattern)
            })
    })
}

/// `needle` occurs in `haystack` bounded by non-alphanumeric characters
fn contains_word(haystack: &str, needle: &str) -> bool {
    haystack.match_indices(needle).any(|(start, matched)| {
        let before = haystack[..start].chars().next_back();
        let after = haystack[start + matched.len()..].chars().next();
        !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
    })
}
