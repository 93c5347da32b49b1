//! Tone-specific phrase banks and placeholder substitution
//!
//! Within a bank, every template (serious and joking alike) carries the same
//! set of `{placeholders}`, so picking a random phrasing can only change the
//! wording, never which facts are stated.

use super::figures::{format_count, format_money, format_percent, ratio, Figures};
use crate::analysis::{Sentiment, Topic};
use crate::chat::ToneMode;
use crate::snapshot::Segment;
use rand::seq::SliceRandom;
use rand::Rng;

/// Parallel serious and joking phrasings of the same statement
#[derive(Debug)]
pub struct PhraseBank {
    pub serious: &'static [&'static str],
    pub joking: &'static [&'static str],
}

impl PhraseBank {
    pub fn pick<R: Rng + ?Sized>(&self, mode: ToneMode, rng: &mut R) -> &'static str {
        mode.pick(self.serious, self.joking)
            .choose(rng)
            .copied()
            .unwrap_or("")
    }
}

/// Placeholder values substituted into templates
#[derive(Debug, Clone, Default)]
pub struct Vars(Vec<(&'static str, String)>);

impl Vars {
    /// All numeric placeholders derived from the snapshot figures
    pub fn from_figures(figures: &Figures) -> Self {
        Self::default()
            .with("customers", format_count(figures.customer_count))
            .with("active", format_count(figures.active_customers))
            .with("vip", format_count(figures.vip_count))
            .with("regular", format_count(figures.regular_count))
            .with("new", format_count(figures.new_count))
            .with("inactive", format_count(figures.inactive_count))
            .with("revenue", format_money(figures.total_revenue))
            .with("per_customer", format_money(figures.revenue_per_customer))
            .with("roi", format_percent(figures.average_roi))
            .with("engagement", format_percent(figures.engagement_rate))
            .with("campaigns", format_count(figures.active_campaigns))
            .with("inactive_share", format_percent(figures.inactive_share))
            .with("new_share", format_percent(figures.new_share))
            .with("vip_share", format_percent(figures.vip_share))
    }

    /// Adds `{segment}`, `{segment_count}` and `{segment_share}`
    pub fn with_segment(self, segment: &Segment, figures: &Figures) -> Self {
        let share = ratio(segment.count as f64 * 100.0, figures.customer_count as f64);
        self.with("segment", segment.name.clone())
            .with("segment_count", format_count(segment.count))
            .with("segment_share", format_percent(share))
    }

    pub fn with(mut self, key: &'static str, value: impl Into<String>) -> Self {
        self.0.push((key, value.into()));
        self
    }

    pub fn fill(&self, template: &str) -> String {
        let mut out = template.to_string();
        for (key, value) in &self.0 {
            out = out.replace(&format!("{{{}}}", key), value);
        }
        out
    }
}

pub const GREETING_HEADLINE: PhraseBank = PhraseBank {
    serious: &[
        "You currently serve {customers} customers with {revenue} in total revenue.",
        "Your business stands at {customers} customers and {revenue} in total revenue.",
        "Here is your headline: {customers} customers and {revenue} in revenue to date.",
    ],
    joking: &[
        "Your fan club is {customers} customers strong and the cash register reads {revenue}. Not too shabby!",
        "{customers} customers and {revenue} in the bank? Somebody has been busy!",
        "Plot twist: you have {customers} customers and {revenue} in revenue. The spreadsheet is blushing.",
    ],
};

pub const GREETING_BUSINESS_HOURS: PhraseBank = PhraseBank {
    serious: &[
        "The business day is in full swing.",
        "It is a good moment to review where things stand.",
    ],
    joking: &[
        "Prime business hours, so the coffee should be kicking in right about now.",
        "Office hours are on and so am I.",
    ],
};

pub const GREETING_AFTER_HOURS: PhraseBank = PhraseBank {
    serious: &[
        "Thanks for checking in outside regular business hours.",
        "Working after hours? Here is a quick snapshot to keep you oriented.",
    ],
    joking: &[
        "Burning the midnight oil? Your metrics never sleep either.",
        "Clocked out but still here? I admire the dedication.",
    ],
};

pub const GREETING_WEEKEND: PhraseBank = PhraseBank {
    serious: &[
        "I hope your weekend is going well.",
        "Here is a brief weekend update.",
    ],
    joking: &[
        "Checking metrics on a weekend? The numbers are flattered.",
        "Weekend mode: activated. Business brain: apparently also activated.",
    ],
};

pub const GREETING_OFFER: PhraseBank = PhraseBank {
    serious: &[
        "What would you like to look at today?",
        "How can I help you move the business forward?",
    ],
    joking: &[
        "So, what are we conquering today?",
        "Point me at a problem and watch me get enthusiastic about it.",
    ],
};

pub const CUSTOMER_INSIGHT: PhraseBank = PhraseBank {
    serious: &[
        "You have {customers} customers in total: {vip} VIP, {new} new and {inactive} inactive.",
        "Your customer base stands at {customers}, made up of {vip} VIP, {new} new and {inactive} inactive accounts.",
    ],
    joking: &[
        "Headcount check: {customers} customers! That is {vip} VIPs, {new} fresh faces and {inactive} who have gone suspiciously quiet.",
        "You are the proud owner of {customers} customers: {vip} VIPs, {new} newcomers and {inactive} professional nappers.",
    ],
};

pub const REVENUE_INSIGHT: PhraseBank = PhraseBank {
    serious: &[
        "Total revenue is {revenue}, or {per_customer} per customer, with an average campaign ROI of {roi}.",
        "You have generated {revenue} in revenue, which averages {per_customer} per customer at an ROI of {roi}.",
    ],
    joking: &[
        "Cha-ching! {revenue} in revenue, {per_customer} per customer and an ROI of {roi}. Your wallet says thanks.",
        "The money tree has produced {revenue} so far: {per_customer} per customer with a {roi} ROI.",
    ],
};

pub const CAMPAIGN_INSIGHT: PhraseBank = PhraseBank {
    serious: &[
        "You are running {campaigns} active campaigns with an average ROI of {roi} and {engagement} engagement.",
        "There are {campaigns} campaigns live, averaging {roi} ROI at an engagement rate of {engagement}.",
    ],
    joking: &[
        "{campaigns} campaigns are out there hustling, pulling a {roi} ROI and {engagement} engagement.",
        "Your marketing squad of {campaigns} campaigns is delivering {roi} ROI with {engagement} engagement. Team player energy.",
    ],
};

pub const ANALYTICS_INSIGHT: PhraseBank = PhraseBank {
    serious: &[
        "Engagement sits at {engagement} across {customers} customers, with {active} currently active.",
        "Of your {customers} customers, {active} are active and overall engagement is {engagement}.",
    ],
    joking: &[
        "The data nerd in me is thrilled: {engagement} engagement, {customers} customers, {active} of them wide awake.",
        "Stats incoming! {customers} customers, {active} active and an engagement rate of {engagement}.",
    ],
};

pub const BUSINESS_INSIGHT: PhraseBank = PhraseBank {
    serious: &[
        "The business serves {customers} customers, has generated {revenue} and runs {campaigns} active campaigns.",
        "At a glance: {customers} customers, {revenue} in revenue and {campaigns} campaigns in flight.",
    ],
    joking: &[
        "State of the empire: {customers} loyal subjects, {revenue} in the treasury and {campaigns} campaigns on patrol.",
        "Quick vibe check: {customers} customers, {revenue} earned and {campaigns} campaigns doing their thing.",
    ],
};

pub const GENERAL_INSIGHT: PhraseBank = PhraseBank {
    serious: &[
        "Right now you have {customers} customers, {revenue} in revenue and an engagement rate of {engagement}.",
        "Your current position: {customers} customers, {revenue} in total revenue, {engagement} engagement.",
    ],
    joking: &[
        "Here is the scoop: {customers} customers, {revenue} in revenue and {engagement} engagement.",
        "Fun facts of the day: {customers} customers, {revenue} earned, {engagement} engagement.",
    ],
};

pub const CUSTOMER_RECOMMENDATION: PhraseBank = PhraseBank {
    serious: &[
        "I recommend a re-engagement sequence for inactive customers and a loyalty tier for your VIPs.",
        "Focus on converting new customers into repeat buyers and winning back inactive accounts.",
    ],
    joking: &[
        "Send the quiet ones a 'we miss you' note and give your VIPs the red-carpet treatment.",
        "Turn the newcomers into regulars and poke the sleepers awake with a tasty offer.",
    ],
};

pub const REVENUE_RECOMMENDATION: PhraseBank = PhraseBank {
    serious: &[
        "Consider targeted upsell offers for high-value customers and bundles to lift average order value.",
        "Prioritize the campaigns with the strongest ROI and test premium bundles for your VIP tier.",
    ],
    joking: &[
        "Upsell like you mean it: bundles for everyone, shiny extras for the VIPs.",
        "Feed the campaigns that make money and starve the ones that just make noise.",
    ],
};

pub const CAMPAIGN_RECOMMENDATION: PhraseBank = PhraseBank {
    serious: &[
        "Shift budget toward your best-performing campaigns and A/B test creative on the weakest ones.",
        "Refresh underperforming creative and concentrate spend on the channels with proven engagement.",
    ],
    joking: &[
        "Give the star campaigns a raise and send the slackers to creative boot camp.",
        "Double down on what works and let the underperformers audition with new creative.",
    ],
};

pub const ANALYTICS_RECOMMENDATION: PhraseBank = PhraseBank {
    serious: &[
        "Set up a weekly KPI review covering engagement, ROI and customer movement between tiers.",
        "Track cohort retention monthly so changes in engagement surface early.",
    ],
    joking: &[
        "Schedule a weekly date with your KPIs. They are great listeners.",
        "Watch your cohorts like a hawk with a spreadsheet habit.",
    ],
};

pub const BUSINESS_RECOMMENDATION: PhraseBank = PhraseBank {
    serious: &[
        "Balance acquisition and retention spend, and review campaign ROI before the next budget cycle.",
        "Keep a close eye on inactive customers; reactivating them is usually cheaper than acquiring new ones.",
    ],
    joking: &[
        "Keep the new-customer party going, but do not forget the guests already on the dance floor.",
        "Reactivating old friends is cheaper than making new ones. Business wisdom, fortune cookie certified.",
    ],
};

pub const FOLLOW_UP_OFFER: PhraseBank = PhraseBank {
    serious: &[
        "Would you like me to turn this into a detailed plan?",
        "I can break this down further if that would help.",
        "Shall I prepare a step-by-step strategy for this?",
    ],
    joking: &[
        "Want me to whip this into a full game plan?",
        "Say the word and I will nerd out on the details.",
        "Shall I crank this up into a proper strategy? I have snacks.",
    ],
};

pub const REQUEST_ACK: PhraseBank = PhraseBank {
    serious: &[
        "Understood. Let me put that in context.",
        "Happy to help with that.",
        "Good request. Here is where I would start.",
    ],
    joking: &[
        "On it! Rolling up my virtual sleeves.",
        "Challenge accepted.",
        "Ooh, a mission. I love a mission.",
    ],
};

pub const REQUEST_CONTEXT: PhraseBank = PhraseBank {
    serious: &[
        "With {customers} customers and an engagement rate of {engagement}, there is room to act quickly.",
        "Your base of {customers} customers at {engagement} engagement gives us a solid starting point.",
    ],
    joking: &[
        "You have {customers} customers and {engagement} engagement, so we are not starting from scratch.",
        "{customers} customers at {engagement} engagement? That is a launchpad, not a sandbox.",
    ],
};

pub const REQUEST_CLOSING: PhraseBank = PhraseBank {
    serious: &[
        "If you tell me more about the goal, I can build a full strategy around it.",
        "Let me know the outcome you are after and I will draft a concrete plan.",
    ],
    joking: &[
        "Give me a bit more detail and I will go full strategist mode.",
        "Tell me the dream and I will draw up the blueprint.",
    ],
};

pub const CONVERSATION_POSITIVE: PhraseBank = PhraseBank {
    serious: &[
        "I am glad to hear that. With {customers} customers and {revenue} in revenue, there is a lot to build on. What would you like to focus on next?",
        "That is great. Your {customers} customers and {revenue} in revenue are a strong foundation. Where should we take things from here?",
    ],
    joking: &[
        "Love the energy! {customers} customers and {revenue} in revenue agree with you. What shall we tackle next?",
        "Good vibes detected. Your {customers} customers and {revenue} in revenue are high-fiving you. What is next on the list?",
    ],
};

pub const CONVERSATION_NEGATIVE: PhraseBank = PhraseBank {
    serious: &[
        "I understand, that sounds frustrating. You still have {customers} customers and {revenue} in revenue to work with. What is worrying you most right now?",
        "Sorry to hear that. Remember that {customers} customers and {revenue} in revenue give us options. Which part should we look at first?",
    ],
    joking: &[
        "Oof, rough one. But hey, {customers} customers and {revenue} in revenue say you are still in the game. What is bugging you the most?",
        "Deep breaths. {customers} customers and {revenue} in revenue are still on your side. Where does it hurt?",
    ],
};

pub const CONVERSATION_NEUTRAL: PhraseBank = PhraseBank {
    serious: &[
        "Thanks for the message. For context, you have {customers} customers and {revenue} in revenue. What would you like to explore?",
        "I am here to help. Your business currently has {customers} customers and {revenue} in revenue. What is on your mind?",
    ],
    joking: &[
        "Noted! Meanwhile your {customers} customers and {revenue} in revenue are just chilling. What should we dig into?",
        "I am all ears. Fun fact: {customers} customers and {revenue} in revenue. So, what is the plan?",
    ],
};

pub const STRATEGY_INTRO: PhraseBank = PhraseBank {
    serious: &[
        "Here is a structured strategy based on your current metrics.",
        "Below is a data-driven plan built from your live business figures.",
    ],
    joking: &[
        "Buckle up, strategy time! Built with real numbers and only a little showing off.",
        "I made you a plan. It has sections. It has numbers. It might have feelings.",
    ],
};

pub const STRATEGY_OUTRO: PhraseBank = PhraseBank {
    serious: &[
        "Would you like me to detail any phase of this plan?",
        "I can expand any section or adjust the budget split if needed.",
    ],
    joking: &[
        "Want me to zoom in on any part? I promise to keep the puns to a minimum.",
        "Tweak the budget, expand a phase, or frame it on your wall. Your call.",
    ],
};

pub const SEGMENT_INSIGHT: PhraseBank = PhraseBank {
    serious: &[
        "Your {segment} segment holds {segment_count} of your {customers} customers ({segment_share}).",
        "{segment} currently counts {segment_count} customers, {segment_share} of your {customers} total.",
    ],
    joking: &[
        "The {segment} crew is {segment_count} strong, a solid {segment_share} of your {customers} customers.",
        "Roll call for {segment}: {segment_count} present, which is {segment_share} of all {customers} customers!",
    ],
};

/// Insight bank for a topic, or the general one
pub fn insight_bank(topic: Option<Topic>) -> &'static PhraseBank {
    match topic {
        Some(Topic::Customers) => &CUSTOMER_INSIGHT,
        Some(Topic::Revenue) => &REVENUE_INSIGHT,
        Some(Topic::Campaigns) => &CAMPAIGN_INSIGHT,
        Some(Topic::Analytics) => &ANALYTICS_INSIGHT,
        Some(Topic::Business) => &BUSINESS_INSIGHT,
        None => &GENERAL_INSIGHT,
    }
}

/// Recommendation bank for a topic, falling back to business advice
pub fn recommendation_bank(topic: Option<Topic>) -> &'static PhraseBank {
    match topic {
        Some(Topic::Customers) => &CUSTOMER_RECOMMENDATION,
        Some(Topic::Revenue) => &REVENUE_RECOMMENDATION,
        Some(Topic::Campaigns) => &CAMPAIGN_RECOMMENDATION,
        Some(Topic::Analytics) => &ANALYTICS_RECOMMENDATION,
        Some(Topic::Business) | None => &BUSINESS_RECOMMENDATION,
    }
}

pub fn conversation_bank(sentiment: Sentiment) -> &'static PhraseBank {
    match sentiment {
        Sentiment::Positive => &CONVERSATION_POSITIVE,
        Sentiment::Negative => &CONVERSATION_NEGATIVE,
        Sentiment::Neutral => &CONVERSATION_NEUTRAL,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use regex::Regex;
    use std::collections::BTreeSet;

    const ALL_BANKS: &[(&str, &PhraseBank)] = &[
        ("greeting_headline", &GREETING_HEADLINE),
        ("greeting_business_hours", &GREETING_BUSINESS_HOURS),
        ("greeting_after_hours", &GREETING_AFTER_HOURS),
        ("greeting_weekend", &GREETING_WEEKEND),
        ("greeting_offer", &GREETING_OFFER),
        ("customer_insight", &CUSTOMER_INSIGHT),
        ("revenue_insight", &REVENUE_INSIGHT),
        ("campaign_insight", &CAMPAIGN_INSIGHT),
        ("analytics_insight", &ANALYTICS_INSIGHT),
        ("business_insight", &BUSINESS_INSIGHT),
        ("general_insight", &GENERAL_INSIGHT),
        ("customer_recommendation", &CUSTOMER_RECOMMENDATION),
        ("revenue_recommendation", &REVENUE_RECOMMENDATION),
        ("campaign_recommendation", &CAMPAIGN_RECOMMENDATION),
        ("analytics_recommendation", &ANALYTICS_RECOMMENDATION),
        ("business_recommendation", &BUSINESS_RECOMMENDATION),
        ("follow_up_offer", &FOLLOW_UP_OFFER),
        ("request_ack", &REQUEST_ACK),
        ("request_context", &REQUEST_CONTEXT),
        ("request_closing", &REQUEST_CLOSING),
        ("conversation_positive", &CONVERSATION_POSITIVE),
        ("conversation_negative", &CONVERSATION_NEGATIVE),
        ("conversation_neutral", &CONVERSATION_NEUTRAL),
        ("strategy_intro", &STRATEGY_INTRO),
        ("strategy_outro", &STRATEGY_OUTRO),
        ("segment_insight", &SEGMENT_INSIGHT),
    ];

    fn placeholders(template: &str) -> BTreeSet<String> {
        let pattern = Regex::new(r"\{([a-z_]+)\}").unwrap();
        pattern
            .captures_iter(template)
            .map(|c| c[1].to_string())
            .collect()
    }

    #[test]
    fn test_banks_share_placeholders_across_tones() {
        for (name, bank) in ALL_BANKS {
            assert!(!bank.serious.is_empty(), "{} has no serious phrasing", name);
            assert!(!bank.joking.is_empty(), "{} has no joking phrasing", name);

            let expected = placeholders(bank.serious[0]);
            for template in bank.serious.iter().chain(bank.joking.iter()) {
                assert_eq!(
                    placeholders(template),
                    expected,
                    "placeholder mismatch in {}: {}",
                    name,
                    template
                );
            }
        }
    }

    #[test]
    fn test_every_placeholder_is_fillable() {
        let figures = Figures::from_snapshot(&crate::snapshot::MetricsSnapshot::empty());
        let segment = Segment::new("wk", "Weekend Shoppers", 12);
        let vars = Vars::from_figures(&figures).with_segment(&segment, &figures);
        for (name, bank) in ALL_BANKS {
            for template in bank.serious.iter().chain(bank.joking.iter()) {
                let filled = vars.fill(template);
                assert!(!filled.contains('{'), "unfilled placeholder in {}: {}", name, filled);
            }
        }
    }

    #[test]
    fn test_fill_substitutes_values() {
        let vars = Vars::default().with("customers", "2847").with("revenue", "$10");
        assert_eq!(
            vars.fill("{customers} customers, {revenue} revenue, {customers} again"),
            "2847 customers, $10 revenue, 2847 again"
        );
    }

    #[test]
    fn test_pick_respects_tone() {
        let mut rng = StdRng::seed_from_u64(7);
        let serious = GREETING_OFFER.pick(ToneMode::Serious, &mut rng);
        let joking = GREETING_OFFER.pick(ToneMode::Joking, &mut rng);
        assert!(GREETING_OFFER.serious.contains(&serious));
        assert!(GREETING_OFFER.joking.contains(&joking));
    }
}
