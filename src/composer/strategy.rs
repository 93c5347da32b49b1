//! Multi-section strategy documents
//!
//! Each document has a headline, a situation analysis drawn from the
//! snapshot, a numbered framework, a budget split of the strategy budget and
//! projected outcomes. Budget percentages always sum to 100.

use super::figures::{format_count, format_money, format_percent, ratio, Figures};
use super::phrases::{STRATEGY_INTRO, STRATEGY_OUTRO};
use super::segments::{Audience, Demographic};
use super::ComposeContext;
use crate::chat::ToneMode;
use once_cell::sync::Lazy;
use rand::Rng;
use regex::Regex;

/// Sub-intent of a strategy request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StrategyKind {
    TargetedCampaign,
    Segmentation,
    AcquisitionRetention,
    RevenueGrowth,
    AnalyticsReporting,
    Optimization,
    CampaignCreation,
}

static KEYWORDS: Lazy<Vec<(StrategyKind, Regex)>> = Lazy::new(|| {
    let table = [
        (
            StrategyKind::TargetedCampaign,
            r"(?i)\b(target(ed|ing)?|demographics?|age\s+groups?)\b",
        ),
        (
            StrategyKind::Segmentation,
            r"(?i)\b(segments?|segmentation|segmenting|clusters?|personas?|cohorts?)\b",
        ),
        (
            StrategyKind::AcquisitionRetention,
            r"(?i)\b(acquisition|acquire|retention|retain|churn|win[\s-]?back|loyalty|reactivat\w*|new\s+customers)\b",
        ),
        (
            StrategyKind::RevenueGrowth,
            r"(?i)\b(revenue|sales|profits?|income|grow|growth|earnings|monetiz\w*|upsell\w*)\b",
        ),
        (
            StrategyKind::AnalyticsReporting,
            r"(?i)\b(analytics|reports?|reporting|dashboards?|tracking|track|kpis?|metrics|measure\w*|insights?)\b",
        ),
        (
            StrategyKind::Optimization,
            r"(?i)\b(optimi[sz]\w*|improve\w*|roi|conversions?|efficien\w*|performance)\b",
        ),
        (
            StrategyKind::CampaignCreation,
            r"(?i)\b(campaigns?|promotions?|promos?|marketing|ads?|advertis\w*)\b",
        ),
    ];
    table
        .into_iter()
        .map(|(kind, pattern)| (kind, Regex::new(pattern).expect("strategy pattern")))
        .collect()
});

impl StrategyKind {
    /// First keyword cluster found in the message, in priority order.
    ///
    /// Demographic keywords count as a targeting request on their own.
    pub fn detect(message: &str) -> Option<Self> {
        if Demographic::detect(message).is_some() {
            return Some(StrategyKind::TargetedCampaign);
        }
        KEYWORDS
            .iter()
            .find(|(_, pattern)| pattern.is_match(message))
            .map(|(kind, _)| *kind)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StrategyKind::TargetedCampaign => "targeted_campaign",
            StrategyKind::Segmentation => "segmentation",
            StrategyKind::AcquisitionRetention => "acquisition_retention",
            StrategyKind::RevenueGrowth => "revenue_growth",
            StrategyKind::AnalyticsReporting => "analytics_reporting",
            StrategyKind::Optimization => "optimization",
            StrategyKind::CampaignCreation => "campaign_creation",
        }
    }

    fn title(&self, mode: ToneMode) -> &'static str {
        match self {
            StrategyKind::TargetedCampaign => {
                mode.pick("Targeted Campaign Strategy", "Operation Bullseye: Targeted Campaign")
            }
            StrategyKind::Segmentation => {
                mode.pick("Customer Segmentation Strategy", "Sorting Hat: Customer Segmentation")
            }
            StrategyKind::AcquisitionRetention => mode.pick(
                "Customer Acquisition and Retention Strategy",
                "Catch and Keep: Acquisition and Retention",
            ),
            StrategyKind::RevenueGrowth => {
                mode.pick("Revenue Growth Strategy", "Money Moves: Revenue Growth")
            }
            StrategyKind::AnalyticsReporting => mode.pick(
                "Analytics and Reporting Plan",
                "Nerd Mode: Analytics and Reporting",
            ),
            StrategyKind::Optimization => {
                mode.pick("Performance Optimization Plan", "Tune-Up Time: Performance Optimization")
            }
            StrategyKind::CampaignCreation => {
                mode.pick("Marketing Campaign Plan", "Showtime: Marketing Campaign Plan")
            }
        }
    }

    fn framework(&self) -> &'static [&'static str] {
        match self {
            StrategyKind::TargetedCampaign => &[
                "Define the audience profile and the single outcome the campaign should drive",
                "Craft messaging and offers tailored to that audience",
                "Launch on the channels the audience already uses",
                "Measure response weekly and reallocate toward the best performers",
            ],
            StrategyKind::Segmentation => &[
                "Group customers by value, recency and purchase frequency",
                "Build a persona and a key message for each segment",
                "Assign an owner and a channel mix to every segment",
                "Review segment movement monthly and adjust offers",
            ],
            StrategyKind::AcquisitionRetention => &[
                "Launch a win-back sequence for inactive customers",
                "Streamline onboarding so new customers reach a second purchase",
                "Reward repeat buyers with a tiered loyalty program",
                "Turn satisfied VIPs into referrers",
            ],
            StrategyKind::RevenueGrowth => &[
                "Introduce upsell and cross-sell offers for existing customers",
                "Review pricing and bundle high-margin products",
                "Scale the channels with the strongest ROI",
                "Protect recurring revenue with retention incentives",
            ],
            StrategyKind::AnalyticsReporting => &[
                "Agree on a short list of KPIs tied to revenue and engagement",
                "Automate a weekly dashboard covering those KPIs",
                "Add cohort and campaign attribution reporting",
                "Hold a monthly review to turn findings into actions",
            ],
            StrategyKind::Optimization => &[
                "Audit every active campaign against its ROI",
                "A/B test creative, offers and send times",
                "Shift spend from the weakest to the strongest performers",
                "Tighten conversion paths and remove friction",
            ],
            StrategyKind::CampaignCreation => &[
                "Set a clear goal and success metric for the campaign",
                "Develop the creative concept and core offer",
                "Sequence the launch across paid, owned and email channels",
                "Track results daily during the first two weeks",
            ],
        }
    }

    fn budget_mix(&self) -> &'static [(&'static str, u32)] {
        match self {
            StrategyKind::TargetedCampaign | StrategyKind::CampaignCreation => &[
                ("Creative production", 25),
                ("Paid media", 40),
                ("Email and CRM", 20),
                ("Analytics", 15),
            ],
            StrategyKind::Segmentation => &[
                ("Data and tooling", 30),
                ("Segment-specific campaigns", 35),
                ("Personalized content", 20),
                ("Testing", 15),
            ],
            StrategyKind::AcquisitionRetention => &[
                ("Win-back campaigns", 30),
                ("Onboarding", 25),
                ("Loyalty rewards", 25),
                ("Referral incentives", 20),
            ],
            StrategyKind::RevenueGrowth => &[
                ("Upsell and cross-sell", 35),
                ("Pricing experiments", 20),
                ("High-ROI channels", 25),
                ("Retention incentives", 20),
            ],
            StrategyKind::AnalyticsReporting => &[
                ("Tooling", 35),
                ("Data integration", 25),
                ("Reporting and dashboards", 25),
                ("Training", 15),
            ],
            StrategyKind::Optimization => &[
                ("Testing and experimentation", 30),
                ("Reallocated media", 35),
                ("Conversion improvements", 20),
                ("Measurement", 15),
            ],
        }
    }

    fn recommendations(&self) -> [&'static str; 3] {
        match self {
            StrategyKind::TargetedCampaign => [
                "Launch a targeted campaign for your core audience",
                "Personalize offers by customer tier",
                "Track campaign response weekly",
            ],
            StrategyKind::Segmentation => [
                "Build personas for each customer segment",
                "Create segment-specific offers",
                "Review segment movement monthly",
            ],
            StrategyKind::AcquisitionRetention => [
                "Start a win-back campaign for inactive customers",
                "Launch a loyalty program for repeat buyers",
                "Add a referral incentive for VIPs",
            ],
            StrategyKind::RevenueGrowth => [
                "Introduce upsell offers for VIP customers",
                "Test bundle pricing on top products",
                "Scale the highest-ROI campaigns",
            ],
            StrategyKind::AnalyticsReporting => [
                "Set up a weekly KPI dashboard",
                "Add campaign attribution reporting",
                "Schedule a monthly metrics review",
            ],
            StrategyKind::Optimization => [
                "Audit campaign ROI",
                "A/B test your weakest campaign",
                "Shift budget to top performers",
            ],
            StrategyKind::CampaignCreation => [
                "Define the campaign goal and KPI",
                "Draft the creative brief",
                "Plan the launch sequence",
            ],
        }
    }
}

/// Split used for discovered segments
const SEGMENT_BUDGET_MIX: &[(&str, u32)] = &[
    ("Segment research", 30),
    ("Personalized campaigns", 35),
    ("Exclusive offers", 20),
    ("Measurement", 15),
];

/// A rendered strategy document with its supporting facts
#[derive(Debug, Clone, PartialEq)]
pub struct StrategyDocument {
    pub text: String,
    pub insights: Vec<String>,
    pub recommendations: Vec<String>,
}

/// Render the strategy for `kind`, aimed at whatever audience the context resolves
pub fn compose_strategy<R: Rng + ?Sized>(
    kind: StrategyKind,
    ctx: &ComposeContext<'_>,
    rng: &mut R,
) -> StrategyDocument {
    let audience = match kind {
        StrategyKind::TargetedCampaign => Audience::resolve(ctx.message, ctx.segment),
        _ => Audience::General,
    };
    render(kind, audience, ctx, rng)
}

/// Targeted strategy built around a matched segment
pub fn compose_segment_strategy<R: Rng + ?Sized>(
    ctx: &ComposeContext<'_>,
    rng: &mut R,
) -> StrategyDocument {
    let audience = Audience::resolve(ctx.message, ctx.segment);
    render(StrategyKind::TargetedCampaign, audience, ctx, rng)
}

fn render<R: Rng + ?Sized>(
    kind: StrategyKind,
    audience: Audience<'_>,
    ctx: &ComposeContext<'_>,
    rng: &mut R,
) -> StrategyDocument {
    let figures = &ctx.figures;
    let insights = situation_lines(figures, &audience);

    let mut recommendations: Vec<String> =
        kind.recommendations().iter().map(|r| r.to_string()).collect();
    if !matches!(audience, Audience::General) {
        recommendations[0] = format!("Launch a targeted campaign for {}", audience.name());
    }

    let title = match audience {
        Audience::General => kind.title(ctx.mode).to_string(),
        _ => format!("{}: {}", kind.title(ctx.mode), audience.name()),
    };

    let mut text = format!("**{}**\n{}\n\nSituation analysis:\n", title, STRATEGY_INTRO.pick(ctx.mode, rng));
    for line in &insights {
        text.push_str(&format!("- {}\n", line));
    }

    text.push_str("\nStrategic framework:\n");
    for (i, step) in kind.framework().iter().enumerate() {
        text.push_str(&format!("{}. {}\n", i + 1, step));
    }

    text.push_str(&format!(
        "\nBudget allocation ({} of revenue, {}):\n",
        format_percent(super::figures::STRATEGY_BUDGET_PERCENT),
        format_money(figures.strategy_budget)
    ));
    for (item, percent) in budget_mix(kind, &audience) {
        text.push_str(&format!(
            "- {}: {} ({}%)\n",
            item,
            format_money(figures.budget_slice(*percent)),
            percent
        ));
    }

    text.push_str(&format!(
        "\nProjected outcomes:\n\
         - ROI: {} -> {}\n\
         - Engagement: {} -> {}\n\
         - Estimated revenue lift: {}\n",
        format_percent(figures.average_roi),
        format_percent(figures.projected_roi),
        format_percent(figures.engagement_rate),
        format_percent(figures.projected_engagement),
        format_money(figures.projected_revenue_lift),
    ));

    text.push('\n');
    text.push_str(STRATEGY_OUTRO.pick(ctx.mode, rng));

    StrategyDocument {
        text,
        insights,
        recommendations,
    }
}

fn budget_mix(kind: StrategyKind, audience: &Audience<'_>) -> &'static [(&'static str, u32)] {
    match audience {
        Audience::Segment(_) => SEGMENT_BUDGET_MIX,
        Audience::Demographic(demographic) => demographic.budget_mix(),
        Audience::General => kind.budget_mix(),
    }
}

fn situation_lines(figures: &Figures, audience: &Audience<'_>) -> Vec<String> {
    let mut lines = vec![
        format!(
            "Customers: {} ({} active, {} VIP, {} inactive)",
            format_count(figures.customer_count),
            format_count(figures.active_customers),
            format_count(figures.vip_count),
            format_count(figures.inactive_count)
        ),
        format!(
            "Total revenue: {} ({} per customer)",
            format_money(figures.total_revenue),
            format_money(figures.revenue_per_customer)
        ),
        format!(
            "Average ROI: {}, engagement rate: {}",
            format_percent(figures.average_roi),
            format_percent(figures.engagement_rate)
        ),
        format!("Active campaigns: {}", format_count(figures.active_campaigns)),
    ];

    match audience {
        Audience::Segment(segment) => {
            lines.push(format!(
                "Target audience: {} ({} customers, {} of your base)",
                segment.name,
                format_count(segment.count),
                format_percent(ratio(
                    segment.count as f64 * 100.0,
                    figures.customer_count as f64
                ))
            ));
            if !segment.patterns.is_empty() {
                let patterns: Vec<&str> = segment.patterns.iter().map(String::as_str).collect();
                lines.push(format!("Defining signals: {}", patterns.join(", ")));
            }
        }
        Audience::Demographic(demographic) => {
            lines.push(format!(
                "Target audience: {} (about {} customers, an estimated {} of your base)",
                demographic.label(),
                format_count(figures.customers_share(demographic.estimated_share())),
                format_percent(demographic.estimated_share())
            ));
            lines.push(format!("Preferred channels: {}", demographic.channels()));
        }
        Audience::General => {}
    }

    lines
}
