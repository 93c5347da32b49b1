//! Deterministic figures derived from a metrics snapshot
//!
//! Every number that appears in composed text comes from here, so the same
//! snapshot always yields the same facts regardless of tone or phrasing.

use crate::snapshot::MetricsSnapshot;

/// Percentage of total revenue earmarked for a proposed strategy
pub const STRATEGY_BUDGET_PERCENT: f64 = 10.0;
/// Projected ROI multiplier applied to the current average ROI
pub const ROI_UPLIFT: f64 = 1.25;
/// Projected engagement multiplier applied to the current rate
pub const ENGAGEMENT_UPLIFT: f64 = 1.15;

/// Figures shared by every composer branch
#[derive(Debug, Clone, PartialEq)]
pub struct Figures {
    pub customer_count: u64,
    pub active_customers: u64,
    pub vip_count: u64,
    pub regular_count: u64,
    pub new_count: u64,
    pub inactive_count: u64,
    pub total_revenue: f64,
    pub revenue_per_customer: f64,
    pub average_roi: f64,
    pub engagement_rate: f64,
    pub active_campaigns: u64,
    pub vip_share: f64,
    pub new_share: f64,
    pub inactive_share: f64,
    pub strategy_budget: f64,
    pub projected_roi: f64,
    pub projected_engagement: f64,
    pub projected_revenue_lift: f64,
}

impl Figures {
    pub fn from_snapshot(snapshot: &MetricsSnapshot) -> Self {
        let total_revenue = clamp(snapshot.total_revenue);
        let average_roi = finite(snapshot.average_roi);
        let engagement_rate = clamp(snapshot.engagement_rate).min(100.0);
        let strategy_budget = total_revenue * STRATEGY_BUDGET_PERCENT / 100.0;
        let projected_roi = average_roi * ROI_UPLIFT;

        Self {
            customer_count: snapshot.customer_count,
            active_customers: snapshot.active_customers(),
            vip_count: snapshot.vip_count,
            regular_count: snapshot.regular_count,
            new_count: snapshot.new_count,
            inactive_count: snapshot.inactive_count,
            total_revenue,
            revenue_per_customer: ratio(total_revenue, snapshot.customer_count as f64),
            average_roi,
            engagement_rate,
            active_campaigns: snapshot.active_campaign_count,
            vip_share: percent(snapshot.vip_count, snapshot.customer_count),
            new_share: percent(snapshot.new_count, snapshot.customer_count),
            inactive_share: percent(snapshot.inactive_count, snapshot.customer_count),
            strategy_budget,
            projected_roi,
            projected_engagement: (engagement_rate * ENGAGEMENT_UPLIFT).min(100.0),
            projected_revenue_lift: strategy_budget * projected_roi / 100.0,
        }
    }

    /// Portion of the strategy budget for a whole-number percentage
    pub fn budget_slice(&self, percent: u32) -> f64 {
        self.strategy_budget * f64::from(percent) / 100.0
    }

    /// Approximate head count for a percentage of all customers
    pub fn customers_share(&self, percent: f64) -> u64 {
        (self.customer_count as f64 * clamp(percent) / 100.0).round() as u64
    }
}

/// Division that yields 0 instead of NaN or infinity
pub fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator <= 0.0 || !denominator.is_finite() || !numerator.is_finite() {
        0.0
    } else {
        numerator / denominator
    }
}

fn percent(part: u64, whole: u64) -> f64 {
    ratio(part as f64 * 100.0, whole as f64)
}

fn clamp(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

/// Signed values such as ROI keep their sign; only NaN and infinities reset.
fn finite(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// `$1,234,567` style currency, rounded to whole dollars
pub fn format_money(value: f64) -> String {
    let rounded = clamp(value).round() as u64;
    format!("${}", group_thousands(rounded))
}

/// Plain integer count, e.g. `2847`
pub fn format_count(value: u64) -> String {
    value.to_string()
}

/// One decimal percentage, e.g. `12.5%`
pub fn format_percent(value: f64) -> String {
    let rounded = (finite(value) * 10.0).round() / 10.0;
    // avoid printing "-0.0%"
    let rounded = if rounded == 0.0 { 0.0 } else { rounded };
    format!("{:.1}%", rounded)
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> MetricsSnapshot {
        MetricsSnapshot::from_breakdown(150, 2000, 450, 247)
            .with_revenue(284_700.0)
            .with_roi(200.0)
            .with_engagement(40.0)
            .with_active_campaigns(6)
    }

    #[test]
    fn test_revenue_per_customer() {
        let figures = Figures::from_snapshot(&snapshot());
        assert_eq!(figures.customer_count, 2847);
        assert_eq!(figures.revenue_per_customer, 100.0);
    }

    #[test]
    fn test_zero_customers_never_divides() {
        let figures = Figures::from_snapshot(&MetricsSnapshot::empty().with_revenue(1000.0));
        assert_eq!(figures.revenue_per_customer, 0.0);
        assert!(figures.vip_share.is_finite());
        assert_eq!(figures.vip_share, 0.0);
        assert_eq!(figures.customers_share(25.0), 0);
    }

    #[test]
    fn test_projections() {
        let figures = Figures::from_snapshot(&snapshot());
        assert_eq!(figures.strategy_budget, 28_470.0);
        assert_eq!(figures.projected_roi, 250.0);
        assert!((figures.projected_engagement - 46.0).abs() < 1e-9);
        assert_eq!(figures.projected_revenue_lift, 71_175.0);
        assert_eq!(figures.budget_slice(40), 11_388.0);
    }

    #[test]
    fn test_projected_engagement_capped() {
        let figures = Figures::from_snapshot(&snapshot().with_engagement(95.0));
        assert_eq!(figures.projected_engagement, 100.0);
    }

    #[test]
    fn test_negative_inputs_clamped() {
        let mut raw = snapshot();
        raw.total_revenue = -10.0;
        raw.average_roi = f64::NAN;
        let figures = Figures::from_snapshot(&raw);
        assert_eq!(figures.total_revenue, 0.0);
        assert_eq!(figures.average_roi, 0.0);
        assert_eq!(figures.projected_roi, 0.0);
    }

    #[test]
    fn test_negative_roi_is_reported() {
        let figures = Figures::from_snapshot(&snapshot().with_roi(-15.0));
        assert_eq!(figures.average_roi, -15.0);
        assert_eq!(format_percent(figures.average_roi), "-15.0%");
        assert_eq!(format_money(figures.projected_revenue_lift), "$0");
    }

    #[test]
    fn test_formatting() {
        assert_eq!(format_money(1_234_567.4), "$1,234,567");
        assert_eq!(format_money(999.6), "$1,000");
        assert_eq!(format_money(0.0), "$0");
        assert_eq!(format_money(f64::NAN), "$0");
        assert_eq!(format_count(2847), "2847");
        assert_eq!(format_percent(12.345), "12.3%");
        assert_eq!(format_percent(-0.01), "0.0%");
        assert_eq!(format_percent(f64::INFINITY), "0.0%");
    }
}
