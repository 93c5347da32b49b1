//! Business metrics snapshot models

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A discovered customer cluster used to personalize strategies
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub id: String,
    pub name: String,
    pub count: u64,
    #[serde(default)]
    pub patterns: BTreeSet<String>,
}

impl Segment {
    pub fn new(id: impl Into<String>, name: impl Into<String>, count: u64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            count,
            patterns: BTreeSet::new(),
        }
    }

    pub fn with_patterns<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.patterns.extend(patterns.into_iter().map(Into::into));
        self
    }
}

/// Point-in-time, read-only copy of aggregate business metrics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSnapshot {
    pub customer_count: u64,
    pub vip_count: u64,
    pub regular_count: u64,
    pub new_count: u64,
    pub inactive_count: u64,
    /// Total revenue in dollars
    pub total_revenue: f64,
    /// Average campaign ROI as a percentage
    pub average_roi: f64,
    /// Engagement rate as a percentage in [0, 100]
    pub engagement_rate: f64,
    pub active_campaign_count: u64,
    #[serde(default)]
    pub segments: Vec<Segment>,
}

impl MetricsSnapshot {
    /// Build a snapshot from the customer breakdown; `customer_count` is the sum.
    pub fn from_breakdown(vip: u64, regular: u64, new: u64, inactive: u64) -> Self {
        Self {
            customer_count: vip + regular + new + inactive,
            vip_count: vip,
            regular_count: regular,
            new_count: new,
            inactive_count: inactive,
            ..Self::empty()
        }
    }

    /// Zeroed snapshot substituted when the metrics source is unavailable
    pub fn empty() -> Self {
        Self {
            customer_count: 0,
            vip_count: 0,
            regular_count: 0,
            new_count: 0,
            inactive_count: 0,
            total_revenue: 0.0,
            average_roi: 0.0,
            engagement_rate: 0.0,
            active_campaign_count: 0,
            segments: Vec::new(),
        }
    }

    pub fn with_revenue(mut self, total_revenue: f64) -> Self {
        self.total_revenue = total_revenue;
        self
    }

    pub fn with_roi(mut self, average_roi: f64) -> Self {
        self.average_roi = average_roi;
        self
    }

    pub fn with_engagement(mut self, engagement_rate: f64) -> Self {
        self.engagement_rate = engagement_rate;
        self
    }

    pub fn with_active_campaigns(mut self, count: u64) -> Self {
        self.active_campaign_count = count;
        self
    }

    pub fn with_segment(mut self, segment: Segment) -> Self {
        self.segments.push(segment);
        self
    }

    /// Clamp invalid figures so downstream text never sees NaN or negatives.
    ///
    /// `customer_count` is re-derived from the breakdown when the two disagree.
    pub fn sanitized(mut self) -> Self {
        self.total_revenue = non_negative(self.total_revenue);
        self.average_roi = if self.average_roi.is_finite() {
            self.average_roi
        } else {
            0.0
        };
        self.engagement_rate = non_negative(self.engagement_rate).min(100.0);

        let breakdown = self
            .vip_count
            .saturating_add(self.regular_count)
            .saturating_add(self.new_count)
            .saturating_add(self.inactive_count);
        if breakdown != self.customer_count {
            self.customer_count = breakdown;
        }

        self.segments.retain(|s| !s.name.trim().is_empty());
        self
    }

    /// Customers who are not inactive
    pub fn active_customers(&self) -> u64 {
        self.customer_count.saturating_sub(self.inactive_count)
    }
}

impl Default for MetricsSnapshot {
    fn default() -> Self {
        Self::empty()
    }
}

fn non_negative(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_breakdown_sums_counts() {
        let snapshot = MetricsSnapshot::from_breakdown(120, 2000, 500, 227);
        assert_eq!(snapshot.customer_count, 2847);
        assert_eq!(snapshot.active_customers(), 2620);
    }

    #[test]
    fn test_sanitized_clamps_invalid_figures() {
        let mut snapshot = MetricsSnapshot::from_breakdown(1, 2, 3, 4)
            .with_revenue(-50.0)
            .with_roi(f64::NAN)
            .with_engagement(140.0);
        snapshot.customer_count = 99;

        let clean = snapshot.sanitized();
        assert_eq!(clean.total_revenue, 0.0);
        assert_eq!(clean.average_roi, 0.0);
        assert_eq!(clean.engagement_rate, 100.0);
        assert_eq!(clean.customer_count, 10);
    }

    #[test]
    fn test_sanitized_drops_unnamed_segments() {
        let snapshot = MetricsSnapshot::empty()
            .with_segment(Segment::new("s1", "  ", 10))
            .with_segment(Segment::new("s2", "Weekend Shoppers", 40));
        let clean = snapshot.sanitized();
        assert_eq!(clean.segments.len(), 1);
        assert_eq!(clean.segments[0].name, "Weekend Shoppers");
    }

    #[test]
    fn test_snapshot_json_shape() {
        let json = r#"{
            "customerCount": 10, "vipCount": 1, "regularCount": 5,
            "newCount": 2, "inactiveCount": 2, "totalRevenue": 1000.5,
            "averageRoi": 150.0, "engagementRate": 40.0, "activeCampaignCount": 3,
            "segments": [{"id": "weekend", "name": "Weekend Shoppers", "count": 4, "patterns": ["weekend"]}]
        }"#;
        let snapshot: MetricsSnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(snapshot.customer_count, 10);
        assert_eq!(snapshot.segments[0].patterns.len(), 1);
    }
}
