use serde::Serialize;

use super::model::CampaignRecord;

/// Divide, returning 0 when the denominator is 0 or the result is not finite.
///
/// Every ratio shown in the dashboard goes through here, so no metric is ever
/// NaN or infinite.
pub fn safe_ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        return 0.0;
    }
    let q = numerator / denominator;
    if q.is_finite() {
        q
    } else {
        0.0
    }
}

/// Arithmetic mean; 0 for an empty input.
pub fn mean<I>(values: I) -> f64
where
    I: IntoIterator<Item = f64>,
{
    let (sum, n) = values
        .into_iter()
        .fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    safe_ratio(sum, n as f64)
}

/// Headline numbers for a filtered set of records.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SummaryMetrics {
    pub record_count: usize,
    pub total_spend: f64,
    pub impressions: f64,
    pub clicks: f64,
    pub conversions: f64,
    pub conversion_value: f64,
    /// Mean of the per-row CTR fractions, as a percentage.
    pub avg_ctr_pct: f64,
    pub avg_cpc: f64,
    pub roas: f64,
    pub cost_per_conversion: f64,
    pub conversion_rate_pct: f64,
}

impl SummaryMetrics {
    pub fn compute(records: &[&CampaignRecord]) -> Self {
        let mut m = SummaryMetrics {
            record_count: records.len(),
            ..Default::default()
        };
        for r in records {
            m.total_spend += r.spend;
            m.impressions += r.impressions;
            m.clicks += r.clicks;
            m.conversions += r.conversions;
            m.conversion_value += r.conversion_value;
        }
        m.avg_ctr_pct = mean(records.iter().map(|r| r.ctr)) * 100.0;
        m.avg_cpc = mean(records.iter().map(|r| r.daily_avg_cpc));
        m.roas = safe_ratio(m.conversion_value, m.total_spend);
        m.cost_per_conversion = safe_ratio(m.total_spend, m.conversions);
        m.conversion_rate_pct = safe_ratio(m.conversions, m.clicks) * 100.0;
        m
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::fixtures::{date, record, sample_records};

    fn with_measures(spend: f64, value: f64) -> CampaignRecord {
        let mut f = record(date(2024, 5, 1), "C", "Ch", "London", "Mobile");
        f.spend = spend;
        f.conversion_value = value;
        f.build()
    }

    #[test]
    fn safe_ratio_guards_zero_denominator() {
        assert_eq!(safe_ratio(5.0, 0.0), 0.0);
        assert_eq!(safe_ratio(0.0, 0.0), 0.0);
        assert_eq!(safe_ratio(-3.0, -0.0), 0.0);
        assert_eq!(safe_ratio(3.0, 4.0), 0.75);
    }

    #[test]
    fn safe_ratio_never_returns_non_finite() {
        assert_eq!(safe_ratio(f64::MAX, f64::MIN_POSITIVE), 0.0);
        assert_eq!(safe_ratio(f64::NAN, 2.0), 0.0);
    }

    #[test]
    fn three_record_example() {
        let records = [
            with_measures(10.0, 5.0),
            with_measures(20.0, 10.0),
            with_measures(30.0, 0.0),
        ];
        let refs: Vec<&CampaignRecord> = records.iter().collect();
        let m = SummaryMetrics::compute(&refs);
        assert_eq!(m.total_spend, 60.0);
        assert_eq!(m.conversion_value, 15.0);
        assert_eq!(m.roas, 0.25);
        assert_eq!(m.record_count, 3);
    }

    #[test]
    fn empty_input_is_all_zero() {
        let m = SummaryMetrics::compute(&[]);
        assert_eq!(m, SummaryMetrics::default());
        assert_eq!(m.roas, 0.0);
        assert_eq!(m.cost_per_conversion, 0.0);
        assert_eq!(m.conversion_rate_pct, 0.0);
        assert_eq!(m.avg_ctr_pct, 0.0);
        assert_eq!(m.avg_cpc, 0.0);
    }

    #[test]
    fn ratios_are_zero_exactly_when_denominator_is_zero() {
        // spend > 0 but no clicks and no conversions
        let mut f = record(date(2024, 5, 1), "C", "Ch", "London", "Mobile");
        f.spend = 12.0;
        f.conversion_value = 30.0;
        let rec = f.build();
        let m = SummaryMetrics::compute(&[&rec]);
        assert_eq!(m.roas, 2.5);
        assert_eq!(m.cost_per_conversion, 0.0);
        assert_eq!(m.conversion_rate_pct, 0.0);
        assert!(!m.roas.is_nan());
    }

    #[test]
    fn ctr_is_reported_as_percentage_of_the_mean() {
        let mut a = record(date(2024, 5, 1), "C", "Ch", "London", "Mobile");
        a.ctr = 0.02;
        a.daily_avg_cpc = 1.0;
        let mut b = a.clone();
        b.ctr = 0.04;
        b.daily_avg_cpc = 2.0;
        let (a, b) = (a.build(), b.build());
        let m = SummaryMetrics::compute(&[&a, &b]);
        assert!((m.avg_ctr_pct - 3.0).abs() < 1e-9);
        assert!((m.avg_cpc - 1.5).abs() < 1e-9);
    }

    #[test]
    fn derived_ratios_use_totals() {
        let records = sample_records();
        let refs: Vec<&CampaignRecord> = records.iter().collect();
        let m = SummaryMetrics::compute(&refs);
        // n = 1..=12 → Σn = 78
        assert_eq!(m.total_spend, 780.0);
        assert_eq!(m.clicks, 1560.0);
        assert_eq!(m.conversions, 78.0);
        assert_eq!(m.conversion_value, 1950.0);
        assert_eq!(m.roas, 2.5);
        assert_eq!(m.cost_per_conversion, 10.0);
        assert_eq!(m.conversion_rate_pct, 5.0);
    }

    #[test]
    fn sums_are_additive_over_a_partition() {
        let records = sample_records();
        let all: Vec<&CampaignRecord> = records.iter().collect();
        let (mobile, other): (Vec<&CampaignRecord>, Vec<&CampaignRecord>) =
            all.iter().copied().partition(|r| r.device == "Mobile");
        let whole = SummaryMetrics::compute(&all);
        let a = SummaryMetrics::compute(&mobile);
        let b = SummaryMetrics::compute(&other);
        assert_eq!(whole.total_spend, a.total_spend + b.total_spend);
        assert_eq!(whole.impressions, a.impressions + b.impressions);
        assert_eq!(whole.clicks, a.clicks + b.clicks);
        assert_eq!(whole.conversions, a.conversions + b.conversions);
        assert_eq!(
            whole.conversion_value,
            a.conversion_value + b.conversion_value
        );
        assert_eq!(whole.record_count, a.record_count + b.record_count);
    }
}
