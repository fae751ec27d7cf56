//! Grouped reporting views over a filtered record set.
//!
//! Every view is a pure function of its input slice. Groups come out in the
//! order their key is first seen unless a view fixes its own order (weekday,
//! daily trend, top ads).

use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;

use chrono::NaiveDate;
use serde::Serialize;

use super::metrics::{safe_ratio, SummaryMetrics};
use super::model::{weekday_name, CampaignRecord, WEEKDAYS};

/// Default row count of the top-ads view.
pub const DEFAULT_TOP_ADS: usize = 5;

// ---------------------------------------------------------------------------
// Row types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WeekdayRow {
    pub day: &'static str,
    pub impressions: f64,
    pub clicks: f64,
    pub conversions: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DeviceRow {
    pub device: String,
    pub spend: f64,
    pub conversions: f64,
    pub conversion_value: f64,
    pub clicks: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AdRow {
    pub campaign: String,
    pub ad: String,
    pub channel: String,
    pub conversion_value: f64,
    pub spend: f64,
    pub conversions: f64,
    pub roas: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CityRow {
    pub city: String,
    pub latitude: f64,
    pub longitude: f64,
    pub conversion_value: f64,
    pub spend: f64,
    pub conversions: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChannelRow {
    pub channel: String,
    pub spend: f64,
    pub impressions: f64,
    pub clicks: f64,
    pub conversions: f64,
    pub conversion_value: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CampaignRow {
    pub campaign: String,
    pub spend: f64,
    pub conversions: f64,
    pub conversion_value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyRow {
    pub date: NaiveDate,
    pub spend: f64,
    pub conversion_value: f64,
    pub impressions: f64,
    pub clicks: f64,
    pub avg_ctr_pct: f64,
}

// ---------------------------------------------------------------------------
// Grouping
// ---------------------------------------------------------------------------

/// Fold records into one accumulator per key, keeping first-seen key order.
fn group_by<K, A>(
    records: &[&CampaignRecord],
    key: impl Fn(&CampaignRecord) -> K,
    init: impl Fn(&CampaignRecord) -> A,
    add: impl Fn(&mut A, &CampaignRecord),
) -> Vec<A>
where
    K: Eq + Hash,
{
    let mut slots: HashMap<K, usize> = HashMap::new();
    let mut groups: Vec<A> = Vec::new();
    for &rec in records {
        let i = *slots.entry(key(rec)).or_insert_with(|| {
            groups.push(init(rec));
            groups.len() - 1
        });
        add(&mut groups[i], rec);
    }
    groups
}

/// Impressions, clicks and conversions per weekday, always Monday..Sunday.
pub fn by_weekday(records: &[&CampaignRecord]) -> Vec<WeekdayRow> {
    let mut rows: Vec<WeekdayRow> = WEEKDAYS
        .iter()
        .map(|&day| WeekdayRow {
            day: weekday_name(day),
            ..Default::default()
        })
        .collect();
    for rec in records {
        let row = &mut rows[rec.day_of_week.num_days_from_monday() as usize];
        row.impressions += rec.impressions;
        row.clicks += rec.clicks;
        row.conversions += rec.conversions;
    }
    rows
}

pub fn by_device(records: &[&CampaignRecord]) -> Vec<DeviceRow> {
    group_by(
        records,
        |r| r.device.clone(),
        |r| DeviceRow {
            device: r.device.clone(),
            ..Default::default()
        },
        |row, r| {
            row.spend += r.spend;
            row.conversions += r.conversions;
            row.conversion_value += r.conversion_value;
            row.clicks += r.clicks;
        },
    )
}

/// Every (campaign, ad, channel) group with its ROAS, in first-seen order.
pub fn ad_performance(records: &[&CampaignRecord]) -> Vec<AdRow> {
    let mut rows = group_by(
        records,
        |r| (r.campaign.clone(), r.ad.clone(), r.channel.clone()),
        |r| AdRow {
            campaign: r.campaign.clone(),
            ad: r.ad.clone(),
            channel: r.channel.clone(),
            ..Default::default()
        },
        |row, r| {
            row.conversion_value += r.conversion_value;
            row.spend += r.spend;
            row.conversions += r.conversions;
        },
    );
    for row in &mut rows {
        row.roas = safe_ratio(row.conversion_value, row.spend);
    }
    rows
}

/// The `limit` best ads by conversion value. Ties keep first-seen order.
pub fn top_ads(records: &[&CampaignRecord], limit: usize) -> Vec<AdRow> {
    let mut rows = ad_performance(records);
    // sort_by is stable
    rows.sort_by(|a, b| b.conversion_value.total_cmp(&a.conversion_value));
    rows.truncate(limit);
    rows
}

/// Per-city totals. Coordinates come from the first record seen for the city.
pub fn by_city(records: &[&CampaignRecord]) -> Vec<CityRow> {
    group_by(
        records,
        |r| r.city.clone(),
        |r| CityRow {
            city: r.city.clone(),
            latitude: r.latitude,
            longitude: r.longitude,
            ..Default::default()
        },
        |row, r| {
            row.conversion_value += r.conversion_value;
            row.spend += r.spend;
            row.conversions += r.conversions;
        },
    )
}

pub fn by_channel(records: &[&CampaignRecord]) -> Vec<ChannelRow> {
    group_by(
        records,
        |r| r.channel.clone(),
        |r| ChannelRow {
            channel: r.channel.clone(),
            ..Default::default()
        },
        |row, r| {
            row.spend += r.spend;
            row.impressions += r.impressions;
            row.clicks += r.clicks;
            row.conversions += r.conversions;
            row.conversion_value += r.conversion_value;
        },
    )
}

pub fn by_campaign(records: &[&CampaignRecord]) -> Vec<CampaignRow> {
    group_by(
        records,
        |r| r.campaign.clone(),
        |r| CampaignRow {
            campaign: r.campaign.clone(),
            ..Default::default()
        },
        |row, r| {
            row.spend += r.spend;
            row.conversions += r.conversions;
            row.conversion_value += r.conversion_value;
        },
    )
}

/// Per-date totals in ascending date order, with the day's mean CTR.
pub fn daily_trend(records: &[&CampaignRecord]) -> Vec<DailyRow> {
    #[derive(Default)]
    struct Acc {
        spend: f64,
        conversion_value: f64,
        impressions: f64,
        clicks: f64,
        ctr_sum: f64,
        n: usize,
    }

    let mut days: BTreeMap<NaiveDate, Acc> = BTreeMap::new();
    for rec in records {
        let acc = days.entry(rec.date).or_default();
        acc.spend += rec.spend;
        acc.conversion_value += rec.conversion_value;
        acc.impressions += rec.impressions;
        acc.clicks += rec.clicks;
        acc.ctr_sum += rec.ctr;
        acc.n += 1;
    }
    days.into_iter()
        .map(|(date, acc)| DailyRow {
            date,
            spend: acc.spend,
            conversion_value: acc.conversion_value,
            impressions: acc.impressions,
            clicks: acc.clicks,
            avg_ctr_pct: safe_ratio(acc.ctr_sum, acc.n as f64) * 100.0,
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Report – everything the dashboard shows for one filter state
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Report {
    pub metrics: SummaryMetrics,
    pub daily: Vec<DailyRow>,
    pub by_weekday: Vec<WeekdayRow>,
    pub by_device: Vec<DeviceRow>,
    pub top_ads: Vec<AdRow>,
    pub by_city: Vec<CityRow>,
    pub by_channel: Vec<ChannelRow>,
    pub by_campaign: Vec<CampaignRow>,
}

impl Report {
    pub fn build(records: &[&CampaignRecord], top_ads_limit: usize) -> Self {
        Report {
            metrics: SummaryMetrics::compute(records),
            daily: daily_trend(records),
            by_weekday: by_weekday(records),
            by_device: by_device(records),
            top_ads: top_ads(records, top_ads_limit),
            by_city: by_city(records),
            by_channel: by_channel(records),
            by_campaign: by_campaign(records),
        }
    }
}
