use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use chrono::{Datelike, NaiveDate, Weekday};
use serde::Serialize;

// ---------------------------------------------------------------------------
// Weekdays
// ---------------------------------------------------------------------------

/// Canonical reporting order of the week.
pub const WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// English weekday name (`Monday`, `Tuesday`, …).
pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

// ---------------------------------------------------------------------------
// Dimension – a categorical column the user can filter on
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Dimension {
    Campaign,
    Channel,
    City,
    Device,
}

impl Dimension {
    /// Filter panel order.
    pub const ALL: [Dimension; 4] = [
        Dimension::Campaign,
        Dimension::Channel,
        Dimension::City,
        Dimension::Device,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Dimension::Campaign => "Campaign",
            Dimension::Channel => "Channel",
            Dimension::City => "City",
            Dimension::Device => "Device",
        }
    }

    /// The record's value for this dimension.
    pub fn value_of(self, record: &CampaignRecord) -> &str {
        match self {
            Dimension::Campaign => &record.campaign,
            Dimension::Channel => &record.channel,
            Dimension::City => &record.city,
            Dimension::Device => &record.device,
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// CampaignRecord – one row of the source sheet
// ---------------------------------------------------------------------------

/// One observation for a (date, campaign, ad, channel, city, device) combination.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CampaignRecord {
    pub date: NaiveDate,
    /// Derived from `date` when the record is built.
    pub day_of_week: Weekday,
    pub campaign: String,
    pub channel: String,
    pub ad: String,
    pub city: String,
    pub device: String,
    pub latitude: f64,
    pub longitude: f64,
    pub spend: f64,
    pub impressions: f64,
    pub clicks: f64,
    pub conversions: f64,
    pub conversion_value: f64,
    /// Click-through rate as a fraction (0.05 = 5 %).
    pub ctr: f64,
    pub daily_avg_cpc: f64,
}

impl CampaignRecord {
    /// English name of the record's weekday.
    pub fn day_name(&self) -> &'static str {
        weekday_name(self.day_of_week)
    }
}

/// Field values for a record, minus the derived weekday.
///
/// The loader and tests fill this in and call [`RecordFields::build`] so the
/// weekday can never disagree with the date.
#[derive(Debug, Clone, Default)]
pub struct RecordFields {
    pub date: NaiveDate,
    pub campaign: String,
    pub channel: String,
    pub ad: String,
    pub city: String,
    pub device: String,
    pub latitude: f64,
    pub longitude: f64,
    pub spend: f64,
    pub impressions: f64,
    pub clicks: f64,
    pub conversions: f64,
    pub conversion_value: f64,
    pub ctr: f64,
    pub daily_avg_cpc: f64,
}

impl RecordFields {
    pub fn build(self) -> CampaignRecord {
        CampaignRecord {
            day_of_week: self.date.weekday(),
            date: self.date,
            campaign: self.campaign,
            channel: self.channel,
            ad: self.ad,
            city: self.city,
            device: self.device,
            latitude: self.latitude,
            longitude: self.longitude,
            spend: self.spend,
            impressions: self.impressions,
            clicks: self.clicks,
            conversions: self.conversions,
            conversion_value: self.conversion_value,
            ctr: self.ctr,
            daily_avg_cpc: self.daily_avg_cpc,
        }
    }
}

// ---------------------------------------------------------------------------
// CampaignDataset – the complete loaded dataset
// ---------------------------------------------------------------------------

/// The full parsed dataset with pre-computed filter indices.
#[derive(Debug, Clone, Default)]
pub struct CampaignDataset {
    /// All records in source order.
    pub records: Vec<CampaignRecord>,
    /// For each filter dimension the sorted set of distinct values.
    pub unique_values: BTreeMap<Dimension, BTreeSet<String>>,
    /// Earliest and latest date present (inclusive).
    pub date_span: Option<(NaiveDate, NaiveDate)>,
}

impl CampaignDataset {
    /// Build filter indices from the loaded records.
    pub fn from_records(records: Vec<CampaignRecord>) -> Self {
        let mut unique_values: BTreeMap<Dimension, BTreeSet<String>> = Dimension::ALL
            .iter()
            .map(|&dim| (dim, BTreeSet::new()))
            .collect();
        let mut date_span: Option<(NaiveDate, NaiveDate)> = None;

        for rec in &records {
            for dim in Dimension::ALL {
                unique_values
                    .entry(dim)
                    .or_default()
                    .insert(dim.value_of(rec).to_string());
            }
            date_span = Some(match date_span {
                None => (rec.date, rec.date),
                Some((lo, hi)) => (lo.min(rec.date), hi.max(rec.date)),
            });
        }

        CampaignDataset {
            records,
            unique_values,
            date_span,
        }
    }

    /// Distinct values of one dimension, sorted.
    pub fn values(&self, dim: Dimension) -> impl Iterator<Item = &str> {
        self.unique_values
            .get(&dim)
            .into_iter()
            .flat_map(|set| set.iter().map(String::as_str))
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    /// A record with the given dimensions and measures; everything else is neutral.
    pub fn record(
        day: NaiveDate,
        campaign: &str,
        channel: &str,
        city: &str,
        device: &str,
    ) -> RecordFields {
        RecordFields {
            date: day,
            campaign: campaign.into(),
            channel: channel.into(),
            ad: "Ad 1".into(),
            city: city.into(),
            device: device.into(),
            latitude: 51.5,
            longitude: -0.12,
            ..RecordFields::default()
        }
    }

    /// Twelve records across two campaigns, channels, cities and devices
    /// spanning 2024-03-04 (Monday) to 2024-03-09 (Saturday).
    pub fn sample_records() -> Vec<CampaignRecord> {
        let campaigns = ["Spring Sale", "Brand Awareness"];
        let channels = ["Facebook", "Google Ads"];
        let cities = ["London", "Manchester"];
        let devices = ["Mobile", "Desktop"];
        (0..12u32)
            .map(|i| {
                let i_usize = i as usize;
                let mut f = record(
                    date(2024, 3, 4 + i % 6),
                    campaigns[i_usize % 2],
                    channels[(i_usize / 2) % 2],
                    cities[(i_usize / 3) % 2],
                    devices[(i_usize / 4) % 2],
                );
                let n = f64::from(i + 1);
                f.ad = format!("Ad {}", i % 3 + 1);
                f.spend = 10.0 * n;
                f.impressions = 1000.0 * n;
                f.clicks = 20.0 * n;
                f.conversions = n;
                f.conversion_value = 25.0 * n;
                f.ctr = 0.02;
                f.daily_avg_cpc = 0.5;
                if f.city == "Manchester" {
                    f.latitude = 53.48;
                    f.longitude = -2.24;
                }
                f.build()
            })
            .collect()
    }
}
