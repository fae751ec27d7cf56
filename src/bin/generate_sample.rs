use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Date32Array, Float64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use chrono::{Duration, NaiveDate};
use parquet::arrow::ArrowWriter;

const DAYS: i64 = 60;

const CAMPAIGNS: [(&str, &[&str]); 3] = [
    ("Spring Sale", &["Ad 1", "Ad 2", "Ad 3"]),
    ("Brand Awareness", &["Video A", "Video B"]),
    ("Retargeting", &["Carousel", "Dynamic"]),
];
const CHANNELS: [(&str, f64); 3] = [("Facebook", 1.0), ("Google Ads", 1.3), ("Instagram", 0.8)];
const CITIES: [(&str, f64, f64); 5] = [
    ("London", 51.5074, -0.1278),
    ("Manchester", 53.4808, -2.2426),
    ("Birmingham", 52.4862, -1.8904),
    ("Leeds", 53.8008, -1.5491),
    ("Glasgow", 55.8642, -4.2518),
];
const DEVICES: [&str; 3] = ["Mobile", "Desktop", "Tablet"];

const HEADERS: [&str; 15] = [
    "Date",
    "Campaign",
    "Channel",
    "Ad",
    "City/Location",
    "Device",
    "Latitude",
    "Longitude",
    "Spend, GBP",
    "Impressions",
    "Clicks",
    "Conversions",
    "Total conversion value, GBP",
    "CTR, %",
    "Daily Average CPC",
];

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn range(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64()
    }

    fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[(self.next_u64() % items.len() as u64) as usize]
    }
}

/// One generated row, in the dashboard's column order.
struct Row {
    date: NaiveDate,
    campaign: &'static str,
    channel: &'static str,
    ad: &'static str,
    city: &'static str,
    device: &'static str,
    latitude: f64,
    longitude: f64,
    spend: f64,
    impressions: f64,
    clicks: f64,
    conversions: f64,
    conversion_value: f64,
    ctr: f64,
    cpc: f64,
}

fn generate(rng: &mut SimpleRng, start: NaiveDate) -> Vec<Row> {
    let mut rows = Vec::new();
    for day in 0..DAYS {
        let date = start + Duration::days(day);
        for &(campaign, ads) in &CAMPAIGNS {
            for &(channel, cost_factor) in &CHANNELS {
                let &(city, latitude, longitude) = rng.pick(&CITIES);
                let device = *rng.pick(&DEVICES);
                let ad = *rng.pick(ads);

                let impressions = rng.range(800.0, 6000.0).round();
                let ctr = rng.range(0.008, 0.045);
                let clicks = (impressions * ctr).round();
                let cpc = rng.range(0.3, 1.6) * cost_factor;
                let spend = (clicks * cpc * 100.0).round() / 100.0;
                let conversions = (clicks * rng.range(0.02, 0.12)).round();
                let conversion_value = (conversions * rng.range(15.0, 60.0) * 100.0).round() / 100.0;

                rows.push(Row {
                    date,
                    campaign,
                    channel,
                    ad,
                    city,
                    device,
                    latitude,
                    longitude,
                    spend,
                    impressions,
                    clicks,
                    conversions,
                    conversion_value,
                    ctr,
                    cpc,
                });
            }
        }
    }
    rows
}

fn write_parquet(rows: &[Row], path: &Path) -> Result<()> {
    let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).context("epoch date")?;
    let text = |f: fn(&Row) -> &str| -> ArrayRef {
        Arc::new(StringArray::from(rows.iter().map(f).collect::<Vec<_>>()))
    };
    let float = |f: fn(&Row) -> f64| -> ArrayRef {
        Arc::new(Float64Array::from(rows.iter().map(f).collect::<Vec<_>>()))
    };

    let mut fields = vec![Field::new(HEADERS[0], DataType::Date32, false)];
    fields.extend(
        HEADERS[1..6]
            .iter()
            .map(|name| Field::new(*name, DataType::Utf8, false)),
    );
    fields.extend(
        HEADERS[6..]
            .iter()
            .map(|name| Field::new(*name, DataType::Float64, false)),
    );
    let schema = Arc::new(Schema::new(fields));

    let dates = Date32Array::from(
        rows.iter()
            .map(|r| (r.date - epoch).num_days() as i32)
            .collect::<Vec<_>>(),
    );
    let columns: Vec<ArrayRef> = vec![
        Arc::new(dates),
        text(|r| r.campaign),
        text(|r| r.channel),
        text(|r| r.ad),
        text(|r| r.city),
        text(|r| r.device),
        float(|r| r.latitude),
        float(|r| r.longitude),
        float(|r| r.spend),
        float(|r| r.impressions),
        float(|r| r.clicks),
        float(|r| r.conversions),
        float(|r| r.conversion_value),
        float(|r| r.ctr),
        float(|r| r.cpc),
    ];

    let batch = RecordBatch::try_new(schema.clone(), columns).context("building record batch")?;
    let file = std::fs::File::create(path)
        .with_context(|| format!("creating {}", path.display()))?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing parquet batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

fn write_csv(rows: &[Row], path: &Path) -> Result<()> {
    let mut writer =
        csv::Writer::from_path(path).with_context(|| format!("creating {}", path.display()))?;
    writer.write_record(HEADERS)?;
    for r in rows {
        writer.write_record([
            r.date.format("%Y-%m-%d").to_string(),
            r.campaign.to_string(),
            r.channel.to_string(),
            r.ad.to_string(),
            r.city.to_string(),
            r.device.to_string(),
            r.latitude.to_string(),
            r.longitude.to_string(),
            format!("{:.2}", r.spend),
            r.impressions.to_string(),
            r.clicks.to_string(),
            r.conversions.to_string(),
            format!("{:.2}", r.conversion_value),
            format!("{:.4}", r.ctr),
            format!("{:.2}", r.cpc),
        ])?;
    }
    writer.flush().context("flushing csv")?;
    Ok(())
}

/// The dashboard opens `campaign_data.xlsx` by default, so say how to point
/// it at the generated file instead.
fn open_hint(path: &Path) -> String {
    format!(
        "Open it with File → Open…, or start the dashboard with CAMPAIGN_DATA_PATH={}",
        path.display()
    )
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let out_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).context("start date")?;

    let mut rng = SimpleRng::new(42);
    let rows = generate(&mut rng, start);

    let parquet_path = out_dir.join("campaign_data.parquet");
    write_parquet(&rows, &parquet_path)?;
    let csv_path = out_dir.join("campaign_data.csv");
    write_csv(&rows, &csv_path)?;

    log::info!(
        "Wrote {} records over {DAYS} days to {} and {}",
        rows.len(),
        parquet_path.display(),
        csv_path.display()
    );
    log::info!("{}", open_hint(&parquet_path));
    Ok(())
}
