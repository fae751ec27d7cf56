use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use arrow::array::{Array, ArrayRef, AsArray, BooleanArray};
use arrow::compute::cast;
use arrow::datatypes::{DataType, Date32Type, Float64Type};
use calamine::{open_workbook_auto, Data, Reader};
use chrono::{DateTime, Days, NaiveDate, NaiveDateTime};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::error::LoadError;
use super::model::{CampaignDataset, CampaignRecord, RecordFields};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Loader settings that depend on the source rather than on the data.
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// Worksheet to read from a workbook; the first sheet when `None`.
    pub sheet: Option<String>,
}

/// Load a campaign dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.xlsx` / `.xlsm` / `.xls` / `.ods` – workbook, header in the first row
/// * `.csv`     – header row followed by one record per line
/// * `.json`    – `[{ "Date": ..., "Campaign": ..., ... }, ...]`
/// * `.parquet` – one column per field, dates as Date32/Timestamp or text
pub fn load_file(path: &Path, options: &LoadOptions) -> Result<CampaignDataset, LoadError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let table = match ext.as_str() {
        "xlsx" | "xlsm" | "xls" | "ods" => read_workbook(path, options)?,
        "csv" => read_csv(path)?,
        "json" => read_json(path)?,
        "parquet" | "pq" => read_parquet(path)?,
        other => return Err(LoadError::UnsupportedExtension(other.to_string())),
    };

    let records = table.into_records()?;
    let dataset = CampaignDataset::from_records(records);
    match dataset.date_span {
        Some((first, last)) => log::info!(
            "Loaded {} records from {} ({first} to {last})",
            dataset.len(),
            path.display()
        ),
        None => log::info!("Loaded an empty dataset from {}", path.display()),
    }
    Ok(dataset)
}

// ---------------------------------------------------------------------------
// Intermediate table: every format is lowered to header names + cell rows
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
enum Cell {
    Empty,
    Text(String),
    Number(f64),
    Date(NaiveDate),
}

impl Cell {
    fn from_text(s: &str) -> Cell {
        if s.trim().is_empty() {
            Cell::Empty
        } else {
            Cell::Text(s.to_string())
        }
    }

    fn is_empty(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    fn header_text(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Text(s) => s.trim().to_string(),
            Cell::Number(n) => format_number_label(*n),
            Cell::Date(d) => d.to_string(),
        }
    }
}

struct RawTable {
    headers: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

static EMPTY: Cell = Cell::Empty;

/// Header → position of every required column.
struct ColumnIndex {
    date: usize,
    campaign: usize,
    channel: usize,
    ad: usize,
    city: usize,
    device: usize,
    latitude: usize,
    longitude: usize,
    spend: usize,
    impressions: usize,
    clicks: usize,
    conversions: usize,
    conversion_value: usize,
    ctr: usize,
    daily_avg_cpc: usize,
}

impl ColumnIndex {
    fn resolve(headers: &[String]) -> Result<Self, LoadError> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim() == name)
                .ok_or_else(|| LoadError::MissingColumn(name.to_string()))
        };
        Ok(ColumnIndex {
            date: find("Date")?,
            campaign: find("Campaign")?,
            channel: find("Channel")?,
            ad: find("Ad")?,
            city: find("City/Location")?,
            device: find("Device")?,
            latitude: find("Latitude")?,
            longitude: find("Longitude")?,
            spend: find("Spend, GBP")?,
            impressions: find("Impressions")?,
            clicks: find("Clicks")?,
            conversions: find("Conversions")?,
            conversion_value: find("Total conversion value, GBP")?,
            ctr: find("CTR, %")?,
            daily_avg_cpc: find("Daily Average CPC")?,
        })
    }
}

impl RawTable {
    fn into_records(self) -> Result<Vec<CampaignRecord>, LoadError> {
        let idx = ColumnIndex::resolve(&self.headers)?;
        let headers = &self.headers;
        let mut records = Vec::with_capacity(self.rows.len());

        for (i, cells) in self.rows.iter().enumerate() {
            let row = i + 1;
            if cells.iter().all(Cell::is_empty) {
                log::debug!("Skipping blank row {row}");
                continue;
            }

            let get = |col: usize| cells.get(col).unwrap_or(&EMPTY);
            let invalid = |col: usize, reason: String| LoadError::InvalidCell {
                row,
                column: headers[col].clone(),
                reason,
            };
            let text = |col: usize| parse_text(get(col)).map_err(|e| invalid(col, e));
            let number = |col: usize| parse_number(get(col)).map_err(|e| invalid(col, e));

            let fields = RecordFields {
                date: parse_date(get(idx.date)).map_err(|e| invalid(idx.date, e))?,
                campaign: text(idx.campaign)?,
                channel: text(idx.channel)?,
                ad: text(idx.ad)?,
                city: text(idx.city)?,
                device: text(idx.device)?,
                latitude: number(idx.latitude)?,
                longitude: number(idx.longitude)?,
                spend: number(idx.spend)?,
                impressions: number(idx.impressions)?,
                clicks: number(idx.clicks)?,
                conversions: number(idx.conversions)?,
                conversion_value: number(idx.conversion_value)?,
                ctr: number(idx.ctr)?,
                daily_avg_cpc: number(idx.daily_avg_cpc)?,
            };
            records.push(fields.build());
        }

        Ok(records)
    }
}

// ---------------------------------------------------------------------------
// Cell coercion
// ---------------------------------------------------------------------------

/// Day zero of the Excel 1900 date system (accounts for the 1900 leap-year bug).
fn excel_epoch() -> NaiveDate {
    NaiveDate::from_ymd_opt(1899, 12, 30).unwrap_or_default()
}

/// Numbers at or above this are Unix epoch milliseconds, not Excel serials.
const EPOCH_MILLIS_THRESHOLD: f64 = 1e10;

fn parse_date(cell: &Cell) -> Result<NaiveDate, String> {
    match cell {
        Cell::Date(d) => Ok(*d),
        Cell::Number(n) => date_from_number(*n),
        Cell::Text(s) => parse_date_text(s.trim()),
        Cell::Empty => Err("empty date".to_string()),
    }
}

fn date_from_number(n: f64) -> Result<NaiveDate, String> {
    if !n.is_finite() || n < 0.0 {
        return Err(format!("{n} is not a valid date serial"));
    }
    if n >= EPOCH_MILLIS_THRESHOLD {
        return DateTime::from_timestamp_millis(n as i64)
            .map(|dt| dt.date_naive())
            .ok_or_else(|| format!("{n} is out of range for an epoch timestamp"));
    }
    excel_epoch()
        .checked_add_days(Days::new(n.floor() as u64))
        .ok_or_else(|| format!("{n} is out of range for a date serial"))
}

fn parse_date_text(s: &str) -> Result<NaiveDate, String> {
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(d);
    }
    for fmt in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(dt.date());
        }
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.date_naive());
    }
    if let Ok(d) = NaiveDate::parse_from_str(s, "%d/%m/%Y") {
        return Ok(d);
    }
    Err(format!("'{s}' is not a recognised date"))
}

/// Accepts plain numbers and text such as `£1,234.50` or `4.5%` (→ 0.045).
fn parse_number(cell: &Cell) -> Result<f64, String> {
    let value = match cell {
        Cell::Number(n) => *n,
        Cell::Text(raw) => {
            let mut s = raw.trim();
            s = s.strip_prefix('£').unwrap_or(s).trim_start();
            let (s, percent) = match s.strip_suffix('%') {
                Some(rest) => (rest.trim_end(), true),
                None => (s, false),
            };
            let cleaned: String = s.chars().filter(|&c| c != ',').collect();
            let n = cleaned
                .parse::<f64>()
                .map_err(|_| format!("'{raw}' is not a number"))?;
            if percent {
                n / 100.0
            } else {
                n
            }
        }
        Cell::Date(d) => return Err(format!("expected a number, found date {d}")),
        Cell::Empty => return Err("empty value".to_string()),
    };
    if value.is_finite() {
        Ok(value)
    } else {
        Err(format!("{value} is not a finite number"))
    }
}

fn parse_text(cell: &Cell) -> Result<String, String> {
    match cell {
        Cell::Text(s) if !s.trim().is_empty() => Ok(s.trim().to_string()),
        Cell::Number(n) => Ok(format_number_label(*n)),
        Cell::Date(d) => Ok(d.to_string()),
        _ => Err("empty value".to_string()),
    }
}

/// `3.0` → `"3"`, `2.5` → `"2.5"`.
fn format_number_label(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

// ---------------------------------------------------------------------------
// Workbook loader
// ---------------------------------------------------------------------------

fn read_workbook(path: &Path, options: &LoadOptions) -> Result<RawTable, LoadError> {
    let mut workbook = open_workbook_auto(path)?;
    let range = match &options.sheet {
        Some(name) => workbook.worksheet_range(name)?,
        None => workbook
            .worksheet_range_at(0)
            .ok_or(LoadError::EmptyWorkbook)??,
    };

    let mut rows = range.rows();
    let headers: Vec<String> = match rows.next() {
        Some(header_row) => header_row
            .iter()
            .map(|c| workbook_cell(c).header_text())
            .collect(),
        None => Vec::new(),
    };
    let rows: Vec<Vec<Cell>> = rows
        .map(|r| r.iter().map(workbook_cell).collect())
        .collect();

    Ok(RawTable { headers, rows })
}

fn workbook_cell(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::String(s) => Cell::from_text(s),
        Data::Float(f) => Cell::Number(*f),
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Bool(b) => Cell::Text(b.to_string()),
        Data::DateTime(dt) => match date_from_number(dt.as_f64()) {
            Ok(d) => Cell::Date(d),
            Err(_) => Cell::Number(dt.as_f64()),
        },
        Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::Text(s.clone()),
        Data::Error(e) => Cell::Text(e.to_string()),
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

fn read_csv(path: &Path) -> Result<RawTable, LoadError> {
    let mut reader = csv::Reader::from_path(path)?;
    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        rows.push(record.iter().map(Cell::from_text).collect());
    }

    Ok(RawTable { headers, rows })
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "Date": "2024-03-04", "Campaign": "Spring Sale", "Spend, GBP": 12.5, ... },
///   ...
/// ]
/// ```
///
/// Pandas writes dates as epoch milliseconds by default; those are accepted
/// alongside ISO text.
fn read_json(path: &Path) -> Result<RawTable, LoadError> {
    let file = File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let root: JsonValue = serde_json::from_reader(BufReader::new(file))?;
    let records = root.as_array().ok_or(LoadError::JsonShape)?;

    let headers: Vec<String> = match records.first() {
        Some(first) => first
            .as_object()
            .ok_or(LoadError::JsonShape)?
            .keys()
            .cloned()
            .collect(),
        None => Vec::new(),
    };

    let mut rows = Vec::with_capacity(records.len());
    for rec in records {
        let obj = rec.as_object().ok_or(LoadError::JsonShape)?;
        rows.push(
            headers
                .iter()
                .map(|h| obj.get(h).map(json_cell).unwrap_or(Cell::Empty))
                .collect(),
        );
    }

    Ok(RawTable { headers, rows })
}

fn json_cell(val: &JsonValue) -> Cell {
    match val {
        JsonValue::Null => Cell::Empty,
        JsonValue::String(s) => Cell::from_text(s),
        JsonValue::Number(n) => n.as_f64().map(Cell::Number).unwrap_or(Cell::Empty),
        JsonValue::Bool(b) => Cell::Text(b.to_string()),
        other => Cell::Text(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with one column per field.
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`): numeric columns of any width are read
/// as `f64`, dates may be Date32/Date64/Timestamp or text.
fn read_parquet(path: &Path) -> Result<RawTable, LoadError> {
    let file = File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;
    // from the file schema, so a file without row groups still has headers
    let headers: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let reader = builder.build()?;

    let mut rows: Vec<Vec<Cell>> = Vec::new();

    for batch_result in reader {
        let batch = batch_result?;

        let columns: Vec<Vec<Cell>> = batch
            .columns()
            .iter()
            .map(arrow_cells)
            .collect::<Result<_, _>>()?;

        for row in 0..batch.num_rows() {
            rows.push(columns.iter().map(|col| col[row].clone()).collect());
        }
    }

    Ok(RawTable { headers, rows })
}

/// Lower one Arrow column to cells.
fn arrow_cells(col: &ArrayRef) -> Result<Vec<Cell>, LoadError> {
    let n = col.len();
    let data_type = col.data_type();

    let cells = match data_type {
        DataType::Utf8 | DataType::LargeUtf8 | DataType::Utf8View => {
            let strings = cast(col, &DataType::Utf8)?;
            let strings = strings.as_string::<i32>();
            (0..n)
                .map(|i| {
                    if strings.is_null(i) {
                        Cell::Empty
                    } else {
                        Cell::from_text(strings.value(i))
                    }
                })
                .collect()
        }
        DataType::Date32 | DataType::Date64 | DataType::Timestamp(_, _) => {
            let dates = cast(col, &DataType::Date32)?;
            let dates = dates.as_primitive::<Date32Type>();
            (0..n)
                .map(|i| {
                    if dates.is_null(i) {
                        Cell::Empty
                    } else {
                        dates.value_as_date(i).map(Cell::Date).unwrap_or(Cell::Empty)
                    }
                })
                .collect()
        }
        DataType::Boolean => {
            let bools = col
                .as_any()
                .downcast_ref::<BooleanArray>()
                .ok_or_else(|| {
                    arrow::error::ArrowError::CastError("expected BooleanArray".to_string())
                })?;
            (0..n)
                .map(|i| {
                    if bools.is_null(i) {
                        Cell::Empty
                    } else {
                        Cell::Text(bools.value(i).to_string())
                    }
                })
                .collect()
        }
        dt if dt.is_numeric() => {
            let floats = cast(col, &DataType::Float64)?;
            let floats = floats.as_primitive::<Float64Type>();
            (0..n)
                .map(|i| {
                    if floats.is_null(i) {
                        Cell::Empty
                    } else {
                        Cell::Number(floats.value(i))
                    }
                })
                .collect()
        }
        _ => {
            let strings = cast(col, &DataType::Utf8)?;
            let strings = strings.as_string::<i32>();
            (0..n)
                .map(|i| {
                    if strings.is_null(i) {
                        Cell::Empty
                    } else {
                        Cell::from_text(strings.value(i))
                    }
                })
                .collect()
        }
    };
    Ok(cells)
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::Arc;

    use arrow::array::{Date32Array, Float64Array, Int64Array, StringArray};
    use arrow::datatypes::{Field, Schema};
    use arrow::record_batch::RecordBatch;
    use chrono::Weekday;
    use parquet::arrow::ArrowWriter;

    use super::*;
    use crate::data::model::fixtures::date;
    use crate::data::model::Dimension;

    const HEADER: &str = "Date,Campaign,Channel,Ad,City/Location,Device,Latitude,Longitude,\"Spend, GBP\",Impressions,Clicks,Conversions,\"Total conversion value, GBP\",\"CTR, %\",Daily Average CPC";

    fn write_file(dir: &tempfile::TempDir, name: &str, contents: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut f = File::create(&path).unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        path
    }

    fn load(path: &Path) -> Result<CampaignDataset, LoadError> {
        load_file(path, &LoadOptions::default())
    }

    #[test]
    fn loads_csv_and_derives_weekday() {
        let dir = tempfile::tempdir().unwrap();
        let csv = format!(
            "{HEADER}\n\
             2024-03-04,Spring Sale,Facebook,Ad A,London,Mobile,51.5,-0.12,12.5,1000,25,2,60.0,0.025,0.5\n\
             2024-03-10,Spring Sale,Google Ads,Ad B,Leeds,Desktop,53.8,-1.55,\"£1,200.00\",5000,100,4,300,2.5%,1.2\n"
        );
        let path = write_file(&dir, "data.csv", &csv);
        let ds = load(&path).unwrap();

        assert_eq!(ds.len(), 2);
        let first = &ds.records[0];
        assert_eq!(first.date, date(2024, 3, 4));
        assert_eq!(first.day_of_week, Weekday::Mon);
        assert_eq!(first.campaign, "Spring Sale");
        assert_eq!(first.spend, 12.5);
        assert_eq!(first.ctr, 0.025);

        let second = &ds.records[1];
        assert_eq!(second.day_name(), "Sunday");
        assert_eq!(second.spend, 1200.0);
        assert!((second.ctr - 0.025).abs() < 1e-12);

        let cities: Vec<&str> = ds.values(Dimension::City).collect();
        assert_eq!(cities, ["Leeds", "London"]);
    }

    #[test]
    fn blank_rows_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let csv = format!(
            "{HEADER}\n\
             2024-03-04,S,F,A,London,Mobile,51.5,-0.12,1,1,1,1,1,0.1,1\n\
             ,,,,,,,,,,,,,,\n"
        );
        let path = write_file(&dir, "blank.csv", &csv);
        assert_eq!(load(&path).unwrap().len(), 1);
    }

    #[test]
    fn missing_column_is_reported_by_name() {
        let dir = tempfile::tempdir().unwrap();
        let header = HEADER.replace("City/Location", "City");
        let path = write_file(&dir, "bad.csv", &format!("{header}\n"));
        match load(&path) {
            Err(LoadError::MissingColumn(name)) => assert_eq!(name, "City/Location"),
            other => panic!("expected MissingColumn, got {other:?}"),
        }
    }

    #[test]
    fn malformed_cell_reports_row_and_column() {
        let dir = tempfile::tempdir().unwrap();
        let csv = format!(
            "{HEADER}\n\
             2024-03-04,S,F,A,London,Mobile,51.5,-0.12,1,1,1,1,1,0.1,1\n\
             2024-03-05,S,F,A,London,Mobile,51.5,-0.12,lots,1,1,1,1,0.1,1\n"
        );
        let path = write_file(&dir, "bad.csv", &csv);
        match load(&path) {
            Err(LoadError::InvalidCell { row, column, .. }) => {
                assert_eq!(row, 2);
                assert_eq!(column, "Spend, GBP");
            }
            other => panic!("expected InvalidCell, got {other:?}"),
        }
    }

    #[test]
    fn bad_date_is_a_load_error() {
        let dir = tempfile::tempdir().unwrap();
        let csv = format!("{HEADER}\nyesterday,S,F,A,London,Mobile,51.5,-0.12,1,1,1,1,1,0.1,1\n");
        let path = write_file(&dir, "bad.csv", &csv);
        let err = load(&path).unwrap_err();
        assert!(err.to_string().contains("\"Date\""), "{err}");
    }

    #[test]
    fn unreadable_and_unknown_sources_fail() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            load(&dir.path().join("missing.csv")),
            Err(LoadError::Csv(_))
        ));
        assert!(matches!(
            load(&dir.path().join("missing.json")),
            Err(LoadError::Io { .. })
        ));
        assert!(matches!(
            load(&dir.path().join("notes.txt")),
            Err(LoadError::UnsupportedExtension(ext)) if ext == "txt"
        ));
    }

    #[test]
    fn date_text_formats() {
        let expected = date(2024, 3, 4);
        for s in [
            "2024-03-04",
            "2024-03-04 13:45:00",
            "2024-03-04T23:59:59.250",
            "2024-03-04T08:00:00+01:00",
            "04/03/2024",
        ] {
            assert_eq!(parse_date_text(s), Ok(expected), "{s}");
        }
        assert!(parse_date_text("March 4th").is_err());
    }

    #[test]
    fn numeric_dates_are_excel_serials_or_epoch_millis() {
        // 45355 = 2024-03-04 in the 1900 date system; the fraction is a time of day
        assert_eq!(date_from_number(45355.0), Ok(date(2024, 3, 4)));
        assert_eq!(date_from_number(45355.75), Ok(date(2024, 3, 4)));
        assert_eq!(date_from_number(1_709_510_400_000.0), Ok(date(2024, 3, 4)));
        assert!(date_from_number(-1.0).is_err());
    }

    #[test]
    fn number_and_text_coercion() {
        assert_eq!(parse_number(&Cell::Text(" £2,500.75 ".into())), Ok(2500.75));
        assert_eq!(parse_number(&Cell::Number(3.0)), Ok(3.0));
        assert!(parse_number(&Cell::Empty).is_err());
        assert!(parse_number(&Cell::Text("NaN".into())).is_err());
        assert_eq!(parse_text(&Cell::Number(3.0)), Ok("3".to_string()));
        assert_eq!(parse_text(&Cell::Text("  Mobile ".into())), Ok("Mobile".to_string()));
        assert!(parse_text(&Cell::Text("   ".into())).is_err());
    }

    #[test]
    fn loads_json_records_with_epoch_dates() {
        let dir = tempfile::tempdir().unwrap();
        let json = r#"[
            {"Date": 1709510400000, "Campaign": "Spring Sale", "Channel": "Facebook", "Ad": "Ad A",
             "City/Location": "London", "Device": "Mobile", "Latitude": 51.5, "Longitude": -0.12,
             "Spend, GBP": 10, "Impressions": 100, "Clicks": 5, "Conversions": 1,
             "Total conversion value, GBP": 40, "CTR, %": 0.05, "Daily Average CPC": 2.0},
            {"Date": "2024-03-05", "Campaign": "Spring Sale", "Channel": "Facebook", "Ad": "Ad A",
             "City/Location": "London", "Device": "Mobile", "Latitude": 51.5, "Longitude": -0.12,
             "Spend, GBP": 20, "Impressions": 200, "Clicks": 10, "Conversions": 2,
             "Total conversion value, GBP": 80, "CTR, %": 0.05, "Daily Average CPC": 2.0}
        ]"#;
        let path = write_file(&dir, "data.json", json);
        let ds = load(&path).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.records[0].date, date(2024, 3, 4));
        assert_eq!(ds.records[1].date, date(2024, 3, 5));
        assert_eq!(ds.date_span, Some((date(2024, 3, 4), date(2024, 3, 5))));
    }

    #[test]
    fn json_must_be_an_array_of_objects() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "data.json", r#"{"Date": "2024-03-04"}"#);
        assert!(matches!(load(&path), Err(LoadError::JsonShape)));
    }

    #[test]
    fn loads_workbook_with_serial_dates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("campaign_data.xlsx");

        let headers = [
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
        let mut workbook = rust_xlsxwriter::Workbook::new();
        let sheet = workbook.add_worksheet();
        for (col, h) in headers.iter().enumerate() {
            sheet.write_string(0, col as u16, *h).unwrap();
        }
        // row 1: serial date, row 2: text date, row 3: date-formatted cell
        sheet.write_number(1, 0, 45355.0).unwrap();
        sheet.write_string(2, 0, "2024-03-05").unwrap();
        let date_format = rust_xlsxwriter::Format::new().set_num_format("yyyy-mm-dd");
        let wednesday = rust_xlsxwriter::ExcelDateTime::from_ymd(2024, 3, 6).unwrap();
        sheet
            .write_datetime_with_format(3, 0, &wednesday, &date_format)
            .unwrap();
        for row in 1..=3u32 {
            for (col, text) in [(1u16, "Spring Sale"), (2, "Facebook"), (3, "Ad A"), (4, "London"), (5, "Mobile")] {
                sheet.write_string(row, col, text).unwrap();
            }
            let measures = [51.5, -0.12, 10.0, 1000.0, 30.0, 3.0, 45.0, 0.03, 0.33];
            for (offset, value) in measures.iter().enumerate() {
                sheet.write_number(row, 6 + offset as u16, *value).unwrap();
            }
        }
        workbook.save(&path).unwrap();

        let ds = load(&path).unwrap();
        assert_eq!(ds.len(), 3);
        assert_eq!(ds.records[0].date, date(2024, 3, 4));
        assert_eq!(ds.records[1].date, date(2024, 3, 5));
        assert_eq!(ds.records[2].date, date(2024, 3, 6));
        assert_eq!(ds.records[2].day_name(), "Wednesday");
        assert_eq!(ds.records[0].impressions, 1000.0);
        assert_eq!(ds.records[1].device, "Mobile");

        let named = load_file(
            &path,
            &LoadOptions {
                sheet: Some("Sheet1".to_string()),
            },
        )
        .unwrap();
        assert_eq!(named.len(), 3);

        let missing = load_file(
            &path,
            &LoadOptions {
                sheet: Some("Nope".to_string()),
            },
        );
        assert!(matches!(missing, Err(LoadError::Workbook(_))));
    }

    #[test]
    fn loads_parquet_with_date32_and_integer_counts() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.parquet");

        let text = |name: &str| Field::new(name, DataType::Utf8, false);
        let float = |name: &str| Field::new(name, DataType::Float64, false);
        let int = |name: &str| Field::new(name, DataType::Int64, false);
        let schema = Arc::new(Schema::new(vec![
            Field::new("Date", DataType::Date32, false),
            text("Campaign"),
            text("Channel"),
            text("Ad"),
            text("City/Location"),
            text("Device"),
            float("Latitude"),
            float("Longitude"),
            float("Spend, GBP"),
            int("Impressions"),
            int("Clicks"),
            int("Conversions"),
            float("Total conversion value, GBP"),
            float("CTR, %"),
            float("Daily Average CPC"),
        ]));
        // 19786 days after 1970-01-01 = 2024-03-04
        let strs = |v: &str| Arc::new(StringArray::from(vec![v, v])) as ArrayRef;
        let floats = |a: f64, b: f64| Arc::new(Float64Array::from(vec![a, b])) as ArrayRef;
        let ints = |a: i64, b: i64| Arc::new(Int64Array::from(vec![a, b])) as ArrayRef;
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(Date32Array::from(vec![19786, 19787])),
                strs("Spring Sale"),
                strs("Google Ads"),
                strs("Ad B"),
                strs("Leeds"),
                strs("Tablet"),
                floats(53.8, 53.8),
                floats(-1.55, -1.55),
                floats(5.0, 15.0),
                ints(100, 300),
                ints(4, 6),
                ints(1, 0),
                floats(9.0, 0.0),
                floats(0.04, 0.02),
                floats(1.25, 2.5),
            ],
        )
        .unwrap();
        let mut writer = ArrowWriter::try_new(File::create(&path).unwrap(), schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let ds = load(&path).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.records[0].date, date(2024, 3, 4));
        assert_eq!(ds.records[1].day_name(), "Tuesday");
        assert_eq!(ds.records[1].impressions, 300.0);
        assert_eq!(ds.records[0].device, "Tablet");
    }

    #[test]
    fn header_only_sources_load_as_empty_datasets() {
        let dir = tempfile::tempdir().unwrap();

        let csv_path = write_file(&dir, "empty.csv", &format!("{HEADER}\n"));
        assert!(load(&csv_path).unwrap().is_empty());

        let names = [
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
        let schema = Arc::new(Schema::new(
            names
                .iter()
                .map(|name| Field::new(*name, DataType::Utf8, true))
                .collect::<Vec<_>>(),
        ));
        let parquet_path = dir.path().join("empty.parquet");
        let writer =
            ArrowWriter::try_new(File::create(&parquet_path).unwrap(), schema, None).unwrap();
        writer.close().unwrap();

        let ds = load(&parquet_path).unwrap();
        assert!(ds.is_empty());
        assert_eq!(ds.date_span, None);
    }
}
