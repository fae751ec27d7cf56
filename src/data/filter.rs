use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;

use super::error::FilterError;
use super::model::{CampaignDataset, CampaignRecord, Dimension};

// ---------------------------------------------------------------------------
// Filter predicate: allowed values per dimension plus a date range
// ---------------------------------------------------------------------------

/// Inclusive calendar-date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Per-dimension selection state plus the date range.
///
/// A record passes when its value for every dimension is in that dimension's
/// selected set and its date lies in the range. An empty set for any
/// dimension, or a dimension with no entry at all, selects nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSpec {
    pub selected: BTreeMap<Dimension, BTreeSet<String>>,
    pub date_range: Option<DateRange>,
}

impl FilterSpec {
    /// Select every distinct value of every dimension and the full date span.
    pub fn all(dataset: &CampaignDataset) -> Self {
        let selected = Dimension::ALL
            .iter()
            .map(|&dim| {
                let values = dataset.unique_values.get(&dim).cloned().unwrap_or_default();
                (dim, values)
            })
            .collect();
        FilterSpec {
            selected,
            date_range: dataset
                .date_span
                .map(|(start, end)| DateRange::new(start, end)),
        }
    }

    pub fn is_selected(&self, dim: Dimension, value: &str) -> bool {
        self.selected
            .get(&dim)
            .is_some_and(|set| set.contains(value))
    }

    /// Toggle a single value in one dimension.
    pub fn toggle(&mut self, dim: Dimension, value: &str) {
        let set = self.selected.entry(dim).or_default();
        if !set.remove(value) {
            set.insert(value.to_string());
        }
    }

    /// Select every value the dataset has for `dim`.
    pub fn select_all(&mut self, dim: Dimension, dataset: &CampaignDataset) {
        let values = dataset.unique_values.get(&dim).cloned().unwrap_or_default();
        self.selected.insert(dim, values);
    }

    /// Clear the selection for `dim`.
    pub fn select_none(&mut self, dim: Dimension) {
        self.selected.insert(dim, BTreeSet::new());
    }

    /// Check the spec can be evaluated and return its date range.
    pub fn validate(&self) -> Result<DateRange, FilterError> {
        let range = self.date_range.ok_or(FilterError::MissingDateRange)?;
        if range.start > range.end {
            return Err(FilterError::InvertedDateRange {
                start: range.start,
                end: range.end,
            });
        }
        Ok(range)
    }

    /// Whether one record passes every predicate. Assumes the spec is valid.
    fn matches(&self, range: &DateRange, record: &CampaignRecord) -> bool {
        range.contains(record.date)
            && Dimension::ALL
                .iter()
                .all(|&dim| self.is_selected(dim, dim.value_of(record)))
    }
}

/// Return positions of records in `dataset` that pass the filter, in order.
pub fn filtered_indices(
    dataset: &CampaignDataset,
    spec: &FilterSpec,
) -> Result<Vec<usize>, FilterError> {
    let range = spec.validate()?;
    Ok(dataset
        .records
        .iter()
        .enumerate()
        .filter(|(_, rec)| spec.matches(&range, rec))
        .map(|(i, _)| i)
        .collect())
}

/// Return the records that pass the filter, preserving input order.
pub fn filter_records<'a>(
    records: &'a [CampaignRecord],
    spec: &FilterSpec,
) -> Result<Vec<&'a CampaignRecord>, FilterError> {
    let range = spec.validate()?;
    Ok(records
        .iter()
        .filter(|rec| spec.matches(&range, rec))
        .collect())
}
