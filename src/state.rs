use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::NaiveDate;

use crate::color::CategoryColors;
use crate::config::DashboardConfig;
use crate::data::aggregate::Report;
use crate::data::error::LoadError;
use crate::data::filter::{filter_records, filtered_indices, DateRange, FilterSpec};
use crate::data::loader::load_file;
use crate::data::model::{CampaignDataset, CampaignRecord, Dimension};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: DashboardConfig,

    /// Loaded dataset (None until a file loads). Replaced wholesale on reload.
    pub dataset: Option<Arc<CampaignDataset>>,

    /// File the current dataset came from.
    pub source_path: Option<PathBuf>,

    /// Current filter selection.
    pub filters: FilterSpec,

    /// Indices of records passing the current filters.
    pub visible_indices: Vec<usize>,

    /// Metrics and grouped views for the visible records; None when the
    /// filter is invalid.
    pub report: Option<Report>,

    /// Stable colours per campaign, shared by the charts.
    pub campaign_colors: CategoryColors,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(config: DashboardConfig) -> Self {
        Self {
            config,
            dataset: None,
            source_path: None,
            filters: FilterSpec::default(),
            visible_indices: Vec::new(),
            report: None,
            campaign_colors: CategoryColors::default(),
            status_message: None,
        }
    }

    /// Load `path` and make it the current dataset. On failure the previous
    /// dataset stays in place and the error is shown in the status line.
    pub fn open_path(&mut self, path: &Path) -> Result<(), LoadError> {
        match load_file(path, &self.config.load_options()) {
            Ok(dataset) => {
                self.set_dataset(dataset, Some(path.to_path_buf()));
                Ok(())
            }
            Err(e) => {
                log::error!("Failed to load {}: {e}", path.display());
                self.status_message = Some(format!("Error loading {}: {e}", path.display()));
                Err(e)
            }
        }
    }

    /// Re-read the current source file from disk.
    pub fn reload(&mut self) -> Result<(), LoadError> {
        let Some(path) = self.source_path.clone() else {
            return Ok(());
        };
        log::info!("Reloading {}", path.display());
        self.open_path(&path)
    }

    /// Ingest a newly loaded dataset, reset filters to "everything" and
    /// recompute the report.
    pub fn set_dataset(&mut self, dataset: CampaignDataset, source: Option<PathBuf>) {
        self.filters = FilterSpec::all(&dataset);
        self.campaign_colors = CategoryColors::new(dataset.values(Dimension::Campaign));
        self.dataset = Some(Arc::new(dataset));
        self.source_path = source;
        self.status_message = None;
        self.refilter();
    }

    /// Recompute `visible_indices` and the report from scratch.
    pub fn refilter(&mut self) {
        let Some(ds) = &self.dataset else {
            return;
        };
        if ds.is_empty() {
            // no dates to range over; an empty source reports all zeros
            self.visible_indices.clear();
            self.report = Some(Report::build(&[], self.config.top_ads_limit));
            self.status_message = None;
            return;
        }
        let filtered = filtered_indices(ds, &self.filters)
            .and_then(|indices| Ok((indices, filter_records(&ds.records, &self.filters)?)));
        match filtered {
            Ok((indices, records)) => {
                self.report = Some(Report::build(&records, self.config.top_ads_limit));
                self.visible_indices = indices;
                self.status_message = None;
            }
            Err(e) => {
                log::warn!("Invalid filter: {e}");
                self.visible_indices.clear();
                self.report = None;
                self.status_message = Some(format!("Filter error: {e}"));
            }
        }
    }

    /// Records passing the current filter, in source order.
    pub fn visible_records(&self) -> Vec<&CampaignRecord> {
        match &self.dataset {
            Some(ds) => self
                .visible_indices
                .iter()
                .map(|&i| &ds.records[i])
                .collect(),
            None => Vec::new(),
        }
    }

    /// Toggle a single value in one dimension's filter.
    pub fn toggle_filter_value(&mut self, dim: Dimension, value: &str) {
        self.filters.toggle(dim, value);
        self.refilter();
    }

    /// Select all values in a dimension.
    pub fn select_all(&mut self, dim: Dimension) {
        if let Some(ds) = &self.dataset {
            self.filters.select_all(dim, ds);
            self.refilter();
        }
    }

    /// Deselect all values in a dimension.
    pub fn select_none(&mut self, dim: Dimension) {
        self.filters.select_none(dim);
        self.refilter();
    }

    pub fn set_date_range(&mut self, start: NaiveDate, end: NaiveDate) {
        self.filters.date_range = Some(DateRange::new(start, end));
        self.refilter();
    }

    /// Write the current report as pretty-printed JSON.
    pub fn export_report(&self, path: &Path) -> Result<()> {
        let report = self
            .report
            .as_ref()
            .context("no report to export (load a dataset and pick a valid filter)")?;
        let json = serde_json::to_string_pretty(report).context("serialising report")?;
        std::fs::write(path, json)
            .with_context(|| format!("writing report to {}", path.display()))?;
        log::info!("Exported report to {}", path.display());
        Ok(())
    }
}
