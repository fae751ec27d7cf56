use std::env::VarError;
use std::path::PathBuf;

use thiserror::Error;

use crate::data::aggregate::DEFAULT_TOP_ADS;
use crate::data::loader::LoadOptions;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

/// Startup settings, read once from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardConfig {
    /// Dataset opened at startup when the file exists.
    pub data_path: PathBuf,
    /// Worksheet to read from workbook sources.
    pub sheet: Option<String>,
    /// Rows in the top-ads table.
    pub top_ads_limit: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("campaign_data.xlsx"),
            sheet: None,
            top_ads_limit: DEFAULT_TOP_ADS,
        }
    }
}

impl DashboardConfig {
    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            sheet: self.sheet.clone(),
        }
    }
}

/// Read configuration from the process environment.
///
/// * `CAMPAIGN_DATA_PATH` – dataset to open at startup (`campaign_data.xlsx`)
/// * `CAMPAIGN_SHEET` – worksheet name for workbooks (first sheet)
/// * `CAMPAIGN_TOP_ADS` – rows in the top-ads table (`5`, at least 1)
pub fn load_config() -> Result<DashboardConfig, ConfigError> {
    build_config(|key| std::env::var(key))
}

fn build_config<F>(lookup: F) -> Result<DashboardConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, VarError>,
{
    let defaults = DashboardConfig::default();

    let non_empty = |var: &str| lookup(var).ok().filter(|v| !v.trim().is_empty());

    let data_path = non_empty("CAMPAIGN_DATA_PATH")
        .map(PathBuf::from)
        .unwrap_or(defaults.data_path);
    let sheet = non_empty("CAMPAIGN_SHEET");

    let top_ads_limit = match non_empty("CAMPAIGN_TOP_ADS") {
        None => defaults.top_ads_limit,
        Some(raw) => {
            let invalid = |reason: String| ConfigError::InvalidEnvVar {
                var: "CAMPAIGN_TOP_ADS".to_string(),
                reason,
            };
            let n = raw
                .trim()
                .parse::<usize>()
                .map_err(|e| invalid(e.to_string()))?;
            if n == 0 {
                return Err(invalid("must be at least 1".to_string()));
            }
            n
        }
    };

    Ok(DashboardConfig {
        data_path,
        sheet,
        top_ads_limit,
    })
}
