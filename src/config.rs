use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Dashboard configuration
// ---------------------------------------------------------------------------

/// Countries retained for analysis when no config file is loaded.
pub const DEFAULT_COUNTRIES: [&str; 10] = [
    "Brazil",
    "China",
    "Ethiopia",
    "India",
    "Israel",
    "Netherlands (Kingdom of the)",
    "Rwanda",
    "United Arab Emirates",
    "United States of America",
    "Viet Nam",
];

pub const DEFAULT_YEAR_MIN: i64 = 2010;
pub const DEFAULT_YEAR_MAX: i64 = 2022;

/// Row-filter settings applied to every uploaded table.
///
/// Every field has a default, so a JSON file only needs the fields it
/// overrides:
///
/// ```json
/// { "countries": ["Brazil", "India"], "year_min": 2015 }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Area allow-list (exact, case-sensitive names).
    pub countries: Vec<String>,
    /// Inclusive lower bound of the year window.
    pub year_min: i64,
    /// Inclusive upper bound of the year window.
    pub year_max: i64,
    /// Year compared in the fertilizer vs. crop production view.
    pub comparison_year: i64,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            countries: DEFAULT_COUNTRIES.iter().map(|c| c.to_string()).collect(),
            year_min: DEFAULT_YEAR_MIN,
            year_max: DEFAULT_YEAR_MAX,
            comparison_year: DEFAULT_YEAR_MAX,
        }
    }
}

impl DashboardConfig {
    /// Read a config from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        let config: DashboardConfig = serde_json::from_str(&text)
            .with_context(|| format!("parsing config file {}", path.display()))?;
        if config.year_min > config.year_max {
            bail!(
                "year_min ({}) is greater than year_max ({})",
                config.year_min,
                config.year_max
            );
        }
        Ok(config)
    }

    pub fn contains_area(&self, area: &str) -> bool {
        self.countries.iter().any(|c| c == area)
    }

    pub fn in_window(&self, year: i64) -> bool {
        (self.year_min..=self.year_max).contains(&year)
    }
}
