use std::path::{Path, PathBuf};

use agri_dash::config::DashboardConfig;
use agri_dash::data::gate::{Readiness, Uploads};
use agri_dash::data::model::DatasetKind;
use agri_dash::data::pipeline::{self, Session};

// ---------------------------------------------------------------------------
// Dashboard tabs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewTab {
    Q1,
    Q2,
    Q3,
    Q4,
    Q5,
    Q6A,
    Q6B,
    Q7,
}

impl ViewTab {
    pub const ALL: [ViewTab; 8] = [
        ViewTab::Q1,
        ViewTab::Q2,
        ViewTab::Q3,
        ViewTab::Q4,
        ViewTab::Q5,
        ViewTab::Q6A,
        ViewTab::Q6B,
        ViewTab::Q7,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ViewTab::Q1 => "Q1",
            ViewTab::Q2 => "Q2",
            ViewTab::Q3 => "Q3",
            ViewTab::Q4 => "Q4",
            ViewTab::Q5 => "Q5",
            ViewTab::Q6A => "Q6A",
            ViewTab::Q6B => "Q6B",
            ViewTab::Q7 => "Q7",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            ViewTab::Q1 => "Q1: Which countries emit the most GHGs from agriculture?",
            ViewTab::Q2 => "Q2: Emission trends over time",
            ViewTab::Q3 => "Q3: Emission sources",
            ViewTab::Q4 => "Q4: Fertilizer use by nutrient",
            ViewTab::Q5 => "Q5: Fertilizer use trends by country",
            ViewTab::Q6A => "Q6A: Nitrogen use per hectare",
            ViewTab::Q6B => "Q6B: Nitrogen use per capita",
            ViewTab::Q7 => "Q7: Fertilizer vs Crop Production",
        }
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Chosen file per upload slot.
    pub uploads: Uploads,

    /// Active row-filter settings.
    pub config: DashboardConfig,

    /// Result of the last successful run; `None` while waiting or after a failure.
    pub session: Option<Session>,

    /// Slots still empty, as reported by the gate.
    pub missing: Vec<DatasetKind>,

    pub active_tab: ViewTab,

    /// Show the aggregate table under the chart.
    pub show_table: bool,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            uploads: Uploads::default(),
            config: DashboardConfig::default(),
            session: None,
            missing: DatasetKind::ALL.to_vec(),
            active_tab: ViewTab::Q1,
            show_table: false,
            status_message: None,
        }
    }
}

impl AppState {
    /// Fill an upload slot and recompute.
    pub fn set_upload(&mut self, kind: DatasetKind, path: PathBuf) {
        if let Some(old) = self.uploads.set(kind, path) {
            log::warn!("Replacing {kind} upload {}", old.display());
        }
        self.recompute();
    }

    /// Replace the filter config and recompute.
    pub fn set_config(&mut self, config: DashboardConfig) {
        self.config = config;
        self.recompute();
    }

    pub fn load_config(&mut self, path: &Path) {
        match DashboardConfig::load(path) {
            Ok(config) => {
                log::info!("Loaded filter config from {}", path.display());
                self.set_config(config);
            }
            Err(e) => {
                log::warn!("Failed to load config: {e:#}");
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }

    /// Forget all uploads.
    pub fn clear(&mut self) {
        self.uploads = Uploads::default();
        self.recompute();
    }

    /// Rerun the whole pipeline. A failure discards every view.
    pub fn recompute(&mut self) {
        self.session = None;
        self.status_message = None;

        match pipeline::run(&self.uploads, &self.config) {
            Ok(Readiness::Ready(session)) => {
                self.missing.clear();
                self.session = Some(session);
            }
            Ok(Readiness::Waiting { missing }) => {
                self.missing = missing;
            }
            Err(e) => {
                log::error!("Failed to prepare dashboard: {e:#}");
                self.missing.clear();
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}
