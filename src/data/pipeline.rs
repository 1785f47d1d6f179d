use std::collections::BTreeMap;

use anyhow::Result;

use crate::config::DashboardConfig;

use super::filter::filter_tables;
use super::gate::{Readiness, ReadyUploads, Uploads};
use super::loader::load_file;
use super::model::{DashboardViews, DatasetKind, Tables};
use super::views::build_views;

// ---------------------------------------------------------------------------
// One upload session: load → filter → aggregate
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowCounts {
    pub raw: usize,
    pub filtered: usize,
}

/// Everything the dashboard renders for one set of uploads.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub counts: BTreeMap<DatasetKind, RowCounts>,
    pub views: DashboardViews,
}

/// Load all four tables. The first failure aborts the whole load.
pub fn load_tables(ready: ReadyUploads<'_>) -> Result<Tables> {
    Ok(Tables {
        emissions: load_file(ready.emissions, DatasetKind::Emissions)?,
        fertilizers: load_file(ready.fertilizers, DatasetKind::Fertilizers)?,
        crops: load_file(ready.crops, DatasetKind::Crops)?,
        food_supply: load_file(ready.food_supply, DatasetKind::FoodSupply)?,
    })
}

/// Filter raw tables and compute every view. Pure: the same input always
/// yields the same session.
pub fn prepare(raw: &Tables, config: &DashboardConfig) -> Session {
    let filtered = filter_tables(raw, config);
    let counts = DatasetKind::ALL
        .into_iter()
        .map(|kind| {
            let counts = RowCounts {
                raw: raw.get(kind).len(),
                filtered: filtered.get(kind).len(),
            };
            (kind, counts)
        })
        .collect();

    Session {
        counts,
        views: build_views(&filtered, config.comparison_year),
    }
}

/// Run the gate, then the full pipeline. `Waiting` means nothing was read.
pub fn run(uploads: &Uploads, config: &DashboardConfig) -> Result<Readiness<Session>> {
    match uploads.check() {
        Readiness::Ready(ready) => {
            let raw = load_tables(ready)?;
            let session = prepare(&raw, config);
            log::info!("Recomputed all views");
            Ok(Readiness::Ready(session))
        }
        Readiness::Waiting { missing } => {
            log::debug!("Waiting for uploads: {missing:?}");
            Ok(Readiness::Waiting { missing })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{Record, Table};
    use crate::data::views::ELEMENT_EMISSIONS;

    fn emission(area: &str, year: i64, value: f64) -> Record {
        Record {
            area: area.into(),
            year,
            element: ELEMENT_EMISSIONS.into(),
            item: "Enteric Fermentation".into(),
            value: Some(value),
        }
    }

    fn tables(emissions: Vec<Record>) -> Tables {
        Tables {
            emissions: Table::new(DatasetKind::Emissions, emissions),
            fertilizers: Table::new(DatasetKind::Fertilizers, Vec::new()),
            crops: Table::new(DatasetKind::Crops, Vec::new()),
            food_supply: Table::new(DatasetKind::FoodSupply, Vec::new()),
        }
    }

    #[test]
    fn out_of_window_rows_never_reach_the_views() {
        let raw = tables(vec![
            emission("Brazil", 2020, 100.0),
            emission("Brazil", 2021, 50.0),
            emission("China", 1999, 999.0),
        ]);
        let session = prepare(&raw, &DashboardConfig::default());

        assert_eq!(
            session.counts[&DatasetKind::Emissions],
            RowCounts { raw: 3, filtered: 2 }
        );
        let q1 = &session.views.q1_emissions_by_area;
        assert_eq!(q1.len(), 1);
        assert_eq!(q1[0].area, "Brazil");
        assert_eq!(q1[0].value, 150.0);

        let q2: Vec<_> = session
            .views
            .q2_emissions_over_time
            .iter()
            .map(|r| (r.area.as_str(), r.year, r.value))
            .collect();
        assert_eq!(q2, vec![("Brazil", 2020, 100.0), ("Brazil", 2021, 50.0)]);
    }

    #[test]
    fn prepare_is_idempotent() {
        let raw = tables(vec![emission("India", 2015, 1.25), emission("Israel", 2016, 3.0)]);
        let cfg = DashboardConfig::default();
        assert_eq!(prepare(&raw, &cfg), prepare(&raw, &cfg));
    }

    #[test]
    fn incomplete_uploads_wait_without_loading() {
        let uploads = Uploads {
            emissions: Some("does/not/exist.csv".into()),
            ..Uploads::default()
        };
        let outcome = run(&uploads, &DashboardConfig::default()).unwrap();
        assert!(matches!(outcome, Readiness::Waiting { ref missing } if missing.len() == 3));
    }
}
