use crate::config::DashboardConfig;

use super::model::{Table, Tables};

// ---------------------------------------------------------------------------
// Row filter: year window and area allow-list
// ---------------------------------------------------------------------------

/// Keep rows whose year lies inside the config window and whose area is on
/// the allow-list. Relative row order is preserved.
pub fn filter_rows(table: &Table, config: &DashboardConfig) -> Table {
    let rows: Vec<_> = table
        .rows
        .iter()
        .filter(|r| config.in_window(r.year) && config.contains_area(&r.area))
        .cloned()
        .collect();

    log::info!(
        "Filtered {} table: kept {} of {} rows",
        table.kind,
        rows.len(),
        table.len()
    );
    Table::new(table.kind, rows)
}

/// Apply [`filter_rows`] to all four tables of a session.
pub fn filter_tables(raw: &Tables, config: &DashboardConfig) -> Tables {
    Tables {
        emissions: filter_rows(&raw.emissions, config),
        fertilizers: filter_rows(&raw.fertilizers, config),
        crops: filter_rows(&raw.crops, config),
        food_supply: filter_rows(&raw.food_supply, config),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{DatasetKind, Record};

    fn row(area: &str, year: i64) -> Record {
        Record {
            area: area.into(),
            year,
            element: "Production".into(),
            item: "Maize (corn)".into(),
            value: Some(1.0),
        }
    }

    #[test]
    fn drops_rows_outside_window_and_allow_list() {
        let table = Table::new(
            DatasetKind::Crops,
            vec![
                row("Brazil", 2009),
                row("Brazil", 2010),
                row("France", 2015),
                row("Viet Nam", 2022),
                row("Viet Nam", 2023),
                row("china", 2015),
            ],
        );
        let cfg = DashboardConfig::default();
        let out = filter_rows(&table, &cfg);

        assert_eq!(out.rows, vec![row("Brazil", 2010), row("Viet Nam", 2022)]);
        assert!(out
            .rows
            .iter()
            .all(|r| cfg.in_window(r.year) && cfg.contains_area(&r.area)));
    }

    #[test]
    fn preserves_relative_order() {
        let table = Table::new(
            DatasetKind::Emissions,
            vec![row("India", 2020), row("Israel", 2011), row("France", 2012), row("Brazil", 2015)],
        );
        let out = filter_rows(&table, &DashboardConfig::default());
        let areas: Vec<_> = out.rows.iter().map(|r| r.area.as_str()).collect();
        assert_eq!(areas, ["India", "Israel", "Brazil"]);
    }

    #[test]
    fn honours_custom_config() {
        let cfg = DashboardConfig {
            countries: vec!["Rwanda".into()],
            year_min: 2015,
            year_max: 2016,
            ..DashboardConfig::default()
        };
        let table = Table::new(
            DatasetKind::FoodSupply,
            vec![row("Rwanda", 2014), row("Rwanda", 2016), row("Brazil", 2016)],
        );
        assert_eq!(filter_rows(&table, &cfg).rows, vec![row("Rwanda", 2016)]);
    }
}
