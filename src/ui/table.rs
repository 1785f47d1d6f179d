use eframe::egui::Ui;
use egui_extras::{Column, TableBuilder};

use agri_dash::data::model::DashboardViews;

use crate::state::ViewTab;

const ROW_HEIGHT: f32 = 18.0;

const AREA_VALUE: &[&str] = &["Area", "Value"];
const ITEM_VALUE: &[&str] = &["Item", "Value"];
const YEAR_ITEM_VALUE: &[&str] = &["Year", "Item", "Value"];
const AREA_YEAR_VALUE: &[&str] = &["Area", "Year", "Value"];
const AREA_FERT_CROP: &[&str] = &["Area", "Value_fert", "Value_crop"];

fn number(v: f64) -> String {
    format!("{v:.2}")
}

fn maybe_number(v: Option<f64>) -> String {
    v.map(number).unwrap_or_default()
}

/// Column headers and display rows of the view behind `tab`.
pub fn view_rows(tab: ViewTab, views: &DashboardViews) -> (&'static [&'static str], Vec<Vec<String>>) {
    match tab {
        ViewTab::Q1 => (
            AREA_VALUE,
            views
                .q1_emissions_by_area
                .iter()
                .map(|r| vec![r.area.clone(), number(r.value)])
                .collect(),
        ),
        ViewTab::Q3 => (
            ITEM_VALUE,
            views
                .q3_emission_sources
                .iter()
                .map(|r| vec![r.item.clone(), number(r.value)])
                .collect(),
        ),
        ViewTab::Q4 => (
            YEAR_ITEM_VALUE,
            views
                .q4_fertilizer_by_nutrient
                .iter()
                .map(|r| vec![r.year.to_string(), r.item.clone(), number(r.value)])
                .collect(),
        ),
        ViewTab::Q2 | ViewTab::Q5 => {
            let rows = match tab {
                ViewTab::Q2 => &views.q2_emissions_over_time,
                _ => &views.q5_fertilizer_by_area,
            };
            (
                AREA_YEAR_VALUE,
                rows.iter()
                    .map(|r| vec![r.area.clone(), r.year.to_string(), number(r.value)])
                    .collect(),
            )
        }
        ViewTab::Q6A | ViewTab::Q6B => {
            let rows = match tab {
                ViewTab::Q6A => &views.q6a_nitrogen_per_cropland,
                _ => &views.q6b_nitrogen_per_capita,
            };
            (
                AREA_YEAR_VALUE,
                rows.iter()
                    .map(|r| vec![r.area.clone(), r.year.to_string(), maybe_number(r.value)])
                    .collect(),
            )
        }
        ViewTab::Q7 => (
            AREA_FERT_CROP,
            views
                .q7_fertilizer_vs_crops
                .iter()
                .map(|r| vec![r.area.clone(), maybe_number(r.value_fert), number(r.value_crop)])
                .collect(),
        ),
    }
}

/// Render the aggregate table of the active tab.
pub fn view_table(ui: &mut Ui, tab: ViewTab, views: &DashboardViews) {
    let (headers, rows) = view_rows(tab, views);

    ui.push_id(tab.label(), |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .columns(Column::auto().at_least(80.0), headers.len() - 1)
            .column(Column::remainder())
            .header(ROW_HEIGHT + 2.0, |mut header| {
                for h in headers {
                    header.col(|ui: &mut Ui| {
                        ui.strong(*h);
                    });
                }
            })
            .body(|body| {
                body.rows(ROW_HEIGHT, rows.len(), |mut row| {
                    let cells = &rows[row.index()];
                    for cell in cells {
                        row.col(|ui: &mut Ui| {
                            ui.label(cell);
                        });
                    }
                });
            });
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use agri_dash::data::model::{AreaTotal, AreaYearTotal, AreaYearValue, FertilizerCropPoint};

    fn empty_views() -> DashboardViews {
        DashboardViews {
            q1_emissions_by_area: Vec::new(),
            q2_emissions_over_time: Vec::new(),
            q3_emission_sources: Vec::new(),
            q4_fertilizer_by_nutrient: Vec::new(),
            q5_fertilizer_by_area: Vec::new(),
            q6a_nitrogen_per_cropland: Vec::new(),
            q6b_nitrogen_per_capita: Vec::new(),
            q7_fertilizer_vs_crops: Vec::new(),
        }
    }

    #[test]
    fn every_row_matches_its_header_width() {
        let mut views = empty_views();
        views.q1_emissions_by_area.push(AreaTotal { area: "China".into(), value: 12.346 });
        views.q7_fertilizer_vs_crops.push(FertilizerCropPoint {
            area: "China".into(),
            value_fert: None,
            value_crop: 3.0,
        });

        for tab in ViewTab::ALL {
            let (headers, rows) = view_rows(tab, &views);
            assert!(rows.iter().all(|r| r.len() == headers.len()), "{tab:?}");
        }

        let (_, q1) = view_rows(ViewTab::Q1, &views);
        assert_eq!(q1, vec![vec!["China".to_string(), "12.35".to_string()]]);
        let (_, q7) = view_rows(ViewTab::Q7, &views);
        assert_eq!(q7[0][1], "");
    }

    #[test]
    fn totals_always_show_a_number_and_raw_rows_may_be_blank() {
        let mut views = empty_views();
        views.q2_emissions_over_time.push(AreaYearTotal {
            area: "India".into(),
            year: 2020,
            value: 0.0,
        });
        views.q6b_nitrogen_per_capita.push(AreaYearValue {
            area: "India".into(),
            year: 2020,
            value: None,
        });

        let (_, q2) = view_rows(ViewTab::Q2, &views);
        assert_eq!(q2[0], vec!["India".to_string(), "2020".to_string(), "0.00".to_string()]);
        let (_, q6b) = view_rows(ViewTab::Q6B, &views);
        assert_eq!(q6b[0][2], "");
    }
}
