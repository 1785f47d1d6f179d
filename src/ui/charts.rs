use std::collections::BTreeMap;
use std::f64::consts::TAU;

use eframe::egui::{Color32, Stroke, Ui};
use egui_plot::{Bar, BarChart, Legend, Line, Plot, PlotPoint, PlotPoints, Points, Polygon, Text};

use agri_dash::data::model::{
    AreaTotal, AreaYearTotal, AreaYearValue, DashboardViews, FertilizerCropPoint, ItemTotal,
    YearItemValue,
};

use crate::color::ColorMap;
use crate::state::ViewTab;

// ---------------------------------------------------------------------------
// Dispatcher (central panel)
// ---------------------------------------------------------------------------

/// Render the chart for the active tab.
pub fn view_chart(ui: &mut Ui, tab: ViewTab, views: &DashboardViews) {
    match tab {
        ViewTab::Q1 => emissions_bar(ui, &views.q1_emissions_by_area),
        ViewTab::Q2 => total_lines(
            ui,
            "q2_plot",
            "Agricultural GHG Emissions Over Time",
            &views.q2_emissions_over_time,
        ),
        ViewTab::Q3 => sources_pie(ui, &views.q3_emission_sources),
        ViewTab::Q4 => nutrient_lines(ui, &views.q4_fertilizer_by_nutrient),
        ViewTab::Q5 => total_lines(
            ui,
            "q5_plot",
            "Fertilizer Use by Country Over Time",
            &views.q5_fertilizer_by_area,
        ),
        ViewTab::Q6A => area_lines(
            ui,
            "q6a_plot",
            "Nitrogen Fertilizer Use per Hectare",
            &views.q6a_nitrogen_per_cropland,
        ),
        ViewTab::Q6B => area_lines(
            ui,
            "q6b_plot",
            "Nitrogen Fertilizer Use per Capita",
            &views.q6b_nitrogen_per_capita,
        ),
        ViewTab::Q7 => fertilizer_scatter(ui, &views.q7_fertilizer_vs_crops),
    }
}

fn base_plot(id: &str) -> Plot<'_> {
    Plot::new(id)
        .legend(Legend::default())
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
}

// ---------------------------------------------------------------------------
// Bar chart (Q1)
// ---------------------------------------------------------------------------

fn emissions_bar(ui: &mut Ui, rows: &[AreaTotal]) {
    ui.label("Total Agricultural GHG Emissions by Country");
    let colors = ColorMap::new(rows.iter().map(|r| r.area.as_str()));
    let n = rows.len();

    base_plot("q1_plot")
        .x_axis_label("Value")
        .show(ui, |plot_ui| {
            // Largest total on top.
            for (i, row) in rows.iter().enumerate() {
                let color = colors.color_for(&row.area);
                let bar = Bar::new((n - 1 - i) as f64, row.value)
                    .name(&row.area)
                    .fill(color)
                    .width(0.7);
                plot_ui.bar_chart(BarChart::new(vec![bar]).horizontal().name(&row.area).color(color));
            }
        });
}

// ---------------------------------------------------------------------------
// Line charts (Q2, Q4, Q5, Q6A, Q6B)
// ---------------------------------------------------------------------------

/// Points per series label, in year order. Missing values are left out.
fn series<'a, T>(
    rows: &'a [T],
    label: impl Fn(&'a T) -> &'a str,
    point: impl Fn(&T) -> Option<[f64; 2]>,
) -> BTreeMap<&'a str, Vec<[f64; 2]>> {
    let mut out: BTreeMap<&str, Vec<[f64; 2]>> = BTreeMap::new();
    for row in rows {
        let entry = out.entry(label(row)).or_default();
        if let Some(p) = point(row) {
            entry.push(p);
        }
    }
    for points in out.values_mut() {
        points.sort_by(|a, b| a[0].total_cmp(&b[0]));
    }
    out
}

fn line_plot(ui: &mut Ui, id: &str, lines: BTreeMap<&str, Vec<[f64; 2]>>) {
    let colors = ColorMap::new(lines.keys().copied());

    base_plot(id)
        .x_axis_label("Year")
        .y_axis_label("Value")
        .show(ui, |plot_ui| {
            for (name, points) in lines {
                let color = colors.color_for(name);
                plot_ui.line(
                    Line::new(PlotPoints::from(points.clone()))
                        .name(name)
                        .color(color)
                        .width(1.5),
                );
                plot_ui.points(
                    Points::new(PlotPoints::from(points))
                        .name(name)
                        .color(color)
                        .radius(3.0),
                );
            }
        });
}

fn total_lines(ui: &mut Ui, id: &str, title: &str, rows: &[AreaYearTotal]) {
    ui.label(title);
    let lines = series(rows, |r| r.area.as_str(), |r| Some([r.year as f64, r.value]));
    line_plot(ui, id, lines);
}

fn area_lines(ui: &mut Ui, id: &str, title: &str, rows: &[AreaYearValue]) {
    ui.label(title);
    let lines = series(rows, |r| r.area.as_str(), |r| r.value.map(|v| [r.year as f64, v]));
    line_plot(ui, id, lines);
}

fn nutrient_lines(ui: &mut Ui, rows: &[YearItemValue]) {
    ui.label("Global Fertilizer Use by Nutrient");
    let lines = series(rows, |r| r.item.as_str(), |r| Some([r.year as f64, r.value]));
    line_plot(ui, "q4_plot", lines);
}

// ---------------------------------------------------------------------------
// Pie chart (Q3)
// ---------------------------------------------------------------------------

const PIE_START_DEGREES: f64 = 140.0;

/// A wedge of the pie: start and end angle in radians, share of the whole.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Slice {
    start: f64,
    end: f64,
    fraction: f64,
}

/// Counter-clockwise wedges from the start angle. Non-positive values get
/// an empty wedge so indices line up with the input.
fn pie_slices(values: &[f64]) -> Vec<Slice> {
    let total: f64 = values.iter().filter(|v| **v > 0.0).sum();
    let mut angle = PIE_START_DEGREES.to_radians();
    values
        .iter()
        .map(|&v| {
            let fraction = if total > 0.0 && v > 0.0 { v / total } else { 0.0 };
            let start = angle;
            angle += fraction * TAU;
            Slice { start, end: angle, fraction }
        })
        .collect()
}

fn wedge_points(slice: Slice) -> Vec<[f64; 2]> {
    let steps = ((slice.end - slice.start) / TAU * 120.0).ceil().max(1.0) as usize;
    let mut points = vec![[0.0, 0.0]];
    for s in 0..=steps {
        let a = slice.start + (slice.end - slice.start) * s as f64 / steps as f64;
        points.push([a.cos(), a.sin()]);
    }
    points
}

fn sources_pie(ui: &mut Ui, rows: &[ItemTotal]) {
    ui.label("Emission Sources Share");
    let values: Vec<f64> = rows.iter().map(|r| r.value).collect();
    let slices = pie_slices(&values);
    let colors = ColorMap::new(rows.iter().map(|r| r.item.as_str()));

    base_plot("q3_plot")
        .data_aspect(1.0)
        .show_axes(false)
        .show_grid(false)
        .show(ui, |plot_ui| {
            for (row, slice) in rows.iter().zip(&slices) {
                if slice.fraction <= 0.0 {
                    continue;
                }
                let color = colors.color_for(&row.item);
                plot_ui.polygon(
                    Polygon::new(PlotPoints::from(wedge_points(*slice)))
                        .name(&row.item)
                        .fill_color(color)
                        .stroke(Stroke::new(1.0, Color32::WHITE)),
                );
                let mid = (slice.start + slice.end) / 2.0;
                plot_ui.text(Text::new(
                    PlotPoint::new(0.6 * mid.cos(), 0.6 * mid.sin()),
                    format!("{:.1}%", slice.fraction * 100.0),
                ));
            }
        });
}

// ---------------------------------------------------------------------------
// Scatter (Q7)
// ---------------------------------------------------------------------------

fn fertilizer_scatter(ui: &mut Ui, rows: &[FertilizerCropPoint]) {
    ui.label("Fertilizer Use vs. Crop Production");
    let colors = ColorMap::new(rows.iter().map(|r| r.area.as_str()));

    base_plot("q7_plot")
        .x_axis_label("Nitrogen Fertilizer Use (Tonnes)")
        .y_axis_label("Crop Production (Tonnes)")
        .show(ui, |plot_ui| {
            for row in rows {
                let Some(fert) = row.value_fert else {
                    continue;
                };
                plot_ui.points(
                    Points::new(PlotPoints::from(vec![[fert, row.value_crop]]))
                        .name(&row.area)
                        .color(colors.color_for(&row.area))
                        .radius(6.0),
                );
            }
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pie_slices_cover_the_circle() {
        let slices = pie_slices(&[1.0, 3.0]);
        assert_eq!(slices[0].fraction, 0.25);
        assert_eq!(slices[1].fraction, 0.75);
        assert_eq!(slices[0].end, slices[1].start);
        let span = slices[1].end - slices[0].start;
        assert!((span - TAU).abs() < 1e-9);
    }

    #[test]
    fn non_positive_values_get_empty_slices() {
        let slices = pie_slices(&[0.0, -2.0, 5.0]);
        assert_eq!(slices[0].fraction, 0.0);
        assert_eq!(slices[1].fraction, 0.0);
        assert_eq!(slices[2].fraction, 1.0);
    }

    #[test]
    fn series_skip_missing_values_and_sort_by_year() {
        let rows = vec![
            AreaYearValue { area: "India".into(), year: 2021, value: Some(2.0) },
            AreaYearValue { area: "India".into(), year: 2020, value: Some(1.0) },
            AreaYearValue { area: "Brazil".into(), year: 2020, value: None },
        ];
        let s = series(&rows[..], |r| r.area.as_str(), |r| r.value.map(|v| [r.year as f64, v]));
        assert_eq!(s["India"], vec![[2020.0, 1.0], [2021.0, 2.0]]);
        assert!(s["Brazil"].is_empty());
    }
}
