use std::collections::BTreeMap;

use super::model::{
    AreaTotal, AreaYearTotal, AreaYearValue, DashboardViews, FertilizerCropPoint, ItemTotal, Record, Table,
    Tables, YearItemValue,
};

pub const ELEMENT_EMISSIONS: &str = "Emissions (CO2eq) (AR5)";
pub const ELEMENT_AGRICULTURAL_USE: &str = "Agricultural Use";
pub const ELEMENT_USE_PER_CROPLAND: &str = "Use per area of cropland";
pub const ELEMENT_USE_PER_CAPITA: &str = "Use per capita";
pub const ELEMENT_PRODUCTION: &str = "Production";
pub const ITEM_NITROGEN_TOTAL: &str = "Nutrient nitrogen N (total)";
pub const ITEM_NUTRIENT_MARKER: &str = "Nutrient";

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn with_element<'a>(table: &'a Table, element: &'a str) -> impl Iterator<Item = &'a Record> + 'a {
    table.rows.iter().filter(move |r| r.element == element)
}

/// Grouped sum; missing values contribute nothing. Groups come out in key order.
fn sum_by<'a, K: Ord>(
    rows: impl Iterator<Item = &'a Record>,
    key: impl Fn(&Record) -> K,
) -> BTreeMap<K, f64> {
    let mut sums = BTreeMap::new();
    for r in rows {
        let total = sums.entry(key(r)).or_insert(0.0);
        if let Some(v) = r.value {
            *total += v;
        }
    }
    sums
}

/// Stable sort, largest first. Equal values keep their incoming order.
fn sort_descending<T>(rows: &mut [T], value: impl Fn(&T) -> f64) {
    rows.sort_by(|a, b| value(b).total_cmp(&value(a)));
}

fn nitrogen_rows(fertilizers: &Table, element: &str) -> Vec<AreaYearValue> {
    with_element(fertilizers, element)
        .filter(|r| r.item == ITEM_NITROGEN_TOTAL)
        .map(|r| AreaYearValue {
            area: r.area.clone(),
            year: r.year,
            value: r.value,
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Emissions views
// ---------------------------------------------------------------------------

/// Q1: total CO2-equivalent emissions per area, largest first.
pub fn emissions_by_area(emissions: &Table) -> Vec<AreaTotal> {
    let mut out: Vec<AreaTotal> = sum_by(with_element(emissions, ELEMENT_EMISSIONS), |r| {
        r.area.clone()
    })
    .into_iter()
    .map(|(area, value)| AreaTotal { area, value })
    .collect();
    sort_descending(&mut out, |r| r.value);
    out
}

/// Q2: emissions per (area, year), ordered by year then area.
pub fn emissions_over_time(emissions: &Table) -> Vec<AreaYearTotal> {
    sum_by(with_element(emissions, ELEMENT_EMISSIONS), |r| (r.year, r.area.clone()))
        .into_iter()
        .map(|((year, area), value)| AreaYearTotal { area, year, value })
        .collect()
}

/// Q3: emissions per source item, largest first.
pub fn emission_sources(emissions: &Table) -> Vec<ItemTotal> {
    let mut out: Vec<ItemTotal> = sum_by(with_element(emissions, ELEMENT_EMISSIONS), |r| {
        r.item.clone()
    })
    .into_iter()
    .map(|(item, value)| ItemTotal { item, value })
    .collect();
    sort_descending(&mut out, |r| r.value);
    out
}

// ---------------------------------------------------------------------------
// Fertilizer views
// ---------------------------------------------------------------------------

/// Q4: agricultural use per (year, nutrient). Items are matched by
/// case-sensitive containment of "Nutrient".
pub fn fertilizer_by_nutrient(fertilizers: &Table) -> Vec<YearItemValue> {
    let rows = with_element(fertilizers, ELEMENT_AGRICULTURAL_USE)
        .filter(|r| r.item.contains(ITEM_NUTRIENT_MARKER));
    sum_by(rows, |r| (r.year, r.item.clone()))
        .into_iter()
        .map(|((year, item), value)| YearItemValue { year, item, value })
        .collect()
}

/// Q5: agricultural use per (area, year), ordered by year then area.
pub fn fertilizer_by_area(fertilizers: &Table) -> Vec<AreaYearTotal> {
    sum_by(with_element(fertilizers, ELEMENT_AGRICULTURAL_USE), |r| {
        (r.year, r.area.clone())
    })
    .into_iter()
    .map(|((year, area), value)| AreaYearTotal { area, year, value })
    .collect()
}

/// Q6A: total nitrogen per area of cropland, rows as filtered.
pub fn nitrogen_per_cropland(fertilizers: &Table) -> Vec<AreaYearValue> {
    nitrogen_rows(fertilizers, ELEMENT_USE_PER_CROPLAND)
}

/// Q6B: total nitrogen per capita, rows as filtered.
pub fn nitrogen_per_capita(fertilizers: &Table) -> Vec<AreaYearValue> {
    nitrogen_rows(fertilizers, ELEMENT_USE_PER_CAPITA)
}

// ---------------------------------------------------------------------------
// Fertilizer vs. crop production
// ---------------------------------------------------------------------------

/// Q7: nitrogen use against summed crop production for `year`.
///
/// Inner join on area: an area missing from either side is dropped without
/// notice. Output follows the order of the fertilizer rows, and an area with
/// several fertilizer rows yields one point per row.
pub fn fertilizer_vs_crops(fertilizers: &Table, crops: &Table, year: i64) -> Vec<FertilizerCropPoint> {
    let crop_sums = sum_by(
        with_element(crops, ELEMENT_PRODUCTION).filter(|r| r.year == year),
        |r| r.area.clone(),
    );

    with_element(fertilizers, ELEMENT_AGRICULTURAL_USE)
        .filter(|r| r.item == ITEM_NITROGEN_TOTAL && r.year == year)
        .filter_map(|r| {
            crop_sums.get(&r.area).map(|&value_crop| FertilizerCropPoint {
                area: r.area.clone(),
                value_fert: r.value,
                value_crop,
            })
        })
        .collect()
}

/// Compute all eight views from filtered tables.
pub fn build_views(filtered: &Tables, comparison_year: i64) -> DashboardViews {
    let views = DashboardViews {
        q1_emissions_by_area: emissions_by_area(&filtered.emissions),
        q2_emissions_over_time: emissions_over_time(&filtered.emissions),
        q3_emission_sources: emission_sources(&filtered.emissions),
        q4_fertilizer_by_nutrient: fertilizer_by_nutrient(&filtered.fertilizers),
        q5_fertilizer_by_area: fertilizer_by_area(&filtered.fertilizers),
        q6a_nitrogen_per_cropland: nitrogen_per_cropland(&filtered.fertilizers),
        q6b_nitrogen_per_capita: nitrogen_per_capita(&filtered.fertilizers),
        q7_fertilizer_vs_crops: fertilizer_vs_crops(
            &filtered.fertilizers,
            &filtered.crops,
            comparison_year,
        ),
    };
    log::debug!(
        "Views: q1={} q2={} q3={} q4={} q5={} q6a={} q6b={} q7={}",
        views.q1_emissions_by_area.len(),
        views.q2_emissions_over_time.len(),
        views.q3_emission_sources.len(),
        views.q4_fertilizer_by_nutrient.len(),
        views.q5_fertilizer_by_area.len(),
        views.q6a_nitrogen_per_cropland.len(),
        views.q6b_nitrogen_per_capita.len(),
        views.q7_fertilizer_vs_crops.len(),
    );
    views
}
