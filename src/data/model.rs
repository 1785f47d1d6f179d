use std::fmt;

use serde::Serialize;

// ---------------------------------------------------------------------------
// DatasetKind – which of the four upload slots a table belongs to
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DatasetKind {
    Emissions,
    Fertilizers,
    Crops,
    FoodSupply,
}

impl DatasetKind {
    pub const ALL: [DatasetKind; 4] = [
        DatasetKind::Emissions,
        DatasetKind::Fertilizers,
        DatasetKind::Crops,
        DatasetKind::FoodSupply,
    ];

    /// Label shown next to the upload slot.
    pub fn label(self) -> &'static str {
        match self {
            DatasetKind::Emissions => "Emission final",
            DatasetKind::Fertilizers => "Fertilizers by Nutrient final",
            DatasetKind::Crops => "Crops and Livestock products final",
            DatasetKind::FoodSupply => "Food Supply final",
        }
    }
}

impl fmt::Display for DatasetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DatasetKind::Emissions => "emissions",
            DatasetKind::Fertilizers => "fertilizers",
            DatasetKind::Crops => "crops",
            DatasetKind::FoodSupply => "food supply",
        };
        write!(f, "{name}")
    }
}

// ---------------------------------------------------------------------------
// Record – one row of an uploaded table
// ---------------------------------------------------------------------------

/// The five columns every uploaded table must carry. Other columns in the
/// source file are ignored.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub area: String,
    pub year: i64,
    pub element: String,
    pub item: String,
    /// `None` when the source cell was empty, an NA token or NaN.
    pub value: Option<f64>,
}

// ---------------------------------------------------------------------------
// Table – an ordered collection of records
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub kind: DatasetKind,
    pub rows: Vec<Record>,
}

impl Table {
    pub fn new(kind: DatasetKind, rows: Vec<Record>) -> Self {
        Self { kind, rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// The four tables of one upload session.
#[derive(Debug, Clone, PartialEq)]
pub struct Tables {
    pub emissions: Table,
    pub fertilizers: Table,
    pub crops: Table,
    pub food_supply: Table,
}

impl Tables {
    pub fn get(&self, kind: DatasetKind) -> &Table {
        match kind {
            DatasetKind::Emissions => &self.emissions,
            DatasetKind::Fertilizers => &self.fertilizers,
            DatasetKind::Crops => &self.crops,
            DatasetKind::FoodSupply => &self.food_supply,
        }
    }
}

// ---------------------------------------------------------------------------
// Aggregate view rows
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct AreaTotal {
    pub area: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ItemTotal {
    pub item: String,
    pub value: f64,
}

/// Summed per-country time series row (Q2, Q5).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct AreaYearTotal {
    pub area: String,
    pub year: i64,
    pub value: f64,
}

/// Unaggregated per-country row; `value` is `None` where the source cell was missing.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct AreaYearValue {
    pub area: String,
    pub year: i64,
    pub value: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct YearItemValue {
    pub year: i64,
    pub item: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FertilizerCropPoint {
    #[serde(rename = "Area")]
    pub area: String,
    #[serde(rename = "Value_fert")]
    pub value_fert: Option<f64>,
    #[serde(rename = "Value_crop")]
    pub value_crop: f64,
}

/// All eight aggregate views of one session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardViews {
    pub q1_emissions_by_area: Vec<AreaTotal>,
    pub q2_emissions_over_time: Vec<AreaYearTotal>,
    pub q3_emission_sources: Vec<ItemTotal>,
    pub q4_fertilizer_by_nutrient: Vec<YearItemValue>,
    pub q5_fertilizer_by_area: Vec<AreaYearTotal>,
    pub q6a_nitrogen_per_cropland: Vec<AreaYearValue>,
    pub q6b_nitrogen_per_capita: Vec<AreaYearValue>,
    pub q7_fertilizer_vs_crops: Vec<FertilizerCropPoint>,
}
