use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use arrow::util::pretty::pretty_format_batches;
use parquet::arrow::ArrowWriter;
use serde::Serialize;

use agri_dash::config::DEFAULT_COUNTRIES;

/// Countries outside the default allow-list, so the filter has work to do.
const EXTRA_COUNTRIES: [&str; 2] = ["France", "Kenya"];
const FIRST_YEAR: i64 = 2005;
const LAST_YEAR: i64 = 2023;
/// Output directory, relative to the working directory.
const OUT_DIR: &str = "sample_data";

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Multiplicative jitter in `[1 - spread, 1 + spread)`.
    fn jitter(&mut self, spread: f64) -> f64 {
        1.0 + spread * (2.0 * self.next_f64() - 1.0)
    }
}

/// FAOSTAT-style row.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
struct SampleRow {
    #[serde(rename = "Area Code")]
    area_code: usize,
    area: String,
    item: String,
    element: String,
    year: i64,
    unit: &'static str,
    value: f64,
}

/// Build one table: every area × year × (element, item, unit, base value).
fn generate(
    rng: &mut SimpleRng,
    series: &[(&str, &str, &'static str, f64)],
    areas: &[&str],
) -> Vec<SampleRow> {
    let mut rows = Vec::new();
    for (code, area) in areas.iter().enumerate() {
        // Country scale: larger codes get smaller totals.
        let scale = 1.0 / (1.0 + code as f64 * 0.35);
        for year in FIRST_YEAR..=LAST_YEAR {
            let trend = 1.0 + (year - FIRST_YEAR) as f64 * 0.015;
            for &(element, item, unit, base) in series {
                rows.push(SampleRow {
                    area_code: code + 1,
                    area: area.to_string(),
                    item: item.to_string(),
                    element: element.to_string(),
                    year,
                    unit,
                    value: (base * scale * trend * rng.jitter(0.1) * 100.0).round() / 100.0,
                });
            }
        }
    }
    rows
}

fn write_csv(path: &Path, rows: &[SampleRow]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    println!("Wrote {} rows to {}", rows.len(), path.display());
    Ok(())
}

fn write_parquet(path: &Path, rows: &[SampleRow]) -> Result<()> {
    let schema = Arc::new(Schema::new(vec![
        Field::new("Area", DataType::Utf8, false),
        Field::new("Year", DataType::Int64, false),
        Field::new("Element", DataType::Utf8, false),
        Field::new("Item", DataType::Utf8, false),
        Field::new("Value", DataType::Float64, true),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(StringArray::from_iter_values(rows.iter().map(|r| r.area.as_str()))),
            Arc::new(Int64Array::from_iter_values(rows.iter().map(|r| r.year))),
            Arc::new(StringArray::from_iter_values(rows.iter().map(|r| r.element.as_str()))),
            Arc::new(StringArray::from_iter_values(rows.iter().map(|r| r.item.as_str()))),
            Arc::new(Float64Array::from_iter_values(rows.iter().map(|r| r.value))),
        ],
    )
    .context("building record batch")?;

    let file = std::fs::File::create(path)
        .with_context(|| format!("creating {}", path.display()))?;
    let mut writer = ArrowWriter::try_new(file, schema, None)?;
    writer.write(&batch)?;
    writer.close()?;

    println!("Wrote {} rows to {}", batch.num_rows(), path.display());
    println!("{}", pretty_format_batches(&[batch.slice(0, batch.num_rows().min(5))])?);
    Ok(())
}

fn main() -> Result<()> {
    write_all(Path::new(OUT_DIR))
}

/// Write the four CSV tables and the Parquet fertilizer table into `out_dir`.
fn write_all(out_dir: &Path) -> Result<()> {
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("creating {}", out_dir.display()))?;

    let areas: Vec<&str> = DEFAULT_COUNTRIES
        .iter()
        .chain(EXTRA_COUNTRIES.iter())
        .copied()
        .collect();
    let mut rng = SimpleRng::new(42);

    let co2 = "Emissions (CO2eq) (AR5)";
    let emissions = generate(
        &mut rng,
        &[
            (co2, "Enteric Fermentation", "kt", 120_000.0),
            (co2, "Rice Cultivation", "kt", 45_000.0),
            (co2, "Manure Management", "kt", 30_000.0),
            (co2, "Synthetic Fertilizers", "kt", 25_000.0),
            ("Emissions (CH4)", "Enteric Fermentation", "kt", 4_000.0),
        ],
        &areas,
    );

    let nitrogen = "Nutrient nitrogen N (total)";
    let fertilizers = generate(
        &mut rng,
        &[
            ("Agricultural Use", nitrogen, "t", 2_500_000.0),
            ("Agricultural Use", "Nutrient phosphate P2O5 (total)", "t", 1_200_000.0),
            ("Agricultural Use", "Nutrient potash K2O (total)", "t", 900_000.0),
            ("Use per area of cropland", nitrogen, "kg/ha", 95.0),
            ("Use per capita", nitrogen, "kg/cap", 12.0),
        ],
        &areas,
    );

    let crops = generate(
        &mut rng,
        &[
            ("Production", "Maize (corn)", "t", 60_000_000.0),
            ("Production", "Rice", "t", 40_000_000.0),
            ("Production", "Wheat", "t", 30_000_000.0),
            ("Area harvested", "Rice", "ha", 9_000_000.0),
        ],
        &areas,
    );

    let food_supply = generate(
        &mut rng,
        &[
            ("Food supply (kcal/capita/day)", "Grand Total", "kcal/cap/d", 2_800.0),
            ("Food supply (kcal/capita/day)", "Cereals - Excluding Beer", "kcal/cap/d", 1_300.0),
        ],
        &areas,
    );

    write_csv(&out_dir.join("emissions.csv"), &emissions)?;
    write_csv(&out_dir.join("fertilizers.csv"), &fertilizers)?;
    write_csv(&out_dir.join("crops.csv"), &crops)?;
    write_csv(&out_dir.join("food_supply.csv"), &food_supply)?;
    write_parquet(&out_dir.join("fertilizers.parquet"), &fertilizers)?;

    Ok(())
}
