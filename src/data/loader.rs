use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use arrow::array::{Array, AsArray};
use arrow::datatypes::{DataType, Float32Type, Float64Type, Int32Type, Int64Type};
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

use super::error::DataError;
use super::model::{DatasetKind, Record, Table};

pub const COL_AREA: &str = "Area";
pub const COL_YEAR: &str = "Year";
pub const COL_ELEMENT: &str = "Element";
pub const COL_ITEM: &str = "Item";
pub const COL_VALUE: &str = "Value";

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load one uploaded table.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row naming at least `Area,Year,Element,Item,Value`
/// * `.parquet` – the same five columns; any extra columns are ignored
pub fn load_file(path: &Path, kind: DatasetKind) -> Result<Table> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let table = match ext.as_str() {
        "csv" => load_csv(path, kind),
        "parquet" | "pq" => load_parquet(path, kind),
        other => Err(DataError::UnsupportedExtension(other.to_string()).into()),
    }
    .with_context(|| format!("loading {kind} table from {}", path.display()))?;

    log::info!("Loaded {} {kind} rows from {}", table.len(), path.display());
    Ok(table)
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

pub fn load_csv(path: &Path, kind: DatasetKind) -> Result<Table> {
    let reader = csv::Reader::from_path(path).context("opening CSV")?;
    read_csv(reader, kind)
}

/// Parse CSV from any reader. Columns are located by header name.
pub fn read_csv<R: std::io::Read>(mut reader: csv::Reader<R>, kind: DatasetKind) -> Result<Table> {
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').trim().to_string())
        .collect();

    let column = |name: &'static str| -> Result<usize> {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| DataError::MissingColumn { dataset: kind, column: name }.into())
    };
    let area_idx = column(COL_AREA)?;
    let year_idx = column(COL_YEAR)?;
    let element_idx = column(COL_ELEMENT)?;
    let item_idx = column(COL_ITEM)?;
    let value_idx = column(COL_VALUE)?;

    let mut rows = Vec::new();
    let mut dropped = 0;

    for (i, result) in reader.records().enumerate() {
        let row_no = i + 1;
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        let cell = |idx: usize| record.get(idx).unwrap_or("");

        let value = parse_value(cell(value_idx), kind, row_no)?;
        let Some(year) = parse_year(cell(year_idx), kind, row_no)? else {
            dropped += 1;
            continue;
        };
        rows.push(Record {
            area: cell(area_idx).to_string(),
            year,
            element: cell(element_idx).to_string(),
            item: cell(item_idx).to_string(),
            value,
        });
    }

    log_dropped(kind, dropped);
    Ok(Table::new(kind, rows))
}

/// Cell contents read as missing, the same set pandas' `read_csv` treats as NA.
pub const MISSING_TOKENS: [&str; 19] = [
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

fn is_missing(s: &str) -> bool {
    MISSING_TOKENS.contains(&s)
}

/// Years are integers; integral floats such as `2015.0` are accepted.
/// A missing year yields `None`: such a row can never pass the year window.
fn parse_year(s: &str, kind: DatasetKind, row: usize) -> Result<Option<i64>> {
    let s = s.trim();
    if is_missing(s) {
        return Ok(None);
    }
    if let Ok(y) = s.parse::<i64>() {
        return Ok(Some(y));
    }
    year_from_f64(s.parse::<f64>().ok(), kind, row, s)
}

fn year_from_f64(v: Option<f64>, kind: DatasetKind, row: usize, raw: &str) -> Result<Option<i64>> {
    match v {
        None if raw.is_empty() => Ok(None),
        Some(f) if f.is_nan() => Ok(None),
        Some(f) if f.is_finite() && f.fract() == 0.0 => Ok(Some(f as i64)),
        _ => bail!(DataError::NotNumeric {
            dataset: kind,
            row,
            column: COL_YEAR,
            value: raw.to_string(),
        }),
    }
}

/// A missing token or NaN is a missing value, anything else must parse as a number.
fn parse_value(s: &str, kind: DatasetKind, row: usize) -> Result<Option<f64>> {
    let s = s.trim();
    if is_missing(s) {
        return Ok(None);
    }
    match s.parse::<f64>() {
        Ok(v) => Ok(Some(v).filter(|v| !v.is_nan())),
        Err(_) => bail!(DataError::NotNumeric {
            dataset: kind,
            row,
            column: COL_VALUE,
            value: s.to_string(),
        }),
    }
}

fn log_dropped(kind: DatasetKind, dropped: usize) {
    if dropped > 0 {
        log::warn!("Dropped {dropped} {kind} rows with a missing Year");
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Expected schema:
/// - `Area`, `Element`, `Item`: Utf8 or LargeUtf8
/// - `Year`: Int32, Int64 or Float64
/// - `Value`: Int32, Int64, Float32 or Float64 (nulls and NaN are missing values)
///
/// Rows with a null or NaN `Year` are dropped.
pub fn load_parquet(path: &Path, kind: DatasetKind) -> Result<Table> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut rows = Vec::new();
    let mut seen = 0;

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        append_batch(&batch, kind, seen, &mut rows)?;
        seen += batch.num_rows();
    }

    log_dropped(kind, seen - rows.len());
    Ok(Table::new(kind, rows))
}

/// `offset` is the number of source rows in earlier batches.
fn append_batch(
    batch: &RecordBatch,
    kind: DatasetKind,
    offset: usize,
    rows: &mut Vec<Record>,
) -> Result<()> {
    let areas = string_column(batch_column(batch, kind, COL_AREA)?, kind, COL_AREA)?;
    let elements = string_column(batch_column(batch, kind, COL_ELEMENT)?, kind, COL_ELEMENT)?;
    let items = string_column(batch_column(batch, kind, COL_ITEM)?, kind, COL_ITEM)?;
    let years = numeric_column(batch_column(batch, kind, COL_YEAR)?, kind, COL_YEAR)?;
    let values = numeric_column(batch_column(batch, kind, COL_VALUE)?, kind, COL_VALUE)?;

    for row in 0..batch.num_rows() {
        let row_no = offset + row + 1;
        let raw = years[row].map(|v| v.to_string()).unwrap_or_default();
        let Some(year) = year_from_f64(years[row], kind, row_no, &raw)? else {
            continue;
        };
        rows.push(Record {
            area: areas[row].clone(),
            year,
            element: elements[row].clone(),
            item: items[row].clone(),
            value: values[row],
        });
    }
    Ok(())
}

// -- Arrow helpers --

fn batch_column<'a>(
    batch: &'a RecordBatch,
    kind: DatasetKind,
    name: &'static str,
) -> Result<&'a Arc<dyn Array>> {
    let idx = batch
        .schema()
        .index_of(name)
        .map_err(|_| DataError::MissingColumn { dataset: kind, column: name })?;
    Ok(batch.column(idx))
}

/// Nulls become empty strings.
fn string_column(col: &Arc<dyn Array>, kind: DatasetKind, name: &'static str) -> Result<Vec<String>> {
    let read = |i: usize, v: &str| if col.is_null(i) { String::new() } else { v.to_string() };
    match col.data_type() {
        DataType::Utf8 => {
            let arr = col.as_string::<i32>();
            Ok((0..arr.len()).map(|i| read(i, arr.value(i))).collect())
        }
        DataType::LargeUtf8 => {
            let arr = col.as_string::<i64>();
            Ok((0..arr.len()).map(|i| read(i, arr.value(i))).collect())
        }
        other => bail!(unsupported(kind, name, other)),
    }
}

fn numeric_column(col: &Arc<dyn Array>, kind: DatasetKind, name: &'static str) -> Result<Vec<Option<f64>>> {
    let values: Vec<Option<f64>> = match col.data_type() {
        DataType::Int32 => col
            .as_primitive::<Int32Type>()
            .iter()
            .map(|v| v.map(f64::from))
            .collect(),
        DataType::Int64 => col
            .as_primitive::<Int64Type>()
            .iter()
            .map(|v| v.map(|v| v as f64))
            .collect(),
        DataType::Float32 => col
            .as_primitive::<Float32Type>()
            .iter()
            .map(|v| v.map(f64::from))
            .collect(),
        DataType::Float64 => col.as_primitive::<Float64Type>().iter().collect(),
        other => bail!(unsupported(kind, name, other)),
    };
    Ok(values.into_iter().map(|v| v.filter(|f| !f.is_nan())).collect())
}

fn unsupported(kind: DatasetKind, column: &'static str, data_type: &DataType) -> DataError {
    DataError::UnsupportedColumnType {
        dataset: kind,
        column,
        data_type: format!("{data_type:?}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::{Float64Array, Int64Array, StringArray};
    use arrow::datatypes::{Field, Schema};
    use parquet::arrow::ArrowWriter;

    fn parse(text: &str) -> Result<Table> {
        read_csv(csv::Reader::from_reader(text.as_bytes()), DatasetKind::Emissions)
    }

    fn data_error(err: &anyhow::Error) -> &DataError {
        err.downcast_ref::<DataError>().expect("expected a DataError")
    }

    #[test]
    fn reads_faostat_layout_with_extra_columns() {
        let text = "\u{feff}Area Code,Area,Item,Element,Year,Unit,Value,Flag\n\
                    21,Brazil,Rice,Production,2020,t,11091011,A\n\
                    351,China,Rice,Production,2021,t,,E\n";
        let table = parse(text).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows[0].area, "Brazil");
        assert_eq!(table.rows[0].year, 2020);
        assert_eq!(table.rows[0].value, Some(11_091_011.0));
        assert_eq!(table.rows[1].value, None);
    }

    #[test]
    fn accepts_integral_float_years() {
        let table = parse("Area,Year,Element,Item,Value\nIndia,2015.0,E,I,1.5\n").unwrap();
        assert_eq!(table.rows[0].year, 2015);
    }

    #[test]
    fn missing_column_is_reported() {
        let err = parse("Area,Year,Element,Value\nIndia,2015,E,1\n").unwrap_err();
        assert_eq!(
            data_error(&err),
            &DataError::MissingColumn { dataset: DatasetKind::Emissions, column: "Item" }
        );
    }

    #[test]
    fn non_numeric_value_is_fatal() {
        let err = parse("Area,Year,Element,Item,Value\nIndia,2015,E,I,1\nIndia,2016,E,I,lots\n")
            .unwrap_err();
        match data_error(&err) {
            DataError::NotNumeric { row, column, value, .. } => {
                assert_eq!(*row, 2);
                assert_eq!(*column, COL_VALUE);
                assert_eq!(value, "lots");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn fractional_year_is_fatal() {
        let err = parse("Area,Year,Element,Item,Value\nIndia,2015.5,E,I,1\n").unwrap_err();
        assert!(matches!(
            data_error(&err),
            DataError::NotNumeric { column, .. } if *column == COL_YEAR
        ));
    }

    #[test]
    fn na_tokens_and_nan_are_missing_values() {
        let text = "Area,Year,Element,Item,Value\n\
                    India,2015,E,I,NaN\n\
                    India,2016,E,I,NA\n\
                    India,2017,E,I,nan\n\
                    India,2018,E,I,#N/A\n\
                    India,2019,E,I, 2.5 \n";
        let table = parse(text).unwrap();
        let values: Vec<Option<f64>> = table.rows.iter().map(|r| r.value).collect();
        assert_eq!(values, vec![None, None, None, None, Some(2.5)]);
    }

    #[test]
    fn rows_without_a_year_are_dropped() {
        let text = "Area,Year,Element,Item,Value\n\
                    India,,E,I,1\n\
                    India,NA,E,I,2\n\
                    India,2016,E,I,3\n";
        let table = parse(text).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.rows[0].year, 2016);
        assert_eq!(table.rows[0].value, Some(3.0));
    }

    #[test]
    fn bad_value_is_fatal_even_without_a_year() {
        let err = parse("Area,Year,Element,Item,Value\nIndia,,E,I,lots\n").unwrap_err();
        assert!(matches!(
            data_error(&err),
            DataError::NotNumeric { column, .. } if *column == COL_VALUE
        ));
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("emissions.xlsx");
        std::fs::write(&path, b"").unwrap();
        let err = load_file(&path, DatasetKind::Emissions).unwrap_err();
        assert_eq!(data_error(&err), &DataError::UnsupportedExtension("xlsx".into()));
    }

    #[test]
    fn reads_parquet_with_null_values() {
        let schema = Arc::new(Schema::new(vec![
            Field::new(COL_AREA, DataType::Utf8, false),
            Field::new(COL_YEAR, DataType::Int64, false),
            Field::new(COL_ELEMENT, DataType::Utf8, false),
            Field::new(COL_ITEM, DataType::Utf8, false),
            Field::new(COL_VALUE, DataType::Float64, true),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(StringArray::from(vec!["Rwanda", "Israel"])),
                Arc::new(Int64Array::from(vec![2012, 2013])),
                Arc::new(StringArray::from(vec!["Agricultural Use"; 2])),
                Arc::new(StringArray::from(vec!["Nutrient nitrogen N (total)"; 2])),
                Arc::new(Float64Array::from(vec![Some(3.5), None])),
            ],
        )
        .unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fertilizers.parquet");
        let mut writer = ArrowWriter::try_new(std::fs::File::create(&path).unwrap(), schema, None)
            .unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let table = load_file(&path, DatasetKind::Fertilizers).unwrap();
        assert_eq!(table.kind, DatasetKind::Fertilizers);
        assert_eq!(table.rows[0].area, "Rwanda");
        assert_eq!(table.rows[1].year, 2013);
        assert_eq!(table.rows[0].value, Some(3.5));
        assert_eq!(table.rows[1].value, None);
    }

    #[test]
    fn parquet_nan_is_missing_and_null_years_are_dropped() {
        let schema = Arc::new(Schema::new(vec![
            Field::new(COL_AREA, DataType::Utf8, false),
            Field::new(COL_YEAR, DataType::Float64, true),
            Field::new(COL_ELEMENT, DataType::Utf8, false),
            Field::new(COL_ITEM, DataType::Utf8, false),
            Field::new(COL_VALUE, DataType::Float64, true),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(StringArray::from(vec!["Mali", "Mali", "Peru"])),
                Arc::new(Float64Array::from(vec![Some(2014.0), None, Some(f64::NAN)])),
                Arc::new(StringArray::from(vec!["Emissions (CO2eq) (AR5)"; 3])),
                Arc::new(StringArray::from(vec!["Rice Cultivation"; 3])),
                Arc::new(Float64Array::from(vec![f64::NAN, 1.0, 2.0])),
            ],
        )
        .unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("emissions.parquet");
        let mut writer = ArrowWriter::try_new(std::fs::File::create(&path).unwrap(), schema, None)
            .unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let table = load_file(&path, DatasetKind::Emissions).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.rows[0].area, "Mali");
        assert_eq!(table.rows[0].year, 2014);
        assert_eq!(table.rows[0].value, None);
    }
}
