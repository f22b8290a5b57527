//! Conversions between polars data frames and rows

use crate::dataset::{CellValue, FieldCatalog, FieldMeta, Row, SemanticType, AnalyticType};
use crate::error::Result;
use polars::prelude::*;

/// Rows of `df`, one map per row keyed by column name
pub fn rows_from_dataframe(df: &DataFrame) -> Result<Vec<Row>> {
    let mut rows: Vec<Row> = (0..df.height())
        .map(|_| Row::with_capacity(df.width()))
        .collect();

    for column in df.get_columns() {
        let name = column.name().to_string();
        let values = series_values(column.as_materialized_series())?;
        for (row, value) in rows.iter_mut().zip(values) {
            row.insert(name.clone(), value);
        }
    }

    Ok(rows)
}

fn is_numeric(dtype: &DataType) -> bool {
    dtype.is_integer() || dtype.is_float()
}

fn series_values(series: &Series) -> Result<Vec<CellValue>> {
    let values = match series.dtype() {
        DataType::String => series.str()?.into_iter().map(CellValue::from).collect(),
        DataType::Boolean => series.bool()?.into_iter().map(CellValue::from).collect(),
        dtype if is_numeric(dtype) => series
            .cast(&DataType::Float64)?
            .f64()?
            .into_iter()
            .map(CellValue::from)
            .collect(),
        _ => series
            .cast(&DataType::String)?
            .str()?
            .into_iter()
            .map(CellValue::from)
            .collect(),
    };
    Ok(values)
}

/// Data frame with one column per fid in `fids`, in that order.
///
/// Columns holding only integral numbers become `Int64`, other numeric
/// columns `Float64`, anything mixed or textual `String`. A row missing a
/// field yields null.
pub fn rows_to_dataframe<S: AsRef<str>>(rows: &[Row], fids: &[S]) -> Result<DataFrame> {
    let columns: Vec<Column> = fids
        .iter()
        .map(|fid| column_from_rows(rows, fid.as_ref()).into())
        .collect();

    Ok(DataFrame::new(columns)?)
}

fn column_from_rows(rows: &[Row], fid: &str) -> Series {
    let cells: Vec<Option<&CellValue>> = rows
        .iter()
        .map(|r| r.get(fid).filter(|v| !v.is_null()))
        .collect();

    let all_numeric = cells.iter().flatten().all(|v| v.as_f64().is_some());
    let any_value = cells.iter().any(Option::is_some);

    if any_value && all_numeric {
        if cells.iter().flatten().all(|v| v.as_i64().is_some()) {
            let values: Vec<Option<i64>> = cells.iter().map(|c| c.and_then(CellValue::as_i64)).collect();
            return Series::new(fid.into(), values);
        }
        let values: Vec<Option<f64>> = cells.iter().map(|c| c.and_then(CellValue::as_f64)).collect();
        return Series::new(fid.into(), values);
    }

    let values: Vec<Option<String>> = cells.iter().map(|c| c.map(ToString::to_string)).collect();
    Series::new(fid.into(), values)
}

/// Field catalog inferred from column types.
///
/// Numeric columns become quantitative measures, temporal columns temporal
/// dimensions, everything else nominal dimensions.
pub fn infer_fields(df: &DataFrame) -> FieldCatalog {
    df.get_columns()
        .iter()
        .map(|column| {
            let fid = column.name().to_string();
            let dtype = column.dtype();
            if is_numeric(dtype) {
                FieldMeta::quantitative(fid)
            } else if dtype.is_temporal() {
                FieldMeta::new(fid, SemanticType::Temporal, AnalyticType::Dimension)
            } else {
                FieldMeta::nominal(fid)
            }
        })
        .collect()
}
