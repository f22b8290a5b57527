//! Dataset model
//!
//! Row-oriented data as consumed by the exploration transforms:
//! - [`CellValue`] scalars and [`Row`] maps keyed by field id
//! - [`FieldMeta`] / [`DerivedField`] descriptors with derivation lineage
//! - [`FieldCatalog`] lookup
//! - [`RowSource`] / [`RowStorage`] for materialized or lazily drained rows

mod catalog;
mod field;
mod source;
mod value;

pub use catalog::FieldCatalog;
pub use field::{
    AnalyticType, DerivationParams, DerivedField, FieldExtInfo, FieldMeta, GeoRole, SemanticType,
};
pub use source::{MemoryRowStorage, RowSource, RowStorage};
pub use value::CellValue;

use std::collections::{HashMap, HashSet};

/// A row: field id -> cell value
pub type Row = HashMap<String, CellValue>;

/// Build a row from `(fid, value)` pairs
pub fn row<I, K, V>(pairs: I) -> Row
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<CellValue>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}

/// Every field id that appears in at least one row
pub fn column_ids(rows: &[Row]) -> HashSet<String> {
    rows.iter()
        .flat_map(|r| r.keys().cloned())
        .collect()
}
