//! One-hot expansion of categorical fields
//!
//! Each target field is expanded into binary indicator columns, one per
//! frequent category. When a field has more distinct values than the child
//! limit allows, the least frequent categories share a single catch-all
//! column.

use super::frequency::{FrequencyRecord, FrequencyTable};
use super::OneHotConfig;
use crate::dataset::{
    column_ids, AnalyticType, CellValue, DerivationParams, DerivedField, FieldCatalog,
    FieldExtInfo, FieldMeta, GeoRole, Row, RowSource, SemanticType,
};
use crate::error::Result;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Transform name recorded in derivation metadata
pub const ONE_HOT_TRANSFORM: &str = "OneHot";

static NAME_SEPARATORS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[\s,.]+").expect("static pattern is valid")
});

static NULL: CellValue = CellValue::Null;

/// Derived fields plus the table augmented with their columns
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OneHotOutput {
    pub fields: Vec<DerivedField>,
    pub table: Vec<Row>,
}

impl OneHotOutput {
    /// Derived fields produced from `source_fid`
    pub fn fields_from<'a>(&'a self, source_fid: &'a str) -> impl Iterator<Item = &'a DerivedField> {
        self.fields
            .iter()
            .filter(move |f| f.source_fid() == Some(source_fid))
    }

    pub fn into_parts(self) -> (Vec<DerivedField>, Vec<Row>) {
        (self.fields, self.table)
    }
}

impl From<OneHotOutput> for (Vec<DerivedField>, Vec<Row>) {
    fn from(output: OneHotOutput) -> Self {
        output.into_parts()
    }
}

/// Replace runs of whitespace, commas and periods with one underscore
pub fn sanitize_category(value: &CellValue) -> String {
    NAME_SEPARATORS
        .replace_all(&value.to_string(), "_")
        .into_owned()
}

/// Categorical expander
#[derive(Debug, Clone, Default)]
pub struct OneHotEncoder {
    config: OneHotConfig,
}

impl OneHotEncoder {
    /// Create an encoder with the default child limit
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: OneHotConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &OneHotConfig {
        &self.config
    }

    /// Expand `targets` over a row source.
    ///
    /// Lazy sources are drained before any counting happens; a drain failure
    /// is returned untouched.
    pub async fn expand<S: AsRef<str>>(
        &self,
        data: RowSource<'_>,
        fields: &FieldCatalog,
        targets: &[S],
    ) -> Result<OneHotOutput> {
        self.config.validate()?;
        let rows = data.materialize().await?;
        self.expand_rows(&rows, fields, targets)
    }

    /// Expand `targets` over rows already in memory.
    ///
    /// Input rows are copied, never mutated. Targets missing from the catalog
    /// are skipped with a warning.
    pub fn expand_rows<S: AsRef<str>>(
        &self,
        rows: &[Row],
        fields: &FieldCatalog,
        targets: &[S],
    ) -> Result<OneHotOutput> {
        self.config.validate()?;

        let mut table: Vec<Row> = rows.to_vec();
        let mut derived = Vec::new();
        let mut taken: HashSet<String> = column_ids(rows);
        taken.extend(fields.fids().map(str::to_string));

        for target in targets {
            let fid = target.as_ref();
            let Some(field) = fields.get(fid) else {
                warn!(fid = %fid, "Cannot find field, skipping one-hot expansion");
                continue;
            };

            let column: Vec<&CellValue> = rows
                .iter()
                .map(|r| r.get(fid).unwrap_or(&NULL))
                .collect();
            let ranked = FrequencyTable::from_values(column.iter().copied())
                .ranked(self.config.tie_break);

            if ranked.is_empty() {
                debug!(fid = %fid, "No values to expand");
                continue;
            }

            let before = derived.len();
            self.expand_field(field, &column, &ranked, &mut table, &mut derived, &mut taken);

            info!(
                fid = %fid,
                distinct = ranked.len(),
                columns = derived.len() - before,
                "One-hot expanded field"
            );
        }

        Ok(OneHotOutput {
            fields: derived,
            table,
        })
    }

    fn expand_field(
        &self,
        field: &FieldMeta,
        column: &[&CellValue],
        ranked: &[FrequencyRecord],
        table: &mut [Row],
        derived: &mut Vec<DerivedField>,
        taken: &mut HashSet<String>,
    ) {
        let limit = self.config.max_children;
        let has_others = ranked.len() > limit;
        let top = if has_others { &ranked[..limit - 1] } else { ranked };
        let source_name = field.display_name();

        let mut fired = vec![false; column.len()];

        for record in top {
            let fid = allocate_fid(taken);
            for (i, value) in column.iter().enumerate() {
                let hit = **value == record.value;
                fired[i] |= hit;
                table[i].insert(fid.clone(), CellValue::flag(hit));
            }

            let name = format!(
                "{}{}{}",
                source_name,
                self.config.name_separator,
                sanitize_category(&record.value)
            );
            derived.push(self.derived_field(
                fid,
                name,
                &field.fid,
                DerivationParams::OneHotCategory {
                    category: record.value.clone(),
                },
            ));
        }

        if has_others {
            let fid = allocate_fid(taken);
            for (row, hit) in table.iter_mut().zip(&fired) {
                row.insert(fid.clone(), CellValue::flag(!hit));
            }

            let name = format!(
                "{}{}{}",
                source_name, self.config.name_separator, self.config.others_label
            );
            derived.push(self.derived_field(
                fid,
                name,
                &field.fid,
                DerivationParams::OneHotOthers {
                    excluded: top.iter().map(|r| r.value.clone()).collect(),
                    unique: ranked.len() - limit,
                },
            ));
        }
    }

    fn derived_field(
        &self,
        fid: String,
        name: String,
        source: &str,
        params: DerivationParams,
    ) -> DerivedField {
        DerivedField {
            fid,
            name,
            semantic_type: SemanticType::Nominal,
            analytic_type: AnalyticType::Dimension,
            geo_role: GeoRole::None,
            ext_info: FieldExtInfo {
                ext_from: vec![source.to_string()],
                ext_opt: ONE_HOT_TRANSFORM.to_string(),
                ext_info: params,
            },
        }
    }
}

/// Fresh field id not present in `taken`; the id is recorded as taken
fn allocate_fid(taken: &mut HashSet<String>) -> String {
    loop {
        let fid = Uuid::new_v4().simple().to_string();
        if taken.insert(fid.clone()) {
            return fid;
        }
    }
}

/// Expand `targets` with the default configuration
pub async fn one_hot<S: AsRef<str>>(
    data: RowSource<'_>,
    fields: &FieldCatalog,
    targets: &[S],
) -> Result<(Vec<DerivedField>, Vec<Row>)> {
    OneHotEncoder::new()
        .expand(data, fields, targets)
        .await
        .map(OneHotOutput::into_parts)
}
