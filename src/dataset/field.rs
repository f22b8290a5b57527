//! Field descriptors and derivation lineage

use super::CellValue;
use serde::{Deserialize, Serialize};

/// Semantic type of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SemanticType {
    Nominal,
    Ordinal,
    Quantitative,
    Temporal,
}

/// Analytic role of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalyticType {
    Dimension,
    Measure,
}

/// Geographic role of a column
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GeoRole {
    #[default]
    None,
    Latitude,
    Longitude,
}

/// Transform-specific derivation parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DerivationParams {
    /// Catch-all column: categories that have their own indicator, and the
    /// number of distinct values beyond the child limit
    OneHotOthers { excluded: Vec<CellValue>, unique: usize },
    /// Indicator column for a single category
    OneHotCategory { category: CellValue },
    /// Parameters of any other transform, kept as-is
    Opaque(serde_json::Map<String, serde_json::Value>),
}

impl Default for DerivationParams {
    fn default() -> Self {
        DerivationParams::Opaque(serde_json::Map::new())
    }
}

/// Which field(s) and transform produced a derived field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldExtInfo {
    /// Source field ids
    pub ext_from: Vec<String>,
    /// Transform name
    pub ext_opt: String,
    #[serde(default)]
    pub ext_info: DerivationParams,
}

/// Column metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldMeta {
    pub fid: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub semantic_type: SemanticType,
    pub analytic_type: AnalyticType,
    #[serde(default)]
    pub geo_role: GeoRole,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ext_info: Option<FieldExtInfo>,
}

impl FieldMeta {
    pub fn new(fid: impl Into<String>, semantic_type: SemanticType, analytic_type: AnalyticType) -> Self {
        Self {
            fid: fid.into(),
            name: None,
            semantic_type,
            analytic_type,
            geo_role: GeoRole::None,
            ext_info: None,
        }
    }

    /// Nominal dimension, the usual shape of a categorical column
    pub fn nominal(fid: impl Into<String>) -> Self {
        Self::new(fid, SemanticType::Nominal, AnalyticType::Dimension)
    }

    /// Quantitative measure
    pub fn quantitative(fid: impl Into<String>) -> Self {
        Self::new(fid, SemanticType::Quantitative, AnalyticType::Measure)
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Name shown to users; falls back to the fid when unnamed or empty
    pub fn display_name(&self) -> &str {
        match self.name.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => &self.fid,
        }
    }

    pub fn is_derived(&self) -> bool {
        self.ext_info.is_some()
    }
}

/// A field produced by a transform; unlike [`FieldMeta`] its lineage is
/// mandatory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedField {
    pub fid: String,
    pub name: String,
    pub semantic_type: SemanticType,
    pub analytic_type: AnalyticType,
    #[serde(default)]
    pub geo_role: GeoRole,
    pub ext_info: FieldExtInfo,
}

impl DerivedField {
    /// Id of the first source field
    pub fn source_fid(&self) -> Option<&str> {
        self.ext_info.ext_from.first().map(String::as_str)
    }

    /// Category matched by an indicator column
    pub fn category(&self) -> Option<&CellValue> {
        match &self.ext_info.ext_info {
            DerivationParams::OneHotCategory { category } => Some(category),
            _ => None,
        }
    }

    pub fn is_others(&self) -> bool {
        matches!(self.ext_info.ext_info, DerivationParams::OneHotOthers { .. })
    }
}

impl From<DerivedField> for FieldMeta {
    fn from(field: DerivedField) -> Self {
        Self {
            fid: field.fid,
            name: Some(field.name),
            semantic_type: field.semantic_type,
            analytic_type: field.analytic_type,
            geo_role: field.geo_role,
            ext_info: Some(field.ext_info),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_fallback() {
        assert_eq!(FieldMeta::nominal("c1").display_name(), "c1");
        assert_eq!(FieldMeta::nominal("c1").with_name("").display_name(), "c1");
        assert_eq!(FieldMeta::nominal("c1").with_name("Color").display_name(), "Color");
    }

    #[test]
    fn test_field_meta_wire_format() {
        let field = FieldMeta::quantitative("age").with_name("Age");
        let json = serde_json::to_value(&field).unwrap();
        assert_eq!(json["semanticType"], "quantitative");
        assert_eq!(json["analyticType"], "measure");
        assert_eq!(json["geoRole"], "none");
        assert!(json.get("extInfo").is_none());
    }

    #[test]
    fn test_derivation_params_untagged() {
        let others: DerivationParams =
            serde_json::from_str(r#"{"excluded": ["a", 1], "unique": 3}"#).unwrap();
        assert_eq!(
            others,
            DerivationParams::OneHotOthers {
                excluded: vec![CellValue::from("a"), CellValue::Number(1.0)],
                unique: 3,
            }
        );

        let category: DerivationParams = serde_json::from_str(r#"{"category": "red"}"#).unwrap();
        assert_eq!(category, DerivationParams::OneHotCategory { category: CellValue::from("red") });

        let opaque: DerivationParams = serde_json::from_str(r#"{"bins": 4}"#).unwrap();
        assert!(matches!(opaque, DerivationParams::Opaque(_)));
    }

    #[test]
    fn test_derived_into_field_meta() {
        let derived = DerivedField {
            fid: "d1".to_string(),
            name: "color::red".to_string(),
            semantic_type: SemanticType::Nominal,
            analytic_type: AnalyticType::Dimension,
            geo_role: GeoRole::None,
            ext_info: FieldExtInfo {
                ext_from: vec!["color".to_string()],
                ext_opt: "OneHot".to_string(),
                ext_info: DerivationParams::OneHotCategory { category: CellValue::from("red") },
            },
        };
        assert_eq!(derived.source_fid(), Some("color"));
        assert!(!derived.is_others());

        let meta: FieldMeta = derived.into();
        assert!(meta.is_derived());
        assert_eq!(meta.display_name(), "color::red");
    }
}
