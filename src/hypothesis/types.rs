//! Wire types of the estimation server

use crate::dataset::{CellValue, FieldMeta, Row};
use serde::{Deserialize, Serialize};

/// Row filter used to select subgroups
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Filter {
    /// Rows whose value is one of `values`
    Set { fid: String, values: Vec<CellValue> },
    /// Rows whose value lies in `[min, max]`
    Range { fid: String, range: [f64; 2] },
}

impl Filter {
    pub fn fid(&self) -> &str {
        match self {
            Filter::Set { fid, .. } | Filter::Range { fid, .. } => fid,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionalDepParam {
    pub fid: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

/// A functional dependency: `fid` is computed from `params`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionalDep {
    pub fid: String,
    pub params: Vec<FunctionalDepParam>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub func: Option<String>,
}

/// Endpoint mark of an edge in a partial ancestral graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PagMark {
    Empty,
    Blank,
    Arrow,
    Circle,
}

/// Edge of the user-edited causal graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PagLink {
    pub src: String,
    pub tar: String,
    pub src_type: PagMark,
    pub tar_type: PagMark,
}

/// Causal model sent with every estimation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CausalGraph {
    #[serde(default)]
    pub func_deps: Vec<FunctionalDep>,
    #[serde(default)]
    pub edges: Vec<PagLink>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GroupPredicates {
    pub predicates: Vec<Filter>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Groups {
    pub current: GroupPredicates,
    pub population: GroupPredicates,
}

/// What to estimate
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EstimateInput {
    /// Predicates selecting the population
    pub population_picker: Vec<Filter>,
    /// Predicates selecting the current group inside the population
    pub predicates: Vec<Filter>,
    /// Fields affecting both dimensions and the outcome
    pub confounders: Vec<String>,
    /// Fields acting only on the outcome
    pub effect_modifiers: Vec<String>,
    /// Outcome field id
    pub outcome: String,
}

/// Data and causal model an estimation runs against
#[derive(Debug, Clone, Copy)]
pub struct CausalContext<'a> {
    pub data: &'a [Row],
    pub fields: &'a [FieldMeta],
    pub model: &'a CausalGraph,
}

/// Body of `POST /v0.1/{session}/estimate/calc`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HypothesisTestRequest<'a> {
    pub data: &'a [Row],
    pub fields: &'a [FieldMeta],
    pub causal_model: &'a CausalGraph,
    pub groups: Groups,
    pub confounders: &'a [String],
    pub effect_modifiers: &'a [String],
    pub outcome: &'a str,
    pub params: &'a serde_json::Map<String, serde_json::Value>,
}

impl<'a> HypothesisTestRequest<'a> {
    /// The current group is the population narrowed by `predicates`
    pub fn new(
        input: &'a EstimateInput,
        context: CausalContext<'a>,
        params: &'a serde_json::Map<String, serde_json::Value>,
    ) -> Self {
        let current = input
            .population_picker
            .iter()
            .chain(&input.predicates)
            .cloned()
            .collect();

        Self {
            data: context.data,
            fields: context.fields,
            causal_model: context.model,
            groups: Groups {
                current: GroupPredicates { predicates: current },
                population: GroupPredicates {
                    predicates: input.population_picker.clone(),
                },
            },
            confounders: &input.confounders,
            effect_modifiers: &input.effect_modifiers,
            outcome: &input.outcome,
            params,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HypothesisTestResult {
    /// Contribution weight
    pub weight: f64,
}

/// Parameter form schema; its layout is owned by the server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParamForm(pub serde_json::Value);

/// `{ success: true, data }` or `{ success: false, message }`
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ServiceEnvelope<T> {
    success: bool,
    data: Option<T>,
    message: Option<String>,
}

impl<T> ServiceEnvelope<T> {
    pub(crate) fn into_result(self) -> std::result::Result<T, String> {
        if !self.success {
            return Err(self.message.unwrap_or_default());
        }
        self.data
            .ok_or_else(|| "response reported success without data".to_string())
    }
}
