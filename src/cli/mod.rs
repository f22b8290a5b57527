//! causal-explore CLI Module
//!
//! Command-line interface for one-hot expansion and hypothesis testing.

use clap::{Parser, Subcommand};
use colored::*;
use polars::prelude::*;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use crate::dataset::RowSource;
use crate::hypothesis::{
    CausalContext, CausalGraph, CausalServerConfig, EstimateInput, HypothesisTestClient,
    TracingNotifier,
};
use crate::preprocessing::{FrequencyTable, OneHotConfig, OneHotEncoder, TieBreak, MAX_CHILDREN};
use crate::utils::{infer_fields, rows_from_dataframe, rows_to_dataframe, DataLoader, DataSaver};

// ─── Styling helpers ───────────────────────────────────────────────────────────

fn dim(s: &str) -> ColoredString    { s.truecolor(100, 100, 100) }
fn accent(s: &str) -> ColoredString { s.truecolor(120, 170, 255) }
fn muted(s: &str) -> ColoredString  { s.truecolor(140, 140, 140) }
fn ok(s: &str) -> ColoredString     { s.truecolor(100, 210, 120) }

fn step_run(msg: &str) {
    print!("  {} {}... ", accent("›"), msg);
}

fn step_done(detail: &str) {
    println!("{} {}", ok("done"), dim(detail));
}

fn section(title: &str) {
    println!();
    println!("  {}", title.white().bold());
    println!("  {}", dim(&"─".repeat(56)));
}

// ─── CLI definition ────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "causal-explore")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Categorical expansion and hypothesis testing for causal what-if exploration")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// One-hot expand categorical columns
    Onehot {
        /// Input data file (CSV, TSV, JSON or NDJSON)
        #[arg(short, long)]
        data: PathBuf,

        /// Columns to expand, comma separated
        #[arg(short, long, value_delimiter = ',', required = true)]
        targets: Vec<String>,

        /// Output file for the derived table
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output JSON file for the derived field descriptors
        #[arg(long)]
        fields_out: Option<PathBuf>,

        /// Maximum generated columns per target, catch-all included
        #[arg(long, default_value_t = MAX_CHILDREN)]
        max_children: usize,

        /// Order equally frequent categories by value
        #[arg(long)]
        sort_ties: bool,
    },

    /// Show data information
    Info {
        /// Input data file
        #[arg(short, long)]
        data: PathBuf,
    },

    /// Fetch the estimation parameter schema from the causal server
    Schema {
        /// Causal server URL (defaults to CAUSAL_SERVER_URL)
        #[arg(long)]
        server: Option<String>,
    },

    /// Run a hypothesis test estimation on the causal server
    Estimate {
        /// Input data file
        #[arg(short, long)]
        data: PathBuf,

        /// Causal model JSON file ({"funcDeps": [...], "edges": [...]})
        #[arg(short, long)]
        model: Option<PathBuf>,

        /// Outcome column
        #[arg(long)]
        outcome: String,

        /// Confounder columns, comma separated
        #[arg(long, value_delimiter = ',')]
        confounders: Vec<String>,

        /// Effect modifier columns, comma separated
        #[arg(long, value_delimiter = ',')]
        effect_modifiers: Vec<String>,

        /// Filters JSON file ({"populationPicker": [...], "predicates": [...]})
        #[arg(long)]
        filters: Option<PathBuf>,

        /// Estimator parameters as a JSON object
        #[arg(long, default_value = "{}")]
        params: String,

        /// Causal server URL (defaults to CAUSAL_SERVER_URL)
        #[arg(long)]
        server: Option<String>,

        /// Session id (defaults to CAUSAL_SESSION_ID)
        #[arg(long)]
        session: Option<String>,
    },
}

// ─── Data loading ──────────────────────────────────────────────────────────────

pub fn load_data(path: &Path) -> anyhow::Result<DataFrame> {
    if !path.exists() {
        anyhow::bail!("Data file not found: {}", path.display());
    }
    Ok(DataLoader::new().load_auto(path)?)
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let file = std::fs::File::open(path)?;
    Ok(serde_json::from_reader(std::io::BufReader::new(file))?)
}

fn server_config(server: Option<&str>, session: Option<&str>) -> CausalServerConfig {
    let mut config = CausalServerConfig::default();
    if let Some(url) = server {
        config.server_url = url.to_string();
    }
    if let Some(session) = session {
        config = config.with_session(session);
    }
    config
}

// ─── Commands ──────────────────────────────────────────────────────────────────

pub async fn cmd_onehot(
    data_path: &Path,
    targets: &[String],
    output: Option<&Path>,
    fields_out: Option<&Path>,
    max_children: usize,
    sort_ties: bool,
) -> anyhow::Result<()> {
    section("One-hot");

    step_run("Loading data");
    let start = Instant::now();
    let df = load_data(data_path)?;
    let fields = infer_fields(&df);
    let rows = rows_from_dataframe(&df)?;
    step_done(&format!("{} rows × {} cols in {:?}", df.height(), df.width(), start.elapsed()));

    let tie_break = if sort_ties { TieBreak::CategoryValue } else { TieBreak::FirstSeen };
    let config = OneHotConfig::new()
        .with_max_children(max_children)
        .with_tie_break(tie_break);

    step_run(&format!("Expanding {}", targets.join(", ").cyan()));
    let start = Instant::now();
    let result = OneHotEncoder::with_config(config)
        .expand(RowSource::from(&rows), &fields, targets)
        .await?;
    step_done(&format!("{} derived fields in {:?}", result.fields.len(), start.elapsed()));

    println!();
    println!("  {:<32} {:<12} {}", muted("Field"), muted("From"), muted("Rows set"));
    println!("  {}", dim(&"─".repeat(56)));
    for field in &result.fields {
        let hits = result
            .table
            .iter()
            .filter(|r| r.get(&field.fid).and_then(|v| v.as_f64()) == Some(1.0))
            .count();
        println!(
            "  {:<32} {:<12} {}",
            field.name,
            field.source_fid().unwrap_or("-"),
            hits
        );
    }

    if let Some(path) = output {
        step_run(&format!("Saving → {}", path.display()));
        let mut fids: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|name| name.to_string())
            .collect();
        fids.extend(result.fields.iter().map(|f| f.fid.clone()));

        let mut out = rows_to_dataframe(&result.table, &fids)?;
        let mut used: HashSet<String> = df.get_column_names().iter().map(|n| n.to_string()).collect();
        for field in &result.fields {
            if used.insert(field.name.clone()) {
                out.rename(&field.fid, field.name.as_str().into())?;
            } else {
                tracing::warn!(fid = %field.fid, name = %field.name, "Derived name already taken, keeping id as header");
            }
        }
        DataSaver::save_auto(&mut out, path)?;
        step_done(&format!("{} rows × {} cols", out.height(), out.width()));
    }

    if let Some(path) = fields_out {
        step_run(&format!("Saving fields → {}", path.display()));
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(file, &result.fields)?;
        step_done(&format!("{} fields", result.fields.len()));
    }

    println!();
    Ok(())
}

pub fn cmd_info(data_path: &Path) -> anyhow::Result<()> {
    section("Data Info");

    let df = load_data(data_path)?;
    let fields = infer_fields(&df);
    let rows = rows_from_dataframe(&df)?;

    println!("  {:<12} {}", muted("File"), data_path.display());
    println!("  {:<12} {}", muted("Rows"), df.height());
    println!("  {:<12} {}", muted("Columns"), df.width());
    println!();

    println!("  {:<20} {:<14} {:>6} {:>8}", muted("Column"), muted("Type"), muted("Nulls"), muted("Unique"));
    println!("  {}", dim(&"─".repeat(52)));
    for field in fields.iter() {
        let column = rows.iter().filter_map(|r| r.get(&field.fid));
        let freq = FrequencyTable::from_values(column);
        let nulls = df.column(&field.fid).map(|c| c.null_count()).unwrap_or(0);
        println!(
            "  {:<20} {:<14} {:>6} {:>8}",
            field.fid,
            format!("{:?}", field.semantic_type).to_lowercase(),
            nulls,
            freq.distinct()
        );
    }
    println!();

    Ok(())
}

pub async fn cmd_schema(server: Option<&str>) -> anyhow::Result<()> {
    section("Estimation Schema");

    let client = HypothesisTestClient::new(server_config(server, None), Arc::new(TracingNotifier))?;
    step_run(&format!("Fetching from {}", client.config().server_url));
    match client.fetch_param_schema().await? {
        Some(form) => {
            step_done("");
            println!("{}", serde_json::to_string_pretty(&form)?);
        }
        None => println!("{}", "server inactive".yellow()),
    }

    println!();
    Ok(())
}

#[allow(clippy::too_many_arguments)]
pub async fn cmd_estimate(
    data_path: &Path,
    model_path: Option<&Path>,
    outcome: &str,
    confounders: &[String],
    effect_modifiers: &[String],
    filters_path: Option<&Path>,
    params: &str,
    server: Option<&str>,
    session: Option<&str>,
) -> anyhow::Result<()> {
    section("Hypothesis Test");

    step_run("Loading data");
    let df = load_data(data_path)?;
    let fields = infer_fields(&df);
    let rows = rows_from_dataframe(&df)?;
    step_done(&format!("{} rows × {} cols", df.height(), df.width()));

    for fid in std::iter::once(outcome).chain(confounders.iter().map(String::as_str)) {
        if !fields.contains(fid) {
            return Err(crate::error::ExploreError::FeatureNotFound(fid.to_string()).into());
        }
    }

    let model: CausalGraph = match model_path {
        Some(path) => read_json(path)?,
        None => CausalGraph::default(),
    };
    let mut input: EstimateInput = match filters_path {
        Some(path) => read_json(path)?,
        None => EstimateInput::default(),
    };
    input.outcome = outcome.to_string();
    input.confounders = confounders.to_vec();
    input.effect_modifiers = effect_modifiers.to_vec();

    let params: serde_json::Map<String, serde_json::Value> = serde_json::from_str(params)?;

    let client = HypothesisTestClient::new(server_config(server, session), Arc::new(TracingNotifier))?;
    let context = CausalContext {
        data: &rows,
        fields: fields.as_slice(),
        model: &model,
    };

    step_run(&format!("Estimating effect on {}", outcome.cyan()));
    let start = Instant::now();
    match client.estimate(&input, context, &params).await? {
        Some(result) => {
            step_done(&format!("{:?}", start.elapsed()));
            println!();
            println!("  {:<16} {}", muted("Weight"), format!("{:.4}", result.weight).white().bold());
        }
        None => println!("{}", "no session id configured".yellow()),
    }

    println!();
    Ok(())
}
