//! causal-explore - Main Entry Point
//!
//! One-hot expansion and hypothesis testing from the command line.

use clap::Parser;
use causal_explore::cli::{cmd_estimate, cmd_info, cmd_onehot, cmd_schema, Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "causal_explore=info".into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Onehot { data, targets, output, fields_out, max_children, sort_ties } => {
            cmd_onehot(
                &data,
                &targets,
                output.as_deref(),
                fields_out.as_deref(),
                max_children,
                sort_ties,
            )
            .await?;
        }
        Commands::Info { data } => {
            cmd_info(&data)?;
        }
        Commands::Schema { server } => {
            cmd_schema(server.as_deref()).await?;
        }
        Commands::Estimate {
            data,
            model,
            outcome,
            confounders,
            effect_modifiers,
            filters,
            params,
            server,
            session,
        } => {
            cmd_estimate(
                &data,
                model.as_deref(),
                &outcome,
                &confounders,
                &effect_modifiers,
                filters.as_deref(),
                &params,
                server.as_deref(),
                session.as_deref(),
            )
            .await?;
        }
    }

    Ok(())
}
