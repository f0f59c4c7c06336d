//! filterplan
//!
//! Prints the query plan a query string produces against an entity schema.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use filterplan::predicate::expr::ExprBackend;
use filterplan::predicate::sql::SqlBackend;
use filterplan::{EntitySchema, FilterExpression, PlannerConfig, QueryParams, QueryPlanner};
use tracing::{debug, info};

/// Output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Human-readable predicate and page.
    Text,
    /// The plan as JSON.
    Json,
    /// A parameterized WHERE clause and page clause.
    Sql,
}

/// Inspect filter and pagination plans.
#[derive(Debug, Parser)]
#[command(name = "filterplan", version, about = "Inspect filter and pagination plans")]
struct Cli {
    /// Entity schema file (JSON).
    #[arg(short, long, env = "FILTERPLAN_SCHEMA")]
    schema: PathBuf,

    /// Query string, e.g. "q=foo&search[status]=open|closed&sort=-age".
    #[arg(short, long, default_value = "")]
    query: String,

    /// Filter always AND-ed first, as JSON: {"field", "operator", "value" | "values"}.
    #[arg(long)]
    default_filter: Option<String>,

    /// Output format.
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Table alias for SQL output.
    #[arg(long)]
    alias: Option<String>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long, env = "FILTERPLAN_LOG_LEVEL", default_value = "warn")]
    log_level: String,

    #[command(flatten)]
    planner: PlannerConfig,
}

/// Initializes stderr logging; `RUST_LOG` takes precedence over `level`.
fn init_logging(level: &str) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("filterplan={}", level)));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    if let Err(errors) = cli.planner.validate() {
        for error in &errors {
            eprintln!("Configuration error: {}", error);
        }
        std::process::exit(1);
    }

    let schema = EntitySchema::from_file(&cli.schema)
        .with_context(|| format!("loading schema {}", cli.schema.display()))?;
    info!(
        entity = %schema.name(),
        fields = schema.fields().len(),
        "Loaded schema"
    );

    let default_filter = cli
        .default_filter
        .as_deref()
        .map(serde_json::from_str::<FilterExpression>)
        .transpose()
        .context("parsing --default-filter")?;

    let params = QueryParams::from_query_string(&cli.query);
    debug!(parameters = params.len(), "Decoded query string");

    let planner = QueryPlanner::with_config(&schema, cli.planner.clone());

    match cli.format {
        OutputFormat::Text => {
            let plan = planner.plan(&ExprBackend, &params, default_filter.as_ref())?;
            let page = &plan.page;
            println!("filter: {}", plan.filter);
            println!(
                "page:   limit={} offset={} sort={} (page {})",
                page.limit(),
                page.offset(),
                page.sort(),
                page.page_number()
            );
        }
        OutputFormat::Json => {
            let plan = planner.plan(&ExprBackend, &params, default_filter.as_ref())?;
            println!("{}", serde_json::to_string_pretty(&plan)?);
        }
        OutputFormat::Sql => {
            let backend = match &cli.alias {
                Some(alias) => SqlBackend::new(&schema).with_alias(alias),
                None => SqlBackend::new(&schema),
            };
            let plan = planner.plan(&backend, &params, default_filter.as_ref())?;
            let page = backend.page_clause(&plan.page);
            println!("{} {}", plan.filter.where_clause(), page.sql);
            for (i, param) in plan.filter.params.iter().chain(&page.params).enumerate() {
                println!("  ?{} = {}", i + 1, param);
            }
        }
    }

    Ok(())
}
