//! @ai:module:intent CLI for the ticket triage evaluation harness
//! @ai:module:layer presentation

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use ticket_eval::{
    config::{EvalConfig, SettingsCache, DEFAULT_EVAL_CONFIG_PATH},
    dataset::{validate_dataset, DatasetLoader, DatasetLoaderTrait},
    evaluator::Evaluator,
    metrics::{AggregateSummary, MetricsAggregator, MetricsAggregatorTrait},
    report::{self, ReportGenerator, RunReport},
    runner::{build_runner, AgentMode},
    schema,
};

#[derive(Parser)]
#[command(name = "ticket-eval")]
#[command(about = "Evaluation harness for the ticket triage agent")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate an agent against a labeled dataset
    Run {
        /// Tasks JSONL file
        #[arg(long)]
        tasks: Option<PathBuf>,

        /// Labels JSONL file
        #[arg(long)]
        labels: Option<PathBuf>,

        /// Evaluate at most this many examples
        #[arg(long)]
        limit: Option<usize>,

        /// Root directory for timestamped run reports
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Agent to drive: noop, gold or http
        #[arg(long)]
        agent_mode: Option<String>,

        /// Endpoint for http mode
        #[arg(long)]
        agent_endpoint: Option<String>,

        /// Path to harness configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Path to agent settings file
        #[arg(long)]
        agent_config: Option<PathBuf>,
    },

    /// Validate dataset files without running an agent
    Validate {
        /// Tasks JSONL file
        #[arg(long)]
        tasks: Option<PathBuf>,

        /// Labels JSONL file
        #[arg(long)]
        labels: Option<PathBuf>,
    },

    /// Print the JSON schema for a payload
    Schema {
        #[arg(value_enum)]
        kind: SchemaKind,
    },

    /// Initialize default configuration
    Init {
        /// Output path for config file
        #[arg(short, long, default_value = DEFAULT_EVAL_CONFIG_PATH)]
        output: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum SchemaKind {
    Task,
    Result,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("ticket_eval=info".parse()?),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            tasks,
            labels,
            limit,
            output_dir,
            agent_mode,
            agent_endpoint,
            config,
            agent_config,
        } => run_evaluation(RunArgs {
            tasks,
            labels,
            limit,
            output_dir,
            agent_mode,
            agent_endpoint,
            config,
            agent_config,
        })
        .await,
        Commands::Validate { tasks, labels } => validate(tasks, labels),
        Commands::Schema { kind } => print_schema(kind),
        Commands::Init { output } => init_config(output),
    }
}

struct RunArgs {
    tasks: Option<PathBuf>,
    labels: Option<PathBuf>,
    limit: Option<usize>,
    output_dir: Option<PathBuf>,
    agent_mode: Option<String>,
    agent_endpoint: Option<String>,
    config: Option<PathBuf>,
    agent_config: Option<PathBuf>,
}

/// @ai:intent Load, join, evaluate and report one run
/// @ai:effects network, fs:read, fs:write
async fn run_evaluation(args: RunArgs) -> Result<()> {
    let config = load_or_default_config(args.config)?;

    let tasks_path = args
        .tasks
        .or(config.paths.tasks)
        .context("No tasks file given (use --tasks or [paths].tasks)")?;
    let labels_path = args
        .labels
        .or(config.paths.labels)
        .context("No labels file given (use --labels or [paths].labels)")?;
    let limit = args.limit.or(config.run.limit);
    let mode_name = args.agent_mode.unwrap_or(config.run.agent_mode);
    let endpoint = args.agent_endpoint.or(config.run.agent_endpoint);
    let agent_config = args.agent_config.unwrap_or(config.paths.agent_config);
    let output_root = args.output_dir.unwrap_or(config.paths.output_dir);

    let run_id = report::run_id(chrono::Utc::now());
    let run_dir = report::create_run_dir(&output_root, &run_id)?;
    let reports = ReportGenerator::new();

    tracing::info!(
        "Loading dataset from {} and {}",
        tasks_path.display(),
        labels_path.display()
    );
    let dataset = DatasetLoader::new().assemble(&tasks_path, &labels_path);

    let issues_path = reports.write_issues(&dataset.issues, &run_dir)?;
    if !dataset.issues.is_empty() {
        tracing::warn!(
            "{} dataset issues recorded in {}",
            dataset.issues.len(),
            issues_path.display()
        );
    }

    if dataset.examples.is_empty() {
        tracing::warn!("No examples to evaluate");
        let summary = AggregateSummary::default();
        reports.generate_all(
            &RunReport {
                run_id: &run_id,
                agent_mode: &mode_name,
                issues: &dataset.issues,
                results: &[],
                summary: &summary,
            },
            &run_dir,
        )?;
        return Ok(());
    }

    tracing::info!("Found {} examples to evaluate", dataset.examples.len());

    let mode: AgentMode = mode_name.parse()?;
    let settings = match mode {
        AgentMode::Http => Some(
            SettingsCache::new()
                .load(Some(agent_config.as_path()))
                .with_context(|| format!("Failed to load agent settings from {}", agent_config.display()))?,
        ),
        AgentMode::Noop | AgentMode::Gold => None,
    };
    let runner = build_runner(mode, &dataset.examples, settings.as_ref(), endpoint.as_deref())?;

    let evaluator = Evaluator::default().with_limit(limit);
    let results = evaluator.evaluate_all(&dataset.examples, &runner).await?;

    let summary = MetricsAggregator::new().summarize(&results);

    reports.generate_all(
        &RunReport {
            run_id: &run_id,
            agent_mode: mode.as_str(),
            issues: &dataset.issues,
            results: &results,
            summary: &summary,
        },
        &run_dir,
    )?;

    print_summary(&summary, dataset.issues.len());

    if !summary.meets_schema_threshold(config.run.schema_valid_threshold) {
        anyhow::bail!(
            "schema_valid_pct {:.3} is below the threshold {:.3}",
            summary.schema_valid_pct,
            config.run.schema_valid_threshold
        );
    }

    Ok(())
}

fn validate(tasks: Option<PathBuf>, labels: Option<PathBuf>) -> Result<()> {
    if tasks.is_none() && labels.is_none() {
        anyhow::bail!("Nothing to validate: pass --tasks and/or --labels");
    }

    let errors = validate_dataset(tasks.as_deref(), labels.as_deref());

    if errors.is_empty() {
        println!("Dataset validation passed!");
        return Ok(());
    }

    for error in &errors {
        println!("  - {}", error);
    }
    anyhow::bail!("Dataset validation failed with {} errors", errors.len())
}

fn print_schema(kind: SchemaKind) -> Result<()> {
    let document = match kind {
        SchemaKind::Task => schema::task_json_schema(),
        SchemaKind::Result => schema::result_json_schema(),
    };
    println!("{}", serde_json::to_string_pretty(&document)?);
    Ok(())
}

fn init_config(output: PathBuf) -> Result<()> {
    let config = EvalConfig::default();
    config.save(&output)?;
    println!("Configuration saved to {}", output.display());
    Ok(())
}

fn load_or_default_config(path: Option<PathBuf>) -> Result<EvalConfig> {
    match path {
        Some(p) => EvalConfig::load(&p)
            .with_context(|| format!("Failed to load configuration from {}", p.display())),
        None => EvalConfig::load_or_default(&PathBuf::from(DEFAULT_EVAL_CONFIG_PATH)),
    }
}

fn print_summary(summary: &AggregateSummary, issue_count: usize) {
    println!();
    println!("Ticket Triage Evaluation");
    println!("========================");
    println!();
    println!("{:<25} {:>10}", "Examples:", summary.total_examples);
    println!(
        "{:<25} {:>9.1}%",
        "Categorical accuracy:",
        summary.categorical_accuracy * 100.0
    );
    println!(
        "{:<25} {:>9.1}%",
        "Next step match:",
        summary.next_step_match_rate * 100.0
    );
    println!("{:<25} {:>9.1}%", "Schema valid:", summary.schema_valid_pct * 100.0);
    println!("{:<25} {:>10.4}", "Total cost (USD):", summary.total_cost_usd);
    println!("{:<25} {:>10}", "Dataset issues:", issue_count);
    println!();
}
