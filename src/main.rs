//! `pasta` command-line entrypoint.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use chrono::Utc;
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde_json::json;
use uuid::Uuid;

use pasta::aggregate::{
    CommitCounts, JsonReplyIndex, PatchVersionCounts, load_upstream, response_records,
    split_clusters, with_patch_count, write_records,
};
use pasta::config::Config;
use pasta::manifest::{ManifestFile, StackSource};
use pasta::model::Version;
use pasta::pipeline::{EXIT_FATAL, Pipeline, RunContext, RunReport};
use pasta::rating::{DeferAll, TerminalRater};
use pasta::storage::{DecisionStore, StoreLayout, write_atomic};

/// Deduplicate and cluster patches across release lines.
#[derive(Parser, Debug)]
#[command(name = "pasta")]
#[command(about = "Deduplicate and cluster patches across release lines")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Score, classify and rate patch pairs
    Run(RunArgs),
    /// Load and verify the decision stores
    Check(StoreArgs),
    /// Report on confirmed clusters
    Aggregate(AggregateArgs),
}

#[derive(Args, Debug)]
struct StoreArgs {
    /// Decision store directory (overrides PASTA_DATA_DIR)
    #[arg(long)]
    data_dir: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct RunArgs {
    #[command(flatten)]
    store: StoreArgs,

    /// Patch-stack manifest (overrides PASTA_MANIFEST)
    #[arg(long)]
    manifest: Option<PathBuf>,

    /// Score table `origin candidate score` (overrides PASTA_SCORES)
    #[arg(long)]
    scores: Option<PathBuf>,

    /// Directory of `<id>.patch` files shown when asking
    #[arg(long)]
    patch_dir: Option<PathBuf>,

    /// Ask threshold
    #[arg(long)]
    ask: Option<f64>,

    /// Auto-accept threshold
    #[arg(long)]
    accept: Option<f64>,

    /// Lowest origin version (inclusive)
    #[arg(long)]
    min_version: Option<Version>,

    /// Highest origin version (inclusive)
    #[arg(long)]
    max_version: Option<Version>,

    /// Scoring workers
    #[arg(short = 'j', long)]
    workers: Option<usize>,

    /// Defer every ASK pair instead of prompting
    #[arg(long)]
    non_interactive: bool,

    /// Also write the JSON report to this file
    #[arg(long)]
    report: Option<PathBuf>,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum AggregateMode {
    /// Commits by number of patch versions
    Patches,
    /// Clusters by number of upstream commits
    Commits,
    /// Replies to every patch, written to a file
    Responses,
}

#[derive(Args, Debug)]
struct AggregateArgs {
    #[arg(value_enum, default_value_t = AggregateMode::Patches)]
    mode: AggregateMode,

    #[command(flatten)]
    store: StoreArgs,

    /// Upstream commit ids, one per line
    #[arg(long)]
    upstream: PathBuf,

    /// Patch-stack manifest listing the downstream patches (overrides PASTA_MANIFEST)
    #[arg(long)]
    manifest: Option<PathBuf>,

    /// Count only commits with exactly this many patches (`patches` mode)
    #[arg(long = "num-patches", short = 'n')]
    num_patches: Option<usize>,

    /// Reply index JSON (`responses` mode)
    #[arg(long)]
    replies: Option<PathBuf>,

    /// Output file (`responses` mode)
    #[arg(short = 'o', long, default_value = "patch-responses.json")]
    output: PathBuf,
}

impl StoreArgs {
    fn apply(&self, config: &mut Config) {
        if let Some(dir) = &self.data_dir {
            config.data_dir = dir.clone();
        }
    }
}

impl RunArgs {
    fn apply(&self, config: &mut Config) {
        self.store.apply(config);
        if let Some(path) = &self.manifest {
            config.manifest_path = path.clone();
        }
        if let Some(path) = &self.scores {
            config.scores_path = Some(path.clone());
        }
        if let Some(path) = &self.patch_dir {
            config.patch_dir = Some(path.clone());
        }
        if let Some(ask) = self.ask {
            config.ask_threshold = ask;
        }
        if let Some(accept) = self.accept {
            config.accept_threshold = accept;
        }
        if let Some(version) = &self.min_version {
            config.version_min = Some(version.clone());
        }
        if let Some(version) = &self.max_version {
            config.version_max = Some(version.clone());
        }
        if let Some(workers) = self.workers {
            config.workers = workers;
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    match dispatch(Cli::parse()).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %e, "Pasta failed");
            eprintln!("error: {:#}", e);
            exit_code(EXIT_FATAL)
        }
    }
}

async fn dispatch(cli: Cli) -> anyhow::Result<ExitCode> {
    let mut config = Config::from_env()?;

    match cli.command {
        Command::Run(args) => {
            args.apply(&mut config);
            run(config, &args).await
        }
        Command::Check(args) => {
            args.apply(&mut config);
            check(config)
        }
        Command::Aggregate(args) => {
            args.store.apply(&mut config);
            if let Some(path) = &args.manifest {
                config.manifest_path = path.clone();
            }
            aggregate(config, &args)
        }
    }
}

async fn run(config: Config, args: &RunArgs) -> anyhow::Result<ExitCode> {
    let run_id = Uuid::new_v4();
    let started_at = Utc::now();
    config.validate_for_run()?;

    tracing::info!(
        run_id = %run_id,
        data_dir = %config.data_dir.display(),
        manifest = %config.manifest_path.display(),
        "Pasta run starting"
    );

    let manifest = ManifestFile::load(&config.manifest_path)?;
    let stacks = manifest.list_versioned_stacks()?;

    let mut store = DecisionStore::open(StoreLayout::new(&config.data_dir))?;
    let mut state = store.load()?;

    let context = RunContext::from_config(&config, &manifest)?;
    let thresholds = context.thresholds;
    let pipeline = Pipeline::new(context);

    let evaluation = pipeline.evaluate(&stacks, &state).await?;

    let rating = tokio::task::block_in_place(|| {
        if args.non_interactive {
            pipeline.rate(&evaluation, &mut state, &mut DeferAll, &mut store)
        } else {
            let mut rater = TerminalRater::stdio();
            pipeline.rate(&evaluation, &mut state, &mut rater, &mut store)
        }
    })?;

    store.flush(&state)?;

    let report = RunReport::new(run_id, started_at, thresholds, &evaluation, &rating);
    let json = serde_json::to_string_pretty(&report)?;
    println!("{}", json);
    if let Some(path) = &args.report {
        write_atomic(path, json.as_bytes())
            .with_context(|| format!("writing report to {}", path.display()))?;
    }

    if !report.is_complete() {
        for failure in &report.failed_partitions {
            tracing::error!(
                partition = %failure.partition,
                reason = %failure.reason,
                "Partition missing from results"
            );
        }
    }

    tracing::info!(run_id = %run_id, exit_code = report.exit_code(), "Pasta run finished");
    Ok(exit_code(report.exit_code()))
}

fn check(config: Config) -> anyhow::Result<ExitCode> {
    config.validate()?;
    let store = DecisionStore::open(StoreLayout::new(&config.data_dir))?;
    let state = store.load()?;

    let summary = json!({
        "data_dir": config.data_dir,
        "patches": state.registry().len(),
        "edges": state.registry().edge_count(),
        "clusters": state.registry().clusters().len(),
        "rejected": state.rejections().len(),
    });
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(ExitCode::SUCCESS)
}

fn aggregate(config: Config, args: &AggregateArgs) -> anyhow::Result<ExitCode> {
    config.validate()?;
    let store = DecisionStore::open(StoreLayout::new(&config.data_dir))?;
    let state = store.load()?;
    let upstream = load_upstream(&args.upstream)?;
    let downstream = ManifestFile::load(&config.manifest_path)?.patch_ids();
    let clusters = split_clusters(state.registry(), &upstream, &downstream);

    tracing::info!(clusters = clusters.len(), "Clusters split");

    let summary = match args.mode {
        AggregateMode::Patches => match args.num_patches {
            Some(n) => json!({ "num_patches": n, "commits": with_patch_count(&clusters, n) }),
            None => serde_json::to_value(PatchVersionCounts::from_clusters(&clusters))?,
        },
        AggregateMode::Commits => serde_json::to_value(CommitCounts::from_clusters(&clusters))?,
        AggregateMode::Responses => {
            let path = args
                .replies
                .as_ref()
                .context("--replies is required in responses mode")?;
            let index = JsonReplyIndex::load(path)?;
            let records = response_records(&clusters, &index);
            write_records(&args.output, &records)?;
            json!({
                "records": records.len(),
                "clusters": clusters.len(),
                "output": args.output,
            })
        }
    };

    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(ExitCode::SUCCESS)
}

fn exit_code(code: i32) -> ExitCode {
    u8::try_from(code).map(ExitCode::from).unwrap_or(ExitCode::FAILURE)
}
