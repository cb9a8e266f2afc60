use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use irbench::cranfield::load_collection;
use irbench::grid::{run_grid, GridConfig};
use irbench::report::{render_evaluation, render_table, write_json};
use irbench_core::config::DEFAULT_TOP_N;
use irbench_core::trec::{parse_qrels, parse_run};
use irbench_core::{evaluate, Analyzer, Qrels, QueryId, ScoringModel};
use std::collections::BTreeSet;
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "irbench")]
#[command(about = "Index a test collection under several analyzers and scoring models and evaluate the rankings", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sweep analyzer × scoring model combinations over a Cranfield-format collection
    Run {
        /// Directory holding cran.all.1400, cran.qry and cranqrel
        #[arg(long)]
        corpus: PathBuf,
        /// Directory for result files, ground truth and reports
        #[arg(long, default_value = "./results")]
        output: PathBuf,
        /// Hits kept per query
        #[arg(long, default_value_t = DEFAULT_TOP_N)]
        top_n: usize,
        /// Worker threads (0 = one per core)
        #[arg(long, default_value_t = 0)]
        jobs: usize,
        /// Analyzers to run (standard, whitespace, english, stop)
        #[arg(long, value_delimiter = ',', default_value = "standard,whitespace,english,stop")]
        analyzers: Vec<Analyzer>,
        /// Scoring models to run (classic, bm25, boolean)
        #[arg(long, value_delimiter = ',', default_value = "classic,bm25,boolean")]
        models: Vec<ScoringModel>,
        /// Also write a snapshot of every index built
        #[arg(long, default_value_t = false)]
        snapshot_indexes: bool,
    },
    /// Evaluate an existing run file against a ground-truth file
    Eval {
        /// Run file: `query 0 doc rank score 0` per line
        #[arg(long)]
        run: PathBuf,
        /// Ground truth: `query 0 doc relevance` per line
        #[arg(long)]
        qrels: PathBuf,
        /// Size of the query set (queries 1..=N); defaults to every query in either file
        #[arg(long)]
        queries: Option<u32>,
    },
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Run { corpus, output, top_n, jobs, analyzers, models, snapshot_indexes } => {
            let config = GridConfig { analyzers, models, top_n, jobs, output: Some(output), snapshot_indexes };
            run(&corpus, config)
        }
        Commands::Eval { run, qrels, queries } => eval(&run, &qrels, queries),
    }
}

fn run(corpus: &std::path::Path, config: GridConfig) -> Result<()> {
    let collection = load_collection(corpus)?;
    let outcome = run_grid(&collection, &config)?;
    print!("{}", render_table(&outcome.reports));
    if let Some(out) = &config.output {
        write_json(&out.join("reports.json"), &outcome.reports)?;
        tracing::info!(output = %out.display(), "reports written");
    }
    if !outcome.failures.is_empty() {
        anyhow::bail!("{} of {} combinations failed", outcome.failures.len(), outcome.failures.len() + outcome.reports.len());
    }
    Ok(())
}

fn eval(run_path: &std::path::Path, qrels_path: &std::path::Path, queries: Option<u32>) -> Result<()> {
    let run_text = fs::read_to_string(run_path).with_context(|| format!("reading {}", run_path.display()))?;
    let qrels_text = fs::read_to_string(qrels_path).with_context(|| format!("reading {}", qrels_path.display()))?;
    let run = parse_run(&run_text).with_context(|| format!("parsing {}", run_path.display()))?;
    let qrels = Qrels::new(&parse_qrels(&qrels_text).with_context(|| format!("parsing {}", qrels_path.display()))?);

    let query_ids: Vec<QueryId> = match queries {
        Some(n) => (1..=n).collect(),
        None => run.keys().copied().chain(qrels.query_ids()).collect::<BTreeSet<_>>().into_iter().collect(),
    };
    let evaluation = evaluate(&query_ids, &run, &qrels);
    print!("{}", render_evaluation(&evaluation));
    Ok(())
}
