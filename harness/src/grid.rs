//! The analyzer × scoring model sweep.
//!
//! Each combination is an independent unit of work (build index, run every query,
//! evaluate) that shares only the read-only collection. Combinations run on a bounded
//! rayon pool; a failing combination is logged and left out of the reports.

use crate::cranfield::{boolean_judgments, Collection};
use anyhow::{Context, Result};
use irbench_core::config::{DEFAULT_TOP_N, SEARCH_FIELDS};
use irbench_core::persist::{save_index, IndexPaths};
use irbench_core::trec::{write_qrels, write_run};
use irbench_core::{
    evaluate, search, Analyzer, Index, MetricReport, Qrels, Query, QueryId, QueryParser, Run, ScoringModel,
};
use rayon::prelude::*;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct GridConfig {
    pub analyzers: Vec<Analyzer>,
    pub models: Vec<ScoringModel>,
    pub top_n: usize,
    /// Worker threads; 0 lets rayon pick.
    pub jobs: usize,
    /// Directory for result files, ground truth and reports. Nothing is written if unset.
    pub output: Option<PathBuf>,
    pub snapshot_indexes: bool,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            analyzers: Analyzer::ALL.to_vec(),
            models: ScoringModel::all().to_vec(),
            top_n: DEFAULT_TOP_N,
            jobs: 0,
            output: None,
            snapshot_indexes: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Combination {
    pub analyzer: Analyzer,
    pub model: ScoringModel,
}

impl Combination {
    /// File-name stem, e.g. `english-bm25`.
    pub fn slug(&self) -> String {
        format!("{}-{}", self.analyzer.name(), self.model.name()).to_lowercase()
    }
}

#[derive(Debug)]
pub struct GridOutcome {
    /// Reports of the successful combinations, in grid order.
    pub reports: Vec<MetricReport>,
    pub failures: Vec<(Combination, anyhow::Error)>,
}

/// Scoring models outer, analyzers inner.
pub fn combinations(config: &GridConfig) -> Vec<Combination> {
    config
        .models
        .iter()
        .flat_map(|&model| config.analyzers.iter().map(move |&analyzer| Combination { analyzer, model }))
        .collect()
}

/// Rank every query. A query that fails to parse is logged and gets an empty ranking.
pub fn run_queries(queries: &[Query], index: &Index, model: ScoringModel, top_n: usize) -> Run {
    let parser = QueryParser::new(index.analyzer()).with_fields(&SEARCH_FIELDS);
    let mut run = Run::new();
    for query in queries {
        match parser.parse(&query.text) {
            Ok(parsed) => {
                let result = search(&parsed, index, model, top_n);
                tracing::debug!(query_id = query.id, hits = result.len(), "ranked query");
                run.insert(query.id, result);
            }
            Err(err) => {
                tracing::warn!(query_id = query.id, error = %err, "skipping query");
            }
        }
    }
    run
}

pub fn run_combination(
    collection: &Collection,
    qrels: &Qrels,
    combo: Combination,
    config: &GridConfig,
) -> Result<MetricReport> {
    let index = Index::build(&collection.documents, &SEARCH_FIELDS, combo.analyzer)?;
    let run = run_queries(&collection.queries, &index, combo.model, config.top_n);

    if let Some(out) = &config.output {
        let path = out.join(format!("results-{}.txt", combo.slug()));
        write_run_file(&path, &run)?;
        if config.snapshot_indexes {
            save_index(&IndexPaths::new(out.join(format!("index-{}", combo.slug()))), &index)?;
        }
    }

    let query_ids: Vec<QueryId> = collection.queries.iter().map(|q| q.id).collect();
    let eval = evaluate(&query_ids, &run, qrels);
    let report = MetricReport::new(combo.analyzer.name(), combo.model.name(), &eval);
    tracing::info!(
        analyzer = %combo.analyzer,
        model = %combo.model,
        map = report.map,
        gm_map = report.gm_map,
        "combination complete"
    );
    Ok(report)
}

pub fn run_grid(collection: &Collection, config: &GridConfig) -> Result<GridOutcome> {
    let (qrels, rejected) = Qrels::validated(
        &collection.judgments,
        collection.documents.len() as u32,
        collection.queries.len() as u32,
    );
    if !rejected.is_empty() {
        tracing::warn!(count = rejected.len(), "ignored relevance judgments");
    }

    if let Some(out) = &config.output {
        fs::create_dir_all(out).with_context(|| format!("creating {}", out.display()))?;
        write_qrels_file(&out.join("trec-qrels.txt"), &qrels)?;
        let boolean = Qrels::new(&boolean_judgments(&qrels.judgments().collect::<Vec<_>>()));
        write_qrels_file(&out.join("trec-qrels-boolean.txt"), &boolean)?;
    }

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.jobs)
        .build()
        .context("building worker pool")?;
    let combos = combinations(config);
    let results: Vec<(Combination, Result<MetricReport>)> = pool.install(|| {
        combos
            .par_iter()
            .map(|&combo| (combo, run_combination(collection, &qrels, combo, config)))
            .collect()
    });

    let mut reports = Vec::new();
    let mut failures = Vec::new();
    for (combo, result) in results {
        match result {
            Ok(report) => reports.push(report),
            Err(err) => {
                tracing::error!(analyzer = %combo.analyzer, model = %combo.model, error = %err, "combination failed");
                failures.push((combo, err));
            }
        }
    }
    Ok(GridOutcome { reports, failures })
}

fn write_run_file(path: &Path, run: &Run) -> Result<()> {
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut w = BufWriter::new(file);
    write_run(&mut w, run)?;
    w.flush()?;
    Ok(())
}

fn write_qrels_file(path: &Path, qrels: &Qrels) -> Result<()> {
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut w = BufWriter::new(file);
    write_qrels(&mut w, qrels)?;
    w.flush()?;
    Ok(())
}
