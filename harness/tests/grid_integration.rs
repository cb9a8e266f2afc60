use irbench::cranfield::{load_collection, DOCUMENTS_FILE, QRELS_FILE, QUERIES_FILE};
use irbench::grid::{run_grid, GridConfig};
use irbench_core::trec::{parse_qrels, parse_run};
use irbench_core::{evaluate, Analyzer, Qrels, ScoringModel};
use std::fs;
use std::path::Path;
use tempfile::tempdir;

const DOCS: &str = ".I 1
.T
experimental investigation of the aerodynamics of a wing in a slipstream .
.A
brenckman,m.
.B
j. ae. scs. 25, 1958, 324.
.W
an experimental study of a wing in a propeller slipstream was made .
.I 2
.T
simple shear flow past a flat plate in an incompressible fluid .
.A
ting-yili
.B
department of aeronautical engineering, rensselaer polytechnic institute
.W
the boundary layer on a flat plate in shear flow .
.I 3
.T
the boundary layer in simple shear flow past a flat plate .
.A
m. b. glauert
.B
department of mathematics, university of manchester
.W
the boundary-layer equations are presented for steady incompressible flow .
";

const QUERIES: &str = ".I 001
.W
what is the effect of a propeller slipstream on a wing ?
.I 002
.W
boundary layer of shear flow past a flat plate .
";

const QRELS: &str = "1 1 2
2 2 1
2 3 2
2 1 5
";

fn write_corpus(dir: &Path) {
    fs::write(dir.join(DOCUMENTS_FILE), DOCS).unwrap();
    fs::write(dir.join(QUERIES_FILE), QUERIES).unwrap();
    fs::write(dir.join(QRELS_FILE), QRELS).unwrap();
}

#[test]
fn grid_writes_results_ground_truth_and_snapshots() {
    let corpus = tempdir().unwrap();
    write_corpus(corpus.path());
    let out = tempdir().unwrap();

    let collection = load_collection(corpus.path()).unwrap();
    assert_eq!(collection.documents.len(), 3);
    assert_eq!(collection.queries.len(), 2);

    let config = GridConfig {
        analyzers: vec![Analyzer::Standard, Analyzer::English],
        models: vec![ScoringModel::bm25(), ScoringModel::Boolean],
        jobs: 2,
        output: Some(out.path().to_path_buf()),
        snapshot_indexes: true,
        ..Default::default()
    };
    let outcome = run_grid(&collection, &config).unwrap();
    assert_eq!(outcome.reports.len(), 4);
    let names: Vec<(&str, &str)> = outcome
        .reports
        .iter()
        .map(|r| (r.tokenizer_name.as_str(), r.scoring_model_name.as_str()))
        .collect();
    assert_eq!(names, vec![("Standard", "BM25"), ("English", "BM25"), ("Standard", "Boolean"), ("English", "Boolean")]);

    let qrels = parse_qrels(&fs::read_to_string(out.path().join("trec-qrels.txt")).unwrap()).unwrap();
    assert_eq!(qrels.len(), 4);
    let boolean = fs::read_to_string(out.path().join("trec-qrels-boolean.txt")).unwrap();
    assert!(boolean.lines().all(|l| l.ends_with(" 0") || l.ends_with(" 1")));

    // Re-evaluating a written result file reproduces the in-process report exactly.
    let run = parse_run(&fs::read_to_string(out.path().join("results-english-bm25.txt")).unwrap()).unwrap();
    let eval = evaluate(&[1, 2], &run, &Qrels::new(&qrels));
    let report = &outcome.reports[1];
    assert_eq!(eval.map.to_bits(), report.map.to_bits());
    assert_eq!(eval.gm_map.to_bits(), report.gm_map.to_bits());
    assert_eq!(eval.precision_at_5, report.precision_at_5);

    assert!(out.path().join("index-english-bm25").join("index.bin").exists());
    assert!(out.path().join("index-english-bm25").join("meta.json").exists());
}

#[test]
fn reruns_are_reproducible() {
    let corpus = tempdir().unwrap();
    write_corpus(corpus.path());
    let collection = load_collection(corpus.path()).unwrap();
    let a = run_grid(&collection, &GridConfig { jobs: 4, ..Default::default() }).unwrap();
    let b = run_grid(&collection, &GridConfig { jobs: 1, ..Default::default() }).unwrap();
    assert_eq!(a.reports, b.reports);
}
