use criterion::{criterion_group, criterion_main, Criterion};
use irbench_core::config::DEFAULT_TOP_N;
use irbench_core::{search, tokenize, Analyzer, Document, Field, Index, QueryParser, ScoringModel};

const ABSTRACT: &str = "experimental investigation of the aerodynamics of a wing in a slipstream. \
an experimental study of a wing in a propeller slipstream was made in order to determine the \
spanwise distribution of the lift increase due to slipstream at different angles of attack of \
the wing and at different free stream to slipstream velocity ratios.";

fn corpus() -> Vec<Document> {
    (1..=500)
        .map(|id| Document {
            id,
            title: format!("report {id} on boundary layers"),
            author: "brenckman,m.".into(),
            journal: "j. ae. scs. 25, 1958, 324.".into(),
            text: ABSTRACT.repeat(1 + (id as usize % 3)),
        })
        .collect()
}

fn bench_tokenize(c: &mut Criterion) {
    for analyzer in Analyzer::ALL {
        c.bench_function(&format!("tokenize_{}", analyzer.name().to_lowercase()), |b| {
            b.iter(|| tokenize(ABSTRACT, analyzer))
        });
    }
}

fn bench_search(c: &mut Criterion) {
    let docs = corpus();
    let index = Index::build(&docs, &Field::ALL, Analyzer::English).unwrap();
    let query = QueryParser::new(Analyzer::English).parse("lift distribution of a wing in a slipstream").unwrap();
    for model in ScoringModel::all() {
        c.bench_function(&format!("search_{}", model.name().to_lowercase()), |b| {
            b.iter(|| search(&query, &index, model, DEFAULT_TOP_N))
        });
    }
}

criterion_group!(benches, bench_tokenize, bench_search);
criterion_main!(benches);
