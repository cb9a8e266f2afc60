use irbench_core::config::DEFAULT_TOP_N;
use irbench_core::{
    evaluate, search, Analyzer, Document, Field, Index, QueryParser, Qrels, RelevanceJudgment, Run, ScoringModel,
};

fn collection() -> Vec<Document> {
    vec![
        Document { id: 1, title: "slipstream effects".into(), text: "propeller slipstream over a wing".into(), ..Default::default() },
        Document { id: 2, title: "heat transfer".into(), text: "laminar boundary layer".into(), ..Default::default() },
        Document { id: 3, title: "tandem rotors".into(), text: "rotor slipstream interaction".into(), ..Default::default() },
    ]
}

#[test]
fn boolean_returns_exactly_the_matching_documents() {
    let index = Index::build(&collection(), &Field::ALL, Analyzer::Standard).unwrap();
    let query = QueryParser::new(Analyzer::Standard).parse("rotor").unwrap();
    let result = search(&query, &index, ScoringModel::Boolean, DEFAULT_TOP_N);
    let hits: Vec<(u32, f64)> = result.hits.iter().map(|h| (h.doc_id, h.score)).collect();
    assert_eq!(hits, vec![(3, 1.0)]);

    let index = Index::build(&collection(), &[Field::Text], Analyzer::Standard).unwrap();
    let query = QueryParser::new(Analyzer::Standard).with_fields(&[Field::Text]).parse("slipstream").unwrap();
    let result = search(&query, &index, ScoringModel::Boolean, DEFAULT_TOP_N);
    let hits: Vec<(u32, f64)> = result.hits.iter().map(|h| (h.doc_id, h.score)).collect();
    assert_eq!(hits, vec![(1, 1.0), (3, 1.0)]);
    assert!(result.doc_ids().all(|d| d != 2));
}

#[test]
fn pipeline_scores_a_perfect_run() {
    let docs = collection();
    let judgments = vec![
        RelevanceJudgment { query_id: 1, doc_id: 2, relevance: 1 },
        RelevanceJudgment { query_id: 2, doc_id: 1, relevance: 1 },
        RelevanceJudgment { query_id: 2, doc_id: 3, relevance: 1 },
    ];
    let qrels = Qrels::new(&judgments);
    for analyzer in Analyzer::ALL {
        let index = Index::build(&docs, &Field::ALL, analyzer).unwrap();
        let parser = QueryParser::new(analyzer);
        for model in ScoringModel::all() {
            let mut run = Run::new();
            run.insert(1, search(&parser.parse("laminar").unwrap(), &index, model, DEFAULT_TOP_N));
            run.insert(2, search(&parser.parse("slipstream").unwrap(), &index, model, DEFAULT_TOP_N));
            let eval = evaluate(&[1, 2], &run, &qrels);
            assert_eq!(eval.map, 1.0, "{analyzer} {model}");
            assert_eq!(eval.precision_at_5, (1.0 / 5.0 + 2.0 / 5.0) / 2.0);
        }
    }
}

#[test]
fn mismatched_analyzers_degrade_silently() {
    let index = Index::build(&collection(), &Field::ALL, Analyzer::Whitespace).unwrap();
    // The index holds "effects" verbatim while the English analyzer stems the query to "effect".
    let query = QueryParser::new(Analyzer::English).parse("effects").unwrap();
    assert!(search(&query, &index, ScoringModel::bm25(), DEFAULT_TOP_N).is_empty());
}
