use irbench_core::config::DEFAULT_TOP_N;
use irbench_core::{search, Analyzer, Document, Field, Index, QueryParser, ScoringModel};
use proptest::prelude::*;

const VOCAB: &[&str] = &["wing", "flow", "mach", "shock", "heat", "layer", "rotor", "panel", "the", "of"];

fn word() -> impl Strategy<Value = String> {
    prop::sample::select(VOCAB).prop_map(str::to_string)
}

fn text() -> impl Strategy<Value = String> {
    prop::collection::vec(word(), 0..12).prop_map(|w| w.join(" "))
}

fn documents() -> impl Strategy<Value = Vec<Document>> {
    prop::collection::vec((text(), text(), text()), 1..20).prop_map(|fields| {
        fields
            .into_iter()
            .enumerate()
            .map(|(i, (title, author, text))| Document {
                id: i as u32 + 1,
                title,
                author,
                journal: String::new(),
                text,
            })
            .collect()
    })
}

fn analyzer() -> impl Strategy<Value = Analyzer> {
    prop::sample::select(Analyzer::ALL.to_vec())
}

proptest! {
    #[test]
    fn document_count_matches_input(docs in documents(), analyzer in analyzer()) {
        let index = Index::build(&docs, &Field::ALL, analyzer).unwrap();
        prop_assert_eq!(index.document_count(), docs.len());
    }

    #[test]
    fn absent_terms_have_empty_postings(docs in documents(), analyzer in analyzer()) {
        let index = Index::build(&docs, &Field::ALL, analyzer).unwrap();
        for field in Field::ALL {
            prop_assert_eq!(index.document_frequency(field, "zeppelin"), 0);
            prop_assert!(index.postings(field, "zeppelin").is_empty());
        }
    }

    #[test]
    fn postings_are_sorted_and_consistent(docs in documents(), analyzer in analyzer()) {
        let index = Index::build(&docs, &Field::ALL, analyzer).unwrap();
        for field in index.fields() {
            let fi = index.field(field).unwrap();
            for plist in fi.postings.values() {
                prop_assert!(plist.windows(2).all(|w| w[0].doc_id < w[1].doc_id));
                prop_assert!(plist.iter().all(|p| p.tf > 0 && p.tf <= index.field_length(p.doc_id, field)));
            }
        }
    }

    #[test]
    fn scores_are_non_negative(docs in documents(), q in text(), analyzer in analyzer()) {
        let index = Index::build(&docs, &Field::ALL, analyzer).unwrap();
        let query = QueryParser::new(analyzer).parse(&q).unwrap();
        for model in ScoringModel::all() {
            for doc in &docs {
                prop_assert!(model.score(&query, doc.id, &index) >= 0.0);
            }
        }
    }

    #[test]
    fn boolean_score_counts_distinct_clauses(docs in documents(), q in text(), analyzer in analyzer()) {
        let index = Index::build(&docs, &Field::ALL, analyzer).unwrap();
        let query = QueryParser::new(analyzer).parse(&q).unwrap();
        for hit in search(&query, &index, ScoringModel::Boolean, DEFAULT_TOP_N).hits {
            prop_assert!(hit.score >= 1.0);
            prop_assert_eq!(hit.score.fract(), 0.0);
            prop_assert!(hit.score <= query.len() as f64);
        }
    }

    #[test]
    fn search_is_deterministic(docs in documents(), q in text(), analyzer in analyzer()) {
        let a = Index::build(&docs, &Field::ALL, analyzer).unwrap();
        let b = Index::build(&docs, &Field::ALL, analyzer).unwrap();
        let query = QueryParser::new(analyzer).parse(&q).unwrap();
        for model in ScoringModel::all() {
            let first = search(&query, &a, model, DEFAULT_TOP_N);
            let second = search(&query, &b, model, DEFAULT_TOP_N);
            prop_assert_eq!(first.hits.len(), second.hits.len());
            for (x, y) in first.hits.iter().zip(&second.hits) {
                prop_assert_eq!(x.doc_id, y.doc_id);
                prop_assert_eq!(x.score.to_bits(), y.score.to_bits());
            }
            prop_assert!(first.doc_ids().all(|d| a.contains_document(d)));
        }
    }
}
