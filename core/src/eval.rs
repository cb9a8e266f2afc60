//! Retrieval effectiveness metrics computed in-process.
//!
//! Definitions follow trec_eval:
//! - P@k: relevant documents among the first k hits, divided by k (missing hits count
//!   as non-relevant)
//! - AP: sum of precision at each relevant hit, divided by the number of relevant
//!   documents judged for the query (0 when there are none)
//! - MAP: arithmetic mean of AP over the query set
//! - GM-MAP: geometric mean of AP, each AP floored at [`GM_MAP_FLOOR`]
//!
//! Aggregation always walks queries in ascending id order, so identical inputs give
//! bit-identical outputs.

use crate::config::{GM_MAP_FLOOR, PRECISION_CUTOFFS};
use crate::error::EvaluationError;
use crate::model::{DocId, QueryId, RelevanceJudgment};
use crate::search::{RankedResult, Run};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Ground-truth judgments grouped by query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Qrels {
    judgments: BTreeMap<QueryId, BTreeMap<DocId, i32>>,
}

impl Qrels {
    /// Group judgments without validation. A later duplicate (query, doc) pair wins.
    pub fn new(judgments: &[RelevanceJudgment]) -> Self {
        let mut qrels = Qrels::default();
        for j in judgments {
            qrels.insert(*j);
        }
        qrels
    }

    /// Group judgments, dropping those that point outside the collection
    /// (`1..=num_docs`) or the query set (`1..=num_queries`).
    pub fn validated(
        judgments: &[RelevanceJudgment],
        num_docs: u32,
        num_queries: u32,
    ) -> (Self, Vec<EvaluationError>) {
        let mut qrels = Qrels::default();
        let mut errors = Vec::new();
        for j in judgments {
            let err = if j.doc_id == 0 || j.doc_id > num_docs {
                Some(EvaluationError::UnknownDocument { query_id: j.query_id, doc_id: j.doc_id })
            } else if j.query_id == 0 || j.query_id > num_queries {
                Some(EvaluationError::UnknownQuery(j.query_id))
            } else {
                None
            };
            match err {
                Some(e) => {
                    tracing::warn!(error = %e, "ignoring relevance judgment");
                    errors.push(e);
                }
                None => qrels.insert(*j),
            }
        }
        (qrels, errors)
    }

    fn insert(&mut self, j: RelevanceJudgment) {
        self.judgments.entry(j.query_id).or_default().insert(j.doc_id, j.relevance);
    }

    pub fn is_relevant(&self, query_id: QueryId, doc_id: DocId) -> bool {
        self.judgments
            .get(&query_id)
            .and_then(|docs| docs.get(&doc_id))
            .map_or(false, |&rel| rel > 0)
    }

    pub fn relevant_count(&self, query_id: QueryId) -> usize {
        self.judgments
            .get(&query_id)
            .map_or(0, |docs| docs.values().filter(|&&rel| rel > 0).count())
    }

    pub fn query_ids(&self) -> impl Iterator<Item = QueryId> + '_ { self.judgments.keys().copied() }

    /// All judgments, ordered by query then document.
    pub fn judgments(&self) -> impl Iterator<Item = RelevanceJudgment> + '_ {
        self.judgments.iter().flat_map(|(&query_id, docs)| {
            docs.iter().map(move |(&doc_id, &relevance)| RelevanceJudgment { query_id, doc_id, relevance })
        })
    }

    pub fn len(&self) -> usize { self.judgments.values().map(BTreeMap::len).sum() }

    pub fn is_empty(&self) -> bool { self.len() == 0 }
}

/// Fraction of the first `k` hits that are relevant. Denominator is always `k`.
pub fn precision_at_k(result: &RankedResult, qrels: &Qrels, query_id: QueryId, k: usize) -> f64 {
    if k == 0 {
        return 0.0;
    }
    let hits = result.doc_ids().take(k).filter(|&d| qrels.is_relevant(query_id, d)).count();
    hits as f64 / k as f64
}

pub fn average_precision(result: &RankedResult, qrels: &Qrels, query_id: QueryId) -> f64 {
    let total_relevant = qrels.relevant_count(query_id);
    if total_relevant == 0 {
        return 0.0;
    }
    let mut found = 0usize;
    let mut precision_sum = 0.0;
    for (i, doc_id) in result.doc_ids().enumerate() {
        if qrels.is_relevant(query_id, doc_id) {
            found += 1;
            precision_sum += found as f64 / (i + 1) as f64;
        }
    }
    precision_sum / total_relevant as f64
}

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Geometric mean with every value raised to at least `floor`.
pub fn geometric_mean(values: &[f64], floor: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let log_sum: f64 = values.iter().map(|&v| v.max(floor).ln()).sum();
    (log_sum / values.len() as f64).exp()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryMetrics {
    pub query_id: QueryId,
    pub average_precision: f64,
    pub precision_at_5: f64,
    pub precision_at_10: f64,
    pub precision_at_15: f64,
}

impl QueryMetrics {
    pub fn compute(query_id: QueryId, result: &RankedResult, qrels: &Qrels) -> Self {
        let [p5, p10, p15] = PRECISION_CUTOFFS.map(|k| precision_at_k(result, qrels, query_id, k));
        Self {
            query_id,
            average_precision: average_precision(result, qrels, query_id),
            precision_at_5: p5,
            precision_at_10: p10,
            precision_at_15: p15,
        }
    }
}

/// Per-query and aggregated metrics for one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub per_query: Vec<QueryMetrics>,
    pub map: f64,
    pub gm_map: f64,
    pub precision_at_5: f64,
    pub precision_at_10: f64,
    pub precision_at_15: f64,
}

/// Evaluate `run` over `query_ids`. A query absent from the run counts as an empty ranking.
pub fn evaluate(query_ids: &[QueryId], run: &Run, qrels: &Qrels) -> Evaluation {
    let mut ids = query_ids.to_vec();
    ids.sort_unstable();
    ids.dedup();

    let empty = RankedResult::default();
    let per_query: Vec<QueryMetrics> = ids
        .iter()
        .map(|&qid| QueryMetrics::compute(qid, run.get(&qid).unwrap_or(&empty), qrels))
        .collect();

    let aps: Vec<f64> = per_query.iter().map(|m| m.average_precision).collect();
    let p5: Vec<f64> = per_query.iter().map(|m| m.precision_at_5).collect();
    let p10: Vec<f64> = per_query.iter().map(|m| m.precision_at_10).collect();
    let p15: Vec<f64> = per_query.iter().map(|m| m.precision_at_15).collect();

    Evaluation {
        map: mean(&aps),
        gm_map: geometric_mean(&aps, GM_MAP_FLOOR),
        precision_at_5: mean(&p5),
        precision_at_10: mean(&p10),
        precision_at_15: mean(&p15),
        per_query,
    }
}

/// Summary of one analyzer × scoring model combination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricReport {
    pub tokenizer_name: String,
    pub scoring_model_name: String,
    pub map: f64,
    pub gm_map: f64,
    pub precision_at_5: f64,
    pub precision_at_10: f64,
    pub precision_at_15: f64,
}

impl MetricReport {
    pub fn new(tokenizer_name: impl Into<String>, scoring_model_name: impl Into<String>, eval: &Evaluation) -> Self {
        Self {
            tokenizer_name: tokenizer_name.into(),
            scoring_model_name: scoring_model_name.into(),
            map: eval.map,
            gm_map: eval.gm_map,
            precision_at_5: eval.precision_at_5,
            precision_at_10: eval.precision_at_10,
            precision_at_15: eval.precision_at_15,
        }
    }
}
