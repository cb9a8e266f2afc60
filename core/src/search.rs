use crate::index::Index;
use crate::model::{DocId, QueryId};
use crate::query::MultiFieldQuery;
use crate::scoring::ScoringModel;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hit {
    pub doc_id: DocId,
    pub score: f64,
    /// 0-based position in the ranking.
    pub rank: usize,
}

/// Hits for one query, best first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RankedResult {
    pub hits: Vec<Hit>,
}

impl RankedResult {
    pub fn len(&self) -> usize { self.hits.len() }

    pub fn is_empty(&self) -> bool { self.hits.is_empty() }

    pub fn doc_ids(&self) -> impl Iterator<Item = DocId> + '_ { self.hits.iter().map(|h| h.doc_id) }
}

/// Ranked results for a whole query set.
pub type Run = BTreeMap<QueryId, RankedResult>;

/// Rank every document matching at least one clause of `query`.
///
/// Candidates are collected in ascending doc id order and sorted with a stable sort
/// on descending score, so ties keep ascending doc id order.
pub fn search(query: &MultiFieldQuery, index: &Index, model: ScoringModel, top_n: usize) -> RankedResult {
    if query.is_empty() || index.document_count() == 0 {
        return RankedResult::default();
    }

    let mut candidates: BTreeSet<DocId> = BTreeSet::new();
    for clause in query.terms() {
        candidates.extend(index.postings(clause.field, &clause.term).iter().map(|p| p.doc_id));
    }

    let mut scored: Vec<(DocId, f64)> = candidates
        .into_iter()
        .map(|doc_id| (doc_id, model.score(query, doc_id, index)))
        .filter(|&(_, score)| !model.requires_match() || score > 0.0)
        .collect();
    scored.sort_by(|a, b| b.1.total_cmp(&a.1));
    scored.truncate(top_n);

    let hits = scored
        .into_iter()
        .enumerate()
        .map(|(rank, (doc_id, score))| Hit { doc_id, score, rank })
        .collect();
    RankedResult { hits }
}
