//! Relevance scoring models.
//!
//! Every model scores a document as a sum over the (field, term) clauses of a
//! [`MultiFieldQuery`] that occur in it. Clauses absent from the document add nothing.
//! Collection statistics (document count, average length) are taken per field.

use crate::config::{BM25_B, BM25_K1};
use crate::index::Index;
use crate::model::{DocId, Field};
use crate::query::MultiFieldQuery;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ScoringModel {
    /// Vector-space TF-IDF: `sqrt(tf) * (1 + ln(N / (df + 1))) / sqrt(len)`.
    Classic,
    /// Okapi BM25.
    Bm25 { k1: f64, b: f64 },
    /// One point per matched clause; frequency and length are ignored.
    Boolean,
}

impl Default for ScoringModel {
    fn default() -> Self { ScoringModel::bm25() }
}

impl ScoringModel {
    pub fn bm25() -> Self {
        ScoringModel::Bm25 { k1: BM25_K1, b: BM25_B }
    }

    /// The three models of the experiment grid, in reporting order.
    pub fn all() -> [ScoringModel; 3] {
        [ScoringModel::Classic, ScoringModel::bm25(), ScoringModel::Boolean]
    }

    pub fn name(&self) -> &'static str {
        match self {
            ScoringModel::Classic => "Classic",
            ScoringModel::Bm25 { .. } => "BM25",
            ScoringModel::Boolean => "Boolean",
        }
    }

    /// Boolean retrieval drops documents that match no clause instead of ranking them last.
    pub fn requires_match(&self) -> bool {
        matches!(self, ScoringModel::Boolean)
    }

    pub fn score(&self, query: &MultiFieldQuery, doc_id: DocId, index: &Index) -> f64 {
        let mut score = 0.0;
        for clause in query.terms() {
            let tf = index.term_frequency(clause.field, &clause.term, doc_id);
            if tf == 0 {
                continue;
            }
            score += clause.boost * self.term_score(clause.field, &clause.term, tf, doc_id, index);
        }
        score
    }

    fn term_score(&self, field: Field, term: &str, tf: u32, doc_id: DocId, index: &Index) -> f64 {
        match *self {
            ScoringModel::Classic => {
                let df = index.document_frequency(field, term);
                let n = index.field_document_count(field);
                let len = index.field_length(doc_id, field).max(1) as f64;
                f64::from(tf).sqrt() * classic_idf(df, n) / len.sqrt()
            }
            ScoringModel::Bm25 { k1, b } => {
                let df = index.document_frequency(field, term);
                let n = index.field_document_count(field);
                let len = f64::from(index.field_length(doc_id, field));
                let avg = index.average_field_length(field);
                let length_ratio = if avg > 0.0 { len / avg } else { 1.0 };
                let tf = f64::from(tf);
                bm25_idf(df, n) * (tf * (k1 + 1.0)) / (tf + k1 * (1.0 - b + b * length_ratio))
            }
            ScoringModel::Boolean => 1.0,
        }
    }
}

/// `1 + ln(N / (df + 1))`. Positive whenever `df <= N`.
pub fn classic_idf(doc_freq: u32, doc_count: u32) -> f64 {
    1.0 + (f64::from(doc_count) / (f64::from(doc_freq) + 1.0)).ln()
}

/// `ln(1 + (N - df + 0.5) / (df + 0.5))`. Never negative.
pub fn bm25_idf(doc_freq: u32, doc_count: u32) -> f64 {
    let df = f64::from(doc_freq);
    let n = f64::from(doc_count);
    (1.0 + (n - df + 0.5) / (df + 0.5)).ln()
}

impl fmt::Display for ScoringModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ScoringModel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "classic" | "tfidf" | "tf-idf" => Ok(ScoringModel::Classic),
            "bm25" => Ok(ScoringModel::bm25()),
            "boolean" => Ok(ScoringModel::Boolean),
            other => Err(format!("unknown scoring model '{other}'")),
        }
    }
}
