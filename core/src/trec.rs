//! Line formats shared with trec_eval.
//!
//! Run file: `queryId 0 documentId rank score 0` (rank 0-based, ids 1-based).
//! Ground truth: `queryId 0 documentId relevance`.
//!
//! Scores are written with Rust's shortest round-trip float formatting, so parsing a
//! written run recovers the exact scores.

use crate::error::FormatError;
use crate::eval::Qrels;
use crate::model::{DocId, QueryId, RelevanceJudgment};
use crate::search::{Hit, RankedResult, Run};
use std::collections::HashSet;
use std::io::{self, Write};
use std::str::FromStr;

pub fn write_ranked<W: Write>(w: &mut W, query_id: QueryId, result: &RankedResult) -> io::Result<()> {
    for hit in &result.hits {
        writeln!(w, "{} 0 {} {} {} 0", query_id, hit.doc_id, hit.rank, hit.score)?;
    }
    Ok(())
}

/// Write one block per query, in ascending query id order.
pub fn write_run<W: Write>(w: &mut W, run: &Run) -> io::Result<()> {
    for (&query_id, result) in run {
        write_ranked(w, query_id, result)?;
    }
    Ok(())
}

pub fn write_qrels<W: Write>(w: &mut W, qrels: &Qrels) -> io::Result<()> {
    for j in qrels.judgments() {
        writeln!(w, "{} 0 {} {}", j.query_id, j.doc_id, j.relevance)?;
    }
    Ok(())
}

/// Parse a run file. Hits of each query are ordered by their rank column.
///
/// A document may appear at most once per query.
pub fn parse_run(text: &str) -> Result<Run, FormatError> {
    let mut run = Run::new();
    let mut seen: HashSet<(QueryId, DocId)> = HashSet::new();
    for (line_no, line) in numbered_lines(text) {
        let cols: Vec<&str> = line.split_whitespace().collect();
        if cols.len() < 5 {
            return Err(FormatError { line: line_no, reason: format!("expected at least 5 columns, found {}", cols.len()) });
        }
        let query_id: QueryId = column(&cols, 0, line_no, "query id")?;
        let doc_id: DocId = column(&cols, 2, line_no, "document id")?;
        let rank: usize = column(&cols, 3, line_no, "rank")?;
        let score: f64 = column(&cols, 4, line_no, "score")?;
        if !seen.insert((query_id, doc_id)) {
            return Err(FormatError {
                line: line_no,
                reason: format!("document {doc_id} listed more than once for query {query_id}"),
            });
        }
        run.entry(query_id).or_default().hits.push(Hit { doc_id, score, rank });
    }
    for result in run.values_mut() {
        result.hits.sort_by_key(|h| h.rank);
    }
    Ok(run)
}

pub fn parse_qrels(text: &str) -> Result<Vec<RelevanceJudgment>, FormatError> {
    let mut judgments = Vec::new();
    for (line_no, line) in numbered_lines(text) {
        let cols: Vec<&str> = line.split_whitespace().collect();
        if cols.len() != 4 {
            return Err(FormatError { line: line_no, reason: format!("expected 4 columns, found {}", cols.len()) });
        }
        judgments.push(RelevanceJudgment {
            query_id: column(&cols, 0, line_no, "query id")?,
            doc_id: column(&cols, 2, line_no, "document id")?,
            relevance: column(&cols, 3, line_no, "relevance")?,
        });
    }
    Ok(judgments)
}

fn numbered_lines(text: &str) -> impl Iterator<Item = (usize, &str)> {
    text.lines()
        .enumerate()
        .map(|(i, l)| (i + 1, l.trim()))
        .filter(|(_, l)| !l.is_empty())
}

fn column<T: FromStr>(cols: &[&str], idx: usize, line: usize, what: &str) -> Result<T, FormatError> {
    cols[idx]
        .parse()
        .map_err(|_| FormatError { line, reason: format!("invalid {what} '{}'", cols[idx]) })
}
