//! Reader for the Cranfield collection files.
//!
//! `cran.all.1400` and `cran.qry` are sequences of records opened by `.I <n>` and
//! split into sections by `.T` (title), `.A` (author), `.B` (bibliography, used as
//! the journal field) and `.W` (text). The number after `.I` is ignored: documents
//! and queries are renumbered 1..n in file order, which is also the numbering used
//! by `cranqrel`.

use anyhow::{bail, Context, Result};
use irbench_core::{Document, Query, RelevanceJudgment};
use std::fs;
use std::path::Path;

pub const DOCUMENTS_FILE: &str = "cran.all.1400";
pub const QUERIES_FILE: &str = "cran.qry";
pub const QRELS_FILE: &str = "cranqrel";

#[derive(Debug, Clone, Default)]
pub struct Collection {
    pub documents: Vec<Document>,
    pub queries: Vec<Query>,
    pub judgments: Vec<RelevanceJudgment>,
}

/// Load the three collection files from `dir`.
pub fn load_collection(dir: &Path) -> Result<Collection> {
    let read = |name: &str| {
        let path = dir.join(name);
        fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))
    };
    let documents = parse_documents(&read(DOCUMENTS_FILE)?).context("parsing documents")?;
    let queries = parse_queries(&read(QUERIES_FILE)?).context("parsing queries")?;
    let judgments = parse_judgments(&read(QRELS_FILE)?).context("parsing relevance judgments")?;
    tracing::info!(
        num_docs = documents.len(),
        num_queries = queries.len(),
        num_judgments = judgments.len(),
        "loaded collection"
    );
    Ok(Collection { documents, queries, judgments })
}

#[derive(Default)]
struct Record {
    title: String,
    author: String,
    journal: String,
    text: String,
}

#[derive(Clone, Copy)]
enum Section {
    Title,
    Author,
    Journal,
    Text,
}

fn parse_records(input: &str) -> Result<Vec<Record>> {
    let mut records: Vec<Record> = Vec::new();
    let mut section: Option<Section> = None;
    for (i, line) in input.lines().enumerate() {
        if line.split_whitespace().next() == Some(".I") {
            records.push(Record::default());
            section = None;
            continue;
        }
        let marker = match line.trim_end() {
            ".T" => Some(Section::Title),
            ".A" => Some(Section::Author),
            ".B" => Some(Section::Journal),
            ".W" => Some(Section::Text),
            _ => None,
        };
        if marker.is_some() {
            if records.is_empty() {
                bail!("line {}: section marker before the first .I record", i + 1);
            }
            section = marker;
            continue;
        }
        let (Some(record), Some(section)) = (records.last_mut(), section) else {
            if line.trim().is_empty() {
                continue;
            }
            bail!("line {}: text outside of a record section", i + 1);
        };
        let target = match section {
            Section::Title => &mut record.title,
            Section::Author => &mut record.author,
            Section::Journal => &mut record.journal,
            Section::Text => &mut record.text,
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if !target.is_empty() {
            target.push(' ');
        }
        target.push_str(line);
    }
    Ok(records)
}

pub fn parse_documents(input: &str) -> Result<Vec<Document>> {
    Ok(parse_records(input)?
        .into_iter()
        .enumerate()
        .map(|(i, r)| Document {
            id: i as u32 + 1,
            title: r.title,
            author: r.author,
            journal: r.journal,
            text: r.text,
        })
        .collect())
}

pub fn parse_queries(input: &str) -> Result<Vec<Query>> {
    Ok(parse_records(input)?
        .into_iter()
        .enumerate()
        .map(|(i, r)| Query { id: i as u32 + 1, text: r.text })
        .collect())
}

/// Parse `cranqrel` lines `query doc grade`.
///
/// Grades 1 (complete answer) through 4 (minimum interest) are relevant and map to
/// trec relevance `5 - grade`; grade 5 and -1 (no relevance) map to 0.
pub fn parse_judgments(input: &str) -> Result<Vec<RelevanceJudgment>> {
    let mut judgments = Vec::new();
    for (i, line) in input.lines().enumerate() {
        let cols: Vec<&str> = line.split_whitespace().collect();
        if cols.is_empty() {
            continue;
        }
        if cols.len() < 3 {
            bail!("line {}: expected 'query doc grade', got '{}'", i + 1, line.trim());
        }
        let query_id = cols[0].parse().with_context(|| format!("line {}: query id", i + 1))?;
        let doc_id = cols[1].parse().with_context(|| format!("line {}: document id", i + 1))?;
        let grade: i32 = cols[2].parse().with_context(|| format!("line {}: grade", i + 1))?;
        judgments.push(RelevanceJudgment { query_id, doc_id, relevance: grade_to_relevance(grade) });
    }
    Ok(judgments)
}

pub fn grade_to_relevance(grade: i32) -> i32 {
    if (1..=4).contains(&grade) {
        5 - grade
    } else {
        0
    }
}

/// Collapse graded judgments to 1/0.
pub fn boolean_judgments(judgments: &[RelevanceJudgment]) -> Vec<RelevanceJudgment> {
    judgments
        .iter()
        .map(|j| RelevanceJudgment { relevance: i32::from(j.is_relevant()), ..*j })
        .collect()
}
