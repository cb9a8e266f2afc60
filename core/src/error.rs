use crate::model::{DocId, QueryId};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum IndexBuildError {
    #[error("cannot build an index from an empty document collection")]
    Empty,
    #[error("document id {0} appears more than once")]
    DuplicateDocument(DocId),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum QuerySyntaxError {
    #[error("query ends with a dangling escape character")]
    TrailingEscape,
    #[error("unescaped query operator '{ch}' at byte {offset}")]
    UnescapedMetachar { ch: char, offset: usize },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EvaluationError {
    #[error("judgment for query {query_id} references unknown document {doc_id}")]
    UnknownDocument { query_id: QueryId, doc_id: DocId },
    #[error("judgment references unknown query {0}")]
    UnknownQuery(QueryId),
}

/// A malformed line in a run file or ground-truth file.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("line {line}: {reason}")]
pub struct FormatError {
    pub line: usize,
    pub reason: String,
}

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("index encoding error: {0}")]
    Encoding(#[from] bincode::Error),
    #[error("metadata error: {0}")]
    Meta(#[from] serde_json::Error),
    #[error("snapshot version {found} is not supported (expected {expected})")]
    Version { found: u32, expected: u32 },
}
