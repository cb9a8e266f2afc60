//! Retrieval-and-evaluation engine for test collections such as Cranfield.
//!
//! Documents are analyzed into a multi-field inverted index, free-text queries are
//! expanded across fields and ranked under a scoring model, and the ranked lists are
//! scored against relevance judgments (MAP, GM-MAP, P@k).

pub mod config;
pub mod error;
pub mod eval;
pub mod index;
pub mod model;
pub mod persist;
pub mod query;
pub mod scoring;
pub mod search;
pub mod tokenizer;
pub mod trec;

pub use error::{EvaluationError, FormatError, IndexBuildError, PersistError, QuerySyntaxError};
pub use eval::{evaluate, Evaluation, MetricReport, QueryMetrics, Qrels};
pub use index::{FieldIndex, Index, Posting};
pub use model::{DocId, Document, Field, Query, QueryId, RelevanceJudgment};
pub use query::{MultiFieldQuery, QueryParser, QueryTerm};
pub use scoring::ScoringModel;
pub use search::{search, Hit, RankedResult, Run};
pub use tokenizer::{tokenize, Analyzer};
