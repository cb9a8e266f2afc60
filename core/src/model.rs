use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 1-based document number, assigned by ingestion order.
pub type DocId = u32;
/// 1-based query number, equal to the query's position in the query set.
pub type QueryId = u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Text,
    Title,
    Author,
    Journal,
}

impl Field {
    pub const ALL: [Field; 4] = [Field::Text, Field::Title, Field::Author, Field::Journal];

    pub fn as_str(self) -> &'static str {
        match self {
            Field::Text => "text",
            Field::Title => "title",
            Field::Author => "author",
            Field::Journal => "journal",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Field {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(Field::Text),
            "title" => Ok(Field::Title),
            "author" => Ok(Field::Author),
            "journal" => Ok(Field::Journal),
            other => Err(format!("unknown field '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: DocId,
    pub title: String,
    pub author: String,
    pub journal: String,
    pub text: String,
}

impl Document {
    pub fn field(&self, field: Field) -> &str {
        match field {
            Field::Text => &self.text,
            Field::Title => &self.title,
            Field::Author => &self.author,
            Field::Journal => &self.journal,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Query {
    pub id: QueryId,
    pub text: String,
}

/// Ground-truth judgment. Any `relevance > 0` counts as relevant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelevanceJudgment {
    pub query_id: QueryId,
    pub doc_id: DocId,
    pub relevance: i32,
}

impl RelevanceJudgment {
    pub fn is_relevant(&self) -> bool {
        self.relevance > 0
    }
}
