//! Free-text query parsing.
//!
//! Raw query text is escaped first, so characters such as `(`, `:` or `"` are always
//! literal, then analyzed into terms and expanded into one OR-clause per
//! (field, term) pair.

use crate::config::SEARCH_FIELDS;
use crate::error::QuerySyntaxError;
use crate::model::Field;
use crate::tokenizer::Analyzer;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Characters with structural meaning in query syntax.
pub const METACHARS: &[char] = &[
    '\\', '+', '-', '!', '(', ')', ':', '^', '[', ']', '"', '{', '}', '~', '*', '?', '|', '&', '/',
];

fn is_metachar(c: char) -> bool { METACHARS.contains(&c) }

/// Backslash-escape every query metacharacter in `raw`.
pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        if is_metachar(c) {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Resolve escapes in already-escaped query text, yielding the literal text.
///
/// Only bag-of-words queries are supported, so an unescaped operator is an error.
pub fn unescape(escaped: &str) -> Result<String, QuerySyntaxError> {
    let mut out = String::with_capacity(escaped.len());
    let mut chars = escaped.char_indices();
    while let Some((offset, c)) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some((_, next)) => out.push(next),
                None => return Err(QuerySyntaxError::TrailingEscape),
            },
            c if is_metachar(c) => return Err(QuerySyntaxError::UnescapedMetachar { ch: c, offset }),
            c => out.push(c),
        }
    }
    Ok(out)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryTerm {
    pub field: Field,
    pub term: String,
    pub boost: f64,
}

/// Disjunction of (field, term) clauses. Each pair appears at most once.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MultiFieldQuery {
    terms: Vec<QueryTerm>,
}

impl MultiFieldQuery {
    /// Build a query from clauses, keeping the first occurrence of each (field, term).
    pub fn from_terms<I: IntoIterator<Item = QueryTerm>>(terms: I) -> Self {
        let mut seen: HashSet<(Field, String)> = HashSet::new();
        let terms = terms
            .into_iter()
            .filter(|t| seen.insert((t.field, t.term.clone())))
            .collect();
        Self { terms }
    }

    pub fn terms(&self) -> &[QueryTerm] { &self.terms }

    pub fn is_empty(&self) -> bool { self.terms.is_empty() }

    pub fn len(&self) -> usize { self.terms.len() }
}

/// Expands analyzed query text across a fixed set of fields.
#[derive(Debug, Clone)]
pub struct QueryParser {
    analyzer: Analyzer,
    fields: Vec<Field>,
    boosts: HashMap<Field, f64>,
}

impl QueryParser {
    pub fn new(analyzer: Analyzer) -> Self {
        Self { analyzer, fields: SEARCH_FIELDS.to_vec(), boosts: HashMap::new() }
    }

    pub fn with_fields(mut self, fields: &[Field]) -> Self {
        self.fields = fields.to_vec();
        self
    }

    pub fn with_boost(mut self, field: Field, boost: f64) -> Self {
        self.boosts.insert(field, boost);
        self
    }

    /// Escape `raw`, then parse it. Never interprets user text as operators.
    pub fn parse(&self, raw: &str) -> Result<MultiFieldQuery, QuerySyntaxError> {
        self.parse_escaped(&escape(raw))
    }

    /// Parse text whose metacharacters are already escaped.
    pub fn parse_escaped(&self, escaped: &str) -> Result<MultiFieldQuery, QuerySyntaxError> {
        let literal = unescape(escaped)?;
        let tokens = self.analyzer.tokenize(&literal);
        let clauses = tokens.iter().flat_map(|term| {
            self.fields.iter().map(move |&field| QueryTerm {
                field,
                term: term.clone(),
                boost: self.boosts.get(&field).copied().unwrap_or(1.0),
            })
        });
        Ok(MultiFieldQuery::from_terms(clauses))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_then_unescape_is_identity() {
        let raw = r#"what is "mach" (number): a+b/c? \ done"#;
        assert_eq!(unescape(&escape(raw)).unwrap(), raw);
    }

    #[test]
    fn unescaped_operators_are_rejected() {
        assert_eq!(unescape("flow (wing"), Err(QuerySyntaxError::UnescapedMetachar { ch: '(', offset: 5 }));
        assert_eq!(unescape("flow\\"), Err(QuerySyntaxError::TrailingEscape));
    }

    #[test]
    fn expands_each_term_over_all_fields() {
        let q = QueryParser::new(Analyzer::Standard).parse("Wing flow").unwrap();
        assert_eq!(q.len(), 8);
        assert_eq!(q.terms()[0], QueryTerm { field: Field::Text, term: "wing".into(), boost: 1.0 });
        assert_eq!(q.terms()[3].field, Field::Journal);
        assert_eq!(q.terms()[4].term, "flow");
    }

    #[test]
    fn repeated_terms_collapse_into_one_clause() {
        let q = QueryParser::new(Analyzer::Standard).with_fields(&[Field::Text]).parse("wing WING wing").unwrap();
        assert_eq!(q.len(), 1);
    }

    #[test]
    fn metacharacters_are_literal_text() {
        let q = QueryParser::new(Analyzer::Standard).with_fields(&[Field::Title]).parse("(shock) AND wave:*").unwrap();
        let terms: Vec<&str> = q.terms().iter().map(|t| t.term.as_str()).collect();
        assert_eq!(terms, vec!["shock", "and", "wave"]);
    }

    #[test]
    fn boosts_apply_per_field() {
        let q = QueryParser::new(Analyzer::Standard).with_boost(Field::Title, 2.0).parse("wing").unwrap();
        let title = q.terms().iter().find(|t| t.field == Field::Title).unwrap();
        assert_eq!(title.boost, 2.0);
    }

    #[test]
    fn empty_text_gives_empty_query() {
        assert!(QueryParser::new(Analyzer::English).parse("  the  ").unwrap().is_empty());
    }
}
