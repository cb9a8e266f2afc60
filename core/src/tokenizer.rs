use lazy_static::lazy_static;
use regex::Regex;
use rust_stemmers::{Algorithm, Stemmer};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use unicode_normalization::UnicodeNormalization;

lazy_static! {
    static ref WORD: Regex = Regex::new(r"(?u)[\p{L}\p{N}]+(?:['’][\p{L}\p{N}]+)*").expect("valid regex");
    static ref STEMMER: Stemmer = Stemmer::create(Algorithm::English);
    // Classic English stop set used by Lucene-style analyzers.
    static ref STOPWORDS: HashSet<&'static str> = {
        let words: &[&str] = &[
            "a","an","and","are","as","at","be","but","by",
            "for","if","in","into","is","it",
            "no","not","of","on","or","such",
            "that","the","their","then","there","these","they","this","to",
            "was","will","with",
        ];
        words.iter().copied().collect()
    };
}

pub fn is_stopword(token: &str) -> bool { STOPWORDS.contains(token) }

/// Tokenization strategy. The same analyzer must be used at index and query time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Analyzer {
    /// Word-boundary split, NFKC, lowercase.
    Standard,
    /// Whitespace split only; case and punctuation preserved.
    Whitespace,
    /// Standard + possessive removal + stop words + Porter-style stemming.
    English,
    /// Standard + stop words.
    StopOnly,
}

impl Analyzer {
    pub const ALL: [Analyzer; 4] = [Analyzer::Standard, Analyzer::Whitespace, Analyzer::English, Analyzer::StopOnly];

    pub fn name(self) -> &'static str {
        match self {
            Analyzer::Standard => "Standard",
            Analyzer::Whitespace => "Whitespace",
            Analyzer::English => "English",
            Analyzer::StopOnly => "Stop",
        }
    }

    pub fn tokenize(self, text: &str) -> Vec<String> {
        match self {
            Analyzer::Whitespace => text.split_whitespace().map(str::to_string).collect(),
            Analyzer::Standard => standard_tokens(text),
            Analyzer::StopOnly => standard_tokens(text).into_iter().filter(|t| !is_stopword(t)).collect(),
            Analyzer::English => standard_tokens(text)
                .into_iter()
                .map(strip_possessive)
                .filter(|t| !t.is_empty() && !is_stopword(t))
                .map(|t| STEMMER.stem(&t).into_owned())
                .collect(),
        }
    }
}

impl fmt::Display for Analyzer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Analyzer {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "standard" => Ok(Analyzer::Standard),
            "whitespace" => Ok(Analyzer::Whitespace),
            "english" => Ok(Analyzer::English),
            "stop" | "stoponly" => Ok(Analyzer::StopOnly),
            other => Err(format!("unknown analyzer '{other}'")),
        }
    }
}

/// Tokenize `text` under `analyzer`. Pure function of its inputs.
pub fn tokenize(text: &str, analyzer: Analyzer) -> Vec<String> {
    analyzer.tokenize(text)
}

fn standard_tokens(text: &str) -> Vec<String> {
    let normalized = text.nfkc().collect::<String>().to_lowercase();
    WORD.find_iter(&normalized).map(|m| m.as_str().to_string()).collect()
}

fn strip_possessive(token: String) -> String {
    for suffix in ["'s", "’s"] {
        if let Some(stripped) = token.strip_suffix(suffix) {
            return stripped.to_string();
        }
    }
    token
}
