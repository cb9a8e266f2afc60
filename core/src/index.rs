use crate::error::IndexBuildError;
use crate::model::{DocId, Document, Field};
use crate::tokenizer::Analyzer;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Posting {
    pub doc_id: DocId,
    pub tf: u32,
}

/// Term statistics for a single field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldIndex {
    pub postings: HashMap<String, Vec<Posting>>, // postings sorted by doc_id
    pub lengths: HashMap<DocId, u32>,
    /// Documents with at least one token in this field.
    pub doc_count: u32,
    pub total_terms: u64,
}

impl FieldIndex {
    fn average_length(&self) -> f64 {
        if self.doc_count == 0 {
            return 0.0;
        }
        self.total_terms as f64 / self.doc_count as f64
    }
}

/// In-memory inverted index over a fixed set of fields, built under one analyzer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Index {
    analyzer: Analyzer,
    fields: BTreeMap<Field, FieldIndex>,
    doc_ids: Vec<DocId>, // ascending
}

/// Per-document analysis output: for each field, its token count and term counts.
type DocTerms = Vec<(Field, u32, HashMap<String, u32>)>;

impl Index {
    /// Analyze every listed field of every document and accumulate postings.
    ///
    /// Documents are tokenized in parallel; the per-document maps are merged in
    /// ingestion order so the result does not depend on thread scheduling.
    pub fn build(documents: &[Document], fields: &[Field], analyzer: Analyzer) -> Result<Self, IndexBuildError> {
        if documents.is_empty() {
            return Err(IndexBuildError::Empty);
        }
        let mut seen: HashSet<DocId> = HashSet::with_capacity(documents.len());
        for doc in documents {
            if !seen.insert(doc.id) {
                return Err(IndexBuildError::DuplicateDocument(doc.id));
            }
        }

        let mut field_set: Vec<Field> = fields.to_vec();
        field_set.sort();
        field_set.dedup();

        let analyzed: Vec<(DocId, DocTerms)> = documents
            .par_iter()
            .map(|doc| (doc.id, analyze_document(doc, &field_set, analyzer)))
            .collect();

        let mut index_fields: BTreeMap<Field, FieldIndex> =
            field_set.iter().map(|f| (*f, FieldIndex::default())).collect();
        for (doc_id, per_field) in analyzed {
            for (field, length, counts) in per_field {
                let fi = index_fields.entry(field).or_default();
                fi.lengths.insert(doc_id, length);
                if length > 0 {
                    fi.doc_count += 1;
                    fi.total_terms += u64::from(length);
                }
                for (term, tf) in counts {
                    fi.postings.entry(term).or_default().push(Posting { doc_id, tf });
                }
            }
        }
        for fi in index_fields.values_mut() {
            for plist in fi.postings.values_mut() {
                plist.sort_by_key(|p| p.doc_id);
            }
        }

        let mut doc_ids: Vec<DocId> = documents.iter().map(|d| d.id).collect();
        doc_ids.sort_unstable();

        let index = Index { analyzer, fields: index_fields, doc_ids };
        tracing::info!(
            analyzer = %analyzer,
            num_docs = index.document_count(),
            num_terms = index.term_count(),
            "built inverted index"
        );
        Ok(index)
    }

    pub fn analyzer(&self) -> Analyzer { self.analyzer }

    pub fn fields(&self) -> impl Iterator<Item = Field> + '_ { self.fields.keys().copied() }

    pub fn field(&self, field: Field) -> Option<&FieldIndex> { self.fields.get(&field) }

    /// Postings for `(field, term)`, empty if the term never occurs.
    pub fn postings(&self, field: Field, term: &str) -> &[Posting] {
        self.fields
            .get(&field)
            .and_then(|fi| fi.postings.get(term))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn document_frequency(&self, field: Field, term: &str) -> u32 {
        self.postings(field, term).len() as u32
    }

    /// Occurrences of `term` in `field` of `doc_id`, 0 if absent.
    pub fn term_frequency(&self, field: Field, term: &str, doc_id: DocId) -> u32 {
        let plist = self.postings(field, term);
        match plist.binary_search_by_key(&doc_id, |p| p.doc_id) {
            Ok(pos) => plist[pos].tf,
            Err(_) => 0,
        }
    }

    /// Token count of `field` in `doc_id`.
    pub fn field_length(&self, doc_id: DocId, field: Field) -> u32 {
        self.fields
            .get(&field)
            .and_then(|fi| fi.lengths.get(&doc_id))
            .copied()
            .unwrap_or(0)
    }

    pub fn average_field_length(&self, field: Field) -> f64 {
        self.fields.get(&field).map(FieldIndex::average_length).unwrap_or(0.0)
    }

    /// Number of documents that have at least one token in `field`.
    pub fn field_document_count(&self, field: Field) -> u32 {
        self.fields.get(&field).map(|fi| fi.doc_count).unwrap_or(0)
    }

    pub fn document_count(&self) -> usize { self.doc_ids.len() }

    pub fn contains_document(&self, doc_id: DocId) -> bool {
        self.doc_ids.binary_search(&doc_id).is_ok()
    }

    /// Distinct (field, term) pairs.
    pub fn term_count(&self) -> usize {
        self.fields.values().map(|fi| fi.postings.len()).sum()
    }
}

fn analyze_document(doc: &Document, fields: &[Field], analyzer: Analyzer) -> DocTerms {
    fields
        .iter()
        .map(|&field| {
            let tokens = analyzer.tokenize(doc.field(field));
            let mut counts: HashMap<String, u32> = HashMap::new();
            for token in &tokens {
                *counts.entry(token.clone()).or_insert(0) += 1;
            }
            (field, tokens.len() as u32, counts)
        })
        .collect()
}
