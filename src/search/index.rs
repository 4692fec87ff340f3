//! Inverted index construction and the assembled, queryable search index.

use crate::config::SearchConfig;
use crate::error::SearchError;
use crate::store::{DocId, DocumentStore};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::tokenize::Tokenizer;

/// Map from token to its postings, sorted by document id.
type TermMap = HashMap<String, Vec<Posting>, ahash::RandomState>;

/// Which part of an entry a token occurrence came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Title,
    Text,
}

/// Occurrences of one token in one entry, split by field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Posting {
    pub doc: DocId,
    pub title_tf: u32,
    pub text_tf: u32,
}

impl Posting {
    const fn new(doc: DocId) -> Self {
        Self {
            doc,
            title_tf: 0,
            text_tf: 0,
        }
    }

    fn bump(&mut self, field: Field) {
        match field {
            Field::Title => self.title_tf += 1,
            Field::Text => self.text_tf += 1,
        }
    }

    /// Total occurrences across both fields.
    pub const fn term_frequency(&self) -> u32 {
        self.title_tf + self.text_tf
    }
}

/// Token → postings mapping over a [`DocumentStore`]. Read-only once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvertedIndex {
    terms: TermMap,
    document_count: usize,
}

impl InvertedIndex {
    /// Tokenizes every entry's title and text and accumulates term frequencies.
    ///
    /// Building twice from the same store and tokenizer yields equal indices.
    pub fn build(store: &DocumentStore, tokenizer: &Tokenizer) -> Result<Self, SearchError> {
        if store.is_empty() {
            return Err(SearchError::EmptyCorpus);
        }

        let start = std::time::Instant::now();
        let mut builder = TermBuilder::new(tokenizer);
        for (doc, entry) in store.iter() {
            builder.add_terms(&entry.title, doc, Field::Title);
            builder.add_terms(&entry.text, doc, Field::Text);
        }
        let index = builder.finalize(store.len());

        tracing::info!(
            "Built search index: {} unique terms, {} documents, {} postings in {:?}",
            index.term_count(),
            index.document_count(),
            index.posting_count(),
            start.elapsed()
        );

        Ok(index)
    }

    /// Postings for a token, or an empty slice when the token is not indexed.
    pub fn postings(&self, token: &str) -> &[Posting] {
        self.terms.get(token).map(Vec::as_slice).unwrap_or_default()
    }

    /// Number of entries containing the token in either field.
    pub fn document_frequency(&self, token: &str) -> usize {
        self.postings(token).len()
    }

    /// All indexed tokens, in no particular order.
    pub fn vocabulary(&self) -> impl Iterator<Item = &str> {
        self.terms.keys().map(String::as_str)
    }

    /// Get the number of unique terms in the index
    pub fn term_count(&self) -> usize {
        self.terms.len()
    }

    /// Get the number of documents in the index
    pub fn document_count(&self) -> usize {
        self.document_count
    }

    /// Get the number of (term, document) pairs in the index
    pub fn posting_count(&self) -> usize {
        self.terms.values().map(Vec::len).sum()
    }
}

/// Accumulates per-entry term frequencies before producing an [`InvertedIndex`].
struct TermBuilder<'t> {
    tokenizer: &'t Tokenizer,
    terms: TermMap,
}

impl<'t> TermBuilder<'t> {
    fn new(tokenizer: &'t Tokenizer) -> Self {
        Self {
            tokenizer,
            terms: TermMap::default(),
        }
    }

    /// Adds every token of `text` to `doc`'s postings under `field`.
    ///
    /// Entries must be added in increasing id order so each posting list stays sorted.
    fn add_terms(&mut self, text: &str, doc: DocId, field: Field) {
        for token in self.tokenizer.tokenize(text) {
            let postings = self.terms.entry(token).or_default();
            match postings.last_mut() {
                Some(posting) if posting.doc == doc => posting.bump(field),
                _ => {
                    let mut posting = Posting::new(doc);
                    posting.bump(field);
                    postings.push(posting);
                }
            }
        }
    }

    fn finalize(self, document_count: usize) -> InvertedIndex {
        InvertedIndex {
            terms: self.terms,
            document_count,
        }
    }
}

/// Size figures for an assembled index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IndexStats {
    pub documents: usize,
    pub terms: usize,
    pub postings: usize,
}

/// A document store together with its inverted index and the settings used to build it.
///
/// This is the value handed to the query engine; it is immutable and can be
/// shared between threads behind an `Arc`.
#[derive(Debug, Clone)]
pub struct SearchIndex {
    store: DocumentStore,
    terms: InvertedIndex,
    tokenizer: Tokenizer,
    config: SearchConfig,
}

impl SearchIndex {
    /// Builds the inverted index for `store`.
    ///
    /// `config` is validated first, so settings assembled in code get the same
    /// checks as a configuration file.
    pub fn build(store: DocumentStore, config: SearchConfig) -> Result<Self, SearchError> {
        config.validate()?;
        let tokenizer = Tokenizer::new(&config.tokenizer);
        let terms = InvertedIndex::build(&store, &tokenizer)?;
        Ok(Self {
            store,
            terms,
            tokenizer,
            config,
        })
    }

    /// Assembles an index from a previously built [`InvertedIndex`].
    ///
    /// The caller guarantees `terms` was built from `store` with `config.tokenizer`.
    pub fn from_parts(
        store: DocumentStore,
        terms: InvertedIndex,
        config: SearchConfig,
    ) -> Result<Self, SearchError> {
        config.validate()?;
        if store.is_empty() {
            return Err(SearchError::EmptyCorpus);
        }
        if terms.document_count() != store.len() {
            return Err(SearchError::InvalidArgument(format!(
                "inverted index covers {} documents but the store holds {}",
                terms.document_count(),
                store.len()
            )));
        }
        let tokenizer = Tokenizer::new(&config.tokenizer);
        Ok(Self {
            store,
            terms,
            tokenizer,
            config,
        })
    }

    pub fn store(&self) -> &DocumentStore {
        &self.store
    }

    pub fn terms(&self) -> &InvertedIndex {
        &self.terms
    }

    pub fn tokenizer(&self) -> &Tokenizer {
        &self.tokenizer
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn stats(&self) -> IndexStats {
        IndexStats {
            documents: self.terms.document_count(),
            terms: self.terms.term_count(),
            postings: self.terms.posting_count(),
        }
    }
}
