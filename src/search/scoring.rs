//! Relevance scoring and result ordering.
//!
//! A candidate's score is the sum over query tokens of
//! `(title_weight × title_tf + text_weight × text_tf) × idf(token)`, with
//! `idf = ln(idf_smoothing + total_docs / docs_containing_token)` and a
//! default smoothing of 1.

use crate::config::RankingConfig;
use crate::store::{Category, DocId};
use std::cmp::Ordering;

use super::index::Posting;

/// Inverse document frequency. Rare tokens weigh more than common ones.
///
/// Returns 0.0 for a token that occurs in no document.
pub fn idf(total_docs: usize, doc_freq: usize, smoothing: f64) -> f64 {
    if doc_freq == 0 {
        return 0.0;
    }
    (smoothing + total_docs as f64 / doc_freq as f64).ln()
}

/// Per-field multipliers applied to term frequency, plus the idf damping term.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldWeights {
    pub title: f64,
    pub text: f64,
    pub idf_smoothing: f64,
}

impl Default for FieldWeights {
    fn default() -> Self {
        Self::from(&RankingConfig::default())
    }
}

impl From<&RankingConfig> for FieldWeights {
    fn from(config: &RankingConfig) -> Self {
        Self {
            title: config.title_weight,
            text: config.text_weight,
            idf_smoothing: config.idf_smoothing,
        }
    }
}

impl FieldWeights {
    /// Field-weighted term frequency of one posting.
    pub fn weighted_tf(&self, posting: &Posting) -> f64 {
        self.title * f64::from(posting.title_tf) + self.text * f64::from(posting.text_tf)
    }

    /// Inverse document frequency under these settings.
    pub fn idf(&self, total_docs: usize, doc_freq: usize) -> f64 {
        idf(total_docs, doc_freq, self.idf_smoothing)
    }
}

/// Ranking order: higher score first, then whole pages before sections,
/// then earlier entries first.
pub fn rank_order(
    (a_score, a_category, a_id): (f64, Category, DocId),
    (b_score, b_category, b_id): (f64, Category, DocId),
) -> Ordering {
    b_score
        .total_cmp(&a_score)
        .then_with(|| category_rank(a_category).cmp(&category_rank(b_category)))
        .then_with(|| a_id.cmp(&b_id))
}

const fn category_rank(category: Category) -> u8 {
    match category {
        Category::Page => 0,
        Category::Section => 1,
    }
}
