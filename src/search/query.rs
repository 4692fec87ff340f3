//! Query evaluation: candidate generation, scoring and ranking.

use crate::error::SearchError;
use crate::store::{DocId, DocumentEntry, DocumentStore};
use ahash::AHashMap;
use rapidfuzz::distance::jaro_winkler;

use super::index::{InvertedIndex, SearchIndex};
use super::scoring::{FieldWeights, rank_order};
use super::snippet::{DisplayResult, format_results};
use super::tokenize::Tokenizer;

/// Minimum Jaro-Winkler similarity for a vocabulary term to be suggested.
const SUGGESTION_THRESHOLD: f64 = 0.85;

/// A tokenized user query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    /// The text as typed.
    pub text: String,
    /// Distinct tokens in order of first appearance.
    pub tokens: Vec<String>,
}

impl Query {
    /// Tokenizes `text` with the same rules used at indexing time.
    ///
    /// Repeated tokens are kept once so that typing a word twice does not double its weight.
    pub fn parse(text: &str, tokenizer: &Tokenizer) -> Self {
        let mut tokens = tokenizer.tokenize(text);
        let mut seen = ahash::AHashSet::with_capacity(tokens.len());
        tokens.retain(|token| seen.insert(token.clone()));
        Self {
            text: text.to_string(),
            tokens,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

/// One ranked hit.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredResult<'a> {
    pub id: DocId,
    pub entry: &'a DocumentEntry,
    pub score: f64,
}

/// Ranked hits for a query, best first.
#[derive(Debug, Clone)]
pub struct SearchResults<'a> {
    pub query: Query,
    pub hits: Vec<ScoredResult<'a>>,
}

impl SearchResults<'_> {
    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }

    pub fn len(&self) -> usize {
        self.hits.len()
    }
}

/// Scores every document matching at least one query token and keeps the best `limit`.
///
/// Candidates are the union of the tokens' postings. This function never fails:
/// an empty query or one matching nothing yields no hits.
pub fn evaluate<'a>(
    query: &Query,
    store: &'a DocumentStore,
    terms: &InvertedIndex,
    weights: FieldWeights,
    limit: usize,
) -> Vec<ScoredResult<'a>> {
    let total_docs = terms.document_count();
    let mut combined_scores: AHashMap<DocId, f64> = AHashMap::new();

    for token in &query.tokens {
        let postings = terms.postings(token);
        if postings.is_empty() {
            continue;
        }
        let token_idf = weights.idf(total_docs, postings.len());
        for posting in postings {
            *combined_scores.entry(posting.doc).or_insert(0.0) += weights.weighted_tf(posting) * token_idf;
        }
    }

    let mut hits: Vec<_> = combined_scores
        .into_iter()
        .filter_map(|(id, score)| store.get(id).map(|entry| ScoredResult { id, entry, score }))
        .collect();

    hits.sort_by(|a, b| {
        rank_order(
            (a.score, a.entry.category, a.id),
            (b.score, b.entry.category, b.id),
        )
    });
    hits.truncate(limit);
    hits
}

impl SearchIndex {
    /// Searches the index and returns at most `limit` ranked hits.
    ///
    /// `limit` must be positive; zero is rejected before any work is done.
    pub fn search(&self, query: &str, limit: usize) -> Result<SearchResults<'_>, SearchError> {
        if limit == 0 {
            return Err(SearchError::InvalidArgument(
                "limit must be a positive integer".to_string(),
            ));
        }

        let query = Query::parse(query, self.tokenizer());
        if query.is_empty() {
            return Ok(SearchResults { query, hits: vec![] });
        }

        let weights = FieldWeights::from(&self.config().ranking);
        let hits = evaluate(&query, self.store(), self.terms(), weights, limit);
        tracing::debug!(
            "Query {:?} ({} tokens) matched {} results",
            query.text,
            query.tokens.len(),
            hits.len()
        );
        Ok(SearchResults { query, hits })
    }

    /// Searches and formats in one step, using the configured default limit when none is given.
    pub fn query(
        &self,
        query: &str,
        limit: Option<usize>,
    ) -> Result<Vec<DisplayResult>, SearchError> {
        let limit = limit.unwrap_or(self.config().ranking.default_limit);
        let results = self.search(query, limit)?;
        Ok(self.format(&results))
    }

    /// Maps ranked hits to display records with snippets.
    pub fn format(&self, results: &SearchResults<'_>) -> Vec<DisplayResult> {
        format_results(results, self.tokenizer(), &self.config().snippet)
    }

    /// Indexed terms resembling the query's tokens, most similar first.
    ///
    /// Used to offer "did you mean" alternatives when a query matches nothing.
    pub fn suggest(&self, query: &str, limit: usize) -> Vec<String> {
        let query = Query::parse(query, self.tokenizer());
        let mut suggestions: Vec<(String, f64)> = vec![];

        for term in self.terms().vocabulary() {
            let best = query
                .tokens
                .iter()
                .filter(|token| token.as_str() != term)
                .map(|token| jaro_winkler::similarity(token.chars(), term.chars()))
                .fold(0.0f64, f64::max);
            if best >= SUGGESTION_THRESHOLD {
                suggestions.push((term.to_string(), best));
            }
        }

        suggestions.sort_by(|(a_term, a), (b_term, b)| b.total_cmp(a).then_with(|| a_term.cmp(b_term)));
        suggestions
            .into_iter()
            .take(limit)
            .map(|(term, _)| term)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SearchConfig;
    use crate::store::{Category, RawEntry};
    use assert2::{check, let_assert};
    use rstest::{fixture, rstest};

    fn entry(location: &str, title: &str, text: &str, category: &str) -> RawEntry {
        RawEntry {
            location: Some(location.to_string()),
            page: Some("Home".to_string()),
            title: Some(title.to_string()),
            text: Some(text.to_string()),
            category: Some(category.to_string()),
        }
    }

    #[fixture]
    fn index() -> SearchIndex {
        let store = DocumentStore::load(vec![
            entry("#a", "Entities", "Documentation for Entities.", "page"),
            entry(
                "#b",
                "ComponentStorage",
                "Contiguous storage of components keyed by entity.",
                "section",
            ),
        ])
        .unwrap();
        SearchIndex::build(store, SearchConfig::default()).unwrap()
    }

    fn locations(results: &SearchResults<'_>) -> Vec<String> {
        results.hits.iter().map(|h| h.entry.location.clone()).collect()
    }

    #[test]
    fn test_query_parse_dedups_tokens() {
        let query = Query::parse("storage Storage entity storage", &Tokenizer::default());
        check!(query.tokens == ["storage", "entity"]);
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case("the of and")]
    fn test_empty_queries_return_nothing(index: SearchIndex, #[case] query: &str) {
        let results = index.search(query, 10).unwrap();
        check!(results.is_empty());
    }

    #[rstest]
    fn test_unknown_tokens_return_nothing(index: SearchIndex) {
        check!(index.search("zebra quux", 10).unwrap().is_empty());
    }

    #[rstest]
    fn test_zero_limit_rejected(index: SearchIndex) {
        let_assert!(Err(SearchError::InvalidArgument(message)) = index.search("storage", 0));
        check!(message.contains("limit"));
    }

    #[rstest]
    fn test_exact_token_matching(index: SearchIndex) {
        let results = index.search("entities", 10).unwrap();
        check!(locations(&results) == ["#a"]);
    }

    #[rstest]
    fn test_title_and_text_match_ranks_first(index: SearchIndex) {
        let results = index.search("storage", 10).unwrap();
        check!(locations(&results) == ["#b"]);
    }

    #[rstest]
    fn test_limit_truncates(index: SearchIndex) {
        let results = index.search("components entities", 1).unwrap();
        check!(results.len() == 1);
    }

    #[rstest]
    fn test_or_semantics(index: SearchIndex) {
        let results = index.search("entities storage", 10).unwrap();
        let mut found = locations(&results);
        found.sort();
        check!(found == ["#a", "#b"]);
    }

    #[rstest]
    fn test_score_formula(index: SearchIndex) {
        // "storage": title 1 + text 1 in #b, df = 1 of 2 docs
        let results = index.search("storage", 10).unwrap();
        let expected = (3.0 * 1.0 + 1.0 * 1.0) * (1.0f64 + 2.0 / 1.0).ln();
        check!((results.hits[0].score - expected).abs() < 1e-12);
    }

    #[rstest]
    fn test_score_formula_uses_idf_smoothing(index: SearchIndex) {
        let mut config = SearchConfig::default();
        config.ranking.idf_smoothing = 2.0;
        let smoothed = SearchIndex::build(index.store().clone(), config).unwrap();

        let results = smoothed.search("storage", 10).unwrap();
        let expected = (3.0 * 1.0 + 1.0 * 1.0) * (2.0f64 + 2.0 / 1.0).ln();
        check!((results.hits[0].score - expected).abs() < 1e-12);
    }

    #[test]
    fn test_title_weighted_above_text() {
        let store = DocumentStore::load(vec![
            entry("#text", "Other", "widget", "section"),
            entry("#title", "Widget", "other", "section"),
        ])
        .unwrap();
        let index = SearchIndex::build(store, SearchConfig::default()).unwrap();
        let results = index.search("widget", 10).unwrap();
        check!(locations(&results) == ["#title", "#text"]);
    }

    #[test]
    fn test_tie_break_prefers_pages_then_insertion_order() {
        let store = DocumentStore::load(vec![
            entry("#s1", "", "widget", "section"),
            entry("#p1", "", "widget", "page"),
            entry("#s2", "", "widget", "section"),
            entry("#p2", "", "widget", "page"),
        ])
        .unwrap();
        let index = SearchIndex::build(store, SearchConfig::default()).unwrap();
        let results = index.search("widget", 10).unwrap();
        check!(locations(&results) == ["#p1", "#p2", "#s1", "#s2"]);
        check!(results.hits[0].entry.category == Category::Page);
    }

    #[test]
    fn test_rare_terms_outrank_common_terms() {
        let store = DocumentStore::load(vec![
            entry("#a", "", "common rare", "section"),
            entry("#b", "", "common common", "section"),
            entry("#c", "", "common", "section"),
        ])
        .unwrap();
        let index = SearchIndex::build(store, SearchConfig::default()).unwrap();
        let results = index.search("common rare", 10).unwrap();
        check!(locations(&results)[0] == "#a");
    }

    #[rstest]
    fn test_query_formats_with_default_limit(index: SearchIndex) {
        let display = index.query("components", None).unwrap();
        check!(display.len() == 1);
        check!(display[0].location == "#b");
        check!(display[0].snippet.contains("components"));
    }

    #[rstest]
    fn test_suggest_similar_terms(index: SearchIndex) {
        let suggestions = index.suggest("storag", 3);
        check!(suggestions.contains(&"storage".to_string()));
        check!(index.suggest("xylophone", 3).is_empty());
    }

    #[rstest]
    fn test_concurrent_searches_agree(index: SearchIndex) {
        let expected = locations(&index.search("storage entities", 10).unwrap());
        std::thread::scope(|scope| {
            for _ in 0..4 {
                scope.spawn(|| {
                    let results = index.search("storage entities", 10).unwrap();
                    assert_eq!(locations(&results), expected);
                });
            }
        });
    }
}
