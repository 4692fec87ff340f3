//! Immutable collection of documentation entries supplied by the site generator.
//!
//! The generator emits either a bare JSON array of records, an object of the form
//! `{"docs": [...]}`, or that object assigned to a JavaScript variable
//! (`var documenterSearchIndex = {"docs": [...]}`). All three are accepted.

use crate::error::SearchError;
use ahash::AHashMap;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::{fmt, path::Path, str::FromStr, sync::OnceLock};

static JS_ASSIGNMENT_RE: OnceLock<Regex> = OnceLock::new();

/// Position of an entry in its [`DocumentStore`], in insertion order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DocId(pub u32);

impl DocId {
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Whether an entry covers a whole page or one heading within it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Page,
    Section,
}

impl Category {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Page => "page",
            Self::Section => "section",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "page" => Ok(Self::Page),
            "section" => Ok(Self::Section),
            other => Err(format!(
                "unrecognized category `{}` (expected `page` or `section`)",
                other
            )),
        }
    }
}

/// One indexed unit of the documentation site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentEntry {
    /// URL fragment identifying the entry within the site.
    pub location: String,
    /// Human-readable page name; shared by all sections of a page.
    pub page: String,
    /// Heading title; may be empty for page-level entries.
    pub title: String,
    /// Plain-text excerpt used for indexing and snippets.
    pub text: String,
    pub category: Category,
}

/// A record as written by the producer, before validation.
///
/// Every field is optional here so that a missing field is reported as a
/// malformed index rather than a generic deserialization failure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawEntry {
    pub location: Option<String>,
    pub page: Option<String>,
    pub title: Option<String>,
    pub text: Option<String>,
    pub category: Option<String>,
}

impl RawEntry {
    fn validate(self, record: usize) -> Result<DocumentEntry, SearchError> {
        let missing = |field: &str| SearchError::malformed(record, format!("missing field `{}`", field));

        let location = self.location.ok_or_else(|| missing("location"))?;
        if location.is_empty() {
            return Err(SearchError::malformed(record, "`location` must not be empty"));
        }
        let page = self.page.ok_or_else(|| missing("page"))?;
        let title = self.title.ok_or_else(|| missing("title"))?;
        let text = self.text.ok_or_else(|| missing("text"))?;
        let category = self
            .category
            .ok_or_else(|| missing("category"))?
            .parse::<Category>()
            .map_err(|reason| SearchError::malformed(record, reason))?;

        Ok(DocumentEntry {
            location,
            page,
            title,
            text,
            category,
        })
    }
}

/// The corpus: validated entries in producer order plus a location lookup.
#[derive(Debug, Clone, Default)]
pub struct DocumentStore {
    entries: Vec<DocumentEntry>,
    by_location: AHashMap<String, DocId>,
}

impl DocumentStore {
    /// Validates raw records and builds the store.
    ///
    /// Fails on the first record that is missing a field, carries an unknown
    /// category, has an empty location, or repeats an earlier location.
    pub fn load(raw_entries: Vec<RawEntry>) -> Result<Self, SearchError> {
        let mut entries = Vec::with_capacity(raw_entries.len());
        let mut by_location = AHashMap::with_capacity(raw_entries.len());

        for (record, raw) in raw_entries.into_iter().enumerate() {
            let entry = raw.validate(record)?;
            let id = u32::try_from(record)
                .map(DocId)
                .map_err(|_| SearchError::malformed(record, "too many records"))?;

            if let Some(previous) = by_location.insert(entry.location.clone(), id) {
                return Err(SearchError::malformed(
                    record,
                    format!(
                        "duplicate location `{}` (first seen at record {})",
                        entry.location,
                        previous.index()
                    ),
                ));
            }
            entries.push(entry);
        }

        Ok(Self {
            entries,
            by_location,
        })
    }

    /// Parses the producer's output (JSON array, `{"docs": [...]}` object, or
    /// the JavaScript assignment wrapping it) and loads it.
    pub fn from_json(source: &str) -> Result<Self, SearchError> {
        let value: serde_json::Value =
            serde_json::from_str(strip_js_assignment(source)).map_err(|e| {
                SearchError::MalformedIndex {
                    record: None,
                    reason: format!("invalid JSON: {}", e),
                }
            })?;

        let records = match value {
            serde_json::Value::Array(records) => records,
            serde_json::Value::Object(mut object) => match object.remove("docs") {
                Some(serde_json::Value::Array(records)) => records,
                _ => {
                    return Err(SearchError::MalformedIndex {
                        record: None,
                        reason: "expected a `docs` array".to_string(),
                    });
                }
            },
            _ => {
                return Err(SearchError::MalformedIndex {
                    record: None,
                    reason: "expected an array of records".to_string(),
                });
            }
        };

        let raw_entries = records
            .into_iter()
            .enumerate()
            .map(|(record, value)| {
                serde_json::from_value::<RawEntry>(value)
                    .map_err(|e| SearchError::malformed(record, e.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Self::load(raw_entries)
    }

    /// Reads and loads an index file.
    pub fn from_path(path: &Path) -> Result<Self, SearchError> {
        let source = std::fs::read_to_string(path).map_err(|source| SearchError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&source)
    }

    /// All entries in insertion order.
    pub fn entries(&self) -> &[DocumentEntry] {
        &self.entries
    }

    /// Entries paired with their ids, in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (DocId, &DocumentEntry)> {
        self.entries
            .iter()
            .enumerate()
            .map(|(i, entry)| (DocId(i as u32), entry))
    }

    pub fn get(&self, id: DocId) -> Option<&DocumentEntry> {
        self.entries.get(id.index())
    }

    /// Looks up an entry by its location. `None` is the normal "not found" outcome.
    pub fn get_by_location(&self, location: &str) -> Option<&DocumentEntry> {
        self.by_location
            .get(location)
            .and_then(|id| self.entries.get(id.index()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Removes a leading `var name =` (or `let`/`const`) and a trailing `;`.
fn strip_js_assignment(source: &str) -> &str {
    let re = JS_ASSIGNMENT_RE.get_or_init(|| {
        Regex::new(r"^\s*(?:var|let|const)\s+[A-Za-z_$][A-Za-z0-9_$]*\s*=\s*")
            .expect("assignment pattern is valid")
    });
    let body = match re.find(source) {
        Some(m) => &source[m.end()..],
        None => source,
    };
    body.trim_end().trim_end_matches(';')
}
