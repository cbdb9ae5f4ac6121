//! Default keyword matcher.
//!
//! A document matches when every whitespace-separated term of the keyword
//! occurs, case-insensitively, somewhere in its searchable text. Matches
//! keep catalog order; no ranking is applied.

use crate::document::Document;
use crate::types::Category;

use super::Resolver;

/// Case-insensitive all-terms substring matcher.
#[derive(Clone, Copy, Debug, Default)]
pub struct KeywordResolver;

impl KeywordResolver {
    /// Creates the matcher.
    pub fn new() -> Self {
        Self
    }

    /// Returns true if `doc` passes both the category filter and every term.
    ///
    /// `terms` must already be lowercase.
    pub fn matches(doc: &Document, terms: &[String], category: Category) -> bool {
        if !category.admits(doc.category()) {
            return false;
        }
        let haystack = searchable_text(doc).to_lowercase();
        terms.iter().all(|term| haystack.contains(term.as_str()))
    }
}

impl Resolver for KeywordResolver {
    fn search(&self, documents: &[Document], keyword: &str, category: Category) -> Vec<Document> {
        let terms: Vec<String> = keyword.split_whitespace().map(str::to_lowercase).collect();
        if terms.is_empty() {
            return Vec::new();
        }

        documents
            .iter()
            .filter(|doc| Self::matches(doc, &terms, category))
            .cloned()
            .collect()
    }
}

/// Concatenates the fields a user would search by.
fn searchable_text(doc: &Document) -> String {
    let mut parts: Vec<&str> = vec![doc.id(), doc.title()];

    match doc {
        Document::Book { data, .. } => {
            parts.extend(data.authors.iter().map(String::as_str));
            if let Some(translators) = &data.translators {
                parts.extend(translators.iter().map(String::as_str));
            }
            parts.push(&data.publisher);
            parts.extend(data.isbn.iter().map(String::as_str));
            if let Some(year) = &data.publish_year {
                parts.push(year);
            }
        }
        Document::Test { data, .. } => {
            parts.push(&data.course.name);
            if let Some(kind) = &data.course.kind {
                parts.push(kind);
            }
            if let Some(colleges) = &data.college {
                parts.extend(colleges.iter().map(String::as_str));
            }
            parts.extend(data.content.labels().iter().map(String::as_str));
        }
        Document::Doc { data, .. } => {
            parts.extend(data.course.iter().map(|c| c.name.as_str()));
            parts.extend(data.content.iter().map(String::as_str));
        }
    }

    parts.join("\n")
}
