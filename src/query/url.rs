//! Navigable URL query (`?q=...&c=...`).
//!
//! Keyword and category round-trip through the page URL so a search can
//! be bookmarked or shared. Encoding follows `application/x-www-form-urlencoded`
//! (spaces as `+`), which is what browsers produce for query strings.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ParamError;
use crate::types::Category;

/// Keyword parameter name.
pub const KEYWORD_PARAM: &str = "q";

/// Category parameter name.
pub const CATEGORY_PARAM: &str = "c";

/// The session state mirrored into the URL.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UrlQuery {
    /// Search keyword (`q`).
    pub keyword: String,
    /// Category filter (`c`).
    pub category: Category,
}

impl UrlQuery {
    /// Creates a query from its parts.
    pub fn new(keyword: impl Into<String>, category: Category) -> Self {
        Self {
            keyword: keyword.into(),
            category,
        }
    }

    /// Returns true for the default state, which serializes to an empty query.
    pub fn is_empty(&self) -> bool {
        self.keyword.is_empty() && self.category == Category::All
    }

    /// Parses a query string, rejecting malformed parameters.
    ///
    /// A leading `?` is accepted. Missing parameters take their defaults;
    /// unknown parameters are ignored; when a parameter repeats, the first
    /// occurrence wins.
    ///
    /// # Errors
    ///
    /// Returns the first [`ParamError`] encountered.
    pub fn parse(query: &str) -> Result<Self, ParamError> {
        let (parsed, errors) = Self::parse_lossy(query);
        let first = errors.into_iter().next();
        match first {
            Some(err) => Err(err),
            None => Ok(parsed),
        }
    }

    /// Parses a query string, replacing malformed parameters by defaults.
    ///
    /// Returns the best-effort query together with every problem found, so
    /// the caller can surface them without dropping the parts that parsed.
    ///
    /// ```rust
    /// use byrdocs::{Category, UrlQuery};
    ///
    /// let (query, errors) = UrlQuery::parse_lossy("?q=linear+algebra&c=video");
    /// assert_eq!(query.keyword, "linear algebra");
    /// assert_eq!(query.category, Category::All);
    /// assert_eq!(errors.len(), 1);
    /// ```
    pub fn parse_lossy(query: &str) -> (Self, Vec<ParamError>) {
        let query = query.strip_prefix('?').unwrap_or(query);
        let mut keyword: Option<String> = None;
        let mut category: Option<Category> = None;
        let mut errors = Vec::new();

        for pair in query.split('&').filter(|pair| !pair.is_empty()) {
            let (raw_key, raw_value) = pair.split_once('=').unwrap_or((pair, ""));
            let key = match form_decode(raw_key) {
                Ok(key) => key,
                Err(_) => continue,
            };

            match key.as_str() {
                KEYWORD_PARAM if keyword.is_none() => match form_decode(raw_value) {
                    Ok(value) => keyword = Some(value),
                    Err(reason) => {
                        keyword = Some(String::new());
                        errors.push(ParamError::malformed(KEYWORD_PARAM, reason));
                    }
                },
                CATEGORY_PARAM if category.is_none() => {
                    let parsed = form_decode(raw_value)
                        .map_err(|reason| ParamError::malformed(CATEGORY_PARAM, reason))
                        .and_then(|value| value.parse::<Category>());
                    match parsed {
                        Ok(value) => category = Some(value),
                        Err(err) => {
                            category = Some(Category::All);
                            errors.push(err);
                        }
                    }
                }
                _ => {}
            }
        }

        let parsed = Self {
            keyword: keyword.unwrap_or_default(),
            category: category.unwrap_or_default(),
        };
        (parsed, errors)
    }

    /// Serializes to a query string without the leading `?`.
    ///
    /// The default state serializes to the empty string.
    pub fn to_query_string(&self) -> String {
        if self.is_empty() {
            return String::new();
        }
        format!(
            "{}={}&{}={}",
            KEYWORD_PARAM,
            form_encode(&self.keyword),
            CATEGORY_PARAM,
            self.category.as_str()
        )
    }
}

impl fmt::Display for UrlQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_query_string())
    }
}

/// Percent-encodes a form value, spaces as `+`.
pub(crate) fn form_encode(value: &str) -> String {
    urlencoding::encode(value).replace("%20", "+")
}

/// Decodes a form value, `+` as space.
pub(crate) fn form_decode(value: &str) -> Result<String, String> {
    let spaced = value.replace('+', " ");
    urlencoding::decode(&spaced)
        .map(|decoded| decoded.into_owned())
        .map_err(|e| e.to_string())
}
