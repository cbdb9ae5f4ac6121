//! Core type definitions shared across the session.
//!
//! This module defines the session identifier, the category filter and the
//! viewport classification.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::ParamError;

/// Session identifier (UUID v7 for time-ordering).
///
/// Each mounted search session gets one; it is attached to every log span
/// the session emits.
///
/// # Example
/// ```
/// use byrdocs::SessionId;
///
/// let id = SessionId::new();
/// println!("Mounted session: {}", id);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub Uuid);

impl SessionId {
    /// Creates a new SessionId with a UUID v7 (time-ordered).
    #[inline]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Creates a nil (all zeros) SessionId.
    /// Useful for testing or sentinel values.
    #[inline]
    pub fn nil() -> Self {
        Self(Uuid::nil())
    }
}

impl Default for SessionId {
    /// Returns a nil (all zeros) SessionId.
    ///
    /// For a new unique ID, use [`SessionId::new()`].
    fn default() -> Self {
        Self::nil()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Category filter selected in the tab bar.
///
/// Serialized as the lowercase tag used in the `c` URL parameter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Every document kind.
    #[default]
    All,
    /// Books.
    Book,
    /// Exam papers.
    Test,
    /// Course materials.
    Doc,
}

impl Category {
    /// All categories in tab order.
    pub const ALL: [Category; 4] = [Self::All, Self::Book, Self::Test, Self::Doc];

    /// Returns the URL tag (`all`, `book`, `test`, `doc`).
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Book => "book",
            Self::Test => "test",
            Self::Doc => "doc",
        }
    }

    /// Returns the tab label shown to users.
    pub const fn label(&self) -> &'static str {
        match self {
            Self::All => "全部",
            Self::Book => "书籍",
            Self::Test => "试卷",
            Self::Doc => "资料",
        }
    }

    /// Returns true if a document of kind `other` passes this filter.
    ///
    /// `All` admits every kind; `other` is never `All` for a real document.
    #[inline]
    pub fn admits(&self, other: Category) -> bool {
        matches!(self, Self::All) || *self == other
    }
}

impl FromStr for Category {
    type Err = ParamError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(Self::All),
            "book" => Ok(Self::Book),
            "test" => Ok(Self::Test),
            "doc" => Ok(Self::Doc),
            other => Err(ParamError::UnknownCategory(other.to_string())),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coarse display classification used to pick a preview surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ViewportClass {
    /// Narrow screens: previews open in an overlay drawer.
    Narrow,
    /// Wide screens: previews open in a persistent side panel.
    Wide,
}

impl ViewportClass {
    /// Classifies a width in CSS pixels; widths below `breakpoint` are narrow.
    #[inline]
    pub fn from_width(width_px: u32, breakpoint_px: u32) -> Self {
        if width_px < breakpoint_px {
            Self::Narrow
        } else {
            Self::Wide
        }
    }

    /// Returns true for [`ViewportClass::Narrow`].
    #[inline]
    pub fn is_narrow(&self) -> bool {
        matches!(self, Self::Narrow)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_id_unique() {
        let a = SessionId::new();
        let b = SessionId::new();
        assert_ne!(a, b);
        assert_eq!(SessionId::default(), SessionId::nil());
    }

    #[test]
    fn test_category_parse() {
        for category in Category::ALL {
            assert_eq!(category.as_str().parse::<Category>().unwrap(), category);
        }
        assert_eq!(
            "Book".parse::<Category>().unwrap_err(),
            ParamError::UnknownCategory("Book".into())
        );
    }

    #[test]
    fn test_category_admits() {
        assert!(Category::All.admits(Category::Book));
        assert!(Category::Test.admits(Category::Test));
        assert!(!Category::Test.admits(Category::Doc));
    }

    #[test]
    fn test_category_serde_tag() {
        let json = serde_json::to_string(&Category::Doc).unwrap();
        assert_eq!(json, "\"doc\"");
        let back: Category = serde_json::from_str("\"test\"").unwrap();
        assert_eq!(back, Category::Test);
    }

    #[test]
    fn test_viewport_from_width() {
        assert_eq!(ViewportClass::from_width(375, 768), ViewportClass::Narrow);
        assert_eq!(ViewportClass::from_width(768, 768), ViewportClass::Wide);
        assert_eq!(ViewportClass::from_width(1440, 768), ViewportClass::Wide);
        assert!(ViewportClass::Narrow.is_narrow());
    }
}
