//! Data types for catalog documents.
//!
//! A document is a tagged union over three kinds, discriminated by the
//! `type` field of each catalog record:
//!
//! ```json
//! { "id": "3f2a…", "type": "test", "data": { "course": { "name": "数据结构" }, … } }
//! ```
//!
//! Records carry more fields than are modelled here (e.g. a legacy `url`);
//! unknown fields are ignored.

use serde::{Deserialize, Deserializer, Serialize};

use crate::types::Category;

/// A single catalog record.
///
/// The kind is fixed once the record is loaded: the catalog hands out shared
/// references only.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Document {
    /// A book.
    Book {
        /// Opaque identifier (content hash).
        id: String,
        /// Book metadata.
        data: Book,
    },

    /// An exam paper.
    Test {
        /// Opaque identifier (content hash).
        id: String,
        /// Exam paper metadata.
        data: ExamPaper,
    },

    /// Course material.
    Doc {
        /// Opaque identifier (content hash).
        id: String,
        /// Course material metadata.
        data: CourseMaterial,
    },
}

impl Document {
    /// Returns the opaque document id.
    pub fn id(&self) -> &str {
        match self {
            Self::Book { id, .. } | Self::Test { id, .. } | Self::Doc { id, .. } => id,
        }
    }

    /// Returns the category this document belongs to (never `All`).
    pub fn category(&self) -> Category {
        match self {
            Self::Book { .. } => Category::Book,
            Self::Test { .. } => Category::Test,
            Self::Doc { .. } => Category::Doc,
        }
    }

    /// Returns the display title.
    ///
    /// Exam papers only have a title after catalog normalization; before
    /// that (and for untitled course material) this is empty.
    pub fn title(&self) -> &str {
        match self {
            Self::Book { data, .. } => &data.title,
            Self::Test { data, .. } => data.title.as_deref().unwrap_or_default(),
            Self::Doc { data, .. } => data.title.as_deref().unwrap_or_default(),
        }
    }

    /// Returns the file extension of the content (`pdf`, `zip`, ...).
    pub fn filetype(&self) -> &str {
        match self {
            Self::Book { data, .. } => &data.filetype,
            Self::Test { data, .. } => &data.filetype,
            Self::Doc { data, .. } => &data.filetype,
        }
    }

    /// Returns the content size in bytes, if known.
    pub fn filesize(&self) -> Option<u64> {
        match self {
            Self::Book { data, .. } => data.filesize,
            Self::Test { data, .. } => data.filesize,
            Self::Doc { data, .. } => data.filesize,
        }
    }

    /// Returns the download filename, `"{title}.{filetype}"`.
    pub fn filename(&self) -> String {
        format!("{}.{}", self.title(), self.filetype())
    }
}

/// Book metadata.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Book {
    /// Book title.
    pub title: String,

    /// Authors in citation order.
    #[serde(default)]
    pub authors: Vec<String>,

    /// Translators, if the book is a translation.
    #[serde(default)]
    pub translators: Option<Vec<String>>,

    /// Publisher name.
    #[serde(default)]
    pub publisher: String,

    /// Publication year.
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub publish_year: Option<String>,

    /// ISBNs (print, electronic, ...).
    #[serde(default)]
    pub isbn: Vec<String>,

    /// Edition label.
    #[serde(default)]
    pub edition: Option<String>,

    /// File extension.
    pub filetype: String,

    /// Size in bytes.
    #[serde(default)]
    pub filesize: Option<u64>,
}

/// Exam paper metadata.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExamPaper {
    /// Synthesized title; absent in source records, filled in on load.
    #[serde(default)]
    pub title: Option<String>,

    /// The examined course.
    pub course: Course,

    /// When the exam was held.
    pub time: ExamTime,

    /// What the file contains (paper, answers, or both).
    pub content: ExamContent,

    /// Colleges the exam was given at.
    #[serde(default)]
    pub college: Option<Vec<String>>,

    /// File extension.
    pub filetype: String,

    /// Size in bytes.
    #[serde(default)]
    pub filesize: Option<u64>,
}

/// Course material metadata.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CourseMaterial {
    /// Material title, when the source provides one.
    #[serde(default)]
    pub title: Option<String>,

    /// Courses the material belongs to.
    #[serde(default)]
    pub course: Vec<Course>,

    /// Content kinds (slides, notes, ...).
    #[serde(default)]
    pub content: Vec<String>,

    /// File extension.
    pub filetype: String,

    /// Size in bytes.
    #[serde(default)]
    pub filesize: Option<u64>,
}

/// A course reference.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    /// Course name.
    pub name: String,

    /// Course variant (e.g. "本科").
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
}

impl Course {
    /// Returns `"name (type)"`, or just the name when there is no type.
    pub fn label(&self) -> String {
        match non_empty(self.kind.as_deref()) {
            Some(kind) => format!("{} ({})", self.name, kind),
            None => self.name.clone(),
        }
    }
}

/// Academic time of an exam.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExamTime {
    /// First academic year (may be a JSON string or number in the source).
    #[serde(deserialize_with = "string_or_number")]
    pub start: String,

    /// Last academic year.
    #[serde(deserialize_with = "string_or_number")]
    pub end: String,

    /// Semester, if known.
    #[serde(default)]
    pub semester: Option<Semester>,

    /// Exam stage (期中, 期末, ...).
    #[serde(default)]
    pub stage: Option<String>,
}

impl ExamTime {
    /// Returns the stage for display, `其他` when unknown.
    pub fn stage_label(&self) -> &str {
        non_empty(self.stage.as_deref()).unwrap_or("其他")
    }
}

/// Semester tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Semester {
    /// Autumn semester.
    First,
    /// Spring semester.
    Second,
}

/// Exam content descriptor: a single label or a list of labels.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExamContent {
    /// One label, e.g. `"原题"`.
    One(String),
    /// Several labels, e.g. `["原题", "答案"]`.
    Many(Vec<String>),
}

impl ExamContent {
    /// Returns the labels as a slice; a single label is a one-element slice.
    pub fn labels(&self) -> &[String] {
        match self {
            Self::One(label) => std::slice::from_ref(label),
            Self::Many(labels) => labels,
        }
    }

    /// Returns true if the file holds answers only.
    ///
    /// Only a one-element list counts; a bare string label never does,
    /// which keeps exam titles identical to the ones the site publishes.
    pub fn is_answers_only(&self) -> bool {
        match self {
            Self::Many(labels) => matches!(labels.as_slice(), [only] if only == "答案"),
            Self::One(_) => false,
        }
    }

    /// Returns the labels joined for display.
    pub fn label(&self) -> String {
        self.labels().join(", ")
    }
}

impl Default for ExamContent {
    fn default() -> Self {
        Self::Many(Vec::new())
    }
}

/// Treats `None` and `Some("")` alike.
pub(crate) fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    String(String),
    Integer(i64),
    Float(f64),
}

impl From<StringOrNumber> for String {
    fn from(value: StringOrNumber) -> Self {
        match value {
            StringOrNumber::String(s) => s,
            StringOrNumber::Integer(n) => n.to_string(),
            StringOrNumber::Float(f) => f.to_string(),
        }
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    StringOrNumber::deserialize(deserializer).map(String::from)
}

fn opt_string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<StringOrNumber>::deserialize(deserializer)?.map(String::from))
}
