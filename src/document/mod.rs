//! Catalog document module.
//!
//! A **document** is one entry of the repository catalog: a book, an exam
//! paper or a piece of course material. Documents are loaded once per
//! session and never mutated afterwards.
//!
//! # Contents
//!
//! - [`Document`] and its per-kind metadata types
//! - [`exam_title`] - the title synthesized for exam papers on load
//! - [`ResourceLinks`] - content, cover, download and viewer URLs
//! - [`format_file_size`] - human-readable sizes

mod links;
mod title;
pub mod types;

pub use links::{format_file_size, ResourceLinks};
pub use title::exam_title;
pub use types::{
    Book, Course, CourseMaterial, Document, ExamContent, ExamPaper, ExamTime, Semester,
};
