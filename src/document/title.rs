//! Title synthesis for exam papers.
//!
//! Exam paper records do not carry a title. One is derived from the
//! academic time, the course and the content, and it feeds both the
//! result list and the download filename, so the format is fixed:
//!
//! ```text
//! {time}{semester} {course}{stage}{kind}
//!
//! time      "2020" when start == end, otherwise "2019-2020"
//! semester  " 第一学期" | " 第二学期" | ""
//! stage     " 期中" (space + stage) | ""
//! kind      "答案" when the content is the list ["答案"], otherwise "试卷"
//!           (a bare "答案" string is not a list and yields "试卷")
//! ```

use super::types::{non_empty, ExamPaper, Semester};

/// Builds the display title of an exam paper.
///
/// # Example
///
/// ```rust
/// use byrdocs::{exam_title, Course, ExamContent, ExamPaper, ExamTime, Semester};
///
/// let paper = ExamPaper {
///     title: None,
///     course: Course { name: "数据结构".into(), kind: None },
///     time: ExamTime {
///         start: "2020".into(),
///         end: "2020".into(),
///         semester: Some(Semester::First),
///         stage: Some("期中".into()),
///     },
///     content: ExamContent::Many(vec!["答案".into()]),
///     college: None,
///     filetype: "pdf".into(),
///     filesize: None,
/// };
/// assert_eq!(exam_title(&paper), "2020 第一学期 数据结构 期中答案");
/// ```
pub fn exam_title(paper: &ExamPaper) -> String {
    let time = &paper.time;

    let span = if time.start == time.end {
        time.start.clone()
    } else {
        format!("{}-{}", time.start, time.end)
    };

    let semester = match time.semester {
        Some(Semester::First) => " 第一学期",
        Some(Semester::Second) => " 第二学期",
        None => "",
    };

    let stage = non_empty(time.stage.as_deref())
        .map(|stage| format!(" {}", stage))
        .unwrap_or_default();

    let kind = if paper.content.is_answers_only() {
        "答案"
    } else {
        "试卷"
    };

    format!(
        "{}{} {}{}{}",
        span, semester, paper.course.name, stage, kind
    )
}
