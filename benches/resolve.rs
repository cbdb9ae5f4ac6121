//! Benchmarks for result resolution over a loaded catalog.
//!
//! Run with: `cargo bench`
//!
//! The matcher runs once per settled keyword, so a full-catalog scan has
//! to stay well under the debounce window (500 ms) for a catalog of a few
//! thousand documents.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use byrdocs::{
    exam_title, Catalog, Category, Course, ExamContent, ExamPaper, ExamTime, KeywordResolver,
    Resolver, Semester,
};

const COURSES: [&str; 6] = ["数据结构", "线性代数", "高等数学", "离散数学", "大学物理", "计算机网络"];

/// Builds a catalog body with `n` documents spread over the three kinds.
fn catalog_json(n: usize) -> String {
    let docs: Vec<String> = (0..n)
        .map(|i| {
            let course = COURSES[i % COURSES.len()];
            match i % 3 {
                0 => format!(
                    r#"{{"id":"b{i}","type":"book","data":{{"title":"{course} 教程 第{i}版","authors":["作者{i}"],"isbn":["978{i:010}"],"filetype":"pdf"}}}}"#
                ),
                1 => format!(
                    r#"{{"id":"t{i}","type":"test","data":{{"course":{{"name":"{course}"}},"time":{{"start":{y},"end":{y},"semester":"First","stage":"期末"}},"content":["原题","答案"],"filetype":"pdf"}}}}"#,
                    y = 2010 + i % 15
                ),
                _ => format!(
                    r#"{{"id":"d{i}","type":"doc","data":{{"title":"{course} 复习资料","course":[{{"name":"{course}"}}],"content":["课件"],"filetype":"zip"}}}}"#
                ),
            }
        })
        .collect();
    format!("[{}]", docs.join(","))
}

/// Benchmark decoding and normalizing the catalog.
fn bench_catalog_load(c: &mut Criterion) {
    let body = catalog_json(5_000);
    c.bench_function("catalog_from_json_5000", |b| {
        b.iter(|| Catalog::from_json("bench", black_box(body.as_bytes())).unwrap());
    });
}

/// Benchmark keyword matching across catalog sizes.
fn bench_keyword_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("keyword_search");

    for size in [500, 5_000, 20_000] {
        let catalog = Catalog::from_json("bench", catalog_json(size).as_bytes()).unwrap();

        group.bench_with_input(BenchmarkId::new("single_term", size), &catalog, |b, catalog| {
            b.iter(|| KeywordResolver.search(catalog, black_box("线性代数"), Category::All));
        });

        group.bench_with_input(BenchmarkId::new("multi_term", size), &catalog, |b, catalog| {
            b.iter(|| KeywordResolver.search(catalog, black_box("2020 期末 数据结构"), Category::Test));
        });
    }

    group.finish();
}

/// Benchmark title synthesis for a single exam paper.
fn bench_exam_title(c: &mut Criterion) {
    let paper = ExamPaper {
        title: None,
        course: Course {
            name: "数据结构".into(),
            kind: Some("本科".into()),
        },
        time: ExamTime {
            start: "2019".into(),
            end: "2020".into(),
            semester: Some(Semester::Second),
            stage: Some("期末".into()),
        },
        content: ExamContent::Many(vec!["原题".into(), "答案".into()]),
        college: None,
        filetype: "pdf".into(),
        filesize: None,
    };
    c.bench_function("exam_title", |b| b.iter(|| exam_title(black_box(&paper))));
}

criterion_group!(benches, bench_catalog_load, bench_keyword_search, bench_exam_title);
criterion_main!(benches);
