use criterion::{black_box, criterion_group, criterion_main, Criterion};
use serde_json::{json, Value};

use gradebook_core::{aggregate, Branch, CurriculumIndex, RawScore, TranscriptEntry};

/// A nested curriculum of `levels` x 2 semesters x 6 courses.
fn nested_curriculum(levels: usize) -> Value {
    let mut root = serde_json::Map::new();
    for level in 1..=levels {
        let mut semesters = serde_json::Map::new();
        for semester in 1..=2 {
            let courses: Vec<Value> = (0..6)
                .map(|i| {
                    json!({
                        "code": format!("SWE{level}{semester}{i}"),
                        "name": format!("Course {level}.{semester}.{i}"),
                        "credit_hours": 3,
                        "level": level,
                        "semester": semester,
                    })
                })
                .collect();
            semesters.insert(format!("Semester {semester}"), Value::Array(courses));
        }
        root.insert(format!("Level {level}"), Value::Object(semesters));
    }
    Value::Object(root)
}

fn transcript(levels: usize) -> Vec<TranscriptEntry> {
    let mut entries = Vec::new();
    for level in 1..=levels {
        for semester in 1..=2 {
            for i in 0..6 {
                let key = format!("202{level}{semester}");
                entries.push(TranscriptEntry {
                    crscode: Some(format!("SWE-{level}{semester}{i}|S")),
                    degree: Some(RawScore::Text(format!("{}", 55 + (i * 7) % 45))),
                    yearsem: Some(key.clone()),
                    semester_course: Some(format!("{key}|Term {key}")),
                    grade_n: None,
                });
            }
        }
    }
    entries
}

fn bench_index_build(c: &mut Criterion) {
    let definition = nested_curriculum(5);
    c.bench_function("index_build_nested_60", |b| {
        b.iter(|| CurriculumIndex::build(black_box(&definition), Branch::SoftwareEngineering.shape()))
    });
}

fn bench_aggregate(c: &mut Criterion) {
    let index = CurriculumIndex::build(&nested_curriculum(5), Branch::SoftwareEngineering.shape());
    let entries = transcript(5);
    c.bench_function("aggregate_60_rows", |b| {
        b.iter(|| aggregate(black_box(&entries), black_box(&index), Branch::SoftwareEngineering))
    });
}

criterion_group!(benches, bench_index_build, bench_aggregate);
criterion_main!(benches);
