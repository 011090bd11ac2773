//! Curriculum index: a flat, code-keyed view of a curriculum definition.
//!
//! A flat definition is indexed as-is. A nested `level -> semester -> [course]`
//! definition is flattened, and every course is indexed under both its dashed
//! and dash-free spelling. The index owns each record exactly once; code
//! spellings are keys into that record set, never copies.

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Separator character inside course codes (`CSE-111`).
pub const CODE_SEPARATOR: char = '-';

/// Credit hours assumed when a course does not state a positive value.
pub const DEFAULT_CREDIT_HOURS: u32 = 3;

/// Track assumed when a course has no `type`.
pub const DEFAULT_TRACK: &str = "General";

/// Number of leading characters before the synthesized separator.
const DASH_POSITION: usize = 3;

/// Layout of a curriculum definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CurriculumShape {
    /// Object of course code to course metadata.
    Flat,
    /// Object of level to object of semester to array of course objects.
    Nested,
}

/// Metadata for one course in the curriculum.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseRecord {
    pub code: String,
    pub name: String,
    pub credit_hours: u32,
    #[serde(default)]
    pub prerequisites: Vec<String>,
    #[serde(default)]
    pub level: Option<String>,
    #[serde(default)]
    pub semester_label: Option<String>,
    pub track: String,
}

impl CourseRecord {
    /// Build a record from a course object, filling defaults for missing fields.
    pub fn from_object(code: impl Into<String>, course: &Map<String, Value>) -> Self {
        let track = scalar_text(course.get("track"))
            .or_else(|| scalar_text(course.get("type")))
            .unwrap_or_else(|| DEFAULT_TRACK.to_string());

        Self {
            code: code.into(),
            name: scalar_text(course.get("name")).unwrap_or_default(),
            credit_hours: credit_hours_of(course).unwrap_or(DEFAULT_CREDIT_HOURS),
            prerequisites: course
                .get("prerequisites")
                .and_then(Value::as_array)
                .map(|list| list.iter().filter_map(|p| scalar_text(Some(p))).collect())
                .unwrap_or_default(),
            level: scalar_text(course.get("level")),
            semester_label: scalar_text(course.get("semester")),
            track,
        }
    }
}

/// The stated credit hours of a course object, if positive and whole.
pub(crate) fn credit_hours_of(course: &Map<String, Value>) -> Option<u32> {
    let hours = match course.get("credit_hours")? {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|h| h.fract() == 0.0 && *h >= 0.0).map(|h| h as u64)),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    }?;
    u32::try_from(hours).ok().filter(|h| *h > 0)
}

fn scalar_text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// The other spelling of a course code.
///
/// Dashed codes lose every separator; dash-free codes longer than three
/// characters gain one after the third character. Short dash-free codes
/// have no other spelling and map to themselves.
pub fn alternate_spelling(code: &str) -> String {
    if code.contains(CODE_SEPARATOR) {
        return code.replace(CODE_SEPARATOR, "");
    }
    match code.char_indices().nth(DASH_POSITION) {
        Some((split, _)) => format!("{}{}{}", &code[..split], CODE_SEPARATOR, &code[split..]),
        None => code.to_string(),
    }
}

/// Flat lookup from course code spelling to course metadata.
#[derive(Debug, Clone, Default)]
pub struct CurriculumIndex {
    records: Vec<CourseRecord>,
    slots: HashMap<String, usize>,
}

impl CurriculumIndex {
    /// Build an index from a curriculum definition. Malformed entries are
    /// skipped; this never fails.
    pub fn build(definition: &Value, shape: CurriculumShape) -> Self {
        let mut index = Self::default();
        let Some(root) = definition.as_object() else {
            tracing::debug!(?shape, "curriculum definition is not an object; index is empty");
            return index;
        };

        match shape {
            CurriculumShape::Flat => index.fill_flat(root),
            CurriculumShape::Nested => index.fill_nested(root),
        }
        index.compact();

        tracing::info!(
            ?shape,
            records = index.records.len(),
            keys = index.slots.len(),
            "built curriculum index"
        );
        index
    }

    fn fill_flat(&mut self, root: &Map<String, Value>) {
        for (code, course) in root {
            let Some(course) = course.as_object() else {
                tracing::debug!(%code, "skipping non-object curriculum entry");
                continue;
            };
            self.insert(CourseRecord::from_object(code.clone(), course), None);
        }
    }

    fn fill_nested(&mut self, root: &Map<String, Value>) {
        for (level, semesters) in root {
            let Some(semesters) = semesters.as_object() else {
                tracing::debug!(%level, "skipping non-object curriculum level");
                continue;
            };
            for (semester, courses) in semesters {
                let Some(courses) = courses.as_array() else {
                    tracing::debug!(%level, %semester, "skipping non-array semester");
                    continue;
                };
                for course in courses {
                    let Some(course) = course.as_object() else {
                        tracing::debug!(%level, %semester, "skipping non-object course");
                        continue;
                    };
                    let Some(code) = course.get("code").and_then(Value::as_str) else {
                        tracing::debug!(%level, %semester, "skipping course without code");
                        continue;
                    };
                    let alias = alternate_spelling(code);
                    self.insert(CourseRecord::from_object(code, course), Some(alias));
                }
            }
        }
    }

    /// Store `record` under its code and optional alias. A code already in
    /// the index has its record replaced in place, so every spelling that
    /// shares the slot sees the new metadata.
    fn insert(&mut self, record: CourseRecord, alias: Option<String>) {
        let code = record.code.clone();
        let slot = match self.slots.get(&code) {
            Some(&slot) => {
                self.records[slot] = record;
                slot
            }
            None => {
                self.records.push(record);
                self.records.len() - 1
            }
        };
        self.slots.insert(code, slot);
        if let Some(alias) = alias {
            self.slots.insert(alias, slot);
        }
    }

    /// Drop records no key reaches any more and renumber the slots.
    fn compact(&mut self) {
        let live: BTreeSet<usize> = self.slots.values().copied().collect();
        if live.len() == self.records.len() {
            return;
        }
        let renumber: HashMap<usize, usize> = live
            .iter()
            .enumerate()
            .map(|(new, &old)| (old, new))
            .collect();
        let records = std::mem::take(&mut self.records);
        self.records = records
            .into_iter()
            .enumerate()
            .filter(|(old, _)| live.contains(old))
            .map(|(_, record)| record)
            .collect();
        for slot in self.slots.values_mut() {
            *slot = renumber[&*slot];
        }
    }

    /// Look up a course by any indexed spelling.
    pub fn get(&self, code: &str) -> Option<&CourseRecord> {
        self.slots.get(code).map(|&slot| &self.records[slot])
    }

    pub fn contains(&self, code: &str) -> bool {
        self.slots.contains_key(code)
    }

    /// Whether two spellings resolve to the same stored record.
    pub fn same_record(&self, a: &str, b: &str) -> bool {
        match (self.slots.get(a), self.slots.get(b)) {
            (Some(x), Some(y)) => x == y,
            _ => false,
        }
    }

    /// Every distinct course, in insertion order.
    pub fn records(&self) -> &[CourseRecord] {
        &self.records
    }

    /// Number of distinct courses.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Credit hours summed once per distinct course, however many
    /// spellings reach it.
    pub fn total_credit_hours(&self) -> u32 {
        self.records
            .iter()
            .fold(0u32, |sum, r| sum.saturating_add(r.credit_hours))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn nested_definition() -> Value {
        json!({
            "Level 1": {
                "Semester 1": [
                    {"code": "SWE101", "name": "Intro to SE", "credit_hours": 3,
                     "level": 1, "semester": 1, "type": "Core"},
                    {"code": "CSE-111", "name": "Programming", "credit_hours": 4,
                     "prerequisites": ["SWE101"]}
                ],
                "Semester 2": [
                    {"code": "MTH", "name": "Short Code"},
                    "not a course",
                    {"name": "No Code"}
                ],
                "notes": "skip me"
            },
            "metadata": 42
        })
    }

    #[test]
    fn alternate_spellings() {
        assert_eq!(alternate_spelling("SWE101"), "SWE-101");
        assert_eq!(alternate_spelling("CSE-111"), "CSE111");
        assert_eq!(alternate_spelling("A-B-C"), "ABC");
        assert_eq!(alternate_spelling("MTH"), "MTH");
        assert_eq!(alternate_spelling("MTHX"), "MTH-X");
        assert_eq!(alternate_spelling(""), "");
    }

    #[test]
    fn nested_courses_reachable_under_both_spellings() {
        let index = CurriculumIndex::build(&nested_definition(), CurriculumShape::Nested);
        assert_eq!(index.len(), 3);

        for (a, b) in [("SWE101", "SWE-101"), ("CSE-111", "CSE111")] {
            let first = index.get(a).unwrap();
            let second = index.get(b).unwrap();
            assert!(std::ptr::eq(first, second), "{a} and {b} should share a record");
            assert!(index.same_record(a, b));
        }
        assert!(index.contains("MTH"));
        assert_eq!(index.slots.len(), 5);
    }

    #[test]
    fn nested_defaults_are_applied() {
        let index = CurriculumIndex::build(&nested_definition(), CurriculumShape::Nested);

        let swe = index.get("SWE-101").unwrap();
        assert_eq!(swe.code, "SWE101");
        assert_eq!(swe.track, "Core");
        assert_eq!(swe.level.as_deref(), Some("1"));
        assert_eq!(swe.semester_label.as_deref(), Some("1"));

        let cse = index.get("CSE111").unwrap();
        assert_eq!(cse.credit_hours, 4);
        assert_eq!(cse.prerequisites, vec!["SWE101"]);

        let mth = index.get("MTH").unwrap();
        assert_eq!(mth.credit_hours, DEFAULT_CREDIT_HOURS);
        assert!(mth.prerequisites.is_empty());
        assert_eq!(mth.track, DEFAULT_TRACK);
    }

    #[test]
    fn total_hours_counts_each_record_once() {
        let index = CurriculumIndex::build(&nested_definition(), CurriculumShape::Nested);
        assert_eq!(index.total_credit_hours(), 3 + 4 + 3);
    }

    #[test]
    fn repeated_code_replaces_record() {
        let def = json!({
            "L1": {"S1": [{"code": "SWE101", "name": "Old", "credit_hours": 2}]},
            "L2": {"S1": [{"code": "SWE-101", "name": "New", "credit_hours": 5}]}
        });
        let index = CurriculumIndex::build(&def, CurriculumShape::Nested);
        assert_eq!(index.len(), 1);
        assert_eq!(index.get("SWE101").unwrap().name, "New");
        assert_eq!(index.total_credit_hours(), 5);
    }

    #[test]
    fn flat_definition_used_as_is() {
        let def = json!({
            "CS101": {"name": "Intro", "credit_hours": 3},
            "CS102": {"name": "Data Structures", "credit_hours": 4, "track": "Major"},
            "UNI-101": {"name": "University Requirement", "credit_hours": "2"},
            "BROKEN": "nope"
        });
        let index = CurriculumIndex::build(&def, CurriculumShape::Flat);
        assert_eq!(index.len(), 3);
        assert!(index.get("CS-101").is_none());
        assert!(index.get("UNI101").is_none());
        assert_eq!(index.get("CS102").unwrap().track, "Major");
        assert_eq!(index.get("UNI-101").unwrap().credit_hours, 2);
        assert_eq!(index.total_credit_hours(), 9);
    }

    #[test]
    fn invalid_credit_hours_default() {
        let def = json!({
            "A": {"credit_hours": 0},
            "B": {"credit_hours": -2},
            "C": {"credit_hours": 2.5},
            "D": {"credit_hours": null}
        });
        let index = CurriculumIndex::build(&def, CurriculumShape::Flat);
        assert!(index.records().iter().all(|r| r.credit_hours == DEFAULT_CREDIT_HOURS));
    }

    #[test]
    fn non_object_definition_is_empty() {
        let index = CurriculumIndex::build(&json!([1, 2, 3]), CurriculumShape::Nested);
        assert!(index.is_empty());
        assert_eq!(index.total_credit_hours(), 0);
    }

    #[test]
    fn index_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<CurriculumIndex>();
    }
}
