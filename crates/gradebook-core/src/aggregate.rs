//! Transcript aggregation: per-semester and cumulative GPA.
//!
//! Each transcript row is matched against the curriculum index, graded under
//! the branch's scale, and bucketed by semester key. Rows that match no
//! curriculum course contribute nothing at all.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::curriculum::CurriculumIndex;
use crate::model::{is_pass_fail_code, Branch, RawScore, TranscriptEntry};
use crate::scale::{grade_for, GradeResult};

/// One course row as displayed in a semester table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseRow {
    pub name: String,
    pub code: String,
    pub hours: u32,
    pub raw_score: Option<RawScore>,
    pub letter: String,
    pub points: f64,
}

/// Courses and GPA totals for one semester.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SemesterSummary {
    pub id: String,
    pub name: String,
    pub courses: Vec<CourseRow>,
    /// Sum of `points * hours` over GPA-eligible rows.
    pub total_points: f64,
    /// Credit hours of GPA-eligible rows.
    pub total_hours: u32,
}

impl SemesterSummary {
    fn new(id: &str, name: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            courses: Vec::new(),
            total_points: 0.0,
            total_hours: 0,
        }
    }

    /// Semester GPA, 0 when no row counted toward GPA.
    pub fn gpa(&self) -> f64 {
        ratio(self.total_points, self.total_hours)
    }
}

/// Result of aggregating one transcript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateResult {
    /// Semesters in ascending order of their key.
    pub semesters: Vec<SemesterSummary>,
    /// Cumulative GPA over every GPA-eligible row.
    pub gpa: f64,
    /// Curriculum credit hours of every distinct passed course.
    pub completed_hours: u32,
    /// Credit hours of the whole curriculum, each course counted once.
    pub total_hours: u32,
}

impl AggregateResult {
    pub fn semester(&self, id: &str) -> Option<&SemesterSummary> {
        self.semesters.iter().find(|s| s.id == id)
    }

    /// Semesters selected by a display filter: `None` or `"all"` selects
    /// every semester, anything else selects the semester with that key.
    pub fn filtered(&self, filter: Option<&str>) -> Vec<&SemesterSummary> {
        match filter {
            None | Some("all") => self.semesters.iter().collect(),
            Some(id) => self.semester(id).into_iter().collect(),
        }
    }
}

fn ratio(points: f64, hours: u32) -> f64 {
    if hours > 0 {
        points / f64::from(hours)
    } else {
        0.0
    }
}

/// Fold a transcript into semester summaries and cumulative totals.
///
/// Pure: the index is only read, so repeated calls with the same inputs
/// return identical results.
pub fn aggregate(
    entries: &[TranscriptEntry],
    index: &CurriculumIndex,
    branch: Branch,
) -> AggregateResult {
    let scale = branch.scale();
    let mut semesters: BTreeMap<String, SemesterSummary> = BTreeMap::new();
    let mut total_points = 0.0;
    let mut gpa_hours = 0u32;
    let mut passed: BTreeSet<String> = BTreeSet::new();

    for entry in entries {
        let code = branch.normalize_code(entry.course_code());
        let Some(course) = index.get(&code) else {
            tracing::debug!(%code, "no curriculum course matches transcript row; skipping");
            continue;
        };

        let pass_fail = is_pass_fail_code(&code);
        let grade = if pass_fail {
            let letter = if entry.passed_indicator() { "P" } else { "F" };
            GradeResult {
                letter,
                points: 0.0,
            }
        } else {
            grade_for(scale, entry.degree.as_ref())
        };

        let semester = semesters
            .entry(entry.semester_key().to_string())
            .or_insert_with_key(|id| SemesterSummary::new(id, entry.semester_name()));

        semester.courses.push(CourseRow {
            name: course.name.clone(),
            code: code.clone(),
            hours: course.credit_hours,
            raw_score: entry.degree.clone(),
            letter: grade.letter.to_string(),
            points: grade.points,
        });

        if !pass_fail && entry.has_text_score() && grade.is_available() {
            let weighted = grade.points * f64::from(course.credit_hours);
            semester.total_points += weighted;
            semester.total_hours = semester.total_hours.saturating_add(course.credit_hours);
            total_points += weighted;
            gpa_hours = gpa_hours.saturating_add(course.credit_hours);
        }

        if !pass_fail && grade.points > 0.0 {
            passed.insert(code);
        }
    }

    let completed_hours = passed
        .iter()
        .filter_map(|code| index.get(code))
        .fold(0u32, |sum, course| sum.saturating_add(course.credit_hours));

    let result = AggregateResult {
        semesters: semesters.into_values().collect(),
        gpa: ratio(total_points, gpa_hours),
        completed_hours,
        total_hours: index.total_credit_hours(),
    };
    tracing::debug!(
        %branch,
        semesters = result.semesters.len(),
        gpa = result.gpa,
        completed_hours = result.completed_hours,
        "aggregated transcript"
    );
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curriculum::CurriculumShape;
    use serde_json::json;

    fn entry(code: &str, degree: &str, sem: &str, name: &str) -> TranscriptEntry {
        TranscriptEntry {
            crscode: Some(format!("{code}|X")),
            degree: Some(RawScore::Text(degree.into())),
            yearsem: Some(sem.into()),
            semester_course: Some(format!("{sem}|{name}")),
            grade_n: None,
        }
    }

    fn general_index() -> CurriculumIndex {
        CurriculumIndex::build(
            &json!({
                "CS101": {"name": "Intro", "credit_hours": 3},
                "CS102": {"name": "Data Structures", "credit_hours": 4},
                "MTH101": {"name": "Calculus I", "credit_hours": 3},
                "UNI-101": {"name": "University Requirement", "credit_hours": 2}
            }),
            CurriculumShape::Flat,
        )
    }

    #[test]
    fn worked_example() {
        let index = CurriculumIndex::build(
            &json!({
                "CS101": {"name": "Intro", "credit_hours": 3},
                "CS102": {"name": "Data Structures", "credit_hours": 4}
            }),
            CurriculumShape::Flat,
        );
        let entries = vec![
            entry("CS101", "92", "20231", "Fall 2023"),
            entry("CS102", "55", "20231", "Fall 2023"),
        ];
        let result = aggregate(&entries, &index, Branch::General);

        assert_eq!(result.semesters.len(), 1);
        let sem = &result.semesters[0];
        assert_eq!(sem.id, "20231");
        assert_eq!(sem.name, "Fall 2023");
        assert_eq!(sem.courses[0].letter, "A");
        assert!((sem.courses[0].points - 3.7).abs() < 1e-9);
        assert_eq!(sem.courses[1].letter, "D");
        assert!((sem.courses[1].points - 1.5).abs() < 1e-9);

        assert!((result.gpa - 17.1 / 7.0).abs() < 1e-9);
        assert_eq!(format!("{:.2}", result.gpa), "2.44");
        assert_eq!(result.completed_hours, 7);
        assert_eq!(result.total_hours, 7);

        // A starts at 92; a literal 90 lands one step lower.
        let ninety = crate::scale::standard_grade("90");
        assert_eq!(ninety.letter, "A-");
        assert!((ninety.points - 3.4).abs() < 1e-9);
    }

    #[test]
    fn empty_transcript() {
        let index = general_index();
        let result = aggregate(&[], &index, Branch::General);
        assert!(result.semesters.is_empty());
        assert_eq!(result.gpa, 0.0);
        assert_eq!(result.completed_hours, 0);
        assert_eq!(result.total_hours, 12);
    }

    #[test]
    fn pass_fail_rows_listed_but_never_counted() {
        let index = general_index();
        let mut uni = entry("UNI-101", "95", "20231", "Fall 2023");
        uni.grade_n = Some(" p".into());
        let base = vec![entry("CS101", "90", "20231", "Fall 2023")];
        let mut with_uni = base.clone();
        with_uni.push(uni.clone());

        let without = aggregate(&base, &index, Branch::General);
        let with = aggregate(&with_uni, &index, Branch::General);
        assert_eq!(without.gpa, with.gpa);
        assert_eq!(without.completed_hours, with.completed_hours);

        let row = &with.semesters[0].courses[1];
        assert_eq!(row.code, "UNI-101");
        assert_eq!(row.letter, "P");
        assert_eq!(row.points, 0.0);
        assert_eq!(with.semesters[0].total_hours, 3);

        uni.grade_n = Some("F".into());
        let failed = aggregate(&[uni], &index, Branch::General);
        assert_eq!(failed.semesters[0].courses[0].letter, "F");
        assert_eq!(failed.gpa, 0.0);
    }

    #[test]
    fn unmatched_rows_are_dropped() {
        let index = general_index();
        let entries = vec![
            entry("XYZ999", "100", "20231", "Fall 2023"),
            TranscriptEntry::default(),
        ];
        let result = aggregate(&entries, &index, Branch::General);
        assert!(result.semesters.is_empty());
        assert_eq!(result.gpa, 0.0);
    }

    #[test]
    fn unparsable_and_blank_scores_excluded_from_gpa() {
        let index = general_index();
        let mut missing = entry("CS102", "", "20232", "Spring 2024");
        missing.degree = None;
        let entries = vec![
            entry("CS101", "80", "20231", "Fall 2023"),
            entry("MTH101", "", "20231", "Fall 2023"),
            entry("MTH101", "W", "20231", "Fall 2023"),
            missing,
        ];
        let result = aggregate(&entries, &index, Branch::General);

        assert!((result.gpa - 3.0).abs() < 1e-9);
        let fall = result.semester("20231").unwrap();
        assert_eq!(fall.courses.len(), 3);
        assert_eq!(fall.courses[1].letter, "N/A");
        assert_eq!(fall.total_hours, 3);
        let spring = result.semester("20232").unwrap();
        assert_eq!(spring.total_hours, 0);
        assert_eq!(spring.gpa(), 0.0);
    }

    #[test]
    fn numeric_scores_graded_but_not_counted_toward_gpa() {
        let index = general_index();
        let mut row = entry("CS101", "", "20231", "Fall 2023");
        row.degree = Some(RawScore::Number(96.0));
        let result = aggregate(&[row], &index, Branch::General);
        let course = &result.semesters[0].courses[0];
        assert_eq!(course.letter, "A+");
        assert_eq!(course.points, 4.0);
        assert_eq!(result.semesters[0].total_hours, 0);
        assert_eq!(result.gpa, 0.0);
        assert_eq!(result.completed_hours, 3);
    }

    #[test]
    fn mixed_text_and_numeric_scores() {
        let index = general_index();
        let mut numeric = entry("CS102", "", "20231", "Fall 2023");
        numeric.degree = Some(RawScore::Number(55.0));
        let entries = vec![entry("CS101", "92", "20231", "Fall 2023"), numeric];
        let result = aggregate(&entries, &index, Branch::General);
        assert!((result.gpa - 3.7).abs() < 1e-9);
        assert_eq!(result.semesters[0].total_hours, 3);
        assert_eq!(result.completed_hours, 7);
    }

    #[test]
    fn huge_credit_hours_saturate() {
        let index = CurriculumIndex::build(
            &json!({
                "A": {"name": "A", "credit_hours": 4_000_000_000u64},
                "B": {"name": "B", "credit_hours": 4_000_000_000u64}
            }),
            CurriculumShape::Flat,
        );
        assert_eq!(index.total_credit_hours(), u32::MAX);

        let empty = aggregate(&[], &index, Branch::General);
        assert_eq!(empty.total_hours, u32::MAX);

        let entries = vec![
            entry("A", "92", "20231", "Fall 2023"),
            entry("B", "92", "20231", "Fall 2023"),
        ];
        let result = aggregate(&entries, &index, Branch::General);
        assert_eq!(result.completed_hours, u32::MAX);
        assert_eq!(result.semesters[0].total_hours, u32::MAX);
        assert!(result.gpa.is_finite());
    }

    #[test]
    fn retakes_count_each_attempt_but_pass_once() {
        let index = general_index();
        let entries = vec![
            entry("CS101", "40", "20231", "Fall 2023"),
            entry("CS101", "92", "20232", "Spring 2024"),
            entry("CS101", "TBD", "20241", "Fall 2024"),
        ];
        let result = aggregate(&entries, &index, Branch::General);
        assert!((result.gpa - 3.7 / 2.0).abs() < 1e-9);
        assert_eq!(result.completed_hours, 3);
        assert_eq!(result.semesters.len(), 3);
    }

    #[test]
    fn semesters_sorted_lexically_with_first_seen_name() {
        let index = general_index();
        let mut unnamed = entry("CS102", "70", "20231", "");
        unnamed.semester_course = Some("20231|Renamed".into());
        let mut no_key = entry("MTH101", "70", "", "");
        no_key.yearsem = None;
        no_key.semester_course = None;
        let entries = vec![
            entry("CS101", "90", "20232", "Spring 2024"),
            entry("CS101", "92", "20231", "Fall 2023"),
            unnamed,
            no_key,
        ];
        let result = aggregate(&entries, &index, Branch::General);
        let ids: Vec<&str> = result.semesters.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["20231", "20232", "Unknown"]);
        assert_eq!(result.semesters[0].name, "Fall 2023");
        assert_eq!(result.semesters[2].name, "Unknown");
    }

    #[test]
    fn banded_branch_strips_separators_before_lookup() {
        let index = CurriculumIndex::build(
            &json!({
                "Level 1": {"Semester 1": [
                    {"code": "CSE-111", "name": "Programming", "credit_hours": 4},
                    {"code": "SWE101", "name": "Intro to SE", "credit_hours": 3}
                ]}
            }),
            CurriculumShape::Nested,
        );
        let entries = vec![
            entry("CSE-111", "100", "20231", "Fall 2023"),
            entry("SWE-101", "92.5", "20231", "Fall 2023"),
        ];
        let result = aggregate(&entries, &index, Branch::SoftwareEngineering);

        let rows = &result.semesters[0].courses;
        assert_eq!(rows[0].code, "CSE111");
        assert_eq!(rows[0].letter, "A+");
        assert!((rows[0].points - 4.0).abs() < 1e-9);
        assert_eq!(rows[1].code, "SWE101");
        assert!((rows[1].points - 3.55).abs() < 1e-9);
        assert_eq!(result.completed_hours, 7);
        assert_eq!(result.total_hours, 7);
        assert!((result.gpa - (4.0 * 4.0 + 3.55 * 3.0) / 7.0).abs() < 1e-9);
    }

    #[test]
    fn banded_branch_grades_uni_rows_numerically() {
        let index = CurriculumIndex::build(
            &json!({"L1": {"S1": [{"code": "UNI-102", "name": "Ethics", "credit_hours": 2}]}}),
            CurriculumShape::Nested,
        );
        let mut row = entry("UNI-102", "100", "20231", "Fall 2023");
        row.grade_n = Some("P".into());
        let result = aggregate(&[row], &index, Branch::SoftwareEngineering);
        let course = &result.semesters[0].courses[0];
        assert_eq!(course.code, "UNI102");
        assert_eq!(course.letter, "A+");
        assert!((result.gpa - 4.0).abs() < 1e-9);
        assert_eq!(result.completed_hours, 2);
    }

    #[test]
    fn aggregation_is_idempotent() {
        let index = general_index();
        let entries = vec![
            entry("CS101", "92", "20231", "Fall 2023"),
            entry("CS102", "61", "20232", "Spring 2024"),
        ];
        let first = aggregate(&entries, &index, Branch::General);
        let second = aggregate(&entries, &index, Branch::General);
        assert_eq!(first, second);
        assert_eq!(first.gpa.to_bits(), second.gpa.to_bits());
    }

    #[test]
    fn filter_selects_semesters() {
        let index = general_index();
        let entries = vec![
            entry("CS101", "92", "20231", "Fall 2023"),
            entry("CS102", "61", "20232", "Spring 2024"),
        ];
        let result = aggregate(&entries, &index, Branch::General);
        assert_eq!(result.filtered(None).len(), 2);
        assert_eq!(result.filtered(Some("all")).len(), 2);
        assert_eq!(result.filtered(Some("20232"))[0].name, "Spring 2024");
        assert!(result.filtered(Some("19990")).is_empty());
    }
}
