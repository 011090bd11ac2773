//! Core data model types for gradebook.
//!
//! These types describe what the caller hands to the pipeline: which
//! academic branch is being graded and the raw transcript rows.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use crate::curriculum::{CurriculumShape, CODE_SEPARATOR};
use crate::error::InputError;
use crate::scale::GradeScale;

/// Separator between the parts of composite transcript fields
/// (`crscode` and `semesterCourse`).
pub const FIELD_SEPARATOR: char = '|';

/// Code prefix of the university-requirement courses, which are graded
/// pass/fail and never count toward GPA.
pub const PASS_FAIL_PREFIX: &str = "UNI-";

/// Semester key and name used when a transcript row does not carry one.
pub const UNKNOWN_SEMESTER: &str = "Unknown";

/// Whether a course code, already normalized for its branch, is in the
/// pass/fail category. The banded branch strips separators first, so its
/// `UNI-` rows are graded like any other course.
pub fn is_pass_fail_code(code: &str) -> bool {
    code.starts_with(PASS_FAIL_PREFIX)
}

/// The academic program variant being graded.
///
/// A branch fixes both the grading scale and the shape of its curriculum
/// definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Branch {
    General,
    SoftwareEngineering,
}

impl Branch {
    /// Grading scale used by this branch.
    pub fn scale(self) -> GradeScale {
        match self {
            Branch::General => GradeScale::Standard,
            Branch::SoftwareEngineering => GradeScale::Banded,
        }
    }

    /// Shape of this branch's curriculum definition.
    pub fn shape(self) -> CurriculumShape {
        match self {
            Branch::General => CurriculumShape::Flat,
            Branch::SoftwareEngineering => CurriculumShape::Nested,
        }
    }

    /// Canonicalize a transcript course code for index lookup.
    ///
    /// The banded branch indexes every course under its separator-free
    /// spelling, so transcript codes are stripped to match.
    pub fn normalize_code(self, code: &str) -> String {
        match self.scale() {
            GradeScale::Standard => code.to_string(),
            GradeScale::Banded => code.replace(CODE_SEPARATOR, ""),
        }
    }

    pub fn all() -> [Branch; 2] {
        [Branch::General, Branch::SoftwareEngineering]
    }
}

impl fmt::Display for Branch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Branch::General => write!(f, "General"),
            Branch::SoftwareEngineering => write!(f, "Software Engineering"),
        }
    }
}

impl FromStr for Branch {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let folded: String = s
            .trim()
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .collect::<String>()
            .to_lowercase();
        match folded.as_str() {
            "general" => Ok(Branch::General),
            "softwareengineering" | "se" | "swe" => Ok(Branch::SoftwareEngineering),
            _ => Err(InputError::UnknownBranch(s.to_string())),
        }
    }
}

/// A raw score exactly as the transcript supplied it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawScore {
    Number(f64),
    Text(String),
}

impl fmt::Display for RawScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawScore::Number(n) => write!(f, "{n}"),
            RawScore::Text(s) => write!(f, "{s}"),
        }
    }
}

/// One course attempt on a student's transcript.
///
/// Field names follow the registrar export. Values of an unexpected JSON
/// type are read as absent instead of failing the whole document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TranscriptEntry {
    /// Composite `"CODE|suffix"` course identifier.
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub crscode: Option<String>,
    /// Raw numeric mark.
    #[serde(
        rename = "Degree",
        default,
        deserialize_with = "lenient_score",
        skip_serializing_if = "Option::is_none"
    )]
    pub degree: Option<RawScore>,
    /// Semester key used for bucketing and ordering.
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub yearsem: Option<String>,
    /// Composite `"key|Display Name"` semester label.
    #[serde(
        rename = "semesterCourse",
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub semester_course: Option<String>,
    /// Pass/fail indicator for university-requirement courses.
    #[serde(
        rename = "gradeN",
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub grade_n: Option<String>,
}

impl TranscriptEntry {
    /// Course code as written on the transcript (the part before `|`).
    pub fn course_code(&self) -> &str {
        self.crscode
            .as_deref()
            .and_then(|c| c.split(FIELD_SEPARATOR).next())
            .unwrap_or("")
    }

    /// Semester key, `"Unknown"` when missing or empty.
    pub fn semester_key(&self) -> &str {
        match self.yearsem.as_deref() {
            Some(key) if !key.is_empty() => key,
            _ => UNKNOWN_SEMESTER,
        }
    }

    /// Semester display name: the part of `semesterCourse` after the first `|`.
    pub fn semester_name(&self) -> &str {
        self.semester_course
            .as_deref()
            .and_then(|label| label.split_once(FIELD_SEPARATOR))
            .map(|(_, name)| name)
            .unwrap_or(UNKNOWN_SEMESTER)
    }

    /// Whether the score arrived as non-blank text. Only such scores count
    /// toward GPA points and hours; numeric scores are graded for display.
    pub fn has_text_score(&self) -> bool {
        matches!(&self.degree, Some(RawScore::Text(s)) if !s.trim().is_empty())
    }

    /// Whether the pass/fail indicator reads `P`.
    pub fn passed_indicator(&self) -> bool {
        self.grade_n
            .as_deref()
            .is_some_and(|g| g.trim().eq_ignore_ascii_case("P"))
    }
}

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

fn lenient_score<'de, D>(deserializer: D) -> Result<Option<RawScore>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(RawScore::Text(s)),
        Value::Number(n) => n.as_f64().map(RawScore::Number),
        _ => None,
    })
}
