//! Curriculum and transcript document loading.
//!
//! Decodes the raw JSON documents the pipeline consumes, selects a branch's
//! curriculum section, and reports common curriculum data issues.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde_json::{Map, Value};

use crate::curriculum::{alternate_spelling, credit_hours_of, CurriculumIndex, CurriculumShape};
use crate::error::InputError;
use crate::model::{Branch, TranscriptEntry};

/// Key of the transcript row array in a registrar response.
const PROGRESS_KEY: &str = "studentProgress";

/// Key wrapping the nested software-engineering curriculum.
const NESTED_WRAPPER_KEY: &str = "curriculum";

/// Top-level key of a branch's section in the curriculum document.
pub fn curriculum_key(branch: Branch) -> &'static str {
    match branch {
        Branch::General => "General",
        Branch::SoftwareEngineering => "SoftwareEngineering",
    }
}

/// Parse a curriculum document from a string.
pub fn parse_curriculum_str(content: &str) -> Result<Value, InputError> {
    Ok(serde_json::from_str(content)?)
}

/// Load a curriculum document from a JSON file.
pub fn load_curriculum_file(path: &Path) -> Result<Value> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read curriculum file: {}", path.display()))?;
    parse_curriculum_str(&content)
        .with_context(|| format!("failed to parse curriculum: {}", path.display()))
}

/// Select the definition for `branch` from a curriculum document.
///
/// The general branch's flat map sits directly under `"General"`; the
/// software-engineering nesting sits under `"SoftwareEngineering"."curriculum"`.
pub fn curriculum_for_branch(document: &Value, branch: Branch) -> Result<&Value, InputError> {
    let section = document
        .get(curriculum_key(branch))
        .ok_or(InputError::MissingCurriculum(branch))?;
    match branch.shape() {
        CurriculumShape::Flat => Ok(section),
        CurriculumShape::Nested => section
            .get(NESTED_WRAPPER_KEY)
            .ok_or(InputError::MissingCurriculum(branch)),
    }
}

/// Select and index the curriculum for `branch`.
pub fn build_index(document: &Value, branch: Branch) -> Result<CurriculumIndex, InputError> {
    let definition = curriculum_for_branch(document, branch)?;
    Ok(CurriculumIndex::build(definition, branch.shape()))
}

/// Parse transcript rows from a string.
///
/// Accepts a registrar response object (`{"studentProgress": [...]}`) or a
/// bare array of rows. An object without a row array yields no rows; rows
/// that are not objects are skipped.
pub fn parse_transcript_str(content: &str) -> Result<Vec<TranscriptEntry>, InputError> {
    let document: Value = serde_json::from_str(content)?;
    let rows = match &document {
        Value::Array(rows) => rows.as_slice(),
        Value::Object(map) => map
            .get(PROGRESS_KEY)
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default(),
        other => return Err(InputError::UnsupportedFormat(json_kind(other))),
    };

    let entries: Vec<TranscriptEntry> = rows
        .iter()
        .filter_map(|row| {
            if !row.is_object() {
                tracing::debug!(kind = json_kind(row), "skipping transcript row that is not an object");
                return None;
            }
            serde_json::from_value(row.clone()).ok()
        })
        .collect();
    tracing::debug!(rows = rows.len(), entries = entries.len(), "parsed transcript");
    Ok(entries)
}

/// Load transcript rows from a JSON file.
pub fn load_transcript_file(path: &Path) -> Result<Vec<TranscriptEntry>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read transcript file: {}", path.display()))?;
    parse_transcript_str(&content)
        .with_context(|| format!("failed to parse transcript: {}", path.display()))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// A warning from curriculum validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The course code (if applicable).
    pub code: Option<String>,
    /// Warning message.
    pub message: String,
}

impl ValidationWarning {
    fn course(code: &str, message: impl Into<String>) -> Self {
        Self {
            code: Some(code.to_string()),
            message: message.into(),
        }
    }

    fn general(message: impl Into<String>) -> Self {
        Self {
            code: None,
            message: message.into(),
        }
    }
}

/// Validate a curriculum definition for common data issues.
///
/// Reports what index construction would skip or default. Prerequisites
/// are carried as data and not checked.
pub fn validate_curriculum(definition: &Value, shape: CurriculumShape) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();
    let Some(root) = definition.as_object() else {
        warnings.push(ValidationWarning::general(format!(
            "curriculum definition is {}, expected an object",
            json_kind(definition)
        )));
        return warnings;
    };

    match shape {
        CurriculumShape::Flat => {
            for (code, course) in root {
                match course.as_object() {
                    Some(course) => check_course(code, course, &mut warnings),
                    None => warnings.push(ValidationWarning::course(
                        code,
                        format!("entry is {}, expected an object; skipped", json_kind(course)),
                    )),
                }
            }
        }
        CurriculumShape::Nested => validate_nested(root, &mut warnings),
    }

    warnings
}

fn validate_nested(root: &Map<String, Value>, warnings: &mut Vec<ValidationWarning>) {
    // spelling -> native code that claimed it
    let mut claimed: HashMap<String, String> = HashMap::new();

    for (level, semesters) in root {
        let Some(semesters) = semesters.as_object() else {
            warnings.push(ValidationWarning::general(format!(
                "level '{level}' is {}, expected an object; skipped",
                json_kind(semesters)
            )));
            continue;
        };
        for (semester, courses) in semesters {
            let Some(courses) = courses.as_array() else {
                warnings.push(ValidationWarning::general(format!(
                    "{level} / {semester} is {}, expected an array; skipped",
                    json_kind(courses)
                )));
                continue;
            };
            for (position, course) in courses.iter().enumerate() {
                let location = format!("{level} / {semester} #{}", position + 1);
                let Some(course) = course.as_object() else {
                    warnings.push(ValidationWarning::general(format!(
                        "{location} is {}, expected an object; skipped",
                        json_kind(course)
                    )));
                    continue;
                };
                let Some(code) = course.get("code").and_then(Value::as_str) else {
                    warnings.push(ValidationWarning::general(format!(
                        "{location} has no code; skipped"
                    )));
                    continue;
                };

                let mut spellings = vec![code.to_string()];
                let alternate = alternate_spelling(code);
                if alternate != code {
                    spellings.push(alternate);
                }
                let collisions: Vec<(String, String)> = spellings
                    .into_iter()
                    .filter_map(|spelling| {
                        claimed
                            .insert(spelling.clone(), code.to_string())
                            .map(|previous| (spelling, previous))
                    })
                    .collect();
                if let Some((spelling, previous)) = collisions.first() {
                    warnings.push(ValidationWarning::course(
                        code,
                        format!("spelling '{spelling}' already used by {previous}; later entry wins"),
                    ));
                }
                check_course(code, course, warnings);
            }
        }
    }
}

fn check_course(code: &str, course: &Map<String, Value>, warnings: &mut Vec<ValidationWarning>) {
    let has_name = course
        .get("name")
        .and_then(Value::as_str)
        .is_some_and(|n| !n.trim().is_empty());
    if !has_name {
        warnings.push(ValidationWarning::course(code, "name is missing"));
    }
    if credit_hours_of(course).is_none() {
        warnings.push(ValidationWarning::course(
            code,
            "credit_hours missing or not a positive whole number; defaulting to 3",
        ));
    }
}
