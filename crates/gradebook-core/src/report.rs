//! GPA report types with JSON persistence and markdown rendering.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::aggregate::{AggregateResult, SemesterSummary};
use crate::model::Branch;

/// A computed GPA summary stamped for hand-off to a presentation layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GpaReport {
    /// Unique report identifier.
    pub id: Uuid,
    /// When the report was created.
    pub created_at: DateTime<Utc>,
    /// Branch the transcript was graded under.
    pub branch: Branch,
    /// The aggregation result.
    pub result: AggregateResult,
}

impl GpaReport {
    pub fn new(branch: Branch, result: AggregateResult) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            branch,
            result,
        }
    }

    /// Save the report as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize report")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        Ok(())
    }

    /// Load a report from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read report from {}", path.display()))?;
        let report: GpaReport =
            serde_json::from_str(&content).context("failed to parse report JSON")?;
        Ok(report)
    }

    /// Format the report as markdown, limited to the semesters selected by
    /// `filter` (see [`AggregateResult::filtered`]).
    pub fn to_markdown(&self, filter: Option<&str>) -> String {
        let mut md = String::new();

        md.push_str(&format!("## GPA Results ({})\n\n", self.branch));
        md.push_str(&format!(
            "**Cumulative GPA:** {:.2}\n\n",
            self.result.gpa
        ));
        md.push_str(&format!(
            "**Completed Credit Hours:** {} / {}\n\n",
            self.result.completed_hours, self.result.total_hours
        ));

        for semester in self.result.filtered(filter) {
            push_semester_markdown(&mut md, semester);
        }

        md
    }
}

fn push_semester_markdown(md: &mut String, semester: &SemesterSummary) {
    md.push_str(&format!("### {}\n\n", semester.name));
    md.push_str("| Course Name | Code | Credit Hours | Degree | Letter Grade |\n");
    md.push_str("|-------------|------|--------------|--------|--------------|\n");
    for c in &semester.courses {
        let degree = c
            .raw_score
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_default();
        md.push_str(&format!(
            "| {} | {} | {} | {} | {} |\n",
            escape_cell(&c.name),
            escape_cell(&c.code),
            c.hours,
            escape_cell(&degree),
            c.letter
        ));
    }
    md.push('\n');
    if semester.total_hours > 0 {
        md.push_str(&format!("**Semester GPA:** {:.2}\n\n", semester.gpa()));
    }
}

fn escape_cell(s: &str) -> String {
    s.replace('|', "\\|")
}
