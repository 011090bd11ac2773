//! The `gradebook calculate` command.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use gradebook_core::aggregate::AggregateResult;
use gradebook_core::parser;
use gradebook_core::report::GpaReport;
use gradebook_report::html::{generate_html, write_html_report};

use crate::config::load_config_from;

/// Arguments for a single `calculate` invocation.
pub struct CalculateArgs {
    pub transcript: PathBuf,
    pub curriculum: Option<PathBuf>,
    pub branch: Option<String>,
    pub semester: Option<String>,
    pub format: Option<String>,
    pub output: Option<PathBuf>,
    pub config: Option<PathBuf>,
}

pub fn execute(args: CalculateArgs) -> Result<()> {
    let config = load_config_from(args.config.as_deref())?;

    let branch = config.branch(args.branch.as_deref())?;
    let curriculum_path = config.curriculum_path(args.curriculum);
    let format = args
        .format
        .unwrap_or_else(|| config.default_format.clone());
    let filter = args.semester.as_deref();

    let document = parser::load_curriculum_file(&curriculum_path)?;
    let index = parser::build_index(&document, branch)
        .with_context(|| format!("invalid curriculum: {}", curriculum_path.display()))?;
    let entries = parser::load_transcript_file(&args.transcript)?;

    tracing::info!(
        %branch,
        courses = index.len(),
        rows = entries.len(),
        "calculating GPA"
    );

    let result = gradebook_core::aggregate(&entries, &index, branch);
    let report = GpaReport::new(branch, result);

    tracing::info!(
        gpa = report.result.gpa,
        completed = report.result.completed_hours,
        total = report.result.total_hours,
        semesters = report.result.semesters.len(),
        "calculation complete"
    );

    match format.as_str() {
        "text" => emit(&render_text(&report.result, filter), args.output.as_deref()),
        "json" => match &args.output {
            Some(path) => {
                report.save_json(path)?;
                eprintln!("JSON report: {}", path.display());
                Ok(())
            }
            None => {
                println!("{}", serde_json::to_string_pretty(&report)?);
                Ok(())
            }
        },
        "markdown" | "md" => emit(&report.to_markdown(filter), args.output.as_deref()),
        "html" => match &args.output {
            Some(path) => {
                write_html_report(&report, path)?;
                eprintln!("HTML report: {}", path.display());
                Ok(())
            }
            None => {
                println!("{}", generate_html(&report));
                Ok(())
            }
        },
        other => anyhow::bail!("unknown format '{other}'. Expected: text, json, markdown, html"),
    }
}

fn emit(rendered: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, rendered)
                .with_context(|| format!("failed to write output to {}", path.display()))?;
            eprintln!("Output: {}", path.display());
        }
        None => print!("{rendered}"),
    }
    Ok(())
}

/// Cumulative totals followed by one table per selected semester.
fn render_text(result: &AggregateResult, filter: Option<&str>) -> String {
    use comfy_table::{Cell, Table};

    let mut out = format!(
        "Cumulative GPA: {:.2}\nCompleted Credit Hours: {} / {}\n",
        result.gpa, result.completed_hours, result.total_hours
    );

    for semester in result.filtered(filter) {
        let mut table = Table::new();
        table.set_header(vec![
            "Course Name",
            "Code",
            "Credit Hours",
            "Degree",
            "Letter Grade",
        ]);
        for c in &semester.courses {
            let degree = c
                .raw_score
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_default();
            table.add_row(vec![
                Cell::new(&c.name),
                Cell::new(&c.code),
                Cell::new(c.hours),
                Cell::new(degree),
                Cell::new(&c.letter),
            ]);
        }

        out.push_str(&format!("\n{}\n{table}\n", semester.name));
        if semester.total_hours > 0 {
            out.push_str(&format!("Semester GPA: {:.2}\n", semester.gpa()));
        }
    }
    out
}
