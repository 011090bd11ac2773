//! HTML report generator.
//!
//! Produces a self-contained HTML file with all CSS/JS inlined: cumulative
//! totals, a per-semester GPA chart, one table per semester, and a semester
//! filter control.

use anyhow::Result;
use std::path::Path;

use gradebook_core::aggregate::SemesterSummary;
use gradebook_core::report::GpaReport;

/// Escape a string for safe HTML insertion.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

/// Generate an HTML report from a GPA report.
pub fn generate_html(report: &GpaReport) -> String {
    let result = &report.result;
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str(&format!(
        "<title>GPA report: {}</title>\n",
        html_escape(&report.branch.to_string())
    ));
    html.push_str("<style>\n");
    html.push_str(CSS);
    html.push_str("</style>\n");
    html.push_str("</head>\n<body>\n");

    // Header
    html.push_str("<header>\n");
    html.push_str("<h1>Results</h1>\n");
    html.push_str(&format!(
        "<p class=\"meta\">Branch: <strong>{}</strong> | {} semesters | {}</p>\n",
        html_escape(&report.branch.to_string()),
        result.semesters.len(),
        report.created_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    html.push_str("</header>\n");

    // Summary
    html.push_str("<section class=\"dashboard\">\n");
    html.push_str(&format!(
        "<p><strong>Cumulative GPA:</strong> {:.2}</p>\n",
        result.gpa
    ));
    html.push_str(&format!(
        "<p><strong>Completed Credit Hours:</strong> {} / {}</p>\n",
        result.completed_hours, result.total_hours
    ));
    if result.semesters.iter().any(|s| s.total_hours > 0) {
        html.push_str(&generate_gpa_chart(&result.semesters));
    }
    html.push_str("</section>\n");

    // Semester filter
    if !result.semesters.is_empty() {
        html.push_str("<label for=\"semester-select\">Semester: </label>\n");
        html.push_str("<select id=\"semester-select\" onchange=\"filterSemesters(this.value)\">\n");
        html.push_str("<option value=\"all\">All Semesters</option>\n");
        for s in &result.semesters {
            html.push_str(&format!(
                "<option value=\"{}\">{}</option>\n",
                html_escape(&s.id),
                html_escape(&s.name)
            ));
        }
        html.push_str("</select>\n");
    }

    // Semester tables
    html.push_str("<section class=\"semesters\">\n");
    for s in &result.semesters {
        html.push_str(&render_semester_table(s));
    }
    html.push_str("</section>\n");

    // Raw JSON
    html.push_str("<section class=\"raw-data\">\n");
    html.push_str("<details>\n<summary>Raw JSON Data</summary>\n");
    html.push_str("<pre><code>");
    html.push_str(&html_escape(
        &serde_json::to_string_pretty(report).unwrap_or_default(),
    ));
    html.push_str("</code></pre>\n");
    html.push_str("</details>\n</section>\n");

    html.push_str("<script>\n");
    html.push_str(JS);
    html.push_str("</script>\n");

    html.push_str("</body>\n</html>");
    html
}

/// Render one semester as a heading, a course table, and its GPA line.
pub fn render_semester_table(semester: &SemesterSummary) -> String {
    let mut html = format!(
        "<div class=\"semester\" data-semester=\"{}\">\n<h3>{}</h3>\n",
        html_escape(&semester.id),
        html_escape(&semester.name)
    );
    html.push_str("<table class=\"gpa-table\">\n");
    html.push_str("<thead><tr><th>Course Name</th><th>Code</th><th>Credit Hours</th><th>Degree</th><th>Letter Grade</th></tr></thead>\n");
    html.push_str("<tbody>\n");

    for c in &semester.courses {
        let class = match c.letter.as_str() {
            "F" => "fail",
            "N/A" => "na",
            _ => "pass",
        };
        let degree = c
            .raw_score
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_default();
        html.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td class=\"{}\">{}</td></tr>\n",
            html_escape(&c.name),
            html_escape(&c.code),
            c.hours,
            html_escape(&degree),
            class,
            html_escape(&c.letter)
        ));
    }

    html.push_str("</tbody></table>\n");
    if semester.total_hours > 0 {
        html.push_str(&format!(
            "<p><strong>Semester GPA:</strong> {:.2}</p>\n",
            semester.gpa()
        ));
    }
    html.push_str("</div>\n");
    html
}

/// Write an HTML report to a file.
pub fn write_html_report(report: &GpaReport, path: &Path) -> Result<()> {
    let html = generate_html(report);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, html)?;
    Ok(())
}

/// Horizontal bar per semester, scaled against a 4.0 maximum.
fn generate_gpa_chart(semesters: &[SemesterSummary]) -> String {
    const MAX_GPA: f64 = 4.0;
    let bar_height = 24;
    let max_width = 400;
    let padding = 8;
    let label_width = 160;

    let rows: Vec<(&str, f64)> = semesters
        .iter()
        .filter(|s| s.total_hours > 0)
        .map(|s| (s.name.as_str(), s.gpa()))
        .collect();

    let total_height = rows.len() * (bar_height + padding) + padding;

    let mut svg = format!(
        "<svg width=\"{}\" height=\"{}\" xmlns=\"http://www.w3.org/2000/svg\">\n",
        label_width + max_width + 60,
        total_height
    );

    for (i, (name, gpa)) in rows.iter().enumerate() {
        let y = i * (bar_height + padding) + padding;
        let width = ((gpa / MAX_GPA).clamp(0.0, 1.0) * max_width as f64) as usize;

        let color = if *gpa >= 3.0 {
            "#22c55e"
        } else if *gpa >= 2.0 {
            "#eab308"
        } else {
            "#ef4444"
        };

        svg.push_str(&format!(
            "  <text x=\"{}\" y=\"{}\" font-size=\"13\" fill=\"currentColor\" text-anchor=\"end\" dominant-baseline=\"middle\">{}</text>\n",
            label_width - 10,
            y + bar_height / 2,
            html_escape(name)
        ));
        svg.push_str(&format!(
            "  <rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"{}\" rx=\"4\"/>\n",
            label_width, y, width, bar_height, color
        ));
        svg.push_str(&format!(
            "  <text x=\"{}\" y=\"{}\" font-size=\"12\" fill=\"currentColor\" dominant-baseline=\"middle\">{:.2}</text>\n",
            label_width + width + 8,
            y + bar_height / 2,
            gpa
        ));
    }

    svg.push_str("</svg>\n");
    svg
}

const CSS: &str = r#"
:root { --bg: #fff; --fg: #1a1a1a; --border: #e5e7eb; --pass: #dcfce7; --fail: #fde2e2; --na: #f3f4f6; }
@media (prefers-color-scheme: dark) {
  :root { --bg: #111827; --fg: #f9fafb; --border: #374151; --pass: #064e3b; --fail: #7f1d1d; --na: #1f2937; }
}
body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif; margin: 0; padding: 2rem; background: var(--bg); color: var(--fg); }
h1, h3 { margin-top: 2rem; }
.meta { color: #6b7280; }
table { border-collapse: collapse; width: 100%; margin: 1rem 0; }
th, td { border: 1px solid var(--border); padding: 0.5rem 1rem; text-align: left; }
th { background: var(--border); }
.pass { background: var(--pass); }
.fail { background: var(--fail); }
.na { background: var(--na); }
select { margin: 1rem 0; padding: 0.25rem 0.5rem; }
pre { overflow-x: auto; padding: 1rem; background: var(--border); border-radius: 8px; }
code { font-family: 'JetBrains Mono', 'Fira Code', monospace; font-size: 0.85rem; }
details { margin: 1rem 0; }
summary { cursor: pointer; font-weight: bold; }
svg { margin: 1rem 0; }
"#;

const JS: &str = r#"
function filterSemesters(value) {
  document.querySelectorAll('.semester').forEach(el => {
    el.style.display = (value === 'all' || el.dataset.semester === value) ? '' : 'none';
  });
}
"#;
