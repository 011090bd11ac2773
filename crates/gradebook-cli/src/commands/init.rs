//! The `gradebook init` command.

use std::path::Path;

use anyhow::Result;

pub fn execute() -> Result<()> {
    for (path, content) in [
        ("gradebook.toml", SAMPLE_CONFIG),
        ("Curriculums.json", SAMPLE_CURRICULUM),
        ("transcript.json", SAMPLE_TRANSCRIPT),
    ] {
        if Path::new(path).exists() {
            println!("{path} already exists, skipping.");
        } else {
            std::fs::write(path, content)?;
            println!("Created {path}");
        }
    }

    println!("\nNext steps:");
    println!("  1. Replace Curriculums.json with your program's curriculum");
    println!("  2. Run: gradebook validate");
    println!("  3. Run: gradebook calculate --transcript transcript.json");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# gradebook configuration

curriculum = "Curriculums.json"
default_branch = "general"
default_format = "text"
"#;

const SAMPLE_CURRICULUM: &str = r#"{
  "General": {
    "CS101": {"name": "Intro to Computing", "credit_hours": 3},
    "CS102": {"name": "Data Structures", "credit_hours": 4, "prerequisites": ["CS101"]},
    "MTH101": {"name": "Calculus I", "credit_hours": 3},
    "UNI-101": {"name": "University Requirement", "credit_hours": 2}
  },
  "SoftwareEngineering": {
    "curriculum": {
      "Level 1": {
        "Semester 1": [
          {"code": "SWE101", "name": "Intro to Software Engineering", "credit_hours": 3},
          {"code": "CSE-111", "name": "Programming Fundamentals", "credit_hours": 4}
        ],
        "Semester 2": [
          {"code": "SWE102", "name": "Requirements Engineering", "credit_hours": 3, "prerequisites": ["SWE101"]},
          {"code": "UNI-102", "name": "Ethics", "credit_hours": 2}
        ]
      }
    }
  }
}
"#;

const SAMPLE_TRANSCRIPT: &str = r#"{
  "studentProgress": [
    {"crscode": "CS101|Intro to Computing", "Degree": "92", "yearsem": "20231", "semesterCourse": "20231|Fall 2023"},
    {"crscode": "CS102|Data Structures", "Degree": "55", "yearsem": "20231", "semesterCourse": "20231|Fall 2023"},
    {"crscode": "UNI-101|University Requirement", "Degree": "", "gradeN": "P", "yearsem": "20231", "semesterCourse": "20231|Fall 2023"},
    {"crscode": "MTH101|Calculus I", "Degree": "", "yearsem": "20232", "semesterCourse": "20232|Spring 2024"}
  ]
}
"#;
