//! The `gradebook validate` command.

use std::path::PathBuf;

use anyhow::Result;

use gradebook_core::model::Branch;
use gradebook_core::parser;
use gradebook_core::CurriculumIndex;

use crate::config::load_config_from;

pub fn execute(
    curriculum: Option<PathBuf>,
    branch: Option<String>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let path = config.curriculum_path(curriculum);
    let document = parser::load_curriculum_file(&path)?;

    // An explicit branch must be present; otherwise check whichever branches exist.
    let branches: Vec<Branch> = match branch {
        Some(name) => vec![name.parse::<Branch>()?],
        None => Branch::all()
            .into_iter()
            .filter(|b| parser::curriculum_for_branch(&document, *b).is_ok())
            .collect(),
    };
    anyhow::ensure!(
        !branches.is_empty(),
        "no branch curricula found in {}",
        path.display()
    );

    let mut total_warnings = 0;

    for branch in branches {
        let definition = parser::curriculum_for_branch(&document, branch)?;
        let index = CurriculumIndex::build(definition, branch.shape());
        println!("Branch: {branch} ({} courses)", index.len());

        let warnings = parser::validate_curriculum(definition, branch.shape());
        for w in &warnings {
            let prefix = w
                .code
                .as_ref()
                .map(|code| format!("  [{code}]"))
                .unwrap_or_else(|| "  ".to_string());
            println!("{prefix} WARNING: {}", w.message);
        }
        total_warnings += warnings.len();
    }

    if total_warnings == 0 {
        println!("All curricula valid.");
    } else {
        println!("\n{total_warnings} warning(s) found.");
    }

    Ok(())
}
