//! Grading scales, curriculum indexing, and transcript aggregation.
//!
//! This crate holds the pure grading pipeline: scoring a raw mark under a
//! branch's grading scale, flattening a curriculum definition into a
//! code-keyed index, and folding a transcript into per-semester and
//! cumulative GPA summaries.

pub mod aggregate;
pub mod curriculum;
pub mod error;
pub mod model;
pub mod parser;
pub mod report;
pub mod scale;

pub use aggregate::{aggregate, AggregateResult, CourseRow, SemesterSummary};
pub use curriculum::{CourseRecord, CurriculumIndex, CurriculumShape};
pub use error::InputError;
pub use model::{Branch, RawScore, TranscriptEntry};
pub use scale::{grade_for, GradeResult, GradeScale};
