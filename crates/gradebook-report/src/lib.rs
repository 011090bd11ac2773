//! Report generation for gradebook.
//!
//! Renders a `GpaReport` into a self-contained HTML page.

pub mod html;
