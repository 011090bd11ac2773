//! Grading scales: raw score to letter grade and grade points.
//!
//! Two scales exist. The standard scale uses fixed breakpoints with a
//! constant value per letter; the banded scale interpolates points linearly
//! inside each score band. Both are total: anything that does not parse as a
//! score grades as `N/A` with zero points.

use serde::Serialize;

use crate::model::RawScore;

/// Letter reported for scores that cannot be parsed.
pub const NOT_AVAILABLE: &str = "N/A";

/// A named grading scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GradeScale {
    /// Fixed breakpoints, one points value per letter.
    Standard,
    /// Half-open score bands with interpolated points.
    Banded,
}

/// Letter grade and grade-point value for one score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GradeResult {
    pub letter: &'static str,
    pub points: f64,
}

impl GradeResult {
    const fn new(letter: &'static str, points: f64) -> Self {
        Self { letter, points }
    }

    /// Sentinel for unparsable input.
    pub const fn not_available() -> Self {
        Self::new(NOT_AVAILABLE, 0.0)
    }

    pub fn is_available(&self) -> bool {
        self.letter != NOT_AVAILABLE
    }
}

const FAILING: GradeResult = GradeResult::new("F", 0.0);

/// Minimum score for each standard letter, highest first.
const STANDARD_BREAKPOINTS: [(f64, GradeResult); 12] = [
    (96.0, GradeResult::new("A+", 4.0)),
    (92.0, GradeResult::new("A", 3.7)),
    (88.0, GradeResult::new("A-", 3.4)),
    (84.0, GradeResult::new("B+", 3.2)),
    (80.0, GradeResult::new("B", 3.0)),
    (76.0, GradeResult::new("B-", 2.8)),
    (72.0, GradeResult::new("C+", 2.6)),
    (68.0, GradeResult::new("C", 2.4)),
    (64.0, GradeResult::new("C-", 2.2)),
    (60.0, GradeResult::new("D+", 2.0)),
    (55.0, GradeResult::new("D", 1.5)),
    (50.0, GradeResult::new("D-", 1.0)),
];

/// One row of the banded scale: `[lower, upper)` maps into `[gpa_min, gpa_max]`.
#[derive(Debug, Clone, Copy)]
struct Band {
    lower: f64,
    upper: f64,
    gpa_min: f64,
    gpa_max: f64,
    letter: &'static str,
}

const fn band(lower: f64, upper: f64, gpa_min: f64, gpa_max: f64, letter: &'static str) -> Band {
    Band {
        lower,
        upper,
        gpa_min,
        gpa_max,
        letter,
    }
}

/// Upper bound of the scale; the band ending here is closed on the right.
const MAX_SCORE: f64 = 100.0;

const BANDS: [Band; 10] = [
    band(95.0, 100.0, 3.7, 4.0, "A+"),
    band(90.0, 95.0, 3.4, 3.7, "A"),
    band(85.0, 90.0, 3.1, 3.4, "A-"),
    band(80.0, 85.0, 2.8, 3.1, "B+"),
    band(75.0, 80.0, 2.5, 2.8, "B"),
    band(70.0, 75.0, 2.2, 2.5, "C+"),
    band(65.0, 70.0, 1.9, 2.2, "C"),
    band(60.0, 65.0, 1.6, 1.9, "D+"),
    band(50.0, 60.0, 1.0, 1.6, "D"),
    band(0.0, 50.0, 0.0, 0.0, "F"),
];

impl Band {
    fn contains(&self, score: f64) -> bool {
        (score >= self.lower && score < self.upper)
            || (self.upper == MAX_SCORE && score == MAX_SCORE)
    }

    fn points(&self, score: f64) -> f64 {
        let gpa = if self.gpa_min == self.gpa_max {
            self.gpa_min
        } else {
            self.gpa_min
                + (self.gpa_max - self.gpa_min) * (score - self.lower) / (self.upper - self.lower)
        };
        (gpa * 100.0).round() / 100.0
    }
}

impl GradeScale {
    /// Grade an already-parsed score.
    pub fn grade_score(self, score: f64) -> GradeResult {
        if !score.is_finite() {
            return GradeResult::not_available();
        }
        match self {
            GradeScale::Standard => standard_for_score(score),
            GradeScale::Banded => banded_for_score(score),
        }
    }

    /// Grade a score given as text.
    pub fn grade_text(self, raw: &str) -> GradeResult {
        match parse_score(raw) {
            Some(score) => self.grade_score(score),
            None => GradeResult::not_available(),
        }
    }
}

/// Grade a raw transcript score under `scale`. A missing score is `N/A`.
pub fn grade_for(scale: GradeScale, raw: Option<&RawScore>) -> GradeResult {
    match raw {
        Some(RawScore::Number(n)) => scale.grade_score(*n),
        Some(RawScore::Text(s)) => scale.grade_text(s),
        None => GradeResult::not_available(),
    }
}

/// Standard scale on text input.
pub fn standard_grade(raw: &str) -> GradeResult {
    GradeScale::Standard.grade_text(raw)
}

/// Banded scale on text input.
pub fn banded_grade(raw: &str) -> GradeResult {
    GradeScale::Banded.grade_text(raw)
}

fn standard_for_score(score: f64) -> GradeResult {
    STANDARD_BREAKPOINTS
        .iter()
        .find(|(min, _)| score >= *min)
        .map(|(_, grade)| *grade)
        .unwrap_or(FAILING)
}

fn banded_for_score(score: f64) -> GradeResult {
    BANDS
        .iter()
        .find(|b| b.contains(score))
        .map(|b| GradeResult::new(b.letter, b.points(score)))
        .unwrap_or(FAILING)
}

/// Parse the leading decimal number of `raw`, ignoring leading whitespace
/// and any trailing garbage (`"85abc"` reads as 85). Returns `None` when no
/// digits lead the string or the value is not finite.
pub fn parse_score(raw: &str) -> Option<f64> {
    let s = raw.trim_start();
    let bytes = s.as_bytes();
    let digits_from = |start: usize| {
        bytes[start..]
            .iter()
            .take_while(|b| b.is_ascii_digit())
            .count()
    };

    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let int_digits = digits_from(end);
    end += int_digits;

    let mut frac_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        frac_digits = digits_from(end + 1);
        if int_digits + frac_digits > 0 {
            end += 1 + frac_digits;
        }
    }
    if int_digits + frac_digits == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits = digits_from(exp_end);
        if exp_digits > 0 {
            end = exp_end + exp_digits;
        }
    }

    s[..end].parse::<f64>().ok().filter(|v| v.is_finite())
}
