//! # lanegrid-core
//!
//! Core domain model and traits for the lanegrid timeline engine.
//!
//! This crate provides:
//! - Domain types: `Interval`, `RawInterval`, `Term`, `Color`, `Palette`
//! - Term resolution: the `TermResolver` trait and `TermSource`
//! - Grid configuration: `GridConfig`, `GroupOrder`
//! - Diagnostics and error types
//!
//! ## Example
//!
//! ```rust
//! use chrono::NaiveDate;
//! use lanegrid_core::{Interval, Palette};
//!
//! let start = NaiveDate::from_ymd_opt(2025, 1, 6).unwrap();
//! let end = NaiveDate::from_ymd_opt(2025, 1, 8).unwrap();
//! let interval = Interval::new("PROJ-1", "alice", start, end).label("Billing revamp");
//!
//! assert_eq!(interval.group_key, "alice");
//! assert_eq!(Palette::default().len(), 19);
//! ```

pub mod config;
pub mod diagnostics;
pub mod term;

pub use config::{GridConfig, GroupOrder};
pub use diagnostics::{Diagnostic, DiagnosticCode, DiagnosticEmitter, Severity};
pub use term::{MonthRule, Term, TermResolver, TermSource};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// Type Aliases
// ============================================================================

/// Identifier of an interval (project code, engagement id, milestone id)
pub type IntervalId = String;

/// Key of the group an interval is packed within (owner, customer, "milestone")
pub type GroupKey = String;

// ============================================================================
// Interval
// ============================================================================

/// A labeled, closed date range belonging to one group.
///
/// `start <= end` always holds: the constructor clamps an end that falls
/// before the start.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interval {
    /// Identifier used for coloring
    pub id: IntervalId,
    /// Owner / group the interval is packed within
    pub group_key: GroupKey,
    /// Text shown on the bar
    pub label: String,
    /// First day (inclusive)
    pub start: NaiveDate,
    /// Last day (inclusive)
    pub end: NaiveDate,
    /// Optional link target carried through to the consumer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

impl Interval {
    /// Create a new interval; the label defaults to the id
    pub fn new(
        id: impl Into<String>,
        group_key: impl Into<String>,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Self {
        let id = id.into();
        Self {
            label: id.clone(),
            id,
            group_key: group_key.into(),
            start,
            end: end.max(start),
            link: None,
        }
    }

    /// Set the label
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Set the link target
    pub fn link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }

    /// Closed-range overlap: sharing a single day counts
    pub fn overlaps(&self, other: &Interval) -> bool {
        self.start <= other.end && self.end >= other.start
    }

    /// Whether the interval covers the given day
    pub fn contains(&self, day: NaiveDate) -> bool {
        day >= self.start && day <= self.end
    }

    /// Number of calendar days covered (at least 1)
    pub fn calendar_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}

/// An interval as supplied by a data source, before date validation.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawInterval {
    #[serde(default)]
    pub id: String,
    #[serde(default, alias = "owner", alias = "group")]
    pub group_key: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub start: String,
    #[serde(default)]
    pub end: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

impl RawInterval {
    pub fn new(
        id: impl Into<String>,
        group_key: impl Into<String>,
        start: impl Into<String>,
        end: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            group_key: group_key.into(),
            label: String::new(),
            start: start.into(),
            end: end.into(),
            link: None,
        }
    }

    /// Set the label
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }
}

/// An input record that was dropped during normalization
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Skipped {
    /// Id of the offending record (may be empty)
    pub id: String,
    /// Position of the record in the input list
    pub index: usize,
    pub reason: SkipReason,
}

impl Skipped {
    pub fn to_diagnostic(&self) -> Diagnostic {
        let subject = if self.id.is_empty() {
            format!("record #{}", self.index + 1)
        } else {
            format!("'{}'", self.id)
        };
        Diagnostic::warning(
            DiagnosticCode::W002IntervalSkipped,
            format!("skipped interval {}: {}", subject, self.reason),
        )
        .with_interval(self.id.clone())
    }
}

/// Why an input record was dropped
#[derive(Clone, Debug, PartialEq, Eq, Error, Serialize)]
pub enum SkipReason {
    #[error("invalid start date '{0}'")]
    InvalidStart(String),

    #[error("invalid end date '{0}'")]
    InvalidEnd(String),

    #[error("missing group key")]
    MissingGroup,
}

// ============================================================================
// Colors
// ============================================================================

/// A `#rrggbb` color
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color(String);

impl Color {
    /// Parse a `#rrggbb` (or `rrggbb`) hex color; stored lowercase with `#`
    pub fn parse(text: &str) -> Result<Self, ColorError> {
        let hex = text.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ColorError::Invalid(text.to_string()));
        }
        Ok(Self(format!("#{}", hex.to_ascii_lowercase())))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for Color {
    type Err = ColorError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Color {
    type Error = ColorError;
    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.0
    }
}

/// Pastel colors that keep dark bar labels readable
const DEFAULT_PALETTE: [&str; 19] = [
    "#f4cccc", "#fce5cd", "#fff2cc", "#d9ead3", "#d0e0e3", "#cfe2f3", "#d9d2e9", "#ead1dc",
    "#ea9999", "#f9cb9c", "#ffe599", "#b6d7a8", "#a2c4c9", "#9fc5e8", "#b4a7d6", "#d5a6bd",
    "#e6b8af", "#c9daf8", "#d9d9d9",
];

/// Ordered, non-empty list of colors handed out by a color assigner
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Color>", into = "Vec<Color>")]
pub struct Palette {
    colors: Vec<Color>,
}

impl Palette {
    pub fn new(colors: Vec<Color>) -> Result<Self, ConfigError> {
        if colors.is_empty() {
            return Err(ConfigError::EmptyPalette);
        }
        Ok(Self { colors })
    }

    /// Build a palette from hex strings
    pub fn from_hex<S: AsRef<str>>(colors: &[S]) -> Result<Self, ConfigError> {
        let colors = colors
            .iter()
            .map(|c| Color::parse(c.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(colors)
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Always false; kept for API symmetry with `len`
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Color at `n`, cycling past the end
    pub fn cycled(&self, n: usize) -> &Color {
        &self.colors[n % self.colors.len()]
    }

    pub fn colors(&self) -> &[Color] {
        &self.colors
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            colors: DEFAULT_PALETTE
                .iter()
                .map(|hex| Color(hex.to_string()))
                .collect(),
        }
    }
}

impl TryFrom<Vec<Color>> for Palette {
    type Error = ConfigError;
    fn try_from(colors: Vec<Color>) -> Result<Self, Self::Error> {
        Self::new(colors)
    }
}

impl From<Palette> for Vec<Color> {
    fn from(palette: Palette) -> Self {
        palette.colors
    }
}

// ============================================================================
// Errors
// ============================================================================

/// Invalid color text
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ColorError {
    #[error("invalid color '{0}': expected #rrggbb")]
    Invalid(String),
}

/// Configuration error, reported before any layout work starts
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("palette must contain at least one color")]
    EmptyPalette,

    #[error(transparent)]
    Color(#[from] ColorError),

    #[error("term '{name}' ends ({end}) before it starts ({start})")]
    InvertedTerm {
        name: String,
        start: NaiveDate,
        end: NaiveDate,
    },

    #[error("month rule '{label}': month {month} is outside 1..=12")]
    InvalidMonth { label: String, month: u32 },
}

// ============================================================================
// Tests
// ============================================================================
