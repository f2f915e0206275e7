//! Diagnostics produced while building a grid
//!
//! Nothing the engine encounters is fatal. Dropped records, clamped dates and
//! suspicious configuration are collected as [`Diagnostic`]s and handed back
//! to the caller next to the grid model.
//!
//! Codes are stable API:
//!
//! | Code | Severity | Meaning |
//! |------|----------|---------|
//! | W001 | warning | interval date outside the column index, clamped |
//! | W002 | warning | interval dropped during normalization |
//! | W003 | warning | term catalog ranges overlap (first match wins) |
//! | I001 | info    | layout summary |

use serde::Serialize;

/// Diagnostic severity, most severe first
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Info => "info",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stable diagnostic codes
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum DiagnosticCode {
    /// Interval date fell outside the column index and was clamped
    W001DateClamped,
    /// Interval dropped because a date could not be parsed or a key was missing
    W002IntervalSkipped,
    /// Two catalog terms share days
    W003OverlappingTerms,
    /// Rows, groups and columns produced by a layout run
    I001LayoutSummary,
}

impl DiagnosticCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiagnosticCode::W001DateClamped => "W001",
            DiagnosticCode::W002IntervalSkipped => "W002",
            DiagnosticCode::W003OverlappingTerms => "W003",
            DiagnosticCode::I001LayoutSummary => "I001",
        }
    }

    pub fn default_severity(&self) -> Severity {
        match self {
            DiagnosticCode::W001DateClamped
            | DiagnosticCode::W002IntervalSkipped
            | DiagnosticCode::W003OverlappingTerms => Severity::Warning,
            DiagnosticCode::I001LayoutSummary => Severity::Info,
        }
    }
}

impl std::fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single diagnostic message
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub code: DiagnosticCode,
    pub severity: Severity,
    pub message: String,
    /// Interval the diagnostic refers to, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interval_id: Option<String>,
    /// Additional `note:` lines
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<String>,
}

impl Diagnostic {
    /// Create a diagnostic with the code's default severity
    pub fn new(code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self {
            severity: code.default_severity(),
            code,
            message: message.into(),
            interval_id: None,
            notes: Vec::new(),
        }
    }

    pub fn warning(code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self::new(code, message).severity(Severity::Warning)
    }

    pub fn info(code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self::new(code, message).severity(Severity::Info)
    }

    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    pub fn with_interval(mut self, id: impl Into<String>) -> Self {
        let id = id.into();
        self.interval_id = if id.is_empty() { None } else { Some(id) };
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }
}

/// Sink for diagnostics (terminal, JSON)
pub trait DiagnosticEmitter {
    fn emit(&mut self, diagnostic: Diagnostic);
}
