//! # lanegrid-engine
//!
//! Timeline grid engine: lays owner-grouped intervals onto a week-aligned
//! calendar grid.
//!
//! This crate provides:
//! - The day-indexed column axis with week and term header segments
//! - First-fit row packing (minimum rows per group)
//! - Stable identifier coloring
//! - Grid model assembly
//!
//! The engine performs no I/O and never fails: bad records are skipped and
//! out-of-range dates are clamped, both reported as diagnostics.
//!
//! ## Example
//!
//! ```rust
//! use chrono::NaiveDate;
//! use lanegrid_core::{GridConfig, RawInterval};
//! use lanegrid_engine::GridBuilder;
//!
//! let raw = vec![
//!     RawInterval::new("A", "Alice", "2025-01-06", "2025-01-08"),
//!     RawInterval::new("B", "Alice", "2025-01-07", "2025-01-10"),
//!     RawInterval::new("C", "Bob", "2025-01-06", "2025-01-09"),
//! ];
//! let today = NaiveDate::from_ymd_opt(2025, 1, 6).unwrap();
//! let output = GridBuilder::new(GridConfig::default()).build(&raw, today);
//!
//! assert_eq!(output.grid.rows.len(), 3);
//! ```

pub mod assemble;
pub mod color;
pub mod columns;
pub mod grouping;
pub mod normalize;
pub mod packer;

pub use assemble::{assemble, GridModel, GridRow, GroupRun, PlacedInterval};
pub use color::ColorAssigner;
pub use columns::{
    Column, ColumnDay, ColumnSpan, DateColumnIndex, SpanResolution, TermSegment, WeekSegment,
};
pub use grouping::{group_intervals, order_groups, Group};
pub use normalize::{normalize, parse_date, Normalized};
pub use packer::{pack, peak_concurrency, Extent, PackedRow};

use chrono::NaiveDate;
use tracing::{debug, info_span, warn};

use lanegrid_core::{
    Diagnostic, DiagnosticCode, GridConfig, Interval, RawInterval, Skipped,
};

/// Result of one grid build
#[derive(Clone, Debug)]
pub struct BuildOutput {
    pub grid: GridModel,
    /// Records dropped during normalization
    pub skipped: Vec<Skipped>,
}

impl BuildOutput {
    /// Everything worth telling the user, most useful first: skipped
    /// records, layout anomalies, then a summary line
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        let mut out: Vec<Diagnostic> = self.skipped.iter().map(Skipped::to_diagnostic).collect();
        out.extend(self.grid.diagnostics.iter().cloned());
        out.push(self.summary());
        out
    }

    fn summary(&self) -> Diagnostic {
        let groups = self.grid.group_runs().len();
        Diagnostic::info(
            DiagnosticCode::I001LayoutSummary,
            format!(
                "{} intervals in {} rows across {} groups, {} columns ({} .. {})",
                self.grid.interval_count(),
                self.grid.row_count(),
                groups,
                self.grid.columns.len(),
                self.grid.columns.start(),
                self.grid.columns.end(),
            ),
        )
    }
}

/// Builds grids from raw interval lists with a fixed configuration
#[derive(Clone, Debug, Default)]
pub struct GridBuilder {
    config: GridConfig,
}

impl GridBuilder {
    pub fn new(config: GridConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    /// Normalize, group, index and assemble.
    ///
    /// `today` anchors the single empty week produced when no record
    /// survives normalization; it is not read from the clock.
    pub fn build(&self, raw: &[RawInterval], today: NaiveDate) -> BuildOutput {
        let Normalized { intervals, skipped } = normalize(raw);
        BuildOutput {
            grid: self.build_intervals(intervals, today),
            skipped,
        }
    }

    /// Build from already validated intervals
    pub fn build_intervals(&self, intervals: Vec<Interval>, today: NaiveDate) -> GridModel {
        let _span = info_span!("build_grid", intervals = intervals.len()).entered();

        let (min, max) = date_extent(&intervals).unwrap_or((today, today));
        let columns = DateColumnIndex::build(
            min,
            max,
            self.config.include_weekends,
            self.config.first_data_column,
        );
        debug!(start = %columns.start(), end = %columns.end(), columns = columns.len(), "built column index");

        let groups = group_intervals(intervals, &self.config.group_order);
        let mut colors = ColorAssigner::new(self.config.palette.clone());
        let mut grid = assemble(groups, columns, &self.config.terms, &mut colors);

        for (a, b) in self.config.terms.overlapping_terms() {
            warn!(first = %a.name, second = %b.name, "term catalog entries overlap");
            grid.diagnostics.push(
                Diagnostic::new(
                    DiagnosticCode::W003OverlappingTerms,
                    format!("terms '{}' and '{}' overlap", a.name, b.name),
                )
                .with_note(format!("days shared by both resolve to '{}'", a.name)),
            );
        }
        grid
    }
}

/// Earliest start and latest end over all intervals
pub fn date_extent(intervals: &[Interval]) -> Option<(NaiveDate, NaiveDate)> {
    let min = intervals.iter().map(|iv| iv.start).min()?;
    let max = intervals.iter().map(|iv| iv.end).max()?;
    Some((min, max))
}
