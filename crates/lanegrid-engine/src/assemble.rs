//! Grid model assembly
//!
//! Packs each group, stacks the resulting rows in group order and attaches
//! column spans and colors to every interval. Rows from the same group are
//! consecutive and share the group's label so consumers can merge label cells.

use serde::Serialize;
use tracing::{debug, warn};

use lanegrid_core::{Color, Diagnostic, DiagnosticCode, Interval, TermResolver};

use crate::color::ColorAssigner;
use crate::columns::{Column, ColumnSpan, DateColumnIndex, TermSegment, WeekSegment};
use crate::grouping::Group;
use crate::packer::{pack, peak_concurrency, Extent};

/// An interval with its resolved columns and color
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PlacedInterval {
    #[serde(flatten)]
    pub interval: Interval,
    pub span: ColumnSpan,
    pub color: Color,
}

/// One grid row
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct GridRow {
    pub group_key: String,
    pub label: String,
    pub intervals: Vec<PlacedInterval>,
}

/// Consecutive rows belonging to one group
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct GroupRun {
    pub group_key: String,
    pub label: String,
    pub first_row: usize,
    pub row_count: usize,
}

/// Complete layout description handed to a renderer
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct GridModel {
    pub columns: DateColumnIndex,
    pub week_segments: Vec<WeekSegment>,
    pub term_segments: Vec<TermSegment>,
    pub rows: Vec<GridRow>,
    /// Non-fatal anomalies met while laying out
    pub diagnostics: Vec<Diagnostic>,
}

impl GridModel {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn interval_count(&self) -> usize {
        self.rows.iter().map(|row| row.intervals.len()).sum()
    }

    /// Rows of one group, in order
    pub fn rows_for<'a>(&'a self, group_key: &'a str) -> impl Iterator<Item = &'a GridRow> + 'a {
        self.rows.iter().filter(move |row| row.group_key == group_key)
    }

    /// Row ranges per group, for merging label cells
    pub fn group_runs(&self) -> Vec<GroupRun> {
        let mut runs: Vec<GroupRun> = Vec::new();
        for (index, row) in self.rows.iter().enumerate() {
            match runs.last_mut() {
                Some(run) if run.group_key == row.group_key => run.row_count += 1,
                _ => runs.push(GroupRun {
                    group_key: row.group_key.clone(),
                    label: row.label.clone(),
                    first_row: index,
                    row_count: 1,
                }),
            }
        }
        runs
    }

    /// Placed interval by id (first occurrence)
    pub fn find(&self, id: &str) -> Option<(usize, &PlacedInterval)> {
        self.rows.iter().enumerate().find_map(|(index, row)| {
            row.intervals
                .iter()
                .find(|placed| placed.interval.id == id)
                .map(|placed| (index, placed))
        })
    }

    /// Column from which the consumer may start showing the grid
    pub fn today_column(&self, today: chrono::NaiveDate) -> Option<Column> {
        self.columns.today_column(today)
    }
}

/// Stack packed groups into a grid.
///
/// Groups are consumed in the given order; the assembler does not reorder
/// them. Dates outside `columns` are clamped and reported, never fatal.
/// Intervals sharing a row never share a column.
pub fn assemble(
    groups: Vec<Group>,
    columns: DateColumnIndex,
    terms: &(impl TermResolver + ?Sized),
    colors: &mut ColorAssigner,
) -> GridModel {
    let mut rows = Vec::new();
    let mut diagnostics = Vec::new();

    for group in groups {
        // Rows are packed on drawn columns, not dates: weekend days and
        // clamped dates can map distinct dates onto the same column
        let spanned: Vec<Spanned> = group
            .intervals
            .into_iter()
            .map(|interval| resolve(interval, &columns, &mut diagnostics))
            .collect();
        let peak = peak_concurrency(&spanned);
        let packed = pack(spanned);
        debug!(group = %group.key, rows = packed.len(), peak, "packed group");

        for packed_row in packed {
            let intervals = packed_row
                .into_iter()
                .map(|spanned| PlacedInterval {
                    color: colors.color_for(&spanned.interval.id),
                    span: spanned.span,
                    interval: spanned.interval,
                })
                .collect();
            rows.push(GridRow {
                group_key: group.key.clone(),
                label: group.label.clone(),
                intervals,
            });
        }
    }

    GridModel {
        week_segments: columns.week_segments(),
        term_segments: columns.term_segments(terms),
        columns,
        rows,
        diagnostics,
    }
}

/// An interval with its resolved columns, packed by span
struct Spanned {
    interval: Interval,
    span: ColumnSpan,
}

impl Extent for Spanned {
    type Point = Column;

    fn start(&self) -> Column {
        self.span.start
    }

    fn end(&self) -> Column {
        self.span.end
    }
}

fn resolve(
    interval: Interval,
    columns: &DateColumnIndex,
    diagnostics: &mut Vec<Diagnostic>,
) -> Spanned {
    let resolution = columns.resolve_span(interval.start, interval.end);
    if resolution.clamped {
        warn!(
            id = %interval.id,
            start = %interval.start,
            end = %interval.end,
            "interval outside column index, clamped"
        );
        diagnostics.push(
            Diagnostic::new(
                DiagnosticCode::W001DateClamped,
                format!(
                    "interval '{}' ({} .. {}) lies outside the grid ({} .. {}); clamped to columns {}-{}",
                    interval.id,
                    interval.start,
                    interval.end,
                    columns.start(),
                    columns.end(),
                    resolution.span.start,
                    resolution.span.end,
                ),
            )
            .with_interval(interval.id.clone()),
        );
    }

    Spanned {
        span: resolution.span,
        interval,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use lanegrid_core::TermSource;
    use pretty_assertions::assert_eq;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn iv(id: &str, group: &str, start: NaiveDate, end: NaiveDate) -> Interval {
        Interval::new(id, group, start, end)
    }

    #[test]
    fn rows_follow_group_order() {
        let columns = DateColumnIndex::build(date(2025, 1, 6), date(2025, 1, 10), false, 1);
        let groups = vec![
            Group::new("bob").with_intervals(vec![iv("C", "bob", date(2025, 1, 6), date(2025, 1, 9))]),
            Group::new("alice").with_intervals(vec![
                iv("A", "alice", date(2025, 1, 6), date(2025, 1, 8)),
                iv("B", "alice", date(2025, 1, 7), date(2025, 1, 10)),
            ]),
        ];
        let grid = assemble(groups, columns, &TermSource::None, &mut ColorAssigner::default());

        let keys: Vec<&str> = grid.rows.iter().map(|r| r.group_key.as_str()).collect();
        assert_eq!(keys, vec!["bob", "alice", "alice"]);
        assert_eq!(
            grid.group_runs(),
            vec![
                GroupRun { group_key: "bob".into(), label: "bob".into(), first_row: 0, row_count: 1 },
                GroupRun { group_key: "alice".into(), label: "alice".into(), first_row: 1, row_count: 2 },
            ]
        );
        assert!(grid.diagnostics.is_empty());
        assert_eq!(grid.interval_count(), 3);
    }

    #[test]
    fn out_of_range_interval_is_clamped_and_reported() {
        let columns = DateColumnIndex::build(date(2025, 1, 6), date(2025, 1, 10), false, 1);
        let groups = vec![Group::new("g").with_intervals(vec![iv(
            "late",
            "g",
            date(2025, 1, 9),
            date(2025, 2, 14),
        )])];
        let grid = assemble(groups, columns, &TermSource::None, &mut ColorAssigner::default());

        let (row, placed) = grid.find("late").unwrap();
        assert_eq!(row, 0);
        assert_eq!(placed.span, ColumnSpan { start: 4, end: 5 });
        assert_eq!(grid.diagnostics.len(), 1);
        assert_eq!(grid.diagnostics[0].code, DiagnosticCode::W001DateClamped);
        assert_eq!(grid.diagnostics[0].interval_id.as_deref(), Some("late"));
    }

    #[test]
    fn recurring_ids_share_a_color_across_groups() {
        let columns = DateColumnIndex::build(date(2025, 1, 6), date(2025, 1, 10), false, 1);
        let day = date(2025, 1, 6);
        let groups = vec![
            Group::new("alice").with_intervals(vec![iv("PROJ-1", "alice", day, day)]),
            Group::new("bob").with_intervals(vec![
                iv("PROJ-2", "bob", day, day),
                iv("PROJ-1", "bob", date(2025, 1, 7), date(2025, 1, 7)),
            ]),
        ];
        let mut colors = ColorAssigner::default();
        let grid = assemble(groups, columns, &TermSource::None, &mut colors);

        let alice = &grid.rows[0].intervals[0];
        let bob_row = grid.rows_for("bob").next().unwrap();
        assert_eq!(bob_row.intervals.len(), 2);
        assert_eq!(bob_row.intervals[1].color, alice.color);
        assert_ne!(bob_row.intervals[0].color, alice.color);
        assert_eq!(colors.assigned(), 2);
    }

    #[test]
    fn empty_groups_produce_no_rows() {
        let columns = DateColumnIndex::build(date(2025, 1, 6), date(2025, 1, 6), false, 1);
        let grid = assemble(vec![Group::new("idle")], columns, &TermSource::None, &mut ColorAssigner::default());
        assert_eq!(grid.row_count(), 0);
        assert_eq!(grid.week_segments.len(), 1);
        assert_eq!(grid.term_segments.len(), 1);
    }

    #[test]
    fn grid_model_serializes_flat_intervals() {
        let columns = DateColumnIndex::build(date(2025, 1, 6), date(2025, 1, 6), false, 1);
        let day = date(2025, 1, 7);
        let groups = vec![Group::new("g").with_intervals(vec![iv("X", "g", day, day)])];
        let grid = assemble(groups, columns, &TermSource::None, &mut ColorAssigner::default());

        let json = serde_json::to_value(&grid).unwrap();
        let placed = &json["rows"][0]["intervals"][0];
        assert_eq!(placed["id"], "X");
        assert_eq!(placed["start"], "2025-01-07");
        assert_eq!(placed["span"]["start"], 2);
        assert_eq!(placed["color"], "#f4cccc");
    }

    #[test]
    fn weekend_interval_does_not_share_a_row_with_its_friday() {
        // Sat-Sun has no columns in work-week mode and is drawn on Friday
        let columns = DateColumnIndex::build(date(2025, 1, 6), date(2025, 1, 12), false, 1);
        let groups = vec![Group::new("alice").with_intervals(vec![
            iv("FRI", "alice", date(2025, 1, 10), date(2025, 1, 10)),
            iv("WKND", "alice", date(2025, 1, 11), date(2025, 1, 12)),
        ])];
        let grid = assemble(groups, columns, &TermSource::None, &mut ColorAssigner::default());

        assert_eq!(grid.row_count(), 2);
        let (fri_row, fri) = grid.find("FRI").unwrap();
        let (wknd_row, wknd) = grid.find("WKND").unwrap();
        assert_eq!(fri.span, ColumnSpan { start: 5, end: 5 });
        assert_eq!(wknd.span, ColumnSpan { start: 5, end: 5 });
        assert_ne!(fri_row, wknd_row);
    }

    #[test]
    fn clamped_intervals_collapsing_onto_one_column_stack() {
        let columns = DateColumnIndex::build(date(2025, 1, 6), date(2025, 1, 10), false, 1);
        let groups = vec![Group::new("g").with_intervals(vec![
            iv("feb", "g", date(2025, 2, 3), date(2025, 2, 4)),
            iv("mar", "g", date(2025, 3, 3), date(2025, 3, 4)),
        ])];
        let grid = assemble(groups, columns, &TermSource::None, &mut ColorAssigner::default());

        assert_eq!(grid.row_count(), 2);
        assert_eq!(grid.diagnostics.len(), 2);
    }
}
