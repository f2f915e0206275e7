//! Day-indexed column axis
//!
//! The axis always covers whole weeks: it starts on the Monday of the first
//! requested day and ends on the Friday (work-week mode) or Sunday (full-week
//! mode) of the last one. In work-week mode Saturday and Sunday consume no
//! column at all.

use chrono::{Datelike, NaiveDate, Weekday};
use serde::Serialize;

use lanegrid_core::{Color, TermResolver};

/// Column number in the consumer's sheet (offset by `first_data_column`)
pub type Column = u32;

fn is_weekend(day: NaiveDate) -> bool {
    matches!(day.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Monday of the week containing `day`
pub fn week_start(day: NaiveDate) -> NaiveDate {
    day - chrono::Duration::days(i64::from(day.weekday().num_days_from_monday()))
}

/// Last indexed day of the week containing `day`
pub fn week_end(day: NaiveDate, include_weekends: bool) -> NaiveDate {
    let last_offset = if include_weekends { 6 } else { 4 };
    week_start(day) + chrono::Duration::days(last_offset)
}

/// One indexed day
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct ColumnDay {
    pub date: NaiveDate,
    pub column: Column,
    /// Saturday or Sunday (only ever true in full-week mode)
    pub weekend: bool,
}

/// Inclusive column range
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct ColumnSpan {
    pub start: Column,
    pub end: Column,
}

impl ColumnSpan {
    pub fn width(&self) -> u32 {
        self.end - self.start + 1
    }
}

/// Column span resolved for a date range
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SpanResolution {
    pub span: ColumnSpan,
    /// A date lay outside the indexed weeks and was pulled to the boundary
    pub clamped: bool,
}

/// Merged header cell for one calendar week
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct WeekSegment {
    pub start_column: Column,
    pub end_column: Column,
    /// `MM/DD-MM/DD`
    pub label: String,
}

/// Merged header cell for a run of days resolving to the same term
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TermSegment {
    pub start_column: Column,
    pub end_column: Column,
    /// Term name, empty when no term matched
    pub label: String,
    /// `None` for the no-term fallback
    pub color: Option<Color>,
}

impl TermSegment {
    pub fn has_term(&self) -> bool {
        self.color.is_some()
    }
}

/// Ordered mapping from calendar day to column
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DateColumnIndex {
    start: NaiveDate,
    end: NaiveDate,
    include_weekends: bool,
    first_column: Column,
    days: Vec<NaiveDate>,
}

impl DateColumnIndex {
    /// Build the axis covering `min..=max`, widened to whole weeks.
    ///
    /// A `max` before `min` yields the single week containing `min`.
    pub fn build(
        min: NaiveDate,
        max: NaiveDate,
        include_weekends: bool,
        first_column: Column,
    ) -> Self {
        let max = max.max(min);
        let start = week_start(min);
        let end = week_end(max, include_weekends);

        let days: Vec<NaiveDate> = start
            .iter_days()
            .take_while(|day| *day <= end)
            .filter(|day| include_weekends || !is_weekend(*day))
            .collect();

        Self {
            start,
            end,
            include_weekends,
            first_column,
            days,
        }
    }

    /// First indexed day (always a Monday)
    pub fn start(&self) -> NaiveDate {
        self.start
    }

    /// Last indexed day (Friday or Sunday)
    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn include_weekends(&self) -> bool {
        self.include_weekends
    }

    pub fn first_column(&self) -> Column {
        self.first_column
    }

    pub fn last_column(&self) -> Column {
        self.first_column + self.days.len() as Column - 1
    }

    /// Number of columns
    pub fn len(&self) -> usize {
        self.days.len()
    }

    /// Never true: the axis covers at least one week
    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Indexed days in column order
    pub fn days(&self) -> impl Iterator<Item = ColumnDay> + '_ {
        self.days.iter().enumerate().map(move |(i, &date)| ColumnDay {
            date,
            column: self.first_column + i as Column,
            weekend: is_weekend(date),
        })
    }

    /// Column of `day`; `None` for days outside the axis or without a column
    pub fn column_of(&self, day: NaiveDate) -> Option<Column> {
        if day < self.start || day > self.end {
            return None;
        }
        let offset = (day - self.start).num_days();
        let index = if self.include_weekends {
            offset
        } else if is_weekend(day) {
            return None;
        } else {
            (offset / 7) * 5 + offset % 7
        };
        Some(self.first_column + index as Column)
    }

    /// Day shown in `column`
    pub fn date_of(&self, column: Column) -> Option<NaiveDate> {
        let index = column.checked_sub(self.first_column)? as usize;
        self.days.get(index).copied()
    }

    /// Whether `column` shows a Saturday or Sunday
    pub fn is_weekend_column(&self, column: Column) -> bool {
        self.date_of(column).is_some_and(is_weekend)
    }

    /// First column showing `today` or a later day.
    ///
    /// `None` once `today` is past the end of the axis. Consumers use this to
    /// hide or scroll past earlier columns.
    pub fn today_column(&self, today: NaiveDate) -> Option<Column> {
        let index = self.days.partition_point(|day| *day < today);
        (index < self.days.len()).then(|| self.first_column + index as Column)
    }

    /// Sunday closing the last indexed week; weekend days up to it are inside
    /// the axis even when they have no column
    fn covered_end(&self) -> NaiveDate {
        week_start(self.end) + chrono::Duration::days(6)
    }

    fn snap_forward(&self, day: NaiveDate) -> Option<Column> {
        let index = self.days.partition_point(|d| *d < day);
        (index < self.days.len()).then(|| self.first_column + index as Column)
    }

    fn snap_backward(&self, day: NaiveDate) -> Option<Column> {
        let index = self.days.partition_point(|d| *d <= day);
        index
            .checked_sub(1)
            .map(|i| self.first_column + i as Column)
    }

    /// Resolve a closed date range to a column span.
    ///
    /// Dates outside the indexed weeks are clamped to the first or last
    /// column and reported through `clamped`. Weekend days without a column
    /// snap inward to the nearest weekday of the range; a range lying wholly
    /// on a weekend collapses onto the Friday before it.
    pub fn resolve_span(&self, start: NaiveDate, end: NaiveDate) -> SpanResolution {
        let end = end.max(start);
        let first = self.first_column();
        let last = self.last_column();
        let covered_end = self.covered_end();
        let mut clamped = false;

        let start_column = if start < self.start {
            clamped = true;
            first
        } else if start > covered_end {
            clamped = true;
            last
        } else {
            self.snap_forward(start).unwrap_or(last)
        };

        let end_column = if end > covered_end {
            clamped = true;
            last
        } else if end < self.start {
            clamped = true;
            first
        } else {
            self.snap_backward(end).unwrap_or(first)
        };

        SpanResolution {
            span: ColumnSpan {
                start: start_column.min(end_column),
                end: end_column,
            },
            clamped,
        }
    }

    /// One segment per calendar week, labeled `MM/DD-MM/DD`
    pub fn week_segments(&self) -> Vec<WeekSegment> {
        let mut segments: Vec<WeekSegment> = Vec::new();
        let mut current: Option<(NaiveDate, ColumnDay, ColumnDay)> = None;

        for day in self.days() {
            let monday = week_start(day.date);
            match &mut current {
                Some((week, _, last)) if *week == monday => *last = day,
                _ => {
                    if let Some((_, first, last)) = current.take() {
                        segments.push(week_segment(first, last));
                    }
                    current = Some((monday, day, day));
                }
            }
        }
        if let Some((_, first, last)) = current {
            segments.push(week_segment(first, last));
        }
        segments
    }

    /// Runs of adjacent columns resolving to the same term.
    ///
    /// Segments tile the whole axis: a change of term name, including a
    /// transition to or from "no term", closes the current segment. A term
    /// with an empty name is still distinct from "no term".
    pub fn term_segments(&self, resolver: &(impl TermResolver + ?Sized)) -> Vec<TermSegment> {
        let mut segments: Vec<TermSegment> = Vec::new();

        for day in self.days() {
            let term = resolver.resolve_term(day.date);
            let name = term.as_ref().map(|t| t.name.as_str());
            match segments.last_mut() {
                Some(segment)
                    if segment_name(segment) == name && segment.end_column + 1 == day.column =>
                {
                    segment.end_column = day.column;
                }
                _ => segments.push(TermSegment {
                    start_column: day.column,
                    end_column: day.column,
                    label: name.unwrap_or_default().to_string(),
                    color: term.map(|t| t.color),
                }),
            }
        }
        segments
    }
}

/// `None` for the no-term fallback, even next to a term named ""
fn segment_name(segment: &TermSegment) -> Option<&str> {
    segment.has_term().then_some(segment.label.as_str())
}

fn week_segment(first: ColumnDay, last: ColumnDay) -> WeekSegment {
    WeekSegment {
        start_column: first.column,
        end_column: last.column,
        label: format!("{}-{}", first.date.format("%m/%d"), last.date.format("%m/%d")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lanegrid_core::{Term, TermSource};
    use pretty_assertions::assert_eq;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn work_week_axis_extends_to_whole_weeks() {
        // Wed 2025-01-08 .. Tue 2025-01-14
        let index = DateColumnIndex::build(date(2025, 1, 8), date(2025, 1, 14), false, 1);
        assert_eq!(index.start(), date(2025, 1, 6));
        assert_eq!(index.end(), date(2025, 1, 17));
        assert_eq!(index.len(), 10);
        assert_eq!(index.first_column(), 1);
        assert_eq!(index.last_column(), 10);
    }

    #[test]
    fn full_week_axis_ends_on_sunday() {
        let index = DateColumnIndex::build(date(2025, 1, 8), date(2025, 1, 14), true, 0);
        assert_eq!(index.end(), date(2025, 1, 19));
        assert_eq!(index.len(), 14);
        assert!(index.is_weekend_column(5));
        assert!(!index.is_weekend_column(4));
    }

    #[test]
    fn column_lookup_skips_weekends() {
        let index = DateColumnIndex::build(date(2025, 1, 6), date(2025, 1, 17), false, 2);
        assert_eq!(index.column_of(date(2025, 1, 6)), Some(2));
        assert_eq!(index.column_of(date(2025, 1, 10)), Some(6));
        assert_eq!(index.column_of(date(2025, 1, 11)), None);
        assert_eq!(index.column_of(date(2025, 1, 13)), Some(7));
        assert_eq!(index.column_of(date(2025, 1, 20)), None);
        assert_eq!(index.date_of(7), Some(date(2025, 1, 13)));
        assert_eq!(index.date_of(1), None);
    }

    #[test]
    fn column_lookup_matches_day_walk() {
        for include_weekends in [false, true] {
            let index = DateColumnIndex::build(date(2024, 12, 30), date(2025, 3, 2), include_weekends, 1);
            for day in index.days() {
                assert_eq!(index.column_of(day.date), Some(day.column));
            }
        }
    }

    #[test]
    fn inverted_range_yields_one_week() {
        let index = DateColumnIndex::build(date(2025, 1, 9), date(2025, 1, 1), false, 1);
        assert_eq!(index.start(), date(2025, 1, 6));
        assert_eq!(index.end(), date(2025, 1, 10));
        assert_eq!(index.len(), 5);
    }

    #[test]
    fn saturday_max_in_work_week_mode() {
        let index = DateColumnIndex::build(date(2025, 1, 6), date(2025, 1, 11), false, 1);
        assert_eq!(index.end(), date(2025, 1, 10));
        let res = index.resolve_span(date(2025, 1, 9), date(2025, 1, 11));
        assert_eq!(res.span, ColumnSpan { start: 4, end: 5 });
        assert!(!res.clamped);
    }

    #[test]
    fn span_clamps_out_of_range_dates() {
        let index = DateColumnIndex::build(date(2025, 1, 6), date(2025, 1, 10), false, 1);
        let res = index.resolve_span(date(2024, 12, 20), date(2025, 1, 7));
        assert_eq!(res.span, ColumnSpan { start: 1, end: 2 });
        assert!(res.clamped);

        let res = index.resolve_span(date(2025, 1, 9), date(2025, 2, 1));
        assert_eq!(res.span, ColumnSpan { start: 4, end: 5 });
        assert!(res.clamped);

        let res = index.resolve_span(date(2025, 3, 1), date(2025, 3, 5));
        assert_eq!(res.span, ColumnSpan { start: 5, end: 5 });
        assert!(res.clamped);
    }

    #[test]
    fn weekend_only_range_collapses_to_friday() {
        let index = DateColumnIndex::build(date(2025, 1, 6), date(2025, 1, 17), false, 1);
        let res = index.resolve_span(date(2025, 1, 11), date(2025, 1, 12));
        assert_eq!(res.span, ColumnSpan { start: 5, end: 5 });
        assert_eq!(index.date_of(5), Some(date(2025, 1, 10)));
        assert!(!res.clamped);
    }

    #[test]
    fn weekend_edges_snap_inward() {
        let index = DateColumnIndex::build(date(2025, 1, 6), date(2025, 1, 17), false, 1);
        // Sat 01-11 .. Wed 01-15 starts Monday 01-13
        let res = index.resolve_span(date(2025, 1, 11), date(2025, 1, 15));
        assert_eq!(res.span, ColumnSpan { start: 6, end: 8 });
    }

    #[test]
    fn today_column_lookup() {
        let index = DateColumnIndex::build(date(2025, 1, 6), date(2025, 1, 17), false, 1);
        assert_eq!(index.today_column(date(2025, 1, 1)), Some(1));
        assert_eq!(index.today_column(date(2025, 1, 8)), Some(3));
        // Saturday: next Monday's column
        assert_eq!(index.today_column(date(2025, 1, 11)), Some(6));
        assert_eq!(index.today_column(date(2025, 1, 18)), None);
    }

    #[test]
    fn week_segments_label_each_week() {
        let index = DateColumnIndex::build(date(2025, 1, 6), date(2025, 1, 14), false, 1);
        let weeks = index.week_segments();
        assert_eq!(
            weeks,
            vec![
                WeekSegment { start_column: 1, end_column: 5, label: "01/06-01/10".into() },
                WeekSegment { start_column: 6, end_column: 10, label: "01/13-01/17".into() },
            ]
        );

        let full = DateColumnIndex::build(date(2024, 12, 30), date(2024, 12, 31), true, 1);
        assert_eq!(full.week_segments()[0].label, "12/30-01/05");
        assert_eq!(full.week_segments()[0].end_column, 7);
    }

    #[test]
    fn term_segments_split_on_term_change() {
        let gray = Color::parse("#cccccc").unwrap();
        let terms = TermSource::Catalog(vec![Term::new(
            "Sprint 1",
            date(2025, 1, 8),
            date(2025, 1, 14),
            gray.clone(),
        )]);
        let index = DateColumnIndex::build(date(2025, 1, 6), date(2025, 1, 17), false, 1);

        let segments = index.term_segments(&terms);
        assert_eq!(
            segments,
            vec![
                TermSegment { start_column: 1, end_column: 2, label: String::new(), color: None },
                TermSegment { start_column: 3, end_column: 7, label: "Sprint 1".into(), color: Some(gray) },
                TermSegment { start_column: 8, end_column: 10, label: String::new(), color: None },
            ]
        );
        assert!(segments[1].has_term());
    }

    #[test]
    fn no_terms_yields_single_neutral_segment() {
        let index = DateColumnIndex::build(date(2025, 1, 6), date(2025, 1, 31), true, 1);
        let segments = index.term_segments(&TermSource::None);
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].start_column, index.first_column());
        assert_eq!(segments[0].end_column, index.last_column());
    }

    #[test]
    fn empty_term_name_is_not_merged_with_no_term() {
        let catalog = TermSource::Catalog(vec![Term::new(
            "",
            date(2025, 1, 9),
            date(2025, 1, 10),
            Color::parse("#cccccc").unwrap(),
        )]);
        let index = DateColumnIndex::build(date(2025, 1, 6), date(2025, 1, 10), false, 1);
        let segments = index.term_segments(&catalog);
        let summary: Vec<(u32, u32, bool)> = segments
            .iter()
            .map(|s| (s.start_column, s.end_column, s.has_term()))
            .collect();
        assert_eq!(summary, vec![(1, 3, false), (4, 5, true)]);
    }
}
