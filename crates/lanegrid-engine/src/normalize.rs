//! Input normalization
//!
//! Turns raw records into [`Interval`]s. A record whose dates cannot be read
//! is dropped and listed with its reason; an end before the start is clamped.

use chrono::NaiveDate;
use tracing::{debug, warn};

use lanegrid_core::{Interval, RawInterval, SkipReason, Skipped};

/// Date formats accepted in raw records, tried in order
pub const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

/// Parse a whole-day date in any accepted format
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(text, format).ok())
}

/// Result of normalizing a batch of raw records
#[derive(Clone, Debug, Default)]
pub struct Normalized {
    pub intervals: Vec<Interval>,
    pub skipped: Vec<Skipped>,
}

/// Validate one record
pub fn normalize_one(raw: &RawInterval) -> Result<Interval, SkipReason> {
    let group_key = raw.group_key.trim();
    if group_key.is_empty() {
        return Err(SkipReason::MissingGroup);
    }
    let start = parse_date(&raw.start).ok_or_else(|| SkipReason::InvalidStart(raw.start.clone()))?;
    let end = parse_date(&raw.end).ok_or_else(|| SkipReason::InvalidEnd(raw.end.clone()))?;
    if end < start {
        debug!(id = %raw.id, %start, %end, "end before start, clamping to start");
    }

    let label = if raw.label.trim().is_empty() {
        raw.id.clone()
    } else {
        raw.label.clone()
    };
    let mut interval = Interval::new(raw.id.clone(), group_key, start, end).label(label);
    interval.link = raw.link.clone();
    Ok(interval)
}

/// Validate a batch, keeping input order
pub fn normalize(raw: &[RawInterval]) -> Normalized {
    let mut out = Normalized::default();
    for (index, record) in raw.iter().enumerate() {
        match normalize_one(record) {
            Ok(interval) => out.intervals.push(interval),
            Err(reason) => {
                warn!(id = %record.id, index, %reason, "skipping interval");
                out.skipped.push(Skipped {
                    id: record.id.clone(),
                    index,
                    reason,
                });
            }
        }
    }
    out
}
