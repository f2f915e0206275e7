//! Row packing for one group
//!
//! First-fit greedy assignment over an interval graph. Items are visited in
//! start order (stable, so ties keep their input order) and each goes into
//! the first row none of whose members it overlaps. Visiting in start order
//! makes the row count equal to the largest number of items active on any
//! single day, which is the minimum possible.

use chrono::NaiveDate;
use lanegrid_core::Interval;
use serde::Serialize;

/// Something with a closed `[start, end]` extent
pub trait Extent {
    type Point: Ord + Copy;

    fn start(&self) -> Self::Point;
    fn end(&self) -> Self::Point;

    /// Closed-range overlap: touching endpoints overlap
    fn overlaps<E: Extent<Point = Self::Point> + ?Sized>(&self, other: &E) -> bool {
        self.start() <= other.end() && self.end() >= other.start()
    }
}

impl Extent for Interval {
    type Point = NaiveDate;

    fn start(&self) -> NaiveDate {
        self.start
    }

    fn end(&self) -> NaiveDate {
        self.end
    }
}

/// Day-index pairs, handy for synthetic inputs
impl Extent for (i64, i64) {
    type Point = i64;

    fn start(&self) -> i64 {
        self.0
    }

    fn end(&self) -> i64 {
        self.1.max(self.0)
    }
}

impl<T: Extent + ?Sized> Extent for &T {
    type Point = T::Point;

    fn start(&self) -> T::Point {
        (**self).start()
    }

    fn end(&self) -> T::Point {
        (**self).end()
    }
}

/// Items sharing one row; pairwise non-overlapping
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PackedRow<T> {
    items: Vec<T>,
}

impl<T> PackedRow<T> {
    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<T: Extent> PackedRow<T> {
    fn accepts(&self, item: &T) -> bool {
        self.items.iter().all(|member| !member.overlaps(item))
    }
}

impl<T> IntoIterator for PackedRow<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

/// Pack `items` into the fewest rows with no overlap inside a row.
///
/// Rows come back in creation order. An empty input yields no rows.
pub fn pack<T: Extent>(mut items: Vec<T>) -> Vec<PackedRow<T>> {
    items.sort_by_key(|item| item.start());

    let mut rows: Vec<PackedRow<T>> = Vec::new();
    for item in items {
        match rows.iter_mut().find(|row| row.accepts(&item)) {
            Some(row) => row.items.push(item),
            None => rows.push(PackedRow { items: vec![item] }),
        }
    }
    rows
}

/// Largest number of items active on the same point (the clique number).
pub fn peak_concurrency<T: Extent>(items: &[T]) -> usize {
    // Starts sort before ends at the same point: closed ranges touching there overlap
    let mut events: Vec<(T::Point, bool)> = items
        .iter()
        .flat_map(|item| [(item.start(), false), (item.end(), true)])
        .collect();
    events.sort();

    let mut active = 0usize;
    let mut peak = 0usize;
    for (_, is_end) in events {
        if is_end {
            active -= 1;
        } else {
            active += 1;
            peak = peak.max(active);
        }
    }
    peak
}
