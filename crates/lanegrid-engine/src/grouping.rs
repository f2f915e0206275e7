//! Grouping intervals by owner and ordering the groups
//!
//! The assembler stacks groups in whatever order it is given; this module is
//! the caller-side helper that produces that order from a [`GroupOrder`].

use std::collections::HashMap;

use lanegrid_core::{GroupOrder, Interval};

/// Intervals sharing a group key, packed independently of other groups
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Group {
    pub key: String,
    /// Text shown in the label column
    pub label: String,
    pub intervals: Vec<Interval>,
}

impl Group {
    /// Create an empty group labeled with its key
    pub fn new(key: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            label: key.clone(),
            key,
            intervals: Vec::new(),
        }
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn with_intervals(mut self, intervals: Vec<Interval>) -> Self {
        self.intervals = intervals;
        self
    }
}

/// Split intervals into groups (first-appearance order), then apply `order`
pub fn group_intervals(intervals: Vec<Interval>, order: &GroupOrder) -> Vec<Group> {
    let mut groups: Vec<Group> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();

    for interval in intervals {
        let position = *positions.entry(interval.group_key.clone()).or_insert_with(|| {
            groups.push(Group::new(interval.group_key.clone()));
            groups.len() - 1
        });
        groups[position].intervals.push(interval);
    }

    order_groups(&mut groups, order);
    groups
}

/// Reorder groups in place
pub fn order_groups(groups: &mut [Group], order: &GroupOrder) {
    match order {
        GroupOrder::AsGiven => {}
        GroupOrder::PinnedThenAlphabetical { pinned } => {
            groups.sort_by_cached_key(|group| {
                let rank = pinned
                    .iter()
                    .position(|key| *key == group.key)
                    .unwrap_or(pinned.len());
                (rank, group.label.to_lowercase(), group.key.clone())
            });
        }
    }
}
