//! Grid configuration
//!
//! Everything the engine needs beyond the interval list itself. All fields
//! have defaults so a configuration file only has to name what it changes.

use serde::{Deserialize, Serialize};

use crate::{ConfigError, Palette, TermSource};

/// Order in which groups are stacked in the grid
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GroupOrder {
    /// Keep the order in which groups first appear in the input
    AsGiven,
    /// Pinned group keys first (in the listed order), then the rest
    /// alphabetically by label
    PinnedThenAlphabetical {
        #[serde(default)]
        pinned: Vec<String>,
    },
}

impl Default for GroupOrder {
    fn default() -> Self {
        GroupOrder::PinnedThenAlphabetical {
            pinned: vec!["milestone".into()],
        }
    }
}

/// Engine configuration for one grid build
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Give Saturday and Sunday their own columns
    pub include_weekends: bool,
    /// Column of the first day (columns before it hold labels)
    pub first_data_column: u32,
    /// Colors handed out to interval ids
    pub palette: Palette,
    /// Header term source
    pub terms: TermSource,
    /// Group stacking order
    pub group_order: GroupOrder,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            include_weekends: false,
            first_data_column: 1,
            palette: Palette::default(),
            terms: TermSource::None,
            group_order: GroupOrder::default(),
        }
    }
}

impl GridConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Give weekend days their own columns
    pub fn with_weekends(mut self) -> Self {
        self.include_weekends = true;
        self
    }

    pub fn first_data_column(mut self, column: u32) -> Self {
        self.first_data_column = column;
        self
    }

    pub fn palette(mut self, palette: Palette) -> Self {
        self.palette = palette;
        self
    }

    pub fn terms(mut self, terms: TermSource) -> Self {
        self.terms = terms;
        self
    }

    pub fn group_order(mut self, order: GroupOrder) -> Self {
        self.group_order = order;
        self
    }

    /// Check the term source; the palette is validated on construction
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.terms.validate()
    }
}
