//! Stable identifier coloring
//!
//! Each new identifier takes the next palette color, wrapping around when
//! the palette runs out; an identifier seen before keeps its color. One
//! assigner belongs to one grid build.

use std::collections::HashMap;

use lanegrid_core::{Color, Palette};

#[derive(Clone, Debug)]
pub struct ColorAssigner {
    palette: Palette,
    assigned: HashMap<String, Color>,
}

impl ColorAssigner {
    pub fn new(palette: Palette) -> Self {
        Self {
            palette,
            assigned: HashMap::new(),
        }
    }

    /// Color for `id`, assigning the next palette color on first request
    pub fn color_for(&mut self, id: &str) -> Color {
        if let Some(color) = self.assigned.get(id) {
            return color.clone();
        }
        let color = self.palette.cycled(self.assigned.len()).clone();
        self.assigned.insert(id.to_string(), color.clone());
        color
    }

    /// Previously assigned color, without assigning
    pub fn get(&self, id: &str) -> Option<&Color> {
        self.assigned.get(id)
    }

    /// Number of distinct identifiers seen
    pub fn assigned(&self) -> usize {
        self.assigned.len()
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }
}

impl Default for ColorAssigner {
    fn default() -> Self {
        Self::new(Palette::default())
    }
}
