//! One-hot expansion configuration

use crate::error::{ExploreError, Result};
use serde::{Deserialize, Serialize};

/// Maximum number of columns generated per target field
pub const MAX_CHILDREN: usize = 6;

/// Ordering among categories with equal frequency
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TieBreak {
    /// Keep first-appearance order
    #[default]
    FirstSeen,
    /// Ascending by category value
    CategoryValue,
}

/// Configuration for one-hot expansion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OneHotConfig {
    /// Maximum number of derived columns per target, catch-all included
    pub max_children: usize,

    /// Suffix of the catch-all column name
    pub others_label: String,

    /// Separator between source name and category in derived names
    pub name_separator: String,

    /// Ordering among equally frequent categories
    pub tie_break: TieBreak,
}

impl Default for OneHotConfig {
    fn default() -> Self {
        Self {
            max_children: MAX_CHILDREN,
            others_label: "[others]".to_string(),
            name_separator: "::".to_string(),
            tie_break: TieBreak::FirstSeen,
        }
    }
}

impl OneHotConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to set the per-target column limit
    pub fn with_max_children(mut self, max_children: usize) -> Self {
        self.max_children = max_children;
        self
    }

    /// Builder method to set the catch-all label
    pub fn with_others_label(mut self, label: impl Into<String>) -> Self {
        self.others_label = label.into();
        self
    }

    /// Builder method to set the tie-break rule
    pub fn with_tie_break(mut self, tie_break: TieBreak) -> Self {
        self.tie_break = tie_break;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_children == 0 {
            return Err(ExploreError::ConfigError(
                "max_children must be at least 1".to_string(),
            ));
        }
        if self.others_label.is_empty() {
            return Err(ExploreError::InvalidParameter {
                name: "others_label".to_string(),
                value: String::new(),
                reason: "must not be empty".to_string(),
            });
        }
        Ok(())
    }
}
