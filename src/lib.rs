//! causal-explore - building blocks for causal what-if exploration
//!
//! This crate provides:
//! - Categorical one-hot expansion with a capped number of indicator columns
//!   per field and a catch-all column for infrequent categories
//! - A client for the causal estimation server's hypothesis test API
//! - Data loading and conversion between polars frames and rows
//!
//! # Modules
//!
//! - [`dataset`] - Field descriptors, cell values, rows and row sources
//! - [`preprocessing`] - Frequency counting and one-hot expansion
//! - [`hypothesis`] - Hypothesis test service client
//! - [`utils`] - Data loading and frame conversion
//! - [`cli`] - Command-line interface

// Core error handling
pub mod error;

// Data model and transforms
pub mod dataset;
pub mod preprocessing;

// Services
pub mod hypothesis;
pub mod cli;

// Utilities
pub mod utils;

pub use error::{ExploreError, Result};

/// Re-export commonly used types
pub mod prelude {
    // Error handling
    pub use crate::error::{ExploreError, Result};

    // Dataset
    pub use crate::dataset::{
        row, CellValue, DerivationParams, DerivedField, FieldCatalog, FieldMeta, Row, RowSource,
        RowStorage,
    };

    // Preprocessing
    pub use crate::preprocessing::{one_hot, OneHotConfig, OneHotEncoder, OneHotOutput, TieBreak};

    // Hypothesis testing
    pub use crate::hypothesis::{
        CausalContext, CausalGraph, CausalServerConfig, EstimateInput, HypothesisTestClient,
        Notice, Notifier,
    };

    // Data loading
    pub use crate::utils::{DataLoader, DataSaver, FileRowStorage};
}
