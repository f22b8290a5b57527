//! Data preprocessing module
//!
//! Provides the categorical expansion used by what-if exploration:
//! - Category frequency counting and ranking
//! - One-hot expansion with a capped number of children per field
//! - Catch-all ("others") bucketing of infrequent categories

mod config;
mod encoder;
pub mod frequency;

pub use config::{OneHotConfig, TieBreak, MAX_CHILDREN};
pub use encoder::{one_hot, sanitize_category, OneHotEncoder, OneHotOutput, ONE_HOT_TRANSFORM};
pub use frequency::{FrequencyRecord, FrequencyTable};
