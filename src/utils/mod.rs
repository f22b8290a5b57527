//! Utility functions and types

pub mod data_loader;
pub mod frame;

pub use data_loader::{DataFormat, DataLoader, DataSaver, FileRowStorage};
pub use frame::{infer_fields, rows_from_dataframe, rows_to_dataframe};
