//! Data loading utilities

use super::frame::rows_from_dataframe;
use crate::dataset::{Row, RowStorage};
use crate::error::{ExploreError, Result};
use async_trait::async_trait;
use polars::prelude::*;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// File formats understood by the loader
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataFormat {
    Csv,
    Tsv,
    /// JSON array of records
    Json,
    /// Newline-delimited JSON
    NdJson,
}

impl DataFormat {
    /// Detect format from a file extension, defaulting to CSV
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();

        match ext.as_str() {
            "tsv" => DataFormat::Tsv,
            "json" => DataFormat::Json,
            "jsonl" | "ndjson" => DataFormat::NdJson,
            _ => DataFormat::Csv,
        }
    }
}

impl std::fmt::Display for DataFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataFormat::Csv => write!(f, "csv"),
            DataFormat::Tsv => write!(f, "tsv"),
            DataFormat::Json => write!(f, "json"),
            DataFormat::NdJson => write!(f, "ndjson"),
        }
    }
}

/// Data loader for CSV and JSON files
#[derive(Debug, Clone)]
pub struct DataLoader {
    /// Rows sampled for schema inference
    infer_schema_length: Option<usize>,
}

impl Default for DataLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl DataLoader {
    /// Create a new data loader
    pub fn new() -> Self {
        Self {
            infer_schema_length: Some(100),
        }
    }

    /// Set how many rows are sampled for schema inference; `None` scans all
    pub fn with_infer_schema_length(mut self, rows: Option<usize>) -> Self {
        self.infer_schema_length = rows;
        self
    }

    /// Load a CSV file
    pub fn load_csv(&self, path: impl AsRef<Path>) -> Result<DataFrame> {
        self.load_delimited(path.as_ref(), b',')
    }

    fn load_delimited(&self, path: &Path, separator: u8) -> Result<DataFrame> {
        let file = File::open(path)?;

        CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(self.infer_schema_length)
            .with_parse_options(CsvParseOptions::default().with_separator(separator))
            .into_reader_with_file_handle(file)
            .finish()
            .map_err(|e| ExploreError::DataError(e.to_string()))
    }

    /// Load a JSON file, either an array of records or one record per line
    pub fn load_json(&self, path: impl AsRef<Path>, format: JsonFormat) -> Result<DataFrame> {
        let file = File::open(path.as_ref())?;

        JsonReader::new(file)
            .with_json_format(format)
            .finish()
            .map_err(|e| ExploreError::DataError(e.to_string()))
    }

    /// Detect file format from extension and load
    pub fn load_auto(&self, path: impl AsRef<Path>) -> Result<DataFrame> {
        let path = path.as_ref();
        let format = DataFormat::from_path(path);
        let start = Instant::now();

        let df = match format {
            DataFormat::Csv => self.load_delimited(path, b','),
            DataFormat::Tsv => self.load_delimited(path, b'\t'),
            DataFormat::Json => self.load_json(path, JsonFormat::Json),
            DataFormat::NdJson => self.load_json(path, JsonFormat::JsonLines),
        }?;

        tracing::debug!(
            path = %path.display(),
            format = %format,
            rows = df.height(),
            columns = df.width(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Loaded data file"
        );
        Ok(df)
    }
}

/// Data saver for CSV and JSON files
pub struct DataSaver;

impl DataSaver {
    /// Save to CSV
    pub fn save_csv(df: &mut DataFrame, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path.as_ref())?;

        CsvWriter::new(&mut file)
            .include_header(true)
            .finish(df)
            .map_err(|e| ExploreError::DataError(e.to_string()))
    }

    /// Save to JSON in the given layout
    pub fn save_json(df: &mut DataFrame, path: impl AsRef<Path>, format: JsonFormat) -> Result<()> {
        let mut file = File::create(path.as_ref())?;

        JsonWriter::new(&mut file)
            .with_json_format(format)
            .finish(df)
            .map_err(|e| ExploreError::DataError(e.to_string()))
    }

    /// Save using the format implied by the extension
    pub fn save_auto(df: &mut DataFrame, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        match DataFormat::from_path(path) {
            DataFormat::Csv => Self::save_csv(df, path),
            DataFormat::Tsv => {
                let mut file = File::create(path)?;
                CsvWriter::new(&mut file)
                    .include_header(true)
                    .with_separator(b'\t')
                    .finish(df)
                    .map_err(|e| ExploreError::DataError(e.to_string()))
            }
            DataFormat::Json => Self::save_json(df, path, JsonFormat::Json),
            DataFormat::NdJson => Self::save_json(df, path, JsonFormat::JsonLines),
        }
    }
}

/// Row storage backed by a data file; the file is read when drained
#[derive(Debug, Clone)]
pub struct FileRowStorage {
    path: PathBuf,
    loader: DataLoader,
}

impl FileRowStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            loader: DataLoader::new(),
        }
    }

    pub fn with_loader(mut self, loader: DataLoader) -> Self {
        self.loader = loader;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl RowStorage for FileRowStorage {
    async fn get_all(&self) -> Result<Vec<Row>> {
        let path = self.path.clone();
        let loader = self.loader.clone();

        tokio::task::spawn_blocking(move || {
            let df = loader.load_auto(&path)?;
            rows_from_dataframe(&df)
        })
        .await
        .map_err(|e| ExploreError::StorageError(e.to_string()))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::CellValue;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_test_csv() -> NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(".csv")
            .tempfile()
            .unwrap();
        writeln!(file, "color,size").unwrap();
        writeln!(file, "red,1").unwrap();
        writeln!(file, "blue,2").unwrap();
        writeln!(file, "red,3").unwrap();
        file
    }

    #[test]
    fn test_detect_format() {
        assert_eq!(DataFormat::from_path(Path::new("a.TSV")), DataFormat::Tsv);
        assert_eq!(DataFormat::from_path(Path::new("a.jsonl")), DataFormat::NdJson);
        assert_eq!(DataFormat::from_path(Path::new("a.json")), DataFormat::Json);
        assert_eq!(DataFormat::from_path(Path::new("a")), DataFormat::Csv);
    }

    #[test]
    fn test_load_csv() {
        let file = create_test_csv();
        let df = DataLoader::new().load_csv(file.path()).unwrap();

        assert_eq!(df.height(), 3);
        assert_eq!(df.width(), 2);
    }

    #[test]
    fn test_ndjson_round_trip() {
        let mut df = df!(
            "color" => &["red", "blue"],
            "size" => &[1i64, 2],
        )
        .unwrap();

        let file = tempfile::Builder::new().suffix(".ndjson").tempfile().unwrap();
        DataSaver::save_auto(&mut df, file.path()).unwrap();

        let loaded = DataLoader::new().load_auto(file.path()).unwrap();
        assert_eq!(loaded.height(), 2);
        assert_eq!(loaded.width(), 2);
    }

    #[tokio::test]
    async fn test_file_row_storage() {
        let file = create_test_csv();
        let storage = FileRowStorage::new(file.path());

        let rows = storage.get_all().await.unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[1].get("color"), Some(&CellValue::from("blue")));
        assert_eq!(rows[2].get("size"), Some(&CellValue::Number(3.0)));
    }

    #[tokio::test]
    async fn test_file_row_storage_missing_file() {
        let storage = FileRowStorage::new("/nonexistent/rows.csv");
        let err = storage.get_all().await.unwrap_err();
        assert!(matches!(err, ExploreError::IoError(_)));
    }
}
