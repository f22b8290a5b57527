//! Row sources: materialized slices or lazily drained storage

use super::Row;
use crate::error::Result;
use async_trait::async_trait;
use std::borrow::Cow;

/// Storage that yields its full row set on demand
#[async_trait]
pub trait RowStorage: Send + Sync {
    /// Drain every row into memory
    async fn get_all(&self) -> Result<Vec<Row>>;
}

/// Either rows already in memory or a storage to drain
#[derive(Clone, Copy)]
pub enum RowSource<'a> {
    Rows(&'a [Row]),
    Storage(&'a dyn RowStorage),
}

impl<'a> RowSource<'a> {
    /// Resolve to an in-memory row set. Storage failures are returned as-is.
    pub async fn materialize(self) -> Result<Cow<'a, [Row]>> {
        match self {
            RowSource::Rows(rows) => Ok(Cow::Borrowed(rows)),
            RowSource::Storage(storage) => {
                let rows = storage.get_all().await?;
                tracing::debug!(rows = rows.len(), "Drained row storage");
                Ok(Cow::Owned(rows))
            }
        }
    }
}

impl<'a> From<&'a [Row]> for RowSource<'a> {
    fn from(rows: &'a [Row]) -> Self {
        RowSource::Rows(rows)
    }
}

impl<'a> From<&'a Vec<Row>> for RowSource<'a> {
    fn from(rows: &'a Vec<Row>) -> Self {
        RowSource::Rows(rows.as_slice())
    }
}

impl<'a> From<&'a dyn RowStorage> for RowSource<'a> {
    fn from(storage: &'a dyn RowStorage) -> Self {
        RowSource::Storage(storage)
    }
}

/// In-memory storage, mostly useful to exercise the lazy path
#[derive(Debug, Clone, Default)]
pub struct MemoryRowStorage {
    rows: Vec<Row>,
}

impl MemoryRowStorage {
    pub fn new(rows: Vec<Row>) -> Self {
        Self { rows }
    }
}

#[async_trait]
impl RowStorage for MemoryRowStorage {
    async fn get_all(&self) -> Result<Vec<Row>> {
        Ok(self.rows.clone())
    }
}
