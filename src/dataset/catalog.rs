//! Field catalog: ordered field descriptors with lookup by id

use super::{DerivedField, FieldMeta};
use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
pub struct FieldCatalog {
    fields: Vec<FieldMeta>,
    index: HashMap<String, usize>,
}

impl FieldCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, fid: &str) -> Option<&FieldMeta> {
        self.index.get(fid).map(|&i| &self.fields[i])
    }

    pub fn contains(&self, fid: &str) -> bool {
        self.index.contains_key(fid)
    }

    /// Insert a field, replacing any existing field with the same id
    pub fn push(&mut self, field: FieldMeta) {
        match self.index.get(&field.fid) {
            Some(&i) => self.fields[i] = field,
            None => {
                self.index.insert(field.fid.clone(), self.fields.len());
                self.fields.push(field);
            }
        }
    }

    /// Register derived fields so later transforms can resolve them
    pub fn extend_derived<'a>(&mut self, derived: impl IntoIterator<Item = &'a DerivedField>) {
        for field in derived {
            self.push(field.clone().into());
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldMeta> {
        self.fields.iter()
    }

    pub fn fids(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.fid.as_str())
    }

    pub fn as_slice(&self) -> &[FieldMeta] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl FromIterator<FieldMeta> for FieldCatalog {
    fn from_iter<I: IntoIterator<Item = FieldMeta>>(iter: I) -> Self {
        let mut catalog = FieldCatalog::new();
        for field in iter {
            catalog.push(field);
        }
        catalog
    }
}

impl From<Vec<FieldMeta>> for FieldCatalog {
    fn from(fields: Vec<FieldMeta>) -> Self {
        fields.into_iter().collect()
    }
}
