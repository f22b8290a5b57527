//! Category frequency counting

use super::TieBreak;
use crate::dataset::CellValue;
use std::collections::HashMap;

/// A distinct category and how often it occurs
#[derive(Debug, Clone, PartialEq)]
pub struct FrequencyRecord {
    pub value: CellValue,
    pub count: usize,
}

/// Occurrence counts per distinct value, in first-appearance order
#[derive(Debug, Clone, Default)]
pub struct FrequencyTable {
    records: Vec<FrequencyRecord>,
    index: HashMap<CellValue, usize>,
}

impl FrequencyTable {
    pub fn from_values<'a, I>(values: I) -> Self
    where
        I: IntoIterator<Item = &'a CellValue>,
    {
        let mut table = Self::default();
        for value in values {
            table.add(value);
        }
        table
    }

    fn add(&mut self, value: &CellValue) {
        match self.index.get(value) {
            Some(&i) => self.records[i].count += 1,
            None => {
                self.index.insert(value.clone(), self.records.len());
                self.records.push(FrequencyRecord {
                    value: value.clone(),
                    count: 1,
                });
            }
        }
    }

    pub fn count(&self, value: &CellValue) -> usize {
        self.index.get(value).map(|&i| self.records[i].count).unwrap_or(0)
    }

    pub fn distinct(&self) -> usize {
        self.records.len()
    }

    pub fn total(&self) -> usize {
        self.records.iter().map(|r| r.count).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records by descending count; the sort is stable, so equal counts keep
    /// first-appearance order unless `tie_break` asks for value order.
    pub fn ranked(self, tie_break: TieBreak) -> Vec<FrequencyRecord> {
        let mut records = self.records;
        match tie_break {
            TieBreak::FirstSeen => records.sort_by(|a, b| b.count.cmp(&a.count)),
            TieBreak::CategoryValue => {
                records.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.value.cmp(&b.value)))
            }
        }
        records
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(raw: &[&str]) -> Vec<CellValue> {
        raw.iter().map(|&s| CellValue::from(s)).collect()
    }

    #[test]
    fn test_counts_merge_equal_values() {
        let column = vec![
            CellValue::Number(1.0),
            CellValue::Number(-0.0),
            CellValue::Number(0.0),
            CellValue::Number(1.0),
        ];
        let table = FrequencyTable::from_values(&column);
        assert_eq!(table.distinct(), 2);
        assert_eq!(table.total(), 4);
        assert_eq!(table.count(&CellValue::Number(0.0)), 2);
    }

    #[test]
    fn test_ranked_descending() {
        let column = values(&["a", "b", "b", "c", "c", "c"]);
        let ranked = FrequencyTable::from_values(&column).ranked(TieBreak::FirstSeen);
        let order: Vec<String> = ranked.iter().map(|r| r.value.to_string()).collect();
        assert_eq!(order, vec!["c", "b", "a"]);
        assert_eq!(ranked[0].count, 3);
    }

    #[test]
    fn test_ties_keep_first_seen_order() {
        let column = values(&["z", "y", "x", "y", "z", "x"]);
        let ranked = FrequencyTable::from_values(&column).ranked(TieBreak::FirstSeen);
        let order: Vec<String> = ranked.iter().map(|r| r.value.to_string()).collect();
        assert_eq!(order, vec!["z", "y", "x"]);
    }

    #[test]
    fn test_ties_by_category_value() {
        let column = values(&["z", "y", "x", "y", "z", "x", "w"]);
        let ranked = FrequencyTable::from_values(&column).ranked(TieBreak::CategoryValue);
        let order: Vec<String> = ranked.iter().map(|r| r.value.to_string()).collect();
        assert_eq!(order, vec!["x", "y", "z", "w"]);
    }

    #[test]
    fn test_empty() {
        let column: Vec<CellValue> = Vec::new();
        let table = FrequencyTable::from_values(&column);
        assert!(table.is_empty());
        assert!(table.ranked(TieBreak::FirstSeen).is_empty());
    }
}
