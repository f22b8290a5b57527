//! Scalar cell values

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// A single scalar in a row.
///
/// Booleans are stored as numbers (`true` is `1`, `false` is `0`). Numbers
/// compare by value with `-0.0 == 0.0` and all NaNs equal to each other, so
/// that cells can be grouped into categories.
#[derive(Debug, Clone, Default)]
pub enum CellValue {
    #[default]
    Null,
    Number(f64),
    Text(String),
}

impl CellValue {
    /// Indicator value: `1` when `hit`, else `0`
    pub fn flag(hit: bool) -> Self {
        CellValue::Number(if hit { 1.0 } else { 0.0 })
    }

    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Integral numbers that fit an i64 exactly
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            CellValue::Number(n) if is_integral(*n) => Some(*n as i64),
            _ => None,
        }
    }

    fn rank(&self) -> u8 {
        match self {
            CellValue::Null => 0,
            CellValue::Number(_) => 1,
            CellValue::Text(_) => 2,
        }
    }
}

fn is_integral(n: f64) -> bool {
    n.is_finite() && n.fract() == 0.0 && n.abs() < 9.0e15
}

fn canonical_bits(n: f64) -> u64 {
    if n == 0.0 {
        0.0f64.to_bits()
    } else if n.is_nan() {
        f64::NAN.to_bits()
    } else {
        n.to_bits()
    }
}

impl PartialEq for CellValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (CellValue::Null, CellValue::Null) => true,
            (CellValue::Number(a), CellValue::Number(b)) => canonical_bits(*a) == canonical_bits(*b),
            (CellValue::Text(a), CellValue::Text(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for CellValue {}

impl Hash for CellValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.rank().hash(state);
        match self {
            CellValue::Null => {}
            CellValue::Number(n) => canonical_bits(*n).hash(state),
            CellValue::Text(s) => s.hash(state),
        }
    }
}

impl Ord for CellValue {
    /// Null < numbers < text; numbers use IEEE total order
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (CellValue::Number(a), CellValue::Number(b)) => {
                if self == other {
                    Ordering::Equal
                } else {
                    a.total_cmp(b)
                }
            }
            (CellValue::Text(a), CellValue::Text(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl PartialOrd for CellValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Null => write!(f, "null"),
            CellValue::Number(n) if is_integral(*n) => write!(f, "{}", *n as i64),
            CellValue::Number(n) if n.is_nan() => write!(f, "NaN"),
            CellValue::Number(n) => write!(f, "{}", n),
            CellValue::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl From<i64> for CellValue {
    fn from(n: i64) -> Self {
        CellValue::Number(n as f64)
    }
}

impl From<i32> for CellValue {
    fn from(n: i32) -> Self {
        CellValue::Number(n as f64)
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::flag(b)
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(CellValue::Null)
    }
}

impl Serialize for CellValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            CellValue::Null => serializer.serialize_none(),
            CellValue::Number(n) if is_integral(*n) => serializer.serialize_i64(*n as i64),
            CellValue::Number(n) => serializer.serialize_f64(*n),
            CellValue::Text(s) => serializer.serialize_str(s),
        }
    }
}

struct CellValueVisitor;

impl<'de> Visitor<'de> for CellValueVisitor {
    type Value = CellValue;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a string, number, boolean or null")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> std::result::Result<CellValue, E> {
        Ok(CellValue::from(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<CellValue, E> {
        Ok(CellValue::Number(v as f64))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<CellValue, E> {
        Ok(CellValue::Number(v as f64))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> std::result::Result<CellValue, E> {
        Ok(CellValue::Number(v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<CellValue, E> {
        Ok(CellValue::Text(v.to_string()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> std::result::Result<CellValue, E> {
        Ok(CellValue::Text(v))
    }

    fn visit_unit<E: de::Error>(self) -> std::result::Result<CellValue, E> {
        Ok(CellValue::Null)
    }

    fn visit_none<E: de::Error>(self) -> std::result::Result<CellValue, E> {
        Ok(CellValue::Null)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> std::result::Result<CellValue, D::Error> {
        deserializer.deserialize_any(self)
    }
}

impl<'de> Deserialize<'de> for CellValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_any(CellValueVisitor)
    }
}
