/// Canonical Row Module
///
/// The typed representation returned by the harness: every driver value is
/// decided into one `Scalar` variant at normalization time, and each row keeps
/// its columns in `SELECT` list order.

use chrono::NaiveDate;
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::fmt;

/// Absolute/relative tolerance used when comparing floating-point values.
pub const FLOAT_TOLERANCE: f64 = 1e-6;

/// A normalized scalar value.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Null,
    Integer(i64),
    Float(f64),
    Text(String),
    Date(NaiveDate),
}

impl Scalar {
    pub fn is_null(&self) -> bool {
        matches!(self, Scalar::Null)
    }

    /// Numeric view of the value, for integers and floats only.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Scalar::Integer(i) => Some(*i as f64),
            Scalar::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Scalar::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Equality that tolerates floating-point representation differences.
    ///
    /// Integers and floats compare numerically, and a date equals text holding
    /// the same ISO-8601 date.
    pub fn approx_eq(&self, other: &Scalar) -> bool {
        match (self, other) {
            (Scalar::Null, Scalar::Null) => true,
            (Scalar::Integer(a), Scalar::Integer(b)) => a == b,
            (Scalar::Text(a), Scalar::Text(b)) => a == b,
            (Scalar::Date(a), Scalar::Date(b)) => a == b,
            (Scalar::Date(d), Scalar::Text(s)) | (Scalar::Text(s), Scalar::Date(d)) => {
                NaiveDate::parse_from_str(s, "%Y-%m-%d").map_or(false, |parsed| parsed == *d)
            }
            _ => match (self.as_f64(), other.as_f64()) {
                (Some(a), Some(b)) => {
                    let scale = a.abs().max(b.abs()).max(1.0);
                    (a - b).abs() <= FLOAT_TOLERANCE * scale
                }
                _ => false,
            },
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Null => write!(f, "NULL"),
            Scalar::Integer(i) => write!(f, "{}", i),
            Scalar::Float(v) => write!(f, "{}", v),
            Scalar::Text(s) => write!(f, "{}", s),
            Scalar::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
        }
    }
}

impl Serialize for Scalar {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Scalar::Null => serializer.serialize_none(),
            Scalar::Integer(i) => serializer.serialize_i64(*i),
            Scalar::Float(f) => serializer.serialize_f64(*f),
            Scalar::Text(s) => serializer.serialize_str(s),
            Scalar::Date(d) => serializer.serialize_str(&d.format("%Y-%m-%d").to_string()),
        }
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Scalar::Integer(value)
    }
}

impl From<i32> for Scalar {
    fn from(value: i32) -> Self {
        Scalar::Integer(i64::from(value))
    }
}

impl From<f64> for Scalar {
    fn from(value: f64) -> Self {
        Scalar::Float(value)
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::Text(value.to_string())
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Scalar::Text(value)
    }
}

impl From<NaiveDate> for Scalar {
    fn from(value: NaiveDate) -> Self {
        Scalar::Date(value)
    }
}

impl<T: Into<Scalar>> From<Option<T>> for Scalar {
    fn from(value: Option<T>) -> Self {
        value.map_or(Scalar::Null, Into::into)
    }
}

/// One result row: column names paired with values, in `SELECT` order.
///
/// Duplicate names are kept; lookups by name return the first match.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CanonicalRow {
    entries: Vec<(String, Scalar)>,
}

impl CanonicalRow {
    pub fn new(entries: Vec<(String, Scalar)>) -> Self {
        CanonicalRow { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, column: &str) -> Option<&Scalar> {
        self.entries
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }

    pub fn value_at(&self, index: usize) -> Option<&Scalar> {
        self.entries.get(index).map(|(_, value)| value)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &Scalar> {
        self.entries.iter().map(|(_, value)| value)
    }

    pub fn entries(&self) -> &[(String, Scalar)] {
        &self.entries
    }

    /// Same column names in the same order, values equal under `Scalar::approx_eq`.
    pub fn approx_eq(&self, other: &CanonicalRow) -> bool {
        self.entries.len() == other.entries.len()
            && self
                .entries
                .iter()
                .zip(&other.entries)
                .all(|((name_a, a), (name_b, b))| name_a == name_b && a.approx_eq(b))
    }
}

impl fmt::Display for CanonicalRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (name, value)) in self.entries.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            match value {
                Scalar::Text(s) => write!(f, "{}: {:?}", name, s)?,
                other => write!(f, "{}: {}", name, other)?,
            }
        }
        write!(f, "}}")
    }
}

// Serialized as a JSON object whose keys keep column order.
impl Serialize for CanonicalRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, value) in &self.entries {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// Builds a `CanonicalRow` from `column => value` pairs.
///
/// ```
/// use sqlzoo::canonical_row;
///
/// let row = canonical_row! { "title" => "Exodus", "COUNT(*)" => 4 };
/// assert_eq!(row.len(), 2);
/// ```
#[macro_export]
macro_rules! canonical_row {
    ($($column:expr => $value:expr),* $(,)?) => {
        $crate::core::db::CanonicalRow::new(vec![
            $(($column.to_string(), $crate::core::db::Scalar::from($value))),*
        ])
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_preserves_column_order_and_duplicates() {
        let row = canonical_row! { "b" => 1, "a" => "x", "b" => 2.5 };
        let columns: Vec<&str> = row.columns().collect();
        assert_eq!(columns, vec!["b", "a", "b"]);
        assert_eq!(row.get("b"), Some(&Scalar::Integer(1)));
        assert_eq!(row.value_at(2), Some(&Scalar::Float(2.5)));
        assert_eq!(row.get("missing"), None);
    }

    #[test]
    fn test_approx_eq_tolerates_float_representation() {
        assert!(Scalar::Float(1.2 / 3.0).approx_eq(&Scalar::Float(0.4)));
        assert!(Scalar::Float(3.0).approx_eq(&Scalar::Integer(3)));
        assert!(!Scalar::Float(3.1).approx_eq(&Scalar::Integer(3)));
        assert!(!Scalar::Null.approx_eq(&Scalar::Integer(0)));
        assert!(!Scalar::Null.approx_eq(&Scalar::Text(String::new())));
    }

    #[test]
    fn test_date_matches_iso_text() {
        let date = NaiveDate::from_ymd_opt(1977, 6, 3).unwrap();
        assert!(Scalar::Date(date).approx_eq(&Scalar::from("1977-06-03")));
        assert!(!Scalar::Date(date).approx_eq(&Scalar::from("03/06/1977")));
    }

    #[test]
    fn test_option_conversion() {
        assert_eq!(Scalar::from(None::<f64>), Scalar::Null);
        assert_eq!(Scalar::from(Some(9.99)), Scalar::Float(9.99));
    }

    #[test]
    fn test_row_serializes_in_column_order() {
        let date = NaiveDate::from_ymd_opt(1991, 8, 26).unwrap();
        let row = canonical_row! {
            "title" => "Leisure",
            "price" => None::<f64>,
            "rdate" => date,
            "rank" => 120,
        };
        let json = serde_json::to_string(&row).unwrap();
        assert_eq!(
            json,
            r#"{"title":"Leisure","price":null,"rdate":"1991-08-26","rank":120}"#
        );
    }

    #[test]
    fn test_row_display() {
        let row = canonical_row! { "song" => "She's So High", "posn" => 1 };
        assert_eq!(row.to_string(), r#"{song: "She's So High", posn: 1}"#);
    }
}
