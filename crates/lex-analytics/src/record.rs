//! Record model: dynamically typed cells, ordered records and datasets.
//!
//! Records arrive from ingestion with values of unknown type. Every cell is
//! a [`Scalar`]; type inference happens once, in the profiler, and the
//! resulting [`DominantType`](crate::types::DominantType) is what the other
//! stages consume.

use crate::error::{Result, ResultExt};
use polars::prelude::*;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::borrow::Cow;
use std::collections::HashSet;
use std::fmt;

use crate::utils::parse_number;

/// A single cell value.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
}

static NULL: Scalar = Scalar::Null;

impl Scalar {
    /// Null and blank strings both count as missing.
    pub fn is_missing(&self) -> bool {
        match self {
            Scalar::Null => true,
            Scalar::String(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Numeric view of the value. Strings are parsed; booleans are not numbers.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Scalar::Int(i) => Some(*i as f64),
            Scalar::Float(f) if f.is_finite() => Some(*f),
            Scalar::String(s) => parse_number(s),
            _ => None,
        }
    }

    /// Text view of the value as it would be displayed.
    pub fn to_text(&self) -> Cow<'_, str> {
        match self {
            Scalar::Null => Cow::Borrowed(""),
            Scalar::Bool(b) => Cow::Borrowed(if *b { "true" } else { "false" }),
            Scalar::Int(i) => Cow::Owned(i.to_string()),
            Scalar::Float(f) => Cow::Owned(f.to_string()),
            Scalar::String(s) => Cow::Borrowed(s.as_str()),
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::String(value.to_string())
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Scalar::String(value)
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Scalar::Int(value)
    }
}

impl From<i32> for Scalar {
    fn from(value: i32) -> Self {
        Scalar::Int(i64::from(value))
    }
}

impl From<f64> for Scalar {
    fn from(value: f64) -> Self {
        Scalar::Float(value)
    }
}

impl From<bool> for Scalar {
    fn from(value: bool) -> Self {
        Scalar::Bool(value)
    }
}

impl<T: Into<Scalar>> From<Option<T>> for Scalar {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Scalar::Null)
    }
}

/// One row: an ordered mapping from column name to value.
///
/// Columns keep their insertion order. Looking up an absent column yields
/// [`Scalar::Null`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Record {
    fields: Vec<(String, Scalar)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            fields: Vec::with_capacity(capacity),
        }
    }

    /// Set a column value, replacing any existing value in place.
    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<Scalar>) {
        let column = column.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(name, _)| *name == column) {
            Some((_, slot)) => *slot = value,
            None => self.fields.push((column, value)),
        }
    }

    /// Value of `column`, `Null` when absent.
    pub fn get(&self, column: &str) -> &Scalar {
        self.fields
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
            .unwrap_or(&NULL)
    }

    pub fn contains(&self, column: &str) -> bool {
        self.fields.iter().any(|(name, _)| name == column)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Scalar)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Stable serialization over `columns`, used for duplicate detection.
    ///
    /// Values keep their variant, so `Int(1)` and `String("1")` differ.
    pub fn canonical_key(&self, columns: &[String]) -> String {
        let mut key = String::new();
        for column in columns {
            key.push_str(column);
            key.push('=');
            key.push_str(&format!("{:?}", self.get(column)));
            key.push('\u{1f}');
        }
        key
    }
}

impl<K: Into<String>, V: Into<Scalar>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = Record::new();
        for (column, value) in iter {
            record.insert(column, value);
        }
        record
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Record {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct RecordVisitor;

        impl<'de> Visitor<'de> for RecordVisitor {
            type Value = Record;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of column names to scalar values")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> std::result::Result<Record, A::Error> {
                let mut record = Record::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((column, value)) = map.next_entry::<String, Scalar>()? {
                    record.insert(column, value);
                }
                Ok(record)
            }
        }

        deserializer.deserialize_map(RecordVisitor)
    }
}

/// Build a [`Record`] from `column => value` pairs.
///
/// ```rust,ignore
/// let r = record! { "age" => "25", "income" => 1000 };
/// ```
#[macro_export]
macro_rules! record {
    () => { $crate::Record::new() };
    ($($column:expr => $value:expr),+ $(,)?) => {{
        let mut record = $crate::Record::new();
        $( record.insert($column, $value); )+
        record
    }};
}

/// An immutable snapshot of records sharing one column set.
///
/// Columns are ordered by first appearance across the records.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "Vec<Record>", into = "Vec<Record>")]
pub struct Dataset {
    columns: Vec<String>,
    records: Vec<Record>,
}

impl Dataset {
    pub fn from_records(records: Vec<Record>) -> Self {
        let mut columns: Vec<String> = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();
        for record in &records {
            for column in record.columns() {
                if seen.insert(column.to_string()) {
                    columns.push(column.to_string());
                }
            }
        }
        Self { columns, records }
    }

    /// Convert a Polars DataFrame into a dataset.
    ///
    /// Integer dtypes become [`Scalar::Int`], float dtypes [`Scalar::Float`],
    /// booleans [`Scalar::Bool`]; every other dtype is read as text.
    pub fn from_dataframe(df: &DataFrame) -> Result<Self> {
        let columns: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|name| name.to_string())
            .collect();
        let mut records: Vec<Record> = (0..df.height())
            .map(|_| Record::with_capacity(columns.len()))
            .collect();

        for column in df.get_columns() {
            let series = column.as_materialized_series();
            let name = series.name().to_string();
            let values =
                series_to_scalars(series).context(format!("Failed to read column '{}'", name))?;
            for (record, value) in records.iter_mut().zip(values) {
                record.insert(name.clone(), value);
            }
        }

        Ok(Self { columns, records })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn total_cells(&self) -> usize {
        self.records.len() * self.columns.len()
    }

    /// All values of one column, `Null` where a record lacks it.
    pub fn column_values<'a>(&'a self, column: &'a str) -> impl Iterator<Item = &'a Scalar> + 'a {
        self.records.iter().map(move |record| record.get(column))
    }

    /// Number of records whose full serialization repeats an earlier record.
    pub fn duplicate_count(&self) -> usize {
        let mut seen = HashSet::with_capacity(self.records.len());
        self.records
            .iter()
            .filter(|record| !seen.insert(record.canonical_key(&self.columns)))
            .count()
    }
}

impl From<Vec<Record>> for Dataset {
    fn from(records: Vec<Record>) -> Self {
        Dataset::from_records(records)
    }
}

impl From<Dataset> for Vec<Record> {
    fn from(dataset: Dataset) -> Self {
        dataset.records
    }
}

fn is_integer_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
    )
}

fn series_to_scalars(series: &Series) -> Result<Vec<Scalar>> {
    let dtype = series.dtype();
    let values = if is_integer_dtype(dtype) {
        let cast = series.cast(&DataType::Int64)?;
        cast.i64()?.into_iter().map(Scalar::from).collect()
    } else if matches!(dtype, DataType::Float32 | DataType::Float64) {
        let cast = series.cast(&DataType::Float64)?;
        cast.f64()?.into_iter().map(Scalar::from).collect()
    } else if dtype == &DataType::Boolean {
        series.bool()?.into_iter().map(Scalar::from).collect()
    } else {
        let cast = series.cast(&DataType::String)?;
        cast.str()?.into_iter().map(Scalar::from).collect()
    };
    Ok(values)
}
