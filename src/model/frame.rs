//! In-memory tabular dataset.

use super::Value;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// An ordered table of rows with named columns and row labels.
///
/// Every row holds exactly one value per column.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DataFrame {
    columns: Vec<String>,
    index: Vec<String>,
    rows: Vec<Vec<Value>>,
}

/// Split-oriented JSON layout: `{"columns": [...], "index": [...], "data": [[...]]}`.
#[derive(Debug, Deserialize)]
struct SplitFrame {
    columns: Vec<String>,
    #[serde(default)]
    index: Option<Vec<serde_json::Value>>,
    data: Vec<Vec<serde_json::Value>>,
}

impl DataFrame {
    /// Create a frame from column names and rows, with a default `0..n` index.
    pub fn new<S: Into<String>>(columns: Vec<S>, rows: Vec<Vec<Value>>) -> Result<Self> {
        let columns: Vec<String> = columns.into_iter().map(Into::into).collect();
        for (row, values) in rows.iter().enumerate() {
            if values.len() != columns.len() {
                return Err(Error::ShapeMismatch {
                    row,
                    expected: columns.len(),
                    found: values.len(),
                });
            }
        }
        let index = (0..rows.len()).map(|i| i.to_string()).collect();
        Ok(Self {
            columns,
            index,
            rows,
        })
    }

    /// Replace the row labels.
    pub fn with_index<S: Into<String>>(mut self, index: Vec<S>) -> Result<Self> {
        if index.len() != self.rows.len() {
            return Err(Error::InvalidData(format!(
                "index has {} labels for {} rows",
                index.len(),
                self.rows.len()
            )));
        }
        self.index = index.into_iter().map(Into::into).collect();
        Ok(self)
    }

    /// Move the named column out of the data and use it as the row labels.
    pub fn set_index(mut self, column: &str) -> Result<Self> {
        let pos = self
            .columns
            .iter()
            .position(|c| c == column)
            .ok_or_else(|| Error::InvalidData(format!("no column named '{}'", column)))?;

        self.columns.remove(pos);
        self.index = self
            .rows
            .iter_mut()
            .map(|row| row.remove(pos).to_string())
            .collect();
        Ok(self)
    }

    /// Number of rows and columns.
    pub fn shape(&self) -> (usize, usize) {
        (self.rows.len(), self.columns.len())
    }

    /// Whether the frame has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Column names in order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Row labels in order.
    pub fn index(&self) -> &[String] {
        &self.index
    }

    /// Rows in order.
    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    /// Value at `(row, col)`.
    pub fn value(&self, row: usize, col: usize) -> Option<&Value> {
        self.rows.get(row).and_then(|r| r.get(col))
    }

    /// Iterate over one column's values.
    pub fn column(&self, col: usize) -> impl Iterator<Item = &Value> + '_ {
        self.rows.iter().filter_map(move |r| r.get(col))
    }

    /// Load a frame from a CSV file with a header row.
    #[cfg(feature = "csv")]
    pub fn from_csv_path(path: impl AsRef<Path>) -> Result<Self> {
        let file = std::fs::File::open(path.as_ref())?;
        Self::from_csv_reader(std::io::BufReader::new(file))
    }

    /// Load a frame from CSV data with a header row.
    ///
    /// Each field is typed with [`Value::infer`]; short rows are padded with
    /// empty text, long rows are an error.
    #[cfg(feature = "csv")]
    pub fn from_csv_reader<R: std::io::Read>(reader: R) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let columns: Vec<String> = reader.headers()?.iter().map(String::from).collect();
        let mut rows = Vec::new();

        for (row, record) in reader.records().enumerate() {
            let record = record?;
            if record.len() > columns.len() {
                return Err(Error::ShapeMismatch {
                    row,
                    expected: columns.len(),
                    found: record.len(),
                });
            }
            let mut values: Vec<Value> = record.iter().map(Value::infer).collect();
            values.resize(columns.len(), Value::Text(String::new()));
            rows.push(values);
        }

        tracing::debug!(
            rows = rows.len(),
            columns = columns.len(),
            "loaded CSV frame"
        );
        Self::new(columns, rows)
    }

    /// Load a frame from split-oriented JSON.
    ///
    /// `null` becomes `NaN` and booleans become `True` / `False` text.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let split: SplitFrame = serde_json::from_str(json)?;
        let rows = split
            .data
            .into_iter()
            .map(|row| row.into_iter().map(json_to_value).collect())
            .collect();
        let frame = Self::new(split.columns, rows)?;

        match split.index {
            Some(index) => frame.with_index(index.into_iter().map(|v| json_to_value(v).to_string()).collect()),
            None => Ok(frame),
        }
    }

    /// Load a frame from a split-oriented JSON file.
    pub fn from_json_path(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&json)
    }
}

fn json_to_value(value: serde_json::Value) -> Value {
    match value {
        serde_json::Value::Null => Value::Float(f64::NAN),
        serde_json::Value::Bool(b) => Value::Text(if b { "True" } else { "False" }.to_string()),
        serde_json::Value::Number(n) => match n.as_i64() {
            Some(i) => Value::Int(i),
            None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
        },
        serde_json::Value::String(s) => Value::Text(s),
        other => Value::Text(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sales() -> DataFrame {
        DataFrame::new(
            vec!["Region", "Units"],
            vec![
                vec![Value::from("North"), Value::from(1200)],
                vec![Value::from("South"), Value::from(3400)],
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_new_default_index() {
        let frame = sales();
        assert_eq!(frame.shape(), (2, 2));
        assert_eq!(frame.index(), &["0".to_string(), "1".to_string()]);
        assert_eq!(frame.value(1, 1), Some(&Value::Int(3400)));
        assert_eq!(frame.value(2, 0), None);
    }

    #[test]
    fn test_new_rejects_ragged_rows() {
        let err = DataFrame::new(vec!["a", "b"], vec![vec![Value::from(1)]]).unwrap_err();
        assert!(matches!(
            err,
            Error::ShapeMismatch {
                row: 0,
                expected: 2,
                found: 1
            }
        ));
    }

    #[test]
    fn test_set_index() {
        let frame = sales().set_index("Region").unwrap();
        assert_eq!(frame.columns(), &["Units".to_string()]);
        assert_eq!(frame.index(), &["North".to_string(), "South".to_string()]);
        assert_eq!(frame.shape(), (2, 1));
        assert!(sales().set_index("Missing").is_err());
    }

    #[test]
    fn test_with_index_length_checked() {
        assert!(sales().with_index(vec!["only one"]).is_err());
        let frame = sales().with_index(vec!["a", "b"]).unwrap();
        assert_eq!(frame.index()[1], "b");
    }

    #[cfg(feature = "csv")]
    #[test]
    fn test_from_csv_reader() {
        let data = "name,qty,price\nbolt,1500,0.25\nnut,20\n";
        let frame = DataFrame::from_csv_reader(data.as_bytes()).unwrap();
        assert_eq!(frame.shape(), (2, 3));
        assert_eq!(frame.value(0, 1), Some(&Value::Int(1500)));
        assert_eq!(frame.value(0, 2), Some(&Value::Float(0.25)));
        assert_eq!(frame.value(1, 2), Some(&Value::Text(String::new())));
    }

    #[test]
    fn test_from_json_str() {
        let json = r#"{
            "columns": ["a", "b"],
            "index": ["x", "y"],
            "data": [[1, 2.5], [null, "text"]]
        }"#;
        let frame = DataFrame::from_json_str(json).unwrap();
        assert_eq!(frame.index(), &["x".to_string(), "y".to_string()]);
        assert_eq!(frame.value(0, 1), Some(&Value::Float(2.5)));
        assert!(matches!(frame.value(1, 0), Some(Value::Float(f)) if f.is_nan()));
        assert_eq!(frame.column(1).count(), 2);
    }
}
