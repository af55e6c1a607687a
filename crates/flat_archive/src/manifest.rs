//! Typed manifest model and the JSON manifest provider.
//!
//! A manifest is a keyed store of integers, strings and tables. The builder only needs the
//! [`Manifest`] accessors, so any source able to produce typed values can drive it. [`ManifestFile`]
//! is the provider used by the command line tool and reads manifests written as JSON:
//!
//! ```json
//! {
//!   "flat": "flat.bin",
//!   "mtlc": "mtlc.bin",
//!   "libl": {
//!     "columns": [
//!       { "name": "key", "type": "string" },
//!       { "name": "type", "type": "int" },
//!       { "name": "has_front", "type": "int" },
//!       { "name": "front", "type": "int" },
//!       { "name": "path", "type": "string" }
//!     ],
//!     "rows": [["0011", 0, 0, 0, "lib/a.bin"]]
//!   }
//! }
//! ```
//!
//! Cells of a nested table column hold the nested rows directly, e.g. `[["00", 1, 2, 3, 4]]`.

use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value as JsonValue;
use std::{fmt, io::Read, path::Path, str::FromStr};
use tracing::{debug, instrument};

use crate::error::{Error, Result};

/// Keyed read access to a manifest
pub trait Manifest {
    fn get_int(&self, key: &str) -> Option<i32>;
    fn get_string(&self, key: &str) -> Option<&str>;
    fn get_table(&self, key: &str) -> Option<&Table>;
}

/// Declared type of a table column
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ColumnType {
    Int,
    String,
    Table { columns: Vec<Column> },
}

/// A named, typed table column
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub name: String,
    #[serde(flatten)]
    pub column_type: ColumnType,
}

/// A single manifest value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Integer(i32),
    String(String),
    Table(Table),
}

/// One row of a [`Table`], with cells matching the table's columns
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    cells: Vec<Value>,
}

/// An ordered list of rows sharing a column schema
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    columns: Vec<Column>,
    rows: Vec<Row>,
}

impl Column {
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Column {
        Column {
            name: name.into(),
            column_type,
        }
    }
}

impl ColumnType {
    fn name(&self) -> &'static str {
        match self {
            ColumnType::Int => "int",
            ColumnType::String => "string",
            ColumnType::Table { .. } => "table",
        }
    }

    fn accepts(&self, value: &Value) -> bool {
        match (self, value) {
            (ColumnType::Int, Value::Integer(_)) => true,
            (ColumnType::String, Value::String(_)) => true,
            (ColumnType::Table { columns }, Value::Table(table)) => table.columns == *columns,
            _ => false,
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnType::Table { columns } => {
                write!(f, "table(")?;
                for (i, column) in columns.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", column.column_type)?;
                }
                write!(f, ")")
            }
            other => f.write_str(other.name()),
        }
    }
}

impl Row {
    pub fn new(cells: Vec<Value>) -> Row {
        Row { cells }
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn cells(&self) -> &[Value] {
        &self.cells
    }

    pub fn int(&self, column: usize) -> Result<i32> {
        match self.cells.get(column) {
            Some(Value::Integer(i)) => Ok(*i),
            _ => Err(Error::InvalidCell {
                column,
                expected: "int",
            }),
        }
    }

    pub fn string(&self, column: usize) -> Result<&str> {
        match self.cells.get(column) {
            Some(Value::String(s)) => Ok(s.as_str()),
            _ => Err(Error::InvalidCell {
                column,
                expected: "string",
            }),
        }
    }

    pub fn table(&self, column: usize) -> Result<&Table> {
        match self.cells.get(column) {
            Some(Value::Table(t)) => Ok(t),
            _ => Err(Error::InvalidCell {
                column,
                expected: "table",
            }),
        }
    }
}

impl Table {
    /// Create a table, checking every row against the declared columns.
    pub fn new(columns: Vec<Column>, rows: Vec<Row>) -> Result<Table> {
        for (i, row) in rows.iter().enumerate() {
            if row.len() != columns.len() {
                return Err(Error::InvalidManifest(format!(
                    "row {i} has {} cells but the table has {} columns",
                    row.len(),
                    columns.len()
                )));
            }
            for (column, cell) in columns.iter().zip(row.cells()) {
                if !column.column_type.accepts(cell) {
                    return Err(Error::InvalidManifest(format!(
                        "row {i} column '{}' is not of type {}",
                        column.name, column.column_type
                    )));
                }
            }
        }
        Ok(Table { columns, rows })
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Number of rows in the table
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[derive(Deserialize)]
struct RawTable {
    columns: Vec<Column>,
    #[serde(default)]
    rows: Vec<Vec<JsonValue>>,
}

fn int_value(path: &str, number: &serde_json::Number) -> Result<i32> {
    number
        .as_i64()
        .and_then(|v| i32::try_from(v).ok())
        .ok_or_else(|| Error::InvalidManifest(format!("{path}: {number} is not a 32-bit integer")))
}

fn build_value(key: &str, value: JsonValue) -> Result<Value> {
    match value {
        JsonValue::Number(n) => Ok(Value::Integer(int_value(key, &n)?)),
        JsonValue::String(s) => Ok(Value::String(s)),
        value @ JsonValue::Object(_) => {
            let raw = RawTable::deserialize(value)
                .map_err(|e| Error::InvalidManifest(format!("{key}: {e}")))?;
            Ok(Value::Table(build_table(key, raw.columns, raw.rows)?))
        }
        _ => Err(Error::InvalidManifest(format!(
            "{key}: expected an integer, a string or a table"
        ))),
    }
}

fn build_cell(path: &str, column_type: &ColumnType, cell: JsonValue) -> Result<Value> {
    match (column_type, cell) {
        (ColumnType::Int, JsonValue::Number(n)) => Ok(Value::Integer(int_value(path, &n)?)),
        (ColumnType::String, JsonValue::String(s)) => Ok(Value::String(s)),
        (ColumnType::Table { columns }, JsonValue::Array(rows)) => {
            let rows = rows
                .into_iter()
                .enumerate()
                .map(|(i, row)| match row {
                    JsonValue::Array(cells) => Ok(cells),
                    _ => Err(Error::InvalidManifest(format!("{path}[{i}] is not a row"))),
                })
                .collect::<Result<Vec<_>>>()?;
            Ok(Value::Table(build_table(path, columns.clone(), rows)?))
        }
        (column_type, _) => Err(Error::InvalidManifest(format!(
            "{path} is not of type {column_type}"
        ))),
    }
}

fn build_table(path: &str, columns: Vec<Column>, rows: Vec<Vec<JsonValue>>) -> Result<Table> {
    let rows = rows
        .into_iter()
        .enumerate()
        .map(|(i, cells)| {
            if cells.len() != columns.len() {
                return Err(Error::InvalidManifest(format!(
                    "{path}[{i}] has {} cells but the table has {} columns",
                    cells.len(),
                    columns.len()
                )));
            }
            let cells = columns
                .iter()
                .zip(cells)
                .map(|(column, cell)| {
                    build_cell(
                        &format!("{path}[{i}].{}", column.name),
                        &column.column_type,
                        cell,
                    )
                })
                .collect::<Result<Vec<_>>>()?;
            Ok(Row::new(cells))
        })
        .collect::<Result<Vec<_>>>()?;

    Table::new(columns, rows)
}

/// A manifest loaded from JSON
///
/// ```
/// use flat_archive::{Manifest, ManifestFile};
///
/// let manifest: ManifestFile = r#"{ "elna": 1, "flat": "flat.bin" }"#.parse()?;
///
/// assert_eq!(manifest.get_int("elna"), Some(1));
/// assert_eq!(manifest.get_string("flat"), Some("flat.bin"));
/// assert!(manifest.get_table("libl").is_none());
/// # Ok::<(), flat_archive::error::Error>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManifestFile {
    values: IndexMap<String, Value>,
}

impl ManifestFile {
    pub fn new() -> ManifestFile {
        ManifestFile::default()
    }

    /// Parse a JSON manifest from a reader.
    #[instrument(skip(reader), err)]
    pub fn from_reader<R: Read>(reader: R) -> Result<ManifestFile> {
        let raw: IndexMap<String, JsonValue> = serde_json::from_reader(reader)?;
        ManifestFile::from_raw(raw)
    }

    /// Parse a JSON manifest file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()), err)]
    pub fn from_path(path: impl AsRef<Path>) -> Result<ManifestFile> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|source| Error::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        ManifestFile::from_reader(std::io::BufReader::new(file))
    }

    fn from_raw(raw: IndexMap<String, JsonValue>) -> Result<ManifestFile> {
        let mut values = IndexMap::with_capacity(raw.len());
        for (key, value) in raw {
            let value = build_value(&key, value)?;
            debug!("loaded manifest key {key}");
            values.insert(key, value);
        }
        Ok(ManifestFile { values })
    }

    /// Set a value, replacing any previous value for `key`.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.values.insert(key.into(), value)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Iterate over keys in the order they were declared
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }
}

impl FromStr for ManifestFile {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let raw: IndexMap<String, JsonValue> = serde_json::from_str(s)?;
        ManifestFile::from_raw(raw)
    }
}

impl Manifest for ManifestFile {
    fn get_int(&self, key: &str) -> Option<i32> {
        match self.values.get(key) {
            Some(Value::Integer(i)) => Some(*i),
            _ => None,
        }
    }

    fn get_string(&self, key: &str) -> Option<&str> {
        match self.values.get(key) {
            Some(Value::String(s)) => Some(s.as_str()),
            _ => None,
        }
    }

    fn get_table(&self, key: &str) -> Option<&Table> {
        match self.values.get(key) {
            Some(Value::Table(t)) => Some(t),
            _ => None,
        }
    }
}
