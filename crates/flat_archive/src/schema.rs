//! Fixed table shapes required by the table sections.

use std::fmt;

use crate::error::{Error, Result};
use crate::manifest::{Column, ColumnType};

/// Expected type of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Int,
    String,
    Table(&'static [ColumnSchema]),
}

/// Expected name and type of a column, the name is only used for diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSchema {
    pub name: &'static str,
    pub kind: ColumnKind,
}

/// Expected shape of a manifest table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableSchema {
    pub name: &'static str,
    pub columns: &'static [ColumnSchema],
}

const fn column(name: &'static str, kind: ColumnKind) -> ColumnSchema {
    ColumnSchema { name, kind }
}

/// `libl`: key, type, has_front, front, path
pub const LIBRARY: TableSchema = TableSchema {
    name: "libl",
    columns: &[
        column("key", ColumnKind::String),
        column("type", ColumnKind::Int),
        column("has_front", ColumnKind::Int),
        column("front", ColumnKind::Int),
        column("path", ColumnKind::String),
    ],
};

/// `talt.meta`: key followed by four integers
pub const ALTERNATE_META: TableSchema = TableSchema {
    name: "talt.meta",
    columns: &[
        column("key", ColumnKind::String),
        column("uk2", ColumnKind::Int),
        column("uk3", ColumnKind::Int),
        column("uk4", ColumnKind::Int),
        column("uk5", ColumnKind::Int),
    ],
};

/// `talt`: path, meta
pub const ALTERNATES: TableSchema = TableSchema {
    name: "talt",
    columns: &[
        column("path", ColumnKind::String),
        column("meta", ColumnKind::Table(ALTERNATE_META.columns)),
    ],
};

fn matches(expected: &[ColumnSchema], found: &[Column]) -> bool {
    expected.len() == found.len()
        && expected
            .iter()
            .zip(found)
            .all(|(e, f)| match (e.kind, &f.column_type) {
                (ColumnKind::Int, ColumnType::Int) => true,
                (ColumnKind::String, ColumnType::String) => true,
                (ColumnKind::Table(sub), ColumnType::Table { columns }) => matches(sub, columns),
                _ => false,
            })
}

struct ExpectedShape(&'static [ColumnSchema]);

impl fmt::Display for ExpectedShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, column) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            match column.kind {
                ColumnKind::Int => write!(f, "int")?,
                ColumnKind::String => write!(f, "string")?,
                ColumnKind::Table(sub) => write!(f, "table({})", ExpectedShape(sub))?,
            }
        }
        Ok(())
    }
}

struct FoundShape<'a>(&'a [Column]);

impl fmt::Display for FoundShape<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, column) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", column.column_type)?;
        }
        Ok(())
    }
}

impl TableSchema {
    /// Check `columns` against this shape, including nested tables.
    pub fn validate(&self, columns: &[Column]) -> Result<()> {
        if matches(self.columns, columns) {
            return Ok(());
        }
        Err(Error::SchemaMismatch {
            table: self.name.to_string(),
            expected: ExpectedShape(self.columns).to_string(),
            found: FoundShape(columns).to_string(),
        })
    }
}
