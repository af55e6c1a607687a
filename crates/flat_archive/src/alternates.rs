//! Writer for the body of the `TALT` section.

use byteorder::{LittleEndian, WriteBytesExt};
use tracing::{debug, instrument};

use crate::blob;
use crate::embed::FileEmbedder;
use crate::error::Result;
use crate::manifest::{Row, Table};
use crate::schema::ALTERNATES;
use crate::sink::{size_u32, ByteSink};

const PATH: usize = 0;
const META: usize = 1;

/// Writes the table of texture alternates and their metadata
pub struct AlternatesWriter<'a> {
    embedder: &'a FileEmbedder,
}

impl<'a> AlternatesWriter<'a> {
    pub fn new(embedder: &'a FileEmbedder) -> AlternatesWriter<'a> {
        AlternatesWriter { embedder }
    }

    /// Write the row count followed by every alternate and its metadata rows.
    ///
    /// The table shape, including the nested metadata table, is checked before anything is written.
    #[instrument(skip_all, fields(rows = table.len()), err)]
    pub fn write(&self, sink: &mut ByteSink, table: &Table) -> Result<()> {
        ALTERNATES.validate(table.columns())?;

        sink.write_u32::<LittleEndian>(size_u32(table.len())?)?;
        for row in table.rows() {
            self.write_row(sink, row)?;
        }

        Ok(())
    }

    fn write_row(&self, sink: &mut ByteSink, row: &Row) -> Result<()> {
        let path = row.string(PATH)?;
        let file = self.embedder.load(path)?;
        sink.write_u32::<LittleEndian>(file.size()?)?;
        file.append_to(sink)?;
        sink.pad_to_4();

        let meta = row.table(META)?;
        sink.write_u32::<LittleEndian>(size_u32(meta.len())?)?;
        for meta_row in meta.rows() {
            blob::decode_and_append(sink, meta_row.string(0)?)?;
            for column in 1..=4 {
                sink.write_i32::<LittleEndian>(meta_row.int(column)?)?;
            }
        }

        debug!("embedded alternate {path} with {} metadata rows", meta.len());
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_str_eq;
    use tracing_test::traced_test;

    use crate::alternates::AlternatesWriter;
    use crate::embed::FileEmbedder;
    use crate::error::{Error, Result};
    use crate::manifest::{Column, ColumnType, Row, Table, Value};
    use crate::sink::ByteSink;

    fn meta_columns() -> Vec<Column> {
        vec![
            Column::new("key", ColumnType::String),
            Column::new("uk2", ColumnType::Int),
            Column::new("uk3", ColumnType::Int),
            Column::new("uk4", ColumnType::Int),
            Column::new("uk5", ColumnType::Int),
        ]
    }

    fn columns() -> Vec<Column> {
        vec![
            Column::new("path", ColumnType::String),
            Column::new(
                "meta",
                ColumnType::Table {
                    columns: meta_columns(),
                },
            ),
        ]
    }

    fn meta_row(key: &str, values: [i32; 4]) -> Row {
        let mut cells = vec![Value::String(key.into())];
        cells.extend(values.into_iter().map(Value::Integer));
        Row::new(cells)
    }

    #[traced_test]
    #[test]
    fn write_alternate_with_meta() -> Result<()> {
        let dir = tempfile::tempdir()?;
        std::fs::write(dir.path().join("alt.png"), [0xB1, 0xB2])?;
        let embedder = FileEmbedder::new(Some(dir.path().to_path_buf()));

        let meta = Table::new(
            meta_columns(),
            vec![meta_row("AB", [1, 2, 3, 4]), meta_row("", [-1, 0, 0, 5])],
        )?;
        let table = Table::new(
            columns(),
            vec![Row::new(vec![
                Value::String("alt.png".into()),
                Value::Table(meta),
            ])],
        )?;

        let mut sink = ByteSink::new();
        AlternatesWriter::new(&embedder).write(&mut sink, &table)?;

        #[rustfmt::skip]
        let expected = vec![
            // Row count
            0x01, 0x00, 0x00, 0x00,
            // Length
            0x02, 0x00, 0x00, 0x00,
            // Data
            0xB1, 0xB2, 0x00, 0x00,
            // Meta count
            0x02, 0x00, 0x00, 0x00,
            // Meta 0
            0x01, 0x00, 0x00, 0x00,
            0xAB, 0x00, 0x00, 0x00,
            0x01, 0x00, 0x00, 0x00,
            0x02, 0x00, 0x00, 0x00,
            0x03, 0x00, 0x00, 0x00,
            0x04, 0x00, 0x00, 0x00,
            // Meta 1
            0x00, 0x00, 0x00, 0x00,
            0xFF, 0xFF, 0xFF, 0xFF,
            0x00, 0x00, 0x00, 0x00,
            0x00, 0x00, 0x00, 0x00,
            0x05, 0x00, 0x00, 0x00,
        ];
        assert_str_eq!(
            format!("{:02X?}", sink.as_slice()),
            format!("{:02X?}", expected)
        );

        Ok(())
    }

    #[traced_test]
    #[test]
    fn alternate_without_meta() -> Result<()> {
        let dir = tempfile::tempdir()?;
        std::fs::write(dir.path().join("alt.png"), [0xB1, 0xB2, 0xB3, 0xB4])?;
        let embedder = FileEmbedder::new(Some(dir.path().to_path_buf()));

        let table = Table::new(
            columns(),
            vec![Row::new(vec![
                Value::String("alt.png".into()),
                Value::Table(Table::new(meta_columns(), Vec::new())?),
            ])],
        )?;

        let mut sink = ByteSink::new();
        AlternatesWriter::new(&embedder).write(&mut sink, &table)?;

        #[rustfmt::skip]
        let expected = vec![
            0x01, 0x00, 0x00, 0x00,
            0x04, 0x00, 0x00, 0x00,
            0xB1, 0xB2, 0xB3, 0xB4,
            0x00, 0x00, 0x00, 0x00,
        ];
        assert_eq!(sink.into_inner(), expected);

        Ok(())
    }

    #[traced_test]
    #[test]
    fn nested_schema_mismatch_writes_nothing() -> Result<()> {
        let mut meta = meta_columns();
        meta.truncate(3);
        let table = Table::new(
            vec![
                Column::new("path", ColumnType::String),
                Column::new("meta", ColumnType::Table { columns: meta }),
            ],
            Vec::new(),
        )?;

        let embedder = FileEmbedder::default();
        let mut sink = ByteSink::new();
        let result = AlternatesWriter::new(&embedder).write(&mut sink, &table);

        assert!(matches!(result, Err(Error::SchemaMismatch { .. })));
        assert!(sink.is_empty());

        Ok(())
    }
}
