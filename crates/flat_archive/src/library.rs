//! Writer for the body of the `LIBL` section.

use byteorder::{LittleEndian, WriteBytesExt};
use tracing::{debug, instrument};

use crate::blob;
use crate::embed::FileEmbedder;
use crate::error::{Error, Result};
use crate::manifest::{Row, Table};
use crate::schema::LIBRARY;
use crate::sink::{size_u32, ByteSink};

const KEY: usize = 0;
const TYPE: usize = 1;
const HAS_FRONT: usize = 2;
const FRONT: usize = 3;
const PATH: usize = 4;

/// Writes the table of library files
pub struct LibraryWriter<'a> {
    embedder: &'a FileEmbedder,
}

impl<'a> LibraryWriter<'a> {
    pub fn new(embedder: &'a FileEmbedder) -> LibraryWriter<'a> {
        LibraryWriter { embedder }
    }

    /// Write the row count followed by every library entry.
    ///
    /// The table shape is checked before anything is written.
    #[instrument(skip_all, fields(rows = table.len()), err)]
    pub fn write(&self, sink: &mut ByteSink, table: &Table) -> Result<()> {
        LIBRARY.validate(table.columns())?;

        sink.write_u32::<LittleEndian>(size_u32(table.len())?)?;
        for row in table.rows() {
            self.write_row(sink, row)?;
        }

        Ok(())
    }

    fn write_row(&self, sink: &mut ByteSink, row: &Row) -> Result<()> {
        let path = row.string(PATH)?;
        blob::decode_and_append(sink, row.string(KEY)?)?;
        sink.write_i32::<LittleEndian>(row.int(TYPE)?)?;

        let file = self.embedder.load(path)?;
        let size = file.size()?;
        if row.int(HAS_FRONT)? != 0 {
            // the declared length covers the front value as well
            let declared = size.checked_add(4).ok_or(Error::SizeOverflow(file.data().len()))?;
            sink.write_u32::<LittleEndian>(declared)?;
            sink.write_i32::<LittleEndian>(row.int(FRONT)?)?;
        } else {
            sink.write_u32::<LittleEndian>(size)?;
        }
        file.append_to(sink)?;
        sink.pad_to_4();

        debug!("embedded library file {path} ({size} bytes)");
        Ok(())
    }
}
