//! Types for writing FLAT archives
//!

use binrw::{io::NoSeek, BinWrite};
use bon::Builder;
use std::path::PathBuf;
use tracing::{info, instrument};

use crate::alternates::AlternatesWriter;
use crate::embed::FileEmbedder;
use crate::error::{Error, Result};
use crate::library::LibraryWriter;
use crate::manifest::{Manifest, Table};
use crate::schema::{TableSchema, ALTERNATES, LIBRARY};
use crate::sink::{size_u32, ByteSink};
use crate::types::{FlatArchive, Section, SectionHeader, SectionKind, SectionTag};

/// Options for how the FLAT file should be written
#[derive(Debug, Clone, Default, Builder)]
pub struct FlatWriterOptions {
    /// Directory that relative manifest paths are resolved against
    #[builder(into)]
    pub base_dir: Option<PathBuf>,
}

/// FLAT archive generator
///
/// The whole image is assembled in memory, so a failed build never produces a partial file.
///
/// ```
/// # fn doit() -> flat_archive::error::Result<()>
/// # {
/// use flat_archive::{write::FlatWriterOptions, FlatWriter, ManifestFile};
///
/// let dir = std::env::temp_dir().join("flat_archive_doc");
/// std::fs::create_dir_all(&dir)?;
/// std::fs::write(dir.join("flat.bin"), b"FLAT")?;
/// std::fs::write(dir.join("mtlc.bin"), b"M")?;
///
/// let manifest: ManifestFile = r#"{
///     "flat": "flat.bin",
///     "mtlc": "mtlc.bin",
///     "libl": { "columns": [
///         { "name": "key", "type": "string" },
///         { "name": "type", "type": "int" },
///         { "name": "has_front", "type": "int" },
///         { "name": "front", "type": "int" },
///         { "name": "path", "type": "string" }
///     ] }
/// }"#.parse()?;
///
/// let writer = FlatWriter::new(FlatWriterOptions::builder().base_dir(&dir).build());
/// let flat = writer.build(&manifest)?;
/// assert_eq!(flat.data_size(), 20);
/// # Ok(())
/// # }
/// # doit().unwrap();
/// ```
#[derive(Debug, Clone, Default)]
pub struct FlatWriter {
    embedder: FileEmbedder,
}

impl FlatWriter {
    pub fn new(options: FlatWriterOptions) -> FlatWriter {
        FlatWriter {
            embedder: FileEmbedder::new(options.base_dir),
        }
    }

    /// Assemble every section described by `manifest`.
    #[instrument(skip_all, err)]
    pub fn build(&self, manifest: &impl Manifest) -> Result<FlatArchive> {
        let mut sink = ByteSink::new();

        let elna = if manifest.get_int(SectionKind::Marker.key()).unwrap_or(0) != 0 {
            let offset = size_u32(sink.len())?;
            SectionHeader::new(SectionTag::Elna).write(&mut NoSeek::new(&mut sink))?;
            log_section(SectionKind::Marker, offset, 0);
            Some(Section { offset, size: 0 })
        } else {
            None
        };

        let flat = self.write_raw(
            &mut sink,
            SectionKind::PrimaryData,
            required_string(manifest, SectionKind::PrimaryData)?,
        )?;

        let tmnl = match manifest.get_string(SectionKind::TextMarker.key()) {
            Some(path) => Some(self.write_raw(&mut sink, SectionKind::TextMarker, path)?),
            None => None,
        };

        let mtlc = self.write_raw(
            &mut sink,
            SectionKind::MetadataText,
            required_string(manifest, SectionKind::MetadataText)?,
        )?;

        let libl_table = manifest
            .get_table(SectionKind::Library.key())
            .ok_or_else(|| Error::MissingField(SectionKind::Library.key().to_string()))?;
        let library = LibraryWriter::new(&self.embedder);
        let libl = write_table(
            &mut sink,
            SectionKind::Library,
            SectionTag::Libl,
            &LIBRARY,
            libl_table,
            |sink| library.write(sink, libl_table),
        )?;

        let talt = match manifest.get_table(SectionKind::Alternates.key()) {
            Some(talt_table) => {
                let alternates = AlternatesWriter::new(&self.embedder);
                Some(write_table(
                    &mut sink,
                    SectionKind::Alternates,
                    SectionTag::Talt,
                    &ALTERNATES,
                    talt_table,
                    |sink| alternates.write(sink, talt_table),
                )?)
            }
            None => None,
        };

        info!("assembled flat archive of {} bytes", sink.len());

        Ok(FlatArchive {
            elna,
            flat,
            tmnl,
            mtlc,
            libl,
            talt,
            data: sink.into_inner(),
        })
    }

    /// Embed a raw file section.
    ///
    /// The recorded size is computed as if an 8 byte header preceded the content, even though none
    /// is written here; readers of the format expect exactly this value.
    fn write_raw(&self, sink: &mut ByteSink, kind: SectionKind, path: &str) -> Result<Section> {
        let offset = size_u32(sink.len())?;
        self.embedder.embed(sink, path)?;
        let end = size_u32(sink.len())?;
        let size = end
            .wrapping_sub(offset)
            .wrapping_sub(SectionHeader::SIZE as u32);
        sink.pad_to_4();

        log_section(kind, offset, size);
        Ok(Section { offset, size })
    }
}

fn required_string(manifest: &impl Manifest, kind: SectionKind) -> Result<&str> {
    manifest
        .get_string(kind.key())
        .ok_or_else(|| Error::MissingField(kind.key().to_string()))
}

fn log_section(kind: SectionKind, offset: u32, size: u32) {
    info!("wrote {kind} section at {offset:#x} (size {size})");
}

/// Write a tagged table section, backpatching its size once the body is complete.
fn write_table(
    sink: &mut ByteSink,
    kind: SectionKind,
    tag: SectionTag,
    schema: &TableSchema,
    table: &Table,
    body: impl FnOnce(&mut ByteSink) -> Result<()>,
) -> Result<Section> {
    // nothing of the section may be emitted for a malformed table
    schema.validate(table.columns())?;

    let start = sink.len();
    SectionHeader::new(tag).write(&mut NoSeek::new(&mut *sink))?;
    body(sink)?;

    let size = size_u32(sink.len() - start - SectionHeader::SIZE)?;
    sink.overwrite_u32(start + 4, size);
    sink.pad_to_4();

    let offset = size_u32(start)?;
    log_section(kind, offset, size);
    Ok(Section { offset, size })
}
