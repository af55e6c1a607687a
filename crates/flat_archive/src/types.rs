//! Base types for structure of FLAT file.

use binrw::{BinRead, BinWrite};
use std::fmt;

/// Four character tag identifying a headed section
#[derive(BinRead, BinWrite, Debug, Copy, Clone, PartialEq, Eq)]
pub enum SectionTag {
    #[brw(magic = b"ELNA")]
    Elna,

    #[brw(magic = b"LIBL")]
    Libl,

    #[brw(magic = b"TALT")]
    Talt,
}

/// Header preceding the marker, library and alternates sections
///
/// All data is stored in little endian format
#[derive(BinRead, BinWrite, Debug, Copy, Clone, PartialEq, Eq)]
#[brw(little)]
pub struct SectionHeader {
    /// The tag for this section
    pub tag: SectionTag,

    /// Size of the section content following the header
    pub size: u32,
}

impl SectionHeader {
    /// Length of a header in bytes
    pub const SIZE: usize = 8;

    pub fn new(tag: SectionTag) -> SectionHeader {
        SectionHeader { tag, size: 0 }
    }
}

/// Every section of a FLAT file, in the order they are written
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SectionKind {
    Marker,
    PrimaryData,
    TextMarker,
    MetadataText,
    Library,
    Alternates,
}

impl SectionKind {
    pub const ALL: [SectionKind; 6] = [
        SectionKind::Marker,
        SectionKind::PrimaryData,
        SectionKind::TextMarker,
        SectionKind::MetadataText,
        SectionKind::Library,
        SectionKind::Alternates,
    ];

    /// The manifest key which controls this section
    pub const fn key(self) -> &'static str {
        match self {
            SectionKind::Marker => "elna",
            SectionKind::PrimaryData => "flat",
            SectionKind::TextMarker => "tmnl",
            SectionKind::MetadataText => "mtlc",
            SectionKind::Library => "libl",
            SectionKind::Alternates => "talt",
        }
    }
}

impl fmt::Display for SectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Position and recorded size of a section within the image
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct Section {
    /// Offset from the start of the image where the section begins
    pub offset: u32,

    /// Recorded size of the section content
    pub size: u32,
}

/// A fully assembled FLAT image along with the location of each section
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlatArchive {
    pub elna: Option<Section>,
    pub flat: Section,
    pub tmnl: Option<Section>,
    pub mtlc: Section,
    pub libl: Section,
    pub talt: Option<Section>,
    pub(crate) data: Vec<u8>,
}

impl FlatArchive {
    /// Look up a section by kind, `None` if it was not written
    pub fn section(&self, kind: SectionKind) -> Option<Section> {
        match kind {
            SectionKind::Marker => self.elna,
            SectionKind::PrimaryData => Some(self.flat),
            SectionKind::TextMarker => self.tmnl,
            SectionKind::MetadataText => Some(self.mtlc),
            SectionKind::Library => Some(self.libl),
            SectionKind::Alternates => self.talt,
        }
    }

    /// Iterate over the written sections in image order
    pub fn sections(&self) -> impl Iterator<Item = (SectionKind, Section)> + '_ {
        SectionKind::ALL
            .into_iter()
            .filter_map(|kind| self.section(kind).map(|s| (kind, s)))
    }

    /// The finished image
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Total size of the image in bytes
    pub fn data_size(&self) -> usize {
        self.data.len()
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }
}

#[cfg(test)]
mod test {
    use std::io::Cursor;

    use binrw::BinRead;
    use binrw::BinWrite;
    use pretty_assertions::assert_eq;

    use crate::error::Result;
    use crate::types::{SectionHeader, SectionTag};

    #[test]
    fn write_library_header() -> Result<()> {
        #[rustfmt::skip]
        let expected: Vec<u8> = vec![
            b'L', b'I', b'B', b'L',
            0x18, 0x00, 0x00, 0x00,
        ];

        let header = SectionHeader {
            tag: SectionTag::Libl,
            size: 24,
        };

        let mut actual = Vec::new();
        header.write(&mut Cursor::new(&mut actual))?;

        assert_eq!(actual, expected);

        Ok(())
    }

    #[test]
    fn read_alternates_header() -> Result<()> {
        #[rustfmt::skip]
        let mut input = Cursor::new(vec![
            b'T', b'A', b'L', b'T',
            0x00, 0x01, 0x00, 0x00,
        ]);

        let expected = SectionHeader {
            tag: SectionTag::Talt,
            size: 256,
        };

        assert_eq!(SectionHeader::read(&mut input)?, expected);

        Ok(())
    }

    #[test]
    fn read_unknown_tag_fails() {
        let mut input = Cursor::new(b"NOPE\x00\x00\x00\x00".to_vec());
        assert!(SectionHeader::read(&mut input).is_err());
    }
}
