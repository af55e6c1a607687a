//! This library handles creating **FLAT** resource archives from typed manifests.
//!
//! # FLAT Archive Format Documentation
//!
//! A FLAT file bundles a primary data blob, a metadata text blob and a table of embedded resource
//! files (plus optional texture alternates) into a single self-describing binary image. FLAT files
//! are typically identified with the `.flat` extension.
//!
//! ## File Structure
//!
//! A FLAT file is a sequence of sections written in a fixed order. Some sections carry a tag and a
//! size header, others are stored as raw bytes whose position is tracked externally.
//!
//! | Section        | Header                         | Content                                  |
//! |----------------|--------------------------------|------------------------------------------|
//! | Marker         | 4 bytes: "ELNA", 4 bytes: `0`  | none, only present if requested          |
//! | Primary Data   | none                           | raw file bytes, padded to 4 bytes        |
//! | Text Marker    | none                           | raw file bytes, padded to 4 bytes        |
//! | Metadata Text  | none                           | raw file bytes, padded to 4 bytes        |
//! | Library        | 4 bytes: "LIBL", 4 bytes: size | row count and library entries            |
//! | Alternates     | 4 bytes: "TALT", 4 bytes: size | row count and texture alternate entries  |
//!
//! The marker, text marker and alternates sections are optional.
//!
//! ### Blobs
//!
//! Binary keys are stored using a common blob layout:
//!
//! | Offset (bytes) | Field                  | Description                                             |
//! |----------------|------------------------|---------------------------------------------------------|
//! | 0x0000         | Length                 | 4 bytes: Number of data bytes that follow               |
//! | 0x0004         | Data                   | (Length) bytes: raw data                                |
//! |                | Padding                | zero bytes up to the next 4 byte boundary               |
//!
//! ### Library Entries
//!
//! | Field          | Description                                                              |
//! |----------------|--------------------------------------------------------------------------|
//! | Key            | Blob                                                                     |
//! | Type           | 4 bytes: file type                                                       |
//! | Length         | 4 bytes: number of bytes that follow (file size, plus 4 with a front)    |
//! | Front          | 4 bytes: optional prefix value, only present if the entry has a front    |
//! | Data           | raw file bytes, padded to 4 bytes                                        |
//!
//! ### Texture Alternate Entries
//!
//! | Field          | Description                                                              |
//! |----------------|--------------------------------------------------------------------------|
//! | Length         | 4 bytes: file size                                                       |
//! | Data           | raw file bytes, padded to 4 bytes                                        |
//! | Meta Count     | 4 bytes: number of metadata rows                                         |
//! | Meta Rows      | per row: Key blob followed by four 4 byte integers                       |
//!
//! ## Additional Information
//!
//! - **File Extension**: `.flat`
//! - **Endianness**: Little-endian for all multi-byte integers
//! - **Alignment**: every section and entry ends on a 4 byte boundary
//!

pub mod alternates;
pub mod blob;
pub mod embed;
pub mod error;
pub mod library;
pub mod manifest;
pub mod schema;
pub mod sink;
pub mod types;
pub mod write;

pub use manifest::{Manifest, ManifestFile};
pub use sink::ByteSink;
pub use types::FlatArchive;
pub use write::FlatWriter;
