//! Hex encoded binary blobs.
//!
//! Binary keys are stored in the manifest as strings of hex digit pairs and written to the archive
//! as a 4 byte length, the decoded bytes and zero padding up to a 4 byte boundary.

use tracing::{instrument, Level};

use crate::error::{Error, Result};
use crate::sink::{size_u32, ByteSink};

/// Decode `hex` and append it to `sink` as a length prefixed, padded blob.
///
/// Returns the number of decoded bytes. Nothing is written if `hex` is not valid.
#[instrument(skip(sink), err, ret(level = Level::TRACE))]
pub fn decode_and_append(sink: &mut ByteSink, hex: &str) -> Result<usize> {
    if hex.len() % 2 != 0 {
        return Err(Error::FormatError(hex::FromHexError::OddLength));
    }
    let data = hex::decode(hex)?;
    let size = size_u32(data.len())?;

    let offset = sink.reserve_u32();
    sink.append(&data);
    sink.overwrite_u32(offset, size);
    sink.pad_to_4();

    Ok(data.len())
}
