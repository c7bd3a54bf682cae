//! Header framing shared by both container layouts.
//!
//! Every container opens with the same preamble: a 4-byte ASCII tag, the
//! sample rate and an element count, both little-endian `u32`. The
//! layout-specific reference sample and payload follow.

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::io::Cursor;

use super::codec_error::{CodecError, Result};

pub const PREAMBLE_LEN: usize = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Preamble {
    pub sample_rate: u32,
    pub count: u32,
}

pub fn write_preamble(out: &mut Vec<u8>, magic: [u8; 4], preamble: Preamble) {
    out.extend_from_slice(&magic);
    // Writes into a Vec cannot fail.
    let _ = out.write_u32::<LittleEndian>(preamble.sample_rate);
    let _ = out.write_u32::<LittleEndian>(preamble.count);
}

/// Fails with `TruncatedStream` unless `bytes` holds at least `needed` bytes.
pub fn ensure_len(bytes: &[u8], needed: usize) -> Result<()> {
    if bytes.len() < needed {
        return Err(CodecError::TruncatedStream {
            needed,
            available: bytes.len(),
        });
    }
    Ok(())
}

/// Checks the tag and that the full fixed-size header is present, then
/// returns the preamble and a cursor positioned right after it.
pub fn read_preamble(
    bytes: &[u8],
    magic: [u8; 4],
    header_len: usize,
) -> Result<(Preamble, Cursor<&[u8]>)> {
    ensure_len(bytes, magic.len())?;
    let mut found = [0u8; 4];
    found.copy_from_slice(&bytes[..4]);
    if found != magic {
        return Err(CodecError::BadMagic {
            expected: magic,
            found,
        });
    }
    ensure_len(bytes, header_len)?;

    let truncated = |_| CodecError::TruncatedStream {
        needed: header_len,
        available: bytes.len(),
    };
    let mut cursor = Cursor::new(bytes);
    cursor.set_position(magic.len() as u64);
    let sample_rate = cursor.read_u32::<LittleEndian>().map_err(truncated)?;
    let count = cursor.read_u32::<LittleEndian>().map_err(truncated)?;
    Ok((Preamble { sample_rate, count }, cursor))
}
