//! Sub-byte bit packing.
//!
//! Codes are OR'ed into a carry register at the current bit offset, least
//! significant bit first, and whole bytes are drained from the low end as
//! soon as eight bits are available. Between calls the register never holds
//! more than seven bits. The last byte of a stream is zero padded.

use super::codec_error::{CodecError, Result};

#[inline]
fn width_mask(bits: u8) -> u32 {
    (1u32 << bits) - 1
}

fn check_width(bits: u8) -> Result<()> {
    if bits == 0 || bits > MAX_CODE_BITS {
        return Err(CodecError::InvalidBitWidth(bits));
    }
    Ok(())
}

/// Widest single code: seven carried bits plus 24 still fit the 32-bit register.
pub const MAX_CODE_BITS: u8 = 24;

#[derive(Debug, Default)]
pub struct BitPacker {
    out: Vec<u8>,
    acc: u32,
    bit_count: u32,
}

impl BitPacker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(bytes: usize) -> Self {
        Self {
            out: Vec::with_capacity(bytes),
            acc: 0,
            bit_count: 0,
        }
    }

    /// Appends the low `bits` bits of `code`. Higher bits are discarded.
    pub fn push(&mut self, bits: u8, code: u32) -> Result<()> {
        check_width(bits)?;
        self.acc |= (code & width_mask(bits)) << self.bit_count;
        self.bit_count += u32::from(bits);

        while self.bit_count >= 8 {
            self.out.push((self.acc & 0xFF) as u8);
            self.acc >>= 8;
            self.bit_count -= 8;
        }
        Ok(())
    }

    /// Total payload bits written so far, padding excluded.
    pub fn bit_len(&self) -> usize {
        self.out.len() * 8 + self.bit_count as usize
    }

    /// Flushes the carry (if any) as one final, zero padded byte.
    pub fn finish(mut self) -> Vec<u8> {
        if self.bit_count > 0 {
            self.out.push((self.acc & 0xFF) as u8);
        }
        self.out
    }
}

/// Packs `(bits, code)` pairs into a dense byte stream.
pub fn pack<I>(entries: I) -> Result<Vec<u8>>
where
    I: IntoIterator<Item = (u8, u32)>,
{
    let mut packer = BitPacker::new();
    for (bits, code) in entries {
        packer.push(bits, code)?;
    }
    Ok(packer.finish())
}

/// Reads variable-width codes back out of a packed stream.
#[derive(Debug)]
pub struct BitUnpacker<'a> {
    buf: &'a [u8],
    pos: usize,
    acc: u32,
    bit_count: u32,
}

impl<'a> BitUnpacker<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self {
            buf,
            pos: 0,
            acc: 0,
            bit_count: 0,
        }
    }

    /// Pulls the next `bits` wide code, fetching bytes as needed.
    pub fn read(&mut self, bits: u8) -> Result<u32> {
        check_width(bits)?;
        let want = u32::from(bits);
        while self.bit_count < want {
            let Some(&byte) = self.buf.get(self.pos) else {
                return Err(CodecError::TruncatedStream {
                    needed: self.pos + 1,
                    available: self.buf.len(),
                });
            };
            self.acc |= u32::from(byte) << self.bit_count;
            self.bit_count += 8;
            self.pos += 1;
        }
        let code = self.acc & width_mask(bits);
        self.acc >>= want;
        self.bit_count -= want;
        Ok(code)
    }

    /// Bytes pulled from the buffer so far.
    pub fn bytes_consumed(&self) -> usize {
        self.pos
    }
}

/// Unpacks one code per requested width. Trailing padding is never read as data.
pub fn unpack(buf: &[u8], widths: &[u8]) -> Result<Vec<u32>> {
    let mut reader = BitUnpacker::new(buf);
    widths.iter().map(|&bits| reader.read(bits)).collect()
}
