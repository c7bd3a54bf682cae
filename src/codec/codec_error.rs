use std::fmt;

pub type Result<T> = std::result::Result<T, CodecError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    BadMagic { expected: [u8; 4], found: [u8; 4] },
    TruncatedStream { needed: usize, available: usize },
    EmptyInput,
    UnknownTier(u8),
    InvalidBitWidth(u8),
    UnsupportedSampleRate(u32),
    StreamTooLarge(u32),
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use CodecError::*;
        match self {
            BadMagic { expected, found } => write!(
                f,
                "bad magic tag: expected {:?}, found {:?}",
                String::from_utf8_lossy(expected),
                String::from_utf8_lossy(found)
            ),
            TruncatedStream { needed, available } => write!(
                f,
                "truncated stream: needed {needed} bytes, only {available} available"
            ),
            EmptyInput => write!(f, "cannot encode an empty sample buffer"),
            UnknownTier(t) => write!(f, "unknown tier marker: {t}"),
            InvalidBitWidth(b) => write!(f, "unsupported code width: {b} bits"),
            UnsupportedSampleRate(r) => write!(f, "sample rate {r} Hz outside decoder limits"),
            StreamTooLarge(n) => write!(f, "stream declares {n} deltas, above decoder limit"),
        }
    }
}

impl std::error::Error for CodecError {}
