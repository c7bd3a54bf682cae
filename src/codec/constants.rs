// Variable-width tiered delta container
pub const VARIABLE_WIDTH_MAGIC: [u8; 4] = *b"PGDD";
pub const VARIABLE_WIDTH_HEADER_LEN: usize = 14; // magic + rate + count + i16 reference

// Byte-aligned 8-bit delta container
pub const FIXED_WIDTH_MAGIC: [u8; 4] = *b"FQWT";
pub const FIXED_WIDTH_HEADER_LEN: usize = 13; // magic + rate + count + i8 first sample

// Reference sample is stored at full 16-bit precision
pub const REFERENCE_BITS: u8 = 16;
pub const REFERENCE_SCALE: f32 = 32767.0;

// Every variable-width entry is prefixed with a 2-bit tier index
pub const TIER_MARKER_BITS: u8 = 2;

// Fixed-width reconstruction scale (int8 -> [-1, 1])
pub const FIXED_WIDTH_SCALE: f32 = 127.0;

// Samples handed to the DAC per streaming decode call
pub const STREAM_BUFFER_SAMPLES: usize = 1024;
