//! Delta audio codecs and their container formats.

pub mod bit_packer;
pub mod codec_config;
pub mod codec_error;
pub mod constants;
pub mod delta_classifier;
pub mod delta_codec;
pub mod fixed_width;
pub mod fixed_width_reader;
pub mod framing;
pub mod sample_quantizer;

pub use codec_config::CodecConfig;
pub use codec_error::CodecError;
pub use delta_classifier::{DeltaClassifier, Tier, TierStats};
pub use delta_codec::{DecodedAudio, DeltaCodec, EncodedEntry};
pub use fixed_width::FixedWidthCodec;
pub use fixed_width_reader::FixedWidthReader;
