//! Variable-width tiered delta container.
//!
//! Layout (little-endian):
//!
//! | offset | size | field                                     |
//! |--------|------|-------------------------------------------|
//! | 0      | 4    | magic `PGDD`                              |
//! | 4      | 4    | sample rate                               |
//! | 8      | 4    | entry count (`samples.len() - 1`)         |
//! | 12     | 2    | reference sample, `i16`                   |
//! | 14     | ..   | bitstream                                 |
//!
//! The sample rate field is an addition to the bare `PGDD` header
//! (count at 4, reference at 8, bitstream at 10): it is placed as in the
//! fixed-width container so `decode` can return the rate with the samples.
//! Containers in the bare layout do not parse.
//!
//! Each bitstream entry is a 2-bit tier marker followed by the tier-width
//! two's complement code, packed LSB-first with no byte alignment. The
//! marker is what makes the stream self-decodable: code widths differ per
//! entry and are not otherwise recoverable.
//!
//! Reconstruction is a plain running sum of dequantized deltas with no
//! clamping, so amplitude error can accumulate over long runs.

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::sync::Arc;

use super::{
    bit_packer::{BitPacker, BitUnpacker},
    codec_config::TierConfig,
    codec_error::{CodecError, Result},
    constants::{
        REFERENCE_BITS, REFERENCE_SCALE, TIER_MARKER_BITS, VARIABLE_WIDTH_HEADER_LEN,
        VARIABLE_WIDTH_MAGIC,
    },
    delta_classifier::{DeltaClassifier, Tier, TierStats},
    framing::{self, Preamble},
    sample_quantizer::{dequantize, from_unsigned, quantize, to_unsigned},
};
use crate::log::{NoopLogSink, log_sink::LogSink};
use crate::{sink_debug, sink_trace, sink_warn};

/// One element of an encoded sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodedEntry {
    /// First sample at full 16-bit precision; never classified.
    Reference { code: i16 },
    Delta { tier: Tier, bits: u8, code: i32 },
}

impl EncodedEntry {
    pub fn bits(&self) -> u8 {
        match self {
            EncodedEntry::Reference { .. } => REFERENCE_BITS,
            EncodedEntry::Delta { bits, .. } => *bits,
        }
    }
}

/// Samples recovered from a container together with their rate.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedAudio {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
}

pub struct DeltaCodec {
    classifier: DeltaClassifier,
    log_sink: Arc<dyn LogSink>,
}

impl Default for DeltaCodec {
    fn default() -> Self {
        Self {
            classifier: DeltaClassifier::default(),
            log_sink: Arc::new(NoopLogSink),
        }
    }
}

impl DeltaCodec {
    /// Encoder and decoder must be built from the same `TierConfig`; tier
    /// widths are not stored in the container.
    ///
    /// # Errors
    /// `InvalidBitWidth` when a tier width is outside `2..=16`.
    pub fn new(tiers: TierConfig) -> Result<Self> {
        Ok(Self {
            classifier: DeltaClassifier::new(tiers)?,
            log_sink: Arc::new(NoopLogSink),
        })
    }

    pub fn with_log_sink(mut self, log_sink: Arc<dyn LogSink>) -> Self {
        self.log_sink = log_sink;
        self
    }

    pub fn classifier(&self) -> &DeltaClassifier {
        &self.classifier
    }

    /// Classifies and quantizes every delta. The first entry is always the
    /// reference sample.
    pub fn entries(&self, samples: &[f32]) -> Result<Vec<EncodedEntry>> {
        let (&first, _) = samples.split_first().ok_or(CodecError::EmptyInput)?;

        let mut entries = Vec::with_capacity(samples.len());
        entries.push(EncodedEntry::Reference {
            code: reference_code(first),
        });
        for pair in samples.windows(2) {
            let delta = pair[1] - pair[0];
            let tier = self.classifier.classify(delta);
            let bits = self.classifier.bits(tier);
            entries.push(EncodedEntry::Delta {
                tier,
                bits,
                code: quantize(delta, bits),
            });
        }
        Ok(entries)
    }

    pub fn encode(&self, samples: &[f32], sample_rate: u32) -> Result<Vec<u8>> {
        self.encode_with_stats(samples, sample_rate).map(|(bytes, _)| bytes)
    }

    /// Encodes and also reports the tier distribution of the deltas.
    pub fn encode_with_stats(
        &self,
        samples: &[f32],
        sample_rate: u32,
    ) -> Result<(Vec<u8>, TierStats)> {
        let entries = self.entries(samples)?;
        let entry_count = u32::try_from(entries.len() - 1)
            .map_err(|_| CodecError::StreamTooLarge(u32::MAX))?;

        let mut stats = self.classifier.stats(std::iter::empty());
        let mut packer = BitPacker::with_capacity(entries.len() * 2);
        let mut reference = 0i16;
        for entry in &entries {
            match *entry {
                EncodedEntry::Reference { code } => reference = code,
                EncodedEntry::Delta { tier, bits, code } => {
                    stats.record(tier);
                    packer.push(TIER_MARKER_BITS, u32::from(tier.index()))?;
                    packer.push(bits, to_unsigned(code, bits))?;
                }
            }
        }
        let payload_bits = packer.bit_len();
        let bitstream = packer.finish();

        let mut out = Vec::with_capacity(VARIABLE_WIDTH_HEADER_LEN + bitstream.len());
        framing::write_preamble(
            &mut out,
            VARIABLE_WIDTH_MAGIC,
            Preamble {
                sample_rate,
                count: entry_count,
            },
        );
        let _ = out.write_i16::<LittleEndian>(reference);
        out.extend_from_slice(&bitstream);

        let clipped = samples
            .windows(2)
            .filter(|p| (p[1] - p[0]).abs() > 1.0)
            .count();
        if clipped > 0 {
            sink_warn!(
                self.log_sink,
                "[DELTA_CODEC] {} of {} deltas exceeded full scale and were clipped",
                clipped,
                entry_count
            );
        }
        sink_debug!(
            self.log_sink,
            "[DELTA_CODEC] Encoded {} samples @ {} Hz: tiers {}/{}/{}, {} bits, {} bytes",
            samples.len(),
            sample_rate,
            stats.small,
            stats.medium,
            stats.large,
            payload_bits,
            out.len()
        );
        Ok((out, stats))
    }

    pub fn decode(&self, bytes: &[u8]) -> Result<DecodedAudio> {
        let (preamble, mut cursor) =
            framing::read_preamble(bytes, VARIABLE_WIDTH_MAGIC, VARIABLE_WIDTH_HEADER_LEN)?;
        let reference = cursor
            .read_i16::<LittleEndian>()
            .map_err(|_| CodecError::TruncatedStream {
                needed: VARIABLE_WIDTH_HEADER_LEN,
                available: bytes.len(),
            })?;

        let entry_count = preamble.count as usize;
        // Reject impossible counts before allocating: every entry takes at
        // least a marker plus the narrowest code.
        let min_entry_bits = usize::from(TIER_MARKER_BITS)
            + Tier::ALL
                .iter()
                .map(|&t| usize::from(self.classifier.bits(t)))
                .min()
                .unwrap_or(1);
        let min_payload = entry_count.saturating_mul(min_entry_bits).div_ceil(8);
        framing::ensure_len(bytes, VARIABLE_WIDTH_HEADER_LEN.saturating_add(min_payload))?;

        let bitstream = &bytes[VARIABLE_WIDTH_HEADER_LEN..];
        let shift = |e: CodecError| match e {
            CodecError::TruncatedStream { needed, .. } => CodecError::TruncatedStream {
                needed: VARIABLE_WIDTH_HEADER_LEN + needed,
                available: bytes.len(),
            },
            other => other,
        };

        let mut samples = Vec::with_capacity(entry_count + 1);
        let mut current = f32::from(reference) / REFERENCE_SCALE;
        samples.push(current);

        let mut reader = BitUnpacker::new(bitstream);
        for _ in 0..entry_count {
            let marker = reader.read(TIER_MARKER_BITS).map_err(shift)?;
            let tier = Tier::from_index(marker as u8)?;
            let bits = self.classifier.bits(tier);
            let raw = reader.read(bits).map_err(shift)?;
            let code = from_unsigned(raw, bits);
            current += dequantize(code, bits);
            sink_trace!(self.log_sink, "[DELTA_CODEC] {:?} code={} -> {}", tier, code, current);
            samples.push(current);
        }

        let trailing = bitstream.len() - reader.bytes_consumed();
        sink_debug!(
            self.log_sink,
            "[DELTA_CODEC] Decoded {} samples @ {} Hz ({} trailing bytes ignored)",
            samples.len(),
            preamble.sample_rate,
            trailing
        );
        Ok(DecodedAudio {
            samples,
            sample_rate: preamble.sample_rate,
        })
    }
}

/// `round(sample * 32767)` saturated to the i16 range.
fn reference_code(sample: f32) -> i16 {
    // float -> int `as` casts saturate
    (sample * REFERENCE_SCALE).round() as i16
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]
    use super::*;
    use crate::log::{ChannelLogSink, log_level::LogLevel};

    fn tiers_of(entries: &[EncodedEntry]) -> Vec<Tier> {
        entries
            .iter()
            .filter_map(|e| match e {
                EncodedEntry::Delta { tier, .. } => Some(*tier),
                EncodedEntry::Reference { .. } => None,
            })
            .collect()
    }

    #[test]
    fn scenario_tiers_and_reconstruction() {
        let samples = [0.0f32, 0.005, -0.002, 0.5, -0.5];
        let codec = DeltaCodec::default();

        let entries = codec.entries(&samples).unwrap();
        assert_eq!(entries[0], EncodedEntry::Reference { code: 0 });
        assert_eq!(entries[0].bits(), 16);
        assert_eq!(entries[3].bits(), 12);
        assert_eq!(
            tiers_of(&entries),
            vec![Tier::Small, Tier::Small, Tier::Large, Tier::Large]
        );

        let bytes = codec.encode(&samples, 6750).unwrap();
        let decoded = codec.decode(&bytes).unwrap();
        assert_eq!(decoded.sample_rate, 6750);
        assert_eq!(decoded.samples.len(), samples.len());

        // Small-tier steps stay below the Small threshold of their target.
        for i in [1, 2] {
            assert!((decoded.samples[i] - samples[i]).abs() < 0.01);
        }
        // Large-tier steps are reproduced within one 12-bit step each.
        for i in [3, 4] {
            let step = decoded.samples[i] - decoded.samples[i - 1];
            let want = samples[i] - samples[i - 1];
            assert!((step - want).abs() <= 1.0 / 2047.0, "step {i}: {step} vs {want}");
        }
    }

    #[test]
    fn header_fields_are_laid_out_in_order() {
        let samples = [0.25f32, 0.3, 0.25];
        let bytes = DeltaCodec::default().encode(&samples, 8000).unwrap();
        assert_eq!(&bytes[0..4], b"PGDD");
        assert_eq!(u32::from_le_bytes(bytes[4..8].try_into().unwrap()), 8000);
        assert_eq!(u32::from_le_bytes(bytes[8..12].try_into().unwrap()), 2);
        assert_eq!(
            i16::from_le_bytes(bytes[12..14].try_into().unwrap()),
            (0.25f32 * 32767.0).round() as i16
        );
        // (2 + 8) + (2 + 8) = 20 bits -> 3 bytes
        assert_eq!(bytes.len(), VARIABLE_WIDTH_HEADER_LEN + 3);
    }

    #[test]
    fn rate_less_header_does_not_parse() {
        // magic, count 1, reference 0, one bitstream byte
        let mut bare = b"PGDD".to_vec();
        bare.extend_from_slice(&1u32.to_le_bytes());
        bare.extend_from_slice(&0i16.to_le_bytes());
        bare.push(0x00);
        assert_eq!(
            DeltaCodec::default().decode(&bare).unwrap_err(),
            CodecError::TruncatedStream {
                needed: VARIABLE_WIDTH_HEADER_LEN,
                available: 11
            }
        );
    }

    #[test]
    fn single_sample_has_empty_bitstream() {
        let codec = DeltaCodec::default();
        let bytes = codec.encode(&[-0.75], 4000).unwrap();
        assert_eq!(bytes.len(), VARIABLE_WIDTH_HEADER_LEN);
        let decoded = codec.decode(&bytes).unwrap();
        assert_eq!(decoded.samples.len(), 1);
        assert!((decoded.samples[0] + 0.75).abs() < 1.0 / 32767.0);
    }

    #[test]
    fn empty_input_is_rejected() {
        assert_eq!(
            DeltaCodec::default().encode(&[], 8000),
            Err(CodecError::EmptyInput)
        );
    }

    #[test]
    fn reference_saturates() {
        assert_eq!(reference_code(1.5), i16::MAX);
        assert_eq!(reference_code(-1.0), -32767);
        assert_eq!(reference_code(-3.0), i16::MIN);
    }

    #[test]
    fn bad_magic_is_rejected() {
        let mut bytes = DeltaCodec::default().encode(&[0.0, 0.1], 8000).unwrap();
        bytes[0] = b'X';
        assert!(matches!(
            DeltaCodec::default().decode(&bytes),
            Err(CodecError::BadMagic { .. })
        ));
    }

    #[test]
    fn truncated_bitstream_is_rejected() {
        let samples: Vec<f32> = (0..64).map(|i| (i as f32 * 0.3).sin() * 0.8).collect();
        let codec = DeltaCodec::default();
        let bytes = codec.encode(&samples, 8000).unwrap();
        for cut in [bytes.len() - 1, VARIABLE_WIDTH_HEADER_LEN + 2, 13, 2] {
            assert!(
                matches!(
                    codec.decode(&bytes[..cut]),
                    Err(CodecError::TruncatedStream { .. })
                ),
                "cut at {cut}"
            );
        }
    }

    #[test]
    fn invalid_tier_marker_is_rejected() {
        let mut bytes = Vec::new();
        framing::write_preamble(
            &mut bytes,
            VARIABLE_WIDTH_MAGIC,
            Preamble {
                sample_rate: 8000,
                count: 1,
            },
        );
        bytes.extend_from_slice(&0i16.to_le_bytes());
        bytes.extend_from_slice(&[0b11, 0x00]);
        assert_eq!(
            DeltaCodec::default().decode(&bytes),
            Err(CodecError::UnknownTier(3))
        );
    }

    #[test]
    fn reconstruction_is_not_clamped() {
        // Two Large steps of +0.9 from 0.5 overshoot full scale.
        let samples = [0.5f32, 1.4, 2.3];
        let codec = DeltaCodec::default();
        let decoded = codec.decode(&codec.encode(&samples, 8000).unwrap()).unwrap();
        assert!(decoded.samples[2] > 1.0);
    }

    #[test]
    fn smooth_signal_tracks_original() {
        let samples: Vec<f32> = (0..2000)
            .map(|i| (i as f32 * 2.0 * std::f32::consts::PI / 200.0).sin() * 0.5)
            .collect();
        let codec = DeltaCodec::default();
        let (bytes, stats) = codec.encode_with_stats(&samples, 8000).unwrap();
        assert_eq!(stats.total(), samples.len() - 1);
        assert!(bytes.len() < samples.len() * 2, "must beat 16-bit PCM");

        let decoded = codec.decode(&bytes).unwrap();
        let max_err = samples
            .iter()
            .zip(&decoded.samples)
            .map(|(a, b)| (a - b).abs())
            .fold(0.0f32, f32::max);
        // Small-tier steps quantize to zero near the peaks; the loss is
        // recovered on the way back down rather than accumulating.
        assert!(max_err < 0.15, "max error {max_err}");
    }

    #[test]
    fn clipping_is_reported() {
        let (sink, rx) = ChannelLogSink::bounded(8, LogLevel::Warn);
        let codec = DeltaCodec::default().with_log_sink(Arc::new(sink));
        codec.encode(&[-1.0, 1.0, -1.0], 8000).unwrap();
        if cfg!(feature = "log-warn") {
            let msg = rx.try_recv().expect("warn expected");
            assert!(msg.text.contains("2 of 2 deltas"));
        }
    }

    #[test]
    fn custom_tier_widths_round_trip() {
        let tiers = TierConfig {
            small_bits: 6,
            medium_bits: 10,
            large_bits: 16,
            ..TierConfig::default()
        };
        let codec = DeltaCodec::new(tiers).unwrap();
        let samples = [0.0f32, 0.004, 0.05, 0.6, 0.0];
        let decoded = codec.decode(&codec.encode(&samples, 8000).unwrap()).unwrap();
        for (a, b) in samples.iter().zip(&decoded.samples) {
            assert!((a - b).abs() < 0.01);
        }
    }

    #[test]
    fn degenerate_widths_fail_at_construction() {
        for bits in [0u8, 1, 17] {
            let tiers = TierConfig {
                small_bits: bits,
                ..TierConfig::default()
            };
            assert!(matches!(
                DeltaCodec::new(tiers),
                Err(CodecError::InvalidBitWidth(b)) if b == bits
            ));
        }
    }

    #[test]
    fn two_bit_small_tier_decodes_finite_samples() {
        let tiers = TierConfig {
            small_bits: 2,
            ..TierConfig::default()
        };
        let codec = DeltaCodec::new(tiers).unwrap();
        let samples = [0.0f32, 0.001, 0.002];
        let decoded = codec.decode(&codec.encode(&samples, 8000).unwrap()).unwrap();
        assert_eq!(decoded.samples.len(), 3);
        assert!(decoded.samples.iter().all(|s| s.is_finite()));
    }
}
