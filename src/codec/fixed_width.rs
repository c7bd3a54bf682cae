//! Byte-aligned 8-bit delta container for the embedded player.
//!
//! Every sample is quantized to `i8` on its own, then stored as the first
//! value plus one `i8` delta per following sample. No bit packing: the
//! target decodes one byte per output sample.
//!
//! | offset | size        | field            |
//! |--------|-------------|------------------|
//! | 0      | 4           | magic `FQWT`     |
//! | 4      | 4           | sample rate      |
//! | 8      | 4           | delta count      |
//! | 12     | 1           | first sample, i8 |
//! | 13     | delta count | deltas, i8       |
//!
//! Both ends clamp the same way: the encoder saturates each delta to the
//! `i8` range and the decoder saturates the running sum to it.

use rand::Rng;
use std::sync::Arc;

use super::{
    codec_config::{BlockScaling, Dither, FixedWidthConfig},
    codec_error::{CodecError, Result},
    constants::{FIXED_WIDTH_HEADER_LEN, FIXED_WIDTH_MAGIC, FIXED_WIDTH_SCALE},
    delta_codec::DecodedAudio,
    framing::{self, Preamble},
};
use crate::log::{NoopLogSink, log_sink::LogSink};
use crate::{sink_debug, sink_warn};

/// Saturating step of the 8-bit running sum, shared by every decoder.
#[inline]
pub fn accumulate(current: i8, delta: i8) -> i8 {
    (i16::from(current) + i16::from(delta)).clamp(i16::from(i8::MIN), i16::from(i8::MAX)) as i8
}

/// First sample plus saturated deltas of an `i8` sequence.
pub fn deltas_of(quantized: &[i8]) -> Option<(i8, Vec<i8>)> {
    let (&first, _) = quantized.split_first()?;
    let deltas = quantized
        .windows(2)
        .map(|p| {
            (i16::from(p[1]) - i16::from(p[0])).clamp(i16::from(i8::MIN), i16::from(i8::MAX))
                as i8
        })
        .collect();
    Some((first, deltas))
}

pub struct FixedWidthCodec {
    config: FixedWidthConfig,
    log_sink: Arc<dyn LogSink>,
}

impl Default for FixedWidthCodec {
    fn default() -> Self {
        Self::new(FixedWidthConfig::default())
    }
}

impl FixedWidthCodec {
    pub fn new(config: FixedWidthConfig) -> Self {
        Self {
            config,
            log_sink: Arc::new(NoopLogSink),
        }
    }

    pub fn with_log_sink(mut self, log_sink: Arc<dyn LogSink>) -> Self {
        self.log_sink = log_sink;
        self
    }

    pub fn config(&self) -> &FixedWidthConfig {
        &self.config
    }

    /// Gain mapping the signal peak onto `headroom` of the int8 range.
    /// Silence gets the plain full-scale factor.
    pub fn peak_scale(&self, samples: &[f32]) -> f32 {
        let peak = peak_of(samples);
        if peak > 0.0 {
            self.config.headroom * FIXED_WIDTH_SCALE / peak
        } else {
            FIXED_WIDTH_SCALE
        }
    }

    /// Scales, optionally dithers, and rounds every sample to `i8`.
    pub fn quantize_samples<R: Rng>(&self, samples: &[f32], rng: &mut R) -> Vec<i8> {
        let dither = self.config.dither;
        let mut round = |x: f32| -> i8 {
            let noise = dither.map_or(0.0, |d| triangular(d, rng));
            // NaN maps to zero through the saturating cast
            (x + noise).round().clamp(-128.0, 127.0) as i8
        };

        match self.config.block_scaling {
            None => {
                let scale = self.peak_scale(samples);
                samples.iter().map(|&s| round(s * scale)).collect()
            }
            Some(blocks) => {
                let peak = peak_of(samples);
                let gain = if peak > 1.0 { 1.0 / peak } else { 1.0 };
                let mut out = Vec::with_capacity(samples.len());
                for window in samples.chunks(blocks.window.max(1)) {
                    let scale = window_scale(&blocks, window, gain);
                    out.extend(window.iter().map(|&s| round(s * gain * scale)));
                }
                out
            }
        }
    }

    /// Encodes with thread-local randomness for the dither.
    pub fn encode(&self, samples: &[f32], sample_rate: u32) -> Result<Vec<u8>> {
        self.encode_with_rng(samples, sample_rate, &mut rand::thread_rng())
    }

    /// Encodes with a caller-provided dither source, for reproducible output.
    pub fn encode_with_rng<R: Rng>(
        &self,
        samples: &[f32],
        sample_rate: u32,
        rng: &mut R,
    ) -> Result<Vec<u8>> {
        let quantized = self.quantize_samples(samples, rng);
        let (first, deltas) = deltas_of(&quantized).ok_or(CodecError::EmptyInput)?;
        let count =
            u32::try_from(deltas.len()).map_err(|_| CodecError::StreamTooLarge(u32::MAX))?;

        let mut out = Vec::with_capacity(FIXED_WIDTH_HEADER_LEN + deltas.len());
        framing::write_preamble(
            &mut out,
            FIXED_WIDTH_MAGIC,
            Preamble { sample_rate, count },
        );
        out.push(first as u8);
        out.extend(deltas.iter().map(|&d| d as u8));

        let saturated = quantized
            .windows(2)
            .filter(|p| !(-128..=127).contains(&(i16::from(p[1]) - i16::from(p[0]))))
            .count();
        if saturated > 0 {
            sink_warn!(
                self.log_sink,
                "[FIXED_WIDTH] {} deltas saturated at the int8 range",
                saturated
            );
        }
        let (lo, hi) = quantized
            .iter()
            .fold((i8::MAX, i8::MIN), |(lo, hi), &q| (lo.min(q), hi.max(q)));
        sink_debug!(
            self.log_sink,
            "[FIXED_WIDTH] Encoded {} samples @ {} Hz, range {}..{} ({:.1}% of int8), {} bytes",
            samples.len(),
            sample_rate,
            lo,
            hi,
            f32::from(i16::from(hi) - i16::from(lo)) / 255.0 * 100.0,
            out.len()
        );
        Ok(out)
    }

    pub fn decode(&self, bytes: &[u8]) -> Result<DecodedAudio> {
        let (preamble, _) =
            framing::read_preamble(bytes, FIXED_WIDTH_MAGIC, FIXED_WIDTH_HEADER_LEN)?;
        let count = preamble.count as usize;
        framing::ensure_len(bytes, FIXED_WIDTH_HEADER_LEN.saturating_add(count))?;

        let mut current = bytes[FIXED_WIDTH_HEADER_LEN - 1] as i8;
        let mut samples = Vec::with_capacity(count + 1);
        samples.push(f32::from(current) / FIXED_WIDTH_SCALE);
        for &d in &bytes[FIXED_WIDTH_HEADER_LEN..FIXED_WIDTH_HEADER_LEN + count] {
            current = accumulate(current, d as i8);
            samples.push(f32::from(current) / FIXED_WIDTH_SCALE);
        }

        sink_debug!(
            self.log_sink,
            "[FIXED_WIDTH] Decoded {} samples @ {} Hz",
            samples.len(),
            preamble.sample_rate
        );
        Ok(DecodedAudio {
            samples,
            sample_rate: preamble.sample_rate,
        })
    }
}

fn peak_of(samples: &[f32]) -> f32 {
    samples.iter().fold(0.0f32, |m, s| m.max(s.abs()))
}

fn window_scale(blocks: &BlockScaling, window: &[f32], gain: f32) -> f32 {
    if window.is_empty() {
        return blocks.low_scale;
    }
    let energy = window.iter().map(|s| (s * gain) * (s * gain)).sum::<f32>() / window.len() as f32;
    blocks.scale_for(energy.sqrt())
}

/// Triangular noise on `[-amplitude, amplitude]`, peaked at zero.
fn triangular<R: Rng>(dither: Dither, rng: &mut R) -> f32 {
    let half = dither.amplitude / 2.0;
    if half <= 0.0 {
        return 0.0;
    }
    rng.gen_range(-half..=half) + rng.gen_range(-half..=half)
}
