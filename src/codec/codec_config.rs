//! Immutable codec configuration.
//!
//! All tunables (tier thresholds and widths, headroom, dither and block
//! scaling, embedded decoder limits) live in one [`CodecConfig`] value that
//! is handed to each codec at construction. Nothing here is mutated after a
//! codec has been built.

use std::str::FromStr;

use super::codec_error::{self, CodecError};
use crate::config::Config;

/// Magnitude thresholds and code widths of the three delta tiers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TierConfig {
    /// `|delta| < small_threshold` selects the Small tier.
    pub small_threshold: f32,
    /// `small_threshold <= |delta| < medium_threshold` selects Medium.
    pub medium_threshold: f32,
    pub small_bits: u8,
    pub medium_bits: u8,
    pub large_bits: u8,
}

impl Default for TierConfig {
    fn default() -> Self {
        Self {
            small_threshold: 0.01,
            medium_threshold: 0.1,
            small_bits: 4,
            medium_bits: 8,
            large_bits: 12,
        }
    }
}

impl TierConfig {
    /// Widest code a tier may use; the packer's carry register must hold it
    /// plus up to seven carried bits.
    pub const MAX_TIER_BITS: u8 = 16;

    /// Fails with `InvalidBitWidth` for the first width outside
    /// `2..=MAX_TIER_BITS`. A 1-bit code has no positive step to scale by.
    pub fn check_widths(&self) -> codec_error::Result<()> {
        for bits in [self.small_bits, self.medium_bits, self.large_bits] {
            if !(2..=Self::MAX_TIER_BITS).contains(&bits) {
                return Err(CodecError::InvalidBitWidth(bits));
            }
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), String> {
        if !(self.small_threshold > 0.0 && self.small_threshold < self.medium_threshold) {
            return Err(format!(
                "tier thresholds must satisfy 0 < small < medium (got {} / {})",
                self.small_threshold, self.medium_threshold
            ));
        }
        self.check_widths()
            .map_err(|e| format!("invalid tier config: {e}"))
    }
}

/// Triangular dither added before rounding to 8 bits.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dither {
    /// Half-width of the triangular distribution, in int8 steps.
    pub amplitude: f32,
}

impl Default for Dither {
    fn default() -> Self {
        Self { amplitude: 0.5 }
    }
}

/// Per-window amplitude scaling driven by local RMS energy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlockScaling {
    pub window: usize,
    pub high_energy: f32,
    pub mid_energy: f32,
    pub high_scale: f32,
    pub mid_scale: f32,
    pub low_scale: f32,
}

impl Default for BlockScaling {
    fn default() -> Self {
        Self {
            window: 1024,
            high_energy: 0.5,
            mid_energy: 0.2,
            high_scale: 127.0,
            mid_scale: 100.0,
            low_scale: 80.0,
        }
    }
}

impl BlockScaling {
    /// Scale applied to a window with the given RMS energy.
    pub fn scale_for(&self, rms: f32) -> f32 {
        if rms > self.high_energy {
            self.high_scale
        } else if rms > self.mid_energy {
            self.mid_scale
        } else {
            self.low_scale
        }
    }
}

/// Settings of the byte-aligned 8-bit container.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedWidthConfig {
    /// Fraction of the int8 range the signal peak is normalized to.
    pub headroom: f32,
    pub dither: Option<Dither>,
    /// When set, replaces the single peak-derived scale with per-window scales.
    pub block_scaling: Option<BlockScaling>,
}

impl Default for FixedWidthConfig {
    fn default() -> Self {
        Self {
            headroom: 0.95,
            dither: Some(Dither::default()),
            block_scaling: None,
        }
    }
}

/// Limits enforced by the embedded streaming decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecoderLimits {
    pub min_sample_rate: u32,
    pub max_sample_rate: u32,
    pub max_deltas: u32,
}

impl Default for DecoderLimits {
    fn default() -> Self {
        Self {
            min_sample_rate: 4_000,
            max_sample_rate: 8_000,
            max_deltas: 5_000_000,
        }
    }
}

impl DecoderLimits {
    /// Limits that accept any well-formed container.
    pub fn unrestricted() -> Self {
        Self {
            min_sample_rate: 0,
            max_sample_rate: u32::MAX,
            max_deltas: u32::MAX,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CodecConfig {
    pub tiers: TierConfig,
    pub fixed_width: FixedWidthConfig,
    pub decoder: DecoderLimits,
}

impl CodecConfig {
    /// Builds the codec configuration from a loaded [`Config`] file.
    ///
    /// Recognized sections are `[Tiers]`, `[FixedWidth]`, `[BlockScaling]`
    /// and `[Decoder]`. Missing keys keep their defaults; a value that does
    /// not parse is an error naming its section and key.
    /// `[BlockScaling]` is only enabled when `enabled = true`.
    pub fn from_config(config: &Config) -> Result<Self, String> {
        let defaults = Self::default();

        let t = Section::new(config, "Tiers");
        let dt = defaults.tiers;
        let tiers = TierConfig {
            small_threshold: t.parse_or("small_threshold", dt.small_threshold)?,
            medium_threshold: t.parse_or("medium_threshold", dt.medium_threshold)?,
            small_bits: t.parse_or("small_bits", dt.small_bits)?,
            medium_bits: t.parse_or("medium_bits", dt.medium_bits)?,
            large_bits: t.parse_or("large_bits", dt.large_bits)?,
        };
        tiers.validate()?;

        let fw = Section::new(config, "FixedWidth");
        let headroom: f32 = fw.parse_or("headroom", defaults.fixed_width.headroom)?;
        if !(headroom > 0.0 && headroom <= 1.0) {
            return Err(format!("headroom must be within (0, 1] (got {headroom})"));
        }
        let dither = if fw.parse_or("dither", true)? {
            Some(Dither {
                amplitude: fw.parse_or("dither_amplitude", Dither::default().amplitude)?,
            })
        } else {
            None
        };

        let b = Section::new(config, "BlockScaling");
        let block_scaling = if b.parse_or("enabled", false)? {
            let d = BlockScaling::default();
            let bs = BlockScaling {
                window: b.parse_or("window", d.window)?,
                high_energy: b.parse_or("high_energy", d.high_energy)?,
                mid_energy: b.parse_or("mid_energy", d.mid_energy)?,
                high_scale: b.parse_or("high_scale", d.high_scale)?,
                mid_scale: b.parse_or("mid_scale", d.mid_scale)?,
                low_scale: b.parse_or("low_scale", d.low_scale)?,
            };
            if bs.window == 0 {
                return Err("block scaling window must be non-zero".to_string());
            }
            Some(bs)
        } else {
            None
        };

        let dec = Section::new(config, "Decoder");
        let dl = defaults.decoder;
        let decoder = DecoderLimits {
            min_sample_rate: dec.parse_or("min_sample_rate", dl.min_sample_rate)?,
            max_sample_rate: dec.parse_or("max_sample_rate", dl.max_sample_rate)?,
            max_deltas: dec.parse_or("max_deltas", dl.max_deltas)?,
        };
        if decoder.min_sample_rate > decoder.max_sample_rate {
            return Err(format!(
                "decoder sample rate range is empty ({}..={})",
                decoder.min_sample_rate, decoder.max_sample_rate
            ));
        }

        Ok(Self {
            tiers,
            fixed_width: FixedWidthConfig {
                headroom,
                dither,
                block_scaling,
            },
            decoder,
        })
    }
}

/// Typed lookups within one `[section]` of a [`Config`].
struct Section<'a> {
    config: &'a Config,
    name: &'static str,
}

impl<'a> Section<'a> {
    fn new(config: &'a Config, name: &'static str) -> Self {
        Self { config, name }
    }

    fn parse_or<T: FromStr>(&self, key: &str, default: T) -> Result<T, String> {
        match self.config.get_non_empty(self.name, key) {
            None => Ok(default),
            Some(raw) => raw
                .parse()
                .map_err(|_| format!("[{}] {key}: cannot parse {raw:?}", self.name)),
        }
    }
}
