use super::{
    codec_config::TierConfig,
    codec_error::{CodecError, Result},
};

/// Magnitude bucket of a delta. Ordered by ascending magnitude.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Tier {
    Small,
    Medium,
    Large,
}

impl Tier {
    pub const ALL: [Tier; 3] = [Tier::Small, Tier::Medium, Tier::Large];

    /// Two-bit marker written ahead of each code in the bitstream.
    pub fn index(self) -> u8 {
        match self {
            Tier::Small => 0,
            Tier::Medium => 1,
            Tier::Large => 2,
        }
    }

    pub fn from_index(index: u8) -> Result<Self> {
        match index {
            0 => Ok(Tier::Small),
            1 => Ok(Tier::Medium),
            2 => Ok(Tier::Large),
            other => Err(CodecError::UnknownTier(other)),
        }
    }
}

/// Assigns deltas to tiers using fixed thresholds.
///
/// A value sitting exactly on a threshold belongs to the higher tier, so the
/// three ranges `[0, small)`, `[small, medium)` and `[medium, inf)` cover
/// every magnitude exactly once.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeltaClassifier {
    config: TierConfig,
}

impl Default for DeltaClassifier {
    fn default() -> Self {
        Self {
            config: TierConfig::default(),
        }
    }
}

impl DeltaClassifier {
    /// Rejects widths the quantizer cannot scale to (see
    /// [`TierConfig::check_widths`]).
    pub fn new(config: TierConfig) -> Result<Self> {
        config.check_widths()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &TierConfig {
        &self.config
    }

    pub fn classify(&self, delta: f32) -> Tier {
        let magnitude = delta.abs();
        if magnitude < self.config.small_threshold {
            Tier::Small
        } else if magnitude < self.config.medium_threshold {
            Tier::Medium
        } else {
            // NaN and infinities land here
            Tier::Large
        }
    }

    pub fn bits(&self, tier: Tier) -> u8 {
        match tier {
            Tier::Small => self.config.small_bits,
            Tier::Medium => self.config.medium_bits,
            Tier::Large => self.config.large_bits,
        }
    }

    /// Tier distribution of a delta sequence.
    pub fn stats(&self, deltas: impl IntoIterator<Item = f32>) -> TierStats {
        let mut stats = TierStats::new(*self);
        for d in deltas {
            stats.record(self.classify(d));
        }
        stats
    }
}

/// Per-tier delta counts. Reporting only; has no effect on the bitstream.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TierStats {
    pub small: usize,
    pub medium: usize,
    pub large: usize,
    widths: [u8; 3],
}

impl TierStats {
    pub(crate) fn new(classifier: DeltaClassifier) -> Self {
        Self {
            small: 0,
            medium: 0,
            large: 0,
            widths: Tier::ALL.map(|t| classifier.bits(t)),
        }
    }

    pub(crate) fn record(&mut self, tier: Tier) {
        match tier {
            Tier::Small => self.small += 1,
            Tier::Medium => self.medium += 1,
            Tier::Large => self.large += 1,
        }
    }

    pub fn count(&self, tier: Tier) -> usize {
        match tier {
            Tier::Small => self.small,
            Tier::Medium => self.medium,
            Tier::Large => self.large,
        }
    }

    pub fn total(&self) -> usize {
        self.small + self.medium + self.large
    }

    /// Share of deltas in `tier`, 0.0 for an empty sequence.
    pub fn ratio(&self, tier: Tier) -> f64 {
        match self.total() {
            0 => 0.0,
            n => self.count(tier) as f64 / n as f64,
        }
    }

    /// Mean code width, excluding tier markers.
    pub fn avg_bits_per_delta(&self) -> f64 {
        Tier::ALL
            .iter()
            .map(|&t| self.ratio(t) * f64::from(self.widths[t.index() as usize]))
            .sum()
    }

    /// Estimated ratio against 16-bit PCM, ignoring container overhead.
    pub fn theoretical_ratio(&self) -> f64 {
        let avg = self.avg_bits_per_delta();
        if avg > 0.0 { 16.0 / avg } else { 0.0 }
    }
}
