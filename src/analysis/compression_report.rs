use std::fmt;

use crate::analysis::quality_metrics::QualityMetrics;
use crate::codec::TierStats;

/// Size comparison between a source and its encoded container.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompressionReport {
    pub original_bytes: usize,
    pub compressed_bytes: usize,
    pub tiers: Option<TierStats>,
    pub quality: Option<QualityMetrics>,
}

impl CompressionReport {
    pub fn new(original_bytes: usize, compressed_bytes: usize) -> Self {
        Self {
            original_bytes,
            compressed_bytes,
            tiers: None,
            quality: None,
        }
    }

    /// Size of `sample_count` samples stored as 16-bit PCM.
    pub fn pcm16(sample_count: usize, compressed_bytes: usize) -> Self {
        Self::new(sample_count * 2, compressed_bytes)
    }

    pub fn with_tiers(mut self, tiers: TierStats) -> Self {
        self.tiers = Some(tiers);
        self
    }

    pub fn with_quality(mut self, quality: QualityMetrics) -> Self {
        self.quality = Some(quality);
        self
    }

    /// `original / compressed`; 0.0 when nothing was produced.
    pub fn ratio(&self) -> f64 {
        if self.compressed_bytes == 0 {
            return 0.0;
        }
        self.original_bytes as f64 / self.compressed_bytes as f64
    }

    pub fn space_saved_percent(&self) -> f64 {
        let r = self.ratio();
        if r > 0.0 { (1.0 - 1.0 / r) * 100.0 } else { 0.0 }
    }

    /// Whether the container fits a byte budget, e.g. a cartridge ROM bank.
    pub fn fits(&self, budget_bytes: usize) -> bool {
        self.compressed_bytes <= budget_bytes
    }
}

impl fmt::Display for CompressionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} -> {} bytes ({:.2}x, {:.1}% saved)",
            self.original_bytes,
            self.compressed_bytes,
            self.ratio(),
            self.space_saved_percent()
        )?;
        if let Some(t) = &self.tiers {
            write!(
                f,
                ", tiers {}/{}/{} ({:.2} bits/delta)",
                t.small,
                t.medium,
                t.large,
                t.avg_bits_per_delta()
            )?;
        }
        if let Some(q) = &self.quality {
            write!(f, ", SNR {:.1} dB, max error {:.6}", q.snr_db, q.max_error)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]
    use super::*;
    use crate::codec::DeltaClassifier;

    #[test]
    fn ratio_and_savings() {
        let r = CompressionReport::new(1000, 250);
        assert!((r.ratio() - 4.0).abs() < 1e-12);
        assert!((r.space_saved_percent() - 75.0).abs() < 1e-9);
        assert!(r.fits(250));
        assert!(!r.fits(249));
    }

    #[test]
    fn empty_output_has_zero_ratio() {
        let r = CompressionReport::new(1000, 0);
        assert_eq!(r.ratio(), 0.0);
        assert_eq!(r.space_saved_percent(), 0.0);
    }

    #[test]
    fn display_summarizes_attached_details() {
        let tiers = DeltaClassifier::default().stats([0.001, 0.05, 0.5, 0.002]);
        let r = CompressionReport::pcm16(5, 5).with_tiers(tiers);
        assert_eq!(
            r.to_string(),
            "10 -> 5 bytes (2.00x, 50.0% saved), tiers 2/1/1 (7.00 bits/delta)"
        );
    }
}
