/// Reconstruction error of a decoded buffer against its source.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QualityMetrics {
    pub mse: f64,
    /// Signal-to-noise ratio in dB; `+inf` for a bit-exact reconstruction.
    pub snr_db: f64,
    pub max_error: f64,
}

impl QualityMetrics {
    /// Compares two equal-length buffers. Returns `None` when the lengths
    /// differ or both are empty.
    pub fn measure(original: &[f32], decoded: &[f32]) -> Option<Self> {
        if original.len() != decoded.len() || original.is_empty() {
            return None;
        }
        let n = original.len() as f64;
        let mut err_sq = 0.0f64;
        let mut sig_sq = 0.0f64;
        let mut max_error = 0.0f64;
        for (&a, &b) in original.iter().zip(decoded) {
            let e = f64::from(a) - f64::from(b);
            err_sq += e * e;
            sig_sq += f64::from(a) * f64::from(a);
            max_error = max_error.max(e.abs());
        }
        let mse = err_sq / n;
        let snr_db = if mse > 0.0 {
            10.0 * ((sig_sq / n) / mse).log10()
        } else {
            f64::INFINITY
        };
        Some(Self {
            mse,
            snr_db,
            max_error,
        })
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]
    use super::*;

    #[test]
    fn identical_buffers_have_infinite_snr() {
        let a = [0.1f32, -0.2, 0.3];
        let m = QualityMetrics::measure(&a, &a).unwrap();
        assert_eq!(m.mse, 0.0);
        assert_eq!(m.max_error, 0.0);
        assert!(m.snr_db.is_infinite());
    }

    #[test]
    fn known_error_gives_known_snr() {
        let a = [1.0f32, -1.0, 1.0, -1.0];
        let b = [0.9f32, -0.9, 0.9, -0.9];
        let m = QualityMetrics::measure(&a, &b).unwrap();
        // signal power 1, noise power 0.01 -> 20 dB
        assert!((m.snr_db - 20.0).abs() < 1e-4);
        assert!((m.max_error - 0.1).abs() < 1e-6);
    }

    #[test]
    fn length_mismatch_is_none() {
        assert!(QualityMetrics::measure(&[0.0], &[0.0, 0.0]).is_none());
        assert!(QualityMetrics::measure(&[], &[]).is_none());
    }
}
