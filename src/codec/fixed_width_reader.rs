use super::{
    codec_config::DecoderLimits,
    codec_error::{CodecError, Result},
    constants::{FIXED_WIDTH_HEADER_LEN, FIXED_WIDTH_MAGIC, STREAM_BUFFER_SAMPLES},
    fixed_width::accumulate,
    framing,
};

/// Incremental decoder for a fixed-width container held in memory (ROM).
///
/// Produces 16-bit DAC samples in bounded chunks so a player can refill a
/// small double buffer from an interrupt without decoding the whole track.
/// Output starts at the first delta; the stored first sample only seeds
/// the running sum.
#[derive(Debug, Clone)]
pub struct FixedWidthReader<'a> {
    sample_rate: u32,
    first_sample: i8,
    deltas: &'a [u8],
    position: usize,
    last_sample: i8,
}

impl<'a> FixedWidthReader<'a> {
    /// Validates the header against `limits` and positions at the start.
    pub fn new(bytes: &'a [u8], limits: &DecoderLimits) -> Result<Self> {
        let (preamble, _) =
            framing::read_preamble(bytes, FIXED_WIDTH_MAGIC, FIXED_WIDTH_HEADER_LEN)?;
        if preamble.sample_rate < limits.min_sample_rate
            || preamble.sample_rate > limits.max_sample_rate
        {
            return Err(CodecError::UnsupportedSampleRate(preamble.sample_rate));
        }
        if preamble.count > limits.max_deltas {
            return Err(CodecError::StreamTooLarge(preamble.count));
        }
        let count = preamble.count as usize;
        framing::ensure_len(bytes, FIXED_WIDTH_HEADER_LEN.saturating_add(count))?;

        let first_sample = bytes[FIXED_WIDTH_HEADER_LEN - 1] as i8;
        Ok(Self {
            sample_rate: preamble.sample_rate,
            first_sample,
            deltas: &bytes[FIXED_WIDTH_HEADER_LEN..FIXED_WIDTH_HEADER_LEN + count],
            position: 0,
            last_sample: first_sample,
        })
    }

    /// Decodes up to `out.len()` samples, at most [`STREAM_BUFFER_SAMPLES`]
    /// per call. Each `i8` value is widened to the DAC range by `<< 8`.
    /// Returns the number written, 0 once the stream is exhausted.
    pub fn decode_into(&mut self, out: &mut [i16]) -> usize {
        let n = out
            .len()
            .min(STREAM_BUFFER_SAMPLES)
            .min(self.deltas.len() - self.position);

        let mut current = self.last_sample;
        for (slot, &d) in out[..n]
            .iter_mut()
            .zip(&self.deltas[self.position..self.position + n])
        {
            current = accumulate(current, d as i8);
            *slot = i16::from(current) << 8;
        }

        self.position += n;
        self.last_sample = current;
        n
    }

    /// Rewinds to the beginning of the stream.
    pub fn reset(&mut self) {
        self.position = 0;
        self.last_sample = self.first_sample;
    }

    pub fn total_samples(&self) -> usize {
        self.deltas.len()
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn is_end_of_stream(&self) -> bool {
        self.position >= self.deltas.len()
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }
}
