//! Whole-buffer encoding of independent tracks in parallel.

use std::{num::NonZeroUsize, thread};

use crate::codec::{DeltaCodec, codec_error::Result};

/// One mono track ready for encoding.
#[derive(Debug, Clone, Copy)]
pub struct Track<'a> {
    pub samples: &'a [f32],
    pub sample_rate: u32,
}

/// Encodes tracks on at most `available_parallelism()` scoped workers.
/// Results keep the input order; tracks share nothing but the read-only
/// codec.
pub fn encode_tracks(codec: &DeltaCodec, tracks: &[Track<'_>]) -> Vec<Result<Vec<u8>>> {
    let workers = thread::available_parallelism().map_or(1, NonZeroUsize::get);
    encode_tracks_with_workers(codec, tracks, workers)
}

/// Splits `tracks` into at most `workers` contiguous groups, one scoped
/// thread each. A group whose thread cannot be spawned is encoded on the
/// calling thread instead.
pub fn encode_tracks_with_workers(
    codec: &DeltaCodec,
    tracks: &[Track<'_>],
    workers: usize,
) -> Vec<Result<Vec<u8>>> {
    if tracks.is_empty() {
        return Vec::new();
    }
    let group_len = tracks.len().div_ceil(workers.max(1));

    thread::scope(|s| {
        let handles: Vec<_> = tracks
            .chunks(group_len)
            .enumerate()
            .map(|(i, group)| {
                thread::Builder::new()
                    .name(format!("batch-encode-{i}"))
                    .spawn_scoped(s, move || encode_group(codec, group))
                    .map_err(|_| group)
            })
            .collect();

        handles
            .into_iter()
            .flat_map(|handle| match handle {
                Ok(h) => match h.join() {
                    Ok(results) => results,
                    Err(panic) => std::panic::resume_unwind(panic),
                },
                Err(group) => encode_group(codec, group),
            })
            .collect()
    })
}

fn encode_group(codec: &DeltaCodec, group: &[Track<'_>]) -> Vec<Result<Vec<u8>>> {
    group
        .iter()
        .map(|t| codec.encode(t.samples, t.sample_rate))
        .collect()
}
