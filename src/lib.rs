//! deltapack is a lossy delta audio codec for memory-constrained sound
//! hardware.
//!
//! Two container formats are provided:
//! - `PGDD`: variable-width deltas classified into magnitude tiers and packed
//!   into a dense bitstream.
//! - `FQWT`: fixed-width signed 8-bit deltas, decodable incrementally on a
//!   target with no floating point.
//!
//! The crate is structured into several modules, each responsible for one
//! stage of producing or inspecting a container.

/// Tier statistics, reconstruction quality and compression reports.
pub mod analysis;
/// Parallel whole-buffer encoding of independent tracks.
pub mod batch;
/// C source rendering of container bytes for ROM embedding.
pub mod c_array;
/// Quantization, classification, bit packing and container codecs.
pub mod codec;
/// Handles configuration loading and management.
pub mod config;
/// Logging utilities for the codecs.
pub mod log;
