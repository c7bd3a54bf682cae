//! Reporting helpers. Nothing here feeds back into encoding.

pub mod compression_report;
pub mod quality_metrics;

pub use compression_report::CompressionReport;
pub use quality_metrics::QualityMetrics;
