pub mod channel_log_sink;
pub mod log_level;
pub mod log_macros;
pub mod log_msg;
pub mod log_sink;
pub mod noop_log_sink;
pub use channel_log_sink::ChannelLogSink;
pub use noop_log_sink::NoopLogSink;
