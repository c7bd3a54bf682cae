use crate::log::log_level::LogLevel;

/// Destination for codec log lines. Implementations must not block the
/// encoding thread.
pub trait LogSink: Send + Sync {
    fn log(&self, level: LogLevel, msg: &str, target: &'static str);

    /// Lets callers skip formatting work for levels nobody listens to.
    fn enabled(&self, _level: LogLevel) -> bool {
        true
    }
}
