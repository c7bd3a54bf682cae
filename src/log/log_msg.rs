use std::{fmt, time::SystemTime};

use crate::log::log_level::LogLevel;

/// A single log event as delivered to a channel consumer.
#[derive(Debug, Clone)]
pub struct LogMsg {
    pub level: LogLevel,
    /// Wall clock time of the event in milliseconds since the UNIX epoch.
    pub ts_ms: u128,
    pub text: String,
    /// Module path of the emitting code.
    pub target: &'static str,
}

impl LogMsg {
    /// Creates a message stamped with the current time.
    pub fn now(level: LogLevel, text: impl Into<String>, target: &'static str) -> Self {
        Self {
            level,
            ts_ms: now_millis(),
            text: text.into(),
            target,
        }
    }
}

impl fmt::Display for LogMsg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {} {} | {}", self.level, self.ts_ms, self.target, self.text)
    }
}

pub fn now_millis() -> u128 {
    SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default()
}
