use std::sync::mpsc;

use crate::log::{log_level::LogLevel, log_msg::LogMsg, log_sink::LogSink};

/// Cloneable, non-blocking sink that forwards codec logs over a bounded
/// channel.
///
/// The host drains the paired `Receiver` on whatever thread it likes. When
/// the queue is full the message is dropped rather than stalling the codec.
///
/// # Examples
/// ```ignore
/// let (sink, rx) = ChannelLogSink::bounded(256, LogLevel::Debug);
/// let codec = DeltaCodec::new(tiers)?.with_log_sink(Arc::new(sink));
/// codec.encode(&samples, 8000)?;
/// for msg in rx.try_iter() { println!("{msg}"); }
/// ```
#[derive(Clone)]
pub struct ChannelLogSink {
    tx: mpsc::SyncSender<LogMsg>,
    min_level: LogLevel,
}

impl ChannelLogSink {
    /// Creates a sink with room for `cap` pending messages. Messages below
    /// `min_level` are filtered before they are formatted.
    pub fn bounded(cap: usize, min_level: LogLevel) -> (Self, mpsc::Receiver<LogMsg>) {
        let (tx, rx) = mpsc::sync_channel(cap);
        (Self { tx, min_level }, rx)
    }

    /// Attempts to enqueue a message without blocking.
    ///
    /// # Errors
    /// - `TrySendError::Full` when the bounded queue is at capacity.
    /// - `TrySendError::Disconnected` when the receiver has been dropped.
    pub fn try_log<S: Into<String>>(
        &self,
        level: LogLevel,
        text: S,
        target: &'static str,
    ) -> Result<(), mpsc::TrySendError<LogMsg>> {
        self.tx.try_send(LogMsg::now(level, text, target))
    }
}

impl LogSink for ChannelLogSink {
    #[inline]
    fn log(&self, level: LogLevel, msg: &str, target: &'static str) {
        if self.enabled(level) {
            let _ = self.try_log(level, msg, target);
        }
    }

    fn enabled(&self, level: LogLevel) -> bool {
        level >= self.min_level
    }
}
