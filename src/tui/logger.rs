use log::{Level, Log, Metadata, Record};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Shared handle to the most recent log lines.
#[derive(Debug, Clone, Default)]
pub struct LogBuffer {
    lines: Arc<Mutex<VecDeque<String>>>,
}

impl LogBuffer {
    pub const CAPACITY: usize = 100;

    pub fn push(&self, line: String) {
        if let Ok(mut lines) = self.lines.lock() {
            lines.push_back(line);
            while lines.len() > Self::CAPACITY {
                lines.pop_front();
            }
        }
    }

    /// The last `n` lines, oldest first.
    pub fn recent(&self, n: usize) -> Vec<String> {
        match self.lines.lock() {
            Ok(lines) => lines.iter().skip(lines.len().saturating_sub(n)).cloned().collect(),
            Err(_) => Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.lines.lock().map(|l| l.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// `log` backend that writes into a [`LogBuffer`] instead of the terminal,
/// which the TUI owns.
pub struct TuiLogger {
    buffer: LogBuffer,
    level: Level,
}

impl TuiLogger {
    pub fn new(level: Level) -> (Self, LogBuffer) {
        let buffer = LogBuffer::default();
        (Self { buffer: buffer.clone(), level }, buffer)
    }

    /// Install as the global logger.
    pub fn install(level: Level) -> Result<LogBuffer, log::SetLoggerError> {
        let (logger, buffer) = Self::new(level);
        log::set_boxed_logger(Box::new(logger))?;
        log::set_max_level(level.to_level_filter());
        Ok(buffer)
    }
}

impl Log for TuiLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            self.buffer.push(format!("{:<5} {}", record.level(), record.args()));
        }
    }

    fn flush(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buffer_keeps_only_the_newest_lines() {
        let buf = LogBuffer::default();
        for i in 0..(LogBuffer::CAPACITY + 5) {
            buf.push(format!("line {i}"));
        }
        assert_eq!(buf.len(), LogBuffer::CAPACITY);
        assert_eq!(buf.recent(1), vec![format!("line {}", LogBuffer::CAPACITY + 4)]);
    }

    #[test]
    fn logger_filters_by_level() {
        let (logger, buf) = TuiLogger::new(Level::Info);
        logger.log(&Record::builder().level(Level::Debug).args(format_args!("hidden")).build());
        logger.log(&Record::builder().level(Level::Info).args(format_args!("shown")).build());
        assert_eq!(buf.recent(10), vec!["INFO  shown".to_string()]);
    }

    #[test]
    fn install_sets_the_global_level() {
        let buf = TuiLogger::install(Level::Warn).unwrap();
        assert_eq!(log::max_level(), log::LevelFilter::Warn);
        log::warn!("table closed");
        log::info!("not kept");
        let lines = buf.recent(LogBuffer::CAPACITY);
        assert!(lines.contains(&"WARN  table closed".to_string()));
        assert!(lines.iter().all(|l| !l.starts_with("INFO")));
    }
}
