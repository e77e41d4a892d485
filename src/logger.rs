use std::io::{Write, stderr};
use std::sync::OnceLock;

use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, set_logger, set_max_level};

pub struct Logger;

impl Logger {
    pub fn init(max_level: LevelFilter) -> Result<(), SetLoggerError> {
        set_logger(LOGGER.get_or_init(|| Logger)).map(|()| set_max_level(max_level))
    }
}

impl Log for Logger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let prefix = match record.level() {
            Level::Error => "error: ",
            Level::Warn => "warning: ",
            _ => "",
        };
        let line = format!("{prefix}{}\n", record.args());
        let _ = stderr().lock().write_all(line.as_bytes());
    }

    fn flush(&self) {
        let _ = stderr().flush();
    }
}

static LOGGER: OnceLock<Logger> = OnceLock::new();
