//! Logging backend for the simulator.
//!
//! Installs a minimal logger behind the `log` facade. Records go to stderr
//! so command output on stdout stays clean.

use log::{LevelFilter, Log, Metadata, Record};

/// Global logger instance.
pub static LOGGER: Logger = Logger;

pub struct Logger;

impl Log for Logger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            eprintln!("[{}] {}", record.level(), record.args());
        }
    }

    fn flush(&self) {}
}

/// Install the logger. `verbose` raises the level from `Info` to `Debug`.
pub fn init(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(level);
    }
}
