// A bare-bones logger over the `log` facade. Diagnostics belong on stderr
// and the level gate lives in `log::set_max_level`, so there is nothing else
// to configure.

use log::Log;

/// The simplest possible logger that logs to stderr.
#[derive(Debug)]
pub struct Logger(());

const LOGGER: &Logger = &Logger(());

impl Logger {
    /// Installs the logger as the global logger at the given level.
    pub fn init(level: log::LevelFilter) -> Result<(), log::SetLoggerError> {
        log::set_logger(LOGGER)?;
        log::set_max_level(level);
        Ok(())
    }
}

impl Log for Logger {
    fn enabled(&self, _: &log::Metadata<'_>) -> bool {
        true
    }

    fn log(&self, record: &log::Record<'_>) {
        eprintln!("{}|{}: {}", record.level(), record.target(), record.args());
    }

    fn flush(&self) {
        // eprintln! flushes on every call.
    }
}
