//! # sclog
//! Script logging toolkit: named loggers with a console sink and an
//! optional time-rotating file sink, plus a cleanup helper for
//! generated log artifacts.
//!
//! ## Usage
//! ```toml
//! // Cargo.toml
//! ...
//! [dependencies]
//! sclog = "0.1.0"
//! ```
//!
//! ```rust
//! use sclog::{Level, logger_config};
//!
//! let mut logger = logger_config("my_script")
//!     .with_level(Level::Debug)
//!     .build()
//!     .expect("unable to build logger");
//! logger.info("Hello, world!");
//! logger.flush();
//! ```
//!
//! ## Logging to files
//! A filename hint turns on the rotating file sink. An existing `.log`
//! file is appended to, an existing directory gets `<name>.log`, and a
//! bare name lands under `./logs/`. Rotation defaults to midnight with
//! unlimited retained backups.
//!
//! ```rust,no_run
//! use sclog::{logger_config, rmall};
//!
//! let mut logger = logger_config("my_script")
//!     .with_filename("my_script")
//!     .build()
//!     .expect("unable to build logger");
//! logger.warning("logged to console and ./logs/my_script.log");
//! drop(logger); // flushes both sinks
//!
//! // cleanup of generated artifacts
//! rmall(&["logs"], true).expect("cleanup failed");
//! ```
//!
//! ## log facade
//! A built logger can serve as the process-wide backend for the `log`
//! crate. The guard flushes the sinks when dropped.
//!
//! ```rust
//! use sclog::{init_global, logger_config};
//!
//! let logger = logger_config("my_script").build().unwrap();
//! let _guard = init_global(logger).unwrap();
//! log::info!("Hello, world!");
//! // guard ensures logs are flushed when dropped
//! ```

mod cleanup;
mod config;
mod error;
mod format;
mod level;
mod log_rotation;
mod logger;
mod path;
mod sink;

pub use cleanup::rmall;
pub use config::SCLOG_CONFIG;
pub use error::Error;
pub use format::{DATE_FMT, FILE_FMT, FormatStyle, Formatter, Record, STREAM_FMT};
pub use level::Level;
pub use log_rotation::{RotationConfig, RotationWhen, TimedRotatingFileSink};
pub use logger::{LoggerBuilder, ScriptLogger, logger_config};
pub use path::resolve_filename;
pub use sink::{ConsoleSink, Sink};

use std::sync::Mutex;

/// Bridges an installed [`ScriptLogger`] into the `log` facade. The
/// mutex serializes access, the sinks themselves stay synchronous.
struct GlobalLogger {
    level: Level,
    inner: Mutex<ScriptLogger>,
}

impl log::Log for GlobalLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        Level::from(metadata.level()) >= self.level
    }

    fn log(&self, record: &log::Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        if let Ok(mut logger) = self.inner.lock() {
            logger.log_record(
                Level::from(record.level()),
                &record.args().to_string(),
                record.module_path(),
            );
        }
    }

    fn flush(&self) {
        if let Ok(mut logger) = self.inner.lock() {
            logger.flush();
        }
    }
}

/// Guard that flushes the installed logger when dropped.
#[must_use = "LoggerGuard must be kept alive to flush logs on teardown. Do \"let _guard = init_global(logger);\""]
pub struct LoggerGuard;

impl Drop for LoggerGuard {
    fn drop(&mut self) {
        log::logger().flush();
    }
}

/// Installs a [`ScriptLogger`] as the process-wide backend of the `log`
/// facade and caps `log::max_level` at the logger's threshold. Fails if
/// a logger was already installed.
pub fn init_global(logger: ScriptLogger) -> Result<LoggerGuard, log::SetLoggerError> {
    let level = logger.level();
    log::set_boxed_logger(Box::new(GlobalLogger {
        level,
        inner: Mutex::new(logger),
    }))?;
    log::set_max_level(level.to_level_filter());
    Ok(LoggerGuard)
}
