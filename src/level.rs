use colored::{ColoredString, Colorize};

/// Severity levels, ordered. Numeric values follow the classic
/// NOTSET..CRITICAL ladder so thresholds compare directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    NotSet = 0,
    Debug = 10,
    Info = 20,
    Warning = 30,
    Error = 40,
    Critical = 50,
}

impl Level {
    /// Upper-case name as it appears in the `levelname` record field.
    pub fn as_str(self) -> &'static str {
        match self {
            Level::NotSet => "NOTSET",
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Warning => "WARNING",
            Level::Error => "ERROR",
            Level::Critical => "CRITICAL",
        }
    }

    pub fn severity(self) -> u8 {
        self as u8
    }

    pub(crate) fn colorize(self, text: &str) -> ColoredString {
        match self {
            Level::NotSet => text.normal(),
            Level::Debug => text.blue(),
            Level::Info => text.green(),
            Level::Warning => text.yellow(),
            Level::Error => text.red(),
            Level::Critical => text.purple(),
        }
    }

    pub(crate) fn to_level_filter(self) -> log::LevelFilter {
        match self {
            Level::NotSet => log::LevelFilter::Trace,
            Level::Debug => log::LevelFilter::Debug,
            Level::Info => log::LevelFilter::Info,
            Level::Warning => log::LevelFilter::Warn,
            Level::Error | Level::Critical => log::LevelFilter::Error,
        }
    }
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<log::Level> for Level {
    fn from(level: log::Level) -> Self {
        match level {
            log::Level::Error => Level::Error,
            log::Level::Warn => Level::Warning,
            log::Level::Info => Level::Info,
            log::Level::Debug | log::Level::Trace => Level::Debug,
        }
    }
}
