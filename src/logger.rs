use std::{
    io::{self, Write},
    path::{Path, PathBuf},
};

use crate::{
    error::Error,
    format::{DATE_FMT, FILE_FMT, FormatStyle, Formatter, Record, STREAM_FMT},
    level::Level,
    log_rotation::{RotationConfig, TimedRotatingFileSink},
    path::resolve_filename,
    sink::{ConsoleSink, Sink},
};

/// A named logger with a console sink and an optional rotating file
/// sink. Built once through [`LoggerBuilder`], immutable afterwards.
/// Every record at or above the logger level reaches both sinks.
pub struct ScriptLogger {
    name: String,
    level: Level,
    console: ConsoleSink,
    file: Option<TimedRotatingFileSink>,
    resolved_filename: Option<PathBuf>,
}

impl std::fmt::Debug for ScriptLogger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScriptLogger")
            .field("name", &self.name)
            .field("level", &self.level)
            .field("resolved_filename", &self.resolved_filename)
            .finish_non_exhaustive()
    }
}

impl ScriptLogger {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn level(&self) -> Level {
        self.level
    }

    /// Path of the file sink after resolution, if one was attached.
    pub fn filename(&self) -> Option<&Path> {
        self.resolved_filename.as_deref()
    }

    pub fn log(&mut self, level: Level, message: &str) {
        self.log_record(level, message, None);
    }

    pub fn debug(&mut self, message: &str) {
        self.log(Level::Debug, message);
    }

    pub fn info(&mut self, message: &str) {
        self.log(Level::Info, message);
    }

    pub fn warning(&mut self, message: &str) {
        self.log(Level::Warning, message);
    }

    pub fn error(&mut self, message: &str) {
        self.log(Level::Error, message);
    }

    pub fn critical(&mut self, message: &str) {
        self.log(Level::Critical, message);
    }

    /// Logs at Error level with the source chain of `err` appended.
    pub fn exception(&mut self, message: &str, err: &(dyn std::error::Error + 'static)) {
        let mut text = format!("{message}: {err}");
        let mut source = err.source();
        while let Some(cause) = source {
            text.push_str(&format!("\n  caused by: {cause}"));
            source = cause.source();
        }
        self.log(Level::Error, &text);
    }

    pub(crate) fn log_record(&mut self, level: Level, message: &str, module: Option<&str>) {
        if level < self.level {
            return;
        }
        let record = Record {
            level,
            name: &self.name,
            message,
            module,
            function: None,
        };
        self.console.emit(&record);
        if let Some(file) = self.file.as_mut() {
            file.emit(&record);
        }
    }

    /// Flushes both sinks.
    pub fn flush(&mut self) {
        self.console.flush();
        if let Some(file) = self.file.as_mut() {
            file.flush();
        }
    }
}

impl Drop for ScriptLogger {
    fn drop(&mut self) {
        self.flush();
    }
}

/// Builder for a [`ScriptLogger`]. Entry point: [`logger_config`].
pub struct LoggerBuilder {
    name: String,
    level: Level,
    stream_fmt: String,
    file_fmt: String,
    date_fmt: String,
    style: FormatStyle,
    stream: Option<Box<dyn Write + Send>>,
    filename: Option<PathBuf>,
    rotation: RotationConfig,
}

/// Returns a [`LoggerBuilder`] for the given logger name with the
/// default templates and Debug level.
pub fn logger_config(name: &str) -> LoggerBuilder {
    LoggerBuilder {
        name: name.to_string(),
        level: Level::Debug,
        stream_fmt: STREAM_FMT.to_string(),
        file_fmt: FILE_FMT.to_string(),
        date_fmt: DATE_FMT.to_string(),
        style: FormatStyle::Percent,
        stream: None,
        filename: None,
        rotation: RotationConfig::default(),
    }
}

impl LoggerBuilder {
    /// Threshold applied to the logger and to every sink it owns.
    pub fn with_level(self, level: Level) -> Self {
        Self { level, ..self }
    }

    pub fn with_stream_format(self, fmt: &str) -> Self {
        Self {
            stream_fmt: fmt.into(),
            ..self
        }
    }

    pub fn with_file_format(self, fmt: &str) -> Self {
        Self {
            file_fmt: fmt.into(),
            ..self
        }
    }

    pub fn with_date_format(self, fmt: &str) -> Self {
        Self {
            date_fmt: fmt.into(),
            ..self
        }
    }

    pub fn with_style(self, style: FormatStyle) -> Self {
        Self { style, ..self }
    }

    /// Console destination, stdout when unset.
    pub fn with_stream(self, stream: Box<dyn Write + Send>) -> Self {
        Self {
            stream: Some(stream),
            ..self
        }
    }

    /// Sets the log file hint, resolved at build time.
    pub fn with_filename<P: AsRef<Path>>(self, filename: P) -> Self {
        Self {
            filename: Some(filename.as_ref().to_path_buf()),
            ..self
        }
    }

    /// Maybe sets the log file hint.
    pub fn maybe_with_filename<P: AsRef<Path>>(self, filename: Option<P>) -> Self {
        Self {
            filename: filename.map(|p| p.as_ref().to_path_buf()),
            ..self
        }
    }

    pub fn with_rotation(self, rotation: RotationConfig) -> Self {
        Self { rotation, ..self }
    }

    /// Builds the logger. The console sink is wired first, so a file
    /// resolution failure surfaces with no file sink attached.
    pub fn build(self) -> Result<ScriptLogger, Error> {
        let Self {
            name,
            level,
            stream_fmt,
            file_fmt,
            date_fmt,
            style,
            stream,
            filename,
            rotation,
        } = self;
        let stream = stream.unwrap_or_else(|| Box::new(io::stdout()));
        let console = ConsoleSink::new(
            stream,
            Formatter::new(&stream_fmt, &date_fmt, style).with_color(),
            level,
        );
        let resolved = resolve_filename(&name, filename.as_deref())?;
        let file = resolved
            .as_deref()
            .map(|path| {
                TimedRotatingFileSink::new(
                    path.to_path_buf(),
                    Formatter::new(&file_fmt, &date_fmt, style),
                    level,
                    rotation,
                )
            })
            .transpose()?;
        Ok(ScriptLogger {
            name,
            level,
            console,
            file,
            resolved_filename: resolved,
        })
    }
}
