use std::io::Write;

use crate::{
    format::{Formatter, Record},
    level::Level,
};

/// Destination for formatted records. Sinks filter on their own
/// threshold, which mirrors the owning logger's level.
pub trait Sink: Send {
    fn emit(&mut self, record: &Record<'_>);
    fn flush(&mut self);
}

/// Console sink writing to a caller-supplied stream, stdout by default.
pub struct ConsoleSink {
    stream: Box<dyn Write + Send>,
    formatter: Formatter,
    level: Level,
}

impl ConsoleSink {
    pub fn new(stream: Box<dyn Write + Send>, formatter: Formatter, level: Level) -> Self {
        Self {
            stream,
            formatter,
            level,
        }
    }
}

impl Sink for ConsoleSink {
    fn emit(&mut self, record: &Record<'_>) {
        if record.level < self.level {
            return;
        }
        let line = self.formatter.format(record);
        let _ = writeln!(self.stream, "{line}");
    }

    fn flush(&mut self) {
        let _ = self.stream.flush();
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::SharedBuf;
    use super::*;
    use crate::format::{DATE_FMT, FormatStyle};

    fn console(level: Level) -> (ConsoleSink, SharedBuf) {
        let buf = SharedBuf::default();
        let formatter = Formatter::new(
            "%(name)s - %(levelname)-8s - %(message)s",
            DATE_FMT,
            FormatStyle::Percent,
        );
        (
            ConsoleSink::new(Box::new(buf.clone()), formatter, level),
            buf,
        )
    }

    #[test]
    fn test_console_sink_writes_formatted_line() {
        let (mut sink, buf) = console(Level::Debug);
        sink.emit(&Record {
            level: Level::Info,
            name: "app",
            message: "hello",
            module: None,
            function: None,
        });
        sink.flush();
        assert_eq!(buf.contents(), "app - INFO     - hello\n");
    }

    #[test]
    fn test_console_sink_filters_below_threshold() {
        let (mut sink, buf) = console(Level::Warning);
        sink.emit(&Record {
            level: Level::Info,
            name: "app",
            message: "dropped",
            module: None,
            function: None,
        });
        sink.flush();
        assert_eq!(buf.contents(), "");
    }
}
