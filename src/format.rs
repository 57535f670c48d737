use std::sync::LazyLock;

use chrono::Local;
use regex::{Captures, Regex};

use crate::level::Level;

/// Date layout for the `asctime` field.
pub const DATE_FMT: &str = "%Y-%m-%d %H:%M:%S";

/// Console record template, short form.
pub const STREAM_FMT: &str = "%(asctime)s - %(name)s - %(levelname)-8s - %(message)s";

/// File record template, long form with process and thread origin.
pub const FILE_FMT: &str = "%(asctime)s - %(process)-6d - %(thread)-6d - %(module)s - \
                            %(funcName)s - %(name)s - %(levelname)-8s - %(message)s";

/// Template placeholder style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormatStyle {
    /// `%(field)s` placeholders, `-` before a width left-justifies.
    #[default]
    Percent,
    /// `{field}` placeholders, `{field:>8}` right-justifies.
    Brace,
}

static PERCENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"%\((\w+)\)(-?)(\d*)[sd]").unwrap());
static BRACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{(\w+)(?::([<>]?)(\d+))?\}").unwrap());

/// A single log record handed to the sinks. The timestamp is taken when
/// the record is formatted, not when it is created.
#[derive(Debug, Clone)]
pub struct Record<'a> {
    pub level: Level,
    pub name: &'a str,
    pub message: &'a str,
    pub module: Option<&'a str>,
    pub function: Option<&'a str>,
}

/// Renders records through a caller-supplied template.
#[derive(Debug, Clone)]
pub struct Formatter {
    template: String,
    date_format: String,
    style: FormatStyle,
    colored: bool,
}

impl Formatter {
    pub fn new(template: &str, date_format: &str, style: FormatStyle) -> Self {
        Self {
            template: template.to_string(),
            date_format: date_format.to_string(),
            style,
            colored: false,
        }
    }

    /// Colorize the level name on substitution. Console only, a file
    /// sink must never receive escape sequences.
    pub(crate) fn with_color(mut self) -> Self {
        self.colored = true;
        self
    }

    pub fn format(&self, record: &Record<'_>) -> String {
        let asctime = Local::now().format(&self.date_format).to_string();
        let re = match self.style {
            FormatStyle::Percent => &*PERCENT_RE,
            FormatStyle::Brace => &*BRACE_RE,
        };
        re.replace_all(&self.template, |caps: &Captures<'_>| {
            let field = caps.get(1).map_or("", |m| m.as_str());
            let width: usize = caps
                .get(3)
                .and_then(|m| m.as_str().parse().ok())
                .unwrap_or(0);
            let left = match self.style {
                FormatStyle::Percent => caps.get(2).is_some_and(|m| m.as_str() == "-"),
                FormatStyle::Brace => caps.get(2).map(|m| m.as_str()) != Some(">"),
            };
            let value = match field {
                "asctime" => asctime.clone(),
                "name" => record.name.to_string(),
                "levelname" => record.level.as_str().to_string(),
                "message" => record.message.to_string(),
                "process" => std::process::id().to_string(),
                "thread" => current_thread_id().to_string(),
                "module" => record.module.unwrap_or("-").to_string(),
                "funcName" => record.function.unwrap_or("-").to_string(),
                _ => "-".to_string(),
            };
            let padded = if width > value.len() {
                if left {
                    format!("{value:<width$}")
                } else {
                    format!("{value:>width$}")
                }
            } else {
                value
            };
            if self.colored && field == "levelname" {
                record.level.colorize(&padded).to_string()
            } else {
                padded
            }
        })
        .into_owned()
    }
}

/// Numeric thread id for the `thread` field. `ThreadId` has no stable
/// numeric accessor, so this leans on its `ThreadId(N)` Debug layout.
fn current_thread_id() -> u64 {
    let repr = format!("{:?}", std::thread::current().id());
    repr.trim_start_matches(|c: char| !c.is_ascii_digit())
        .trim_end_matches(|c: char| !c.is_ascii_digit())
        .parse()
        .unwrap_or(0)
}
