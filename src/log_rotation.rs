use std::{
    fs::{self, File},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use chrono::{DateTime, Duration, Local, NaiveTime, Utc};

use crate::{
    config::SCLOG_CONFIG,
    error::Error,
    format::{Formatter, Record},
    level::Level,
    sink::Sink,
};

/// Rotation interval unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RotationWhen {
    Second,
    Minute,
    Hour,
    Day,
    /// Rotate at a fixed time of day, 00:00:00 unless `at_time` is set.
    #[default]
    Midnight,
}

/// Options for the rotating file sink.
#[derive(Debug, Clone)]
pub struct RotationConfig {
    pub when: RotationWhen,
    /// Number of `when` units per rotation period, at least 1.
    pub interval: u32,
    /// Rotated files to keep. 0 keeps everything.
    pub backup_count: u32,
    /// Schedule rollovers in UTC instead of local time.
    pub utc: bool,
    /// Defer opening the log file until the first record is emitted.
    pub delay: bool,
    /// Time of day for `Midnight` rotation.
    pub at_time: Option<NaiveTime>,
}

impl Default for RotationConfig {
    fn default() -> Self {
        Self {
            when: RotationWhen::Midnight,
            interval: 1,
            backup_count: SCLOG_CONFIG.BACKUP_COUNT,
            utc: false,
            delay: false,
            at_time: None,
        }
    }
}

/// File sink that rotates on a time boundary. A rotated file keeps the
/// live path plus a date suffix; oldest backups beyond `backup_count`
/// are deleted after each rotation.
pub struct TimedRotatingFileSink {
    path: PathBuf,
    formatter: Formatter,
    level: Level,
    config: RotationConfig,
    file: Option<BufWriter<File>>,
    next_rollover: DateTime<Utc>,
}

impl TimedRotatingFileSink {
    pub fn new(
        path: PathBuf,
        formatter: Formatter,
        level: Level,
        config: RotationConfig,
    ) -> Result<Self, Error> {
        let file = if config.delay {
            None
        } else {
            Some(open_append(&path)?)
        };
        let next_rollover = next_rollover(&config, Utc::now());
        Ok(Self {
            path,
            formatter,
            level,
            config,
            file,
            next_rollover,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn period(&self) -> Duration {
        let n = self.config.interval.max(1) as i64;
        match self.config.when {
            RotationWhen::Second => Duration::seconds(n),
            RotationWhen::Minute => Duration::minutes(n),
            RotationWhen::Hour => Duration::hours(n),
            RotationWhen::Day | RotationWhen::Midnight => Duration::days(n),
        }
    }

    /// Suffix for the rotated file, stamped with the start of the period
    /// that just ended. Day-level rotation keeps the date-only form.
    fn suffix(&self, at: DateTime<Utc>) -> String {
        let fmt = match self.config.when {
            RotationWhen::Day | RotationWhen::Midnight => "%Y-%m-%d",
            _ => "%Y-%m-%d_%H-%M-%S",
        };
        if self.config.utc {
            at.format(fmt).to_string()
        } else {
            at.with_timezone(&Local).format(fmt).to_string()
        }
    }

    fn rotate(&mut self) {
        if let Some(mut file) = self.file.take() {
            let _ = file.flush();
        }
        let started = self.next_rollover - self.period();
        let rolled = rolled_path(&self.path, &self.suffix(started));
        if rolled.exists() {
            let _ = fs::remove_file(&rolled);
        }
        let _ = fs::rename(&self.path, &rolled);
        self.next_rollover = next_rollover(&self.config, Utc::now());
        if self.config.backup_count > 0 {
            self.cleanup();
        }
    }

    fn cleanup(&self) {
        let Some(name) = self.path.file_name().and_then(|n| n.to_str()) else {
            return;
        };
        let parent = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        let Ok(entries) = fs::read_dir(parent) else {
            return;
        };
        let prefix = format!("{name}.");
        let mut backups: Vec<PathBuf> = entries
            .flatten()
            .filter_map(|entry| {
                let file_name = entry.file_name().to_string_lossy().to_string();
                file_name.starts_with(&prefix).then(|| entry.path())
            })
            .collect();
        // Sort lexicographically (chronological due to date suffixes)
        backups.sort();
        while backups.len() > self.config.backup_count as usize {
            let _ = fs::remove_file(backups.remove(0));
        }
    }
}

impl Sink for TimedRotatingFileSink {
    fn emit(&mut self, record: &Record<'_>) {
        if record.level < self.level {
            return;
        }
        if Utc::now() >= self.next_rollover {
            self.rotate();
        }
        if self.file.is_none() {
            match open_append(&self.path) {
                Ok(file) => self.file = Some(file),
                Err(_) => return,
            }
        }
        let line = self.formatter.format(record);
        if let Some(file) = self.file.as_mut() {
            let _ = writeln!(file, "{line}");
        }
    }

    fn flush(&mut self) {
        if let Some(file) = self.file.as_mut() {
            let _ = file.flush();
        }
    }
}

fn rolled_path(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".");
    name.push(suffix);
    PathBuf::from(name)
}

fn open_append(path: &Path) -> Result<BufWriter<File>, Error> {
    File::options()
        .create(true)
        .append(true)
        .open(path)
        .map(BufWriter::new)
        .map_err(|source| Error::OpenFile {
            path: path.to_path_buf(),
            source,
        })
}

fn next_rollover(config: &RotationConfig, now: DateTime<Utc>) -> DateTime<Utc> {
    let n = config.interval.max(1) as i64;
    match config.when {
        RotationWhen::Second => now + Duration::seconds(n),
        RotationWhen::Minute => now + Duration::minutes(n),
        RotationWhen::Hour => now + Duration::hours(n),
        RotationWhen::Day => now + Duration::days(n),
        RotationWhen::Midnight => {
            let at = config.at_time.unwrap_or(NaiveTime::MIN);
            let extra = Duration::days(n - 1);
            if config.utc {
                let mut candidate = now.date_naive().and_time(at).and_utc();
                if candidate <= now {
                    candidate += Duration::days(1);
                }
                candidate + extra
            } else {
                let local_now = now.with_timezone(&Local);
                let mut date = local_now.date_naive();
                if local_now.time() >= at {
                    date = date + Duration::days(1);
                }
                // DST gaps collapse to a plain 24h fallback.
                date.and_time(at)
                    .and_local_timezone(Local)
                    .earliest()
                    .map(|dt| dt.with_timezone(&Utc))
                    .unwrap_or_else(|| now + Duration::days(1))
                    + extra
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::{DATE_FMT, FormatStyle};
    use std::thread;
    use tempfile::tempdir;

    fn plain_formatter() -> Formatter {
        Formatter::new("%(message)s", DATE_FMT, FormatStyle::Percent)
    }

    fn record<'a>(level: Level, message: &'a str) -> Record<'a> {
        Record {
            level,
            name: "app",
            message,
            module: None,
            function: None,
        }
    }

    fn second_rotation() -> RotationConfig {
        RotationConfig {
            when: RotationWhen::Second,
            interval: 1,
            ..RotationConfig::default()
        }
    }

    fn count_entries(dir: &Path, prefix: &str) -> usize {
        fs::read_dir(dir)
            .unwrap()
            .flatten()
            .filter(|e| e.file_name().to_string_lossy().starts_with(prefix))
            .count()
    }

    #[test]
    fn test_writes_to_live_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("app.log");
        let mut sink = TimedRotatingFileSink::new(
            path.clone(),
            plain_formatter(),
            Level::Debug,
            RotationConfig::default(),
        )
        .unwrap();
        sink.emit(&record(Level::Info, "line1"));
        sink.flush();
        assert_eq!(fs::read_to_string(&path).unwrap(), "line1\n");
    }

    #[test]
    fn test_rotation_renames_current_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("app.log");
        let mut sink = TimedRotatingFileSink::new(
            path.clone(),
            plain_formatter(),
            Level::Debug,
            second_rotation(),
        )
        .unwrap();
        sink.emit(&record(Level::Info, "before"));
        sink.flush();

        thread::sleep(std::time::Duration::from_millis(1100));
        sink.emit(&record(Level::Info, "after"));
        sink.flush();

        assert_eq!(fs::read_to_string(&path).unwrap(), "after\n");
        assert_eq!(count_entries(dir.path(), "app.log."), 1);
    }

    #[test]
    fn test_delay_defers_file_creation() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("app.log");
        let mut sink = TimedRotatingFileSink::new(
            path.clone(),
            plain_formatter(),
            Level::Debug,
            RotationConfig {
                delay: true,
                ..RotationConfig::default()
            },
        )
        .unwrap();
        assert!(!path.exists());
        sink.emit(&record(Level::Info, "first"));
        sink.flush();
        assert!(path.exists());
    }

    #[test]
    fn test_delay_with_filtered_record_keeps_file_closed() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("app.log");
        let mut sink = TimedRotatingFileSink::new(
            path.clone(),
            plain_formatter(),
            Level::Warning,
            RotationConfig {
                delay: true,
                ..RotationConfig::default()
            },
        )
        .unwrap();
        sink.emit(&record(Level::Info, "dropped"));
        assert!(!path.exists());
    }

    #[test]
    fn test_sink_filters_below_threshold() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("app.log");
        let mut sink = TimedRotatingFileSink::new(
            path.clone(),
            plain_formatter(),
            Level::Warning,
            RotationConfig::default(),
        )
        .unwrap();
        sink.emit(&record(Level::Info, "dropped"));
        sink.emit(&record(Level::Error, "kept"));
        sink.flush();
        assert_eq!(fs::read_to_string(&path).unwrap(), "kept\n");
    }

    #[test]
    fn test_cleanup_keeps_backup_count_newest() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("app.log");
        for date in ["2020-01-01", "2020-01-02", "2020-01-03", "2020-01-04"] {
            File::create(dir.path().join(format!("app.log.{date}"))).unwrap();
        }
        let sink = TimedRotatingFileSink::new(
            path,
            plain_formatter(),
            Level::Debug,
            RotationConfig {
                backup_count: 2,
                ..RotationConfig::default()
            },
        )
        .unwrap();
        sink.cleanup();
        assert_eq!(count_entries(dir.path(), "app.log."), 2);
        assert!(dir.path().join("app.log.2020-01-03").exists());
        assert!(dir.path().join("app.log.2020-01-04").exists());
    }

    #[test]
    fn test_backup_count_zero_keeps_everything() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("app.log");
        for date in ["2020-01-01", "2020-01-02", "2020-01-03"] {
            File::create(dir.path().join(format!("app.log.{date}"))).unwrap();
        }
        let mut sink = TimedRotatingFileSink::new(
            path,
            plain_formatter(),
            Level::Debug,
            second_rotation(),
        )
        .unwrap();
        sink.emit(&record(Level::Info, "before"));
        thread::sleep(std::time::Duration::from_millis(1100));
        sink.emit(&record(Level::Info, "after"));
        sink.flush();
        assert!(count_entries(dir.path(), "app.log.") >= 4);
    }

    #[test]
    fn test_next_rollover_fixed_intervals() {
        let now = Utc::now();
        let config = RotationConfig {
            when: RotationWhen::Minute,
            interval: 5,
            ..RotationConfig::default()
        };
        assert_eq!(next_rollover(&config, now), now + Duration::minutes(5));
        let config = RotationConfig {
            when: RotationWhen::Hour,
            interval: 2,
            ..RotationConfig::default()
        };
        assert_eq!(next_rollover(&config, now), now + Duration::hours(2));
    }

    #[test]
    fn test_next_rollover_midnight_utc() {
        let now = Utc::now();
        let config = RotationConfig {
            utc: true,
            ..RotationConfig::default()
        };
        let rollover = next_rollover(&config, now);
        assert!(rollover > now);
        assert!(rollover - now <= Duration::days(1));
        assert_eq!(rollover.time(), NaiveTime::MIN);
    }

    #[test]
    fn test_next_rollover_midnight_at_time() {
        let now = Utc::now();
        let at = NaiveTime::from_hms_opt(3, 30, 0).unwrap();
        let config = RotationConfig {
            utc: true,
            at_time: Some(at),
            ..RotationConfig::default()
        };
        let rollover = next_rollover(&config, now);
        assert!(rollover > now);
        assert_eq!(rollover.time(), at);
    }
}
