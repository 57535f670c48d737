use std::{
    env, fs,
    path::{Path, PathBuf},
};

use crate::{config::SCLOG_CONFIG, error::Error};

/// Resolves the caller-supplied filename hint to the log file path.
///
/// - `None` resolves to no file at all.
/// - An existing file is used unchanged, provided its extension is
///   exactly `.log`.
/// - An existing directory gets `<dir>/<logger-name>.log`.
/// - Anything else lands in `<cwd>/logs/<hint>.log`, creating the `logs`
///   directory when absent. Extensions on the hint are replaced.
pub fn resolve_filename(name: &str, filename: Option<&Path>) -> Result<Option<PathBuf>, Error> {
    let base = env::current_dir().map_err(Error::WorkingDir)?;
    resolve_in(&base, name, filename)
}

pub(crate) fn resolve_in(
    base: &Path,
    name: &str,
    filename: Option<&Path>,
) -> Result<Option<PathBuf>, Error> {
    let Some(filename) = filename else {
        return Ok(None);
    };
    if filename.is_file() {
        if filename.extension().and_then(|e| e.to_str()) != Some("log") {
            return Err(Error::InvalidExtension {
                path: filename.to_path_buf(),
            });
        }
        Ok(Some(filename.to_path_buf()))
    } else if filename.is_dir() {
        Ok(Some(filename.join(format!("{}.log", stem(Path::new(name))))))
    } else {
        let dir = base.join(&SCLOG_CONFIG.LOG_DIR);
        if !dir.is_dir() {
            fs::create_dir(&dir).map_err(|source| Error::CreateDir {
                path: dir.clone(),
                source,
            })?;
        }
        Ok(Some(dir.join(format!("{}.log", stem(filename)))))
    }
}

fn stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}
