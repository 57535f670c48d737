use std::{io, path::PathBuf};

use thiserror::Error;

/// Errors surfaced by logger construction and the cleanup helper.
///
/// Validation failures (`InvalidExtension`, `NotFileOrDirectory`) carry no
/// source error; filesystem failures keep the underlying `io::Error` and
/// name the path that was being handled.
#[derive(Debug, Error)]
pub enum Error {
    /// An existing file was supplied as log target but does not carry
    /// the `.log` extension.
    #[error("invalid log file {path:?}: extension must be .log")]
    InvalidExtension { path: PathBuf },
    /// A cleanup argument naming neither an existing file nor an
    /// existing directory.
    #[error("{path:?} is not a file or a directory")]
    NotFileOrDirectory { path: PathBuf },
    #[error("unable to create log directory {path:?}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("unable to open log file {path:?}")]
    OpenFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("unable to remove {path:?}")]
    Remove {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("unable to read directory {path:?}")]
    ReadDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("unable to determine the working directory")]
    WorkingDir(#[source] io::Error),
}
