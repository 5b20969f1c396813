//! Error handling for the sampling engine.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::platform;

pub type Result<T> = std::result::Result<T, SystemInfoError>;

#[derive(Error, Debug)]
#[must_use]
pub enum SystemInfoError {
    /// The source file or directory could not be read at all.
    #[error("cannot read {path:?}: {source}")]
    SourceUnavailable { path: PathBuf, source: io::Error },
    /// The source was read but its contents did not have the expected shape.
    #[error("cannot parse {path:?}: {reason}")]
    MalformedData { path: PathBuf, reason: String },
    /// A process exited between enumeration and the detailed read.
    #[error("process {pid} exited while being sampled")]
    RaceLoss { pid: u32 },
    /// The set of CPU cores reported by the kernel changed mid-run.
    #[error("cpu core set changed (expected cores {expected:?}, found {found:?})")]
    CoreCountChanged { expected: Vec<u32>, found: Vec<u32> },
}

impl SystemInfoError {
    pub fn unavailable(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::SourceUnavailable {
            path: path.into(),
            source,
        }
    }

    pub fn malformed(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::MalformedData {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Maps an I/O failure on a per-process file. A missing file or an
    /// `ESRCH` means the process is gone, which is not a failure.
    pub fn from_process_io(pid: u32, path: &Path, source: io::Error) -> Self {
        if platform::is_process_gone(&source) {
            Self::RaceLoss { pid }
        } else {
            Self::unavailable(path, source)
        }
    }

    pub fn is_race_loss(&self) -> bool {
        matches!(self, Self::RaceLoss { .. })
    }
}
