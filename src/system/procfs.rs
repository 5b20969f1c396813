//! Read access to the kernel's process pseudo-filesystem.
//!
//! Samplers never touch `std::fs` directly. They go through [`ProcFs`], with
//! paths relative to the proc root (`stat`, `meminfo`, `1234/status`), so the
//! whole engine can run against [`RealFs`] or an in-memory fixture.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub const DEFAULT_PROC_ROOT: &str = "/proc";

pub trait ProcFs {
    /// Reads a whole file below the proc root. Non-UTF-8 bytes are replaced.
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Lists the numeric directory entries of the proc root.
    fn list_pids(&self) -> io::Result<Vec<u32>>;
}

impl<T: ProcFs + ?Sized> ProcFs for Arc<T> {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        (**self).read_to_string(path)
    }

    fn list_pids(&self) -> io::Result<Vec<u32>> {
        (**self).list_pids()
    }
}

impl<T: ProcFs + ?Sized> ProcFs for &T {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        (**self).read_to_string(path)
    }

    fn list_pids(&self) -> io::Result<Vec<u32>> {
        (**self).list_pids()
    }
}

#[derive(Debug, Clone)]
pub struct RealFs {
    root: PathBuf,
}

impl Default for RealFs {
    fn default() -> Self {
        Self::new(DEFAULT_PROC_ROOT)
    }
}

impl RealFs {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl ProcFs for RealFs {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        let bytes = fs::read(self.root.join(path))?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    fn list_pids(&self) -> io::Result<Vec<u32>> {
        let mut pids = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            // Entries can disappear while iterating; skip them.
            let Ok(entry) = entry else {
                continue;
            };
            let Some(pid) = entry.file_name().to_str().and_then(|s| s.parse().ok()) else {
                continue;
            };
            if entry.file_type().map(|t| t.is_dir()).unwrap_or(false) {
                pids.push(pid);
            }
        }
        Ok(pids)
    }
}

/// Relative path of a per-process file, e.g. `1234/stat`.
pub fn process_path(pid: u32, file: &str) -> PathBuf {
    PathBuf::from(pid.to_string()).join(file)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("proctop_{name}_{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn list_pids_keeps_numeric_directories_only() {
        let root = scratch_dir("list_pids");
        fs::create_dir_all(root.join("1")).unwrap();
        fs::create_dir_all(root.join("42")).unwrap();
        fs::create_dir_all(root.join("self")).unwrap();
        fs::create_dir_all(root.join("sys")).unwrap();
        fs::write(root.join("7"), "not a directory").unwrap();
        fs::write(root.join("uptime"), "1.0 2.0").unwrap();

        let fs_impl = RealFs::new(&root);
        let mut pids = fs_impl.list_pids().unwrap();
        pids.sort_unstable();
        assert_eq!(pids, vec![1, 42]);

        let _ = fs::remove_dir_all(&root);
    }

    #[test]
    fn read_replaces_invalid_utf8() {
        let root = scratch_dir("lossy");
        fs::create_dir_all(root.join("9")).unwrap();
        fs::write(root.join("9/cmdline"), b"ab\xffcd\0").unwrap();

        let fs_impl = RealFs::new(&root);
        let text = fs_impl.read_to_string(&process_path(9, "cmdline")).unwrap();
        assert_eq!(text, "ab\u{fffd}cd\0");

        let _ = fs::remove_dir_all(&root);
    }

    #[test]
    fn missing_file_is_not_found() {
        let fs_impl = RealFs::new("/nonexistent/proctop/root");
        let err = fs_impl.read_to_string(Path::new("stat")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn process_path_joins_pid_and_file() {
        assert_eq!(process_path(1234, "status"), PathBuf::from("1234/status"));
    }
}
