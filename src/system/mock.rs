//! In-memory [`ProcFs`] for tests and benchmarks.
//!
//! Files live in a map keyed by their path relative to the proc root. A pid
//! is enumerated when any `<pid>/...` file exists, or when it was registered
//! as a *ghost*: listed by the directory scan but with every read failing
//! with `NotFound`, which is exactly what a process exiting between
//! enumeration and the detailed read looks like.

use std::collections::{BTreeMap, BTreeSet};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use super::procfs::{ProcFs, process_path};

#[derive(Debug, Default)]
pub struct MockFs {
    files: RwLock<BTreeMap<PathBuf, String>>,
    ghosts: RwLock<BTreeSet<u32>>,
}

impl MockFs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Four cores, 16 GiB of memory, and three processes: an init process,
    /// a kernel thread and a shell.
    pub fn typical_system() -> Self {
        let fs = Self::new();
        fs.set_stat(&stat_text(&[[100, 0, 50, 850, 0, 0, 0, 0, 0, 0]; 4]));
        fs.set_meminfo(&meminfo_text(&[
            ("MemTotal", 16_777_216),
            ("MemFree", 8_388_608),
            ("Buffers", 262_144),
            ("Cached", 2_097_152),
            ("SReclaimable", 131_072),
            ("Shmem", 65_536),
            ("SwapTotal", 2_097_152),
            ("SwapFree", 2_097_152),
        ]));
        fs.set_uptime(1000.0);
        fs.set_loadavg("0.63 0.41 0.77 1/180 4242\n");
        fs.add_process(
            &MockProcess::new(1, "systemd")
                .cmdline("/sbin/init splash")
                .memory_kb(225_000, 7_779, 3_384),
        );
        fs.add_process(&MockProcess::new(2, "kthreadd").kernel_thread());
        fs.add_process(
            &MockProcess::new(300, "bash")
                .cmdline("-bash")
                .uid(1000)
                .memory_kb(12_000, 5_000, 3_000),
        );
        fs
    }

    pub fn insert(&self, path: impl Into<PathBuf>, contents: impl Into<String>) {
        self.files
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(path.into(), contents.into());
    }

    pub fn remove(&self, path: impl AsRef<Path>) {
        self.files
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .remove(path.as_ref());
    }

    pub fn set_stat(&self, contents: &str) {
        self.insert("stat", contents);
    }

    pub fn set_meminfo(&self, contents: &str) {
        self.insert("meminfo", contents);
    }

    pub fn set_uptime(&self, seconds: f64) {
        self.insert("uptime", format!("{seconds:.2} {:.2}\n", seconds * 3.5));
    }

    pub fn set_loadavg(&self, contents: &str) {
        self.insert("loadavg", contents);
    }

    pub fn add_process(&self, process: &MockProcess) {
        self.insert(process_path(process.pid, "stat"), process.stat_line());
        self.insert(process_path(process.pid, "status"), process.status_text());
        self.insert(process_path(process.pid, "cmdline"), process.cmdline_blob());
    }

    /// Drops every file of `pid`, as if the process exited.
    pub fn remove_process(&self, pid: u32) {
        let prefix = PathBuf::from(pid.to_string());
        self.files
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .retain(|path, _| !path.starts_with(&prefix));
        self.ghosts
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .remove(&pid);
    }

    pub fn add_ghost(&self, pid: u32) {
        self.ghosts
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(pid);
    }
}

impl ProcFs for MockFs {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        self.files
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(path)
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, format!("{path:?}")))
    }

    fn list_pids(&self) -> io::Result<Vec<u32>> {
        let files = self.files.read().unwrap_or_else(|e| e.into_inner());
        let mut pids: BTreeSet<u32> = files
            .keys()
            .filter(|path| path.components().count() > 1)
            .filter_map(|path| path.components().next()?.as_os_str().to_str()?.parse().ok())
            .collect();
        pids.extend(
            self.ghosts
                .read()
                .unwrap_or_else(|e| e.into_inner())
                .iter()
                .copied(),
        );
        Ok(pids.into_iter().collect())
    }
}

/// Builder for the `stat`, `status` and `cmdline` files of one process.
#[derive(Debug, Clone)]
pub struct MockProcess {
    pub pid: u32,
    pub ppid: u32,
    pub comm: String,
    pub cmdline: String,
    pub state: char,
    pub flags: u64,
    pub utime: u64,
    pub stime: u64,
    pub cutime: u64,
    pub cstime: u64,
    pub priority: i64,
    pub nice: i64,
    pub num_threads: u32,
    pub uid: u32,
    pub vm_size_kb: Option<u64>,
    pub rss_kb: Option<u64>,
    pub shmem_kb: Option<u64>,
}

impl MockProcess {
    pub fn new(pid: u32, comm: &str) -> Self {
        Self {
            pid,
            ppid: 1,
            comm: comm.to_string(),
            cmdline: String::new(),
            state: 'S',
            flags: 0x0040_0100,
            utime: 0,
            stime: 0,
            cutime: 0,
            cstime: 0,
            priority: 20,
            nice: 0,
            num_threads: 1,
            uid: 0,
            vm_size_kb: None,
            rss_kb: None,
            shmem_kb: None,
        }
    }

    pub fn cmdline(mut self, cmdline: &str) -> Self {
        self.cmdline = cmdline.to_string();
        self
    }

    pub fn state(mut self, state: char) -> Self {
        self.state = state;
        self
    }

    pub fn ticks(mut self, utime: u64, stime: u64) -> Self {
        self.utime = utime;
        self.stime = stime;
        self
    }

    pub fn child_ticks(mut self, cutime: u64, cstime: u64) -> Self {
        self.cutime = cutime;
        self.cstime = cstime;
        self
    }

    pub fn priority(mut self, priority: i64, nice: i64) -> Self {
        self.priority = priority;
        self.nice = nice;
        self
    }

    pub fn uid(mut self, uid: u32) -> Self {
        self.uid = uid;
        self
    }

    pub fn memory_kb(mut self, vm_size: u64, rss: u64, shmem: u64) -> Self {
        self.vm_size_kb = Some(vm_size);
        self.rss_kb = Some(rss);
        self.shmem_kb = Some(shmem);
        self
    }

    pub fn kernel_thread(mut self) -> Self {
        self.flags = 0x0020_8040;
        self.ppid = 2;
        self.state = 'I';
        self.priority = 0;
        self.nice = -20;
        self
    }

    pub fn stat_line(&self) -> String {
        format!(
            "{pid} ({comm}) {state} {ppid} {pid} {pid} 0 -1 {flags} 120 0 3 0 \
             {utime} {stime} {cutime} {cstime} {priority} {nice} {threads} 0 \
             5 {vsize} {rss} 18446744073709551615 0 0 0 0 0 0 0 0 0 0 0 0 17 0 0 0 0 0 0\n",
            pid = self.pid,
            comm = self.comm,
            state = self.state,
            ppid = self.ppid,
            flags = self.flags,
            utime = self.utime,
            stime = self.stime,
            cutime = self.cutime,
            cstime = self.cstime,
            priority = self.priority,
            nice = self.nice,
            threads = self.num_threads,
            vsize = self.vm_size_kb.unwrap_or(0) * 1024,
            rss = self.rss_kb.unwrap_or(0) / 4,
        )
    }

    pub fn status_text(&self) -> String {
        let mut text = format!(
            "Name:\t{}\nUmask:\t0022\nState:\t{} ({})\nTgid:\t{pid}\nPid:\t{pid}\nPPid:\t{}\n\
             Uid:\t{uid}\t{uid}\t{uid}\t{uid}\nGid:\t{uid}\t{uid}\t{uid}\t{uid}\n",
            self.comm,
            self.state,
            state_word(self.state),
            self.ppid,
            pid = self.pid,
            uid = self.uid,
        );
        if let Some(kb) = self.vm_size_kb {
            text.push_str(&format!("VmSize:\t{kb:>8} kB\n"));
        }
        if let Some(kb) = self.rss_kb {
            text.push_str(&format!("VmRSS:\t{kb:>8} kB\n"));
        }
        if let Some(kb) = self.shmem_kb {
            text.push_str(&format!("RssShmem:\t{kb:>8} kB\n"));
        }
        text.push_str(&format!("Threads:\t{}\n", self.num_threads));
        text
    }

    pub fn cmdline_blob(&self) -> String {
        if self.cmdline.is_empty() {
            return String::new();
        }
        let mut blob = self.cmdline.split(' ').collect::<Vec<_>>().join("\0");
        blob.push('\0');
        blob
    }
}

fn state_word(state: char) -> &'static str {
    match state {
        'R' => "running",
        'S' => "sleeping",
        'D' => "disk sleep",
        'T' => "stopped",
        't' => "tracing stop",
        'Z' => "zombie",
        'I' => "idle",
        _ => "unknown",
    }
}

/// Renders a `stat` file: the aggregate `cpu` line is the sum of the cores.
pub fn stat_text(cores: &[[u64; 10]]) -> String {
    let mut aggregate = [0u64; 10];
    for core in cores {
        for (sum, value) in aggregate.iter_mut().zip(core) {
            *sum += value;
        }
    }

    let join = |values: &[u64; 10]| {
        values
            .iter()
            .map(u64::to_string)
            .collect::<Vec<_>>()
            .join(" ")
    };

    let mut text = format!("cpu  {}\n", join(&aggregate));
    for (index, core) in cores.iter().enumerate() {
        text.push_str(&format!("cpu{index} {}\n", join(core)));
    }
    text.push_str("intr 1234 0 0\nctxt 987654\nbtime 1700000000\nprocesses 4242\n");
    text.push_str("procs_running 2\nprocs_blocked 0\n");
    text
}

/// Renders a `meminfo` file from `(field, kB)` pairs.
pub fn meminfo_text(fields: &[(&str, u64)]) -> String {
    fields
        .iter()
        .map(|(name, kb)| format!("{:<16}{kb:>8} kB\n", format!("{name}:")))
        .collect()
}
