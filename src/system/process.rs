//! One tracked process: parsing of `<pid>/{cmdline,stat,status}` and the
//! derived CPU and memory shares.

use std::str::FromStr;

use serde::Serialize;

use super::error::{Result, SystemInfoError};
use super::procfs::{ProcFs, process_path};
use super::rate::{SamplePair, TickReading};
use super::users::UserTable;

/// `PF_KTHREAD`: the task is a kernel thread.
pub const PF_KTHREAD: u64 = 0x0020_0000;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum ProcessState {
    Running,
    Sleeping,
    DiskWait,
    Stopped,
    Zombie,
    Idle,
    Other(char),
}

impl ProcessState {
    pub fn from_char(c: char) -> Self {
        match c {
            'R' => ProcessState::Running,
            'S' => ProcessState::Sleeping,
            'D' => ProcessState::DiskWait,
            'T' | 't' => ProcessState::Stopped,
            'Z' => ProcessState::Zombie,
            'I' => ProcessState::Idle,
            other => ProcessState::Other(other),
        }
    }

    pub fn as_char(self) -> char {
        match self {
            ProcessState::Running => 'R',
            ProcessState::Sleeping => 'S',
            ProcessState::DiskWait => 'D',
            ProcessState::Stopped => 'T',
            ProcessState::Zombie => 'Z',
            ProcessState::Idle => 'I',
            ProcessState::Other(c) => c,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ProcessState::Running => "running",
            ProcessState::Sleeping => "sleeping",
            ProcessState::DiskWait => "disk wait",
            ProcessState::Stopped => "stopped",
            ProcessState::Zombie => "zombie",
            ProcessState::Idle => "idle",
            ProcessState::Other(_) => "other",
        }
    }
}

/// Values the registry injects into every record update. Nothing in a
/// record reaches for global state.
#[derive(Debug, Clone, Copy)]
pub struct ProcessContext<'a> {
    pub uptime_seconds: f64,
    pub total_memory: u64,
    pub clock_ticks: u64,
    pub users: &'a UserTable,
}

/// Read-only copy of a record, as published in the engine snapshot.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ProcessInfo {
    pub pid: u32,
    pub ppid: u32,
    pub name: String,
    pub command: String,
    pub user: String,
    pub uid: u32,
    pub priority: i64,
    pub niceness: i64,
    pub num_threads: u32,
    pub state: ProcessState,
    pub virtual_memory: u64,
    pub resident_memory: u64,
    pub shared_memory: u64,
    pub cpu_percent: f64,
    pub memory_percent: f64,
    pub cpu_time_seconds: f64,
    pub kernel_thread: bool,
}

#[derive(Debug, Clone)]
pub struct ProcessRecord {
    pid: u32,
    name: String,
    command: String,
    user: String,
    uid: u32,
    ppid: u32,
    priority: i64,
    niceness: i64,
    num_threads: u32,
    state: ProcessState,
    virtual_memory: u64,
    resident_memory: u64,
    shared_memory: u64,
    ticks: SamplePair<TickReading>,
    cpu_percent: f64,
    memory_percent: f64,
    cpu_time_seconds: f64,
    kernel_thread: bool,
}

impl ProcessRecord {
    /// First observation of `pid`: reads the static attributes once and
    /// seeds the tick baseline so that the first CPU share is `0.0`.
    pub fn discover(fs: &impl ProcFs, pid: u32, ctx: &ProcessContext<'_>) -> Result<Self> {
        let cmdline = read_process_file(fs, pid, "cmdline")?;
        let (stat, status) = read_dynamic(fs, pid)?;

        let mut command = parse_cmdline(&cmdline);
        if command.is_empty() {
            command = stat.comm.clone();
        }
        if command.is_empty() {
            command = status.name.clone();
        }

        let reading = TickReading {
            ticks: stat.total_ticks(),
            uptime_seconds: ctx.uptime_seconds,
        };
        let mut record = Self {
            pid,
            name: status.name.clone(),
            command,
            user: ctx.users.name(status.uid),
            uid: status.uid,
            ppid: 0,
            priority: 0,
            niceness: 0,
            num_threads: 0,
            state: status.state,
            virtual_memory: 0,
            resident_memory: 0,
            shared_memory: 0,
            ticks: SamplePair::new(reading),
            cpu_percent: 0.0,
            memory_percent: 0.0,
            cpu_time_seconds: 0.0,
            kernel_thread: false,
        };
        record.apply(stat, status, ctx);
        Ok(record)
    }

    /// Re-reads the dynamic attributes. On error the record is unchanged.
    pub fn update(&mut self, fs: &impl ProcFs, ctx: &ProcessContext<'_>) -> Result<()> {
        let (stat, status) = read_dynamic(fs, self.pid)?;
        self.ticks.push(TickReading {
            ticks: stat.total_ticks(),
            uptime_seconds: ctx.uptime_seconds,
        });
        self.apply(stat, status, ctx);
        Ok(())
    }

    fn apply(&mut self, stat: StatFields, status: StatusFields, ctx: &ProcessContext<'_>) {
        if status.uid != self.uid {
            self.uid = status.uid;
            self.user = ctx.users.name(status.uid);
        }
        self.ppid = stat.ppid;
        self.priority = stat.priority;
        self.niceness = stat.nice;
        self.num_threads = stat.num_threads;
        self.kernel_thread = stat.flags & PF_KTHREAD != 0;
        self.state = status.state;
        self.virtual_memory = status.vm_size;
        self.resident_memory = status.vm_rss;
        self.shared_memory = status.rss_shmem;

        self.cpu_percent = self.ticks.cpu_percent(ctx.clock_ticks);
        self.memory_percent = memory_percent(self.resident_memory, ctx.total_memory);
        self.cpu_time_seconds = if ctx.clock_ticks == 0 {
            0.0
        } else {
            stat.utime.saturating_add(stat.stime) as f64 / ctx.clock_ticks as f64
        };
    }

    pub fn pid(&self) -> u32 {
        self.pid
    }

    pub fn cpu_percent(&self) -> f64 {
        self.cpu_percent
    }

    pub fn memory_percent(&self) -> f64 {
        self.memory_percent
    }

    pub fn state(&self) -> ProcessState {
        self.state
    }

    pub fn is_kernel_thread(&self) -> bool {
        self.kernel_thread
    }

    pub fn num_threads(&self) -> u32 {
        self.num_threads
    }

    pub fn info(&self) -> ProcessInfo {
        ProcessInfo {
            pid: self.pid,
            ppid: self.ppid,
            name: self.name.clone(),
            command: self.command.clone(),
            user: self.user.clone(),
            uid: self.uid,
            priority: self.priority,
            niceness: self.niceness,
            num_threads: self.num_threads,
            state: self.state,
            virtual_memory: self.virtual_memory,
            resident_memory: self.resident_memory,
            shared_memory: self.shared_memory,
            cpu_percent: self.cpu_percent,
            memory_percent: self.memory_percent,
            cpu_time_seconds: self.cpu_time_seconds,
            kernel_thread: self.kernel_thread,
        }
    }
}

/// Resident share of system memory in percent, rounded to one decimal.
pub fn memory_percent(resident: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (resident as f64 * 1000.0 / total as f64).round() / 10.0
}

fn read_process_file(fs: &impl ProcFs, pid: u32, file: &str) -> Result<String> {
    let path = process_path(pid, file);
    fs.read_to_string(&path)
        .map_err(|e| SystemInfoError::from_process_io(pid, &path, e))
}

fn read_dynamic(fs: &impl ProcFs, pid: u32) -> Result<(StatFields, StatusFields)> {
    let malformed =
        |file: &str, reason: String| SystemInfoError::malformed(process_path(pid, file), reason);

    let stat = read_process_file(fs, pid, "stat")?;
    let stat = StatFields::parse(&stat).map_err(|reason| malformed("stat", reason))?;
    let status = read_process_file(fs, pid, "status")?;
    let status = StatusFields::parse(&status).map_err(|reason| malformed("status", reason))?;
    Ok((stat, status))
}

/// NUL-separated arguments joined by spaces, trailing whitespace removed.
pub fn parse_cmdline(blob: &str) -> String {
    blob.replace('\0', " ").trim_end().to_string()
}

/// Fields of the single-line `stat` record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatFields {
    pub comm: String,
    pub ppid: u32,
    pub flags: u64,
    pub utime: u64,
    pub stime: u64,
    pub cutime: u64,
    pub cstime: u64,
    pub priority: i64,
    pub nice: i64,
    pub num_threads: u32,
}

impl StatFields {
    pub fn parse(contents: &str) -> std::result::Result<Self, String> {
        // comm may itself contain spaces and parentheses
        let open = contents.find('(').ok_or("missing command name")?;
        let close = contents.rfind(')').ok_or("missing command name")?;
        if close < open {
            return Err("unbalanced command name".to_string());
        }
        let comm = contents[open + 1..close].to_string();

        // state(0) ppid(1) pgrp(2) session(3) tty_nr(4) tpgid(5) flags(6)
        // minflt(7) cminflt(8) majflt(9) cmajflt(10) utime(11) stime(12)
        // cutime(13) cstime(14) priority(15) nice(16) num_threads(17)
        let fields: Vec<&str> = contents[close + 1..].split_whitespace().collect();
        if fields.len() < 18 {
            return Err(format!("expected at least 18 fields after comm, found {}", fields.len()));
        }

        let ticks = |i: usize| -> std::result::Result<u64, String> {
            Ok(parse_field::<i64>(&fields, i)?.max(0) as u64)
        };
        Ok(Self {
            comm,
            ppid: parse_field(&fields, 1)?,
            flags: parse_field(&fields, 6)?,
            utime: ticks(11)?,
            stime: ticks(12)?,
            cutime: ticks(13)?,
            cstime: ticks(14)?,
            priority: parse_field(&fields, 15)?,
            nice: parse_field(&fields, 16)?,
            num_threads: parse_field(&fields, 17)?,
        })
    }

    /// Scheduled ticks of the process and its waited-for children.
    pub fn total_ticks(&self) -> u64 {
        self.utime
            .saturating_add(self.stime)
            .saturating_add(self.cutime)
            .saturating_add(self.cstime)
    }
}

fn parse_field<T: FromStr>(fields: &[&str], index: usize) -> std::result::Result<T, String> {
    let token = fields
        .get(index)
        .ok_or_else(|| format!("missing field {index}"))?;
    token
        .parse()
        .map_err(|_| format!("invalid value {token:?} at field {index}"))
}

/// Fields of the multi-line `status` record. Memory sizes are in bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusFields {
    pub name: String,
    pub state: ProcessState,
    pub uid: u32,
    pub vm_size: u64,
    pub vm_rss: u64,
    pub rss_shmem: u64,
}

impl StatusFields {
    pub fn parse(contents: &str) -> std::result::Result<Self, String> {
        let mut name = None;
        let mut state = None;
        let mut uid = None;
        let mut vm_size = 0;
        let mut vm_rss = 0;
        let mut rss_shmem = 0;

        for line in contents.lines() {
            let Some((key, value)) = line.split_once(':') else {
                continue;
            };
            let value = value.trim();
            match key {
                "Name" => name = Some(value.to_string()),
                "State" => {
                    let c = value.chars().next().ok_or("empty State line")?;
                    state = Some(ProcessState::from_char(c));
                }
                "Uid" => {
                    let real = value.split_whitespace().next().ok_or("empty Uid line")?;
                    uid = Some(real.parse().map_err(|_| format!("invalid Uid {real:?}"))?);
                }
                "VmSize" => vm_size = parse_kb(key, value)?,
                "VmRSS" => vm_rss = parse_kb(key, value)?,
                "RssShmem" => rss_shmem = parse_kb(key, value)?,
                _ => {}
            }
        }

        Ok(Self {
            name: name.ok_or("missing Name line")?,
            state: state.ok_or("missing State line")?,
            uid: uid.ok_or("missing Uid line")?,
            vm_size,
            vm_rss,
            rss_shmem,
        })
    }
}

fn parse_kb(key: &str, value: &str) -> std::result::Result<u64, String> {
    let number = value
        .split_whitespace()
        .next()
        .ok_or_else(|| format!("empty {key} line"))?;
    let kb: u64 = number
        .parse()
        .map_err(|_| format!("invalid {key} value {number:?}"))?;
    kb.checked_mul(1024)
        .ok_or_else(|| format!("{key} value {number:?} out of range"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::system::mock::{MockFs, MockProcess};

    fn ctx(users: &UserTable, uptime: f64, total_memory: u64) -> ProcessContext<'_> {
        ProcessContext {
            uptime_seconds: uptime,
            total_memory,
            clock_ticks: 100,
            users,
        }
    }

    #[test]
    fn stat_parses_fixed_offsets() {
        let line = "1051 (tricky (name) x) S 1 1051 1051 0 -1 4194560 120 0 3 0 \
                    1400 70 5 5 11 22 7 0 5 100 200 0\n";
        let stat = StatFields::parse(line).unwrap();
        assert_eq!(stat.comm, "tricky (name) x");
        assert_eq!(stat.ppid, 1);
        assert_eq!(stat.flags, 4_194_560);
        assert_eq!((stat.utime, stat.stime, stat.cutime, stat.cstime), (1400, 70, 5, 5));
        assert_eq!(stat.total_ticks(), 1480);
        assert_eq!((stat.priority, stat.nice), (11, 22));
        assert_eq!(stat.num_threads, 7);
    }

    #[test]
    fn truncated_stat_is_rejected() {
        assert!(StatFields::parse("1 (init) S 0 1 1").is_err());
        assert!(StatFields::parse("no parens here").is_err());
        let garbled = "1 (init) S zero 1 1 0 -1 0 0 0 0 0 0 0 0 0 20 0 1 0\n";
        assert!(StatFields::parse(garbled).unwrap_err().contains("zero"));
    }

    #[test]
    fn status_requires_state_and_uid() {
        let ok = "Name:\tbash\nState:\tS (sleeping)\nUid:\t1000\t1000\t1000\t1000\n\
                  VmRSS:\t 5000 kB\n";
        let status = StatusFields::parse(ok).unwrap();
        assert_eq!(status.state, ProcessState::Sleeping);
        assert_eq!(status.uid, 1000);
        assert_eq!(status.vm_rss, 5000 * 1024);
        assert_eq!(status.vm_size, 0);

        assert!(StatusFields::parse("Name:\tbash\nUid:\t0\t0\t0\t0\n").is_err());
        assert!(StatusFields::parse("Name:\tbash\nState:\tR (running)\n").is_err());
    }

    #[test]
    fn cmdline_joins_arguments() {
        assert_eq!(parse_cmdline("/sbin/init\0splash\0"), "/sbin/init splash");
        assert_eq!(parse_cmdline(""), "");
    }

    #[test]
    fn discover_reads_static_and_dynamic_fields() {
        let fs = MockFs::new();
        fs.add_process(
            &MockProcess::new(1, "systemd")
                .cmdline("/sbin/init splash")
                .priority(20, 0)
                .ticks(1400, 70)
                .memory_kb(225_000, 7_779, 3_384),
        );
        let users = UserTable::parse("root:x:0:0::/root:/bin/sh\n");
        let record =
            ProcessRecord::discover(&fs, 1, &ctx(&users, 100.0, 7_779_304 * 1024)).unwrap();
        let info = record.info();

        assert_eq!(info.command, "/sbin/init splash");
        assert_eq!(info.name, "systemd");
        assert_eq!(info.user, "root");
        assert_eq!((info.priority, info.niceness), (20, 0));
        assert_eq!(info.state, ProcessState::Sleeping);
        assert_eq!(info.resident_memory, 7_779 * 1024);
        assert_eq!(info.shared_memory, 3_384 * 1024);
        assert_eq!(info.cpu_percent, 0.0);
        assert_eq!(info.memory_percent, 0.1);
        assert_eq!(info.cpu_time_seconds, 14.70);
        assert!(!info.kernel_thread);
    }

    #[test]
    fn kernel_thread_falls_back_to_short_name() {
        let fs = MockFs::new();
        fs.add_process(&MockProcess::new(4, "kworker/0:0H").kernel_thread());
        let users = UserTable::default();
        let record = ProcessRecord::discover(&fs, 4, &ctx(&users, 100.0, 1 << 30)).unwrap();
        let info = record.info();

        assert_eq!(info.command, "kworker/0:0H");
        assert!(info.kernel_thread);
        assert_eq!(info.state, ProcessState::Idle);
        assert_eq!((info.priority, info.niceness), (0, -20));
        assert_eq!(info.virtual_memory, 0);
        assert_eq!(info.memory_percent, 0.0);
        assert_eq!(info.user, "0");
    }

    #[test]
    fn update_measures_against_previous_observation() {
        let fs = MockFs::new();
        let base = MockProcess::new(1051, "worker").ticks(1000, 0);
        fs.add_process(&base);
        let users = UserTable::default();
        let mut record =
            ProcessRecord::discover(&fs, 1051, &ctx(&users, 115_230.0, 1 << 30)).unwrap();

        fs.add_process(&base.clone().ticks(1200, 0));
        record.update(&fs, &ctx(&users, 115_240.0, 1 << 30)).unwrap();
        assert_eq!(record.cpu_percent(), 20.0);

        fs.add_process(&base.clone().ticks(1400, 800));
        record.update(&fs, &ctx(&users, 115_250.0, 1 << 30)).unwrap();
        assert_eq!(record.cpu_percent(), 100.0);
    }

    #[test]
    fn child_ticks_count_towards_cpu_but_not_cpu_time() {
        let fs = MockFs::new();
        let base = MockProcess::new(300, "make").ticks(100, 0);
        fs.add_process(&base);
        let users = UserTable::default();
        let mut record = ProcessRecord::discover(&fs, 300, &ctx(&users, 10.0, 1 << 30)).unwrap();
        assert_eq!(record.info().cpu_time_seconds, 1.0);

        fs.add_process(&base.clone().child_ticks(150, 50));
        record.update(&fs, &ctx(&users, 12.0, 1 << 30)).unwrap();
        assert_eq!(record.cpu_percent(), 100.0);
        assert_eq!(record.info().cpu_time_seconds, 1.0);
    }

    #[test]
    fn memory_share_follows_injected_total() {
        let fs = MockFs::new();
        fs.add_process(&MockProcess::new(42, "cache").memory_kb(8_000, 5_000, 0));
        let users = UserTable::default();
        let mut record =
            ProcessRecord::discover(&fs, 42, &ctx(&users, 1.0, 100_000 * 1024)).unwrap();
        assert_eq!(record.memory_percent(), 5.0);

        record.update(&fs, &ctx(&users, 2.0, 50_000 * 1024)).unwrap();
        assert_eq!(record.memory_percent(), 10.0);
    }

    #[test]
    fn oversized_status_sizes_are_malformed() {
        let status = "Name:	x
State:	S (sleeping)
Uid:	0	0	0	0
                      VmRSS:	18014398509481984 kB
";
        let err = StatusFields::parse(status).unwrap_err();
        assert!(err.contains("out of range"), "{err}");
    }

    #[test]
    fn failed_update_leaves_record_untouched() {
        let fs = MockFs::new();
        fs.add_process(&MockProcess::new(7, "sh").ticks(10, 10));
        let users = UserTable::default();
        let mut record = ProcessRecord::discover(&fs, 7, &ctx(&users, 10.0, 1 << 30)).unwrap();
        let before = record.info();

        fs.insert("7/stat", "7 (sh) S 1\n");
        let err = record.update(&fs, &ctx(&users, 20.0, 1 << 30)).unwrap_err();
        assert!(matches!(err, SystemInfoError::MalformedData { .. }));
        assert_eq!(record.info(), before);
    }

    #[test]
    fn vanished_process_is_race_loss() {
        let fs = MockFs::new();
        fs.add_ghost(99);
        let users = UserTable::default();
        let err = ProcessRecord::discover(&fs, 99, &ctx(&users, 1.0, 1)).unwrap_err();
        assert!(err.is_race_loss());
    }

    #[test]
    fn memory_share_rounds_to_one_decimal() {
        assert_eq!(memory_percent(7_779, 7_779_304), 0.1);
        assert_eq!(memory_percent(1, 3), 33.3);
        assert_eq!(memory_percent(2, 3), 66.7);
        assert_eq!(memory_percent(5, 0), 0.0);
    }
}
