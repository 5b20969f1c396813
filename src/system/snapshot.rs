use serde::Serialize;

use super::loadavg::LoadAverage;
use super::memory::MemorySnapshot;
use super::process::{ProcessInfo, ProcessState};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TaskCounts {
    pub total: usize,
    pub running: usize,
    pub kernel_threads: usize,
    pub threads: u64,
}

impl TaskCounts {
    pub fn from_processes(processes: &[ProcessInfo]) -> Self {
        processes.iter().fold(Self::default(), |mut counts, p| {
            counts.total += 1;
            if p.state == ProcessState::Running {
                counts.running += 1;
            }
            if p.kernel_thread {
                counts.kernel_threads += 1;
            }
            counts.threads += u64::from(p.num_threads);
            counts
        })
    }
}

/// Everything one refresh cycle produced. Published behind an `Arc` and
/// never mutated afterwards.
#[derive(Debug, Clone, Default, Serialize)]
pub struct EngineSnapshot {
    pub generation: u64,
    pub cpu_total: f64,
    pub cpu_cores: Vec<f64>,
    pub memory: MemorySnapshot,
    pub memory_used: i64,
    pub swap_used: i64,
    pub load: LoadAverage,
    pub load_text: String,
    pub uptime_seconds: u64,
    pub uptime_text: String,
    pub tasks: TaskCounts,
    pub processes: Vec<ProcessInfo>,
}

impl EngineSnapshot {
    pub fn process(&self, pid: u32) -> Option<&ProcessInfo> {
        self.processes.iter().find(|p| p.pid == pid)
    }

    pub fn memory_total(&self) -> u64 {
        self.memory.total
    }

    pub fn swap_total(&self) -> u64 {
        self.memory.swap_total
    }
}
