use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info};

use super::cpu::CpuSampler;
use super::error::Result;
use super::loadavg::LoadAverageSampler;
use super::memory::MemorySampler;
use super::platform;
use super::process::{ProcessContext, ProcessInfo};
use super::procfs::{ProcFs, RealFs};
use super::registry::ProcessRegistry;
use super::snapshot::{EngineSnapshot, TaskCounts};
use super::uptime::UptimeSampler;
use super::users::UserTable;

/// Owns one of each sampler and the process registry, refreshes them in a
/// fixed order and publishes the result as an immutable snapshot.
pub struct MetricsEngine<F: ProcFs> {
    fs: F,
    users: UserTable,
    clock_ticks: u64,
    load: LoadAverageSampler,
    uptime: UptimeSampler,
    cpu: CpuSampler,
    memory: MemorySampler,
    registry: ProcessRegistry,
    generation: u64,
    snapshot: Arc<EngineSnapshot>,
}

impl MetricsEngine<RealFs> {
    pub fn open(proc_root: &Path, passwd: &Path) -> Result<Self> {
        Self::new(RealFs::new(proc_root), UserTable::load(passwd))
    }
}

impl<F: ProcFs> MetricsEngine<F> {
    pub fn new(fs: F, users: UserTable) -> Result<Self> {
        Self::with_clock_ticks(fs, users, platform::clock_ticks_per_second())
    }

    /// Takes the first sample of every source. All rates in the first
    /// snapshot are zero.
    pub fn with_clock_ticks(fs: F, users: UserTable, clock_ticks: u64) -> Result<Self> {
        let load = LoadAverageSampler::new(&fs)?;
        let uptime = UptimeSampler::new(&fs)?;
        let cpu = CpuSampler::new(&fs)?;
        let memory = MemorySampler::new(&fs)?;
        let mut registry = ProcessRegistry::new();
        registry.refresh(
            &fs,
            &ProcessContext {
                uptime_seconds: uptime.precise_seconds(),
                total_memory: memory.total_memory(),
                clock_ticks,
                users: &users,
            },
        )?;

        info!(
            cores = cpu.core_count(),
            processes = registry.len(),
            clock_ticks,
            "metrics engine initialized"
        );

        let mut engine = Self {
            fs,
            users,
            clock_ticks,
            load,
            uptime,
            cpu,
            memory,
            registry,
            generation: 0,
            snapshot: Arc::default(),
        };
        engine.snapshot = Arc::new(engine.build_snapshot());
        Ok(engine)
    }

    /// Runs one sampling cycle. On failure the previously published
    /// snapshot stays current and the first error is returned.
    pub fn refresh(&mut self) -> Result<Arc<EngineSnapshot>> {
        let _span =
            tracing::debug_span!("engine.refresh", generation = self.generation + 1).entered();

        self.load.refresh(&self.fs)?;
        self.uptime.refresh(&self.fs)?;
        self.cpu.refresh(&self.fs)?;
        self.memory.refresh(&self.fs)?;
        let delta = self.registry.refresh(
            &self.fs,
            &ProcessContext {
                uptime_seconds: self.uptime.precise_seconds(),
                total_memory: self.memory.total_memory(),
                clock_ticks: self.clock_ticks,
                users: &self.users,
            },
        )?;

        self.generation += 1;
        self.snapshot = Arc::new(self.build_snapshot());
        debug!(
            generation = self.generation,
            added = delta.added.len(),
            removed = delta.removed.len(),
            "snapshot published"
        );
        Ok(Arc::clone(&self.snapshot))
    }

    pub fn snapshot(&self) -> Arc<EngineSnapshot> {
        Arc::clone(&self.snapshot)
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    fn build_snapshot(&self) -> EngineSnapshot {
        let mut processes: Vec<ProcessInfo> = self.registry.processes().map(|p| p.info()).collect();
        processes.sort_unstable_by_key(|p| p.pid);
        let load = self.load.load_average();
        EngineSnapshot {
            generation: self.generation,
            cpu_total: self.cpu.total_utilization(),
            cpu_cores: self.cpu.utilization(),
            memory: *self.memory.snapshot(),
            memory_used: self.memory.used_memory(),
            swap_used: self.memory.used_swap(),
            load,
            load_text: load.as_string(),
            uptime_seconds: self.uptime.seconds(),
            uptime_text: self.uptime.as_string(),
            tasks: TaskCounts::from_processes(&processes),
            processes,
        }
    }
}
