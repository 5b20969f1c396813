use std::collections::{HashMap, HashSet};
use std::path::Path;

use tracing::{debug, warn};

use super::error::{Result, SystemInfoError};
use super::process::{ProcessContext, ProcessRecord};
use super::procfs::ProcFs;

/// Pids that appeared and disappeared during one refresh.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistryDelta {
    pub added: Vec<u32>,
    pub removed: Vec<u32>,
}

/// The live process set, one record per pid, diffed against the previous
/// cycle on every refresh.
#[derive(Debug, Default)]
pub struct ProcessRegistry {
    records: HashMap<u32, ProcessRecord>,
}

impl ProcessRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn refresh(&mut self, fs: &impl ProcFs, ctx: &ProcessContext<'_>) -> Result<RegistryDelta> {
        let _span = tracing::debug_span!("registry.refresh").entered();

        let listed = fs
            .list_pids()
            .map_err(|e| SystemInfoError::unavailable(Path::new(""), e))?;
        let live: HashSet<u32> = listed.into_iter().collect();

        let mut delta = RegistryDelta::default();
        self.records.retain(|pid, _| {
            let keep = live.contains(pid);
            if !keep {
                delta.removed.push(*pid);
            }
            keep
        });

        let mut vanished = Vec::new();
        for record in self.records.values_mut() {
            match record.update(fs, ctx) {
                Ok(()) => {}
                Err(e) if e.is_race_loss() => vanished.push(record.pid()),
                Err(e) => warn!(pid = record.pid(), error = %e, "keeping stale process values"),
            }
        }
        for pid in vanished {
            self.records.remove(&pid);
            delta.removed.push(pid);
        }

        for &pid in &live {
            if self.records.contains_key(&pid) {
                continue;
            }
            match ProcessRecord::discover(fs, pid, ctx) {
                Ok(record) => {
                    self.records.insert(pid, record);
                    delta.added.push(pid);
                }
                Err(e) if e.is_race_loss() => {}
                Err(e) => warn!(pid, error = %e, "skipping process this cycle"),
            }
        }

        debug!(
            tracked = self.records.len(),
            added = delta.added.len(),
            removed = delta.removed.len(),
            "process registry refreshed"
        );
        Ok(delta)
    }

    /// Records in no particular order.
    pub fn processes(&self) -> impl Iterator<Item = &ProcessRecord> {
        self.records.values()
    }

    pub fn get(&self, pid: u32) -> Option<&ProcessRecord> {
        self.records.get(&pid)
    }

    pub fn pids(&self) -> HashSet<u32> {
        self.records.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
