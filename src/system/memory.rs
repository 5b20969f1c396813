use std::path::Path;

use serde::Serialize;

use super::error::{Result, SystemInfoError};
use super::procfs::ProcFs;

const MEMINFO: &str = "meminfo";

const REQUIRED_FIELDS: [&str; 8] = [
    "MemTotal",
    "MemFree",
    "Buffers",
    "Cached",
    "SReclaimable",
    "Shmem",
    "SwapTotal",
    "SwapFree",
];

/// Raw memory accounting fields, in bytes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MemorySnapshot {
    pub total: u64,
    pub free: u64,
    pub buffers: u64,
    pub cached: u64,
    pub reclaimable: u64,
    pub shared: u64,
    pub swap_total: u64,
    pub swap_free: u64,
}

impl MemorySnapshot {
    /// `total - free - buffers - cached - reclaimable + shared`. Negative
    /// results are returned as is.
    pub fn used_memory(&self) -> i64 {
        let used = i128::from(self.total)
            - i128::from(self.free)
            - i128::from(self.buffers)
            - i128::from(self.cached)
            - i128::from(self.reclaimable)
            + i128::from(self.shared);
        clamp_i64(used)
    }

    pub fn used_swap(&self) -> i64 {
        clamp_i64(i128::from(self.swap_total) - i128::from(self.swap_free))
    }

    pub fn parse(contents: &str) -> std::result::Result<Self, String> {
        let mut values: [Option<u64>; 8] = [None; 8];

        for line in contents.lines() {
            let mut tokens = line.split_whitespace();
            let Some(field) = tokens.next() else {
                continue;
            };
            let name = field.strip_suffix(':').unwrap_or(field);
            let Some(slot) = REQUIRED_FIELDS.iter().position(|f| *f == name) else {
                continue;
            };

            let value = tokens
                .next()
                .ok_or_else(|| format!("{name}: missing value"))?;
            let value: u64 = value
                .parse()
                .map_err(|_| format!("{name}: invalid value {value:?}"))?;
            let multiplier = unit_multiplier(tokens.next())
                .ok_or_else(|| format!("{name}: unknown unit in {line:?}"))?;
            let bytes = value
                .checked_mul(multiplier)
                .ok_or_else(|| format!("{name}: value {value} out of range"))?;
            values[slot] = Some(bytes);
        }

        let field =
            |i: usize| values[i].ok_or_else(|| format!("missing field {}", REQUIRED_FIELDS[i]));
        Ok(Self {
            total: field(0)?,
            free: field(1)?,
            buffers: field(2)?,
            cached: field(3)?,
            reclaimable: field(4)?,
            shared: field(5)?,
            swap_total: field(6)?,
            swap_free: field(7)?,
        })
    }
}

/// Bytes per unit. A bare number is in kilobytes.
fn unit_multiplier(unit: Option<&str>) -> Option<u64> {
    match unit {
        None => Some(1024),
        Some(u) => match u.to_ascii_lowercase().as_str() {
            "b" => Some(1),
            "kb" => Some(1024),
            "mb" => Some(1024 * 1024),
            "gb" => Some(1024 * 1024 * 1024),
            _ => None,
        },
    }
}

/// Physical and swap memory usage derived from a single read.
#[derive(Debug, Clone, Default)]
pub struct MemorySampler {
    snapshot: MemorySnapshot,
}

impl MemorySampler {
    pub fn new(fs: &impl ProcFs) -> Result<Self> {
        let mut sampler = Self::default();
        sampler.refresh(fs)?;
        Ok(sampler)
    }

    /// Replaces the snapshot; on error the previous values stay in place.
    pub fn refresh(&mut self, fs: &impl ProcFs) -> Result<()> {
        let path = Path::new(MEMINFO);
        let contents = fs
            .read_to_string(path)
            .map_err(|e| SystemInfoError::unavailable(path, e))?;
        self.snapshot = MemorySnapshot::parse(&contents)
            .map_err(|reason| SystemInfoError::malformed(path, reason))?;
        Ok(())
    }

    pub fn snapshot(&self) -> &MemorySnapshot {
        &self.snapshot
    }

    pub fn total_memory(&self) -> u64 {
        self.snapshot.total
    }

    pub fn used_memory(&self) -> i64 {
        self.snapshot.used_memory()
    }

    pub fn total_swap(&self) -> u64 {
        self.snapshot.swap_total
    }

    pub fn used_swap(&self) -> i64 {
        self.snapshot.used_swap()
    }
}

fn clamp_i64(value: i128) -> i64 {
    value.clamp(i128::from(i64::MIN), i128::from(i64::MAX)) as i64
}
