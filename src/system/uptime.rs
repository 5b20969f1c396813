use std::path::Path;

use super::error::{Result, SystemInfoError};
use super::procfs::ProcFs;

const UPTIME: &str = "uptime";

/// Time since boot, including time spent in suspend.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct UptimeSampler {
    precise: f64,
}

impl UptimeSampler {
    pub fn new(fs: &impl ProcFs) -> Result<Self> {
        let mut sampler = Self::default();
        sampler.refresh(fs)?;
        Ok(sampler)
    }

    pub fn refresh(&mut self, fs: &impl ProcFs) -> Result<()> {
        let path = Path::new(UPTIME);
        let contents = fs
            .read_to_string(path)
            .map_err(|e| SystemInfoError::unavailable(path, e))?;
        self.precise =
            parse_uptime(&contents).map_err(|reason| SystemInfoError::malformed(path, reason))?;
        Ok(())
    }

    /// Whole seconds since boot.
    pub fn seconds(&self) -> u64 {
        self.precise as u64
    }

    /// Seconds since boot with the fractional part kept, used as the time
    /// base for per-process CPU rates.
    pub fn precise_seconds(&self) -> f64 {
        self.precise
    }

    pub fn as_string(&self) -> String {
        crate::format::format_uptime(self.seconds())
    }
}

pub fn parse_uptime(contents: &str) -> std::result::Result<f64, String> {
    let token = contents
        .split_whitespace()
        .next()
        .ok_or_else(|| "empty uptime source".to_string())?;
    let value: f64 = token
        .parse()
        .map_err(|_| format!("invalid uptime value {token:?}"))?;
    if !value.is_finite() || value < 0.0 {
        return Err(format!("invalid uptime value {token:?}"));
    }
    Ok(value)
}
