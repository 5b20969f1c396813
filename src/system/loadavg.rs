use std::path::Path;

use serde::Serialize;

use super::error::{Result, SystemInfoError};
use super::procfs::ProcFs;

const LOADAVG: &str = "loadavg";

/// Run-queue length averaged over 1, 5 and 15 minutes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct LoadAverage {
    pub one: f64,
    pub five: f64,
    pub fifteen: f64,
}

impl LoadAverage {
    pub fn parse(contents: &str) -> std::result::Result<Self, String> {
        let mut tokens = contents.split_whitespace();
        let mut next = |label: &str| -> std::result::Result<f64, String> {
            let token = tokens
                .next()
                .ok_or_else(|| format!("missing {label} load average"))?;
            token
                .parse()
                .map_err(|_| format!("invalid {label} load average {token:?}"))
        };
        Ok(Self {
            one: next("1-minute")?,
            five: next("5-minute")?,
            fifteen: next("15-minute")?,
        })
    }

    pub fn as_tuple(&self) -> (f64, f64, f64) {
        (self.one, self.five, self.fifteen)
    }

    /// `"0.63 0.41 0.77"`; whole numbers keep one decimal (`"4.0"`).
    pub fn as_string(&self) -> String {
        format!("{:?} {:?} {:?}", self.one, self.five, self.fifteen)
    }
}

#[derive(Debug, Clone, Default)]
pub struct LoadAverageSampler {
    current: LoadAverage,
}

impl LoadAverageSampler {
    pub fn new(fs: &impl ProcFs) -> Result<Self> {
        let mut sampler = Self::default();
        sampler.refresh(fs)?;
        Ok(sampler)
    }

    pub fn refresh(&mut self, fs: &impl ProcFs) -> Result<()> {
        let path = Path::new(LOADAVG);
        let contents = fs
            .read_to_string(path)
            .map_err(|e| SystemInfoError::unavailable(path, e))?;
        self.current = LoadAverage::parse(&contents)
            .map_err(|reason| SystemInfoError::malformed(path, reason))?;
        Ok(())
    }

    pub fn load_average(&self) -> LoadAverage {
        self.current
    }
}
