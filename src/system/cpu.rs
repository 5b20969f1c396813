use std::collections::BTreeMap;
use std::path::Path;

use super::error::{Result, SystemInfoError};
use super::procfs::ProcFs;
use super::rate::{COUNTER_FIELDS, CounterLabel, CounterSample, SamplePair};

const STAT: &str = "stat";

/// One parsed read of the global tick source.
#[derive(Debug, Clone)]
pub struct CpuReading {
    pub aggregate: Option<CounterSample>,
    pub cores: BTreeMap<u32, CounterSample>,
}

/// Per-core tick counters with the previous and current reading retained.
#[derive(Debug, Clone)]
pub struct CpuSampler {
    aggregate: Option<SamplePair<CounterSample>>,
    cores: BTreeMap<u32, SamplePair<CounterSample>>,
}

impl CpuSampler {
    /// Takes the first reading; every core starts at 0% until `refresh`.
    pub fn new(fs: &impl ProcFs) -> Result<Self> {
        let reading = read_cpu_stat(fs)?;
        Ok(Self {
            aggregate: reading.aggregate.map(SamplePair::new),
            cores: reading
                .cores
                .into_iter()
                .map(|(index, sample)| (index, SamplePair::new(sample)))
                .collect(),
        })
    }

    /// Reads a new sample for every core. Nothing is modified on error.
    pub fn refresh(&mut self, fs: &impl ProcFs) -> Result<()> {
        let reading = read_cpu_stat(fs)?;
        self.apply(reading)
    }

    pub fn apply(&mut self, reading: CpuReading) -> Result<()> {
        if !reading.cores.keys().eq(self.cores.keys()) {
            return Err(SystemInfoError::CoreCountChanged {
                expected: self.cores.keys().copied().collect(),
                found: reading.cores.keys().copied().collect(),
            });
        }

        for (index, sample) in reading.cores {
            if let Some(pair) = self.cores.get_mut(&index) {
                pair.push(sample);
            }
        }
        match (&mut self.aggregate, reading.aggregate) {
            (Some(pair), Some(sample)) => pair.push(sample),
            (slot, sample) => *slot = sample.map(SamplePair::new),
        }
        Ok(())
    }

    /// Utilization per core, ordered by kernel core index.
    pub fn utilization(&self) -> Vec<f64> {
        self.cores.values().map(SamplePair::utilization).collect()
    }

    /// Utilization of the aggregate `cpu` line, or the core average when the
    /// kernel did not report one.
    pub fn total_utilization(&self) -> f64 {
        match &self.aggregate {
            Some(pair) => pair.utilization(),
            None if self.cores.is_empty() => 0.0,
            None => self.utilization().iter().sum::<f64>() / self.cores.len() as f64,
        }
    }

    pub fn core_count(&self) -> usize {
        self.cores.len()
    }
}

pub fn read_cpu_stat(fs: &impl ProcFs) -> Result<CpuReading> {
    let path = Path::new(STAT);
    let contents = fs
        .read_to_string(path)
        .map_err(|e| SystemInfoError::unavailable(path, e))?;
    parse_cpu_stat(&contents).map_err(|reason| SystemInfoError::malformed(path, reason))
}

pub fn parse_cpu_stat(contents: &str) -> std::result::Result<CpuReading, String> {
    let mut aggregate = None;
    let mut cores = BTreeMap::new();

    for line in contents.lines() {
        let mut tokens = line.split_whitespace();
        let Some(name) = tokens.next() else {
            continue;
        };
        let Some(suffix) = name.strip_prefix("cpu") else {
            continue;
        };

        let label = if suffix.is_empty() {
            CounterLabel::Aggregate
        } else {
            let index = suffix
                .parse::<u32>()
                .map_err(|_| format!("unexpected cpu label {name:?}"))?;
            CounterLabel::Core(index)
        };

        let mut values = [0u64; COUNTER_FIELDS];
        for (slot, value) in values.iter_mut().enumerate() {
            let token = tokens
                .next()
                .ok_or_else(|| format!("{name}: expected {COUNTER_FIELDS} fields, found {slot}"))?;
            *value = token
                .parse()
                .map_err(|_| format!("{name}: invalid tick value {token:?}"))?;
        }

        let sample = CounterSample::from_fields(label, values);
        match label {
            CounterLabel::Aggregate => aggregate = Some(sample),
            CounterLabel::Core(index) => {
                if cores.insert(index, sample).is_some() {
                    return Err(format!("duplicate line for {name}"));
                }
            }
        }
    }

    if cores.is_empty() {
        return Err("no per-core cpu lines".to_string());
    }
    Ok(CpuReading { aggregate, cores })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::system::mock::{MockFs, stat_text};

    const BASE: [u64; 10] = [4705, 150, 1120, 16250, 520, 0, 2, 0, 0, 0];

    fn busy_by(base: [u64; 10], busy: u64, idle: u64) -> [u64; 10] {
        let mut next = base;
        next[0] += busy;
        next[3] += idle;
        next
    }

    #[test]
    fn new_sampler_reports_zero_for_every_core() {
        let fs = MockFs::new();
        fs.set_stat(&stat_text(&[BASE; 4]));
        let cpu = CpuSampler::new(&fs).unwrap();
        assert_eq!(cpu.utilization(), vec![0.0; 4]);
        assert_eq!(cpu.total_utilization(), 0.0);
    }

    #[test]
    fn many_core_system_is_ordered_by_index() {
        let fs = MockFs::new();
        let cores: Vec<[u64; 10]> = (0..32).map(|i| busy_by(BASE, i, 0)).collect();
        fs.set_stat(&stat_text(&cores));
        let mut cpu = CpuSampler::new(&fs).unwrap();
        assert_eq!(cpu.core_count(), 32);

        let next: Vec<[u64; 10]> = (0..32)
            .map(|i| busy_by(cores[i], i as u64, 100 - i as u64))
            .collect();
        fs.set_stat(&stat_text(&next));
        cpu.refresh(&fs).unwrap();
        let usage = cpu.utilization();
        assert_eq!(usage[0], 0.0);
        assert_eq!(usage[25], 25.0);
        assert_eq!(usage[31], 31.0);
    }

    #[test]
    fn refresh_computes_per_core_usage() {
        let fs = MockFs::new();
        fs.set_stat(&stat_text(&[BASE, BASE]));
        let mut cpu = CpuSampler::new(&fs).unwrap();

        fs.set_stat(&stat_text(&[busy_by(BASE, 750, 250), busy_by(BASE, 500, 500)]));
        cpu.refresh(&fs).unwrap();
        assert_eq!(cpu.utilization(), vec![75.0, 50.0]);
        assert_eq!(cpu.total_utilization(), 62.5);
    }

    #[test]
    fn unchanged_source_yields_zero_after_refresh() {
        let fs = MockFs::new();
        fs.set_stat(&stat_text(&[BASE, BASE]));
        let mut cpu = CpuSampler::new(&fs).unwrap();
        fs.set_stat(&stat_text(&[busy_by(BASE, 10, 10), busy_by(BASE, 10, 10)]));
        cpu.refresh(&fs).unwrap();
        cpu.refresh(&fs).unwrap();
        assert_eq!(cpu.utilization(), vec![0.0, 0.0]);
    }

    #[test]
    fn core_set_change_fails_loudly() {
        let fs = MockFs::new();
        fs.set_stat(&stat_text(&[BASE; 4]));
        let mut cpu = CpuSampler::new(&fs).unwrap();

        fs.set_stat(&stat_text(&[BASE; 3]));
        let err = cpu.refresh(&fs).unwrap_err();
        match err {
            SystemInfoError::CoreCountChanged { expected, found } => {
                assert_eq!(expected, vec![0, 1, 2, 3]);
                assert_eq!(found, vec![0, 1, 2]);
            }
            other => panic!("expected CoreCountChanged, got {other:?}"),
        }
        assert_eq!(cpu.core_count(), 4);
    }

    #[test]
    fn renumbered_core_with_same_count_is_reported() {
        let fs = MockFs::new();
        fs.set_stat(&stat_text(&[BASE; 2]));
        let mut cpu = CpuSampler::new(&fs).unwrap();

        let row = |label: &str| format!("{label} 1 2 3 4 5 6 7 8 9 10\n");
        fs.set_stat(&format!("{}{}{}", row("cpu "), row("cpu0"), row("cpu2")));
        let err = cpu.refresh(&fs).unwrap_err();
        assert_eq!(
            err.to_string(),
            "cpu core set changed (expected cores [0, 1], found [0, 2])"
        );
    }

    #[test]
    fn missing_core_lines_are_malformed() {
        let fs = MockFs::new();
        fs.set_stat("cpu  1 2 3 4 5 6 7 8 9 10\nintr 0\n");
        let err = CpuSampler::new(&fs).unwrap_err();
        assert!(matches!(err, SystemInfoError::MalformedData { .. }));
    }

    #[test]
    fn short_or_garbled_rows_are_malformed() {
        assert!(parse_cpu_stat("cpu0 1 2 3 4 5 6 7\n").is_err());
        assert!(parse_cpu_stat("cpu0 1 2 3 x 5 6 7 8 9 10\n").is_err());
        assert!(parse_cpu_stat("cpuX 1 2 3 4 5 6 7 8 9 10\n").is_err());
    }

    #[test]
    fn unreadable_source_is_unavailable() {
        let fs = MockFs::new();
        let err = CpuSampler::new(&fs).unwrap_err();
        assert!(matches!(err, SystemInfoError::SourceUnavailable { .. }));
    }

    #[test]
    fn extra_trailing_fields_are_ignored() {
        let reading = parse_cpu_stat("cpu0 1 2 3 4 5 6 7 8 9 10 11\n").unwrap();
        assert_eq!(reading.cores[&0].guest_nice, 10);
        assert!(reading.aggregate.is_none());
    }
}
