//! Rate derivation over two consecutive readings of cumulative counters.

use serde::Serialize;

/// Previous and current reading of one sampled entity.
///
/// A freshly created pair holds the first reading in both slots, so any rate
/// derived from it is zero until a second reading arrives.
#[derive(Debug, Clone, PartialEq)]
pub struct SamplePair<T> {
    previous: T,
    current: T,
}

impl<T: Clone> SamplePair<T> {
    pub fn new(first: T) -> Self {
        Self {
            previous: first.clone(),
            current: first,
        }
    }

    /// Moves `current` into `previous` and stores `next` as current.
    pub fn push(&mut self, next: T) {
        self.previous = std::mem::replace(&mut self.current, next);
    }

    pub fn previous(&self) -> &T {
        &self.previous
    }

    pub fn current(&self) -> &T {
        &self.current
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum CounterLabel {
    Aggregate,
    Core(u32),
}

/// Tick categories of one `cpu` line, in kernel order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CounterSample {
    pub label: CounterLabel,
    pub user: u64,
    pub nice: u64,
    pub system: u64,
    pub idle: u64,
    pub iowait: u64,
    pub irq: u64,
    pub softirq: u64,
    pub steal: u64,
    pub guest: u64,
    pub guest_nice: u64,
}

pub const COUNTER_FIELDS: usize = 10;

impl CounterSample {
    pub fn from_fields(label: CounterLabel, v: [u64; COUNTER_FIELDS]) -> Self {
        Self {
            label,
            user: v[0],
            nice: v[1],
            system: v[2],
            idle: v[3],
            iowait: v[4],
            irq: v[5],
            softirq: v[6],
            steal: v[7],
            guest: v[8],
            guest_nice: v[9],
        }
    }

    pub fn idle_ticks(&self) -> u64 {
        self.idle.saturating_add(self.iowait)
    }

    /// All time the CPU accounted for. Guest time is already folded into
    /// `user` and `nice` by the kernel, so it is not added a second time.
    pub fn total_ticks(&self) -> u64 {
        [
            self.user,
            self.nice,
            self.system,
            self.idle,
            self.iowait,
            self.irq,
            self.softirq,
            self.steal,
        ]
        .iter()
        .fold(0u64, |acc, v| acc.saturating_add(*v))
    }
}

/// Busy share of the interval between two samples, in percent.
///
/// Returns `0.0` when no time elapsed or the counters went backwards, and
/// never leaves `[0, 100]`.
pub fn utilization(previous: &CounterSample, current: &CounterSample) -> f64 {
    let total_diff = current.total_ticks() as i128 - previous.total_ticks() as i128;
    if total_diff <= 0 {
        return 0.0;
    }
    let idle_diff = current.idle_ticks() as i128 - previous.idle_ticks() as i128;
    let busy = total_diff - idle_diff;
    if busy <= 0 {
        return 0.0;
    }
    (busy as f64 * 100.0 / total_diff as f64).min(100.0)
}

impl SamplePair<CounterSample> {
    pub fn utilization(&self) -> f64 {
        utilization(&self.previous, &self.current)
    }
}

/// Scheduled ticks of one process at one point of system uptime.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickReading {
    pub ticks: u64,
    pub uptime_seconds: f64,
}

impl SamplePair<TickReading> {
    /// `100 * ((tickDelta / clock_ticks) / secondsElapsed)`. May exceed 100
    /// for multi-threaded processes.
    pub fn cpu_percent(&self, clock_ticks: u64) -> f64 {
        let seconds = self.current.uptime_seconds - self.previous.uptime_seconds;
        if seconds <= 0.0 || clock_ticks == 0 {
            return 0.0;
        }
        let tick_diff = self.current.ticks.saturating_sub(self.previous.ticks);
        100.0 * ((tick_diff as f64 / clock_ticks as f64) / seconds)
    }
}
