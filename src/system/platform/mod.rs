use std::io;

/// Fallback used when the platform cannot report its scheduler tick rate.
pub const DEFAULT_CLOCK_TICKS: u64 = 100;

pub trait PlatformExtensions {
    fn clock_ticks_per_second() -> u64;
    fn is_process_gone(err: &io::Error) -> bool;
}

#[cfg(target_os = "linux")]
mod linux;
#[cfg(not(target_os = "linux"))]
mod fallback;

#[cfg(not(target_os = "linux"))]
use fallback as platform_impl;
#[cfg(target_os = "linux")]
use linux as platform_impl;

pub fn clock_ticks_per_second() -> u64 {
    platform_impl::Platform::clock_ticks_per_second()
}

pub fn is_process_gone(err: &io::Error) -> bool {
    platform_impl::Platform::is_process_gone(err)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_ticks_is_positive() {
        assert!(clock_ticks_per_second() > 0);
    }

    #[test]
    fn not_found_counts_as_gone() {
        let err = io::Error::new(io::ErrorKind::NotFound, "missing");
        assert!(is_process_gone(&err));
    }
}
