use std::io;

use super::{DEFAULT_CLOCK_TICKS, PlatformExtensions};

pub struct Platform;

impl PlatformExtensions for Platform {
    fn clock_ticks_per_second() -> u64 {
        DEFAULT_CLOCK_TICKS
    }

    fn is_process_gone(err: &io::Error) -> bool {
        err.kind() == io::ErrorKind::NotFound
    }
}
