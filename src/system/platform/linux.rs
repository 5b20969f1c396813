use std::io;

use super::{DEFAULT_CLOCK_TICKS, PlatformExtensions};

pub struct Platform;

impl PlatformExtensions for Platform {
    fn clock_ticks_per_second() -> u64 {
        // sysconf returns -1 when the value is indeterminate
        let ticks = unsafe { libc::sysconf(libc::_SC_CLK_TCK) };
        if ticks > 0 {
            ticks as u64
        } else {
            DEFAULT_CLOCK_TICKS
        }
    }

    fn is_process_gone(err: &io::Error) -> bool {
        // Reading a file of a reaped task yields ESRCH rather than ENOENT.
        err.kind() == io::ErrorKind::NotFound || err.raw_os_error() == Some(libc::ESRCH)
    }
}
