use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const SECONDS_PER_DAY: u64 = 86_400;

pub fn truncate_unicode(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }
    let mut result = String::new();
    let mut width = 0;
    for ch in s.chars() {
        let ch_width = ch.width().unwrap_or(0);
        if width + ch_width > max_width.saturating_sub(1) {
            result.push('\u{2026}');
            break;
        }
        result.push(ch);
        width += ch_width;
    }
    result
}

/// Compact size of a kilobyte count: plain below 100 MiB, then whole
/// mebibytes (`136M`), then whole gibibytes (`112G`). Never rounds up.
pub fn format_kib(kb: u64) -> String {
    const MIB: u64 = 1024;
    const GIB: u64 = 1024 * 1024;

    if kb < 100 * MIB {
        format!("{kb}")
    } else if kb < GIB {
        format!("{}M", kb / MIB)
    } else {
        format!("{}G", kb / GIB)
    }
}

pub fn format_bytes(bytes: u64) -> String {
    format_kib(bytes / 1024)
}

/// Signed variant for derived figures that may go negative on inconsistent
/// kernel data.
pub fn format_bytes_signed(bytes: i64) -> String {
    if bytes < 0 {
        format!("-{}", format_bytes(bytes.unsigned_abs()))
    } else {
        format_bytes(bytes as u64)
    }
}

/// `"8 days, 8:28:56"`, `"1 day, 0:00:00"` or `"3:04:05"`.
pub fn format_uptime(seconds: u64) -> String {
    let days = seconds / SECONDS_PER_DAY;
    let rest = seconds % SECONDS_PER_DAY;
    let clock = format!("{}:{:02}:{:02}", rest / 3600, (rest % 3600) / 60, rest % 60);
    match days {
        0 => clock,
        1 => format!("1 day, {clock}"),
        n => format!("{n} days, {clock}"),
    }
}

/// Scheduled CPU time: `"0:14.70"` under an hour, `"1h02:03"` above.
pub fn format_cpu_time(seconds: f64) -> String {
    let centis = (seconds.max(0.0) * 100.0).round() as u64;
    let hours = centis / 360_000;
    let minutes = centis % 360_000 / 6_000;
    let secs = centis % 6_000;
    if hours > 0 {
        format!("{hours}h{minutes:02}:{:02}", secs / 100)
    } else {
        format!("{minutes}:{:02}.{:02}", secs / 100, secs % 100)
    }
}
