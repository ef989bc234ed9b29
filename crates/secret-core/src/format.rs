//! Human-readable sizes and durations for summaries.

/// Format a byte count as `B`, `KB` or `MB` with one decimal.
pub fn format_size(bytes: u64) -> String {
    const KIB: u64 = 1024;
    const MIB: u64 = 1024 * 1024;

    if bytes < KIB {
        format!("{bytes} B")
    } else if bytes < MIB {
        format!("{:.1} KB", bytes as f64 / KIB as f64)
    } else {
        format!("{:.1} MB", bytes as f64 / MIB as f64)
    }
}

/// Format a duration in seconds using the largest whole unit.
pub fn format_expiration(seconds: u64) -> String {
    fn unit(n: u64, name: &str) -> String {
        if n == 1 { format!("{n} {name}") } else { format!("{n} {name}s") }
    }

    if seconds < 60 {
        return unit(seconds, "second");
    }
    let minutes = seconds / 60;
    if minutes < 60 {
        return unit(minutes, "minute");
    }
    let hours = minutes / 60;
    if hours < 24 {
        return unit(hours, "hour");
    }
    let days = hours / 24;
    if days < 7 {
        return unit(days, "day");
    }
    let weeks = days / 7;
    if weeks < 4 {
        return unit(weeks, "week");
    }
    unit(days / 30, "month")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sizes() {
        assert_eq!(format_size(0), "0 B");
        assert_eq!(format_size(1023), "1023 B");
        assert_eq!(format_size(1536), "1.5 KB");
        assert_eq!(format_size(5 * 1024 * 1024), "5.0 MB");
    }

    #[test]
    fn expirations() {
        assert_eq!(format_expiration(1), "1 second");
        assert_eq!(format_expiration(120), "2 minutes");
        assert_eq!(format_expiration(3600), "1 hour");
        assert_eq!(format_expiration(86_400), "1 day");
        assert_eq!(format_expiration(604_800), "1 week");
        assert_eq!(format_expiration(60 * 86_400), "2 months");
    }
}
