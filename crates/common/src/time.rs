//! Unix-time helpers and a small relative-time formatter.

/// Current unix time in seconds.
pub fn unix_now() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as i64
}

const UNITS: &[(i64, &str)] = &[
    (365 * 86_400, "year"),
    (30 * 86_400, "month"),
    (7 * 86_400, "week"),
    (86_400, "day"),
    (3_600, "hour"),
    (60, "minute"),
];

/// Human relative time between `when` and `now` (unix seconds):
/// "3 days ago", "moments ago", "2 weeks from now".
pub fn relative(when: i64, now: i64) -> String {
    let delta = now - when;
    let (magnitude, suffix) = if delta >= 0 {
        (delta, "ago")
    } else {
        (-delta, "from now")
    };

    for &(secs, name) in UNITS {
        if magnitude >= secs {
            let count = magnitude / secs;
            let plural = if count == 1 { "" } else { "s" };
            return format!("{count} {name}{plural} {suffix}");
        }
    }
    format!("moments {suffix}")
}
