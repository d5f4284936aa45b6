//! Human-readable durations such as `1h 5m 30s` or `2mo 3d`.

use chrono::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Unit {
    Year,
    Month,
    Day,
    Hour,
    Minute,
    Second,
}

impl Unit {
    const ALL: [Unit; 6] = [
        Unit::Year,
        Unit::Month,
        Unit::Day,
        Unit::Hour,
        Unit::Minute,
        Unit::Second,
    ];

    fn millis(self) -> i64 {
        const SECOND: i64 = 1000;
        const DAY: i64 = 86_400 * SECOND;
        match self {
            Unit::Year => 365 * DAY,
            Unit::Month => 30 * DAY,
            Unit::Day => DAY,
            Unit::Hour => 3600 * SECOND,
            Unit::Minute => 60 * SECOND,
            Unit::Second => SECOND,
        }
    }

    fn suffix(self) -> &'static str {
        match self {
            Unit::Year => "y",
            Unit::Month => "mo",
            Unit::Day => "d",
            Unit::Hour => "h",
            Unit::Minute => "m",
            Unit::Second => "s",
        }
    }
}

const CALENDAR_UNITS: [Unit; 3] = [Unit::Year, Unit::Month, Unit::Day];

/// The largest non-zero unit is always shown. Smaller units follow only
/// while they appear in `multiples`. Negative input renders as zero.
fn render(duration: Duration, multiples: &[Unit]) -> String {
    let mut remaining = duration.num_milliseconds().max(0);
    let mut parts: Vec<String> = Vec::new();

    for unit in Unit::ALL {
        if !parts.is_empty() && !multiples.contains(&unit) {
            break;
        }
        let count = remaining / unit.millis();
        if count == 0 {
            continue;
        }
        remaining -= count * unit.millis();
        parts.push(format!("{}{}", count, unit.suffix()));
        if !multiples.contains(&unit) {
            break;
        }
    }

    if parts.is_empty() {
        "0s".to_string()
    } else {
        parts.join(" ")
    }
}

/// Length of a game, every unit down to seconds.
pub fn format_game_duration(duration: Duration) -> String {
    render(duration, &Unit::ALL)
}

/// Time elapsed on a calendar scale: years, months and days combine,
/// anything under a day shows its single largest unit.
pub fn format_elapsed(duration: Duration) -> String {
    render(duration, &CALENDAR_UNITS)
}
