use chrono::{DateTime, Utc};

use crate::model::parse_published;

/// Render a published date as a short relative label such as `3h ago`.
///
/// Each unit is rounded from the previous one (seconds, minutes, hours,
/// days) and the first bucket that matches wins. Missing or unparsable
/// dates render as the empty string. Future dates are not special-cased.
///
/// Rounding happens per unit, so 90 seconds is 1.5 minutes and reads `2m ago`.
pub fn time_ago(published: Option<&str>, now: DateTime<Utc>) -> String {
    let Some(date) = published.and_then(parse_published) else {
        return String::new();
    };

    let millis = (now - date).num_milliseconds() as f64;
    let seconds = (millis / 1000.0).round();
    let minutes = (seconds / 60.0).round();
    let hours = (minutes / 60.0).round();
    let days = (hours / 24.0).round();

    if days > 365.0 {
        format!("{}y ago", whole(days / 365.25))
    } else if days > 30.0 {
        format!("{}mo ago", whole(days / 30.44))
    } else if days > 0.0 {
        format!("{}d ago", whole(days))
    } else if hours > 0.0 {
        format!("{}h ago", whole(hours))
    } else if minutes > 0.0 {
        format!("{}m ago", whole(minutes))
    } else {
        format!("{}s ago", whole(seconds))
    }
}

fn whole(value: f64) -> i64 {
    value.round() as i64
}
