//! Cooking times in whole minutes.

use once_cell::sync::Lazy;
use regex::Regex;

static ISO_DURATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^P(?:(\d+(?:\.\d+)?)D)?(?:T(?:(\d+(?:\.\d+)?)H)?(?:(\d+(?:\.\d+)?)M)?(?:(\d+(?:\.\d+)?)S)?)?$",
    )
    .unwrap()
});

static TEXT_DURATION_PART: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(\d+(?:\.\d+)?)\s*(hours?|hrs?|h|minutes?|mins?|m)\b").unwrap()
});

/// Converts an ISO-8601 duration such as `PT1H30M` to minutes.
///
/// Days and seconds are accepted too (`P1DT2H`, `PT5400S`); seconds are
/// rounded to the nearest minute. Returns `None` for anything that is not
/// a duration with at least one component.
pub fn parse_duration(token: &str) -> Option<u32> {
    let caps = ISO_DURATION.captures(token.trim())?;

    let component = |index: usize| -> Option<f64> {
        caps.get(index).and_then(|m| m.as_str().parse::<f64>().ok())
    };
    let parts = [
        (component(1), 24.0 * 60.0),
        (component(2), 60.0),
        (component(3), 1.0),
        (component(4), 1.0 / 60.0),
    ];
    if parts.iter().all(|(value, _)| value.is_none()) {
        return None;
    }

    let minutes: f64 = parts
        .iter()
        .filter_map(|(value, scale)| value.map(|v| v * scale))
        .sum();
    Some(minutes.round() as u32)
}

/// Reads a human-written time like "1 hour 30 mins" or "45 minutes".
pub fn parse_duration_text(text: &str) -> Option<u32> {
    let mut minutes = 0.0;
    let mut found = false;
    for caps in TEXT_DURATION_PART.captures_iter(text) {
        let Ok(value) = caps[1].parse::<f64>() else {
            continue;
        };
        let unit = caps[2].to_ascii_lowercase();
        minutes += if unit.starts_with('h') { value * 60.0 } else { value };
        found = true;
    }
    found.then(|| minutes.round() as u32)
}
