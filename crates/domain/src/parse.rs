//! Lenient parsing of the free-text numbers entered for sets.
//!
//! A field that is blank is absent (`None`). A field that contains anything is present, and its
//! value is the longest numeric prefix, or zero if there is none. Malformed input never fails.
//! Only `.` separates decimals, so `"62,5"` is 62, as it has always been stored.

/// Bare durations up to this value are read as seconds, larger ones as minutes.
pub const BARE_SECONDS_LIMIT: f32 = 300.0;

#[must_use]
pub fn reps(value: &str) -> Option<u32> {
    let value = value.trim();

    if value.is_empty() {
        return None;
    }

    let digits = value.strip_prefix('+').unwrap_or(value);
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());

    Some(digits[..end].parse::<u32>().unwrap_or(0))
}

#[must_use]
pub fn decimal(value: &str) -> Option<f32> {
    let value = value.trim();

    if value.is_empty() {
        return None;
    }

    Some(decimal_prefix(value).unwrap_or(0.0))
}

/// Normalize a cardio duration to minutes.
///
/// - `m:s` is minutes and seconds
/// - `h:m:s` is hours, minutes and seconds
/// - a bare number is seconds if it is at most [`BARE_SECONDS_LIMIT`], minutes otherwise
#[must_use]
pub fn duration_minutes(value: &str) -> Option<f32> {
    let value = value.trim();

    if value.is_empty() {
        return None;
    }

    if value.contains(':') {
        let parts = value
            .split(':')
            .map(|p| decimal(p).unwrap_or(0.0))
            .collect::<Vec<_>>();
        return Some(match parts[..] {
            [m, s] => m + s / 60.0,
            [h, m, s] => h * 60.0 + m + s / 60.0,
            _ => 0.0,
        });
    }

    let number = decimal(value).unwrap_or(0.0);

    if number <= BARE_SECONDS_LIMIT {
        Some(number / 60.0)
    } else {
        Some(number)
    }
}

fn decimal_prefix(value: &str) -> Option<f32> {
    let bytes = value.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }

    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut has_digits = end > int_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        if frac_end > frac_start {
            has_digits = true;
            end = frac_end;
        } else if has_digits {
            end += 1;
        }
    }

    if !has_digits {
        return None;
    }

    value[..end].parse::<f32>().ok()
}
