//! HL7 DTM date/time handling
//!
//! The DTM format is positional: `YYYY[MM[DD[HH[MM[SS[.S[S[S[S]]]]]]]]]`
//! with an optional `+/-ZZZZ` zone offset. Missing trailing parts default
//! (month and day to 1, everything else to 0). The Ack Builder stamps MSH-7
//! with the formatted current time.

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};

/// Format a UTC instant as an HL7 DTM value. Sub-second precision is only
/// emitted when nonzero.
pub fn format_hl7_datetime(instant: DateTime<Utc>) -> String {
    let mut out = instant.format("%Y%m%d%H%M%S").to_string();
    let millis = instant.timestamp_subsec_millis();
    if millis > 0 {
        // Fractions are decimal, so 50 ms must render as .050, not .50.
        out.push_str(&format!(".{millis:03}"));
    }
    out
}

/// Parse an HL7 DTM value into a UTC instant. Returns `None` for empty or
/// unparseable input; a trailing `+/-ZZZZ` (or `+/-ZZ:ZZ`) offset is
/// applied.
pub fn parse_hl7_datetime(value: &str) -> Option<DateTime<Utc>> {
    let digits: &str = value
        .split(|c| c == '+' || c == '-')
        .next()
        .unwrap_or_default();

    let year: i32 = digits.get(0..4)?.parse().ok()?;
    let month = part_or(digits, 4..6, 1);
    let day = part_or(digits, 6..8, 1);
    let hour = part_or(digits, 8..10, 0);
    let minute = part_or(digits, 10..12, 0);
    let second = part_or(digits, 12..14, 0);
    let millis = fraction_millis(digits);

    let naive = NaiveDate::from_ymd_opt(year, month, day)?
        .and_hms_milli_opt(hour, minute, second, millis)?;
    let mut instant = Utc.from_utc_datetime(&naive);
    if let Some(offset) = zone_offset_minutes(value) {
        instant = instant - Duration::minutes(offset);
    }
    Some(instant)
}

fn part_or(digits: &str, range: std::ops::Range<usize>, default: u32) -> u32 {
    digits
        .get(range)
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

fn fraction_millis(digits: &str) -> u32 {
    let Some(dot) = digits.find('.') else {
        return 0;
    };
    let frac: String = digits[dot + 1..]
        .chars()
        .take(3)
        .filter(|c| c.is_ascii_digit())
        .collect();
    if frac.is_empty() {
        return 0;
    }
    // ".5" means half a second, so right-pad to milliseconds
    format!("{frac:0<3}").parse().unwrap_or(0)
}

/// Signed offset in minutes for a trailing `+HHMM`/`-HHMM` suffix.
fn zone_offset_minutes(value: &str) -> Option<i64> {
    let pos = value.rfind(['+', '-'])?;
    if pos < 8 {
        // Too early in the string to be a zone suffix.
        return None;
    }
    let sign = if value.as_bytes()[pos] == b'-' { -1 } else { 1 };
    let rest: String = value[pos + 1..].chars().filter(|c| *c != ':').collect();
    let hours: i64 = rest.get(0..2)?.parse().ok()?;
    let minutes: i64 = rest.get(2..4).and_then(|s| s.parse().ok()).unwrap_or(0);
    Some(sign * (hours * 60 + minutes))
}
