//! Rational timebase arithmetic.
//!
//! A timebase is written `1/N`: one tick lasts `1/N` seconds, so `N` ticks
//! make a second. Parsing is lenient: anything that does not yield a
//! positive, finite tick rate falls back to [`DEFAULT_TIMEBASE`].

/// Ticks per second used when a chapter carries no usable timebase.
pub const DEFAULT_TIMEBASE: f64 = 1000.0;

/// Textual form of [`DEFAULT_TIMEBASE`].
pub const DEFAULT_TIMEBASE_STR: &str = "1/1000";

/// Returns the number of ticks per second described by `timebase`.
///
/// Accepts `1/N`, a general `a/b` (yielding `b / a`), or a bare number.
/// Never fails.
pub fn parse_timebase(timebase: &str) -> f64 {
    let timebase = timebase.trim();

    let rate = match timebase.split_once('/') {
        Some((num, den)) => match (num.trim().parse::<f64>(), den.trim().parse::<f64>()) {
            (Ok(num), Ok(den)) if num != 0.0 => Some(den / num),
            _ => None,
        },
        None => timebase.parse::<f64>().ok(),
    };

    match rate {
        Some(rate) if rate.is_finite() && rate > 0.0 => rate,
        _ => {
            tracing::trace!(timebase, "Falling back to default timebase");
            DEFAULT_TIMEBASE
        }
    }
}

/// Renders `ticks` as seconds with exactly three decimals.
///
/// Zero ticks render as the literal `"0"`.
pub fn ticks_to_seconds(ticks: i64, timebase: f64) -> String {
    if ticks == 0 {
        return "0".to_string();
    }
    format!("{:.3}", ticks as f64 / timebase)
}

/// Converts seconds to whole ticks of `timebase`, rounded to the nearest tick.
pub fn seconds_to_ticks(seconds: f64, timebase: f64) -> i64 {
    (seconds * timebase).round() as i64
}
