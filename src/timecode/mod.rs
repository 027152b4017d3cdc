//! Timestamp normalization and rendering.
//!
//! Human timestamp notations ("3:00", "3m0s", "180", "00:03:00") are reduced
//! to a canonical count of seconds since the start of the media, and canonical
//! seconds are rendered back to the `HH:MM:SS.fff` form that ffmpeg accepts
//! as a seek position.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::errors::{AppError, AppResult};

pub mod burst;
pub mod url;

/// Pulls seconds out of the captures of one grammar form. Returns `None`
/// only if a captured group fails numeric conversion, which sends the
/// dispatcher on to the next form.
type Extractor = fn(&Captures) -> Option<f64>;

/// The accepted timestamp grammar, in priority order. The first pattern that
/// matches the whole trimmed input wins, so earlier forms shadow later ones.
/// In particular the bare-decimal form also matches every dotted
/// minute.second string, so "9.40" is 9.4 seconds, never 9m40s.
static FORMS: Lazy<Vec<(Regex, Extractor)>> = Lazy::new(|| {
    vec![
        // 3:00 / 00:03:00 / 1:02:03.5
        (
            Regex::new(r"^(?:(\d{1,2}):)?(\d{1,2}):(\d{1,2}(?:\.\d+)?)$").unwrap(),
            clock as Extractor,
        ),
        // 3m0s / 3 min 0 seconds
        (
            Regex::new(r"(?i)^(\d+)\s*m(?:in)?\s*(\d+(?:\.\d+)?)\s*s(?:ec(?:onds?)?)?$").unwrap(),
            minutes_seconds,
        ),
        // 180s / 8.5s
        (
            Regex::new(r"(?i)^(\d+(?:\.\d+)?)\s*s$").unwrap(),
            bare_seconds,
        ),
        // 180 / 180.5
        (Regex::new(r"^(\d+(?:\.\d+)?)$").unwrap(), bare_seconds),
        // 9.40 as 9m40s. Unreachable: the bare-decimal form above matches
        // every such string first. Kept so the grammar table documents the
        // full notation set.
        (Regex::new(r"^(\d+)\.(\d{1,2})$").unwrap(), dotted_minutes),
    ]
});

fn clock(caps: &Captures) -> Option<f64> {
    let hours: f64 = match caps.get(1) {
        Some(h) => h.as_str().parse().ok()?,
        None => 0.0,
    };
    let minutes: f64 = caps[2].parse().ok()?;
    let seconds: f64 = caps[3].parse().ok()?;
    Some(hours * 3600.0 + minutes * 60.0 + seconds)
}

fn minutes_seconds(caps: &Captures) -> Option<f64> {
    let minutes: f64 = caps[1].parse().ok()?;
    let seconds: f64 = caps[2].parse().ok()?;
    Some(minutes * 60.0 + seconds)
}

fn bare_seconds(caps: &Captures) -> Option<f64> {
    caps[1].parse().ok()
}

fn dotted_minutes(caps: &Captures) -> Option<f64> {
    let minutes: f64 = caps[1].parse().ok()?;
    let seconds: f64 = caps[2].parse().ok()?;
    Some(minutes * 60.0 + seconds)
}

/// Parse a textual timestamp into canonical seconds.
///
/// The whole string must match one of the accepted forms; surrounding
/// whitespace is ignored. An explicit timestamp that matches nothing is a
/// deliberate user instruction gone wrong, so it fails rather than
/// defaulting.
pub fn parse_timestamp(text: &str) -> AppResult<f64> {
    let trimmed = text.trim();
    for (pattern, extract) in FORMS.iter() {
        if let Some(caps) = pattern.captures(trimmed) {
            if let Some(seconds) = extract(&caps) {
                return Ok(seconds);
            }
        }
    }
    Err(AppError::InvalidTimestamp(text.to_string()))
}

/// Render canonical seconds as `HH:MM:SS.fff`, with the trailing zeros of
/// the fraction stripped ("00:03:00", "00:09:40.5"). Minutes and seconds are
/// zero-padded to two digits; hours widen as needed.
pub fn render_timestamp(seconds: f64) -> String {
    let whole = seconds.floor();
    let hours = (whole / 3600.0) as u64;
    let minutes = ((whole % 3600.0) / 60.0) as u64;
    let secs = seconds % 60.0;
    format!("{hours:02}:{minutes:02}:{secs:06.3}")
        .trim_end_matches('0')
        .trim_end_matches('.')
        .to_string()
}

/// Base-time resolution: an explicit start timestamp always wins, then a
/// time embedded in the URL, then the start of the video. A malformed
/// explicit timestamp aborts; a malformed URL time never does.
pub fn resolve_base_time(start: Option<&str>, video_url: &str) -> AppResult<f64> {
    match start {
        Some(text) => parse_timestamp(text),
        None => Ok(url::extract_time_from_url(video_url).unwrap_or(0.0)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_parses(text: &str, expected: f64) {
        let parsed = parse_timestamp(text).unwrap();
        assert!(
            (parsed - expected).abs() < 1e-6,
            "{:?} parsed to {}, expected {}",
            text,
            parsed,
            expected
        );
    }

    #[test]
    fn test_clock_forms() {
        assert_parses("3:00", 180.0);
        assert_parses("00:03:00", 180.0);
        assert_parses("1:02:03", 3723.0);
        assert_parses("00:09:40.5", 580.5);
        assert_parses("  3:00  ", 180.0);
    }

    #[test]
    fn test_minute_second_forms() {
        assert_parses("3m0s", 180.0);
        assert_parses("3 min 0 seconds", 180.0);
        assert_parses("3 Min 0 Sec", 180.0);
        assert_parses("9m40.5s", 580.5);
    }

    #[test]
    fn test_bare_second_forms() {
        assert_parses("180", 180.0);
        assert_parses("180s", 180.0);
        assert_parses("180.5", 180.5);
        assert_parses("8S", 8.0);
    }

    #[test]
    fn test_bare_decimal_wins_over_dotted_shorthand() {
        // "9.40" could read as 9m40s, but the bare-decimal form is checked
        // first and takes it as plain seconds.
        assert_parses("9.40", 9.4);
        assert_parses("9.4", 9.4);
    }

    #[test]
    fn test_rejects_garbage() {
        for text in ["not a time", "", "3:", "5.", "1:2:3:4", "12px", "m40s"] {
            match parse_timestamp(text) {
                Err(AppError::InvalidTimestamp(got)) => assert_eq!(got, text),
                other => panic!("{:?} should not parse, got {:?}", text, other),
            }
        }
    }

    #[test]
    fn test_render_timestamp() {
        assert_eq!(render_timestamp(180.0), "00:03:00");
        assert_eq!(render_timestamp(9.0 * 60.0 + 40.5), "00:09:40.5");
        assert_eq!(render_timestamp(0.0), "00:00:00");
        assert_eq!(render_timestamp(3723.25), "01:02:03.25");
        assert_eq!(render_timestamp(580.1), "00:09:40.1");
    }

    #[test]
    fn test_render_reparse_round_trip() {
        for seconds in [0.0, 0.1, 9.4, 180.0, 580.9, 3723.456, 86400.0] {
            let rendered = render_timestamp(seconds);
            let reparsed = parse_timestamp(&rendered).unwrap();
            assert!(
                (reparsed - seconds).abs() < 1e-3,
                "{} rendered to {:?} which reparsed to {}",
                seconds,
                rendered,
                reparsed
            );
        }
    }

    #[test]
    fn test_explicit_start_wins_over_url_time() {
        let url = "https://www.youtube.com/watch?v=abc&t=8s";
        let base = resolve_base_time(Some("3:00"), url).unwrap();
        assert_eq!(base, 180.0);
    }

    #[test]
    fn test_url_time_used_without_explicit_start() {
        let url = "https://www.youtube.com/watch?v=abc&t=8s";
        assert_eq!(resolve_base_time(None, url).unwrap(), 8.0);
    }

    #[test]
    fn test_base_defaults_to_zero() {
        assert_eq!(
            resolve_base_time(None, "https://www.youtube.com/watch?v=abc").unwrap(),
            0.0
        );
    }

    #[test]
    fn test_invalid_explicit_start_aborts() {
        let url = "https://www.youtube.com/watch?v=abc&t=8s";
        assert!(matches!(
            resolve_base_time(Some("bogus"), url),
            Err(AppError::InvalidTimestamp(_))
        ));
    }
}
