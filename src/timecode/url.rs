//! Embedded start-time extraction from video URLs.

use once_cell::sync::Lazy;
use regex::Regex;

/// `3m0s`, `180s`, `8s`, `180`: optional minutes prefix, optional unit
/// suffix on the seconds.
static PARAM_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(?:(\d+)m)?(\d+(?:\.\d+)?)s?$").unwrap());

/// Pull an embedded start time out of a `t` or `start` query parameter,
/// `t` preferred.
///
/// Returns `None` when the parameter is missing or malformed, or when the
/// URL has no recognizable query string at all. Absence is not an error:
/// the caller just falls through to the next base-time source, so a broken
/// URL never aborts the program here.
pub fn extract_time_from_url(url: &str) -> Option<f64> {
    let (_, query) = url.split_once('?')?;
    let query = query.split('#').next().unwrap_or(query);

    let mut t_param = None;
    let mut start_param = None;
    for pair in query.split('&') {
        match pair.split_once('=') {
            Some(("t", value)) if t_param.is_none() => t_param = Some(value),
            Some(("start", value)) if start_param.is_none() => start_param = Some(value),
            _ => {}
        }
    }

    let raw = t_param.or(start_param)?.trim();
    if let Some(caps) = PARAM_RE.captures(raw) {
        let minutes: f64 = match caps.get(1) {
            Some(m) => m.as_str().parse().ok()?,
            None => 0.0,
        };
        let seconds: f64 = caps[2].parse().ok()?;
        return Some(minutes * 60.0 + seconds);
    }
    raw.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v >= 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_unit_suffixed_time() {
        assert_eq!(
            extract_time_from_url("https://x/watch?v=1&t=8s"),
            Some(8.0)
        );
        assert_eq!(
            extract_time_from_url("https://x/watch?t=3m0s&v=1"),
            Some(180.0)
        );
        assert_eq!(
            extract_time_from_url("https://x/watch?v=1&t=180s"),
            Some(180.0)
        );
    }

    #[test]
    fn test_extracts_plain_numbers() {
        assert_eq!(
            extract_time_from_url("https://x/watch?v=1&t=180"),
            Some(180.0)
        );
        assert_eq!(
            extract_time_from_url("https://x/watch?v=1&start=42.5"),
            Some(42.5)
        );
    }

    #[test]
    fn test_t_preferred_over_start() {
        assert_eq!(
            extract_time_from_url("https://x/watch?start=30&t=8s"),
            Some(8.0)
        );
    }

    #[test]
    fn test_absent_parameter() {
        assert_eq!(extract_time_from_url("https://x/watch?v=1"), None);
        assert_eq!(extract_time_from_url("https://x/watch"), None);
    }

    #[test]
    fn test_malformed_never_raises() {
        assert_eq!(extract_time_from_url("not a url"), None);
        assert_eq!(extract_time_from_url("https://x/watch?v=1&t=abc"), None);
        assert_eq!(extract_time_from_url("https://x/watch?v=1&t="), None);
        assert_eq!(extract_time_from_url("https://x/watch?v=1&t=-5"), None);
        assert_eq!(extract_time_from_url(""), None);
    }

    #[test]
    fn test_fragment_ignored() {
        assert_eq!(
            extract_time_from_url("https://x/watch?v=1&t=8s#comments"),
            Some(8.0)
        );
    }
}
