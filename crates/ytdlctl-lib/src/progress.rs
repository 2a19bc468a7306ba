use lazy_regex::{Lazy, Regex, lazy_regex};

static PERCENT_REGEX: Lazy<Regex> = lazy_regex!(r"(\d*\.\d+)%");

/// Extracts the download progress from a line of youtube-dl output.
///
/// Looks for the first decimal percentage (`45.3%`) and returns it as a fraction in
/// `[0, 1]`.
pub fn parse_percent(line: &str) -> Option<f64> {
    let captures = PERCENT_REGEX.captures(line)?;
    let percent: f64 = captures.get(1)?.as_str().parse().ok()?;
    Some((percent / 100.0).clamp(0.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: Option<f64>, expected: f64) {
        let actual = actual.expect("expected a percentage");
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_download_line() {
        assert_close(
            parse_percent("[download]  45.3% of 10.00MiB at  1.21MiB/s ETA 00:04"),
            0.453,
        );
    }

    #[test]
    fn test_no_percentage() {
        assert_eq!(parse_percent("no percent here"), None);
        assert_eq!(parse_percent("[youtube] abc: Downloading webpage"), None);
    }

    #[test]
    fn test_first_match_wins() {
        assert_close(parse_percent("12.5% then 99.9%"), 0.125);
    }

    #[test]
    fn test_leading_dot_and_bounds() {
        assert_close(parse_percent("at .5%"), 0.005);
        assert_close(parse_percent("[download] 100.0% of 3.2MiB"), 1.0);
        assert_close(parse_percent("[download]   0.0% of 3.2MiB"), 0.0);
    }

    #[test]
    fn test_integer_percentage_is_not_a_progress_value() {
        assert_eq!(parse_percent("[download] 100% of 3.2MiB in 00:01"), None);
    }
}
