use std::fmt::Display;
use std::str::FromStr;

/// Parses free-form numeric input the forgiving way.
///
/// Blank input means the option is switched off and yields `None`. Input that does
/// not parse is not an error: it degrades to `default` and a warning is logged.
pub fn parse_lenient<T>(field: &str, text: &str, default: T) -> Option<T>
where
    T: FromStr + Display + Copy,
{
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }

    match trimmed.parse::<T>() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!(
                field,
                input = trimmed,
                "Could not parse numeric value, falling back to {}",
                default
            );
            Some(default)
        }
    }
}

pub const DEFAULT_MALFORMED_RETRIES: i32 = 0;
pub const DEFAULT_MALFORMED_SOCKET_TIMEOUT: u32 = 0;
pub const DEFAULT_MALFORMED_RATE_LIMIT: f64 = 0.0;
pub const DEFAULT_MALFORMED_CUSTOM_AUDIO_QUALITY: u32 = 0;
