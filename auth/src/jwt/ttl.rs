use chrono::Duration;

use super::errors::JwtError;

/// Longest lifetime accepted for any token (roughly ten years).
const MAX_TTL_SECONDS: i64 = 10 * 365 * 24 * 60 * 60;

/// Parse a token lifetime such as `"15m"`, `"7d"` or `"3600"`.
///
/// Accepted units are `s`, `m`, `h`, `d` and `w`; a bare integer is read as
/// seconds.
///
/// # Errors
/// * `InvalidTtl` - Empty, non-positive, unknown unit or out of range
pub fn parse_ttl(value: &str) -> Result<Duration, JwtError> {
    let invalid = |reason: &str| JwtError::InvalidTtl {
        value: value.to_string(),
        reason: reason.to_string(),
    };

    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(invalid("empty value"));
    }

    let split = trimmed
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(trimmed.len());
    let (digits, unit) = trimmed.split_at(split);

    let amount: i64 = digits
        .parse()
        .map_err(|_| invalid("expected a whole number followed by an optional unit"))?;

    let multiplier: i64 = match unit.trim().to_ascii_lowercase().as_str() {
        "" | "s" => 1,
        "m" => 60,
        "h" => 60 * 60,
        "d" => 24 * 60 * 60,
        "w" => 7 * 24 * 60 * 60,
        _ => return Err(invalid("unknown unit")),
    };

    if amount == 0 {
        return Err(invalid("lifetime must be positive"));
    }

    let seconds = amount
        .checked_mul(multiplier)
        .filter(|seconds| *seconds <= MAX_TTL_SECONDS)
        .ok_or_else(|| invalid("lifetime too large"))?;

    Ok(Duration::seconds(seconds))
}
