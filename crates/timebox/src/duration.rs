use crate::error::UsageError;

/// Parse a whole-second duration: `"30"`, `"30s"`, `"5m"`, `"2h"`, `"1d"`.
///
/// Fractions are rejected since timeouts have one-second resolution.
pub fn parse_duration(input: &str) -> Result<u64, UsageError> {
	let invalid = || UsageError::InvalidDuration(input.to_string());
	let s = input.trim();

	let (digits, multiplier) = match s.char_indices().last() {
		Some((idx, 's')) => (&s[..idx], 1),
		Some((idx, 'm')) => (&s[..idx], 60),
		Some((idx, 'h')) => (&s[..idx], 60 * 60),
		Some((idx, 'd')) => (&s[..idx], 24 * 60 * 60),
		Some((_, c)) if c.is_ascii_digit() => (s, 1),
		_ => return Err(invalid()),
	};

	if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
		return Err(invalid());
	}

	let value: u64 = digits.parse().map_err(|_| invalid())?;
	value.checked_mul(multiplier).ok_or_else(invalid)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn plain_seconds() {
		assert_eq!(parse_duration("0"), Ok(0));
		assert_eq!(parse_duration("42"), Ok(42));
		assert_eq!(parse_duration(" 7 "), Ok(7));
	}

	#[test]
	fn suffixes() {
		assert_eq!(parse_duration("10s"), Ok(10));
		assert_eq!(parse_duration("5m"), Ok(300));
		assert_eq!(parse_duration("2h"), Ok(7200));
		assert_eq!(parse_duration("1d"), Ok(86400));
	}

	#[test]
	fn rejects_garbage() {
		for bad in ["", "s", "m", "abc", "5x", "1.5", "1.5s", "-3", "+3", "5 m", "10ms"] {
			assert_eq!(
				parse_duration(bad),
				Err(UsageError::InvalidDuration(bad.to_string())),
				"input {:?}",
				bad
			);
		}
	}

	#[test]
	fn rejects_overflow() {
		assert!(parse_duration("99999999999999999999").is_err());
		assert!(parse_duration("999999999999999999d").is_err());
	}
}
