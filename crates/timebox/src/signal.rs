use std::str::FromStr;

pub use nix::sys::signal::Signal;

use crate::error::UsageError;

/// Parse a signal spec the way `kill(1)` does: `TERM`, `SIGTERM`, `term` or `15`.
pub fn parse_signal(input: &str) -> Result<Signal, UsageError> {
	let invalid = || UsageError::InvalidSignal(input.to_string());
	let s = input.trim();
	if s.is_empty() {
		return Err(invalid());
	}

	if s.bytes().all(|b| b.is_ascii_digit()) {
		let num: i32 = s.parse().map_err(|_| invalid())?;
		return Signal::try_from(num).map_err(|_| invalid());
	}

	let upper = s.to_ascii_uppercase();
	let name = if upper.starts_with("SIG") {
		upper
	} else {
		format!("SIG{}", upper)
	};
	Signal::from_str(&name).map_err(|_| invalid())
}

/// Short name without the `SIG` prefix, e.g. `TERM`.
pub fn signal_name(signal: Signal) -> &'static str {
	let full = signal.as_str();
	full.strip_prefix("SIG").unwrap_or(full)
}
