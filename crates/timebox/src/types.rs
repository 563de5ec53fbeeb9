use std::time::{Duration, Instant};

use crate::error::{exit_codes, SpawnError};
use crate::signal::Signal;

/// Everything one supervised invocation needs. Read-only once built.
#[derive(Debug, Clone)]
pub struct SupervisorConfig {
	/// Deadline per attempt. Zero disables the deadline.
	pub timeout_secs: u64,
	pub signal: Signal,
	/// Grace period between `signal` and SIGKILL. `None` never sends SIGKILL.
	pub kill_after_secs: Option<u64>,
	/// Additional attempts after the first failure.
	pub retry_count: u32,
	pub retry_interval_secs: u64,
	pub verbose: bool,
	pub command: Vec<String>,
}

impl SupervisorConfig {
	pub fn new(timeout_secs: u64, command: Vec<String>) -> Self {
		Self {
			timeout_secs,
			signal: Signal::SIGTERM,
			kill_after_secs: None,
			retry_count: 0,
			retry_interval_secs: 1,
			verbose: false,
			command,
		}
	}

	pub fn deadline(&self) -> Option<Duration> {
		match self.timeout_secs {
			0 => None,
			secs => Some(Duration::from_secs(secs)),
		}
	}

	pub fn kill_after(&self) -> Option<Duration> {
		self.kill_after_secs.map(Duration::from_secs)
	}

	pub fn retry_interval(&self) -> Duration {
		Duration::from_secs(self.retry_interval_secs)
	}
}

/// How a single attempt ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
	/// The child exited on its own. Death by signal `n` is reported as `128 + n`.
	Completed(i32),
	TimedOut,
	Interrupted,
	SpawnFailed(SpawnError),
	/// Waiting on the child failed, so its state is unknown. Never retried.
	WaitFailed(String),
}

impl Outcome {
	pub fn exit_code(&self) -> i32 {
		match self {
			Outcome::Completed(code) => *code,
			Outcome::TimedOut => exit_codes::TIMED_OUT,
			Outcome::Interrupted => exit_codes::INTERRUPTED,
			Outcome::SpawnFailed(e) => e.exit_code(),
			Outcome::WaitFailed(_) => exit_codes::USAGE,
		}
	}

	pub fn is_success(&self) -> bool {
		matches!(self, Outcome::Completed(0))
	}

	/// Only a child that ran and failed on its own is worth another attempt.
	pub fn is_retryable(&self) -> bool {
		matches!(self, Outcome::Completed(code) if *code != 0)
	}
}

#[derive(Debug, Clone)]
pub struct Attempt {
	pub index: u32,
	pub started_at: Instant,
	pub outcome: Outcome,
}

/// Result of a whole supervised invocation.
#[derive(Debug, Clone)]
pub struct Report {
	pub outcome: Outcome,
	/// Attempts actually started, spawn failures included.
	pub attempts: u32,
	pub elapsed: Duration,
}

impl Report {
	pub fn exit_code(&self) -> i32 {
		self.outcome.exit_code()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::error::SpawnKind;

	#[test]
	fn outcome_exit_codes() {
		assert_eq!(Outcome::Completed(0).exit_code(), 0);
		assert_eq!(Outcome::Completed(3).exit_code(), 3);
		assert_eq!(Outcome::TimedOut.exit_code(), 124);
		assert_eq!(Outcome::Interrupted.exit_code(), 130);
		let missing = SpawnError {
			kind: SpawnKind::NotFound,
			program: "nope".into(),
			reason: "No such file or directory".into(),
		};
		assert_eq!(Outcome::SpawnFailed(missing).exit_code(), 127);
	}

	#[test]
	fn only_child_failures_retry() {
		assert!(Outcome::Completed(1).is_retryable());
		assert!(!Outcome::Completed(0).is_retryable());
		assert!(!Outcome::TimedOut.is_retryable());
		assert!(!Outcome::Interrupted.is_retryable());
	}

	#[test]
	fn wait_failure_is_terminal() {
		let lost = Outcome::WaitFailed("No child processes (os error 10)".into());
		assert!(!lost.is_retryable());
		assert!(!lost.is_success());
		assert_eq!(lost.exit_code(), 125);
	}

	#[test]
	fn zero_timeout_disables_deadline() {
		let cfg = SupervisorConfig::new(0, vec!["true".into()]);
		assert_eq!(cfg.deadline(), None);
		let cfg = SupervisorConfig::new(3, vec!["true".into()]);
		assert_eq!(cfg.deadline(), Some(Duration::from_secs(3)));
	}
}
