use std::time::{Duration, Instant};

use crate::deadline::{run_attempt, AttemptSpec};
use crate::interrupt::Interrupt;
use crate::types::{Attempt, Outcome, Report, SupervisorConfig};

/// Run `config.command` up to `retry_count + 1` times.
///
/// Only a child that exits non-zero on its own is retried. Success, timeouts,
/// spawn failures and interrupts all end the loop at once.
pub async fn supervise(config: &SupervisorConfig, interrupt: &Interrupt) -> Report {
	let started = Instant::now();
	let spec = AttemptSpec {
		command: &config.command,
		deadline: config.deadline(),
		signal: config.signal,
		kill_after: config.kill_after(),
	};

	let mut index = 0;
	loop {
		if interrupt.is_triggered() {
			return finish(Outcome::Interrupted, index, started);
		}

		let attempt = Attempt {
			index,
			started_at: Instant::now(),
			outcome: run_attempt(&spec, interrupt).await,
		};
		let attempts = index + 1;
		tracing::debug!(
			"attempt {} finished after {:?}: {:?}",
			attempts,
			attempt.started_at.elapsed(),
			attempt.outcome
		);

		if !attempt.outcome.is_retryable() || index == config.retry_count {
			return finish(attempt.outcome, attempts, started);
		}

		index += 1;
		let notice = retry_notice(
			index,
			config.retry_count,
			config.retry_interval_secs,
			&attempt.outcome,
		);
		if config.verbose {
			eprintln!("{}", notice);
		} else {
			tracing::debug!("{}", notice);
		}

		if !pause(config.retry_interval(), interrupt).await {
			return finish(Outcome::Interrupted, attempts, started);
		}
	}
}

/// The line verbose mode prints before attempt `retry + 1`.
pub fn retry_notice(retry: u32, budget: u32, interval_secs: u64, previous: &Outcome) -> String {
	format!(
		"[timebox] retry {}/{} in {}s (previous attempt exited with {})",
		retry,
		budget,
		interval_secs,
		previous.exit_code()
	)
}

/// Sleep between attempts. Returns `false` if interrupted.
async fn pause(interval: Duration, interrupt: &Interrupt) -> bool {
	tokio::select! {
		biased;
		_ = interrupt.triggered() => false,
		_ = tokio::time::sleep(interval) => true,
	}
}

fn finish(outcome: Outcome, attempts: u32, started: Instant) -> Report {
	Report {
		outcome,
		attempts,
		elapsed: started.elapsed(),
	}
}
