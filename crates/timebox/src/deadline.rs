use std::io;
use std::process::ExitStatus;
use std::time::Duration;

use crate::escalate::escalate;
use crate::interrupt::Interrupt;
use crate::process::{self, ProcessHandle};
use crate::signal::Signal;
use crate::types::Outcome;

/// What the attempt is racing on.
pub struct AttemptSpec<'a> {
	pub command: &'a [String],
	pub deadline: Option<Duration>,
	pub signal: Signal,
	pub kill_after: Option<Duration>,
}

const SETTLE: Duration = Duration::from_millis(500);

enum Race {
	Exited(io::Result<ExitStatus>),
	Deadline,
	Interrupted,
}

/// Run the command once, racing its exit against the deadline and `interrupt`.
///
/// The losing side of the race is simply dropped. Only the escalator signals
/// the child, and only after the deadline or an interrupt.
pub async fn run_attempt(spec: &AttemptSpec<'_>, interrupt: &Interrupt) -> Outcome {
	if interrupt.is_triggered() {
		return Outcome::Interrupted;
	}

	let mut handle = match ProcessHandle::spawn(spec.command) {
		Ok(h) => h,
		Err(e) => {
			tracing::debug!("{}", e);
			return Outcome::SpawnFailed(e);
		}
	};

	let race = {
		let timer = async {
			match spec.deadline {
				Some(d) => tokio::time::sleep(d).await,
				None => std::future::pending::<()>().await,
			}
		};
		tokio::select! {
			biased;
			_ = interrupt.triggered() => Race::Interrupted,
			status = handle.wait() => Race::Exited(status),
			_ = timer => Race::Deadline,
		}
	};

	match race {
		Race::Exited(Ok(status)) => {
			let code = process::exit_code(status);
			tracing::debug!("{} (pid {}) exited with {}", handle.program(), handle.pid(), code);
			if interrupt.is_triggered() {
				return Outcome::Interrupted;
			}
			Outcome::Completed(code)
		}
		Race::Exited(Err(e)) => {
			tracing::warn!("error waiting for pid {}: {}", handle.pid(), e);
			if let Err(e) = handle.force_kill() {
				tracing::warn!("failed to kill pid {}: {}", handle.pid(), e);
			}
			Outcome::WaitFailed(e.to_string())
		}
		Race::Deadline => {
			tracing::info!(
				"{} (pid {}) exceeded {}s deadline",
				handle.program(),
				handle.pid(),
				spec.deadline.map(|d| d.as_secs()).unwrap_or(0)
			);
			escalate(&mut handle, spec.signal, spec.kill_after).await;
			let interrupted = tokio::select! {
				biased;
				_ = interrupt.triggered() => true,
				_ = handle.wait() => interrupt.is_triggered(),
			};
			if interrupted {
				settle(&mut handle).await;
				Outcome::Interrupted
			} else {
				Outcome::TimedOut
			}
		}
		Race::Interrupted => {
			tracing::info!("interrupted, stopping {} (pid {})", handle.program(), handle.pid());
			escalate(&mut handle, spec.signal, spec.kill_after).await;
			settle(&mut handle).await;
			Outcome::Interrupted
		}
	}
}

/// Give a signalled child a moment to exit so it gets reaped. One that
/// ignores the signal and has no kill-after is left running.
async fn settle(handle: &mut ProcessHandle) {
	if tokio::time::timeout(SETTLE, handle.wait()).await.is_err() {
		tracing::warn!(
			"{} (pid {}) still running after signal, leaving it behind",
			handle.program(),
			handle.pid()
		);
	}
}
