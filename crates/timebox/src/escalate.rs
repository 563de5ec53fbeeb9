use std::time::Duration;

use crate::process::ProcessHandle;
use crate::signal::{signal_name, Signal};

/// Send `signal`, then SIGKILL if the child outlives `kill_after`.
///
/// With no `kill_after` this returns right after delivery and the caller owns
/// the wait. Otherwise, on return the child has exited or SIGKILL was sent.
/// SIGKILL is never sent before the full grace period has passed.
pub async fn escalate(handle: &mut ProcessHandle, signal: Signal, kill_after: Option<Duration>) {
	tracing::info!(
		"sending {} to {} (pid {})",
		signal_name(signal),
		handle.program(),
		handle.pid()
	);

	if let Err(e) = deliver(handle, signal) {
		tracing::warn!("failed to send {} to pid {}: {}", signal_name(signal), handle.pid(), e);
		kill_now(handle);
		return;
	}

	let Some(grace) = kill_after else {
		return;
	};

	match tokio::time::timeout(grace, handle.wait()).await {
		Ok(Ok(status)) => {
			tracing::debug!("pid {} exited within grace period ({})", handle.pid(), status);
		}
		Ok(Err(e)) => {
			tracing::warn!("error waiting for pid {}: {}", handle.pid(), e);
			kill_now(handle);
		}
		Err(_) => {
			tracing::info!(
				"pid {} still running {}s after {}, sending KILL",
				handle.pid(),
				grace.as_secs(),
				signal_name(signal)
			);
			kill_now(handle);
		}
	}
}

fn deliver(handle: &ProcessHandle, signal: Signal) -> nix::Result<()> {
	handle.signal(signal)?;
	// A stopped child cannot act on the signal until it is continued.
	if signal != Signal::SIGKILL && signal != Signal::SIGCONT {
		handle.signal(Signal::SIGCONT)?;
	}
	Ok(())
}

fn kill_now(handle: &ProcessHandle) {
	if let Err(e) = handle.force_kill() {
		tracing::warn!("failed to kill pid {}: {}", handle.pid(), e);
	}
}
