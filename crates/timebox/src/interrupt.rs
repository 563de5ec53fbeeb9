use std::io;
use std::sync::{Arc, Mutex, MutexGuard};

use nix::sys::signal::{sigaction, SaFlags, SigAction, SigHandler, SigSet, Signal};
use tokio::signal::unix::{signal, SignalKind};
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Shared "stop everything" flag for one supervised invocation.
///
/// Triggering is idempotent and never touches a child directly: the attempt
/// that owns the child observes the flag and runs its own cleanup.
#[derive(Clone)]
pub struct Interrupt {
	tx: Arc<watch::Sender<bool>>,
}

impl Default for Interrupt {
	fn default() -> Self {
		Self::new()
	}
}

impl Interrupt {
	pub fn new() -> Self {
		let (tx, _) = watch::channel(false);
		Self { tx: Arc::new(tx) }
	}

	/// Listen for SIGINT, SIGTERM and SIGHUP until the guard is dropped.
	///
	/// Handlers are registered before this returns, so a signal arriving right
	/// afterwards is not lost. Dropping the last guard puts back whatever
	/// dispositions these signals had before the first install.
	pub fn install() -> io::Result<InterruptGuard> {
		let mut saved = dispositions();
		if saved.original.is_none() {
			saved.original = Some(current_actions()?);
		}

		let interrupt = Self::new();
		let mut sigint = signal(SignalKind::interrupt())?;
		let mut sigterm = signal(SignalKind::terminate())?;
		let mut sighup = signal(SignalKind::hangup())?;

		// tokio registers its handler only once per process. After a teardown
		// it has to be put back by hand.
		if saved.active == 0 {
			if let Some(tokio_actions) = saved.tokio {
				swap_actions(&tokio_actions)?;
			}
		}
		saved.active += 1;
		drop(saved);

		let on_signal = interrupt.clone();
		let listener = tokio::spawn(async move {
			loop {
				let name = tokio::select! {
					Some(()) = sigint.recv() => "INT",
					Some(()) = sigterm.recv() => "TERM",
					Some(()) = sighup.recv() => "HUP",
					else => return,
				};
				if on_signal.trigger() {
					tracing::info!("received SIG{}, stopping", name);
				} else {
					tracing::debug!("received SIG{} again, already stopping", name);
				}
			}
		});

		Ok(InterruptGuard {
			interrupt,
			listener,
		})
	}

	/// Returns `true` only for the call that flipped the flag.
	pub fn trigger(&self) -> bool {
		!self.tx.send_replace(true)
	}

	pub fn is_triggered(&self) -> bool {
		*self.tx.borrow()
	}

	/// Resolves once the flag is set, immediately if it already is.
	pub async fn triggered(&self) {
		let mut rx = self.tx.subscribe();
		// The sender lives in `self`, so the channel cannot close under us.
		let _ = rx.wait_for(|fired| *fired).await;
	}
}

/// Process-wide signal listener. Dropping it stops listening and, once no
/// other guard is alive, restores the previous SIGINT, SIGTERM and SIGHUP
/// dispositions.
///
/// Other `tokio::signal` streams for those signals in the same process stop
/// firing after that restore.
pub struct InterruptGuard {
	interrupt: Interrupt,
	listener: JoinHandle<()>,
}

impl InterruptGuard {
	pub fn interrupt(&self) -> &Interrupt {
		&self.interrupt
	}
}

impl Drop for InterruptGuard {
	fn drop(&mut self) {
		self.listener.abort();

		let mut saved = dispositions();
		saved.active = saved.active.saturating_sub(1);
		if saved.active > 0 {
			return;
		}
		if let Some(original) = saved.original {
			match swap_actions(&original) {
				Ok(tokio_actions) => saved.tokio = Some(tokio_actions),
				Err(e) => tracing::warn!("failed to restore signal dispositions: {}", e),
			}
		}
	}
}

const HANDLED: [Signal; 3] = [Signal::SIGINT, Signal::SIGTERM, Signal::SIGHUP];

struct Dispositions {
	active: usize,
	/// What the process had before the first install.
	original: Option<[SigAction; 3]>,
	/// tokio's handler, saved while the originals are in place.
	tokio: Option<[SigAction; 3]>,
}

static DISPOSITIONS: Mutex<Dispositions> = Mutex::new(Dispositions {
	active: 0,
	original: None,
	tokio: None,
});

fn dispositions() -> MutexGuard<'static, Dispositions> {
	DISPOSITIONS.lock().unwrap_or_else(|e| e.into_inner())
}

/// Install `actions` for the handled signals, returning the ones replaced.
fn swap_actions(actions: &[SigAction; 3]) -> nix::Result<[SigAction; 3]> {
	let mut replaced = *actions;
	for (slot, (sig, action)) in replaced.iter_mut().zip(HANDLED.iter().zip(actions)) {
		// SAFETY: every action installed here was either built by nix or read
		// back from the kernel by an earlier call.
		*slot = unsafe { sigaction(*sig, action) }?;
	}
	Ok(replaced)
}

/// nix only reads a disposition by replacing it, so swap in SIG_IGN and straight back.
fn current_actions() -> nix::Result<[SigAction; 3]> {
	let ignore = SigAction::new(SigHandler::SigIgn, SaFlags::empty(), SigSet::empty());
	let current = swap_actions(&[ignore; 3])?;
	swap_actions(&current)?;
	Ok(current)
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::time::Duration;

	#[test]
	fn trigger_is_idempotent() {
		let interrupt = Interrupt::new();
		assert!(!interrupt.is_triggered());
		assert!(interrupt.trigger());
		assert!(!interrupt.trigger());
		assert!(interrupt.is_triggered());
	}

	#[test]
	fn clones_share_state() {
		let a = Interrupt::new();
		let b = a.clone();
		b.trigger();
		assert!(a.is_triggered());
	}

	#[tokio::test]
	async fn triggered_resolves_after_trigger() {
		let interrupt = Interrupt::new();
		let waiter = interrupt.clone();
		let task = tokio::spawn(async move { waiter.triggered().await });

		tokio::time::sleep(Duration::from_millis(50)).await;
		assert!(!task.is_finished());
		interrupt.trigger();
		tokio::time::timeout(Duration::from_secs(1), task)
			.await
			.unwrap()
			.unwrap();
	}

	#[tokio::test]
	async fn triggered_resolves_when_already_set() {
		let interrupt = Interrupt::new();
		interrupt.trigger();
		tokio::time::timeout(Duration::from_millis(100), interrupt.triggered())
			.await
			.unwrap();
	}
}
