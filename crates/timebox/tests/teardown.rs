// Changes process-wide signal dispositions, so it lives in its own test binary.

use std::time::Duration;

use nix::sys::signal::{raise, sigaction, SaFlags, SigAction, SigHandler, SigSet, Signal};
use timebox::Interrupt;

fn ignore() -> SigAction {
	SigAction::new(SigHandler::SigIgn, SaFlags::empty(), SigSet::empty())
}

fn disposition(sig: Signal) -> SigHandler {
	let current = unsafe { sigaction(sig, &ignore()) }.unwrap();
	unsafe { sigaction(sig, &current) }.unwrap();
	current.handler()
}

#[tokio::test]
async fn guard_teardown_restores_previous_dispositions() {
	// Start with SIGTERM ignored so a restored disposition can't kill the test.
	unsafe { sigaction(Signal::SIGTERM, &ignore()) }.unwrap();
	let sigint_before = disposition(Signal::SIGINT);

	let guard = Interrupt::install().unwrap();
	assert!(matches!(disposition(Signal::SIGTERM), SigHandler::SigAction(_) | SigHandler::Handler(_)));
	drop(guard);

	assert_eq!(disposition(Signal::SIGTERM), SigHandler::SigIgn);
	assert_eq!(disposition(Signal::SIGINT), sigint_before);

	// Still ignored, not swallowed by a leftover listener.
	raise(Signal::SIGTERM).unwrap();
	tokio::time::sleep(Duration::from_millis(100)).await;

	// Installing again listens again.
	let guard = Interrupt::install().unwrap();
	let interrupt = guard.interrupt().clone();
	raise(Signal::SIGTERM).unwrap();
	tokio::time::timeout(Duration::from_secs(1), interrupt.triggered())
		.await
		.unwrap();
	drop(guard);
	assert_eq!(disposition(Signal::SIGTERM), SigHandler::SigIgn);

	// Overlapping guards restore only when the last one goes.
	let outer = Interrupt::install().unwrap();
	let inner = Interrupt::install().unwrap();
	drop(inner);
	assert_ne!(disposition(Signal::SIGTERM), SigHandler::SigIgn);
	drop(outer);
	assert_eq!(disposition(Signal::SIGTERM), SigHandler::SigIgn);
}
