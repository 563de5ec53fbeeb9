use std::io;
use std::os::unix::process::ExitStatusExt;
use std::process::ExitStatus;

use nix::errno::Errno;
use nix::sys::signal::{kill, Signal};
use nix::unistd::Pid;
use tokio::process::{Child, Command};

use crate::error::{SpawnError, SpawnKind};

/// A running child owned by exactly one attempt.
///
/// The child stays unreaped until [`wait`](Self::wait) observes its exit, so
/// its pid cannot be recycled while the handle can still signal it. Once
/// reaped, signalling is a no-op.
///
/// The child runs in timebox's own process group. Grandchildren it spawns are
/// not tracked and may outlive it after a kill.
pub struct ProcessHandle {
	child: Child,
	program: String,
	pid: u32,
}

impl ProcessHandle {
	pub fn spawn(command: &[String]) -> Result<Self, SpawnError> {
		let (program, args) = command.split_first().ok_or_else(|| SpawnError {
			kind: SpawnKind::NotFound,
			program: String::new(),
			reason: "empty command".to_string(),
		})?;

		let child = Command::new(program)
			.args(args)
			.spawn()
			.map_err(|e| SpawnError::from_io(program, &e))?;
		let pid = child.id().unwrap_or(0);

		tracing::debug!("spawned {} (pid {})", program, pid);
		Ok(Self {
			child,
			program: program.clone(),
			pid,
		})
	}

	pub fn pid(&self) -> u32 {
		self.pid
	}

	pub fn program(&self) -> &str {
		&self.program
	}

	pub fn is_alive(&mut self) -> bool {
		matches!(self.child.try_wait(), Ok(None))
	}

	/// Deliver `signal`. A child that already exited is not an error.
	pub fn signal(&self, signal: Signal) -> nix::Result<()> {
		let Some(pid) = self.child.id() else {
			return Ok(());
		};
		match kill(Pid::from_raw(pid as i32), signal) {
			Ok(()) | Err(Errno::ESRCH) => Ok(()),
			Err(e) => Err(e),
		}
	}

	pub fn force_kill(&self) -> nix::Result<()> {
		self.signal(Signal::SIGKILL)
	}

	/// Cancel safe: dropping the future leaves the child untouched.
	pub async fn wait(&mut self) -> io::Result<ExitStatus> {
		self.child.wait().await
	}

	/// Collect the exit status if the child is already gone, without blocking.
	pub fn reap(&mut self) -> Option<ExitStatus> {
		self.child.try_wait().ok().flatten()
	}
}

/// Shell-style exit code: the child's own code, or `128 + n` for death by signal `n`.
pub fn exit_code(status: ExitStatus) -> i32 {
	match status.code() {
		Some(code) => code,
		None => 128 + status.signal().unwrap_or(0),
	}
}
