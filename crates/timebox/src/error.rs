use std::io;

/// Process exit codes, compatible with `timeout(1)`.
pub mod exit_codes {
	pub const SUCCESS: i32 = 0;
	/// The deadline elapsed and the command was signalled.
	pub const TIMED_OUT: i32 = 124;
	/// Bad flag, argument or duration; also a failure of timebox itself.
	pub const USAGE: i32 = 125;
	pub const NOT_EXECUTABLE: i32 = 126;
	pub const NOT_FOUND: i32 = 127;
	pub const INTERRUPTED: i32 = 130;
}

/// Problems with the invocation itself, detected before anything is spawned.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UsageError {
	#[error("invalid time interval '{0}'")]
	InvalidDuration(String),
	#[error("invalid signal '{0}'")]
	InvalidSignal(String),
	#[error("missing command")]
	MissingCommand,
	#[error("invalid value for '{key}' in {path}: {reason}")]
	InvalidConfig {
		key: String,
		path: String,
		reason: String,
	},
}

impl UsageError {
	pub fn exit_code(&self) -> i32 {
		exit_codes::USAGE
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnKind {
	NotFound,
	NotExecutable,
}

/// The command could not be started. Never retried.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("failed to run command '{program}': {reason}")]
pub struct SpawnError {
	pub kind: SpawnKind,
	pub program: String,
	pub reason: String,
}

impl SpawnError {
	pub fn from_io(program: &str, err: &io::Error) -> Self {
		let kind = match err.kind() {
			io::ErrorKind::NotFound => SpawnKind::NotFound,
			_ => SpawnKind::NotExecutable,
		};
		Self {
			kind,
			program: program.to_string(),
			reason: err.to_string(),
		}
	}

	pub fn exit_code(&self) -> i32 {
		match self.kind {
			SpawnKind::NotFound => exit_codes::NOT_FOUND,
			SpawnKind::NotExecutable => exit_codes::NOT_EXECUTABLE,
		}
	}
}
