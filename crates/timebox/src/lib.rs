//! # timebox
//!
//! Run a command with a deadline, escalate from a soft signal to SIGKILL, and
//! retry it when it fails on its own.
//!
//! Exit codes follow `timeout(1)`: the child's own code, 124 on timeout, 125
//! for usage errors, 126/127 when the command can't be run, and 130 when
//! timebox itself is interrupted.
//!
//! Only the direct child is signalled. Processes it spawns are not placed in
//! a separate group and can outlive it.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use timebox::{supervise, Interrupt, SupervisorConfig};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let mut config = SupervisorConfig::new(5, vec!["curl".into(), "-sf".into(), "http://localhost:8080/health".into()]);
//! config.kill_after_secs = Some(2);
//! config.retry_count = 3;
//!
//! let guard = Interrupt::install().unwrap();
//! let report = supervise(&config, guard.interrupt()).await;
//! drop(guard);
//!
//! std::process::exit(report.exit_code());
//! # }
//! ```

pub mod deadline;
pub mod duration;
pub mod error;
pub mod escalate;
pub mod interrupt;
pub mod process;
pub mod retry;
pub mod signal;
pub mod types;

pub use deadline::{run_attempt, AttemptSpec};
pub use duration::parse_duration;
pub use error::{exit_codes, SpawnError, SpawnKind, UsageError};
pub use escalate::escalate;
pub use interrupt::{Interrupt, InterruptGuard};
pub use process::ProcessHandle;
pub use retry::{retry_notice, supervise};
pub use signal::{parse_signal, signal_name, Signal};
pub use types::*;
