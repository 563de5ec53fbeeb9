mod cli;
mod config;

use clap::error::ErrorKind;
use clap::Parser;
use owo_colors::OwoColorize;
use timebox::{exit_codes, signal_name, supervise, Interrupt, Outcome, UsageError};

#[tokio::main]
async fn main() {
	let code = run().await;
	std::process::exit(code);
}

async fn run() -> i32 {
	let cli = match cli::Cli::try_parse() {
		Ok(cli) => cli,
		Err(e) => {
			let _ = e.print();
			return match e.kind() {
				ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => exit_codes::SUCCESS,
				_ => exit_codes::USAGE,
			};
		}
	};

	// Installed before anything else so a signal during setup is not lost.
	let guard = match Interrupt::install() {
		Ok(g) => g,
		Err(e) => {
			eprintln!("{}: failed to install signal handlers: {}", "error".red().bold(), e);
			return exit_codes::USAGE;
		}
	};

	let path = config::config_path();
	let global = config::load_from(&path);
	let settings = match config::resolve(&cli, &global, &path) {
		Ok(c) => c,
		Err(e) => {
			usage_error(&e);
			return e.exit_code();
		}
	};

	init_tracing(settings.verbose);
	tracing::debug!(
		"running {:?} with {}s deadline, signal {}, kill-after {:?}, {} retries every {}s",
		settings.command,
		settings.timeout_secs,
		signal_name(settings.signal),
		settings.kill_after_secs,
		settings.retry_count,
		settings.retry_interval_secs
	);

	let report = supervise(&settings, guard.interrupt()).await;
	drop(guard);

	match &report.outcome {
		Outcome::SpawnFailed(e) => eprintln!("timebox: {}", e),
		Outcome::WaitFailed(e) => eprintln!("timebox: lost track of the command: {}", e),
		Outcome::TimedOut if settings.verbose => {
			eprintln!("timebox: timed out after {}s", settings.timeout_secs)
		}
		_ => {}
	}
	tracing::debug!(
		"finished after {} attempt(s) in {:?}: exit {}",
		report.attempts,
		report.elapsed,
		report.exit_code()
	);
	report.exit_code()
}

fn usage_error(e: &UsageError) {
	eprintln!("{}: {}", "error".red().bold(), e);
	eprintln!();
	eprintln!("For more information, try '{}'.", "--help".bold());
}

fn init_tracing(verbose: bool) {
	let level = if verbose {
		tracing::Level::DEBUG
	} else {
		tracing::Level::WARN
	};
	tracing_subscriber::fmt()
		.with_max_level(level)
		.with_target(false)
		.with_writer(std::io::stderr)
		.init();
}
