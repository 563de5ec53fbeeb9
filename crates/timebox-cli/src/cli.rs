use clap::Parser;
use timebox::{parse_duration, parse_signal, Signal};

/// Run a command with a time limit, retrying it when it fails.
#[derive(Debug, Parser)]
#[command(
	name = "timebox",
	version,
	after_help = "DURATION is a whole number of seconds with an optional suffix: \
		s (seconds), m (minutes), h (hours) or d (days). A DURATION of 0 disables the timeout.\n\n\
		Exit status: the command's own status, 124 if it timed out, 125 if timebox \
		itself failed, 126 if the command could not be invoked, 127 if it could not \
		be found, 130 if interrupted."
)]
pub struct Cli {
	/// Signal to send on timeout: a name like TERM or a number
	#[arg(short, long, value_name = "SIGNAL", value_parser = parse_signal)]
	pub signal: Option<Signal>,

	/// Also send KILL if the command is still running this long after the signal
	#[arg(short, long, value_name = "DURATION", value_parser = parse_duration)]
	pub kill_after: Option<u64>,

	/// Retry a failing command up to N more times (timeouts are never retried)
	#[arg(short, long, value_name = "N")]
	pub retry: Option<u32>,

	/// Time to wait between attempts [default: 1s]
	#[arg(short = 'i', long, value_name = "DURATION", value_parser = parse_duration)]
	pub retry_interval: Option<u64>,

	/// Report retries and signals on stderr
	#[arg(short, long)]
	pub verbose: bool,

	#[arg(value_name = "DURATION", value_parser = parse_duration)]
	pub duration: u64,

	#[arg(
		value_name = "COMMAND",
		required = true,
		num_args = 1..,
		trailing_var_arg = true,
		allow_hyphen_values = true
	)]
	pub command: Vec<String>,
}

#[cfg(test)]
mod tests {
	use super::*;
	use clap::error::ErrorKind;

	fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
		Cli::try_parse_from(std::iter::once("timebox").chain(args.iter().copied()))
	}

	#[test]
	fn minimal() {
		let cli = parse(&["5", "sleep", "10"]).unwrap();
		assert_eq!(cli.duration, 5);
		assert_eq!(cli.command, vec!["sleep", "10"]);
		assert_eq!(cli.signal, None);
		assert_eq!(cli.retry, None);
		assert!(!cli.verbose);
	}

	#[test]
	fn all_options() {
		let cli = parse(&["-s", "INT", "-k", "2s", "-r", "3", "-i", "1m", "-v", "1h", "make", "test"]).unwrap();
		assert_eq!(cli.signal, Some(Signal::SIGINT));
		assert_eq!(cli.kill_after, Some(2));
		assert_eq!(cli.retry, Some(3));
		assert_eq!(cli.retry_interval, Some(60));
		assert!(cli.verbose);
		assert_eq!(cli.duration, 3600);
		assert_eq!(cli.command, vec!["make", "test"]);
	}

	#[test]
	fn command_flags_pass_through() {
		let cli = parse(&["5", "ls", "-v", "--retry", "x"]).unwrap();
		assert!(!cli.verbose);
		assert_eq!(cli.retry, None);
		assert_eq!(cli.command, vec!["ls", "-v", "--retry", "x"]);
	}

	#[test]
	fn bad_duration() {
		let err = parse(&["5x", "true"]).unwrap_err();
		assert_eq!(err.kind(), ErrorKind::ValueValidation);
	}

	#[test]
	fn bad_signal() {
		let err = parse(&["-s", "BOGUS", "5", "true"]).unwrap_err();
		assert_eq!(err.kind(), ErrorKind::ValueValidation);
	}

	#[test]
	fn missing_command() {
		assert!(parse(&["5"]).is_err());
		assert!(parse(&[]).is_err());
	}
}
