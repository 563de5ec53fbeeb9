use serde::Deserialize;
use std::path::{Path, PathBuf};
use timebox::{parse_duration, parse_signal, SupervisorConfig, UsageError};

use crate::cli::Cli;

// ── Global config (~/.config/timebox/config.toml) ───────────────────────────

#[derive(Debug, Clone, Deserialize, Default)]
pub struct GlobalConfig {
	#[serde(default)]
	pub defaults: DefaultsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DefaultsConfig {
	#[serde(default = "default_signal")]
	pub signal: String,
	pub kill_after: Option<DurationValue>,
	#[serde(default)]
	pub retry: u32,
	#[serde(default = "default_retry_interval")]
	pub retry_interval: DurationValue,
	#[serde(default)]
	pub verbose: bool,
}

impl Default for DefaultsConfig {
	fn default() -> Self {
		Self {
			signal: default_signal(),
			kill_after: None,
			retry: 0,
			retry_interval: default_retry_interval(),
			verbose: false,
		}
	}
}

fn default_signal() -> String { "TERM".into() }
fn default_retry_interval() -> DurationValue { DurationValue::Secs(1) }

/// `retry_interval = 5` and `retry_interval = "5s"` are both accepted.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum DurationValue {
	Secs(u64),
	Text(String),
}

impl DurationValue {
	fn secs(&self) -> Result<u64, UsageError> {
		match self {
			DurationValue::Secs(n) => Ok(*n),
			DurationValue::Text(s) => parse_duration(s),
		}
	}
}

pub fn config_dir() -> PathBuf {
	if let Ok(dir) = std::env::var("XDG_CONFIG_HOME") {
		PathBuf::from(dir).join("timebox")
	} else if let Some(home) = home_dir() {
		home.join(".config").join("timebox")
	} else {
		PathBuf::from("/tmp/timebox/config")
	}
}

fn home_dir() -> Option<PathBuf> {
	std::env::var("HOME").ok().map(PathBuf::from)
}

pub fn config_path() -> PathBuf {
	config_dir().join("config.toml")
}

pub fn load_from(path: &Path) -> GlobalConfig {
	if path.exists() {
		match std::fs::read_to_string(path) {
			Ok(content) => match toml::from_str(&content) {
				Ok(config) => return config,
				Err(e) => eprintln!("warning: failed to parse {}: {}", path.display(), e),
			},
			Err(e) => eprintln!("warning: failed to read {}: {}", path.display(), e),
		}
	}
	GlobalConfig::default()
}

/// Merge command line over config file over built-in defaults.
pub fn resolve(cli: &Cli, global: &GlobalConfig, path: &Path) -> Result<SupervisorConfig, UsageError> {
	let defaults = &global.defaults;
	let invalid = |key: &str, e: UsageError| UsageError::InvalidConfig {
		key: key.to_string(),
		path: path.display().to_string(),
		reason: e.to_string(),
	};

	if cli.command.is_empty() {
		return Err(UsageError::MissingCommand);
	}

	let signal = match cli.signal {
		Some(s) => s,
		None => parse_signal(&defaults.signal).map_err(|e| invalid("signal", e))?,
	};

	let kill_after_secs = match (cli.kill_after, &defaults.kill_after) {
		(Some(k), _) => Some(k),
		(None, Some(v)) => Some(v.secs().map_err(|e| invalid("kill_after", e))?),
		(None, None) => None,
	};

	let retry_interval_secs = match cli.retry_interval {
		Some(i) => i,
		None => defaults
			.retry_interval
			.secs()
			.map_err(|e| invalid("retry_interval", e))?,
	};

	Ok(SupervisorConfig {
		timeout_secs: cli.duration,
		signal,
		kill_after_secs,
		retry_count: cli.retry.unwrap_or(defaults.retry),
		retry_interval_secs,
		verbose: cli.verbose || defaults.verbose,
		command: cli.command.clone(),
	})
}
