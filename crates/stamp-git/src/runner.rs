// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace, warn};

use crate::config::GitInfoConfig;
use crate::error::GitError;

/// Runs read-only git queries against a directory.
#[async_trait]
pub trait GitRunner: Send + Sync {
	/// Runs `git -C <dir> <args...>` and returns its trimmed stdout.
	///
	/// A non-zero exit yields [`GitError::CommandFailed`] carrying git's
	/// trimmed stderr. Cancelling `cancel` aborts the in-flight process and
	/// yields [`GitError::Cancelled`].
	async fn run(
		&self,
		cancel: &CancellationToken,
		dir: &Path,
		args: &[&str],
	) -> Result<String, GitError>;
}

/// Runner spawning the git CLI.
#[derive(Debug, Clone)]
pub struct CommandRunner {
	program: PathBuf,
	envs: Vec<(String, String)>,
}

impl CommandRunner {
	pub fn new() -> Self {
		Self::with_program("git")
	}

	/// Uses `program` instead of looking up `git` on the search path.
	pub fn with_program(program: impl Into<PathBuf>) -> Self {
		Self {
			program: program.into(),
			envs: Vec::new(),
		}
	}

	pub fn from_config(config: &GitInfoConfig) -> Self {
		let mut runner = Self::with_program(&config.program);
		for (key, value) in &config.env {
			runner = runner.env(key, value);
		}
		runner
	}

	/// Sets an environment variable for every spawned git process.
	///
	/// Setting `PATH` also changes where the program is looked up.
	pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
		self.envs.push((key.into(), value.into()));
		self
	}

	pub fn program(&self) -> &Path {
		&self.program
	}
}

impl Default for CommandRunner {
	fn default() -> Self {
		Self::new()
	}
}

#[async_trait]
impl GitRunner for CommandRunner {
	async fn run(
		&self,
		cancel: &CancellationToken,
		dir: &Path,
		args: &[&str],
	) -> Result<String, GitError> {
		if cancel.is_cancelled() {
			return Err(GitError::Cancelled);
		}

		let mut cmd = Command::new(&self.program);
		cmd.arg("-C")
			.arg(dir)
			.args(args)
			// git's messages are matched on by callers.
			.env("LC_ALL", "C")
			.envs(self.envs.iter().map(|(k, v)| (k.as_str(), v.as_str())))
			.stdin(Stdio::null())
			.kill_on_drop(true);

		trace!(
				cmd = %format!("{} -C {} {}", self.program.display(), dir.display(), args.join(" ")),
				"running git command"
		);

		let output = tokio::select! {
			biased;
			_ = cancel.cancelled() => {
				debug!(args = ?args, "git command cancelled");
				return Err(GitError::Cancelled);
			}
			output = cmd.output() => output.map_err(|e| {
				if e.kind() == std::io::ErrorKind::NotFound {
					warn!(program = %self.program.display(), "git not found in PATH");
					GitError::GitNotInstalled
				} else {
					GitError::Io(e)
				}
			})?,
		};

		if output.status.success() {
			Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
		} else {
			let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
			debug!(
					args = ?args,
					status = ?output.status.code(),
					stderr = %stderr,
					"git command returned non-zero"
			);
			Err(GitError::CommandFailed {
				args: args.iter().map(|s| s.to_string()).collect(),
				stderr,
			})
		}
	}
}
