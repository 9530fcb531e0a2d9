// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::error::GitError;
use crate::runner::GitRunner;

#[derive(Clone, Debug)]
enum MockResponse {
	Stdout(String),
	Stderr(String),
}

/// Scripted git runner for testing.
///
/// Responses are keyed by the space-joined argument list, e.g.
/// `"rev-parse --abbrev-ref HEAD"`. Unscripted commands fail like a git error.
#[derive(Clone, Default)]
pub struct MockRunner {
	responses: HashMap<String, MockResponse>,
	not_installed: bool,
	/// Track calls for verification.
	calls: Arc<Mutex<Vec<String>>>,
}

impl MockRunner {
	pub fn new() -> Self {
		Self::default()
	}

	/// Scripts a successful command.
	pub fn with_output(mut self, args: &str, stdout: impl Into<String>) -> Self {
		self.responses
			.insert(args.to_string(), MockResponse::Stdout(stdout.into()));
		self
	}

	/// Scripts a failing command with git's stderr.
	pub fn with_failure(mut self, args: &str, stderr: impl Into<String>) -> Self {
		self.responses
			.insert(args.to_string(), MockResponse::Stderr(stderr.into()));
		self
	}

	/// Every command behaves as if git were missing.
	pub fn not_installed(mut self) -> Self {
		self.not_installed = true;
		self
	}

	/// Returns the recorded argument lines, in call order.
	pub fn get_calls(&self) -> Vec<String> {
		self.calls
			.lock()
			.unwrap_or_else(|poisoned| poisoned.into_inner())
			.clone()
	}

	fn record(&self, call: String) {
		self.calls
			.lock()
			.unwrap_or_else(|poisoned| poisoned.into_inner())
			.push(call);
	}
}

#[async_trait]
impl GitRunner for MockRunner {
	async fn run(
		&self,
		cancel: &CancellationToken,
		_dir: &Path,
		args: &[&str],
	) -> Result<String, GitError> {
		let line = args.join(" ");
		self.record(line.clone());

		if cancel.is_cancelled() {
			return Err(GitError::Cancelled);
		}
		if self.not_installed {
			return Err(GitError::GitNotInstalled);
		}

		match self.responses.get(&line) {
			Some(MockResponse::Stdout(out)) => Ok(out.trim().to_string()),
			Some(MockResponse::Stderr(err)) => Err(GitError::CommandFailed {
				args: args.iter().map(|s| s.to_string()).collect(),
				stderr: err.clone(),
			}),
			None => Err(GitError::CommandFailed {
				args: args.iter().map(|s| s.to_string()).collect(),
				stderr: format!("unscripted git command: {line}"),
			}),
		}
	}
}
