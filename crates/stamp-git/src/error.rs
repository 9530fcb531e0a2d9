// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Everything that can go wrong while extracting repository information.
///
/// Two variants are *soft*: [`GitError::NoTag`] and [`GitError::Dirty`]. They
/// are reported alongside a fully populated record. Every other variant is
/// *hard* and comes with an empty record. See [`crate::Extraction`].
#[derive(Debug, Error)]
pub enum GitError {
	#[error("git is not installed or not in PATH")]
	GitNotInstalled,

	#[error("not a git repository: {}", path.display())]
	NotRepository { path: PathBuf },

	#[error("couldn't find any tags reachable from HEAD")]
	NoTag,

	#[error("git is in a dirty state\nPlease check in your pipeline what can be changing the following files:\n{status}")]
	Dirty { status: String },

	/// Raw failure of a single git invocation.
	#[error("git command failed: git {}: {stderr}", args.join(" "))]
	CommandFailed { args: Vec<String>, stderr: String },

	/// A failed query, wrapping git's own message.
	#[error("couldn't get {what}: {message}")]
	Query { what: &'static str, message: String },

	#[error("remote URL is malformed: {source}")]
	InvalidRemoteUrl {
		#[source]
		source: url::ParseError,
	},

	#[error("couldn't parse commit date {raw:?}: {source}")]
	InvalidCommitDate {
		raw: String,
		#[source]
		source: chrono::ParseError,
	},

	#[error("git query cancelled")]
	Cancelled,

	#[error("I/O error: {0}")]
	Io(#[from] io::Error),
}

impl GitError {
	/// Returns true for failures that still come with a populated record.
	pub fn is_soft(&self) -> bool {
		matches!(self, GitError::NoTag | GitError::Dirty { .. })
	}

	/// Wraps a failed git invocation as a query failure for `what`.
	///
	/// Failures that are not about git's exit status (missing binary,
	/// cancellation, I/O) pass through untouched.
	pub(crate) fn query(what: &'static str) -> impl FnOnce(GitError) -> GitError {
		move |err| match err {
			GitError::CommandFailed { stderr, .. } => GitError::Query {
				what,
				message: stderr,
			},
			other => other,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn soft_errors_are_classified() {
		assert!(GitError::NoTag.is_soft());
		assert!(GitError::Dirty {
			status: " M file".to_string()
		}
		.is_soft());
		assert!(!GitError::GitNotInstalled.is_soft());
		assert!(!GitError::Cancelled.is_soft());
		assert!(!GitError::NotRepository {
			path: PathBuf::from("/tmp")
		}
		.is_soft());
	}

	/// Wrapped queries must surface git's literal message, since callers match
	/// on its content.
	#[test]
	fn query_wraps_command_failure_message() {
		let err = GitError::query("remote URL")(GitError::CommandFailed {
			args: vec!["ls-remote".into(), "--get-url".into()],
			stderr: "fatal: No remote configured to list refs from.".into(),
		});
		assert_eq!(
			err.to_string(),
			"couldn't get remote URL: fatal: No remote configured to list refs from."
		);
	}

	#[test]
	fn query_passes_through_other_errors() {
		let err = GitError::query("current branch")(GitError::Cancelled);
		assert!(matches!(err, GitError::Cancelled));
	}

	#[test]
	fn dirty_message_mentions_state() {
		let err = GitError::Dirty {
			status: " M dummy".into(),
		};
		assert!(err.to_string().contains("git is in a dirty state"));
		assert!(err.to_string().contains(" M dummy"));
	}
}
