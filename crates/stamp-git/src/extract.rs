// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

use std::path::Path;

use tokio_util::sync::CancellationToken;

use crate::config::{GitInfoConfig, DEFAULT_TAG};
use crate::error::GitError;
use crate::info::{Extraction, RepositoryInfo};
use crate::parse::{
	first_line, last_line, parse_commit_date, split_message, strip_signature, strip_url_credentials,
	TagMessage,
};
use crate::runner::{CommandRunner, GitRunner};

/// Extracts [`RepositoryInfo`] from a checkout using a [`GitRunner`].
pub struct GitInfoExtractor<R = CommandRunner> {
	runner: R,
	default_tag: String,
}

impl GitInfoExtractor<CommandRunner> {
	pub fn new() -> Self {
		Self::with_runner(CommandRunner::new())
	}

	pub fn from_config(config: &GitInfoConfig) -> Self {
		Self::with_runner(CommandRunner::from_config(config)).default_tag(&config.default_tag)
	}
}

impl Default for GitInfoExtractor<CommandRunner> {
	fn default() -> Self {
		Self::new()
	}
}

impl<R: GitRunner> GitInfoExtractor<R> {
	pub fn with_runner(runner: R) -> Self {
		Self {
			runner,
			default_tag: DEFAULT_TAG.to_string(),
		}
	}

	/// Tag reported when no tag is reachable from HEAD.
	pub fn default_tag(mut self, tag: impl Into<String>) -> Self {
		self.default_tag = tag.into();
		self
	}

	pub fn runner(&self) -> &R {
		&self.runner
	}

	/// Extracts repository information for `dir`.
	///
	/// The returned [`Extraction`] always carries a record. On success, or on a
	/// soft failure ([`GitError::NoTag`], [`GitError::Dirty`]), the record is
	/// populated and must still be read. On any hard failure the record is
	/// empty. Queries run once, in a fixed order, and stop at the first hard
	/// failure.
	pub async fn extract(&self, cancel: &CancellationToken, dir: &Path) -> Extraction {
		let mut info = RepositoryInfo::default();

		match self.collect(cancel, dir, &mut info).await {
			Ok(None) => {
				tracing::info!(
						path = %dir.display(),
						branch = %info.branch,
						tag = %info.current_tag,
						commit = %info.short_commit,
						"extracted git info"
				);
				Extraction::ok(info)
			}
			Ok(Some(soft)) => {
				tracing::debug!(path = %dir.display(), error = %soft, "git info extracted with soft failure");
				Extraction::soft(info, soft)
			}
			Err(hard) => {
				tracing::debug!(path = %dir.display(), error = %hard, "git info extraction failed");
				Extraction::hard(info, hard)
			}
		}
	}

	/// Runs every query in order, filling `info` as it goes.
	///
	/// Returns the first soft failure, if any. Leaves `info` partially filled
	/// on a hard failure; the caller resets it.
	async fn collect(
		&self,
		cancel: &CancellationToken,
		dir: &Path,
		info: &mut RepositoryInfo,
	) -> Result<Option<GitError>, GitError> {
		self.ensure_git(cancel, dir).await?;
		self.ensure_repository(cancel, dir).await?;

		info.branch = self
			.query(cancel, dir, "current branch", &["rev-parse", "--abbrev-ref", "HEAD"])
			.await?;
		info.full_commit = self
			.query(cancel, dir, "full commit", &["rev-parse", "HEAD"])
			.await?;
		info.short_commit = self
			.query(cancel, dir, "short commit", &["rev-parse", "--short", "HEAD"])
			.await?;

		let raw_date = self
			.query(cancel, dir, "commit date", &["show", "-s", "--format=%cI", "HEAD"])
			.await?;
		let (commit_date, commit_timestamp) = parse_commit_date(&raw_date)?;
		info.commit_date = commit_date;
		info.commit_timestamp = commit_timestamp;

		let roots = self
			.query(cancel, dir, "first commit", &["rev-list", "--max-parents=0", "HEAD"])
			.await?;
		info.first_commit = last_line(&roots).unwrap_or_default().to_string();

		let raw_url = self
			.query(cancel, dir, "remote URL", &["ls-remote", "--get-url"])
			.await?;
		info.url = strip_url_credentials(&raw_url)?;

		let mut soft = None;
		let tag = self.current_tag(cancel, dir).await?;

		info.summary = self
			.query(cancel, dir, "summary", &["describe", "--always", "--dirty", "--tags"])
			.await?;

		match tag {
			Some(tag) => {
				let message = self.tag_message(cancel, dir, &tag).await?;
				info.current_tag = tag;
				info.tag_subject = message.subject;
				info.tag_contents = message.contents;
				info.tag_body = message.body;
			}
			None => {
				tracing::debug!(path = %dir.display(), default = %self.default_tag, "no tag reachable from HEAD");
				info.current_tag = self.default_tag.clone();
				soft = Some(GitError::NoTag);
			}
		}

		let status = self
			.query(cancel, dir, "working tree status", &["status", "--porcelain"])
			.await?;
		if !status.is_empty() {
			info.dirty = true;
			tracing::debug!(path = %dir.display(), "working tree is dirty");
			soft.get_or_insert(GitError::Dirty { status });
		}

		Ok(soft)
	}

	async fn ensure_git(&self, cancel: &CancellationToken, dir: &Path) -> Result<(), GitError> {
		match self.runner.run(cancel, dir, &["--version"]).await {
			Ok(version) => {
				tracing::trace!(version = %version, "git available");
				Ok(())
			}
			// Spawning worked, so git exists; whatever went wrong shows up in the
			// repository check.
			Err(GitError::CommandFailed { .. }) => Ok(()),
			Err(e) => Err(e),
		}
	}

	async fn ensure_repository(&self, cancel: &CancellationToken, dir: &Path) -> Result<(), GitError> {
		let not_repository = || GitError::NotRepository {
			path: dir.to_path_buf(),
		};

		match self
			.runner
			.run(cancel, dir, &["rev-parse", "--is-inside-work-tree"])
			.await
		{
			Ok(out) if out == "true" => Ok(()),
			Ok(_) | Err(GitError::CommandFailed { .. }) => Err(not_repository()),
			Err(e) => Err(e),
		}
	}

	/// Nearest tag: an exact match on HEAD (highest version first), otherwise
	/// the closest reachable one.
	async fn current_tag(
		&self,
		cancel: &CancellationToken,
		dir: &Path,
	) -> Result<Option<String>, GitError> {
		let on_head = self
			.query(
				cancel,
				dir,
				"tags pointing at HEAD",
				&["tag", "--points-at", "HEAD", "--sort=-version:refname"],
			)
			.await?;
		if let Some(tag) = first_line(&on_head) {
			return Ok(Some(tag.to_string()));
		}

		match self
			.runner
			.run(cancel, dir, &["describe", "--tags", "--abbrev=0"])
			.await
		{
			Ok(out) => Ok(first_line(&out).map(str::to_string)),
			// git describe fails when there is nothing to describe.
			Err(GitError::CommandFailed { .. }) => Ok(None),
			Err(e) => Err(e),
		}
	}

	/// Message of an annotated tag, or of the tagged commit for a lightweight
	/// tag.
	async fn tag_message(
		&self,
		cancel: &CancellationToken,
		dir: &Path,
		tag: &str,
	) -> Result<TagMessage, GitError> {
		let tag_ref = format!("refs/tags/{tag}");
		let kind = self
			.query(cancel, dir, "tag type", &["cat-file", "-t", tag_ref.as_str()])
			.await?;

		let raw = if kind == "tag" {
			let contents = self
				.query(
					cancel,
					dir,
					"tag contents",
					&["for-each-ref", "--format=%(contents)", tag_ref.as_str()],
				)
				.await?;
			// Signed tags carry their signature block at the end of the contents.
			strip_signature(&contents).to_string()
		} else {
			tracing::trace!(tag = %tag, kind = %kind, "lightweight tag, using commit message");
			self.query(
				cancel,
				dir,
				"tag contents",
				&["log", "-1", "--format=%B", tag_ref.as_str()],
			)
			.await?
		};

		Ok(split_message(&raw))
	}

	async fn query(
		&self,
		cancel: &CancellationToken,
		dir: &Path,
		what: &'static str,
		args: &[&str],
	) -> Result<String, GitError> {
		self.runner
			.run(cancel, dir, args)
			.await
			.map_err(GitError::query(what))
	}
}

/// Extracts repository information for `dir` with the git found on the
/// search path.
///
/// Soft failures still come with a populated record; see [`Extraction`].
pub async fn get_info(cancel: &CancellationToken, dir: &Path) -> Extraction {
	GitInfoExtractor::new().extract(cancel, dir).await
}
