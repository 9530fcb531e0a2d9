// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Export of a [`TemplateValue`] as environment variables, e.g. from `build.rs`:
//!
//! ```no_run
//! # async fn build() -> std::io::Result<()> {
//! let cancel = tokio_util::sync::CancellationToken::new();
//! let dir = std::path::Path::new(env!("CARGO_MANIFEST_DIR"));
//! let extraction = stamp_git::get_info(&cancel, dir).await;
//! extraction
//! 	.template_value()
//! 	.write_cargo_env(&mut std::io::stdout(), "STAMP_GIT_")?;
//! # Ok(())
//! # }
//! ```

use std::io::{self, Write};

use crate::info::TemplateValue;

impl TemplateValue {
	/// Returns `(NAME, value)` pairs, names upper-cased and prefixed.
	pub fn env_vars(&self, prefix: &str) -> Vec<(String, String)> {
		let fields: [(&str, String); 15] = [
			("BRANCH", self.branch.clone()),
			("CURRENT_TAG", self.current_tag.clone()),
			("SHORT_COMMIT", self.short_commit.clone()),
			("FULL_COMMIT", self.full_commit.clone()),
			("FIRST_COMMIT", self.first_commit.clone()),
			("COMMIT_DATE", self.commit_date.clone()),
			("COMMIT_TIMESTAMP", self.commit_timestamp.to_string()),
			("URL", self.url.clone()),
			("SUMMARY", self.summary.clone()),
			("TAG_SUBJECT", self.tag_subject.clone()),
			("TAG_CONTENTS", self.tag_contents.clone()),
			("TAG_BODY", self.tag_body.clone()),
			("IS_DIRTY", self.is_dirty.to_string()),
			("IS_CLEAN", self.is_clean.to_string()),
			("TREE_STATE", self.tree_state.to_string()),
		];

		fields
			.into_iter()
			.map(|(name, value)| (format!("{prefix}{name}"), value))
			.collect()
	}

	/// Writes `NAME=value` lines. Multi-line values are flattened.
	pub fn write_env<W: Write>(&self, out: &mut W, prefix: &str) -> io::Result<()> {
		for (name, value) in self.env_vars(prefix) {
			writeln!(out, "{name}={}", single_line(&value))?;
		}
		Ok(())
	}

	/// Writes `cargo:rustc-env=NAME=value` directives for a build script.
	pub fn write_cargo_env<W: Write>(&self, out: &mut W, prefix: &str) -> io::Result<()> {
		for (name, value) in self.env_vars(prefix) {
			writeln!(out, "cargo:rustc-env={name}={}", single_line(&value))?;
		}
		Ok(())
	}
}

// Directives are line-based.
fn single_line(value: &str) -> String {
	value.lines().collect::<Vec<_>>().join("\\n")
}
