// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

use std::fmt;

use serde::Serialize;

use crate::error::GitError;

/// Metadata describing the state of a checkout.
///
/// A record handed to callers is either fully populated or entirely empty;
/// see [`Extraction`] for when each happens.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RepositoryInfo {
	/// Current branch name (`HEAD` when detached).
	pub branch: String,
	/// Most recent tag reachable from HEAD, or the default tag.
	pub current_tag: String,
	pub short_commit: String,
	pub full_commit: String,
	/// Hash of the root commit.
	pub first_commit: String,
	/// Commit date of HEAD, RFC 3339 in UTC.
	pub commit_date: String,
	/// Unix timestamp of HEAD; zero only on an empty record.
	pub commit_timestamp: i64,
	/// Remote URL with credentials removed.
	pub url: String,
	/// `git describe --always --dirty --tags`.
	pub summary: String,
	pub tag_subject: String,
	pub tag_contents: String,
	pub tag_body: String,
	/// Working tree has uncommitted or untracked changes.
	pub dirty: bool,
}

impl RepositoryInfo {
	/// Clears every field back to its zero value.
	pub fn reset(&mut self) {
		*self = Self::default();
	}

	/// Returns true when no field has been populated.
	pub fn is_empty(&self) -> bool {
		*self == Self::default()
	}

	/// Projects the record into the view consumed by templates.
	pub fn template_value(&self) -> TemplateValue {
		TemplateValue::from(self)
	}
}

/// Whether the working tree matched HEAD at extraction time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TreeState {
	#[default]
	Clean,
	Dirty,
}

impl TreeState {
	pub fn as_str(self) -> &'static str {
		match self {
			TreeState::Clean => "clean",
			TreeState::Dirty => "dirty",
		}
	}
}

impl fmt::Display for TreeState {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Read-only view of [`RepositoryInfo`] for template engines.
///
/// Serializes with PascalCase keys (`Branch`, `ShortCommit`, `TreeState`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct TemplateValue {
	pub branch: String,
	pub current_tag: String,
	pub short_commit: String,
	pub full_commit: String,
	pub first_commit: String,
	pub commit_date: String,
	pub commit_timestamp: i64,
	#[serde(rename = "URL")]
	pub url: String,
	pub summary: String,
	pub tag_subject: String,
	pub tag_contents: String,
	pub tag_body: String,
	pub is_dirty: bool,
	pub is_clean: bool,
	pub tree_state: TreeState,
}

impl Default for TemplateValue {
	/// The view of an empty record: no strings, clean tree.
	fn default() -> Self {
		Self::from(&RepositoryInfo::default())
	}
}

impl From<&RepositoryInfo> for TemplateValue {
	fn from(info: &RepositoryInfo) -> Self {
		let tree_state = if info.dirty {
			TreeState::Dirty
		} else {
			TreeState::Clean
		};

		Self {
			branch: info.branch.clone(),
			current_tag: info.current_tag.clone(),
			short_commit: info.short_commit.clone(),
			full_commit: info.full_commit.clone(),
			first_commit: info.first_commit.clone(),
			commit_date: info.commit_date.clone(),
			commit_timestamp: info.commit_timestamp,
			url: info.url.clone(),
			summary: info.summary.clone(),
			tag_subject: info.tag_subject.clone(),
			tag_contents: info.tag_contents.clone(),
			tag_body: info.tag_body.clone(),
			is_dirty: info.dirty,
			is_clean: !info.dirty,
			tree_state,
		}
	}
}

/// The outcome of one extraction: a record plus an optional error.
///
/// This is a dual return on purpose, and it is easy to misuse:
///
/// - `error == None`: the record is fully populated.
/// - a *soft* error ([`GitError::NoTag`], [`GitError::Dirty`]): the record is
///   **still fully populated** (with the default tag, or `dirty = true`). Build
///   tooling decides whether to abort, but should keep reading `info`.
/// - any other (*hard*) error: the record is empty.
#[derive(Debug)]
#[must_use = "an extraction may carry an error alongside its record"]
pub struct Extraction {
	pub info: RepositoryInfo,
	pub error: Option<GitError>,
}

impl Extraction {
	pub(crate) fn ok(info: RepositoryInfo) -> Self {
		Self { info, error: None }
	}

	/// Builds a hard-failure outcome; the record is reset.
	pub(crate) fn hard(mut info: RepositoryInfo, error: GitError) -> Self {
		info.reset();
		Self {
			info,
			error: Some(error),
		}
	}

	/// Builds a soft-failure outcome keeping the populated record.
	pub(crate) fn soft(info: RepositoryInfo, error: GitError) -> Self {
		debug_assert!(error.is_soft());
		Self {
			info,
			error: Some(error),
		}
	}

	pub fn is_ok(&self) -> bool {
		self.error.is_none()
	}

	/// True when the record is usable: no error, or only a soft one.
	pub fn is_populated(&self) -> bool {
		self.error.as_ref().is_none_or(GitError::is_soft)
	}

	pub fn template_value(&self) -> TemplateValue {
		self.info.template_value()
	}

	pub fn into_parts(self) -> (RepositoryInfo, Option<GitError>) {
		(self.info, self.error)
	}

	/// Strict view: any error, soft or hard, becomes `Err`.
	pub fn into_result(self) -> Result<RepositoryInfo, GitError> {
		match self.error {
			None => Ok(self.info),
			Some(err) => Err(err),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn populated() -> RepositoryInfo {
		RepositoryInfo {
			branch: "main".into(),
			current_tag: "v1.2.3".into(),
			short_commit: "abc1234".into(),
			full_commit: "abc1234def5678901234567890123456789abcde".into(),
			first_commit: "0000111122223333444455556666777788889999".into(),
			commit_date: "2024-05-01T10:00:00Z".into(),
			commit_timestamp: 1_714_557_600,
			url: "git@github.com:foo/bar.git".into(),
			summary: "v1.2.3".into(),
			tag_subject: "release".into(),
			tag_contents: "release".into(),
			tag_body: String::new(),
			dirty: false,
		}
	}

	/// An empty record must project to the default view: clean, no strings.
	#[test]
	fn empty_record_projects_to_clean_view() {
		let tpl = RepositoryInfo::default().template_value();
		assert_eq!(tpl.branch, "");
		assert_eq!(tpl.url, "");
		assert_eq!(tpl.commit_timestamp, 0);
		assert!(!tpl.is_dirty);
		assert!(tpl.is_clean);
		assert_eq!(tpl.tree_state.as_str(), "clean");
		assert_eq!(tpl, TemplateValue::default());
	}

	#[test]
	fn dirty_record_projects_dirty_flags() {
		let mut info = populated();
		info.dirty = true;
		let tpl = info.template_value();
		assert!(tpl.is_dirty);
		assert!(!tpl.is_clean);
		assert_eq!(tpl.tree_state, TreeState::Dirty);
		assert_eq!(tpl.tree_state.to_string(), "dirty");
	}

	#[test]
	fn reset_empties_everything() {
		let mut info = populated();
		assert!(!info.is_empty());
		info.reset();
		assert!(info.is_empty());
	}

	#[test]
	fn hard_outcome_drops_partial_data() {
		let outcome = Extraction::hard(populated(), GitError::Cancelled);
		assert!(outcome.info.is_empty());
		assert!(!outcome.is_populated());
	}

	#[test]
	fn soft_outcome_keeps_data() {
		let outcome = Extraction::soft(populated(), GitError::NoTag);
		assert!(!outcome.is_ok());
		assert!(outcome.is_populated());
		assert_eq!(outcome.info.branch, "main");
		assert!(matches!(outcome.into_result(), Err(GitError::NoTag)));
	}

	#[test]
	fn ok_outcome_into_result() {
		let info = Extraction::ok(populated()).into_result().unwrap();
		assert_eq!(info.current_tag, "v1.2.3");
	}

	/// Templates address fields by their conventional names.
	#[test]
	fn template_value_serializes_pascal_case() {
		let value = serde_json::to_value(populated().template_value()).unwrap();
		assert_eq!(value["Branch"], "main");
		assert_eq!(value["CurrentTag"], "v1.2.3");
		assert_eq!(value["URL"], "git@github.com:foo/bar.git");
		assert_eq!(value["IsClean"], true);
		assert_eq!(value["TreeState"], "clean");
	}
}
