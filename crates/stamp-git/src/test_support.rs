// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Throwaway repository helpers for tests.

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::process::Command;

fn git(dir: &Path, args: &[&str]) {
	let output = Command::new("git")
		.args(args)
		.current_dir(dir)
		.env("GIT_CONFIG_NOSYSTEM", "1")
		.output()
		.expect("failed to spawn git");
	assert!(
		output.status.success(),
		"git {} failed: {}",
		args.join(" "),
		String::from_utf8_lossy(&output.stderr)
	);
}

/// Initializes a repository on `main` with a local identity and signing off.
pub(crate) fn git_init(dir: &Path) {
	git(dir, &["init", "--quiet"]);
	git(dir, &["symbolic-ref", "HEAD", "refs/heads/main"]);
	git(dir, &["config", "user.email", "test@test.com"]);
	git(dir, &["config", "user.name", "Test"]);
	git(dir, &["config", "commit.gpgsign", "false"]);
	git(dir, &["config", "tag.gpgsign", "false"]);
}

pub(crate) fn git_remote_add(dir: &Path, url: &str) {
	git(dir, &["remote", "add", "origin", url]);
}

pub(crate) fn git_add(dir: &Path) {
	git(dir, &["add", "-A"]);
}

pub(crate) fn git_commit(dir: &Path, message: &str) {
	git(dir, &["commit", "--allow-empty", "--quiet", "-m", message]);
}

pub(crate) fn git_tag(dir: &Path, tag: &str) {
	git(dir, &["tag", tag]);
}

pub(crate) fn git_annotated_tag(dir: &Path, tag: &str, message: &str) {
	git(dir, &["tag", "-a", tag, "-m", message]);
}

pub(crate) fn git_checkout_branch(dir: &Path, branch: &str) {
	git(dir, &["checkout", "--quiet", "-b", branch]);
}

/// Writes an executable standing in for git that hangs for `secs` seconds
/// whatever it is asked.
pub(crate) fn hanging_git(dir: &Path, secs: u32) -> PathBuf {
	let path = dir.join("hanging-git");
	fs::write(&path, format!("#!/bin/sh\nexec sleep {secs}\n")).unwrap();
	fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
	path
}
