// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Git repository metadata for build-time templating.
//!
//! [`get_info`] runs a fixed sequence of read-only git queries against a
//! directory and assembles a [`RepositoryInfo`]. The result is an
//! [`Extraction`]: a record plus an optional [`GitError`].
//!
//! **Soft failures still carry data.** [`GitError::NoTag`] and
//! [`GitError::Dirty`] are reported as errors so build tooling can choose to
//! abort, but the record next to them is fully populated (default tag
//! `v0.0.0`, or `dirty = true`). Every other error comes with an empty record.

mod build_env;
mod config;
mod error;
mod extract;
mod info;
mod mock_runner;
mod parse;
mod runner;
#[cfg(test)]
mod test_support;

pub use config::{
	load_config, ConfigError, GitInfoConfig, DEFAULT_TAG, ENV_DEFAULT_TAG, ENV_PROGRAM,
	ENV_TIMEOUT_SECS,
};
pub use error::GitError;
pub use extract::{get_info, GitInfoExtractor};
pub use info::{Extraction, RepositoryInfo, TemplateValue, TreeState};
pub use mock_runner::MockRunner;
pub use parse::{split_message, strip_url_credentials, TagMessage};
pub use runner::{CommandRunner, GitRunner};
