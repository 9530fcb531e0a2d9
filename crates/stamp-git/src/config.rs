// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Extractor configuration.
//!
//! Sources, lowest precedence first:
//! - built-in defaults
//! - a TOML file, either top-level keys or a `[git]` table
//! - `STAMP_*` environment variables
//!
//! Command-line flags are layered on top by the binary.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Tag reported when no tag is reachable from HEAD.
pub const DEFAULT_TAG: &str = "v0.0.0";

pub const ENV_PROGRAM: &str = "STAMP_GIT_PROGRAM";
pub const ENV_DEFAULT_TAG: &str = "STAMP_DEFAULT_TAG";
pub const ENV_TIMEOUT_SECS: &str = "STAMP_TIMEOUT_SECS";

/// Errors that can occur while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
	#[error("I/O error reading {path}: {source}")]
	Io {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("TOML parse error in {path}: {source}")]
	TomlParse {
		path: PathBuf,
		#[source]
		source: toml::de::Error,
	},

	#[error("Invalid value for {field}: {message}")]
	InvalidValue { field: String, message: String },
}

impl ConfigError {
	pub fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
		Self::InvalidValue {
			field: field.into(),
			message: message.into(),
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GitInfoConfig {
	/// Git executable, looked up on the search path unless absolute.
	pub program: PathBuf,
	/// Reported as the current tag when no tag exists.
	pub default_tag: String,
	/// Overall deadline for one extraction.
	pub timeout_secs: Option<u64>,
	/// Extra environment for every git process.
	pub env: BTreeMap<String, String>,
}

impl Default for GitInfoConfig {
	fn default() -> Self {
		Self {
			program: PathBuf::from("git"),
			default_tag: DEFAULT_TAG.to_string(),
			timeout_secs: None,
			env: BTreeMap::new(),
		}
	}
}

impl GitInfoConfig {
	/// Parses a TOML document. Keys may live at the top level or under `[git]`.
	pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
		Self::parse(source, Path::new("<string>"))
	}

	/// Reads and parses a TOML file, without environment overrides.
	pub fn load(path: &Path) -> Result<Self, ConfigError> {
		let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
			path: path.to_path_buf(),
			source,
		})?;
		let config = Self::parse(&source, path)?;
		tracing::debug!(path = %path.display(), "loaded git info config");
		Ok(config)
	}

	fn parse(source: &str, path: &Path) -> Result<Self, ConfigError> {
		let toml_err = |source| ConfigError::TomlParse {
			path: path.to_path_buf(),
			source,
		};

		let mut table: toml::Table = toml::from_str(source).map_err(toml_err)?;
		let value = match table.remove("git") {
			Some(git @ toml::Value::Table(_)) if table.is_empty() => git,
			Some(other) => {
				table.insert("git".to_string(), other);
				toml::Value::Table(table)
			}
			None => toml::Value::Table(table),
		};
		value.try_into().map_err(toml_err)
	}

	/// Applies `STAMP_*` overrides from the process environment.
	pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
		self.apply_env_from(|key| std::env::var(key).ok())
	}

	/// Applies `STAMP_*` overrides from an arbitrary lookup.
	pub fn apply_env_from<F>(&mut self, lookup: F) -> Result<(), ConfigError>
	where
		F: Fn(&str) -> Option<String>,
	{
		if let Some(program) = lookup(ENV_PROGRAM) {
			tracing::trace!(program = %program, "git program overridden from environment");
			self.program = PathBuf::from(program);
		}
		if let Some(tag) = lookup(ENV_DEFAULT_TAG) {
			self.default_tag = tag;
		}
		if let Some(secs) = lookup(ENV_TIMEOUT_SECS) {
			let secs = secs.trim().parse::<u64>().map_err(|e| {
				ConfigError::invalid_value(ENV_TIMEOUT_SECS, format!("{secs:?}: {e}"))
			})?;
			self.timeout_secs = Some(secs);
		}
		Ok(())
	}

	pub fn validate(&self) -> Result<(), ConfigError> {
		if self.program.as_os_str().is_empty() {
			return Err(ConfigError::invalid_value("program", "must not be empty"));
		}
		if self.default_tag.trim().is_empty() {
			return Err(ConfigError::invalid_value("default_tag", "must not be empty"));
		}
		if self.default_tag.chars().any(char::is_whitespace) {
			return Err(ConfigError::invalid_value(
				"default_tag",
				"must not contain whitespace",
			));
		}
		if self.timeout_secs == Some(0) {
			return Err(ConfigError::invalid_value(
				"timeout_secs",
				"must be greater than zero",
			));
		}
		Ok(())
	}

	pub fn timeout(&self) -> Option<Duration> {
		self.timeout_secs.map(Duration::from_secs)
	}
}

/// Loads configuration from defaults, an optional file and the environment.
pub fn load_config(path: Option<&Path>) -> Result<GitInfoConfig, ConfigError> {
	let mut config = match path {
		Some(path) => GitInfoConfig::load(path)?,
		None => GitInfoConfig::default(),
	};
	config.apply_env_overrides()?;
	config.validate()?;
	Ok(config)
}
