// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! `stamp`: print git repository metadata for build scripts.

use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use stamp_git::{GitInfoConfig, GitInfoExtractor};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod output;

use output::Format;

/// Print git repository metadata for build scripts.
#[derive(Parser, Debug)]
#[command(name = "stamp", about = "Print git repository metadata for build scripts", version)]
struct Args {
	/// Directory inside the checkout to inspect
	#[arg(short = 'C', long, default_value = ".")]
	dir: PathBuf,

	/// TOML configuration file
	#[arg(long, env = "STAMP_CONFIG")]
	config: Option<PathBuf>,

	/// Git executable to run
	#[arg(long)]
	program: Option<PathBuf>,

	/// Tag reported when no tag is reachable from HEAD
	#[arg(long)]
	default_tag: Option<String>,

	/// Give up after this many seconds
	#[arg(long)]
	timeout: Option<u64>,

	/// Exit non-zero on soft failures (no tag, dirty tree) after printing
	#[arg(long)]
	strict: bool,

	/// Log filter used when RUST_LOG is unset
	#[arg(long, default_value = "warn")]
	log_level: String,

	#[command(subcommand)]
	command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
	/// Show the template view of the repository
	Show {
		#[arg(long, value_enum, default_value_t = Format::Text)]
		format: Format,
	},
	/// Print NAME=value lines
	Env {
		/// Prefix for every variable name
		#[arg(long, default_value = "GIT_")]
		prefix: String,

		/// Emit cargo:rustc-env= directives for build scripts
		#[arg(long)]
		cargo: bool,
	},
}

#[tokio::main]
async fn main() -> Result<()> {
	let args = Args::parse();

	// Logs go to stderr; stdout is for the record.
	tracing_subscriber::registry()
		.with(
			tracing_subscriber::EnvFilter::try_from_default_env()
				.unwrap_or_else(|_| args.log_level.clone().into()),
		)
		.with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
		.init();

	let mut config =
		stamp_git::load_config(args.config.as_deref()).context("failed to load configuration")?;
	apply_cli_overrides(&mut config, &args);
	config.validate().context("invalid configuration")?;

	let cancel = CancellationToken::new();
	let _stop_watcher = cancel.clone().drop_guard();
	spawn_cancel_watcher(cancel.clone(), config.timeout());

	let extraction = GitInfoExtractor::from_config(&config)
		.extract(&cancel, &args.dir)
		.await;

	let (info, error) = extraction.into_parts();
	let soft_error = match error {
		Some(err) if !err.is_soft() => {
			return Err(anyhow::Error::new(err).context(format!(
				"failed to read git info from {}",
				args.dir.display()
			)));
		}
		Some(err) => {
			tracing::warn!(error = %err, "git info is incomplete");
			Some(err)
		}
		None => None,
	};

	let tpl = info.template_value();
	let mut stdout = std::io::stdout().lock();
	match &args.command {
		Command::Show { format } => output::write_show(&mut stdout, &tpl, *format)?,
		Command::Env { prefix, cargo: true } => tpl.write_cargo_env(&mut stdout, prefix)?,
		Command::Env { prefix, cargo: false } => tpl.write_env(&mut stdout, prefix)?,
	}
	stdout.flush()?;

	if let (true, Some(err)) = (args.strict, soft_error) {
		return Err(anyhow::Error::new(err).context("refusing soft failure in strict mode"));
	}
	Ok(())
}

fn apply_cli_overrides(config: &mut GitInfoConfig, args: &Args) {
	if let Some(program) = &args.program {
		config.program = program.clone();
	}
	if let Some(tag) = &args.default_tag {
		config.default_tag = tag.clone();
	}
	if let Some(secs) = args.timeout {
		config.timeout_secs = Some(secs);
	}
}

/// Cancels `cancel` on Ctrl-C or when `timeout` elapses.
fn spawn_cancel_watcher(cancel: CancellationToken, timeout: Option<Duration>) {
	tokio::spawn(async move {
		let deadline = async {
			match timeout {
				Some(timeout) => tokio::time::sleep(timeout).await,
				None => std::future::pending::<()>().await,
			}
		};

		tokio::select! {
			_ = cancel.cancelled() => {}
			_ = tokio::signal::ctrl_c() => {
				tracing::warn!("interrupted, cancelling git queries");
				cancel.cancel();
			}
			_ = deadline => {
				tracing::warn!(timeout = ?timeout, "timed out, cancelling git queries");
				cancel.cancel();
			}
		}
	});
}
