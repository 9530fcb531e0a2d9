// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

use std::io::{self, Write};

use clap::ValueEnum;
use stamp_git::TemplateValue;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
	Text,
	Json,
}

pub fn write_show<W: Write>(out: &mut W, tpl: &TemplateValue, format: Format) -> io::Result<()> {
	match format {
		Format::Text => write_text(out, tpl),
		Format::Json => {
			serde_json::to_writer_pretty(&mut *out, tpl)?;
			writeln!(out)
		}
	}
}

fn write_text<W: Write>(out: &mut W, tpl: &TemplateValue) -> io::Result<()> {
	let rows = [
		("Branch", tpl.branch.clone()),
		("CurrentTag", tpl.current_tag.clone()),
		("ShortCommit", tpl.short_commit.clone()),
		("FullCommit", tpl.full_commit.clone()),
		("FirstCommit", tpl.first_commit.clone()),
		("CommitDate", tpl.commit_date.clone()),
		("CommitTimestamp", tpl.commit_timestamp.to_string()),
		("URL", tpl.url.clone()),
		("Summary", tpl.summary.clone()),
		("TagSubject", tpl.tag_subject.clone()),
		("TagContents", tpl.tag_contents.clone()),
		("TagBody", tpl.tag_body.clone()),
		("TreeState", tpl.tree_state.to_string()),
	];

	for (label, value) in rows {
		let mut lines = value.lines();
		writeln!(out, "{:<16} {}", format!("{label}:"), lines.next().unwrap_or_default())?;
		// Continuation lines of multi-line messages line up under the value.
		for line in lines {
			writeln!(out, "{:<16} {line}", "")?;
		}
	}
	Ok(())
}
