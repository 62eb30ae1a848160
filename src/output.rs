//! Output formatting for contextizer reports.
//!
//! The text report is streamed: the banner and tree first, then one block
//! per file as the content pass reaches it. The JSON report collects a
//! [`Snapshot`](crate::Snapshot) and serializes it in one go.

use crate::engine::{MAX_TRUNCATE_LINES, TreeWalker};
use crate::error::ContextizerError;
use crate::types::{FileContent, FileEntry};
use std::io::{self, Write};

pub const STRUCTURE_BANNER: &str = "PROJECT STRUCTURE:";
pub const CONTENTS_BANNER: &str = "PROJECT FILE CONTENTS:";
pub const BINARY_MARKER: &str = "[BINARY CONTENT DETECTED - SKIPPED]";
pub const HIDDEN_MARKER: &str = "... [REMAINING CONTENT HIDDEN] ...";

const RULE_WIDTH: usize = 80;

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Writes the report in `format`. `pretty` only affects JSON.
pub fn write_report<W: Write>(
    walker: &TreeWalker,
    out: &mut W,
    format: OutputFormat,
    with_contents: bool,
    pretty: bool,
) -> Result<(), ContextizerError> {
    match format {
        OutputFormat::Text => write_text_report(walker, out, with_contents),
        OutputFormat::Json => write_json_report(walker, out, with_contents, pretty),
    }
}

/// Writes the banner, the root name and the tree diagram.
pub fn write_structure<W: Write>(walker: &TreeWalker, out: &mut W) -> Result<(), ContextizerError> {
    writeln!(out, "{}", STRUCTURE_BANNER)?;
    writeln!(out, "{}", "=".repeat(STRUCTURE_BANNER.len()))?;
    writeln!(out, "Root: {}", walker.root_name())?;
    walker.print_tree(out)
}

/// Writes the full text report: structure, separator, then every file block.
pub fn write_text_report<W: Write>(
    walker: &TreeWalker,
    out: &mut W,
    with_contents: bool,
) -> Result<(), ContextizerError> {
    write_structure(walker, out)?;
    if with_contents {
        write!(out, "\n\n{}\n", CONTENTS_BANNER)?;
        walker.dump_contents(out)?;
    }
    out.flush()?;
    Ok(())
}

/// Serializes a snapshot of both passes as JSON.
pub fn write_json_report<W: Write>(
    walker: &TreeWalker,
    out: &mut W,
    with_contents: bool,
    pretty: bool,
) -> Result<(), ContextizerError> {
    let snapshot = walker.snapshot(with_contents)?;
    if pretty {
        serde_json::to_writer_pretty(&mut *out, &snapshot)?;
    } else {
        serde_json::to_writer(&mut *out, &snapshot)?;
    }
    writeln!(out)?;
    out.flush()?;
    Ok(())
}

/// Writes one per-file block: separator rule, `FILE:` line, rule, body.
pub fn write_file_block<W: Write>(out: &mut W, entry: &FileEntry) -> io::Result<()> {
    let rule = "=".repeat(RULE_WIDTH);
    writeln!(out)?;
    writeln!(out, "{}", rule)?;
    writeln!(out, "FILE: {}", entry.path.display())?;
    writeln!(out, "{}", rule)?;
    writeln!(out)?;

    match &entry.content {
        FileContent::Full { text } => writeln!(out, "{}", text),
        FileContent::Truncated { head, .. } => {
            writeln!(
                out,
                "[NOTE: File truncated to first {} lines]",
                MAX_TRUNCATE_LINES
            )?;
            writeln!(out)?;
            write!(out, "{}", head)?;
            writeln!(out)?;
            writeln!(out, "{}", HIDDEN_MARKER)
        }
        FileContent::Binary => writeln!(out, "{}", BINARY_MARKER),
        FileContent::Unreadable { reason } => writeln!(out, "[ERROR READING FILE: {}]", reason),
    }
}

/// [`write_file_block`] into a `String`.
pub fn format_file_block(entry: &FileEntry) -> String {
    let mut buf = Vec::new();
    // Writing into a Vec cannot fail.
    let _ = write_file_block(&mut buf, entry);
    String::from_utf8_lossy(&buf).into_owned()
}
