use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// What the content pass produced for one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FileContent {
    /// The whole file, lossily decoded as UTF-8.
    Full { text: String },
    /// The first `lines` lines of a file in the truncation set, newlines kept.
    Truncated { head: String, lines: usize },
    /// The file contained a NUL byte; nothing is emitted.
    Binary,
    /// Opening or reading failed. The walk carries on with the next file.
    Unreadable { reason: String },
}

/// A single file from the content pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileEntry {
    /// Path relative to the scan root, or absolute if it lies outside it.
    pub path: PathBuf,
    pub content: FileContent,
}

/// Both passes collected in memory, for JSON output.
#[derive(Debug, Serialize, Deserialize)]
pub struct Snapshot {
    /// Display name of the scan root.
    pub root: String,
    /// The tree diagram exactly as the text report prints it.
    pub tree: String,
    /// File blocks in emission order. Empty in tree-only mode.
    pub files: Vec<FileEntry>,
}
