//! # Contextizer
//!
//! `contextizer` scans a project directory and produces one text document holding a
//! `tree`-style diagram of the project followed by the contents of its files. The result is
//! meant to be pasted whole into a language model's context window.
//!
//! Filtering combines compiled-in defaults (VCS and dependency directories, lock files,
//! images and other binary formats, hidden entries) with an optional `.llmignore` file at the
//! project root. Log-like files (`.csv`, `.log`, `.tsv`, `.jsonl`, `.sql`) are cut to their
//! first ten lines, and files containing NUL bytes are reported as binary instead of dumped.
//!
//! # Example
//!
//! ```no_run
//! use contextizer::{ContextBuilder, TreeWalker, output};
//!
//! let options = ContextBuilder::new(".")
//!     .directive("*.secret")
//!     .build();
//!
//! let walker = TreeWalker::new(&options).expect("Invalid project root");
//! let mut stdout = std::io::stdout().lock();
//! output::write_text_report(&walker, &mut stdout, true).expect("Failed to write report");
//! ```

mod engine;
mod error;
mod options;
pub mod output;
mod rules;
mod tree;
mod types;

pub use engine::{FileStream, MAX_TRUNCATE_LINES, TRUNCATE_EXTENSIONS, TreeWalker};
pub use error::ContextizerError;
pub use options::{ContextBuilder, ContextOptions};
pub use rules::{
    DEFAULT_IGNORE_DIRS, DEFAULT_IGNORE_EXTENSIONS, DEFAULT_IGNORE_FILES, Directive,
    ExclusionGuard, HIDDEN_DIR_EXEMPTION, IgnoreRuleSet, OVERRIDE_FILE_NAME,
    OVERRIDE_TEMPLATE_NAME,
};
pub use types::{FileContent, FileEntry, Snapshot};
