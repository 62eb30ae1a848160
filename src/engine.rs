use crate::error::ContextizerError;
use crate::options::ContextOptions;
use crate::output;
use crate::rules::{ExclusionGuard, IgnoreRuleSet, lowercase_extension};
use crate::tree::write_tree;
use crate::types::{FileContent, FileEntry, Snapshot};
use ignore::WalkBuilder;
use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, ErrorKind, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// Extensions whose content is cut to [`MAX_TRUNCATE_LINES`] lines.
pub const TRUNCATE_EXTENSIONS: &[&str] = &[".csv", ".log", ".tsv", ".jsonl", ".sql"];
pub const MAX_TRUNCATE_LINES: usize = 10;

const FIRST_CHUNK: u64 = 4096;

struct Walker {
    inner: ignore::Walk,
}
impl Walker {
    fn new(root: &Path, rules: Arc<IgnoreRuleSet>) -> Self {
        let mut builder = WalkBuilder::new(root);
        builder
            .standard_filters(false)
            .follow_links(false)
            // One stat per comparison; ignore only hands the comparator paths.
            .sort_by_file_path(|a, b| {
                a.is_dir()
                    .cmp(&b.is_dir())
                    .then_with(|| a.file_name().cmp(&b.file_name()))
            })
            .filter_entry(move |entry| !rules.should_ignore(entry.path()));
        Self {
            inner: builder.build(),
        }
    }
}

/// Owns the scan root and the frozen rule set, and runs both passes.
#[derive(Debug, Clone)]
pub struct TreeWalker {
    root: PathBuf,
    rules: Arc<IgnoreRuleSet>,
}

impl TreeWalker {
    /// Resolves the root and builds the rule set described by `options`.
    ///
    /// # Errors
    ///
    /// Fails if the root does not exist or is not a directory. Nothing
    /// else about the scan is fatal.
    pub fn new(options: &ContextOptions) -> Result<Self, ContextizerError> {
        let root = resolve_root(&options.root)?;
        let mut rules = IgnoreRuleSet::with_defaults(&root);
        if options.load_override_file {
            rules = rules.with_override_file();
        }
        rules = rules.with_directives(&options.extra_directives);
        if let Some(path) = &options.exclude_path {
            rules = rules.with_guard(ExclusionGuard::new(path));
        }
        Ok(Self::with_rules(root, rules))
    }

    /// Uses a prepared rule set. `root` should already be canonical.
    pub fn with_rules(root: PathBuf, rules: IgnoreRuleSet) -> Self {
        Self {
            root,
            rules: Arc::new(rules),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn rules(&self) -> &IgnoreRuleSet {
        &self.rules
    }

    /// The root's final path component, or the full path for `/`.
    pub fn root_name(&self) -> String {
        self.root
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.root.display().to_string())
    }

    /// Structural pass.
    pub fn print_tree<W: Write>(&self, out: &mut W) -> Result<(), ContextizerError> {
        let mut ancestors = vec![self.root.clone()];
        write_tree(&self.rules, &self.root, "", &mut ancestors, out)?;
        Ok(())
    }

    /// Content pass: one block per file, written as soon as it is read.
    pub fn dump_contents<W: Write>(&self, out: &mut W) -> Result<(), ContextizerError> {
        for entry in self.files() {
            output::write_file_block(out, &entry)?;
        }
        Ok(())
    }

    /// The content pass as an iterator. Files of a directory come before
    /// its subdirectories; both are sorted by name.
    pub fn files(&self) -> FileStream {
        FileStream {
            walker: Walker::new(&self.root, Arc::clone(&self.rules)),
            root: self.root.clone(),
        }
    }

    /// Runs the structural pass, and the content pass if `with_contents`.
    pub fn snapshot(&self, with_contents: bool) -> Result<Snapshot, ContextizerError> {
        let mut tree = Vec::new();
        self.print_tree(&mut tree)?;
        let files = if with_contents {
            self.files().collect()
        } else {
            Vec::new()
        };
        Ok(Snapshot {
            root: self.root_name(),
            tree: String::from_utf8_lossy(&tree).into_owned(),
            files,
        })
    }
}

fn resolve_root(root: &Path) -> Result<PathBuf, ContextizerError> {
    let resolved = match fs::canonicalize(root) {
        Ok(resolved) => resolved,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            let shown = std::path::absolute(root).unwrap_or_else(|_| root.to_path_buf());
            return Err(ContextizerError::MissingRoot(shown));
        }
        Err(e) => return Err(ContextizerError::io(root, e)),
    };
    if !resolved.is_dir() {
        return Err(ContextizerError::NotADirectory(resolved));
    }
    Ok(resolved)
}

/// Streaming content pass, yielding one [`FileEntry`] per visible file.
pub struct FileStream {
    walker: Walker,
    root: PathBuf,
}

impl Iterator for FileStream {
    type Item = FileEntry;
    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let entry = match self.walker.inner.next()? {
                Ok(entry) => entry,
                Err(e) => {
                    debug!("Skipping unreadable entry: {}", e);
                    continue;
                }
            };
            if entry.depth() == 0 || !entry.path().is_file() {
                continue;
            }
            let path = entry.into_path();
            let content = read_file_content(&path).unwrap_or_else(|e| FileContent::Unreadable {
                reason: e.to_string(),
            });
            let display = path
                .strip_prefix(&self.root)
                .map(Path::to_path_buf)
                .unwrap_or_else(|_| path.clone());
            return Some(FileEntry {
                path: display,
                content,
            });
        }
    }
}

fn is_truncated(path: &Path) -> bool {
    lowercase_extension(path).is_some_and(|ext| TRUNCATE_EXTENSIONS.contains(&ext.as_str()))
}

/// Reads one file under the emission policy. The handle is dropped before
/// returning on every path.
fn read_file_content(path: &Path) -> io::Result<FileContent> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);

    if is_truncated(path) {
        let mut head = String::new();
        let mut lines = 0;
        let mut buf = Vec::new();
        while lines < MAX_TRUNCATE_LINES {
            buf.clear();
            if !read_text_line(&mut reader, &mut buf)? {
                break;
            }
            head.push_str(&String::from_utf8_lossy(&buf));
            lines += 1;
        }
        return Ok(FileContent::Truncated { head, lines });
    }

    let mut bytes = Vec::with_capacity(FIRST_CHUNK as usize);
    reader.by_ref().take(FIRST_CHUNK).read_to_end(&mut bytes)?;
    if bytes.contains(&0) && content_inspector::inspect(&bytes).is_binary() {
        debug!("Binary file detected: {}", path.display());
        return Ok(FileContent::Binary);
    }
    reader.read_to_end(&mut bytes)?;
    if bytes.contains(&0) {
        debug!("Binary file detected: {}", path.display());
        return Ok(FileContent::Binary);
    }
    Ok(FileContent::Full {
        text: String::from_utf8_lossy(&bytes).into_owned(),
    })
}

/// Reads one line into `line`, ending at `\n`, `\r\n` or a lone `\r`. The
/// terminator is written as `\n`. Returns false at end of input.
fn read_text_line<R: BufRead>(reader: &mut R, line: &mut Vec<u8>) -> io::Result<bool> {
    loop {
        let available = reader.fill_buf()?;
        if available.is_empty() {
            return Ok(!line.is_empty());
        }
        match available.iter().position(|&b| b == b'\n' || b == b'\r') {
            Some(i) => {
                let carriage_return = available[i] == b'\r';
                line.extend_from_slice(&available[..i]);
                line.push(b'\n');
                reader.consume(i + 1);
                if carriage_return && reader.fill_buf()?.first() == Some(&b'\n') {
                    reader.consume(1);
                }
                return Ok(true);
            }
            None => {
                let n = available.len();
                line.extend_from_slice(available);
                reader.consume(n);
            }
        }
    }
}
