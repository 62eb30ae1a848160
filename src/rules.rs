//! Ignore rules: compiled-in defaults merged with a project's `.llmignore`.
//!
//! The override file holds one directive per line:
//!
//! - blank lines and lines starting with `#` are comments,
//! - `name/` ignores directories called `name`,
//! - `*.ext` ignores files with extension `.ext` (case-insensitive),
//! - anything else ignores files with exactly that base name.
//!
//! Directives only ever add to the defaults. The single hardcoded
//! exception is the override file itself, which is never hidden.

use std::collections::HashSet;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Name of the project-local override file, looked up at the scan root.
pub const OVERRIDE_FILE_NAME: &str = ".llmignore";
/// Template variant of the override file, exempt like the file itself.
pub const OVERRIDE_TEMPLATE_NAME: &str = ".llmignore.example";
/// The only hidden directory name not suppressed by the dot-prefix rule.
pub const HIDDEN_DIR_EXEMPTION: &str = ".git";

pub const DEFAULT_IGNORE_DIRS: &[&str] = &[
    ".git",
    "node_modules",
    "__pycache__",
    "venv",
    ".venv",
    "env",
    ".idea",
    ".vscode",
    "runs",
    "dist",
    "build",
    "coverage",
    ".pytest_cache",
    ".mypy_cache",
    "tmp",
    "temp",
    "obj",
    "bin",
];

pub const DEFAULT_IGNORE_FILES: &[&str] = &[
    ".DS_Store",
    "Thumbs.db",
    "package-lock.json",
    "yarn.lock",
    "pnpm-lock.yaml",
    "poetry.lock",
    "Gemfile.lock",
];

pub const DEFAULT_IGNORE_EXTENSIONS: &[&str] = &[
    ".png", ".jpg", ".jpeg", ".gif", ".svg", ".ico", ".webp", ".exe", ".bin", ".dll", ".so",
    ".dylib", ".class", ".jar", ".zip", ".tar", ".gz", ".pdf", ".pyc", ".pyo", ".woff", ".woff2",
    ".ttf", ".eot", ".mp4", ".mp3",
];

/// A single parsed line of the override file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    /// `name/`: exclude directories with this exact base name.
    Dir(String),
    /// `*.ext`: exclude files with this extension, stored lower-cased with its dot.
    Extension(String),
    /// Any other line: exclude files with this exact base name.
    File(String),
}

impl Directive {
    /// Parses one override line. Returns `None` for blanks and comments.
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return None;
        }
        if let Some(dir) = line.strip_suffix('/') {
            return Some(Directive::Dir(dir.to_string()));
        }
        if line.starts_with("*.") {
            return Some(Directive::Extension(line[1..].to_lowercase()));
        }
        Some(Directive::File(line.to_string()))
    }
}

/// Identifies the tool's own output file so the scan never reads it back.
#[derive(Debug, Clone)]
pub struct ExclusionGuard {
    path: PathBuf,
    resolved: PathBuf,
}

impl ExclusionGuard {
    /// Resolves `path` once. The file does not need to exist yet; in that
    /// case its parent directory is canonicalized instead.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let path = std::path::absolute(&path).unwrap_or(path);
        let resolved = resolve_lenient(&path);
        Self { path, resolved }
    }

    pub fn path(&self) -> &Path {
        &self.resolved
    }

    /// True when `candidate` is the guarded file under any spelling.
    /// A candidate that cannot be resolved counts as covered.
    pub fn covers(&self, candidate: &Path) -> bool {
        if candidate == self.path || candidate == self.resolved {
            return true;
        }
        match fs::canonicalize(candidate) {
            Ok(canonical) => canonical == self.resolved,
            Err(_) => true,
        }
    }
}

fn resolve_lenient(path: &Path) -> PathBuf {
    if let Ok(canonical) = fs::canonicalize(path) {
        return canonical;
    }
    match (path.parent(), path.file_name()) {
        (Some(parent), Some(name)) => fs::canonicalize(parent)
            .map(|parent| parent.join(name))
            .unwrap_or_else(|_| path.to_path_buf()),
        _ => path.to_path_buf(),
    }
}

/// The effective filtering policy for one scan.
///
/// Built once through the consuming constructors below and read-only
/// afterwards; the walker shares it behind an `Arc`.
#[derive(Debug, Clone)]
pub struct IgnoreRuleSet {
    root: PathBuf,
    dir_names: HashSet<String>,
    file_names: HashSet<String>,
    extensions: HashSet<String>,
    guard: Option<ExclusionGuard>,
}

impl IgnoreRuleSet {
    /// Defaults only. `root` is where the override file would live.
    pub fn with_defaults(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            dir_names: DEFAULT_IGNORE_DIRS.iter().map(|s| s.to_string()).collect(),
            file_names: DEFAULT_IGNORE_FILES.iter().map(|s| s.to_string()).collect(),
            extensions: DEFAULT_IGNORE_EXTENSIONS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            guard: None,
        }
    }

    /// A rule set with no defaults at all, only the hardcoded hidden-entry rules.
    pub fn empty(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            dir_names: HashSet::new(),
            file_names: HashSet::new(),
            extensions: HashSet::new(),
            guard: None,
        }
    }

    /// Defaults plus the override file found at `root`, if any.
    pub fn load(root: impl Into<PathBuf>) -> Self {
        Self::with_defaults(root).with_override_file()
    }

    /// Merges `.llmignore` from the root. A missing file is silently
    /// skipped; any other read failure is logged and the rules stay as they are.
    pub fn with_override_file(self) -> Self {
        let path = self.root.join(OVERRIDE_FILE_NAME);
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return self,
            Err(e) if e.kind() == ErrorKind::PermissionDenied => {
                warn!("Permission denied reading {}", path.display());
                return self;
            }
            Err(e) => {
                warn!("Could not read {}: {}", path.display(), e);
                return self;
            }
        };
        let text = String::from_utf8_lossy(&bytes);
        let rules = self.with_directives(text.lines());
        debug!(
            "Loaded {}: {} dirs, {} files, {} extensions ignored",
            path.display(),
            rules.dir_names.len(),
            rules.file_names.len(),
            rules.extensions.len()
        );
        rules
    }

    /// Adds directives written in override-file syntax.
    pub fn with_directives<I, S>(mut self, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for directive in lines.into_iter().filter_map(|l| Directive::parse(l.as_ref())) {
            match directive {
                Directive::Dir(name) => self.dir_names.insert(name),
                Directive::Extension(ext) => self.extensions.insert(ext),
                Directive::File(name) => self.file_names.insert(name),
            };
        }
        self
    }

    pub fn with_guard(mut self, guard: ExclusionGuard) -> Self {
        self.guard = Some(guard);
        self
    }

    pub fn guard(&self) -> Option<&ExclusionGuard> {
        self.guard.as_ref()
    }

    /// Decides whether `path` is left out of both passes.
    ///
    /// Checked in order: the exclusion guard, existence (broken links and
    /// vanished entries are excluded), then the directory or file rules.
    /// Entries that are neither directories nor regular files (sockets,
    /// FIFOs) are excluded so the content pass never blocks on them.
    pub fn should_ignore(&self, path: &Path) -> bool {
        if let Some(guard) = &self.guard {
            if guard.covers(path) {
                return true;
            }
        }
        let metadata = match fs::metadata(path) {
            Ok(metadata) => metadata,
            Err(_) => return true,
        };
        let Some(name) = path.file_name() else {
            return false;
        };
        let name = name.to_string_lossy();
        if metadata.is_dir() {
            self.ignores_dir_name(&name)
        } else if metadata.is_file() {
            self.ignores_file_name(&name)
        } else {
            true
        }
    }

    /// Directory rules by base name alone.
    pub fn ignores_dir_name(&self, name: &str) -> bool {
        if self.dir_names.contains(name) {
            return true;
        }
        name.starts_with('.') && name != HIDDEN_DIR_EXEMPTION
    }

    /// File rules by base name alone.
    pub fn ignores_file_name(&self, name: &str) -> bool {
        if name == OVERRIDE_FILE_NAME || name == OVERRIDE_TEMPLATE_NAME {
            return false;
        }
        if self.file_names.contains(name) || name.starts_with('.') {
            return true;
        }
        lowercase_extension(Path::new(name)).is_some_and(|ext| self.extensions.contains(&ext))
    }
}

/// The lower-cased extension of `path` with its leading dot, e.g. `.csv`.
pub(crate) fn lowercase_extension(path: &Path) -> Option<String> {
    path.extension()
        .map(|ext| ext.to_string_lossy())
        .filter(|ext| !ext.is_empty())
        .map(|ext| format!(".{}", ext.to_lowercase()))
}
