use serde::{Deserialize, Serialize};
use std::path::PathBuf;
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextOptions {
    pub root: PathBuf,
    /// The tool's own output file, excluded from both passes.
    pub exclude_path: Option<PathBuf>,
    /// Extra directives in `.llmignore` syntax, merged after the file.
    pub extra_directives: Vec<String>,
    pub load_override_file: bool,
}
impl Default for ContextOptions {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            exclude_path: None,
            extra_directives: Vec::new(),
            load_override_file: true,
        }
    }
}
#[derive(Debug, Default)]
pub struct ContextBuilder {
    options: ContextOptions,
}
impl ContextBuilder {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            options: ContextOptions {
                root: root.into(),
                ..Default::default()
            },
        }
    }
    pub fn exclude_path(mut self, path: Option<PathBuf>) -> Self {
        self.options.exclude_path = path;
        self
    }
    pub fn directive(mut self, line: impl Into<String>) -> Self {
        self.options.extra_directives.push(line.into());
        self
    }
    pub fn directives(mut self, lines: Vec<String>) -> Self {
        self.options.extra_directives.extend(lines);
        self
    }
    pub fn load_override_file(mut self, yes: bool) -> Self {
        self.options.load_override_file = yes;
        self
    }
    pub fn build(self) -> ContextOptions {
        self.options
    }
}
