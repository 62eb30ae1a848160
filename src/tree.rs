//! Internal module for the structural pass: the `tree`-style diagram.

use crate::rules::IgnoreRuleSet;
use std::fs;
use std::io::{self, ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

const BRANCH: &str = "├── ";
const LAST_BRANCH: &str = "└── ";
const PIPE: &str = "│   ";
const BLANK: &str = "    ";

const ACCESS_DENIED: &str = "[ACCESS DENIED]";

struct Child {
    path: PathBuf,
    name: String,
    is_dir: bool,
}

/// Writes one line per visible entry below `dir`, directories first and
/// then case-insensitively by name.
///
/// A directory that cannot be listed for lack of permission gets a single
/// `[ACCESS DENIED]` line at its indentation; its siblings are still printed.
/// Symlinked directories are followed. `ancestors` holds the canonical
/// paths of the directories being descended; a child resolving to one of
/// them is printed but not entered again.
pub(crate) fn write_tree<W: Write>(
    rules: &IgnoreRuleSet,
    dir: &Path,
    prefix: &str,
    ancestors: &mut Vec<PathBuf>,
    out: &mut W,
) -> io::Result<()> {
    let read = match fs::read_dir(dir) {
        Ok(read) => read,
        Err(e) if e.kind() == ErrorKind::PermissionDenied => {
            writeln!(out, "{}{}", prefix, ACCESS_DENIED)?;
            return Ok(());
        }
        Err(e) => {
            warn!("Cannot list {}: {}", dir.display(), e);
            return Ok(());
        }
    };

    let mut children: Vec<Child> = read
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                debug!("Skipping entry in {}: {}", dir.display(), e);
                None
            }
        })
        .map(|entry| {
            let path = entry.path();
            Child {
                name: entry.file_name().to_string_lossy().into_owned(),
                is_dir: path.is_dir(),
                path,
            }
        })
        .collect();
    children.sort_by_cached_key(|c| (!c.is_dir, c.name.to_lowercase(), c.name.clone()));
    children.retain(|c| !rules.should_ignore(&c.path));

    let count = children.len();
    for (i, child) in children.iter().enumerate() {
        let is_last = i + 1 == count;
        let connector = if is_last { LAST_BRANCH } else { BRANCH };
        writeln!(out, "{}{}{}", prefix, connector, child.name)?;

        if !child.is_dir {
            continue;
        }
        let canonical = match fs::canonicalize(&child.path) {
            Ok(canonical) => canonical,
            Err(e) => {
                debug!("Not descending into {}: {}", child.path.display(), e);
                continue;
            }
        };
        if ancestors.contains(&canonical) {
            debug!("Symlink cycle at {}", child.path.display());
            continue;
        }
        let extension = if is_last { BLANK } else { PIPE };
        ancestors.push(canonical);
        let result = write_tree(
            rules,
            &child.path,
            &format!("{}{}", prefix, extension),
            ancestors,
            out,
        );
        ancestors.pop();
        result?;
    }
    Ok(())
}
