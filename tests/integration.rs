use contextizer::{ContextBuilder, FileContent, IgnoreRuleSet, Snapshot, TreeWalker, output};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

fn tree_of(walker: &TreeWalker) -> String {
    let mut buf = Vec::new();
    walker.print_tree(&mut buf).unwrap();
    String::from_utf8(buf).unwrap()
}

fn paths_of(walker: &TreeWalker) -> Vec<PathBuf> {
    walker.files().map(|f| f.path).collect()
}

fn sample_project(root: &Path) {
    fs::create_dir_all(root.join("a/.git")).unwrap();
    fs::write(root.join("a/b.txt"), "hello").unwrap();
    fs::write(root.join("a/.git/config"), "[core]").unwrap();
    let rows: String = (1..=15).map(|i| format!("{},{}\n", i, i * 2)).collect();
    fs::write(root.join("data.csv"), rows).unwrap();
    fs::write(root.join("img.png"), [0x89, b'P', b'N', b'G']).unwrap();
}

#[test]
fn integration_full_flow() {
    let dir = tempdir().unwrap();
    sample_project(dir.path());
    let walker = TreeWalker::new(&ContextBuilder::new(dir.path()).build()).unwrap();

    assert_eq!(tree_of(&walker), "├── a\n│   └── b.txt\n└── data.csv\n");

    let files: Vec<_> = walker.files().collect();
    assert_eq!(files.len(), 2);
    assert_eq!(files[0].path, PathBuf::from("data.csv"));
    match &files[0].content {
        FileContent::Truncated { head, lines } => {
            assert_eq!(*lines, 10);
            assert_eq!(head.lines().count(), 10);
            assert!(head.starts_with("1,2\n"));
            assert!(!head.contains("11,22"));
        }
        other => panic!("expected truncation, got {:?}", other),
    }
    assert_eq!(files[1].path, Path::new("a").join("b.txt"));
    assert_eq!(
        files[1].content,
        FileContent::Full {
            text: "hello".into()
        }
    );
}

#[test]
fn integration_text_report_layout() {
    let dir = tempdir().unwrap();
    sample_project(dir.path());
    let walker = TreeWalker::new(&ContextBuilder::new(dir.path()).build()).unwrap();
    let mut buf = Vec::new();
    output::write_text_report(&walker, &mut buf, true).unwrap();
    let report = String::from_utf8(buf).unwrap();

    let header = format!(
        "PROJECT STRUCTURE:\n==================\nRoot: {}\n├── a\n",
        walker.root_name()
    );
    assert!(report.starts_with(&header));
    assert!(report.contains("└── data.csv\n\n\nPROJECT FILE CONTENTS:\n\n"));
    assert!(report.contains("FILE: data.csv\n"));
    assert!(report.contains("\nhello\n"));
    assert!(report.ends_with("hello\n"));
    assert!(!report.contains("img.png"));
    assert!(!report.contains("[core]"));
    assert!(report.find("FILE: data.csv").unwrap() < report.find("b.txt\n=").unwrap());
}

#[test]
fn integration_tree_only_json() {
    let dir = tempdir().unwrap();
    sample_project(dir.path());
    let walker = TreeWalker::new(&ContextBuilder::new(dir.path()).build()).unwrap();
    let mut buf = Vec::new();
    output::write_json_report(&walker, &mut buf, false, false).unwrap();
    let snapshot: Snapshot = serde_json::from_slice(&buf).unwrap();
    assert_eq!(snapshot.root, walker.root_name());
    assert_eq!(snapshot.tree, tree_of(&walker));
    assert!(snapshot.files.is_empty());
}

#[test]
fn integration_override_rules_prune_both_passes() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    fs::write(root.join(".llmignore"), "# extra rules\n\n*.secret\nnotes/\n").unwrap();
    fs::write(root.join("key.secret"), "hunter2").unwrap();
    fs::write(root.join("keep.txt"), "keep").unwrap();
    fs::create_dir_all(root.join("sub/notes")).unwrap();
    fs::write(root.join("sub/notes/z.txt"), "hidden").unwrap();
    fs::write(root.join("sub/deep.secret"), "hidden").unwrap();
    fs::create_dir(root.join("Notes")).unwrap();
    fs::write(root.join("Notes/y.txt"), "visible").unwrap();

    let walker = TreeWalker::new(&ContextBuilder::new(root).build()).unwrap();
    assert_eq!(
        tree_of(&walker),
        "├── Notes\n│   └── y.txt\n├── sub\n├── .llmignore\n└── keep.txt\n"
    );
    assert_eq!(
        paths_of(&walker),
        vec![
            PathBuf::from(".llmignore"),
            PathBuf::from("keep.txt"),
            Path::new("Notes").join("y.txt"),
        ]
    );
}

#[test]
fn integration_default_exclusions() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    fs::create_dir_all(root.join("node_modules/pkg")).unwrap();
    fs::write(root.join("node_modules/pkg/index.js"), "x").unwrap();
    fs::create_dir(root.join(".cache")).unwrap();
    fs::write(root.join(".cache/blob"), "x").unwrap();
    fs::write(root.join(".env"), "SECRET=1").unwrap();
    fs::write(root.join("yarn.lock"), "x").unwrap();
    fs::write(root.join("PHOTO.JPG"), "x").unwrap();
    fs::write(root.join("main.rs"), "fn main() {}").unwrap();

    let walker = TreeWalker::new(&ContextBuilder::new(root).build()).unwrap();
    assert_eq!(tree_of(&walker), "└── main.rs\n");
    assert_eq!(paths_of(&walker), vec![PathBuf::from("main.rs")]);
}

#[test]
fn integration_cli_directives() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.md"), "a").unwrap();
    fs::write(dir.path().join("b.rs"), "b").unwrap();
    let options = ContextBuilder::new(dir.path()).directive("*.md").build();
    let walker = TreeWalker::new(&options).unwrap();
    assert_eq!(paths_of(&walker), vec![PathBuf::from("b.rs")]);
}

#[test]
fn integration_tree_ordering_is_deterministic() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    for name in ["zeta.txt", "Alpha.txt", "beta.txt"] {
        fs::write(root.join(name), name).unwrap();
    }
    for name in ["src", "Docs", "assets"] {
        fs::create_dir(root.join(name)).unwrap();
        fs::write(root.join(name).join("f.txt"), "f").unwrap();
    }
    let walker = TreeWalker::new(&ContextBuilder::new(root).build()).unwrap();
    let first = tree_of(&walker);
    assert_eq!(first, tree_of(&walker));
    let top: Vec<&str> = first
        .lines()
        .filter(|l| !l.starts_with('│') && !l.starts_with(' '))
        .map(|l| l.trim_start_matches("├── ").trim_start_matches("└── "))
        .collect();
    assert_eq!(
        top,
        vec!["assets", "Docs", "src", "Alpha.txt", "beta.txt", "zeta.txt"]
    );

    // The content pass sorts by byte order, files before subdirectories.
    assert_eq!(
        paths_of(&walker),
        vec![
            PathBuf::from("Alpha.txt"),
            PathBuf::from("beta.txt"),
            PathBuf::from("zeta.txt"),
            Path::new("Docs").join("f.txt"),
            Path::new("assets").join("f.txt"),
            Path::new("src").join("f.txt"),
        ]
    );
}

#[test]
fn integration_output_file_excluded() {
    let dir = tempdir().unwrap();
    let root = fs::canonicalize(dir.path()).unwrap();
    fs::write(root.join("report.txt"), "previous run").unwrap();
    fs::write(root.join("notes.txt"), "keep").unwrap();
    let options = ContextBuilder::new(&root)
        .exclude_path(Some(root.join("report.txt")))
        .build();
    let walker = TreeWalker::new(&options).unwrap();
    assert_eq!(paths_of(&walker), vec![PathBuf::from("notes.txt")]);
    assert!(!tree_of(&walker).contains("report.txt"));
}

#[cfg(unix)]
#[test]
fn integration_access_denied_marker() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempdir().unwrap();
    let root = dir.path();
    let locked = root.join("locked");
    fs::create_dir(&locked).unwrap();
    fs::write(locked.join("inner.txt"), "x").unwrap();
    fs::create_dir(root.join("open")).unwrap();
    fs::write(root.join("open/f.txt"), "x").unwrap();
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

    // Privileged users can still list the directory; nothing to check then.
    if fs::read_dir(&locked).is_ok() {
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
        return;
    }

    let walker = TreeWalker::new(&ContextBuilder::new(root).build()).unwrap();
    let tree = tree_of(&walker);
    let paths = paths_of(&walker);
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

    assert_eq!(
        tree,
        "├── locked\n│   [ACCESS DENIED]\n└── open\n    └── f.txt\n"
    );
    assert_eq!(paths, vec![Path::new("open").join("f.txt")]);
}

#[cfg(unix)]
#[test]
fn integration_unreadable_file_reported_inline() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempdir().unwrap();
    let secret = dir.path().join("a.txt");
    fs::write(&secret, "x").unwrap();
    fs::write(dir.path().join("b.txt"), "fine").unwrap();
    fs::set_permissions(&secret, fs::Permissions::from_mode(0o000)).unwrap();
    if fs::read(&secret).is_ok() {
        return;
    }

    let walker = TreeWalker::new(&ContextBuilder::new(dir.path()).build()).unwrap();
    let files: Vec<_> = walker.files().collect();
    fs::set_permissions(&secret, fs::Permissions::from_mode(0o644)).unwrap();

    assert_eq!(files.len(), 2);
    assert!(matches!(files[0].content, FileContent::Unreadable { .. }));
    assert_eq!(
        files[1].content,
        FileContent::Full {
            text: "fine".into()
        }
    );
}

#[cfg(unix)]
#[test]
fn integration_symlinked_dir_followed_in_tree_only() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    fs::create_dir(root.join("real")).unwrap();
    fs::write(root.join("real/f.txt"), "f").unwrap();
    std::os::unix::fs::symlink(root.join("real"), root.join("link")).unwrap();

    let walker = TreeWalker::new(&ContextBuilder::new(root).build()).unwrap();
    assert_eq!(
        tree_of(&walker),
        "├── link\n│   └── f.txt\n└── real\n    └── f.txt\n"
    );
    assert_eq!(paths_of(&walker), vec![Path::new("real").join("f.txt")]);
}

#[cfg(unix)]
#[test]
fn integration_symlink_cycle_printed_once() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    fs::create_dir(root.join("real")).unwrap();
    fs::write(root.join("real/f.txt"), "f").unwrap();
    std::os::unix::fs::symlink(root.join("real"), root.join("real/again")).unwrap();

    let walker = TreeWalker::new(&ContextBuilder::new(root).build()).unwrap();
    assert_eq!(
        tree_of(&walker),
        "└── real\n    ├── again\n    └── f.txt\n"
    );
}

#[cfg(unix)]
#[test]
fn integration_unreadable_override_falls_back_to_defaults() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempdir().unwrap();
    let root = dir.path();
    let override_file = root.join(".llmignore");
    fs::write(&override_file, "*.txt\n").unwrap();
    fs::write(root.join("a.txt"), "a").unwrap();
    fs::write(root.join("yarn.lock"), "x").unwrap();
    fs::set_permissions(&override_file, fs::Permissions::from_mode(0o000)).unwrap();

    // Privileged users can still read the file; nothing to check then.
    if fs::read(&override_file).is_ok() {
        fs::set_permissions(&override_file, fs::Permissions::from_mode(0o644)).unwrap();
        return;
    }

    let walker = TreeWalker::new(&ContextBuilder::new(root).build()).unwrap();
    let paths = paths_of(&walker);
    fs::set_permissions(&override_file, fs::Permissions::from_mode(0o644)).unwrap();

    assert!(paths.contains(&PathBuf::from("a.txt")));
    assert!(!paths.contains(&PathBuf::from("yarn.lock")));
    assert!(!walker.rules().ignores_file_name("b.txt"));
}

#[test]
fn integration_git_dir_visible_without_defaults() {
    let dir = tempdir().unwrap();
    let root = fs::canonicalize(dir.path()).unwrap();
    fs::write(root.join(".llmignore"), "*.md\n").unwrap();
    fs::create_dir_all(root.join("a/.git")).unwrap();
    fs::create_dir(root.join("a/.hidden")).unwrap();
    fs::write(root.join("a/.git/config"), "[core]").unwrap();
    fs::write(root.join("a/readme.md"), "skip").unwrap();

    let rules = IgnoreRuleSet::empty(&root).with_override_file();
    let walker = TreeWalker::with_rules(root.clone(), rules);
    assert_eq!(
        tree_of(&walker),
        "├── a\n│   └── .git\n│       └── config\n└── .llmignore\n"
    );
    assert_eq!(walker.root(), root.as_path());
    assert!(walker.rules().ignores_file_name("notes.md"));
}
