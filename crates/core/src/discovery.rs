//! Source file enumeration with gitignore-aware filtering
//!
//! Uses the `ignore` crate (from ripgrep) to respect `.gitignore`, `.ignore`
//! and `.git/info/exclude` files. Ignore files nested in subdirectories are
//! honored hierarchically: the rule closest to a path wins. Only ignore files
//! inside the project root are read.

use anyhow::{Context, Result};
use ignore::overrides::OverrideBuilder;
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Version-control metadata directories that are never walked.
const VCS_DIRS: &[&str] = &[".git", ".hg", ".svn"];

/// Discover files under `root` matching any of the given `extensions`,
/// respecting ignore files and skipping paths that match `ignore_patterns`.
///
/// Returns project-relative paths sorted alphabetically. Unreadable
/// directories and entries are logged and skipped; only an unreadable
/// `root` is an error.
pub fn discover_files(
    root: &Path,
    extensions: &[&str],
    ignore_patterns: &[String],
) -> Result<Vec<PathBuf>> {
    let root = root
        .canonicalize()
        .with_context(|| format!("cannot read project root {}", root.display()))?;

    let mut builder = WalkBuilder::new(&root);
    builder
        .hidden(false) // dotfiles are ordinary sources; VCS dirs are filtered below
        .parents(false) // ignore files above the project root do not apply
        .ignore(true) // respect .ignore
        .git_ignore(true) // respect .gitignore
        .git_global(false) // results must not depend on the user's global excludes
        .git_exclude(true) // respect .git/info/exclude
        .require_git(false)
        .filter_entry(|entry| !is_vcs_dir(entry.file_name().to_str()));

    // Custom patterns from .ripple.toml act as excludes: the `ignore` crate
    // treats override globs as whitelists unless negated with `!`.
    if !ignore_patterns.is_empty() {
        let mut overrides = OverrideBuilder::new(&root);
        for pattern in ignore_patterns {
            // Convert directory patterns like "vendor/" to glob "!vendor/**"
            let glob = if pattern.ends_with('/') {
                format!("!{}**", pattern)
            } else {
                format!("!{}", pattern)
            };
            overrides.add(&glob)?;
        }
        builder.overrides(overrides.build()?);
    }

    let mut files = Vec::new();

    for entry in builder.build() {
        let entry = match entry {
            Ok(e) => e,
            Err(err) => {
                warn!(error = %err, "skipping unreadable entry during scan");
                continue;
            }
        };

        // Only collect files, not directories
        if !entry.file_type().is_some_and(|ft| ft.is_file()) {
            continue;
        }

        let path = entry.path();
        if !has_supported_extension(path, extensions) {
            continue;
        }

        match path.strip_prefix(&root) {
            Ok(relative) => files.push(relative.to_path_buf()),
            Err(_) => warn!(path = %path.display(), "entry outside project root, skipping"),
        }
    }

    files.sort();
    debug!(root = %root.display(), count = files.len(), "enumerated source files");
    Ok(files)
}

fn is_vcs_dir(name: Option<&str>) -> bool {
    name.is_some_and(|n| VCS_DIRS.contains(&n))
}

fn has_supported_extension(path: &Path, extensions: &[&str]) -> bool {
    let ext = match path.extension().and_then(|e| e.to_str()) {
        Some(e) => e,
        None => return false,
    };
    let with_dot = format!(".{}", ext);
    extensions.contains(&with_dot.as_str())
}
