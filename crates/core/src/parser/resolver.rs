//! Import specifier resolution: maps a module specifier written in one file
//! to the project file it refers to.
//!
//! Resolution is a pure function of the specifier, the importing file, the
//! enumerated file set, the alias table and the candidate suffix list. The
//! filesystem is never touched: existence checks go against the file set the
//! enumerator already produced.

use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};

use super::entity::ImportKind;
use crate::config::{PathAliases, ResolveConfig};

/// Classify a specifier the same way [`ImportResolver::resolve`] will treat it.
pub fn classify_specifier(specifier: &str, aliases: &PathAliases) -> ImportKind {
    if longest_alias(specifier, aliases).is_some() {
        ImportKind::Aliased
    } else if is_relative(specifier) {
        ImportKind::Relative
    } else {
        ImportKind::External
    }
}

fn is_relative(specifier: &str) -> bool {
    specifier == "."
        || specifier == ".."
        || specifier.starts_with("./")
        || specifier.starts_with("../")
}

fn longest_alias<'a>(
    specifier: &str,
    aliases: &'a PathAliases,
) -> Option<(&'a str, &'a str)> {
    aliases
        .iter()
        .filter(|(prefix, _)| !prefix.is_empty() && specifier.starts_with(prefix.as_str()))
        .max_by_key(|(prefix, _)| prefix.len())
        .map(|(prefix, target)| (prefix.as_str(), target.as_str()))
}

/// Resolves import specifiers against the enumerated project file set.
#[derive(Debug, Clone)]
pub struct ImportResolver {
    known_files: HashSet<PathBuf>,
    aliases: PathAliases,
    extensions: Vec<String>,
}

impl ImportResolver {
    pub fn new<I>(known_files: I, aliases: PathAliases, extensions: Vec<String>) -> Self
    where
        I: IntoIterator<Item = PathBuf>,
    {
        Self {
            known_files: known_files.into_iter().collect(),
            aliases,
            extensions,
        }
    }

    pub fn from_config<I>(known_files: I, config: &ResolveConfig) -> Self
    where
        I: IntoIterator<Item = PathBuf>,
    {
        Self::new(
            known_files,
            config.path_aliases.clone(),
            config.extensions.clone(),
        )
    }

    pub fn classify(&self, specifier: &str) -> ImportKind {
        classify_specifier(specifier, &self.aliases)
    }

    /// Resolve `specifier` imported from `importing_file` to a known project file.
    ///
    /// Returns `None` for bare (external) specifiers, paths escaping the
    /// project root, and bases that match no candidate.
    pub fn resolve(&self, specifier: &str, importing_file: &Path) -> Option<PathBuf> {
        let base = if let Some((prefix, target)) = longest_alias(specifier, &self.aliases) {
            let rest = &specifier[prefix.len()..];
            normalize(Path::new(&format!("{}{}", target, rest)))?
        } else if is_relative(specifier) {
            let dir = importing_file.parent().unwrap_or_else(|| Path::new(""));
            normalize(&dir.join(specifier))?
        } else {
            return None;
        };

        self.try_candidates(&base)
    }

    /// Try the exact base first, then every configured suffix in order.
    fn try_candidates(&self, base: &Path) -> Option<PathBuf> {
        if !base.as_os_str().is_empty() && self.known_files.contains(base) {
            return Some(base.to_path_buf());
        }

        let base_str = base.to_string_lossy();
        self.extensions.iter().find_map(|suffix| {
            let candidate = if base_str.is_empty() {
                PathBuf::from(suffix.trim_start_matches('/'))
            } else {
                PathBuf::from(format!("{}{}", base_str, suffix))
            };
            self.known_files
                .contains(&candidate)
                .then_some(candidate)
        })
    }
}

/// Lexically normalize a project-relative path.
///
/// Drops `.` components and pops on `..`; returns `None` when the path climbs
/// above the project root. A leading `/` is treated as the project root.
fn normalize(path: &Path) -> Option<PathBuf> {
    let mut parts: Vec<&std::ffi::OsStr> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir | Component::RootDir | Component::Prefix(_) => {}
            Component::ParentDir => {
                parts.pop()?;
            }
            Component::Normal(part) => parts.push(part),
        }
    }
    Some(parts.iter().collect())
}
