//! File discovery: deterministic, deduplicated path lists

use globset::{Glob, GlobSet, GlobSetBuilder};
use log::debug;
use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

use crate::types::{Error, Result};

/// Controls which files discovery yields.
#[derive(Debug, Clone)]
pub struct DiscoveryOptions {
    /// Working directory globs are matched against
    pub cwd: PathBuf,
    /// Lowercase extensions accepted during directory walks
    pub extensions: Vec<String>,
    /// Include globs; empty means everything is included
    pub include: Vec<String>,
    /// Exclude globs
    pub exclude: Vec<String>,
    /// Whether to walk through directory symlinks
    pub follow_symlinks: bool,
}

impl Default for DiscoveryOptions {
    fn default() -> Self {
        Self {
            cwd: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            extensions: vec!["md".to_string(), "markdown".to_string()],
            include: Vec::new(),
            exclude: Vec::new(),
            follow_symlinks: false,
        }
    }
}

/// Discover files under the user-supplied paths.
///
/// Explicit file roots are always accepted (even hidden ones); directory
/// walks skip hidden entries, honor the symlink policy, filter on the
/// extension allow-set, and apply include/exclude globs. The result is
/// deduplicated on cleaned absolute paths and deterministically sorted.
pub fn discover_files(paths: &[PathBuf], options: &DiscoveryOptions) -> Result<Vec<PathBuf>> {
    let include = build_globset(&options.include)?;
    let exclude = build_globset(&options.exclude)?;

    let mut seen = HashSet::new();
    let mut files = Vec::new();
    let mut push = |path: PathBuf, files: &mut Vec<PathBuf>| {
        let key = normalize(&path, &options.cwd);
        if seen.insert(key.clone()) {
            files.push(key);
        }
    };

    for root in paths {
        let root_abs = normalize(root, &options.cwd);
        let metadata = std::fs::metadata(&root_abs).map_err(|e| Error::from_io(&root_abs, e))?;

        if metadata.is_file() {
            // Explicit roots bypass the hidden-entry and extension filters.
            if matches_filters(&root_abs, options, include.as_ref(), exclude.as_ref()) {
                push(root_abs, &mut files);
            }
            continue;
        }

        let walker = WalkDir::new(&root_abs)
            .follow_links(options.follow_symlinks)
            .into_iter()
            .filter_entry(|entry| entry.depth() == 0 || !is_hidden(entry.path()));

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    debug!("skipping unreadable entry under {}: {err}", root_abs.display());
                    continue;
                }
            };
            let path = entry.path();
            // Without follow_links, file_type() reports the symlink itself.
            // Check file-ness through the target so symlinked files are
            // still discovered; only directory descent is gated by the flag.
            if !path.is_file() {
                continue;
            }
            if !has_allowed_extension(path, &options.extensions) {
                continue;
            }
            if matches_filters(path, options, include.as_ref(), exclude.as_ref()) {
                push(path.to_path_buf(), &mut files);
            }
        }
    }

    files.sort();
    Ok(files)
}

fn build_globset(patterns: &[String]) -> Result<Option<GlobSet>> {
    if patterns.is_empty() {
        return Ok(None);
    }
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern)
            .map_err(|e| Error::ConfigInvalid(format!("bad glob {pattern:?}: {e}")))?;
        builder.add(glob);
    }
    let set = builder
        .build()
        .map_err(|e| Error::ConfigInvalid(format!("glob set: {e}")))?;
    Ok(Some(set))
}

/// Globs match the path relative to the working directory, with a
/// filename-only fallback for bare patterns like `README.md`.
fn glob_matches(set: &GlobSet, path: &Path, cwd: &Path) -> bool {
    let relative = path.strip_prefix(cwd).unwrap_or(path);
    if set.is_match(relative) {
        return true;
    }
    path.file_name().is_some_and(|name| set.is_match(name))
}

fn matches_filters(
    path: &Path,
    options: &DiscoveryOptions,
    include: Option<&GlobSet>,
    exclude: Option<&GlobSet>,
) -> bool {
    if let Some(include) = include
        && !glob_matches(include, path, &options.cwd)
    {
        return false;
    }
    if let Some(exclude) = exclude
        && glob_matches(exclude, path, &options.cwd)
    {
        return false;
    }
    true
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with('.'))
}

fn has_allowed_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| {
            let lower = ext.to_lowercase();
            extensions.iter().any(|allowed| *allowed == lower)
        })
}

/// Clean a path into the absolute form used as the dedup key: anchored at
/// `cwd` when relative, `.` components removed, `..` resolved lexically.
pub fn normalize(path: &Path, cwd: &Path) -> PathBuf {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    };

    let mut cleaned = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !cleaned.pop() {
                    cleaned.push(Component::ParentDir);
                }
            }
            other => cleaned.push(other),
        }
    }
    cleaned
}
