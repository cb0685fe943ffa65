/// Input path gathering
///
/// Turns the explicit file list and an optional folder into the flat, ordered
/// path list the batch runner consumes.

use std::path::{Path, PathBuf};

use log::{error, warn};
use regex::Regex;
use walkdir::WalkDir;

/// Restrictions applied while walking a folder
#[derive(Debug, Clone, Default)]
pub struct PathFilter {
    /// Glob patterns a walked file must match (empty = everything)
    pub include: Vec<String>,
    /// Glob patterns that drop a walked file
    pub exclude: Vec<String>,
    /// Upper bound on the total number of paths
    pub max_files: Option<usize>,
}

impl PathFilter {
    fn accepts(&self, path: &Path) -> bool {
        let file_name = path.to_string_lossy();
        let include_match = self.include.is_empty()
            || self.include.iter().any(|pattern| glob_match(&file_name, pattern));
        let exclude_match = self.exclude.iter().any(|pattern| glob_match(&file_name, pattern));
        include_match && !exclude_match
    }

    fn is_full(&self, count: usize) -> bool {
        self.max_files.map_or(false, |max| count >= max)
    }
}

/// Collect the paths for one batch.
///
/// Explicit files come first, untouched and in the order given; problems with
/// them surface later as per-file failures. Then every regular file below
/// `folder` is added in traversal order. A folder that is not a directory is
/// ignored with a warning.
pub fn collect_input_paths(
    files: &[PathBuf],
    folder: Option<&Path>,
    filter: &PathFilter,
) -> Vec<PathBuf> {
    let mut paths = Vec::new();

    for file in files {
        if filter.is_full(paths.len()) {
            warn!("Reached maximum file limit ({})", paths.len());
            return paths;
        }
        paths.push(file.clone());
    }

    let Some(folder) = folder else {
        return paths;
    };

    if !folder.is_dir() {
        warn!("Folder not found or not a directory: {}", folder.display());
        return paths;
    }

    for entry in WalkDir::new(folder).follow_links(false) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                error!("Error walking {}: {}", folder.display(), e);
                continue;
            }
        };

        if !entry.file_type().is_file() || !filter.accepts(entry.path()) {
            continue;
        }

        if filter.is_full(paths.len()) {
            warn!("Reached maximum file limit ({})", paths.len());
            break;
        }
        paths.push(entry.into_path());
    }

    paths
}

/// Match `text` against a glob using `*` and `?` wildcards.
///
/// `*` matches across path separators, so `*.exe` matches files at any depth.
pub fn glob_match(text: &str, pattern: &str) -> bool {
    let mut re = String::with_capacity(pattern.len() + 8);
    re.push('^');
    for c in pattern.chars() {
        match c {
            '*' => re.push_str(".*"),
            '?' => re.push('.'),
            other => re.push_str(&regex::escape(&other.to_string())),
        }
    }
    re.push('$');

    match Regex::new(&re) {
        Ok(re) => re.is_match(text),
        Err(e) => {
            error!("Invalid glob pattern {}: {}", pattern, e);
            false
        }
    }
}
