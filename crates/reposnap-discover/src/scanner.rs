use std::path::{Path, PathBuf};

use reposnap_core::error::ReposnapError;
use reposnap_core::models::RepositoryRecord;
use reposnap_git::GitTool;
use walkdir::WalkDir;

/// Directory names treated as repository candidates.
///
/// `worktrees` catches the administrative directory of linked worktrees, which
/// lives inside a bare repository's control directory.
const CANDIDATE_NAMES: &[&str] = &[".git", "worktrees"];

/// A filesystem entry produced by the walk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkEntry {
    pub path: PathBuf,
    pub is_dir: bool,
}

impl WalkEntry {
    pub fn dir(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            is_dir: true,
        }
    }

    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            is_dir: false,
        }
    }
}

/// Path as recorded for an entry found under `base`. Walking `.` yields
/// `proj/.git` rather than `./proj/.git`.
pub fn entry_path(base: &Path, path: PathBuf) -> PathBuf {
    if base == Path::new(".") {
        if let Ok(relative) = path.strip_prefix(".") {
            return relative.to_path_buf();
        }
    }
    path
}

/// Every entry below `base`, depth-first and sorted by name. `base` itself is
/// not yielded and symlinks are not followed.
pub fn walk_entries(base: &Path) -> impl Iterator<Item = Result<WalkEntry, ReposnapError>> {
    let base = base.to_path_buf();
    WalkDir::new(&base)
        .min_depth(1)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .map(move |entry| match entry {
            Ok(entry) => Ok(WalkEntry {
                is_dir: entry.file_type().is_dir(),
                path: entry_path(&base, entry.into_path()),
            }),
            Err(e) => Err(ReposnapError::Walk {
                path: e.path().map(Path::to_path_buf).unwrap_or_else(|| base.clone()),
                message: e.to_string(),
            }),
        })
}

/// Whether an entry should be inspected as a repository.
pub fn is_candidate(entry: &WalkEntry) -> bool {
    if !entry.is_dir {
        return false;
    }
    entry
        .path
        .file_name()
        .map(|name| CANDIDATE_NAMES.iter().any(|c| name == *c))
        .unwrap_or(false)
}

/// Path recorded for a bare candidate: its parent joined with `.git`.
///
/// Restore strips the last segment again, so the repository is re-cloned into
/// the candidate's parent.
pub fn normalize_bare_path(candidate: &Path) -> PathBuf {
    candidate
        .parent()
        .unwrap_or_else(|| Path::new(""))
        .join(".git")
}

/// Inspect a candidate. Returns `None` when git cannot answer for it.
pub fn classify(candidate: &Path, git: &dyn GitTool) -> Option<RepositoryRecord> {
    let remotes = match git.list_remotes(candidate) {
        Ok(remotes) => remotes,
        Err(e) => {
            tracing::debug!("skipping {}: {e}", candidate.display());
            return None;
        }
    };
    let is_bare = match git.is_bare(candidate) {
        Ok(is_bare) => is_bare,
        Err(e) => {
            tracing::debug!("skipping {}: {e}", candidate.display());
            return None;
        }
    };

    let path = if is_bare {
        normalize_bare_path(candidate)
    } else {
        candidate.to_path_buf()
    };
    tracing::debug!(
        "found {} repo at {} with {} remote entries",
        if is_bare { "bare" } else { "non-bare" },
        path.display(),
        remotes.len()
    );

    Some(RepositoryRecord {
        path,
        remotes,
        is_bare,
    })
}

/// Build records from a stream of walk entries.
///
/// Matching a candidate does not stop the walk from entering it: nested
/// candidates (a `worktrees` directory inside `.git`, say) get records of their
/// own. The first walk error aborts discovery.
pub fn discover_entries<I>(
    entries: I,
    git: &dyn GitTool,
) -> Result<Vec<RepositoryRecord>, ReposnapError>
where
    I: IntoIterator<Item = Result<WalkEntry, ReposnapError>>,
{
    let mut records = Vec::new();
    for entry in entries {
        let entry = entry?;
        if !is_candidate(&entry) {
            continue;
        }
        if let Some(record) = classify(&entry.path, git) {
            records.push(record);
        }
    }
    Ok(records)
}
