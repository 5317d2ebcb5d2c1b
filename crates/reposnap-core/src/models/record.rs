use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// A repository found by discovery, with everything needed to re-clone it.
///
/// `path` points at the repository's control directory. For bare repositories
/// discovery rewrites it to `<parent of candidate>/.git`, so that stripping the
/// final segment always yields the directory to clone into.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryRecord {
    pub path: PathBuf,
    /// Remote URLs in `git remote -v` order. The first one is the clone source.
    pub remotes: Vec<String>,
    pub is_bare: bool,
}

impl RepositoryRecord {
    pub fn new(path: impl Into<PathBuf>, remotes: Vec<String>, is_bare: bool) -> Self {
        Self {
            path: path.into(),
            remotes,
            is_bare,
        }
    }

    /// The remote used as the clone source.
    pub fn primary_remote(&self) -> Option<&str> {
        self.remotes.first().map(String::as_str)
    }

    /// Remotes attached after cloning.
    pub fn secondary_remotes(&self) -> &[String] {
        self.remotes.get(1..).unwrap_or(&[])
    }

    /// Directory the repository is cloned into: `path` without its last segment.
    ///
    /// Returns `None` when `path` has no parent segment to clone into.
    pub fn working_dir(&self) -> Option<&Path> {
        self.path
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_working_dir_strips_last_segment() {
        let record = RepositoryRecord::new("/home/user/src/proj/.git", vec![], false);
        assert_eq!(record.working_dir(), Some(Path::new("/home/user/src/proj")));

        let bare = RepositoryRecord::new("/x/y/repo.git/.git", vec![], true);
        assert_eq!(bare.working_dir(), Some(Path::new("/x/y/repo.git")));
    }

    #[test]
    fn test_working_dir_without_parent() {
        assert_eq!(RepositoryRecord::new(".git", vec![], false).working_dir(), None);
        assert_eq!(RepositoryRecord::new("/", vec![], false).working_dir(), None);
    }

    #[test]
    fn test_primary_and_secondary_remotes() {
        let record = RepositoryRecord::new(
            "a/.git",
            vec![
                "https://example/a.git".to_string(),
                "https://example/a.git".to_string(),
                "https://example/b.git".to_string(),
            ],
            false,
        );
        assert_eq!(record.primary_remote(), Some("https://example/a.git"));
        assert_eq!(record.secondary_remotes().len(), 2);

        let empty = RepositoryRecord::new("a/.git", vec![], false);
        assert_eq!(empty.primary_remote(), None);
        assert!(empty.secondary_remotes().is_empty());
    }

    #[test]
    fn test_json_field_names() {
        let record = RepositoryRecord::new(
            "/src/proj/.git",
            vec!["git@example.com:me/proj.git".to_string()],
            false,
        );
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["path"], "/src/proj/.git");
        assert_eq!(value["remotes"][0], "git@example.com:me/proj.git");
        assert_eq!(value["is_bare"], false);
    }
}
