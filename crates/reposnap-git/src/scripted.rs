use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use reposnap_core::error::ReposnapError;

use crate::GitTool;

/// A call made against a [`ScriptedGit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GitCall {
    ListRemotes(PathBuf),
    IsBare(PathBuf),
    Clone { url: String, dest: PathBuf, bare: bool },
    AddRemote { dir: PathBuf, name: String, url: String },
}

#[derive(Debug, Default)]
struct ScriptState {
    remotes: HashMap<PathBuf, Vec<String>>,
    bare: HashMap<PathBuf, bool>,
    failing_clones: HashSet<String>,
    /// Remote names present in each cloned repository.
    cloned: HashMap<PathBuf, Vec<String>>,
    calls: Vec<GitCall>,
}

/// In-memory [`GitTool`] with canned inspection answers.
///
/// Unknown directories fail inspection, the way git does outside a repository.
/// Clones into an existing destination fail, and adding a remote whose name is
/// already taken fails, mirroring the real tool.
#[derive(Debug, Default)]
pub struct ScriptedGit {
    state: Mutex<ScriptState>,
}

impl ScriptedGit {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer both inspection queries for `dir`.
    pub fn with_repo(self, dir: impl Into<PathBuf>, remotes: &[&str], bare: bool) -> Self {
        let dir = dir.into();
        {
            let mut state = self.lock();
            state
                .remotes
                .insert(dir.clone(), remotes.iter().map(|r| r.to_string()).collect());
            state.bare.insert(dir, bare);
        }
        self
    }

    /// Answer `list_remotes` for `dir` but fail `is_bare`.
    pub fn with_remotes_only(self, dir: impl Into<PathBuf>, remotes: &[&str]) -> Self {
        self.lock()
            .remotes
            .insert(dir.into(), remotes.iter().map(|r| r.to_string()).collect());
        self
    }

    /// Make every clone of `url` fail.
    pub fn fail_clone(self, url: &str) -> Self {
        self.lock().failing_clones.insert(url.to_string());
        self
    }

    /// Every call made so far, in order.
    pub fn calls(&self) -> Vec<GitCall> {
        self.lock().calls.clone()
    }

    /// Destinations cloned so far, in order.
    pub fn cloned_paths(&self) -> Vec<PathBuf> {
        self.lock()
            .calls
            .iter()
            .filter_map(|call| match call {
                GitCall::Clone { dest, .. } => Some(dest.clone()),
                _ => None,
            })
            .collect()
    }

    /// Remote names attached to a cloned repository, including `origin`.
    pub fn remote_names(&self, dir: &Path) -> Vec<String> {
        self.lock().cloned.get(dir).cloned().unwrap_or_default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ScriptState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl GitTool for ScriptedGit {
    fn list_remotes(&self, dir: &Path) -> Result<Vec<String>, ReposnapError> {
        let mut state = self.lock();
        state.calls.push(GitCall::ListRemotes(dir.to_path_buf()));
        state
            .remotes
            .get(dir)
            .cloned()
            .ok_or_else(|| ReposnapError::inspection(dir, "not a git repository"))
    }

    fn is_bare(&self, dir: &Path) -> Result<bool, ReposnapError> {
        let mut state = self.lock();
        state.calls.push(GitCall::IsBare(dir.to_path_buf()));
        state
            .bare
            .get(dir)
            .copied()
            .ok_or_else(|| ReposnapError::inspection(dir, "not a git repository"))
    }

    fn clone_repo(&self, url: &str, dest: &Path, bare: bool) -> Result<(), ReposnapError> {
        let mut state = self.lock();
        state.calls.push(GitCall::Clone {
            url: url.to_string(),
            dest: dest.to_path_buf(),
            bare,
        });
        if state.failing_clones.contains(url) {
            return Err(ReposnapError::restore(dest, format!("could not read from {url}")));
        }
        if state.cloned.contains_key(dest) {
            return Err(ReposnapError::restore(
                dest,
                "destination path already exists and is not an empty directory",
            ));
        }
        state
            .cloned
            .insert(dest.to_path_buf(), vec!["origin".to_string()]);
        Ok(())
    }

    fn add_remote(&self, dir: &Path, name: &str, url: &str) -> Result<(), ReposnapError> {
        let mut state = self.lock();
        state.calls.push(GitCall::AddRemote {
            dir: dir.to_path_buf(),
            name: name.to_string(),
            url: url.to_string(),
        });
        let names = state
            .cloned
            .get_mut(dir)
            .ok_or_else(|| ReposnapError::restore(dir, "not a git repository"))?;
        if names.iter().any(|n| n == name) {
            return Err(ReposnapError::restore(
                dir,
                format!("failed to add remote {name}: remote {name} already exists"),
            ));
        }
        names.push(name.to_string());
        Ok(())
    }
}
