pub mod parse;
pub mod scripted;

use std::path::Path;
use std::process::Command;

use reposnap_core::error::ReposnapError;

pub use parse::{parse_is_bare, parse_remote_urls};
pub use scripted::{GitCall, ScriptedGit};

/// The git operations reposnap needs, behind a narrow seam so discovery and
/// restore can run against canned answers.
pub trait GitTool: Send + Sync {
    /// Remote URLs configured for the repository at `dir`, one per `remote -v` line.
    fn list_remotes(&self, dir: &Path) -> Result<Vec<String>, ReposnapError>;

    /// Whether the repository at `dir` is bare.
    fn is_bare(&self, dir: &Path) -> Result<bool, ReposnapError>;

    /// Clone `url` into `dest`.
    fn clone_repo(&self, url: &str, dest: &Path, bare: bool) -> Result<(), ReposnapError>;

    /// Add a remote called `name` to the repository at `dir`.
    fn add_remote(&self, dir: &Path, name: &str, url: &str) -> Result<(), ReposnapError>;
}

/// Result of a git command execution.
#[derive(Debug)]
pub struct GitOutput {
    pub stdout: String,
    pub stderr: String,
    pub success: bool,
}

/// [`GitTool`] backed by the git executable.
#[derive(Debug, Clone)]
pub struct GitCli {
    program: String,
}

impl GitCli {
    pub fn new() -> Self {
        Self::with_program("git")
    }

    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Run a git command in the given directory.
    fn git(&self, dir: &Path, args: &[&str]) -> Result<GitOutput, ReposnapError> {
        let output = Command::new(&self.program)
            .args(args)
            .current_dir(dir)
            .output()
            .map_err(|e| {
                ReposnapError::inspection(dir, format!("failed to run git {}: {e}", args.join(" ")))
            })?;

        Ok(GitOutput {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            success: output.status.success(),
        })
    }

    /// Run a read-only query, returning stdout or an inspection error.
    fn query(&self, dir: &Path, args: &[&str]) -> Result<String, ReposnapError> {
        let out = self.git(dir, args)?;
        if !out.success {
            return Err(ReposnapError::inspection(
                dir,
                format!("git {} failed: {}", args.join(" "), out.stderr.trim()),
            ));
        }
        Ok(out.stdout)
    }
}

impl Default for GitCli {
    fn default() -> Self {
        Self::new()
    }
}

impl GitTool for GitCli {
    fn list_remotes(&self, dir: &Path) -> Result<Vec<String>, ReposnapError> {
        let stdout = self.query(dir, &["remote", "-v"])?;
        Ok(parse_remote_urls(&stdout))
    }

    fn is_bare(&self, dir: &Path) -> Result<bool, ReposnapError> {
        let stdout = self.query(dir, &["rev-parse", "--is-bare-repository"])?;
        Ok(parse_is_bare(&stdout))
    }

    fn clone_repo(&self, url: &str, dest: &Path, bare: bool) -> Result<(), ReposnapError> {
        let mut cmd = Command::new(&self.program);
        cmd.arg("clone");
        if bare {
            cmd.arg("--bare");
        }
        let output = cmd
            .arg(url)
            .arg(dest)
            .output()
            .map_err(|e| ReposnapError::inspection(dest, format!("failed to clone {url}: {e}")))?;

        if !output.status.success() {
            let kind = if bare { "bare repo" } else { "repo" };
            return Err(ReposnapError::restore(
                dest,
                format!(
                    "failed to clone {kind}: {}",
                    String::from_utf8_lossy(&output.stderr).trim()
                ),
            ));
        }
        Ok(())
    }

    fn add_remote(&self, dir: &Path, name: &str, url: &str) -> Result<(), ReposnapError> {
        let out = self.git(dir, &["remote", "add", name, url])?;
        if !out.success {
            return Err(ReposnapError::restore(
                dir,
                format!("failed to add remote {name}: {}", out.stderr.trim()),
            ));
        }
        Ok(())
    }
}
