pub mod scanner;

use std::path::Path;

use reposnap_core::error::ReposnapError;
use reposnap_core::models::RepositoryRecord;
use reposnap_git::GitTool;

use crate::scanner::{discover_entries, walk_entries};

/// Walk `base` and record every repository found beneath it.
///
/// Candidates that git cannot inspect are skipped. Only a failure of the walk
/// itself is returned as an error.
pub fn discover(base: &Path, git: &dyn GitTool) -> Result<Vec<RepositoryRecord>, ReposnapError> {
    tracing::info!("scanning {} for repositories", base.display());
    let records = discover_entries(walk_entries(base), git)?;
    tracing::info!("found {} repositories under {}", records.len(), base.display());
    Ok(records)
}
