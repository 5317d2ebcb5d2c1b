pub mod engine;
pub mod plan;
pub mod restorer;

use std::path::PathBuf;

use reposnap_core::config::ReposnapConfig;
use reposnap_core::models::{BareSecondaryPolicy, SecondaryNaming};

pub use engine::RestoreEngine;
pub use plan::{plan_record, RecordPlan, SecondaryRemote};
pub use restorer::{restore, restore_with, RestoreEvent};

/// Knobs for how a snapshot is turned back into repositories.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RestoreOptions {
    pub bare_secondary: BareSecondaryPolicy,
    pub secondary_naming: SecondaryNaming,
    pub skip_duplicate_secondaries: bool,
    /// Report planned actions without running git.
    pub dry_run: bool,
}

impl RestoreOptions {
    pub fn from_config(config: &ReposnapConfig) -> Self {
        Self {
            bare_secondary: config.bare_secondary,
            secondary_naming: config.secondary_naming,
            skip_duplicate_secondaries: config.skip_duplicate_secondaries,
            dry_run: false,
        }
    }
}

/// Outcome of a restore run that did not fail.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RestoreSummary {
    /// Working directories cloned (or that would be, on a dry run), in order.
    pub restored: Vec<PathBuf>,
    /// Index of the bare record that stopped the run early, if any.
    pub halted_at: Option<usize>,
    pub dry_run: bool,
}

impl RestoreSummary {
    /// Number of records left untouched because the run halted.
    pub fn unprocessed(&self, total: usize) -> usize {
        match self.halted_at {
            Some(index) => total.saturating_sub(index + 1),
            None => 0,
        }
    }
}
