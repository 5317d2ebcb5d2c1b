use std::path::PathBuf;

use reposnap_core::error::ReposnapError;
use reposnap_core::models::RepositoryRecord;
use reposnap_git::GitTool;

use crate::plan::{plan_record, RecordPlan};
use crate::{RestoreOptions, RestoreSummary};

/// Progress notifications emitted while restoring.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RestoreEvent {
    Started { index: usize, path: PathBuf },
    Cloned { dest: PathBuf, url: String, bare: bool },
    RemoteAdded { dir: PathBuf, name: String, url: String },
    Halted { index: usize, remaining: usize },
}

/// Restore every record in order, stopping at the first error.
pub fn restore(
    git: &dyn GitTool,
    records: &[RepositoryRecord],
    options: &RestoreOptions,
) -> Result<RestoreSummary, ReposnapError> {
    restore_with(git, records, options, &mut |_| {})
}

/// Like [`restore`], reporting progress through `observe`.
///
/// Each record is cloned from its first remote into the parent of its stored
/// path. A bare record with secondary remotes ends the run under
/// [`BareSecondaryPolicy::Halt`](reposnap_core::models::BareSecondaryPolicy::Halt);
/// later records are not touched. Partially restored repositories are left in
/// place when a step fails.
pub fn restore_with(
    git: &dyn GitTool,
    records: &[RepositoryRecord],
    options: &RestoreOptions,
    observe: &mut dyn FnMut(&RestoreEvent),
) -> Result<RestoreSummary, ReposnapError> {
    let mut summary = RestoreSummary {
        dry_run: options.dry_run,
        ..RestoreSummary::default()
    };

    for (index, record) in records.iter().enumerate() {
        observe(&RestoreEvent::Started {
            index,
            path: record.path.clone(),
        });

        let plan = plan_record(index, record, options)?;
        execute_plan(git, &plan, options.dry_run, observe)?;
        summary.restored.push(plan.working_dir.clone());

        if plan.halts {
            let remaining = records.len() - index - 1;
            tracing::warn!(
                "bare repo {} has secondary remotes; stopping with {remaining} records left",
                plan.record_path.display()
            );
            observe(&RestoreEvent::Halted { index, remaining });
            summary.halted_at = Some(index);
            break;
        }
    }

    Ok(summary)
}

/// Clone one planned record and attach its secondary remotes.
pub(crate) fn execute_plan(
    git: &dyn GitTool,
    plan: &RecordPlan,
    dry_run: bool,
    observe: &mut dyn FnMut(&RestoreEvent),
) -> Result<(), ReposnapError> {
    let dest = &plan.working_dir;
    let flag = if plan.bare { " --bare" } else { "" };

    if dry_run {
        tracing::info!("[dry-run] would git clone{flag} {} {}", plan.primary, dest.display());
    } else {
        tracing::info!("cloning{flag} {} into {}", plan.primary, dest.display());
        git.clone_repo(&plan.primary, dest, plan.bare)?;
    }
    observe(&RestoreEvent::Cloned {
        dest: dest.clone(),
        url: plan.primary.clone(),
        bare: plan.bare,
    });

    for remote in &plan.secondaries {
        if dry_run {
            tracing::info!(
                "[dry-run] would add remote {} {} to {}",
                remote.name,
                remote.url,
                dest.display()
            );
        } else {
            tracing::info!("adding remote {} {} to {}", remote.name, remote.url, dest.display());
            git.add_remote(dest, &remote.name, &remote.url)?;
        }
        observe(&RestoreEvent::RemoteAdded {
            dir: dest.clone(),
            name: remote.name.clone(),
            url: remote.url.clone(),
        });
    }

    Ok(())
}
