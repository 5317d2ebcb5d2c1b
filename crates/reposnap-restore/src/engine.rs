use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};
use tokio::task::JoinHandle;

use reposnap_core::error::ReposnapError;
use reposnap_core::models::RepositoryRecord;
use reposnap_git::GitTool;

use crate::plan::{plan_record, RecordPlan};
use crate::restorer::{execute_plan, RestoreEvent};
use crate::{RestoreOptions, RestoreSummary};

/// No record has failed yet.
const NO_FAILURE: usize = usize::MAX;

/// Restore engine that clones records in parallel with a concurrency limit.
///
/// Records are started in snapshot order, and record `i` is only started once
/// every record before `i - concurrency + 1` has finished. Once a record fails
/// no further records are started, and records queued behind the failure are
/// skipped. Records whose working directories are nested inside one another
/// run one after the other. Errors are reported in snapshot order regardless of
/// which clone finished first.
pub struct RestoreEngine {
    concurrency: usize,
    show_progress: bool,
}

/// A spawned record restore.
struct InFlight {
    dest: PathBuf,
    handle: JoinHandle<Result<(), ReposnapError>>,
}

impl InFlight {
    async fn finish(self) -> Result<(), ReposnapError> {
        let dest = self.dest;
        self.handle
            .await
            .map_err(|e| ReposnapError::restore(&dest, format!("restore task failed: {e}")))
            .and_then(|r| r)
    }
}

impl RestoreEngine {
    pub fn new(concurrency: usize) -> Self {
        Self {
            concurrency: concurrency.max(1),
            show_progress: true,
        }
    }

    /// Disable the per-record spinners.
    pub fn quiet(mut self) -> Self {
        self.show_progress = false;
        self
    }

    pub async fn restore_all(
        &self,
        git: Arc<dyn GitTool>,
        records: &[RepositoryRecord],
        options: &RestoreOptions,
    ) -> Result<RestoreSummary, ReposnapError> {
        let (plans, plan_error) = plan_prefix(records, options);
        let halted_at = plans.last().filter(|p| p.halts).map(|p| p.index);

        let multi = if self.show_progress {
            MultiProgress::new()
        } else {
            MultiProgress::with_draw_target(ProgressDrawTarget::hidden())
        };
        let style = ProgressStyle::with_template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏");
        let dry_run = options.dry_run;
        let first_failure = Arc::new(AtomicUsize::new(NO_FAILURE));

        let mut in_flight: VecDeque<InFlight> = VecDeque::new();
        let mut outcomes = Vec::with_capacity(plans.len());

        for plan in &plans {
            while in_flight.len() >= self.concurrency
                || in_flight.iter().any(|f| paths_overlap(&f.dest, &plan.working_dir))
            {
                match in_flight.pop_front() {
                    Some(task) => outcomes.push(task.finish().await),
                    None => break,
                }
            }
            if first_failure.load(Ordering::SeqCst) != NO_FAILURE {
                tracing::debug!(
                    "not starting {} or later records after a failure",
                    plan.working_dir.display()
                );
                break;
            }

            let pb = multi.add(ProgressBar::new_spinner());
            pb.set_style(style.clone());
            pb.set_message(format!("restoring {}", plan.working_dir.display()));

            let handle = spawn_record(
                git.clone(),
                plan.clone(),
                dry_run,
                first_failure.clone(),
                pb,
            );
            in_flight.push_back(InFlight {
                dest: plan.working_dir.clone(),
                handle,
            });
        }
        while let Some(task) = in_flight.pop_front() {
            outcomes.push(task.finish().await);
        }

        for outcome in outcomes {
            outcome?;
        }
        if let Some(e) = plan_error {
            return Err(e);
        }

        if let Some(index) = halted_at {
            tracing::warn!(
                "bare repo at index {index} has secondary remotes; {} records left unprocessed",
                records.len() - index - 1
            );
        }

        Ok(RestoreSummary {
            restored: plans.into_iter().map(|p| p.working_dir).collect(),
            halted_at,
            dry_run,
        })
    }
}

/// Run one plan on the blocking pool. The plan is skipped when an earlier
/// record has already failed.
fn spawn_record(
    git: Arc<dyn GitTool>,
    plan: RecordPlan,
    dry_run: bool,
    first_failure: Arc<AtomicUsize>,
    pb: ProgressBar,
) -> JoinHandle<Result<(), ReposnapError>> {
    tokio::spawn(async move {
        let index = plan.index;
        let dest = plan.working_dir.clone();
        if first_failure.load(Ordering::SeqCst) < index {
            pb.finish_with_message(format!("{}: skipped", dest.display()));
            return Ok(());
        }
        pb.enable_steady_tick(std::time::Duration::from_millis(100));

        let result = tokio::task::spawn_blocking(move || {
            execute_plan(git.as_ref(), &plan, dry_run, &mut |_: &RestoreEvent| {})
        })
        .await
        .map_err(|e| ReposnapError::restore(&dest, format!("restore task failed: {e}")))
        .and_then(|r| r);

        match &result {
            Ok(()) => pb.finish_with_message(format!("{}: restored", dest.display())),
            Err(e) => {
                first_failure.fetch_min(index, Ordering::SeqCst);
                pb.finish_with_message(format!("{}: {e}", dest.display()));
            }
        }
        result
    })
}

/// Whether one working directory contains the other.
fn paths_overlap(a: &Path, b: &Path) -> bool {
    a.starts_with(b) || b.starts_with(a)
}

/// Plan records in order up to and including the first halting record, or up
/// to the first record that cannot be planned.
fn plan_prefix(
    records: &[RepositoryRecord],
    options: &RestoreOptions,
) -> (Vec<RecordPlan>, Option<ReposnapError>) {
    let mut plans = Vec::new();
    for (index, record) in records.iter().enumerate() {
        match plan_record(index, record, options) {
            Ok(plan) => {
                let halts = plan.halts;
                plans.push(plan);
                if halts {
                    break;
                }
            }
            Err(e) => return (plans, Some(e)),
        }
    }
    (plans, None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use reposnap_core::models::BareSecondaryPolicy;
    use reposnap_git::ScriptedGit;

    const A: &str = "https://example/a.git";
    const B: &str = "https://example/b.git";
    const C: &str = "https://example/c.git";

    fn record(path: &str, remotes: &[&str], bare: bool) -> RepositoryRecord {
        RepositoryRecord::new(path, remotes.iter().map(|r| r.to_string()).collect(), bare)
    }

    #[tokio::test]
    async fn test_parallel_restore_clones_everything() {
        let git = Arc::new(ScriptedGit::new());
        let records: Vec<_> = (0..6)
            .map(|i| record(&format!("/restore/p{i}/.git"), &[A], false))
            .collect();

        let summary = RestoreEngine::new(3)
            .quiet()
            .restore_all(git.clone(), &records, &RestoreOptions::default())
            .await
            .unwrap();

        assert_eq!(summary.restored.len(), 6);
        assert_eq!(summary.restored[0], PathBuf::from("/restore/p0"));
        assert_eq!(git.cloned_paths().len(), 6);
    }

    #[tokio::test]
    async fn test_parallel_restore_respects_halt() {
        let git = Arc::new(ScriptedGit::new());
        let records = vec![
            record("/restore/a/.git", &[A], false),
            record("/restore/tool.git/.git", &[B, B], true),
            record("/restore/c/.git", &[C], false),
        ];

        let summary = RestoreEngine::new(4)
            .quiet()
            .restore_all(git.clone(), &records, &RestoreOptions::default())
            .await
            .unwrap();

        assert_eq!(summary.halted_at, Some(1));
        let mut cloned = git.cloned_paths();
        cloned.sort();
        assert_eq!(
            cloned,
            vec![PathBuf::from("/restore/a"), PathBuf::from("/restore/tool.git")]
        );
    }

    #[tokio::test]
    async fn test_parallel_restore_reports_first_error_in_order() {
        let git = Arc::new(ScriptedGit::new().fail_clone(B).fail_clone(C));
        let records = vec![
            record("/restore/a/.git", &[A], false),
            record("/restore/b/.git", &[B], false),
            record("/restore/c/.git", &[C], false),
        ];
        let options = RestoreOptions {
            bare_secondary: BareSecondaryPolicy::Continue,
            ..RestoreOptions::default()
        };

        let err = RestoreEngine::new(3)
            .quiet()
            .restore_all(git.clone(), &records, &options)
            .await
            .unwrap_err();
        match err {
            ReposnapError::Restore { path, .. } => assert_eq!(path, PathBuf::from("/restore/b")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unplannable_record_stops_later_records() {
        let git = Arc::new(ScriptedGit::new());
        let records = vec![
            record("/restore/a/.git", &[A], false),
            record("/restore/empty/.git", &[], false),
            record("/restore/c/.git", &[C], false),
        ];

        let err = RestoreEngine::new(2)
            .quiet()
            .restore_all(git.clone(), &records, &RestoreOptions::default())
            .await
            .unwrap_err();
        match err {
            ReposnapError::Restore { path, .. } => {
                assert_eq!(path, PathBuf::from("/restore/empty/.git"))
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(git.cloned_paths(), vec![PathBuf::from("/restore/a")]);
    }

    #[tokio::test]
    async fn test_failure_stops_queued_records() {
        let git = Arc::new(ScriptedGit::new().fail_clone(B));
        let mut records = vec![record("/restore/bad/.git", &[B], false)];
        records.extend((1..9).map(|i| record(&format!("/restore/p{i}/.git"), &[A], false)));

        let err = RestoreEngine::new(2)
            .quiet()
            .restore_all(git.clone(), &records, &RestoreOptions::default())
            .await
            .unwrap_err();
        match err {
            ReposnapError::Restore { path, .. } => assert_eq!(path, PathBuf::from("/restore/bad")),
            other => panic!("unexpected error: {other:?}"),
        }

        // Only the record running alongside the failure may have been cloned.
        let cloned = git.cloned_paths();
        assert!(cloned.contains(&PathBuf::from("/restore/bad")));
        assert!(cloned.len() <= 2);
        assert!(cloned
            .iter()
            .all(|p| p == Path::new("/restore/bad") || p == Path::new("/restore/p1")));
    }

    #[tokio::test]
    async fn test_nested_working_dirs_run_in_order() {
        let records = vec![
            record("/restore/site/.git", &[A], false),
            record("/restore/site/.git/worktrees", &[A], false),
            record("/restore/other/.git", &[C], false),
        ];

        for _ in 0..10 {
            let git = Arc::new(ScriptedGit::new());
            RestoreEngine::new(4)
                .quiet()
                .restore_all(git.clone(), &records, &RestoreOptions::default())
                .await
                .unwrap();
            let cloned = git.cloned_paths();
            let site = cloned.iter().position(|p| p == Path::new("/restore/site"));
            let nested = cloned.iter().position(|p| p == Path::new("/restore/site/.git"));
            assert!(site.unwrap() < nested.unwrap());
        }
    }

    #[test]
    fn test_paths_overlap() {
        assert!(paths_overlap(Path::new("/r/site"), Path::new("/r/site/.git")));
        assert!(paths_overlap(Path::new("/r/site/.git"), Path::new("/r/site")));
        assert!(paths_overlap(Path::new("/r/site"), Path::new("/r/site")));
        assert!(!paths_overlap(Path::new("/r/site"), Path::new("/r/site-old")));
        assert!(!paths_overlap(Path::new("/r/a"), Path::new("/r/b")));
    }
}
