use std::path::PathBuf;

use reposnap_core::error::ReposnapError;
use reposnap_core::models::{BareSecondaryPolicy, RepositoryRecord};

use crate::RestoreOptions;

/// A remote to attach after cloning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecondaryRemote {
    pub name: String,
    pub url: String,
}

/// Everything restore will do for one record, worked out up front.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordPlan {
    pub index: usize,
    /// The record's stored path, for reporting.
    pub record_path: PathBuf,
    pub working_dir: PathBuf,
    pub primary: String,
    pub bare: bool,
    pub secondaries: Vec<SecondaryRemote>,
    /// Stop the whole restore after this record.
    pub halts: bool,
}

/// Plan the restore of `record`, the `index`-th entry of the snapshot.
pub fn plan_record(
    index: usize,
    record: &RepositoryRecord,
    options: &RestoreOptions,
) -> Result<RecordPlan, ReposnapError> {
    let working_dir = record
        .working_dir()
        .ok_or_else(|| ReposnapError::restore(&record.path, "no parent directory to clone into"))?
        .to_path_buf();
    let primary = record
        .primary_remote()
        .ok_or_else(|| ReposnapError::restore(&record.path, "no remotes recorded"))?
        .to_string();

    let has_secondaries = !record.secondary_remotes().is_empty();
    let halts = record.is_bare
        && has_secondaries
        && options.bare_secondary == BareSecondaryPolicy::Halt;

    let secondaries = if record.is_bare {
        Vec::new()
    } else {
        secondary_remotes(&primary, record.secondary_remotes(), options)
    };

    Ok(RecordPlan {
        index,
        record_path: record.path.clone(),
        working_dir,
        primary,
        bare: record.is_bare,
        secondaries,
        halts,
    })
}

fn secondary_remotes(
    primary: &str,
    urls: &[String],
    options: &RestoreOptions,
) -> Vec<SecondaryRemote> {
    let mut attached: Vec<&str> = vec![primary];
    let mut remotes = Vec::new();
    for url in urls {
        if options.skip_duplicate_secondaries && attached.contains(&url.as_str()) {
            tracing::debug!("not re-attaching {url}");
            continue;
        }
        attached.push(url);
        remotes.push(SecondaryRemote {
            name: options.secondary_naming.remote_name(remotes.len()),
            url: url.clone(),
        });
    }
    remotes
}

#[cfg(test)]
mod tests {
    use super::*;
    use reposnap_core::models::SecondaryNaming;
    use std::path::Path;

    const A: &str = "https://example/a.git";
    const B: &str = "https://example/b.git";

    fn record(path: &str, remotes: &[&str], bare: bool) -> RepositoryRecord {
        RepositoryRecord::new(path, remotes.iter().map(|r| r.to_string()).collect(), bare)
    }

    #[test]
    fn test_non_bare_plan() {
        let plan = plan_record(0, &record("/src/proj/.git", &[A, A], false), &RestoreOptions::default())
            .unwrap();
        assert_eq!(plan.working_dir, Path::new("/src/proj"));
        assert_eq!(plan.primary, A);
        assert!(!plan.bare);
        assert!(!plan.halts);
        assert_eq!(
            plan.secondaries,
            vec![SecondaryRemote {
                name: "upstream".to_string(),
                url: A.to_string()
            }]
        );
    }

    #[test]
    fn test_fixed_naming_reuses_upstream() {
        let plan = plan_record(
            0,
            &record("/src/proj/.git", &[A, A, B, B], false),
            &RestoreOptions::default(),
        )
        .unwrap();
        assert_eq!(plan.secondaries.len(), 3);
        assert!(plan.secondaries.iter().all(|s| s.name == "upstream"));
    }

    #[test]
    fn test_numbered_naming_with_duplicate_skipping() {
        let options = RestoreOptions {
            secondary_naming: SecondaryNaming::Numbered,
            skip_duplicate_secondaries: true,
            ..RestoreOptions::default()
        };
        let plan = plan_record(0, &record("/src/proj/.git", &[A, A, B, B], false), &options).unwrap();
        assert_eq!(
            plan.secondaries,
            vec![SecondaryRemote {
                name: "upstream".to_string(),
                url: B.to_string()
            }]
        );

        let options = RestoreOptions {
            secondary_naming: SecondaryNaming::Numbered,
            ..RestoreOptions::default()
        };
        let plan = plan_record(0, &record("/src/proj/.git", &[A, B, A], false), &options).unwrap();
        let names: Vec<_> = plan.secondaries.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["upstream", "upstream-2"]);
    }

    #[test]
    fn test_bare_with_secondaries_halts_by_default() {
        let plan = plan_record(
            2,
            &record("/srv/tool.git/.git", &[A, A], true),
            &RestoreOptions::default(),
        )
        .unwrap();
        assert_eq!(plan.working_dir, Path::new("/srv/tool.git"));
        assert!(plan.bare);
        assert!(plan.halts);
        assert!(plan.secondaries.is_empty());
    }

    #[test]
    fn test_bare_with_secondaries_continue_policy() {
        let options = RestoreOptions {
            bare_secondary: BareSecondaryPolicy::Continue,
            ..RestoreOptions::default()
        };
        let plan = plan_record(0, &record("/srv/tool.git/.git", &[A, B], true), &options).unwrap();
        assert!(!plan.halts);
        assert!(plan.secondaries.is_empty());
    }

    #[test]
    fn test_bare_single_remote_does_not_halt() {
        let plan = plan_record(0, &record("/srv/tool.git/.git", &[A], true), &RestoreOptions::default())
            .unwrap();
        assert!(!plan.halts);
    }

    #[test]
    fn test_no_remotes_is_an_error() {
        let err = plan_record(0, &record("/src/proj/.git", &[], false), &RestoreOptions::default())
            .unwrap_err();
        match err {
            ReposnapError::Restore { path, .. } => assert_eq!(path, Path::new("/src/proj/.git")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_path_without_parent_is_an_error() {
        assert!(plan_record(0, &record(".git", &[A], false), &RestoreOptions::default()).is_err());
    }
}
