use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use console::style;
use reposnap_core::config::ReposnapConfig;
use reposnap_core::models::{BareSecondaryPolicy, SecondaryNaming};
use reposnap_git::{GitCli, GitTool};
use reposnap_restore::{RestoreEngine, RestoreEvent, RestoreOptions, RestoreSummary};

#[derive(Args)]
pub struct RestoreArgs {
    /// The snapshot to restore from
    #[arg(long)]
    config: Option<PathBuf>,
    /// What to do after a bare repo with secondary remotes (halt, continue)
    #[arg(long)]
    bare_secondary: Option<String>,
    /// How to name secondary remotes (fixed, numbered)
    #[arg(long)]
    secondary_naming: Option<String>,
    /// Don't attach a secondary remote whose URL is already attached
    #[arg(long)]
    skip_duplicate_secondaries: bool,
    /// Number of clones to run at once
    #[arg(long)]
    concurrency: Option<usize>,
    /// Show what would be cloned without running git
    #[arg(long)]
    dry_run: bool,
}

pub async fn run(args: RestoreArgs) -> anyhow::Result<()> {
    let config = ReposnapConfig::load()?;
    let source = args.config.clone().unwrap_or_else(|| config.snapshot_path.clone());
    let options = restore_options(&args, &config)?;
    let concurrency = args.concurrency.unwrap_or(config.restore_concurrency);
    if concurrency == 0 {
        anyhow::bail!("--concurrency must be at least 1");
    }

    let records = reposnap_store::load(&source)?;
    if records.is_empty() {
        println!("No repositories recorded in {}", source.display());
        return Ok(());
    }
    if options.dry_run {
        println!("(dry run)");
    }

    let git: Arc<dyn GitTool> = Arc::new(GitCli::with_program(&config.git_program));
    let summary = if concurrency > 1 {
        println!("Restoring {} repos, {concurrency} at a time...", records.len());
        RestoreEngine::new(concurrency)
            .restore_all(git, &records, &options)
            .await?
    } else {
        reposnap_restore::restore_with(git.as_ref(), &records, &options, &mut print_event)?
    };

    tracing::info!(
        "restored {} of {} records from {}",
        summary.restored.len(),
        records.len(),
        source.display()
    );
    report(&summary, records.len());
    Ok(())
}

fn restore_options(args: &RestoreArgs, config: &ReposnapConfig) -> anyhow::Result<RestoreOptions> {
    let mut options = RestoreOptions::from_config(config);
    if let Some(ref s) = args.bare_secondary {
        options.bare_secondary = s
            .parse::<BareSecondaryPolicy>()
            .map_err(|e| anyhow::anyhow!(e))?;
    }
    if let Some(ref s) = args.secondary_naming {
        options.secondary_naming = s
            .parse::<SecondaryNaming>()
            .map_err(|e| anyhow::anyhow!(e))?;
    }
    options.skip_duplicate_secondaries |= args.skip_duplicate_secondaries;
    options.dry_run = args.dry_run;
    Ok(options)
}

fn print_event(event: &RestoreEvent) {
    match event {
        RestoreEvent::Started { path, .. } => println!("Restoring repo: {}", path.display()),
        RestoreEvent::Cloned { .. } => {}
        RestoreEvent::RemoteAdded { name, url, .. } => println!("  {name} -> {url}"),
        RestoreEvent::Halted { .. } => {}
    }
}

fn report(summary: &RestoreSummary, total: usize) {
    if let Some(index) = summary.halted_at {
        println!(
            "{} bare repo #{} has secondary remotes; {} remaining records were not restored \
             (use --bare-secondary continue to restore them)",
            style("Stopped:").yellow().bold(),
            index + 1,
            summary.unprocessed(total)
        );
    }
    if summary.dry_run {
        println!("{} repositories would be restored.", summary.restored.len());
    } else {
        println!("{}", style("Repositories restored successfully.").green());
    }
}
