use std::path::PathBuf;

use clap::Args;
use reposnap_core::config::ReposnapConfig;
use reposnap_git::GitCli;

#[derive(Args)]
pub struct BackupArgs {
    /// The base directory to scan for repositories
    #[arg(long)]
    dir: Option<PathBuf>,
    /// The path to save the snapshot to
    #[arg(long)]
    config: Option<PathBuf>,
}

pub fn run(args: BackupArgs) -> anyhow::Result<()> {
    let config = ReposnapConfig::load()?;
    let base = args.dir.unwrap_or_else(|| config.default_scan_dir.clone());
    let dest = args.config.unwrap_or_else(|| config.snapshot_path.clone());

    let git = GitCli::with_program(&config.git_program);
    let records = reposnap_discover::discover(&base, &git)?;
    reposnap_store::save(&records, &dest)?;
    tracing::info!("wrote {} records to {}", records.len(), dest.display());

    let bare = records.iter().filter(|r| r.is_bare).count();
    println!(
        "Found {} repositories ({} bare) under {}",
        records.len(),
        bare,
        base.display()
    );
    println!("Config file saved to: {}", dest.display());
    Ok(())
}
