pub mod backup;
pub mod config;
pub mod list;
pub mod restore;

use clap::Subcommand;

#[derive(Subcommand)]
pub enum Command {
    /// Scan a directory for repositories and save a snapshot
    Backup(backup::BackupArgs),
    /// Re-clone the repositories recorded in a snapshot
    Restore(restore::RestoreArgs),
    /// Show the contents of a snapshot
    List(list::ListArgs),
    /// Initialize and show reposnap configuration
    Config {
        #[command(subcommand)]
        action: config::ConfigAction,
    },
}

pub async fn run(cmd: Command) -> anyhow::Result<()> {
    match cmd {
        Command::Backup(args) => backup::run(args),
        Command::Restore(args) => restore::run(args).await,
        Command::List(args) => list::run(args),
        Command::Config { action } => config::run(action),
    }
}
