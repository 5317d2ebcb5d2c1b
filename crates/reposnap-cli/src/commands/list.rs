use std::path::PathBuf;

use clap::Args;
use comfy_table::{Cell, Color, Table};
use reposnap_core::config::ReposnapConfig;

#[derive(Args)]
pub struct ListArgs {
    /// The snapshot to show
    #[arg(long)]
    config: Option<PathBuf>,
}

pub fn run(args: ListArgs) -> anyhow::Result<()> {
    let config = ReposnapConfig::load()?;
    let source = args.config.unwrap_or_else(|| config.snapshot_path.clone());
    let records = reposnap_store::load(&source)?;

    if records.is_empty() {
        println!("No repositories recorded in {}", source.display());
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["RESTORE INTO", "BARE", "PRIMARY REMOTE", "SECONDARY"]);

    let mut unrestorable = 0u32;
    for record in &records {
        let target = record
            .working_dir()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "—".to_string());
        let (primary, primary_color) = match record.primary_remote() {
            Some(url) => (url.to_string(), Color::White),
            None => {
                unrestorable += 1;
                ("no remotes".to_string(), Color::Red)
            }
        };
        let bare = if record.is_bare { "yes" } else { "no" };

        table.add_row(vec![
            Cell::new(target),
            Cell::new(bare),
            Cell::new(primary).fg(primary_color),
            Cell::new(record.secondary_remotes().len().to_string()),
        ]);
    }

    println!("{table}");
    println!(
        "{} repos total | {} bare | {} without remotes",
        records.len(),
        records.iter().filter(|r| r.is_bare).count(),
        unrestorable
    );
    Ok(())
}
