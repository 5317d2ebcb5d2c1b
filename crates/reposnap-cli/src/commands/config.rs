use clap::Subcommand;
use reposnap_core::config::ReposnapConfig;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Initialize ~/.reposnap/ with a default config
    Init,
    /// Show current configuration
    Show,
}

pub fn run(action: ConfigAction) -> anyhow::Result<()> {
    match action {
        ConfigAction::Init => {
            let home = ReposnapConfig::init()?;
            println!("Initialized reposnap at {}", home.display());
            println!("  config: {}", ReposnapConfig::config_path()?.display());
            Ok(())
        }
        ConfigAction::Show => {
            let config = ReposnapConfig::load()?;
            let toml_str = toml::to_string_pretty(&config)?;
            println!("{toml_str}");
            Ok(())
        }
    }
}
