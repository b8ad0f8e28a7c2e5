use std::path::{Path, PathBuf};

use keeper::Config;
use tracing::instrument;

#[derive(Debug, clap::Parser)]
pub struct Command {
    /// Replace an existing configuration file
    #[arg(long)]
    force: bool,
}

impl Command {
    #[instrument]
    pub fn run(self, config_path: &Path, book: Option<PathBuf>) -> anyhow::Result<()> {
        if config_path.exists() && !self.force {
            anyhow::bail!(
                "Configuration already exists at {} (use --force to replace it)",
                config_path.display()
            );
        }

        let mut config = Config::default();
        if let Some(book) = book {
            config.set_book(book);
        }
        config
            .save(config_path)
            .map_err(|e| anyhow::anyhow!("Failed to create {}: {e}", config_path.display()))?;

        println!("Created {}", config_path.display());
        println!("  Address book: {}", config.book().display());
        println!();
        println!("Next steps:");
        println!("  keeper exec add contact \"Your Name\" 0501234567");
        println!("  keeper");
        Ok(())
    }
}
