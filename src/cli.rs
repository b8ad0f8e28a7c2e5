use std::{
    io,
    path::{Path, PathBuf},
};

mod command;
mod completion;
mod exec;
mod export;
mod init;
mod session;
mod table;
mod terminal;

use clap::ArgAction;
use keeper::{Config, Store};
use session::{Confirmation, Session};
use tracing::instrument;

#[derive(Debug, clap::Parser)]
#[command(version, about)]
pub struct Cli {
    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// The address book file, overriding the configured one
    #[arg(short, long, global = true)]
    book: Option<PathBuf>,

    /// The configuration file
    #[arg(short, long, default_value = "keeper.toml", global = true)]
    config: PathBuf,

    #[command(subcommand)]
    command: Option<Command>,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        Self::setup_logging(self.verbose);

        self.command
            .unwrap_or(Command::Repl)
            .run(&self.config, self.book)
    }

    fn setup_logging(verbosity: u8) {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let level = match verbosity {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        };

        let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_writer(io::stderr)
            .with_target(false)
            .with_thread_names(false)
            .with_line_number(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

#[derive(Debug, clap::Parser)]
pub enum Command {
    /// Start the interactive prompt (default)
    Repl,

    /// Run a single command and exit
    ///
    /// The words are read exactly as they would be typed at the prompt,
    /// for example `keeper exec add contact Alice 0501234567`.
    Exec(exec::Command),

    /// Write the address book to standard output
    Export(export::Command),

    /// Write a configuration file with default settings
    Init(init::Command),
}

impl Command {
    fn run(self, config_path: &Path, book: Option<PathBuf>) -> anyhow::Result<()> {
        match self {
            Self::Init(command) => command.run(config_path, book)?,
            Self::Repl => {
                let (config, store) = open(config_path, book)?;
                repl(config, store)?;
            }
            Self::Exec(command) => {
                let (config, store) = open(config_path, book)?;
                command.run(config, store)?;
            }
            Self::Export(command) => {
                let (_, store) = open(config_path, book)?;
                command.run(&store)?;
            }
        }
        Ok(())
    }
}

/// Loads the configuration and applies the address book override.
#[instrument]
fn open(config_path: &Path, book: Option<PathBuf>) -> anyhow::Result<(Config, Store)> {
    let mut config = Config::load_or_default(config_path)?;
    if let Some(book) = book {
        config.set_book(book);
    }
    tracing::debug!(book = %config.book().display(), "Using address book");
    let store = Store::new(config.book());
    Ok((config, store))
}

fn repl(config: Config, store: Store) -> anyhow::Result<()> {
    let book = store.load()?;
    let mut session = Session::new(book, store, config, Confirmation::Prompt, io::stdout());
    session.run()?;
    Ok(())
}
