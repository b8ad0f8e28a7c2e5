use std::io;

use keeper::{Config, Store};
use tracing::instrument;

use super::{
    command,
    session::{Confirmation, Session},
};

#[derive(Debug, clap::Parser)]
pub struct Command {
    /// Answer yes to any confirmation the command asks for
    #[arg(short, long)]
    yes: bool,

    /// The command and its arguments
    #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
    words: Vec<String>,
}

impl Command {
    #[instrument(skip(config, store))]
    pub fn run(self, config: Config, store: Store) -> anyhow::Result<()> {
        let action = command::parse_words(&self.words)?;
        let book = store.load()?;

        Session::new(book, store, config, self.confirmation(), io::stdout()).execute(action)?;
        Ok(())
    }

    const fn confirmation(&self) -> Confirmation {
        if self.yes {
            Confirmation::AssumeYes
        } else {
            Confirmation::Refuse
        }
    }
}
