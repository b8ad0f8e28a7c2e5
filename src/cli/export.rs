use std::io::{self, Write};

use keeper::{Store, storage::Snapshot};
use tracing::instrument;

#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
pub enum Format {
    #[default]
    Yaml,
    Json,
}

#[derive(Debug, clap::Parser)]
pub struct Command {
    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Yaml)]
    format: Format,
}

impl Command {
    #[instrument]
    pub fn run(self, store: &Store) -> anyhow::Result<()> {
        let book = store.load()?;
        let snapshot = Snapshot::from(&book);
        tracing::debug!(contacts = snapshot.len(), "Exporting address book");

        let mut out = io::stdout().lock();
        write(&snapshot, self.format, &mut out)?;
        out.flush()?;
        Ok(())
    }
}

fn write(snapshot: &Snapshot, format: Format, out: &mut impl Write) -> anyhow::Result<()> {
    match format {
        Format::Yaml => serde_yaml::to_writer(&mut *out, snapshot)?,
        Format::Json => {
            serde_json::to_writer_pretty(&mut *out, snapshot)?;
            writeln!(out)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use keeper::{AddressBook, Record};

    use super::*;

    fn snapshot() -> Snapshot {
        let mut book = AddressBook::new();
        let mut alice = Record::new("Alice").unwrap();
        alice.add_phone("0501234567").unwrap();
        book.add_record(alice);
        Snapshot::from(&book)
    }

    #[test]
    fn exports_json() {
        let mut out = Vec::new();
        write(&snapshot(), Format::Json, &mut out).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["_version"], "1");
        assert_eq!(value["contacts"][0]["name"], "Alice");
        assert_eq!(value["contacts"][0]["phones"][0], "+380501234567");
    }

    #[test]
    fn exports_yaml_that_loads_back() {
        let mut out = Vec::new();
        write(&snapshot(), Format::Yaml, &mut out).unwrap();

        let restored: Snapshot = serde_yaml::from_slice(&out).unwrap();
        let book = restored.into_book().unwrap();
        assert!(book.find_contact("Alice").is_some());
    }
}
