//! Command-line interface over a typed store, using JSON values.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use thiserror::Error;
use tracing_subscriber::EnvFilter;

use typed_store::{KeyringProvider, ObserveError, Store, StoreKey, StoreKind};

#[derive(Error, Debug)]
pub enum AppError {
    #[error("store error: {0}")]
    Store(#[from] typed_store::Error),

    #[error("invalid JSON value: {0}")]
    Json(#[from] serde_json::Error),

    #[error("observation error: {0}")]
    Observe(#[from] ObserveError),
}

/// Backend selection for a key.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum KindArg {
    /// Process-lifetime only (useless across CLI invocations, but valid)
    Memory,
    /// Durable, stored in the clear
    Persistent,
    /// Durable, encrypted with a key from the OS keychain
    Encrypted,
}

impl From<KindArg> for StoreKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Memory => StoreKind::Memory,
            KindArg::Persistent => StoreKind::Persistent,
            KindArg::Encrypted => StoreKind::EncryptedPersistent,
        }
    }
}

#[derive(Parser)]
#[command(name = "typed-store")]
#[command(about = "Typed key-value storage with memory, persistent, and encrypted backends")]
struct Cli {
    /// Store path
    #[arg(long, default_value = ".typed-store", env = "TYPED_STORE_PATH")]
    path: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Store a JSON value under a key
    Set {
        /// Base id of the key
        id: String,

        /// JSON-encoded value
        value: String,

        /// Optional uuid parametrizing the key
        #[arg(long)]
        uuid: Option<String>,

        /// Backend to store the value in
        #[arg(long, value_enum, default_value_t = KindArg::Persistent)]
        kind: KindArg,
    },

    /// Print the value stored under a key
    Get {
        id: String,

        #[arg(long)]
        uuid: Option<String>,

        #[arg(long, value_enum, default_value_t = KindArg::Persistent)]
        kind: KindArg,
    },

    /// Remove the value stored under a key
    Del {
        id: String,

        #[arg(long)]
        uuid: Option<String>,

        #[arg(long, value_enum, default_value_t = KindArg::Persistent)]
        kind: KindArg,
    },

    /// Follow changes to a key, printing each observation event
    Watch {
        id: String,

        #[arg(long)]
        uuid: Option<String>,

        #[arg(long, value_enum, default_value_t = KindArg::Persistent)]
        kind: KindArg,
    },
}

fn key_for(id: String, uuid: Option<String>, kind: KindArg) -> StoreKey<serde_json::Value> {
    match uuid {
        Some(uuid) => StoreKey::parametrized(id, uuid, kind.into()),
        None => StoreKey::new(id, kind.into()),
    }
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let provider = KeyringProvider::new("typed-store", "store-key");
    let store = Store::open(&cli.path, &provider)?;

    match cli.command {
        Commands::Set {
            id,
            value,
            uuid,
            kind,
        } => {
            let value: serde_json::Value = serde_json::from_str(&value)?;
            store.set(&key_for(id, uuid, kind), &value)?;
        }

        Commands::Get { id, uuid, kind } => match store.get(&key_for(id, uuid, kind))? {
            Some(value) => println!("{value}"),
            None => eprintln!("(no value)"),
        },

        Commands::Del { id, uuid, kind } => {
            store.delete(&key_for(id, uuid, kind))?;
        }

        Commands::Watch { id, uuid, kind } => {
            let mut sub = store.observe(&key_for(id, uuid, kind))?;
            loop {
                match sub.recv().await {
                    Ok(event) => match event.element {
                        Some(value) => println!("{value}"),
                        None => println!("(absent)"),
                    },
                    Err(ObserveError::Lagged(skipped)) => {
                        eprintln!("warning: {skipped} events dropped");
                    }
                    Err(ObserveError::Closed) => break,
                    Err(err) => return Err(err.into()),
                }
            }
        }
    }

    store.shutdown()?;
    Ok(())
}
