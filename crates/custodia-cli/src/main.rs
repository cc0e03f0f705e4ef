//! # custodia
//!
//! Command-line front end for the share pipeline:
//! - **share**: encrypt a file, upload the ciphertext, and open its chain of
//!   custody
//! - **history**: print an owner's activity feed
//! - **open**: download, decrypt, and save a shared file
//! - **view**: record that a user viewed a file
//! - **reshare**: extend a file's share chain to another user

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

use custodia_cloud::{
    BlobStore, BlobStoreConfig, FsBlobStore, GeoConfig, HttpBlobStore, IpApiResolver,
};
use custodia_core::{ServiceConfig, ShareService};
use custodia_store::{AccessLevel, ProvenanceLedger, RecordId, SqliteLedger};

#[derive(Parser)]
#[command(name = "custodia")]
#[command(about = "Encrypted file sharing with chain-of-custody tracking")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Ledger database path (defaults to the platform data directory)
    #[arg(long, env = "CUSTODIA_LEDGER_PATH", global = true)]
    ledger: Option<PathBuf>,

    /// Keep blobs in a local directory instead of the hosted blob store
    #[arg(long, global = true)]
    blob_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Encrypt a file, upload it, and record the initial share
    Share {
        /// File to share
        file: PathBuf,

        /// Owner performing the share
        #[arg(long)]
        owner: String,

        /// Recipient user id
        #[arg(long)]
        to: String,

        /// Access level granted to the recipient
        #[arg(long, value_enum, default_value_t = AccessArg::ViewOnly)]
        access: AccessArg,
    },

    /// Print an owner's activity feed, newest first
    History {
        /// Owner whose records to list
        owner: String,
    },

    /// Download a shared file, decrypt it, and write the plaintext
    Open {
        /// Ledger record id
        record_id: String,

        /// Where to write the decrypted file
        #[arg(long)]
        out: PathBuf,

        /// Record the download as a view by this user
        #[arg(long)]
        viewer: Option<String>,
    },

    /// Record that a user viewed a file, without downloading it
    View {
        /// Ledger record id
        record_id: String,

        /// Viewing user id
        #[arg(long)]
        viewer: String,
    },

    /// Extend a file's share chain to another user
    Reshare {
        /// Ledger record id
        record_id: String,

        /// User performing the share (owner or "View and Share" grantee)
        #[arg(long)]
        from: String,

        /// Recipient user id
        #[arg(long)]
        to: String,

        /// Access level granted to the recipient
        #[arg(long, value_enum, default_value_t = AccessArg::ViewOnly)]
        access: AccessArg,
    },
}

/// Access levels as CLI values.
#[derive(Clone, Copy, ValueEnum)]
enum AccessArg {
    ViewOnly,
    ViewAndShare,
}

impl From<AccessArg> for AccessLevel {
    fn from(arg: AccessArg) -> Self {
        match arg {
            AccessArg::ViewOnly => AccessLevel::ViewOnly,
            AccessArg::ViewAndShare => AccessLevel::ViewAndShare,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // -----------------------------------------------------------------------
    // 1. Initialize tracing (respects RUST_LOG env var)
    // -----------------------------------------------------------------------
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,custodia_core=debug")),
        )
        .init();

    let cli = Cli::parse();

    // -----------------------------------------------------------------------
    // 2. Wire the service from flags and environment
    // -----------------------------------------------------------------------
    let blobs: Arc<dyn BlobStore> = match &cli.blob_dir {
        Some(dir) => Arc::new(FsBlobStore::new(dir.clone()).await?),
        None => Arc::new(HttpBlobStore::new(BlobStoreConfig::from_env())?),
    };

    let ledger: Arc<dyn ProvenanceLedger> = match &cli.ledger {
        Some(path) => Arc::new(SqliteLedger::open_at(path)?),
        None => Arc::new(SqliteLedger::new()?),
    };

    let locations = Arc::new(IpApiResolver::new(GeoConfig::from_env()));
    let service = ShareService::new(blobs, ledger, locations, ServiceConfig::from_env());

    // -----------------------------------------------------------------------
    // 3. Dispatch
    // -----------------------------------------------------------------------
    match cli.command {
        Commands::Share {
            file,
            owner,
            to,
            access,
        } => {
            let file_name = display_name(&file);
            let shared = service
                .share_file(&file, &file_name, &owner, &to, access.into())
                .await?;

            println!("{}", serde_json::to_string_pretty(&shared)?);
        }

        Commands::History { owner } => {
            let entries = service.load_access_history(&owner).await?;
            println!("{}", serde_json::to_string_pretty(&entries)?);
        }

        Commands::Open {
            record_id,
            out,
            viewer,
        } => {
            let record_id = RecordId(record_id);
            let plaintext = service.fetch_and_decrypt(&record_id).await?;
            tokio::fs::write(&out, &plaintext).await?;
            info!(path = %out.display(), size = plaintext.len(), "decrypted file written");

            if let Some(viewer) = viewer {
                let event = service.record_view(&record_id, &viewer).await?;
                println!("{}", serde_json::to_string_pretty(&event)?);
            }
        }

        Commands::View { record_id, viewer } => {
            let event = service.record_view(&RecordId(record_id), &viewer).await?;
            println!("{}", serde_json::to_string_pretty(&event)?);
        }

        Commands::Reshare {
            record_id,
            from,
            to,
            access,
        } => {
            let share = service
                .reshare(&RecordId(record_id), &from, &to, access.into())
                .await?;

            println!("{}", serde_json::to_string_pretty(&share)?);
        }
    }

    Ok(())
}

/// The user-facing file name: the final path component, or the whole path
/// when it has none.
fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
