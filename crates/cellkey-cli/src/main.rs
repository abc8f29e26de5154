//! Operator CLI for the parcel locker system.
//!
//! Wires the storage, hardware, and service crates together for headless
//! use: issuing codes, redeeming them, and opening lockers directly without
//! the kiosk web frontend. With `--mock` (or `CELLKEY_SERIAL_BACKEND=mock`)
//! the whole flow runs against the simulated controller, which is how CI
//! smoke-tests the workflow.

use anyhow::Result;
use cellkey_core::LockerNumber;
use cellkey_hardware::{
    MockSerialBackend, SerialBackend, SerialSettings, SerialTransport, backend_from_env,
};
use cellkey_protocol::known_cells;
use cellkey_service::{LockerService, QrArtifactStore, ServiceError};
use cellkey_storage::{Database, DatabaseConfig, SqliteAccessCodeRepository};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "cellkey", version, about = "Parcel locker operator tool")]
struct Cli {
    /// SQLite database path
    #[arg(long, default_value = "cellkey.db")]
    database: String,

    /// Directory QR artifacts are written under (the static-serving root)
    #[arg(long, default_value = "static")]
    static_root: PathBuf,

    /// Serial device of the locker controller
    #[arg(long)]
    port: Option<String>,

    /// Use the simulated serial backend (same as CELLKEY_SERIAL_BACKEND=mock)
    #[arg(long)]
    mock: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Issue a new access code for a cell
    Issue {
        /// Cell identifier (see `cells`)
        cell: String,
    },

    /// Redeem a presented access code
    Redeem {
        /// The 12-digit code
        code: String,
    },

    /// Open a locker directly, bypassing access codes
    Open {
        /// Physical locker number
        locker: LockerNumber,
    },

    /// List the cell identifiers known to this deployment
    Cells,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let backend: Arc<dyn SerialBackend> = if cli.mock {
        let (backend, _handle) = MockSerialBackend::new();
        Arc::new(backend)
    } else {
        backend_from_env()
    };
    let settings = match &cli.port {
        Some(port) => SerialSettings::new(port),
        None => SerialSettings::default(),
    };
    let transport = SerialTransport::new(backend, settings);

    let db = Database::new(DatabaseConfig::new(&cli.database)).await?;
    let repo = SqliteAccessCodeRepository::new(db.pool().clone());
    let service = LockerService::new(repo, transport, QrArtifactStore::new(&cli.static_root));

    let exit = match cli.command {
        Command::Issue { cell } => {
            let issued = service.issue(&cell).await?;
            println!("code:     {}", issued.code.as_str());
            println!("locker:   {}", issued.locker);
            println!("artifact: {}", issued.artifact_path.display());
            ExitCode::SUCCESS
        }
        Command::Redeem { code } => {
            let outcome = service.redeem(&code).await?;
            println!("{}", outcome.user_message());
            if outcome.is_unlocked() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
        Command::Open { locker } => match service.open_locker(locker).await {
            Ok(()) => {
                println!("Locker {locker} open");
                ExitCode::SUCCESS
            }
            Err(e @ (ServiceError::Hardware(_) | ServiceError::UnknownLocker(_))) => {
                eprintln!("{e}");
                ExitCode::FAILURE
            }
            Err(e) => return Err(e.into()),
        },
        Command::Cells => {
            for cell in known_cells() {
                println!("{cell}");
            }
            ExitCode::SUCCESS
        }
    };

    db.close().await;
    Ok(exit)
}
