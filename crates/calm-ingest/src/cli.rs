use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Top-level CLI parser for the `calm-ingest` binary.
#[derive(Debug, Parser)]
#[command(name = "calm-ingest", version, about = "CALM snapshot ingestion and earnings ledger")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Process an object-created notification (S3 event JSON file)
    Event {
        /// Path to the event JSON
        path: PathBuf,
    },

    /// Process a snapshot file already on local disk
    File {
        /// Participant the snapshot belongs to
        #[arg(long)]
        participant: String,

        /// Path to the snapshot database
        path: PathBuf,
    },

    /// Create a participant record with an assigned condition
    Register {
        participant: String,

        /// Experimental condition (A or B)
        #[arg(long)]
        condition: String,
    },
}
