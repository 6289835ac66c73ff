use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "artvault")]
#[command(author, version, about = "Art database maintenance tools and HTTP server")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP server for static assets and the artwork API
    Serve {
        /// Host to bind to (overrides config)
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (overrides config)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Strip data URI prefixes from record images
    Normalize {
        /// Record store to rewrite (overrides config)
        #[arg(long)]
        store: Option<PathBuf>,

        /// Report what would change without writing
        #[arg(long)]
        dry_run: bool,
    },

    /// Embed per-record image files into the record store
    ImportImages {
        /// Record store to rewrite (overrides config)
        #[arg(long)]
        store: Option<PathBuf>,

        /// Directory holding <00000>.jpg image files (overrides config)
        #[arg(long)]
        images_dir: Option<PathBuf>,

        /// Report what would change without writing
        #[arg(long)]
        dry_run: bool,
    },

    /// Copy the seed store to the writable location if it does not exist yet
    Seed {
        /// Read-only seed store (overrides config)
        #[arg(long)]
        seed: Option<PathBuf>,

        /// Writable store location (overrides config)
        #[arg(long)]
        target: Option<PathBuf>,
    },

    /// Rewrite a legacy {"records": [...]} store as a bare array
    MigrateStore {
        /// Record store to migrate (overrides config)
        #[arg(long)]
        store: Option<PathBuf>,
    },

    /// Validate configuration file
    Validate {
        /// Config file to validate (uses default if not specified)
        config: Option<PathBuf>,
    },

    /// Display version information
    Version,
}
