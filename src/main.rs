mod cli;

use artvault::{
    bootstrap::{self, SeedOutcome},
    config,
    images::ImageImporter,
    server,
    store::RecordStore,
};

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use std::path::{Path, PathBuf};

/// Resolve the server config and seed the store before the runtime starts
fn prepare_server(
    host: Option<String>,
    port: Option<u16>,
    config_path: Option<&Path>,
) -> Result<config::Config> {
    let mut config = config::load_config_or_default(config_path)?;

    // Override host/port from CLI if specified
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }

    tracing::info!("Starting artvault server");

    // Deployments ship a read-only seed; make sure the writable copy exists first
    bootstrap::prepare_store(&config.storage)?;

    Ok(config)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "artvault=trace,artvault_common=debug,tower_http=debug".to_string()
        } else {
            "artvault=info,tower_http=info".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Serve { host, port } => {
            let config = prepare_server(host, port, cli.config.as_deref())?;

            // Create tokio runtime
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(server::start_server(config))
        }
        Commands::Normalize { store, dry_run } => {
            normalize(store, cli.config.as_deref(), dry_run)
        }
        Commands::ImportImages {
            store,
            images_dir,
            dry_run,
        } => import_images(store, images_dir, cli.config.as_deref(), dry_run),
        Commands::Seed { seed, target } => seed_store(seed, target, cli.config.as_deref()),
        Commands::MigrateStore { store } => migrate_store(store, cli.config.as_deref()),
        Commands::Validate {
            config: config_path,
        } => {
            let path = config_path.or(cli.config);
            validate_config(path.as_deref())
        }
        Commands::Version => {
            println!("artvault {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

/// Resolve the store path: CLI flag first, then config
fn resolve_store(store: Option<PathBuf>, config_path: Option<&Path>) -> Result<RecordStore> {
    let path = match store {
        Some(path) => path,
        None => config::load_config_or_default(config_path)?.storage.store_path,
    };

    if !path.exists() {
        anyhow::bail!("Record store does not exist: {:?}", path);
    }

    Ok(RecordStore::new(path))
}

fn normalize(store: Option<PathBuf>, config_path: Option<&Path>, dry_run: bool) -> Result<()> {
    let store = resolve_store(store, config_path)?;

    println!("Normalizing images in {}", store.path().display());
    let report = artvault::images::normalize_store(&store, dry_run)?;

    println!("Records: {}", report.total);
    println!("Prefixes stripped: {}", report.modified);
    if report.modified == 0 {
        println!("Store already normalized; nothing written.");
    } else if dry_run {
        println!("[DRY RUN] Store not written.");
    } else {
        println!("Store updated.");
    }

    Ok(())
}

fn import_images(
    store: Option<PathBuf>,
    images_dir: Option<PathBuf>,
    config_path: Option<&Path>,
    dry_run: bool,
) -> Result<()> {
    let images_dir = match images_dir {
        Some(dir) => dir,
        None => config::load_config_or_default(config_path)?.storage.images_dir,
    };
    if !images_dir.is_dir() {
        anyhow::bail!("Image directory does not exist: {:?}", images_dir);
    }

    let store = resolve_store(store, config_path)?;
    let importer = ImageImporter::new(images_dir);

    println!(
        "Importing images from {} into {}",
        importer.images_dir().display(),
        store.path().display()
    );
    let report = importer.import_store(&store, dry_run)?;

    println!("Records: {}", report.total);
    println!("Updated: {}", report.updated);
    println!("Missing image files: {}", report.missing);
    if report.updated == 0 {
        println!("No images embedded; nothing written.");
    } else if dry_run {
        println!("[DRY RUN] Store not written.");
    } else {
        println!("Store updated.");
    }

    Ok(())
}

fn seed_store(
    seed: Option<PathBuf>,
    target: Option<PathBuf>,
    config_path: Option<&Path>,
) -> Result<()> {
    let (seed, target) = match (seed, target) {
        (Some(seed), Some(target)) => (seed, target),
        (seed, target) => {
            let config = config::load_config_or_default(config_path)?;
            let seed = seed
                .or(config.storage.seed_path)
                .context("No seed path given; pass --seed or set storage.seed_path")?;
            (seed, target.unwrap_or(config.storage.store_path))
        }
    };

    match bootstrap::seed_store(&seed, &target)? {
        SeedOutcome::Copied { bytes } => {
            println!(
                "Copied seed {} to {} ({} bytes)",
                seed.display(),
                target.display(),
                bytes
            );
        }
        SeedOutcome::AlreadyPresent => {
            println!("{} already exists; leaving it untouched", target.display());
        }
    }

    Ok(())
}

fn migrate_store(store: Option<PathBuf>, config_path: Option<&Path>) -> Result<()> {
    let store = resolve_store(store, config_path)?;

    if store.migrate_to_canonical()? {
        println!("Rewrote {} as a bare record array", store.path().display());
    } else {
        println!("{} is already a bare record array", store.path().display());
    }

    Ok(())
}

fn validate_config(path: Option<&Path>) -> Result<()> {
    match path {
        Some(p) => {
            println!("Validating config: {:?}", p);
            let config = config::load_config(p)?;
            println!("✓ Configuration is valid");
            print_config_summary(&config);
        }
        None => {
            println!("No config file specified, using defaults");
            let config = config::Config::default();
            print_config_summary(&config);
        }
    }

    Ok(())
}

fn print_config_summary(config: &config::Config) {
    println!("  Server: {}:{}", config.server.host, config.server.port);
    println!("  Body limit: {} MB", config.server.body_limit_mb);
    println!(
        "  Allowed origins: {}",
        config.server.allowed_origins.len()
    );
    println!("  Store: {}", config.storage.store_path.display());
    match config.storage.seed_path {
        Some(ref seed) => println!("  Seed: {}", seed.display()),
        None => println!("  Seed: (none)"),
    }
    println!("  Images: {}", config.storage.images_dir.display());
}
