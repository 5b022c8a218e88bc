//! Clef CLI - Run block cipher commands from scripts or an interactive shell.

mod script;

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use clef_cipher::{catalog, random};
use clef_host::{init_ciphers, CipherRecord, CommandEnv, HostConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::script::Interpreter;

// ============================================================================
// CLI Structure
// ============================================================================

#[derive(Parser)]
#[command(name = "clef")]
#[command(about = "Nubster Clef - Handle-based block cipher commands")]
#[command(version)]
struct Cli {
    /// JSON configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Command namespace (overrides the configuration file)
    #[arg(long, env = "CLEF_NAMESPACE")]
    namespace: Option<String>,

    /// Log filter, e.g. `debug` or `clef_keys=trace` (defaults to RUST_LOG)
    #[arg(long, env = "CLEF_LOG")]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the ciphers compiled into this build
    Ciphers {
        /// Print the records as JSON
        #[arg(long)]
        json: bool,
    },
    /// Run a script file, stopping at the first error
    Run {
        /// Script path
        script: PathBuf,
    },
    /// Read commands from stdin interactively
    Shell,
    /// Print a random key for a cipher, hex encoded
    Keygen {
        /// Cipher name
        cipher: String,
        /// Requested key size in bytes (normalized for the cipher)
        #[arg(long)]
        size: Option<usize>,
    },
}

// ============================================================================
// Setup
// ============================================================================

fn init_tracing(level: Option<&str>) {
    let filter = match level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::from_default_env(),
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

fn load_config(path: Option<&Path>, namespace: Option<String>) -> Result<HostConfig> {
    let mut config = match path {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config {}", path.display()))?;
            serde_json::from_str(&raw)
                .with_context(|| format!("Failed to parse config {}", path.display()))?
        },
        None => HostConfig::default(),
    };

    if let Some(namespace) = namespace {
        config.namespace = namespace;
    }
    if config.namespace.is_empty() {
        bail!("Namespace cannot be empty");
    }

    Ok(config)
}

fn interpreter(config: HostConfig) -> Result<Interpreter> {
    let mut env = CommandEnv::new();
    init_ciphers(&mut env, &config).context("Failed to register ciphers")?;
    Ok(Interpreter::new(env, config))
}

// ============================================================================
// Command Handlers
// ============================================================================

fn cmd_ciphers(config: &HostConfig, json: bool) -> Result<()> {
    let mut env = CommandEnv::new();
    let records = init_ciphers(&mut env, config).context("Failed to register ciphers")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }

    println!(
        "{:<10} {:>3} {:>8} {:>8} {:>6} {:>7}",
        "NAME", "ID", "MIN KEY", "MAX KEY", "BLOCK", "ROUNDS"
    );
    for CipherRecord {
        name,
        id,
        min_key_length,
        max_key_length,
        block_length,
        default_rounds,
        ..
    } in &records
    {
        println!(
            "{:<10} {:>3} {:>8} {:>8} {:>6} {:>7}",
            name, id, min_key_length, max_key_length, block_length, default_rounds
        );
    }

    Ok(())
}

fn cmd_run(config: HostConfig, script: &Path) -> Result<()> {
    let mut interp = interpreter(config)?;
    let stdout = io::stdout();
    let mut out = stdout.lock();
    interp.run_file(script, &mut out)?;
    out.flush()?;
    Ok(())
}

fn cmd_shell(config: HostConfig) -> Result<()> {
    let mut interp = interpreter(config)?;
    let stdin = io::stdin();
    interp.shell(stdin.lock(), &mut io::stdout(), &mut io::stderr())
}

fn cmd_keygen(cipher: &str, size: Option<usize>) -> Result<()> {
    let descriptor =
        catalog::find(cipher).with_context(|| format!("Unknown cipher: {cipher}"))?;
    let key = random::generate_key_for(descriptor, size)?;
    println!("{}", hex::encode(key.as_bytes()));
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_level.as_deref());

    let config = load_config(cli.config.as_deref(), cli.namespace)?;
    tracing::debug!(namespace = %config.namespace, "Configuration loaded");

    match cli.command {
        Commands::Ciphers { json } => cmd_ciphers(&config, json),
        Commands::Run { script } => cmd_run(config, &script),
        Commands::Shell => cmd_shell(config),
        Commands::Keygen { cipher, size } => cmd_keygen(&cipher, size),
    }
}
