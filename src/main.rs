use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use sealcfg::audit::AuditLogger;
use sealcfg::cli::{handle_entry_command, handle_envelope_command, PasswordArgs};
use sealcfg::config::{paths::SealPaths, settings::Settings, StoreBackend};
use sealcfg::services::ConfigService;
use sealcfg::storage::open_store;

#[derive(Parser)]
#[command(
    name = "sealcfg",
    author = "Kaylee Beyene",
    version,
    about = "Key/value configuration with password-sealed tokens",
    long_about = "sealcfg manages a flat configuration store of strings, numbers, \
                  flags, tokens and key groups. Tokens can be sealed with a password \
                  (PBKDF2-HMAC-SHA256 + AES-256-GCM) and are only decrypted for a \
                  single read, edit or copy."
)]
struct Cli {
    /// Config store backend (file or http), overriding the settings file
    #[arg(long, global = true, env = "SEALCFG_STORE")]
    store: Option<StoreBackend>,

    /// Base URL of the HTTP config API, overriding the settings file
    #[arg(long, global = true, env = "SEALCFG_SERVER_URL")]
    server_url: Option<String>,

    #[command(flatten)]
    passwords: PasswordArgs,

    /// More log output on stderr (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    #[command(flatten)]
    Entry(sealcfg::cli::EntryCommands),

    /// Seal or open a single value without the config store
    #[command(subcommand)]
    Envelope(sealcfg::cli::EnvelopeCommands),

    /// Show recent audit log entries
    Audit {
        /// Number of entries to show
        #[arg(short = 'n', long, default_value = "20")]
        limit: usize,
    },

    /// Create the data directory and settings file
    Init,

    /// Show current configuration and paths
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let paths = SealPaths::new()?;
    let mut settings = Settings::load_or_create(&paths)?;
    if let Some(backend) = cli.store {
        settings.store.backend = backend;
    }
    if let Some(url) = cli.server_url {
        settings.store.server_url = url;
    }

    match cli.command {
        Some(Commands::Entry(cmd)) => {
            paths.ensure_directories()?;
            let store = open_store(&paths, &settings)?;
            let mut service = ConfigService::open(store)?;
            if settings.audit.enabled {
                service.subscribe(Box::new(AuditLogger::new(paths.audit_log())));
            }

            handle_entry_command(&mut service, &settings, &cli.passwords, cmd)?;
        }
        Some(Commands::Envelope(cmd)) => {
            handle_envelope_command(&cli.passwords, cmd)?;
        }
        Some(Commands::Audit { limit }) => {
            let logger = AuditLogger::new(paths.audit_log());
            let entries = logger.read_recent(limit)?;
            if entries.is_empty() {
                println!("No audit entries.");
            }
            for entry in entries {
                println!("{}", entry.format_human_readable());
            }
        }
        Some(Commands::Init) => {
            println!("Initializing sealcfg at: {}", paths.base_dir().display());
            paths.ensure_directories()?;
            settings.save(&paths)?;
            println!("Initialization complete!");
            println!();
            println!("Run 'sealcfg set <key> <value>' to add an entry.");
            println!("Run 'sealcfg set <key> -t token' to store an encrypted token.");
        }
        Some(Commands::Config) => {
            println!("sealcfg Configuration");
            println!("=====================");
            println!("Base directory:   {}", paths.base_dir().display());
            println!("Settings file:    {}", paths.settings_file().display());
            println!("Values file:      {}", paths.values_file().display());
            println!("Types file:       {}", paths.types_file().display());
            println!("Audit log:        {}", paths.audit_log().display());
            println!("Initialized:      {}", if paths.is_initialized() { "yes" } else { "no" });
            println!();
            println!("Settings:");
            println!("  Store backend:  {}", settings.store.backend);
            println!("  Server URL:     {}", settings.store.server_url);
            println!("  Timeout:        {}s", settings.store.timeout_secs);
            println!("  Encrypt tokens: {}", settings.encryption.encrypt_tokens);
            println!("  Audit log:      {}", settings.audit.enabled);
        }
        None => {
            println!("sealcfg - key/value configuration with sealed tokens");
            println!();
            println!("Run 'sealcfg --help' for usage information.");
        }
    }

    Ok(())
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_env("SEALCFG_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(format!("sealcfg={level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
