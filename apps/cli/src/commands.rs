//! CLI command definitions, routing, and tracing setup.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use kitguide_core::{KeywordTable, KitCatalog, KitGuide, StageClassifier};
use kitguide_server::ServeOptions;
use kitguide_shared::{AppConfig, init_config, load_config, load_config_from};
use tracing::info;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// KitGuide — stage-aware help for robotics kit learners.
#[derive(Parser)]
#[command(
    name = "kitguide",
    version,
    about = "Identify a learner's robotics kit and route questions to the right build stage.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Config file to use instead of ~/.kitguide/kitguide.toml.
    #[arg(long, global = true, env = "KITGUIDE_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Start the HTTP chat API.
    Serve {
        /// Bind address (overrides config).
        #[arg(long)]
        host: Option<String>,

        /// Bind port (overrides config).
        #[arg(short, long)]
        port: Option<u16>,

        /// Kits JSON file (overrides config).
        #[arg(long)]
        data: Option<PathBuf>,
    },

    /// Answer one chat message locally and print the reply as JSON.
    Ask {
        /// Order ID or kit ID.
        identifier: String,

        /// The learner's message.
        message: String,

        /// Kits JSON file (overrides config).
        #[arg(long)]
        data: Option<PathBuf>,
    },

    /// Show the session summary for an order ID or kit ID.
    Kit {
        /// Order ID or kit ID.
        identifier: String,

        /// Kits JSON file (overrides config).
        #[arg(long)]
        data: Option<PathBuf>,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Default filter directives for a `-v` count.
fn default_filter(verbose: u8) -> &'static str {
    match verbose {
        0 => "kitguide=info,kitguide_shared=info,kitguide_core=info,kitguide_server=info,tower_http=info",
        1 => "kitguide=debug,kitguide_shared=debug,kitguide_core=debug,kitguide_server=debug,tower_http=debug",
        _ => "kitguide=trace,kitguide_shared=trace,kitguide_core=trace,kitguide_server=trace,tower_http=trace",
    }
}

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(cli.verbose)));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config.as_deref();
    match cli.command {
        Command::Serve { host, port, data } => {
            cmd_serve(config_path, host, port, data.as_deref()).await
        }
        Command::Ask {
            identifier,
            message,
            data,
        } => cmd_ask(config_path, &identifier, &message, data.as_deref()).await,
        Command::Kit { identifier, data } => {
            cmd_kit(config_path, &identifier, data.as_deref()).await
        }
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init().await,
            ConfigAction::Show => cmd_config_show(config_path).await,
        },
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn resolve_config(path: Option<&Path>) -> Result<AppConfig> {
    let config = match path {
        Some(p) => load_config_from(p)?,
        None => load_config()?,
    };
    Ok(config)
}

/// Load the catalog and build the guide. `data` overrides `[data] kits_path`.
fn build_guide(config: &AppConfig, data: Option<&Path>) -> Result<KitGuide> {
    let kits_path = data
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(&config.data.kits_path));

    if !kits_path.is_file() {
        return Err(eyre!(
            "kit data not found at '{}' — pass --data or set [data] kits_path",
            kits_path.display()
        ));
    }

    let catalog = KitCatalog::load(&kits_path)?;
    let table = KeywordTable::builtin().with_overrides(&config.stage_keywords);
    Ok(KitGuide::new(catalog, StageClassifier::new(table)))
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

async fn cmd_serve(
    config_path: Option<&Path>,
    host: Option<String>,
    port: Option<u16>,
    data: Option<&Path>,
) -> Result<()> {
    let config = resolve_config(config_path)?;
    let guide = build_guide(&config, data)?;

    let options = ServeOptions {
        host: host.unwrap_or_else(|| config.server.host.clone()),
        port: port.unwrap_or(config.server.port),
        cors_allow_origins: config.server.cors_allow_origins.clone(),
    };

    info!(
        host = %options.host,
        port = options.port,
        kits = guide.catalog().len(),
        "starting KitGuide API"
    );
    println!("Serving KitGuide API on http://{}:{}", options.host, options.port);

    kitguide_server::serve(guide, &options).await?;
    Ok(())
}

async fn cmd_ask(
    config_path: Option<&Path>,
    identifier: &str,
    message: &str,
    data: Option<&Path>,
) -> Result<()> {
    let config = resolve_config(config_path)?;
    let guide = build_guide(&config, data)?;

    let reply = guide.chat(identifier, message)?;
    println!("{}", serde_json::to_string_pretty(&reply)?);
    Ok(())
}

async fn cmd_kit(config_path: Option<&Path>, identifier: &str, data: Option<&Path>) -> Result<()> {
    let config = resolve_config(config_path)?;
    let guide = build_guide(&config, data)?;

    let session = guide.start_session(identifier)?;

    println!();
    println!("  Kit:        {} ({})", session.kit_name, session.kit_id);
    println!("  Age group:  {}", session.age_group);
    println!("  Difficulty: {}", session.difficulty);
    if let Ok(kit) = guide.kit(&session.kit_id) {
        println!("  Stages:     {}", kit.stage_names().join(", "));
    }
    println!();
    for question in &session.next_questions {
        println!("  - {question}");
    }
    println!();

    Ok(())
}

async fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

async fn cmd_config_show(config_path: Option<&Path>) -> Result<()> {
    let config = resolve_config(config_path)?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}
