pub mod chat;
pub mod commands;
pub mod config;
pub mod doctor;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use cp_domain::config::Config;

/// Environment variable naming the config file.
pub const CONFIG_ENV: &str = "CHATPAL_CONFIG";

/// ChatPal — talk to the Health ChatPal assistant from a terminal.
#[derive(Debug, Parser)]
#[command(name = "chatpal", version, about)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Args)]
pub struct GlobalArgs {
    /// Config file (defaults to $CHATPAL_CONFIG, then chatpal.toml).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
    /// Override `service.base_url`.
    #[arg(long, global = true)]
    pub base_url: Option<String>,
    /// Keep the session id in memory only.
    #[arg(long, global = true)]
    pub ephemeral: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Interactive chat (default when no subcommand is given).
    Chat {
        /// Start a new conversation instead of resuming the stored one.
        #[arg(long)]
        new: bool,
    },
    /// Send a single message and print the reply.
    Send {
        /// The message to send.
        message: String,
        /// Print the full result as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Start a new conversation and print its session id.
    New,
    /// Erase the current conversation's history on the service.
    Clear,
    /// Print the current conversation's history.
    History {
        /// Print raw JSON instead of formatted lines.
        #[arg(long)]
        json: bool,
    },
    /// Ask the service whether the current session still exists.
    Status,
    /// Forget the current session locally.
    Reset,
    /// Show the locally held session.
    Info,
    /// Predict a condition from a list of symptoms.
    Predict {
        #[arg(required = true)]
        symptoms: Vec<String>,
    },
    /// Find doctors of a speciality near a location.
    Doctors {
        speciality: String,
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        #[arg(long, allow_hyphen_values = true)]
        lon: f64,
    },
    /// Check for disease outbreak alerts near a location.
    Outbreak {
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        #[arg(long, allow_hyphen_values = true)]
        lon: f64,
    },
    /// Run diagnostic checks against the current configuration.
    Doctor,
    /// Configuration utilities.
    #[command(subcommand)]
    Config(ConfigCommand),
    /// Print version information.
    Version,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Parse the config file and report any errors.
    Validate,
    /// Dump the resolved configuration (with defaults) as TOML.
    Show,
}

// ── Config loading helper ─────────────────────────────────────────────

/// Resolve the config path: `--config`, then `CHATPAL_CONFIG`, then
/// `chatpal.toml`.
pub fn config_path(global: &GlobalArgs) -> PathBuf {
    global
        .config
        .clone()
        .or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("chatpal.toml"))
}

/// Load the configuration and layer environment and flag overrides on
/// top. A missing file means defaults. Returns the config and the path
/// that was consulted.
pub fn load_config(global: &GlobalArgs) -> anyhow::Result<(Config, PathBuf)> {
    let path = config_path(global);

    let mut config = if path.exists() {
        let raw = std::fs::read_to_string(&path)
            .map_err(|e| anyhow::anyhow!("reading {}: {e}", path.display()))?;
        parse_config(&raw).map_err(|e| anyhow::anyhow!("parsing {}: {e}", path.display()))?
    } else {
        Config::default()
    };

    config.apply_env();
    apply_flags(&mut config, global);
    Ok((config, path))
}

pub fn parse_config(raw: &str) -> Result<Config, toml::de::Error> {
    toml::from_str(raw)
}

/// Flags win over both the file and the environment.
pub fn apply_flags(config: &mut Config, global: &GlobalArgs) {
    if let Some(ref url) = global.base_url {
        config.service.base_url = url.clone();
    }
    if global.ephemeral {
        config.store.ephemeral = true;
    }
}
