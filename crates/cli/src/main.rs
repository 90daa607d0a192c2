use clap::Parser;
use tracing_subscriber::EnvFilter;

use cp_cli::bootstrap;
use cp_cli::cli::{self, Cli, Command, ConfigCommand};
use cp_domain::config::LoggingConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Some(Command::Version) = cli.command {
        println!("chatpal {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let (config, config_path) = cli::load_config(&cli.global)?;
    init_tracing(&config.logging);

    match cli.command {
        Some(Command::Config(ConfigCommand::Validate)) => {
            if !cli::config::validate(&config, &config_path) {
                std::process::exit(1);
            }
            return Ok(());
        }
        Some(Command::Config(ConfigCommand::Show)) => return cli::config::show(&config),
        Some(Command::Doctor) => {
            if !cli::doctor::run(&config, &config_path).await? {
                std::process::exit(1);
            }
            return Ok(());
        }
        _ => {}
    }

    let session = bootstrap::build_session(&config)?;

    match cli.command {
        // Default to the REPL when no subcommand is given.
        None => cli::chat::chat(&session, false).await,
        Some(Command::Chat { new }) => cli::chat::chat(&session, new).await,
        Some(Command::Send { message, json }) => {
            if !cli::commands::send(&session, &message, json).await? {
                std::process::exit(1);
            }
            Ok(())
        }
        Some(Command::New) => cli::commands::new_conversation(&session).await,
        Some(Command::Clear) => {
            if !cli::commands::clear(&session).await {
                std::process::exit(1);
            }
            Ok(())
        }
        Some(Command::History { json }) => cli::commands::history(&session, json).await,
        Some(Command::Status) => {
            if !cli::commands::status(&session).await {
                std::process::exit(1);
            }
            Ok(())
        }
        Some(Command::Reset) => {
            cli::commands::reset(&session);
            Ok(())
        }
        Some(Command::Info) => {
            cli::commands::info(&session);
            Ok(())
        }
        Some(Command::Predict { symptoms }) => cli::commands::predict(&session, symptoms).await,
        Some(Command::Doctors {
            speciality,
            lat,
            lon,
        }) => cli::commands::doctors(&session, speciality, lat, lon).await,
        Some(Command::Outbreak { lat, lon }) => cli::commands::outbreak(&session, lat, lon).await,
        Some(Command::Version | Command::Doctor | Command::Config(_)) => Ok(()),
    }
}

/// Initialize logging to stderr so stdout carries only replies.
///
/// `RUST_LOG` wins over the configured filter.
fn init_tracing(cfg: &LoggingConfig) {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&cfg.filter))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr);

    if cfg.json {
        builder.json().init();
    } else {
        builder.with_target(false).init();
    }
}
