use std::{path::PathBuf, sync::Arc};

use {
    anyhow::{Context, Result},
    clap::Parser,
    secrecy::ExposeSecret,
};

use {
    sigil_config::ConfigStore,
    sigil_discord::BotState,
    sigil_nlu::HttpNluClient,
    sigil_skills::{Dispatcher, builtin},
};

/// A Discord bot that listens for natural language instead of commands.
///
/// Messages are classified by an external NLU service into intents; each
/// intent is handled by a skill that replies with a persistent, volatile,
/// or ephemeral message.
#[derive(Parser, Debug)]
#[command(version)]
struct Args {
    /// Path to the TOML configuration file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Discord bot token; overrides the configuration file.
    #[arg(long, env = "SIGIL_DISCORD_TOKEN")]
    token: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let config_path = args.config.unwrap_or_else(ConfigStore::default_path);
    let config = ConfigStore::load(&config_path)
        .with_context(|| format!("failed to load config from {}", config_path.display()))?;

    let token = args
        .token
        .unwrap_or_else(|| config.token().expose_secret().clone());

    let registry = builtin::default_registry().context("skill registration failed")?;
    let nlu = Arc::new(HttpNluClient::new(&config.nlu()));
    let state = Arc::new(BotState::new(Dispatcher::new(registry), nlu, config));

    sigil_discord::run(state, &token)
        .await
        .context("gateway client exited")?;
    Ok(())
}
