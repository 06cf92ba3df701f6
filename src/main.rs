use clap::{Parser, Subcommand};
use std::sync::Arc;
use std::time::Duration;

use nimbus_bot::application::errors::BotError;
use nimbus_bot::application::services::BotService;
use nimbus_bot::domain::traits::Bot;
use nimbus_bot::infrastructure::adapters::console::ConsoleAdapter;
use nimbus_bot::infrastructure::adapters::slack::SlackAdapter;
use nimbus_bot::infrastructure::config::Config;
use nimbus_bot::plugins::PluginManager;

#[derive(Parser)]
#[command(name = "nimbus-bot")]
#[command(about = "A plugin-based Slack command bot", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, default_value = "config.yaml")]
    config: String,

    /// Slack bot token (overrides config)
    #[arg(short, long)]
    token: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the bot
    Run,
    /// Show version
    Version,
    /// Print a default config
    InitConfig,
}

fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run => run_bot(&cli.config, cli.token),
        Commands::Version => {
            println!("nimbus-bot v{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Commands::InitConfig => init_config(),
    };

    if let Err(e) = result {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

fn load_config(path: &str) -> Result<Config, BotError> {
    if std::path::Path::new(path).exists() {
        Ok(Config::load(path)?.with_env())
    } else {
        tracing::warn!("Config file {} not found, using defaults", path);
        Ok(Config::load_env())
    }
}

fn run_bot(config_path: &str, token_override: Option<String>) -> Result<(), BotError> {
    let config = load_config(config_path)?;
    config.validate()?;

    tracing::info!("Starting {} with prefix '{}'", config.bot.name, config.bot.prefix);

    let mut plugins = PluginManager::new(&config.bot.prefix, config.plugins.clone());
    plugins.register_builtin()?;
    tracing::info!("Plugin system initialized with {} plugins", plugins.list_plugins().len());

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| BotError::Internal(format!("Failed to start runtime: {}", e)))?;

    let token = token_override.or_else(|| config.slack_token().map(str::to_string));
    rt.block_on(serve(config, plugins, token))
}

async fn serve(config: Config, plugins: PluginManager, token: Option<String>) -> Result<(), BotError> {
    if let Some(token) = token {
        let mut bot = SlackAdapter::new(token)
            .with_api_base(&config.slack.api_base)
            .with_channels(
                config.slack.channels.clone(),
                Duration::from_secs(config.slack.poll_interval_secs),
            );
        bot.fetch_bot_info().await?;

        let info = bot.bot_info();
        tracing::info!("Bot started: {} ({})", info.name, info.id);
        BotService::new(Arc::new(bot), plugins).start().await
    } else if config.console.enabled {
        let bot = ConsoleAdapter::new().with_admin(config.console.admin);
        BotService::new(Arc::new(bot), plugins).start().await
    } else {
        Err(BotError::Auth("No Slack token configured and console disabled".to_string()))
    }
}

fn init_config() -> Result<(), BotError> {
    let yaml = Config::default().to_yaml()?;
    println!("{}", yaml);
    println!("\nSave this to config.yaml and adjust as needed.");
    Ok(())
}
