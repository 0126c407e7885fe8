use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::domain::app_config::AppConfig;
use crate::domain::error::Result;
use crate::infrastructure::config::ConfigService;
use crate::interfaces::cli::Cli;

fn init_tracing(filter: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn load_config(cli: &Cli) -> Result<AppConfig> {
    let mut config = ConfigService::new(cli.config.as_deref()).load()?;
    if let Some(mode) = cli.mode {
        config.schema_mode = mode.into();
    }
    Ok(config)
}

pub async fn run() -> i32 {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(err) => {
            init_tracing("info");
            tracing::error!(error = %err, "Failed to load configuration");
            eprintln!("{}", err);
            return 2;
        }
    };
    init_tracing(&config.log_filter);
    tracing::debug!(?config, "configuration loaded");

    match crate::interfaces::cli::execute(cli.command, config).await {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("{}", err);
            1
        }
    }
}
