use ai_tools::{run_bot, AiToolsConfig, Cli, Commands};
use anyhow::Result;
use clap::Parser;
use dbot_telegram::TelegramConfig;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run { token } => {
            let telegram = TelegramConfig::from_env(token)?;
            let config = AiToolsConfig::from_env()?;
            run_bot(telegram, config).await
        }
    }
}
