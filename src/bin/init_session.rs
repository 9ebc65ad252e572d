//! Session initialization binary.

use std::path::PathBuf;

use clap::Parser;
use telegram_sender::commands::init_session;
use telegram_sender::config::{self, Settings};
use telegram_sender::logging;

#[derive(Parser)]
#[command(name = "init_session")]
#[command(about = "Log in once and create the Telegram session file", long_about = None)]
struct Args {
    /// Path to the YAML config file
    #[arg(long, env = config::ENV_CONFIG_FILE, default_value = config::DEFAULT_CONFIG_FILE)]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // SENDER_CONFIG may come from .env
    config::load_dotenv();
    let args = Args::parse();

    logging::init(None)?;

    let settings = Settings::load(&args.config)?;
    init_session::run(&settings.credentials).await?;
    Ok(())
}
