use anyhow::Result;
use log::{error, info, warn};
use snooze_skill::{env_manager, init_logger, Config};

#[tokio::main]
async fn main() -> Result<()> {
    let env_file = env_manager::load_env_file();
    init_logger();

    info!("Starting snooze skill");
    match env_file {
        Ok(path) => info!("Loaded environment from {:?}", path),
        Err(e) => info!("No .env file found or error loading it: {}", e),
    }

    let missing = env_manager::check_env_vars();
    if !missing.is_empty() {
        warn!("Set {} in the environment or a .env file", missing.join(", "));
    }

    let config = Config::load()?;
    if config.alexa.application_id.is_none() {
        warn!("No Alexa application id configured; requests from any skill will be accepted");
    }

    if let Err(err) = snooze_skill::run(config).await {
        error!("Server stopped: {:?}", err);
        return Err(err);
    }
    Ok(())
}
