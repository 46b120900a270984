pub mod alexa;
pub mod api_server;
pub mod clock;
pub mod config;
pub mod env_manager;
pub mod error;
pub mod intent_processor;
pub mod location;
pub mod slack;
pub mod snooze;
pub mod status;

use anyhow::Result;
use env_logger::Env;
use log::*;

pub async fn run(config: Config) -> Result<()> {
    info!("Starting snooze skill server");
    api_server::start_api_server(config).await
}

/// Timestamped log lines, `info` unless `RUST_LOG` or `SNOOZE_SKILL_LOG_LEVEL` says otherwise.
pub fn init_logger() {
    let default_level =
        env_manager::get_env_var("SNOOZE_SKILL_LOG_LEVEL").unwrap_or_else(|| "info".to_string());

    env_logger::Builder::from_env(Env::default().default_filter_or(default_level))
        .format(|buf, record| {
            use chrono::Local;
            use std::io::Write;
            writeln!(
                buf,
                "{} [{}] {}",
                Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                record.args()
            )
        })
        .init();
}

// Re-export commonly used types
pub use config::Config;
pub use error::SkillError;
pub use intent_processor::{IntentKind, IntentProcessor, Services};
