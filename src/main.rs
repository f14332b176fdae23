mod config;
mod core;
mod error;
mod logging;
mod providers;
pub mod models;

extern crate dotenv;

use dotenv::dotenv;
use tracing::error;

use crate::config::Config;
use crate::core::runtime::Runtime;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    if let Err(e) = dotenv() {
        eprintln!("No .env file loaded: {}", e);
    }

    logging::init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("configuration error: {:#}", e);
            std::process::exit(1);
        }
    };

    let mut runtime = Runtime::new(config);
    runtime.run_periodically().await?;

    Ok(())
}
