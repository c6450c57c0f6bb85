mod config;
mod database;
mod error;
mod models;

use crate::config::Config;
use crate::database::Database;
use crate::error::ServiceResult;

#[tokio::main]
async fn main() {
    let result = init().await;

    let exit_code = match result {
        Ok(_) => 0,
        Err(e) => {
            eprintln!("{}", e);
            1
        }
    };

    std::process::exit(exit_code);
}

/// One-shot bootstrap: read the configuration, connect to the store and
/// make sure every table of the data model exists.
async fn init() -> ServiceResult<()> {
    dotenv::dotenv().ok();
    env_logger::init();

    let config = Config::from_env()?;
    log::info!(
        "provisioning schema in database '{}' at {}:{}",
        config.database,
        config.host,
        config.port
    );

    let database = Database::connect(&config).await?;
    database.provision().await?;

    log::info!("schema is up to date");
    Ok(())
}
