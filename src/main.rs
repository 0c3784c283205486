use std::process::ExitCode;

use env_logger::Env;
use wm_mega_init::{config, db, services::bootstrap_service, BootstrapError};

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    match bootstrap().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

async fn bootstrap() -> Result<(), BootstrapError> {
    // Read configuration (MongoDB URI, database name, application user)
    let config = config::Config::from_env()?;
    log::debug!("{:?}", config);

    let client = db::init_db(&config).await?;

    // Get a handle to the target database
    let db = client.database(&config.mongo_db_name);

    let report = bootstrap_service::run(&db, &config).await?;
    if report.is_noop() {
        log::info!("{} was already initialized, nothing changed", report.database);
    }

    let problems = bootstrap_service::verify(&db, &config).await?;
    if !problems.is_empty() {
        return Err(BootstrapError::Verification(problems));
    }

    println!("{}", report);
    Ok(())
}
