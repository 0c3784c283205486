use mongodb::bson::doc;
use mongodb::{options::ClientOptions, Client};

use crate::config::Config;
use crate::error::{BootstrapError, Result};

pub const APP_NAME: &str = "wm-mega-init";

/// Connects with the configured URI and pings `admin` so connectivity problems surface
/// before any step runs.
pub async fn init_db(config: &Config) -> Result<Client> {
    let mut client_options = ClientOptions::parse(&config.mongo_uri)
        .await
        .map_err(BootstrapError::Connect)?;
    client_options.app_name = Some(APP_NAME.to_string());
    client_options.server_selection_timeout = Some(config.server_selection_timeout);

    let client = Client::with_options(client_options).map_err(BootstrapError::Connect)?;

    client
        .database("admin")
        .run_command(doc! { "ping": 1 }, None)
        .await
        .map_err(BootstrapError::Connect)?;

    log::info!("Connected to MongoDB ({})", APP_NAME);
    Ok(client)
}
