use actix_web::web::Data;
use anyhow::{Context, Result};
use log::{info, warn};

mod chart;
mod config;
mod db;
mod error;
mod schema;
mod session;
mod views;
mod web;

#[actix_web::main]
async fn main() -> Result<()> {
    let config = config::Config::from_env()?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&config.log_filter))
        .init();

    let database_url = config.database.url();
    info!(
        "Using {} database at {database_url} (integrated auth: {})",
        config.database.driver, config.database.integrated_auth
    );
    if config.database.integrated_auth {
        warn!("Integrated authentication has no effect on sqlite databases");
    }

    if config.database.bootstrap {
        let mut db = db::Db::connect(&database_url)
            .with_context(|| format!("opening {database_url}"))?;
        db.bootstrap(&config.database.seed)?;
    }

    let state = Data::new(web::AppState::new(config)?);
    web::new_http_server(state).await?;
    Ok(())
}
