mod config;
mod db;
mod error;
mod filters;
mod middleware;
mod models;
mod pagination;
mod routes;
mod serializers;
mod services;
mod utils;
#[cfg(test)]
mod test_support;

use actix_web::{App, HttpServer, middleware::Logger, web};
use std::io;

use crate::config::AppConfig;
use crate::services::identity::IdentityClient;

#[actix_web::main]
async fn main() -> io::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // 1. Configuration (.env + environnement)
    let config = AppConfig::from_env().map_err(|e| io::Error::other(e.to_string()))?;

    // 2. Connexion à la base
    log::info!("Connecting to database...");
    let db = db::establish_connection(&config)
        .await
        .map_err(|e| io::Error::other(format!("Failed to connect to database: {}", e)))?;
    log::info!("Database connected");

    // 3. Client du service d'identité (activation / reset password)
    let identity = IdentityClient::new(&config.identity_service_url);

    let bind = (config.host.clone(), config.port);
    log::info!("Starting server on http://{}:{}", bind.0, bind.1);

    let db = web::Data::new(db);
    let config = web::Data::new(config);
    let identity = web::Data::new(identity);

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(db.clone())
            .app_data(config.clone())
            .app_data(identity.clone())
            .configure(routes::configure_routes)
    })
        .bind(bind)?
        .run()
        .await
}
