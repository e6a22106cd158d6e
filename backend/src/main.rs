mod config;
mod services;
mod shopify;

use crate::config::AppConfig;
use crate::shopify::{DraftOrderGateway, ShopifyClient};
use actix_web::{web, App, HttpServer};
use env_logger::Env;
use log::info;
use std::io;
use std::sync::Arc;

#[actix_web::main]
async fn main() -> io::Result<()> {
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let config = AppConfig::from_env().map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
    info!("Loaded configuration: {:?}", config);

    // Uploads are spooled and stored here, so it has to exist before the first request.
    tokio::fs::create_dir_all(&config.uploads.upload_dir).await?;

    let client = ShopifyClient::new(&config.shopify).map_err(io::Error::other)?;
    info!("Draft orders go to {}", client.endpoint());
    let gateway: Arc<dyn DraftOrderGateway> = Arc::new(client);

    let host = config.host.clone();
    let port = config.port;
    let uploads = web::Data::new(config.uploads);
    let gateway = web::Data::from(gateway);

    info!("Server running at http://{}:{}", host, port);

    HttpServer::new(move || {
        App::new()
            .app_data(gateway.clone())
            .app_data(uploads.clone())
            .service(services::print_request::configure_routes())
    })
        .bind((host.as_str(), port))?
        .run()
        .await
}
