use actix_web::{web, HttpServer};
use env_logger::Env;

use todo_api::{config::Config, create_app, AppState};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            log::error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    // Without a store there is nothing to serve.
    let state = match AppState::from_config(&config).await {
        Ok(state) => {
            log::info!("Store connected");
            web::Data::new(state)
        }
        Err(e) => {
            log::error!("Store connection error: {}", e);
            std::process::exit(1);
        }
    };

    log::info!("Server running at {}", config.server_url());
    HttpServer::new(move || create_app(state.clone()))
        .bind((config.server_host.as_str(), config.server_port))?
        .run()
        .await
}
