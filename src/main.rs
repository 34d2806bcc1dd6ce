use actix_cors::Cors;
use actix_web::middleware::Logger;
use actix_web::{web, App, HttpServer};
use chrono::Duration;
use log::info;

use taskhive::auth::{AuthMiddleware, TokenService};
use taskhive::config::Config;
use taskhive::routes;
use taskhive::state::AppState;
use taskhive::store;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init();

    let config = Config::from_env();
    let store = store::connect(&config.store_url, &config.store_database)
        .expect("Failed to open document store");
    let tokens = TokenService::new(
        &config.token_secret,
        Duration::minutes(config.token_ttl_minutes),
    );
    let state = AppState::new(store, tokens);

    info!("Starting TaskHive server at {}", config.server_url());

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(state.clone()))
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .wrap(Logger::default())
            .service(routes::health::health)
            .service(
                web::scope("/api")
                    .wrap(AuthMiddleware::new(state.identity_resolver()))
                    .configure(routes::config),
            )
    })
    .bind((config.server_host, config.server_port))?
    .run()
    .await
}
