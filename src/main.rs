use std::time::Duration;

use dotenvy::dotenv;
use food_order_service::config::Config;
use food_order_service::{
    build_order_service, build_publisher, build_server, create_pool, run_migrations,
};

const SHUTDOWN_FLUSH_TIMEOUT: Duration = Duration::from_secs(5);

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            log::error!("{}", e);
            std::process::exit(1);
        }
    };

    let pool = match create_pool(&config.database_url, config.db_pool_max_size) {
        Ok(p) => p,
        Err(e) => {
            log::error!("Failed to create database connection pool: {}", e);
            std::process::exit(1);
        }
    };
    if let Err(e) = run_migrations(&pool) {
        log::error!("Failed to run database migrations: {}", e);
        std::process::exit(1);
    }
    log::info!("Database migrations applied");

    let publisher = match build_publisher(&config) {
        Ok(p) => p,
        Err(e) => {
            log::error!("{}", e);
            std::process::exit(1);
        }
    };

    let service = match build_order_service(&config, pool, publisher.clone()) {
        Ok(s) => s,
        Err(e) => {
            log::error!("{}", e);
            std::process::exit(1);
        }
    };

    log::info!(
        "Starting server at http://{}:{} (traffic model: {}, external call timeout: {:?})",
        config.host,
        config.port,
        config.traffic_model,
        config.external_call_timeout
    );

    let served = build_server(service, &config.host, config.port)?.await;

    if let Err(e) = publisher.flush(SHUTDOWN_FLUSH_TIMEOUT) {
        log::warn!(
            "{} order event(s) still queued at shutdown were dropped: {}",
            publisher.in_flight_count(),
            e
        );
    }

    served
}
