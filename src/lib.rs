pub mod application;
pub mod config;
pub mod db;
pub mod domain;
pub mod errors;
pub mod handlers;
pub mod infrastructure;
pub mod schema;

use std::sync::Arc;

use actix_web::dev::Service;
use actix_web::{error, middleware::Logger, web, App, HttpResponse, HttpServer};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use thiserror::Error;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use application::announcer::OrderAnnouncer;
use application::order_service::OrderService;
use config::Config;
use domain::ports::EventPublisher;
use handlers::health::HealthState;
use infrastructure::catalog_repo::DieselCatalogRepository;
use infrastructure::google_maps::GoogleMapsClient;
use infrastructure::kafka::KafkaEventPublisher;
use infrastructure::order_repo::DieselOrderRepository;

pub use db::{create_pool, DbPool};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("could not create the Kafka producer: {0}")]
    Kafka(#[from] rdkafka::error::KafkaError),
    #[error("could not create the HTTP client: {0}")]
    Http(#[from] reqwest::Error),
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::orders::create_order,
        handlers::orders::get_order,
        handlers::health::health,
    ),
    components(schemas(
        handlers::orders::PlaceOrderRequest,
        handlers::orders::OrderResponse,
        handlers::orders::OrderMealResponse,
        handlers::health::HealthResponse,
    )),
    tags(
        (name = "orders", description = "Order placement"),
        (name = "health", description = "Liveness"),
    )
)]
pub struct ApiDoc;

/// Run any pending Diesel migrations against the pool's database.
pub fn run_migrations(pool: &DbPool) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let mut conn = pool.get()?;
    conn.run_pending_migrations(MIGRATIONS)?;
    Ok(())
}

pub fn build_publisher(config: &Config) -> Result<Arc<KafkaEventPublisher>, StartupError> {
    Ok(Arc::new(KafkaEventPublisher::new(&config.kafka_brokers)?))
}

/// Wire the order service to Postgres, Google Maps and the given publisher.
pub fn build_order_service(
    config: &Config,
    pool: DbPool,
    publisher: Arc<dyn EventPublisher>,
) -> Result<OrderService, StartupError> {
    let maps = Arc::new(GoogleMapsClient::new(
        &config.google_maps_base_url,
        &config.google_maps_api_key,
        config.traffic_model,
        config.external_call_timeout,
    )?);

    Ok(OrderService::new(
        Arc::new(DieselCatalogRepository::new(pool.clone())),
        Arc::new(DieselOrderRepository::new(pool)),
        maps.clone(),
        maps,
        OrderAnnouncer::new(publisher, config.topics.clone()),
        config.external_call_timeout,
    ))
}

/// Register the API routes. Expects `web::Data<OrderService>` and
/// `web::Data<HealthState>` to be available as app data.
pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
        let body = serde_json::json!({ "info": err.to_string() });
        error::InternalError::from_response(err, HttpResponse::BadRequest().json(body)).into()
    }))
    .route("/health", web::get().to(handlers::health::health))
    .service(
        web::scope("/orders")
            .route("", web::post().to(handlers::orders::create_order))
            .route("/{id}", web::get().to(handlers::orders::get_order)),
    );
}

/// Build and return an actix-web `Server` bound to `host:port`.
///
/// The caller is responsible for `.await`-ing (or `tokio::spawn`-ing) the
/// returned server.
pub fn build_server(
    service: OrderService,
    host: &str,
    port: u16,
) -> std::io::Result<actix_web::dev::Server> {
    let service = web::Data::new(service);
    let health = web::Data::new(HealthState::new());

    Ok(HttpServer::new(move || {
        App::new()
            .app_data(service.clone())
            .app_data(health.clone())
            .wrap(Logger::default())
            .wrap_fn(|req, srv| {
                if let Some(health) = req.app_data::<web::Data<HealthState>>() {
                    health.record_request();
                }
                srv.call(req)
            })
            .configure(routes)
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", ApiDoc::openapi()),
            )
    })
    .bind((host.to_string(), port))?
    .run())
}
