use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use actix_web::{web, HttpResponse};
use serde::Serialize;
use utoipa::ToSchema;

/// Process-wide request accounting.
pub struct HealthState {
    started: Instant,
    received_requests: AtomicU64,
}

impl HealthState {
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
            received_requests: AtomicU64::new(0),
        }
    }

    pub fn record_request(&self) {
        self.received_requests.fetch_add(1, Ordering::Relaxed);
    }
}

impl Default for HealthState {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub up_time_secs: u64,
    pub number_of_received_requests: u64,
}

#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Service is up", body = HealthResponse)),
    tag = "health"
)]
pub async fn health(state: web::Data<HealthState>) -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse {
        up_time_secs: state.started.elapsed().as_secs(),
        number_of_received_requests: state.received_requests.load(Ordering::Relaxed),
    })
}
