use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::application::order_service::OrderService;
use crate::domain::order::{OrderRequest, PlacedOrder};
use crate::errors::AppError;

pub const MISSING_ORDER_DATA: &str = "You need to provide meals, restaurant and address.";

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
pub struct PlaceOrderRequest {
    /// Exact (case-sensitive) commercial name of the restaurant.
    #[serde(default)]
    pub restaurant: Option<String>,
    /// Names of the meals to order. Names not on the menu are ignored.
    #[serde(default)]
    pub meals: Option<Vec<String>>,
    #[serde(default)]
    pub address: Option<String>,
}

impl PlaceOrderRequest {
    fn validate(self) -> Result<OrderRequest, AppError> {
        let missing = || AppError::BadRequest(MISSING_ORDER_DATA.to_string());
        let restaurant = self
            .restaurant
            .filter(|r| !r.trim().is_empty())
            .ok_or_else(missing)?;
        let address = self
            .address
            .filter(|a| !a.trim().is_empty())
            .ok_or_else(missing)?;
        let meals = self.meals.filter(|m| !m.is_empty()).ok_or_else(missing)?;
        Ok(OrderRequest {
            restaurant,
            meals,
            address,
        })
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderMealResponse {
    pub meal_id: Uuid,
    pub name: String,
    /// Decimal price as a string to avoid floating-point issues, e.g. "9.50"
    pub price: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderResponse {
    pub id: Uuid,
    pub restaurant_id: Uuid,
    pub address: String,
    /// Delivery coordinates as "lat,lng".
    pub lat_long: String,
    pub order_total: String,
    /// Estimated travel time in seconds.
    pub eta: i32,
    pub eta_human: String,
    pub created_at: String,
    pub meals: Vec<OrderMealResponse>,
}

impl From<PlacedOrder> for OrderResponse {
    fn from(o: PlacedOrder) -> Self {
        Self {
            id: o.id,
            restaurant_id: o.restaurant_id,
            address: o.address,
            lat_long: o.lat_long,
            order_total: o.order_total.to_string(),
            eta: o.eta,
            eta_human: o.eta_human,
            created_at: o.created_at.to_rfc3339(),
            meals: o
                .lines
                .into_iter()
                .map(|l| OrderMealResponse {
                    meal_id: l.meal_id,
                    name: l.name,
                    price: l.price.to_string(),
                })
                .collect(),
        }
    }
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// POST /orders
///
/// Places an order: looks the restaurant up, prices the requested meals,
/// geocodes the address, estimates the delivery time and writes the order
/// with its meals in a single transaction before announcing it.
#[utoipa::path(
    post,
    path = "/orders",
    request_body = PlaceOrderRequest,
    responses(
        (status = 201, description = "Order placed", body = OrderResponse),
        (status = 400, description = "Missing meals, restaurant or address"),
        (status = 404, description = "Restaurant not found"),
        (status = 422, description = "No known meals, or the address could not be geocoded"),
        (status = 502, description = "Delivery time could not be estimated"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn create_order(
    service: web::Data<OrderService>,
    body: web::Json<PlaceOrderRequest>,
) -> Result<HttpResponse, AppError> {
    let request = match body.into_inner().validate() {
        Ok(r) => r,
        Err(e) => {
            log::warn!("Rejected order request: missing order request data");
            return Err(e);
        }
    };

    let placed = service.place_order(request).await?;

    Ok(HttpResponse::Created().json(OrderResponse::from(placed)))
}

/// GET /orders/{id}
///
/// Returns a placed order together with its meals.
#[utoipa::path(
    get,
    path = "/orders/{id}",
    params(
        ("id" = Uuid, Path, description = "Order UUID"),
    ),
    responses(
        (status = 200, description = "Order found", body = OrderResponse),
        (status = 404, description = "Order not found"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn get_order(
    service: web::Data<OrderService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let order = service
        .get_order(path.into_inner())
        .await?
        .ok_or(AppError::NotFound)?;

    Ok(HttpResponse::Ok().json(OrderResponse::from(order)))
}
