use std::sync::Arc;
use std::time::Duration;

use log::{debug, error, info, warn};
use tokio::time::timeout;
use uuid::Uuid;

use crate::domain::catalog::select_menu_items;
use crate::domain::errors::{DomainError, EtaError, GeocodeError, OrderStage, PlaceOrderError};
use crate::domain::order::{Coordinates, NewOrder, OrderRequest, PlacedOrder};
use crate::domain::ports::{CatalogRepository, EtaEstimator, Geocoder, OrderRepository};
use crate::domain::pricing::price_lines;

use super::announcer::OrderAnnouncer;

/// Drives an order from request to committed, announced order.
pub struct OrderService {
    catalog: Arc<dyn CatalogRepository>,
    orders: Arc<dyn OrderRepository>,
    geocoder: Arc<dyn Geocoder>,
    eta: Arc<dyn EtaEstimator>,
    announcer: Arc<OrderAnnouncer>,
    call_timeout: Duration,
}

impl OrderService {
    pub fn new(
        catalog: Arc<dyn CatalogRepository>,
        orders: Arc<dyn OrderRepository>,
        geocoder: Arc<dyn Geocoder>,
        eta: Arc<dyn EtaEstimator>,
        announcer: OrderAnnouncer,
        call_timeout: Duration,
    ) -> Self {
        Self {
            catalog,
            orders,
            geocoder,
            eta,
            announcer: Arc::new(announcer),
            call_timeout,
        }
    }

    pub async fn place_order(&self, request: OrderRequest) -> Result<PlacedOrder, PlaceOrderError> {
        match self.run_pipeline(&request).await {
            Ok(order) => {
                info!(
                    "Order {} placed at '{}' for {} ({} meals, eta {})",
                    order.id,
                    request.restaurant,
                    order.order_total,
                    order.lines.len(),
                    order.eta_human
                );
                Ok(order)
            }
            Err(e) => {
                error!(
                    "Order at '{}' failed after stage {}: {}",
                    request.restaurant,
                    e.failed_at(),
                    e
                );
                Err(e)
            }
        }
    }

    async fn run_pipeline(&self, request: &OrderRequest) -> Result<PlacedOrder, PlaceOrderError> {
        let mut stage = OrderStage::Received;

        // 1. Catalog lookup and menu filtering
        let catalog = Arc::clone(&self.catalog);
        let name = request.restaurant.clone();
        let (restaurant, menu) =
            tokio::task::spawn_blocking(move || catalog.find_restaurant_with_menu(&name))
                .await
                .map_err(|e| PlaceOrderError::Catalog(DomainError::Internal(e.to_string())))?
                .map_err(PlaceOrderError::Catalog)?
                .ok_or(PlaceOrderError::RestaurantNotFound)?;

        let selection = select_menu_items(&menu, &request.meals);
        if !selection.unknown.is_empty() {
            warn!(
                "Dropping meals not on the menu of '{}': {:?}",
                restaurant.commercial_name, selection.unknown
            );
        }
        if selection.items.is_empty() {
            return Err(PlaceOrderError::NoMatchingMeals);
        }
        advance(&mut stage, OrderStage::CatalogResolved);

        // 2. Pricing
        let priced = price_lines(&selection.items);
        advance(&mut stage, OrderStage::Priced);

        // 3. Geocoding
        let destination = timeout(self.call_timeout, self.geocoder.geocode(&request.address))
            .await
            .map_err(|_| GeocodeError::Timeout(self.call_timeout))??;
        advance(&mut stage, OrderStage::Geocoded);

        // 4. ETA from the restaurant's kitchen to the delivery address
        let origin: Coordinates = restaurant
            .location
            .as_deref()
            .and_then(|l| l.parse().ok())
            .ok_or(EtaError::MissingOrigin)?;
        let eta = timeout(
            self.call_timeout,
            self.eta.estimate_eta(&origin, &destination),
        )
        .await
        .map_err(|_| EtaError::Timeout(self.call_timeout))??;
        advance(&mut stage, OrderStage::EtaEstimated);

        let new_order = NewOrder {
            restaurant_id: restaurant.id,
            address: request.address.clone(),
            lat_long: destination,
            lines: priced.lines,
            order_total: priced.total,
            eta,
        };

        // 5 + 6. Persist, then announce. Runs detached so that a caller going
        // away mid-write cannot leave a committed order unannounced.
        let orders = Arc::clone(&self.orders);
        let announcer = Arc::clone(&self.announcer);
        let placed = tokio::spawn(async move {
            let placed = tokio::task::spawn_blocking(move || orders.create(new_order))
                .await
                .map_err(|e| DomainError::Internal(e.to_string()))??;
            debug!(
                "Order {} stage {} -> {}",
                placed.id,
                OrderStage::EtaEstimated,
                OrderStage::Persisted
            );

            let warnings = announcer.announce(&placed);
            if !warnings.is_empty() {
                warn!(
                    "Order {} committed with {} announcement warning(s)",
                    placed.id,
                    warnings.len()
                );
            }
            debug!(
                "Order {} stage {} -> {}",
                placed.id,
                OrderStage::Persisted,
                OrderStage::Announced
            );
            Ok::<_, DomainError>(placed)
        })
        .await
        .map_err(|e| PlaceOrderError::Persist(DomainError::Internal(e.to_string())))?
        .map_err(PlaceOrderError::Persist)?;

        Ok(placed)
    }

    pub async fn get_order(&self, id: Uuid) -> Result<Option<PlacedOrder>, DomainError> {
        let orders = Arc::clone(&self.orders);
        tokio::task::spawn_blocking(move || orders.find_by_id(id))
            .await
            .map_err(|e| DomainError::Internal(e.to_string()))?
    }
}

fn advance(stage: &mut OrderStage, next: OrderStage) {
    debug!("Order stage {} -> {}", stage, next);
    *stage = next;
}
