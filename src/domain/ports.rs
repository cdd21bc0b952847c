use async_trait::async_trait;
use uuid::Uuid;

use super::errors::{DomainError, EtaError, GeocodeError, PublishError};
use super::order::{Coordinates, Eta, MenuItem, NewOrder, PlacedOrder, Restaurant};

/// Read-only access to restaurants and their menus.
pub trait CatalogRepository: Send + Sync + 'static {
    fn find_restaurant_with_menu(
        &self,
        name: &str,
    ) -> Result<Option<(Restaurant, Vec<MenuItem>)>, DomainError>;
}

pub trait OrderRepository: Send + Sync + 'static {
    /// Write the order header and all of its lines atomically.
    fn create(&self, order: NewOrder) -> Result<PlacedOrder, DomainError>;
    fn find_by_id(&self, id: Uuid) -> Result<Option<PlacedOrder>, DomainError>;
}

#[async_trait]
pub trait Geocoder: Send + Sync + 'static {
    async fn geocode(&self, address: &str) -> Result<Coordinates, GeocodeError>;
}

#[async_trait]
pub trait EtaEstimator: Send + Sync + 'static {
    async fn estimate_eta(
        &self,
        origin: &Coordinates,
        destination: &Coordinates,
    ) -> Result<Eta, EtaError>;
}

/// Fire-and-forget topic publisher. `publish` only hands the message over;
/// it never waits for subscribers.
pub trait EventPublisher: Send + Sync + 'static {
    fn publish(&self, topic: &str, key: &str, payload: &[u8]) -> Result<(), PublishError>;
}
