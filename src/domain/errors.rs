use std::fmt;
use std::time::Duration;

use thiserror::Error;

/// Storage-level failure raised by the repositories.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Order not found")]
    NotFound,
    #[error("Internal error: {0}")]
    Internal(String),
}

#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("geocoding provider returned status {status}: {message}")]
    Provider { status: String, message: String },
    #[error("no geocoding result for the address")]
    NoResults,
    #[error("geocoding request failed: {0}")]
    Transport(String),
    #[error("geocoding request timed out after {0:?}")]
    Timeout(Duration),
}

#[derive(Debug, Error)]
pub enum EtaError {
    #[error("restaurant has no usable location")]
    MissingOrigin,
    #[error("distance provider returned status {status}: {message}")]
    Provider { status: String, message: String },
    #[error("distance provider returned no route")]
    NoRoute,
    #[error("distance provider returned an invalid duration: {0}")]
    InvalidDuration(String),
    #[error("distance request failed: {0}")]
    Transport(String),
    #[error("distance request timed out after {0:?}")]
    Timeout(Duration),
}

#[derive(Debug, Error)]
pub enum PublishError {
    #[error("could not serialize order event: {0}")]
    Serialize(String),
    #[error("could not enqueue order event on '{topic}': {reason}")]
    Enqueue { topic: String, reason: String },
}

/// Pipeline position of an order being placed. A failure always reports the
/// stage it was raised from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderStage {
    Received,
    CatalogResolved,
    Priced,
    Geocoded,
    EtaEstimated,
    Persisted,
    Announced,
}

impl fmt::Display for OrderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OrderStage::Received => "received",
            OrderStage::CatalogResolved => "catalog_resolved",
            OrderStage::Priced => "priced",
            OrderStage::Geocoded => "geocoded",
            OrderStage::EtaEstimated => "eta_estimated",
            OrderStage::Persisted => "persisted",
            OrderStage::Announced => "announced",
        };
        f.write_str(name)
    }
}

/// Fatal outcome of the order placement workflow. Nothing has been written
/// when any of these is returned.
#[derive(Debug, Error)]
pub enum PlaceOrderError {
    #[error("Restaurant not found")]
    RestaurantNotFound,
    #[error("None of the requested meals are on the menu")]
    NoMatchingMeals,
    #[error("Could not read the catalog: {0}")]
    Catalog(DomainError),
    #[error("Could not geocode the delivery address: {0}")]
    Geocode(#[from] GeocodeError),
    #[error("Could not estimate the delivery time: {0}")]
    Eta(#[from] EtaError),
    #[error("Could not save the order: {0}")]
    Persist(DomainError),
}

impl PlaceOrderError {
    /// The last stage the order reached before failing.
    pub fn failed_at(&self) -> OrderStage {
        match self {
            PlaceOrderError::RestaurantNotFound
            | PlaceOrderError::NoMatchingMeals
            | PlaceOrderError::Catalog(_) => OrderStage::Received,
            PlaceOrderError::Geocode(_) => OrderStage::Priced,
            PlaceOrderError::Eta(_) => OrderStage::Geocoded,
            PlaceOrderError::Persist(_) => OrderStage::EtaEstimated,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failures_report_the_stage_they_left_from() {
        assert_eq!(
            PlaceOrderError::RestaurantNotFound.failed_at(),
            OrderStage::Received
        );
        assert_eq!(
            PlaceOrderError::Geocode(GeocodeError::NoResults).failed_at(),
            OrderStage::Priced
        );
        assert_eq!(
            PlaceOrderError::Eta(EtaError::NoRoute).failed_at(),
            OrderStage::Geocoded
        );
        assert_eq!(
            PlaceOrderError::Persist(DomainError::Internal("boom".into())).failed_at(),
            OrderStage::EtaEstimated
        );
    }

    #[test]
    fn messages_are_stable_per_kind() {
        assert_eq!(
            PlaceOrderError::RestaurantNotFound.to_string(),
            "Restaurant not found"
        );
        assert_eq!(
            PlaceOrderError::Geocode(GeocodeError::NoResults).to_string(),
            "Could not geocode the delivery address: no geocoding result for the address"
        );
        assert!(PlaceOrderError::Eta(EtaError::Timeout(Duration::from_secs(10)))
            .to_string()
            .starts_with("Could not estimate the delivery time"));
    }

    #[test]
    fn stage_display_is_snake_case() {
        assert_eq!(OrderStage::EtaEstimated.to_string(), "eta_estimated");
        assert_eq!(OrderStage::CatalogResolved.to_string(), "catalog_resolved");
    }
}
