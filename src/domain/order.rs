use std::fmt;
use std::str::FromStr;

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

/// A customer's order request as accepted by the HTTP layer.
#[derive(Debug, Clone)]
pub struct OrderRequest {
    pub restaurant: String,
    pub meals: Vec<String>,
    pub address: String,
}

#[derive(Debug, Clone)]
pub struct Restaurant {
    pub id: Uuid,
    pub commercial_name: String,
    /// Kitchen location as stored in the catalog ("lat,lng").
    pub location: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MenuItem {
    pub id: Uuid,
    pub name: String,
    pub price: BigDecimal,
}

/// Priced snapshot of a menu item, copied into the order.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderLine {
    pub meal_id: Uuid,
    pub name: String,
    pub price: BigDecimal,
}

impl From<&MenuItem> for OrderLine {
    fn from(item: &MenuItem) -> Self {
        Self {
            meal_id: item.id,
            name: item.name.clone(),
            price: item.price.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PricedLines {
    pub lines: Vec<OrderLine>,
    pub total: BigDecimal,
}

#[derive(Debug, Error, PartialEq)]
#[error("invalid coordinates '{0}', expected \"lat,lng\"")]
pub struct InvalidCoordinates(pub String);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.lat, self.lng)
    }
}

impl FromStr for Coordinates {
    type Err = InvalidCoordinates;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || InvalidCoordinates(s.to_string());
        let (lat, lng) = s.split_once(',').ok_or_else(invalid)?;
        let lat: f64 = lat.trim().parse().map_err(|_| invalid())?;
        let lng: f64 = lng.trim().parse().map_err(|_| invalid())?;
        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lng) {
            return Err(invalid());
        }
        Ok(Self { lat, lng })
    }
}

/// Travel time estimate. Seconds and display text always travel together.
#[derive(Debug, Clone, PartialEq)]
pub struct Eta {
    pub seconds: i32,
    pub human: String,
}

/// Fully assembled order, ready to be written in one transaction.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub restaurant_id: Uuid,
    pub address: String,
    pub lat_long: Coordinates,
    pub lines: Vec<OrderLine>,
    pub order_total: BigDecimal,
    pub eta: Eta,
}

/// An order whose header and lines have been committed.
#[derive(Debug, Clone)]
pub struct PlacedOrder {
    pub id: Uuid,
    pub restaurant_id: Uuid,
    pub address: String,
    pub lat_long: String,
    pub order_total: BigDecimal,
    pub eta: i32,
    pub eta_human: String,
    pub created_at: DateTime<Utc>,
    pub lines: Vec<OrderLine>,
}
