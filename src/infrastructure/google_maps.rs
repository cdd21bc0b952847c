//! Google Maps Geocoding and Distance Matrix adapters.
//!
//! Both endpoints may return several candidates; the first one is used.
//! Ambiguous addresses are not disambiguated.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use log::debug;
use serde::Deserialize;

use crate::domain::errors::{EtaError, GeocodeError};
use crate::domain::order::{Coordinates, Eta};
use crate::domain::ports::{EtaEstimator, Geocoder};

pub const DEFAULT_BASE_URL: &str = "https://maps.googleapis.com";

/// Traffic assumption used for departure-time based estimates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrafficModel {
    #[default]
    Optimistic,
    BestGuess,
    Pessimistic,
}

impl TrafficModel {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrafficModel::Optimistic => "optimistic",
            TrafficModel::BestGuess => "best_guess",
            TrafficModel::Pessimistic => "pessimistic",
        }
    }
}

impl fmt::Display for TrafficModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TrafficModel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "optimistic" => Ok(TrafficModel::Optimistic),
            "best_guess" => Ok(TrafficModel::BestGuess),
            "pessimistic" => Ok(TrafficModel::Pessimistic),
            other => Err(format!(
                "unknown traffic model '{}', expected optimistic, best_guess or pessimistic",
                other
            )),
        }
    }
}

// ── Wire types ───────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    status: String,
    #[serde(default)]
    error_message: Option<String>,
    #[serde(default)]
    results: Vec<GeocodeResult>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    geometry: Geometry,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    location: LatLng,
}

#[derive(Debug, Deserialize)]
struct LatLng {
    lat: f64,
    lng: f64,
}

#[derive(Debug, Deserialize)]
struct DistanceMatrixResponse {
    status: String,
    #[serde(default)]
    error_message: Option<String>,
    #[serde(default)]
    rows: Vec<MatrixRow>,
}

#[derive(Debug, Deserialize)]
struct MatrixRow {
    #[serde(default)]
    elements: Vec<MatrixElement>,
}

#[derive(Debug, Deserialize)]
struct MatrixElement {
    status: String,
    #[serde(default)]
    duration_in_traffic: Option<TextValue>,
}

#[derive(Debug, Deserialize)]
struct TextValue {
    text: String,
    value: i64,
}

fn first_location(resp: GeocodeResponse) -> Result<Coordinates, GeocodeError> {
    match resp.status.as_str() {
        "OK" => resp
            .results
            .into_iter()
            .next()
            .map(|r| Coordinates {
                lat: r.geometry.location.lat,
                lng: r.geometry.location.lng,
            })
            .ok_or(GeocodeError::NoResults),
        "ZERO_RESULTS" => Err(GeocodeError::NoResults),
        _ => Err(GeocodeError::Provider {
            status: resp.status,
            message: resp.error_message.unwrap_or_default(),
        }),
    }
}

fn first_duration(resp: DistanceMatrixResponse) -> Result<Eta, EtaError> {
    if resp.status != "OK" {
        return Err(EtaError::Provider {
            status: resp.status,
            message: resp.error_message.unwrap_or_default(),
        });
    }
    let element = resp
        .rows
        .into_iter()
        .next()
        .and_then(|row| row.elements.into_iter().next())
        .ok_or(EtaError::NoRoute)?;

    match element.status.as_str() {
        "OK" => {}
        "ZERO_RESULTS" | "NOT_FOUND" => return Err(EtaError::NoRoute),
        _ => {
            return Err(EtaError::Provider {
                status: element.status,
                message: String::new(),
            })
        }
    }

    let duration = element
        .duration_in_traffic
        .ok_or_else(|| EtaError::InvalidDuration("duration_in_traffic missing".to_string()))?;
    let seconds = i32::try_from(duration.value)
        .ok()
        .filter(|s| *s >= 0)
        .ok_or_else(|| EtaError::InvalidDuration(duration.value.to_string()))?;

    Ok(Eta {
        seconds,
        human: duration.text,
    })
}

// ── Client ───────────────────────────────────────────────────────────────────

pub struct GoogleMapsClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    traffic_model: TrafficModel,
    request_timeout: Duration,
}

impl GoogleMapsClient {
    pub fn new(
        base_url: &str,
        api_key: &str,
        traffic_model: TrafficModel,
        request_timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            traffic_model,
            request_timeout,
        })
    }

    fn geocode_error(&self, e: reqwest::Error) -> GeocodeError {
        if e.is_timeout() {
            GeocodeError::Timeout(self.request_timeout)
        } else {
            GeocodeError::Transport(e.to_string())
        }
    }

    fn eta_error(&self, e: reqwest::Error) -> EtaError {
        if e.is_timeout() {
            EtaError::Timeout(self.request_timeout)
        } else {
            EtaError::Transport(e.to_string())
        }
    }
}

#[async_trait]
impl Geocoder for GoogleMapsClient {
    async fn geocode(&self, address: &str) -> Result<Coordinates, GeocodeError> {
        let url = format!("{}/maps/api/geocode/json", self.base_url);
        let resp: GeocodeResponse = self
            .http
            .get(&url)
            .query(&[("address", address), ("key", self.api_key.as_str())])
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| self.geocode_error(e))?
            .json()
            .await
            .map_err(|e| self.geocode_error(e))?;

        let coordinates = first_location(resp)?;
        debug!("Geocoded '{}' to {}", address, coordinates);
        Ok(coordinates)
    }
}

#[async_trait]
impl EtaEstimator for GoogleMapsClient {
    async fn estimate_eta(
        &self,
        origin: &Coordinates,
        destination: &Coordinates,
    ) -> Result<Eta, EtaError> {
        let url = format!("{}/maps/api/distancematrix/json", self.base_url);
        let origins = origin.to_string();
        let destinations = destination.to_string();
        let departure_time = Utc::now().timestamp().to_string();
        let resp: DistanceMatrixResponse = self
            .http
            .get(&url)
            .query(&[
                ("origins", origins.as_str()),
                ("destinations", destinations.as_str()),
                ("departure_time", departure_time.as_str()),
                ("traffic_model", self.traffic_model.as_str()),
                ("key", self.api_key.as_str()),
            ])
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| self.eta_error(e))?
            .json()
            .await
            .map_err(|e| self.eta_error(e))?;

        let eta = first_duration(resp)?;
        debug!("ETA {} -> {}: {}s ({})", origins, destinations, eta.seconds, eta.human);
        Ok(eta)
    }
}
