use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use thiserror::Error;

use crate::domain::errors::{DomainError, PlaceOrderError};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found")]
    NotFound,

    #[error("{0}")]
    BadRequest(String),

    #[error(transparent)]
    PlaceOrder(#[from] PlaceOrderError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<DomainError> for AppError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::NotFound => AppError::NotFound,
            DomainError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

impl actix_web::ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::PlaceOrder(e) => match e {
                PlaceOrderError::RestaurantNotFound => StatusCode::NOT_FOUND,
                PlaceOrderError::NoMatchingMeals | PlaceOrderError::Geocode(_) => {
                    StatusCode::UNPROCESSABLE_ENTITY
                }
                PlaceOrderError::Eta(_) => StatusCode::BAD_GATEWAY,
                PlaceOrderError::Catalog(_) | PlaceOrderError::Persist(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
        }
    }

    fn error_response(&self) -> HttpResponse {
        let info = match self {
            AppError::Internal(_) => "Internal server error".to_string(),
            // Storage details stay in the logs.
            AppError::PlaceOrder(PlaceOrderError::Catalog(_)) => {
                "Could not read the catalog".to_string()
            }
            AppError::PlaceOrder(PlaceOrderError::Persist(_)) => {
                "Could not save the order".to_string()
            }
            other => other.to_string(),
        };
        HttpResponse::build(self.status_code()).json(serde_json::json!({ "info": info }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::{EtaError, GeocodeError};
    use actix_web::body::to_bytes;
    use actix_web::ResponseError;

    async fn body_info(err: AppError) -> String {
        let bytes = to_bytes(err.error_response().into_body()).await.unwrap();
        let v: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        v["info"].as_str().unwrap().to_string()
    }

    #[test]
    fn not_found_returns_404() {
        let resp = AppError::NotFound.error_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn internal_error_returns_500() {
        let err = AppError::Internal("something went wrong".to_string());
        assert_eq!(
            err.error_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn each_order_failure_has_its_own_status() {
        let cases = [
            (PlaceOrderError::RestaurantNotFound, StatusCode::NOT_FOUND),
            (PlaceOrderError::NoMatchingMeals, StatusCode::UNPROCESSABLE_ENTITY),
            (
                PlaceOrderError::Geocode(GeocodeError::NoResults),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (PlaceOrderError::Eta(EtaError::NoRoute), StatusCode::BAD_GATEWAY),
            (
                PlaceOrderError::Persist(DomainError::Internal("deadlock".into())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(AppError::from(err).status_code(), status);
        }
    }

    #[actix_web::test]
    async fn order_failures_carry_their_message() {
        assert_eq!(
            body_info(PlaceOrderError::RestaurantNotFound.into()).await,
            "Restaurant not found"
        );
        assert_eq!(
            body_info(PlaceOrderError::Eta(EtaError::NoRoute).into()).await,
            "Could not estimate the delivery time: distance provider returned no route"
        );
    }

    #[actix_web::test]
    async fn storage_details_are_not_leaked() {
        let info = body_info(PlaceOrderError::Persist(DomainError::Internal("duplicate key".into())).into()).await;
        assert_eq!(info, "Could not save the order");

        let info = body_info(AppError::Internal("connection refused".into())).await;
        assert_eq!(info, "Internal server error");
    }

    #[test]
    fn domain_not_found_maps_to_app_not_found() {
        let app_err: AppError = DomainError::NotFound.into();
        assert!(matches!(app_err, AppError::NotFound));
    }

    #[test]
    fn domain_internal_maps_to_app_internal() {
        let app_err: AppError = DomainError::Internal("pool timed out".to_string()).into();
        assert!(matches!(app_err, AppError::Internal(_)));
    }
}
