use std::sync::Arc;

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use log::{info, warn};
use serde::Serialize;
use uuid::Uuid;

use crate::domain::errors::PublishError;
use crate::domain::order::PlacedOrder;
use crate::domain::ports::EventPublisher;

#[derive(Debug, Clone)]
pub struct Topics {
    /// Consumed by the fulfillment side (kitchen, dispatch).
    pub fulfillment: String,
    /// Consumed by the customer confirmation side (SMS, email).
    pub confirmation: String,
}

impl Default for Topics {
    fn default() -> Self {
        Self {
            fulfillment: "orders".to_string(),
            confirmation: "orders_confirmation".to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
struct OrderPlacedLine<'a> {
    meal_id: Uuid,
    name: &'a str,
    price: &'a BigDecimal,
}

/// Payload published for every committed order.
#[derive(Debug, Serialize)]
struct OrderPlacedEvent<'a> {
    order_id: Uuid,
    restaurant_id: Uuid,
    address: &'a str,
    lat_long: &'a str,
    order_total: &'a BigDecimal,
    eta: i32,
    eta_human: &'a str,
    created_at: DateTime<Utc>,
    meals: Vec<OrderPlacedLine<'a>>,
}

impl<'a> From<&'a PlacedOrder> for OrderPlacedEvent<'a> {
    fn from(order: &'a PlacedOrder) -> Self {
        Self {
            order_id: order.id,
            restaurant_id: order.restaurant_id,
            address: &order.address,
            lat_long: &order.lat_long,
            order_total: &order.order_total,
            eta: order.eta,
            eta_human: &order.eta_human,
            created_at: order.created_at,
            meals: order
                .lines
                .iter()
                .map(|l| OrderPlacedLine {
                    meal_id: l.meal_id,
                    name: &l.name,
                    price: &l.price,
                })
                .collect(),
        }
    }
}

/// Publishes committed orders on the fulfillment and confirmation topics.
pub struct OrderAnnouncer {
    publisher: Arc<dyn EventPublisher>,
    topics: Topics,
}

impl OrderAnnouncer {
    pub fn new(publisher: Arc<dyn EventPublisher>, topics: Topics) -> Self {
        Self { publisher, topics }
    }

    /// Hand the order to both topics. Problems are logged and returned as
    /// warnings; the order stays committed either way.
    pub fn announce(&self, order: &PlacedOrder) -> Vec<PublishError> {
        let payload = match serde_json::to_vec(&OrderPlacedEvent::from(order)) {
            Ok(p) => p,
            Err(e) => {
                let warning = PublishError::Serialize(e.to_string());
                warn!("Order {} was not announced: {}", order.id, warning);
                return vec![warning];
            }
        };
        let key = order.id.to_string();

        let mut warnings = Vec::new();
        for topic in [&self.topics.fulfillment, &self.topics.confirmation] {
            match self.publisher.publish(topic, &key, &payload) {
                Ok(()) => info!("Order {} announced on '{}'", order.id, topic),
                Err(e) => {
                    warn!("Order {} announcement skipped: {}", order.id, e);
                    warnings.push(e);
                }
            }
        }
        warnings
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;
    use std::sync::Mutex;

    use serde_json::Value;

    use super::*;
    use crate::domain::order::OrderLine;

    #[derive(Default)]
    struct RecordingPublisher {
        sent: Mutex<Vec<(String, String, Vec<u8>)>>,
        failing_topic: Option<String>,
    }

    impl EventPublisher for RecordingPublisher {
        fn publish(&self, topic: &str, key: &str, payload: &[u8]) -> Result<(), PublishError> {
            if self.failing_topic.as_deref() == Some(topic) {
                return Err(PublishError::Enqueue {
                    topic: topic.to_string(),
                    reason: "queue full".to_string(),
                });
            }
            self.sent
                .lock()
                .unwrap()
                .push((topic.to_string(), key.to_string(), payload.to_vec()));
            Ok(())
        }
    }

    fn placed_order() -> PlacedOrder {
        PlacedOrder {
            id: Uuid::new_v4(),
            restaurant_id: Uuid::new_v4(),
            address: "221B Baker St".to_string(),
            lat_long: "51.5237,-0.1585".to_string(),
            order_total: BigDecimal::from_str("9.50").unwrap(),
            eta: 900,
            eta_human: "15 mins".to_string(),
            created_at: Utc::now(),
            lines: vec![OrderLine {
                meal_id: Uuid::new_v4(),
                name: "Margherita".to_string(),
                price: BigDecimal::from_str("9.50").unwrap(),
            }],
        }
    }

    #[test]
    fn same_payload_goes_to_both_topics() {
        let publisher = Arc::new(RecordingPublisher::default());
        let announcer = OrderAnnouncer::new(publisher.clone(), Topics::default());
        let order = placed_order();

        let warnings = announcer.announce(&order);

        assert!(warnings.is_empty());
        let sent = publisher.sent.lock().unwrap();
        let topics: Vec<&str> = sent.iter().map(|(t, _, _)| t.as_str()).collect();
        assert_eq!(topics, vec!["orders", "orders_confirmation"]);
        assert_eq!(sent[0].2, sent[1].2);
        assert!(sent.iter().all(|(_, k, _)| *k == order.id.to_string()));

        let event: Value = serde_json::from_slice(&sent[0].2).unwrap();
        assert_eq!(event["order_id"], order.id.to_string());
        assert_eq!(event["eta_human"], "15 mins");
        assert_eq!(event["meals"][0]["name"], "Margherita");
    }

    #[test]
    fn one_failing_topic_does_not_stop_the_other() {
        let publisher = Arc::new(RecordingPublisher {
            failing_topic: Some("orders".to_string()),
            ..Default::default()
        });
        let announcer = OrderAnnouncer::new(publisher.clone(), Topics::default());

        let warnings = announcer.announce(&placed_order());

        assert_eq!(warnings.len(), 1);
        assert!(matches!(&warnings[0], PublishError::Enqueue { topic, .. } if topic == "orders"));
        let sent = publisher.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, "orders_confirmation");
    }
}
