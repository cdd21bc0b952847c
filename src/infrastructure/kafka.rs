use std::time::Duration;

use log::{debug, info, warn};
use rdkafka::config::ClientConfig;
use rdkafka::error::KafkaResult;
use rdkafka::message::Message;
use rdkafka::producer::{BaseRecord, DeliveryResult, Producer, ProducerContext, ThreadedProducer};
use rdkafka::ClientContext;

use crate::domain::errors::PublishError;
use crate::domain::ports::EventPublisher;

/// Reports broker acknowledgements. Runs on the producer's polling thread,
/// never on the request path.
pub struct DeliveryReporter;

impl ClientContext for DeliveryReporter {}

impl ProducerContext for DeliveryReporter {
    type DeliveryOpaque = ();

    fn delivery(&self, delivery_result: &DeliveryResult<'_>, _delivery_opaque: Self::DeliveryOpaque) {
        match delivery_result {
            Ok(msg) => debug!(
                "Order event delivered to {} [{}] at offset {}",
                msg.topic(),
                msg.partition(),
                msg.offset()
            ),
            Err((e, msg)) => warn!("Order event delivery to {} failed: {}", msg.topic(), e),
        }
    }
}

pub struct KafkaEventPublisher {
    producer: ThreadedProducer<DeliveryReporter>,
}

impl KafkaEventPublisher {
    pub fn new(brokers: &str) -> KafkaResult<Self> {
        let producer = ClientConfig::new()
            .set("bootstrap.servers", brokers)
            .set("message.timeout.ms", "5000")
            .set("queue.buffering.max.ms", "5")
            .create_with_context(DeliveryReporter)?;
        Ok(Self { producer })
    }

    /// Wait up to `timeout` for queued events to reach the broker.
    pub fn flush(&self, timeout: Duration) -> KafkaResult<()> {
        let pending = self.producer.in_flight_count();
        if pending > 0 {
            info!("Flushing {} pending order event(s)", pending);
        }
        self.producer.flush(timeout)
    }

    pub fn in_flight_count(&self) -> i32 {
        self.producer.in_flight_count()
    }
}

impl EventPublisher for KafkaEventPublisher {
    fn publish(&self, topic: &str, key: &str, payload: &[u8]) -> Result<(), PublishError> {
        let record = BaseRecord::<str, [u8]>::to(topic).key(key).payload(payload);
        self.producer
            .send(record)
            .map_err(|(e, _)| PublishError::Enqueue {
                topic: topic.to_string(),
                reason: e.to_string(),
            })
    }
}
