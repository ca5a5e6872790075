//! Kafka publisher for replayed news events
//!
//! This library turns [`NewsEvent`]s into keyed JSON messages on a Kafka topic.
//!
//! ## Features
//!
//! - **JSON encoding**: `{"title": ..., "published_at": ...}` as UTF-8 bytes
//! - **Keyed messages**: the headline is used as the message key
//! - **Delivery modes**: fire-and-forget (default) or wait for the broker acknowledgement
//! - **Topic management**: create the destination topic if it does not exist
//! - **In-memory publisher**: capture messages without a broker
//!
//! ## Usage
//!
//! ```rust,no_run
//! use news_feed_kafka_producer::{KafkaNewsPublisher, NewsEvent, NewsPublisher, ProducerConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ProducerConfig::new("localhost:9099", "raw-news");
//!     let publisher = KafkaNewsPublisher::connect(config)?;
//!
//!     let event = NewsEvent::new("Storm hits coast", "2023-05-01T14:30:00");
//!     publisher.publish(&event).await?;
//!     publisher.drain().await?;
//!     Ok(())
//! }
//! ```

use async_trait::async_trait;
use rdkafka::admin::{AdminClient, AdminOptions, NewTopic, TopicReplication};
use rdkafka::client::DefaultClientContext;
use rdkafka::producer::{FutureProducer, FutureRecord, Producer};
use rdkafka::ClientConfig;
use std::time::Duration;

pub mod error;
mod event;
mod memory;

pub use error::{PublisherError, Result};
pub use event::NewsEvent;
pub use memory::{CapturedMessage, InMemoryPublisher};

/// Default time librdkafka keeps trying to deliver a message.
pub const DEFAULT_MESSAGE_TIMEOUT_MS: u64 = 5000;

/// Default timeout for the startup connectivity probe.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default timeout for flushing queued messages on shutdown.
pub const DEFAULT_DRAIN_TIMEOUT: Duration = Duration::from_secs(30);

/// How a publish call treats broker acknowledgements.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum DeliveryMode {
    /// Return once the message is queued by the client. Delivery failures are not reported.
    #[default]
    FireAndForget,
    /// Wait for the delivery report of every message.
    AwaitAck,
}

/// Outcome of a successful publish call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishReceipt {
    /// Accepted into the producer queue; delivery is not tracked.
    Enqueued,
    /// Acknowledged by the broker.
    Delivered { partition: i32, offset: i64 },
}

/// Destination for news events.
#[async_trait]
pub trait NewsPublisher: Send + Sync {
    /// Publish one event, keyed by its title.
    async fn publish(&self, event: &NewsEvent) -> Result<PublishReceipt>;

    /// Flush anything still buffered by the publisher.
    async fn drain(&self) -> Result<()>;
}

#[async_trait]
impl<P: NewsPublisher + ?Sized> NewsPublisher for Box<P> {
    async fn publish(&self, event: &NewsEvent) -> Result<PublishReceipt> {
        (**self).publish(event).await
    }

    async fn drain(&self) -> Result<()> {
        (**self).drain().await
    }
}

/// Connection and delivery settings for [`KafkaNewsPublisher`].
#[derive(Debug, Clone)]
pub struct ProducerConfig {
    /// Kafka bootstrap servers (`host:port`, comma-separated)
    pub brokers: String,
    /// Destination topic
    pub topic: String,
    pub delivery: DeliveryMode,
    pub message_timeout_ms: u64,
    pub connect_timeout: Duration,
    pub drain_timeout: Duration,
}

impl ProducerConfig {
    pub fn new(brokers: impl Into<String>, topic: impl Into<String>) -> Self {
        Self {
            brokers: brokers.into(),
            topic: topic.into(),
            delivery: DeliveryMode::default(),
            message_timeout_ms: DEFAULT_MESSAGE_TIMEOUT_MS,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            drain_timeout: DEFAULT_DRAIN_TIMEOUT,
        }
    }

    pub fn with_delivery(mut self, delivery: DeliveryMode) -> Self {
        self.delivery = delivery;
        self
    }

    fn client_config(&self) -> ClientConfig {
        let mut config = ClientConfig::new();
        config
            .set("bootstrap.servers", &self.brokers)
            .set("message.timeout.ms", self.message_timeout_ms.to_string());
        config
    }
}

/// Kafka-backed [`NewsPublisher`].
pub struct KafkaNewsPublisher {
    producer: FutureProducer,
    config: ProducerConfig,
}

impl KafkaNewsPublisher {
    /// Create the producer and verify that the cluster answers.
    ///
    /// librdkafka connects lazily, so a metadata request is issued up front.
    /// An unreachable broker fails here instead of silently dropping every
    /// message after `message.timeout.ms`.
    pub fn connect(config: ProducerConfig) -> Result<Self> {
        let producer: FutureProducer = config.client_config().create()?;

        let metadata = producer
            .client()
            .fetch_metadata(None, config.connect_timeout)
            .map_err(|source| PublisherError::BrokerUnreachable {
                brokers: config.brokers.clone(),
                source,
            })?;

        tracing::info!(
            "Connected to Kafka at {} ({} brokers, {} topics)",
            config.brokers,
            metadata.brokers().len(),
            metadata.topics().len()
        );

        Ok(Self { producer, config })
    }

    pub fn config(&self) -> &ProducerConfig {
        &self.config
    }

    /// Create the configured topic if it doesn't exist
    pub async fn create_topic_if_not_exists(&self, partitions: i32) -> Result<()> {
        let admin_client: AdminClient<DefaultClientContext> = ClientConfig::new()
            .set("bootstrap.servers", &self.config.brokers)
            .create()?;

        let topic = self.config.topic.as_str();
        let new_topic = NewTopic::new(topic, partitions, TopicReplication::Fixed(1));
        let opts = AdminOptions::new().operation_timeout(Some(self.config.connect_timeout));

        let results = admin_client
            .create_topics(&[new_topic], &opts)
            .await
            .map_err(|e| PublisherError::TopicCreation(format!("Failed to create topics: {e}")))?;

        for result in results {
            match result {
                Ok(topic_name) => {
                    tracing::info!("Topic '{topic_name}' created successfully");
                }
                Err((topic_name, err)) => {
                    let err_str = err.to_string();
                    if err_str.contains("already exists")
                        || err_str.contains("TopicExistsException")
                    {
                        tracing::info!("Topic '{topic_name}' already exists");
                    } else {
                        return Err(PublisherError::TopicCreation(format!(
                            "Failed to create topic {topic_name}: {err}"
                        )));
                    }
                }
            }
        }

        Ok(())
    }
}

#[async_trait]
impl NewsPublisher for KafkaNewsPublisher {
    async fn publish(&self, event: &NewsEvent) -> Result<PublishReceipt> {
        let payload = event.to_payload()?;
        let record = FutureRecord::to(&self.config.topic)
            .key(event.key())
            .payload(&payload);

        let receipt = match self.config.delivery {
            DeliveryMode::FireAndForget => {
                // The delivery future is dropped; librdkafka keeps the message queued.
                self.producer.send_result(record).map_err(|(err, _)| err)?;
                PublishReceipt::Enqueued
            }
            DeliveryMode::AwaitAck => {
                let (partition, offset) = self
                    .producer
                    .send(record, Duration::from_secs(0))
                    .await
                    .map_err(|(err, _)| err)?;
                PublishReceipt::Delivered { partition, offset }
            }
        };

        tracing::info!(
            key = %event.title,
            payload = %String::from_utf8_lossy(&payload),
            "Sent news event"
        );
        Ok(receipt)
    }

    async fn drain(&self) -> Result<()> {
        tracing::debug!("Flushing Kafka producer");
        self.producer.flush(self.config.drain_timeout)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_producer_config_defaults() {
        let config = ProducerConfig::new("localhost:9099", "raw-news");
        assert_eq!(config.brokers, "localhost:9099");
        assert_eq!(config.topic, "raw-news");
        assert_eq!(config.delivery, DeliveryMode::FireAndForget);
        assert_eq!(config.message_timeout_ms, 5000);
        assert_eq!(config.connect_timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_client_config_carries_brokers() {
        let config =
            ProducerConfig::new("kafka:9092", "raw-news").with_delivery(DeliveryMode::AwaitAck);
        let client_config = config.client_config();
        assert_eq!(client_config.get("bootstrap.servers"), Some("kafka:9092"));
        assert_eq!(client_config.get("message.timeout.ms"), Some("5000"));
        assert_eq!(config.delivery, DeliveryMode::AwaitAck);
    }

    #[test]
    fn test_unreachable_broker_fails_fast() {
        let mut config = ProducerConfig::new("127.0.0.1:1", "raw-news");
        config.connect_timeout = Duration::from_millis(500);

        match KafkaNewsPublisher::connect(config) {
            Err(PublisherError::BrokerUnreachable { brokers, .. }) => {
                assert_eq!(brokers, "127.0.0.1:1");
            }
            Err(other) => panic!("unexpected error: {other}"),
            Ok(_) => panic!("connected to a closed port"),
        }
    }

    #[tokio::test]
    async fn test_boxed_publisher_delegates() {
        let publisher: Box<dyn NewsPublisher> = Box::new(InMemoryPublisher::new("raw-news"));
        let event = NewsEvent::new("Markets rally", "2024-02-29T09:15:00");
        let receipt = publisher.publish(&event).await.unwrap();
        assert_eq!(receipt, PublishReceipt::Enqueued);
        publisher.drain().await.unwrap();
    }
}
