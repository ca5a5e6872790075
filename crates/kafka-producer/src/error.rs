//! Error types for the news publisher.

use thiserror::Error;

/// Errors that can occur while publishing news events.
#[derive(Error, Debug)]
pub enum PublisherError {
    #[error("Kafka error: {0}")]
    Kafka(#[from] rdkafka::error::KafkaError),

    #[error("Kafka brokers at {brokers} are unreachable: {source}")]
    BrokerUnreachable {
        brokers: String,
        #[source]
        source: rdkafka::error::KafkaError,
    },

    #[error("Failed to encode news event: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("Topic creation error: {0}")]
    TopicCreation(String),
}

/// Result type alias for publisher operations.
pub type Result<T> = std::result::Result<T, PublisherError>;
