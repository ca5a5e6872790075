//! news-feed library
//!
//! Replays a CSV archive of news headlines onto a Kafka topic, one keyed JSON
//! message per row, with a random pause after each message so downstream
//! consumers see something that looks like a live feed.
//!
//! # Pipeline
//!
//! - [`news_feed_csv_source::RecordSource`] yields one row at a time
//! - [`feed::transform`] normalizes the `published` column to ISO 8601
//! - [`news_feed_kafka_producer::NewsPublisher`] sends `{"title", "published_at"}` keyed by title
//! - [`pacing::Pacer`] waits before the next row
//!
//! # CLI Usage
//!
//! ```bash
//! # Defaults: ./archive/data.csv -> raw-news at localhost:9099
//! news-feed
//!
//! # Environment overrides
//! KAFKA_HOST=kafka KAFKA_PORT=9092 KAFKA_TOPIC=headlines news-feed
//!
//! # Fast local check without a broker
//! news-feed --dry-run --no-delay --input ./archive/data.csv
//! ```

pub mod config;
mod error;
pub mod feed;
pub mod pacing;
pub mod timestamp;

pub use config::{ConfigSettings, FeedArgs};
pub use error::FeedError;
pub use feed::{transform, FeedSummary, NewsFeed, REQUIRED_COLUMNS};
pub use pacing::{NoPacer, Pacer, RandomPacer};
pub use timestamp::{normalize_timestamp, TimestampError};

// Re-export the source and publisher crates for convenience
pub use news_feed_csv_source as source;
pub use news_feed_kafka_producer as producer;
