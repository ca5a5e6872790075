//! Runtime configuration.
//!
//! Every setting has an environment variable or a fixed default, so running
//! the binary without flags replays `./archive/data.csv` onto `raw-news` at
//! `localhost:9099`.

use clap::Args;
use news_feed_kafka_producer::{DeliveryMode, ProducerConfig};
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_TOPIC: &str = "raw-news";
pub const DEFAULT_KAFKA_HOST: &str = "localhost";
pub const DEFAULT_KAFKA_PORT: u16 = 9099;
pub const DEFAULT_INPUT_PATH: &str = "./archive/data.csv";

/// Lower bound of the random pause between published rows, in seconds.
pub const DEFAULT_MIN_DELAY_SECS: f64 = 1.0;
/// Upper bound of the random pause between published rows, in seconds.
pub const DEFAULT_MAX_DELAY_SECS: f64 = 10.0;

/// Resolved broker settings. Built once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigSettings {
    pub topic: String,
    /// `host:port`
    pub bootstrap_address: String,
}

impl ConfigSettings {
    pub fn new(topic: impl Into<String>, host: &str, port: u16) -> Self {
        Self {
            topic: topic.into(),
            bootstrap_address: format!("{host}:{port}"),
        }
    }
}

impl Default for ConfigSettings {
    fn default() -> Self {
        Self::new(DEFAULT_TOPIC, DEFAULT_KAFKA_HOST, DEFAULT_KAFKA_PORT)
    }
}

/// Command-line and environment options for a replay run.
#[derive(Args, Clone, Debug)]
pub struct FeedArgs {
    /// Kafka topic to publish to
    #[arg(long, env = "KAFKA_TOPIC", default_value = DEFAULT_TOPIC)]
    pub topic: String,

    /// Kafka broker host
    #[arg(long, env = "KAFKA_HOST", default_value = DEFAULT_KAFKA_HOST)]
    pub kafka_host: String,

    /// Kafka broker port
    #[arg(long, env = "KAFKA_PORT", default_value_t = DEFAULT_KAFKA_PORT)]
    pub kafka_port: u16,

    /// CSV file with `headline` and `published` columns
    #[arg(long, default_value = DEFAULT_INPUT_PATH)]
    pub input: PathBuf,

    /// Minimum pause after each published row, in seconds
    #[arg(long, default_value_t = DEFAULT_MIN_DELAY_SECS)]
    pub min_delay_secs: f64,

    /// Maximum pause after each published row, in seconds
    #[arg(long, default_value_t = DEFAULT_MAX_DELAY_SECS)]
    pub max_delay_secs: f64,

    /// Publish as fast as possible
    #[arg(long)]
    pub no_delay: bool,

    /// Whether to wait for broker acknowledgement of each message
    #[arg(long, value_enum, default_value_t = DeliveryMode::FireAndForget)]
    pub delivery: DeliveryMode,

    /// How long librdkafka keeps retrying delivery of a message
    #[arg(long, default_value_t = news_feed_kafka_producer::DEFAULT_MESSAGE_TIMEOUT_MS)]
    pub message_timeout_ms: u64,

    /// Timeout for the startup connectivity check
    #[arg(long, default_value = "10")]
    pub connect_timeout_secs: u64,

    /// Create the topic before publishing if it does not exist
    #[arg(long)]
    pub create_topic: bool,

    /// Partition count used with --create-topic
    #[arg(long, default_value = "3")]
    pub partitions: i32,

    /// Log events instead of sending them to Kafka
    #[arg(long)]
    pub dry_run: bool,

    /// Write a JSON run summary to this path on completion
    #[arg(long, value_name = "PATH")]
    pub emit_summary: Option<PathBuf>,
}

impl FeedArgs {
    pub fn settings(&self) -> ConfigSettings {
        ConfigSettings::new(self.topic.clone(), &self.kafka_host, self.kafka_port)
    }

    pub fn producer_config(&self) -> ProducerConfig {
        let settings = self.settings();
        let mut config = ProducerConfig::new(settings.bootstrap_address, settings.topic)
            .with_delivery(self.delivery);
        config.message_timeout_ms = self.message_timeout_ms;
        config.connect_timeout = Duration::from_secs(self.connect_timeout_secs);
        config
    }
}
