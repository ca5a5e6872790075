//! Replay a CSV file onto a fresh topic and read it back.
//!
//! Test flow:
//! 1. Create a uniquely named topic
//! 2. Replay a small archive with acknowledged delivery and no pacing
//! 3. Consume the topic from the beginning and compare keys and payloads

use news_feed::producer::{DeliveryMode, KafkaNewsPublisher, ProducerConfig};
use news_feed::source::RecordSource;
use news_feed::{NewsFeed, NoPacer, REQUIRED_COLUMNS};
use rdkafka::consumer::{BaseConsumer, Consumer};
use rdkafka::{ClientConfig, Message};
use std::io::Write;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

fn test_brokers() -> String {
    std::env::var("KAFKA_TEST_BROKERS").unwrap_or_else(|_| "localhost:9092".to_string())
}

fn unique_suffix() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default()
}

#[tokio::test]
#[ignore = "requires a running Kafka broker"]
async fn test_replay_to_kafka() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter("news_feed=debug,news_feed_kafka_producer=debug")
        .try_init()
        .ok();

    let brokers = test_brokers();
    let topic = format!("test-raw-news-{}", unique_suffix());

    let mut input = tempfile::NamedTempFile::new()?;
    writeln!(input, "headline,published")?;
    writeln!(input, "Storm hits coast,2023-05-01 14:30:00")?;
    writeln!(input, "Bad row,May 1st 2023")?;
    writeln!(input, "Markets rally,2023-05-02 09:00:00")?;
    input.flush()?;

    let config = ProducerConfig::new(brokers.clone(), topic.clone())
        .with_delivery(DeliveryMode::AwaitAck);
    let publisher = KafkaNewsPublisher::connect(config)?;
    publisher.create_topic_if_not_exists(1).await?;

    let source = RecordSource::open(input.path(), REQUIRED_COLUMNS)?;
    let mut feed = NewsFeed::new(publisher, NoPacer);
    let summary = feed.replay(source).await?;
    assert_eq!(summary.published, 2);
    assert_eq!(summary.skipped, 1);

    let consumer: BaseConsumer = ClientConfig::new()
        .set("bootstrap.servers", &brokers)
        .set("group.id", format!("news-feed-e2e-{}", unique_suffix()))
        .set("auto.offset.reset", "earliest")
        .set("enable.auto.commit", "false")
        .create()?;
    consumer.subscribe(&[topic.as_str()])?;

    let mut received: Vec<(String, serde_json::Value)> = Vec::new();
    let deadline = Instant::now() + Duration::from_secs(30);
    while received.len() < 2 && Instant::now() < deadline {
        if let Some(message) = consumer.poll(Duration::from_millis(500)) {
            let message = message?;
            let key = String::from_utf8(message.key().unwrap_or_default().to_vec())?;
            let payload = serde_json::from_slice(message.payload().unwrap_or_default())?;
            received.push((key, payload));
        }
    }

    assert_eq!(received.len(), 2);
    assert_eq!(received[0].0, "Storm hits coast");
    assert_eq!(
        received[0].1,
        serde_json::json!({"title": "Storm hits coast", "published_at": "2023-05-01T14:30:00"})
    );
    assert_eq!(received[1].0, "Markets rally");
    assert_eq!(received[1].1["published_at"], "2023-05-02T09:00:00");

    Ok(())
}
