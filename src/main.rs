//! Command-line interface for news-feed
//!
//! # Usage Examples
//!
//! ```bash
//! # Replay ./archive/data.csv onto raw-news at localhost:9099, 1-10s apart
//! news-feed
//!
//! # Different broker and topic through the environment
//! KAFKA_HOST=kafka KAFKA_PORT=9092 KAFKA_TOPIC=headlines news-feed
//!
//! # Faster pacing, wait for broker acknowledgements, create the topic first
//! news-feed --min-delay-secs 0.5 --max-delay-secs 2 \
//!   --delivery await-ack --create-topic --partitions 3
//!
//! # Check the input file without a broker
//! news-feed --dry-run --no-delay --emit-summary summary.json
//! ```

use anyhow::Context;
use clap::Parser;
use news_feed::producer::{InMemoryPublisher, KafkaNewsPublisher, NewsPublisher};
use news_feed::source::RecordSource;
use news_feed::{FeedArgs, NewsFeed, NoPacer, Pacer, RandomPacer, REQUIRED_COLUMNS};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "news-feed")]
#[command(about = "Replay a CSV archive of news headlines onto a Kafka topic as a paced live feed")]
#[command(long_about = None)]
struct Cli {
    #[command(flatten)]
    feed: FeedArgs,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = run().await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}

async fn run() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "news_feed=info,news_feed_kafka_producer=info,news_feed_csv_source=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let args = cli.feed;
    let settings = args.settings();

    info!(
        "Replaying {} to topic '{}' at {}",
        args.input.display(),
        settings.topic,
        settings.bootstrap_address
    );

    let pacer: Box<dyn Pacer> = if args.no_delay {
        Box::new(NoPacer)
    } else {
        let pacer = RandomPacer::new(args.min_delay_secs, args.max_delay_secs)?;
        info!(
            "Pausing {}s to {}s after each published event",
            args.min_delay_secs, args.max_delay_secs
        );
        Box::new(pacer)
    };

    let publisher: Box<dyn NewsPublisher> = if args.dry_run {
        info!("Dry run: events are logged, nothing is sent to Kafka");
        Box::new(InMemoryPublisher::new(settings.topic.clone()))
    } else {
        let publisher = KafkaNewsPublisher::connect(args.producer_config()).with_context(|| {
            format!("Failed to connect to Kafka at {}", settings.bootstrap_address)
        })?;
        if args.create_topic {
            publisher
                .create_topic_if_not_exists(args.partitions)
                .await
                .with_context(|| format!("Failed to create topic '{}'", settings.topic))?;
        }
        Box::new(publisher)
    };

    let source = RecordSource::open(&args.input, REQUIRED_COLUMNS)
        .with_context(|| format!("Failed to open input file {}", args.input.display()))?;

    let mut feed = NewsFeed::new(publisher, pacer);
    let summary = feed.replay(source).await.context("News feed replay failed")?;

    if let Some(path) = &args.emit_summary {
        summary
            .write_json(path)
            .with_context(|| format!("Failed to write summary to {}", path.display()))?;
        info!("Run summary written to {}", path.display());
    }

    Ok(())
}
