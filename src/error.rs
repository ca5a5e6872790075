use news_feed_csv_source::SourceError;
use news_feed_kafka_producer::PublisherError;
use thiserror::Error;

/// Fatal errors of a replay run.
///
/// Unparseable publication dates are not part of this type: they are logged
/// and the row is skipped.
#[derive(Error, Debug)]
pub enum FeedError {
    #[error(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    Publish(#[from] PublisherError),

    #[error("Invalid pacing: {0}")]
    InvalidPacing(String),

    #[error("Failed to write run summary: {0}")]
    Summary(#[from] std::io::Error),
}
