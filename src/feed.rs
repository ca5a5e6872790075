//! The read-transform-publish loop.
//!
//! One row drives at most one publish. The loop moves through these phases:
//!
//! ```text
//! Reading ──► Transforming ──► Publishing ──► Pacing ──┐
//!    ▲              │                                  │
//!    │              └── unparseable date (no pause) ───┤
//!    └─────────────────────────────────────────────────┘
//! Reading ──(source exhausted)──► Draining ──► Done
//! ```
//!
//! Source and publish errors end the run. Date parse errors skip the row.

use crate::pacing::Pacer;
use crate::timestamp::{normalize_timestamp, TimestampError};
use crate::FeedError;
use news_feed_csv_source::{RawRecord, SourceError};
use news_feed_kafka_producer::{NewsEvent, NewsPublisher};
use serde::Serialize;
use std::path::Path;
use std::time::{Duration, Instant};
use tracing::{debug, error, info};

/// Column holding the headline, used as message title and key.
pub const HEADLINE_COLUMN: &str = "headline";
/// Column holding the `YYYY-MM-DD HH:MM:SS` publication time.
pub const PUBLISHED_COLUMN: &str = "published";
/// Columns the input file must declare.
pub const REQUIRED_COLUMNS: &[&str] = &[HEADLINE_COLUMN, PUBLISHED_COLUMN];

/// Build the event for one row.
pub fn transform(record: &RawRecord) -> Result<NewsEvent, TimestampError> {
    let published_at = normalize_timestamp(record.field(PUBLISHED_COLUMN))?;
    Ok(NewsEvent::new(record.field(HEADLINE_COLUMN), published_at))
}

/// Counters for a finished run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FeedSummary {
    /// Data rows read from the source.
    pub rows_read: u64,
    /// Events handed to the publisher.
    pub published: u64,
    /// Rows dropped because their date did not parse.
    pub skipped: u64,
    #[serde(serialize_with = "serialize_duration_ms", rename = "duration_ms")]
    pub duration: Duration,
}

impl FeedSummary {
    /// Calculate messages per second.
    pub fn messages_per_second(&self) -> f64 {
        if self.duration.as_secs_f64() > 0.0 {
            self.published as f64 / self.duration.as_secs_f64()
        } else {
            0.0
        }
    }

    /// Write the summary as pretty JSON.
    pub fn write_json(&self, path: &Path) -> Result<(), FeedError> {
        let json = serde_json::to_vec_pretty(self).map_err(std::io::Error::from)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

fn serialize_duration_ms<S: serde::Serializer>(
    duration: &Duration,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_u64(duration.as_millis() as u64)
}

/// Run-scoped context owning the publisher and the pacer.
pub struct NewsFeed<P, D> {
    publisher: P,
    pacer: D,
}

impl<P, D> NewsFeed<P, D>
where
    P: NewsPublisher,
    D: Pacer,
{
    pub fn new(publisher: P, pacer: D) -> Self {
        Self { publisher, pacer }
    }

    pub fn publisher(&self) -> &P {
        &self.publisher
    }

    pub fn into_parts(self) -> (P, D) {
        (self.publisher, self.pacer)
    }

    /// Replay every record, then drain the publisher.
    ///
    /// The record source is consumed and dropped before draining, so a file
    /// handle behind it is closed on every exit path.
    pub async fn replay<I>(&mut self, records: I) -> Result<FeedSummary, FeedError>
    where
        I: IntoIterator<Item = Result<RawRecord, SourceError>>,
    {
        let start_time = Instant::now();
        let mut summary = FeedSummary::default();

        for record in records {
            let record = record?;
            summary.rows_read += 1;

            let event = match transform(&record) {
                Ok(event) => event,
                Err(e) => {
                    error!(
                        title = %record.field(HEADLINE_COLUMN),
                        line = record.line(),
                        "Failed to convert publication date: {e}"
                    );
                    summary.skipped += 1;
                    continue;
                }
            };

            self.publisher.publish(&event).await?;
            summary.published += 1;

            self.pacer.pause().await;
        }

        debug!("Record source exhausted, draining publisher");
        self.publisher.drain().await?;

        summary.duration = start_time.elapsed();
        info!(
            "Feed complete: {} rows read, {} published, {} skipped in {:?} ({:.2} msg/sec)",
            summary.rows_read,
            summary.published,
            summary.skipped,
            summary.duration,
            summary.messages_per_second()
        );

        Ok(summary)
    }
}
