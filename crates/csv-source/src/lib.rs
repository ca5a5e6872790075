//! CSV record source for the news feed
//!
//! This crate opens a delimited text file, treats the first line as the header
//! row and yields one [`RawRecord`] per data row, lazily and in file order.
//!
//! # Example
//!
//! ```ignore
//! use news_feed_csv_source::RecordSource;
//!
//! let source = RecordSource::open("./archive/data.csv", &["headline", "published"])?;
//! for record in source {
//!     let record = record?;
//!     println!("{} at {}", record.field("headline"), record.field("published"));
//! }
//! ```

mod error;
mod record;
mod source;

pub use error::{Result, SourceError};
pub use record::RawRecord;
pub use source::RecordSource;
