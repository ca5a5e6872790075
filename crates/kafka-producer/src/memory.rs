//! In-memory publisher
//!
//! Captures published events instead of sending them to a broker. Used for
//! dry runs and for exercising the feed loop in tests.

use crate::error::Result;
use crate::{NewsEvent, NewsPublisher, PublishReceipt};
use async_trait::async_trait;
use std::sync::{Mutex, PoisonError};

/// A message captured by [`InMemoryPublisher`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedMessage {
    pub topic: String,
    pub key: Vec<u8>,
    pub payload: Vec<u8>,
}

impl CapturedMessage {
    pub fn key_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.key).ok()
    }

    pub fn payload_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.payload).ok()
    }
}

/// Publisher that keeps every message in memory.
#[derive(Debug, Default)]
pub struct InMemoryPublisher {
    topic: String,
    messages: Mutex<Vec<CapturedMessage>>,
    drained: Mutex<bool>,
}

impl InMemoryPublisher {
    pub fn new(topic: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            messages: Mutex::new(Vec::new()),
            drained: Mutex::new(false),
        }
    }

    /// Snapshot of all captured messages in publish order.
    pub fn messages(&self) -> Vec<CapturedMessage> {
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn len(&self) -> usize {
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether [`NewsPublisher::drain`] has been called.
    pub fn is_drained(&self) -> bool {
        *self.drained.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl NewsPublisher for InMemoryPublisher {
    async fn publish(&self, event: &NewsEvent) -> Result<PublishReceipt> {
        let payload = event.to_payload()?;
        let message = CapturedMessage {
            topic: self.topic.clone(),
            key: event.key().to_vec(),
            payload,
        };

        tracing::info!(
            key = %event.title,
            payload = %String::from_utf8_lossy(&message.payload),
            "Captured news event (dry run)"
        );

        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(message);
        Ok(PublishReceipt::Enqueued)
    }

    async fn drain(&self) -> Result<()> {
        *self.drained.lock().unwrap_or_else(PoisonError::into_inner) = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_captures_key_and_payload() {
        let publisher = InMemoryPublisher::new("raw-news");
        let event = NewsEvent::new("Storm hits coast", "2023-05-01T14:30:00");

        let receipt = publisher.publish(&event).await.unwrap();
        assert_eq!(receipt, PublishReceipt::Enqueued);

        let messages = publisher.messages();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].topic, "raw-news");
        assert_eq!(messages[0].key_str(), Some("Storm hits coast"));
        assert_eq!(
            messages[0].payload_str(),
            Some(r#"{"title":"Storm hits coast","published_at":"2023-05-01T14:30:00"}"#)
        );
    }

    #[tokio::test]
    async fn test_publish_after_poisoned_lock() {
        let publisher = std::sync::Arc::new(InMemoryPublisher::new("raw-news"));
        let poisoner = std::sync::Arc::clone(&publisher);
        let _ = std::thread::spawn(move || {
            let _guard = poisoner.messages.lock().unwrap();
            panic!("poison the message buffer");
        })
        .join();
        assert!(publisher.messages.is_poisoned());

        let event = NewsEvent::new("Storm hits coast", "2023-05-01T14:30:00");
        publisher.publish(&event).await.unwrap();
        publisher.drain().await.unwrap();

        assert_eq!(publisher.len(), 1);
        assert_eq!(publisher.messages()[0].key_str(), Some("Storm hits coast"));
        assert!(publisher.is_drained());
    }

    #[tokio::test]
    async fn test_drain_marks_publisher() {
        let publisher = InMemoryPublisher::new("raw-news");
        assert!(!publisher.is_drained());
        publisher.drain().await.unwrap();
        assert!(publisher.is_drained());
        assert!(publisher.is_empty());
    }
}
