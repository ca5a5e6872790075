//! Pacing between published events.
//!
//! The feed pauses after every published row so the topic looks like a live
//! source rather than a bulk import. Rows that are skipped are not paced.

use crate::FeedError;
use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Duration;

/// Suspends the feed between published events.
#[async_trait]
pub trait Pacer: Send {
    async fn pause(&mut self);
}

#[async_trait]
impl<P: Pacer + ?Sized> Pacer for Box<P> {
    async fn pause(&mut self) {
        (**self).pause().await
    }
}

/// Sleeps for a uniformly random duration in `[min, max]` seconds.
#[derive(Debug)]
pub struct RandomPacer {
    min_secs: f64,
    max_secs: f64,
    rng: StdRng,
}

impl RandomPacer {
    pub fn new(min_secs: f64, max_secs: f64) -> Result<Self, FeedError> {
        Self::with_rng(min_secs, max_secs, StdRng::from_os_rng())
    }

    /// Deterministic draws for reproducible runs.
    pub fn seeded(min_secs: f64, max_secs: f64, seed: u64) -> Result<Self, FeedError> {
        Self::with_rng(min_secs, max_secs, StdRng::seed_from_u64(seed))
    }

    fn with_rng(min_secs: f64, max_secs: f64, rng: StdRng) -> Result<Self, FeedError> {
        if !min_secs.is_finite() || !max_secs.is_finite() {
            return Err(FeedError::InvalidPacing(format!(
                "delay bounds must be finite (got {min_secs}..={max_secs})"
            )));
        }
        if min_secs < 0.0 {
            return Err(FeedError::InvalidPacing(format!(
                "minimum delay must not be negative (got {min_secs})"
            )));
        }
        if max_secs > Duration::MAX.as_secs_f64() {
            return Err(FeedError::InvalidPacing(format!(
                "maximum delay {max_secs}s is too large"
            )));
        }
        if min_secs > max_secs {
            return Err(FeedError::InvalidPacing(format!(
                "minimum delay {min_secs}s exceeds maximum delay {max_secs}s"
            )));
        }

        Ok(Self {
            min_secs,
            max_secs,
            rng,
        })
    }

    pub fn bounds(&self) -> (f64, f64) {
        (self.min_secs, self.max_secs)
    }

    /// Draw the next pause.
    pub fn next_delay(&mut self) -> Duration {
        let secs = if self.min_secs == self.max_secs {
            self.min_secs
        } else {
            self.rng.random_range(self.min_secs..=self.max_secs)
        };
        Duration::try_from_secs_f64(secs).unwrap_or(Duration::MAX)
    }
}

#[async_trait]
impl Pacer for RandomPacer {
    async fn pause(&mut self) {
        let delay = self.next_delay();
        tracing::debug!("Pausing for {:.3}s", delay.as_secs_f64());
        tokio::time::sleep(delay).await;
    }
}

/// Never pauses.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoPacer;

#[async_trait]
impl Pacer for NoPacer {
    async fn pause(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delays_within_bounds() {
        let mut pacer = RandomPacer::seeded(1.0, 10.0, 42).unwrap();
        for _ in 0..1000 {
            let delay = pacer.next_delay();
            assert!(delay >= Duration::from_secs(1));
            assert!(delay <= Duration::from_secs(10));
        }
    }

    #[test]
    fn test_seeded_is_deterministic() {
        let mut a = RandomPacer::seeded(0.5, 2.0, 7).unwrap();
        let mut b = RandomPacer::seeded(0.5, 2.0, 7).unwrap();
        for _ in 0..10 {
            assert_eq!(a.next_delay(), b.next_delay());
        }
    }

    #[test]
    fn test_equal_bounds() {
        let mut pacer = RandomPacer::seeded(0.0, 0.0, 1).unwrap();
        assert_eq!(pacer.next_delay(), Duration::ZERO);
    }

    #[test]
    fn test_invalid_bounds() {
        assert!(matches!(
            RandomPacer::new(5.0, 1.0),
            Err(FeedError::InvalidPacing(_))
        ));
        assert!(matches!(
            RandomPacer::new(-1.0, 1.0),
            Err(FeedError::InvalidPacing(_))
        ));
        assert!(matches!(
            RandomPacer::new(0.0, f64::INFINITY),
            Err(FeedError::InvalidPacing(_))
        ));
        assert!(matches!(
            RandomPacer::new(f64::NAN, 1.0),
            Err(FeedError::InvalidPacing(_))
        ));
        assert!(matches!(
            RandomPacer::seeded(1e20, 1e20, 1),
            Err(FeedError::InvalidPacing(_))
        ));
        assert!(matches!(
            RandomPacer::new(1.0, 1e20),
            Err(FeedError::InvalidPacing(_))
        ));
    }

    #[test]
    fn test_large_bounds_do_not_panic() {
        let mut pacer = RandomPacer::seeded(1e9, 1e10, 3).unwrap();
        let delay = pacer.next_delay();
        assert!(delay >= Duration::from_secs(1_000_000_000));
    }

    #[tokio::test]
    async fn test_zero_pause_returns() {
        let mut pacer = RandomPacer::seeded(0.0, 0.0, 1).unwrap();
        pacer.pause().await;
        NoPacer.pause().await;
    }
}
