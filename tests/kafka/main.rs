//! Kafka replay E2E tests
//!
//! These tests need a broker reachable at `KAFKA_TEST_BROKERS` (default
//! `localhost:9092`) and are ignored by default:
//!
//! ```bash
//! KAFKA_TEST_BROKERS=localhost:9092 cargo test --test kafka -- --ignored
//! ```

mod replay_e2e;
