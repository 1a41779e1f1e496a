//! Bounded retry passes over failed fetches
//!
//! Records still holding the failure sentinel after the chunked fetch get a
//! configurable number of additional passes. Each pass refetches only the
//! failing records (unchunked, one attempt per record) after an exponential
//! backoff with jitter. Records that fail every pass keep the sentinel and
//! are persisted in that state.

use crate::message::fetcher::ChunkedFetcher;
use futures::future::join_all;
use navsearch_common::types::MessageRecord;
use rand::Rng;
use std::time::Duration;
use tracing::info;

/// Relative jitter applied to backoff delays
const JITTER_FRACTION: f64 = 0.2;

/// Bounded retry policy
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Number of sequential passes over the working set
    pub passes: u32,
    /// Backoff before the first retry pass
    pub base_backoff: Duration,
    /// Backoff ceiling
    pub max_backoff: Duration,
    /// Apply +/-20% jitter to backoff delays
    pub jitter: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            passes: crate::config::DEFAULT_RETRY_PASSES,
            base_backoff: Duration::from_millis(crate::config::DEFAULT_RETRY_BASE_MS),
            max_backoff: Duration::from_millis(crate::config::DEFAULT_RETRY_MAX_MS),
            jitter: true,
        }
    }
}

impl RetryPolicy {
    /// Build a policy from the ingest configuration
    pub fn from_config(config: &crate::config::IngestConfig) -> Self {
        Self {
            passes: config.retry_passes,
            base_backoff: Duration::from_millis(config.retry_base_ms),
            max_backoff: Duration::from_millis(config.retry_max_ms),
            jitter: true,
        }
    }

    /// Backoff before retry pass `pass` (1-based): base * 2^(pass-1), capped
    pub fn backoff_for(&self, pass: u32) -> Duration {
        let exp = self.base_backoff.saturating_mul(1u32 << (pass - 1).min(16));
        let capped = exp.min(self.max_backoff);
        if !self.jitter {
            return capped;
        }
        let spread = rand::rng().random_range(-JITTER_FRACTION..=JITTER_FRACTION);
        let millis = (capped.as_millis() as f64 * (1.0 + spread)).max(0.0) as u64;
        Duration::from_millis(millis)
    }
}

/// Runs bounded retry passes over a working set of records
pub struct RetryCoordinator {
    policy: RetryPolicy,
}

impl RetryCoordinator {
    pub fn new(policy: RetryPolicy) -> Self {
        Self { policy }
    }

    /// Refetch a record iff it holds the failure sentinel.
    ///
    /// Successful refetches replace the text; repeated failures keep the
    /// sentinel. Records with real text pass through untouched.
    pub async fn maybe_request(
        &self,
        fetcher: &ChunkedFetcher,
        record: MessageRecord,
    ) -> MessageRecord {
        if record.is_request_fail() {
            fetcher.fetch_one(record).await
        } else {
            record
        }
    }

    /// Run the configured number of passes, logging the count of
    /// still-failing records after each.
    pub async fn run(
        &self,
        fetcher: &ChunkedFetcher,
        mut records: Vec<MessageRecord>,
    ) -> Vec<MessageRecord> {
        for pass in 1..=self.policy.passes {
            let failing = records.iter().filter(|r| r.is_request_fail()).count();
            if failing == 0 {
                break;
            }

            let backoff = self.policy.backoff_for(pass);
            if !backoff.is_zero() {
                tokio::time::sleep(backoff).await;
            }

            records = join_all(
                records
                    .into_iter()
                    .map(|record| self.maybe_request(fetcher, record)),
            )
            .await;

            let remaining = records.iter().filter(|r| r.is_request_fail()).count();
            info!(pass, total_passes = self.policy.passes, remaining, "Retry pass complete");
        }
        records
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::IngestConfig;
    use crate::message::codec::parse_message_uri;
    use navsearch_common::types::FAIL_TEXT;

    #[test]
    fn test_backoff_doubles_and_caps() {
        let policy = RetryPolicy {
            passes: 4,
            base_backoff: Duration::from_millis(500),
            max_backoff: Duration::from_millis(1500),
            jitter: false,
        };
        assert_eq!(policy.backoff_for(1), Duration::from_millis(500));
        assert_eq!(policy.backoff_for(2), Duration::from_millis(1000));
        assert_eq!(policy.backoff_for(3), Duration::from_millis(1500));
        assert_eq!(policy.backoff_for(4), Duration::from_millis(1500));
    }

    #[test]
    fn test_backoff_jitter_stays_in_bounds() {
        let policy = RetryPolicy {
            passes: 1,
            base_backoff: Duration::from_millis(1000),
            max_backoff: Duration::from_millis(1000),
            jitter: true,
        };
        for _ in 0..20 {
            let backoff = policy.backoff_for(1);
            assert!(backoff >= Duration::from_millis(800));
            assert!(backoff <= Duration::from_millis(1200));
        }
    }

    #[tokio::test]
    async fn test_successful_records_pass_through_untouched() {
        let coordinator = RetryCoordinator::new(RetryPolicy {
            passes: 4,
            base_backoff: Duration::ZERO,
            max_backoff: Duration::ZERO,
            jitter: false,
        });
        let fetcher = ChunkedFetcher::new(&IngestConfig::default()).unwrap();

        let mut record = parse_message_uri("/msgs/NAV16042.txt").unwrap();
        record.text = Some("UNCLAS // N01000".to_string());

        // No record is failing, so no pass issues any request
        let out = coordinator.run(&fetcher, vec![record.clone()]).await;
        assert_eq!(out, vec![record]);
    }

    #[tokio::test]
    async fn test_terminal_failure_keeps_sentinel() {
        let coordinator = RetryCoordinator::new(RetryPolicy {
            passes: 4,
            base_backoff: Duration::ZERO,
            max_backoff: Duration::ZERO,
            jitter: false,
        });
        let mut config = IngestConfig::default();
        config.request_timeout_secs = 1;
        let fetcher = ChunkedFetcher::new(&config).unwrap();

        let mut failing = parse_message_uri("/msgs/NAV16001.txt").unwrap();
        failing.url = "http://192.0.2.1:9/NAV16001.txt".to_string();
        failing.text = Some(FAIL_TEXT.to_string());

        let mut healthy = parse_message_uri("/msgs/NAV16002.txt").unwrap();
        healthy.text = Some("message body".to_string());

        let out = coordinator.run(&fetcher, vec![failing, healthy]).await;
        assert!(out[0].is_request_fail());
        assert_eq!(out[1].text.as_deref(), Some("message body"));
    }
}
