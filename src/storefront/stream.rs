//! Polling price feed.
//!
//! Each `price-<id>` channel emits a new price for its lot every
//! [`StreamConfig::interval`]. Prices are drawn deterministically from the
//! seed, the channel and the tick number.

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

use crate::hash::StableHasher;

use super::error::StreamError;
use super::state::LotId;

/// Lowest price the feed emits
pub const MIN_PRICE: u32 = 30;
/// Highest price the feed emits
pub const MAX_PRICE: u32 = 40;

const CHANNEL_PREFIX: &str = "price-";

/// Channel name for a lot's price feed
pub fn channel(id: LotId) -> String {
    format!("{CHANNEL_PREFIX}{id}")
}

/// Parse a `price-<id>` channel name
pub fn parse_channel(name: &str) -> Option<LotId> {
    let id = name.strip_prefix(CHANNEL_PREFIX)?;
    if id.is_empty() || !id.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    id.parse().ok()
}

/// A price tick for one lot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceUpdate {
    pub id: LotId,
    pub price: u32,
}

/// Configuration for [`PriceStream`].
#[derive(Debug, Clone, Copy)]
pub struct StreamConfig {
    /// Time between ticks. Default: 400ms
    pub interval: Duration,
    /// Seed for the generated prices
    pub seed: u64,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(400),
            seed: 0,
        }
    }
}

impl StreamConfig {
    /// Create config with a custom interval and seed.
    pub fn new(interval: Duration, seed: u64) -> Result<Self, StreamError> {
        if interval.is_zero() {
            return Err(StreamError::ZeroInterval);
        }
        Ok(Self { interval, seed })
    }
}

// =============================================================================
// PriceStream
// =============================================================================

/// Source of price subscriptions.
///
/// Subscribing spawns a task on the current tokio runtime.
#[derive(Debug, Clone, Default)]
pub struct PriceStream {
    config: StreamConfig,
}

impl PriceStream {
    pub fn new(config: StreamConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &StreamConfig {
        &self.config
    }

    /// Price emitted on tick `n` of a lot's channel.
    pub fn price_at(&self, id: LotId, n: u64) -> u32 {
        let unit = StableHasher::new()
            .update_u64(self.config.seed)
            .update_u64(u64::from(id))
            .update_u64(n)
            .finish_unit();
        let span = f64::from(MAX_PRICE - MIN_PRICE);
        (unit * span + f64::from(MIN_PRICE)).round() as u32
    }

    /// Start delivering updates for `channel` to `listener`.
    ///
    /// The first update arrives one interval after subscribing.
    pub fn subscribe(
        &self,
        channel: &str,
        listener: impl Fn(PriceUpdate) + Send + Sync + 'static,
    ) -> Result<PriceSubscription, StreamError> {
        let id = parse_channel(channel).ok_or_else(|| StreamError::UnknownChannel(channel.to_string()))?;
        let period = self.config.interval;
        if period.is_zero() {
            return Err(StreamError::ZeroInterval);
        }
        let stream = self.clone();

        log::debug!("subscribed to {channel}");
        let task = tokio::spawn(async move {
            let mut ticker = time::interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            let mut n = 0u64;
            loop {
                ticker.tick().await;
                let price = stream.price_at(id, n);
                log::trace!("price-{id} tick {n}: {price}");
                listener(PriceUpdate { id, price });
                n += 1;
            }
        });

        Ok(PriceSubscription { id, task })
    }
}

// =============================================================================
// PriceSubscription
// =============================================================================

/// Live subscription; stops on [`unsubscribe`](Self::unsubscribe) or drop.
#[derive(Debug)]
pub struct PriceSubscription {
    id: LotId,
    task: JoinHandle<()>,
}

impl PriceSubscription {
    /// Lot this subscription follows
    pub fn lot_id(&self) -> LotId {
        self.id
    }

    /// Whether the feed task is still running
    pub fn is_active(&self) -> bool {
        !self.task.is_finished()
    }

    /// Stop the feed
    pub fn unsubscribe(self) {
        drop(self);
    }
}

impl Drop for PriceSubscription {
    fn drop(&mut self) {
        self.task.abort();
        log::debug!("unsubscribed from price-{}", self.id);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use parking_lot::Mutex;

    use super::*;

    fn recorder() -> (Arc<Mutex<Vec<PriceUpdate>>>, impl Fn(PriceUpdate) + Send + Sync + 'static) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        (seen, move |update| sink.lock().push(update))
    }

    #[test]
    fn test_channel_names() {
        assert_eq!(channel(7), "price-7");
        assert_eq!(parse_channel("price-7"), Some(7));
        assert_eq!(parse_channel("price-"), None);
        assert_eq!(parse_channel("price-x"), None);
        assert_eq!(parse_channel("news"), None);
    }

    #[test]
    fn test_prices_in_range() {
        let stream = PriceStream::default();
        for n in 0..200 {
            let price = stream.price_at(1, n);
            assert!((MIN_PRICE..=MAX_PRICE).contains(&price), "price {price}");
        }
        assert_eq!(stream.price_at(2, 5), PriceStream::default().price_at(2, 5));
    }

    #[tokio::test(start_paused = true)]
    async fn test_unknown_channel() {
        let stream = PriceStream::default();
        let err = stream.subscribe("weather", |_| {}).unwrap_err();
        assert_eq!(err, StreamError::UnknownChannel("weather".into()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_interval_rejected() {
        assert_eq!(StreamConfig::new(Duration::ZERO, 1).unwrap_err(), StreamError::ZeroInterval);
        assert_eq!(StreamConfig::new(Duration::from_millis(50), 1).unwrap().seed, 1);

        let stream = PriceStream::new(StreamConfig {
            interval: Duration::ZERO,
            seed: 0,
        });
        let err = stream.subscribe("price-1", |_| {}).unwrap_err();
        assert_eq!(err, StreamError::ZeroInterval);
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticks_every_interval() {
        let stream = PriceStream::default();
        let (seen, listener) = recorder();
        let sub = stream.subscribe("price-3", listener).unwrap();
        assert_eq!(sub.lot_id(), 3);

        time::sleep(Duration::from_millis(1300)).await;
        let updates = seen.lock().clone();
        assert_eq!(updates.len(), 3);
        assert!(updates.iter().all(|u| u.id == 3));
        assert_eq!(updates[0].price, stream.price_at(3, 0));
        assert!(sub.is_active());
    }

    #[tokio::test(start_paused = true)]
    async fn test_unsubscribe_stops_updates() {
        let stream = PriceStream::default();
        let (seen, listener) = recorder();
        let sub = stream.subscribe(&channel(1), listener).unwrap();

        time::sleep(Duration::from_millis(500)).await;
        assert_eq!(seen.lock().len(), 1);

        sub.unsubscribe();
        time::sleep(Duration::from_millis(2000)).await;
        assert_eq!(seen.lock().len(), 1);
    }
}
