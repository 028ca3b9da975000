//! Rate limiter initialization.
//!
//! This module provides a token-bucket rate limiter for controlling check rate.

use std::sync::Arc;
use tokio::sync::Semaphore as TokioSemaphore;
use tokio::time::{interval, Duration as TokioDuration};

/// Token-bucket rate limiter for controlling check rate.
///
/// Implements a token bucket where tokens are replenished at a fixed rate
/// (checks per second). Each check consumes a token, and checks are blocked
/// when no tokens are available.
///
/// # Behavior
///
/// - Tokens are replenished continuously at the specified rate
/// - Burst capacity allows short bursts above the base rate
/// - Uses a background task for token replenishment
/// - Supports graceful shutdown via `CancellationToken`
pub struct RateLimiter {
    permits: Arc<TokioSemaphore>,
    #[allow(dead_code)]
    capacity: usize,
}

impl RateLimiter {
    pub async fn acquire(&self) {
        let _ = self.permits.acquire().await;
    }
}

/// Initializes a token-bucket rate limiter.
///
/// If `rps` is 0, rate limiting is disabled and `None` is returned.
///
/// # Arguments
///
/// * `rps` - Checks per second (0 disables rate limiting)
/// * `burst` - Burst capacity (maximum tokens in bucket)
///
/// # Returns
///
/// A tuple of `(RateLimiter, CancellationToken)` if rate limiting is enabled,
/// or `None` if disabled. The cancellation token can be used to gracefully shut
/// down the background token replenishment task.
pub fn init_rate_limiter(
    rps: u32,
    burst: usize,
) -> Option<(Arc<RateLimiter>, tokio_util::sync::CancellationToken)> {
    if rps == 0 {
        return None;
    }
    let capacity = burst;
    let shutdown = tokio_util::sync::CancellationToken::new();
    let shutdown_clone = shutdown.clone();

    let limiter = Arc::new(RateLimiter {
        permits: Arc::new(TokioSemaphore::new(capacity)),
        capacity,
    });

    let permits = limiter.permits.clone();
    // A fast ticker (100ms) keeps the bucket smooth at low RPS values;
    // fractional permits are carried over between ticks to avoid precision loss.
    let mut ticker = interval(TokioDuration::from_millis(100));
    tokio::spawn(async move {
        let mut last_time = tokio::time::Instant::now();
        let mut fractional_permits = 0.0f64;
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let now = tokio::time::Instant::now();
                    let elapsed = now.duration_since(last_time);

                    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                    let permits_to_add_f64 = rps as f64 * elapsed.as_secs_f64() + fractional_permits;
                    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                    let permits_to_add = permits_to_add_f64 as u32;
                    #[allow(clippy::cast_precision_loss)]
                    {
                        fractional_permits = permits_to_add_f64 - permits_to_add as f64;
                    }

                    if permits_to_add > 0 {
                        // Never grow the bucket past its capacity
                        let available = permits.available_permits();
                        let headroom = capacity.saturating_sub(available);
                        #[allow(clippy::cast_possible_truncation)]
                        permits.add_permits((permits_to_add as usize).min(headroom));
                    }

                    last_time = now;
                }
                _ = shutdown_clone.cancelled() => {
                    log::debug!("Rate limiter background task shutting down");
                    break;
                }
            }
        }
    });

    Some((limiter, shutdown))
}
