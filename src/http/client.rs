use governor::{DefaultDirectRateLimiter, Jitter, Quota, RateLimiter};
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Rate-limited HTTP client shared by the API modules.
///
/// The back-office API sits behind a small shared host, so the client keeps
/// request rates polite: a steady per-minute quota with a burst allowance,
/// enforced before every request leaves the process. Responses are never
/// cached here: the workflow re-reads after every write and must always see
/// the service's current answer.
#[derive(Debug, Clone)]
pub struct RateLimitedApiClient {
    client: reqwest::Client,
    rate_limiter: Arc<DefaultDirectRateLimiter>,
}

impl RateLimitedApiClient {
    pub fn new(requests_per_minute: u32, burst_capacity: u32) -> Result<Self, reqwest::Error> {
        // Quota construction needs non-zero values; fall back to a safe
        // minimum rather than panicking on a bad config file.
        let per_minute = NonZeroU32::new(requests_per_minute).unwrap_or(NonZeroU32::MIN);
        let burst = NonZeroU32::new(burst_capacity).unwrap_or(NonZeroU32::MIN);

        let quota = Quota::per_minute(per_minute).allow_burst(burst);
        let rate_limiter = Arc::new(RateLimiter::direct(quota));

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            rate_limiter,
        })
    }

    /// Wait for rate limit permission, then send the request.
    pub async fn execute(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<reqwest::Response, reqwest::Error> {
        self.rate_limiter
            .until_ready_with_jitter(Jitter::up_to(Duration::from_millis(100)))
            .await;

        debug!("Executing API request with rate limiting");
        request.send().await
    }

    /// Underlying reqwest client for building requests.
    pub fn inner(&self) -> &reqwest::Client {
        &self.client
    }
}
