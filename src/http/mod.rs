pub mod client;

pub use client::RateLimitedApiClient;
