use anyhow::{Context, Result};
use reqwest::Client;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, HeaderMap, HeaderValue, USER_AGENT};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{RetryTransientMiddleware, policies::ExponentialBackoff};
use std::time::Duration;

/// Browser-like identity; the exchange rejects requests without one.
const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

#[derive(Debug, Clone, Copy)]
pub struct HttpClientSettings {
    pub request_timeout: Duration,
    pub connect_timeout: Duration,
    pub max_retries: u32,
}

impl Default for HttpClientSettings {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(5),
            connect_timeout: Duration::from_secs(5),
            max_retries: 1,
        }
    }
}

pub struct HttpClientFactory;

impl HttpClientFactory {
    /// Creates a cookie-carrying HTTP client with bounded retry middleware.
    ///
    /// Retries only cover transient failures (timeouts, 5xx, 429) and stop
    /// after `max_retries`; the caller turns the final failure into an
    /// unavailable outcome.
    pub fn create_client(settings: HttpClientSettings) -> Result<ClientWithMiddleware> {
        let retry_policy = ExponentialBackoff::builder().build_with_max_retries(settings.max_retries);

        let client = Client::builder()
            .default_headers(Self::browser_headers())
            .cookie_store(true)
            .pool_max_idle_per_host(2)
            .timeout(settings.request_timeout)
            .connect_timeout(settings.connect_timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(ClientBuilder::new(client)
            .with(RetryTransientMiddleware::new_with_policy(retry_policy))
            .build())
    }

    fn browser_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));
        headers.insert(ACCEPT, HeaderValue::from_static("*/*"));
        headers.insert(
            ACCEPT_LANGUAGE,
            HeaderValue::from_static("en-GB,en-US;q=0.9,en;q=0.8"),
        );
        headers
    }
}

/// Percent-encodes a query component.
///
/// Spaces become `%20` rather than `+`; the exchange API only accepts the
/// former in index names such as `NIFTY 50`.
pub fn encode_query_component(s: &str) -> String {
    let mut encoded = String::new();
    for c in s.chars() {
        match c {
            'A'..='Z' | 'a'..='z' | '0'..='9' | '-' | '_' | '.' | '~' => {
                encoded.push(c);
            }
            _ => {
                let mut buf = [0u8; 4];
                for byte in c.encode_utf8(&mut buf).as_bytes() {
                    encoded.push_str(&format!("%{:02X}", byte));
                }
            }
        }
    }
    encoded
}
