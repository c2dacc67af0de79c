//! NSE Market Data Service
//!
//! Fetches from the exchange's public website API:
//! - intraday index chart points (`/api/chart-databyindex`)
//! - India VIX end-of-day history (`/api/historical/vixhistory`)
//!
//! The API only answers requests that carry cookies issued by the public
//! site, so the service primes a session before the first call and renews
//! it after any failure.

use super::common::{ChartPayload, VixHistoryPayload, parse_chart_payload, parse_vix_history};
use crate::domain::ports::{FetchOutcome, IndexDataSource};
use crate::domain::trading::types::{RawPoint, VolatilityReading};
use crate::infrastructure::core::http_client_factory::{
    HttpClientFactory, HttpClientSettings, encode_query_component,
};
use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use chrono::{Local, NaiveDate, TimeDelta};
use reqwest_middleware::ClientWithMiddleware;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

const CHART_PATH: &str = "/api/chart-databyindex";
const VIX_HISTORY_PATH: &str = "/api/historical/vixhistory";

/// Public page that issues the cookies for one family of API endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SessionPage {
    /// Site home, for the intraday chart API
    Home,
    /// Historical VIX report, for the VIX history API
    VixReport,
}

impl SessionPage {
    const ALL: [SessionPage; 2] = [SessionPage::Home, SessionPage::VixReport];

    fn path(self) -> &'static str {
        match self {
            SessionPage::Home => "/",
            SessionPage::VixReport => "/reports-indices-historical-vix",
        }
    }

    fn slot(self) -> usize {
        match self {
            SessionPage::Home => 0,
            SessionPage::VixReport => 1,
        }
    }
}

pub struct NseMarketDataService {
    client: ClientWithMiddleware,
    base_url: Url,
    index: String,
    session_timeout: Duration,
    vix_lookback_days: u32,
    primed: [AtomicBool; SessionPage::ALL.len()],
}

impl NseMarketDataService {
    pub fn builder() -> NseMarketDataServiceBuilder {
        NseMarketDataServiceBuilder::default()
    }

    pub fn chart_url(&self) -> Result<Url> {
        let mut url = self.base_url.join(CHART_PATH)?;
        url.set_query(Some(&format!(
            "index={}&indices=true",
            encode_query_component(&self.index)
        )));
        Ok(url)
    }

    pub fn vix_history_url(&self, to: NaiveDate) -> Result<Url> {
        let from = to - TimeDelta::days(i64::from(self.vix_lookback_days));
        let mut url = self.base_url.join(VIX_HISTORY_PATH)?;
        url.set_query(Some(&format!(
            "from={}&to={}",
            encode_query_component(&from.format("%d-%m-%Y").to_string()),
            encode_query_component(&to.format("%d-%m-%Y").to_string())
        )));
        Ok(url)
    }

    /// Visits a public page so the cookie store holds a valid session.
    async fn prime_session(&self, page: SessionPage) -> Result<()> {
        let url = self.base_url.join(page.path())?;
        debug!("NseMarketDataService: priming session via {}", url);

        self.client
            .get(url.as_str())
            .timeout(self.session_timeout)
            .send()
            .await
            .context("Failed to reach NSE session page")?
            .error_for_status()
            .context("NSE session page returned an error status")?;

        self.primed[page.slot()].store(true, Ordering::Release);
        Ok(())
    }

    fn is_primed(&self, page: SessionPage) -> bool {
        self.primed[page.slot()].load(Ordering::Acquire)
    }

    async fn ensure_session(&self, page: SessionPage) {
        if self.is_primed(page) {
            return;
        }
        if let Err(e) = self.prime_session(page).await {
            // The data call may still succeed; it decides availability.
            warn!("NseMarketDataService: session priming failed: {:#}", e);
        }
    }

    /// Drops the page's session and tries to obtain a fresh one.
    async fn renew_session(&self, page: SessionPage) {
        self.primed[page.slot()].store(false, Ordering::Release);
        if let Err(e) = self.prime_session(page).await {
            warn!("NseMarketDataService: session renewal failed: {:#}", e);
        }
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &Url) -> Result<T> {
        let response = self
            .client
            .get(url.as_str())
            .send()
            .await
            .with_context(|| format!("Failed to fetch {}", url.path()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(anyhow!(
                "NSE {} returned {}: {}",
                url.path(),
                status,
                error_text.chars().take(200).collect::<String>()
            ));
        }

        response
            .json::<T>()
            .await
            .with_context(|| format!("Failed to parse NSE {} response", url.path()))
    }

    async fn load_spot_series(&self) -> Result<Vec<RawPoint>> {
        let url = self.chart_url()?;
        let payload: ChartPayload = self.get_json(&url).await?;
        let points = parse_chart_payload(payload);
        info!(
            "NseMarketDataService: {} points for {}",
            points.len(),
            self.index
        );
        Ok(points)
    }

    async fn load_volatility(&self) -> Result<VolatilityReading> {
        let url = self.vix_history_url(Local::now().date_naive())?;
        let payload: VixHistoryPayload = self.get_json(&url).await?;
        let reading = parse_vix_history(payload)?;
        info!(
            "NseMarketDataService: India VIX {} (prev close {})",
            reading.current, reading.previous_close
        );
        Ok(reading)
    }
}

#[async_trait]
impl IndexDataSource for NseMarketDataService {
    async fn fetch_spot_series(&self) -> FetchOutcome<Vec<RawPoint>> {
        self.ensure_session(SessionPage::Home).await;

        let result = self.load_spot_series().await;
        if let Err(e) = &result {
            warn!("NseMarketDataService: spot fetch failed: {:#}", e);
            self.renew_session(SessionPage::Home).await;
        }
        result.into()
    }

    async fn fetch_volatility(&self) -> FetchOutcome<VolatilityReading> {
        self.ensure_session(SessionPage::VixReport).await;

        let result = self.load_volatility().await;
        if let Err(e) = &result {
            warn!("NseMarketDataService: VIX fetch failed: {:#}", e);
            self.renew_session(SessionPage::VixReport).await;
        }
        result.into()
    }

    fn name(&self) -> &str {
        "nse"
    }
}

#[derive(Default)]
pub struct NseMarketDataServiceBuilder {
    base_url: Option<String>,
    index: Option<String>,
    request_timeout: Option<Duration>,
    session_timeout: Option<Duration>,
    max_retries: Option<u32>,
    vix_lookback_days: Option<u32>,
}

impl NseMarketDataServiceBuilder {
    pub fn base_url(mut self, base_url: String) -> Self {
        self.base_url = Some(base_url);
        self
    }

    pub fn index(mut self, index: String) -> Self {
        self.index = Some(index);
        self
    }

    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    pub fn session_timeout(mut self, timeout: Duration) -> Self {
        self.session_timeout = Some(timeout);
        self
    }

    pub fn max_retries(mut self, retries: u32) -> Self {
        self.max_retries = Some(retries);
        self
    }

    pub fn vix_lookback_days(mut self, days: u32) -> Self {
        self.vix_lookback_days = Some(days);
        self
    }

    pub fn build(self) -> Result<NseMarketDataService> {
        let base_url = self.base_url.context("base_url is required")?;
        let base_url =
            Url::parse(&base_url).with_context(|| format!("Invalid NSE base URL '{}'", base_url))?;
        let index = self.index.unwrap_or_else(|| "NIFTY 50".to_string());

        let defaults = HttpClientSettings::default();
        let request_timeout = self.request_timeout.unwrap_or(defaults.request_timeout);
        let client = HttpClientFactory::create_client(HttpClientSettings {
            request_timeout,
            connect_timeout: request_timeout,
            max_retries: self.max_retries.unwrap_or(defaults.max_retries),
        })?;

        Ok(NseMarketDataService {
            client,
            base_url,
            index,
            session_timeout: self.session_timeout.unwrap_or(Duration::from_secs(15)),
            vix_lookback_days: self.vix_lookback_days.unwrap_or(10),
            primed: [AtomicBool::new(false), AtomicBool::new(false)],
        })
    }
}
