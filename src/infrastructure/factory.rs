use crate::config::{Config, Mode};
use crate::domain::ports::IndexDataSource;
use crate::infrastructure::mock::MockIndexDataSource;
use crate::infrastructure::nse::NseMarketDataService;
use anyhow::Result;
use std::sync::Arc;
use tracing::info;

pub struct DataSourceFactory;

impl DataSourceFactory {
    pub fn create(config: &Config) -> Result<Arc<dyn IndexDataSource>> {
        match config.mode {
            Mode::Mock => {
                info!(
                    "DataSourceFactory: simulated feed (seed {}, VIX {})",
                    config.mock_seed, config.mock_vix
                );
                Ok(Arc::new(MockIndexDataSource::simulated(
                    config.mock_seed,
                    config.mock_vix,
                )))
            }
            Mode::Nse => {
                let service = NseMarketDataService::builder()
                    .base_url(config.nse_base_url.clone())
                    .index(config.nse_index.clone())
                    .request_timeout(config.nse_request_timeout)
                    .session_timeout(config.nse_session_timeout)
                    .max_retries(config.nse_max_retries)
                    .vix_lookback_days(config.vix_lookback_days)
                    .build()?;

                info!(
                    "DataSourceFactory: NSE feed for '{}' at {}",
                    config.nse_index, config.nse_base_url
                );
                Ok(Arc::new(service))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_mock_source() {
        let source = DataSourceFactory::create(&Config::mock()).unwrap();
        assert_eq!(source.name(), "mock");
    }

    #[test]
    fn test_create_nse_source() {
        let mut config = Config::mock();
        config.mode = Mode::Nse;
        let source = DataSourceFactory::create(&config).unwrap();
        assert_eq!(source.name(), "nse");
    }

    #[test]
    fn test_invalid_nse_url_fails() {
        let mut config = Config::mock();
        config.mode = Mode::Nse;
        config.nse_base_url = "::nope".to_string();
        assert!(DataSourceFactory::create(&config).is_err());
    }
}
