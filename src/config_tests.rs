use crate::config::{Config, Mode};
use rust_decimal_macros::dec;
use std::env;
use std::sync::Mutex;
use std::sync::OnceLock;
use std::time::Duration;

// Global lock to prevent race conditions when modifying environment variables in tests
static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

fn get_env_lock() -> &'static Mutex<()> {
    ENV_LOCK.get_or_init(|| Mutex::new(()))
}

const VARS: &[&str] = &[
    "MODE",
    "CANDLE_INTERVAL_MINUTES",
    "VOLATILITY_THRESHOLD",
    "STRIKE_STEP",
    "SESSION_OPEN_TIME",
    "SESSION_UTC_OFFSET_MINUTES",
    "NSE_BASE_URL",
    "NSE_INDEX",
    "NSE_REQUEST_TIMEOUT_SECS",
    "NSE_SESSION_TIMEOUT_SECS",
    "NSE_MAX_RETRIES",
    "VIX_LOOKBACK_DAYS",
    "MOCK_VIX",
    "MOCK_SEED",
];

fn clear_vars() {
    for var in VARS {
        unsafe { env::remove_var(var) };
    }
}

fn set_var(key: &str, value: &str) {
    unsafe { env::set_var(key, value) };
}

#[test]
fn test_config_defaults() {
    let _guard = get_env_lock().lock().unwrap();
    clear_vars();

    let config = Config::from_env().unwrap();

    assert_eq!(config.mode, Mode::Nse);
    assert_eq!(config.nse_base_url, "https://www.nseindia.com");
    assert_eq!(config.nse_index, "NIFTY 50");
    assert_eq!(config.nse_request_timeout, Duration::from_secs(5));
    assert_eq!(config.nse_session_timeout, Duration::from_secs(15));
    assert_eq!(config.nse_max_retries, 1);
    assert_eq!(config.vix_lookback_days, 10);
    assert_eq!(config.candle_timeframe.to_minutes(), 15);
    assert_eq!(config.volatility_threshold, dec!(15.0));
    assert_eq!(config.strike_step, dec!(50));
    assert_eq!(config.session_clock.open.to_string(), "09:15:00");
    assert_eq!(config.session_clock.utc_offset_minutes, 0);
}

#[test]
fn test_config_overrides() {
    let _guard = get_env_lock().lock().unwrap();
    clear_vars();
    set_var("MODE", "mock");
    set_var("CANDLE_INTERVAL_MINUTES", "5");
    set_var("VOLATILITY_THRESHOLD", "12.5");
    set_var("STRIKE_STEP", "100");
    set_var("SESSION_OPEN_TIME", "09:30");
    set_var("SESSION_UTC_OFFSET_MINUTES", "330");
    set_var("MOCK_VIX", "11.2");
    set_var("MOCK_SEED", "7");

    let config = Config::from_env().unwrap();

    assert_eq!(config.mode, Mode::Mock);
    assert_eq!(config.candle_timeframe.to_minutes(), 5);
    assert_eq!(config.volatility_threshold, dec!(12.5));
    assert_eq!(config.strike_step, dec!(100));
    assert_eq!(config.session_clock.open.to_string(), "09:30:00");
    assert_eq!(config.session_clock.utc_offset_minutes, 330);
    assert_eq!(config.mock_vix, dec!(11.2));
    assert_eq!(config.mock_seed, 7);

    let settings = config.pipeline_settings();
    assert_eq!(settings.timeframe.to_minutes(), 5);
    assert_eq!(settings.volatility_threshold, dec!(12.5));

    clear_vars();
}

#[test]
fn test_config_rejects_invalid_values() {
    let _guard = get_env_lock().lock().unwrap();

    clear_vars();
    set_var("MODE", "paper");
    assert!(Config::from_env().is_err());

    clear_vars();
    set_var("CANDLE_INTERVAL_MINUTES", "0");
    assert!(Config::from_env().is_err());

    clear_vars();
    set_var("STRIKE_STEP", "-50");
    assert!(Config::from_env().is_err());

    clear_vars();
    set_var("VOLATILITY_THRESHOLD", "high");
    assert!(Config::from_env().is_err());

    clear_vars();
    set_var("SESSION_OPEN_TIME", "25:00");
    assert!(Config::from_env().is_err());

    clear_vars();
    set_var("NSE_MAX_RETRIES", "-1");
    assert!(Config::from_env().is_err());

    clear_vars();
}
