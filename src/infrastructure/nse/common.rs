//! Payload shapes and parsing for the NSE public JSON endpoints.

use crate::domain::trading::types::{RawPoint, VolatilityReading};
use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use serde::Deserialize;
use serde_json::Value;
use std::str::FromStr;
use tracing::debug;

/// `/api/chart-databyindex` response. The field name is misspelt upstream.
#[derive(Debug, Deserialize)]
pub struct ChartPayload {
    #[serde(rename = "grapthData", default)]
    pub graph_data: Vec<Vec<Value>>,
}

/// `/api/historical/vixhistory` response.
#[derive(Debug, Deserialize)]
pub struct VixHistoryPayload {
    #[serde(default)]
    pub data: Vec<VixRecord>,
}

#[derive(Debug, Deserialize)]
pub struct VixRecord {
    #[serde(rename = "EOD_TIMESTAMP", default)]
    pub timestamp: Option<String>,
    #[serde(rename = "EOD_CLOSE_INDEX_VAL", default)]
    pub close: Option<Value>,
    #[serde(rename = "EOD_PREV_CLOSE", default)]
    pub prev_close: Option<Value>,
}

impl VixRecord {
    fn date(&self) -> Option<NaiveDate> {
        let raw = self.timestamp.as_deref()?.trim();
        NaiveDate::parse_from_str(raw, "%d-%b-%Y")
            .or_else(|_| NaiveDate::parse_from_str(raw, "%d-%m-%Y"))
            .or_else(|_| NaiveDate::parse_from_str(raw, "%Y-%m-%d"))
            .ok()
    }
}

/// Accepts JSON numbers and numeric strings (with optional thousands separators).
pub fn decimal_from_json(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Some(Decimal::from(i))
            } else {
                n.as_f64().and_then(Decimal::from_f64)
            }
        }
        Value::String(s) => Decimal::from_str(s.trim().replace(',', "").as_str()).ok(),
        _ => None,
    }
}

/// Converts chart entries `[epoch_ms, value, ...]` into points ordered by time.
///
/// Malformed entries are skipped. Sorting is stable so duplicate
/// timestamps keep their feed order.
pub fn parse_chart_payload(payload: ChartPayload) -> Vec<RawPoint> {
    let total = payload.graph_data.len();
    let mut points: Vec<RawPoint> = payload
        .graph_data
        .iter()
        .filter_map(|entry| {
            let millis = match entry.first()? {
                Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64))?,
                _ => return None,
            };
            let value = decimal_from_json(entry.get(1)?)?;
            Some(RawPoint::new(millis.div_euclid(1000), value))
        })
        .collect();

    if points.len() < total {
        debug!(
            "NSE chart payload: skipped {} malformed entries",
            total - points.len()
        );
    }

    points.sort_by_key(|p| p.timestamp);
    points
}

/// Picks the latest close and the one before it from the VIX history.
///
/// Records are ordered by `EOD_TIMESTAMP` when every record carries a
/// parseable date, otherwise feed order is kept. With a single record the
/// upstream previous-close field is used.
pub fn parse_vix_history(payload: VixHistoryPayload) -> Result<VolatilityReading> {
    let mut records = payload.data;
    if records.is_empty() {
        bail!("VIX history is empty");
    }

    if records.iter().all(|r| r.date().is_some()) {
        records.sort_by_key(|r| r.date());
    }

    let closes: Vec<Decimal> = records
        .iter()
        .filter_map(|r| r.close.as_ref().and_then(decimal_from_json))
        .collect();

    let current = *closes.last().context("VIX history has no close values")?;
    let previous_close = match closes.len() {
        0 | 1 => records
            .last()
            .and_then(|r| r.prev_close.as_ref())
            .and_then(decimal_from_json)
            .unwrap_or(current),
        n => closes[n - 2],
    };

    Ok(VolatilityReading::new(current, previous_close))
}
