//! Kline Query Module
//! Builds the status-coded payload envelope for one security out of the
//! loaded kline table: filter, sort, convert, wrap. Internal failures
//! never escape; they become a code-500 envelope.

use crate::data::payload::{KlinePayload, KlineRecord};
use chrono::NaiveDate;
use polars::prelude::*;
use thiserror::Error;

/// Rows before this trading day are not served.
const START_DATE: &str = "2022-01-01";

/// Kline dates are exchange-local (UTC+8) calendar days; the wire
/// timestamp is the UTC epoch ms of that local midnight.
const EXCHANGE_UTC_OFFSET_MS: i64 = 8 * 3600 * 1000;

#[derive(Error, Debug)]
pub enum QueryError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
    #[error("Unparseable trading day: {0}")]
    BadDate(String),
}

/// Stateless query service over the loaded kline table.
pub struct KlineQuery;

impl KlineQuery {
    /// Fetch the series for `code` as a payload envelope: 200 with the
    /// ordered records, 204 when nothing matches, 500 on internal errors.
    pub fn fetch(df: &DataFrame, code: &str) -> KlinePayload {
        match Self::build_series(df, code) {
            Ok(records) if records.is_empty() => KlinePayload::no_data(),
            Ok(records) => KlinePayload::success(code, records),
            Err(e) => {
                log::warn!("kline query for {code} failed: {e}");
                KlinePayload::failure(e.to_string())
            }
        }
    }

    fn build_series(df: &DataFrame, code: &str) -> Result<Vec<KlineRecord>, QueryError> {
        let frame = df
            .clone()
            .lazy()
            .with_columns([
                col("stock_code").cast(DataType::String),
                col("date").cast(DataType::String),
            ])
            .filter(
                col("stock_code")
                    .eq(lit(code))
                    .and(col("date").gt_eq(lit(START_DATE))),
            )
            .sort(["date"], Default::default())
            .collect()?;

        let height = frame.height();
        if height == 0 {
            return Ok(Vec::new());
        }

        let dates = frame.column("date")?.str()?.clone();
        let open = Self::numeric_column(&frame, "open");
        let high = Self::numeric_column(&frame, "high");
        let low = Self::numeric_column(&frame, "low");
        let close = Self::numeric_column(&frame, "close");
        let volume = Self::numeric_column(&frame, "volume");
        // the export calls turnover "amount"
        let turnover = if frame.column("amount").is_ok() {
            Self::numeric_column(&frame, "amount")
        } else {
            Self::numeric_column(&frame, "turnover")
        };

        let mut records = Vec::with_capacity(height);
        for i in 0..height {
            let day = dates.get(i).unwrap_or("");
            let timestamp = Self::day_to_timestamp_ms(day)
                .ok_or_else(|| QueryError::BadDate(day.to_string()))?;
            records.push(KlineRecord {
                timestamp,
                open: open[i],
                high: high[i],
                low: low[i],
                close: close[i],
                volume: volume[i],
                turnover: turnover[i],
            });
        }
        Ok(records)
    }

    /// Column as f64 values, zero-filled when absent or null.
    fn numeric_column(frame: &DataFrame, name: &str) -> Vec<f64> {
        frame
            .column(name)
            .and_then(|col| col.cast(&DataType::Float64))
            .and_then(|cast| {
                Ok(cast
                    .f64()?
                    .into_iter()
                    .map(|v| v.unwrap_or(0.0))
                    .collect::<Vec<f64>>())
            })
            .unwrap_or_else(|_| vec![0.0; frame.height()])
    }

    fn day_to_timestamp_ms(day: &str) -> Option<i64> {
        let date = NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()?;
        let midnight = date.and_hms_opt(0, 0, 0)?;
        Some(midnight.and_utc().timestamp_millis() - EXCHANGE_UTC_OFFSET_MS)
    }
}
