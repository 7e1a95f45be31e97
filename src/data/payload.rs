//! Kline Payload Module
//! Response envelope produced by the query service and consumed by the
//! render dispatcher.

use serde::{Deserialize, Serialize};

/// Query succeeded, records attached.
pub const CODE_OK: u16 = 200;
/// Query ran but matched nothing.
pub const CODE_NO_DATA: u16 = 204;
/// Internal failure while building the series.
pub const CODE_ERROR: u16 = 500;

/// One kline period: daily OHLCV plus turnover, timestamp in epoch ms.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KlineRecord {
    pub timestamp: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
    pub turnover: f64,
}

/// Time-ordered series for one security.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KlineSeries {
    pub contract: String,
    #[serde(rename = "df")]
    pub records: Vec<KlineRecord>,
}

/// Classified payload status. Anything that is not success or no-data is
/// absorbed by the dispatcher without touching the chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadStatus {
    Success,
    NoData,
    Other,
}

/// Response envelope: `{code, msg, data: {contract, df}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KlinePayload {
    pub code: u16,
    pub msg: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub data: Option<KlineSeries>,
}

impl KlinePayload {
    /// Successful envelope with an ordered record series.
    pub fn success(contract: &str, records: Vec<KlineRecord>) -> Self {
        Self {
            code: CODE_OK,
            msg: "success".to_string(),
            data: Some(KlineSeries {
                contract: contract.to_string(),
                records,
            }),
        }
    }

    /// Empty-result envelope. Carries no data.
    pub fn no_data() -> Self {
        Self {
            code: CODE_NO_DATA,
            msg: "data not found".to_string(),
            data: None,
        }
    }

    /// Internal-failure envelope with the error text in `msg`.
    pub fn failure(msg: impl Into<String>) -> Self {
        Self {
            code: CODE_ERROR,
            msg: msg.into(),
            data: None,
        }
    }

    pub fn status(&self) -> PayloadStatus {
        match self.code {
            CODE_OK => PayloadStatus::Success,
            CODE_NO_DATA => PayloadStatus::NoData,
            _ => PayloadStatus::Other,
        }
    }

    /// Record series, if this is a success envelope that actually carries one.
    pub fn records(&self) -> Option<&[KlineRecord]> {
        self.data.as_ref().map(|series| series.records.as_slice())
    }
}
