//! Wire responses.
//!
//! Reply nodes are decoded leniently: every field is optional here and the
//! checks for required fields happen when a response is turned into a
//! [`crate::result::QueryResult`]. Numeric arrays may arrive as a bare number
//! and strikes may arrive as strings; both are normalized while decoding.

use chrono::{NaiveDate, NaiveDateTime};
use serde::de::{self, Deserializer};
use serde::Deserialize;
use serde_json::Value;

use crate::types::RequestKind;
use crate::{Error, Result};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Conversion failure for a single reply node.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{0}")]
pub struct DecodeError(pub String);

impl DecodeError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    pub(crate) fn at(self, index: usize) -> Error {
        Error::ItemDecode {
            index,
            message: self.0,
        }
    }
}

/// Parse `yyyy-MM-dd`, tolerating a trailing `HH:mm:ss`.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, crate::request::DATE_FORMAT)
        .ok()
        .or_else(|| parse_timestamp(raw).map(|ts| ts.date()))
}

/// Parse `yyyy-MM-dd HH:mm:ss`; a bare date is read as midnight.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT)
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(raw, crate::request::DATE_FORMAT)
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberLike {
    Number(f64),
    Text(String),
}

impl NumberLike {
    fn to_f64(&self) -> std::result::Result<f64, String> {
        match self {
            NumberLike::Number(n) => Ok(*n),
            NumberLike::Text(s) => s
                .trim()
                .parse::<f64>()
                .map_err(|_| format!("expected a number, found {:?}", s)),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(NumberLike),
    Many(Vec<NumberLike>),
}

/// Accepts `42.0`, `"42"`, `[42.0, "43"]` or `null`.
fn one_or_many<'de, D>(deserializer: D) -> std::result::Result<Option<Vec<f64>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<OneOrMany>::deserialize(deserializer)?;
    raw.map(|value| match value {
        OneOrMany::One(n) => n.to_f64().map(|v| vec![v]),
        OneOrMany::Many(items) => items.iter().map(NumberLike::to_f64).collect(),
    })
    .transpose()
    .map_err(de::Error::custom)
}

/// Integer counters occasionally come through as whole floats.
fn lenient_i64<'de, D>(deserializer: D) -> std::result::Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<f64>::deserialize(deserializer)? {
        None => Ok(None),
        Some(v) if v.is_finite() && v.fract() == 0.0 => Ok(Some(v as i64)),
        Some(v) => Err(de::Error::custom(format!("expected an integer, found {}", v))),
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExposureData {
    #[serde(default, deserialize_with = "one_or_many")]
    pub strikes: Option<Vec<f64>>,
    #[serde(default, deserialize_with = "one_or_many")]
    pub exposures: Option<Vec<f64>>,
    #[serde(rename = "currentPrice")]
    pub current_price: Option<f64>,
    #[serde(rename = "lastModified")]
    pub last_modified: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExposureResponse {
    pub ticker: Option<String>,
    pub greek: Option<String>,
    pub kind: Option<String>,
    pub expirations: Option<Vec<String>>,
    pub data: Option<ExposureData>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TrendDataPoint {
    pub x: Option<String>,
    pub y: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TrendData {
    pub trend: Option<Vec<TrendDataPoint>>,
    #[serde(rename = "lastModified")]
    pub last_modified: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TrendResponse {
    pub ticker: Option<String>,
    pub greek: Option<String>,
    pub data: Option<TrendData>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ParadigmData {
    pub paradigm: Option<String>,
    pub target: Option<f64>,
    #[serde(default, deserialize_with = "one_or_many")]
    pub lis: Option<Vec<f64>>,
    #[serde(rename = "lastModified")]
    pub last_modified: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ParadigmResponse {
    pub ticker: Option<String>,
    pub data: Option<ParadigmData>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ZeroDteData {
    pub dealer_premium: Option<f64>,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub option_volume: Option<i64>,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub zerodte_agg_charm: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ZeroDteResponse {
    pub ticker: Option<String>,
    pub data: Option<ZeroDteData>,
}

/// A decoded reply node, discriminated by its own `request_type` tag.
#[derive(Debug, Clone)]
pub enum Response {
    Exposure(ExposureResponse),
    Trend(TrendResponse),
    Paradigm(ParadigmResponse),
    ZeroDte(ZeroDteResponse),
}

impl Response {
    pub fn kind(&self) -> RequestKind {
        match self {
            Response::Exposure(_) => RequestKind::Exposure,
            Response::Trend(_) => RequestKind::Trend,
            Response::Paradigm(_) => RequestKind::Paradigm,
            Response::ZeroDte(_) => RequestKind::ZeroDte,
        }
    }

    /// Decode reply node `index`.
    ///
    /// Errors are item-level: [`Error::UnknownResponseKind`] for a tag outside the
    /// four known kinds, [`Error::ItemDecode`] for anything else.
    pub fn decode(index: usize, node: &Value) -> Result<Self> {
        let tag = match node.get("request_type") {
            Some(Value::String(tag)) => tag.as_str(),
            Some(other) => {
                return Err(DecodeError::new(format!(
                    "request_type must be a string, found {}",
                    other
                ))
                .at(index))
            }
            None => return Err(DecodeError::new("missing request_type").at(index)),
        };

        let kind = RequestKind::from_tag(tag).ok_or_else(|| Error::UnknownResponseKind {
            index,
            tag: tag.to_string(),
        })?;

        let decoded = match kind {
            RequestKind::Exposure => ExposureResponse::deserialize(node).map(Response::Exposure),
            RequestKind::Trend => TrendResponse::deserialize(node).map(Response::Trend),
            RequestKind::Paradigm => ParadigmResponse::deserialize(node).map(Response::Paradigm),
            RequestKind::ZeroDte => ZeroDteResponse::deserialize(node).map(Response::ZeroDte),
        };
        decoded.map_err(|e| DecodeError::new(e.to_string()).at(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_bare_number_normalized_to_array() {
        let data: ExposureData = serde_json::from_value(json!({"exposures": 42.0})).unwrap();
        assert_eq!(data.exposures, Some(vec![42.0]));

        let data: ParadigmData = serde_json::from_value(json!({"lis": [4100.0, 4150.5]})).unwrap();
        assert_eq!(data.lis, Some(vec![4100.0, 4150.5]));

        let data: ParadigmData = serde_json::from_value(json!({"lis": null})).unwrap();
        assert_eq!(data.lis, None);
    }

    #[test]
    fn test_strikes_as_strings() {
        let data: ExposureData =
            serde_json::from_value(json!({"strikes": ["100", "105.5"], "currentPrice": 101.0}))
                .unwrap();
        assert_eq!(data.strikes, Some(vec![100.0, 105.5]));
        assert_eq!(data.current_price, Some(101.0));
    }

    #[test]
    fn test_non_numeric_strike_fails() {
        let res = serde_json::from_value::<ExposureData>(json!({"strikes": ["abc"]}));
        assert!(res.is_err());
    }

    #[test]
    fn test_lenient_integer_fields() {
        let data: ZeroDteData = serde_json::from_value(
            json!({"dealer_premium": -1.5e6, "option_volume": 120000.0, "zerodte_agg_charm": -42}),
        )
        .unwrap();
        assert_eq!(data.option_volume, Some(120000));
        assert_eq!(data.zerodte_agg_charm, Some(-42));
        assert!(serde_json::from_value::<ZeroDteData>(json!({"option_volume": 1.5})).is_err());
    }

    #[test]
    fn test_date_formats() {
        let d = parse_date("2024-06-21").unwrap();
        assert_eq!(d, NaiveDate::from_ymd_opt(2024, 6, 21).unwrap());
        assert_eq!(parse_date("2024-06-21 15:59:00"), Some(d));
        assert!(parse_date("06/21/2024").is_none());

        let ts = parse_timestamp("2024-06-21 15:59:00").unwrap();
        assert_eq!(ts.date(), d);
        assert_eq!(
            parse_timestamp("2024-06-21"),
            d.and_hms_opt(0, 0, 0)
        );
    }

    #[test]
    fn test_decode_dispatches_on_tag() {
        let node = json!({"request_type": "zerodte_request", "ticker": "SPX", "data": {}});
        let response = Response::decode(0, &node).unwrap();
        assert_eq!(response.kind(), RequestKind::ZeroDte);
    }

    #[test]
    fn test_decode_unknown_and_missing_tags() {
        let unknown = json!({"request_type": "volatility_request"});
        assert!(matches!(
            Response::decode(3, &unknown),
            Err(Error::UnknownResponseKind { index: 3, .. })
        ));

        let missing = json!({"ticker": "SPY"});
        assert!(matches!(
            Response::decode(1, &missing),
            Err(Error::ItemDecode { index: 1, .. })
        ));

        let not_object = json!("oops");
        assert!(matches!(
            Response::decode(0, &not_object),
            Err(Error::ItemDecode { .. })
        ));
    }

    #[test]
    fn test_decode_bad_field_type_is_item_error() {
        let node = json!({"request_type": "trend_request", "data": {"trend": "nope"}});
        assert!(matches!(
            Response::decode(2, &node),
            Err(Error::ItemDecode { index: 2, .. })
        ));
    }
}
