//! User-facing results.
//!
//! A result is only built once every required field is present and parsed,
//! so callers never see half-filled data. Echo fields the service omits
//! (ticker, greek, kind, expirations) are taken from the originating request.

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;
use std::fmt;

use crate::request::{RequestBody, ALL_EXPIRATIONS};
use crate::response::{
    parse_date, parse_timestamp, DecodeError, ExposureResponse, ParadigmResponse, Response,
    TrendDataPoint, TrendResponse, ZeroDteResponse,
};
use crate::types::{Greek, OptionKind, Paradigm, RequestKind};

type Conversion<T> = std::result::Result<T, DecodeError>;

/// Exposure at a single strike.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ExposurePoint {
    pub strike: f64,
    pub exposure: f64,
}

impl ExposurePoint {
    pub fn new(strike: f64, exposure: f64) -> Self {
        Self { strike, exposure }
    }

    /// Sum two points at the same strike; `None` when the strikes differ.
    pub fn checked_add(&self, other: &ExposurePoint) -> Option<ExposurePoint> {
        if self.strike != other.strike {
            return None;
        }
        Some(ExposurePoint::new(self.strike, self.exposure + other.exposure))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExposureResult {
    pub ticker: String,
    pub greek: Greek,
    pub kind: OptionKind,
    pub spot_price: f64,
    pub last_updated: Option<NaiveDateTime>,
    /// Empty when all expirations were requested.
    pub expirations: Vec<NaiveDate>,
    pub exposures: Vec<ExposurePoint>,
}

impl ExposureResult {
    /// `"All Expiries"`, a single date, or `"first to last"`.
    pub fn expiration_range(&self) -> String {
        let min = self.expirations.iter().min();
        let max = self.expirations.iter().max();
        match (min, max) {
            (Some(a), Some(b)) if a == b => a.to_string(),
            (Some(a), Some(b)) => format!("{} to {}", a, b),
            _ => "All Expiries".to_string(),
        }
    }
}

impl fmt::Display for ExposureResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} Exp {}",
            self.ticker,
            self.kind,
            self.greek,
            self.expiration_range()
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrendPoint {
    pub date: NaiveDate,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendResult {
    pub ticker: String,
    pub greek: Greek,
    pub points: Vec<TrendPoint>,
    pub last_modified: Option<NaiveDateTime>,
}

impl fmt::Display for TrendResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} trend ({} points)",
            self.ticker,
            self.greek,
            self.points.len()
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParadigmResult {
    pub ticker: String,
    pub paradigm: Paradigm,
    pub target: Option<f64>,
    /// Line-in-the-sand support levels.
    pub lis: Option<Vec<f64>>,
    pub last_updated: NaiveDateTime,
}

impl fmt::Display for ParadigmResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} @ {}", self.ticker, self.paradigm, self.last_updated)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ZeroDteResult {
    pub ticker: String,
    pub dealer_premium: Option<f64>,
    pub option_volume: Option<i64>,
    pub aggregate_charm: Option<i64>,
}

impl fmt::Display for ZeroDteResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} 0DTE", self.ticker)
    }
}

/// Result of any request kind.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "request_type")]
pub enum QueryResult {
    #[serde(rename = "exposure_request")]
    Exposure(ExposureResult),
    #[serde(rename = "trend_request")]
    Trend(TrendResult),
    #[serde(rename = "paradigm_request")]
    Paradigm(ParadigmResult),
    #[serde(rename = "zerodte_request")]
    ZeroDte(ZeroDteResult),
}

impl QueryResult {
    pub fn kind(&self) -> RequestKind {
        match self {
            QueryResult::Exposure(_) => RequestKind::Exposure,
            QueryResult::Trend(_) => RequestKind::Trend,
            QueryResult::Paradigm(_) => RequestKind::Paradigm,
            QueryResult::ZeroDte(_) => RequestKind::ZeroDte,
        }
    }

    pub fn ticker(&self) -> &str {
        match self {
            QueryResult::Exposure(r) => &r.ticker,
            QueryResult::Trend(r) => &r.ticker,
            QueryResult::Paradigm(r) => &r.ticker,
            QueryResult::ZeroDte(r) => &r.ticker,
        }
    }

    pub fn into_exposure(self) -> Option<ExposureResult> {
        match self {
            QueryResult::Exposure(r) => Some(r),
            _ => None,
        }
    }

    pub fn into_trend(self) -> Option<TrendResult> {
        match self {
            QueryResult::Trend(r) => Some(r),
            _ => None,
        }
    }

    pub fn into_paradigm(self) -> Option<ParadigmResult> {
        match self {
            QueryResult::Paradigm(r) => Some(r),
            _ => None,
        }
    }

    pub fn into_zero_dte(self) -> Option<ZeroDteResult> {
        match self {
            QueryResult::ZeroDte(r) => Some(r),
            _ => None,
        }
    }
}

impl fmt::Display for QueryResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryResult::Exposure(r) => fmt::Display::fmt(r, f),
            QueryResult::Trend(r) => fmt::Display::fmt(r, f),
            QueryResult::Paradigm(r) => fmt::Display::fmt(r, f),
            QueryResult::ZeroDte(r) => fmt::Display::fmt(r, f),
        }
    }
}

fn required<T>(value: Option<T>, field: &str) -> Conversion<T> {
    value.ok_or_else(|| DecodeError::new(format!("missing required field {}", field)))
}

fn parse_field<T: std::str::FromStr>(raw: &str, field: &str) -> Conversion<T> {
    raw.parse::<T>()
        .map_err(|_| DecodeError::new(format!("invalid {} {:?}", field, raw)))
}

fn required_timestamp(raw: &str, field: &str) -> Conversion<NaiveDateTime> {
    parse_timestamp(raw).ok_or_else(|| DecodeError::new(format!("invalid {} {:?}", field, raw)))
}

fn optional_timestamp(raw: Option<&str>, field: &str) -> Conversion<Option<NaiveDateTime>> {
    raw.map(|s| required_timestamp(s, field)).transpose()
}

impl Response {
    /// Convert into a [`QueryResult`], validating against the request it answers.
    ///
    /// The reply's own tag decides the conversion; it must agree with `origin`.
    pub fn into_result(self, origin: &RequestBody) -> Conversion<QueryResult> {
        if self.kind() != origin.kind() {
            return Err(DecodeError::new(format!(
                "reply is a {} but the request at this position is a {}",
                self.kind(),
                origin.kind()
            )));
        }
        match (self, origin) {
            (Response::Exposure(r), RequestBody::Exposure(o)) => {
                exposure_result(r, o.greek, o.kind, o.expirations.as_deref(), &o.ticker)
                    .map(QueryResult::Exposure)
            }
            (Response::Trend(r), RequestBody::Trend(o)) => {
                trend_result(r, o.greek, &o.ticker).map(QueryResult::Trend)
            }
            (Response::Paradigm(r), _) => {
                paradigm_result(r, origin.ticker()).map(QueryResult::Paradigm)
            }
            (Response::ZeroDte(r), _) => zero_dte_result(r, origin.ticker()).map(QueryResult::ZeroDte),
            _ => Err(DecodeError::new("reply kind does not match request kind")),
        }
    }
}

fn exposure_result(
    response: ExposureResponse,
    greek: Greek,
    kind: OptionKind,
    requested: Option<&[NaiveDate]>,
    ticker: &str,
) -> Conversion<ExposureResult> {
    let data = required(response.data, "data")?;
    let spot_price = required(data.current_price, "data.currentPrice")?;
    let strikes = required(data.strikes, "data.strikes")?;
    let exposures = required(data.exposures, "data.exposures")?;
    if strikes.len() != exposures.len() {
        return Err(DecodeError::new(format!(
            "exposure arrays are not equal lengths: {} strikes, {} exposures",
            strikes.len(),
            exposures.len()
        )));
    }

    let greek = match response.greek.as_deref() {
        Some(raw) => parse_field::<Greek>(raw, "greek")?,
        None => greek,
    };
    let kind = match response.kind.as_deref() {
        Some(raw) => parse_field::<OptionKind>(raw, "kind")?,
        None => kind,
    };

    let expirations = match response.expirations {
        Some(raw) => {
            let mut dates = Vec::with_capacity(raw.len());
            for item in raw.iter().map(|s| s.trim()) {
                if item == ALL_EXPIRATIONS {
                    break;
                }
                let date = parse_date(item)
                    .ok_or_else(|| DecodeError::new(format!("invalid expiration {:?}", item)))?;
                dates.push(date);
            }
            dates
        }
        None => requested.map(<[NaiveDate]>::to_vec).unwrap_or_default(),
    };

    Ok(ExposureResult {
        ticker: response.ticker.unwrap_or_else(|| ticker.to_string()),
        greek,
        kind,
        spot_price,
        last_updated: optional_timestamp(data.last_modified.as_deref(), "data.lastModified")?,
        expirations,
        exposures: strikes
            .into_iter()
            .zip(exposures)
            .map(|(strike, exposure)| ExposurePoint::new(strike, exposure))
            .collect(),
    })
}

fn trend_point(point: TrendDataPoint) -> Conversion<TrendPoint> {
    let x = required(point.x, "trend.x")?;
    let value = required(point.y, "trend.y")?;
    let date = parse_date(&x).ok_or_else(|| DecodeError::new(format!("invalid trend date {:?}", x)))?;
    Ok(TrendPoint { date, value })
}

fn trend_result(response: TrendResponse, greek: Greek, ticker: &str) -> Conversion<TrendResult> {
    let data = required(response.data, "data")?;
    let trend = required(data.trend, "data.trend")?;
    let greek = match response.greek.as_deref() {
        Some(raw) => parse_field::<Greek>(raw, "greek")?,
        None => greek,
    };
    Ok(TrendResult {
        ticker: response.ticker.unwrap_or_else(|| ticker.to_string()),
        greek,
        points: trend
            .into_iter()
            .map(trend_point)
            .collect::<Conversion<Vec<_>>>()?,
        last_modified: optional_timestamp(data.last_modified.as_deref(), "data.lastModified")?,
    })
}

fn paradigm_result(response: ParadigmResponse, ticker: &str) -> Conversion<ParadigmResult> {
    let data = required(response.data, "data")?;
    let label = required(data.paradigm, "data.paradigm")?;
    let last_modified = required(data.last_modified, "data.lastModified")?;
    let paradigm = Paradigm::from_label(&label);
    if paradigm == Paradigm::None {
        tracing::debug!(label = %label, "unrecognized paradigm label");
    }
    Ok(ParadigmResult {
        ticker: response.ticker.unwrap_or_else(|| ticker.to_string()),
        paradigm,
        target: data.target,
        lis: data.lis,
        last_updated: required_timestamp(&last_modified, "data.lastModified")?,
    })
}

fn zero_dte_result(response: ZeroDteResponse, ticker: &str) -> Conversion<ZeroDteResult> {
    let data = required(response.data, "data")?;
    Ok(ZeroDteResult {
        ticker: response.ticker.unwrap_or_else(|| ticker.to_string()),
        dealer_premium: data.dealer_premium,
        option_volume: data.option_volume,
        aggregate_charm: data.zerodte_agg_charm,
    })
}
