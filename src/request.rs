//! Typed requests and their wire representation.
//!
//! Each request family has its own struct; [`RequestBody`] tags them with
//! `request_type` when serialized. A [`Request`] pairs a body with the
//! [`ResultSlot`] its caller waits on.

use chrono::NaiveDate;
use serde::ser::SerializeSeq;
use serde::{Serialize, Serializer};
use std::fmt;
use std::sync::Arc;

use crate::batch::ResultSlot;
use crate::result::QueryResult;
use crate::types::{Greek, OptionKind, RequestKind};
use crate::{Error, ErrorContext, Result};

pub(crate) const DATE_FORMAT: &str = "%Y-%m-%d";

/// Wire marker for "every listed expiration".
pub const ALL_EXPIRATIONS: &str = "*";

fn normalize_ticker(ticker: &str) -> Result<String> {
    let ticker = ticker.trim();
    if ticker.is_empty() {
        return Err(Error::validation_with_context(
            "ticker must not be empty",
            ErrorContext::new()
                .with_field_path("request.ticker")
                .with_source("request"),
        ));
    }
    Ok(ticker.to_uppercase())
}

fn serialize_expirations<S>(
    expirations: &Option<Vec<NaiveDate>>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match expirations {
        None => [ALL_EXPIRATIONS].serialize(serializer),
        Some(dates) => {
            let mut seq = serializer.serialize_seq(Some(dates.len()))?;
            for date in dates {
                seq.serialize_element(&date.format(DATE_FORMAT).to_string())?;
            }
            seq.end()
        }
    }
}

/// Exposure surface by strike for one greek.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExposureRequest {
    pub ticker: String,
    pub greek: Greek,
    pub kind: OptionKind,
    /// `None` requests all expirations.
    #[serde(serialize_with = "serialize_expirations")]
    pub expirations: Option<Vec<NaiveDate>>,
}

impl ExposureRequest {
    /// An empty expiration list is treated the same as `None`.
    pub fn new(
        ticker: &str,
        kind: OptionKind,
        greek: Greek,
        expirations: Option<Vec<NaiveDate>>,
    ) -> Result<Self> {
        Ok(Self {
            ticker: normalize_ticker(ticker)?,
            greek,
            kind,
            expirations: expirations.filter(|dates| !dates.is_empty()),
        })
    }

    pub fn for_expiration(
        ticker: &str,
        kind: OptionKind,
        greek: Greek,
        expiration: NaiveDate,
    ) -> Result<Self> {
        Self::new(ticker, kind, greek, Some(vec![expiration]))
    }
}

impl fmt::Display for ExposureRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {} ",
            self.ticker,
            RequestKind::Exposure,
            self.greek,
            self.kind
        )?;
        match &self.expirations {
            None => f.write_str("ALL"),
            Some(dates) => write!(f, "{}", dates.len()),
        }
    }
}

/// Historical series of one greek.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendRequest {
    pub ticker: String,
    pub greek: Greek,
}

impl TrendRequest {
    pub fn new(ticker: &str, greek: Greek) -> Result<Self> {
        Ok(Self {
            ticker: normalize_ticker(ticker)?,
            greek,
        })
    }
}

impl fmt::Display for TrendRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.ticker, RequestKind::Trend, self.greek)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParadigmRequest {
    pub ticker: String,
}

impl ParadigmRequest {
    pub fn new(ticker: &str) -> Result<Self> {
        Ok(Self {
            ticker: normalize_ticker(ticker)?,
        })
    }
}

impl fmt::Display for ParadigmRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.ticker, RequestKind::Paradigm)
    }
}

/// Same-day-expiry aggregates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ZeroDteRequest {
    pub ticker: String,
}

impl ZeroDteRequest {
    pub fn new(ticker: &str) -> Result<Self> {
        Ok(Self {
            ticker: normalize_ticker(ticker)?,
        })
    }
}

impl fmt::Display for ZeroDteRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.ticker, RequestKind::ZeroDte)
    }
}

/// Any request, serialized as `{request_type, ticker, ...}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "request_type")]
pub enum RequestBody {
    #[serde(rename = "exposure_request")]
    Exposure(ExposureRequest),
    #[serde(rename = "trend_request")]
    Trend(TrendRequest),
    #[serde(rename = "paradigm_request")]
    Paradigm(ParadigmRequest),
    #[serde(rename = "zerodte_request")]
    ZeroDte(ZeroDteRequest),
}

impl RequestBody {
    pub fn kind(&self) -> RequestKind {
        match self {
            RequestBody::Exposure(_) => RequestKind::Exposure,
            RequestBody::Trend(_) => RequestKind::Trend,
            RequestBody::Paradigm(_) => RequestKind::Paradigm,
            RequestBody::ZeroDte(_) => RequestKind::ZeroDte,
        }
    }

    pub fn ticker(&self) -> &str {
        match self {
            RequestBody::Exposure(r) => &r.ticker,
            RequestBody::Trend(r) => &r.ticker,
            RequestBody::Paradigm(r) => &r.ticker,
            RequestBody::ZeroDte(r) => &r.ticker,
        }
    }
}

impl fmt::Display for RequestBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestBody::Exposure(r) => fmt::Display::fmt(r, f),
            RequestBody::Trend(r) => fmt::Display::fmt(r, f),
            RequestBody::Paradigm(r) => fmt::Display::fmt(r, f),
            RequestBody::ZeroDte(r) => fmt::Display::fmt(r, f),
        }
    }
}

impl From<ExposureRequest> for RequestBody {
    fn from(r: ExposureRequest) -> Self {
        RequestBody::Exposure(r)
    }
}

impl From<TrendRequest> for RequestBody {
    fn from(r: TrendRequest) -> Self {
        RequestBody::Trend(r)
    }
}

impl From<ParadigmRequest> for RequestBody {
    fn from(r: ParadigmRequest) -> Self {
        RequestBody::Paradigm(r)
    }
}

impl From<ZeroDteRequest> for RequestBody {
    fn from(r: ZeroDteRequest) -> Self {
        RequestBody::ZeroDte(r)
    }
}

/// A request waiting to be sent, together with the slot its result lands in.
///
/// Identity is the slot: there is no request id, replies are matched by position.
#[derive(Debug)]
pub struct Request {
    body: RequestBody,
    slot: Arc<ResultSlot<QueryResult>>,
}

impl Request {
    pub fn new(body: impl Into<RequestBody>) -> Self {
        Self {
            body: body.into(),
            slot: Arc::new(ResultSlot::new()),
        }
    }

    pub fn kind(&self) -> RequestKind {
        self.body.kind()
    }

    pub fn body(&self) -> &RequestBody {
        &self.body
    }

    /// Handle the caller keeps to observe the result after the request is queued.
    pub fn slot(&self) -> Arc<ResultSlot<QueryResult>> {
        Arc::clone(&self.slot)
    }

    pub(crate) fn deliver(&self, result: QueryResult) -> bool {
        self.slot.set(result)
    }
}

/// Envelope for one transmission: the service only accepts `{requests: [...]}`.
#[derive(Debug, Serialize)]
pub struct RequestPackage<'a> {
    requests: Vec<&'a RequestBody>,
}

impl<'a> RequestPackage<'a> {
    pub fn new(bodies: impl IntoIterator<Item = &'a RequestBody>) -> Self {
        Self {
            requests: bodies.into_iter().collect(),
        }
    }

    pub fn from_requests(requests: &'a [Request]) -> Self {
        Self::new(requests.iter().map(Request::body))
    }

    pub fn len(&self) -> usize {
        self.requests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    pub fn to_bytes(&self) -> Result<bytes::Bytes> {
        Ok(bytes::Bytes::from(serde_json::to_vec(self)?))
    }
}
