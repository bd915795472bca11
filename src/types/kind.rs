//! Request kind discriminator.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The four request/response families the service understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RequestKind {
    #[serde(rename = "exposure_request")]
    Exposure,
    #[serde(rename = "trend_request")]
    Trend,
    #[serde(rename = "paradigm_request")]
    Paradigm,
    #[serde(rename = "zerodte_request")]
    ZeroDte,
}

impl RequestKind {
    /// Every kind, in scheduler visiting order.
    pub const ALL: [RequestKind; 4] = [
        RequestKind::Exposure,
        RequestKind::Trend,
        RequestKind::ZeroDte,
        RequestKind::Paradigm,
    ];

    /// The `request_type` tag used on the wire.
    pub fn tag(&self) -> &'static str {
        match self {
            RequestKind::Exposure => "exposure_request",
            RequestKind::Trend => "trend_request",
            RequestKind::Paradigm => "paradigm_request",
            RequestKind::ZeroDte => "zerodte_request",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "exposure_request" => Some(RequestKind::Exposure),
            "trend_request" => Some(RequestKind::Trend),
            "paradigm_request" => Some(RequestKind::Paradigm),
            "zerodte_request" => Some(RequestKind::ZeroDte),
            _ => None,
        }
    }
}

impl fmt::Display for RequestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}
