//! Greek, option side, and paradigm labels.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::{Error, ErrorContext};

/// Option greek used by exposure and trend queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Greek {
    Delta,
    Gamma,
    Charm,
    Vanna,
    Vega,
    Theta,
}

impl Greek {
    pub fn as_str(&self) -> &'static str {
        match self {
            Greek::Delta => "delta",
            Greek::Gamma => "gamma",
            Greek::Charm => "charm",
            Greek::Vanna => "vanna",
            Greek::Vega => "vega",
            Greek::Theta => "theta",
        }
    }
}

impl FromStr for Greek {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "delta" => Ok(Greek::Delta),
            "gamma" => Ok(Greek::Gamma),
            "charm" => Ok(Greek::Charm),
            "vanna" => Ok(Greek::Vanna),
            "vega" => Ok(Greek::Vega),
            "theta" => Ok(Greek::Theta),
            other => Err(Error::validation_with_context(
                format!("unknown greek {:?}", other),
                ErrorContext::new().with_field_path("greek"),
            )),
        }
    }
}

impl fmt::Display for Greek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which side of the chain an exposure covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionKind {
    Put,
    Both,
    Call,
}

impl OptionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OptionKind::Put => "put",
            OptionKind::Both => "both",
            OptionKind::Call => "call",
        }
    }
}

impl FromStr for OptionKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "put" => Ok(OptionKind::Put),
            "both" => Ok(OptionKind::Both),
            "call" => Ok(OptionKind::Call),
            other => Err(Error::validation_with_context(
                format!("unknown option kind {:?}", other),
                ErrorContext::new().with_field_path("kind"),
            )),
        }
    }
}

impl fmt::Display for OptionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Market-structure classification returned by paradigm queries.
///
/// Labels the service sends that are not listed here decode to [`Paradigm::None`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Paradigm {
    #[default]
    None,
    GexPure,
    GexTarget,
    SidialMessy,
}

impl Paradigm {
    /// Wire label, `None` has no label.
    pub fn label(&self) -> Option<&'static str> {
        match self {
            Paradigm::None => None,
            Paradigm::GexPure => Some("GEX-PURE"),
            Paradigm::GexTarget => Some("GEX-TARGET"),
            Paradigm::SidialMessy => Some("SIDIAL-MESSY"),
        }
    }

    pub fn from_label(label: &str) -> Self {
        match label {
            "GEX-PURE" => Paradigm::GexPure,
            "GEX-TARGET" => Paradigm::GexTarget,
            "SIDIAL-MESSY" => Paradigm::SidialMessy,
            _ => Paradigm::None,
        }
    }
}

impl Serialize for Paradigm {
    fn serialize<S: serde::Serializer>(&self, s: S) -> std::result::Result<S::Ok, S::Error> {
        s.serialize_str(self.label().unwrap_or("None"))
    }
}

impl fmt::Display for Paradigm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label().unwrap_or("None"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_greek_parse() {
        assert_eq!("vanna".parse::<Greek>().unwrap(), Greek::Vanna);
        assert!("Vanna".parse::<Greek>().is_err());
        assert_eq!(serde_json::to_string(&Greek::Charm).unwrap(), "\"charm\"");
    }

    #[test]
    fn test_option_kind_parse() {
        assert_eq!("call".parse::<OptionKind>().unwrap(), OptionKind::Call);
        assert_eq!("both".parse::<OptionKind>().unwrap(), OptionKind::Both);
        assert!("calls".parse::<OptionKind>().is_err());
    }

    #[test]
    fn test_paradigm_labels() {
        assert_eq!(Paradigm::from_label("GEX-PURE"), Paradigm::GexPure);
        assert_eq!(Paradigm::from_label("SIDIAL-MESSY"), Paradigm::SidialMessy);
        assert_eq!(Paradigm::from_label("BOFA-SOMETHING"), Paradigm::None);
        assert_eq!(Paradigm::GexTarget.to_string(), "GEX-TARGET");
        assert_eq!(Paradigm::None.label(), None);
    }
}
