//! `format` keyword checkers (§4.7): stateless predicates selected by name
//! at build time. Unknown format names are silently accepted per draft-07 —
//! `format` is an annotation keyword unless the implementation chooses to
//! assert it, which this crate does for the names below.

use chrono::{DateTime, NaiveDate};
use fancy_regex::Regex;
use lazy_static::lazy_static;
use std::net::IpAddr;
use std::str::FromStr;

lazy_static! {
    static ref TIME_RE: Regex = Regex::new(
        r"^([01][0-9]|2[0-3]):([0-5][0-9]):([0-5][0-9])(\.[0-9]+)?(?:[Zz]|[+-]([01][0-9]|2[0-3]):[0-5][0-9])$"
    )
    .expect("TIME_RE is a valid regex");
}

/// The recognized draft-07 `format` names this validator asserts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    DateTime,
    Date,
    Time,
    Email,
    Hostname,
    Ipv4,
    Ipv6,
    Regex,
}

impl Format {
    /// Looks up a `format` name. Returns `None` for unrecognized names,
    /// which `StringNode` treats as "accept silently" per draft-07.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "date-time" => Some(Self::DateTime),
            "date" => Some(Self::Date),
            "time" => Some(Self::Time),
            "email" => Some(Self::Email),
            "hostname" => Some(Self::Hostname),
            "ipv4" => Some(Self::Ipv4),
            "ipv6" => Some(Self::Ipv6),
            "regex" => Some(Self::Regex),
            _ => None,
        }
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::DateTime => "date-time",
            Self::Date => "date",
            Self::Time => "time",
            Self::Email => "email",
            Self::Hostname => "hostname",
            Self::Ipv4 => "ipv4",
            Self::Ipv6 => "ipv6",
            Self::Regex => "regex",
        }
    }

    #[must_use]
    pub fn check(self, value: &str) -> bool {
        match self {
            Self::DateTime => DateTime::parse_from_rfc3339(value).is_ok(),
            Self::Date => NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok(),
            Self::Time => TIME_RE.is_match(value).unwrap_or(false),
            Self::Email => is_valid_email(value),
            Self::Hostname => is_valid_hostname(value),
            Self::Ipv4 => matches!(IpAddr::from_str(value), Ok(IpAddr::V4(_))),
            Self::Ipv6 => matches!(IpAddr::from_str(value), Ok(IpAddr::V6(_))),
            Self::Regex => Regex::new(value).is_ok(),
        }
    }
}

fn is_valid_email(value: &str) -> bool {
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    !local.is_empty() && !domain.is_empty() && !domain.contains('@') && is_valid_hostname(domain)
}

fn is_valid_hostname(value: &str) -> bool {
    !(value.is_empty()
        || value.chars().count() > 255
        || value.starts_with('-')
        || value.ends_with('-')
        || value.starts_with('.')
        || value.ends_with('.')
        || value
            .chars()
            .any(|c| !(c.is_ascii_alphanumeric() || c == '-' || c == '.'))
        || value.split('.').any(|label| label.is_empty() || label.chars().count() > 63))
}
