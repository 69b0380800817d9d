//! Response DTOs for the scraper API.
//!
//! # Design
//! These types mirror the mock-server's schema but are defined independently;
//! integration tests catch drift between the two crates. Fields the client
//! does not interpret are kept verbatim in flattened `extra` maps so callers
//! still see everything the server sent.

use std::fmt;
use std::str::FromStr;

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};
use thiserror::Error;

/// Body of `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HealthStatus {
    pub status: String,
    pub version: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One entry of the `supported_sites` listing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SiteDescriptor {
    pub name: String,
    pub identifier: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Body of `GET /sites`. Order is whatever the server returned.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SitesResponse {
    pub supported_sites: Vec<SiteDescriptor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
}

/// Body of a successful `GET /scrape`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    pub name: String,
    pub current_price: Price,
    #[serde(default)]
    pub brand: Option<String>,
    pub scraped_at: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Body of a failed `GET /scrape`, decoded best-effort.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// `current_price` as sent by the server.
///
/// JSON numbers and price texts such as `"1 299.99 ₼"`, `"1299.99₼"` or
/// `"2 049,99 AZN"` decode to `Amount`. Anything that is not exactly one
/// number once currency markers and grouping spaces are removed is kept
/// verbatim as `Unparsed`, so the rest of the product still decodes.
#[derive(Debug, Clone, PartialEq)]
pub enum Price {
    Amount(f64),
    Unparsed(String),
}

impl Price {
    pub fn amount(&self) -> Option<f64> {
        match self {
            Price::Amount(amount) => Some(*amount),
            Price::Unparsed(_) => None,
        }
    }

    pub fn from_text(text: &str) -> Self {
        parse_price_text(text)
            .map(Price::Amount)
            .unwrap_or_else(|| Price::Unparsed(text.to_string()))
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Price::Amount(amount) => write!(f, "{amount}"),
            Price::Unparsed(raw) => f.write_str(raw),
        }
    }
}

impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Price::Amount(amount) => serializer.serialize_f64(*amount),
            Price::Unparsed(raw) => serializer.serialize_str(raw),
        }
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct PriceVisitor;

        impl Visitor<'_> for PriceVisitor {
            type Value = Price;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a number, a price string or null")
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<Price, E> {
                Ok(Price::Amount(v))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Price, E> {
                Ok(Price::Amount(v as f64))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Price, E> {
                Ok(Price::Amount(v as f64))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Price, E> {
                Ok(Price::from_text(v))
            }

            fn visit_unit<E: de::Error>(self) -> Result<Price, E> {
                Ok(Price::Unparsed(String::new()))
            }

            fn visit_none<E: de::Error>(self) -> Result<Price, E> {
                self.visit_unit()
            }
        }

        deserializer.deserialize_any(PriceVisitor)
    }
}

/// `₼` may sit on either side of the number, `AZN` in any case likewise.
fn strip_currency(text: &str) -> &str {
    let text = text.trim_matches('₼');
    let text = match text.len().checked_sub(3).and_then(|i| Some((i, text.get(i..)?))) {
        Some((i, tail)) if tail.eq_ignore_ascii_case("azn") => &text[..i],
        _ => text,
    };
    let text = match text.get(..3) {
        Some(head) if head.eq_ignore_ascii_case("azn") => &text[3..],
        _ => text,
    };
    text.trim_matches('₼')
}

/// A lone comma is the decimal separator; commas next to a dot, or
/// repeated, group thousands.
fn parse_price_text(text: &str) -> Option<f64> {
    let compact: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    let number = strip_currency(&compact);

    let commas = number.matches(',').count();
    let normalized = if commas == 1 && !number.contains('.') {
        number.replace(',', ".")
    } else {
        number.replace(',', "")
    };

    let starts_with_digit = normalized.starts_with(|c: char| c.is_ascii_digit());
    let only_digits_and_dot = normalized.chars().all(|c| c.is_ascii_digit() || c == '.');
    if !starts_with_digit || !only_digits_and_dot || normalized.matches('.').count() > 1 {
        return None;
    }
    normalized.parse::<f64>().ok().filter(|amount| amount.is_finite())
}

/// Sites the reference server is known to support.
///
/// Not used by the client operations themselves, which pass identifiers
/// through unchecked; callers can validate input with it before paying for
/// a round-trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KnownSite {
    Kontakt,
    Irshad,
}

impl KnownSite {
    pub const ALL: [KnownSite; 2] = [KnownSite::Kontakt, KnownSite::Irshad];

    pub fn identifier(self) -> &'static str {
        match self {
            KnownSite::Kontakt => "kontakt",
            KnownSite::Irshad => "irshad",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            KnownSite::Kontakt => "Kontakt.az",
            KnownSite::Irshad => "Irshad.az",
        }
    }

    pub fn home_url(self) -> &'static str {
        match self {
            KnownSite::Kontakt => "https://kontakt.az",
            KnownSite::Irshad => "https://irshad.az",
        }
    }

    fn domain(self) -> &'static str {
        match self {
            KnownSite::Kontakt => "kontakt.az",
            KnownSite::Irshad => "irshad.az",
        }
    }

    /// Whether `uri` points at this site's domain (case-insensitive).
    pub fn accepts_url(self, uri: &str) -> bool {
        uri.to_lowercase().contains(self.domain())
    }
}

impl fmt::Display for KnownSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.identifier())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("site '{0}' is not supported")]
pub struct UnknownSite(pub String);

impl FromStr for KnownSite {
    type Err = UnknownSite;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        KnownSite::ALL
            .into_iter()
            .find(|site| site.identifier() == s)
            .ok_or_else(|| UnknownSite(s.to_string()))
    }
}
