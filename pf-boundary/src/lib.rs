use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use time::{format_description::well_known::Rfc3339, OffsetDateTime};

mod display;

pub const DEFAULT_PAGE: u32 = 0;
pub const DEFAULT_PAGE_SIZE: u32 = 10;

const UNEXPECTED_ERROR_MESSAGE: &str = "An unexpected error occurred";

/// Opaque identifier of a place.
///
/// The catalog hands out UUID strings, older deployments
/// used plain integers. Both are accepted on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct PlaceId(String);

impl PlaceId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<'de> Deserialize<'de> for PlaceId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Number(u64),
        }
        let id = match RawId::deserialize(deserializer)? {
            RawId::Text(text) => Self(text),
            RawId::Number(nr) => Self(nr.to_string()),
        };
        Ok(id)
    }
}

impl fmt::Display for PlaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for PlaceId {
    fn from(from: String) -> Self {
        Self(from)
    }
}

impl From<&str> for PlaceId {
    fn from(from: &str) -> Self {
        Self(from.to_string())
    }
}

impl From<u64> for PlaceId {
    fn from(from: u64) -> Self {
        Self(from.to_string())
    }
}

#[rustfmt::skip]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Place {
    pub id          : PlaceId,
    pub name        : String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description : Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address     : Option<Address>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location    : Option<Location>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub photos      : Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating      : Option<f64>,
    #[serde(default, with = "time::serde::rfc3339::option", skip_serializing_if = "Option::is_none")]
    pub created_at  : Option<OffsetDateTime>,
    #[serde(default, with = "time::serde::rfc3339::option", skip_serializing_if = "Option::is_none")]
    pub updated_at  : Option<OffsetDateTime>,
}

/// Postal address of a place.
///
/// Depending on the catalog version an address is either
/// a single line of text or a structured object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Address {
    Flat(String),
    Structured(StructuredAddress),
}

impl Address {
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Flat(line) => line.trim().is_empty(),
            Self::Structured(addr) => addr.is_empty(),
        }
    }
}

#[rustfmt::skip]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuredAddress {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub street  : Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city    : Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country : Option<String>,
}

impl StructuredAddress {
    pub fn is_empty(&self) -> bool {
        [&self.street, &self.city, &self.country]
            .into_iter()
            .all(|part| part.as_deref().map_or(true, |s| s.trim().is_empty()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

/// A pair of signed decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

impl From<Location> for Coordinate {
    fn from(from: Location) -> Self {
        let Location {
            latitude,
            longitude,
        } = from;
        Self::new(latitude, longitude)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.lat, self.lng)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Pagination {
    pub page: u32,
    pub size: u32,
}

impl Pagination {
    pub const fn new(page: u32, size: u32) -> Self {
        Self { page, size }
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE, DEFAULT_PAGE_SIZE)
    }
}

/// One page of results as returned by the catalog.
///
/// Everything except `content` is advisory and
/// falls back to zero (or `false`) if missing.
#[rustfmt::skip]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", bound(deserialize = "T: Deserialize<'de>"))]
pub struct ResultEnvelope<T> {
    #[serde(default, deserialize_with = "null_as_default")]
    pub content        : Vec<T>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_elements : u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_pages    : u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub size           : u32,
    #[serde(default, deserialize_with = "null_as_default", alias = "page")]
    pub number         : u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub has_next       : bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub has_previous   : bool,
}

impl<T> ResultEnvelope<T> {
    pub fn len(&self) -> usize {
        self.content.len()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

impl<T> Default for ResultEnvelope<T> {
    fn default() -> Self {
        Self {
            content: vec![],
            total_elements: 0,
            total_pages: 0,
            size: 0,
            number: 0,
            has_next: false,
            has_previous: false,
        }
    }
}

/// The normalized error shape.
///
/// Every failed request ends up as exactly one of these,
/// whether the catalog answered with a structured body or
/// the request never made it.
#[rustfmt::skip]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("{message}")]
pub struct Error {
    #[serde(default, deserialize_with = "null_as_default")]
    pub message   : String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status    : u16,
    #[serde(default, deserialize_with = "null_as_default")]
    pub timestamp : String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub path      : String,
}

impl Error {
    pub const STATUS_BAD_REQUEST: u16 = 400;
    pub const STATUS_NOT_FOUND: u16 = 404;
    pub const STATUS_INTERNAL: u16 = 500;

    pub fn new(status: u16, message: impl Into<String>, path: impl Into<String>) -> Self {
        let message = message.into();
        let message = if message.trim().is_empty() {
            UNEXPECTED_ERROR_MESSAGE.to_string()
        } else {
            message
        };
        Self {
            message,
            status,
            timestamp: now_rfc3339(),
            path: path.into(),
        }
    }

    /// An error without any further information about its cause.
    pub fn unexpected(status: Option<u16>, path: impl Into<String>) -> Self {
        Self::new(
            status.unwrap_or(Self::STATUS_INTERNAL),
            UNEXPECTED_ERROR_MESSAGE,
            path,
        )
    }

    pub const fn is_not_found(&self) -> bool {
        self.status == Self::STATUS_NOT_FOUND
    }
}

#[rustfmt::skip]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPlace {
    pub name        : String,
    pub description : String,
    pub address     : String,
    pub photos      : Vec<String>,
}

/// Partial update; fields left as `None` stay untouched on the server.
#[rustfmt::skip]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdatePlace {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name        : Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description : Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address     : Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photos      : Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating      : Option<f64>,
}

impl UpdatePlace {
    pub fn is_empty(&self) -> bool {
        let Self {
            name,
            description,
            address,
            photos,
            rating,
        } = self;
        name.is_none()
            && description.is_none()
            && address.is_none()
            && photos.is_none()
            && rating.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoUpload {
    pub photo_url: String,
    #[serde(default)]
    pub message: String,
}

pub fn now_rfc3339() -> String {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_default()
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
