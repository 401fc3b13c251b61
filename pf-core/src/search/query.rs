use lazy_static::lazy_static;
use pf_boundary::Coordinate;
use regex::Regex;

lazy_static! {
    static ref COORDINATE_REGEX: Regex =
        Regex::new(r"^(?P<lat>-?[0-9]+(?:\.[0-9]+)?)\s*,\s*(?P<lng>-?[0-9]+(?:\.[0-9]+)?)$").unwrap();
}

/// A classified, non-blank search input.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchQuery {
    /// `<lat>,<lng>` in signed decimal degrees.
    ///
    /// The values are taken as they are, without any range checks.
    Coordinates(Coordinate),
    Text(String),
}

impl SearchQuery {
    /// Returns `None` if the trimmed input is empty.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        let query = parse_coordinates(trimmed)
            .map(Self::Coordinates)
            .unwrap_or_else(|| Self::Text(trimmed.to_string()));
        Some(query)
    }
}

fn parse_coordinates(s: &str) -> Option<Coordinate> {
    let captures = COORDINATE_REGEX.captures(s)?;
    let lat = parse_degrees(&captures["lat"])?;
    let lng = parse_degrees(&captures["lng"])?;
    Some(Coordinate::new(lat, lng))
}

// Too many digits overflow to infinity.
fn parse_degrees(s: &str) -> Option<f64> {
    s.parse().ok().filter(|v: &f64| v.is_finite())
}
