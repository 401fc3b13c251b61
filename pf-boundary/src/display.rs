use std::fmt;

use super::*;

const NO_ADDRESS: &str = "No address available";
const NOT_RATED: &str = "N/A";

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Flat(line) => f.write_str(line.trim()),
            Self::Structured(addr) => fmt::Display::fmt(addr, f),
        }
    }
}

impl fmt::Display for StructuredAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self {
            street,
            city,
            country,
        } = self;
        let parts = [street, city, country]
            .into_iter()
            .filter_map(|part| part.as_deref().map(str::trim))
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>();
        f.write_str(&parts.join(", "))
    }
}

impl Place {
    pub fn address_label(&self) -> String {
        self.address
            .as_ref()
            .filter(|addr| !addr.is_empty())
            .map_or_else(|| NO_ADDRESS.to_string(), ToString::to_string)
    }

    pub fn rating_label(&self) -> String {
        self.rating
            .map_or_else(|| NOT_RATED.to_string(), |rating| format!("{rating:.1}"))
    }

    pub fn cover_photo(&self) -> Option<&str> {
        self.photos.first().map(String::as_str)
    }
}
