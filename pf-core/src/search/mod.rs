use async_trait::async_trait;
use pf_boundary::{Coordinate, Pagination, Place, ResultEnvelope, DEFAULT_PAGE_SIZE};

use crate::Result;

mod dispatcher;
mod query;

pub use self::{dispatcher::*, query::*};

pub const DEFAULT_RADIUS: f64 = 5.0;

/// The search operations of the places catalog.
#[async_trait]
pub trait PlaceSearchApi {
    async fn list_places(&self, pagination: Pagination) -> Result<ResultEnvelope<Place>>;

    async fn search_text(
        &self,
        query: &str,
        city: Option<&str>,
        pagination: Pagination,
    ) -> Result<ResultEnvelope<Place>>;

    async fn search_nearby(
        &self,
        center: Coordinate,
        radius: f64,
        pagination: Pagination,
    ) -> Result<ResultEnvelope<Place>>;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SearchMode {
    #[default]
    All,
    Text,
    Proximity,
}

impl SearchMode {
    pub const fn all() -> [Self; 3] {
        [Self::All, Self::Text, Self::Proximity]
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchSettings {
    /// Radius of proximity searches, in the unit of the catalog (km).
    pub radius: f64,
    pub page_size: u32,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            radius: DEFAULT_RADIUS,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl SearchSettings {
    const fn first_page(&self) -> Pagination {
        Pagination::new(0, self.page_size)
    }
}

/// One value for each [`SearchMode`].
#[derive(Debug, Default)]
struct PerMode<T> {
    all: T,
    text: T,
    proximity: T,
}

impl<T> PerMode<T> {
    const fn get(&self, mode: SearchMode) -> &T {
        match mode {
            SearchMode::All => &self.all,
            SearchMode::Text => &self.text,
            SearchMode::Proximity => &self.proximity,
        }
    }
}
