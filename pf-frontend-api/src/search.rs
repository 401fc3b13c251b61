use async_trait::async_trait;
use pf_boundary::{Coordinate, Pagination, Place, ResultEnvelope};
use pf_core::PlaceSearchApi;

use crate::{PlacesApi, Result};

#[async_trait]
impl PlaceSearchApi for PlacesApi {
    async fn list_places(&self, pagination: Pagination) -> Result<ResultEnvelope<Place>> {
        self.places(pagination).await
    }

    async fn search_text(
        &self,
        query: &str,
        city: Option<&str>,
        pagination: Pagination,
    ) -> Result<ResultEnvelope<Place>> {
        self.search(query, city, pagination).await
    }

    async fn search_nearby(
        &self,
        center: Coordinate,
        radius: f64,
        pagination: Pagination,
    ) -> Result<ResultEnvelope<Place>> {
        self.nearby(center, radius, pagination).await
    }
}
