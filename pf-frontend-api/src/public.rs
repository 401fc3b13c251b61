use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use reqwest::{
    multipart::{Form, Part},
    Client, RequestBuilder,
};
use serde::de::DeserializeOwned;

use pf_boundary::{
    Coordinate, Error, NewPlace, Pagination, PhotoUpload, Place, PlaceId, ResultEnvelope,
    UpdatePlace,
};

use crate::{into_empty, into_json, Result};

pub const DEFAULT_API_URL: &str = "http://localhost:8080/api";

/// Client of the places catalog API.
///
/// Every failure is reported as [`pf_boundary::Error`],
/// no matter whether it originated from the network,
/// from the catalog or from an unreadable response.
#[derive(Debug, Clone)]
pub struct PlacesApi {
    url: String,
    client: Client,
}

impl Default for PlacesApi {
    fn default() -> Self {
        Self::new(DEFAULT_API_URL)
    }
}

impl PlacesApi {
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self::with_client(url, Client::new())
    }

    #[must_use]
    pub fn with_client(url: impl Into<String>, client: Client) -> Self {
        let url = url.into().trim_end_matches('/').to_string();
        Self { url, client }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.url)
    }

    async fn send<T>(&self, path: &str, request: RequestBuilder) -> Result<T>
    where
        T: DeserializeOwned,
    {
        log::debug!("Request {path}");
        let result = match request.send().await {
            Ok(response) => into_json(response).await,
            Err(err) => Err(err.into()),
        };
        result.map_err(|err| err.normalize(path))
    }

    pub async fn places(&self, pagination: Pagination) -> Result<ResultEnvelope<Place>> {
        let path = "/places";
        let Pagination { page, size } = check_pagination(pagination, path)?;
        let url = self.endpoint(&format!("{path}?page={page}&size={size}"));
        self.send(path, self.client.get(url)).await
    }

    pub async fn place(&self, id: &PlaceId) -> Result<Place> {
        let path = place_path(id);
        let request = self.client.get(self.endpoint(&path));
        self.send(&path, request).await
    }

    pub async fn create_place(&self, place: &NewPlace) -> Result<Place> {
        let path = "/places";
        let request = self.client.post(self.endpoint(path)).json(place);
        self.send(path, request).await
    }

    pub async fn update_place(&self, id: &PlaceId, place: &UpdatePlace) -> Result<Place> {
        let path = place_path(id);
        let request = self.client.put(self.endpoint(&path)).json(place);
        self.send(&path, request).await
    }

    /// Deleting a place that does not exist (anymore)
    /// results in a "not found" error.
    pub async fn delete_place(&self, id: &PlaceId) -> Result<()> {
        let path = place_path(id);
        log::debug!("Request {path}");
        let result = match self.client.delete(self.endpoint(&path)).send().await {
            Ok(response) => into_empty(response).await,
            Err(err) => Err(err.into()),
        };
        result.map_err(|err| err.normalize(&path))
    }

    /// Searches by name or description and optionally narrows
    /// the results down to a city.
    pub async fn search(
        &self,
        text: &str,
        city: Option<&str>,
        pagination: Pagination,
    ) -> Result<ResultEnvelope<Place>> {
        let path = "/places/search";
        let Pagination { page, size } = check_pagination(pagination, path)?;
        let encoded_txt = utf8_percent_encode(text, NON_ALPHANUMERIC);
        let mut query = format!("q={encoded_txt}");
        if let Some(city) = city {
            let encoded_city = utf8_percent_encode(city, NON_ALPHANUMERIC);
            query = format!("{query}&city={encoded_city}");
        }
        let url = self.endpoint(&format!("{path}?{query}&page={page}&size={size}"));
        self.send(path, self.client.get(url)).await
    }

    pub async fn nearby(
        &self,
        center: Coordinate,
        radius: f64,
        pagination: Pagination,
    ) -> Result<ResultEnvelope<Place>> {
        let path = "/places/nearby";
        let Pagination { page, size } = check_pagination(pagination, path)?;
        let Coordinate { lat, lng } = center;
        let url = self.endpoint(&format!(
            "{path}?lat={lat}&lng={lng}&radius={radius}&page={page}&size={size}"
        ));
        self.send(path, self.client.get(url)).await
    }

    pub async fn upload_photo(
        &self,
        id: &PlaceId,
        file_name: &str,
        data: Vec<u8>,
    ) -> Result<PhotoUpload> {
        let path = format!("{}/photos", place_path(id));
        let part = Part::bytes(data).file_name(file_name.to_string());
        let form = Form::new().part("file", part);
        let request = self.client.post(self.endpoint(&path)).multipart(form);
        self.send(&path, request).await
    }
}

fn place_path(id: &PlaceId) -> String {
    let encoded_id = utf8_percent_encode(id.as_str(), NON_ALPHANUMERIC);
    format!("/places/{encoded_id}")
}

fn check_pagination(pagination: Pagination, path: &str) -> Result<Pagination> {
    if pagination.size == 0 {
        return Err(Error::new(
            Error::STATUS_BAD_REQUEST,
            "Page size must be greater than zero",
            path,
        ));
    }
    Ok(pagination)
}

#[cfg(test)]
mod tests {
    use httpmock::prelude::*;
    use pf_core::{RequestController, RequestState};
    use serde_json::json;

    use super::*;

    fn place_json(id: u64, name: &str) -> serde_json::Value {
        json!({
            "id": id,
            "name": name,
            "description": "A nice place",
            "address": { "street": "Main St 1", "city": "Paris", "country": "France" },
            "photos": ["https://img.example/1.jpg"],
            "rating": 4.5,
            "createdAt": "2024-03-01T10:00:00Z",
            "updatedAt": "2024-03-01T10:00:00Z"
        })
    }

    fn page_json(places: Vec<serde_json::Value>) -> serde_json::Value {
        let total = places.len();
        json!({
            "content": places,
            "page": 0,
            "size": 10,
            "totalElements": total,
            "totalPages": 1,
            "hasNext": false,
            "hasPrevious": false
        })
    }

    #[tokio::test]
    async fn list_places_with_pagination() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/api/places")
                    .query_param("page", "0")
                    .query_param("size", "10");
                then.status(200)
                    .json_body(page_json(vec![place_json(1, "Cafe"), place_json(2, "Bar")]));
            })
            .await;
        let api = PlacesApi::new(server.url("/api"));

        let page = api.places(Pagination::default()).await.unwrap();

        mock.assert_async().await;
        assert_eq!(page.len(), 2);
        assert_eq!(page.total_elements, 2);
        assert_eq!(page.content[0].name, "Cafe");
        assert_eq!(page.content[1].name, "Bar");
    }

    #[tokio::test]
    async fn get_place_by_id() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/places/1");
                then.status(200).json_body(place_json(1, "Cafe"));
            })
            .await;
        let api = PlacesApi::new(server.base_url());

        let place = api.place(&PlaceId::from(1_u64)).await.unwrap();

        assert_eq!(place.id, PlaceId::from(1_u64));
        assert_eq!(place.address_label(), "Main St 1, Paris, France");
        assert_eq!(place.rating_label(), "4.5");
    }

    #[tokio::test]
    async fn structured_not_found_reaches_the_controller_unchanged() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/places/999");
                then.status(404)
                    .json_body(json!({ "message": "Place not found", "status": 404 }));
            })
            .await;
        let api = PlacesApi::new(server.base_url());
        let controller = RequestController::new(|id: PlaceId| {
            let api = api.clone();
            async move { api.place(&id).await }
        });

        let result = controller.execute(PlaceId::from(999_u64)).await;

        assert!(result.is_err());
        let state = controller.state();
        let err = state.error().unwrap();
        assert_eq!(err.message, "Place not found");
        assert_eq!(err.status, 404);
        assert_eq!(err.path, "/places/999");
        assert!(state.data().is_none());
        assert!(!matches!(state, RequestState::Loading));
    }

    #[tokio::test]
    async fn not_found_without_body() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/places/abc");
                then.status(404);
            })
            .await;
        let api = PlacesApi::new(server.base_url());

        let err = api.place(&PlaceId::from("abc")).await.unwrap_err();

        assert!(err.is_not_found());
        assert!(!err.message.is_empty());
        assert_eq!(err.path, "/places/abc");
    }

    #[tokio::test]
    async fn unreachable_service() {
        // nothing is listening on port 1
        let api = PlacesApi::new("http://127.0.0.1:1/api");

        let err = api.places(Pagination::default()).await.unwrap_err();

        assert_eq!(err.status, 500);
        assert!(!err.message.is_empty());
        assert!(!err.timestamp.is_empty());
        assert_eq!(err.path, "/places");
    }

    #[tokio::test]
    async fn malformed_payload() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/places/1");
                then.status(200).body("{ not json");
            })
            .await;
        let api = PlacesApi::new(server.base_url());

        let err = api.place(&PlaceId::from(1_u64)).await.unwrap_err();

        assert_eq!(err.status, 500);
        assert!(!err.message.is_empty());
    }

    #[tokio::test]
    async fn reject_empty_page_size() {
        let api = PlacesApi::new("http://127.0.0.1:1");

        let err = api.places(Pagination::new(0, 0)).await.unwrap_err();

        assert_eq!(err.status, 400);
        assert_eq!(err.path, "/places");
    }

    #[tokio::test]
    async fn create_place() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST).path("/places").json_body(json!({
                    "name": "Cafe",
                    "description": "A nice place",
                    "address": "Main St 1, Paris",
                    "photos": []
                }));
                then.status(201).json_body(place_json(5, "Cafe"));
            })
            .await;
        let api = PlacesApi::new(server.base_url());
        let new_place = NewPlace {
            name: "Cafe".to_string(),
            description: "A nice place".to_string(),
            address: "Main St 1, Paris".to_string(),
            photos: vec![],
        };

        let place = api.create_place(&new_place).await.unwrap();

        mock.assert_async().await;
        assert_eq!(place.id, PlaceId::from(5_u64));
    }

    #[tokio::test]
    async fn create_invalid_place() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/places");
                then.status(400).json_body(json!({
                    "message": "Name is required",
                    "status": 400,
                    "timestamp": "2024-03-01T10:00:00Z",
                    "path": "/api/places"
                }));
            })
            .await;
        let api = PlacesApi::new(server.base_url());
        let new_place = NewPlace {
            name: String::new(),
            description: String::new(),
            address: "Somewhere".to_string(),
            photos: vec![],
        };

        let err = api.create_place(&new_place).await.unwrap_err();

        assert_eq!(err.message, "Name is required");
        assert_eq!(err.status, 400);
        assert_eq!(err.path, "/api/places");
    }

    #[tokio::test]
    async fn update_sends_only_given_fields() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(PUT)
                    .path("/places/1")
                    .json_body(json!({ "name": "Renamed", "rating": 4.0 }));
                then.status(200).json_body(place_json(1, "Renamed"));
            })
            .await;
        let api = PlacesApi::new(server.base_url());
        let update = UpdatePlace {
            name: Some("Renamed".to_string()),
            rating: Some(4.0),
            ..Default::default()
        };

        let place = api.update_place(&PlaceId::from(1_u64), &update).await.unwrap();

        mock.assert_async().await;
        assert_eq!(place.name, "Renamed");
    }

    #[tokio::test]
    async fn delete_place_twice() {
        let server = MockServer::start_async().await;
        let mut deleted = server
            .mock_async(|when, then| {
                when.method(DELETE).path("/places/1");
                then.status(204);
            })
            .await;
        let api = PlacesApi::new(server.base_url());
        let id = PlaceId::from(1_u64);

        api.delete_place(&id).await.unwrap();
        deleted.assert_async().await;
        deleted.delete_async().await;

        server
            .mock_async(|when, then| {
                when.method(DELETE).path("/places/1");
                then.status(404);
            })
            .await;
        let err = api.delete_place(&id).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn search_by_text_and_city() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/places/search")
                    .query_param("q", "New York")
                    .query_param("city", "New York")
                    .query_param("page", "0")
                    .query_param("size", "10");
                then.status(200)
                    .json_body(page_json(vec![place_json(3, "Diner")]));
            })
            .await;
        let api = PlacesApi::new(server.base_url());

        let page = api
            .search("New York", Some("New York"), Pagination::default())
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(page.content[0].name, "Diner");
    }

    #[tokio::test]
    async fn search_by_text_without_city() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/places/search")
                    .query_param("q", "coffee");
                then.status(200).json_body(page_json(vec![]));
            })
            .await;
        let api = PlacesApi::new(server.base_url());

        let page = api.search("coffee", None, Pagination::default()).await.unwrap();

        mock.assert_async().await;
        assert!(page.is_empty());
    }

    #[tokio::test]
    async fn failed_searches_name_the_endpoint() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/places/search");
                then.status(503);
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/places/nearby");
                then.status(200).body("{ not json");
            })
            .await;
        let api = PlacesApi::new(server.base_url());

        let err = api
            .search("Paris", Some("Paris"), Pagination::default())
            .await
            .unwrap_err();
        assert_eq!(err.status, 503);
        assert_eq!(err.path, "/places/search");

        let err = api
            .nearby(Coordinate::new(48.85, 2.35), 5.0, Pagination::default())
            .await
            .unwrap_err();
        assert_eq!(err.status, 500);
        assert_eq!(err.path, "/places/nearby");
    }

    #[tokio::test]
    async fn search_nearby() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/places/nearby")
                    .query_param("lat", "40.7128")
                    .query_param("lng", "-74.006")
                    .query_param("radius", "5")
                    .query_param("page", "0")
                    .query_param("size", "10");
                then.status(200)
                    .json_body(page_json(vec![place_json(4, "Deli")]));
            })
            .await;
        let api = PlacesApi::new(server.base_url());

        let page = api
            .nearby(Coordinate::new(40.7128, -74.006), 5.0, Pagination::default())
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(page.len(), 1);
    }

    #[tokio::test]
    async fn upload_photo() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/places/1/photos")
                    .body_contains("filename=\"front.jpg\"");
                then.status(201).json_body(json!({
                    "photoUrl": "/uploads/front.jpg",
                    "message": "Photo uploaded successfully"
                }));
            })
            .await;
        let api = PlacesApi::new(server.base_url());

        let upload = api
            .upload_photo(&PlaceId::from(1_u64), "front.jpg", b"jpeg bytes".to_vec())
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(upload.photo_url, "/uploads/front.jpg");
    }

    #[test]
    fn strip_trailing_slash_of_base_url() {
        let api = PlacesApi::new("http://localhost:8080/api/");
        assert_eq!(api.url(), "http://localhost:8080/api");
        assert_eq!(PlacesApi::default().url(), DEFAULT_API_URL);
    }
}
