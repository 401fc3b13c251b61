use parking_lot::Mutex;
use pf_boundary::{Coordinate, Place, ResultEnvelope};
use tokio::sync::watch;

use super::{PerMode, PlaceSearchApi, SearchMode, SearchQuery, SearchSettings};
use crate::{request::RequestCell, RequestState, Result};

pub type PlacePage = ResultEnvelope<Place>;

#[derive(Debug, Default)]
struct ActiveSearch {
    mode: SearchMode,
    center: Option<Coordinate>,
    query: Option<String>,
}

/// Turns raw user input into catalog searches.
///
/// Each [`SearchMode`] keeps its own [`RequestState`].
/// Only the state of the active mode is meant to be displayed.
#[derive(Debug)]
pub struct SearchDispatcher<A> {
    api: A,
    settings: SearchSettings,
    results: PerMode<RequestCell<PlacePage>>,
    active: Mutex<ActiveSearch>,
}

impl<A> SearchDispatcher<A> {
    pub fn new(api: A) -> Self {
        Self::with_settings(api, SearchSettings::default())
    }

    pub fn with_settings(api: A, settings: SearchSettings) -> Self {
        Self {
            api,
            settings,
            results: PerMode::default(),
            active: Mutex::new(ActiveSearch::default()),
        }
    }

    pub const fn api(&self) -> &A {
        &self.api
    }

    pub fn active_mode(&self) -> SearchMode {
        self.active.lock().mode
    }

    /// The center of the current proximity search, if any.
    pub fn active_center(&self) -> Option<Coordinate> {
        self.active.lock().center
    }

    pub fn active_query(&self) -> Option<String> {
        self.active.lock().query.clone()
    }

    pub fn state(&self, mode: SearchMode) -> RequestState<PlacePage> {
        self.results.get(mode).snapshot()
    }

    pub fn active_state(&self) -> RequestState<PlacePage> {
        self.state(self.active_mode())
    }

    pub fn subscribe(&self, mode: SearchMode) -> watch::Receiver<RequestState<PlacePage>> {
        self.results.get(mode).subscribe()
    }

    fn activate(&self, mode: SearchMode, center: Option<Coordinate>, query: Option<String>) {
        log::debug!("Activate search mode {mode:?}");
        *self.active.lock() = ActiveSearch {
            mode,
            center,
            query,
        };
    }
}

impl<A> SearchDispatcher<A>
where
    A: PlaceSearchApi,
{
    /// Searches for places matching the given input.
    ///
    /// Input in coordinate form (`<lat>,<lng>`) starts a proximity search,
    /// anything else a text search that uses the input both as query and
    /// as city filter. Blank input is ignored and yields `Ok(None)`.
    pub async fn dispatch(&self, raw_query: &str) -> Result<Option<PlacePage>> {
        let Some(query) = SearchQuery::parse(raw_query) else {
            log::debug!("Ignore blank search query");
            return Ok(None);
        };
        let pagination = self.settings.first_page();
        let page = match query {
            SearchQuery::Coordinates(center) => {
                log::debug!("Search places around {center}");
                self.activate(
                    SearchMode::Proximity,
                    Some(center),
                    Some(raw_query.trim().to_string()),
                );
                self.results
                    .proximity
                    .run(|| {
                        self.api
                            .search_nearby(center, self.settings.radius, pagination)
                    })
                    .await?
            }
            SearchQuery::Text(text) => {
                log::debug!("Search places matching '{text}'");
                self.activate(SearchMode::Text, None, Some(text.clone()));
                self.results
                    .text
                    .run(|| self.api.search_text(&text, Some(&text), pagination))
                    .await?
            }
        };
        Ok(Some(page))
    }

    /// Switches back to the unfiltered list of all places.
    pub async fn reset(&self) -> Result<PlacePage> {
        self.activate(SearchMode::All, None, None);
        let pagination = self.settings.first_page();
        self.results
            .all
            .run(|| self.api.list_places(pagination))
            .await
    }
}
