//! # pf-core
//!
//! Request lifecycle tracking and search dispatching for the places catalog.
//!
//! Nothing in here talks to the network directly: remote calls go through
//! the [`PlaceSearchApi`] port or through arbitrary futures handed to a
//! [`RequestController`].

pub mod request;
pub mod search;

pub use self::{
    request::{RequestCell, RequestController, RequestState, Transition},
    search::{PlaceSearchApi, SearchDispatcher, SearchMode, SearchQuery, SearchSettings},
};

pub use pf_boundary as boundary;

pub type Result<T> = std::result::Result<T, pf_boundary::Error>;
