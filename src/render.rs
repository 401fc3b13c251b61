use std::fmt::Write;

use pf_boundary::{Error, PhotoUpload, Place, ResultEnvelope};
use pf_core::{RequestState, SearchMode};

pub fn request_state(state: &RequestState<ResultEnvelope<Place>>) -> String {
    match state {
        RequestState::Idle => String::new(),
        RequestState::Loading => "Loading places...".to_string(),
        RequestState::Failure(err) => error(err),
        RequestState::Success(page) => places(page),
    }
}

pub fn error(err: &Error) -> String {
    format!("Error: {}", err.message)
}

pub fn mode(mode: SearchMode) -> &'static str {
    match mode {
        SearchMode::All => "all places",
        SearchMode::Text => "text search",
        SearchMode::Proximity => "nearby search",
    }
}

pub fn places(page: &ResultEnvelope<Place>) -> String {
    let mut out = String::new();
    if page.is_empty() {
        out.push_str("No places found");
        return out;
    }
    let _ = writeln!(out, "{} places found", page.total_elements);
    for place in &page.content {
        out.push('\n');
        out.push_str(&self::place(place));
    }
    if page.total_pages > 1 {
        let _ = write!(
            out,
            "\nPage {} of {}",
            page.number.saturating_add(1),
            page.total_pages
        );
    }
    out
}

pub fn place(place: &Place) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "[{}] {}", place.id, place.name);
    let description = place
        .description
        .as_deref()
        .filter(|d| !d.trim().is_empty())
        .unwrap_or("No description available");
    let _ = writeln!(out, "    {description}");
    let _ = writeln!(out, "    Address: {}", place.address_label());
    if let Some(location) = &place.location {
        let _ = writeln!(
            out,
            "    Location: {}, {}",
            location.latitude, location.longitude
        );
    }
    let _ = writeln!(out, "    Rating: {}", place.rating_label());
    if let Some(photo) = place.cover_photo() {
        let _ = writeln!(out, "    Photo: {photo}");
    }
    out
}

pub fn photo_upload(upload: &PhotoUpload) -> String {
    let PhotoUpload { photo_url, message } = upload;
    if message.trim().is_empty() {
        format!("Photo uploaded: {photo_url}")
    } else {
        format!("{message} ({photo_url})")
    }
}
