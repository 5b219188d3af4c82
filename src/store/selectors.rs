//! Read-only views over [`AppState`]
//!
//! Every selector is a pure function of the state snapshot; calling one twice
//! on the same state gives the same answer.

use super::state::AppState;
use crate::models::{
    AuthenticatedUser, AuthorizationStatus, City, CityName, Location, OfferDetail, OfferSummary,
    Review,
};

/// Most reviews shown under an offer
pub const MAX_REVIEWS: usize = 10;
/// Nearby places drawn on the offer page map
pub const MAP_NEARBY_LIMIT: usize = 3;

// === City ===

pub fn city_name(state: &AppState) -> CityName {
    state.city.city_name
}

fn in_city(offers: &[OfferSummary], city: CityName) -> Vec<OfferSummary> {
    offers
        .iter()
        .filter(|offer| offer.city.name == city)
        .cloned()
        .collect()
}

// === Offers list ===

pub fn offers(state: &AppState) -> &[OfferSummary] {
    &state.offers.offers
}

/// Offers in the selected city, in fetch order
pub fn offers_in_city(state: &AppState) -> Vec<OfferSummary> {
    in_city(&state.offers.offers, state.city.city_name)
}

pub fn offers_loading(state: &AppState) -> bool {
    state.offers.is_loading
}

pub fn offers_error(state: &AppState) -> bool {
    state.offers.has_error
}

// === Favorites ===

pub fn favorites(state: &AppState) -> &[OfferSummary] {
    &state.favorites.favorites
}

pub fn favorites_in_city(state: &AppState, city: CityName) -> Vec<OfferSummary> {
    in_city(&state.favorites.favorites, city)
}

/// Cities that have at least one favorite, in tab order
pub fn favorite_cities(state: &AppState) -> Vec<CityName> {
    CityName::ALL
        .into_iter()
        .filter(|city| {
            state
                .favorites
                .favorites
                .iter()
                .any(|offer| offer.city.name == *city)
        })
        .collect()
}

pub fn favorites_loading(state: &AppState) -> bool {
    state.favorites.is_loading
}

pub fn favorites_error(state: &AppState) -> bool {
    state.favorites.has_error
}

// === Offer page ===

pub fn offer(state: &AppState) -> Option<&OfferDetail> {
    state.offer.offer.as_ref()
}

pub fn offer_loading(state: &AppState) -> bool {
    state.offer.is_loading
}

pub fn offer_error(state: &AppState) -> bool {
    state.offer.has_error
}

pub fn offer_city(state: &AppState) -> Option<&City> {
    state.offer.offer.as_ref().map(|offer| &offer.city)
}

pub fn nearby_loading(state: &AppState) -> bool {
    state.offer.nearby_loading
}

pub fn nearby_error(state: &AppState) -> bool {
    state.offer.nearby_has_error
}

/// Nearby places without the offer currently open
pub fn filtered_nearby(state: &AppState) -> Vec<OfferSummary> {
    match &state.offer.offer {
        Some(current) => state
            .offer
            .nearby
            .iter()
            .filter(|offer| offer.id != current.id)
            .cloned()
            .collect(),
        None => state.offer.nearby.clone(),
    }
}

/// Locations of the nearby places, plus the open offer's own location when loaded
pub fn nearby_points(state: &AppState) -> Vec<Location> {
    let mut points: Vec<Location> = filtered_nearby(state)
        .iter()
        .map(|offer| offer.location)
        .collect();

    if let Some(current) = &state.offer.offer {
        points.push(current.location);
    }
    points
}

/// Points for the offer page map: at most [`MAP_NEARBY_LIMIT`] nearby places and the open offer
pub fn map_points(state: &AppState) -> Vec<Location> {
    let mut points: Vec<Location> = filtered_nearby(state)
        .iter()
        .take(MAP_NEARBY_LIMIT)
        .map(|offer| offer.location)
        .collect();

    if let Some(current) = &state.offer.offer {
        points.push(current.location);
    }
    points
}

// === Reviews ===

/// Newest [`MAX_REVIEWS`] reviews, newest first
pub fn reviews(state: &AppState) -> Vec<Review> {
    let mut reviews: Vec<Review> = state.comments.comments.iter().map(Review::from).collect();
    reviews.sort_by(|a, b| b.date.cmp(&a.date));
    reviews.truncate(MAX_REVIEWS);
    reviews
}

/// Count of every review held, regardless of how many are displayed
pub fn total_comments(state: &AppState) -> usize {
    state.comments.comments.len()
}

pub fn comments_loading(state: &AppState) -> bool {
    state.comments.is_loading
}

pub fn comments_error(state: &AppState) -> bool {
    state.comments.has_error
}

// === User ===

pub fn authorization_status(state: &AppState) -> AuthorizationStatus {
    state.user.authorization_status
}

pub fn is_auth_checked(state: &AppState) -> bool {
    state.user.authorization_status != AuthorizationStatus::Unknown
}

pub fn is_authorized(state: &AppState) -> bool {
    state.user.authorization_status == AuthorizationStatus::Auth
}

pub fn user(state: &AppState) -> Option<&AuthenticatedUser> {
    state.user.user.as_ref()
}
