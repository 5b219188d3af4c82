//! Pure reducer functions for state transitions
//!
//! Each container has its own reducer: `(prior container, action) -> container`.
//! A reducer only reads its own container and the action, so effects that span
//! containers (the favorite toggle cascade) happen by dispatching further
//! fetch actions, never by one reducer writing another container.

use super::actions::{Action, Phase};
use super::state::{
    AppState, CityState, CommentsState, FavoritesState, OfferState, OffersState, UserState,
};
use crate::models::AuthorizationStatus;

/// Apply one action to every container
pub fn reduce(state: AppState, action: &Action) -> AppState {
    AppState {
        city: reduce_city(state.city, action),
        offers: reduce_offers(state.offers, action),
        offer: reduce_offer(state.offer, action),
        favorites: reduce_favorites(state.favorites, action),
        comments: reduce_comments(state.comments, action),
        user: reduce_user(state.user, action),
    }
}

pub fn reduce_city(state: CityState, action: &Action) -> CityState {
    match action {
        Action::SetCity(city_name) => CityState {
            city_name: *city_name,
        },
        _ => state,
    }
}

pub fn reduce_offers(state: OffersState, action: &Action) -> OffersState {
    match action {
        Action::FetchOffers(Phase::Pending) => OffersState {
            is_loading: true,
            has_error: false,
            ..state
        },
        Action::FetchOffers(Phase::Fulfilled(offers)) => OffersState {
            offers: offers.clone(),
            is_loading: false,
            has_error: false,
        },
        // The previous listing stays; pages redirect on the error flag
        Action::FetchOffers(Phase::Rejected(_)) => OffersState {
            is_loading: false,
            has_error: true,
            ..state
        },
        _ => state,
    }
}

pub fn reduce_offer(state: OfferState, action: &Action) -> OfferState {
    match action {
        Action::FetchOffer {
            id,
            phase: Phase::Pending,
        } => OfferState {
            is_loading: true,
            has_error: false,
            last_fetched_id: Some(id.clone()),
            ..state
        },

        // Response for a superseded request
        Action::FetchOffer { id, .. } if !is_latest(&state, id) => state,

        Action::FetchOffer {
            phase: Phase::Fulfilled(offer),
            ..
        } => OfferState {
            offer: Some(offer.clone()),
            is_loading: false,
            has_error: false,
            ..state
        },

        Action::FetchOffer {
            phase: Phase::Rejected(_),
            ..
        } => OfferState {
            offer: None,
            is_loading: false,
            has_error: true,
            ..state
        },

        // Nearby places of an offer that is no longer open
        Action::FetchNearby { id, .. } if !is_latest(&state, id) => state,

        Action::FetchNearby {
            phase: Phase::Pending,
            ..
        } => OfferState {
            nearby_loading: true,
            nearby_has_error: false,
            ..state
        },

        Action::FetchNearby {
            phase: Phase::Fulfilled(nearby),
            ..
        } => OfferState {
            nearby: nearby.clone(),
            nearby_loading: false,
            nearby_has_error: false,
            ..state
        },

        Action::FetchNearby {
            phase: Phase::Rejected(_),
            ..
        } => OfferState {
            nearby: Vec::new(),
            nearby_loading: false,
            nearby_has_error: true,
            ..state
        },

        Action::ClearOffer => OfferState::default(),

        _ => state,
    }
}

fn is_latest(state: &OfferState, id: &str) -> bool {
    state.last_fetched_id.as_deref() == Some(id)
}

pub fn reduce_favorites(state: FavoritesState, action: &Action) -> FavoritesState {
    match action {
        Action::FetchFavorites(Phase::Pending) => FavoritesState {
            is_loading: true,
            has_error: false,
            ..state
        },
        Action::FetchFavorites(Phase::Fulfilled(favorites)) => FavoritesState {
            favorites: favorites.clone(),
            is_loading: false,
            has_error: false,
        },
        Action::FetchFavorites(Phase::Rejected(_)) => FavoritesState {
            is_loading: false,
            has_error: true,
            ..state
        },
        _ => state,
    }
}

pub fn reduce_comments(state: CommentsState, action: &Action) -> CommentsState {
    match action {
        Action::FetchComments {
            phase: Phase::Pending,
            ..
        } => CommentsState {
            is_loading: true,
            has_error: false,
            ..state
        },
        Action::FetchComments {
            phase: Phase::Fulfilled(comments),
            ..
        } => CommentsState {
            comments: comments.clone(),
            total_comments: comments.len(),
            is_loading: false,
            has_error: false,
        },
        Action::FetchComments {
            phase: Phase::Rejected(_),
            ..
        } => CommentsState {
            is_loading: false,
            has_error: true,
            ..state
        },

        Action::PostComment {
            phase: Phase::Pending,
            ..
        } => CommentsState {
            is_loading: true,
            ..state
        },
        Action::PostComment {
            phase: Phase::Fulfilled(comment),
            ..
        } => {
            let mut comments = state.comments;
            comments.push(comment.clone());
            CommentsState {
                comments,
                is_loading: false,
                ..state
            }
        }
        Action::PostComment {
            phase: Phase::Rejected(_),
            ..
        } => CommentsState {
            is_loading: false,
            ..state
        },

        _ => state,
    }
}

/// `Unknown` is never re-entered: every outcome maps to `Auth` or `NotAuth`
pub fn reduce_user(state: UserState, action: &Action) -> UserState {
    match action {
        Action::SetUserData(user)
        | Action::CheckAuth(Phase::Fulfilled(user))
        | Action::Login(Phase::Fulfilled(user)) => UserState {
            authorization_status: AuthorizationStatus::Auth,
            user: Some(user.clone()),
        },

        Action::CheckAuth(Phase::Rejected(_)) | Action::Login(Phase::Rejected(_)) => UserState {
            authorization_status: AuthorizationStatus::NotAuth,
            ..state
        },

        Action::ClearUserData | Action::Logout(Phase::Fulfilled(())) => UserState {
            authorization_status: AuthorizationStatus::NotAuth,
            user: None,
        },

        _ => state,
    }
}
