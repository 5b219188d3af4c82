//! Actions reduced into the store
//!
//! Every fetch action reports its progress as a [`Phase`]: `Pending` when the
//! request leaves, then exactly one of `Fulfilled` or `Rejected`. The other
//! variants are plain synchronous setters.

use crate::models::{AuthenticatedUser, CityName, CommentDto, OfferDetail, OfferSummary};

/// Lifecycle of one asynchronous fetch
#[derive(Debug, Clone, PartialEq)]
pub enum Phase<T> {
    Pending,
    Fulfilled(T),
    /// Carries the failure reason for logging; reducers never inspect it
    Rejected(String),
}

impl<T> Phase<T> {
    pub fn is_fulfilled(&self) -> bool {
        matches!(self, Phase::Fulfilled(_))
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self, Phase::Rejected(_))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    // === City ===
    SetCity(CityName),

    // === Offers list ===
    FetchOffers(Phase<Vec<OfferSummary>>),

    // === Offer page ===
    /// `id` is the offer the request was made for
    FetchOffer {
        id: String,
        phase: Phase<OfferDetail>,
    },
    FetchNearby {
        id: String,
        phase: Phase<Vec<OfferSummary>>,
    },
    /// Leaving the offer page
    ClearOffer,

    // === Favorites ===
    FetchFavorites(Phase<Vec<OfferSummary>>),
    /// No container reduces this; the cascade of re-fetches follows it
    ToggleFavorite {
        id: String,
        phase: Phase<OfferDetail>,
    },

    // === Reviews ===
    FetchComments {
        offer_id: String,
        phase: Phase<Vec<CommentDto>>,
    },
    PostComment {
        offer_id: String,
        phase: Phase<CommentDto>,
    },

    // === User ===
    CheckAuth(Phase<AuthenticatedUser>),
    Login(Phase<AuthenticatedUser>),
    Logout(Phase<()>),
    SetUserData(AuthenticatedUser),
    ClearUserData,
}

impl Action {
    /// Stable name for logging, e.g. `offer/fetchOffer/pending`
    pub fn name(&self) -> String {
        fn phased<T>(base: &str, phase: &Phase<T>) -> String {
            let suffix = match phase {
                Phase::Pending => "pending",
                Phase::Fulfilled(_) => "fulfilled",
                Phase::Rejected(_) => "rejected",
            };
            format!("{}/{}", base, suffix)
        }

        match self {
            Action::SetCity(_) => "city/setCity".to_string(),
            Action::FetchOffers(phase) => phased("offers/fetchOffers", phase),
            Action::FetchOffer { phase, .. } => phased("offer/fetchOffer", phase),
            Action::FetchNearby { phase, .. } => phased("offer/fetchNearby", phase),
            Action::ClearOffer => "offer/clearOffer".to_string(),
            Action::FetchFavorites(phase) => phased("favorites/fetchFavorites", phase),
            Action::ToggleFavorite { phase, .. } => phased("favorites/toggleFavorite", phase),
            Action::FetchComments { phase, .. } => phased("comments/fetchComments", phase),
            Action::PostComment { phase, .. } => phased("comments/postComment", phase),
            Action::CheckAuth(phase) => phased("user/checkAuth", phase),
            Action::Login(phase) => phased("user/login", phase),
            Action::Logout(phase) => phased("user/logout", phase),
            Action::SetUserData(_) => "user/setUserData".to_string(),
            Action::ClearUserData => "user/clearUserData".to_string(),
        }
    }
}
