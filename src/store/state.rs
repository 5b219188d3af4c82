//! Application state
//!
//! One container per entity domain. Containers are created once with the
//! shapes below and only change through the reducers in `reducer.rs`.

use crate::models::{
    AuthenticatedUser, AuthorizationStatus, CityName, CommentDto, OfferDetail, OfferSummary,
};
use crate::store::guard::ContainerStatus;

/// Root state: the single source of truth for every page
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppState {
    pub city: CityState,
    pub offers: OffersState,
    pub offer: OfferState,
    pub favorites: FavoritesState,
    pub comments: CommentsState,
    pub user: UserState,
}

/// Selected city tab
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CityState {
    pub city_name: CityName,
}

/// All offers, as returned by the backend (every city, fetch order)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OffersState {
    pub offers: Vec<OfferSummary>,
    pub is_loading: bool,
    pub has_error: bool,
}

/// The offer currently open, plus the places near it
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OfferState {
    pub offer: Option<OfferDetail>,
    pub nearby: Vec<OfferSummary>,
    pub is_loading: bool,
    pub has_error: bool,
    pub nearby_loading: bool,
    pub nearby_has_error: bool,

    /// Id of the most recent detail request; responses for any other id are stale
    pub last_fetched_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FavoritesState {
    pub favorites: Vec<OfferSummary>,
    pub is_loading: bool,

    /// Starts `true`: nothing fetched yet counts as an error, which is what
    /// makes the favorites page issue its first fetch
    pub has_error: bool,
}

impl Default for FavoritesState {
    fn default() -> Self {
        Self {
            favorites: Vec::new(),
            is_loading: false,
            has_error: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommentsState {
    /// Raw reviews in fetch order, with posted ones appended
    pub comments: Vec<CommentDto>,
    /// Count reported by the last successful fetch
    pub total_comments: usize,
    pub is_loading: bool,
    pub has_error: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserState {
    pub authorization_status: AuthorizationStatus,
    pub user: Option<AuthenticatedUser>,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }
}

impl OffersState {
    pub fn status(&self) -> ContainerStatus {
        ContainerStatus::new(self.is_loading, self.has_error)
    }
}

impl OfferState {
    pub fn status(&self) -> ContainerStatus {
        ContainerStatus::new(self.is_loading, self.has_error)
    }

    pub fn nearby_status(&self) -> ContainerStatus {
        ContainerStatus::new(self.nearby_loading, self.nearby_has_error)
    }
}

impl FavoritesState {
    pub fn status(&self) -> ContainerStatus {
        ContainerStatus::new(self.is_loading, self.has_error)
    }
}

impl CommentsState {
    pub fn status(&self) -> ContainerStatus {
        ContainerStatus::new(self.is_loading, self.has_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_shapes() {
        let state = AppState::new();

        assert_eq!(state.city.city_name, CityName::Paris);
        assert!(state.offers.offers.is_empty());
        assert!(!state.offers.is_loading);
        assert!(!state.offers.has_error);

        assert!(state.offer.offer.is_none());
        assert!(state.offer.nearby.is_empty());
        assert!(state.offer.last_fetched_id.is_none());

        assert!(state.comments.comments.is_empty());
        assert_eq!(state.comments.total_comments, 0);
        assert!(!state.comments.has_error);

        assert_eq!(state.user.authorization_status, AuthorizationStatus::Unknown);
        assert!(state.user.user.is_none());
    }

    #[test]
    fn test_favorites_start_in_error() {
        let favorites = FavoritesState::default();
        assert!(favorites.has_error);
        assert!(!favorites.is_loading);
        assert!(favorites.favorites.is_empty());
    }
}
