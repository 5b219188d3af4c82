//! Network operations as dispatchable lifecycles
//!
//! Each operation dispatches `Pending`, awaits the backend and dispatches
//! `Fulfilled` or `Rejected`. The outcome is also returned so callers can
//! chain follow-up work (e.g. nearby places only after the offer arrived).

use super::actions::{Action, Phase};
use super::guard::require_auth;
use super::{selectors, Store};
use crate::api::RentalApi;
use crate::error::{Error, Result};
use crate::models::{
    AuthenticatedUser, CityName, CommentDto, Credentials, NewComment, OfferDetail, OfferSummary,
};
use std::future::Future;
use tracing::{debug, info, warn};

/// Where a favorite toggle was triggered; decides what gets re-fetched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FavoriteContext {
    /// Card in the main page listing
    PlaceCard,
    /// Card in the "other places in the neighbourhood" block
    NearPlace,
    /// Button on the offer page itself
    OfferPage,
    FavoritesPage,
}

async fn run<T, F>(
    store: &Store,
    wrap: impl Fn(Phase<T>) -> Action,
    request: F,
) -> Result<T>
where
    T: Clone,
    F: Future<Output = Result<T>>,
{
    store.dispatch(wrap(Phase::Pending));

    match request.await {
        Ok(payload) => {
            store.dispatch(wrap(Phase::Fulfilled(payload.clone())));
            Ok(payload)
        }
        Err(err) => {
            let rejected = wrap(Phase::Rejected(err.to_string()));
            warn!("{} ({})", rejected.name(), err);
            store.dispatch(rejected);
            Err(err)
        }
    }
}

pub fn select_city(store: &Store, city: CityName) {
    store.dispatch(Action::SetCity(city));
}

pub async fn fetch_offers<A>(store: &Store, api: &A) -> Result<Vec<OfferSummary>>
where
    A: RentalApi + ?Sized,
{
    run(store, Action::FetchOffers, api.fetch_offers()).await
}

pub async fn fetch_offer<A>(store: &Store, api: &A, id: &str) -> Result<OfferDetail>
where
    A: RentalApi + ?Sized,
{
    let wrap = |phase| Action::FetchOffer {
        id: id.to_string(),
        phase,
    };
    run(store, wrap, api.fetch_offer(id)).await
}

pub async fn fetch_nearby<A>(store: &Store, api: &A, id: &str) -> Result<Vec<OfferSummary>>
where
    A: RentalApi + ?Sized,
{
    let wrap = |phase| Action::FetchNearby {
        id: id.to_string(),
        phase,
    };
    run(store, wrap, api.fetch_nearby(id)).await
}

pub async fn fetch_favorites<A>(store: &Store, api: &A) -> Result<Vec<OfferSummary>>
where
    A: RentalApi + ?Sized,
{
    run(store, Action::FetchFavorites, api.fetch_favorites()).await
}

pub async fn fetch_comments<A>(store: &Store, api: &A, offer_id: &str) -> Result<Vec<CommentDto>>
where
    A: RentalApi + ?Sized,
{
    let wrap = |phase| Action::FetchComments {
        offer_id: offer_id.to_string(),
        phase,
    };
    run(store, wrap, api.fetch_comments(offer_id)).await
}

/// Post a review; invalid forms and signed-out users never reach the backend
pub async fn post_comment<A>(
    store: &Store,
    api: &A,
    offer_id: &str,
    comment: &NewComment,
) -> Result<CommentDto>
where
    A: RentalApi + ?Sized,
{
    require_auth(store.select(selectors::authorization_status))
        .map_err(|_| Error::AuthRequired("posting a review"))?;
    comment.validate()?;

    let wrap = |phase| Action::PostComment {
        offer_id: offer_id.to_string(),
        phase,
    };
    run(store, wrap, api.post_comment(offer_id, comment)).await
}

/// Set the favorite flag of an offer, then re-fetch every view that shows it
pub async fn toggle_favorite<A>(
    store: &Store,
    api: &A,
    id: &str,
    is_favorite: bool,
    context: FavoriteContext,
) -> Result<OfferDetail>
where
    A: RentalApi + ?Sized,
{
    require_auth(store.select(selectors::authorization_status))
        .map_err(|_| Error::AuthRequired("changing favorites"))?;

    let wrap = |phase| Action::ToggleFavorite {
        id: id.to_string(),
        phase,
    };
    let updated = run(store, wrap, api.set_favorite_status(id, is_favorite)).await?;

    refresh_after_toggle(store, api, id, context).await;
    Ok(updated)
}

async fn refresh_after_toggle<A>(store: &Store, api: &A, id: &str, context: FavoriteContext)
where
    A: RentalApi + ?Sized,
{
    let current_id = store.select(|state| selectors::offer(state).map(|offer| offer.id.clone()));
    debug!("Refreshing views after favorite toggle on {} ({:?})", id, context);

    let dependent = async {
        match (context, current_id) {
            (FavoriteContext::OfferPage, _) => {
                let _ = fetch_offer(store, api, id).await;
            }
            (FavoriteContext::NearPlace, Some(current_id)) => {
                let _ = fetch_nearby(store, api, &current_id).await;
            }
            _ => {}
        }
    };

    // Failures already sit in the containers' error flags
    let _ = tokio::join!(fetch_offers(store, api), fetch_favorites(store, api), dependent);
}

pub async fn check_auth<A>(store: &Store, api: &A) -> Result<AuthenticatedUser>
where
    A: RentalApi + ?Sized,
{
    run(store, Action::CheckAuth, api.check_auth()).await
}

/// Sign in, then refresh the listing since favorite flags depend on the session
pub async fn login<A>(
    store: &Store,
    api: &A,
    credentials: &Credentials,
) -> Result<AuthenticatedUser>
where
    A: RentalApi + ?Sized,
{
    let user = run(store, Action::Login, api.login(credentials)).await?;
    info!("Authorized as {}", user.email);

    let _ = fetch_offers(store, api).await;
    Ok(user)
}

pub async fn logout<A>(store: &Store, api: &A) -> Result<()>
where
    A: RentalApi + ?Sized,
{
    run(store, Action::Logout, api.logout()).await
}

/// Start-up: resolve the session and load the listing side by side
pub async fn bootstrap<A>(store: &Store, api: &A)
where
    A: RentalApi + ?Sized,
{
    let (auth, offers) = tokio::join!(check_auth(store, api), fetch_offers(store, api));

    match auth {
        Ok(user) => info!("Session restored for {}", user.email),
        Err(_) => info!("No active session"),
    }
    if let Ok(offers) = offers {
        info!("Loaded {} offers", offers.len());
    }
}

/// Load the offer page: the offer first, nearby places once it arrived, and
/// reviews alongside for signed-in users
pub async fn open_offer<A>(store: &Store, api: &A, id: &str) -> Result<OfferDetail>
where
    A: RentalApi + ?Sized,
{
    let detail_then_nearby = async {
        let detail = fetch_offer(store, api, id).await?;
        let _ = fetch_nearby(store, api, id).await;
        Ok::<_, Error>(detail)
    };

    let comments = async {
        if store.select(selectors::is_authorized) {
            let _ = fetch_comments(store, api, id).await;
        }
    };

    let (detail, ()) = tokio::join!(detail_then_nearby, comments);
    detail
}

/// Leaving the offer page; late responses for it are dropped from now on
pub fn close_offer(store: &Store) {
    store.dispatch(Action::ClearOffer);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::mock::fixtures;
    use crate::api::MockApi;
    use crate::models::AuthorizationStatus;

    #[tokio::test]
    async fn test_fetch_offers_fulfills() {
        let store = Store::new();
        let api = MockApi::new().with_offers(vec![
            fixtures::offer("1", CityName::Paris, 100, 4.0),
            fixtures::offer("2", CityName::Cologne, 100, 4.0),
        ]);

        let offers = fetch_offers(&store, &api).await.unwrap();

        assert_eq!(offers.len(), 2);
        let state = store.state();
        assert_eq!(state.offers.offers.len(), 2);
        assert!(!state.offers.is_loading);
        assert!(!state.offers.has_error);
    }

    #[tokio::test]
    async fn test_fetch_offers_rejects() {
        let store = Store::new();
        let api = MockApi::new();
        api.fail("fetch_offers");

        assert!(fetch_offers(&store, &api).await.is_err());
        assert!(store.select(selectors::offers_error));
        assert!(!store.select(selectors::offers_loading));
    }

    #[tokio::test]
    async fn test_invalid_review_never_reaches_backend() {
        let store = Store::new();
        store.dispatch(Action::SetUserData(fixtures::account()));
        let api = MockApi::new().with_account(fixtures::account()).signed_in();

        let result = post_comment(&store, &api, "1", &NewComment::new("too short", 5)).await;

        assert!(matches!(result, Err(Error::Validation(_))));
        assert_eq!(api.call_count("post_comment"), 0);
        assert!(!store.select(selectors::comments_loading));
    }

    #[tokio::test]
    async fn test_signed_out_toggle_is_refused() {
        let store = Store::new();
        let api = MockApi::new().with_detail(fixtures::detail("1"));

        let result = toggle_favorite(&store, &api, "1", true, FavoriteContext::PlaceCard).await;

        assert!(matches!(result, Err(Error::AuthRequired(_))));
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn test_check_auth_without_session() {
        let store = Store::new();
        let api = MockApi::new().with_account(fixtures::account());

        assert!(check_auth(&store, &api).await.is_err());
        assert_eq!(
            store.select(selectors::authorization_status),
            AuthorizationStatus::NotAuth
        );
    }
}
