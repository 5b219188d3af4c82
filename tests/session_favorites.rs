//! Session lifecycle and favorite toggles driven through the store

use stay_scout::api::mock::fixtures;
use stay_scout::api::MockApi;
use stay_scout::models::{AuthorizationStatus, CityName, Credentials};
use stay_scout::store::{selectors, thunks, FavoriteContext, PageGuard, PageView, Route, Store};
use stay_scout::Error;

fn catalogue() -> MockApi {
    let first = fixtures::detail("1");
    let second = fixtures::detail("2");

    MockApi::new()
        .with_offers(vec![
            fixtures::summary_of(&first),
            fixtures::summary_of(&second),
            fixtures::offer("3", CityName::Amsterdam, 80, 3.5),
        ])
        .with_detail(first)
        .with_detail(second.clone())
        .with_nearby("1", vec![fixtures::summary_of(&second)])
        .with_account(fixtures::account())
}

fn credentials() -> Credentials {
    Credentials {
        email: fixtures::account().email,
        password: "secret1".to_string(),
    }
}

#[tokio::test]
async fn test_bootstrap_signed_out() {
    let store = Store::new();
    let api = catalogue();

    assert!(!store.select(selectors::is_auth_checked));
    thunks::bootstrap(&store, &api).await;

    let state = store.state();
    assert!(selectors::is_auth_checked(&state));
    assert_eq!(selectors::authorization_status(&state), AuthorizationStatus::NotAuth);
    assert_eq!(selectors::offers(&state).len(), 3);
    assert_eq!(selectors::offers_in_city(&state).len(), 2);
}

#[tokio::test]
async fn test_bootstrap_restores_session() {
    let store = Store::new();
    let api = catalogue().signed_in();

    thunks::bootstrap(&store, &api).await;

    let state = store.state();
    assert!(selectors::is_authorized(&state));
    assert_eq!(
        selectors::user(&state).map(|user| user.email.as_str()),
        Some("Oliver.conner@gmail.com")
    );
}

#[tokio::test]
async fn test_login_then_logout() {
    let store = Store::new();
    let api = catalogue();
    thunks::bootstrap(&store, &api).await;

    let user = thunks::login(&store, &api, &credentials()).await.unwrap();
    assert_eq!(user.email, "Oliver.conner@gmail.com");
    assert_eq!(api.token(), Some(user.token.clone()));
    assert!(store.select(selectors::is_authorized));
    // listing is reloaded for the new session
    assert_eq!(api.call_count("fetch_offers"), 2);

    thunks::logout(&store, &api).await.unwrap();
    let state = store.state();
    assert_eq!(selectors::authorization_status(&state), AuthorizationStatus::NotAuth);
    assert!(selectors::user(&state).is_none());
    assert!(api.token().is_none());
}

#[tokio::test]
async fn test_rejected_login_keeps_signed_out() {
    let store = Store::new();
    let api = catalogue();

    let wrong = Credentials {
        email: "nobody@example.com".to_string(),
        password: "secret1".to_string(),
    };
    assert!(thunks::login(&store, &api, &wrong).await.is_err());

    assert_eq!(store.select(selectors::authorization_status), AuthorizationStatus::NotAuth);
    assert_eq!(api.call_count("fetch_offers"), 0);
}

#[tokio::test]
async fn test_toggle_from_place_card_refreshes_lists() {
    let store = Store::new();
    let api = catalogue().signed_in();
    thunks::bootstrap(&store, &api).await;

    let updated = thunks::toggle_favorite(&store, &api, "2", true, FavoriteContext::PlaceCard)
        .await
        .unwrap();
    assert!(updated.is_favorite);

    assert_eq!(api.call_count("fetch_favorites"), 1);
    assert_eq!(api.call_count("fetch_offer"), 0);
    assert_eq!(api.call_count("fetch_nearby"), 0);

    let state = store.state();
    let favorite_ids: Vec<&str> = state.favorites.favorites.iter().map(|o| o.id.as_str()).collect();
    assert_eq!(favorite_ids, vec!["2"]);
    assert!(state.offers.offers.iter().any(|o| o.id == "2" && o.is_favorite));
    assert_eq!(selectors::favorite_cities(&state), vec![CityName::Paris]);
}

#[tokio::test]
async fn test_toggle_on_offer_page_refetches_detail() {
    let store = Store::new();
    let api = catalogue().signed_in();
    thunks::bootstrap(&store, &api).await;
    thunks::open_offer(&store, &api, "1").await.unwrap();

    thunks::toggle_favorite(&store, &api, "1", true, FavoriteContext::OfferPage)
        .await
        .unwrap();

    assert_eq!(api.call_count("fetch_offer"), 2);
    let state = store.state();
    assert_eq!(selectors::offer(&state).map(|offer| offer.is_favorite), Some(true));
}

#[tokio::test]
async fn test_toggle_near_place_refetches_nearby_of_open_offer() {
    let store = Store::new();
    let api = catalogue().signed_in();
    thunks::bootstrap(&store, &api).await;
    thunks::open_offer(&store, &api, "1").await.unwrap();

    thunks::toggle_favorite(&store, &api, "2", true, FavoriteContext::NearPlace)
        .await
        .unwrap();

    let nearby_calls: Vec<String> = api
        .calls()
        .into_iter()
        .filter(|call| call.starts_with("fetch_nearby"))
        .collect();
    assert_eq!(nearby_calls, vec!["fetch_nearby:1", "fetch_nearby:1"]);

    let state = store.state();
    assert!(selectors::filtered_nearby(&state)[0].is_favorite);
}

#[tokio::test]
async fn test_failed_toggle_skips_refresh() {
    let store = Store::new();
    let api = catalogue().signed_in();
    thunks::bootstrap(&store, &api).await;
    api.fail("set_favorite_status");

    let context = FavoriteContext::FavoritesPage;
    let result = thunks::toggle_favorite(&store, &api, "1", true, context).await;

    assert!(matches!(result, Err(Error::Status { .. })));
    assert_eq!(api.call_count("fetch_favorites"), 0);
}

#[tokio::test]
async fn test_favorites_page_refetches_once() {
    let store = Store::new();
    let api = catalogue().signed_in();
    thunks::bootstrap(&store, &api).await;
    thunks::toggle_favorite(&store, &api, "2", true, FavoriteContext::PlaceCard)
        .await
        .unwrap();

    // a fresh store has never fetched favorites
    let store = Store::new();
    let mut guard = PageGuard::refetching(1);
    assert_eq!(guard.evaluate(store.select(|s| s.favorites.status()), true), PageView::Refetch);

    thunks::fetch_favorites(&store, &api).await.unwrap();
    let is_empty = store.select(|s| s.favorites.favorites.is_empty());
    assert_eq!(guard.evaluate(store.select(|s| s.favorites.status()), is_empty), PageView::Content);
    assert_eq!(
        store.select(|s| selectors::favorites_in_city(s, CityName::Paris)).len(),
        1
    );
}

#[tokio::test]
async fn test_favorites_page_gives_up_after_budget() {
    let store = Store::new();
    let api = catalogue();
    let mut guard = PageGuard::refetching(1);

    assert_eq!(guard.evaluate(store.select(|s| s.favorites.status()), true), PageView::Refetch);
    assert!(thunks::fetch_favorites(&store, &api).await.is_err());

    assert_eq!(
        guard.evaluate(store.select(|s| s.favorites.status()), true),
        PageView::Redirect(Route::NotFound)
    );
}
