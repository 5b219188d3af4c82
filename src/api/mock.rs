//! In-memory rental backend for tests
//!
//! Behaves like the real backend closely enough to drive the store end to
//! end: favorites and reviews need a signed-in session, toggling a favorite
//! updates every copy of the offer, and individual operations can be made to
//! fail or to answer late.

use crate::api::traits::RentalApi;
use crate::error::{Error, Result};
use crate::models::{
    AuthenticatedUser, City, CityName, CommentDto, Credentials, Location, NewComment,
    OfferDetail, OfferSummary, UserSummary,
};
use async_trait::async_trait;
use chrono::Utc;
use reqwest::StatusCode;
use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;
use tokio::time::sleep;

#[derive(Debug, Default)]
struct MockData {
    offers: Vec<OfferSummary>,
    details: HashMap<String, OfferDetail>,
    nearby: HashMap<String, Vec<OfferSummary>>,
    comments: HashMap<String, Vec<CommentDto>>,
    account: Option<AuthenticatedUser>,
    token: Option<String>,
    failing: HashSet<&'static str>,
    offer_delays: HashMap<String, Duration>,
    nearby_delays: HashMap<String, Duration>,
    calls: Vec<String>,
}

/// Mock backend; operation names used by [`MockApi::fail`] match the
/// `RentalApi` method names
#[derive(Debug, Default)]
pub struct MockApi {
    data: Mutex<MockData>,
}

impl MockApi {
    pub fn new() -> Self {
        Self::default()
    }

    fn data(&self) -> MutexGuard<'_, MockData> {
        self.data.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn with_offers(self, offers: Vec<OfferSummary>) -> Self {
        self.data().offers = offers;
        self
    }

    pub fn with_detail(self, detail: OfferDetail) -> Self {
        self.data().details.insert(detail.id.clone(), detail);
        self
    }

    pub fn with_nearby(self, id: &str, nearby: Vec<OfferSummary>) -> Self {
        self.data().nearby.insert(id.to_string(), nearby);
        self
    }

    pub fn with_comments(self, offer_id: &str, comments: Vec<CommentDto>) -> Self {
        self.data().comments.insert(offer_id.to_string(), comments);
        self
    }

    /// Register the account `login` accepts
    pub fn with_account(self, account: AuthenticatedUser) -> Self {
        self.data().account = Some(account);
        self
    }

    /// Start with the registered account already signed in
    pub fn signed_in(self) -> Self {
        {
            let mut data = self.data();
            let token = data.account.as_ref().map(|account| account.token.clone());
            data.token = token;
        }
        self
    }

    /// Make an operation fail with a server error until [`MockApi::recover`]
    pub fn fail(&self, operation: &'static str) {
        self.data().failing.insert(operation);
    }

    pub fn recover(&self, operation: &'static str) {
        self.data().failing.remove(operation);
    }

    /// Delay the detail response for one offer id
    pub fn delay_offer(&self, id: &str, delay: Duration) {
        self.data().offer_delays.insert(id.to_string(), delay);
    }

    /// Delay the nearby-places response for one offer id
    pub fn delay_nearby(&self, id: &str, delay: Duration) {
        self.data().nearby_delays.insert(id.to_string(), delay);
    }

    /// Every call made so far, as `operation` or `operation:arg`
    pub fn calls(&self) -> Vec<String> {
        self.data().calls.clone()
    }

    pub fn call_count(&self, operation: &str) -> usize {
        self.data()
            .calls
            .iter()
            .filter(|call| call.split(':').next() == Some(operation))
            .count()
    }

    pub fn token(&self) -> Option<String> {
        self.data().token.clone()
    }

    fn enter(&self, operation: &'static str, arg: Option<&str>) -> Result<()> {
        let mut data = self.data();
        data.calls.push(match arg {
            Some(arg) => format!("{}:{}", operation, arg),
            None => operation.to_string(),
        });

        if data.failing.contains(operation) {
            return Err(Error::Status {
                route: operation.to_string(),
                status: StatusCode::INTERNAL_SERVER_ERROR,
            });
        }
        Ok(())
    }

    fn require_session(&self) -> Result<AuthenticatedUser> {
        let data = self.data();
        match (&data.token, &data.account) {
            (Some(token), Some(account)) if *token == account.token => Ok(account.clone()),
            _ => Err(Error::Unauthorized),
        }
    }

    fn not_found(route: String) -> Error {
        Error::Status {
            route,
            status: StatusCode::NOT_FOUND,
        }
    }
}

#[async_trait]
impl RentalApi for MockApi {
    async fn fetch_offers(&self) -> Result<Vec<OfferSummary>> {
        self.enter("fetch_offers", None)?;
        Ok(self.data().offers.clone())
    }

    async fn fetch_offer(&self, id: &str) -> Result<OfferDetail> {
        self.enter("fetch_offer", Some(id))?;

        let delay = self.data().offer_delays.get(id).copied();
        if let Some(delay) = delay {
            sleep(delay).await;
        }

        self.data()
            .details
            .get(id)
            .cloned()
            .ok_or_else(|| Self::not_found(format!("/offers/{}", id)))
    }

    async fn fetch_nearby(&self, id: &str) -> Result<Vec<OfferSummary>> {
        self.enter("fetch_nearby", Some(id))?;

        let delay = self.data().nearby_delays.get(id).copied();
        if let Some(delay) = delay {
            sleep(delay).await;
        }

        Ok(self.data().nearby.get(id).cloned().unwrap_or_default())
    }

    async fn fetch_favorites(&self) -> Result<Vec<OfferSummary>> {
        self.enter("fetch_favorites", None)?;
        self.require_session()?;

        Ok(self
            .data()
            .offers
            .iter()
            .filter(|offer| offer.is_favorite)
            .cloned()
            .collect())
    }

    async fn set_favorite_status(&self, id: &str, is_favorite: bool) -> Result<OfferDetail> {
        self.enter("set_favorite_status", Some(id))?;
        self.require_session()?;

        let mut data = self.data();
        let MockData {
            offers,
            details,
            nearby,
            ..
        } = &mut *data;

        offers
            .iter_mut()
            .chain(nearby.values_mut().flatten())
            .filter(|offer| offer.id == id)
            .for_each(|offer| offer.is_favorite = is_favorite);

        let detail = details
            .get_mut(id)
            .ok_or_else(|| Self::not_found(format!("/favorite/{}", id)))?;
        detail.is_favorite = is_favorite;
        Ok(detail.clone())
    }

    async fn fetch_comments(&self, offer_id: &str) -> Result<Vec<CommentDto>> {
        self.enter("fetch_comments", Some(offer_id))?;
        Ok(self
            .data()
            .comments
            .get(offer_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn post_comment(&self, offer_id: &str, comment: &NewComment) -> Result<CommentDto> {
        self.enter("post_comment", Some(offer_id))?;
        let account = self.require_session()?;

        let mut data = self.data();
        let comments = data.comments.entry(offer_id.to_string()).or_default();
        let posted = CommentDto {
            id: format!("{}-{}", offer_id, comments.len() + 1),
            date: Utc::now().to_rfc3339(),
            user: UserSummary {
                name: account.name,
                avatar_url: "img/avatar.svg".to_string(),
                is_pro: account.is_pro,
            },
            comment: comment.comment.clone(),
            rating: comment.rating,
        };
        comments.push(posted.clone());
        Ok(posted)
    }

    async fn check_auth(&self) -> Result<AuthenticatedUser> {
        self.enter("check_auth", None)?;
        self.require_session()
    }

    async fn login(&self, credentials: &Credentials) -> Result<AuthenticatedUser> {
        self.enter("login", Some(credentials.email.as_str()))?;

        let mut data = self.data();
        match data.account.clone() {
            Some(account) if account.email == credentials.email => {
                data.token = Some(account.token.clone());
                Ok(account)
            }
            _ => Err(Error::Status {
                route: "/login".to_string(),
                status: StatusCode::BAD_REQUEST,
            }),
        }
    }

    async fn logout(&self) -> Result<()> {
        self.enter("logout", None)?;
        self.data().token = None;
        Ok(())
    }
}

/// Sample entities shared by unit and integration tests
pub mod fixtures {
    use super::*;

    pub fn location(latitude: f64, longitude: f64) -> Location {
        Location {
            latitude,
            longitude,
            zoom: 16,
        }
    }

    pub fn city(name: CityName) -> City {
        City {
            name,
            location: location(48.85661, 2.351499),
        }
    }

    pub fn host() -> UserSummary {
        UserSummary {
            name: "Angelina".to_string(),
            avatar_url: "img/avatar-angelina.jpg".to_string(),
            is_pro: true,
        }
    }

    pub fn account() -> AuthenticatedUser {
        AuthenticatedUser {
            name: "Oliver.conner".to_string(),
            email: "Oliver.conner@gmail.com".to_string(),
            is_pro: false,
            token: "T2xpdmVyLmNvbm5lckBnbWFpbC5jb20=".to_string(),
        }
    }

    pub fn offer(id: &str, city_name: CityName, price: u32, rating: f64) -> OfferSummary {
        OfferSummary {
            id: id.to_string(),
            title: format!("Offer {}", id),
            kind: "apartment".to_string(),
            price,
            city: city(city_name),
            location: location(48.86, 2.35),
            is_favorite: false,
            is_premium: false,
            rating,
            preview_image: format!("img/apartment-{}.jpg", id),
        }
    }

    pub fn detail(id: &str) -> OfferDetail {
        OfferDetail {
            id: id.to_string(),
            title: format!("Offer {}", id),
            kind: "apartment".to_string(),
            price: 120,
            city: city(CityName::Paris),
            location: location(48.865610000000004, 2.350499),
            is_favorite: false,
            is_premium: true,
            rating: 4.8,
            description: "A quiet cozy and picturesque place".to_string(),
            bedrooms: 3,
            goods: vec!["Wi-Fi".to_string(), "Kitchen".to_string()],
            host: host(),
            images: vec!["img/room.jpg".to_string()],
            max_adults: 4,
        }
    }

    /// Summary projection of [`detail`], as the listing endpoints return it
    pub fn summary_of(detail: &OfferDetail) -> OfferSummary {
        OfferSummary {
            id: detail.id.clone(),
            title: detail.title.clone(),
            kind: detail.kind.clone(),
            price: detail.price,
            city: detail.city.clone(),
            location: detail.location,
            is_favorite: detail.is_favorite,
            is_premium: detail.is_premium,
            rating: detail.rating,
            preview_image: format!("img/apartment-{}.jpg", detail.id),
        }
    }

    pub fn comment(id: &str, date: &str) -> CommentDto {
        CommentDto {
            id: id.to_string(),
            date: date.to_string(),
            user: host(),
            comment: format!("Comment {}", id),
            rating: 4,
        }
    }
}
