use crate::error::Result;
use crate::models::{
    AuthenticatedUser, CommentDto, Credentials, NewComment, OfferDetail, OfferSummary,
};
use async_trait::async_trait;

/// Network collaborator behind every fetch action
/// The store only talks to the backend through this, so tests can swap in `MockApi`
#[async_trait]
pub trait RentalApi: Send + Sync {
    async fn fetch_offers(&self) -> Result<Vec<OfferSummary>>;

    async fn fetch_offer(&self, id: &str) -> Result<OfferDetail>;

    async fn fetch_nearby(&self, id: &str) -> Result<Vec<OfferSummary>>;

    async fn fetch_favorites(&self) -> Result<Vec<OfferSummary>>;

    /// Mark or unmark an offer as favorite; returns the updated offer
    async fn set_favorite_status(&self, id: &str, is_favorite: bool) -> Result<OfferDetail>;

    async fn fetch_comments(&self, offer_id: &str) -> Result<Vec<CommentDto>>;

    async fn post_comment(&self, offer_id: &str, comment: &NewComment) -> Result<CommentDto>;

    /// Resolve the session token currently held by the token store
    async fn check_auth(&self) -> Result<AuthenticatedUser>;

    async fn login(&self, credentials: &Credentials) -> Result<AuthenticatedUser>;

    async fn logout(&self) -> Result<()>;
}
