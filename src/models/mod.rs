use crate::error::{Error, ValidationError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Shortest review text the backend accepts
pub const COMMENT_MIN_LEN: usize = 50;
/// Longest review text the backend accepts
pub const COMMENT_MAX_LEN: usize = 300;

/// Map coordinates together with the zoom level the map should use
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
    pub zoom: u8,
}

/// Cities the service has listings in, in tab order
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum CityName {
    #[default]
    Paris,
    Cologne,
    Brussels,
    Amsterdam,
    Hamburg,
    Dusseldorf,
}

impl CityName {
    pub const ALL: [CityName; 6] = [
        CityName::Paris,
        CityName::Cologne,
        CityName::Brussels,
        CityName::Amsterdam,
        CityName::Hamburg,
        CityName::Dusseldorf,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CityName::Paris => "Paris",
            CityName::Cologne => "Cologne",
            CityName::Brussels => "Brussels",
            CityName::Amsterdam => "Amsterdam",
            CityName::Hamburg => "Hamburg",
            CityName::Dusseldorf => "Dusseldorf",
        }
    }
}

impl fmt::Display for CityName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CityName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CityName::ALL
            .iter()
            .copied()
            .find(|city| city.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::UnknownCity(s.to_string()))
    }
}

/// City an offer belongs to
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct City {
    pub name: CityName,
    pub location: Location,
}

/// Offer projection used by listings, favorites and nearby places
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OfferSummary {
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub price: u32,
    pub city: City,
    pub location: Location,
    pub is_favorite: bool,
    pub is_premium: bool,
    pub rating: f64,
    pub preview_image: String,
}

/// Full offer as shown on the offer page
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OfferDetail {
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub price: u32,
    pub city: City,
    pub location: Location,
    pub is_favorite: bool,
    pub is_premium: bool,
    pub rating: f64,
    pub description: String,
    pub bedrooms: u32,
    pub goods: Vec<String>,
    pub host: UserSummary,
    pub images: Vec<String>,
    pub max_adults: u32,
}

/// Public view of a user (offer host, review author)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub name: String,
    pub avatar_url: String,
    pub is_pro: bool,
}

/// The signed-in user as returned by the login endpoints
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticatedUser {
    pub name: String,
    pub email: String,
    pub is_pro: bool,
    pub token: String,
}

/// Review as it comes over the wire; `date` is an ISO-8601 string
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CommentDto {
    pub id: String,
    pub date: String,
    pub user: UserSummary,
    pub comment: String,
    pub rating: u8,
}

/// Review ready for display, with a parsed timestamp
#[derive(Debug, Clone, PartialEq)]
pub struct Review {
    pub id: String,
    pub date: DateTime<Utc>,
    pub user: UserSummary,
    pub comment: String,
    pub rating: u8,
}

impl From<&CommentDto> for Review {
    /// Unparseable dates sort as the oldest possible review.
    fn from(dto: &CommentDto) -> Self {
        let date = DateTime::parse_from_rfc3339(&dto.date)
            .map(|date| date.with_timezone(&Utc))
            .unwrap_or(DateTime::<Utc>::MIN_UTC);

        Self {
            id: dto.id.clone(),
            date,
            user: dto.user.clone(),
            comment: dto.comment.clone(),
            rating: dto.rating,
        }
    }
}

/// Review body posted by the signed-in user
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewComment {
    pub comment: String,
    pub rating: u8,
}

impl NewComment {
    pub fn new(comment: impl Into<String>, rating: u8) -> Self {
        Self {
            comment: comment.into(),
            rating,
        }
    }

    /// Check the form before anything is sent to the backend
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !(1..=5).contains(&self.rating) {
            return Err(ValidationError::Rating(self.rating));
        }

        let len = self.comment.chars().count();
        if !(COMMENT_MIN_LEN..=COMMENT_MAX_LEN).contains(&len) {
            return Err(ValidationError::CommentLength(len));
        }

        Ok(())
    }
}

/// Login form
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Outcome of the start-up authorization check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthorizationStatus {
    #[default]
    Unknown,
    Auth,
    NotAuth,
}
