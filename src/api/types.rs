use std::path::PathBuf;
use std::time::Duration;

pub const BACKEND_URL: &str = "https://15.design.htmlacademy.pro/six-cities";
pub const REQUEST_TIMEOUT: Duration = Duration::from_millis(5000);
pub const TOKEN_HEADER: &str = "X-Token";

/// Connection settings for the rental backend
#[derive(Debug, Clone, PartialEq)]
pub struct ApiConfig {
    /// Base URL every route is appended to
    pub base_url: String,
    /// Per-request timeout
    pub timeout: Duration,
    /// Where the file token store keeps the session token
    pub token_path: PathBuf,
    pub user_agent: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: BACKEND_URL.to_string(),
            timeout: REQUEST_TIMEOUT,
            token_path: PathBuf::from(".stay-scout-token.json"),
            user_agent: format!("stay-scout/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl ApiConfig {
    /// Defaults overridden by `STAY_SCOUT_BASE_URL`, `STAY_SCOUT_TIMEOUT_MS`
    /// and `STAY_SCOUT_TOKEN_PATH`
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let base_url = lookup("STAY_SCOUT_BASE_URL")
            .map(|url| url.trim_end_matches('/').to_string())
            .filter(|url| !url.is_empty())
            .unwrap_or(defaults.base_url);

        let timeout = lookup("STAY_SCOUT_TIMEOUT_MS")
            .and_then(|ms| ms.parse().ok())
            .map(Duration::from_millis)
            .unwrap_or(defaults.timeout);

        let token_path = lookup("STAY_SCOUT_TOKEN_PATH")
            .map(PathBuf::from)
            .unwrap_or(defaults.token_path);

        Self {
            base_url,
            timeout,
            token_path,
            user_agent: defaults.user_agent,
        }
    }

    pub fn url(&self, route: &str) -> String {
        format!("{}{}", self.base_url, route)
    }
}

/// Backend routes
pub mod route {
    pub const OFFERS: &str = "/offers";
    pub const FAVORITE: &str = "/favorite";
    pub const LOGIN: &str = "/login";
    pub const LOGOUT: &str = "/logout";

    pub fn offer(id: &str) -> String {
        format!("/offers/{}", id)
    }

    pub fn nearby(id: &str) -> String {
        format!("/offers/{}/nearby", id)
    }

    pub fn favorite_status(id: &str, is_favorite: bool) -> String {
        format!("/favorite/{}/{}", id, u8::from(is_favorite))
    }

    pub fn comments(offer_id: &str) -> String {
        format!("/comments/{}", offer_id)
    }
}
