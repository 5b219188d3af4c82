use crate::api::token::TokenStore;
use crate::api::traits::RentalApi;
use crate::api::types::{route, ApiConfig, TOKEN_HEADER};
use crate::error::{Error, Result};
use crate::models::{
    AuthenticatedUser, CommentDto, Credentials, NewComment, OfferDetail, OfferSummary,
};
use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// reqwest-backed client for the rental backend
pub struct HttpApi {
    client: Client,
    config: ApiConfig,
    tokens: Arc<dyn TokenStore>,
}

impl HttpApi {
    pub fn new(config: ApiConfig, tokens: Arc<dyn TokenStore>) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.as_str())
            .build()?;

        Ok(Self {
            client,
            config,
            tokens,
        })
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// Build a request, attaching the session token when one is stored
    fn request(&self, method: Method, route: &str) -> RequestBuilder {
        let url = self.config.url(route);
        debug!("{} {}", method, url);

        let request = self.client.request(method, url);
        match self.tokens.get() {
            Some(token) => request.header(TOKEN_HEADER, token),
            None => request,
        }
    }

    async fn send(&self, request: RequestBuilder, route: &str) -> Result<Response> {
        let response = request.send().await?;
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED {
            warn!("You need to be signed in, for this action. ({})", route);
            return Err(Error::Unauthorized);
        }

        if !status.is_success() {
            warn!("{} returned status: {}", route, status);
            return Err(Error::Status {
                route: route.to_string(),
                status,
            });
        }

        Ok(response)
    }

    async fn get_json<T: DeserializeOwned>(&self, route: &str) -> Result<T> {
        let response = self.send(self.request(Method::GET, route), route).await?;
        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl RentalApi for HttpApi {
    async fn fetch_offers(&self) -> Result<Vec<OfferSummary>> {
        let offers: Vec<OfferSummary> = self.get_json(route::OFFERS).await?;
        info!("Fetched {} offers", offers.len());
        Ok(offers)
    }

    async fn fetch_offer(&self, id: &str) -> Result<OfferDetail> {
        self.get_json(&route::offer(id)).await
    }

    async fn fetch_nearby(&self, id: &str) -> Result<Vec<OfferSummary>> {
        self.get_json(&route::nearby(id)).await
    }

    async fn fetch_favorites(&self) -> Result<Vec<OfferSummary>> {
        self.get_json(route::FAVORITE).await
    }

    async fn set_favorite_status(&self, id: &str, is_favorite: bool) -> Result<OfferDetail> {
        let route = route::favorite_status(id, is_favorite);
        let response = self.send(self.request(Method::POST, &route), &route).await?;
        Ok(response.json().await?)
    }

    async fn fetch_comments(&self, offer_id: &str) -> Result<Vec<CommentDto>> {
        self.get_json(&route::comments(offer_id)).await
    }

    async fn post_comment(&self, offer_id: &str, comment: &NewComment) -> Result<CommentDto> {
        let route = route::comments(offer_id);
        let request = self.request(Method::POST, &route).json(comment);
        let response = self.send(request, &route).await?;
        Ok(response.json().await?)
    }

    async fn check_auth(&self) -> Result<AuthenticatedUser> {
        self.get_json(route::LOGIN).await
    }

    async fn login(&self, credentials: &Credentials) -> Result<AuthenticatedUser> {
        let request = self.request(Method::POST, route::LOGIN).json(credentials);
        let user: AuthenticatedUser = self.send(request, route::LOGIN).await?.json().await?;

        self.tokens.save(&user.token)?;
        info!("Signed in as {}", user.email);
        Ok(user)
    }

    async fn logout(&self) -> Result<()> {
        self.send(self.request(Method::DELETE, route::LOGOUT), route::LOGOUT)
            .await?;

        self.tokens.drop_token()?;
        info!("Signed out");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::token::MemoryTokenStore;
    use std::sync::Mutex;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};

    /// One-shot HTTP server answering each connection with the next scripted response
    struct StubServer {
        base_url: String,
        requests: Arc<Mutex<Vec<String>>>,
    }

    impl StubServer {
        async fn start(responses: Vec<(u16, &'static str)>) -> Self {
            let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
            let base_url = format!("http://{}", listener.local_addr().unwrap());
            let requests = Arc::new(Mutex::new(Vec::new()));

            let seen = Arc::clone(&requests);
            tokio::spawn(async move {
                for (status, body) in responses {
                    let (mut socket, _) = listener.accept().await.unwrap();
                    let request = read_request(&mut socket).await;
                    seen.lock().unwrap().push(request);

                    let reply = format!(
                        "HTTP/1.1 {} Stub\r\nContent-Type: application/json\r\n\
                         Content-Length: {}\r\nConnection: close\r\n\r\n{}",
                        status,
                        body.len(),
                        body
                    );
                    socket.write_all(reply.as_bytes()).await.unwrap();
                    let _ = socket.shutdown().await;
                }
            });

            Self { base_url, requests }
        }

        /// Requests received so far, lowercased
        fn requests(&self) -> Vec<String> {
            self.requests.lock().unwrap().clone()
        }

        fn api(&self, tokens: Arc<MemoryTokenStore>) -> HttpApi {
            let config = ApiConfig {
                base_url: self.base_url.clone(),
                ..ApiConfig::default()
            };
            HttpApi {
                client: Client::builder().no_proxy().build().unwrap(),
                config,
                tokens,
            }
        }
    }

    async fn read_request(socket: &mut TcpStream) -> String {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 1024];

        loop {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);

            if let Some(end) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                let head = String::from_utf8_lossy(&buf[..end]).to_lowercase();
                let length = head
                    .lines()
                    .find_map(|line| line.strip_prefix("content-length:"))
                    .and_then(|value| value.trim().parse::<usize>().ok())
                    .unwrap_or(0);
                if buf.len() >= end + 4 + length {
                    break;
                }
            }
        }

        String::from_utf8_lossy(&buf).to_lowercase()
    }

    const ACCOUNT_JSON: &str =
        r#"{"name":"Oliver","email":"oliver@example.com","isPro":false,"token":"fresh-token"}"#;

    #[tokio::test]
    async fn test_unauthorized_status() {
        let server = StubServer::start(vec![(401, "")]).await;
        let api = server.api(Arc::new(MemoryTokenStore::new()));

        let result = api.check_auth().await;

        assert!(matches!(result, Err(Error::Unauthorized)));
        assert!(server.requests()[0].starts_with("get /login http/1.1"));
    }

    #[tokio::test]
    async fn test_other_failures_keep_route_and_status() {
        let server = StubServer::start(vec![(404, "")]).await;
        let api = server.api(Arc::new(MemoryTokenStore::new()));

        match api.fetch_offer("9").await {
            Err(Error::Status { route, status }) => {
                assert_eq!(route, "/offers/9");
                assert_eq!(status, StatusCode::NOT_FOUND);
            }
            other => panic!("expected status error, got {:?}", other.map(|o| o.id)),
        }
    }

    #[tokio::test]
    async fn test_token_header_only_with_stored_token() {
        let server = StubServer::start(vec![(200, "[]"), (200, "[]")]).await;

        let signed_in = server.api(Arc::new(MemoryTokenStore::with_token("secret-token")));
        assert!(signed_in.fetch_offers().await.unwrap().is_empty());

        let anonymous = server.api(Arc::new(MemoryTokenStore::new()));
        assert!(anonymous.fetch_offers().await.unwrap().is_empty());

        let requests = server.requests();
        assert!(requests[0].starts_with("get /offers http/1.1"));
        assert!(requests[0].contains("x-token: secret-token"));
        assert!(!requests[1].contains("x-token"));
    }

    #[tokio::test]
    async fn test_login_saves_returned_token() {
        let server = StubServer::start(vec![(200, ACCOUNT_JSON)]).await;
        let tokens = Arc::new(MemoryTokenStore::new());
        let api = server.api(Arc::clone(&tokens));

        let credentials = Credentials {
            email: "oliver@example.com".to_string(),
            password: "secret1".to_string(),
        };
        let user = api.login(&credentials).await.unwrap();

        assert_eq!(user.token, "fresh-token");
        assert_eq!(tokens.get(), Some("fresh-token".to_string()));

        let request = &server.requests()[0];
        assert!(request.starts_with("post /login http/1.1"));
        assert!(request.contains(r#""email":"oliver@example.com""#));
    }

    #[tokio::test]
    async fn test_rejected_login_stores_nothing() {
        let server = StubServer::start(vec![(400, "")]).await;
        let tokens = Arc::new(MemoryTokenStore::new());
        let api = server.api(Arc::clone(&tokens));

        let credentials = Credentials {
            email: "nobody".to_string(),
            password: "x".to_string(),
        };
        assert!(api.login(&credentials).await.is_err());
        assert_eq!(tokens.get(), None);
    }

    #[tokio::test]
    async fn test_logout_drops_token_once_confirmed() {
        let server = StubServer::start(vec![(500, ""), (200, "")]).await;
        let tokens = Arc::new(MemoryTokenStore::with_token("abc"));
        let api = server.api(Arc::clone(&tokens));

        assert!(api.logout().await.is_err());
        assert_eq!(tokens.get(), Some("abc".to_string()));

        api.logout().await.unwrap();
        assert_eq!(tokens.get(), None);

        let requests = server.requests();
        assert!(requests[1].starts_with("delete /logout http/1.1"));
        assert!(requests[1].contains("x-token: abc"));
    }
}
