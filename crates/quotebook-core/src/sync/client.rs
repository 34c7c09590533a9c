//! HTTP client for the remote quote endpoint
//!
//! One URL serves both directions: `GET` lists records, `POST` accepts a
//! single quote as JSON.

use tracing::debug;

use super::message::decode_records;
use crate::config::DEFAULT_FETCH_LIMIT;
use crate::error::Result;
use crate::models::Quote;

const USER_AGENT: &str = concat!("quotebook/", env!("CARGO_PKG_VERSION"));

/// Client for the remote endpoint
#[derive(Debug, Clone)]
pub struct RemoteClient {
    http: reqwest::Client,
    url: String,
    fetch_limit: usize,
}

impl RemoteClient {
    /// Create a client for `url`
    ///
    /// No request timeout is set beyond the transport defaults.
    pub fn new(url: &str) -> Result<Self> {
        let http = reqwest::Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self {
            http,
            url: url.to_string(),
            fetch_limit: DEFAULT_FETCH_LIMIT,
        })
    }

    /// Keep at most `limit` records per fetch
    pub fn with_fetch_limit(mut self, limit: usize) -> Self {
        self.fetch_limit = limit;
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn fetch_limit(&self) -> usize {
        self.fetch_limit
    }

    /// Fetch the remote snapshot as quotes
    ///
    /// Non-success statuses and undecodable bodies are errors.
    pub async fn fetch_quotes(&self) -> Result<Vec<Quote>> {
        debug!("GET {}", self.url);
        let response = self.http.get(&self.url).send().await?.error_for_status()?;
        let body = response.text().await?;
        let quotes = decode_records(&body, self.fetch_limit)?;
        debug!("Fetched {} quotes", quotes.len());
        Ok(quotes)
    }

    /// Send one quote to the endpoint
    ///
    /// The response is not inspected; only transport failures are errors.
    pub async fn post_quote(&self, quote: &Quote) -> Result<()> {
        debug!("POST {}", self.url);
        self.http.post(&self.url).json(quote).send().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::QuoteError;
    use mockito::{Matcher, Server};

    #[test]
    fn test_client_new() {
        let client = RemoteClient::new("http://localhost:3000/posts").unwrap();
        assert_eq!(client.url(), "http://localhost:3000/posts");
        assert_eq!(client.fetch_limit(), DEFAULT_FETCH_LIMIT);
        assert_eq!(client.with_fetch_limit(2).fetch_limit(), 2);
    }

    #[tokio::test]
    async fn test_fetch_quotes() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/posts")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"[{"id":1,"title":"T1"},{"id":2,"title":"T2"}]"#)
            .create_async()
            .await;

        let client = RemoteClient::new(&format!("{}/posts", server.url())).unwrap();
        let quotes = client.fetch_quotes().await.unwrap();

        assert_eq!(
            quotes,
            vec![
                Quote::unchecked("T1", "Synced"),
                Quote::unchecked("T2", "Synced"),
            ]
        );
    }

    #[tokio::test]
    async fn test_fetch_quotes_server_error() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/posts")
            .with_status(502)
            .with_body("bad gateway")
            .create_async()
            .await;

        let client = RemoteClient::new(&format!("{}/posts", server.url())).unwrap();
        let err = client.fetch_quotes().await.unwrap_err();
        assert!(matches!(err, QuoteError::Network(_)));
    }

    #[tokio::test]
    async fn test_fetch_quotes_bad_body() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/posts")
            .with_status(200)
            .with_body("not json")
            .create_async()
            .await;

        let client = RemoteClient::new(&format!("{}/posts", server.url())).unwrap();
        let err = client.fetch_quotes().await.unwrap_err();
        assert!(matches!(err, QuoteError::Serialization(_)));
    }

    #[tokio::test]
    async fn test_post_quote_sends_json() {
        let mut server = Server::new_async().await;
        let m = server
            .mock("POST", "/posts")
            .match_header("content-type", "application/json")
            .match_body(Matcher::Json(serde_json::json!({
                "text": "Do Z",
                "category": "A"
            })))
            .with_status(201)
            .create_async()
            .await;

        let client = RemoteClient::new(&format!("{}/posts", server.url())).unwrap();
        client
            .post_quote(&Quote::unchecked("Do Z", "A"))
            .await
            .unwrap();

        m.assert_async().await;
    }

    #[tokio::test]
    async fn test_post_quote_ignores_response_status() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("POST", "/posts")
            .with_status(500)
            .create_async()
            .await;

        let client = RemoteClient::new(&format!("{}/posts", server.url())).unwrap();
        assert!(client
            .post_quote(&Quote::unchecked("Do Z", "A"))
            .await
            .is_ok());
    }
}
