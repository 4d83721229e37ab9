//! HTTP retrieval with a browser-like header set.
//!
//! A single [`Fetcher`] is built from [`FetchConfig`] and reused for the feed
//! and the homepage, so both requests share one user agent and one timeout.

use crate::config::FetchConfig;
use crate::error::FetchError;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Client;
use tracing::{debug, instrument};

/// Issues GET requests and returns the response body as text.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    /// Build the underlying client from the configured headers and timeout.
    ///
    /// # Arguments
    ///
    /// * `config` - User agent, extra headers and per-request timeout
    ///
    /// # Returns
    ///
    /// A ready [`Fetcher`], or [`FetchError::InvalidHeader`] /
    /// [`FetchError::Client`] when the configuration cannot be applied.
    pub fn new(config: &FetchConfig) -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();
        for (name, value) in &config.headers {
            let header_name =
                HeaderName::from_bytes(name.as_bytes()).map_err(|e| FetchError::InvalidHeader {
                    name: name.clone(),
                    reason: e.to_string(),
                })?;
            let header_value = HeaderValue::from_str(value).map_err(|e| FetchError::InvalidHeader {
                name: name.clone(),
                reason: e.to_string(),
            })?;
            headers.insert(header_name, header_value);
        }

        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .default_headers(headers)
            .timeout(config.timeout())
            .build()
            .map_err(FetchError::Client)?;

        Ok(Self { client })
    }

    /// GET `url` and return the decoded response body.
    ///
    /// # Arguments
    ///
    /// * `url` - Absolute URL of the feed or page
    ///
    /// # Returns
    ///
    /// The body text, [`FetchError::Status`] for non-2xx responses, or
    /// [`FetchError::Transport`] for connection failures and timeouts.
    #[instrument(level = "info", skip(self))]
    pub async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| FetchError::Transport {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|source| FetchError::Transport {
                url: url.to_string(),
                source,
            })?;
        debug!(bytes = body.len(), status = status.as_u16(), "Fetched body");
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderMap as AxumHeaders, StatusCode};
    use axum::routing::get;
    use axum::Router;
    use std::time::Duration;

    async fn user_agent_handler(headers: AxumHeaders) -> String {
        let ua = headers
            .get("user-agent")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();
        let lang = headers
            .get("accept-language")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();
        format!("{ua}|{lang}")
    }

    async fn spawn_test_server() -> (String, tokio::task::JoinHandle<()>) {
        let app = Router::new()
            .route("/ok", get(|| async { "héllo" }))
            .route("/missing", get(|| async { (StatusCode::NOT_FOUND, "gone") }))
            .route("/headers", get(user_agent_handler))
            .route(
                "/slow",
                get(|| async {
                    tokio::time::sleep(Duration::from_secs(3)).await;
                    "late"
                }),
            );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("listener should bind");
        let address = listener.local_addr().expect("local addr should exist");
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("server should run");
        });
        (format!("http://{address}"), handle)
    }

    #[tokio::test]
    async fn test_fetch_returns_body() {
        let (base, server) = spawn_test_server().await;
        let fetcher = Fetcher::new(&FetchConfig::default()).unwrap();

        let body = fetcher.fetch(&format!("{base}/ok")).await.unwrap();
        assert_eq!(body, "héllo");
        server.abort();
    }

    #[tokio::test]
    async fn test_fetch_sends_browser_headers() {
        let (base, server) = spawn_test_server().await;
        let fetcher = Fetcher::new(&FetchConfig::default()).unwrap();

        let body = fetcher.fetch(&format!("{base}/headers")).await.unwrap();
        let (ua, lang) = body.split_once('|').unwrap();
        assert!(ua.starts_with("Mozilla/5.0"), "unexpected UA {ua}");
        assert_eq!(lang, "en-US,en;q=0.9");
        server.abort();
    }

    #[tokio::test]
    async fn test_fetch_non_success_status() {
        let (base, server) = spawn_test_server().await;
        let fetcher = Fetcher::new(&FetchConfig::default()).unwrap();

        let err = fetcher.fetch(&format!("{base}/missing")).await.unwrap_err();
        assert!(matches!(err, FetchError::Status { status: 404, .. }));
        server.abort();
    }

    #[tokio::test]
    async fn test_fetch_times_out() {
        let (base, server) = spawn_test_server().await;
        let config = FetchConfig {
            timeout_secs: 1,
            ..FetchConfig::default()
        };
        let fetcher = Fetcher::new(&config).unwrap();

        let err = fetcher.fetch(&format!("{base}/slow")).await.unwrap_err();
        assert!(matches!(err, FetchError::Transport { .. }));
        server.abort();
    }

    #[tokio::test]
    async fn test_fetch_connection_refused() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();
        drop(listener);

        let fetcher = Fetcher::new(&FetchConfig::default()).unwrap();
        let err = fetcher.fetch(&format!("http://{address}/")).await.unwrap_err();
        assert!(matches!(err, FetchError::Transport { .. }));
    }

    #[test]
    fn test_invalid_header_rejected() {
        let mut config = FetchConfig::default();
        config
            .headers
            .insert("Bad Header".to_string(), "value".to_string());

        let err = Fetcher::new(&config).unwrap_err();
        assert!(matches!(err, FetchError::InvalidHeader { .. }));
    }
}
