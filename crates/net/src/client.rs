//! HTTP client with connection pooling and global request spacing

use crate::limiter::RateLimiter;
use mirrorcheck_errors::{Error, NetworkError};
use reqwest::{Client, Method, Request, Response};
use std::sync::Arc;
use std::time::Duration;
use tracing::trace;
use url::Url;

/// Network client configuration
#[derive(Debug, Clone)]
pub struct NetConfig {
    pub timeout: Duration,
    pub connect_timeout: Duration,
    pub pool_idle_timeout: Duration,
    /// Idle connections kept per host; large so that a high fan-out of
    /// comparison tasks never starves waiting for a pooled connection
    pub pool_max_idle_per_host: usize,
    /// Minimum spacing between consecutive request departures
    pub min_request_distance: Duration,
    pub user_agent: String,
}

impl Default for NetConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(60),
            connect_timeout: Duration::from_secs(30),
            pool_idle_timeout: Duration::from_secs(90),
            pool_max_idle_per_host: 75_000,
            min_request_distance: Duration::from_millis(10),
            user_agent: format!("mirrorcheck/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Shared, rate-limited HTTP client
///
/// Cloning is cheap; clones share the connection pool and the limiter.
#[derive(Clone)]
pub struct NetClient {
    client: Client,
    limiter: Arc<RateLimiter>,
    config: NetConfig,
}

impl NetClient {
    /// Create a new network client
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying reqwest client fails to initialize.
    pub fn new(config: NetConfig) -> Result<Self, Error> {
        let client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .pool_idle_timeout(config.pool_idle_timeout)
            .pool_max_idle_per_host(config.pool_max_idle_per_host)
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| NetworkError::ClientBuild(e.to_string()))?;

        Ok(Self {
            client,
            limiter: Arc::new(RateLimiter::new(config.min_request_distance)),
            config,
        })
    }

    /// Create with default configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created with default settings.
    pub fn with_defaults() -> Result<Self, Error> {
        Self::new(NetConfig::default())
    }

    #[must_use]
    pub fn config(&self) -> &NetConfig {
        &self.config
    }

    /// Send a prepared request once the rate limiter allows it
    ///
    /// No retry is attempted; transport errors propagate to the caller.
    ///
    /// # Errors
    ///
    /// Returns an error on timeouts, connection failures or other transport errors.
    pub async fn execute(&self, request: Request) -> Result<Response, Error> {
        let url = request.url().to_string();
        let method = request.method().clone();
        self.limiter.acquire().await;
        trace!(%method, %url, "request departed");
        self.client
            .execute(request)
            .await
            .map_err(|e| convert_error(&e, &url))
    }

    /// Issue a HEAD request
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or the request fails.
    pub async fn head(&self, url: &str) -> Result<Response, Error> {
        self.send(Method::HEAD, url).await
    }

    /// Issue a GET request
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or the request fails.
    pub async fn get(&self, url: &str) -> Result<Response, Error> {
        self.send(Method::GET, url).await
    }

    /// Status code of a HEAD request for `url`
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or the request fails.
    pub async fn status_code(&self, url: &str) -> Result<u16, Error> {
        Ok(self.head(url).await?.status().as_u16())
    }

    /// GET `url` and decode the body as UTF-8 text
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the server answers with an
    /// error status, or the body cannot be read.
    pub async fn body_as_string(&self, url: &str) -> Result<String, Error> {
        let response = self.get(url).await?;

        if !response.status().is_success() {
            return Err(NetworkError::HttpError {
                status: response.status().as_u16(),
                message: format!("{} for {url}", response.status()),
            }
            .into());
        }

        response.text().await.map_err(|e| {
            NetworkError::BodyReadFailed {
                url: url.to_string(),
                message: e.to_string(),
            }
            .into()
        })
    }

    async fn send(&self, method: Method, url: &str) -> Result<Response, Error> {
        let parsed = Url::parse(url).map_err(|e| NetworkError::InvalidUrl(format!("{url}: {e}")))?;
        self.execute(Request::new(method, parsed)).await
    }
}

/// Render the response status the way servers print it, e.g.
/// `HTTP/1.1 503 Service Unavailable`
#[must_use]
pub fn status_line(response: &Response) -> String {
    format!("{:?} {}", response.version(), response.status())
}

fn convert_error(error: &reqwest::Error, url: &str) -> Error {
    if error.is_timeout() {
        NetworkError::Timeout {
            url: url.to_string(),
        }
        .into()
    } else if error.is_connect() {
        NetworkError::ConnectionRefused(format!("{url}: {error}")).into()
    } else {
        NetworkError::RequestFailed {
            url: url.to_string(),
            message: error.to_string(),
        }
        .into()
    }
}
