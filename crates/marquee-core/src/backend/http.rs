use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::Client;

use crate::{Error, Result};

const CLIENT_USER_AGENT: &str = concat!("marquee/", env!("CARGO_PKG_VERSION"));

/// Build the HTTP client shared by backend collaborators
pub(crate) fn build_client(timeout_secs: u64) -> Result<Client> {
    Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .gzip(true)
        .deflate(true)
        .brotli(true)
        .redirect(reqwest::redirect::Policy::limited(5))
        .build()
        .map_err(Error::Http)
}

/// Headers carrying the public API key, as the hosted service expects
pub(crate) fn build_headers(api_key: Option<&str>) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers.insert(USER_AGENT, HeaderValue::from_static(CLIENT_USER_AGENT));

    if let Some(key) = api_key {
        if let Ok(value) = HeaderValue::from_str(key) {
            headers.insert("apikey", value);
        } else {
            tracing::warn!("Backend API key contains invalid header characters, sending without it");
            return headers;
        }
        if let Ok(bearer) = HeaderValue::from_str(&format!("Bearer {}", key)) {
            headers.insert(AUTHORIZATION, bearer);
        }
    }
    headers
}
