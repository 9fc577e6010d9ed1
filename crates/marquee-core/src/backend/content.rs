use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use super::http::{build_client, build_headers};
use crate::config::AppConfig;
use crate::{Error, Result};

/// One row from the hosted database
pub type Record = serde_json::Map<String, Value>;

/// Equality filter on a single column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    pub field: String,
    pub value: String,
}

impl Filter {
    pub fn eq(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
        }
    }
}

impl FromStr for Filter {
    type Err = Error;

    /// Parse `field=value`
    fn from_str(s: &str) -> Result<Self> {
        match s.split_once('=') {
            Some((field, value)) if is_identifier(field.trim()) => {
                Ok(Filter::eq(field.trim(), value.trim()))
            }
            _ => Err(Error::Config(format!("Invalid filter '{}', expected field=value", s))),
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.field, self.value)
    }
}

/// Collection and column names are plain identifiers
fn is_identifier(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Fetches optional remote records
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// First record of `collection` matching `filter`, or `None`
    async fn fetch_one(&self, collection: &str, filter: Option<&Filter>) -> Result<Option<Record>>;
}

/// REST client for the hosted database (`/rest/v1/<collection>`)
pub struct HttpContentSource {
    client: Client,
    base_url: Url,
    api_key: Option<String>,
}

impl HttpContentSource {
    pub fn new(config: &AppConfig) -> Result<Self> {
        let base = config
            .backend
            .content_base_url
            .as_deref()
            .ok_or_else(|| Error::Config("backend.content_base_url is not set".to_string()))?;
        Self::with_base_url(
            Url::parse(base)?,
            config.backend.api_key.clone(),
            config.backend.request_timeout_secs,
        )
    }

    pub fn with_base_url(base_url: Url, api_key: Option<String>, timeout_secs: u64) -> Result<Self> {
        Ok(Self {
            client: build_client(timeout_secs)?,
            base_url,
            api_key,
        })
    }

    /// Build the query URL for a single-row lookup
    pub fn query_url(&self, collection: &str, filter: Option<&Filter>) -> Result<Url> {
        if !is_identifier(collection) {
            return Err(Error::FetchFailed(format!("Invalid collection name '{}'", collection)));
        }

        let base = self.base_url.as_str().trim_end_matches('/');
        let mut url = Url::parse(&format!("{}/rest/v1/{}", base, collection))?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("select", "*");
            if let Some(filter) = filter {
                query.append_pair(&filter.field, &format!("eq.{}", filter.value));
            }
            query.append_pair("limit", "1");
        }
        Ok(url)
    }
}

#[async_trait]
impl ContentSource for HttpContentSource {
    async fn fetch_one(&self, collection: &str, filter: Option<&Filter>) -> Result<Option<Record>> {
        let url = self.query_url(collection, filter)?;
        debug!(%url, "Fetching content record");

        let response = self
            .client
            .get(url)
            .headers(build_headers(self.api_key.as_deref()))
            .send()
            .await
            .map_err(|e| Error::FetchFailed(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(Error::FetchFailed(format!("HTTP {} for {}", status, collection)));
        }

        let rows: Vec<Record> = response
            .json()
            .await
            .map_err(|e| Error::FetchFailed(e.to_string()))?;
        Ok(rows.into_iter().next())
    }
}

/// Remotely configurable copy of one section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionCopy {
    pub headline: String,
    pub description: String,
    pub button_text: String,
}

impl SectionCopy {
    pub fn new(
        headline: impl Into<String>,
        description: impl Into<String>,
        button_text: impl Into<String>,
    ) -> Self {
        Self {
            headline: headline.into(),
            description: description.into(),
            button_text: button_text.into(),
        }
    }

    /// Override fields present in `record` as non-empty strings
    ///
    /// Accepts both `button_text` and `buttonText` column spellings.
    pub fn merged(mut self, record: &Record) -> Self {
        fn pick(record: &Record, keys: &[&str]) -> Option<String> {
            keys.iter()
                .filter_map(|k| record.get(*k))
                .filter_map(Value::as_str)
                .map(str::trim)
                .find(|v| !v.is_empty())
                .map(str::to_string)
        }

        if let Some(headline) = pick(record, &["headline", "title"]) {
            self.headline = headline;
        }
        if let Some(description) = pick(record, &["description", "subtitle"]) {
            self.description = description;
        }
        if let Some(button_text) = pick(record, &["button_text", "buttonText"]) {
            self.button_text = button_text;
        }
        self
    }
}

/// First matching record; an empty result is [`Error::NotFound`]
pub async fn fetch_required(
    source: &dyn ContentSource,
    collection: &str,
    filter: Option<&Filter>,
) -> Result<Record> {
    source.fetch_one(collection, filter).await?.ok_or_else(|| {
        let target = match filter {
            Some(filter) => format!("{} where {}", collection, filter),
            None => collection.to_string(),
        };
        Error::NotFound(target)
    })
}

/// Resolve section copy, falling back to `defaults` on any failure
///
/// Never fails: a missing record, a transport error or a malformed row all
/// leave the built-in copy in place.
pub async fn load_section_copy(
    source: &dyn ContentSource,
    collection: &str,
    filter: Option<&Filter>,
    defaults: SectionCopy,
) -> SectionCopy {
    match fetch_required(source, collection, filter).await {
        Ok(record) => defaults.merged(&record),
        Err(e @ Error::NotFound(_)) => {
            debug!(collection, reason = %e, "Using default section copy");
            defaults
        }
        Err(e) => {
            warn!(collection, error = %e, "Using default section copy");
            defaults
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    enum Fake {
        Row(Value),
        Empty,
        Broken,
    }

    #[async_trait]
    impl ContentSource for Fake {
        async fn fetch_one(&self, _collection: &str, _filter: Option<&Filter>) -> Result<Option<Record>> {
            match self {
                Fake::Row(value) => Ok(value.as_object().cloned()),
                Fake::Empty => Ok(None),
                Fake::Broken => Err(Error::FetchFailed("connection reset".to_string())),
            }
        }
    }

    fn defaults() -> SectionCopy {
        SectionCopy::new("Grow with us", "Websites that convert.", "Get started")
    }

    #[test]
    fn test_filter_parse() {
        let filter: Filter = "section = hero".parse().unwrap();
        assert_eq!(filter, Filter::eq("section", "hero"));
        assert_eq!(filter.to_string(), "section=hero");
        assert!("no-separator".parse::<Filter>().is_err());
        assert!("bad field=1".parse::<Filter>().is_err());
    }

    #[test]
    fn test_query_url() {
        let source = HttpContentSource::with_base_url(
            Url::parse("https://project.backend.example/").unwrap(),
            None,
            5,
        )
        .unwrap();
        let url = source
            .query_url("hero_content", Some(&Filter::eq("section", "home")))
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://project.backend.example/rest/v1/hero_content?select=*&section=eq.home&limit=1"
        );
        assert!(matches!(
            source.query_url("../admin", None),
            Err(Error::FetchFailed(_))
        ));
    }

    #[test]
    fn test_merge_partial_record() {
        let record = json!({ "headline": "Launch faster", "buttonText": "Book a call", "description": "" });
        let copy = defaults().merged(record.as_object().unwrap());
        assert_eq!(copy.headline, "Launch faster");
        assert_eq!(copy.description, "Websites that convert.");
        assert_eq!(copy.button_text, "Book a call");
    }

    #[test]
    fn test_merge_ignores_non_strings() {
        let record = json!({ "headline": 42, "button_text": null });
        let copy = defaults().merged(record.as_object().unwrap());
        assert_eq!(copy, defaults());
    }

    #[tokio::test]
    async fn test_load_uses_record() {
        let source = Fake::Row(json!({ "title": "Remote headline" }));
        let copy = load_section_copy(&source, "hero", None, defaults()).await;
        assert_eq!(copy.headline, "Remote headline");
        assert_eq!(copy.button_text, "Get started");
    }

    #[tokio::test]
    async fn test_fetch_required_reports_missing_row() {
        let filter = Filter::eq("section", "home");
        let err = fetch_required(&Fake::Empty, "hero_content", Some(&filter)).await.unwrap_err();
        match err {
            Error::NotFound(target) => assert_eq!(target, "hero_content where section=home"),
            other => panic!("expected NotFound, got {:?}", other),
        }

        let err = fetch_required(&Fake::Broken, "hero_content", None).await.unwrap_err();
        assert!(matches!(err, Error::FetchFailed(_)));

        let source = Fake::Row(json!({ "title": "Remote headline" }));
        let record = fetch_required(&source, "hero_content", None).await.unwrap();
        assert_eq!(record["title"], "Remote headline");
    }

    #[tokio::test]
    async fn test_load_falls_back() {
        assert_eq!(load_section_copy(&Fake::Empty, "hero", None, defaults()).await, defaults());
        assert_eq!(load_section_copy(&Fake::Broken, "hero", None, defaults()).await, defaults());
        // A row that is not an object behaves like no row
        let source = Fake::Row(json!(["unexpected"]));
        assert_eq!(load_section_copy(&source, "hero", None, defaults()).await, defaults());
    }
}
