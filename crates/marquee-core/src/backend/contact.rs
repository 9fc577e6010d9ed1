use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use url::Url;
use uuid::Uuid;

use super::http::{build_client, build_headers};
use crate::config::AppConfig;
use crate::{Error, Result};

/// Shown inline when the backend rejects or never receives a submission
pub const FAILURE_MESSAGE: &str = "Something went wrong sending your message. Please try again.";
pub const SUCCESS_MESSAGE: &str = "Thanks for reaching out! We'll get back to you shortly.";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactFields {
    pub full_name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_number: Option<String>,
    pub message: String,
}

impl ContactFields {
    /// Trim every field and drop empty optional ones
    pub fn normalized(&self) -> Self {
        fn optional(value: &Option<String>) -> Option<String> {
            value
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        }

        Self {
            full_name: self.full_name.trim().to_string(),
            email: self.email.trim().to_string(),
            company_name: optional(&self.company_name),
            contact_number: optional(&self.contact_number),
            message: self.message.trim().to_string(),
        }
    }

    /// Check required fields and the email shape
    pub fn validate(&self) -> Result<()> {
        let fields = self.normalized();
        if fields.full_name.is_empty() {
            return Err(Error::Validation("Full name is required".to_string()));
        }
        if fields.email.is_empty() {
            return Err(Error::Validation("Email is required".to_string()));
        }
        if !is_valid_email(&fields.email) {
            return Err(Error::Validation(format!("'{}' is not a valid email address", fields.email)));
        }
        if fields.message.is_empty() {
            return Err(Error::Validation("Message is required".to_string()));
        }
        if let Some(number) = &fields.contact_number {
            let ok = number
                .chars()
                .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | ' ' | '(' | ')'));
            if !ok || !number.chars().any(|c| c.is_ascii_digit()) {
                return Err(Error::Validation(format!("'{}' is not a valid phone number", number)));
            }
        }
        Ok(())
    }
}

/// Minimal email shape check: one `@`, non-empty local part, dotted domain
pub fn is_valid_email(email: &str) -> bool {
    let mut parts = email.split('@');
    let (Some(local), Some(domain), None) = (parts.next(), parts.next(), parts.next()) else {
        return false;
    };
    if local.is_empty() || email.chars().any(char::is_whitespace) {
        return false;
    }
    let labels: Vec<&str> = domain.split('.').collect();
    labels.len() >= 2 && labels.iter().all(|l| !l.is_empty())
}

/// Receives contact form submissions
#[async_trait]
pub trait FormSubmitter: Send + Sync {
    async fn submit(&self, fields: &ContactFields) -> Result<()>;
}

#[derive(Serialize)]
struct SubmissionPayload<'a> {
    id: Uuid,
    submitted_at: DateTime<Utc>,
    #[serde(flatten)]
    fields: &'a ContactFields,
}

/// Posts submissions as JSON to the configured endpoint
pub struct HttpSubmitter {
    client: Client,
    endpoint: Url,
    api_key: Option<String>,
}

impl HttpSubmitter {
    pub fn new(config: &AppConfig) -> Result<Self> {
        let endpoint = config
            .backend
            .submit_endpoint
            .as_deref()
            .ok_or_else(|| Error::Config("backend.submit_endpoint is not set".to_string()))?;
        Self::with_endpoint(
            Url::parse(endpoint)?,
            config.backend.api_key.clone(),
            config.backend.request_timeout_secs,
        )
    }

    pub fn with_endpoint(endpoint: Url, api_key: Option<String>, timeout_secs: u64) -> Result<Self> {
        Ok(Self {
            client: build_client(timeout_secs)?,
            endpoint,
            api_key,
        })
    }
}

#[async_trait]
impl FormSubmitter for HttpSubmitter {
    async fn submit(&self, fields: &ContactFields) -> Result<()> {
        let payload = SubmissionPayload {
            id: Uuid::new_v4(),
            submitted_at: Utc::now(),
            fields,
        };

        let response = self
            .client
            .post(self.endpoint.clone())
            .headers(build_headers(self.api_key.as_deref()))
            .json(&payload)
            .send()
            .await
            .map_err(|e| Error::SubmissionFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::SubmissionFailed(format!("HTTP {}: {}", status, body.trim())));
        }

        info!(submission = %payload.id, "Contact form submitted");
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormStatus {
    Idle,
    Submitting,
    Succeeded,
    /// Rejected locally before any request
    Invalid(String),
    /// Backend failure; fields kept for retry
    Failed(String),
}

/// Contact form fields plus submission status
#[derive(Debug, Clone)]
pub struct ContactForm {
    fields: ContactFields,
    status: FormStatus,
}

impl Default for ContactForm {
    fn default() -> Self {
        Self::new()
    }
}

impl ContactForm {
    pub fn new() -> Self {
        Self {
            fields: ContactFields::default(),
            status: FormStatus::Idle,
        }
    }

    pub fn with_fields(fields: ContactFields) -> Self {
        Self {
            fields,
            status: FormStatus::Idle,
        }
    }

    pub fn fields(&self) -> &ContactFields {
        &self.fields
    }

    /// Edit fields; clears any previous status message
    pub fn fields_mut(&mut self) -> &mut ContactFields {
        self.status = FormStatus::Idle;
        &mut self.fields
    }

    pub fn status(&self) -> &FormStatus {
        &self.status
    }

    /// Inline message for the current status
    pub fn message(&self) -> Option<&str> {
        match &self.status {
            FormStatus::Idle | FormStatus::Submitting => None,
            FormStatus::Succeeded => Some(SUCCESS_MESSAGE),
            FormStatus::Invalid(reason) => Some(reason.as_str()),
            FormStatus::Failed(_) => Some(FAILURE_MESSAGE),
        }
    }

    /// Submit the current fields
    ///
    /// Success clears the fields. Failure keeps them so the user can retry.
    /// Dropping the future mid-request counts as a failure.
    pub async fn submit_with(&mut self, submitter: &dyn FormSubmitter) -> &FormStatus {
        if let Err(e) = self.fields.validate() {
            self.status = FormStatus::Invalid(match e {
                Error::Validation(reason) => reason,
                other => other.to_string(),
            });
            return &self.status;
        }

        let fields = self.fields.normalized();
        let mut in_flight = InFlight::start(&mut self.status);
        match submitter.submit(&fields).await {
            Ok(()) => {
                self.fields = ContactFields::default();
                in_flight.settle(FormStatus::Succeeded);
            }
            Err(e) => {
                warn!(error = %e, "Contact form submission failed");
                in_flight.settle(FormStatus::Failed(e.to_string()));
            }
        }
        drop(in_flight);
        &self.status
    }
}

/// Holds the form in `Submitting` until settled
///
/// An unsettled drop means the request was abandoned, which leaves the form
/// `Failed` and editable.
struct InFlight<'a> {
    status: &'a mut FormStatus,
    settled: bool,
}

impl<'a> InFlight<'a> {
    fn start(status: &'a mut FormStatus) -> Self {
        *status = FormStatus::Submitting;
        Self { status, settled: false }
    }

    fn settle(&mut self, status: FormStatus) {
        *self.status = status;
        self.settled = true;
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if !self.settled {
            warn!("Contact form submission abandoned before completion");
            *self.status = FormStatus::Failed("submission cancelled".to_string());
        }
    }
}
