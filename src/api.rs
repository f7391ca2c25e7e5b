//! Backend contract for contact addresses and translate-assist.
//!
//! `ContactApi` is the seam the synchronizer talks to; `HttpContactApi` is
//! the reqwest implementation against the admin REST endpoints.

use crate::config::Config;
use crate::error::{Result, SyncError};
use crate::i18n::Locale;
use crate::retry::{with_retry, RetryPolicy};
use anyhow::Context;
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use std::future::Future;
use tracing::debug;

/// A translation as stored by the backend. Any field may be missing or
/// null for locales saved before the shared fields existed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteTranslation {
    pub locale: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub country: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub place: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub address: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub phones: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub whatsapp: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub email: String,
}

#[derive(Debug, Deserialize)]
struct TranslationsResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    translations: Vec<RemoteTranslation>,
}

/// Body of a create or update call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TranslationPayload {
    pub country: String,
    pub place: String,
    pub address: String,
    pub email: String,
    pub whatsapp: String,
    pub phones: Vec<String>,
    pub locale: Locale,
}

#[derive(Debug, Deserialize)]
struct IdResponse {
    id: RecordId,
}

/// Ids come back as numbers from some endpoints and strings from others.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RecordId {
    Number(i64),
    Text(String),
}

impl From<RecordId> for String {
    fn from(id: RecordId) -> Self {
        match id {
            RecordId::Number(n) => n.to_string(),
            RecordId::Text(s) => s,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslateRequest {
    pub text: String,
    pub source_locale: Locale,
    pub target_locale: Locale,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TranslateResponse {
    translated_text: String,
}

fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

pub trait ContactApi {
    /// `GET /contact-addresses?id={id}&all=true`
    fn fetch_translations(
        &self,
        id: &str,
    ) -> impl Future<Output = Result<Vec<RemoteTranslation>>> + Send;

    /// `POST /contact-addresses`, returns the new record id.
    fn create(&self, payload: &TranslationPayload) -> impl Future<Output = Result<String>> + Send;

    /// `PUT /contact-addresses?id={id}`, returns the record id the backend
    /// stored the translation under.
    fn update(
        &self,
        id: &str,
        payload: &TranslationPayload,
    ) -> impl Future<Output = Result<String>> + Send;

    /// `POST /translate`
    fn translate(&self, request: &TranslateRequest) -> impl Future<Output = Result<String>> + Send;
}

#[derive(Debug, Clone)]
pub struct HttpContactApi {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
    retry: RetryPolicy,
}

impl HttpContactApi {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: config.api_base_url.clone(),
            token: config.api_token.clone(),
            retry: RetryPolicy::load(config.load_retry_attempts),
        })
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self
            .client
            .request(method, format!("{}{}", self.base_url, path));
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }
}

impl ContactApi for HttpContactApi {
    async fn fetch_translations(&self, id: &str) -> Result<Vec<RemoteTranslation>> {
        let operation = "Load contact translations";
        let response: TranslationsResponse = with_retry(&self.retry, operation, || {
            send_json(
                self.request(Method::GET, "/contact-addresses")
                    .query(&[("id", id), ("all", "true")]),
                operation,
            )
        })
        .await?;

        debug!(
            "Fetched {} translations for record {}",
            response.translations.len(),
            id
        );
        Ok(response.translations)
    }

    async fn create(&self, payload: &TranslationPayload) -> Result<String> {
        let response: IdResponse = send_json(
            self.request(Method::POST, "/contact-addresses").json(payload),
            "Create contact address",
        )
        .await?;
        Ok(response.id.into())
    }

    async fn update(&self, id: &str, payload: &TranslationPayload) -> Result<String> {
        let response: IdResponse = send_json(
            self.request(Method::PUT, "/contact-addresses")
                .query(&[("id", id)])
                .json(payload),
            "Save contact translation",
        )
        .await?;
        Ok(response.id.into())
    }

    async fn translate(&self, request: &TranslateRequest) -> Result<String> {
        let response: TranslateResponse = with_retry(&self.retry, "Translate address", || {
            send_json(
                self.request(Method::POST, "/translate").json(request),
                "Translate address",
            )
        })
        .await?;
        Ok(response.translated_text)
    }
}

async fn send_json<T: DeserializeOwned>(builder: RequestBuilder, action: &str) -> Result<T> {
    let response = builder
        .send()
        .await
        .with_context(|| format!("{} failed", action))
        .map_err(SyncError::transport)?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        let message = server_message(&body)
            .unwrap_or_else(|| format!("{} failed ({})", action, status));
        return Err(SyncError::http_status(status, message));
    }

    response
        .json()
        .await
        .with_context(|| format!("Failed to parse response for: {}", action))
        .map_err(SyncError::transport)
}

/// The backend reports failures as `{"message": ...}` or `{"error": ...}`.
fn server_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    ["message", "error"]
        .iter()
        .filter_map(|key| value.get(*key).and_then(|v| v.as_str()))
        .map(str::trim)
        .find(|msg| !msg.is_empty())
        .map(str::to_string)
}
