//! Corpus provider
//!
//! Trait for the upstream document source plus the HTTP implementation.
//! The provider returns pre-formatted bodies; no parsing of upstream
//! formats happens here.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;

use super::types::{CorpusError, FormattedBody};

/// Upstream source of formatted document bodies.
#[async_trait]
pub trait CorpusProvider: Send + Sync {
    /// Provider name, for startup logging.
    fn name(&self) -> &str;

    /// Fetch one version of a document.
    ///
    /// `Err(CorpusError::NotFound)` means the corpus has no such document;
    /// any transport or upstream failure is `Err(CorpusError::Fetch)`.
    async fn fetch(&self, id: &str, as_of: Option<NaiveDate>)
        -> Result<FormattedBody, CorpusError>;
}

/// HTTP corpus client.
pub struct HttpCorpusClient {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct UpstreamDocument {
    #[serde(default)]
    title: Option<String>,
    body: String,
}

impl HttpCorpusClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn document_url(&self, id: &str, as_of: Option<NaiveDate>) -> String {
        let mut url = format!("{}/documents/{}", self.base_url, urlencoding::encode(id));
        if let Some(date) = as_of {
            url.push_str(&format!("?asOf={date}"));
        }
        url
    }
}

#[async_trait]
impl CorpusProvider for HttpCorpusClient {
    fn name(&self) -> &str {
        "http"
    }

    async fn fetch(
        &self,
        id: &str,
        as_of: Option<NaiveDate>,
    ) -> Result<FormattedBody, CorpusError> {
        let url = self.document_url(id, as_of);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| CorpusError::Fetch(format!("request to {url} failed: {e}")))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(CorpusError::NotFound(id.to_string()));
        }
        if !response.status().is_success() {
            return Err(CorpusError::Fetch(format!(
                "upstream returned {} for {url}",
                response.status()
            )));
        }

        let document: UpstreamDocument = response
            .json()
            .await
            .map_err(|e| CorpusError::Fetch(format!("invalid upstream payload: {e}")))?;

        Ok(FormattedBody {
            id: id.to_string(),
            as_of,
            title: document.title,
            body: document.body,
        })
    }
}

/// In-memory provider for tests.
#[cfg(test)]
pub struct StaticCorpus {
    pub documents: std::collections::HashMap<String, FormattedBody>,
}

#[cfg(test)]
impl StaticCorpus {
    pub fn with_document(id: &str, title: &str, body: &str) -> Self {
        let mut documents = std::collections::HashMap::new();
        documents.insert(
            id.to_string(),
            FormattedBody {
                id: id.to_string(),
                as_of: None,
                title: Some(title.to_string()),
                body: body.to_string(),
            },
        );
        Self { documents }
    }
}

#[cfg(test)]
#[async_trait]
impl CorpusProvider for StaticCorpus {
    fn name(&self) -> &str {
        "static"
    }

    async fn fetch(
        &self,
        id: &str,
        as_of: Option<NaiveDate>,
    ) -> Result<FormattedBody, CorpusError> {
        self.documents
            .get(id)
            .cloned()
            .map(|mut body| {
                body.as_of = as_of;
                body
            })
            .ok_or_else(|| CorpusError::NotFound(id.to_string()))
    }
}
