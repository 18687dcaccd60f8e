//! Parseur client: multipart uploads into a mailbox.

use std::path::Path;
use std::time::Duration;

use reqwest::multipart::{Form, Part};
use tracing::{debug, info};

use fatura_core::models::config::ProviderConfig;
use fatura_core::routes::{Provider, ProviderRoute};

use super::{Receipt, UploadError, accepted, file_name, rejection};

pub const DEFAULT_BASE_URL: &str = "https://api.parseur.com";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

pub struct ParseurClient {
    http: reqwest::Client,
    api_key: Option<String>,
    base_url: String,
}

impl ParseurClient {
    pub fn new(
        api_key: Option<String>,
        base_url: &str,
        timeout_secs: u64,
    ) -> Result<Self, UploadError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("fatura/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;

        Ok(Self {
            http,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Empty settings fall back to the public endpoint and a 60 s timeout.
    pub fn from_config(config: &ProviderConfig) -> Result<Self, UploadError> {
        let base_url = match config.base_url.as_str() {
            "" => DEFAULT_BASE_URL,
            url => url,
        };
        let timeout = match config.timeout_secs {
            0 => DEFAULT_TIMEOUT_SECS,
            secs => secs,
        };
        Self::new(
            config.resolve_api_key(Provider::Parseur.api_key_env()),
            base_url,
            timeout,
        )
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    /// Upload a document to `mailbox_id`; `params` become extra form fields.
    pub async fn upload_document(
        &self,
        path: &Path,
        mailbox_id: &str,
        params: &[(&str, &str)],
    ) -> Result<Receipt, UploadError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(UploadError::NotConfigured(Provider::Parseur))?;

        let contents = tokio::fs::read(path).await?;
        let part = Part::bytes(contents)
            .file_name(file_name(path))
            .mime_str("application/pdf")?;
        let mut form = Form::new().part("file", part);
        for (key, value) in params {
            form = form.text(key.to_string(), value.to_string());
        }

        let url = format!("{}/parser/{}/upload", self.base_url, mailbox_id);
        debug!("POST {}", url);
        let response = self
            .http
            .post(&url)
            .header("Authorization", api_key)
            .multipart(form)
            .send()
            .await?;

        if !accepted(response.status()) {
            return Err(rejection(response).await);
        }

        info!("Uploaded {} to mailbox {}", path.display(), mailbox_id);
        Ok(Receipt {
            remote_id: Some(mailbox_id.to_string()),
            job_id: None,
        })
    }

    /// Upload using the supplier's route, tagging the document with the supplier.
    pub async fn upload_for_supplier(
        &self,
        path: &Path,
        supplier: &str,
        route: &ProviderRoute,
    ) -> Result<Receipt, UploadError> {
        if !route.enabled {
            return Err(UploadError::Disabled(supplier.to_string()));
        }
        if route.provider != Provider::Parseur {
            return Err(UploadError::Misrouted {
                supplier: supplier.to_string(),
                expected: Provider::Parseur,
                actual: route.provider,
            });
        }
        let mailbox_id = route
            .mailbox_id
            .as_deref()
            .ok_or_else(|| UploadError::MissingDestination(supplier.to_string()))?;

        self.upload_document(path, mailbox_id, &[("supplier", supplier)])
            .await
    }
}
