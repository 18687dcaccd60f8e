//! Uploads of integrated documents to the OCR providers.

mod docupipe;
mod parseur;

pub use docupipe::DocupipeClient;
pub use parseur::ParseurClient;

use std::path::Path;

use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use fatura_core::models::config::FaturaConfig;
use fatura_core::routes::{Provider, RouteTable};

/// Why an upload did not happen or was rejected.
#[derive(Error, Debug)]
pub enum UploadError {
    #[error("request timed out")]
    Timeout,

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("request failed: {0}")]
    Transport(String),

    #[error("{0} API key not configured (set {env})", env = .0.api_key_env())]
    NotConfigured(Provider),

    #[error("supplier {supplier} uses provider '{actual}', not {expected}")]
    Misrouted {
        supplier: String,
        expected: Provider,
        actual: Provider,
    },

    #[error("API route for {0} is disabled")]
    Disabled(String),

    #[error("no API route configured for supplier: {0}")]
    NoRoute(String),

    #[error("no mailbox ID configured for supplier: {0}")]
    MissingDestination(String),

    #[error("failed to read document: {0}")]
    Io(#[from] std::io::Error),
}

impl From<reqwest::Error> for UploadError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            UploadError::Timeout
        } else {
            UploadError::Transport(e.to_string())
        }
    }
}

/// Category of an upload failure, for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UploadErrorKind {
    Timeout,
    HttpStatus,
    Transport,
    NotConfigured,
    Misrouted,
    Disabled,
    NoRoute,
    MissingDestination,
    FileIo,
}

impl UploadError {
    pub fn kind(&self) -> UploadErrorKind {
        match self {
            UploadError::Timeout => UploadErrorKind::Timeout,
            UploadError::Status { .. } => UploadErrorKind::HttpStatus,
            UploadError::Transport(_) => UploadErrorKind::Transport,
            UploadError::NotConfigured(_) => UploadErrorKind::NotConfigured,
            UploadError::Misrouted { .. } => UploadErrorKind::Misrouted,
            UploadError::Disabled(_) => UploadErrorKind::Disabled,
            UploadError::NoRoute(_) => UploadErrorKind::NoRoute,
            UploadError::MissingDestination(_) => UploadErrorKind::MissingDestination,
            UploadError::Io(_) => UploadErrorKind::FileIo,
        }
    }
}

/// What a provider accepted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Receipt {
    /// Parseur mailbox or Docupipe document id.
    pub remote_id: Option<String>,
    /// Docupipe processing job.
    pub job_id: Option<String>,
}

/// Result of uploading one document.
#[derive(Debug, Clone, Serialize)]
pub struct UploadOutcome {
    pub success: bool,
    pub supplier: String,
    pub provider: Option<Provider>,
    pub remote_id: Option<String>,
    pub job_id: Option<String>,
    pub message: String,
    pub error: Option<UploadErrorKind>,
}

impl UploadOutcome {
    fn new(
        supplier: &str,
        provider: Option<Provider>,
        result: Result<Receipt, UploadError>,
    ) -> Self {
        match result {
            Ok(receipt) => Self {
                success: true,
                supplier: supplier.to_string(),
                provider,
                remote_id: receipt.remote_id,
                job_id: receipt.job_id,
                message: "Document uploaded successfully".to_string(),
                error: None,
            },
            Err(e) => Self {
                success: false,
                supplier: supplier.to_string(),
                provider,
                remote_id: None,
                job_id: None,
                message: e.to_string(),
                error: Some(e.kind()),
            },
        }
    }
}

/// Sends documents to the provider routed for their supplier.
pub struct Uploader {
    routes: RouteTable,
    parseur: ParseurClient,
    docupipe: DocupipeClient,
}

impl Uploader {
    pub fn new(routes: RouteTable, parseur: ParseurClient, docupipe: DocupipeClient) -> Self {
        Self {
            routes,
            parseur,
            docupipe,
        }
    }

    pub fn from_config(config: &FaturaConfig, routes: RouteTable) -> Result<Self, UploadError> {
        Ok(Self::new(
            routes,
            ParseurClient::from_config(&config.providers.parseur)?,
            DocupipeClient::from_config(&config.providers.docupipe)?,
        ))
    }

    /// Providers without an API key.
    pub fn missing_keys(&self) -> Vec<Provider> {
        let mut missing = Vec::new();
        if !self.parseur.is_configured() {
            missing.push(Provider::Parseur);
        }
        if !self.docupipe.is_configured() {
            missing.push(Provider::Docupipe);
        }
        missing
    }

    /// Upload `path` for `supplier`. Failures are reported in the outcome.
    pub async fn upload(&self, path: &Path, supplier: &str) -> UploadOutcome {
        let Some(route) = self.routes.get(supplier) else {
            let error = UploadError::NoRoute(supplier.to_string());
            return UploadOutcome::new(supplier, None, Err(error));
        };

        let provider = route.provider;
        let result = match provider {
            Provider::Parseur => self.parseur.upload_for_supplier(path, supplier, route).await,
            Provider::Docupipe => self.docupipe.upload_for_supplier(path, supplier, route).await,
        };

        let outcome = UploadOutcome::new(supplier, Some(provider), result);
        if outcome.success {
            info!(
                "Uploaded {} to {} ({})",
                path.display(),
                provider,
                outcome.remote_id.as_deref().unwrap_or("?")
            );
        } else {
            warn!("Upload of {} failed: {}", path.display(), outcome.message);
        }
        outcome
    }
}

/// `200`, `201` and `202` mean the provider took the document.
fn accepted(status: reqwest::StatusCode) -> bool {
    matches!(status.as_u16(), 200..=202)
}

/// Turn a rejected response into [`UploadError::Status`].
async fn rejection(response: reqwest::Response) -> UploadError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    UploadError::Status { status, body }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document.pdf".to_string())
}
