//! Docupipe client: base64 JSON uploads and job status.

use std::path::Path;
use std::time::Duration;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{debug, info};

use fatura_core::models::config::ProviderConfig;
use fatura_core::routes::{Provider, ProviderRoute};

use super::{Receipt, UploadError, accepted, file_name, rejection};

pub const DEFAULT_BASE_URL: &str = "https://app.docupipe.ai";
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;
pub const JOB_STATUS_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UploadResponse {
    document_id: Option<String>,
    job_id: Option<String>,
}

pub struct DocupipeClient {
    http: reqwest::Client,
    api_key: Option<String>,
    base_url: String,
}

impl DocupipeClient {
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

    /// Empty settings fall back to the public endpoint and a 120 s timeout.
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
            config.resolve_api_key(Provider::Docupipe.api_key_env()),
            base_url,
            timeout,
        )
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    fn api_key(&self) -> Result<&str, UploadError> {
        self.api_key
            .as_deref()
            .ok_or(UploadError::NotConfigured(Provider::Docupipe))
    }

    /// Upload a document, optionally starting `workflow_id` on it.
    pub async fn upload_document(
        &self,
        path: &Path,
        workflow_id: Option<&str>,
    ) -> Result<Receipt, UploadError> {
        let api_key = self.api_key()?;
        let contents = tokio::fs::read(path).await?;

        let mut payload = json!({
            "document": {
                "file": {
                    "contents": STANDARD.encode(&contents),
                    "filename": file_name(path),
                }
            }
        });
        if let Some(workflow_id) = workflow_id {
            payload["workflowId"] = json!(workflow_id);
        }

        let url = format!("{}/document", self.base_url);
        debug!("POST {} ({} bytes)", url, contents.len());
        let response = self
            .http
            .post(&url)
            .header("accept", "application/json")
            .header("X-API-Key", api_key)
            .json(&payload)
            .send()
            .await?;

        if !accepted(response.status()) {
            return Err(rejection(response).await);
        }

        let body = response.text().await?;
        let parsed: UploadResponse = if body.trim().is_empty() {
            UploadResponse::default()
        } else {
            serde_json::from_str(&body).map_err(|e| UploadError::Transport(e.to_string()))?
        };

        info!(
            "Uploaded {} to Docupipe (doc_id: {})",
            path.display(),
            parsed.document_id.as_deref().unwrap_or("?")
        );
        Ok(Receipt {
            remote_id: parsed.document_id,
            job_id: parsed.job_id,
        })
    }

    /// Upload using the supplier's route. The workflow is optional.
    pub async fn upload_for_supplier(
        &self,
        path: &Path,
        supplier: &str,
        route: &ProviderRoute,
    ) -> Result<Receipt, UploadError> {
        if !route.enabled {
            return Err(UploadError::Disabled(supplier.to_string()));
        }
        if route.provider != Provider::Docupipe {
            return Err(UploadError::Misrouted {
                supplier: supplier.to_string(),
                expected: Provider::Docupipe,
                actual: route.provider,
            });
        }

        self.upload_document(path, route.workflow_id.as_deref()).await
    }

    /// Processing status of an upload job.
    pub async fn job_status(&self, job_id: &str) -> Result<Value, UploadError> {
        let api_key = self.api_key()?;
        let url = format!("{}/job/{}", self.base_url, job_id);
        debug!("GET {}", url);

        let response = self
            .http
            .get(&url)
            .header("accept", "application/json")
            .header("X-API-Key", api_key)
            .timeout(JOB_STATUS_TIMEOUT)
            .send()
            .await?;

        if response.status() != reqwest::StatusCode::OK {
            return Err(rejection(response).await);
        }
        Ok(response.json().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::upload::UploadErrorKind;
    use crate::upload::testing::serve_once;
    use pretty_assertions::assert_eq;

    fn client(base_url: &str) -> DocupipeClient {
        DocupipeClient::new(Some("dp-key".to_string()), base_url, 5).unwrap()
    }

    #[tokio::test]
    async fn test_upload_sends_base64_payload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("20250301_Lidl.pdf");
        std::fs::write(&path, b"hello").unwrap();

        let (base_url, server) =
            serve_once("200 OK", r#"{"documentId":"doc-1","jobId":"job-9"}"#).await;
        let receipt = client(&base_url)
            .upload_for_supplier(&path, "lidl", &ProviderRoute::docupipe(Some("YxiR0kCy")))
            .await
            .unwrap();
        let request = server.await.unwrap();

        assert_eq!(
            receipt,
            Receipt {
                remote_id: Some("doc-1".to_string()),
                job_id: Some("job-9".to_string()),
            }
        );
        assert!(request.starts_with("POST /document"));
        assert!(request.to_lowercase().contains("x-api-key: dp-key"));

        let body = &request[request.find("\r\n\r\n").unwrap() + 4..];
        let payload: Value = serde_json::from_str(body).unwrap();
        assert_eq!(payload["document"]["file"]["contents"], "aGVsbG8=");
        assert_eq!(payload["document"]["file"]["filename"], "20250301_Lidl.pdf");
        assert_eq!(payload["workflowId"], "YxiR0kCy");
    }

    #[tokio::test]
    async fn test_upload_without_workflow() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.pdf");
        std::fs::write(&path, b"x").unwrap();

        let (base_url, server) = serve_once("201 Created", "").await;
        let receipt = client(&base_url).upload_document(&path, None).await.unwrap();
        let request = server.await.unwrap();

        assert_eq!(receipt, Receipt::default());
        assert!(!request.contains("workflowId"));
    }

    #[tokio::test]
    async fn test_job_status() {
        let (base_url, server) = serve_once("200 OK", r#"{"status":"completed"}"#).await;
        let status = client(&base_url).job_status("job-9").await.unwrap();
        let request = server.await.unwrap();

        assert_eq!(status["status"], "completed");
        assert!(request.starts_with("GET /job/job-9"));
    }

    #[tokio::test]
    async fn test_job_status_not_found() {
        let (base_url, server) = serve_once("404 Not Found", r#"{"error":"unknown job"}"#).await;
        let err = client(&base_url).job_status("nope").await.unwrap_err();
        server.await.unwrap();
        assert_eq!(err.kind(), UploadErrorKind::HttpStatus);
    }

    #[tokio::test]
    async fn test_not_configured() {
        let client = DocupipeClient::new(None, "http://127.0.0.1:9", 5).unwrap();
        let err = client.job_status("job").await.unwrap_err();
        assert_eq!(err.kind(), UploadErrorKind::NotConfigured);
    }

    #[tokio::test]
    async fn test_misrouted_supplier() {
        let err = client("http://127.0.0.1:9")
            .upload_for_supplier(Path::new("x.pdf"), "novadis", &ProviderRoute::parseur("111943"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), UploadErrorKind::Misrouted);
    }
}
