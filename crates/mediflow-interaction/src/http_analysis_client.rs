//! HttpAnalysisClient - REST implementation of the analysis service.
//!
//! Endpoints (relative to the configured base URL):
//! - `POST /ask`            JSON `{ "message": ... }`  -> text
//! - `POST /analyze_report` multipart part `file`      -> text
//! - `POST /analyze_trends` multipart parts `files`    -> JSON array or `{ "error": ... }`

use async_trait::async_trait;
use mediflow_core::analysis::{AnalysisService, DocumentUpload, ServiceError};
use mediflow_core::config::ClientConfig;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

const ASK_PATH: &str = "ask";
const ANALYZE_REPORT_PATH: &str = "analyze_report";
const ANALYZE_TRENDS_PATH: &str = "analyze_trends";

/// [`AnalysisService`] that talks to the analysis backend over HTTP.
#[derive(Clone)]
pub struct HttpAnalysisClient {
    client: Client,
    base_url: String,
    timeout_secs: u64,
}

impl HttpAnalysisClient {
    /// Creates a client with the given base URL and request timeout.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ServiceError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| ServiceError::Client(format!("Failed to build HTTP client: {err}")))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout_secs: timeout.as_secs(),
        })
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self, ServiceError> {
        Self::new(config.base_url.clone(), config.request_timeout())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn post_form(&self, path: &str, form: Form) -> Result<Response, ServiceError> {
        let response = self
            .client
            .post(self.endpoint(path))
            .multipart(form)
            .send()
            .await
            .map_err(|err| self.map_send_error(err))?;
        ensure_success(response).await
    }

    fn map_send_error(&self, err: reqwest::Error) -> ServiceError {
        if err.is_timeout() {
            ServiceError::Timeout(self.timeout_secs)
        } else if err.is_connect() || err.is_request() {
            ServiceError::Network(err.to_string())
        } else {
            ServiceError::Client(err.to_string())
        }
    }
}

#[async_trait]
impl AnalysisService for HttpAnalysisClient {
    async fn ask(&self, message: &str) -> Result<String, ServiceError> {
        tracing::debug!("[HttpAnalysisClient] POST /{} ({} chars)", ASK_PATH, message.len());

        let response = self
            .client
            .post(self.endpoint(ASK_PATH))
            .json(&AskRequest { message })
            .send()
            .await
            .map_err(|err| self.map_send_error(err))?;

        read_text(ensure_success(response).await?).await
    }

    async fn analyze_report(&self, upload: &DocumentUpload) -> Result<String, ServiceError> {
        tracing::debug!(
            "[HttpAnalysisClient] POST /{} '{}'",
            ANALYZE_REPORT_PATH,
            upload.filename
        );

        let form = Form::new().part("file", file_part(upload)?);
        let response = self.post_form(ANALYZE_REPORT_PATH, form).await?;
        read_text(response).await
    }

    async fn analyze_trends(
        &self,
        uploads: &[DocumentUpload],
    ) -> Result<Vec<Value>, ServiceError> {
        tracing::debug!(
            "[HttpAnalysisClient] POST /{} ({} files)",
            ANALYZE_TRENDS_PATH,
            uploads.len()
        );

        let mut form = Form::new();
        for upload in uploads {
            form = form.part("files", file_part(upload)?);
        }

        let response = self.post_form(ANALYZE_TRENDS_PATH, form).await?;
        let body: Value = response
            .json()
            .await
            .map_err(|err| ServiceError::Client(format!("Failed to parse trend response: {err}")))?;

        parse_trends_response(body)
    }
}

#[derive(Serialize)]
struct AskRequest<'a> {
    message: &'a str,
}

/// FastAPI-style error body.
#[derive(Deserialize)]
struct ErrorResponse {
    detail: Value,
}

fn file_part(upload: &DocumentUpload) -> Result<Part, ServiceError> {
    let mime = mime_guess::from_path(&upload.filename).first_or_octet_stream();
    Part::bytes(upload.bytes.clone())
        .file_name(upload.filename.clone())
        .mime_str(mime.essence_str())
        .map_err(|err| ServiceError::Client(format!("Invalid content type for upload: {err}")))
}

async fn ensure_success(response: Response) -> Result<Response, ServiceError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(map_http_error(status, &body))
}

async fn read_text(response: Response) -> Result<String, ServiceError> {
    response
        .text()
        .await
        .map_err(|err| ServiceError::Client(format!("Failed to read response body: {err}")))
}

/// Builds a `Server` error, preferring the body's `detail` over the status text.
pub(crate) fn map_http_error(status: StatusCode, body: &str) -> ServiceError {
    let detail = serde_json::from_str::<ErrorResponse>(body)
        .ok()
        .map(|wrapper| match wrapper.detail {
            Value::String(s) => s,
            other => other.to_string(),
        })
        .or_else(|| status.canonical_reason().map(str::to_string))
        .unwrap_or_else(|| body.trim().to_string());

    ServiceError::Server {
        status: status.as_u16(),
        detail,
    }
}

/// Accepts a JSON array of raw results; an `{ "error": ... }` object becomes an error.
pub(crate) fn parse_trends_response(body: Value) -> Result<Vec<Value>, ServiceError> {
    match body {
        Value::Array(results) => Ok(results),
        Value::Object(mut object) => match object.remove("error") {
            Some(Value::String(message)) => Err(ServiceError::Client(message)),
            Some(other) => Err(ServiceError::Client(other.to_string())),
            None => Err(ServiceError::Client(
                "Trend response was an object without results".to_string(),
            )),
        },
        other => Err(ServiceError::Client(format!(
            "Unexpected trend response: {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_endpoint_joins_without_double_slash() {
        let client = HttpAnalysisClient::new("http://localhost:8000/", Duration::from_secs(5)).unwrap();
        assert_eq!(client.base_url(), "http://localhost:8000");
        assert_eq!(client.endpoint(ASK_PATH), "http://localhost:8000/ask");
    }

    #[test]
    fn test_map_http_error_uses_fastapi_detail() {
        let err = map_http_error(
            StatusCode::UNPROCESSABLE_ENTITY,
            r#"{"detail":"File type not supported"}"#,
        );
        assert_eq!(
            err,
            ServiceError::Server {
                status: 422,
                detail: "File type not supported".to_string()
            }
        );
    }

    #[test]
    fn test_map_http_error_falls_back_to_status_text() {
        let err = map_http_error(StatusCode::INTERNAL_SERVER_ERROR, "<html>boom</html>");
        assert_eq!(
            err,
            ServiceError::Server {
                status: 500,
                detail: "Internal Server Error".to_string()
            }
        );
    }

    #[test]
    fn test_parse_trends_response_array() {
        let results = parse_trends_response(json!([{ "date": "2024-01-01" }, { "oops": 1 }])).unwrap();
        assert_eq!(results.len(), 2);
    }

    #[test]
    fn test_parse_trends_response_error_object() {
        let err = parse_trends_response(json!({ "error": "OCR failed" })).unwrap_err();
        assert_eq!(err, ServiceError::Client("OCR failed".to_string()));
    }

    #[test]
    fn test_parse_trends_response_rejects_scalars() {
        assert!(parse_trends_response(json!("nope")).is_err());
    }

    #[test]
    fn test_file_part_builds_for_unknown_extension() {
        let upload = DocumentUpload::new("scan.unknownext", vec![1, 2, 3]);
        assert!(file_part(&upload).is_ok());
    }
}
