// HTTP implementation of the analysis gateway
// Every request and response is logged; failures are classified into AppError

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, error, warn};

use super::AnalysisGateway;
use crate::config::ApiConfig;
use crate::models::{
    AnalyzeRequest, AnalyzeResponse, FeedbackAck, FeedbackRequest, UploadResponse, UploadedFile,
};
use crate::types::{AppError, AppResult};

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

pub struct HttpGateway {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl HttpGateway {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> AppResult<Self> {
        let base_url: String = base_url.into();
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Connectivity(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
        })
    }

    pub fn from_config(config: &ApiConfig) -> AppResult<Self> {
        Self::new(config.base_url.clone(), config.timeout())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send(
        &self,
        method: &str,
        path: &str,
        request: reqwest::RequestBuilder,
    ) -> AppResult<Response> {
        debug!(method, path, "API request");

        let response = request.send().await.map_err(|e| {
            error!(method, path, error = %e, "API request failed");
            AppError::from_transport(&e, self.timeout)
        })?;

        let status = response.status();
        if status.is_success() {
            debug!(method, path, status = status.as_u16(), "API response");
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&body)
            .map(|b| b.error)
            .unwrap_or_else(|_| {
                status
                    .canonical_reason()
                    .map(str::to_string)
                    .unwrap_or_else(|| body.clone())
            });
        warn!(method, path, status = status.as_u16(), %message, "API response error");
        Err(AppError::from_status(status.as_u16(), message))
    }

    async fn decode<T: DeserializeOwned>(path: &str, response: Response) -> AppResult<T> {
        response.json::<T>().await.map_err(|e| {
            warn!(path, error = %e, "Failed to decode API response");
            AppError::InvalidResponse(format!("Failed to parse response from {}: {}", path, e))
        })
    }
}

#[async_trait]
impl AnalysisGateway for HttpGateway {
    async fn probe(&self) -> AppResult<serde_json::Value> {
        let path = "/test";
        let response = self.send("GET", path, self.client.get(self.url(path))).await?;
        // Any 2xx counts, even with a body that is not JSON
        Ok(response.json().await.unwrap_or(serde_json::Value::Null))
    }

    async fn upload(&self, file: &UploadedFile) -> AppResult<UploadResponse> {
        let path = "/upload";
        let mime = mime_guess::from_path(&file.name).first_or_octet_stream();
        let part = Part::bytes(file.content.to_bytes())
            .file_name(file.name.clone())
            .mime_str(mime.as_ref())
            .map_err(|e| AppError::InvalidResponse(format!("Invalid MIME type: {}", e)))?;
        let form = Form::new().part("file", part).text("fileId", file.id.clone());

        let response = self
            .send("POST", path, self.client.post(self.url(path)).multipart(form))
            .await?;
        let upload: UploadResponse = Self::decode(path, response).await?;

        if upload.parsed_data.is_none() {
            warn!(file = %file.name, "Upload response carried no parsed data");
            return Err(AppError::InvalidResponse(
                "No parsed data received from server".to_string(),
            ));
        }
        Ok(upload)
    }

    async fn analyze(&self, request: &AnalyzeRequest) -> AppResult<AnalyzeResponse> {
        let path = "/analyze";
        let response = self
            .send("POST", path, self.client.post(self.url(path)).json(request))
            .await?;
        Self::decode(path, response).await
    }

    async fn submit_feedback(&self, request: &FeedbackRequest) -> AppResult<FeedbackAck> {
        let path = "/feedback";
        let response = self
            .send("POST", path, self.client.post(self.url(path)).json(request))
            .await?;
        // The acknowledgement body is opaque
        Ok(response.json().await.unwrap_or_default())
    }
}
