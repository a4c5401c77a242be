// Scripted gateway for session and ingest tests

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Map, Value};

use super::AnalysisGateway;
use crate::models::{
    AnalyzeRequest, AnalyzeResponse, FeedbackAck, FeedbackRequest, UploadResponse, UploadedFile,
};
use crate::types::{AppError, AppResult};

#[derive(Default)]
pub struct FakeGateway {
    pub unreachable: bool,
    pub answer: Option<String>,
    pub answer_id: Option<String>,
    pub analyze_delay: Option<Duration>,
    pub analyze_status: Option<u16>,
    pub upload_rows: Option<Vec<Map<String, Value>>>,
    pub upload_headers: Option<Vec<String>>,
    pub calls: Mutex<Vec<String>>,
}

impl FakeGateway {
    pub fn answering(answer: &str) -> Self {
        Self {
            answer: Some(answer.to_string()),
            answer_id: Some("result_1".to_string()),
            ..Default::default()
        }
    }

    pub fn unreachable() -> Self {
        Self {
            unreachable: true,
            ..Default::default()
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: &str) -> AppResult<()> {
        self.calls.lock().unwrap().push(call.to_string());
        if self.unreachable {
            return Err(AppError::Connectivity("connection refused".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl AnalysisGateway for FakeGateway {
    async fn probe(&self) -> AppResult<Value> {
        self.record("probe")?;
        Ok(serde_json::json!({"message": "Connection successful"}))
    }

    async fn upload(&self, file: &UploadedFile) -> AppResult<UploadResponse> {
        self.record("upload")?;
        match &self.upload_rows {
            Some(rows) => Ok(UploadResponse {
                parsed_data: Some(rows.clone()),
                column_headers: self.upload_headers.clone(),
                file_id: Some(file.id.clone()),
                filename: Some(file.name.clone()),
                message: None,
            }),
            None => Err(AppError::InvalidResponse(
                "No parsed data received from server".to_string(),
            )),
        }
    }

    async fn analyze(&self, request: &AnalyzeRequest) -> AppResult<AnalyzeResponse> {
        self.record("analyze")?;
        if let Some(delay) = self.analyze_delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(status) = self.analyze_status {
            return Err(AppError::from_status(status, "scripted failure"));
        }
        Ok(AnalyzeResponse {
            result: self.answer.clone(),
            id: self.answer_id.clone(),
            prompt: Some(request.prompt.clone()),
            file_id: request.file_id.clone(),
            timestamp: None,
        })
    }

    async fn submit_feedback(&self, _request: &FeedbackRequest) -> AppResult<FeedbackAck> {
        self.record("feedback")?;
        Ok(FeedbackAck {
            message: Some("Feedback received".to_string()),
            feedback_id: Some(Value::from(1)),
        })
    }
}
