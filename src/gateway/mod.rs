//! Analysis Service Gateway
//!
//! Thin pass-through to the remote analysis backend:
//!
//! - `GET  /test`     - connectivity probe
//! - `POST /upload`   - multipart file upload, returns parsed rows
//! - `POST /analyze`  - natural-language prompt about a file
//! - `POST /feedback` - thumbs up/down on an answer
//!
//! The session and TUI only talk to the [`AnalysisGateway`] trait so tests can
//! swap in a scripted implementation.

pub mod http;
#[cfg(test)]
pub mod fake;

pub use http::HttpGateway;

use async_trait::async_trait;

use crate::models::{
    AnalyzeRequest, AnalyzeResponse, FeedbackAck, FeedbackRequest, UploadResponse, UploadedFile,
};
use crate::types::AppResult;

#[async_trait]
pub trait AnalysisGateway: Send + Sync {
    /// Succeeds when the service answers the probe with a 2xx status.
    async fn probe(&self) -> AppResult<serde_json::Value>;

    async fn upload(&self, file: &UploadedFile) -> AppResult<UploadResponse>;

    async fn analyze(&self, request: &AnalyzeRequest) -> AppResult<AnalyzeResponse>;

    async fn submit_feedback(&self, request: &FeedbackRequest) -> AppResult<FeedbackAck>;
}
