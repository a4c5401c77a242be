// API diagnostics: exercise each service endpoint with a canned request

use serde::Serialize;
use tracing::{info, warn};

use crate::gateway::AnalysisGateway;
use crate::models::{AnalyzeRequest, FileContent, UploadedFile};

pub const SAMPLE_FILE_NAME: &str = "test.csv";
pub const SAMPLE_FILE_CONTENT: &str = "name,age\nJohn,30\nJane,25";
pub const SAMPLE_PROMPT: &str = "Test prompt";

#[derive(Debug, Clone, Serialize)]
pub struct EndpointCheck {
    pub endpoint: String,
    pub status: String,
    pub detail: String,
}

impl EndpointCheck {
    fn ok(endpoint: &str, detail: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            status: "ok".to_string(),
            detail: detail.into(),
        }
    }

    fn error(endpoint: &str, detail: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            status: "error".to_string(),
            detail: detail.into(),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == "ok"
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DiagnosticsReport {
    pub base_url: String,
    pub timestamp: String,
    pub checks: Vec<EndpointCheck>,
}

impl DiagnosticsReport {
    pub fn all_ok(&self) -> bool {
        self.checks.iter().all(EndpointCheck::is_ok)
    }
}

/// Probe, upload a small sample file, then analyze against it.
///
/// Each step runs even if an earlier one failed.
pub async fn run_diagnostics(gateway: &dyn AnalysisGateway, base_url: &str) -> DiagnosticsReport {
    let mut checks = Vec::with_capacity(3);

    checks.push(match gateway.probe().await {
        Ok(body) => EndpointCheck::ok("GET /test", body.to_string()),
        Err(e) => EndpointCheck::error("GET /test", e.user_message()),
    });

    let sample = UploadedFile::new(
        SAMPLE_FILE_NAME,
        FileContent::Text(SAMPLE_FILE_CONTENT.to_string()),
    );
    checks.push(match gateway.upload(&sample).await {
        Ok(upload) => {
            let rows = upload.parsed_data.map(|d| d.len()).unwrap_or(0);
            EndpointCheck::ok("POST /upload", format!("{} rows parsed", rows))
        }
        Err(e) => EndpointCheck::error("POST /upload", e.user_message()),
    });

    let request = AnalyzeRequest {
        prompt: SAMPLE_PROMPT.to_string(),
        file_id: Some(sample.id.clone()),
    };
    checks.push(match gateway.analyze(&request).await {
        Ok(response) => EndpointCheck::ok(
            "POST /analyze",
            response.result.unwrap_or_else(|| "no result".to_string()),
        ),
        Err(e) => EndpointCheck::error("POST /analyze", e.user_message()),
    });

    let report = DiagnosticsReport {
        base_url: base_url.to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        checks,
    };
    if report.all_ok() {
        info!(base_url, "Diagnostics passed");
    } else {
        warn!(base_url, "Diagnostics found failing endpoints");
    }
    report
}
