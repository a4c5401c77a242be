// Prompt execution: probe, then analyze raced against the timeout

use std::time::Duration;

use tracing::{info, warn};

use crate::gateway::AnalysisGateway;
use crate::models::{AnalyzeRequest, AnalyzeResponse};
use crate::types::{AppError, AppResult};

/// Send one prompt to the analysis service.
///
/// The service is probed first so an unreachable backend fails fast. The
/// analyze call is then bounded by `timeout`; if it loses the race the
/// request future is dropped.
pub async fn run_prompt(
    gateway: &dyn AnalysisGateway,
    request: &AnalyzeRequest,
    timeout: Duration,
) -> AppResult<AnalyzeResponse> {
    if let Err(e) = gateway.probe().await {
        warn!(error = %e, "Service probe failed before analyze");
        return Err(AppError::Connectivity(format!(
            "Backend server unreachable, please check if it's running ({})",
            e
        )));
    }

    info!(file_id = ?request.file_id, "Sending prompt to service");
    match tokio::time::timeout(timeout, gateway.analyze(request)).await {
        Ok(result) => result,
        Err(_) => {
            warn!(timeout_secs = timeout.as_secs(), "Analyze request timed out");
            Err(AppError::Timeout(timeout))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::fake::FakeGateway;
    use crate::gateway::HttpGateway;
    use crate::models::{FileContent, PromptStatus, UploadedFile};
    use crate::session::Session;
    use crate::types::{NETWORK_ERROR_MESSAGE, TIMEOUT_MESSAGE};

    fn request() -> AnalyzeRequest {
        AnalyzeRequest {
            prompt: "Summarize".to_string(),
            file_id: Some("file-1".to_string()),
        }
    }

    #[tokio::test]
    async fn test_probe_precedes_analyze() {
        let gateway = FakeGateway::answering("Two rows.");
        let response = run_prompt(&gateway, &request(), Duration::from_secs(1))
            .await
            .unwrap();
        assert_eq!(response.result.as_deref(), Some("Two rows."));
        assert_eq!(gateway.calls(), vec!["probe", "analyze"]);
    }

    #[tokio::test]
    async fn test_failed_probe_skips_analyze() {
        let gateway = FakeGateway::unreachable();
        let err = run_prompt(&gateway, &request(), Duration::from_secs(1))
            .await
            .unwrap_err();
        assert_eq!(err.user_message(), NETWORK_ERROR_MESSAGE);
        assert_eq!(gateway.calls(), vec!["probe"]);
    }

    #[tokio::test]
    async fn test_slow_analyze_times_out() {
        let gateway = FakeGateway {
            analyze_delay: Some(Duration::from_secs(5)),
            ..FakeGateway::answering("late")
        };
        let err = run_prompt(&gateway, &request(), Duration::from_millis(50))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Timeout(_)));
        assert_eq!(err.user_message(), TIMEOUT_MESSAGE);
    }

    #[tokio::test]
    async fn test_server_fault_is_classified() {
        let gateway = FakeGateway {
            analyze_status: Some(500),
            ..FakeGateway::answering("unused")
        };
        let err = run_prompt(&gateway, &request(), Duration::from_secs(1))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Server { status: 500, .. }));
    }

    #[tokio::test]
    async fn test_summarize_without_backend_never_stays_pending() {
        let mut session = Session::default();
        session.add_files(vec![UploadedFile::new(
            "people.csv",
            FileContent::Text("name,age\nJohn,30\n".to_string()),
        )]);
        let ticket = session.begin_prompt("Summarize").unwrap();

        let gateway = HttpGateway::new("http://127.0.0.1:1/api", Duration::from_secs(2)).unwrap();
        let outcome = run_prompt(&gateway, &ticket.request, Duration::from_secs(2)).await;
        assert!(session.resolve_prompt(&ticket.token, outcome));

        let item = &session.history()[0];
        assert_eq!(item.status, PromptStatus::Failed);
        assert_eq!(item.answer, NETWORK_ERROR_MESSAGE);
    }

    #[tokio::test]
    async fn test_against_mock_service() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/test")
            .with_status(200)
            .with_body(r#"{"message": "Connection successful"}"#)
            .create_async()
            .await;
        server
            .mock("POST", "/api/analyze")
            .with_status(200)
            .with_body(r#"{"result": "There are 2 rows.", "id": "result_7"}"#)
            .create_async()
            .await;

        let gateway =
            HttpGateway::new(format!("{}/api", server.url()), Duration::from_secs(5)).unwrap();
        let response = run_prompt(&gateway, &request(), Duration::from_secs(5))
            .await
            .unwrap();
        assert_eq!(response.id.as_deref(), Some("result_7"));
    }
}
