//! 텔레메트리 보고 핸들러.
//!
//! 플레이어 리포터는 측정값 하나를 쿼리 문자열로 보낸다
//! (`/report?metric_id=1&timestamp=..&delay=..&algo=..&omega=..`).

use std::collections::HashMap;

use abrbench_core::ingest;
use axum::extract::{Query, State};

use crate::error::ApiError;
use crate::AppState;

/// GET /report
///
/// 기록에 성공하면 본문 `ok`.
pub async fn report(
    State(state): State<AppState>,
    Query(fields): Query<HashMap<String, String>>,
) -> Result<&'static str, ApiError> {
    ingest::report(state.sink.as_ref(), &fields).await?;
    Ok("ok")
}

#[cfg(test)]
mod tests {
    use super::*;
    use abrbench_core::error::CoreError;
    use abrbench_core::models::telemetry::TelemetryEvent;
    use abrbench_core::ports::storage::MetricSink;
    use async_trait::async_trait;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use parking_lot::Mutex;
    use std::sync::Arc;

    #[derive(Default)]
    struct MemorySink {
        events: Mutex<Vec<TelemetryEvent>>,
    }

    #[async_trait]
    impl MetricSink for MemorySink {
        async fn append(&self, event: &TelemetryEvent) -> Result<(), CoreError> {
            self.events.lock().push(event.clone());
            Ok(())
        }
    }

    fn delay_query() -> HashMap<String, String> {
        [
            ("metric_id", "1"),
            ("timestamp", "1480000000000"),
            ("delay", "3.25"),
            ("algo", "lolypop"),
            ("omega", "10"),
            ("sigma", "3"),
            ("test_nr", "1"),
            ("run_nr", "1"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
    }

    #[tokio::test]
    async fn valid_report_is_stored() {
        let sink = Arc::new(MemorySink::default());
        let state = AppState::new(sink.clone());

        let body = report(State(state), Query(delay_query())).await.unwrap();
        assert_eq!(body, "ok");
        assert_eq!(sink.events.lock().len(), 1);
    }

    #[tokio::test]
    async fn invalid_report_is_bad_request() {
        let sink = Arc::new(MemorySink::default());
        let state = AppState::new(sink.clone());
        let mut query = delay_query();
        query.insert("delay".to_string(), "soon".to_string());

        let err = report(State(state), Query(query)).await.unwrap_err();
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
        assert!(sink.events.lock().is_empty());
    }
}
