//! Scrape endpoint

use crate::api::state::AppState;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use wamon_metrics::{export_metrics, CONTENT_TYPE_TEXT};

/// Handler for `GET /metrics`: run one collection pass, then render the registry
///
/// Collection degradation never turns into an HTTP error here; the
/// endpoint always returns whatever snapshot the registry holds.
pub async fn metrics(State(state): State<AppState>) -> Response {
    state.runner.run_pass().await;
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, CONTENT_TYPE_TEXT)],
        export_metrics(&state.registry),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::unreachable_state;

    #[tokio::test]
    async fn test_scrape_returns_snapshot_with_everything_down() {
        let state = unreachable_state();

        let response = metrics(State(state)).await;

        assert_eq!(response.status(), StatusCode::OK);
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        assert_eq!(content_type, CONTENT_TYPE_TEXT);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        let text = String::from_utf8(body.to_vec()).expect("utf8 body");
        // Both collectors failed, yet the snapshot renders with the
        // connectivity gauges at their failure sentinels.
        assert!(text.contains("whatsapp_db_connection_status 0"));
        assert!(text.contains("whatsapp_connection_status 0"));
        assert!(text.contains("whatsapp_exporter_scrape_duration_seconds"));
    }
}
