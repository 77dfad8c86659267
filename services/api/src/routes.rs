use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use nu_admissions::workflows::admissions::{
    admissions_router, AdmissionsService, IdentifierRepository, NotificationPublisher,
};
use serde_json::json;
use std::sync::Arc;

pub(crate) fn with_admission_routes<R, N>(service: Arc<AdmissionsService<R, N>>) -> axum::Router
where
    R: IdentifierRepository + 'static,
    N: NotificationPublisher + 'static,
{
    admissions_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::{InMemoryIdentifierRepository, InMemoryNotificationPublisher};
    use axum::body::Body;
    use axum::http::Request;
    use metrics_exporter_prometheus::PrometheusBuilder;
    use nu_admissions::workflows::admissions::{Catalog, InMemorySequenceSource};
    use serde_json::Value;
    use std::sync::atomic::{AtomicBool, Ordering};
    use tower::ServiceExt;

    fn service_with_outbox() -> (
        Arc<AdmissionsService<InMemoryIdentifierRepository, InMemoryNotificationPublisher>>,
        Arc<InMemoryNotificationPublisher>,
    ) {
        let notices = Arc::new(InMemoryNotificationPublisher::default());
        let service = AdmissionsService::new(
            Arc::new(Catalog::standard()),
            Arc::new(InMemorySequenceSource::default()),
            Arc::new(InMemoryIdentifierRepository::default()),
            notices.clone(),
        );
        (Arc::new(service), notices)
    }

    fn app_state(ready: bool) -> AppState {
        let recorder = PrometheusBuilder::new().build_recorder();
        AppState {
            readiness: Arc::new(AtomicBool::new(ready)),
            metrics: Arc::new(recorder.handle()),
        }
    }

    async fn read_json(response: axum::response::Response) -> Value {
        let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
            .await
            .expect("read body");
        serde_json::from_slice(&body).expect("json payload")
    }

    #[tokio::test]
    async fn healthcheck_reports_ok() {
        let Json(body) = healthcheck().await;
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn readiness_follows_flag() {
        let (service, _) = service_with_outbox();
        let state = app_state(false);
        let app = with_admission_routes(service).layer(Extension(state.clone()));

        let response = app
            .clone()
            .oneshot(Request::get("/ready").body(Body::empty()).expect("request"))
            .await
            .expect("router responds");
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        state.readiness.store(true, Ordering::Release);
        let response = app
            .oneshot(Request::get("/ready").body(Body::empty()).expect("request"))
            .await
            .expect("router responds");
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(read_json(response).await["status"], "ready");
    }

    #[tokio::test]
    async fn issuing_through_the_service_routes_queues_a_notice() {
        let (service, notices) = service_with_outbox();
        let app = with_admission_routes(service).layer(Extension(app_state(true)));

        let request = Request::post("/api/v1/identifiers")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(
                json!({
                    "student_name": "Nusrat Jahan",
                    "program": "bachelor",
                    "department": "eee",
                    "year": 2024
                })
                .to_string(),
            ))
            .expect("request");
        let response = app.oneshot(request).await.expect("router responds");
        assert_eq!(response.status(), StatusCode::CREATED);

        let body = read_json(response).await;
        assert_eq!(body["university_id"], "NU24BEE001");
        assert_eq!(body["ugc_id"], "UGC-NU-2024-EE-000001-7");
        assert_eq!(body["batch"], "2024-28");

        let events = notices.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].template, "identifiers_issued");
        assert_eq!(events[0].university_id, "NU24BEE001");
    }

    #[tokio::test]
    async fn metrics_endpoint_serves_text_exposition() {
        let response = metrics_endpoint(Extension(app_state(true)))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/plain; version=0.0.4"
        );
    }
}
