pub mod admin;
pub mod chat;
pub mod health;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::catch_panic::CatchPanicLayer;

use crate::errors::panic_response;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health::root_handler))
        .route("/health", get(health::health_handler))
        .route("/chat", post(chat::handle_chat))
        // Admin (unauthenticated, read-only)
        .route("/admin/logs/:date", get(admin::handle_get_logs))
        .route("/admin/analytics", get(admin::handle_analytics))
        .with_state(state)
        .layer(CatchPanicLayer::custom(panic_response))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use chrono::Local;
    use serde_json::{json, Value};
    use tempfile::TempDir;
    use tower::ServiceExt;

    use super::*;
    use crate::agent::browser::fixture::FixtureLauncher;
    use crate::agent::browser::{Browser, BrowserError, BrowserLauncher};
    use crate::agent::orchestrator::tests::{agent_with, naver_browser, write_resume};
    use crate::chat_log::ChatLog;
    use crate::resume_store::ResumeStore;

    struct Harness {
        router: Router,
        chat_log: ChatLog,
        _dir: TempDir,
    }

    /// Panics on launch, standing in for a bug deep inside a turn.
    struct PanickingLauncher;

    #[async_trait]
    impl BrowserLauncher for PanickingLauncher {
        async fn launch(&self) -> Result<Arc<dyn Browser>, BrowserError> {
            panic!("browser process crashed");
        }
    }

    fn harness_with(
        store: impl FnOnce(&std::path::Path) -> ResumeStore,
        launcher: Arc<dyn BrowserLauncher>,
    ) -> Harness {
        let dir = tempfile::tempdir().unwrap();
        let chat_log = ChatLog::new(dir.path().join("logs"));
        let agent = agent_with(store(dir.path()), launcher);
        let state = AppState {
            agent: Arc::new(agent),
            chat_log: chat_log.clone(),
        };
        Harness {
            router: build_router(state),
            chat_log,
            _dir: dir,
        }
    }

    fn harness() -> Harness {
        harness_with(write_resume, Arc::new(FixtureLauncher::new(naver_browser())))
    }

    async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn post_chat(body: Value) -> Request<Body> {
        post_raw_chat(&body.to_string())
    }

    fn post_raw_chat(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/chat")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_root_and_health() {
        let h = harness();
        let (status, body) = send(&h.router, get("/")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "AI Portfolio Agent v2.0");
        assert_eq!(body["status"], "running");

        let (status, body) = send(&h.router, get("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["service"], "portfolio-api");
    }

    #[tokio::test]
    async fn test_chat_company_turn_is_answered_and_logged() {
        let h = harness();
        let (status, body) = send(
            &h.router,
            post_chat(json!({"message": "네이버에 지원하는 이유는?", "session_id": "abc"})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["session_id"], "abc");
        assert_eq!(body["detected_company"], "네이버");
        assert!(body["response"].as_str().unwrap().contains("네이버 검색 백엔드 개발"));
        assert_eq!(body["agent_actions"][0], "🎯 네이버 관련 질문 감지");

        let logged = h.chat_log.read_today().await.unwrap().unwrap();
        assert_eq!(logged.len(), 1);
        assert_eq!(logged[0].session_id, "abc");
        assert_eq!(logged[0].company.as_deref(), Some("네이버"));
        assert_eq!(logged[0].user_message, "네이버에 지원하는 이유는?");
    }

    #[tokio::test]
    async fn test_chat_general_turn_mints_session_id() {
        let h = harness();
        let (status, body) = send(&h.router, post_chat(json!({"message": "경력을 알려주세요"}))).await;

        assert_eq!(status, StatusCode::OK);
        let session_id = body["session_id"].as_str().unwrap();
        assert!(uuid::Uuid::parse_str(session_id).is_ok());
        assert!(body.get("detected_company").is_none());
        assert_eq!(body["agent_actions"], json!(["💬 일반 질문 응답 완료 (경력)"]));
    }

    #[tokio::test]
    async fn test_chat_blank_message_is_rejected() {
        let h = harness();
        let (status, body) = send(&h.router, post_chat(json!({"message": "   "}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert!(h.chat_log.read_today().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_chat_unparseable_body_uses_error_envelope() {
        let h = harness();

        let (status, body) = send(&h.router, post_chat(json!({"session_id": "abc"}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");

        let (status, body) = send(&h.router, post_raw_chat("{\"message\": ")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");

        assert!(h.chat_log.read_today().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_chat_panic_during_turn_is_opaque_500() {
        let h = harness_with(write_resume, Arc::new(PanickingLauncher));

        let (status, body) = send(&h.router, post_chat(json!({"message": "네이버 지원 동기"}))).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"]["code"], "INTERNAL_ERROR");
        assert_eq!(body["error"]["message"], "Agent processing failed");

        // The router keeps serving after a panicked turn.
        let (status, _) = send(&h.router, get("/health")).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_chat_missing_resume_is_opaque_500() {
        let h = harness_with(
            |dir| ResumeStore::new(dir.join("absent.json")),
            Arc::new(FixtureLauncher::new(naver_browser())),
        );
        let (status, body) = send(&h.router, post_chat(json!({"message": "안녕하세요"}))).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"]["message"], "Agent processing failed");
    }

    #[tokio::test]
    async fn test_admin_logs_by_date() {
        let h = harness();
        send(&h.router, post_chat(json!({"message": "프로젝트 소개해주세요"}))).await;

        let today = Local::now().format("%Y%m%d").to_string();
        let (status, body) = send(&h.router, get(&format!("/admin/logs/{today}"))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["logs"].as_array().unwrap().len(), 1);
        assert!(body.get("message").is_none());

        let (status, body) = send(&h.router, get("/admin/logs/19990101")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["logs"], json!([]));
        assert_eq!(body["message"], "No logs found for this date");

        let (status, _) = send(&h.router, get("/admin/logs/yesterday")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_admin_analytics() {
        let h = harness();
        let (_, body) = send(&h.router, get("/admin/analytics")).await;
        assert_eq!(body["message"], "No data for today");

        send(&h.router, post_chat(json!({"message": "네이버 어때요"}))).await;
        send(&h.router, post_chat(json!({"message": "안녕하세요"}))).await;

        let (status, body) = send(&h.router, get("/admin/analytics")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total_chats_today"], 2);
        assert_eq!(body["companies"], json!({"네이버": 1}));
        assert_eq!(body["most_active_company"], "네이버");
    }
}
