pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::state::AppState;
use crate::worksheet::handlers;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Worksheet API
        .route(
            "/api/words/generatePdf",
            post(handlers::handle_generate_pdf),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
    };
    use tower::ServiceExt;

    use super::*;
    use crate::config::Config;
    use crate::store::memory::MemoryWordStore;
    use crate::worksheet::FontHandle;

    fn test_state() -> AppState {
        let store = MemoryWordStore::new()
            .with_word(1, "cat", "猫", &[7])
            .with_word(2, "dog", "狗", &[]);
        AppState {
            words: Arc::new(store),
            font: Arc::new(FontHandle::latin_fallback()),
            config: Config {
                database_url: "postgres://localhost/test".to_string(),
                db_max_connections: 1,
                font_dir: "fonts".into(),
                port: 0,
                rust_log: "debug".to_string(),
            },
        }
    }

    fn post_json(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/words/generatePdf")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let response = build_router(test_state())
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_generate_pdf_returns_attachment() {
        let response = build_router(test_state())
            .oneshot(post_json(r#"{"wordIds":[2],"tagIds":[7],"mode":"默写英文"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/pdf");
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=words.pdf"
        );

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert!(body.starts_with(b"%PDF-"));
    }

    #[tokio::test]
    async fn test_generate_pdf_rejects_unknown_mode() {
        let response = build_router(test_state())
            .oneshot(post_json(r#"{"wordIds":[1],"mode":"Spelling"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"]["code"], "VALIDATION_ERROR");
    }
}
