//! REST API Server for the Scam Interceptor
//!
//! Thin endpoint layer over the pipeline: parses requests, calls
//! `Interceptor::analyze`, wraps responses. No analysis logic lives here.

use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::agent::Interceptor;
use crate::models::{EntityKind, ExtractedEntity};

/// =============================
/// Request Models
/// =============================

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    #[serde(alias = "sessionId")]
    pub session_id: String,
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct CheckRequest {
    #[serde(rename = "type")]
    pub check_type: String,
    pub value: String,
}

/// =============================
/// Response Wrapper
/// =============================

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse {
    pub success: bool,
    pub data: Option<serde_json::Value>,
    pub error: Option<String>,
    pub timestamp: String,
}

impl ApiResponse {
    pub fn success<T: Serialize>(data: T) -> Self {
        Self {
            success: true,
            data: serde_json::to_value(data).ok(),
            error: None,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn error(message: String) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// =============================
/// API State
/// =============================

#[derive(Clone)]
pub struct ApiState {
    pub interceptor: Arc<Interceptor>,
}

/// =============================
/// Health Endpoint
/// =============================

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// =============================
/// Analysis Endpoint
/// =============================

async fn analyze_message(
    State(state): State<ApiState>,
    Json(req): Json<AnalyzeRequest>,
) -> (StatusCode, Json<ApiResponse>) {
    info!(session_id = %req.session_id, "Received analyze request");

    match state.interceptor.analyze(&req.session_id, &req.message).await {
        Ok(result) => (StatusCode::OK, Json(ApiResponse::success(result))),
        Err(e) => (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::error(format!("Analysis failed: {}", e))),
        ),
    }
}

/// =============================
/// Single-Entity Check Endpoint
/// =============================

async fn check_entity(
    State(state): State<ApiState>,
    Json(req): Json<CheckRequest>,
) -> (StatusCode, Json<ApiResponse>) {
    let kind = match req.check_type.to_lowercase().as_str() {
        "link" | "url" => EntityKind::Url,
        "phone" => EntityKind::Phone,
        "upi" | "vpa" => EntityKind::PaymentHandle,
        other => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ApiResponse::error(format!("Unknown check type: {}", other))),
            );
        }
    };

    let entity = ExtractedEntity {
        kind,
        value: req.value,
        position: 0,
    };

    match state.interceptor.check_entity(&entity).await {
        Some(finding) => (StatusCode::OK, Json(ApiResponse::success(finding))),
        None => (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::error("No analyzer for this entity kind".to_string())),
        ),
    }
}

/// =============================
/// Router
/// =============================

pub fn create_router(interceptor: Arc<Interceptor>) -> Router {
    let state = ApiState { interceptor };

    Router::new()
        .route("/health", axum::routing::get(health))
        .route("/api/analyze", post(analyze_message))
        .route("/api/check", post(check_entity))
        .with_state(state)
        .layer(CorsLayer::permissive())
}

/// =============================
/// Server Startup
/// =============================

pub async fn start_server(
    interceptor: Arc<Interceptor>,
    port: u16,
) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let router = create_router(interceptor);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;

    info!("API Server listening on http://0.0.0.0:{}", port);
    info!("Local: http://127.0.0.1:{}", port);

    axum::serve(listener, router).await?;

    Ok(())
}
