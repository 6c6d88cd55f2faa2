//! Single-origin CORS policy.
//!
//! `CorsLayer` only decorates responses, so browsers from another origin would
//! still reach the handlers. `require_allowed_origin` turns those requests away
//! before routing. Requests without an `Origin` header are not browser
//! cross-origin calls and pass through.

use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, Method, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use configs::CorsConfig;
use tower_http::cors::CorsLayer;
use tracing::warn;

#[derive(Clone, Debug, Default)]
pub struct OriginPolicy {
    allowed: Option<HeaderValue>,
}

impl OriginPolicy {
    pub fn from_config(cfg: &CorsConfig) -> Self {
        let allowed = cfg.frontend_url.as_deref().and_then(|u| HeaderValue::from_str(u).ok());
        if allowed.is_none() {
            warn!("no frontend_url configured; CORS is permissive");
        }
        Self { allowed }
    }

    pub fn allows(&self, origin: &HeaderValue) -> bool {
        self.allowed.as_ref().map_or(true, |a| a == origin)
    }

    pub fn layer(&self) -> CorsLayer {
        match &self.allowed {
            Some(origin) => CorsLayer::new()
                .allow_origin(origin.clone())
                .allow_methods([Method::GET, Method::POST, Method::PUT, Method::PATCH, Method::DELETE])
                .allow_headers([header::CONTENT_TYPE]),
            None => CorsLayer::very_permissive(),
        }
    }
}

pub async fn require_allowed_origin(
    State(policy): State<OriginPolicy>,
    request: Request,
    next: Next,
) -> Response {
    if let Some(origin) = request.headers().get(header::ORIGIN) {
        if !policy.allows(origin) {
            warn!(origin = ?origin, path = %request.uri().path(), "rejected request from disallowed origin");
            return (StatusCode::FORBIDDEN, Json(serde_json::json!({ "error": "Origin not allowed" }))).into_response();
        }
    }
    next.run(request).await
}
