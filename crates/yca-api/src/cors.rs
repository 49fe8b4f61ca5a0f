use axum::http::HeaderValue;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use url::Url;

use crate::error::ApiError;

/// CORS policy admitting only the frontend origin, with credentials.
///
/// `frontend_url` may carry a path; only its scheme, host and port are kept.
pub fn cors_layer(frontend_url: &str) -> Result<CorsLayer, ApiError> {
    let origin = frontend_origin(frontend_url)?;
    let header = HeaderValue::from_str(&origin)
        .map_err(|e| ApiError::InvalidRequest(format!("invalid frontend origin '{origin}': {e}")))?;

    Ok(CorsLayer::new()
        .allow_origin(header)
        .allow_credentials(true)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request()))
}

fn frontend_origin(frontend_url: &str) -> Result<String, ApiError> {
    let url = Url::parse(frontend_url.trim())
        .map_err(|e| ApiError::InvalidRequest(format!("invalid frontend url '{frontend_url}': {e}")))?;
    let origin = url.origin();
    if !origin.is_tuple() {
        return Err(ApiError::InvalidRequest(format!(
            "frontend url '{frontend_url}' has no usable origin"
        )));
    }
    Ok(origin.ascii_serialization())
}
