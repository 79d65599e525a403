use axum::http::StatusCode;

/// Unauthenticated landing endpoint, used by load balancers
#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Service is up", content_type = "text/plain", body = String)
    ),
    tag = "Health"
)]
pub async fn root() -> (StatusCode, &'static str) {
    (StatusCode::OK, "OK")
}
