use aaprov_core::AppError;
use axum::extract::{Request, State};
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::Response;
use url::form_urlencoded;

use crate::error::ApiResult;
use crate::state::AppState;

/// Header carrying the shared function key.
pub const FUNCTION_KEY_HEADER: &str = "x-functions-key";

/// Query parameter accepted as an alternative to the header.
pub const FUNCTION_KEY_QUERY: &str = "code";

pub async fn require_function_key(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> ApiResult<Response> {
    if !presented_key_matches(request.headers(), request.uri().query(), &state.function_key) {
        return Err(AppError::Unauthorized("valid function key required".to_owned()).into());
    }

    Ok(next.run(request).await)
}

pub(crate) fn presented_key_matches(
    headers: &HeaderMap,
    query: Option<&str>,
    expected: &str,
) -> bool {
    let header_key = headers
        .get(FUNCTION_KEY_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned);
    let presented = header_key.or_else(|| {
        query.and_then(|query| {
            form_urlencoded::parse(query.as_bytes())
                .find(|(name, _)| name == FUNCTION_KEY_QUERY)
                .map(|(_, value)| value.into_owned())
        })
    });

    presented.is_some_and(|key| !expected.is_empty() && key == expected)
}
