use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::common::ErrorBody;
use crate::domains::interactions::interaction_details;
use crate::server::app::AppState;
use crate::server::routes::authorization::error_response;

/// Interaction details endpoint, read by the interaction UI
///
/// Returns 404 when the session is missing or expired.
pub async fn interaction_handler(State(state): State<AppState>, Path(uid): Path<String>) -> Response {
    let store = state.resolver.deps().store.as_ref();

    match interaction_details(store, &uid).await {
        Ok(Some(interaction)) => Json(interaction).into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(ErrorBody {
                error: "invalid_request".to_string(),
                error_description: "interaction session not found".to_string(),
            }),
        )
            .into_response(),
        Err(err) => error_response(&err, None, &[]),
    }
}
