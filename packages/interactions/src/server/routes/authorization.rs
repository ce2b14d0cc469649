use std::collections::HashMap;

use axum::{
    extract::{Query, State},
    http::{
        header::{LOCATION, SET_COOKIE},
        HeaderMap, HeaderName, StatusCode,
    },
    response::{AppendHeaders, IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use tracing::{error, warn};
use url::Url;
use uuid::Uuid;

use crate::common::{AuthorizationContext, AuthorizationParams, EndUserSession, InteractionError};
use crate::domains::interactions::{InteractionOutcome, InteractionRedirect};
use crate::server::app::AppState;

/// Header carrying the authenticated account (stands in for the session cookie)
pub const ACCOUNT_HEADER: &str = "x-account-id";

/// Header carrying the space-delimited granted scope
pub const GRANTED_SCOPE_HEADER: &str = "x-granted-scope";

/// Authorization endpoint
///
/// Parses the query into an authorization context and runs the interaction
/// resolver:
/// - no interaction needed: 200 with `{ "status": "accepted" }`
/// - interaction needed: redirect to the interaction with both cookies set
/// - failure: the error payload, or a redirect back to the client
pub async fn authorization_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    let params: AuthorizationParams = query
        .into_iter()
        .map(|(key, value)| (key, Value::String(value)))
        .collect();

    let mut ctx = AuthorizationContext::from_params(Uuid::new_v4().to_string(), "authorization", params);
    if let Some(account_id) = header_str(&headers, ACCOUNT_HEADER) {
        ctx = ctx.with_session(EndUserSession::authenticated(account_id));
    }
    if let Some(scope) = header_str(&headers, GRANTED_SCOPE_HEADER) {
        ctx = ctx.with_granted_scope(scope.split_whitespace());
    }

    match state.resolver.resolve("resume", &ctx).await {
        Ok(InteractionOutcome::Continue) => {
            Json(json!({ "status": "accepted", "uid": ctx.uid })).into_response()
        }
        Ok(InteractionOutcome::Redirect(redirect)) => redirect_response(&redirect),
        Err(err) => error_response(&err, Some(&ctx), &state.client_redirect_uris),
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty())
}

/// Redirect to the interaction, setting the interaction and resume cookies
pub fn redirect_response(redirect: &InteractionRedirect) -> Response {
    let headers: Vec<(HeaderName, String)> = std::iter::once((LOCATION, redirect.destination.clone()))
        .chain(
            redirect
                .cookies
                .iter()
                .map(|cookie| (SET_COOKIE, cookie.to_header_value())),
        )
        .collect();

    (StatusCode::FOUND, AppendHeaders(headers)).into_response()
}

/// Render a failure
///
/// 302 failures are sent back to the client's `redirect_uri` with the error
/// in the query, but only when that URI is one of `allowed_redirects`.
/// Anything else is rendered as 400.
pub fn error_response(
    err: &InteractionError,
    ctx: Option<&AuthorizationContext>,
    allowed_redirects: &[String],
) -> Response {
    let status = err.status();
    if status.is_server_error() {
        error!(error = %err, "Authorization request failed");
    } else {
        warn!(error = %err, status = status.as_u16(), "Authorization request rejected");
    }

    let body = err.body();

    if status == StatusCode::FOUND {
        if let Some(mut redirect_uri) = ctx
            .and_then(|ctx| ctx.param_str("redirect_uri"))
            .filter(|uri| allowed_redirects.iter().any(|allowed| allowed == uri))
            .and_then(|uri| Url::parse(uri).ok())
        {
            {
                let mut pairs = redirect_uri.query_pairs_mut();
                pairs.append_pair("error", &body.error);
                pairs.append_pair("error_description", &body.error_description);
                if let Some(state) = ctx.and_then(|ctx| ctx.param_str("state")) {
                    pairs.append_pair("state", state);
                }
            }
            return (
                StatusCode::FOUND,
                AppendHeaders([(LOCATION, redirect_uri.to_string())]),
            )
                .into_response();
        }
        return (StatusCode::BAD_REQUEST, Json(body)).into_response();
    }

    (status, Json(body)).into_response()
}
