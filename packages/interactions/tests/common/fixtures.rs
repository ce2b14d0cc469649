//! Prompt configurations and contexts shared by the integration tests.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use interactions_core::common::{AuthorizationContext, AuthorizationParams, EndUserSession};
use interactions_core::domains::interactions::{Check, Details, DetailsResolver, Prompt};
use serde_json::Value;

pub const LOGIN_DESCRIPTION: &str = "End-User authentication is required";

/// `[{ name: "login", checks: [{ reason: "no_session", predicate: no account }] }]`
pub fn login_prompts() -> Vec<Prompt> {
    vec![Prompt::new(
        "login",
        vec![Check::new("no_session", |ctx: &AuthorizationContext| {
            ctx.account_id().is_none()
        })
        .with_description(LOGIN_DESCRIPTION)
        .with_error("login_required")],
    )]
}

pub fn params(value: Value) -> AuthorizationParams {
    match value {
        Value::Object(map) => map,
        _ => AuthorizationParams::new(),
    }
}

pub fn anonymous_ctx(uid: &str, route: &str, query: Value) -> AuthorizationContext {
    AuthorizationContext::from_params(uid, route, params(query))
}

pub fn signed_in_ctx(uid: &str, account_id: &str, scope: &[&str]) -> AuthorizationContext {
    AuthorizationContext::from_params(uid, "authorization", AuthorizationParams::new())
        .with_session(EndUserSession::authenticated(account_id))
        .with_granted_scope(scope.iter().copied())
}

/// Details resolver that always errors
pub struct FailingDetails;

#[async_trait]
impl DetailsResolver for FailingDetails {
    async fn details(&self, _ctx: &AuthorizationContext) -> Result<Details> {
        Err(anyhow!("details lookup failed"))
    }
}
