//! Default prompt policy: `login` then `consent`.
//!
//! Login checks only fire for a missing or unusable session; consent checks
//! only run once login is satisfied because prompts are evaluated in order.

use chrono::Utc;
use serde_json::Value;

use super::prompt::{Check, Details, Prompt};
use crate::common::AuthorizationContext;

pub fn default_prompts() -> Vec<Prompt> {
    vec![login_prompt(), consent_prompt()]
}

pub fn login_prompt() -> Prompt {
    Prompt::new(
        "login",
        vec![
            Check::new("no_session", |ctx: &AuthorizationContext| {
                ctx.account_id().is_none()
            })
            .with_description("End-User authentication is required")
            .with_error("login_required"),
            Check::new("login_prompt", login_requested)
                .with_description("login prompt was not resolved")
                .with_error("login_required"),
            Check::new("max_age", max_age_exceeded)
                .with_description("End-User authentication could not be obtained")
                .with_error("login_required"),
            Check::new("essential_acr", essential_acr_unmet)
                .with_description("requested ACR could not be obtained")
                .with_error("login_required"),
        ],
    )
}

pub fn consent_prompt() -> Prompt {
    Prompt::new(
        "consent",
        vec![
            Check::new("consent_prompt", |ctx: &AuthorizationContext| {
                ctx.prompt_pending("consent")
            })
            .with_description("consent prompt was not resolved")
            .with_error("consent_required"),
            Check::new("scopes_missing", |ctx: &AuthorizationContext| {
                !missing_scope(ctx).is_empty()
            })
            .with_description("requested scopes not granted")
            .with_error("consent_required")
            .with_details(|ctx: &AuthorizationContext| {
                let mut details = Details::new();
                details.insert(
                    "missingOIDCScope".to_string(),
                    Value::from(missing_scope(ctx)),
                );
                details
            }),
        ],
    )
}

fn login_requested(ctx: &AuthorizationContext) -> bool {
    ctx.account_id().is_some() && ctx.prompt_pending("login")
}

/// `max_age` parameter, as a number or a numeric string.
fn requested_max_age(ctx: &AuthorizationContext) -> Option<i64> {
    match ctx.params.get("max_age")? {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn max_age_exceeded(ctx: &AuthorizationContext) -> bool {
    if ctx.account_id().is_none() {
        return false;
    }
    let Some(max_age) = requested_max_age(ctx) else {
        return false;
    };

    match ctx.session.auth_time {
        // Deadlines past the i64 range never expire
        Some(auth_time) => auth_time
            .checked_add(max_age)
            .is_some_and(|deadline| deadline < Utc::now().timestamp()),
        None => true,
    }
}

/// Values of an essential `acr` claim requested through the `claims` parameter.
fn essential_acr_values(ctx: &AuthorizationContext) -> Option<Vec<String>> {
    let claims = match ctx.params.get("claims")? {
        Value::String(raw) => serde_json::from_str::<Value>(raw).ok()?,
        value => value.clone(),
    };
    let acr = claims.get("id_token")?.get("acr")?;
    if acr.get("essential").and_then(Value::as_bool) != Some(true) {
        return None;
    }

    if let Some(value) = acr.get("value").and_then(Value::as_str) {
        return Some(vec![value.to_string()]);
    }
    let values = acr
        .get("values")?
        .as_array()?
        .iter()
        .filter_map(Value::as_str)
        .map(str::to_string)
        .collect();
    Some(values)
}

fn essential_acr_unmet(ctx: &AuthorizationContext) -> bool {
    if ctx.account_id().is_none() {
        return false;
    }
    let Some(values) = essential_acr_values(ctx) else {
        return false;
    };

    match &ctx.session.acr {
        Some(acr) => !values.contains(acr),
        None => true,
    }
}

/// Requested scope values the account has not been granted, sorted.
fn missing_scope(ctx: &AuthorizationContext) -> Vec<String> {
    ctx.requested_scope()
        .difference(&ctx.granted_scope)
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::{AuthorizationParams, EndUserSession};
    use crate::domains::interactions::evaluator::evaluate_prompt;
    use serde_json::json;

    fn ctx(params: Value) -> AuthorizationContext {
        let params: AuthorizationParams = match params {
            Value::Object(map) => map,
            _ => AuthorizationParams::new(),
        };
        AuthorizationContext::from_params("uid-1", "authorization", params)
    }

    #[tokio::test]
    async fn test_login_required_without_session() {
        let found = evaluate_prompt(&login_prompt(), &ctx(json!({})))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(found.decision.reasons, vec!["no_session"]);
        assert_eq!(found.primary.error, "login_required");
    }

    #[tokio::test]
    async fn test_login_satisfied_by_recent_session() {
        let mut session = EndUserSession::authenticated("acct-1");
        session.auth_time = Some(Utc::now().timestamp() - 10);
        let ctx = ctx(json!({ "max_age": "300" })).with_session(session);

        let found = evaluate_prompt(&login_prompt(), &ctx).await.unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_stale_session_and_login_prompt() {
        let mut session = EndUserSession::authenticated("acct-1");
        session.auth_time = Some(Utc::now().timestamp() - 3600);
        let ctx = ctx(json!({ "max_age": 60, "prompt": "login" })).with_session(session);

        let found = evaluate_prompt(&login_prompt(), &ctx)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.decision.reasons, vec!["login_prompt", "max_age"]);
        assert_eq!(found.primary.error_description, "login prompt was not resolved");
    }

    #[tokio::test]
    async fn test_huge_max_age_never_expires() {
        let mut session = EndUserSession::authenticated("acct-1");
        session.auth_time = Some(Utc::now().timestamp() - 10);
        let ctx = ctx(json!({ "max_age": i64::MAX.to_string() })).with_session(session);

        assert!(!max_age_exceeded(&ctx));
        let found = evaluate_prompt(&login_prompt(), &ctx).await.unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_essential_acr() {
        let claims = json!({ "id_token": { "acr": { "essential": true, "values": ["gold", "silver"] } } });

        let mut session = EndUserSession::authenticated("acct-1");
        session.acr = Some("bronze".to_string());
        let unmet = ctx(json!({ "claims": claims.to_string() })).with_session(session.clone());
        assert!(essential_acr_unmet(&unmet));

        session.acr = Some("silver".to_string());
        let met = ctx(json!({ "claims": claims })).with_session(session);
        assert!(!essential_acr_unmet(&met));
    }

    #[tokio::test]
    async fn test_missing_scope_details() {
        let ctx = ctx(json!({ "scope": "openid email profile" }))
            .with_session(EndUserSession::authenticated("acct-1"))
            .with_granted_scope(["openid"]);

        let found = evaluate_prompt(&consent_prompt(), &ctx)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.decision.name, "consent");
        assert_eq!(found.decision.reasons, vec!["scopes_missing"]);
        assert_eq!(
            found.decision.details.get("missingOIDCScope"),
            Some(&json!(["email", "profile"]))
        );
    }
}
