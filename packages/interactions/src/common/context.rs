//! Request-scoped authorization context.
//!
//! One `AuthorizationContext` exists per in-flight authorization request. It
//! is built by the transport layer after the request parameters have been
//! parsed and the end-user session has been loaded, and is only read by the
//! interaction resolver.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Raw authorization request parameters as a plain JSON object.
pub type AuthorizationParams = Map<String, Value>;

/// The end-user session attached to the request, if any.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EndUserSession {
    pub account_id: Option<String>,
    /// Session identifier.
    pub uid: Option<String>,
    /// Session cookie identifier.
    pub jti: Option<String>,
    pub acr: Option<String>,
    pub amr: Option<Vec<String>>,
    /// Unix timestamp (seconds) of the last end-user authentication.
    pub auth_time: Option<i64>,
}

impl EndUserSession {
    /// Session with no authenticated account.
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Session for an authenticated account.
    pub fn authenticated(account_id: impl Into<String>) -> Self {
        Self {
            account_id: Some(account_id.into()),
            ..Self::default()
        }
    }

    /// The authenticated account, ignoring empty identifiers.
    pub fn account_id(&self) -> Option<&str> {
        self.account_id.as_deref().filter(|id| !id.is_empty())
    }
}

/// Device authorization grant state for device-flow requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceCode {
    pub user_code: String,
}

#[derive(Debug, Clone, Default)]
pub struct AuthorizationContext {
    /// Request correlation identifier, reused as the interaction uid.
    pub uid: String,
    /// Identifier of the route that received the request.
    pub route: String,
    pub params: AuthorizationParams,
    /// Names of parameters that arrived inside a signed request object.
    pub signed: BTreeSet<String>,
    pub session: EndUserSession,
    /// Scope granted to the resolved account for this request.
    pub granted_scope: BTreeSet<String>,
    pub device_code: Option<DeviceCode>,
    /// Prompt values that are still pending for this request.
    pub prompts: BTreeSet<String>,
    /// Result of the previous interaction, when the request is being resumed.
    pub result: Option<Value>,
}

impl AuthorizationContext {
    /// Build a context from parsed request parameters.
    ///
    /// Pending prompts are taken from the space-delimited `prompt` parameter.
    pub fn from_params(
        uid: impl Into<String>,
        route: impl Into<String>,
        params: AuthorizationParams,
    ) -> Self {
        let prompts = params
            .get("prompt")
            .and_then(Value::as_str)
            .map(|prompt| prompt.split_whitespace().map(str::to_string).collect())
            .unwrap_or_default();

        Self {
            uid: uid.into(),
            route: route.into(),
            params,
            prompts,
            ..Self::default()
        }
    }

    pub fn with_session(mut self, session: EndUserSession) -> Self {
        self.session = session;
        self
    }

    pub fn with_granted_scope<I, S>(mut self, scope: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.granted_scope = scope.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_signed<I, S>(mut self, signed: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.signed = signed.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_device_code(mut self, user_code: impl Into<String>) -> Self {
        self.device_code = Some(DeviceCode {
            user_code: user_code.into(),
        });
        self
    }

    pub fn with_result(mut self, result: Value) -> Self {
        self.result = Some(result);
        self
    }

    pub fn account_id(&self) -> Option<&str> {
        self.session.account_id()
    }

    /// Space-joined granted scope, or `None` when nothing was granted.
    pub fn accepted_scope(&self) -> Option<String> {
        if self.granted_scope.is_empty() {
            return None;
        }
        Some(
            self.granted_scope
                .iter()
                .map(String::as_str)
                .collect::<Vec<_>>()
                .join(" "),
        )
    }

    pub fn prompt_pending(&self, name: &str) -> bool {
        self.prompts.contains(name)
    }

    /// `prompt=none`: the caller forbids any interactive prompt.
    pub fn is_silent(&self) -> bool {
        self.prompt_pending("none")
    }

    /// Code and device verification routes surface errors directly to the
    /// user agent instead of redirecting back to the client.
    pub fn is_code_or_device_route(&self) -> bool {
        self.route.starts_with("code_") || self.route.starts_with("device_")
    }

    pub fn param_str(&self, name: &str) -> Option<&str> {
        self.params.get(name).and_then(Value::as_str)
    }

    /// Scope values requested through the `scope` parameter.
    pub fn requested_scope(&self) -> BTreeSet<String> {
        self.param_str("scope")
            .map(|scope| scope.split_whitespace().map(str::to_string).collect())
            .unwrap_or_default()
    }
}
