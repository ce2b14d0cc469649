//! Prompt and check definitions, and the decisions they produce.

use std::fmt;
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::common::AuthorizationContext;

/// Extra decision metadata surfaced to the interaction UI.
pub type Details = Map<String, Value>;

/// Error code used when a failing check does not name one.
pub const DEFAULT_ERROR: &str = "interaction_required";

/// Description used when a failing check does not provide one.
pub const DEFAULT_DESCRIPTION: &str = "interaction is required from the end-user";

/// Decides whether a check flags its prompt as required.
#[async_trait]
pub trait CheckPredicate: Send + Sync {
    async fn check(&self, ctx: &AuthorizationContext) -> Result<bool>;
}

#[async_trait]
impl<F> CheckPredicate for F
where
    F: Fn(&AuthorizationContext) -> bool + Send + Sync,
{
    async fn check(&self, ctx: &AuthorizationContext) -> Result<bool> {
        Ok(self(ctx))
    }
}

/// Resolves the details attached to a prompt or a failing check.
#[async_trait]
pub trait DetailsResolver: Send + Sync {
    async fn details(&self, ctx: &AuthorizationContext) -> Result<Details>;
}

#[async_trait]
impl<F> DetailsResolver for F
where
    F: Fn(&AuthorizationContext) -> Details + Send + Sync,
{
    async fn details(&self, ctx: &AuthorizationContext) -> Result<Details> {
        Ok(self(ctx))
    }
}

/// Resolver for prompts and checks without details.
pub struct NoDetails;

#[async_trait]
impl DetailsResolver for NoDetails {
    async fn details(&self, _ctx: &AuthorizationContext) -> Result<Details> {
        Ok(Details::new())
    }
}

/// A single predicate that can flag its prompt as required.
#[derive(Clone)]
pub struct Check {
    /// Unique within the owning prompt.
    pub reason: String,
    pub description: Option<String>,
    pub error: Option<String>,
    details: Arc<dyn DetailsResolver>,
    predicate: Arc<dyn CheckPredicate>,
}

impl Check {
    pub fn new(reason: impl Into<String>, predicate: impl CheckPredicate + 'static) -> Self {
        Self {
            reason: reason.into(),
            description: None,
            error: None,
            details: Arc::new(NoDetails),
            predicate: Arc::new(predicate),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    pub fn with_details(mut self, details: impl DetailsResolver + 'static) -> Self {
        self.details = Arc::new(details);
        self
    }

    pub fn predicate(&self) -> &dyn CheckPredicate {
        self.predicate.as_ref()
    }

    pub fn details_resolver(&self) -> &dyn DetailsResolver {
        self.details.as_ref()
    }
}

impl fmt::Debug for Check {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Check")
            .field("reason", &self.reason)
            .field("description", &self.description)
            .field("error", &self.error)
            .finish_non_exhaustive()
    }
}

/// A named category of required end-user interaction.
#[derive(Clone)]
pub struct Prompt {
    pub name: String,
    pub checks: Vec<Check>,
    details: Arc<dyn DetailsResolver>,
}

impl Prompt {
    pub fn new(name: impl Into<String>, checks: Vec<Check>) -> Self {
        Self {
            name: name.into(),
            checks,
            details: Arc::new(NoDetails),
        }
    }

    pub fn with_details(mut self, details: impl DetailsResolver + 'static) -> Self {
        self.details = Arc::new(details);
        self
    }

    pub fn details_resolver(&self) -> &dyn DetailsResolver {
        self.details.as_ref()
    }
}

impl fmt::Debug for Prompt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Prompt")
            .field("name", &self.name)
            .field("checks", &self.checks)
            .finish_non_exhaustive()
    }
}

/// Produced for each check whose predicate returned true.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckFailure {
    pub reason: String,
    pub error: Option<String>,
    pub description: Option<String>,
    pub details: Details,
}

/// The prompt selected for the request and why.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptDecision {
    pub name: String,
    /// Failing reasons in configured check order; never empty.
    pub reasons: Vec<String>,
    pub details: Details,
}

/// Error surfaced when the request may not prompt the end-user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrimaryFailure {
    pub error: String,
    pub error_description: String,
}

impl From<&CheckFailure> for PrimaryFailure {
    fn from(failure: &CheckFailure) -> Self {
        Self {
            error: failure
                .error
                .clone()
                .unwrap_or_else(|| DEFAULT_ERROR.to_string()),
            error_description: failure
                .description
                .clone()
                .unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primary_failure_defaults() {
        let failure = CheckFailure {
            reason: "custom".to_string(),
            error: None,
            description: None,
            details: Details::new(),
        };

        let primary = PrimaryFailure::from(&failure);
        assert_eq!(primary.error, "interaction_required");
        assert_eq!(primary.error_description, "interaction is required from the end-user");
    }

    #[test]
    fn test_primary_failure_keeps_configured_values() {
        let failure = CheckFailure {
            reason: "no_session".to_string(),
            error: Some("login_required".to_string()),
            description: Some("End-User authentication is required".to_string()),
            details: Details::new(),
        };

        let primary = PrimaryFailure::from(&failure);
        assert_eq!(primary.error, "login_required");
        assert_eq!(primary.error_description, "End-User authentication is required");
    }

    #[tokio::test]
    async fn test_closure_predicates_and_details() {
        let check = Check::new("no_session", |ctx: &AuthorizationContext| {
            ctx.account_id().is_none()
        })
        .with_details(|ctx: &AuthorizationContext| {
            let mut details = Details::new();
            details.insert("uid".to_string(), Value::String(ctx.uid.clone()));
            details
        });

        let ctx = AuthorizationContext {
            uid: "abc".to_string(),
            ..AuthorizationContext::default()
        };

        assert!(check.predicate().check(&ctx).await.unwrap());
        let details = check.details_resolver().details(&ctx).await.unwrap();
        assert_eq!(details.get("uid"), Some(&Value::String("abc".to_string())));
    }
}
