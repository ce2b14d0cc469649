//! Interaction resolver
//!
//! Scans the configured prompts in order and stops at the first one whose
//! checks fail. From there the request either:
//! - continues (no prompt, grant complete),
//! - fails immediately (prompt found, `prompt=none`), or
//! - is redirected to a freshly stored interaction session.

use std::sync::Arc;

use anyhow::Result;

use super::config::InteractionsConfig;
use super::evaluator::{evaluate_prompt, PromptMatch};
use super::guard::complete_grant;
use super::prompt::Prompt;
use super::session::{start_interaction, InteractionRedirect};
use super::silent::silent_failure;
use crate::common::{AuthorizationContext, InteractionError};
use crate::kernel::InteractionDeps;

/// Terminal state of the prompt scan.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    Found(PromptMatch),
    Exhausted,
}

/// Evaluate prompts strictly in order; later prompts are not evaluated once
/// one is found.
pub async fn resolve_prompt(prompts: &[Prompt], ctx: &AuthorizationContext) -> Result<Resolution> {
    for prompt in prompts {
        if let Some(found) = evaluate_prompt(prompt, ctx).await? {
            return Ok(Resolution::Found(found));
        }
    }
    Ok(Resolution::Exhausted)
}

/// What the pipeline does next.
#[derive(Debug, Clone, PartialEq)]
pub enum InteractionOutcome {
    /// No interaction needed; continue to the next stage unchanged.
    Continue,
    /// Send the user agent to the interaction.
    Redirect(InteractionRedirect),
}

#[derive(Clone)]
pub struct InteractionResolver {
    config: Arc<InteractionsConfig>,
    deps: InteractionDeps,
}

impl InteractionResolver {
    pub fn new(config: Arc<InteractionsConfig>, deps: InteractionDeps) -> Self {
        Self { config, deps }
    }

    pub fn config(&self) -> &InteractionsConfig {
        &self.config
    }

    pub fn deps(&self) -> &InteractionDeps {
        &self.deps
    }

    /// Decide whether `ctx` needs an interaction before it can complete.
    ///
    /// `resume_route` names the route the interaction returns to (`resume`
    /// for authorization requests, `device_resume` for the device flow).
    pub async fn resolve(
        &self,
        resume_route: &str,
        ctx: &AuthorizationContext,
    ) -> Result<InteractionOutcome, InteractionError> {
        let resolution = resolve_prompt(self.config.prompts(), ctx)
            .await
            .map_err(InteractionError::Resolver)?;

        let found = match resolution {
            Resolution::Exhausted => {
                complete_grant(ctx, self.deps.events.as_ref())?;
                return Ok(InteractionOutcome::Continue);
            }
            Resolution::Found(found) => found,
        };

        if ctx.is_silent() {
            return Err(silent_failure(&found.primary, ctx).into());
        }

        let redirect =
            start_interaction(&self.config, &self.deps, resume_route, ctx, found.decision).await?;
        Ok(InteractionOutcome::Redirect(redirect))
    }
}
