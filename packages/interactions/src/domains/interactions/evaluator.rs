//! Check and prompt evaluation.
//!
//! All checks of a prompt run concurrently. Results land in one slot per
//! configured check, so failures are merged in configured order no matter
//! which predicate finishes first.

use anyhow::Result;
use futures::future::join_all;

use super::prompt::{Check, CheckFailure, PrimaryFailure, Prompt, PromptDecision};
use crate::common::AuthorizationContext;

/// A prompt whose checks flagged it as required.
#[derive(Debug, Clone, PartialEq)]
pub struct PromptMatch {
    pub decision: PromptDecision,
    pub primary: PrimaryFailure,
}

/// Run one check. Details are only resolved for failing checks.
pub async fn evaluate_check(
    check: &Check,
    ctx: &AuthorizationContext,
) -> Result<Option<CheckFailure>> {
    if !check.predicate().check(ctx).await? {
        return Ok(None);
    }

    let details = check.details_resolver().details(ctx).await?;

    Ok(Some(CheckFailure {
        reason: check.reason.clone(),
        error: check.error.clone(),
        description: check.description.clone(),
        details,
    }))
}

/// Run every check of a prompt and aggregate the failures.
///
/// Waits for all checks to complete; the first error from any of them fails
/// the whole evaluation.
pub async fn evaluate_prompt(
    prompt: &Prompt,
    ctx: &AuthorizationContext,
) -> Result<Option<PromptMatch>> {
    let slots = join_all(prompt.checks.iter().map(|check| evaluate_check(check, ctx))).await;

    let failures: Vec<CheckFailure> = slots
        .into_iter()
        .collect::<Result<Vec<_>>>()?
        .into_iter()
        .flatten()
        .collect();

    let Some(first) = failures.first() else {
        return Ok(None);
    };
    let primary = PrimaryFailure::from(first);

    let mut details = prompt.details_resolver().details(ctx).await?;
    for failure in &failures {
        details.extend(failure.details.clone());
    }

    Ok(Some(PromptMatch {
        decision: PromptDecision {
            name: prompt.name.clone(),
            reasons: failures.into_iter().map(|failure| failure.reason).collect(),
            details,
        },
        primary,
    }))
}
