//! Interaction sessions and the cookies that bind them to the user agent.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use super::config::InteractionsConfig;
use super::events::InteractionEvent;
use super::prompt::PromptDecision;
use crate::common::{AuthorizationContext, AuthorizationParams, EndUserSession, InteractionError};
use crate::kernel::{location_path, InteractionDeps};

/// Durable record that lets the interaction UI resume the original request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InteractionSession {
    pub uid: String,
    pub return_to: String,
    pub prompt: PromptDecision,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_submission: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,
    pub params: AuthorizationParams,
    pub signed: BTreeSet<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session: Option<SessionSnapshot>,
}

impl InteractionSession {
    /// Capture the state needed to resume `ctx` after the interaction.
    pub fn capture(ctx: &AuthorizationContext, return_to: String, prompt: PromptDecision) -> Self {
        Self {
            uid: ctx.uid.clone(),
            return_to,
            prompt,
            last_submission: ctx.result.clone(),
            account_id: ctx.account_id().map(str::to_string),
            params: ctx.params.clone(),
            signed: ctx.signed.clone(),
            session: SessionSnapshot::capture(&ctx.session),
        }
    }
}

/// The end-user session as it was when the interaction started.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub account_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,
    /// Session cookie identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cookie: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub acr: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amr: Option<Vec<String>>,
}

impl SessionSnapshot {
    /// `None` unless an account is established.
    pub fn capture(session: &EndUserSession) -> Option<Self> {
        let present = |value: &Option<String>| value.clone().filter(|v| !v.is_empty());

        Some(Self {
            account_id: session.account_id()?.to_string(),
            uid: present(&session.uid),
            cookie: present(&session.jti),
            acr: present(&session.acr),
            amr: session.amr.clone(),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SameSite {
    Strict,
    Lax,
    None,
}

impl SameSite {
    fn as_str(&self) -> &'static str {
        match self {
            SameSite::Strict => "Strict",
            SameSite::Lax => "Lax",
            SameSite::None => "None",
        }
    }
}

/// Options for the short-lived interaction cookies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CookieOptions {
    /// Fixed path; when unset each cookie is scoped to its own URL's path.
    pub path: Option<String>,
    pub domain: Option<String>,
    pub max_age_ms: u64,
    pub http_only: bool,
    pub secure: bool,
    pub same_site: SameSite,
}

impl Default for CookieOptions {
    fn default() -> Self {
        Self {
            path: None,
            domain: None,
            max_age_ms: 10 * 60 * 1000,
            http_only: true,
            secure: false,
            same_site: SameSite::Lax,
        }
    }
}

impl CookieOptions {
    /// Lifetime of the interaction session, in seconds.
    pub fn expires_in(&self) -> u64 {
        self.max_age_ms / 1000
    }
}

/// A cookie the transport must set on the redirect response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetCookie {
    pub name: String,
    pub value: String,
    pub path: String,
    pub options: CookieOptions,
}

impl SetCookie {
    /// `Set-Cookie` header value.
    pub fn to_header_value(&self) -> String {
        let mut header = format!(
            "{}={}; Path={}; Max-Age={}",
            self.name,
            self.value,
            self.path,
            self.options.expires_in()
        );
        if let Some(domain) = &self.options.domain {
            header.push_str(&format!("; Domain={}", domain));
        }
        if self.options.http_only {
            header.push_str("; HttpOnly");
        }
        if self.options.secure {
            header.push_str("; Secure");
        }
        header.push_str(&format!("; SameSite={}", self.options.same_site.as_str()));
        header
    }
}

/// Everything the transport needs to send the user agent to the interaction.
#[derive(Debug, Clone, PartialEq)]
pub struct InteractionRedirect {
    pub destination: String,
    pub cookies: Vec<SetCookie>,
    pub interaction: InteractionSession,
}

/// Persist an interaction session for `ctx` and build the redirect to it.
///
/// The session is saved before any cookie is produced; store and resolver
/// failures are returned as-is.
pub async fn start_interaction(
    config: &InteractionsConfig,
    deps: &InteractionDeps,
    resume_route: &str,
    ctx: &AuthorizationContext,
    prompt: PromptDecision,
) -> Result<InteractionRedirect, InteractionError> {
    let mut resume_params = vec![("uid", ctx.uid.as_str())];
    if let Some(device_code) = &ctx.device_code {
        resume_params.push(("user_code", device_code.user_code.as_str()));
    }
    let return_to = deps
        .urls
        .url_for(resume_route, &resume_params)
        .map_err(InteractionError::Resolver)?;

    let interaction = InteractionSession::capture(ctx, return_to.to_string(), prompt);

    deps.store
        .save(&interaction, config.cookies.expires_in())
        .await
        .map_err(InteractionError::Store)?;

    let destination = deps
        .interaction_url
        .resolve(ctx, &interaction)
        .await
        .map_err(InteractionError::Resolver)?;

    // A configured path wins for the interaction cookie; the resume cookie is
    // always scoped to the resume endpoint.
    let interaction_path = match &config.cookies.path {
        Some(path) => path.clone(),
        None => location_path(&destination).map_err(InteractionError::Resolver)?,
    };
    let cookies = vec![
        SetCookie {
            name: config.cookie_names.interaction.clone(),
            value: ctx.uid.clone(),
            path: interaction_path,
            options: config.cookies.clone(),
        },
        SetCookie {
            name: config.cookie_names.resume.clone(),
            value: ctx.uid.clone(),
            path: return_to.path().to_string(),
            options: config.cookies.clone(),
        },
    ];

    debug!(
        target: "interactions::interrupted",
        uid = %ctx.uid,
        interaction = ?interaction,
        "Interaction started"
    );
    deps.events.emit(&InteractionEvent::InteractionStarted {
        uid: ctx.uid.clone(),
        prompt: interaction.prompt.clone(),
    });

    Ok(InteractionRedirect {
        destination,
        cookies,
        interaction,
    })
}
