//! Process-wide interaction configuration, built once at startup.

use std::collections::HashSet;

use anyhow::{bail, Result};

use super::policy::default_prompts;
use super::prompt::Prompt;
use super::session::CookieOptions;

/// Names of the two short-lived interaction cookies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CookieNames {
    pub interaction: String,
    pub resume: String,
}

impl Default for CookieNames {
    fn default() -> Self {
        Self {
            interaction: "_interaction".to_string(),
            resume: "_interaction_resume".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct InteractionsConfig {
    prompts: Vec<Prompt>,
    pub cookies: CookieOptions,
    pub cookie_names: CookieNames,
}

impl InteractionsConfig {
    /// Validate an ordered prompt list.
    ///
    /// Prompt names must be unique, and so must check reasons within a prompt.
    pub fn new(prompts: Vec<Prompt>) -> Result<Self> {
        let mut names = HashSet::new();
        for prompt in &prompts {
            if !names.insert(prompt.name.as_str()) {
                bail!("duplicate prompt name: {}", prompt.name);
            }

            let mut reasons = HashSet::new();
            for check in &prompt.checks {
                if !reasons.insert(check.reason.as_str()) {
                    bail!(
                        "duplicate check reason {} in prompt {}",
                        check.reason,
                        prompt.name
                    );
                }
            }
        }

        Ok(Self {
            prompts,
            cookies: CookieOptions::default(),
            cookie_names: CookieNames::default(),
        })
    }

    /// Configuration with the default login and consent prompts.
    pub fn with_default_prompts() -> Result<Self> {
        Self::new(default_prompts())
    }

    pub fn with_cookies(mut self, cookies: CookieOptions) -> Self {
        self.cookies = cookies;
        self
    }

    pub fn with_cookie_names(mut self, cookie_names: CookieNames) -> Self {
        self.cookie_names = cookie_names;
        self
    }

    pub fn prompts(&self) -> &[Prompt] {
        &self.prompts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::AuthorizationContext;
    use crate::domains::interactions::Check;

    fn check(reason: &str) -> Check {
        Check::new(reason, |_: &AuthorizationContext| false)
    }

    #[test]
    fn test_duplicate_prompt_names_rejected() {
        let result = InteractionsConfig::new(vec![
            Prompt::new("login", vec![check("a")]),
            Prompt::new("login", vec![check("b")]),
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_duplicate_reasons_rejected() {
        let result = InteractionsConfig::new(vec![Prompt::new("login", vec![check("a"), check("a")])]);
        assert!(result.is_err());
    }

    #[test]
    fn test_same_reason_in_different_prompts_allowed() {
        let config = InteractionsConfig::new(vec![
            Prompt::new("login", vec![check("a")]),
            Prompt::new("consent", vec![check("a")]),
        ])
        .unwrap();
        assert_eq!(config.prompts().len(), 2);
        assert_eq!(config.cookie_names.interaction, "_interaction");
    }

    #[test]
    fn test_default_prompts_are_valid() {
        let config = InteractionsConfig::with_default_prompts().unwrap();
        let names: Vec<_> = config.prompts().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["login", "consent"]);
    }
}
