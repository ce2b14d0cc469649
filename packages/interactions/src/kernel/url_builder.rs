use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use url::Url;

use super::{BaseInteractionUrl, BaseUrlBuilder};
use crate::common::AuthorizationContext;
use crate::domains::interactions::InteractionSession;

/// Builds absolute URLs for named routes under the issuer
///
/// Route templates are paths with `:param` placeholders, e.g. `/auth/:uid`.
/// Params without a placeholder are appended as query pairs.
#[derive(Debug, Clone)]
pub struct RouteUrlBuilder {
    issuer: Url,
    routes: HashMap<String, String>,
}

impl RouteUrlBuilder {
    pub fn new(issuer: Url) -> Self {
        Self {
            issuer,
            routes: HashMap::new(),
        }
    }

    /// Builder with the provider's standard routes
    pub fn with_default_routes(issuer: Url) -> Self {
        Self::new(issuer)
            .with_route("authorization", "/auth")
            .with_route("resume", "/auth/:uid")
            .with_route("code_verification", "/device")
            .with_route("device_resume", "/device/:uid")
            .with_route("interaction", "/interaction/:uid")
    }

    pub fn with_route(mut self, name: impl Into<String>, template: impl Into<String>) -> Self {
        self.routes.insert(name.into(), template.into());
        self
    }
}

impl BaseUrlBuilder for RouteUrlBuilder {
    fn url_for(&self, route: &str, params: &[(&str, &str)]) -> Result<Url> {
        let template = self
            .routes
            .get(route)
            .ok_or_else(|| anyhow!("unknown route: {}", route))?;

        let mut segments = Vec::new();
        let mut used = Vec::new();
        for segment in template.split('/').filter(|s| !s.is_empty()) {
            match segment.strip_prefix(':') {
                Some(name) => {
                    let (key, value) = params
                        .iter()
                        .find(|(key, _)| *key == name)
                        .ok_or_else(|| anyhow!("missing param {} for route {}", name, route))?;
                    used.push(*key);
                    segments.push(*value);
                }
                None => segments.push(segment),
            }
        }

        let mut url = self.issuer.clone();
        url.path_segments_mut()
            .map_err(|_| anyhow!("issuer cannot be a base URL: {}", self.issuer))?
            .pop_if_empty()
            .extend(segments);

        let query: Vec<_> = params
            .iter()
            .filter(|(key, _)| !used.contains(key))
            .collect();
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }

        Ok(url)
    }
}

/// Default interaction destination: the `interaction` route under the issuer
///
/// Yields the issuer-relative path (issuer path prefix included), e.g.
/// `/oidc/interaction/{uid}`.
#[derive(Debug, Clone)]
pub struct DefaultInteractionUrl {
    urls: RouteUrlBuilder,
}

impl DefaultInteractionUrl {
    pub fn new(urls: RouteUrlBuilder) -> Self {
        Self { urls }
    }
}

#[async_trait]
impl BaseInteractionUrl for DefaultInteractionUrl {
    async fn resolve(
        &self,
        _ctx: &AuthorizationContext,
        interaction: &InteractionSession,
    ) -> Result<String> {
        let url = self
            .urls
            .url_for("interaction", &[("uid", interaction.uid.as_str())])?;
        Ok(url.path().to_string())
    }
}

/// Path component of an absolute or issuer-relative location
pub fn location_path(location: &str) -> Result<String> {
    let base = Url::parse("http://localhost/")?;
    let url = base
        .join(location)
        .with_context(|| format!("invalid location: {}", location))?;
    Ok(url.path().to_string())
}
