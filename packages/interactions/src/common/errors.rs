use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Known OAuth 2.0 / OpenID Connect error classes.
///
/// Concrete classes are looked up by their capitalized-camel name (see
/// [`class_name`]); codes without a class fall back to a generic error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    AccessDenied,
    AccountSelectionRequired,
    ConsentRequired,
    InteractionRequired,
    InvalidClient,
    InvalidGrant,
    InvalidRequest,
    InvalidScope,
    LoginRequired,
    RegistrationNotSupported,
    RequestNotSupported,
    RequestUriNotSupported,
    ServerError,
    TemporarilyUnavailable,
    UnauthorizedClient,
    UnsupportedResponseType,
}

impl ErrorClass {
    /// Find the class registered under a capitalized-camel identifier.
    pub fn lookup(class_name: &str) -> Option<Self> {
        let class = match class_name {
            "AccessDenied" => Self::AccessDenied,
            "AccountSelectionRequired" => Self::AccountSelectionRequired,
            "ConsentRequired" => Self::ConsentRequired,
            "InteractionRequired" => Self::InteractionRequired,
            "InvalidClient" => Self::InvalidClient,
            "InvalidGrant" => Self::InvalidGrant,
            "InvalidRequest" => Self::InvalidRequest,
            "InvalidScope" => Self::InvalidScope,
            "LoginRequired" => Self::LoginRequired,
            "RegistrationNotSupported" => Self::RegistrationNotSupported,
            "RequestNotSupported" => Self::RequestNotSupported,
            "RequestUriNotSupported" => Self::RequestUriNotSupported,
            "ServerError" => Self::ServerError,
            "TemporarilyUnavailable" => Self::TemporarilyUnavailable,
            "UnauthorizedClient" => Self::UnauthorizedClient,
            "UnsupportedResponseType" => Self::UnsupportedResponseType,
            _ => return None,
        };
        Some(class)
    }

    /// Wire error code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::AccessDenied => "access_denied",
            Self::AccountSelectionRequired => "account_selection_required",
            Self::ConsentRequired => "consent_required",
            Self::InteractionRequired => "interaction_required",
            Self::InvalidClient => "invalid_client",
            Self::InvalidGrant => "invalid_grant",
            Self::InvalidRequest => "invalid_request",
            Self::InvalidScope => "invalid_scope",
            Self::LoginRequired => "login_required",
            Self::RegistrationNotSupported => "registration_not_supported",
            Self::RequestNotSupported => "request_not_supported",
            Self::RequestUriNotSupported => "request_uri_not_supported",
            Self::ServerError => "server_error",
            Self::TemporarilyUnavailable => "temporarily_unavailable",
            Self::UnauthorizedClient => "unauthorized_client",
            Self::UnsupportedResponseType => "unsupported_response_type",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidClient => StatusCode::UNAUTHORIZED,
            Self::ServerError => StatusCode::INTERNAL_SERVER_ERROR,
            Self::TemporarilyUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::BAD_REQUEST,
        }
    }

    /// Server-side failures never expose their description.
    pub fn expose(&self) -> bool {
        !matches!(self, Self::ServerError)
    }
}

/// Transform an error code into the identifier its class is registered under,
/// e.g. `login_required` -> `LoginRequired`.
pub fn class_name(error_code: &str) -> String {
    let mut words: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut previous_lower = false;

    for c in error_code.chars() {
        if !c.is_ascii_alphanumeric() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            previous_lower = false;
            continue;
        }
        // camelCase boundary
        if c.is_ascii_uppercase() && previous_lower && !current.is_empty() {
            words.push(std::mem::take(&mut current));
        }
        previous_lower = c.is_ascii_lowercase() || c.is_ascii_digit();
        current.push(c);
    }
    if !current.is_empty() {
        words.push(current);
    }

    words
        .iter()
        .map(|word| {
            let lower = word.to_ascii_lowercase();
            let mut chars = lower.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect()
}

/// Which error a failure carries: a registered class or a bare error code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OidcErrorKind {
    Known(ErrorClass),
    Generic(String),
}

impl std::fmt::Display for OidcErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OidcErrorKind::Known(class) => write!(f, "{}", class.code()),
            OidcErrorKind::Generic(code) => write!(f, "{}", code),
        }
    }
}

/// A protocol error with its transport status and visibility.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind} ({description})")]
pub struct OidcError {
    pub kind: OidcErrorKind,
    pub description: String,
    pub status: StatusCode,
    /// Whether `error` and `error_description` may be returned to the caller.
    pub expose: bool,
}

impl OidcError {
    pub fn new(class: ErrorClass, description: impl Into<String>) -> Self {
        Self {
            kind: OidcErrorKind::Known(class),
            description: description.into(),
            status: class.status(),
            expose: class.expose(),
        }
    }

    pub fn generic(
        status: StatusCode,
        error: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            kind: OidcErrorKind::Generic(error.into()),
            description: description.into(),
            status,
            expose: !status.is_server_error(),
        }
    }

    pub fn error(&self) -> &str {
        match &self.kind {
            OidcErrorKind::Known(class) => class.code(),
            OidcErrorKind::Generic(code) => code,
        }
    }

    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    pub fn exposed(mut self) -> Self {
        self.expose = true;
        self
    }
}

/// Machine-readable error payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    pub error_description: String,
}

/// Failures that terminate the current authorization attempt.
#[derive(Error, Debug)]
pub enum InteractionError {
    /// No interaction is pending but the grant is incomplete.
    #[error("access_denied ({description})")]
    AccessDenied { description: String },

    /// Interaction is required but the caller forbade it.
    #[error(transparent)]
    Oidc(#[from] OidcError),

    #[error("Interaction store error: {0}")]
    Store(#[source] anyhow::Error),

    #[error("Resolver error: {0}")]
    Resolver(#[source] anyhow::Error),
}

const SERVER_ERROR_DESCRIPTION: &str = "oops! something went wrong";

impl InteractionError {
    pub fn access_denied(description: impl Into<String>) -> Self {
        Self::AccessDenied {
            description: description.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::AccessDenied { .. } => ErrorClass::AccessDenied.status(),
            Self::Oidc(err) => err.status,
            Self::Store(_) | Self::Resolver(_) => ErrorClass::ServerError.status(),
        }
    }

    pub fn error_code(&self) -> &str {
        match self {
            Self::AccessDenied { .. } => ErrorClass::AccessDenied.code(),
            Self::Oidc(err) => err.error(),
            Self::Store(_) | Self::Resolver(_) => ErrorClass::ServerError.code(),
        }
    }

    pub fn description(&self) -> String {
        match self {
            Self::AccessDenied { description } => description.clone(),
            Self::Oidc(err) => err.description.clone(),
            Self::Store(err) | Self::Resolver(err) => err.to_string(),
        }
    }

    pub fn expose(&self) -> bool {
        match self {
            Self::AccessDenied { .. } => true,
            Self::Oidc(err) => err.expose,
            Self::Store(_) | Self::Resolver(_) => ErrorClass::ServerError.expose(),
        }
    }

    /// Payload safe to hand back to the caller.
    pub fn body(&self) -> ErrorBody {
        if self.expose() {
            ErrorBody {
                error: self.error_code().to_string(),
                error_description: self.description(),
            }
        } else {
            ErrorBody {
                error: ErrorClass::ServerError.code().to_string(),
                error_description: SERVER_ERROR_DESCRIPTION.to_string(),
            }
        }
    }
}
