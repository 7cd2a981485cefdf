use std::env;

use crate::auth::AuthSession;

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8000";
pub const DEFAULT_LOG_FILTER: &str = "info";

pub const BACKEND_URL_VAR: &str = "MINDCHECK_BACKEND_URL";
pub const ACCESS_TOKEN_VAR: &str = "MINDCHECK_ACCESS_TOKEN";
pub const USER_EMAIL_VAR: &str = "MINDCHECK_USER_EMAIL";
pub const USER_ID_VAR: &str = "MINDCHECK_USER_ID";
pub const USER_NAME_VAR: &str = "MINDCHECK_USER_NAME";
pub const LOG_VAR: &str = "MINDCHECK_LOG";

/// Runtime settings read from the process environment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppConfig {
    pub backend_url: String,
    pub session: Option<AuthSession>,
    pub log_filter: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_BACKEND_URL.into(),
            session: None,
            log_filter: DEFAULT_LOG_FILTER.into(),
        }
    }
}

impl AppConfig {
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup. Blank values count as unset.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let backend_url = get(BACKEND_URL_VAR).unwrap_or_else(|| DEFAULT_BACKEND_URL.into());
        let log_filter = get(LOG_VAR).unwrap_or_else(|| DEFAULT_LOG_FILTER.into());
        let session = get(USER_EMAIL_VAR).map(|email| AuthSession {
            email,
            user_id: get(USER_ID_VAR),
            name: get(USER_NAME_VAR),
            access_token: get(ACCESS_TOKEN_VAR),
        });

        Self {
            backend_url,
            session,
            log_filter,
        }
    }

    #[must_use]
    pub fn with_backend_url(mut self, url: impl Into<String>) -> Self {
        self.backend_url = url.into();
        self
    }

    /// Override the signed-in email, creating a session if there was none.
    /// A blank email counts as unset and changes nothing.
    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        let email = email.into().trim().to_string();
        if email.is_empty() {
            return self;
        }
        match self.session.as_mut() {
            Some(session) => session.email = email,
            None => self.session = Some(AuthSession::new(email)),
        }
        self
    }
}
