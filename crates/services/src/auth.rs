//! Session presence check for protected commands.
//!
//! Sign-in itself happens elsewhere; this crate only sees whether a session
//! was configured and, if so, which bearer token to send.

pub const SIGN_IN_PATH: &str = "/auth/signin";

#[derive(Clone, PartialEq, Eq)]
pub struct AuthSession {
    pub email: String,
    pub user_id: Option<String>,
    pub name: Option<String>,
    pub access_token: Option<String>,
}

impl AuthSession {
    #[must_use]
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            user_id: None,
            name: None,
            access_token: None,
        }
    }

    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    /// Name to greet the user with.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.email)
    }
}

impl std::fmt::Debug for AuthSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthSession")
            .field("email", &self.email)
            .field("user_id", &self.user_id)
            .field("name", &self.name)
            .field("access_token", &self.access_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Granted,
    Redirect { to: &'static str },
}

/// A session without an email cannot submit anything, so it does not count.
#[must_use]
pub fn guard(session: Option<&AuthSession>) -> Access {
    match session {
        Some(session) if !session.email.trim().is_empty() => Access::Granted,
        _ => Access::Redirect { to: SIGN_IN_PATH },
    }
}
