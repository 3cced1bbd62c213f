//! Access to the signed-in user's bearer credential.
//!
//! Privileged calls (upload, error queries) ask an injected [`AuthProvider`]
//! for a token right before sending, instead of reading ambient client state.

use std::fmt;

use crate::config::Config;
use crate::error::{AuthError, AuthResult};

/// Bearer credential of the current session.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> AuthResult<Self> {
        let token = token.into();
        let token = token.trim();
        if token.is_empty() {
            return Err(AuthError::Required);
        }
        if token.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(AuthError::InvalidToken("token contains whitespace".to_string()));
        }
        Ok(Self(token.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `Authorization` header value.
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(***)")
    }
}

/// Source of the bearer credential.
pub trait AuthProvider: Send + Sync {
    /// Token of the active session, or [`AuthError::Required`].
    fn access_token(&self) -> AuthResult<AccessToken>;
}

/// Session holding a fixed token (or none at all).
#[derive(Debug, Clone, Default)]
pub struct StaticSession {
    token: Option<String>,
}

impl StaticSession {
    pub fn new(token: impl Into<String>) -> Self {
        Self { token: Some(token.into()) }
    }

    /// A session with nobody signed in.
    pub fn signed_out() -> Self {
        Self { token: None }
    }

    pub fn from_config(config: &Config) -> Self {
        Self { token: config.access_token.clone() }
    }
}

impl AuthProvider for StaticSession {
    fn access_token(&self) -> AuthResult<AccessToken> {
        match &self.token {
            Some(token) => AccessToken::new(token.as_str()),
            None => Err(AuthError::Required),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signed_out_requires_auth() {
        let session = StaticSession::signed_out();
        assert_eq!(session.access_token(), Err(AuthError::Required));
    }

    #[test]
    fn test_bearer_header() {
        let session = StaticSession::new(" eyJhbGciOi.payload.sig ");
        let token = session.access_token().unwrap();
        assert_eq!(token.bearer(), "Bearer eyJhbGciOi.payload.sig");
    }

    #[test]
    fn test_token_debug_is_redacted() {
        let token = AccessToken::new("secret").unwrap();
        assert!(!format!("{:?}", token).contains("secret"));
    }

    #[test]
    fn test_rejects_token_with_spaces() {
        assert!(matches!(
            AccessToken::new("abc def"),
            Err(AuthError::InvalidToken(_))
        ));
    }
}
