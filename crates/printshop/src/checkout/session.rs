use axum::http::{header, HeaderMap};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const SESSION_HEADER: &str = "x-session-id";

/// Browser session the storefront keys pending items by.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(pub String);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Credentials already verified by the authentication service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub bearer_token: String,
}

/// Who is checking out. Built by the caller; nothing here reads ambient state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionContext {
    pub session_id: SessionId,
    pub user: Option<AuthenticatedUser>,
}

impl SessionContext {
    pub fn anonymous(session_id: impl Into<String>) -> Self {
        Self {
            session_id: SessionId(session_id.into()),
            user: None,
        }
    }

    pub fn authenticated(session_id: impl Into<String>, bearer_token: impl Into<String>) -> Self {
        Self {
            session_id: SessionId(session_id.into()),
            user: Some(AuthenticatedUser {
                bearer_token: bearer_token.into(),
            }),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    /// Reads `x-session-id` and an optional `Authorization: Bearer` header.
    pub fn from_headers(headers: &HeaderMap) -> Result<Self, SessionError> {
        let session_id = headers
            .get(SESSION_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .ok_or(SessionError::MissingSession)?;

        let user = match headers.get(header::AUTHORIZATION) {
            None => None,
            Some(value) => {
                let raw = value.to_str().map_err(|_| SessionError::MalformedAuthorization)?;
                let token = raw
                    .strip_prefix("Bearer ")
                    .map(str::trim)
                    .filter(|token| !token.is_empty())
                    .ok_or(SessionError::MalformedAuthorization)?;
                Some(AuthenticatedUser {
                    bearer_token: token.to_string(),
                })
            }
        };

        Ok(Self {
            session_id: SessionId(session_id.to_string()),
            user,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("missing x-session-id header")]
    MissingSession,
    #[error("authorization header must carry a bearer token")]
    MalformedAuthorization,
}
