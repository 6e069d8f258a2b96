use std::fmt;

use chrono::{DateTime, TimeDelta, Utc};
use serde::Deserialize;

use crate::error::AuthError;

/// Lifetime assumed when the token response omits `expires_in`.
const DEFAULT_EXPIRES_IN_SECS: i64 = 3600;
/// Tokens are treated as expired this long before the server says so.
const EXPIRY_MARGIN_SECS: i64 = 60;

#[derive(Debug, Deserialize)]
pub(crate) struct TokenResponse {
    access_token: Option<String>,
    expires_in: Option<i64>,
}

/// A bearer token together with the instant it stops being used.
#[derive(Clone)]
pub(crate) struct CachedToken {
    access_token: String,
    expires_at: DateTime<Utc>,
}

impl CachedToken {
    pub(crate) fn from_response(response: TokenResponse, now: DateTime<Utc>) -> Result<Self, AuthError> {
        let access_token = response
            .access_token
            .filter(|token| !token.is_empty())
            .ok_or_else(|| AuthError::InvalidResponse("response has no access_token".to_string()))?;
        let expires_in = response.expires_in.unwrap_or(DEFAULT_EXPIRES_IN_SECS);
        let expires_at = TimeDelta::try_seconds(expires_in.saturating_sub(EXPIRY_MARGIN_SECS))
            .and_then(|lifetime| now.checked_add_signed(lifetime))
            .ok_or_else(|| AuthError::InvalidResponse(format!("expires_in out of range: {expires_in}")))?;

        Ok(Self {
            access_token,
            expires_at,
        })
    }

    pub(crate) fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }

    pub(crate) fn access_token(&self) -> &str {
        &self.access_token
    }

    pub(crate) fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }
}

impl fmt::Debug for CachedToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CachedToken")
            .field("access_token", &"[REDACTED]")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}
