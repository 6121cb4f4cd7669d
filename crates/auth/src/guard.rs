//! Request-level gate in front of every protected route.
//!
//! The guard is a pure function of the `Authorization` header and the
//! configuration it was built with: a request either leaves it
//! `Authenticated` with a [`Principal`] or is rejected.

use serde::Serialize;
use thiserror::Error;

use crate::jwt::{TokenRejection, TokenService};
use crate::model::{Permission, Role};

/// Identity injected when bypass mode is on.
pub const BYPASS_SUBJECT: &str = "dev-user";

/// The verified caller attached to a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Principal {
    pub subject_id: String,
    pub role: Role,
}

impl Principal {
    pub fn can(&self, permission: Permission) -> bool {
        self.role.has_permission(permission)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GuardRejection {
    #[error("Token missing")]
    MissingToken,
    #[error("Invalid or expired token")]
    InvalidToken(#[source] TokenRejection),
}

#[derive(Debug, Clone)]
pub struct AuthGuard {
    tokens: TokenService,
    bypass: bool,
}

impl AuthGuard {
    pub fn new(tokens: TokenService, bypass: bool) -> Self {
        Self { tokens, bypass }
    }

    pub fn bypass_enabled(&self) -> bool {
        self.bypass
    }

    pub fn tokens(&self) -> &TokenService {
        &self.tokens
    }

    /// Resolve the caller from the raw `Authorization` header value.
    ///
    /// An empty header counts as missing. The token is the second
    /// whitespace-delimited segment, so any scheme word is tolerated; a
    /// header with a single segment fails verification.
    pub fn authenticate(&self, authorization: Option<&str>) -> Result<Principal, GuardRejection> {
        if self.bypass {
            return Ok(Principal {
                subject_id: BYPASS_SUBJECT.to_string(),
                role: Role::SuperAdmin,
            });
        }

        let header = authorization
            .map(str::trim)
            .filter(|header| !header.is_empty())
            .ok_or(GuardRejection::MissingToken)?;
        let token = header.split_whitespace().nth(1).unwrap_or_default();

        let claims = self
            .tokens
            .verify(token)
            .map_err(GuardRejection::InvalidToken)?;

        Ok(Principal {
            subject_id: claims.sub,
            role: claims.role,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn guard(bypass: bool) -> AuthGuard {
        AuthGuard::new(TokenService::new("guard_secret", 3600).unwrap(), bypass)
    }

    #[test]
    fn test_valid_bearer_token_authenticates() {
        let guard = guard(false);
        let token = guard.tokens().issue("user_1", Role::Admin).unwrap();

        let principal = guard.authenticate(Some(&format!("Bearer {}", token))).unwrap();
        assert_eq!(principal.subject_id, "user_1");
        assert_eq!(principal.role, Role::Admin);
        assert!(principal.can(Permission::ManageProducts));
    }

    #[test]
    fn test_missing_header_is_rejected() {
        assert_eq!(guard(false).authenticate(None), Err(GuardRejection::MissingToken));
    }

    #[test]
    fn test_empty_header_counts_as_missing() {
        let guard = guard(false);
        assert_eq!(guard.authenticate(Some("")), Err(GuardRejection::MissingToken));
        assert_eq!(guard.authenticate(Some("   ")), Err(GuardRejection::MissingToken));
    }

    #[test]
    fn test_any_scheme_word_is_tolerated() {
        let guard = guard(false);
        let token = guard.tokens().issue("user_1", Role::Agent).unwrap();

        assert!(guard.authenticate(Some(&format!("Token {}", token))).is_ok());
    }

    #[test]
    fn test_header_without_token_segment_is_invalid() {
        let guard = guard(false);
        let token = guard.tokens().issue("user_1", Role::Agent).unwrap();

        assert_eq!(
            guard.authenticate(Some("Bearer")),
            Err(GuardRejection::InvalidToken(TokenRejection::Malformed))
        );
        // A bare token is read as the scheme word.
        assert!(guard.authenticate(Some(&token)).is_err());
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let guard = guard(false);
        let token = guard
            .tokens()
            .issue_at("user_1", Role::Admin, Utc::now() - Duration::hours(1))
            .unwrap();

        assert_eq!(
            guard.authenticate(Some(&format!("Bearer {}", token))),
            Err(GuardRejection::InvalidToken(TokenRejection::Expired))
        );
    }

    #[test]
    fn test_token_from_another_secret_is_rejected() {
        let foreign = TokenService::new("other_secret", 3600).unwrap();
        let token = foreign.issue("user_1", Role::SuperAdmin).unwrap();

        assert!(matches!(
            guard(false).authenticate(Some(&format!("Bearer {}", token))),
            Err(GuardRejection::InvalidToken(_))
        ));
    }

    #[test]
    fn test_bypass_skips_verification() {
        let guard = guard(true);

        for header in [None, Some("Bearer garbage"), Some("")] {
            let principal = guard.authenticate(header).unwrap();
            assert_eq!(principal.subject_id, BYPASS_SUBJECT);
            assert_eq!(principal.role, Role::SuperAdmin);
        }
    }
}
