//! Categorized application errors
//!
//! Structured error types shared by every frontend:
//! - Categorized handling (network vs auth vs API vs user action)
//! - Appropriate toast severity routing
//! - Recovery hints for user-actionable failures
//! - A single authoritative test for "this session is no longer valid"

use thiserror::Error;

// Re-export ToastLevel from notifications (single source of truth)
pub use crate::notifications::ToastLevel;

/// Network error codes
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum NetworkErrorCode {
    /// Request timed out
    #[error("timeout")]
    Timeout,
    /// Connection refused or unreachable
    #[error("connection refused")]
    ConnectionRefused,
    /// TLS/SSL error
    #[error("TLS error")]
    TlsError,
    /// No connectivity at all (offline bridge, airplane mode)
    #[error("offline")]
    Offline,
    /// Generic network error
    #[error("network error")]
    Other,
}

/// Authentication/authorization failure reasons
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum AuthFailure {
    /// Username/password rejected at login
    #[error("invalid credentials")]
    InvalidCredentials,
    /// Stored token rejected by the backend
    #[error("token expired")]
    TokenExpired,
    /// No stored token where one was required
    #[error("token missing")]
    TokenMissing,
    /// Authenticated but not allowed (non-admin, non-leader, non-member)
    #[error("insufficient permissions")]
    InsufficientPermissions,
}

/// Categorized application errors
#[derive(Clone, Debug, Error)]
pub enum AppError {
    /// Network-related failures
    #[error("Network error ({code}): {message}")]
    Network {
        /// What kind of network failure
        code: NetworkErrorCode,
        /// Human-readable description
        message: String,
        /// Whether a retry could plausibly succeed
        recoverable: bool,
    },
    /// Authentication/authorization failures
    #[error("Authentication failed ({reason}): {context}")]
    Auth {
        /// Why authentication failed
        reason: AuthFailure,
        /// Where it failed (endpoint or operation name)
        context: String,
    },
    /// Backend rejected the request (non-auth HTTP error)
    #[error("Request failed ({status}): {detail}")]
    Api {
        /// HTTP status code
        status: u16,
        /// The backend's `detail` message, or a fallback
        detail: String,
    },
    /// User action failures (with recovery hint)
    #[error("{action} - {hint}")]
    UserAction {
        /// What the user tried to do
        action: String,
        /// How to fix it
        hint: String,
    },
    /// Internal errors (unexpected conditions)
    #[error("{component}: {message}")]
    Internal {
        /// Component that failed
        component: String,
        /// What happened
        message: String,
    },
}

impl AppError {
    /// Create a network error
    pub fn network(code: NetworkErrorCode, message: impl Into<String>) -> Self {
        Self::Network {
            code,
            message: message.into(),
            recoverable: true,
        }
    }

    /// Create a fatal network error
    pub fn network_fatal(code: NetworkErrorCode, message: impl Into<String>) -> Self {
        Self::Network {
            code,
            message: message.into(),
            recoverable: false,
        }
    }

    /// Create an auth error
    pub fn auth(reason: AuthFailure, context: impl Into<String>) -> Self {
        Self::Auth {
            reason,
            context: context.into(),
        }
    }

    /// Create an API error from an HTTP status and backend detail
    pub fn api(status: u16, detail: impl Into<String>) -> Self {
        Self::Api {
            status,
            detail: detail.into(),
        }
    }

    /// Create a user action error with recovery hint
    pub fn user_action(action: impl Into<String>, hint: impl Into<String>) -> Self {
        Self::UserAction {
            action: action.into(),
            hint: hint.into(),
        }
    }

    /// Create an internal error
    pub fn internal(component: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Internal {
            component: component.into(),
            message: message.into(),
        }
    }

    /// Get the appropriate toast severity for this error
    #[must_use]
    pub fn toast_level(&self) -> ToastLevel {
        match self {
            Self::Network { recoverable, .. } => {
                if *recoverable {
                    ToastLevel::Warning
                } else {
                    ToastLevel::Error
                }
            }
            Self::Auth { .. } => ToastLevel::Error,
            Self::Api { status, .. } => {
                if *status >= 500 {
                    ToastLevel::Error
                } else {
                    ToastLevel::Warning
                }
            }
            Self::UserAction { .. } => ToastLevel::Info,
            Self::Internal { .. } => ToastLevel::Error,
        }
    }

    /// Check if the error is recoverable
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Network { recoverable, .. } => *recoverable,
            // A fresh login fixes these two; a 403 does not go away on retry.
            Self::Auth { reason, .. } => {
                matches!(reason, AuthFailure::TokenExpired | AuthFailure::TokenMissing)
            }
            Self::Api { status, .. } => *status < 500,
            Self::UserAction { .. } => true,
            Self::Internal { .. } => false,
        }
    }

    /// Whether this error means the stored session is no longer valid.
    ///
    /// Only token problems count. A rejected login attempt
    /// ([`AuthFailure::InvalidCredentials`]) stays on the login form, and a
    /// 403 ([`AuthFailure::InsufficientPermissions`]) keeps the session:
    /// the user is logged in, just not allowed.
    #[must_use]
    pub fn is_unauthenticated(&self) -> bool {
        matches!(
            self,
            Self::Auth {
                reason: AuthFailure::TokenExpired | AuthFailure::TokenMissing,
                ..
            }
        )
    }

    /// Get a short error code string
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Network { code, .. } => match code {
                NetworkErrorCode::Timeout => "NET_TIMEOUT",
                NetworkErrorCode::ConnectionRefused => "NET_REFUSED",
                NetworkErrorCode::TlsError => "NET_TLS",
                NetworkErrorCode::Offline => "NET_OFFLINE",
                NetworkErrorCode::Other => "NET_ERROR",
            },
            Self::Auth { reason, .. } => match reason {
                AuthFailure::InvalidCredentials => "AUTH_INVALID",
                AuthFailure::TokenExpired => "AUTH_EXPIRED",
                AuthFailure::TokenMissing => "AUTH_MISSING",
                AuthFailure::InsufficientPermissions => "AUTH_PERMISSION",
            },
            Self::Api { status, .. } => {
                if *status >= 500 {
                    "API_SERVER"
                } else {
                    "API_CLIENT"
                }
            }
            Self::UserAction { .. } => "USER_ACTION",
            Self::Internal { .. } => "INTERNAL",
        }
    }

    /// The message a toast should show for this error.
    ///
    /// API errors surface the backend's own `detail` verbatim since those
    /// are written for end users; the other categories format themselves.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Api { detail, .. } => detail.clone(),
            Self::UserAction { action, hint } => format!("{action} - {hint}"),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_network_error_display() {
        let err = AppError::network(NetworkErrorCode::Timeout, "request timed out after 30s");
        assert_eq!(
            err.to_string(),
            "Network error (timeout): request timed out after 30s"
        );
        assert_eq!(err.code(), "NET_TIMEOUT");
        assert!(err.is_recoverable());
        assert_eq!(err.toast_level(), ToastLevel::Warning);
        assert!(!err.is_unauthenticated());
    }

    #[test]
    fn test_fatal_network_error_escalates_toast() {
        let err = AppError::network_fatal(NetworkErrorCode::TlsError, "certificate rejected");
        assert!(!err.is_recoverable());
        assert_eq!(err.toast_level(), ToastLevel::Error);
    }

    #[test]
    fn test_auth_error_display() {
        let err = AppError::auth(AuthFailure::TokenExpired, "GET /parties");
        assert_eq!(
            err.to_string(),
            "Authentication failed (token expired): GET /parties"
        );
        assert_eq!(err.code(), "AUTH_EXPIRED");
        assert!(err.is_recoverable());
        assert_eq!(err.toast_level(), ToastLevel::Error);
    }

    #[test]
    fn test_only_token_problems_invalidate_the_session() {
        let expired = AppError::auth(AuthFailure::TokenExpired, "GET /auth/me");
        let missing = AppError::auth(AuthFailure::TokenMissing, "GET /auth/me");
        let rejected = AppError::auth(AuthFailure::InvalidCredentials, "POST /auth/login");
        let forbidden = AppError::auth(AuthFailure::InsufficientPermissions, "DELETE /raids/1");

        assert!(expired.is_unauthenticated());
        assert!(missing.is_unauthenticated());
        assert!(!rejected.is_unauthenticated());
        assert!(!forbidden.is_unauthenticated());
    }

    #[test]
    fn test_api_error_severity_tracks_status() {
        let conflict = AppError::api(400, "이미 참여 중인 공대입니다");
        assert_eq!(conflict.code(), "API_CLIENT");
        assert!(conflict.is_recoverable());
        assert_eq!(conflict.toast_level(), ToastLevel::Warning);
        // The backend's own message goes to the toast untouched.
        assert_eq!(conflict.user_message(), "이미 참여 중인 공대입니다");

        let broken = AppError::api(500, "internal server error");
        assert_eq!(broken.code(), "API_SERVER");
        assert!(!broken.is_recoverable());
        assert_eq!(broken.toast_level(), ToastLevel::Error);
    }

    #[test]
    fn test_user_action_error() {
        let err = AppError::user_action("Character name too long", "Limit is 20 characters");
        assert_eq!(
            err.to_string(),
            "Character name too long - Limit is 20 characters"
        );
        assert_eq!(err.code(), "USER_ACTION");
        assert!(err.is_recoverable());
        assert_eq!(err.toast_level(), ToastLevel::Info);
    }

    #[test]
    fn test_internal_error() {
        let err = AppError::internal("decode", "response body was not valid JSON");
        assert_eq!(err.to_string(), "decode: response body was not valid JSON");
        assert_eq!(err.code(), "INTERNAL");
        assert!(!err.is_recoverable());
        assert_eq!(err.toast_level(), ToastLevel::Error);
    }
}
