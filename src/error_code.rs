//! Hub 错误分类：将 HTTP 状态码映射为标准错误类别。
//!
//! Classification of Hub HTTP failures.
//!
//! The Hub reports failures through plain HTTP status codes plus a
//! human-readable message. [`HubErrorClass`] gives those statuses a stable name
//! so log lines and error values stay consistent across endpoints.
//!
//! ## Example
//!
//! ```rust
//! use hub_deploy::error_code::HubErrorClass;
//!
//! let class = HubErrorClass::from_http_status(401);
//! assert_eq!(class.name(), "authentication");
//! assert!(class.is_credential_problem());
//! ```

use std::fmt;

/// Standard class of a failed Hub call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HubErrorClass {
    /// Malformed request or invalid parameters (400, 422)
    InvalidRequest,
    /// Invalid, expired, or missing token (401)
    Authentication,
    /// Valid token without the required rights (403)
    PermissionDenied,
    /// Repository or account does not exist (404)
    NotFound,
    /// Resource already exists (409)
    Conflict,
    /// Too many requests (429)
    RateLimited,
    /// Internal error on the Hub side (500, 502)
    ServerError,
    /// Hub temporarily unavailable (503)
    Overloaded,
    /// Request timed out (408, 504)
    Timeout,
    /// Status could not be classified
    Unknown,
}

impl HubErrorClass {
    /// Returns the standard name (e.g., `"permission_denied"`).
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            Self::InvalidRequest => "invalid_request",
            Self::Authentication => "authentication",
            Self::PermissionDenied => "permission_denied",
            Self::NotFound => "not_found",
            Self::Conflict => "conflict",
            Self::RateLimited => "rate_limited",
            Self::ServerError => "server_error",
            Self::Overloaded => "overloaded",
            Self::Timeout => "timeout",
            Self::Unknown => "unknown",
        }
    }

    /// Whether the failure points at the token itself rather than the request.
    #[inline]
    pub fn is_credential_problem(&self) -> bool {
        matches!(self, Self::Authentication | Self::PermissionDenied)
    }

    /// Maps an HTTP status code to the most likely class.
    pub fn from_http_status(status: u16) -> Self {
        match status {
            400 | 422 => Self::InvalidRequest,
            401 => Self::Authentication,
            403 => Self::PermissionDenied,
            404 => Self::NotFound,
            408 | 504 => Self::Timeout,
            409 => Self::Conflict,
            429 => Self::RateLimited,
            500 | 502 => Self::ServerError,
            503 => Self::Overloaded,
            _ if (500..=599).contains(&status) => Self::ServerError,
            _ => Self::Unknown,
        }
    }
}

impl fmt::Display for HubErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
