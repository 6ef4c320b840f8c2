//! 凭证类型：持有 Hub 访问令牌，调试输出中隐藏令牌内容。
//!
//! Bearer credential for the Hub.
//!
//! A [`Credential`] is read once at startup, lives only in process memory and is
//! never rendered in full: `Debug` and `Display` are redacted, and the only way
//! to reach the value is [`Credential::expose_secret`], which the transport uses
//! when it builds the `Authorization` header.

use std::fmt;

/// Minimum number of characters (after trimming) for a token to be accepted.
///
/// This is a format sanity check, not cryptographic validation.
pub const MIN_TOKEN_LEN: usize = 10;

/// A trimmed Hub access token.
///
/// Only the length of the value as read is kept alongside the trimmed token;
/// the untrimmed string is dropped in [`Credential::new`] so it never outlives
/// construction.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    raw_len: usize,
    trimmed: String,
}

impl Credential {
    /// Trim `raw` and wrap it. No length check is applied here; see
    /// [`Credential::meets_minimum_length`].
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let raw_len = raw.chars().count();
        let trimmed = raw.trim().to_string();
        Self { raw_len, trimmed }
    }

    /// The trimmed token value.
    ///
    /// Use sparingly and never log the result.
    #[inline]
    pub fn expose_secret(&self) -> &str {
        &self.trimmed
    }

    /// Length of the trimmed token in characters.
    pub fn len(&self) -> usize {
        self.trimmed.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.trimmed.is_empty()
    }

    /// Length of the value as it was read, before trimming.
    pub fn raw_len(&self) -> usize {
        self.raw_len
    }

    pub fn meets_minimum_length(&self) -> bool {
        self.len() >= MIN_TOKEN_LEN
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Credential([REDACTED], len={})", self.len())
    }
}

impl fmt::Display for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[REDACTED]")
    }
}
