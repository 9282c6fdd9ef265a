//! Bearer credential forwarded to Open WebUI.

use std::fmt;

/// A bearer token.
///
/// The token is only ever written into the `Authorization` header of an
/// outgoing request. `Debug` output is redacted so the value cannot end up in
/// logs through `{:?}` formatting of a containing struct.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Wrap a token. Surrounding whitespace is trimmed.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into().trim().to_string())
    }

    /// Build a credential from an optional raw value, treating blank strings
    /// as absent.
    pub fn from_optional(token: Option<&str>) -> Option<Self> {
        token
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(Self::new)
    }

    /// The raw token.
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Value for the `Authorization` header.
    pub fn header_value(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential([REDACTED])")
    }
}
