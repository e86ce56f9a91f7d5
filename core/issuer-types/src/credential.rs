//! The bearer credential and the login exchange that produces it.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::IssuerId;

/// Issuer ID of an anonymous (logged out) client.
pub const ANONYMOUS_ISSUER: IssuerId = -1;

/// Issuer ID reserved for the administrative issuer.
pub const ADMIN_ISSUER: IssuerId = 0;

/// The credential presented to the API on every authenticated request.
///
/// An empty token means "no credential". The logged-out steady state is
/// `{ token: "", issuer_id: -1 }`. `Debug` output never includes the token.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Credential {
    /// Opaque bearer token.
    pub token: String,
    /// Organization of the authenticated principal.
    #[serde(rename = "issuerID")]
    pub issuer_id: IssuerId,
}

impl Credential {
    /// Creates a credential for the given token and issuer.
    #[must_use]
    pub fn new(token: impl Into<String>, issuer_id: IssuerId) -> Self {
        Self {
            token: token.into(),
            issuer_id,
        }
    }

    /// The logged-out credential.
    #[must_use]
    pub fn anonymous() -> Self {
        Self {
            token: String::new(),
            issuer_id: ANONYMOUS_ISSUER,
        }
    }

    /// Returns true if a token is held.
    #[must_use]
    pub fn is_logged_in(&self) -> bool {
        !self.token.is_empty()
    }

    /// Returns true for the administrative issuer.
    #[must_use]
    pub fn is_privileged(&self) -> bool {
        self.issuer_id == ADMIN_ISSUER
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("token", &redacted(&self.token))
            .field("issuer_id", &self.issuer_id)
            .finish()
    }
}

impl Default for Credential {
    fn default() -> Self {
        Self::anonymous()
    }
}

/// Body of `POST /api/login`.
///
/// Has no `Debug` impl since it carries the password.
#[derive(Serialize)]
pub struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

/// Successful `POST /api/login` response.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    #[serde(rename = "licenseIssuerID")]
    pub license_issuer_id: IssuerId,
}

impl fmt::Debug for LoginResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginResponse")
            .field("token", &redacted(&self.token))
            .field("license_issuer_id", &self.license_issuer_id)
            .finish()
    }
}

fn redacted(token: &str) -> &'static str {
    if token.is_empty() { "" } else { "<redacted>" }
}

impl From<LoginResponse> for Credential {
    fn from(res: LoginResponse) -> Self {
        Self {
            token: res.token,
            issuer_id: res.license_issuer_id,
        }
    }
}
