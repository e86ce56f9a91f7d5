//! Request bodies for create and update calls.
//!
//! Unset optional fields are left out of the JSON body so PATCH requests only
//! touch what the caller changed.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::codec::{serialize_opt_license_data, LicenseDataField};
use crate::ProductId;

/// Body of `POST /api/license-issuers`.
#[derive(Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewLicenseIssuer {
    pub active: bool,
    pub username: String,
    pub password: String,
    pub email: String,
    pub phone_number: String,
    pub max_licenses: i64,
}

impl fmt::Debug for NewLicenseIssuer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewLicenseIssuer")
            .field("active", &self.active)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("email", &self.email)
            .field("phone_number", &self.phone_number)
            .field("max_licenses", &self.max_licenses)
            .finish()
    }
}

/// Body of `PATCH /api/license-issuers/:id`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LicenseIssuerChanges {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_licenses: Option<i64>,
}

impl LicenseIssuerChanges {
    /// Returns true if no field is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Body of license create (`POST`) and update (`PATCH`) calls.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LicenseFields {
    #[serde(rename = "productID", skip_serializing_if = "Option::is_none")]
    pub product_id: Option<ProductId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_opt_license_data"
    )]
    pub data: Option<Vec<LicenseDataField>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_sessions: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valid_until: Option<DateTime<Utc>>,
}

/// Body of product create (`POST`) and update (`PATCH`) calls.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductFields {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
}
