//! Records returned by the issuing API.
//!
//! Field names follow the API's camelCase JSON. Optional timestamps are
//! `None` rather than a sentinel date; optional strings and lists that are
//! missing or `null` are empty.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::codec::{
    deserialize_license_data, null_as_default, optional_timestamp, serialize_license_data,
    LicenseDataField,
};
use crate::{IssuerId, ProductId};

/// A key-bearing entitlement issued to an end user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct License {
    /// Standard base64 identifier; see [`crate::url_safe_id`] for path use.
    pub id: String,
    #[serde(rename = "productID", default)]
    pub product_id: Option<ProductId>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    pub key: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub note: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: Vec<String>,
    #[serde(
        default,
        deserialize_with = "deserialize_license_data",
        serialize_with = "serialize_license_data"
    )]
    pub data: Vec<LicenseDataField>,
    pub max_sessions: i64,
    #[serde(default, deserialize_with = "optional_timestamp")]
    pub valid_until: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "optional_timestamp")]
    pub last_used: Option<DateTime<Utc>>,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
}

impl License {
    /// Returns true if the license has an expiry in the past.
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.valid_until.is_some_and(|until| until <= now)
    }

    /// Looks up a data field by name.
    #[must_use]
    pub fn data_value(&self, field: &str) -> Option<&str> {
        self.data
            .iter()
            .find(|f| f.field == field)
            .map(|f| f.value.as_str())
    }
}

/// A tenant that owns licenses and products.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LicenseIssuer {
    pub id: IssuerId,
    pub active: bool,
    pub username: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub email: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub phone_number: String,
    pub max_licenses: i64,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
}

/// An activation of licensed software against a license.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LicenseSession {
    #[serde(rename = "csid")]
    pub client_id: String,
    #[serde(rename = "ssid")]
    pub server_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub identifier: String,
    #[serde(rename = "machineID", default, deserialize_with = "null_as_default")]
    pub machine_id: String,
    pub created: DateTime<Utc>,
    pub expire: DateTime<Utc>,
}

/// A product licenses can be issued for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub active: bool,
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub contact_email: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub data: String,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
}
