//! Core type definitions for the license issuer console.
//!
//! This crate defines the plain data shared by every other crate:
//! - The bearer [`Credential`] held by the client
//! - Records returned by the issuing API (licenses, issuers, sessions, products)
//! - Request payloads sent on create/update
//! - Small codecs for identifiers, tag lists and license data fields
//!
//! Nothing here performs I/O. Records are value types: they are created by
//! deserializing an API response and replaced wholesale after a round-trip.

mod codec;
mod credential;
pub mod datetime;
mod payload;
mod records;

pub use codec::{
    decode_license_data, encode_license_data, format_tags, parse_tags, url_safe_id,
    LicenseDataField,
};
pub use credential::{Credential, LoginRequest, LoginResponse, ADMIN_ISSUER, ANONYMOUS_ISSUER};
pub use payload::{LicenseFields, LicenseIssuerChanges, NewLicenseIssuer, ProductFields};
pub use records::{License, LicenseIssuer, LicenseSession, Product};

/// Identifier of a license issuer (tenant).
pub type IssuerId = i64;

/// Identifier of a product.
pub type ProductId = i64;
