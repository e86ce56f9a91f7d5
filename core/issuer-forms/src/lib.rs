//! Client-side validation for license issuer inputs.
//!
//! This crate handles:
//! - Field state: value, validity and messages ([`Field`])
//! - Validation rules for every editable input ([`rules`])
//! - Forms for login, issuers, licenses and products, and their conversion
//!   into request payloads ([`forms`])
//!
//! Validation never fails with an error; it produces human-readable
//! messages per field.

mod field;
pub mod forms;
pub mod rules;

pub use field::Field;
pub use forms::{
    FormErrors, IssuerSettingsForm, LicenseForm, LoginForm, NewIssuerForm, ProductForm,
    DEFAULT_LICENSE_DAYS,
};
