//! HTTP client for the license issuing API.
//!
//! This crate handles:
//! - Attaching the current bearer credential to every request
//! - Central handling of `401` (forced logout) and `403` (navigate home)
//! - Login and logout
//! - Typed clients for issuers, licenses, license sessions and products
//!
//! Resource reads return `Ok(None)` for any non-success status. Creates and
//! updates return a [`Saved`] that pairs the record (if any) with the exact
//! status code, so callers can render server-side validation failures.
//! Transport failures and undecodable success bodies are errors.

mod api;
mod config;
mod error;
pub mod resources;

pub use api::{ApiClient, Saved};
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use resources::{Issuers, Licenses, Products, Sessions};

pub use reqwest::{Method, StatusCode};
