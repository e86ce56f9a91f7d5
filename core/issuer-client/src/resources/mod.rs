//! Typed clients for each API resource.
//!
//! Paths nest under the owning issuer:
//!
//! ```text
//! /api/license-issuers/:issuer
//!     /licenses/:license
//!         /sessions/:session
//!     /products/:product
//! ```

mod issuers;
mod licenses;
mod products;
mod sessions;

pub use issuers::Issuers;
pub use licenses::Licenses;
pub use products::Products;
pub use sessions::Sessions;

use issuer_types::IssuerId;

pub(crate) const ISSUERS_PATH: &str = "/api/license-issuers";

pub(crate) fn issuer_path(issuer: IssuerId) -> String {
    format!("{ISSUERS_PATH}/{issuer}")
}
