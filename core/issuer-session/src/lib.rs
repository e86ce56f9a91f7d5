//! Client-side session state for the license issuer console.
//!
//! This crate handles:
//! - Durable key-value storage for client state ([`FileStore`], [`MemoryStore`])
//! - The current bearer credential and its change notifications ([`CredentialStore`])
//! - Navigation hooks fired when the API rejects the credential ([`Navigator`])
//!
//! # Credential lifecycle
//!
//! ```text
//! anonymous ──login──▶ authenticated ──401──▶ anonymous (+ navigate to login)
//!                          │    ▲
//!                          └403─┘  (credential kept, navigate home)
//! authenticated ──logout──▶ anonymous
//! ```

mod credentials;
mod error;
mod kv;
mod navigation;

pub use credentials::{CredentialStore, SessionView, Subscription, CREDENTIAL_KEY};
pub use error::{SessionError, SessionResult};
pub use kv::{default_path, FileStore, KeyValueStore, MemoryStore, APP_DIR, STORE_FILE};
pub use navigation::{Navigator, Route};
