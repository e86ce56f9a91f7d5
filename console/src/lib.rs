//! Command-line front-end for the license issuing service.
//!
//! This crate handles:
//! - Argument parsing ([`cli`])
//! - Credential storage in a state file between invocations
//! - Running each command through the validated forms and the API client
//!   ([`Console`])
//! - Turning forced navigation into terminal hints ([`ConsoleNavigator`])

pub mod cli;

mod app;
mod navigator;

pub use app::Console;
pub use cli::Cli;
pub use navigator::ConsoleNavigator;
