//! actionsgate library
//!
//! Declarative management of a GitHub organization's Actions policy: which
//! repositories may run Actions and which actions they may use. The
//! [`policy`] module holds the validator and reconciler, [`providers`] the
//! remote API seam and its implementations.

pub mod actions;
pub mod cli;
pub mod config;
pub mod error;
pub mod policy;
pub mod providers;
pub mod state;
pub mod utils;

pub use error::ActionsGateError;
