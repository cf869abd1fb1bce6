//! Error taxonomy for strict store lookups.

use thiserror::Error;

use crate::engine::Sk;

/// Failures surfaced by strict store operations.
///
/// Tolerant call sites use `Option` instead; recoverable empty states are
/// logged and treated as no-ops rather than returned as errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Lookup for an id that was never registered.
    #[error("element with id `{0}` is not registered")]
    ElementNotRegistered(String),

    /// Lookup for a container key that was never seen.
    #[error("no branch registered under key `{0}`")]
    BranchNotFound(Sk),

    /// Lookup for a container record that was never initialized.
    #[error("no container registered under key `{0}`")]
    ContainerNotFound(Sk),

    /// Lookup for a scroll record that was never initialized.
    #[error("no scroll container registered under key `{0}`")]
    ScrollNotFound(Sk),
}
