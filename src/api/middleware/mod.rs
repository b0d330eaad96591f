//! HTTP middleware and extractors.
//!
//! Provides principal extraction and request tracing.

pub mod principal;
pub mod tracing;

pub use principal::{ANONYMOUS_PRINCIPAL, PRINCIPAL_HEADER, Principal};
