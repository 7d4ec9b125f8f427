//! Networking modules for the REST backend.
//!
//! SYSTEM CONTEXT
//! ==============
//! `request` is the single call path every page uses, and `types` defines the
//! shared wire schema.

pub mod request;
pub mod types;
