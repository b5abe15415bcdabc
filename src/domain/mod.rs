//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (value objects, IDs, errors)
//! - `access` - Access resolution rules, store record decoding, payment redirects

pub mod access;
pub mod foundation;
