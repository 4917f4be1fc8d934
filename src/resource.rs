//! Typed resource declarations and their builders.
//!
//! Each resource type a stack can declare gets an explicit property struct plus a consuming
//! builder that checks required fields and invariants at [`build`](pool::UserPoolBuilder::build)
//! time, so malformed declarations fail locally instead of at engine submission.

/// User pool (identity directory) declaration.
pub mod pool;
/// Resource server (scope grouping) declaration.
pub mod server;
/// OAuth app client declaration.
pub mod client;
/// Hosted sign-in domain declaration.
pub mod domain;

pub use client::*;
pub use domain::*;
pub use pool::*;
pub use server::*;
