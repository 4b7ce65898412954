//! Common test utilities for policy-relay integration tests.
//!
//! This module provides:
//! - `PushServer`: a one-thread HTTP endpoint that records pushes
//! - Fixtures: Reusable results and template directories

#![allow(dead_code, unused_imports)]

pub mod fixtures;
pub mod server;

pub use fixtures::*;
pub use server::*;
