//! Application Layer
//!
//! Coordinates targets without knowing their wire formats.
//!
//! - `Dispatcher` - Fans results and digests out to every configured target

pub mod dispatcher;

pub use dispatcher::{
    DispatchOptions, DispatchReport, Dispatcher, TargetOutcome, DEFAULT_DISPATCH_TIMEOUT,
};
