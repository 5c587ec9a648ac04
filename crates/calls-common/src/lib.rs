//! # Calls Common
//!
//! Shared error type, logging setup and test helpers for the calls911 workspace.
//!
//! Every other crate in the workspace reports failures through
//! [`CallsError`] and initialises tracing through [`init_logging`].

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod logging;
pub mod macros;

#[cfg(any(test, feature = "testing"))]
pub mod test_utils;

pub use error::{CallsError, Result};
pub use logging::{init_logging, LoggingConfig};
