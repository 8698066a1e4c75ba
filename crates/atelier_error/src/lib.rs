//! Error types for the Atelier generation gateway.
//!
//! This crate provides the error taxonomy shared by every Atelier crate.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern:
//! - Leaf `*Error` structs carry a message plus source location
//! - `AtelierErrorKind` enumerates every leaf error
//! - `AtelierError` boxes the kind so results stay small
//! - All constructors use `#[track_caller]` for automatic location capture
//!
//! The leaves map one-to-one onto the failure classes a generation attempt can hit:
//! configuration, invalid request, upstream HTTP, content extraction, blocked prompt,
//! disabled or unknown resource.
//!
//! # Examples
//!
//! ```
//! use atelier_error::{AtelierResult, HttpError};
//!
//! fn fetch_video() -> AtelierResult<String> {
//!     Err(HttpError::with_status(502, "bad gateway"))?
//! }
//!
//! match fetch_video() {
//!     Ok(url) => println!("Got: {}", url),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod blocked;
mod config;
mod error;
mod extraction;
mod http;
mod json;
mod request;
mod resource;
mod retry;

pub use blocked::BlockedPromptError;
pub use config::ConfigError;
pub use error::{AtelierError, AtelierErrorKind, AtelierResult};
pub use extraction::ExtractionError;
pub use http::{HttpError, MAX_ERROR_BODY_CHARS};
pub use json::JsonError;
pub use request::RequestError;
pub use resource::{DisabledError, NotFoundError, ResourceKind};
pub use retry::RetryableError;
