//! # layerone Core
//!
//! Request and response contract shared by the layerone crates.
//!
//! This crate is not meant to be used directly. Use `layerone-rs` instead.
//!
//! A [`Request`] exposes three independent field maps (body, path params,
//! query) plus its headers. Responses are plain `http::Response` values built
//! through [`IntoResponse`], and middleware runs through a [`LayerStack`].

mod error;
pub mod middleware;
mod path_params;
mod request;
mod response;
#[cfg(any(test, feature = "test-utils"))]
mod test_utils;

// Public API
pub use error::{ApiError, Result};
pub use middleware::{handler_fn, BoxedNext, LayerStack, MiddlewareLayer};
pub use path_params::PathParams;
pub use request::{FieldMap, Request};
pub use response::{IntoResponse, Json, Response, ResponseSink};
#[cfg(any(test, feature = "test-utils"))]
pub use test_utils::{TestRequest, TestResponse};
