//! Middleware infrastructure for layerone
//!
//! Validators are installed as [`MiddlewareLayer`]s in front of the
//! downstream handler.
//!
//! # Example
//!
//! ```rust,ignore
//! use layerone_core::middleware::{handler_fn, LayerStack};
//!
//! let stack = LayerStack::new().layer(validator.into_layer());
//! let response = stack.execute(request, handler_fn(create_user)).await;
//! ```

mod layer;

pub use layer::{handler_fn, BoxedNext, LayerStack, MiddlewareLayer, ResponseFuture};
