//! # layerone
//!
//! First-layer request validation for Rust services.
//!
//! Describe the fields a request source must carry as a list of rules, bind
//! them once, and put the resulting validator in front of your handler. A
//! request that reaches the handler has exactly the declared fields, each of
//! the declared shape, each satisfying its business predicate.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use layerone_rs::prelude::*;
//!
//! let create_user = Validator::body(vec![
//!     Rule::new("id").of_type(predicates::is_number).biz(predicates::is_positive_integer),
//!     Rule::new("username").of_type(predicates::is_string).biz(predicates::is_username),
//! ])?
//! .with_settings(Settings::load()?);
//!
//! let stack = LayerStack::new().layer(create_user.into_layer());
//! let response = stack.execute(request, handler_fn(render_user)).await;
//! ```
//!
//! ## Sources
//!
//! - `Validator::body` - JSON body (requires `Content-Type: application/json`)
//! - `Validator::params` - path parameters captured by your router
//! - `Validator::query` - query string; repeated keys become sequences
//!
//! ## Optional Features
//!
//! - `test-utils` - `TestRequest` and `TestResponse` helpers
//!
//! ```toml
//! [dependencies]
//! layerone-rs = { version = "0.3", features = ["test-utils"] }
//! ```

// Re-export core functionality
pub use layerone_core::*;

// Re-export the validation engine
pub use layerone_validate::*;

/// Prelude module - import everything you need with `use layerone_rs::prelude::*`
pub mod prelude {
    // Core types
    pub use layerone_core::{
        handler_fn,
        // Error handling
        ApiError,
        BoxedNext,
        IntoResponse,
        Json,
        // Middleware
        LayerStack,
        MiddlewareLayer,
        // Request context
        Request,
        Response,
        ResponseSink,
        Result,
    };

    // Validation
    pub use layerone_validate::prelude::*;
    pub use layerone_validate::{Failure, FailurePayload, Stage};

    // Re-export commonly used external types
    pub use serde::{Deserialize, Serialize};
    pub use serde_json::{json, Value};
    pub use tracing::{debug, error, info, trace, warn};
}
