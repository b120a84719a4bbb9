//! Request middleware.
//!
//! Purpose: Define middleware components for request lifecycle concerns such
//! as tracing and request logging.

pub mod trace;

pub use trace::{RequestContext, TRACE_ID_HEADER, Trace, TraceId};
