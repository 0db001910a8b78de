//! HTTP middleware

mod trace_context;

pub use trace_context::{TraceContextLayer, TraceContextService};
