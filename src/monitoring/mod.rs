/*!
 * Monitoring
 * Structured logging setup and leak-aware scope spans
 */

mod tracer;

pub use tracer::{init_tracing, init_tracing_with, ScopeSpan, TracingFormat};
