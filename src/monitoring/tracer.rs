/*!
 * Structured Tracing
 * Subscriber setup and scope spans built on the tracing crate
 *
 * Features:
 * - Env-driven filtering (RUST_LOG, default: info)
 * - Compact human-readable or JSON output
 * - Scope spans that report arena blocks left live when a scope ends
 */

use crate::arena::Arena;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, span, warn, Level};
use tracing_subscriber::{
    fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

/// Output format for `init_tracing_with`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TracingFormat {
    #[default]
    Compact,
    Json,
}

/// Initialize structured tracing with compact output
///
/// Safe to call more than once; only the first call installs a subscriber.
pub fn init_tracing() -> bool {
    init_tracing_with(TracingFormat::Compact)
}

/// Initialize structured tracing with the given output format
///
/// Returns `false` when a global subscriber was already installed.
pub fn init_tracing_with(format: TracingFormat) -> bool {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(env_filter);

    let installed = match format {
        TracingFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_current_span(true)
                    .with_span_list(true)
                    .with_span_events(FmtSpan::CLOSE),
            )
            .try_init()
            .is_ok(),
        TracingFormat::Compact => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_line_number(true)
                    .with_span_events(FmtSpan::CLOSE)
                    .compact(),
            )
            .try_init()
            .is_ok(),
    };

    if installed {
        info!(?format, "Structured tracing initialized");
    }
    installed
}

/// Span covering a scope that should not leak arena blocks
///
/// Records the arena's live count on entry; when dropped, warns if more
/// blocks are live than when the scope began.
pub struct ScopeSpan {
    span: tracing::Span,
    arena: Arc<Arena>,
    start: Instant,
    live_at_entry: usize,
}

impl ScopeSpan {
    pub fn new(name: &str, arena: &Arc<Arena>) -> Self {
        let live_at_entry = arena.live_count();
        let span = span!(
            Level::DEBUG,
            "scope",
            scope = name,
            live_at_entry,
            leaked = tracing::field::Empty,
            duration_us = tracing::field::Empty,
        );
        Self {
            span,
            arena: Arc::clone(arena),
            start: Instant::now(),
            live_at_entry,
        }
    }

    /// Enter the span context
    pub fn enter(&self) -> tracing::span::Entered<'_> {
        self.span.enter()
    }

    /// Blocks allocated inside the scope that are still live
    pub fn leaked(&self) -> usize {
        self.arena.live_count().saturating_sub(self.live_at_entry)
    }
}

impl Drop for ScopeSpan {
    fn drop(&mut self) {
        let leaked = self.leaked();
        let duration = self.start.elapsed();
        let _entered = self.span.enter();
        self.span.record("leaked", leaked);
        self.span.record("duration_us", duration.as_micros() as u64);

        if leaked > 0 {
            warn!(leaked, "scope ended with live blocks");
        } else {
            debug!(duration_us = duration.as_micros() as u64, "scope ended clean");
        }
    }
}
