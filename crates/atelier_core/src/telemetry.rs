//! Explicit logging context.
//!
//! Services never read or mutate a process-wide log level. Each one is handed a
//! [`LogContext`] when it is built and emits every event through that context's
//! dispatcher, inside that context's span.

use std::future::Future;

use tracing::instrument::{Instrument, Instrumented, WithDispatch, WithSubscriber};
use tracing::{Dispatch, Level, Span};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt};

/// A logger instance: a dispatcher plus the span events are recorded under.
#[derive(Clone, Debug)]
pub struct LogContext {
    dispatch: Dispatch,
    span: Span,
}

impl LogContext {
    /// Wrap an existing dispatcher, rooting events under a span named after `component`.
    pub fn new(dispatch: Dispatch, component: &'static str) -> Self {
        let span = tracing::dispatcher::with_default(&dispatch, || {
            tracing::info_span!("atelier", component)
        });
        Self { dispatch, span }
    }

    /// Human-readable logs on stderr filtered by `filter` (an `EnvFilter` directive string).
    ///
    /// Invalid directives fall back to `info`.
    pub fn with_filter(filter: &str, json: bool) -> Self {
        let filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("info"));
        let registry = tracing_subscriber::registry().with(filter);
        let dispatch = if json {
            Dispatch::new(
                registry.with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(std::io::stderr),
                ),
            )
        } else {
            Dispatch::new(
                registry.with(
                    tracing_subscriber::fmt::layer()
                        .with_target(true)
                        .with_level(true)
                        .with_writer(std::io::stderr),
                ),
            )
        };
        Self::new(dispatch, "root")
    }

    /// Logs at `level` and above.
    pub fn with_level(level: Level, json: bool) -> Self {
        Self::with_filter(&level.to_string().to_lowercase(), json)
    }

    /// Filter taken from `RUST_LOG`, defaulting to `info,atelier=debug`.
    pub fn from_env(json: bool) -> Self {
        let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info,atelier=debug".to_string());
        Self::with_filter(&filter, json)
    }

    /// A context that discards everything.
    pub fn disabled() -> Self {
        Self {
            dispatch: Dispatch::none(),
            span: Span::none(),
        }
    }

    /// Context for a sub-component, nested under this context's span.
    pub fn child(&self, component: &'static str) -> Self {
        let span = tracing::dispatcher::with_default(&self.dispatch, || {
            tracing::info_span!(parent: &self.span, "component", name = component)
        });
        Self {
            dispatch: self.dispatch.clone(),
            span,
        }
    }

    /// Run synchronous work with this context as the active logger.
    pub fn scope<T>(&self, f: impl FnOnce() -> T) -> T {
        tracing::dispatcher::with_default(&self.dispatch, || self.span.in_scope(f))
    }

    /// Attach this context to a future.
    pub fn instrument<F: Future>(&self, fut: F) -> WithDispatch<Instrumented<F>> {
        fut.instrument(self.span.clone())
            .with_subscriber(self.dispatch.clone())
    }

    /// The underlying dispatcher.
    pub fn dispatch(&self) -> &Dispatch {
        &self.dispatch
    }
}

impl Default for LogContext {
    fn default() -> Self {
        Self::disabled()
    }
}
