//! Pipeline instrumentation behind the `tracing` feature.
//!
//! Spans cover a batch, each image, and the decode and suppression stages.
//! Info events carry candidate and detection counts; a warn event reports
//! candidates dropped for non-finite features. Without the feature every
//! macro reduces to evaluating its field values.

/// Opens an info span named after a stage, with `key = value` fields.
#[cfg(feature = "tracing")]
macro_rules! trace_span {
    ($stage:literal $(, $key:ident = $value:expr)* $(,)?) => {
        tracing::info_span!($stage $(, $key = $value)*)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_span {
    ($stage:literal $(, $key:ident = $value:expr)* $(,)?) => {{
        let _ = ($($value,)*);
        $crate::trace::NoopSpan
    }};
}

/// Reports stage counters at info level.
#[cfg(feature = "tracing")]
macro_rules! trace_event {
    ($stage:literal, $($key:ident = $value:expr),+ $(,)?) => {
        tracing::info!(stage = $stage, $($key = $value),+)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_event {
    ($stage:literal, $($key:ident = $value:expr),+ $(,)?) => {
        let _ = ($($value,)+);
    };
}

/// Reports a recoverable data problem at warn level.
#[cfg(feature = "tracing")]
macro_rules! trace_warn {
    ($stage:literal, $($key:ident = $value:expr),+ $(,)?) => {
        tracing::warn!(stage = $stage, $($key = $value),+)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_warn {
    ($stage:literal, $($key:ident = $value:expr),+ $(,)?) => {
        let _ = ($($value,)+);
    };
}

pub(crate) use trace_event;
pub(crate) use trace_span;
pub(crate) use trace_warn;

/// Guard returned by `trace_span!` when tracing is compiled out.
#[cfg(not(feature = "tracing"))]
#[must_use]
pub(crate) struct NoopSpan;

#[cfg(not(feature = "tracing"))]
impl NoopSpan {
    #[inline]
    pub(crate) fn entered(self) -> Self {
        self
    }
}
