//! Log output for the feedback tool.
//!
//! Everything tracing emits, audit records included, is written to stderr; stdout is reserved
//! for the verdict so it can be piped.

use std::io;

use tracing_subscriber::{
    EnvFilter,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

/// Filter used when `RUST_LOG` is unset or unparsable.
const DEFAULT_FILTER: &str = "info";

/// Shape of the log lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Pretty,
    /// One JSON object per line, with the active spans.
    Json,
}

impl LogFormat {
    /// Reads `LOG_FORMAT`; only `json` (any case) selects [`LogFormat::Json`].
    #[must_use]
    pub fn from_env() -> Self {
        std::env::var("LOG_FORMAT").ok().as_deref().map_or_else(Self::default, Self::parse)
    }

    fn parse(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("json") { Self::Json } else { Self::Pretty }
    }
}

/// Installs the global subscriber. `RUST_LOG=audit=info` narrows output to audit records.
pub fn init_observability(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let json = (format == LogFormat::Json).then(|| {
        fmt::layer().json().with_current_span(true).with_span_list(true).with_writer(io::stderr)
    });
    let pretty = (format == LogFormat::Pretty)
        .then(|| fmt::layer().with_span_events(FmtSpan::CLOSE).with_writer(io::stderr));

    tracing_subscriber::registry().with(filter).with(json).with(pretty).init();
}
