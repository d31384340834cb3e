//! Logging initialization using `tracing` and `tracing-subscriber`.
//!
//! The filter comes from `RUST_LOG` (standard `EnvFilter` syntax); the
//! output format from `STACMAP_FORMAT`.

use std::str::FromStr;

use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::format::FmtSpan;

/// Log output format options.
#[derive(Debug, Clone, Copy, Default)]
pub enum LogFormat {
    /// Human-readable, single-line logs.
    Full,
    /// A variant of the full format, optimized for short line lengths (default).
    #[default]
    Compact,
    /// Very bare: no timestamps, targets or ANSI colors.
    Bare,
    /// Newline-delimited structured JSON logs.
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "full" => Ok(Self::Full),
            "compact" => Ok(Self::Compact),
            "bare" => Ok(Self::Bare),
            "json" => Ok(Self::Json),
            _ => Err(format!("unknown log format '{s}'")),
        }
    }
}

impl LogFormat {
    /// Initialize logging according to the selected format.
    fn init(self, env_filter: EnvFilter) {
        let dispatch = match self {
            Self::Full => tracing_subscriber::fmt()
                .with_span_events(FmtSpan::NONE)
                .with_env_filter(env_filter)
                .finish()
                .into(),
            Self::Compact => tracing_subscriber::fmt()
                .compact()
                .with_span_events(FmtSpan::NONE)
                .with_env_filter(env_filter)
                .finish()
                .into(),
            Self::Bare => tracing_subscriber::fmt()
                .compact()
                .with_span_events(FmtSpan::NONE)
                .without_time()
                .with_target(false)
                .with_ansi(false)
                .with_env_filter(env_filter)
                .finish()
                .into(),
            Self::Json => tracing_subscriber::fmt()
                .json()
                .with_span_events(FmtSpan::NONE)
                .with_env_filter(env_filter)
                .finish()
                .into(),
        };
        tracing::dispatcher::set_global_default(dispatch)
            .expect("failed to set global default subscriber");
    }
}

/// Installs the global subscriber and the `log`-crate bridge.
///
/// `filter` is `RUST_LOG`-style; invalid directives fall back to `info`.
pub fn init_tracing(filter: Option<&str>, format: Option<&str>) {
    let env_filter = filter
        .and_then(|f| EnvFilter::try_new(f).ok())
        .unwrap_or_else(|| EnvFilter::new("info"));
    let format = format
        .and_then(|f| LogFormat::from_str(f).ok())
        .unwrap_or_default();

    // actix and friends log through the `log` crate
    tracing_log::LogTracer::init().ok();
    format.init(env_filter);
}
