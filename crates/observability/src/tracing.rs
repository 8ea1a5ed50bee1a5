//! Tracing/logging initialization.
//!
//! JSON lines on stdout, filtered by `RUST_LOG`. Event fields sit at the top
//! level of each line; the innermost span is nested under `"span"`, so events
//! of a run look like:
//!
//! ```text
//! {"timestamp":"..","level":"INFO","message":"notification sent","supplier":"AcmeCo",
//!  "span":{"run_id":"0190..","name":"replenishment_run"}}
//! ```

use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Initialize tracing/logging for the process.
///
/// Safe to call multiple times (subsequent calls are no-ops).
pub fn init(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));

    let _ = json_subscriber(filter, std::io::stdout).try_init();
}

/// JSON logs + timestamps written to `writer`.
fn json_subscriber<W>(
    filter: EnvFilter,
    writer: W,
) -> impl ::tracing::Subscriber + Send + Sync + 'static
where
    W: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .json()
        .flatten_event(true)
        .with_current_span(true)
        .with_span_list(false)
        .with_timer(tracing_subscriber::fmt::time::SystemTime)
        .with_target(false)
        .with_writer(writer)
        .finish()
}
