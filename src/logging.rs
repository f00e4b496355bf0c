use std::str::FromStr;

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Install the global tracing subscriber.
///
/// A bare level (e.g. "debug") gets quiet defaults for the HTTP stack; a
/// directive string containing ',' or '=' is used as-is.
pub fn setup_logging(log_level: &str, json_format: bool) {
    let normalized = log_level.trim();
    let directives = if normalized.contains(',') || normalized.contains('=') {
        normalized.to_string()
    } else {
        format!("{normalized},hyper=info,hyper_util=info,reqwest=info,alloy_transport_http=info")
    };
    let filter = EnvFilter::from_str(&directives).unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = tracing_subscriber::registry().with(filter);

    if json_format {
        let json_layer = fmt::layer()
            .json()
            .with_target(false)
            .with_current_span(false)
            .with_writer(std::io::stderr);
        subscriber.with(json_layer).init();
    } else {
        let fmt_layer = fmt::layer()
            .with_target(true)
            .compact()
            .with_writer(std::io::stderr);
        subscriber.with(fmt_layer).init();
    }

    tracing::debug!(filter = %directives, json = json_format, "logging initialized");
}
