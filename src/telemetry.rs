//! Telemetry initialization (tracing/tracing-subscriber).
//!
//! - LOG_LEVEL holds the filter directives; unset or unparsable falls back to [`DEFAULT_FILTER`].
//! - LOG_FORMAT=json switches to structured output; anything else is the human format.
//!
//! Log targets: `tips` (daily picks), `hints`, `content` (catalog load), `learnhub_backend`.

use tracing_subscriber::EnvFilter;

pub const DEFAULT_FILTER: &str =
    "info,tips=debug,hints=info,content=info,learnhub_backend=debug,tower_http=info,axum=info";

/// Filter from LOG_LEVEL, or the default directives.
fn env_filter() -> EnvFilter {
    match std::env::var("LOG_LEVEL") {
        Ok(raw) if !raw.trim().is_empty() => {
            EnvFilter::try_new(raw.trim()).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
        }
        _ => EnvFilter::new(DEFAULT_FILTER),
    }
}

fn json_requested(format: Option<&str>) -> bool {
    format.map_or(false, |f| f.trim().eq_ignore_ascii_case("json"))
}

pub fn init_tracing() {
    let json = json_requested(std::env::var("LOG_FORMAT").ok().as_deref());
    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_target(true)
        .with_line_number(true);

    // Two different subscriber types, so init each arm separately.
    if json {
        builder.json().with_current_span(true).init();
    } else {
        builder.compact().init();
    }
    tracing::debug!(target: "learnhub_backend", json, "Tracing initialized");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_filter_parses_and_names_every_target() {
        assert!(EnvFilter::try_new(DEFAULT_FILTER).is_ok());
        for target in ["tips=", "hints=", "content=", "learnhub_backend="] {
            assert!(DEFAULT_FILTER.contains(target), "{target}");
        }
    }

    #[test]
    fn json_format_is_case_insensitive() {
        assert!(json_requested(Some("json")));
        assert!(json_requested(Some(" JSON ")));
        assert!(!json_requested(Some("pretty")));
        assert!(!json_requested(None));
    }
}
