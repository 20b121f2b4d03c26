//! Logging system demonstration
//!
//! This example shows how to use the logging infrastructure in different modes.
//!
//! Run with:
//! ```bash
//! # Pretty format (default in debug)
//! cargo run --example logging_demo
//!
//! # JSON format
//! cargo run --example logging_demo -- json
//!
//! # Compact format
//! cargo run --example logging_demo -- compact
//!
//! # With custom filter
//! cargo run --example logging_demo -- pretty "core_runtime=trace"
//! ```

use core_runtime::logging::{
    init_logging, redact_if_sensitive, LogFormat, LogLevel, LoggingConfig,
};
use std::env;
use tracing::{debug, error, info, instrument, span, trace, warn, Level};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let args: Vec<String> = env::args().collect();

    let format = if args.len() > 1 {
        match args[1].as_str() {
            "json" => LogFormat::Json,
            "compact" => LogFormat::Compact,
            _ => LogFormat::Pretty,
        }
    } else {
        LogFormat::default()
    };

    let filter = args.get(2).cloned();

    let mut config = LoggingConfig::default()
        .with_format(format)
        .with_level(LogLevel::Trace)
        .with_spans(true)
        .with_target(true);

    if let Some(f) = filter {
        config = config.with_filter(f);
    }

    init_logging(config).expect("Failed to initialize logging");

    info!("=== Logging System Demo ===");
    info!(format = ?format, "Logging initialized");

    demo_log_levels();
    demo_structured_logging();
    demo_spans().await;
    demo_redaction();
    demo_instrumentation().await;

    info!("=== Demo Complete ===");
}

fn demo_log_levels() {
    let span = span!(Level::INFO, "log_levels");
    let _enter = span.enter();

    trace!("This is a TRACE level log");
    debug!("This is a DEBUG level log");
    info!("This is an INFO level log");
    warn!("This is a WARN level log");
    error!("This is an ERROR level log");
}

fn demo_structured_logging() {
    let span = span!(Level::INFO, "structured_logging");
    let _enter = span.enter();

    info!("Simple message without fields");

    info!(
        track_id = "12345",
        title = "Song Title",
        duration_ms = 30_000,
        "Track information"
    );

    info!(
        queue_length = 42,
        cursor = 7,
        progress = 0.35,
        "Playback metrics"
    );
}

async fn demo_spans() {
    let span = span!(Level::INFO, "sign_in");
    let _enter = span.enter();

    info!("Starting interactive sign-in");

    {
        let inner_span = span!(Level::DEBUG, "consent_prompt");
        let _inner = inner_span.enter();

        debug!("Waiting for consent outcome");
        tokio::time::sleep(tokio::time::Duration::from_millis(10)).await;
    }

    {
        let inner_span = span!(Level::DEBUG, "token_exchange");
        let _inner = inner_span.enter();

        debug!(status = 200, "Token endpoint responded");
        tokio::time::sleep(tokio::time::Duration::from_millis(10)).await;
    }

    info!("Sign-in completed");
}

fn demo_redaction() {
    let span = span!(Level::INFO, "redaction");
    let _enter = span.enter();

    // These values will be redacted by the helper
    let token = "secret_access_token_12345";
    let email = "user@example.com";

    info!(
        token = %redact_if_sensitive("access_token", token),
        email = %redact_if_sensitive("email", email),
        "Sensitive data example"
    );

    // Best practice: don't log sensitive values at all
    info!("Authentication successful for user");
}

#[instrument]
async fn demo_instrumentation() {
    info!("Instrumented function automatically creates spans");

    let tracks = vec!["track1", "track2", "track3"];
    queue_tracks(&tracks).await;
}

#[instrument(fields(count = tracks.len()))]
async fn queue_tracks(tracks: &[&str]) {
    debug!("Queueing tracks");

    for (idx, track) in tracks.iter().enumerate() {
        queue_track(idx, track).await;
    }

    info!("All tracks queued");
}

#[instrument(fields(position = idx))]
async fn queue_track(idx: usize, track: &str) {
    trace!(track = %track, "Queueing individual track");
    tokio::time::sleep(tokio::time::Duration::from_millis(5)).await;
}
