//! Local preview binary.
//!
//! Reads frames from `EMOSTREAM_PREVIEW_INPUT`, runs the pipeline with the
//! HUD enabled, and writes annotated frames to `EMOSTREAM_PREVIEW_OUTPUT`
//! (default `preview-out`).

use std::path::PathBuf;

use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use estream_preview::{ImageDirSource, PngDirSink, PreviewSession};
use estream_vision::{backends, FramePipeline, PipelineConfig};

fn main() {
    dotenvy::dotenv().ok();

    let env_filter = EnvFilter::from_default_env().add_directive("estream=info".parse().unwrap());
    tracing_subscriber::registry()
        .with(fmt::layer().with_ansi(true).with_target(false))
        .with(env_filter)
        .init();

    let input = match std::env::var("EMOSTREAM_PREVIEW_INPUT") {
        Ok(v) => PathBuf::from(v),
        Err(_) => {
            error!("EMOSTREAM_PREVIEW_INPUT is not set (directory of input frames)");
            std::process::exit(2);
        }
    };
    let output = PathBuf::from(
        std::env::var("EMOSTREAM_PREVIEW_OUTPUT").unwrap_or_else(|_| "preview-out".to_string()),
    );

    let config = PipelineConfig::live();
    let backends = match backends::from_env(&config) {
        Ok(b) => b,
        Err(e) => {
            error!("Failed to load vision backends: {}", e);
            std::process::exit(1);
        }
    };
    let pipeline = FramePipeline::new(backends.detector, backends.scorer, config);

    let mut source = match ImageDirSource::open(&input) {
        Ok(s) => s,
        Err(e) => {
            error!("Failed to open input: {}", e);
            std::process::exit(1);
        }
    };
    info!(frames = source.len(), input = %input.display(), "preview starting");

    let mut sink = match PngDirSink::create(&output) {
        Ok(s) => s,
        Err(e) => {
            error!("Failed to create output: {}", e);
            std::process::exit(1);
        }
    };

    let mut session = PreviewSession::new(pipeline);
    match session.run(&mut source, &mut sink) {
        Ok(stats) => {
            info!(
                shown = stats.frames_shown,
                failed = stats.frames_failed,
                output = %output.display(),
                "preview finished"
            );
        }
        Err(e) => {
            error!("Preview failed: {}", e);
            std::process::exit(1);
        }
    }
}
