//! WebSocket handlers.

use std::sync::Arc;
use std::time::Instant;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::IntoResponse;
use futures_util::{SinkExt, StreamExt};
use tracing::{info, warn};

use estream_models::{ClientEvent, EmotionLabel, EmotionScores, ServerEvent};
use estream_vision::codec;
use estream_vision::pipeline::FrameReport;

use crate::state::AppState;

/// WebSocket streaming endpoint.
pub async fn ws_stream(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_stream_socket(socket, state))
}

/// Handle one streaming connection.
///
/// Frames are processed strictly in receipt order, one at a time: the next
/// socket message is only read once the current frame has completed, so a
/// slow pipeline blocks the sender instead of queueing frames. A failed
/// send means the client is gone; the in-flight frame is abandoned and
/// nothing further is emitted for it.
async fn handle_stream_socket(socket: WebSocket, state: AppState) {
    let (mut sender, mut receiver) = socket.split();

    let client_id = state.bookkeeper.client_connected();
    info!(client_id, "Client connected");

    let hello = ServerEvent::connected(client_id);
    if send_event(&mut sender, &hello).await.is_err() {
        state.bookkeeper.client_disconnected();
        return;
    }

    // Session-monotonic count of completed frames; error events report the
    // count as of the last completed frame.
    let mut session_frames: u64 = 0;

    while let Some(message) = receiver.next().await {
        match message {
            Ok(Message::Text(text)) => {
                let event = match serde_json::from_str::<ClientEvent>(&text) {
                    Ok(event) => event,
                    Err(e) => {
                        let error = ServerEvent::error(
                            format!("Invalid request: {e}"),
                            session_frames,
                        );
                        if send_event(&mut sender, &error).await.is_err() {
                            break;
                        }
                        continue;
                    }
                };

                let ClientEvent::VideoFrame { image } = event;
                let response = handle_video_frame(&state, image, &mut session_frames).await;
                if send_event(&mut sender, &response).await.is_err() {
                    warn!(client_id, "WebSocket send failed, client disconnected");
                    break;
                }
            }
            Ok(Message::Close(_)) | Err(_) => break,
            // Pings are answered by axum; binary and pong frames are ignored.
            Ok(_) => {}
        }
    }

    state.bookkeeper.client_disconnected();
    info!(client_id, frames = session_frames, "Client disconnected");
}

/// Process one `video_frame` event into the response event.
///
/// The decode + pipeline work is CPU-bound and runs on the blocking pool;
/// awaiting it is where this session yields to others. Frame counters are
/// only advanced for frames the pipeline actually completed.
async fn handle_video_frame(
    state: &AppState,
    image: String,
    session_frames: &mut u64,
) -> ServerEvent {
    let started = Instant::now();
    let pipeline = Arc::clone(&state.pipeline);

    let outcome = tokio::task::spawn_blocking(move || {
        let mut frame = codec::decode_frame(&image)?;
        pipeline.process(&mut frame, None)
    })
    .await;

    match outcome {
        Ok(Ok(report)) => {
            *session_frames += 1;
            state.bookkeeper.frame_completed();
            let processing_time = started.elapsed().as_secs_f64();
            let (emotion, emotions) = summarize(&report);
            info!(
                frame = *session_frames,
                emotion = %emotion,
                faces = report.detections.len(),
                processing_ms = (processing_time * 1000.0) as u64,
                "Frame processed"
            );
            ServerEvent::emotion_result(emotion, emotions, *session_frames, processing_time)
        }
        Ok(Err(e)) => {
            warn!(error = %e, "Frame processing failed");
            ServerEvent::error(e.to_string(), *session_frames)
        }
        Err(e) => {
            warn!(error = %e, "Frame processing task failed");
            ServerEvent::error("Internal processing failure", *session_frames)
        }
    }
}

/// Frame-level primary emotion plus its score mapping.
fn summarize(report: &FrameReport) -> (String, EmotionScores) {
    match report.primary() {
        Some(primary) => (
            primary.label.to_string(),
            primary.scores.clone().unwrap_or_default(),
        ),
        None if report.detections.is_empty() => {
            (EmotionLabel::Neutral.to_string(), EmotionScores::new())
        }
        // Faces were detected but none classified.
        None => (EmotionLabel::Uncertain.to_string(), EmotionScores::new()),
    }
}

async fn send_event<S>(sender: &mut S, event: &ServerEvent) -> Result<(), ()>
where
    S: SinkExt<Message> + Unpin,
{
    let json = serde_json::to_string(event).map_err(|_| ())?;
    sender.send(Message::Text(json)).await.map_err(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ApiConfig;
    use base64::engine::general_purpose::STANDARD as BASE64;
    use base64::Engine as _;
    use estream_vision::backends::fixture::{FixtureDetector, FixtureScorer};
    use estream_vision::{FramePipeline, PipelineConfig};
    use image::{Rgb, RgbImage};

    fn test_state() -> AppState {
        let pipeline = FramePipeline::new(
            Arc::new(FixtureDetector::centered()),
            Arc::new(FixtureScorer::cheerful()),
            PipelineConfig::live(),
        );
        AppState::new(ApiConfig::default(), pipeline)
    }

    fn frame_payload() -> String {
        let frame = RgbImage::from_pixel(64, 48, Rgb([120, 120, 120]));
        let mut bytes = Vec::new();
        frame
            .write_with_encoder(image::codecs::png::PngEncoder::new(&mut bytes))
            .unwrap();
        format!("data:image/png;base64,{}", BASE64.encode(&bytes))
    }

    #[tokio::test]
    async fn test_valid_frame_produces_emotion_result() {
        let state = test_state();
        let mut frames = 0;

        let event = handle_video_frame(&state, frame_payload(), &mut frames).await;
        match event {
            ServerEvent::EmotionResult {
                success,
                emotion,
                frame_number,
                ..
            } => {
                assert!(success);
                assert_eq!(emotion, "happy");
                assert_eq!(frame_number, 1);
            }
            other => panic!("expected emotion_result, got {other:?}"),
        }
        assert_eq!(state.bookkeeper.snapshot().processed_frames, 1);
    }

    #[tokio::test]
    async fn test_undecodable_frame_produces_error_without_count() {
        let state = test_state();
        let mut frames = 0;

        let event = handle_video_frame(&state, "!!garbage!!".to_string(), &mut frames).await;
        match event {
            ServerEvent::Error {
                success,
                frame_number,
                ..
            } => {
                assert!(!success);
                assert_eq!(frame_number, 0);
            }
            other => panic!("expected error, got {other:?}"),
        }
        assert_eq!(frames, 0);
        assert_eq!(state.bookkeeper.snapshot().processed_frames, 0);
    }

    #[tokio::test]
    async fn test_five_valid_one_bad_counts_five() {
        let state = test_state();
        let mut frames = 0;

        for _ in 0..3 {
            handle_video_frame(&state, frame_payload(), &mut frames).await;
        }
        handle_video_frame(&state, "not-a-frame".to_string(), &mut frames).await;
        for _ in 0..2 {
            handle_video_frame(&state, frame_payload(), &mut frames).await;
        }

        assert_eq!(frames, 5);
        assert_eq!(state.bookkeeper.snapshot().processed_frames, 5);
    }

    #[tokio::test]
    async fn test_empty_frame_reports_neutral() {
        // A detector that never finds faces.
        let pipeline = FramePipeline::new(
            Arc::new(FixtureDetector::with_regions(vec![])),
            Arc::new(FixtureScorer::cheerful()),
            PipelineConfig::live(),
        );
        let state = AppState::new(ApiConfig::default(), pipeline);
        let mut frames = 0;

        let event = handle_video_frame(&state, frame_payload(), &mut frames).await;
        match event {
            ServerEvent::EmotionResult {
                emotion, emotions, ..
            } => {
                assert_eq!(emotion, "neutral");
                assert!(emotions.is_empty());
            }
            other => panic!("expected emotion_result, got {other:?}"),
        }
        // An empty frame still counts as processed.
        assert_eq!(state.bookkeeper.snapshot().processed_frames, 1);
    }
}
