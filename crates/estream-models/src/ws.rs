//! WebSocket event types.
//!
//! Events are tagged by an `event` field so clients can dispatch by name,
//! matching the original streaming protocol.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::emotion::EmotionScores;

/// Events sent by a streaming client.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ClientEvent {
    /// One still frame, base64-encoded, optionally carrying a
    /// `data:*;base64,` header that the server strips before decoding.
    VideoFrame { image: String },
}

/// Events sent by the server over a streaming connection.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ServerEvent {
    /// Acknowledges a new connection.
    ConnectionStatus {
        status: String,
        timestamp: DateTime<Utc>,
        client_id: u64,
    },

    /// A frame was processed successfully.
    EmotionResult {
        success: bool,
        /// Frame-level primary emotion (lowercase label).
        emotion: String,
        /// Score mapping of the primary face; all zeros when no face
        /// produced usable scores.
        emotions: EmotionScores,
        /// Session-monotonic count of completed frames.
        frame_number: u64,
        /// Wall-clock processing time in seconds.
        processing_time: f64,
        timestamp: DateTime<Utc>,
    },

    /// Frame processing failed; the session continues.
    Error {
        success: bool,
        message: String,
        frame_number: u64,
        timestamp: DateTime<Utc>,
    },
}

impl ServerEvent {
    /// Create a connection acknowledgement.
    pub fn connected(client_id: u64) -> Self {
        ServerEvent::ConnectionStatus {
            status: "connected".to_string(),
            timestamp: Utc::now(),
            client_id,
        }
    }

    /// Create a successful frame result.
    pub fn emotion_result(
        emotion: impl Into<String>,
        emotions: EmotionScores,
        frame_number: u64,
        processing_time: f64,
    ) -> Self {
        ServerEvent::EmotionResult {
            success: true,
            emotion: emotion.into(),
            emotions,
            frame_number,
            processing_time,
            timestamp: Utc::now(),
        }
    }

    /// Create a per-frame error event.
    pub fn error(message: impl Into<String>, frame_number: u64) -> Self {
        ServerEvent::Error {
            success: false,
            message: message.into(),
            frame_number,
            timestamp: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emotion::EmotionLabel;

    #[test]
    fn test_video_frame_parse() {
        let event: ClientEvent =
            serde_json::from_str(r#"{"event":"video_frame","image":"abc123"}"#).unwrap();
        let ClientEvent::VideoFrame { image } = event;
        assert_eq!(image, "abc123");
    }

    #[test]
    fn test_connection_status_serialization() {
        let json = serde_json::to_string(&ServerEvent::connected(7)).unwrap();
        assert!(json.contains("\"event\":\"connection_status\""));
        assert!(json.contains("\"status\":\"connected\""));
        assert!(json.contains("\"client_id\":7"));
    }

    #[test]
    fn test_emotion_result_serialization() {
        let scores = EmotionScores::from_pairs(&[(EmotionLabel::Happy, 88.0)]);
        let msg = ServerEvent::emotion_result("happy", scores, 3, 0.041);
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["event"], "emotion_result");
        assert_eq!(json["success"], true);
        assert_eq!(json["emotion"], "happy");
        assert_eq!(json["emotions"]["happy"], 88.0);
        assert_eq!(json["frame_number"], 3);
    }

    #[test]
    fn test_error_serialization() {
        let json = serde_json::to_value(&ServerEvent::error("bad frame", 5)).unwrap();
        assert_eq!(json["event"], "error");
        assert_eq!(json["success"], false);
        assert_eq!(json["message"], "bad frame");
        assert_eq!(json["frame_number"], 5);
    }

    #[test]
    fn test_timestamps_are_rfc3339() {
        let json = serde_json::to_value(&ServerEvent::connected(1)).unwrap();
        let ts = json["timestamp"].as_str().unwrap();
        assert!(DateTime::parse_from_rfc3339(ts).is_ok());
    }
}
