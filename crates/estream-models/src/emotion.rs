//! Emotion labels and confidence score mappings.

use schemars::JsonSchema;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Emotion labels a frame result can carry.
///
/// The first nine are classifier outputs; `Uncertain` is reported only when
/// the dominant confidence falls at or below the threshold or when
/// classification fails for a face.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum EmotionLabel {
    Angry,
    Disgust,
    Fear,
    Happy,
    Sad,
    Surprise,
    Neutral,
    Excited,
    Calm,
    Uncertain,
}

/// Canonical classifier label order. Argmax ties break toward the earlier
/// entry, so score iteration must always follow this order.
pub const CLASSIFIER_LABELS: [EmotionLabel; 9] = [
    EmotionLabel::Angry,
    EmotionLabel::Disgust,
    EmotionLabel::Fear,
    EmotionLabel::Happy,
    EmotionLabel::Sad,
    EmotionLabel::Surprise,
    EmotionLabel::Neutral,
    EmotionLabel::Excited,
    EmotionLabel::Calm,
];

impl EmotionLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            EmotionLabel::Angry => "angry",
            EmotionLabel::Disgust => "disgust",
            EmotionLabel::Fear => "fear",
            EmotionLabel::Happy => "happy",
            EmotionLabel::Sad => "sad",
            EmotionLabel::Surprise => "surprise",
            EmotionLabel::Neutral => "neutral",
            EmotionLabel::Excited => "excited",
            EmotionLabel::Calm => "calm",
            EmotionLabel::Uncertain => "uncertain",
        }
    }

    /// Which full-frame overlay this label triggers, if any.
    pub fn overlay(&self) -> Option<OverlayKind> {
        match self {
            EmotionLabel::Angry | EmotionLabel::Fear | EmotionLabel::Sad | EmotionLabel::Disgust => {
                Some(OverlayKind::Stress)
            }
            EmotionLabel::Happy | EmotionLabel::Surprise | EmotionLabel::Excited => {
                Some(OverlayKind::Positive)
            }
            EmotionLabel::Neutral | EmotionLabel::Calm => Some(OverlayKind::Calm),
            EmotionLabel::Uncertain => None,
        }
    }

    fn index(&self) -> Option<usize> {
        CLASSIFIER_LABELS.iter().position(|l| l == self)
    }
}

impl fmt::Display for EmotionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for EmotionLabel {
    type Err = LabelParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "angry" => Ok(EmotionLabel::Angry),
            "disgust" => Ok(EmotionLabel::Disgust),
            "fear" => Ok(EmotionLabel::Fear),
            "happy" => Ok(EmotionLabel::Happy),
            "sad" => Ok(EmotionLabel::Sad),
            "surprise" => Ok(EmotionLabel::Surprise),
            "neutral" => Ok(EmotionLabel::Neutral),
            "excited" => Ok(EmotionLabel::Excited),
            "calm" => Ok(EmotionLabel::Calm),
            "uncertain" => Ok(EmotionLabel::Uncertain),
            _ => Err(LabelParseError(s.to_string())),
        }
    }
}

#[derive(Debug, Error)]
#[error("Unknown emotion label: {0}")]
pub struct LabelParseError(String);

/// Full-frame overlay categories keyed to the detected emotion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum OverlayKind {
    /// Red warning tint plus stress banner
    Stress,
    /// Green tint
    Positive,
    /// Pale yellow tint
    Calm,
}

/// Confidence mapping over the classifier labels, values in `[0, 100]`.
///
/// Stored densely in canonical label order so the argmax is deterministic:
/// ties break toward the first label encountered.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EmotionScores {
    values: [f32; CLASSIFIER_LABELS.len()],
}

impl EmotionScores {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from label/confidence pairs. `Uncertain` entries are ignored.
    pub fn from_pairs(pairs: &[(EmotionLabel, f32)]) -> Self {
        let mut scores = Self::new();
        for (label, value) in pairs {
            scores.set(*label, *value);
        }
        scores
    }

    pub fn set(&mut self, label: EmotionLabel, value: f32) {
        if let Some(i) = label.index() {
            self.values[i] = value;
        }
    }

    pub fn get(&self, label: EmotionLabel) -> f32 {
        label.index().map(|i| self.values[i]).unwrap_or(0.0)
    }

    /// Iterate (label, confidence) in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (EmotionLabel, f32)> + '_ {
        CLASSIFIER_LABELS
            .iter()
            .zip(self.values.iter())
            .map(|(l, v)| (*l, *v))
    }

    /// All confidences are zero (e.g. no face produced scores).
    pub fn is_empty(&self) -> bool {
        self.values.iter().all(|v| *v == 0.0)
    }

    /// The dominant label and its confidence. Strict `>` comparison over
    /// canonical order, so the first label wins ties.
    pub fn dominant(&self) -> (EmotionLabel, f32) {
        let mut best = (CLASSIFIER_LABELS[0], self.values[0]);
        for (label, value) in self.iter().skip(1) {
            if value > best.1 {
                best = (label, value);
            }
        }
        best
    }
}

impl Serialize for EmotionScores {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(CLASSIFIER_LABELS.len()))?;
        for (label, value) in self.iter() {
            map.serialize_entry(label.as_str(), &value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for EmotionScores {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ScoresVisitor;

        impl<'de> Visitor<'de> for ScoresVisitor {
            type Value = EmotionScores;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of emotion label to confidence")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut scores = EmotionScores::new();
                while let Some((key, value)) = access.next_entry::<String, f32>()? {
                    // Unknown labels are tolerated for forward compatibility.
                    if let Ok(label) = key.parse::<EmotionLabel>() {
                        scores.set(label, value);
                    }
                }
                Ok(scores)
            }
        }

        deserializer.deserialize_map(ScoresVisitor)
    }
}

impl JsonSchema for EmotionScores {
    fn schema_name() -> String {
        "EmotionScores".to_string()
    }

    fn json_schema(gen: &mut schemars::gen::SchemaGenerator) -> schemars::schema::Schema {
        // A plain label -> confidence object on the wire.
        let mut schema = gen.subschema_for::<std::collections::BTreeMap<String, f32>>();
        if let schemars::schema::Schema::Object(ref mut obj) = schema {
            obj.metadata().description =
                Some("Emotion label to confidence mapping (0-100)".to_string());
        }
        schema
    }
}
