use serde::{Deserialize, Serialize};

/// One tracked landmark as delivered by the client-side detector.
/// `name` stays a raw string here; the validator resolves it against the vocabulary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Keypoint {
    pub name: String,
    pub x: f32,
    pub y: f32,
    pub score: f32,
}

impl Keypoint {
    pub fn new(name: impl Into<String>, x: f32, y: f32, score: f32) -> Self {
        Self {
            name: name.into(),
            x,
            y,
            score,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PoseFrame {
    #[serde(default)]
    pub keypoints: Vec<Keypoint>,
    pub score: f32,
}

impl PoseFrame {
    pub fn new(keypoints: Vec<Keypoint>, score: f32) -> Self {
        Self { keypoints, score }
    }
}

/// A complete, already-collected capture. Frames are in temporal order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PoseSequence {
    pub frames: Vec<PoseFrame>,
    #[serde(default)]
    pub timestamp_ms: i64,
}

impl PoseSequence {
    pub fn new(frames: Vec<PoseFrame>, timestamp_ms: i64) -> Self {
        Self {
            frames,
            timestamp_ms,
        }
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}
