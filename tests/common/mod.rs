#![allow(dead_code)]

use poseforge::pose::{Keypoint, PoseFrame, PoseSequence};

/// Left-side landmarks of an upright, relaxed stance (normalized image coordinates).
/// The right side mirrors these around x = 0.5.
const LEFT_SIDE: [(&str, f32, f32); 8] = [
    ("shoulder", 0.40, 0.25),
    ("elbow", 0.38, 0.40),
    ("wrist", 0.37, 0.55),
    ("hip", 0.45, 0.55),
    ("knee", 0.45, 0.75),
    ("ankle", 0.46, 0.95),
    ("eye", 0.48, 0.08),
    ("ear", 0.46, 0.09),
];

/// Builder for a single 17-keypoint frame.
pub struct FrameBuilder {
    keypoints: Vec<Keypoint>,
    score: f32,
}

impl FrameBuilder {
    pub fn standing() -> Self {
        let mut keypoints = vec![Keypoint::new("nose", 0.5, 0.1, 0.95)];
        for (part, x, y) in LEFT_SIDE {
            keypoints.push(Keypoint::new(format!("left_{}", part), x, y, 0.9));
            keypoints.push(Keypoint::new(format!("right_{}", part), 1.0 - x, y, 0.9));
        }
        Self {
            keypoints,
            score: 0.9,
        }
    }

    pub fn score(mut self, score: f32) -> Self {
        self.score = score;
        self
    }

    /// Moves every keypoint; joint angles are unaffected.
    pub fn shift(mut self, dx: f32, dy: f32) -> Self {
        for kp in &mut self.keypoints {
            kp.x += dx;
            kp.y += dy;
        }
        self
    }

    pub fn place(mut self, name: &str, x: f32, y: f32) -> Self {
        if let Some(kp) = self.keypoints.iter_mut().find(|k| k.name == name) {
            kp.x = x;
            kp.y = y;
        }
        self
    }

    pub fn confidence(mut self, name: &str, score: f32) -> Self {
        if let Some(kp) = self.keypoints.iter_mut().find(|k| k.name == name) {
            kp.score = score;
        }
        self
    }

    pub fn without(mut self, name: &str) -> Self {
        self.keypoints.retain(|k| k.name != name);
        self
    }

    pub fn build(self) -> PoseFrame {
        PoseFrame::new(self.keypoints, self.score)
    }
}

/// Clean symmetric capture with a barely perceptible sway.
pub fn steady_sequence(n: usize) -> PoseSequence {
    let frames = (0..n)
        .map(|i| {
            let sway = 0.001 * (i as f32 * 0.7).sin();
            FrameBuilder::standing().shift(sway, 0.0).build()
        })
        .collect();
    PoseSequence::new(frames, 1_700_000_000_000)
}

/// Whole body jumping back and forth by a third of a torso length every frame.
pub fn shaky_sequence(n: usize) -> PoseSequence {
    let frames = (0..n)
        .map(|i| {
            let jolt = if i % 2 == 0 { 0.1 } else { -0.1 };
            FrameBuilder::standing().shift(jolt, jolt * 0.5).build()
        })
        .collect();
    PoseSequence::new(frames, 0)
}

/// Right arm held at a right angle while the left arm hangs straight.
pub fn lopsided_sequence(n: usize) -> PoseSequence {
    let frames = (0..n)
        .map(|_| {
            FrameBuilder::standing()
                .place("right_wrist", 0.77, 0.40)
                .build()
        })
        .collect();
    PoseSequence::new(frames, 0)
}

/// Left wrist placed so the left elbow bends to `deg` degrees.
fn left_wrist_at(deg: f32) -> (f32, f32) {
    let (ex, ey) = (0.38f32, 0.40f32);
    let (ux, uy) = (0.40 - ex, 0.25 - ey);
    let len = ux.hypot(uy);
    let (ux, uy) = (ux / len, uy / len);
    let (sin, cos) = deg.to_radians().sin_cos();
    (ex + 0.15 * (ux * cos - uy * sin), ey + 0.15 * (ux * sin + uy * cos))
}

/// Elbow flexion cycling between 90 and 170 degrees, period about ten frames.
pub fn elbow_angle(frame: f32) -> f32 {
    130.0 + 40.0 * (frame * 0.6).sin()
}

/// Both arms curling; the right arm trails the left by `right_delay` frames.
pub fn curling_sequence(n: usize, right_delay: usize) -> PoseSequence {
    let frames = (0..n)
        .map(|i| {
            let (lx, ly) = left_wrist_at(elbow_angle(i as f32));
            let (rx, ry) = left_wrist_at(elbow_angle(i as f32 - right_delay as f32));
            FrameBuilder::standing()
                .place("left_wrist", lx, ly)
                .place("right_wrist", 1.0 - rx, ry)
                .build()
        })
        .collect();
    PoseSequence::new(frames, 0)
}

/// Whole body walking sideways at a constant `step` per frame.
pub fn drifting_sequence(n: usize, step: f32) -> PoseSequence {
    let frames = (0..n)
        .map(|i| FrameBuilder::standing().shift(step * i as f32, 0.0).build())
        .collect();
    PoseSequence::new(frames, 0)
}

pub fn sequence_json(seq: &PoseSequence) -> String {
    let body = serde_json::json!({
        "poses": seq.frames,
        "timestamp": seq.timestamp_ms,
    });
    body.to_string()
}
