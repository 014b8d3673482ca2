use crate::config::ValidationParams;
use crate::error::{PfResult, PoseForgeError};
use crate::pose::PoseFrame;
use crate::skeleton::{angle_at, JointAngle, Landmark, Point2};
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use strum::EnumCount;
use tracing::{debug, info};

/// Coordinates beyond this magnitude are treated as detector garbage.
pub const MAX_COORDINATE: f32 = 1.0e6;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrackedPoint {
    pub pos: Point2,
    pub score: f32,
    /// False when the keypoint fell below `min_keypoint_confidence`.
    pub reliable: bool,
}

/// A retained frame with keypoints indexed by landmark.
#[derive(Debug, Clone, PartialEq)]
pub struct CleanFrame {
    /// Position in the raw input sequence.
    pub index: usize,
    pub score: f32,
    points: [Option<TrackedPoint>; Landmark::COUNT],
}

impl CleanFrame {
    pub fn point(&self, landmark: Landmark) -> Option<&TrackedPoint> {
        self.points[landmark.index()].as_ref()
    }

    /// Position of a landmark, only if it was tracked reliably.
    pub fn reliable(&self, landmark: Landmark) -> Option<Point2> {
        self.point(landmark).filter(|p| p.reliable).map(|p| p.pos)
    }

    pub fn joint_angle(&self, joint: JointAngle) -> Option<f32> {
        let (a, v, c) = joint.triplet();
        angle_at(self.reliable(a)?, self.reliable(v)?, self.reliable(c)?)
    }

    /// Shoulder-midpoint to hip-midpoint distance, falling back to shoulder width.
    pub fn torso_length(&self) -> Option<f32> {
        let ls = self.reliable(Landmark::LeftShoulder);
        let rs = self.reliable(Landmark::RightShoulder);
        let lh = self.reliable(Landmark::LeftHip);
        let rh = self.reliable(Landmark::RightHip);

        let len = match (ls, rs, lh, rh) {
            (Some(ls), Some(rs), Some(lh), Some(rh)) => ls.midpoint(rs).dist(lh.midpoint(rh)),
            (Some(ls), Some(rs), _, _) => ls.dist(rs),
            _ => return None,
        };
        (len > f32::EPSILON).then_some(len)
    }

    pub fn unreliable_count(&self) -> usize {
        self.points
            .iter()
            .flatten()
            .filter(|p| !p.reliable)
            .count()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DropReason {
    NoKeypoints,
    LowConfidence { score: f32 },
    MissingLandmark { landmark: Landmark },
    Malformed { reason: String },
}

impl fmt::Display for DropReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoKeypoints => write!(f, "no keypoints"),
            Self::LowConfidence { score } => write!(f, "low frame confidence ({:.2})", score),
            Self::MissingLandmark { landmark } => write!(f, "missing {}", landmark),
            Self::Malformed { reason } => write!(f, "malformed: {}", reason),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameDrop {
    pub index: usize,
    pub reason: DropReason,
}

#[derive(Debug, Clone)]
pub struct ValidatedSequence {
    pub frames: Vec<CleanFrame>,
    pub dropped: usize,
    pub total: usize,
    pub drops: Vec<FrameDrop>,
}

impl ValidatedSequence {
    pub fn usable(&self) -> usize {
        self.frames.len()
    }

    pub fn dropped_ratio(&self) -> f32 {
        if self.total == 0 {
            0.0
        } else {
            self.dropped as f32 / self.total as f32
        }
    }
}

/// Sorts every raw frame into usable or dropped without failing.
pub fn inspect(raw: &[PoseFrame], params: &ValidationParams) -> ValidatedSequence {
    let mut frames = Vec::with_capacity(raw.len());
    let mut drops = Vec::new();

    for (index, frame) in raw.iter().enumerate() {
        match clean_frame(index, frame, params) {
            Ok(clean) => frames.push(clean),
            Err(reason) => {
                debug!("Dropping frame #{}: {}", index, reason);
                drops.push(FrameDrop { index, reason });
            }
        }
    }

    ValidatedSequence {
        dropped: drops.len(),
        total: raw.len(),
        frames,
        drops,
    }
}

/// Filters the raw capture down to frames the metrics can use.
///
/// Frames that are empty, under-confident, malformed or missing a torso anchor are
/// dropped and counted. Fails with `InsufficientData` if nothing survives.
pub fn validate(raw: &[PoseFrame], params: &ValidationParams) -> PfResult<ValidatedSequence> {
    let validated = inspect(raw, params);

    info!(
        "Validated {} frame(s): {} usable, {} dropped",
        validated.total,
        validated.usable(),
        validated.dropped
    );

    if validated.frames.is_empty() {
        return Err(PoseForgeError::InsufficientData {
            usable: 0,
            required: 1,
        });
    }
    Ok(validated)
}

fn clean_frame(
    index: usize,
    frame: &PoseFrame,
    params: &ValidationParams,
) -> Result<CleanFrame, DropReason> {
    if frame.keypoints.is_empty() {
        return Err(DropReason::NoKeypoints);
    }

    if let Err(e) = check_well_formed(index, frame) {
        let reason = match e {
            PoseForgeError::MalformedFrame { reason, .. } => reason,
            other => other.to_string(),
        };
        return Err(DropReason::Malformed { reason });
    }

    if frame.score < params.min_frame_confidence {
        return Err(DropReason::LowConfidence { score: frame.score });
    }

    let mut points = [None; Landmark::COUNT];
    for kp in &frame.keypoints {
        match Landmark::from_str(&kp.name) {
            Ok(lm) => {
                points[lm.index()] = Some(TrackedPoint {
                    pos: Point2::new(kp.x, kp.y),
                    score: kp.score,
                    reliable: kp.score >= params.min_keypoint_confidence,
                });
            }
            Err(_) => debug!("Frame #{}: ignoring unknown landmark '{}'", index, kp.name),
        }
    }

    if let Some(&landmark) = Landmark::REQUIRED
        .iter()
        .find(|lm| points[lm.index()].is_none())
    {
        return Err(DropReason::MissingLandmark { landmark });
    }

    Ok(CleanFrame {
        index,
        score: frame.score,
        points,
    })
}

/// Structural checks. Any failure here condemns the frame, never the sequence.
pub fn check_well_formed(index: usize, frame: &PoseFrame) -> PfResult<()> {
    let malformed = |reason: String| PoseForgeError::MalformedFrame { index, reason };

    if !(frame.score.is_finite() && (0.0..=1.0).contains(&frame.score)) {
        return Err(malformed(format!("frame score {} outside [0, 1]", frame.score)));
    }

    let mut names = HashSet::with_capacity(frame.keypoints.len());
    for kp in &frame.keypoints {
        if kp.name.is_empty() {
            return Err(malformed("keypoint with empty name".to_string()));
        }
        if !names.insert(kp.name.as_str()) {
            return Err(malformed(format!("duplicate keypoint '{}'", kp.name)));
        }
        if !(kp.x.is_finite() && kp.y.is_finite()) {
            return Err(malformed(format!("non-finite position for '{}'", kp.name)));
        }
        if kp.x.abs() > MAX_COORDINATE || kp.y.abs() > MAX_COORDINATE {
            return Err(malformed(format!(
                "position ({}, {}) for '{}' out of range",
                kp.x, kp.y, kp.name
            )));
        }
        if !(kp.score.is_finite() && (0.0..=1.0).contains(&kp.score)) {
            return Err(malformed(format!(
                "score {} for '{}' outside [0, 1]",
                kp.score, kp.name
            )));
        }
    }
    Ok(())
}
