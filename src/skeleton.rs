use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumCount, EnumIter, EnumString};

/// The closed landmark vocabulary (17-point COCO layout used by MoveNet / PoseNet).
#[derive(
    Debug,
    Clone,
    Copy,
    EnumIter,
    EnumString,
    EnumCount,
    Display,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Landmark {
    Nose,
    LeftEye,
    RightEye,
    LeftEar,
    RightEar,
    LeftShoulder,
    RightShoulder,
    LeftElbow,
    RightElbow,
    LeftWrist,
    RightWrist,
    LeftHip,
    RightHip,
    LeftKnee,
    RightKnee,
    LeftAnkle,
    RightAnkle,
}

impl Landmark {
    /// Torso anchors. A frame missing any of these cannot feed stability or coordination.
    pub const REQUIRED: [Landmark; 4] = [
        Landmark::LeftShoulder,
        Landmark::RightShoulder,
        Landmark::LeftHip,
        Landmark::RightHip,
    ];

    #[inline(always)]
    pub fn index(self) -> usize {
        self as usize
    }
}

/// Joint angles measured at the middle landmark of a connected triplet.
#[derive(
    Debug, Clone, Copy, EnumIter, EnumString, Display, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum JointAngle {
    LeftElbow,
    RightElbow,
    LeftShoulder,
    RightShoulder,
    LeftHip,
    RightHip,
    LeftKnee,
    RightKnee,
}

impl JointAngle {
    /// (outer, vertex, outer)
    pub fn triplet(self) -> (Landmark, Landmark, Landmark) {
        use Landmark::*;
        match self {
            Self::LeftElbow => (LeftShoulder, LeftElbow, LeftWrist),
            Self::RightElbow => (RightShoulder, RightElbow, RightWrist),
            Self::LeftShoulder => (LeftElbow, LeftShoulder, LeftHip),
            Self::RightShoulder => (RightElbow, RightShoulder, RightHip),
            Self::LeftHip => (LeftShoulder, LeftHip, LeftKnee),
            Self::RightHip => (RightShoulder, RightHip, RightKnee),
            Self::LeftKnee => (LeftHip, LeftKnee, LeftAnkle),
            Self::RightKnee => (RightHip, RightKnee, RightAnkle),
        }
    }
}

/// Left/right joint pairs compared by the coordination metric.
#[derive(Debug, Clone, Copy, EnumIter, Display, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Limb {
    Elbow,
    Shoulder,
    Hip,
    Knee,
}

impl Limb {
    pub fn sides(self) -> (JointAngle, JointAngle) {
        match self {
            Self::Elbow => (JointAngle::LeftElbow, JointAngle::RightElbow),
            Self::Shoulder => (JointAngle::LeftShoulder, JointAngle::RightShoulder),
            Self::Hip => (JointAngle::LeftHip, JointAngle::RightHip),
            Self::Knee => (JointAngle::LeftKnee, JointAngle::RightKnee),
        }
    }

    pub fn all() -> Vec<Limb> {
        Limb::iter().collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point2 {
    pub x: f32,
    pub y: f32,
}

impl Point2 {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    #[inline(always)]
    pub fn dist(self, other: Point2) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    #[inline(always)]
    pub fn midpoint(self, other: Point2) -> Point2 {
        Point2::new((self.x + other.x) * 0.5, (self.y + other.y) * 0.5)
    }
}

/// Interior angle at `vertex` in degrees, within [0, 180].
/// Returns `None` when either limb segment is degenerate.
pub fn angle_at(a: Point2, vertex: Point2, c: Point2) -> Option<f32> {
    // f64 so squared lengths of far-off points cannot overflow
    let (vx, vy) = (vertex.x as f64, vertex.y as f64);
    let (ax, ay) = (a.x as f64 - vx, a.y as f64 - vy);
    let (cx, cy) = (c.x as f64 - vx, c.y as f64 - vy);
    let la = ax.hypot(ay);
    let lc = cx.hypot(cy);
    if la <= f32::EPSILON as f64 || lc <= f32::EPSILON as f64 {
        return None;
    }
    let cos = ((ax * cx + ay * cy) / (la * lc)).clamp(-1.0, 1.0);
    let deg = cos.acos().to_degrees() as f32;
    deg.is_finite().then_some(deg)
}
