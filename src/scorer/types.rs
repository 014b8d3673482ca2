use super::coordination::PairStats;
use super::feedback::{Finding, Note};
use crate::validator::FrameDrop;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum FeedbackKind {
    Good,
    Improvement,
    Warning,
}

impl FeedbackKind {
    pub fn icon(self) -> &'static str {
        match self {
            Self::Good => "✅",
            Self::Improvement => "⚡",
            Self::Warning => "⚠️",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackItem {
    #[serde(rename = "type")]
    pub kind: FeedbackKind,
    pub text: String,
    pub icon: String,
}

impl FeedbackItem {
    pub fn new(kind: FeedbackKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
            icon: kind.icon().to_string(),
        }
    }
}

/// The engine's answer for one sequence. Serializes to the boundary payload as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreReport {
    pub overall: u8,
    pub accuracy: u8,
    pub coordination: u8,
    pub stability: u8,
    pub feedback: Vec<FeedbackItem>,
    pub suggestions: Vec<String>,
}

impl ScoreReport {
    pub fn feedback_of(&self, kind: FeedbackKind) -> impl Iterator<Item = &FeedbackItem> {
        self.feedback.iter().filter(move |f| f.kind == kind)
    }
}

/// Unrounded sub-scores.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct SubScores {
    pub accuracy: f32,
    pub coordination: f32,
    pub stability: f32,
    pub overall: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameTrace {
    pub index: usize,
    pub frame_score: f32,
    pub accuracy: Option<f32>,
    pub residual: Option<f32>,
    pub unreliable_keypoints: usize,
}

/// Report plus everything needed to explain it.
#[derive(Debug, Clone)]
pub struct AnalysisDetails {
    pub report: ScoreReport,
    pub raw: SubScores,
    pub total: usize,
    pub usable: usize,
    pub dropped: usize,
    pub drops: Vec<FrameDrop>,
    pub frames: Vec<FrameTrace>,
    pub pairs: Vec<PairStats>,
    pub notes: Vec<Note>,
    pub findings: Vec<Finding>,
}

impl AnalysisDetails {
    pub fn dropped_ratio(&self) -> f32 {
        if self.total == 0 {
            0.0
        } else {
            self.dropped as f32 / self.total as f32
        }
    }
}
