//! Deterministic feedback rule table and the fixed text catalogs.

use super::types::{FeedbackItem, FeedbackKind};
use crate::config::FeedbackRules;
use serde::Serialize;
use strum_macros::{Display, EnumIter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, Serialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Dimension {
    Accuracy,
    Coordination,
    Stability,
}

/// Data-quality conditions reported independently of the numeric scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, Serialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Note {
    CaptureQuality,
    NoJointAngles,
    ShortSequence,
    NoSymmetricPairs,
    NoTorsoTrack,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, Serialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Suggestion {
    AccuracyRefine,
    AccuracyRebuild,
    CoordinationRefine,
    CoordinationRebuild,
    StabilityRefine,
    StabilityRebuild,
    CaptureSetup,
    FullBodyInFrame,
    RecordLonger,
    KeepRoutine,
}

impl Suggestion {
    pub fn text(self) -> &'static str {
        match self {
            Self::AccuracyRefine => {
                "Slow the movement down and check that each joint reaches its target position."
            }
            Self::AccuracyRebuild => {
                "Practise in front of a mirror at reduced speed to rebuild the correct form."
            }
            Self::CoordinationRefine => {
                "Focus on moving both sides of the body with the same rhythm."
            }
            Self::CoordinationRebuild => {
                "Drill each side on its own, then combine both sides again at a slower tempo."
            }
            Self::StabilityRefine => "Brace your core to keep the body steady and avoid swaying.",
            Self::StabilityRebuild => {
                "Widen your stance and shorten the range of motion until you can hold steady."
            }
            Self::CaptureSetup => {
                "Improve the lighting and keep your whole body inside the camera frame."
            }
            Self::FullBodyInFrame => "Make sure your arms and legs stay visible to the camera.",
            Self::RecordLonger => "Record a longer sequence covering several full repetitions.",
            Self::KeepRoutine => {
                "Keep a steady rhythm, breathe with the movement and warm up before each session."
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum Finding {
    Score {
        dimension: Dimension,
        kind: FeedbackKind,
    },
    Note {
        note: Note,
    },
}

impl Finding {
    pub fn kind(self) -> FeedbackKind {
        match self {
            Self::Score { kind, .. } => kind,
            Self::Note { .. } => FeedbackKind::Warning,
        }
    }

    pub fn text(self) -> &'static str {
        use Dimension::*;
        use FeedbackKind::*;
        match self {
            Self::Score { dimension, kind } => match (dimension, kind) {
                (Accuracy, Good) => "Excellent accuracy: joint angles stayed within the target range.",
                (Accuracy, Improvement) => {
                    "Accuracy can improve: some joint angles drift outside the target range."
                }
                (Accuracy, Warning) => {
                    "Low accuracy: joint angles are frequently outside the target range."
                }
                (Coordination, Good) => "Great coordination: left and right sides moved in sync.",
                (Coordination, Improvement) => {
                    "Coordination can improve: the two sides are slightly out of sync."
                }
                (Coordination, Warning) => {
                    "Poor coordination: the two sides move out of sync or with uneven range."
                }
                (Stability, Good) => "Solid stability: your torso stayed steady throughout.",
                (Stability, Improvement) => {
                    "Stability can improve: some unintended sway was detected."
                }
                (Stability, Warning) => {
                    "Low stability: significant body sway or shaking was detected."
                }
            },
            Self::Note { note } => match note {
                Note::CaptureQuality => {
                    "Capture quality: many frames had low detection confidence, results may be less reliable."
                }
                Note::NoJointAngles => {
                    "Limb keypoints were not tracked reliably, accuracy uses a neutral baseline."
                }
                Note::ShortSequence => {
                    "The recording is too short to judge coordination, a neutral baseline was used."
                }
                Note::NoSymmetricPairs => {
                    "Left and right limbs were not tracked together, coordination uses a neutral baseline."
                }
                Note::NoTorsoTrack => {
                    "Torso keypoints were not tracked reliably, stability uses a neutral baseline."
                }
            },
        }
    }

    pub fn suggestion(self) -> Option<Suggestion> {
        use Dimension::*;
        use FeedbackKind::*;
        match self {
            Self::Score { dimension, kind } => match (dimension, kind) {
                (_, Good) => None,
                (Accuracy, Improvement) => Some(Suggestion::AccuracyRefine),
                (Accuracy, Warning) => Some(Suggestion::AccuracyRebuild),
                (Coordination, Improvement) => Some(Suggestion::CoordinationRefine),
                (Coordination, Warning) => Some(Suggestion::CoordinationRebuild),
                (Stability, Improvement) => Some(Suggestion::StabilityRefine),
                (Stability, Warning) => Some(Suggestion::StabilityRebuild),
            },
            Self::Note { note } => Some(match note {
                Note::CaptureQuality => Suggestion::CaptureSetup,
                Note::NoJointAngles | Note::NoSymmetricPairs | Note::NoTorsoTrack => {
                    Suggestion::FullBodyInFrame
                }
                Note::ShortSequence => Suggestion::RecordLonger,
            }),
        }
    }

    pub fn to_item(self) -> FeedbackItem {
        FeedbackItem::new(self.kind(), self.text())
    }
}

pub fn classify(score: u8, rules: &FeedbackRules) -> FeedbackKind {
    let s = score as f32;
    if s >= rules.good_threshold {
        FeedbackKind::Good
    } else if s >= rules.warning_threshold {
        FeedbackKind::Improvement
    } else {
        FeedbackKind::Warning
    }
}

/// Runs the rule table in its fixed order: the three dimensions, capture quality,
/// then the metric fallback notes.
pub fn evaluate(
    scores: &[(Dimension, u8)],
    dropped_ratio: f32,
    fallback_notes: &[Note],
    rules: &FeedbackRules,
) -> Vec<Finding> {
    let mut findings: Vec<Finding> = scores
        .iter()
        .map(|&(dimension, score)| Finding::Score {
            dimension,
            kind: classify(score, rules),
        })
        .collect();

    if dropped_ratio > rules.dropped_ratio_threshold {
        findings.push(Finding::Note {
            note: Note::CaptureQuality,
        });
    }

    findings.extend(fallback_notes.iter().map(|&note| Finding::Note { note }));
    findings
}

/// One catalog entry per triggered finding, first-triggered order, no repeats, capped.
pub fn suggestions_for(findings: &[Finding], max: usize) -> Vec<Suggestion> {
    let mut out: Vec<Suggestion> = Vec::new();
    for s in findings.iter().filter_map(|f| f.suggestion()) {
        if !out.contains(&s) {
            out.push(s);
        }
    }
    if out.is_empty() {
        out.push(Suggestion::KeepRoutine);
    }
    out.truncate(max);
    out
}
