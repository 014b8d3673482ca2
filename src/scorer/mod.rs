pub mod accuracy;
pub mod coordination;
pub mod feedback;
pub mod signal;
pub mod stability;
pub mod types;

use self::feedback::{Dimension, Finding, Note};
pub use self::types::{AnalysisDetails, FeedbackItem, FeedbackKind, FrameTrace, ScoreReport, SubScores};
use crate::config::Config;
use crate::error::PfResult;
use crate::phrasing::{self, CatalogPhraser, Phraser};
use crate::pose::PoseSequence;
use crate::validator;
use tracing::info;

/// Scores complete pose sequences against one fixed configuration.
///
/// Immutable after construction, so one instance can serve many threads.
#[derive(Debug, Clone)]
pub struct Scorer {
    pub config: Config,
}

impl Scorer {
    pub fn new(config: Config) -> PfResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn analyze(&self, sequence: &PoseSequence) -> PfResult<ScoreReport> {
        self.analyze_with(sequence, &CatalogPhraser)
    }

    pub fn analyze_with(
        &self,
        sequence: &PoseSequence,
        phraser: &dyn Phraser,
    ) -> PfResult<ScoreReport> {
        Ok(self.analyze_detailed_with(sequence, phraser)?.report)
    }

    pub fn analyze_detailed(&self, sequence: &PoseSequence) -> PfResult<AnalysisDetails> {
        self.analyze_detailed_with(sequence, &CatalogPhraser)
    }

    pub fn analyze_detailed_with(
        &self,
        sequence: &PoseSequence,
        phraser: &dyn Phraser,
    ) -> PfResult<AnalysisDetails> {
        let cfg = &self.config;
        let validated = validator::validate(&sequence.frames, &cfg.validation)?;
        let frames = &validated.frames;

        // Stability is the only metric that can refuse the sequence; check it first.
        let stability = stability::score_stability(frames, &cfg.weights)?;
        let accuracy = accuracy::score_accuracy(frames, &cfg.profile, &cfg.weights);
        let coordination = coordination::score_coordination(frames, &cfg.weights);

        let (wa, wc, ws) = cfg.weights.overall_weights();
        let overall = wa * accuracy.score + wc * coordination.score + ws * stability.score;
        let raw = SubScores {
            accuracy: accuracy.score,
            coordination: coordination.score,
            stability: stability.score,
            overall,
        };

        let mut fallback_notes = Vec::new();
        if accuracy.fallback {
            fallback_notes.push(Note::NoJointAngles);
        }
        if coordination.fallback {
            // Long enough but no pair had matching angles: a tracking problem, not length.
            fallback_notes.push(if frames.len() < cfg.weights.min_frames_for_coordination {
                Note::ShortSequence
            } else {
                Note::NoSymmetricPairs
            });
        }
        if stability.fallback {
            fallback_notes.push(Note::NoTorsoTrack);
        }

        let rounded = [
            (Dimension::Accuracy, to_score(raw.accuracy)),
            (Dimension::Coordination, to_score(raw.coordination)),
            (Dimension::Stability, to_score(raw.stability)),
        ];
        let findings = feedback::evaluate(
            &rounded,
            validated.dropped_ratio(),
            &fallback_notes,
            &cfg.feedback,
        );
        let catalog = feedback::suggestions_for(&findings, cfg.feedback.max_suggestions);

        // Numeric scoring is complete before any phrasing happens.
        let suggestions = phrasing::phrase_all(phraser, &catalog);

        let report = ScoreReport {
            overall: to_score(raw.overall),
            accuracy: rounded[0].1,
            coordination: rounded[1].1,
            stability: rounded[2].1,
            feedback: findings.iter().map(|f| f.to_item()).collect(),
            suggestions,
        };

        info!(
            "Scored {} usable frame(s): overall={} accuracy={} coordination={} stability={}",
            frames.len(),
            report.overall,
            report.accuracy,
            report.coordination,
            report.stability
        );

        let traces = frames
            .iter()
            .enumerate()
            .map(|(i, f)| FrameTrace {
                index: f.index,
                frame_score: f.score,
                accuracy: accuracy.per_frame[i],
                residual: stability.residuals[i],
                unreliable_keypoints: f.unreliable_count(),
            })
            .collect();

        let notes = findings
            .iter()
            .filter_map(|f| match f {
                Finding::Note { note } => Some(*note),
                Finding::Score { .. } => None,
            })
            .collect();

        Ok(AnalysisDetails {
            report,
            raw,
            total: validated.total,
            usable: validated.usable(),
            dropped: validated.dropped,
            drops: validated.drops,
            frames: traces,
            pairs: coordination.pairs,
            notes,
            findings,
        })
    }
}

/// Rounds to the nearest integer score, clamped to [0, 100].
#[inline(always)]
pub fn to_score(value: f32) -> u8 {
    if !value.is_finite() {
        return 0;
    }
    value.round().clamp(0.0, 100.0) as u8
}
