use crate::config::{MovementProfile, ScoringWeights};
use crate::validator::CleanFrame;

#[derive(Debug, Clone, PartialEq)]
pub struct AccuracyResult {
    pub score: f32,
    /// Per-frame accuracy, aligned with the input frames. `None` when no joint term was available.
    pub per_frame: Vec<Option<f32>>,
    /// True when no frame produced a single joint term.
    pub fallback: bool,
}

/// Weighted joint-angle conformance for one frame.
pub fn frame_accuracy(frame: &CleanFrame, profile: &MovementProfile, penalty_per_deg: f32) -> Option<f32> {
    let mut weighted = 0.0;
    let mut total_weight = 0.0;

    for range in &profile.angles {
        if range.weight <= 0.0 {
            continue;
        }
        // Unreliable or missing keypoints remove the term, not the frame.
        let Some(angle) = frame.joint_angle(range.joint) else {
            continue;
        };
        let term = (100.0 - range.deviation(angle) * penalty_per_deg).clamp(0.0, 100.0);
        weighted += term * range.weight;
        total_weight += range.weight;
    }

    (total_weight > 0.0).then(|| weighted / total_weight)
}

/// Confidence-weighted mean of per-frame accuracy.
pub fn score_accuracy(
    frames: &[CleanFrame],
    profile: &MovementProfile,
    weights: &ScoringWeights,
) -> AccuracyResult {
    let per_frame: Vec<Option<f32>> = frames
        .iter()
        .map(|f| frame_accuracy(f, profile, weights.accuracy_penalty_per_degree))
        .collect();

    let mut sum = 0.0;
    let mut conf_sum = 0.0;
    let mut plain_sum = 0.0;
    let mut count = 0usize;

    for (frame, acc) in frames.iter().zip(&per_frame) {
        if let Some(a) = acc {
            sum += a * frame.score;
            conf_sum += frame.score;
            plain_sum += a;
            count += 1;
        }
    }

    if count == 0 {
        return AccuracyResult {
            score: weights.neutral_score,
            per_frame,
            fallback: true,
        };
    }

    // All-zero confidences only happen with min_frame_confidence = 0.
    let score = if conf_sum > 0.0 {
        sum / conf_sum
    } else {
        plain_sum / count as f32
    };

    AccuracyResult {
        score: score.clamp(0.0, 100.0),
        per_frame,
        fallback: false,
    }
}
