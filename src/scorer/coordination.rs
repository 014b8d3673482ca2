use super::signal::{lagged_pairs, mean, pearson, std_dev};
use crate::config::ScoringWeights;
use crate::skeleton::Limb;
use crate::validator::CleanFrame;
use serde::Serialize;

/// Below this spread (degrees) a trajectory is treated as held still; timing is not measurable.
const FLAT_TRAJECTORY_DEG: f32 = 1.0;
const MIN_OVERLAP: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PairStats {
    pub limb: Limb,
    pub samples: usize,
    /// Frames by which the right side trails the left (negative: leads).
    pub lag: i32,
    pub correlation: Option<f32>,
    pub mean_diff_deg: f32,
    pub score: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CoordinationResult {
    pub score: f32,
    pub pairs: Vec<PairStats>,
    /// True when the sequence or every pair was too short to measure.
    pub fallback: bool,
}

/// Left/right synchrony across the symmetric joint pairs.
pub fn score_coordination(frames: &[CleanFrame], weights: &ScoringWeights) -> CoordinationResult {
    let min_frames = weights.min_frames_for_coordination;
    let neutral = CoordinationResult {
        score: weights.neutral_score,
        pairs: Vec::new(),
        fallback: true,
    };

    if frames.len() < min_frames {
        return neutral;
    }

    let pairs: Vec<PairStats> = Limb::all()
        .into_iter()
        .filter_map(|limb| pair_stats(frames, limb, weights))
        .collect();

    if pairs.is_empty() {
        return neutral;
    }

    let score = mean(&pairs.iter().map(|p| p.score).collect::<Vec<_>>());
    CoordinationResult {
        score: score.clamp(0.0, 100.0),
        pairs,
        fallback: false,
    }
}

/// Per-side angle series indexed by raw frame position; `None` where the angle is unavailable.
fn aligned_series(frames: &[CleanFrame], limb: Limb) -> (Vec<Option<f32>>, Vec<Option<f32>>) {
    let (left_joint, right_joint) = limb.sides();
    let (Some(first), Some(last)) = (frames.first(), frames.last()) else {
        return (Vec::new(), Vec::new());
    };
    let span = last.index - first.index + 1;
    let mut left = vec![None; span];
    let mut right = vec![None; span];
    for f in frames {
        let t = f.index - first.index;
        left[t] = f.joint_angle(left_joint);
        right[t] = f.joint_angle(right_joint);
    }
    (left, right)
}

fn pair_stats(frames: &[CleanFrame], limb: Limb, weights: &ScoringWeights) -> Option<PairStats> {
    let (left, right) = aligned_series(frames, limb);
    let (l0, r0) = lagged_pairs(&left, &right, 0);

    if l0.len() < weights.min_frames_for_coordination {
        return None;
    }

    let (lag, correlation) = best_lag(&left, &right, weights.coordination_max_lag);
    let diffs: Vec<f32> = l0.iter().zip(&r0).map(|(l, r)| (l - r).abs()).collect();
    let mean_diff_deg = mean(&diffs);

    let score = 100.0
        - lag.unsigned_abs() as f32 * weights.coordination_lag_penalty
        - mean_diff_deg * weights.coordination_amplitude_penalty;

    Some(PairStats {
        limb,
        samples: l0.len(),
        lag,
        correlation,
        mean_diff_deg,
        score: score.clamp(0.0, 100.0),
    })
}

/// Lag in frames maximizing the normalized cross-correlation of `right` against `left`.
///
/// Both series are indexed by frame; gaps are skipped rather than closed up. Lags are
/// tried in order of increasing magnitude so ties resolve to the smaller offset.
/// The search radius is capped at a quarter of the series.
pub fn best_lag(left: &[Option<f32>], right: &[Option<f32>], max_lag: usize) -> (i32, Option<f32>) {
    let present = |xs: &[Option<f32>]| xs.iter().flatten().copied().collect::<Vec<f32>>();
    if std_dev(&present(left)) < FLAT_TRAJECTORY_DEG
        || std_dev(&present(right)) < FLAT_TRAJECTORY_DEG
    {
        return (0, None);
    }

    let n = left.len().min(right.len());
    let radius = max_lag.min(n / 4) as i32;

    let mut lags: Vec<i32> = (-radius..=radius).collect();
    lags.sort_by_key(|l| l.abs());

    let mut best: Option<(i32, f32)> = None;
    for lag in lags {
        let (a, b) = lagged_pairs(left, right, lag);
        if a.len() < MIN_OVERLAP {
            continue;
        }
        let Some(r) = pearson(&a, &b) else {
            continue;
        };
        match best {
            Some((_, best_r)) if r <= best_r + 1e-6 => {}
            _ => best = Some((lag, r)),
        }
    }

    match best {
        Some((lag, r)) => (lag, Some(r)),
        None => (0, None),
    }
}
