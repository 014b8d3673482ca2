use super::signal::{linear_trend, mean};
use crate::config::ScoringWeights;
use crate::error::{PfResult, PoseForgeError};
use crate::skeleton::Landmark;
use crate::validator::CleanFrame;

#[derive(Debug, Clone, PartialEq)]
pub struct StabilityResult {
    pub score: f32,
    /// Detrended torso-anchor displacement per frame (RMS over anchors), in torso lengths.
    pub residuals: Vec<Option<f32>>,
    pub relative_variance: f32,
    /// True when no torso anchor was tracked reliably in two or more frames.
    pub fallback: bool,
}

/// Inverse of the torso jitter left after removing the local motion trend.
///
/// Each shoulder and hip is detrended as its own series over frame time, skipping the
/// frames where it is unreliable, and the residuals are pooled. A flickering anchor
/// therefore leaves gaps instead of shifting a shared centroid.
///
/// Needs at least two usable frames; a single sample has no variance.
pub fn score_stability(frames: &[CleanFrame], weights: &ScoringWeights) -> PfResult<StabilityResult> {
    if frames.len() < 2 {
        return Err(PoseForgeError::InsufficientData {
            usable: frames.len(),
            required: 2,
        });
    }

    let lengths: Vec<f32> = frames.iter().filter_map(|f| f.torso_length()).collect();
    let scale = if lengths.is_empty() { 1.0 } else { mean(&lengths) };

    // (sum of squared residuals, anchors contributing) per frame
    let mut per_frame = vec![(0.0f32, 0usize); frames.len()];
    let mut sq_sum = 0.0;
    let mut count = 0usize;

    for anchor in Landmark::REQUIRED {
        let track: Vec<(usize, f32, f32, f32)> = frames
            .iter()
            .enumerate()
            .filter_map(|(i, f)| f.reliable(anchor).map(|p| (i, f.index as f32, p.x, p.y)))
            .collect();
        if track.len() < 2 {
            continue;
        }

        let ts: Vec<f32> = track.iter().map(|t| t.1).collect();
        let xs: Vec<f32> = track.iter().map(|t| t.2).collect();
        let ys: Vec<f32> = track.iter().map(|t| t.3).collect();
        let trend_x = linear_trend(&ts, &xs, weights.stability_window);
        let trend_y = linear_trend(&ts, &ys, weights.stability_window);

        for (k, &(i, _, x, y)) in track.iter().enumerate() {
            let dx = (x - trend_x[k]) / scale;
            let dy = (y - trend_y[k]) / scale;
            let sq = dx * dx + dy * dy;
            sq_sum += sq;
            count += 1;
            per_frame[i].0 += sq;
            per_frame[i].1 += 1;
        }
    }

    if count == 0 {
        return Ok(StabilityResult {
            score: weights.neutral_score,
            residuals: vec![None; frames.len()],
            relative_variance: 0.0,
            fallback: true,
        });
    }

    let residuals = per_frame
        .iter()
        .map(|&(sq, n)| (n > 0).then(|| (sq / n as f32).sqrt()))
        .collect();

    let relative_variance = sq_sum / count as f32;
    let score = 100.0 / (1.0 + relative_variance / weights.stability_variance_scale);

    Ok(StabilityResult {
        score: score.clamp(0.0, 100.0),
        residuals,
        relative_variance,
        fallback: false,
    })
}
