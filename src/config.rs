use crate::error::{PfResult, PoseForgeError};
use crate::skeleton::JointAngle;
use clap::{parser::ValueSource, ArgMatches, Args};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

#[derive(Args, Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[command(flatten)]
    #[serde(default)]
    pub validation: ValidationParams,
    #[command(flatten)]
    #[serde(default)]
    pub weights: ScoringWeights,
    #[command(flatten)]
    #[serde(default)]
    pub feedback: FeedbackRules,
    #[arg(skip)]
    #[serde(default)]
    pub profile: MovementProfile,
}

#[derive(Args, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationParams {
    #[arg(long, default_value_t = 0.3)]
    pub min_frame_confidence: f32,
    #[arg(long, default_value_t = 0.2)]
    pub min_keypoint_confidence: f32,
}

impl Default for ValidationParams {
    fn default() -> Self {
        Self {
            min_frame_confidence: 0.3,
            min_keypoint_confidence: 0.2,
        }
    }
}

#[derive(Args, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringWeights {
    // === OVERALL BLEND ===
    #[arg(long, default_value_t = 0.5)]
    pub weight_accuracy: f32,
    #[arg(long, default_value_t = 0.25)]
    pub weight_coordination: f32,
    #[arg(long, default_value_t = 0.25)]
    pub weight_stability: f32,

    // === ACCURACY ===
    // Points lost per degree outside the reference range
    #[arg(long, default_value_t = 2.0)]
    pub accuracy_penalty_per_degree: f32,

    // === COORDINATION ===
    #[arg(long, default_value_t = 5)]
    pub min_frames_for_coordination: usize,
    #[arg(long, default_value_t = 5)]
    pub coordination_max_lag: usize,
    #[arg(long, default_value_t = 10.0)]
    pub coordination_lag_penalty: f32,
    #[arg(long, default_value_t = 1.0)]
    pub coordination_amplitude_penalty: f32,

    // === STABILITY ===
    // Frames per local trend fit
    #[arg(long, default_value_t = 5)]
    pub stability_window: usize,
    // Relative residual variance (torso lengths squared) that halves the score
    #[arg(long, default_value_t = 0.005)]
    pub stability_variance_scale: f32,

    // Used when a metric cannot be computed from the data
    #[arg(long, default_value_t = 70.0)]
    pub neutral_score: f32,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            weight_accuracy: 0.5,
            weight_coordination: 0.25,
            weight_stability: 0.25,
            accuracy_penalty_per_degree: 2.0,
            min_frames_for_coordination: 5,
            coordination_max_lag: 5,
            coordination_lag_penalty: 10.0,
            coordination_amplitude_penalty: 1.0,
            stability_window: 5,
            stability_variance_scale: 0.005,
            neutral_score: 70.0,
        }
    }
}

impl ScoringWeights {
    /// Overall blend weights normalized to sum to 1.
    pub fn overall_weights(&self) -> (f32, f32, f32) {
        let sum = self.weight_accuracy + self.weight_coordination + self.weight_stability;
        if sum <= 0.0 {
            return (1.0 / 3.0, 1.0 / 3.0, 1.0 / 3.0);
        }
        (
            self.weight_accuracy / sum,
            self.weight_coordination / sum,
            self.weight_stability / sum,
        )
    }
}

#[derive(Args, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedbackRules {
    #[arg(long, default_value_t = 85.0)]
    pub good_threshold: f32,
    #[arg(long, default_value_t = 60.0)]
    pub warning_threshold: f32,
    #[arg(long, default_value_t = 0.3)]
    pub dropped_ratio_threshold: f32,
    #[arg(long, default_value_t = 5)]
    pub max_suggestions: usize,
}

impl Default for FeedbackRules {
    fn default() -> Self {
        Self {
            good_threshold: 85.0,
            warning_threshold: 60.0,
            dropped_ratio_threshold: 0.3,
            max_suggestions: 5,
        }
    }
}

/// Acceptable range for one joint angle during the assessed movement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AngleRange {
    pub joint: JointAngle,
    pub min_deg: f32,
    pub max_deg: f32,
    #[serde(default = "default_angle_weight")]
    pub weight: f32,
}

fn default_angle_weight() -> f32 {
    1.0
}

impl AngleRange {
    pub fn new(joint: JointAngle, min_deg: f32, max_deg: f32, weight: f32) -> Self {
        Self {
            joint,
            min_deg,
            max_deg,
            weight,
        }
    }

    /// Degrees outside `[min_deg, max_deg]`, zero when inside.
    #[inline(always)]
    pub fn deviation(&self, angle_deg: f32) -> f32 {
        if angle_deg < self.min_deg {
            self.min_deg - angle_deg
        } else if angle_deg > self.max_deg {
            angle_deg - self.max_deg
        } else {
            0.0
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovementProfile {
    pub name: String,
    pub angles: Vec<AngleRange>,
}

impl Default for MovementProfile {
    fn default() -> Self {
        use JointAngle::*;
        Self {
            name: "general".to_string(),
            angles: vec![
                AngleRange::new(LeftElbow, 60.0, 180.0, 1.0),
                AngleRange::new(RightElbow, 60.0, 180.0, 1.0),
                AngleRange::new(LeftShoulder, 0.0, 170.0, 0.5),
                AngleRange::new(RightShoulder, 0.0, 170.0, 0.5),
                AngleRange::new(LeftHip, 90.0, 180.0, 1.0),
                AngleRange::new(RightHip, 90.0, 180.0, 1.0),
                AngleRange::new(LeftKnee, 90.0, 180.0, 1.0),
                AngleRange::new(RightKnee, 90.0, 180.0, 1.0),
            ],
        }
    }
}

impl MovementProfile {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> PfResult<Self> {
        let content = fs::read_to_string(path)?;
        let profile: MovementProfile = serde_json::from_str(&content)?;
        profile.validate()?;
        Ok(profile)
    }

    pub fn validate(&self) -> PfResult<()> {
        let mut seen = HashSet::new();
        for range in &self.angles {
            if !seen.insert(range.joint) {
                return Err(PoseForgeError::Config(format!(
                    "profile '{}' lists joint '{}' twice",
                    self.name, range.joint
                )));
            }
            if !(range.min_deg.is_finite() && range.max_deg.is_finite())
                || range.min_deg > range.max_deg
            {
                return Err(PoseForgeError::Config(format!(
                    "profile '{}': invalid range {}..{} for '{}'",
                    self.name, range.min_deg, range.max_deg, range.joint
                )));
            }
            if !(range.weight.is_finite() && range.weight >= 0.0) {
                return Err(PoseForgeError::Config(format!(
                    "profile '{}': negative weight for '{}'",
                    self.name, range.joint
                )));
            }
        }
        Ok(())
    }
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> PfResult<Self> {
        let content = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Rejects settings the engine cannot score with.
    pub fn validate(&self) -> PfResult<()> {
        fn unit(name: &str, v: f32) -> PfResult<()> {
            if (0.0..=1.0).contains(&v) {
                Ok(())
            } else {
                Err(PoseForgeError::Config(format!(
                    "{} must be within [0, 1], got {}",
                    name, v
                )))
            }
        }
        fn percent(name: &str, v: f32) -> PfResult<()> {
            if (0.0..=100.0).contains(&v) {
                Ok(())
            } else {
                Err(PoseForgeError::Config(format!(
                    "{} must be within [0, 100], got {}",
                    name, v
                )))
            }
        }

        unit(
            "min_frame_confidence",
            self.validation.min_frame_confidence,
        )?;
        unit(
            "min_keypoint_confidence",
            self.validation.min_keypoint_confidence,
        )?;
        unit(
            "dropped_ratio_threshold",
            self.feedback.dropped_ratio_threshold,
        )?;
        percent("good_threshold", self.feedback.good_threshold)?;
        percent("warning_threshold", self.feedback.warning_threshold)?;
        percent("neutral_score", self.weights.neutral_score)?;

        if self.feedback.warning_threshold > self.feedback.good_threshold {
            return Err(PoseForgeError::Config(format!(
                "warning_threshold ({}) exceeds good_threshold ({})",
                self.feedback.warning_threshold, self.feedback.good_threshold
            )));
        }

        let w = &self.weights;
        let blend = [w.weight_accuracy, w.weight_coordination, w.weight_stability];
        if blend.iter().any(|v| !v.is_finite() || *v < 0.0) || blend.iter().sum::<f32>() <= 0.0 {
            return Err(PoseForgeError::Config(
                "overall weights must be non-negative with a positive sum".to_string(),
            ));
        }
        if w.min_frames_for_coordination < 2 {
            return Err(PoseForgeError::Config(
                "min_frames_for_coordination must be at least 2".to_string(),
            ));
        }
        // A straight line through fewer than three samples fits them exactly.
        if w.stability_window < 3 {
            return Err(PoseForgeError::Config(
                "stability_window must be at least 3".to_string(),
            ));
        }
        if !(w.stability_variance_scale.is_finite() && w.stability_variance_scale > 0.0) {
            return Err(PoseForgeError::Config(
                "stability_variance_scale must be positive".to_string(),
            ));
        }
        if w.accuracy_penalty_per_degree < 0.0
            || w.coordination_lag_penalty < 0.0
            || w.coordination_amplitude_penalty < 0.0
        {
            return Err(PoseForgeError::Config(
                "penalties must be non-negative".to_string(),
            ));
        }

        self.profile.validate()
    }

    /// Copies onto `self` only the flags the user actually typed.
    pub fn merge_from_cli(&mut self, cli: &Config, matches: &ArgMatches) {
        macro_rules! update_if_present {
            ($section:ident, $field:ident) => {
                if matches.value_source(stringify!($field)) == Some(ValueSource::CommandLine) {
                    self.$section.$field = cli.$section.$field.clone();
                }
            };
        }

        update_if_present!(validation, min_frame_confidence);
        update_if_present!(validation, min_keypoint_confidence);

        update_if_present!(weights, weight_accuracy);
        update_if_present!(weights, weight_coordination);
        update_if_present!(weights, weight_stability);
        update_if_present!(weights, accuracy_penalty_per_degree);
        update_if_present!(weights, min_frames_for_coordination);
        update_if_present!(weights, coordination_max_lag);
        update_if_present!(weights, coordination_lag_penalty);
        update_if_present!(weights, coordination_amplitude_penalty);
        update_if_present!(weights, stability_window);
        update_if_present!(weights, stability_variance_scale);
        update_if_present!(weights, neutral_score);

        update_if_present!(feedback, good_threshold);
        update_if_present!(feedback, warning_threshold);
        update_if_present!(feedback, dropped_ratio_threshold);
        update_if_present!(feedback, max_suggestions);
    }
}
