use crate::config::Config;
use crate::error::PfResult;
use crate::phrasing::Phraser;
use crate::pose::{PoseFrame, PoseSequence};
use crate::scorer::{AnalysisDetails, ScoreReport, Scorer};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Request payload as posted by the capture client: `{ "poses": [...], "timestamp": ... }`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub poses: Vec<PoseFrame>,
    #[serde(default)]
    pub timestamp: i64,
}

impl AnalysisRequest {
    pub fn from_json(json: &str) -> PfResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> PfResult<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }
}

impl From<AnalysisRequest> for PoseSequence {
    fn from(req: AnalysisRequest) -> Self {
        PoseSequence::new(req.poses, req.timestamp)
    }
}

/// Service: score one sequence with the catalog suggestions.
pub fn analyze(sequence: &PoseSequence, config: &Config) -> PfResult<ScoreReport> {
    Scorer::new(config.clone())?.analyze(sequence)
}

/// Service: score one sequence, rewording suggestions through `phraser`.
pub fn analyze_with_phraser(
    sequence: &PoseSequence,
    config: &Config,
    phraser: &dyn Phraser,
) -> PfResult<ScoreReport> {
    Scorer::new(config.clone())?.analyze_with(sequence, phraser)
}

/// Service: full diagnostic breakdown for one sequence.
pub fn analyze_detailed(sequence: &PoseSequence, config: &Config) -> PfResult<AnalysisDetails> {
    Scorer::new(config.clone())?.analyze_detailed(sequence)
}

/// Service: score independent sequences in parallel.
///
/// The outer error is a configuration failure; each sequence then succeeds or fails on its own.
pub fn analyze_batch(
    sequences: &[PoseSequence],
    config: &Config,
) -> PfResult<Vec<PfResult<ScoreReport>>> {
    let scorer = Scorer::new(config.clone())?;
    Ok(sequences.par_iter().map(|s| scorer.analyze(s)).collect())
}
