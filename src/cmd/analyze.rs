use crate::reports;
use clap::Args;
use poseforge::api::AnalysisRequest;
use poseforge::config::Config;
use poseforge::error::PfResult;
use poseforge::phrasing::{CatalogPhraser, Phraser};
use poseforge::pose::PoseSequence;
use poseforge::scorer::{AnalysisDetails, Scorer};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{error, info};

#[derive(Args, Debug, Clone)]
pub struct AnalyzeArgs {
    #[command(flatten)]
    pub config: Config,

    /// Pose sequence files (`{"poses": [...], "timestamp": ...}`)
    #[arg(short, long, required = true, num_args = 1..)]
    pub input: Vec<PathBuf>,

    /// Print the score payload as JSON instead of tables
    #[arg(long, default_value_t = false)]
    pub json: bool,

    /// Write a per-frame trace to this CSV file
    #[arg(long)]
    pub frames_csv: Option<PathBuf>,

    /// Reword suggestions through the chat endpoint configured in OPENAI_* variables
    #[cfg(feature = "llm")]
    #[arg(long, default_value_t = false)]
    pub phrase: bool,
}

fn select_phraser(_args: &AnalyzeArgs) -> Box<dyn Phraser> {
    #[cfg(feature = "llm")]
    {
        use poseforge::phrasing::chat::ChatPhraser;
        if _args.phrase {
            match ChatPhraser::from_env(std::time::Duration::from_secs(10)) {
                Some(p) => {
                    info!("💬 Phrasing suggestions through the chat endpoint");
                    return Box::new(p);
                }
                None => tracing::warn!("⚠️  OPENAI_API_KEY not set. Using catalog suggestions."),
            }
        }
    }
    Box::new(CatalogPhraser)
}

fn score_file(path: &Path, scorer: &Scorer, phraser: &dyn Phraser) -> PfResult<AnalysisDetails> {
    let sequence: PoseSequence = AnalysisRequest::load_from_file(path)?.into();
    scorer.analyze_detailed_with(&sequence, phraser)
}

/// Returns the process exit code.
pub fn run(args: &AnalyzeArgs, config: Config) -> i32 {
    let scorer = match Scorer::new(config) {
        Ok(s) => s,
        Err(e) => {
            error!("❌ {}", e);
            return 2;
        }
    };
    let phraser = select_phraser(args);

    info!("📂 Analyzing {} file(s)", args.input.len());

    let results: Vec<(String, PfResult<AnalysisDetails>)> = args
        .input
        .par_iter()
        .map(|p| (p.display().to_string(), score_file(p, &scorer, phraser.as_ref())))
        .collect();

    let mut failures = 0;
    let mut traced = Vec::new();

    for (name, result) in &results {
        match result {
            Ok(details) => {
                if args.json {
                    match serde_json::to_string_pretty(&details.report) {
                        Ok(s) => println!("{}", s),
                        Err(e) => {
                            error!("❌ {}: {}", name, e);
                            failures += 1;
                        }
                    }
                } else {
                    reports::print_score_report(name, details, &scorer.config.feedback);
                }
                traced.push((name.clone(), details));
            }
            Err(e) => {
                error!("❌ {}: {}", name, e);
                failures += 1;
            }
        }
    }

    if let Some(path) = &args.frames_csv {
        match reports::write_frame_trace(path, &traced) {
            Ok(()) => info!("📝 Frame trace written to {}", path.display()),
            Err(e) => {
                error!("❌ Failed to write frame trace: {}", e);
                failures += 1;
            }
        }
    }

    if failures > 0 {
        1
    } else {
        0
    }
}
