use crate::reports;
use clap::Args;
use poseforge::api::AnalysisRequest;
use poseforge::config::Config;
use poseforge::validator;
use std::path::PathBuf;
use tracing::error;

#[derive(Args, Debug, Clone)]
pub struct ValidateArgs {
    #[command(flatten)]
    pub config: Config,

    #[arg(short, long)]
    pub input: PathBuf,
}

/// Returns the process exit code: 1 when the file is unreadable or nothing is usable.
pub fn run(args: &ValidateArgs, config: &Config) -> i32 {
    let request = match AnalysisRequest::load_from_file(&args.input) {
        Ok(r) => r,
        Err(e) => {
            error!("❌ {}: {}", args.input.display(), e);
            return 1;
        }
    };

    let audit = validator::inspect(&request.poses, &config.validation);
    reports::print_validation_report(&args.input.display().to_string(), &audit);

    if audit.usable() == 0 {
        error!("❌ No usable frames in {}", args.input.display());
        1
    } else {
        0
    }
}
