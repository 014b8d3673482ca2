use clap::{CommandFactory, FromArgMatches, Parser, Subcommand};
use poseforge::config::{Config, MovementProfile};
use std::path::PathBuf;
use std::process;
use tracing::{error, info, Level};

mod cmd;
mod reports;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// JSON config file; flags typed on the command line still win
    #[arg(global = true, long = "config")]
    config_file: Option<PathBuf>,

    /// JSON movement profile with the joint-angle reference ranges
    #[arg(global = true, long)]
    profile: Option<PathBuf>,

    #[arg(global = true, long, default_value_t = false)]
    debug: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    Analyze(cmd::analyze::AnalyzeArgs),
    Validate(cmd::validate::ValidateArgs),
}

fn main() {
    // 1. Parse raw matches (to distinguish user input from defaults)
    let matches = Cli::command().get_matches();
    let cli = Cli::from_arg_matches(&matches).unwrap_or_else(|e| e.exit());

    tracing_subscriber::fmt()
        .with_max_level(if cli.debug { Level::DEBUG } else { Level::INFO })
        .with_writer(std::io::stderr)
        .init();

    // 2. Config flags live inside the subcommand's matches, not the root
    let (cli_config, sub_matches) = match &cli.command {
        Commands::Analyze(args) => (&args.config, matches.subcommand_matches("analyze")),
        Commands::Validate(args) => (&args.config, matches.subcommand_matches("validate")),
    };

    // 3. Resolve config: file as the base, explicit flags on top
    let mut config = match &cli.config_file {
        Some(path) => {
            info!("⚖️  Loading config from: {}", path.display());
            let mut file_config = Config::load_from_file(path).unwrap_or_else(|e| {
                error!("❌ {}", e);
                process::exit(2);
            });
            if let Some(sub) = sub_matches {
                file_config.merge_from_cli(cli_config, sub);
            }
            file_config
        }
        None => cli_config.clone(),
    };

    if let Some(path) = &cli.profile {
        info!("📐 Loading movement profile from: {}", path.display());
        config.profile = MovementProfile::load_from_file(path).unwrap_or_else(|e| {
            error!("❌ {}", e);
            process::exit(2);
        });
    }

    let code = match &cli.command {
        Commands::Analyze(args) => cmd::analyze::run(args, config),
        Commands::Validate(args) => cmd::validate::run(args, &config),
    };
    process::exit(code);
}
