use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::time::Instant;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use home_rank::config::{self, Config};
use home_rank::scoring::{
    resolve_weights_for, validate_scoring, Criterion, PreferenceInput, ScoringEngine,
    ScoringSettings,
};
use home_rank::{dataset, output};

const EXIT_SUCCESS: i32 = 0;
const EXIT_CONFIG: i32 = 4;
const EXIT_DATA: i32 = 5;

#[derive(ValueEnum, Clone, Copy, Debug, Default)]
enum OutputFormat {
    /// Aligned table for the terminal
    #[default]
    Table,
    /// Tab-separated values for scripting
    Tsv,
    /// Pretty JSON including excluded rows
    Json,
}

/// Per-criterion preference overrides: a slider value 0-5 or an importance label
#[derive(Args, Debug, Default)]
struct PreferenceArgs {
    #[arg(long, value_name = "PREF")]
    housing: Option<String>,
    #[arg(long, value_name = "PREF")]
    climate: Option<String>,
    #[arg(long, value_name = "PREF")]
    tourism: Option<String>,
    #[arg(long, value_name = "PREF")]
    development: Option<String>,
}

impl PreferenceArgs {
    fn overrides(&self) -> Vec<(Criterion, &str)> {
        [
            (Criterion::Housing, &self.housing),
            (Criterion::Climate, &self.climate),
            (Criterion::Tourism, &self.tourism),
            (Criterion::Development, &self.development),
        ]
        .into_iter()
        .filter_map(|(c, v)| v.as_deref().map(|v| (c, v)))
        .collect()
    }
}

#[derive(Args, Debug, Default)]
struct RankArgs {
    /// JSON scores table (defaults to `data` from the config file)
    #[arg(short, long)]
    data: Option<PathBuf>,

    /// Number of departments to show
    #[arg(short = 'n', long)]
    top: Option<usize>,

    /// Add a 0-1 rescaled score computed over every scored department
    #[arg(long)]
    normalize: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,

    #[command(flatten)]
    preferences: PreferenceArgs,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Rank departments by weighted score (default if no subcommand)
    Rank(RankArgs),
    /// Show the weights resolved from the current preferences
    Weights {
        #[command(flatten)]
        preferences: PreferenceArgs,
    },
    /// Write a default config file
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Parser, Debug)]
#[command(name = "home-rank")]
#[command(about = "Where should I buy my secondary home? Ranks French departments by weighted score", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging and per-department score breakdowns
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/home-rank/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

fn init_logging(verbose: bool) {
    let log_level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| log_level.to_string()),
        ))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}

/// Merge command-line preference overrides into the config and validate it.
/// Exits with EXIT_CONFIG on any problem, listing every error.
fn settings_or_exit(config: &Config, preferences: &PreferenceArgs) -> ScoringSettings {
    let mut scoring = config.scoring.clone().unwrap_or_default();
    for (criterion, value) in preferences.overrides() {
        // Drop any spelling of the same criterion from the file before overriding
        scoring
            .preferences
            .retain(|key, _| key.parse::<Criterion>().ok() != Some(criterion));
        scoring
            .preferences
            .insert(criterion.name().to_string(), PreferenceInput::from_arg(value));
    }

    let mut errors = Vec::new();
    if let Err(column_errors) = config::validate_columns(&config.columns) {
        errors.extend(column_errors);
    }
    let settings = match validate_scoring(&scoring) {
        Ok(settings) => Some(settings),
        Err(scoring_errors) => {
            errors.extend(scoring_errors);
            None
        }
    };

    match settings {
        Some(settings) if errors.is_empty() => settings,
        _ => {
            eprintln!("Config errors:");
            for error in errors {
                eprintln!("  - {}", error);
            }
            std::process::exit(EXIT_CONFIG);
        }
    }
}

fn config_or_exit(path: Option<PathBuf>) -> Config {
    match config::load_config(path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let command = cli
        .command
        .unwrap_or_else(|| Commands::Rank(RankArgs::default()));
    let start_time = Instant::now();
    let config_path = cli.config.map(PathBuf::from);

    let use_colors = output::should_use_colors();

    match command {
        Commands::Init { force } => match config::write_default_config(config_path, force) {
            Ok(path) => println!("Wrote default config to {}", path.display()),
            Err(e) => {
                eprintln!("Config error: {:#}", e);
                std::process::exit(EXIT_CONFIG);
            }
        },
        Commands::Weights { preferences } => {
            let config = config_or_exit(config_path);
            let settings = settings_or_exit(&config, &preferences);
            match resolve_weights_for(&settings.criteria, &settings.preferences) {
                Ok(weights) => println!("{}", output::format_weights(&weights, use_colors)),
                Err(e) => {
                    eprintln!("Preference error: {}", e);
                    std::process::exit(EXIT_CONFIG);
                }
            }
        }
        Commands::Rank(args) => {
            let config = config_or_exit(config_path);
            let mut settings = settings_or_exit(&config, &args.preferences);
            if let Some(top) = args.top {
                settings.options.top_n = top;
            }
            if args.normalize {
                settings.options.normalize = true;
            }

            let weights = match resolve_weights_for(&settings.criteria, &settings.preferences) {
                Ok(w) => w,
                Err(e) => {
                    eprintln!("Preference error: {}", e);
                    std::process::exit(EXIT_CONFIG);
                }
            };

            let Some(data_path) = args.data.or_else(|| config.data.clone()) else {
                eprintln!("No dataset given. Pass --data <FILE> or set `data:` in the config file.");
                std::process::exit(EXIT_CONFIG);
            };

            let records = match dataset::load_dataset(&data_path, &config.columns, &settings.criteria) {
                Ok(r) => r,
                Err(e) => {
                    eprintln!("Data error: {:#}", e);
                    std::process::exit(EXIT_DATA);
                }
            };

            let engine = match ScoringEngine::new(&settings.criteria) {
                Ok(engine) => engine,
                Err(e) => {
                    eprintln!("Config error: {}", e);
                    std::process::exit(EXIT_CONFIG);
                }
            };

            let ranked = match engine.score_and_rank(&records, &weights, &settings.options) {
                Ok(ranked) => ranked,
                Err(e) => {
                    eprintln!("Scoring error: {}", e);
                    std::process::exit(EXIT_CONFIG);
                }
            };

            match args.format {
                OutputFormat::Table => {
                    if cli.verbose && !ranked.is_empty() {
                        for (idx, region) in ranked.regions.iter().enumerate() {
                            let detail = output::format_region_detail(idx + 1, region, use_colors);
                            println!("{}", detail);
                            println!();
                        }
                    } else {
                        println!("{}", output::format_ranked_table(&ranked, use_colors));
                    }
                }
                OutputFormat::Tsv => {
                    let tsv = output::format_tsv(&ranked);
                    if !tsv.is_empty() {
                        println!("{}", tsv);
                    }
                }
                OutputFormat::Json => match output::format_json(&ranked) {
                    Ok(json) => println!("{}", json),
                    Err(e) => {
                        eprintln!("Failed to serialize results: {}", e);
                        std::process::exit(EXIT_DATA);
                    }
                },
            }

            if !ranked.exclusions.is_empty() {
                eprintln!("{}", output::format_exclusions(&ranked.exclusions));
            }

            if cli.verbose {
                eprintln!();
                eprintln!(
                    "Scored {} of {} departments in {:?}",
                    ranked.scored_count,
                    records.len(),
                    start_time.elapsed()
                );
            }
        }
    }

    std::process::exit(EXIT_SUCCESS);
}
