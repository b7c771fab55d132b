use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Instant;

use workout_gen::{
    validate, AppConfig, DiagnosticReport, ExerciseCatalogue, Generator, MetadataService,
    Questionnaire, RulesDocument, SystemClock,
};

/// Workout generation engine - deterministic training program generator.
#[derive(Parser)]
#[command(name = "workout-gen")]
#[command(author = "workout-gen contributors")]
#[command(version = "0.1.0")]
#[command(about = "Deterministic, seedable training program generator", long_about = None)]
struct Cli {
    /// Path to the application config file.
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a training program from a questionnaire file.
    Generate {
        /// Path to a JSON-encoded questionnaire.
        #[arg(short, long)]
        questionnaire: PathBuf,

        /// Where to write the generated program JSON.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Validate an already-generated program file.
    Validate {
        /// Path to a JSON-encoded program.
        #[arg(short, long)]
        program: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let app_config = match &cli.config {
        Some(path) => AppConfig::load_from_file(path).with_context(|| "failed to load config file")?,
        None => AppConfig::load_or_default(),
    };

    workout_gen::logging::init_logging(&app_config.log).with_context(|| "failed to initialize logging")?;

    match cli.command {
        Commands::Generate { questionnaire, output } => run_generate(&app_config, &questionnaire, output.as_deref()),
        Commands::Validate { program } => run_validate(&app_config, &program),
    }
}

fn run_generate(app_config: &AppConfig, questionnaire_path: &std::path::Path, output: Option<&std::path::Path>) -> Result<()> {
    let started = Instant::now();

    let rules = RulesDocument::load_from_file(&app_config.rules_path)
        .with_context(|| format!("failed to load rules document: {}", app_config.rules_path.display()))?;
    let catalogue = ExerciseCatalogue::load_from_file(&app_config.catalogue_path)
        .with_context(|| format!("failed to load exercise catalogue: {}", app_config.catalogue_path.display()))?;
    let metadata = MetadataService::new();
    metadata.warm(&catalogue);

    let raw = std::fs::read_to_string(questionnaire_path)
        .with_context(|| format!("failed to read questionnaire: {}", questionnaire_path.display()))?;
    let questionnaire: Questionnaire = serde_json::from_str(&raw).with_context(|| "failed to parse questionnaire JSON")?;

    let mut report = DiagnosticReport::new("generate", questionnaire.seed);

    let generator = Generator::new(&rules, &catalogue, &metadata);
    let clock = SystemClock;

    let result = generator.generate(&questionnaire, &clock);
    report.set_duration(started.elapsed());

    match result {
        Ok(program) => {
            report.set_success(true);
            let json = serde_json::to_string_pretty(&program)?;
            match output {
                Some(path) => std::fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))?,
                None => println!("{}", json),
            }
            Ok(())
        }
        Err(err) => {
            report.add_error(&err);
            if let Ok(path) = report.save_default() {
                eprintln!("{}", err.user_message());
                eprintln!("diagnostic report saved to {}", path.display());
            }
            Err(err.into())
        }
    }
}

fn run_validate(app_config: &AppConfig, program_path: &std::path::Path) -> Result<()> {
    let catalogue = ExerciseCatalogue::load_from_file(&app_config.catalogue_path)
        .with_context(|| format!("failed to load exercise catalogue: {}", app_config.catalogue_path.display()))?;

    let raw = std::fs::read_to_string(program_path)
        .with_context(|| format!("failed to read program: {}", program_path.display()))?;
    let program = serde_json::from_str(&raw).with_context(|| "failed to parse program JSON")?;

    let report = validate(&program, &catalogue);
    println!("{}", serde_json::to_string_pretty(&report)?);

    if !report.valid {
        std::process::exit(1);
    }
    Ok(())
}
