//! Resume scorer: deterministic resume vs job description match scoring

use clap::Parser;
use log::{error, info};
use resume_scorer::cli::{self, Cli, Commands, ConfigAction};
use resume_scorer::config::{Config, OutputFormat};
use resume_scorer::error::{Result, ResumeScorerError};
use resume_scorer::extraction::NullAiProvider;
use resume_scorer::input::ProfileBuilder;
use resume_scorer::output::ConsoleFormatter;
use resume_scorer::pipeline::ScoringPipeline;
use std::process;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = run_command(cli.command, config).await {
        error!("Command failed: {}", e);
        process::exit(1);
    }
}

async fn run_command(command: Commands, config: Config) -> Result<()> {
    match command {
        Commands::Score {
            resume,
            job,
            output,
            detailed,
            no_color,
        } => {
            cli::validate_file_extension(&resume, &["txt", "md"])
                .map_err(|e| ResumeScorerError::InvalidInput(format!("Resume file: {}", e)))?;
            cli::validate_file_extension(&job, &["txt", "md"])
                .map_err(|e| ResumeScorerError::InvalidInput(format!("Job description file: {}", e)))?;
            let output_format =
                cli::parse_output_format(&output).map_err(ResumeScorerError::InvalidInput)?;

            info!(
                "scoring {} against {}",
                resume.display(),
                job.display()
            );

            let resume_text = std::fs::read_to_string(&resume)?;
            let job_text = std::fs::read_to_string(&job)?;

            let profile = ProfileBuilder::new()?.build(&resume_text);

            // No AI backend ships with the CLI; the deterministic fallback
            // carries extraction. A real provider plugs in via AiProvider.
            let pipeline = ScoringPipeline::new(NullAiProvider, &config)?;
            let report = pipeline.score(&profile, &job_text).await?;

            match output_format {
                OutputFormat::Json => println!("{}", report.to_json()?),
                OutputFormat::Console => {
                    let use_colors = config.output.color_output && !no_color;
                    let formatter =
                        ConsoleFormatter::new(use_colors, detailed || config.output.detailed);
                    print!("{}", formatter.format_report(&report));
                }
            }
        }

        Commands::Config { action } => match action {
            Some(ConfigAction::Show) | None => {
                let content = toml::to_string_pretty(&config).map_err(|e| {
                    ResumeScorerError::Configuration(format!("Failed to render config: {}", e))
                })?;
                println!("{}", content);
            }
            Some(ConfigAction::Reset) => {
                Config::default().save()?;
                println!("Configuration reset to defaults.");
            }
        },
    }

    Ok(())
}
