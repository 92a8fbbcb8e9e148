//! `derma`: classify a skin image and print JSON results.
//!
//! Logs go to stderr; stdout carries only the JSON output.

use clap::Parser;
use derma_analysis::AnalysisGenerator;
use derma_cli::{
    check_extension, AppConfig, CliArgs, CliError, CliResult, Command, DermaService,
    SAMPLE_ADVICE, SAMPLE_CONDITION, SAMPLE_CONFIDENCE,
};
use serde::Serialize;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() -> ExitCode {
    let args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_new(&args.log_filter)
                .unwrap_or_else(|_| EnvFilter::new(derma_cli::config::DEFAULT_LOG_FILTER)),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match run(&args) {
        Ok(code) => code,
        Err(e) => {
            error!("{}", e);
            ExitCode::from(e.exit_code())
        }
    }
}

fn run(args: &CliArgs) -> CliResult<ExitCode> {
    let config = AppConfig::load(args)?;

    match &args.command {
        Command::Analyze {
            image,
            no_analysis,
            pretty,
        } => {
            check_extension(image)?;
            let bytes = std::fs::read(image).map_err(|source| CliError::Io {
                path: image.clone(),
                source,
            })?;
            info!(file = ?image, size = bytes.len(), "Received image");

            let service = DermaService::from_config(&config)?;
            let output = service.analyze(&bytes, !no_analysis)?;
            print_json(&output, *pretty)?;
        }
        Command::Diseases => {
            let service = DermaService::from_config(&config)?;
            let diseases = service.supported_diseases();
            print_json(
                &serde_json::json!({ "diseases": diseases, "total_count": diseases.len() }),
                true,
            )?;
        }
        Command::CheckConfig => {
            let issues = config.validate();
            for issue in &issues {
                println!("{}", issue);
            }
            if issues.iter().any(|issue| issue.is_error()) {
                return Ok(ExitCode::FAILURE);
            }
            println!("Configuration OK");
        }
        Command::TestAnalysis { pretty } => {
            let generator = AnalysisGenerator::new(&config.analysis);
            info!(configured = generator.is_configured(), "Running sample analysis");
            let analysis = generator.generate(SAMPLE_CONDITION, SAMPLE_CONFIDENCE, SAMPLE_ADVICE);
            print_json(&analysis, *pretty)?;
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> CliResult<()> {
    let rendered = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{}", rendered);
    Ok(())
}
