use std::process::ExitCode;

use itin_analyzer::analyzer::{
    AnalysisRequestDto, AnalyzerConfig, ItineraryAnalyzer, LegSummary, convert_request,
};
use itin_analyzer::domain::JumpedLeg;
use tracing::error;
use tracing_subscriber::EnvFilter;

const USAGE: &str = "usage: itin-analyzer <request.json> [config.json]";

fn describe_jumped(jumped: &[JumpedLeg]) -> String {
    jumped
        .iter()
        .map(|j| match j {
            JumpedLeg::Leg(i) => (i + 1).to_string(),
            JumpedLeg::Surface => "~".to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn print_summary(summary: &[LegSummary]) {
    for line in summary {
        let carriers: Vec<String> = line.carriers.iter().map(ToString::to_string).collect();
        match &line.jumped {
            Some(jumped) => println!(
                "leg {:>2}  across [{}]  {} SOPs  {:?}  carriers: {}",
                line.leg + 1,
                describe_jumped(jumped),
                line.sops,
                line.direction,
                carriers.join(", ")
            ),
            None => println!(
                "leg {:>2}  {} SOPs  {:?}  carriers: {}",
                line.leg + 1,
                line.sops,
                line.direction,
                carriers.join(", ")
            ),
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut args = std::env::args().skip(1);
    let Some(request_path) = args.next() else {
        eprintln!("{USAGE}");
        return ExitCode::from(2);
    };

    let config = match args.next() {
        Some(path) => match AnalyzerConfig::load(&path) {
            Ok(config) => config,
            Err(e) => {
                error!(path = %path, "failed to load configuration: {e}");
                return ExitCode::FAILURE;
            }
        },
        None => AnalyzerConfig::default(),
    };

    let request = match AnalysisRequestDto::load(&request_path) {
        Ok(dto) => dto,
        Err(e) => {
            error!(path = %request_path, "failed to load request: {e}");
            return ExitCode::FAILURE;
        }
    };
    let request = match convert_request(&request) {
        Ok(request) => request,
        Err(e) => {
            error!("invalid request: {e}");
            return ExitCode::FAILURE;
        }
    };

    match ItineraryAnalyzer::new(&config).analyze(request) {
        Ok(outcome) => {
            print_summary(&outcome.summary());
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("analysis failed: {e}");
            ExitCode::FAILURE
        }
    }
}
