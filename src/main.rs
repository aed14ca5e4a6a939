use std::process::ExitCode;

use sitecompare::config::AnalyzerConfig;
use sitecompare::error::{AppError, ErrorResponse};
use sitecompare::lifecycle::init_logging;
use sitecompare::service::AnalysisService;

const USAGE: &str = "usage: sitecompare <client-url> <competitor-url>";

#[tokio::main]
async fn main() -> ExitCode {
    init_logging();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let [client_url, competitor_url] = args.as_slice() else {
        eprintln!("{}", USAGE);
        return ExitCode::from(2);
    };

    match run(client_url, competitor_url).await {
        Ok(json) => {
            println!("{}", json);
            ExitCode::SUCCESS
        }
        Err(err) => {
            log::error!("Analysis failed: {}", err);
            let body = ErrorResponse::from(&err);
            match serde_json::to_string_pretty(&body) {
                Ok(json) => println!("{}", json),
                Err(e) => eprintln!("{} ({})", err, e),
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(client_url: &str, competitor_url: &str) -> Result<String, AppError> {
    let config = AnalyzerConfig::from_env()?;
    let service = AnalysisService::from_config(&config)?;
    let report = service.run(client_url, competitor_url).await?;
    serde_json::to_string_pretty(&report).map_err(|e| AppError::ParseError(e.to_string()))
}
