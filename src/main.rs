//! course-portal binary entry point.

use std::process::ExitCode;

use course_portal::api::{serve_with_state, AppState};
use course_portal::cli;
use course_portal::config::Config;
use course_portal::logging;
use tracing::{error, info};

#[tokio::main]
async fn main() -> ExitCode {
    let args = match cli::parse_args() {
        Ok(args) => args,
        Err(e) => {
            eprintln!("error: {}", e);
            eprintln!("Run with --help for usage.");
            return ExitCode::from(2);
        }
    };

    if args.help {
        cli::print_help();
        return ExitCode::SUCCESS;
    }
    if args.version {
        cli::print_version();
        return ExitCode::SUCCESS;
    }

    let config = match Config::load(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    logging::try_init_with_level(Some(config.log_filter())).ok();
    info!("course-portal v{}", env!("CARGO_PKG_VERSION"));

    let server_config = match config.to_server_config() {
        Ok(server_config) => server_config,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let state = match AppState::from_config(&config) {
        Ok(state) => state,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };
    match state.session.identity() {
        Some(identity) => info!(user = %identity.id, "Restored session"),
        None => info!("No active session"),
    }

    if let Err(e) = serve_with_state(server_config, state).await {
        error!("Server error: {}", e);
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
