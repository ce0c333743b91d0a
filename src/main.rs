//! xdl-resolver - CLI entry point.

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use xdl_resolver::{
    cli::{Args, EventLog},
    config::{validate_config, Config},
    download::{HttpDownloader, MessageDispatcher, RuntimeMessage},
    engine::{Engine, EngineHandle},
    error::{exit_codes, Error, Result},
    output::{
        print_error, print_info, print_replay_summary, print_success, print_warning,
    },
};

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::from(exit_codes::SUCCESS as u8),
        Err(e) => {
            print_error(&format!("{}", e));
            match e {
                Error::Config(_) | Error::ConfigValidation { .. } | Error::TomlParse(_) => {
                    ExitCode::from(exit_codes::CONFIG_ERROR as u8)
                }
                Error::MissingTabContext | Error::Unresolved => {
                    ExitCode::from(exit_codes::RESOLVE_ERROR as u8)
                }
                Error::Download(_) | Error::Http(_) | Error::InvalidFilename(_) => {
                    ExitCode::from(exit_codes::DOWNLOAD_ERROR as u8)
                }
                _ => ExitCode::from(exit_codes::UNEXPECTED_ERROR as u8),
            }
        }
    }
}

async fn run() -> Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Set up logging
    let log_level = if args.debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    fmt().with_env_filter(filter).with_target(false).init();

    // Load configuration
    let config_path = args.config_path();
    if args.config.is_some() && !config_path.exists() {
        print_warning(&format!(
            "Configuration file not found: {}",
            config_path.display()
        ));
    }
    let mut config = Config::load_or_default(&config_path)?;

    // Merge CLI arguments into config, then validate
    args.merge_into_config(&mut config);
    validate_config(&config)?;

    // Replay the capture
    let log = EventLog::load(&args.events).await?;
    for skipped in &log.skipped {
        print_warning(&skipped.to_string());
    }

    // Feed every event to the engine in capture order
    let (engine, _task) = EngineHandle::spawn(Engine::new());
    for event in log.events.iter().cloned() {
        engine.send(event)?;
    }

    print_replay_summary(log.events.len(), log.skipped.len(), args.tab, &args.media_id);

    // Print only, unless a download was requested
    if !args.download {
        let url = engine
            .resolve(Some(args.tab), &args.media_id)
            .await?
            .ok_or(Error::Unresolved)?;
        println!("{}", url);
        return Ok(());
    }

    print_info("Downloading resolved video...");
    let downloader = HttpDownloader::new(&config)?;
    let dispatcher = MessageDispatcher::new(engine, downloader, config.options.clone());
    let message = RuntimeMessage::DownloadTwitterVideo {
        media_id: Some(args.media_id.clone()),
    };

    let outcome = dispatcher.handle(message, Some(args.tab)).await?;
    print_success(&format!(
        "Saved download {} to {}",
        outcome.id,
        outcome.path.display()
    ));

    Ok(())
}
