mod args;
mod config;

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use adoption_app::{AppPaths, AppState, http_client, write_report};
use clap::Parser;
use ingest::ValidationPolicy;
use tracing::level_filters::LevelFilter;
use tracing::{Level, debug, info};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = args::CliArgs::parse();
    init_tracing(args.log_level);

    let loaded = config::load(args.config.as_deref()).map_err(io::Error::other)?;
    match &loaded.file {
        Some(file) => info!(path = %file.display(), "loaded config"),
        None => debug!("no config file, using defaults"),
    }
    let mut app_config = loaded.config;
    if args.skip_invalid {
        app_config.validation = ValidationPolicy::Skip;
    }

    let app = AppState::new(app_config)?;
    let paths = AppPaths::new(args.cache_dir.unwrap_or_else(std::env::temp_dir));
    let client = http_client()?;
    let sources = app.resolve_sources(&client, &paths, args.pageloads, args.issuance)?;

    let report = app.synthesize(&sources)?;
    if !report.missing_issuance.is_empty() {
        debug!(
            dates = report.missing_issuance.len(),
            "rows emitted without issuance stats"
        );
    }

    let format = args.format.into();
    if args.output == Path::new("-") {
        let stdout = io::stdout();
        write_report(stdout.lock(), &report, format)?;
    } else {
        let file = File::create(&args.output).map_err(|err| {
            io::Error::new(
                err.kind(),
                format!("create {}: {}", args.output.display(), err),
            )
        })?;
        let mut writer = BufWriter::new(file);
        write_report(&mut writer, &report, format)?;
        writer.flush()?;
    }

    Ok(())
}

fn init_tracing(level: Level) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::default().add_directive(LevelFilter::from_level(level).into())
    });
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}
