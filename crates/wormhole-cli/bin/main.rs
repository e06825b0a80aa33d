mod cli;
mod clipboard;
mod render;

use crate::cli::{Command, CLI};
use crate::clipboard::SystemClipboard;
use clap::Parser;
use std::time::Duration;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;
use wormhole_cache::{FileBackend, LocalCache};
use wormhole_client::{ClientConfig, HttpUrlApi};
use wormhole_sync::{CopyVariant, SearchPhase, Session, SessionConfig};

type CliSession = Session<HttpUrlApi, FileBackend>;

const SEARCH_POLL_INTERVAL: Duration = Duration::from_millis(25);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = CLI::parse();

    info!(
        api_base_url = %config.api_base_url,
        data_dir = %config.data_dir.display(),
        "starting wormhole client"
    );

    let api = HttpUrlApi::new(
        ClientConfig::builder()
            .api_base_url(config.api_base_url)
            .redirect_base_url(config.redirect_base_url.clone())
            .timeout(Duration::from_secs(config.timeout_secs))
            .build(),
    )?;
    let cache = LocalCache::open(FileBackend::new(&config.data_dir));
    let session = Session::new(
        api,
        cache,
        SystemClipboard,
        SessionConfig::builder()
            .redirect_base_url(config.redirect_base_url)
            .build(),
    );

    if let Err(err) = run(&session, config.command).await {
        debug!(error = %err, "command failed");
        match session.error() {
            Some(message) => eprintln!("{message}"),
            None => eprintln!("{err:#}"),
        }
        std::process::exit(1);
    }

    Ok(())
}

async fn run(session: &CliSession, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Shorten { url } => {
            let record = session.create(&url).await?;
            println!(
                "{}",
                render::format_record(&record, &session.redirect_url(&record.short_code))
            );
        }
        Command::List { filter } => {
            let records = match filter {
                Some(query) => session.cache().filter(&query),
                None => session.records(),
            };
            for record in &records {
                println!(
                    "{}",
                    render::format_record(record, &session.redirect_url(&record.short_code))
                );
            }
        }
        Command::Stats { code } => {
            let stats = session.fetch_stats(&code).await?;
            println!(
                "{}",
                render::format_stats(&stats, &session.redirect_url(&code))
            );
        }
        Command::Update { code, url } => {
            session.begin_edit(&code)?;
            session.set_draft(url)?;
            let record = session.commit_edit().await?;
            println!(
                "{}",
                render::format_record(&record, &session.redirect_url(&record.short_code))
            );
        }
        Command::Delete { code } => {
            session.delete(&code).await?;
            println!("Deleted {code}");
        }
        Command::Search { query } => {
            session.set_query(query);
            while matches!(
                session.search_phase(),
                SearchPhase::Debouncing | SearchPhase::Searching
            ) {
                tokio::time::sleep(SEARCH_POLL_INTERVAL).await;
            }

            let view = session.view().search;
            for record in &view.records {
                println!(
                    "{}",
                    render::format_record(record, &session.redirect_url(&record.short_code))
                );
            }
            if let Some(found) = &view.remote {
                println!("Found URL:");
                println!(
                    "{}",
                    render::format_record(found, &session.redirect_url(&found.short_code))
                );
            }
        }
        Command::Open { code } => {
            println!("{}", session.redirect_url(&code));
        }
        Command::Copy { code, full } => {
            let variant = if full {
                CopyVariant::Full
            } else {
                CopyVariant::Short
            };
            let text = session.copy(&code, variant).await?;
            println!("Copied {text}");
        }
    }

    Ok(())
}
