//! Terminal front end for the library ontology browser. Config-driven via BrowserConfig.

mod browse;
mod cli;
mod render;

use biblio_client::HttpOntologyApi;
use biblio_core::{BrowserConfig, Catalog, ClassListing, OntologyApi, Session};
use clap::Parser;
use cli::{Cli, Command};
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> ExitCode {
    if let Err(e) = dotenvy::dotenv() {
        eprintln!("[biblio-browser] .env not loaded: {} (using system environment)", e);
    }

    // Logs go to stderr so they never interleave with rendered views on stdout.
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), String> {
    let mut config = BrowserConfig::load().map_err(|e| format!("Config load failed: {}", e))?;
    if let Some(api) = cli.api {
        config.api_base = api;
    }
    let locale = cli.lang.unwrap_or_else(|| config.default_locale.clone());
    if !BrowserConfig::is_supported_locale(&locale) {
        tracing::warn!(target: "biblio::browser", locale = %locale, "Locale not supported by the backend");
    }
    tracing::info!(target: "biblio::browser", api_base = %config.api_base, locale = %locale, "Browser starting");

    let api: Arc<dyn OntologyApi> = Arc::new(HttpOntologyApi::from_config(&config).map_err(|e| e.to_string())?);
    let catalog = Catalog::new(Arc::clone(&api));
    let labels = catalog.translations(&locale).await;

    match cli.command {
        Command::Search {
            query,
            category,
            online,
        } => {
            let session = Session::new(api, &config);
            let envelope = session.search(&query, category.as_deref(), online, Some(&locale)).await;
            if cli.json {
                print_json(&*envelope)?;
            } else {
                print!("{}", render::result_list(&envelope, &labels));
            }
        }
        Command::Show { id } => {
            let session = Session::new(api, &config);
            let entity = session
                .navigate_to(&id)
                .await
                .map_err(|e| e.to_string())?
                .ok_or_else(|| format!("'{}' was superseded", id))?;
            if cli.json {
                print_json(&entity)?;
            } else {
                print!("{}", render::detail(&entity, &labels));
            }
        }
        Command::List { class } => {
            let listing = ClassListing::parse(&class).ok_or_else(|| {
                let known: Vec<&str> = ClassListing::all().iter().map(|l| l.path()).collect();
                format!("unknown class '{}'; expected one of {}", class, known.join(", "))
            })?;
            let entities = catalog.list(listing).await.map_err(|e| e.to_string())?;
            if cli.json {
                print_json(&entities)?;
            } else {
                print!("{}", render::entity_list(labels.label(listing.title()), &entities, &labels));
            }
        }
        Command::Stats => {
            let stats = catalog.stats().await;
            if cli.json {
                print_json(&stats)?;
            } else {
                print!("{}", render::stats(&stats, &labels));
            }
        }
        Command::Browse => {
            let session = Arc::new(Session::new(api, &config));
            browse::run(session, Arc::new(labels), locale)
                .await
                .map_err(|e| format!("stdin: {}", e))?;
        }
    }
    Ok(())
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<(), String> {
    let text = serde_json::to_string_pretty(value).map_err(|e| e.to_string())?;
    println!("{}", text);
    Ok(())
}
