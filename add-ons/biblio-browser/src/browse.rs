//! Interactive browse loop: reads commands from stdin and drives a [`Session`].
//!
//! Selection changes are printed from the session's event stream, so what the user
//! sees is exactly what the session ended up holding.

use crate::cli::{BrowseCommand, BROWSE_HELP};
use crate::render;
use biblio_core::{Session, SessionEvent, Translations};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast;

pub async fn run(session: Arc<Session>, labels: Arc<Translations>, locale: String) -> std::io::Result<()> {
    let printer = tokio::spawn(print_events(session.subscribe(), Arc::clone(&labels)));

    println!("{}", BROWSE_HELP);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let cmd = match BrowseCommand::parse(&line) {
            Ok(Some(cmd)) => cmd,
            Ok(None) => continue,
            Err(msg) => {
                println!("{}", msg);
                continue;
            }
        };
        if !execute(&session, &labels, &locale, cmd).await {
            break;
        }
    }

    printer.abort();
    Ok(())
}

/// Runs one command. Returns `false` when the loop should stop.
async fn execute(session: &Session, labels: &Translations, locale: &str, cmd: BrowseCommand) -> bool {
    match cmd {
        BrowseCommand::Search { query, online } => {
            let envelope = session.search(&query, None, online, Some(locale)).await;
            print!("{}", render::result_list(&envelope, labels));
        }
        // Resolution errors are reported through `SessionEvent::ResolveFailed`.
        BrowseCommand::Open(index) => {
            if let Err(e) = session.select_from_pool(index).await {
                report_local_error(&e);
            }
        }
        BrowseCommand::Follow { relation, index } => {
            if let Err(e) = session.follow_relation(&relation, index).await {
                report_local_error(&e);
            }
        }
        BrowseCommand::Close => session.close(),
        BrowseCommand::Results => print!("{}", render::result_list(&session.current_pool(), labels)),
        BrowseCommand::Help => println!("{}", BROWSE_HELP),
        BrowseCommand::Quit => return false,
    }
    true
}

/// Errors raised before any resolution started never reach the event stream.
fn report_local_error(e: &biblio_core::ResolveError) {
    use biblio_core::ResolveError::*;
    match e {
        NoSelection | UnknownRelation(_) | IndexOutOfRange(_) | NotNavigable(_) => println!("{}", e),
        EmptyId | LocalFetch { .. } => {}
    }
}

async fn print_events(mut rx: broadcast::Receiver<SessionEvent>, labels: Arc<Translations>) {
    loop {
        match rx.recv().await {
            Ok(SessionEvent::SelectionChanged(Some(entity))) => print!("{}", render::detail(&entity, &labels)),
            Ok(SessionEvent::SelectionChanged(None)) => println!("(detail closed)"),
            Ok(SessionEvent::ResolveFailed { id, error }) => println!("could not open '{}': {}", id, error),
            Ok(SessionEvent::Searching(true)) => println!("searching..."),
            Ok(_) => {}
            Err(broadcast::error::RecvError::Lagged(n)) => {
                tracing::warn!(target: "biblio::browser", skipped = n, "Event printer lagged");
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}
