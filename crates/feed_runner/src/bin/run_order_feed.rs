use std::io::{self, BufRead};
use std::sync::{Arc, Mutex};
use std::thread;

use anyhow::{Context, Result};
use chrono::Local;

use base::notifier::BellNotifier;
use base::requests::ureq::UreqRequestApi;
use feed_runner::console::{
    format_listing, format_snapshot, parse_command, ConsoleCommand, HELP_TEXT,
};
use feed_runner::logging::{init_logging, LoggingSettings};
use order_feed::session::{login, Session};
use order_feed::settings::{AuthSettings, FeedSettings};
use order_feed::stores::FileCursorStore;
use order_feed::{
    BackendApiData, BackendOrderSource, FeedCollaborators, FeedSnapshot, OrderFeedMonitor,
    SpoolDirectoryPrinter,
};

const NOTIFICATION_RINGS: u8 = 1;

fn main() -> Result<()> {
    dotenv::dotenv().ok();

    init_logging(&LoggingSettings::from_env()?)?;

    let settings = FeedSettings::from_env()?;
    let target_logger = settings.target_logger.as_str();

    let request_api = UreqRequestApi::new();

    let session = match &settings.auth {
        AuthSettings::Token {
            token,
            restaurant_id,
        } => Session {
            token: token.clone(),
            restaurant_id: restaurant_id.clone(),
            restaurant_name: None,
        },
        AuthSettings::Login { .. } => {
            let credentials = settings
                .auth
                .credentials()
                .context("login credentials are missing")?;

            login(
                &settings.backend_url,
                &credentials,
                settings.login_retries,
                target_logger,
                &request_api,
            )?
        }
    };

    let source = BackendOrderSource::new(
        BackendApiData {
            base_url: settings.backend_url.clone(),
            auth_token: session.token,
            restaurant_id: session.restaurant_id,
        },
        request_api,
    );

    let printer = SpoolDirectoryPrinter::new(&settings.ticket_spool_dir)?;
    log::info!(
        target: target_logger,
        "kitchen tickets are spooled to {}",
        printer.spool_dir().display()
    );

    let monitor = OrderFeedMonitor::new(
        FeedCollaborators {
            source,
            notifier: BellNotifier::stdout(NOTIFICATION_RINGS),
            printer,
            cursor_store: FileCursorStore::new(&settings.cursor_file),
        },
        target_logger,
    )?;

    let mut handle = monitor.start(settings.poll_interval)?;

    let latest = Arc::new(Mutex::new(FeedSnapshot::default()));
    let updates = handle.updates();
    let latest_for_updates = Arc::clone(&latest);

    thread::spawn(move || {
        for snapshot in updates.iter() {
            if let Some(text) = format_snapshot(&snapshot) {
                println!("{}", text);
            }

            if let Ok(mut latest) = latest_for_updates.lock() {
                *latest = snapshot;
            }
        }
    });

    println!("{}", HELP_TEXT);

    for line in io::stdin().lock().lines() {
        let line = line.context("failed to read the operator input")?;

        let command = match parse_command(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                println!("{}", e);
                continue;
            }
        };

        match command {
            ConsoleCommand::Accept => handle.acknowledge()?,
            ConsoleCommand::Dismiss => handle.dismiss()?,
            ConsoleCommand::Print(order_id) => handle.print(&order_id)?,
            ConsoleCommand::List => {
                if let Ok(latest) = latest.lock() {
                    println!("{}", format_listing(&latest.visible_orders, &Local));
                }
            }
            ConsoleCommand::Help => println!("{}", HELP_TEXT),
            ConsoleCommand::Quit => break,
        }
    }

    handle.stop();

    Ok(())
}
