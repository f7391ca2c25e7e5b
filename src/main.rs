//! Inspect a contact record as the editor would see it.
//!
//! Usage:
//!   contact-sync <id>                  # all reconciled translations
//!   contact-sync <id> --locale es      # a single locale
//!
//! Required environment variables:
//! - CONTACT_API_URL
//!
//! Optional:
//! - CONTACT_API_TOKEN
//! - REQUEST_TIMEOUT_SECS (defaults to 15)
//! - LOAD_RETRY_ATTEMPTS (defaults to 3)

use anyhow::{bail, Context, Result};
use contact_locale_sync::{config::Config, HttpContactApi, Locale, RecordSynchronizer};
use tracing::{info, warn};

struct Args {
    id: String,
    locale: Option<Locale>,
}

fn parse_args() -> Result<Args> {
    let mut args = std::env::args().skip(1);
    let mut id = None;
    let mut locale = None;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--locale" | "-l" => {
                let code = args.next().context("--locale requires a value")?;
                locale = Some(Locale::from_code(&code)?);
            }
            _ if id.is_none() => id = Some(arg),
            other => bail!("Unexpected argument: {}", other),
        }
    }

    Ok(Args {
        id: id.context("Usage: contact-sync <id> [--locale <code>]")?,
        locale,
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("contact_locale_sync=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = parse_args()?;
    let config = Config::from_env()?;
    let api = HttpContactApi::new(&config)?;
    let mut sync = RecordSynchronizer::new(api);

    info!("Loading contact record {}", args.id);
    if let Err(err) = sync.load_all(&args.id).await {
        if err.is_retryable() {
            warn!("Backend unavailable, the load can be retried");
        }
        return Err(err).with_context(|| format!("Failed to load record {}", args.id));
    }

    if !sync.store().is_consistent() {
        warn!("Shared fields differ between locales after load");
    }

    let output = match args.locale {
        Some(locale) => serde_json::to_string_pretty(
            &sync
                .translation(locale)
                .with_context(|| format!("Locale {} not in record", locale))?,
        )?,
        None => serde_json::to_string_pretty(&sync.store().iter().collect::<Vec<_>>())?,
    };
    println!("{}", output);

    let active = sync.active_locale();
    info!(
        "Active locale: {} [{}] ({} saved)",
        active.native_name(),
        active,
        sync.store().existing_locales().len()
    );
    Ok(())
}
