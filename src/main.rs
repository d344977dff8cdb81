use pricecalc::{
    config::{
        logging::init_tracing,
        settings::{self, PageKind},
    },
    core::events::{self, IngredientAdded, UsageAdded},
    errors::{Error, Result},
    pages::{IngredientsPage, ProductEditPage, report},
    snapshot::{IngredientsSnapshot, ProductEditSnapshot},
};
use dotenvy::dotenv;
use std::path::{Path, PathBuf};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info, warn};

/// Usage: `pricecalc [product_edit|ingredients] [snapshot.json]`
///
/// Prints the page once loaded, then reads one item-added notification per
/// stdin line and prints the page again after each.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // 1. Load .env file (non-fatal, env vars can be set externally)
    dotenv().ok();

    // 2. Load settings, then tracing with the configured filter
    let app_settings = settings::load_app_settings()?;
    init_tracing(&app_settings.log_filter);
    info!("Settings loaded.");

    // 3. Command line overrides the configured snapshot
    let mut args = std::env::args().skip(1);
    let page_kind = match args.next() {
        Some(arg) => arg.parse()?,
        None => app_settings.snapshot.page,
    };
    let snapshot_path = args
        .next()
        .map(PathBuf::from)
        .or_else(|| app_settings.snapshot.path.clone())
        .ok_or_else(|| Error::Config {
            message: "No snapshot path given on the command line or in config.toml".to_string(),
        })?;

    // 4. Build the page and feed it notifications
    let outcome = match page_kind {
        PageKind::ProductEdit => run_product_edit(&snapshot_path).await,
        PageKind::Ingredients => run_ingredients(&snapshot_path).await,
    };
    outcome.inspect_err(|e| error!("pricecalc failed: {}", e))
}

async fn run_product_edit(snapshot_path: &Path) -> Result<()> {
    let snapshot = ProductEditSnapshot::from_path(snapshot_path)?;
    let (notifier, subscription) = events::channel::<UsageAdded>();
    let mut page = ProductEditPage::new(snapshot, subscription)?;
    print!("{}", report::render_product_edit(&page));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<UsageAdded>(&line) {
            Ok(payload) => notifier.notify(payload)?,
            Err(e) => {
                warn!("Ignoring malformed notification: {}", e);
                continue;
            }
        }
        if let Err(e) = page.pump_events() {
            warn!("Notification rejected: {}", e);
        }
        print!("{}", report::render_product_edit(&page));
    }

    page.unsubscribe();
    Ok(())
}

async fn run_ingredients(snapshot_path: &Path) -> Result<()> {
    let snapshot = IngredientsSnapshot::from_path(snapshot_path)?;
    let (notifier, subscription) = events::channel::<IngredientAdded>();
    let mut page = IngredientsPage::new(snapshot, subscription);
    print!("{}", report::render_ingredients(&page));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<IngredientAdded>(&line) {
            Ok(payload) => notifier.notify(payload)?,
            Err(e) => {
                warn!("Ignoring malformed notification: {}", e);
                continue;
            }
        }
        page.pump_events();
        print!("{}", report::render_ingredients(&page));
    }

    page.unsubscribe();
    Ok(())
}
