//! # Liyana Nour Storefront Entry Point
//!
//! ```text
//! $ liyana-storefront --session 550e8400-e29b-41d4-a716-446655440000
//! Willkommen bei Liyana Nour Extrait. /help zeigt alle Befehle.
//! zeige mir rouge
//! » Hier ist Liyana Nour Rouge. Rose, Safran und warmes Amber
//! ich nehme
//! » Liyana Nour Rouge wurde zum Warenkorb hinzugefügt
//! ```
//!
//! The actual setup is in lib.rs for better testability.

use clap::Parser;
use liyana_storefront::StartupArgs;

#[tokio::main]
async fn main() {
    let args = StartupArgs::parse();

    if let Err(e) = liyana_storefront::run(args).await {
        eprintln!("liyana-storefront: {}", e);
        std::process::exit(1);
    }
}
