//! # Console Front-End
//!
//! Line-oriented storefront on stdin/stdout.
//!
//! ## Input
//! ```text
//! /add <product-id> [qty] [volume-id]   add a product (default volume, qty 1)
//! /qty <item #|item-id> <qty>           set quantity (0 removes)
//! /remove <item #|item-id>              remove an item
//! /coupon <code>                        apply a coupon
//! /uncoupon <code>                      remove a coupon
//! /clear                                empty the cart
//! /cart                                 show the cart
//! /products                             list the catalog
//! /help                                 this list
//! /quit                                 leave
//! anything else                         treated as a voice transcript
//! ```

use std::sync::Arc;

use liyana_core::{
    CatalogProvider, CouponOutcome, StaticCatalog, Variants, VOLUME_VARIANT,
};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::debug;

use crate::bus::{CartAction, CartHandle, CartReply, CartResponse};
use crate::config::{OutputFormat, StorefrontConfig};
use crate::error::{AppError, AppResult};
use crate::session::{VoiceOutcome, VoiceSession};

pub const CONSOLE_HELP: &str = "\
/add <produkt-id> [menge] [volumen-id]  Produkt hinzufügen
/qty <nr|id> <menge>                    Menge ändern (0 entfernt)
/remove <nr|id>                         Artikel entfernen
/coupon <code>                          Gutschein einlösen
/uncoupon <code>                        Gutschein entfernen
/clear                                  Warenkorb leeren
/cart                                   Warenkorb anzeigen
/products                               Produkte anzeigen
/quit                                   Beenden
Alles andere wird als Sprachbefehl verstanden.";

// =============================================================================
// Parsing
// =============================================================================

/// A cart item as typed: its 1-based position in the listing, or its id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemRef {
    Position(usize),
    Id(String),
}

impl ItemRef {
    fn parse(token: &str) -> Self {
        match token.parse::<usize>() {
            Ok(n) => ItemRef::Position(n),
            Err(_) => ItemRef::Id(token.to_string()),
        }
    }

    /// Resolves to an item id against the current cart.
    fn resolve(&self, cart: &CartResponse) -> AppResult<String> {
        match self {
            ItemRef::Id(id) => Ok(id.clone()),
            ItemRef::Position(n) => cart
                .items
                .get(n.wrapping_sub(1))
                .map(|item| item.id.clone())
                .ok_or_else(|| AppError::InvalidCommand(format!("Kein Artikel Nr. {}", n))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    Add {
        product_id: String,
        quantity: i64,
        volume: Option<String>,
    },
    Quantity { item: ItemRef, quantity: i64 },
    Remove { item: ItemRef },
    Coupon { code: String },
    Uncoupon { code: String },
    Clear,
    Cart,
    Products,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleInput {
    Command(ConsoleCommand),
    Transcript(String),
    Empty,
}

/// Parses one console line.
pub fn parse_line(line: &str) -> AppResult<ConsoleInput> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(ConsoleInput::Empty);
    }

    let Some(rest) = line.strip_prefix('/') else {
        return Ok(ConsoleInput::Transcript(line.to_string()));
    };

    let mut tokens = rest.split_whitespace();
    let name = tokens.next().unwrap_or_default().to_lowercase();
    let args: Vec<&str> = tokens.collect();

    let command = match (name.as_str(), args.as_slice()) {
        ("add", [product_id]) => ConsoleCommand::Add {
            product_id: product_id.to_string(),
            quantity: 1,
            volume: None,
        },
        ("add", [product_id, qty]) => ConsoleCommand::Add {
            product_id: product_id.to_string(),
            quantity: parse_quantity(qty)?,
            volume: None,
        },
        ("add", [product_id, qty, volume]) => ConsoleCommand::Add {
            product_id: product_id.to_string(),
            quantity: parse_quantity(qty)?,
            volume: Some(volume.to_string()),
        },
        ("qty", [item, qty]) => ConsoleCommand::Quantity {
            item: ItemRef::parse(item),
            quantity: parse_quantity(qty)?,
        },
        ("remove", [item]) => ConsoleCommand::Remove {
            item: ItemRef::parse(item),
        },
        ("coupon", [code]) => ConsoleCommand::Coupon { code: code.to_string() },
        ("uncoupon", [code]) => ConsoleCommand::Uncoupon { code: code.to_string() },
        ("clear", []) => ConsoleCommand::Clear,
        ("cart", []) => ConsoleCommand::Cart,
        ("products", []) => ConsoleCommand::Products,
        ("help", []) => ConsoleCommand::Help,
        ("quit" | "exit", []) => ConsoleCommand::Quit,
        _ => {
            return Err(AppError::InvalidCommand(format!(
                "Unbekannter Befehl: /{}. /help zeigt alle Befehle.",
                rest
            )))
        }
    };

    Ok(ConsoleInput::Command(command))
}

fn parse_quantity(token: &str) -> AppResult<i64> {
    token
        .parse()
        .map_err(|_| AppError::InvalidCommand(format!("Ungültige Menge: {}", token)))
}

// =============================================================================
// Rendering
// =============================================================================

/// Renders a cart as a text table.
pub fn render_cart(cart: &CartResponse, config: &StorefrontConfig) -> String {
    if cart.is_empty() {
        return "Ihr Warenkorb ist leer.".to_string();
    }

    let money = |m| config.format_currency(m);
    let mut out = String::new();

    for (i, item) in cart.items.iter().enumerate() {
        let volume = item
            .selected_variants
            .get(VOLUME_VARIANT)
            .map(|v| format!(" [{}]", v))
            .unwrap_or_default();
        out.push_str(&format!(
            "{:>2}. {}{} x{}  {}\n",
            i + 1,
            item.name,
            volume,
            item.quantity,
            money(item.line_total())
        ));
    }

    let totals = &cart.totals;
    out.push_str(&format!("    Zwischensumme   {}\n", money(totals.subtotal)));
    if let Some(description) = totals.discount_description() {
        out.push_str(&format!(
            "    Rabatt          -{}  ({})\n",
            money(totals.discount_amount),
            description
        ));
    }
    out.push_str(&format!("    Versand         {}\n", money(totals.shipping_cost)));
    out.push_str(&format!("    MwSt. 19%       {}\n", money(totals.tax_amount)));
    out.push_str(&format!("    Gesamt          {}", money(totals.total)));

    if !cart.applied_coupons.is_empty() {
        out.push_str(&format!("\n    Gutscheine: {}", cart.applied_coupons.join(", ")));
    }

    out
}

/// Renders the catalog.
pub fn render_products(catalog: &StaticCatalog, config: &StorefrontConfig) -> String {
    catalog
        .products()
        .iter()
        .map(|p| {
            let volumes = if p.volumes.is_empty() {
                config.format_currency(p.effective_price())
            } else {
                p.volumes
                    .iter()
                    .map(|v| format!("{}ml {} ({})", v.ml, config.format_currency(p.volume_price(v)), v.id))
                    .collect::<Vec<_>>()
                    .join(", ")
            };
            format!("{:<22} {:<28} {}", p.id, p.name, volumes)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_coupon(outcome: &CouponOutcome, config: &StorefrontConfig) -> String {
    match outcome {
        CouponOutcome::Applied { code } => format!("Gutschein {} eingelöst.", code),
        CouponOutcome::AlreadyApplied { code } => format!("Gutschein {} ist bereits eingelöst.", code),
        CouponOutcome::Unknown { code } => format!("Gutschein {} ist ungültig.", code),
        CouponOutcome::MinimumNotMet { code, min_order_value } => format!(
            "Gutschein {} gilt erst ab {} Bestellwert.",
            code,
            config.format_currency(*min_order_value)
        ),
    }
}

// =============================================================================
// Console Loop
// =============================================================================

/// The interactive storefront.
pub struct Console {
    catalog: Arc<StaticCatalog>,
    cart: CartHandle,
    voice: VoiceSession,
    config: StorefrontConfig,
}

impl Console {
    pub fn new(catalog: Arc<StaticCatalog>, cart: CartHandle, config: StorefrontConfig) -> Self {
        let voice = VoiceSession::new(catalog.clone(), cart.clone());
        Console {
            catalog,
            cart,
            voice,
            config,
        }
    }

    /// Reads lines until EOF or `/quit`.
    pub async fn run<R, W>(&mut self, reader: R, mut writer: W) -> AppResult<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let banner = format!(
            "Willkommen bei {}. /help zeigt alle Befehle.\n",
            self.config.shop.name
        );
        writer.write_all(banner.as_bytes()).await?;
        writer.flush().await?;

        let mut lines = reader.lines();
        while let Some(line) = lines.next_line().await? {
            let output = match parse_line(&line) {
                Ok(ConsoleInput::Empty) => continue,
                Ok(ConsoleInput::Command(ConsoleCommand::Quit)) => break,
                Ok(input) => self.handle(input).await?,
                Err(e) => self.render_error(&e.to_string())?,
            };

            writer.write_all(output.as_bytes()).await?;
            writer.write_all(b"\n").await?;
            writer.flush().await?;
        }

        writer.write_all("Auf Wiedersehen!\n".as_bytes()).await?;
        writer.flush().await?;
        Ok(())
    }

    /// Handles one parsed input and returns what to print.
    pub async fn handle(&mut self, input: ConsoleInput) -> AppResult<String> {
        debug!(?input, "Console input");

        match input {
            ConsoleInput::Empty => Ok(String::new()),
            ConsoleInput::Transcript(transcript) => {
                let outcome = self.voice.handle_transcript(&transcript).await;
                self.render_voice(&outcome)
            }
            ConsoleInput::Command(command) => self.handle_command(command).await,
        }
    }

    async fn handle_command(&mut self, command: ConsoleCommand) -> AppResult<String> {
        let action = match command {
            ConsoleCommand::Add {
                product_id,
                quantity,
                volume,
            } => {
                let variants = volume.map(|v| {
                    let mut variants = Variants::new();
                    variants.insert(VOLUME_VARIANT.to_string(), v);
                    variants
                });
                // Typed adds also make the product the voice selection
                self.voice.select(product_id.clone());
                CartAction::AddItem {
                    product_id,
                    quantity,
                    variants,
                }
            }
            ConsoleCommand::Quantity { item, quantity } => match self.resolve_item(&item).await {
                Ok(item_id) => CartAction::UpdateQuantity { item_id, quantity },
                Err(e) => return self.render_error(&e.to_string()),
            },
            ConsoleCommand::Remove { item } => match self.resolve_item(&item).await {
                Ok(item_id) => CartAction::RemoveItem { item_id },
                Err(e) => return self.render_error(&e.to_string()),
            },
            ConsoleCommand::Coupon { code } => CartAction::ApplyCoupon { code },
            ConsoleCommand::Uncoupon { code } => CartAction::RemoveCoupon { code },
            ConsoleCommand::Clear => CartAction::Clear,
            ConsoleCommand::Cart => CartAction::Get,
            ConsoleCommand::Products => return Ok(render_products(&self.catalog, &self.config)),
            ConsoleCommand::Help => return Ok(CONSOLE_HELP.to_string()),
            ConsoleCommand::Quit => return Ok(String::new()),
        };

        let reply = self.cart.execute(action).await;
        self.render_reply(reply)
    }

    async fn resolve_item(&self, item: &ItemRef) -> AppResult<String> {
        match item {
            ItemRef::Id(id) => Ok(id.clone()),
            ItemRef::Position(_) => {
                let cart = self
                    .cart
                    .get()
                    .await
                    .map_err(|e| AppError::InvalidCommand(e.message))?;
                item.resolve(&cart)
            }
        }
    }

    fn render_reply(&self, reply: CartReply) -> AppResult<String> {
        match self.config.console.output {
            OutputFormat::Json => Ok(match reply {
                Ok(cart) => serde_json::to_string(&cart)?,
                Err(e) => serde_json::to_string(&e)?,
            }),
            OutputFormat::Text => Ok(match reply {
                Ok(cart) => {
                    let table = render_cart(&cart, &self.config);
                    match cart.coupon.as_ref() {
                        Some(outcome) => format!("{}\n{}", render_coupon(outcome, &self.config), table),
                        None => table,
                    }
                }
                Err(e) => format!("Fehler: {}", e.message),
            }),
        }
    }

    fn render_voice(&self, outcome: &VoiceOutcome) -> AppResult<String> {
        match self.config.console.output {
            OutputFormat::Json => Ok(serde_json::to_string(outcome)?),
            OutputFormat::Text => Ok(match &outcome.cart {
                Some(cart) => format!("» {}\n{}", outcome.response.reply, render_cart(cart, &self.config)),
                None => format!("» {}", outcome.response.reply),
            }),
        }
    }

    fn render_error(&self, message: &str) -> AppResult<String> {
        match self.config.console.output {
            OutputFormat::Json => Ok(serde_json::to_string(&crate::error::ApiError::validation(message))?),
            OutputFormat::Text => Ok(format!("Fehler: {}", message)),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::CartActor;
    use liyana_core::PricingEngine;
    use liyana_store::MemoryCartStore;

    fn console(output: OutputFormat) -> Console {
        let catalog = Arc::new(StaticCatalog::liyana_nour());
        let cart = CartActor::load(
            "550e8400-e29b-41d4-a716-446655440000",
            catalog.clone(),
            PricingEngine::standard(),
            MemoryCartStore::new(),
        )
        .start(8);

        let mut config = StorefrontConfig::default();
        config.console.output = output;
        Console::new(catalog, cart, config)
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(
            parse_line("/add ln-rouge").unwrap(),
            ConsoleInput::Command(ConsoleCommand::Add {
                product_id: "ln-rouge".to_string(),
                quantity: 1,
                volume: None,
            })
        );
        assert_eq!(
            parse_line("/add ln-rouge 2 ln-rouge-100").unwrap(),
            ConsoleInput::Command(ConsoleCommand::Add {
                product_id: "ln-rouge".to_string(),
                quantity: 2,
                volume: Some("ln-rouge-100".to_string()),
            })
        );
        assert_eq!(
            parse_line("/qty 1 0").unwrap(),
            ConsoleInput::Command(ConsoleCommand::Quantity {
                item: ItemRef::Position(1),
                quantity: 0,
            })
        );
        assert_eq!(
            parse_line("/COUPON welcome10").unwrap(),
            ConsoleInput::Command(ConsoleCommand::Coupon {
                code: "welcome10".to_string()
            })
        );
        assert_eq!(parse_line("/quit").unwrap(), ConsoleInput::Command(ConsoleCommand::Quit));
    }

    #[test]
    fn test_parse_transcripts_and_errors() {
        assert_eq!(parse_line("   ").unwrap(), ConsoleInput::Empty);
        assert_eq!(
            parse_line(" Zeige Produkte ").unwrap(),
            ConsoleInput::Transcript("Zeige Produkte".to_string())
        );
        assert!(parse_line("/add").is_err());
        assert!(parse_line("/add ln-rouge zwei").is_err());
        assert!(parse_line("/teleport").is_err());
    }

    #[tokio::test]
    async fn test_session_script() {
        let mut console = console(OutputFormat::Text);
        let input = b"/add ln-fresh\n/coupon welcome10\n/cart\n/quit\n/add ln-oud\n";
        let mut output = Vec::new();

        console.run(&input[..], &mut output).await.unwrap();
        let output = String::from_utf8(output).unwrap();

        assert!(output.contains("Willkommen bei Liyana Nour Extrait"));
        assert!(output.contains("Gutschein WELCOME10 eingelöst."));
        assert!(output.contains("Rabatt          -€3.00  (Willkommensrabatt 10%)"));
        assert!(output.contains("Gesamt          €37.12"));
        // Nothing after /quit is processed
        assert!(!output.contains("Oud"));
        assert!(output.ends_with("Auf Wiedersehen!\n"));
    }

    #[tokio::test]
    async fn test_item_positions_and_errors() {
        let mut console = console(OutputFormat::Text);

        console.handle(parse_line("/add ln-noir 1").unwrap()).await.unwrap();
        let output = console.handle(parse_line("/qty 1 2").unwrap()).await.unwrap();
        assert!(output.contains("x2"));

        let output = console.handle(parse_line("/remove 5").unwrap()).await.unwrap();
        assert_eq!(output, "Fehler: Kein Artikel Nr. 5");

        let output = console.handle(parse_line("/add ln-nope").unwrap()).await.unwrap();
        assert_eq!(output, "Fehler: Product not found: ln-nope");
    }

    #[tokio::test]
    async fn test_voice_lines_and_json_output() {
        let mut console = console(OutputFormat::Json);

        let output = console
            .handle(parse_line("zeige mir Liyana Nour Oud").unwrap())
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(json["intent"]["type"], "show_product");
        assert_eq!(json["intent"]["product_id"], "ln-oud");

        let output = console.handle(parse_line("ich nehme").unwrap()).await.unwrap();
        let json: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(json["cart"]["itemCount"], 1);
        // 149.00 - 10% tier, free shipping, 19% tax
        assert_eq!(json["cart"]["totals"]["total"], 15958);
    }
}
