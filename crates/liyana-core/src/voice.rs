//! # Voice Command Interpreter
//!
//! Turns a speech transcript into a storefront intent plus the German reply
//! the frontend reads out. Recognition and synthesis happen elsewhere; this
//! module only sees text.
//!
//! ## Matching
//! ```text
//! "Bitte zeige mir Liyana Nour Oud"
//!        │ lowercase + trim
//!        ▼
//! "bitte zeige mir liyana nour oud"
//!        │ scan KEYWORD_COMMANDS in order, patterns in order,
//!        │ first pattern contained in the transcript wins
//!        ▼
//! pattern "zeige mir" ──► parameter "bitte  liyana nour oud".trim()
//!        │
//!        ▼
//! ShowProduct ──► catalog.find_by_name(parameter)
//!
//! no pattern matched ──► product name mentioned? ──► SelectProduct
//!                                   │
//!                                   no ──► NotUnderstood
//! ```
//!
//! Table order matters: "warenkorb" is listed before "warenkorb leeren", so
//! "warenkorb leeren" opens the cart while "alles löschen" clears it.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::catalog::{CatalogProvider, Product};
use crate::money::Money;
use crate::types::Variants;

// =============================================================================
// Keyword Table
// =============================================================================

/// Pages the storefront can navigate to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum Destination {
    Products,
    Home,
    Cart,
    Checkout,
}

impl Destination {
    /// Frontend route.
    pub fn path(&self) -> &'static str {
        match self {
            Destination::Products => "/products",
            Destination::Home => "/",
            Destination::Cart => "/cart",
            Destination::Checkout => "/checkout",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum ScrollDirection {
    Up,
    Down,
}

/// Which keyword command matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    Navigate(Destination),
    ShowProduct,
    AddToCart,
    ClearCart,
    Help,
    Price,
    Scroll(ScrollDirection),
}

/// One row of the keyword table.
#[derive(Debug, Clone, Copy)]
pub struct KeywordCommand {
    pub kind: CommandKind,
    pub patterns: &'static [&'static str],
}

/// The German keyword table, in matching order.
pub const KEYWORD_COMMANDS: &[KeywordCommand] = &[
    KeywordCommand {
        kind: CommandKind::Navigate(Destination::Products),
        patterns: &["zeige produkte", "alle produkte", "produkte anzeigen", "zur produktseite"],
    },
    KeywordCommand {
        kind: CommandKind::Navigate(Destination::Home),
        patterns: &["startseite", "zur startseite", "home", "anfang"],
    },
    KeywordCommand {
        kind: CommandKind::Navigate(Destination::Cart),
        patterns: &["warenkorb", "zum warenkorb", "warenkorb anzeigen", "mein warenkorb"],
    },
    KeywordCommand {
        kind: CommandKind::Navigate(Destination::Checkout),
        patterns: &["zur kasse", "bezahlen", "checkout", "bestellen"],
    },
    KeywordCommand {
        kind: CommandKind::ShowProduct,
        patterns: &["zeige mir", "ich möchte", "was ist", "erzähle mir über"],
    },
    KeywordCommand {
        kind: CommandKind::AddToCart,
        patterns: &["in den warenkorb", "kaufen", "hinzufügen", "ich nehme"],
    },
    KeywordCommand {
        kind: CommandKind::ClearCart,
        patterns: &["warenkorb leeren", "alles löschen", "warenkorb löschen"],
    },
    KeywordCommand {
        kind: CommandKind::Help,
        patterns: &["hilfe", "was kann ich sagen", "befehle", "kommandos"],
    },
    KeywordCommand {
        kind: CommandKind::Price,
        patterns: &["preis", "was kostet", "wie teuer"],
    },
    KeywordCommand {
        kind: CommandKind::Scroll(ScrollDirection::Up),
        patterns: &["nach oben", "scrollen nach oben", "hoch"],
    },
    KeywordCommand {
        kind: CommandKind::Scroll(ScrollDirection::Down),
        patterns: &["nach unten", "scrollen nach unten", "runter"],
    },
];

/// A keyword hit: the command, the pattern and the leftover text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordMatch {
    pub kind: CommandKind,
    pub pattern: &'static str,
    /// Transcript with the first occurrence of the pattern removed, trimmed.
    pub parameter: String,
}

/// Finds the first keyword command contained in `transcript`.
///
/// ```rust
/// use liyana_core::voice::{match_keyword, CommandKind};
///
/// let hit = match_keyword("Was kostet das?").unwrap();
/// assert_eq!(hit.kind, CommandKind::Price);
/// assert_eq!(hit.parameter, "das?");
/// ```
pub fn match_keyword(transcript: &str) -> Option<KeywordMatch> {
    let transcript = transcript.trim().to_lowercase();

    KEYWORD_COMMANDS.iter().find_map(|command| {
        command
            .patterns
            .iter()
            .copied()
            .find(|pattern| transcript.contains(pattern))
            .map(|pattern| KeywordMatch {
                kind: command.kind,
                pattern,
                parameter: transcript.replacen(pattern, "", 1).trim().to_string(),
            })
    })
}

// =============================================================================
// Intents
// =============================================================================

/// What the storefront should do in response to a transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum VoiceIntent {
    Navigate { destination: Destination },
    /// Select a product and open its page.
    ShowProduct { product_id: String },
    /// The requested product is not in the catalog.
    ProductNotFound,
    /// Add one unit of the selected product (default volume).
    AddToCart { product_id: String, variants: Variants },
    /// "Add" without a selected product.
    NoProductSelected,
    ClearCart,
    Help,
    /// Price of the selected product's default volume.
    ProductPrice { product_id: String, price: Money },
    /// Total of the (non-empty) cart.
    CartTotal { total: Money },
    Scroll { direction: ScrollDirection },
    /// No keyword matched, but a product name was mentioned.
    SelectProduct { product_id: String },
    NotUnderstood,
}

/// Interpreter output: intent plus the text to speak.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct VoiceResponse {
    pub intent: VoiceIntent,
    pub reply: String,
}

/// Session state the interpreter needs to resolve a transcript.
#[derive(Debug, Clone, Copy, Default)]
pub struct VoiceContext<'a> {
    /// Product currently selected (last shown).
    pub selected_product: Option<&'a str>,
    /// Cart total, `None` when the cart is empty.
    pub cart_total: Option<Money>,
}

pub const HELP_REPLY: &str = "Sie können Befehle wie \"Zeige Produkte\", \"In den Warenkorb\", \
\"Zur Kasse\" oder \"Hilfe\" verwenden. Nennen Sie einfach ein Produkt, um mehr darüber zu erfahren.";

pub const NOT_UNDERSTOOD_REPLY: &str =
    "Entschuldigung, ich habe Sie nicht verstanden. Sagen Sie \"Hilfe\" für verfügbare Befehle.";

// =============================================================================
// Interpreter
// =============================================================================

/// Keyword interpreter over a catalog.
pub struct VoiceInterpreter<'c, C: CatalogProvider> {
    catalog: &'c C,
}

impl<'c, C: CatalogProvider> VoiceInterpreter<'c, C> {
    pub fn new(catalog: &'c C) -> Self {
        VoiceInterpreter { catalog }
    }

    /// Interprets one transcript.
    pub fn interpret(&self, transcript: &str, context: &VoiceContext<'_>) -> VoiceResponse {
        match match_keyword(transcript) {
            Some(hit) => self.resolve(hit, context),
            None => self.fallback(transcript),
        }
    }

    fn selected(&self, context: &VoiceContext<'_>) -> Option<&'c Product> {
        context.selected_product.and_then(|id| self.catalog.product(id))
    }

    fn resolve(&self, hit: KeywordMatch, context: &VoiceContext<'_>) -> VoiceResponse {
        match hit.kind {
            CommandKind::Navigate(destination) => respond(
                VoiceIntent::Navigate { destination },
                match destination {
                    Destination::Products => "Ich zeige Ihnen unsere Produkte",
                    Destination::Home => "Zurück zur Startseite",
                    Destination::Cart => "Hier ist Ihr Warenkorb",
                    Destination::Checkout => "Ich bringe Sie zur Kasse",
                },
            ),

            CommandKind::ShowProduct => match self.catalog.find_by_name(&hit.parameter) {
                Some(product) => respond(
                    VoiceIntent::ShowProduct {
                        product_id: product.id.clone(),
                    },
                    format!("Hier ist {}. {}", product.name, product.short_description),
                ),
                None => respond(
                    VoiceIntent::ProductNotFound,
                    "Dieses Produkt konnte ich nicht finden",
                ),
            },

            CommandKind::AddToCart => match self.selected(context) {
                Some(product) => respond(
                    VoiceIntent::AddToCart {
                        product_id: product.id.clone(),
                        variants: product.default_variants(),
                    },
                    format!("{} wurde zum Warenkorb hinzugefügt", product.name),
                ),
                None => respond(
                    VoiceIntent::NoProductSelected,
                    "Bitte wählen Sie zuerst ein Produkt aus",
                ),
            },

            CommandKind::ClearCart => respond(VoiceIntent::ClearCart, "Der Warenkorb wurde geleert"),

            CommandKind::Help => respond(VoiceIntent::Help, HELP_REPLY),

            CommandKind::Price => {
                if let Some(product) = self.selected(context) {
                    let price = product
                        .default_volume()
                        .map_or_else(|| product.effective_price(), |v| product.volume_price(v));
                    respond(
                        VoiceIntent::ProductPrice {
                            product_id: product.id.clone(),
                            price,
                        },
                        format!("{} kostet {} Euro", product.name, price.to_decimal_string()),
                    )
                } else if let Some(total) = context.cart_total {
                    respond(
                        VoiceIntent::CartTotal { total },
                        format!(
                            "Ihr Warenkorb enthält Artikel im Wert von {} Euro",
                            total.to_decimal_string()
                        ),
                    )
                } else {
                    respond(VoiceIntent::NoProductSelected, "Bitte wählen Sie ein Produkt aus")
                }
            }

            CommandKind::Scroll(direction) => respond(
                VoiceIntent::Scroll { direction },
                match direction {
                    ScrollDirection::Up => "Nach oben gescrollt",
                    ScrollDirection::Down => "Nach unten gescrollt",
                },
            ),
        }
    }

    fn fallback(&self, transcript: &str) -> VoiceResponse {
        match self.catalog.mentioned_in(transcript) {
            Some(product) => respond(
                VoiceIntent::SelectProduct {
                    product_id: product.id.clone(),
                },
                format!("Ich zeige Ihnen {}", product.name),
            ),
            None => respond(VoiceIntent::NotUnderstood, NOT_UNDERSTOOD_REPLY),
        }
    }
}

fn respond(intent: VoiceIntent, reply: impl Into<String>) -> VoiceResponse {
    VoiceResponse {
        intent,
        reply: reply.into(),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::StaticCatalog;

    fn interpret(transcript: &str, context: VoiceContext<'_>) -> VoiceResponse {
        let catalog = StaticCatalog::liyana_nour();
        VoiceInterpreter::new(&catalog).interpret(transcript, &context)
    }

    #[test]
    fn test_navigation() {
        let response = interpret("Zeige Produkte", VoiceContext::default());
        assert_eq!(
            response.intent,
            VoiceIntent::Navigate {
                destination: Destination::Products
            }
        );
        assert_eq!(response.reply, "Ich zeige Ihnen unsere Produkte");

        let response = interpret("  ZUR KASSE bitte ", VoiceContext::default());
        assert_eq!(
            response.intent,
            VoiceIntent::Navigate {
                destination: Destination::Checkout
            }
        );
        assert_eq!(Destination::Checkout.path(), "/checkout");
    }

    #[test]
    fn test_table_order_wins() {
        // "warenkorb" is scanned before "warenkorb leeren"
        let response = interpret("warenkorb leeren", VoiceContext::default());
        assert_eq!(
            response.intent,
            VoiceIntent::Navigate {
                destination: Destination::Cart
            }
        );

        let response = interpret("alles löschen", VoiceContext::default());
        assert_eq!(response.intent, VoiceIntent::ClearCart);
        assert_eq!(response.reply, "Der Warenkorb wurde geleert");
    }

    #[test]
    fn test_show_product() {
        let response = interpret("zeige mir oud", VoiceContext::default());
        assert_eq!(
            response.intent,
            VoiceIntent::ShowProduct {
                product_id: "ln-oud".to_string()
            }
        );
        assert_eq!(response.reply, "Hier ist Liyana Nour Oud. Reines Oud und Weihrauch");

        let response = interpret("zeige mir chanel", VoiceContext::default());
        assert_eq!(response.intent, VoiceIntent::ProductNotFound);

        // Empty parameter does not pick an arbitrary product
        let response = interpret("zeige mir", VoiceContext::default());
        assert_eq!(response.intent, VoiceIntent::ProductNotFound);
    }

    #[test]
    fn test_add_requires_selection() {
        let response = interpret("kaufen", VoiceContext::default());
        assert_eq!(response.intent, VoiceIntent::NoProductSelected);

        let context = VoiceContext {
            selected_product: Some("ln-rouge"),
            cart_total: None,
        };
        let response = interpret("ich nehme es", context);
        match response.intent {
            VoiceIntent::AddToCart { product_id, variants } => {
                assert_eq!(product_id, "ln-rouge");
                assert_eq!(variants.get("volume").map(String::as_str), Some("ln-rouge-50"));
            }
            other => panic!("unexpected intent: {:?}", other),
        }
        assert_eq!(response.reply, "Liyana Nour Rouge wurde zum Warenkorb hinzugefügt");
    }

    #[test]
    fn test_price_query() {
        let context = VoiceContext {
            selected_product: Some("ln-rouge"),
            cart_total: Some(Money::from_cents(6448)),
        };
        let response = interpret("was kostet das", context);
        assert_eq!(response.reply, "Liyana Nour Rouge kostet 49.99 Euro");

        let context = VoiceContext {
            selected_product: None,
            cart_total: Some(Money::from_cents(6448)),
        };
        let response = interpret("wie teuer", context);
        assert_eq!(
            response.intent,
            VoiceIntent::CartTotal {
                total: Money::from_cents(6448)
            }
        );
        assert_eq!(response.reply, "Ihr Warenkorb enthält Artikel im Wert von 64.48 Euro");

        let response = interpret("preis", VoiceContext::default());
        assert_eq!(response.reply, "Bitte wählen Sie ein Produkt aus");
    }

    #[test]
    fn test_help_and_scroll() {
        assert_eq!(interpret("hilfe", VoiceContext::default()).intent, VoiceIntent::Help);
        assert_eq!(
            interpret("runter", VoiceContext::default()).intent,
            VoiceIntent::Scroll {
                direction: ScrollDirection::Down
            }
        );
    }

    #[test]
    fn test_fallback_to_product_name() {
        let response = interpret("Liyana Nour Blanc", VoiceContext::default());
        assert_eq!(
            response.intent,
            VoiceIntent::SelectProduct {
                product_id: "ln-blanc".to_string()
            }
        );
        assert_eq!(response.reply, "Ich zeige Ihnen Liyana Nour Blanc");

        let response = interpret("guten tag", VoiceContext::default());
        assert_eq!(response.intent, VoiceIntent::NotUnderstood);
        assert_eq!(response.reply, NOT_UNDERSTOOD_REPLY);
    }

    #[test]
    fn test_match_keyword_parameter() {
        let hit = match_keyword("Erzähle mir über Velvet").unwrap();
        assert_eq!(hit.kind, CommandKind::ShowProduct);
        assert_eq!(hit.pattern, "erzähle mir über");
        assert_eq!(hit.parameter, "velvet");
        assert!(match_keyword("").is_none());
    }
}
