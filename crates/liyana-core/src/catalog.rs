//! # Catalog
//!
//! Product records and the catalog provider the cart reads from.
//!
//! ## Type Hierarchy
//! ```text
//! ┌──────────────────────────┐        ┌──────────────────────────┐
//! │         Product          │ 1    * │      ProductVolume       │
//! │  ──────────────────────  │───────►│  ──────────────────────  │
//! │  id ("ln-rouge")         │        │  id ("ln-rouge-50")      │
//! │  name                    │        │  ml                      │
//! │  price / discount_price  │        │  price                   │
//! │  stock, is_active        │        │  stock, is_default       │
//! └──────────────────────────┘        └──────────────────────────┘
//! ```
//!
//! The catalog owns products; line items only keep a snapshot of the name and
//! the resolved unit price, plus the product id as a back-reference.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::Variants;
use crate::VOLUME_VARIANT;

// =============================================================================
// Product Category
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum ProductCategory {
    PourFemme,
    PourHomme,
    Unisex,
    Exclusive,
    Limited,
    Discovery,
}

// =============================================================================
// Product Volume
// =============================================================================

/// A purchasable size of a fragrance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ProductVolume {
    pub id: String,
    /// Bottle size in millilitres.
    pub ml: u32,
    pub price: Money,
    pub stock: i64,
    pub is_default: bool,
}

// =============================================================================
// Product
// =============================================================================

/// A fragrance available in the shop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Stable slug identifier (e.g. "ln-rouge").
    pub id: String,

    /// Display name, also what the voice interpreter listens for.
    pub name: String,

    pub short_description: String,

    pub category: ProductCategory,

    /// Base price, used when no volume is selected.
    pub price: Money,

    /// Sale price. Takes precedence over `price` when no volume is selected.
    pub discount_price: Option<Money>,

    pub volumes: Vec<ProductVolume>,

    /// Stock when sold without a volume selection.
    pub stock: i64,

    /// Whether the product can currently be added to a cart.
    pub is_active: bool,
}

impl Product {
    /// The price charged when no volume variant is selected.
    #[inline]
    pub fn effective_price(&self) -> Money {
        self.discount_price.unwrap_or(self.price)
    }

    /// The default volume, or the first one when none is flagged.
    pub fn default_volume(&self) -> Option<&ProductVolume> {
        self.volumes
            .iter()
            .find(|v| v.is_default)
            .or_else(|| self.volumes.first())
    }

    /// Unit price of one of this product's volumes. A sale price overrides
    /// every volume price.
    #[inline]
    pub fn volume_price(&self, volume: &ProductVolume) -> Money {
        self.discount_price.unwrap_or(volume.price)
    }

    /// Looks up a volume by id.
    pub fn volume(&self, volume_id: &str) -> Option<&ProductVolume> {
        self.volumes.iter().find(|v| v.id == volume_id)
    }

    /// Variants selecting the default volume (empty if the product has none).
    pub fn default_variants(&self) -> Variants {
        let mut variants = Variants::new();
        if let Some(volume) = self.default_volume() {
            variants.insert(VOLUME_VARIANT.to_string(), volume.id.clone());
        }
        variants
    }

    /// Resolves the unit price and available stock for a variant selection.
    ///
    /// ## Rules
    /// - `volume` selected: `volume_price()` and that volume's stock
    ///   (unknown id is an error)
    /// - no `volume`: `effective_price()` and the product-level stock
    pub fn resolve(&self, variants: &Variants) -> CoreResult<(Money, i64)> {
        match variants.get(VOLUME_VARIANT) {
            Some(volume_id) => {
                let volume = self
                    .volume(volume_id)
                    .ok_or_else(|| CoreError::VariantNotFound {
                        product_id: self.id.clone(),
                        key: VOLUME_VARIANT.to_string(),
                        value: volume_id.clone(),
                    })?;
                Ok((self.volume_price(volume), volume.stock))
            }
            None => Ok((self.effective_price(), self.stock)),
        }
    }
}

// =============================================================================
// Catalog Provider
// =============================================================================

/// Read access to the product catalog.
///
/// The cart and voice interpreter only ever read products; where they come
/// from (static table, remote API) is up to the implementation.
pub trait CatalogProvider {
    /// All products, in display order.
    fn products(&self) -> &[Product];

    /// Looks up a product by id.
    fn product(&self, id: &str) -> Option<&Product> {
        self.products().iter().find(|p| p.id == id)
    }

    /// First product whose name contains `query` (case-insensitive).
    fn find_by_name(&self, query: &str) -> Option<&Product> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return None;
        }
        self.products()
            .iter()
            .find(|p| p.name.to_lowercase().contains(&query))
    }

    /// First product whose full name appears in `text` (case-insensitive).
    fn mentioned_in(&self, text: &str) -> Option<&Product> {
        let text = text.to_lowercase();
        self.products()
            .iter()
            .find(|p| text.contains(&p.name.to_lowercase()))
    }
}

// =============================================================================
// Static Catalog
// =============================================================================

/// An in-memory catalog.
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    products: Vec<Product>,
}

/// (slug, name, category, short description, 50ml cents, 100ml cents, stock)
const LIYANA_NOUR_LINE: &[(&str, &str, ProductCategory, &str, i64, i64, i64)] = &[
    ("rouge", "Liyana Nour Rouge", ProductCategory::PourFemme, "Rose, Safran und warmes Amber", 4999, 8900, 40),
    ("intense", "Liyana Nour Intense", ProductCategory::PourHomme, "Tabak, Leder und Vanille", 6900, 11900, 25),
    ("blanc", "Liyana Nour Blanc", ProductCategory::PourFemme, "Weiße Blüten und Moschus", 6000, 9900, 35),
    ("noir", "Liyana Nour Noir", ProductCategory::PourHomme, "Schwarzer Pfeffer und Vetiver", 8000, 13900, 20),
    ("gold", "Liyana Nour Gold", ProductCategory::Exclusive, "Honig, Iris und Goldholz", 12900, 21900, 10),
    ("rose", "Liyana Nour Rose", ProductCategory::PourFemme, "Damaszener Rose und Litschi", 5900, 9900, 30),
    ("oud", "Liyana Nour Oud", ProductCategory::Unisex, "Reines Oud und Weihrauch", 14900, 24900, 8),
    ("velvet", "Liyana Nour Velvet", ProductCategory::PourFemme, "Pfirsich und Wildleder", 6500, 10900, 22),
    ("crystal", "Liyana Nour Crystal", ProductCategory::Unisex, "Bergamotte und Mineralnoten", 5500, 9500, 28),
    ("mystique", "Liyana Nour Mystique", ProductCategory::Unisex, "Myrrhe und dunkle Beeren", 7900, 12900, 15),
    ("elixir", "Liyana Nour Elixir", ProductCategory::Exclusive, "Kirsche, Mandel und Tonka", 9900, 16900, 12),
    ("absolue", "Liyana Nour Absolue", ProductCategory::Exclusive, "Jasmin Absolue und Sandelholz", 11900, 19900, 10),
    ("prive", "Liyana Nour Prive", ProductCategory::Exclusive, "Private Kollektion, Ambra und Moos", 17900, 29900, 5),
    ("sport", "Liyana Nour Sport", ProductCategory::PourHomme, "Zitrus, Minze und Zedernholz", 3900, 6500, 50),
    ("fresh", "Liyana Nour Fresh", ProductCategory::Unisex, "Grüner Tee und Gurke", 3000, 5200, 60),
    ("oriental", "Liyana Nour Oriental", ProductCategory::Unisex, "Kardamom, Zimt und Oud", 8900, 14900, 18),
    ("exclusive", "Liyana Nour Exclusive", ProductCategory::Exclusive, "Orris und weißer Amber", 15900, 26900, 6),
    ("limited-edition", "Liyana Nour Limited Edition", ProductCategory::Limited, "Limitierte Auflage mit Safran", 19900, 32900, 3),
    ("anniversary", "Liyana Nour Anniversary", ProductCategory::Limited, "Jubiläumsduft mit Champagnerakkord", 9900, 16900, 7),
];

impl StaticCatalog {
    /// Creates a catalog from a product list.
    pub fn new(products: Vec<Product>) -> Self {
        StaticCatalog { products }
    }

    /// The Liyana Nour Extrait product line.
    ///
    /// Every fragrance comes in 50ml (default) and 100ml; the discovery set is
    /// a single 5×2ml box sold without volume choice.
    pub fn liyana_nour() -> Self {
        let mut products: Vec<Product> = LIYANA_NOUR_LINE
            .iter()
            .map(|&(slug, name, category, description, price_50, price_100, stock)| {
                let id = format!("ln-{}", slug);
                Product {
                    volumes: vec![
                        ProductVolume {
                            id: format!("{}-50", id),
                            ml: 50,
                            price: Money::from_cents(price_50),
                            stock,
                            is_default: true,
                        },
                        ProductVolume {
                            id: format!("{}-100", id),
                            ml: 100,
                            price: Money::from_cents(price_100),
                            stock: stock / 2,
                            is_default: false,
                        },
                    ],
                    id,
                    name: name.to_string(),
                    short_description: description.to_string(),
                    category,
                    price: Money::from_cents(price_50),
                    discount_price: None,
                    stock,
                    is_active: true,
                }
            })
            .collect();

        products.push(Product {
            id: "ln-discovery-set".to_string(),
            name: "Liyana Nour Discovery Set".to_string(),
            short_description: "Fünf Extraits à 2ml zum Entdecken".to_string(),
            category: ProductCategory::Discovery,
            price: Money::from_cents(2900),
            discount_price: Some(Money::from_cents(2400)),
            volumes: Vec::new(),
            stock: 100,
            is_active: true,
        });

        StaticCatalog { products }
    }
}

impl CatalogProvider for StaticCatalog {
    fn products(&self) -> &[Product] {
        &self.products
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
