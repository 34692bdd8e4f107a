//! # Domain Types
//!
//! Core domain types used throughout LapTrack.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │   UnitDraft     │   │      Unit       │   │   SaleRecord    │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  operator input │──►│  id (UUID)      │──►│  sale_id (UUID) │       │
//! │  │  + quantity     │   │  seq (store)    │   │  quantity_sold  │       │
//! │  │                 │   │  buying_cost    │   │  total_profit   │       │
//! │  └─────────────────┘   │  date_added     │   │  date_sold      │       │
//! │                        └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  Shared by Unit and SaleRecord: LaptopSpec                              │
//! │    brand, model, processor, ram_gb, storage, graphics_card, condition   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Ordering Identity
//! Every stored unit carries `seq`, a strictly increasing number assigned by
//! the store on insert. Ties on `date_added` are broken by `seq`, never by
//! incidental collection order.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{CoreResult, ValidationError};
use crate::money::Money;
use crate::validation::{
    validate_batch_quantity, validate_buying_cost, validate_ram_gb, validate_required_text,
    validate_target_price, MAX_TEXT_LEN,
};
use crate::NO_GRAPHICS_CARD;

// =============================================================================
// Condition
// =============================================================================

/// Physical condition of a laptop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
pub enum Condition {
    New,
    Used,
}

impl Condition {
    /// All conditions in display order.
    pub const ALL: [Condition; 2] = [Condition::New, Condition::Used];

    pub fn as_str(&self) -> &'static str {
        match self {
            Condition::New => "New",
            Condition::Used => "Used",
        }
    }
}

impl Default for Condition {
    fn default() -> Self {
        Condition::Used
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Condition {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "new" => Ok(Condition::New),
            "used" => Ok(Condition::Used),
            _ => Err(ValidationError::NotAllowed {
                field: "condition".to_string(),
                allowed: Condition::ALL.iter().map(|c| c.to_string()).collect(),
            }),
        }
    }
}

// =============================================================================
// Laptop Spec
// =============================================================================

/// Descriptive attributes shared by a stock unit and the sale record that
/// retires it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LaptopSpec {
    pub brand: String,
    pub model: String,
    pub processor: String,
    pub ram_gb: u32,
    pub storage: String,
    /// `None` means integrated graphics only.
    pub graphics_card: Option<String>,
    pub condition: Condition,
}

impl LaptopSpec {
    /// Graphics card as shown to the operator and used in group keys.
    pub fn graphics_card_label(&self) -> &str {
        match self.graphics_card.as_deref() {
            Some(gpu) if !gpu.trim().is_empty() => gpu,
            _ => NO_GRAPHICS_CARD,
        }
    }

    /// Short "Brand Model" title.
    pub fn title(&self) -> String {
        format!("{} {}", self.brand, self.model)
    }
}

// =============================================================================
// Unit
// =============================================================================

/// A unit about to be inserted. The store assigns `seq`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewUnit {
    pub id: String,
    #[serde(flatten)]
    pub spec: LaptopSpec,
    pub buying_cost: Money,
    pub target_selling_price: Option<Money>,
    pub date_added: DateTime<Utc>,
    pub image_url: Option<String>,
}

impl NewUnit {
    /// Attaches the store-assigned sequence number.
    pub fn into_unit(self, seq: i64) -> Unit {
        Unit {
            id: self.id,
            seq,
            spec: self.spec,
            buying_cost: self.buying_cost,
            target_selling_price: self.target_selling_price,
            date_added: self.date_added,
            image_url: self.image_url,
        }
    }
}

/// A single physical laptop in stock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Unit {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Store-assigned insertion sequence.
    pub seq: i64,

    #[serde(flatten)]
    pub spec: LaptopSpec,

    /// Purchase price of this unit.
    pub buying_cost: Money,

    /// Price the operator hopes to get, used as the default sell price.
    pub target_selling_price: Option<Money>,

    /// When the unit entered stock.
    pub date_added: DateTime<Utc>,

    pub image_url: Option<String>,
}

impl Unit {
    /// FIFO ordering key: oldest first, insertion order on ties.
    #[inline]
    pub fn age_key(&self) -> (DateTime<Utc>, i64) {
        (self.date_added, self.seq)
    }
}

// =============================================================================
// Sale Record
// =============================================================================

/// One sale of one or more identical units. Append-only.
///
/// Uses the snapshot pattern: the laptop's attributes are frozen at the
/// time of sale because the stock rows are deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleRecord {
    pub sale_id: String,
    #[serde(flatten)]
    pub spec: LaptopSpec,
    pub buying_cost_per_unit: Money,
    pub final_selling_price_per_unit: Money,
    pub quantity_sold: u32,
    /// `(final − buying) × quantity`; negative for a loss.
    pub total_profit: Money,
    pub date_sold: DateTime<Utc>,
    /// `date_added` of the group representative at sale time.
    pub date_added_original: DateTime<Utc>,
    pub image_url: Option<String>,
}

impl SaleRecord {
    /// Revenue of this sale.
    #[inline]
    pub fn sales_value(&self) -> Money {
        self.final_selling_price_per_unit
            .multiply_quantity(self.quantity_sold)
    }

    /// Cost basis realized by this sale.
    #[inline]
    pub fn cost_basis(&self) -> Money {
        self.buying_cost_per_unit.multiply_quantity(self.quantity_sold)
    }
}

// =============================================================================
// Unit Draft
// =============================================================================

/// Operator input for an "add N identical laptops" action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitDraft {
    pub brand: String,
    pub model: String,
    pub processor: String,
    pub ram_gb: u32,
    pub storage: String,
    pub graphics_card: Option<String>,
    pub condition: Condition,
    pub buying_cost: Money,
    pub target_selling_price: Option<Money>,
    pub image_url: Option<String>,
}

impl UnitDraft {
    /// Checks every field before anything is generated.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_required_text("brand", &self.brand, MAX_TEXT_LEN)?;
        validate_required_text("model", &self.model, MAX_TEXT_LEN)?;
        validate_required_text("processor", &self.processor, MAX_TEXT_LEN)?;
        validate_required_text("storage", &self.storage, MAX_TEXT_LEN)?;
        if let Some(gpu) = &self.graphics_card {
            if gpu.trim().len() > MAX_TEXT_LEN {
                return Err(ValidationError::TooLong {
                    field: "graphics card".to_string(),
                    max: MAX_TEXT_LEN,
                });
            }
        }
        validate_ram_gb(self.ram_gb)?;
        validate_buying_cost(self.buying_cost)?;
        validate_target_price(self.target_selling_price)?;
        Ok(())
    }

    /// Expands the draft into `quantity` distinct units.
    ///
    /// Each unit gets its own UUID and `date_added = now + i ms`, so the
    /// batch keeps a deterministic add order even before the store assigns
    /// sequence numbers.
    ///
    /// ## Example
    /// ```rust
    /// use chrono::Utc;
    /// use laptrack_core::{Condition, Money, UnitDraft};
    ///
    /// let draft = UnitDraft {
    ///     brand: "Lenovo".into(),
    ///     model: "ThinkPad T14".into(),
    ///     processor: "Ryzen 5 PRO".into(),
    ///     ram_gb: 16,
    ///     storage: "512GB SSD".into(),
    ///     graphics_card: Some("".into()),
    ///     condition: Condition::Used,
    ///     buying_cost: Money::from_major_minor(28_500, 0),
    ///     target_selling_price: None,
    ///     image_url: None,
    /// };
    /// let batch = draft.into_batch(3, Utc::now()).unwrap();
    /// assert_eq!(batch.len(), 3);
    /// assert!(batch[0].date_added < batch[1].date_added);
    /// assert_eq!(batch[0].spec.graphics_card, None);
    /// ```
    pub fn into_batch(self, quantity: u32, now: DateTime<Utc>) -> CoreResult<Vec<NewUnit>> {
        self.validate()?;
        validate_batch_quantity(quantity)?;

        let spec = LaptopSpec {
            brand: self.brand.trim().to_string(),
            model: self.model.trim().to_string(),
            processor: self.processor.trim().to_string(),
            ram_gb: self.ram_gb,
            storage: self.storage.trim().to_string(),
            graphics_card: self
                .graphics_card
                .map(|g| g.trim().to_string())
                .filter(|g| !g.is_empty()),
            condition: self.condition,
        };
        let image_override = self
            .image_url
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty());

        let units = (0..quantity)
            .map(|i| {
                let id = uuid::Uuid::new_v4().to_string();
                let image_url = image_override
                    .clone()
                    .unwrap_or_else(|| placeholder_image_url(&spec.brand, &id));
                NewUnit {
                    id,
                    spec: spec.clone(),
                    buying_cost: self.buying_cost,
                    target_selling_price: self.target_selling_price,
                    date_added: now + Duration::milliseconds(i64::from(i)),
                    image_url: Some(image_url),
                }
            })
            .collect();

        Ok(units)
    }
}

/// Stock photo URL for a brand, unique per unit.
pub fn placeholder_image_url(brand: &str, unit_id: &str) -> String {
    let slug: String = brand
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-')
        .collect();
    format!(
        "https://source.unsplash.com/400x300/?{}-laptop,laptop&random={}",
        slug, unit_id
    )
}

// =============================================================================
// Unit Tests
// =============================================================================
