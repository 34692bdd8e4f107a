//! # Grouping Engine
//!
//! Collapses individual stock units with identical attributes into groups
//! so the operator sees "Dell Latitude 7420 × 3" instead of three rows.
//!
//! ## Algorithm
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  units (any order)                                                      │
//! │       │                                                                 │
//! │       ▼  sort by (date_added, seq, id)                                  │
//! │  oldest ──────────────────────────────────────────────► newest          │
//! │       │                                                                 │
//! │       ▼  fold by GroupKey                                               │
//! │  first unit of a key  → representative                                  │
//! │  later units          → appended to members                             │
//! │       │                                                                 │
//! │       ▼  sort groups by (brand, model, rep.date_added, rep.seq)         │
//! │  Vec<Group>                                                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Groups are never cached or stored. They are rebuilt from the unit list on
//! every read, so they cannot drift from stock.

use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{Condition, LaptopSpec, Unit};

// =============================================================================
// Group Key
// =============================================================================

/// Exact attribute tuple that decides whether two units are identical.
///
/// A missing graphics card is keyed as `"N/A"`, and buying cost is compared
/// to the paisa.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct GroupKey {
    pub brand: String,
    pub model: String,
    pub processor: String,
    pub ram_gb: u32,
    pub storage: String,
    pub graphics_card: String,
    pub condition: Condition,
    pub buying_cost: Money,
}

impl GroupKey {
    pub fn of(unit: &Unit) -> Self {
        let LaptopSpec {
            brand,
            model,
            processor,
            ram_gb,
            storage,
            condition,
            ..
        } = &unit.spec;

        GroupKey {
            brand: brand.clone(),
            model: model.clone(),
            processor: processor.clone(),
            ram_gb: *ram_gb,
            storage: storage.clone(),
            graphics_card: unit.spec.graphics_card_label().to_string(),
            condition: *condition,
            buying_cost: unit.buying_cost,
        }
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}|{}|{}|{}|{}|{}|{}|{}",
            self.brand,
            self.model,
            self.processor,
            self.ram_gb,
            self.storage,
            self.graphics_card,
            self.condition,
            self.buying_cost
        )
    }
}

// =============================================================================
// Group
// =============================================================================

/// Identical units in stock, oldest first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Group {
    pub(crate) key: GroupKey,
    pub(crate) representative: Unit,
    pub(crate) members: Vec<Unit>,
}

impl Group {
    pub fn key(&self) -> &GroupKey {
        &self.key
    }

    /// The earliest unit in the group. Its attributes describe the group.
    pub fn representative(&self) -> &Unit {
        &self.representative
    }

    /// Members ordered by (date_added, seq) ascending.
    pub fn members(&self) -> &[Unit] {
        &self.members
    }

    pub fn quantity(&self) -> u32 {
        u32::try_from(self.members.len()).unwrap_or(u32::MAX)
    }

    /// True if any member or the representative has this id.
    pub fn contains(&self, unit_id: &str) -> bool {
        self.members.iter().any(|u| u.id == unit_id)
    }

    /// Combined buying cost of every member.
    pub fn total_cost(&self) -> Money {
        self.members.iter().map(|u| u.buying_cost).sum()
    }
}

// =============================================================================
// Grouping
// =============================================================================

/// Groups units with identical attributes.
///
/// Deterministic for any permutation of `units`: every unit lands in exactly
/// one group and the display order depends only on the units themselves.
pub fn group_units(units: &[Unit]) -> Vec<Group> {
    let mut ordered: Vec<&Unit> = units.iter().collect();
    ordered.sort_by(|a, b| a.age_key().cmp(&b.age_key()).then_with(|| a.id.cmp(&b.id)));

    let mut index: HashMap<GroupKey, usize> = HashMap::new();
    let mut groups: Vec<Group> = Vec::new();

    for unit in ordered {
        let key = GroupKey::of(unit);
        match index.get(&key) {
            Some(&i) => groups[i].members.push(unit.clone()),
            None => {
                index.insert(key.clone(), groups.len());
                groups.push(Group {
                    key,
                    representative: unit.clone(),
                    members: vec![unit.clone()],
                });
            }
        }
    }

    // Remaining ties (same brand/model/date/seq) can only come from distinct
    // keys sharing a seq, so the key itself settles them.
    groups.sort_by(|a, b| {
        let (ra, rb) = (&a.representative, &b.representative);
        ra.spec
            .brand
            .cmp(&rb.spec.brand)
            .then_with(|| ra.spec.model.cmp(&rb.spec.model))
            .then_with(|| ra.age_key().cmp(&rb.age_key()))
            .then_with(|| a.key.cmp(&b.key))
    });

    groups
}

// =============================================================================
// Group Selection
// =============================================================================

/// How the operator points at a group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupSelector {
    /// 1-based position in the inventory listing.
    Position(usize),
    /// Id of any unit in the group.
    UnitId(String),
}

impl FromStr for GroupSelector {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().trim_start_matches('#');
        Ok(match s.parse::<usize>() {
            Ok(n) => GroupSelector::Position(n),
            Err(_) => GroupSelector::UnitId(s.to_string()),
        })
    }
}

impl fmt::Display for GroupSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupSelector::Position(n) => write!(f, "#{}", n),
            GroupSelector::UnitId(id) => f.write_str(id),
        }
    }
}

/// Finds the group a selector points at.
pub fn find_group<'a>(groups: &'a [Group], selector: &GroupSelector) -> CoreResult<&'a Group> {
    let found = match selector {
        GroupSelector::Position(n) => n.checked_sub(1).and_then(|i| groups.get(i)),
        GroupSelector::UnitId(id) => groups.iter().find(|g| g.contains(id)),
    };
    found.ok_or_else(|| CoreError::GroupNotFound(selector.to_string()))
}

// =============================================================================
// Unit Tests
// =============================================================================
