//! # Stock Repository
//!
//! Laptops currently in stock, one row per physical unit.
//!
//! ## Batch Insert
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  add_units([u1, u2, u3])                                                │
//! │       │                                                                 │
//! │       ▼  BEGIN                                                          │
//! │  INSERT u1 ... ON CONFLICT(id) DO NOTHING RETURNING seq  → 41           │
//! │  INSERT u2 ... ON CONFLICT(id) DO NOTHING RETURNING seq  → (dup, none)  │
//! │  INSERT u3 ... ON CONFLICT(id) DO NOTHING RETURNING seq  → 42           │
//! │       │                                                                 │
//! │       ▼  COMMIT                                                         │
//! │  [Unit{u1, seq 41}, Unit{u3, seq 42}]  ← only the rows actually stored  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! An existing row is never overwritten by a duplicate id.

use laptrack_core::{Condition, LaptopSpec, Money, NewUnit, Unit};
use sqlx::SqlitePool;
use tracing::{debug, info};

use super::{from_millis, to_millis, to_u32};
use crate::error::{DbError, DbResult};

const SELECT_UNIT: &str = r#"
    SELECT
        seq, id, brand, model, processor, ram_gb, storage, graphics_card,
        condition, buying_cost_cents, target_selling_price_cents,
        date_added_ms, image_url
    FROM laptops_stock
"#;

#[derive(sqlx::FromRow)]
struct UnitRow {
    seq: i64,
    id: String,
    brand: String,
    model: String,
    processor: String,
    ram_gb: i64,
    storage: String,
    graphics_card: Option<String>,
    condition: Condition,
    buying_cost_cents: i64,
    target_selling_price_cents: Option<i64>,
    date_added_ms: i64,
    image_url: Option<String>,
}

impl TryFrom<UnitRow> for Unit {
    type Error = DbError;

    fn try_from(row: UnitRow) -> DbResult<Self> {
        Ok(Unit {
            id: row.id,
            seq: row.seq,
            spec: LaptopSpec {
                brand: row.brand,
                model: row.model,
                processor: row.processor,
                ram_gb: to_u32("ram_gb", row.ram_gb)?,
                storage: row.storage,
                graphics_card: row.graphics_card,
                condition: row.condition,
            },
            buying_cost: Money::from_cents(row.buying_cost_cents),
            target_selling_price: row.target_selling_price_cents.map(Money::from_cents),
            date_added: from_millis("date_added_ms", row.date_added_ms)?,
            image_url: row.image_url,
        })
    }
}

/// Repository for stock units.
#[derive(Debug, Clone)]
pub struct StockRepository {
    pool: SqlitePool,
}

impl StockRepository {
    pub fn new(pool: SqlitePool) -> Self {
        StockRepository { pool }
    }

    /// All units in stock, oldest first (date_added, then seq).
    pub async fn list(&self) -> DbResult<Vec<Unit>> {
        let sql = format!("{} ORDER BY date_added_ms ASC, seq ASC", SELECT_UNIT);
        let rows: Vec<UnitRow> = sqlx::query_as(&sql).fetch_all(&self.pool).await?;

        debug!(count = rows.len(), "Listed stock");
        rows.into_iter().map(Unit::try_from).collect()
    }

    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Unit>> {
        let sql = format!("{} WHERE id = ?1", SELECT_UNIT);
        let row: Option<UnitRow> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(Unit::try_from).transpose()
    }

    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM laptops_stock")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Inserts a batch in one transaction and returns the stored units.
    ///
    /// Units whose id already exists are skipped and left out of the
    /// result. Either the whole batch is committed or none of it is.
    pub async fn add_units(&self, units: &[NewUnit]) -> DbResult<Vec<Unit>> {
        let mut tx = self.pool.begin().await?;
        let mut stored = Vec::with_capacity(units.len());

        for unit in units {
            let seq: Option<i64> = sqlx::query_scalar(
                r#"
                INSERT INTO laptops_stock (
                    id, brand, model, processor, ram_gb, storage, graphics_card,
                    condition, buying_cost_cents, target_selling_price_cents,
                    date_added_ms, image_url
                ) VALUES (
                    ?1, ?2, ?3, ?4, ?5, ?6, ?7,
                    ?8, ?9, ?10,
                    ?11, ?12
                )
                ON CONFLICT(id) DO NOTHING
                RETURNING seq
                "#,
            )
            .bind(&unit.id)
            .bind(&unit.spec.brand)
            .bind(&unit.spec.model)
            .bind(&unit.spec.processor)
            .bind(i64::from(unit.spec.ram_gb))
            .bind(&unit.spec.storage)
            .bind(&unit.spec.graphics_card)
            .bind(unit.spec.condition)
            .bind(unit.buying_cost.cents())
            .bind(unit.target_selling_price.map(|m| m.cents()))
            .bind(to_millis(unit.date_added))
            .bind(&unit.image_url)
            .fetch_optional(&mut *tx)
            .await?;

            match seq {
                Some(seq) => {
                    let mut unit = unit.clone().into_unit(seq);
                    unit.date_added = from_millis("date_added_ms", to_millis(unit.date_added))?;
                    stored.push(unit);
                }
                None => debug!(id = %unit.id, "Skipping duplicate unit id"),
            }
        }

        tx.commit().await?;

        info!(
            requested = units.len(),
            stored = stored.len(),
            "Added units to stock"
        );
        Ok(stored)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::super::test_support::{at, batch, draft, memory_db};
    use laptrack_core::group_units;

    #[tokio::test]
    async fn test_add_units_assigns_increasing_seq() {
        let db = memory_db().await;
        let stored = db.stock().add_units(&batch("Dell", 3, at(0))).await.unwrap();

        assert_eq!(stored.len(), 3);
        assert!(stored.windows(2).all(|w| w[0].seq < w[1].seq));
        assert_eq!(db.stock().count().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_list_returns_what_was_stored() {
        let db = memory_db().await;
        let stored = db.stock().add_units(&batch("HP", 2, at(5))).await.unwrap();

        let listed = db.stock().list().await.unwrap();
        assert_eq!(listed, stored);
    }

    #[tokio::test]
    async fn test_list_orders_by_date_then_seq() {
        let db = memory_db().await;
        db.stock().add_units(&batch("Later", 1, at(100))).await.unwrap();
        db.stock().add_units(&batch("Earlier", 1, at(1))).await.unwrap();
        db.stock().add_units(&batch("Tie", 1, at(1))).await.unwrap();

        let brands: Vec<_> = db
            .stock()
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|u| u.spec.brand)
            .collect();
        assert_eq!(brands, vec!["Earlier", "Tie", "Later"]);
    }

    #[tokio::test]
    async fn test_duplicate_ids_are_ignored_not_overwritten() {
        let db = memory_db().await;
        let first = batch("Dell", 1, at(0));
        db.stock().add_units(&first).await.unwrap();

        let mut dup = first.clone();
        dup[0].buying_cost = laptrack_core::Money::from_cents(1);
        let stored = db.stock().add_units(&dup).await.unwrap();

        assert!(stored.is_empty());
        let kept = db.stock().get_by_id(&first[0].id).await.unwrap().unwrap();
        assert_eq!(kept.buying_cost, first[0].buying_cost);
    }

    #[tokio::test]
    async fn test_stored_units_group_together() {
        let db = memory_db().await;
        db.stock().add_units(&batch("Dell", 2, at(0))).await.unwrap();
        let other = draft("Dell", 8, 30_000).into_batch(1, at(1)).unwrap();
        db.stock().add_units(&other).await.unwrap();

        let groups = group_units(&db.stock().list().await.unwrap());
        assert_eq!(groups.len(), 2);
        let quantities: Vec<_> = groups.iter().map(|g| g.quantity()).collect();
        assert!(quantities.contains(&2) && quantities.contains(&1));
    }

    #[tokio::test]
    async fn test_get_by_id_missing() {
        let db = memory_db().await;
        assert!(db.stock().get_by_id("missing").await.unwrap().is_none());
    }
}
